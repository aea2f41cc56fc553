use std::time::{SystemTime, UNIX_EPOCH};

const OCTAVES: usize = 4;
const FALLOFF: f32 = 0.5;

#[derive(Clone)]
pub struct CoherentNoise {
    perm: [u8; 512],
}

impl CoherentNoise {
    pub fn new() -> Self {
        Self::with_seed(random_seed())
    }

    pub fn with_seed(seed: u64) -> Self {
        let mut state = seed.max(1);
        let mut table = [0u8; 256];
        for (index, slot) in table.iter_mut().enumerate() {
            *slot = index as u8;
        }
        for index in (1..table.len()).rev() {
            let pick = (lcg(&mut state) % (index as u64 + 1)) as usize;
            table.swap(index, pick);
        }
        let mut perm = [0u8; 512];
        for (index, slot) in perm.iter_mut().enumerate() {
            *slot = table[index & 255];
        }
        Self { perm }
    }

    pub fn sample(&self, x: f32, y: f32, z: f32) -> f32 {
        let mut amplitude = FALLOFF;
        let mut frequency = 1.0;
        let mut sum = 0.0;
        let mut total = 0.0;
        for _ in 0..OCTAVES {
            let n = self.gradient(x * frequency, y * frequency, z * frequency);
            sum += amplitude * (n * 0.5 + 0.5);
            total += amplitude;
            amplitude *= FALLOFF;
            frequency *= 2.0;
        }
        (sum / total).clamp(0.0, 1.0)
    }

    pub fn sample2(&self, x: f32, y: f32) -> f32 {
        self.sample(x, y, 0.0)
    }

    fn gradient(&self, x: f32, y: f32, z: f32) -> f32 {
        let (xf, yf, zf) = (x.floor(), y.floor(), z.floor());
        let xi = (xf as i32 & 255) as usize;
        let yi = (yf as i32 & 255) as usize;
        let zi = (zf as i32 & 255) as usize;
        let (x, y, z) = (x - xf, y - yf, z - zf);
        let (u, v, w) = (fade(x), fade(y), fade(z));

        let p = &self.perm;
        let a = p[xi] as usize + yi;
        let aa = p[a] as usize + zi;
        let ab = p[a + 1] as usize + zi;
        let b = p[xi + 1] as usize + yi;
        let ba = p[b] as usize + zi;
        let bb = p[b + 1] as usize + zi;

        lerp(
            w,
            lerp(
                v,
                lerp(u, grad(p[aa], x, y, z), grad(p[ba], x - 1.0, y, z)),
                lerp(
                    u,
                    grad(p[ab], x, y - 1.0, z),
                    grad(p[bb], x - 1.0, y - 1.0, z),
                ),
            ),
            lerp(
                v,
                lerp(
                    u,
                    grad(p[aa + 1], x, y, z - 1.0),
                    grad(p[ba + 1], x - 1.0, y, z - 1.0),
                ),
                lerp(
                    u,
                    grad(p[ab + 1], x, y - 1.0, z - 1.0),
                    grad(p[bb + 1], x - 1.0, y - 1.0, z - 1.0),
                ),
            ),
        )
    }
}

impl Default for CoherentNoise {
    fn default() -> Self {
        Self::new()
    }
}

fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(t: f32, a: f32, b: f32) -> f32 {
    a + t * (b - a)
}

fn grad(hash: u8, x: f32, y: f32, z: f32) -> f32 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}

fn lcg(state: &mut u64) -> u64 {
    // LCG: Numerical Recipes constants.
    *state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
    *state >> 11
}

fn random_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|dur| dur.as_nanos() as u64)
        .unwrap_or(0x5EED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_stay_in_unit_range() {
        let noise = CoherentNoise::with_seed(7);
        for i in 0..500 {
            let t = i as f32 * 0.37;
            let value = noise.sample(t * 0.004, t * 0.1, t * 0.007);
            assert!((0.0..=1.0).contains(&value), "{value} out of range");
            let value = noise.sample(-t, t * 3.1, -t * 0.5);
            assert!((0.0..=1.0).contains(&value), "{value} out of range");
        }
    }

    #[test]
    fn same_seed_same_field() {
        let a = CoherentNoise::with_seed(42);
        let b = CoherentNoise::with_seed(42);
        for i in 0..50 {
            let x = i as f32 * 0.13;
            assert_eq!(a.sample(x, 1.5, 2.5), b.sample(x, 1.5, 2.5));
        }
    }

    #[test]
    fn nearby_points_are_close() {
        let noise = CoherentNoise::with_seed(3);
        let mut previous = noise.sample(0.0, 0.5, 0.25);
        for i in 1..200 {
            let value = noise.sample(i as f32 * 0.001, 0.5, 0.25);
            assert!((value - previous).abs() < 0.05);
            previous = value;
        }
    }

    #[test]
    fn field_is_not_flat() {
        let noise = CoherentNoise::with_seed(11);
        let values: Vec<f32> = (0..100).map(|i| noise.sample2(i as f32 * 0.31, 0.7)).collect();
        let min = values.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = values.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert!(max - min > 0.1);
    }
}
