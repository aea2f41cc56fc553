use anyhow::{Result, anyhow};
use log::{info, warn};
use midir::{MidiInput, MidiInputConnection};
use tokio::sync::mpsc::UnboundedSender;

use crate::config::MidiBinding;
use crate::notes::NoteEvent;

const CLIENT_NAME: &str = "midi-ocean";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelRole {
    Piano,
    Pad,
}

impl ChannelRole {
    pub const VALUES: [ChannelRole; 2] = [ChannelRole::Piano, ChannelRole::Pad];

    pub fn label(&self) -> &'static str {
        match self {
            ChannelRole::Piano => "piano",
            ChannelRole::Pad => "pad",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteAction {
    On,
    Off,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MidiMessage {
    pub role: ChannelRole,
    pub action: NoteAction,
    pub event: NoteEvent,
}

// A note-on with zero velocity is a note-off.
pub fn parse_note_message(data: &[u8]) -> Option<(NoteAction, NoteEvent)> {
    let &[status, note, velocity, ..] = data else {
        return None;
    };
    let action = match status & 0xF0 {
        0x80 => NoteAction::Off,
        0x90 if velocity == 0 => NoteAction::Off,
        0x90 => NoteAction::On,
        _ => return None,
    };
    let event = NoteEvent::from_midi(note as i32, velocity as f32 / 127.0);
    Some((action, event))
}

pub fn assign_roles(binding: &MidiBinding, ports: &[String]) -> Vec<(ChannelRole, usize)> {
    let mut assigned: Vec<(ChannelRole, usize)> = Vec::new();
    let by_name = |pattern: &Option<String>| {
        let pattern = pattern.as_ref()?.to_lowercase();
        ports
            .iter()
            .position(|name| name.to_lowercase().contains(&pattern))
    };
    for (position, role) in ChannelRole::VALUES.into_iter().enumerate() {
        let index = match binding {
            MidiBinding::Positional => Some(position),
            MidiBinding::ByName { piano, pad } => {
                let pattern = match role {
                    ChannelRole::Piano => piano,
                    ChannelRole::Pad => pad,
                };
                if pattern.is_some() {
                    by_name(pattern)
                } else {
                    Some(position)
                }
            }
        };
        if let Some(index) = index {
            let taken = assigned.iter().any(|(_, claimed)| *claimed == index);
            if index < ports.len() && !taken {
                assigned.push((role, index));
            }
        }
    }
    assigned
}

pub struct MidiInputs {
    _connections: Vec<MidiInputConnection<()>>,
}

impl MidiInputs {
    // Ok(None) when nothing is bound; the scene still renders.
    pub fn connect(
        binding: &MidiBinding,
        sender: UnboundedSender<MidiMessage>,
    ) -> Result<Option<Self>> {
        let probe = MidiInput::new(CLIENT_NAME)?;
        let names: Vec<String> = probe
            .ports()
            .iter()
            .map(|port| {
                probe
                    .port_name(port)
                    .unwrap_or_else(|_| "Unknown".to_owned())
            })
            .collect();
        info!("found {} MIDI input port(s): {:?}", names.len(), names);

        let roles = assign_roles(binding, &names);
        if roles.is_empty() {
            warn!("no MIDI input bound, running without note input");
            return Ok(None);
        }

        let mut connections = Vec::with_capacity(roles.len());
        let mut bound = Vec::with_capacity(roles.len());
        for (role, index) in roles {
            match open_port(role, index, sender.clone()) {
                Ok(connection) => {
                    info!("{} bound to '{}'", role.label(), names[index]);
                    connections.push(connection);
                    bound.push(role);
                }
                Err(err) => warn!("could not open {} port '{}': {err}", role.label(), names[index]),
            }
        }
        for role in ChannelRole::VALUES {
            if !bound.contains(&role) {
                warn!("{} channel has no device and stays idle", role.label());
            }
        }

        if connections.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self {
            _connections: connections,
        }))
    }
}

fn open_port(
    role: ChannelRole,
    index: usize,
    sender: UnboundedSender<MidiMessage>,
) -> Result<MidiInputConnection<()>> {
    let input = MidiInput::new(CLIENT_NAME)?;
    let ports = input.ports();
    let port = ports
        .get(index)
        .ok_or_else(|| anyhow!("port {index} disappeared"))?;
    input
        .connect(
            port,
            &format!("{CLIENT_NAME}-{}", role.label()),
            move |_stamp, data, _| {
                if let Some((action, event)) = parse_note_message(data) {
                    let _ = sender.send(MidiMessage {
                        role,
                        action,
                        event,
                    });
                }
            },
            (),
        )
        .map_err(|err| anyhow!("{err}"))
}
