//! Injector state replication.
//!
//! The authoritative side snapshots dirty injectors and encodes each
//! snapshot as a fixed 13-byte bincode record:
//!
//! | field          | type | notes                      |
//! |----------------|------|----------------------------|
//! | channel        | u32  | `REAGENT_INJECTOR_CHANNEL` |
//! | current_volume | u32  |                            |
//! | total_volume   | u32  |                            |
//! | mode           | u8   | 0 = Inject, 1 = Draw       |
//!
//! The display side overwrites its copy on receipt and redraws lazily on
//! its next refresh.

use std::collections::HashMap;

use hecs::{Entity, World};
use serde::{Deserialize, Serialize};

use crate::components::Injector;
use crate::error::ReplicationError;
use reagent_logic::{InjectorMode, ReagentUnit};

/// Stable channel identifier for injector state
pub const REAGENT_INJECTOR_CHANNEL: u32 = 1037;

/// Encoded size of one injector record
pub const INJECTOR_WIRE_SIZE: usize = 13;

/// Point-in-time projection of an injector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectorSnapshot {
    pub current_volume: ReagentUnit,
    pub total_volume: ReagentUnit,
    pub mode: InjectorMode,
}

#[derive(Serialize, Deserialize)]
struct WireInjectorState {
    channel: u32,
    current_volume: u32,
    total_volume: u32,
    mode: u8,
}

impl InjectorSnapshot {
    pub fn encode(&self) -> Result<Vec<u8>, ReplicationError> {
        let wire = WireInjectorState {
            channel: REAGENT_INJECTOR_CHANNEL,
            current_volume: self.current_volume,
            total_volume: self.total_volume,
            mode: self.mode.to_wire(),
        };
        Ok(bincode::serialize(&wire)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ReplicationError> {
        if bytes.len() != INJECTOR_WIRE_SIZE {
            return Err(ReplicationError::Length {
                expected: INJECTOR_WIRE_SIZE,
                found: bytes.len(),
            });
        }

        let wire: WireInjectorState = bincode::deserialize(bytes)?;
        if wire.channel != REAGENT_INJECTOR_CHANNEL {
            return Err(ReplicationError::WrongChannel {
                expected: REAGENT_INJECTOR_CHANNEL,
                found: wire.channel,
            });
        }
        let mode = InjectorMode::from_wire(wire.mode).ok_or(ReplicationError::UnknownMode(wire.mode))?;

        Ok(Self {
            current_volume: wire.current_volume,
            total_volume: wire.total_volume,
            mode,
        })
    }
}

/// Project an injector into a snapshot
pub fn build_snapshot(injector: &Injector) -> InjectorSnapshot {
    InjectorSnapshot {
        current_volume: injector.internal().current_volume(),
        total_volume: injector.internal().max_volume(),
        mode: injector.mode(),
    }
}

/// Snapshot every dirty injector and clear its dirty flag
pub fn replicate_dirty(world: &mut World) -> Vec<(Entity, InjectorSnapshot)> {
    let mut snapshots = Vec::new();
    for (entity, injector) in world.query_mut::<&mut Injector>() {
        if injector.take_dirty() {
            snapshots.push((entity, build_snapshot(injector)));
        }
    }
    snapshots
}

/// Encoded snapshot addressed to an entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicatedMessage {
    /// `Entity::to_bits` of the injector
    pub entity: u64,
    pub payload: Vec<u8>,
}

impl ReplicatedMessage {
    pub fn new(entity: Entity, snapshot: &InjectorSnapshot) -> Result<Self, ReplicationError> {
        Ok(Self {
            entity: entity.to_bits().get(),
            payload: snapshot.encode()?,
        })
    }
}

/// Display-side copy of one injector's state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectorStatus {
    current_volume: ReagentUnit,
    total_volume: ReagentUnit,
    current_mode: InjectorMode,
    ui_update_needed: bool,
}

impl InjectorStatus {
    pub fn new() -> Self {
        Self {
            ui_update_needed: true,
            ..Self::default()
        }
    }

    pub fn current_volume(&self) -> ReagentUnit {
        self.current_volume
    }

    pub fn total_volume(&self) -> ReagentUnit {
        self.total_volume
    }

    pub fn current_mode(&self) -> InjectorMode {
        self.current_mode
    }

    pub fn needs_redraw(&self) -> bool {
        self.ui_update_needed
    }

    /// Overwrite local state from the authoritative snapshot
    pub fn handle_state(&mut self, snapshot: &InjectorSnapshot) {
        self.current_volume = snapshot.current_volume;
        self.total_volume = snapshot.total_volume;
        self.current_mode = snapshot.mode;
        self.ui_update_needed = true;
    }

    /// Decode and apply a wire payload; a bad payload leaves state untouched
    pub fn apply_payload(&mut self, payload: &[u8]) -> Result<(), ReplicationError> {
        let snapshot = InjectorSnapshot::decode(payload)?;
        self.handle_state(&snapshot);
        Ok(())
    }

    /// Status line text, produced once per change
    pub fn refresh(&mut self) -> Option<String> {
        if !self.ui_update_needed {
            return None;
        }
        self.ui_update_needed = false;
        Some(format!(
            "Volume: {}/{} | {}",
            self.current_volume, self.total_volume, self.current_mode
        ))
    }
}

/// Display-side table of injector statuses keyed by entity bits
#[derive(Debug, Clone, Default)]
pub struct DisplayMirror {
    statuses: HashMap<u64, InjectorStatus>,
}

impl DisplayMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn receive(&mut self, message: &ReplicatedMessage) -> Result<(), ReplicationError> {
        let snapshot = InjectorSnapshot::decode(&message.payload).map_err(|err| {
            log::warn!("Dropping injector state for {}: {}", message.entity, err);
            err
        })?;
        self.statuses
            .entry(message.entity)
            .or_insert_with(InjectorStatus::new)
            .handle_state(&snapshot);
        Ok(())
    }

    pub fn status(&self, entity: Entity) -> Option<&InjectorStatus> {
        self.statuses.get(&entity.to_bits().get())
    }

    pub fn status_mut(&mut self, entity: Entity) -> Option<&mut InjectorStatus> {
        self.statuses.get_mut(&entity.to_bits().get())
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}
