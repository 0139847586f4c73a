//! Chemistry engine - main entry point for running the simulation

use std::sync::Arc;

use hecs::{Entity, World};

use crate::components::*;
use crate::config::{EngineConfig, InjectorConfig, LiverConfig};
use crate::notify::{Notifications, PopupMessage};
use crate::registry::ReagentRegistry;
use crate::replication::{replicate_dirty, ReplicatedMessage};
use crate::systems::*;
use reagent_logic::{InjectorNotice, Solution};

/// Main chemistry engine
pub struct ChemistryEngine {
    /// ECS world containing all entities
    pub world: World,
    /// Simulation time in seconds since start
    pub sim_time: f64,
    /// Reagent prototypes, shared read-only
    registry: Arc<ReagentRegistry>,
    config: EngineConfig,
    /// Popups produced since the last drain
    notifications: Notifications,
    /// Encoded injector snapshots waiting for transport
    outbox: Vec<ReplicatedMessage>,

    // Frame time not yet handed to metabolism
    accumulated_metabolism: f32,
}

impl ChemistryEngine {
    pub fn new(registry: Arc<ReagentRegistry>) -> Self {
        Self::with_config(registry, EngineConfig::default())
    }

    pub fn with_config(registry: Arc<ReagentRegistry>, config: EngineConfig) -> Self {
        Self {
            world: World::new(),
            sim_time: 0.0,
            registry,
            config,
            notifications: Notifications::new(),
            outbox: Vec::new(),
            accumulated_metabolism: 0.0,
        }
    }

    pub fn registry(&self) -> &ReagentRegistry {
        &self.registry
    }

    /// Spawn an injector device at `position`
    pub fn spawn_injector(&mut self, config: &InjectorConfig, position: Position) -> Entity {
        self.world.spawn((Injector::new(config), position))
    }

    /// Spawn a free-standing container (beaker, bottle, ...)
    pub fn spawn_container(&mut self, container: SolutionContainer) -> Entity {
        self.world.spawn((container,))
    }

    /// Spawn a creature with a liver
    pub fn spawn_patient(&mut self, config: &LiverConfig, position: Position) -> Entity {
        self.world.spawn((Liver::new(config), position))
    }

    /// Hand a whole dose to a liver; it's returned if it doesn't fit
    pub fn dose_liver(&mut self, patient: Entity, dose: Solution) -> Result<(), Solution> {
        match self.world.get::<&mut Liver>(patient) {
            Ok(mut liver) => liver.try_transfer(dose),
            Err(_) => Err(dose),
        }
    }

    /// Use an injector in hand (toggles its mode)
    pub fn handle_use(&mut self, event: UseEvent) -> bool {
        use_injector(&self.world, event, &mut self.notifications)
    }

    /// Apply an injector to a target
    pub fn handle_interaction(&mut self, event: InteractionEvent) -> Option<InjectorNotice> {
        apply_injector(&self.world, event, &mut self.notifications)
    }

    /// Update the simulation by delta_seconds
    pub fn update(&mut self, delta_seconds: f32) {
        self.sim_time += delta_seconds as f64;

        // Metabolism runs on accumulated time, not every frame
        self.accumulated_metabolism += delta_seconds;
        if self.accumulated_metabolism >= self.config.metabolism_interval {
            let elapsed = self.accumulated_metabolism;
            let removed = metabolism_system(&mut self.world, &self.registry, elapsed);
            log::trace!("Metabolism pass over {:.2}s removed {}u", elapsed, removed);
            self.accumulated_metabolism = 0.0;
        }

        self.flush_replication();
    }

    /// Snapshot dirty injectors into the outbox. Returns how many were queued.
    pub fn flush_replication(&mut self) -> usize {
        let mut queued = 0;
        for (entity, snapshot) in replicate_dirty(&mut self.world) {
            match ReplicatedMessage::new(entity, &snapshot) {
                Ok(message) => {
                    self.outbox.push(message);
                    queued += 1;
                }
                Err(err) => log::warn!("Failed to encode injector {:?}: {}", entity, err),
            }
        }
        queued
    }

    pub fn drain_notifications(&mut self) -> Vec<PopupMessage> {
        self.notifications.drain()
    }

    pub fn drain_outbox(&mut self) -> Vec<ReplicatedMessage> {
        std::mem::take(&mut self.outbox)
    }

    /// Get current simulation time in seconds
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Count injectors
    pub fn injector_count(&self) -> usize {
        self.world.query::<&Injector>().iter().count()
    }

    /// Count livers
    pub fn liver_count(&self) -> usize {
        self.world.query::<&Liver>().iter().count()
    }
}
