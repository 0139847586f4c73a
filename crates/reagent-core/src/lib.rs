//! Reagent Core - ECS layer for chemistry
//!
//! Injectors, liver metabolism and injector state replication on top of
//! the pure rules in `reagent-logic`.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Injectors, beakers and other containers, creatures with a liver
//! - **Components**: Pure data attached to entities (Injector, Liver, SolutionContainer, Position)
//! - **Systems**: Logic that queries and updates components (interaction, metabolism)
//!
//! The engine owns the world, an immutable `ReagentRegistry`, the popup
//! queue and the replication outbox.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use reagent_core::prelude::*;
//!
//! let registry = Arc::new(ReagentRegistry::builder().build().unwrap());
//! let mut engine = ChemistryEngine::new(registry);
//!
//! let syringe = engine.spawn_injector(&InjectorConfig::default(), Position::default());
//!
//! loop {
//!     engine.update(1.0 / 60.0); // 60 FPS
//!     for message in engine.drain_outbox() {
//!         // hand `message.payload` to the transport
//!         let _ = (syringe, message);
//!     }
//! }
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod notify;
pub mod registry;
pub mod replication;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::{EngineConfig, InjectorConfig, LiverConfig};
    pub use crate::engine::ChemistryEngine;
    pub use crate::notify::{Notifications, PopupMessage};
    pub use crate::registry::{Metabolizable, ReagentRegistry};
    pub use crate::replication::{InjectorSnapshot, InjectorStatus};
    pub use crate::systems::{InteractionEvent, UseEvent};
    pub use reagent_logic::{InjectorMode, InjectorNotice, Solution, SolutionCaps};
}
