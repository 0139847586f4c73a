//! Component definitions for the ECS simulation.
//!
//! Components are data structs attached to entities. Injector and liver
//! each own their solution outright; nothing is shared by reference.

mod chemistry;
mod common;

pub use chemistry::*;
pub use common::*;
