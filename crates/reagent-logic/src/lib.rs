//! Reagent Logic - pure solution and injector rules
//!
//! Everything here is plain data plus invariant-preserving operations:
//! no ECS, no transport, no localization. The `reagent-core` crate wires
//! these types into a `hecs` world.
//!
//! # Example
//!
//! ```rust
//! use reagent_logic::{transfer, Solution};
//!
//! let mut syringe = Solution::with_capacity(15);
//! syringe.add_reagent("Water", 10);
//!
//! let mut beaker = Solution::with_capacity(50);
//! let moved = transfer(&mut syringe, &mut beaker, 5).unwrap();
//!
//! assert_eq!(moved, 5);
//! assert_eq!(syringe.current_volume(), 5);
//! assert_eq!(beaker.quantity_of("Water"), 5);
//! ```

pub mod error;
pub mod injector;
pub mod solution;
pub mod transfer;

pub use error::TransferError;
pub use injector::{InjectorMode, InjectorNotice, ModeSwitch};
pub use solution::{ReagentQuantity, ReagentUnit, Solution, SolutionCaps};
pub use transfer::{clamp_transfer, transfer};
