//! Domain models for the rx-assist system.

mod inventory;
mod mention;
mod order;

pub use inventory::*;
pub use mention::*;
pub use order::*;
