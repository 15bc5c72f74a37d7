//! Items and per-character inventories.
pub mod components;

pub use components::{Inventory, ItemKind};
