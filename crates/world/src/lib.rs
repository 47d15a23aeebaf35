#![warn(missing_docs)]
//! Interaction, inventory, crafting and fishing rules for Lettuce Park.

mod config;
mod crafting;
mod error;
mod events;
mod fishing;
mod interaction;
mod inventory;
mod player;
mod populate;
mod session;
mod storage;

pub use config::*;
pub use crafting::*;
pub use error::*;
pub use events::*;
pub use fishing::*;
pub use interaction::*;
pub use inventory::*;
pub use player::*;
pub use populate::*;
pub use session::*;
pub use storage::*;
