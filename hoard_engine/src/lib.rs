#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

pub const HOARD_VERSION: &str = env!("CARGO_PKG_VERSION");

pub use hoard_data::Id;

// Core modules
pub mod catalog;
pub mod character;
pub mod container;
pub mod crime;
pub mod data_paths;
pub mod inventory;
pub mod item;
pub mod loader;
pub mod notice;
pub mod owner;
pub mod party;
pub mod pile;
pub mod rule;
pub mod save_files;
pub mod slot;
pub mod stats;
pub mod trade;
pub mod transfer;

// Re-exports for convenience
pub use catalog::Catalog;
pub use character::Character;
pub use container::Container;
pub use crime::CrimeLog;
pub use inventory::{Acceptance, Bag, Inventory, LoadContext};
pub use item::{Item, ItemKind};
pub use loader::load_catalog;
pub use loader::trade::TradeConfig;
pub use notice::{Notice, NoticeLog};
pub use owner::Owner;
pub use party::Party;
pub use pile::Pile;
pub use slot::{BagKind, EquipSlot};
