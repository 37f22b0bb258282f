//! Process-local state shared by command handlers.
//!
//! Nothing here survives a restart.

/// Role menu registry keyed by control id.
pub mod menus;
/// Per-member warning log.
pub mod warnings;

pub use menus::{BoundMenu, MenuLookup, RoleMenuRegistry};
pub use warnings::{MemberKey, MemoryWarningStore, WarningEntry, WarningRecord, WarningStore};
