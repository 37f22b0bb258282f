/// Generic embed builders shared across commands.
pub mod embed;
/// Interaction response helpers for component flows.
pub mod interaction;
/// Single source of truth for the message-command prefix.
pub const COMMAND_PREFIX: char = '!';
/// Pure parser helpers.
pub mod parse;
/// Permission helper utilities.
pub mod permissions;
/// Role filtering, role menu rendering and selection reconciliation.
pub mod roles;
/// Shared time helpers.
pub mod time;
