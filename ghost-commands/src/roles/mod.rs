//! Self-service role menu: `!rolesetup` posts it, member submissions are reconciled here.

pub mod selection;
pub mod setup;
