pub mod ban;
pub mod embeds;
pub mod kick;
pub mod purge;
pub mod timeout;
pub mod warn;
pub mod warnings_of;
