pub mod dream;
pub mod feed;
pub mod help;
pub mod ping;
pub mod server;
pub mod uptime;
