pub mod client;
pub mod encoding;
pub mod server;
