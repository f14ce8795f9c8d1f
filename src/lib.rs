pub mod aggregator;
pub mod format;
pub mod render;
pub mod server;
pub mod vendor;
