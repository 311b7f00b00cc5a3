pub mod config;
pub mod metrics;
pub mod nature_remo;
pub mod refresh;
pub mod server;
