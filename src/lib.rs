pub mod charts;
pub mod config;
pub mod error;
pub mod export;
pub mod fake_source;
pub mod fpl_fetch;
pub mod http_client;
pub mod logging;
pub mod session;
pub mod shaping;
pub mod state;
pub mod table;
