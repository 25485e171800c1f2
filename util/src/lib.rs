pub mod config;
pub mod geo;
pub mod state;
pub mod ws;
