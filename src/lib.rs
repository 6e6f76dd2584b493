// This project was developed with assistance from GitHub Copilot
// Library module for JWKS server

pub mod clock;
pub mod config;
pub mod discovery;
pub mod endpoints;
pub mod error;
pub mod key_management;
pub mod server;
pub mod token;
pub mod types;
