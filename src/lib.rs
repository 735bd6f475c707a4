pub mod actions;
pub mod cli;
pub mod color;
pub mod config;
pub mod error;
pub mod forwarder;
pub mod installer;
pub mod logging;
pub mod picker;
pub mod process;
pub mod service;
pub mod setup;
pub mod store;
pub mod worker;

// Command modules
pub mod commands;
