// Command handlers module
// This module contains all CLI command implementations

pub mod action;
pub mod common;
pub mod completion;
pub mod init;
pub mod install;
pub mod menu;
pub mod service;
pub mod status;
pub mod up;
