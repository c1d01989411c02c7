pub mod cli;
pub mod commands;
pub mod config;
pub mod control;
pub mod error;
pub mod exec;
pub mod packages;
pub mod platform;
pub mod report;
pub mod store;
