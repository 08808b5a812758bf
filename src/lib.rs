//! Taskmate - Natural Language Task Assistant

pub mod agent;
pub mod command;
pub mod core;
pub mod intent;
pub mod store;
