//! Core types and definitions for the VOLLEY slingshot game.
//!
//! This crate defines the vocabulary shared across all other crates:
//! scene snapshots, aim data, commands, events, tuning and constants.
//! Components are plain data; the ECS lives in the sandbox crate.

pub mod aim;
pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod materials;
pub mod profiles;
pub mod scene;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
