//! ECS systems that operate on the sandbox world each tick.
//!
//! Systems are free functions over `&mut World` (or `&World` for read-only).
//! They do not own state; all state lives in components.

pub mod cleanup;
pub mod contact;
pub mod flight;
pub mod scoring;
pub mod settle;
pub mod snapshot;
