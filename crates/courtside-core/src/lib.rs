//! Core types, store traits, and derived views for the courtside scoreboard.
//!
//! This crate has no HTTP or database dependencies.
//! Everything that turns a snapshot of events or matches into a number lives
//! here as a pure function; persistence is behind the traits in [`store`].

pub mod aggregate;
pub mod error;
pub mod event;
pub mod league;
pub mod roster;
pub mod standings;
pub mod store;

pub use error::{Error, Result};
