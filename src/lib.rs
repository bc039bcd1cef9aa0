//! Linkdeck core - platform-independent logic behind the landing page.
//! The Dioxus rendering layer in the binary drives these state machines and
//! executes the side effects they return.

pub mod backdrop;
pub mod config;
pub mod deep_link;
pub mod error;

pub use error::{ConfigError, PoolError};
