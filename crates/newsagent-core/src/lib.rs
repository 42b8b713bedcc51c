//! Core abstractions for the crypto news agent
//!
//! This crate defines the fundamental traits and types shared by every agent
//! surface: the [`Agent`] trait, the per-session [`ChatLog`], and the core
//! error type.

pub mod agent;
pub mod error;
pub mod session;

pub use agent::Agent;
pub use error::{Error, Result};
pub use session::{ChatLog, ChatRole, ChatTurn};
