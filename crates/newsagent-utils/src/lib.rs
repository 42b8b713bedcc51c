//! Shared utilities for the crypto news agent
//!
//! Logging setup, `.env` handling and credential helpers used across the
//! workspace.

pub mod env;
pub mod logging;

pub use env::{DotenvStatus, load_dotenv, mask_secret, non_empty_var};
pub use logging::{init_tracing, init_tracing_with};
