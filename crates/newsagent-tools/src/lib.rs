//! Tool framework for the crypto news agent
//!
//! Tools are named capabilities with a natural-language description. An
//! orchestrator picks one by reading those descriptions and hands it the raw
//! user query.

pub mod registry;
pub mod tool;

pub use registry::{ToolRegistry, ToolRegistryBuilder};
pub use tool::Tool;
