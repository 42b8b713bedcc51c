//! Tool registry for managing available tools
//!
//! A [`ToolRegistry`] is assembled once through [`ToolRegistryBuilder`] and is
//! immutable afterwards. Tools whose prerequisites are missing are simply never
//! added, so callers can't reach a non-functional tool.

use crate::Tool;
use std::sync::Arc;
use tracing::{debug, warn};

/// Immutable, ordered set of tools
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

impl ToolRegistry {
    /// Start building a registry
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    /// Check whether a tool is registered
    pub fn contains(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name() == name)
    }

    /// All tools, in registration order
    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    /// Tool names, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// `name: description` lines used to describe the registry to a selector
    pub fn describe(&self) -> String {
        self.tools
            .iter()
            .map(|t| format!("{}: {}", t.name(), t.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Builder for [`ToolRegistry`]
#[derive(Default)]
pub struct ToolRegistryBuilder {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistryBuilder {
    /// Append a tool
    ///
    /// A tool whose name is already taken is ignored.
    pub fn tool(mut self, tool: Arc<dyn Tool>) -> Self {
        if self.tools.iter().any(|t| t.name() == tool.name()) {
            warn!("Tool '{}' already registered, ignoring duplicate", tool.name());
            return self;
        }
        debug!("Registering tool '{}'", tool.name());
        self.tools.push(tool);
        self
    }

    /// Append a tool only when it could be constructed
    ///
    /// `None` means the tool's prerequisites (usually a credential) are
    /// missing and it is left out of the registry.
    pub fn tool_if_available(self, tool: Option<Arc<dyn Tool>>) -> Self {
        match tool {
            Some(tool) => self.tool(tool),
            None => self,
        }
    }

    /// Freeze the registry
    pub fn build(self) -> ToolRegistry {
        ToolRegistry { tools: self.tools }
    }
}
