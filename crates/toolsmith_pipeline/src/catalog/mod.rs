//! Tool registry.

mod builtin;

use crate::ToolSpec;
use std::collections::HashMap;
use tracing::warn;

/// Ordered collection of tools addressable by id.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: Vec<ToolSpec>,
    index: HashMap<String, usize>,
}

impl ToolCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with every bundled tool.
    pub fn builtin() -> Self {
        builtin::tools().into_iter().collect()
    }

    /// Adds a tool, replacing any tool with the same id.
    pub fn register(&mut self, tool: ToolSpec) {
        match self.index.get(tool.id()) {
            Some(&i) => {
                warn!(tool = %tool.id(), "Replacing registered tool");
                self.tools[i] = tool;
            }
            None => {
                self.index.insert(tool.id().clone(), self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// Looks a tool up by id.
    pub fn get(&self, id: &str) -> Option<&ToolSpec> {
        self.index.get(id).map(|&i| &self.tools[i])
    }

    /// Tools in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolSpec> {
        self.tools.iter()
    }

    /// Tools in one category.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a ToolSpec> {
        self.tools
            .iter()
            .filter(move |t| t.category().eq_ignore_ascii_case(category))
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for tool in &self.tools {
            if !seen.contains(&tool.category().as_str()) {
                seen.push(tool.category());
            }
        }
        seen
    }

    /// Number of tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// True when no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl FromIterator<ToolSpec> for ToolCatalog {
    fn from_iter<I: IntoIterator<Item = ToolSpec>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for tool in iter {
            catalog.register(tool);
        }
        catalog
    }
}
