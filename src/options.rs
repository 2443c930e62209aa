//! Extraction options

use crate::policy::Policy;

/// Options for extracting one source unit
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Name tables for visibility and decorator recognition
    pub policy: Policy,
    /// Keep declarations whose names start with an underscore
    pub include_private: bool,
    /// Keep private module declarations that the public surface refers to
    pub retain_referenced: bool,
    /// Dotted module path of the unit, used to resolve relative imports
    pub module_path: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            policy: Policy::default(),
            include_private: false,
            retain_referenced: false,
            module_path: String::new(),
        }
    }
}

impl ExtractOptions {
    pub fn with_module_path(mut self, module_path: impl Into<String>) -> Self {
        self.module_path = module_path.into();
        self
    }

    pub fn with_private(mut self, include_private: bool) -> Self {
        self.include_private = include_private;
        self
    }

    pub fn with_retained_references(mut self, retain_referenced: bool) -> Self {
        self.retain_referenced = retain_referenced;
        self
    }
}
