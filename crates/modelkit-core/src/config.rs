//! Compiler configuration.

/// Runtime type name used for entities that do not bind one explicitly.
pub const DEFAULT_BOUND_TYPE_NAME: &str = "ManagedObject";

/// Schema compiler configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Type name reported for entities without an explicit binding.
    pub default_bound_type_name: String,

    /// Require each inverse pair to target each other's owning entity.
    pub strict_inverses: bool,

    /// Log storage hints declared on types that cannot use them.
    pub warn_on_storage_hints: bool,
}

impl CompilerConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self {
            default_bound_type_name: DEFAULT_BOUND_TYPE_NAME.to_string(),
            strict_inverses: false,
            warn_on_storage_hints: true,
        }
    }

    /// Set the fallback bound type name.
    pub fn with_default_bound_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.default_bound_type_name = type_name.into();
        self
    }

    /// Enable inverse destination checks.
    pub fn with_strict_inverses(mut self) -> Self {
        self.strict_inverses = true;
        self
    }

    /// Silence storage hint warnings.
    pub fn without_storage_hint_warnings(mut self) -> Self {
        self.warn_on_storage_hints = false;
        self
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self::new()
    }
}
