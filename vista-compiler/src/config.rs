/// Attribute prefix marking a directive invocation, e.g. `v-show="open"`.
pub const DEFAULT_PREFIX: &str = "v-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    pub prefix: String,
    /// Record and log non-fatal compile diagnostics (unknown directives).
    pub diagnostics: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            diagnostics: false,
        }
    }
}

impl CompilerConfig {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }
}
