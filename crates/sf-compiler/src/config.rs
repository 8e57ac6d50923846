use sf_command::DEFAULT_PACK_FORMAT;

/// Options for one compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileConfig {
    /// `pack_format` written to `pack.mcmeta`.
    pub pack_format: u32,
    /// Datapack description.
    pub description: String,
    /// Datapack namespace. `None` derives it from the level name.
    pub namespace: Option<String>,
    /// Whether the world pass may reuse cached models.
    pub full: bool,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            pack_format: DEFAULT_PACK_FORMAT,
            description: "Map Datapack".to_string(),
            namespace: None,
            full: true,
        }
    }
}

impl CompileConfig {
    /// The default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style pack format.
    pub fn with_pack_format(mut self, pack_format: u32) -> Self {
        self.pack_format = pack_format;
        self
    }

    /// Builder-style description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder-style namespace override.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Builder-style full/quick switch.
    pub fn with_full(mut self, full: bool) -> Self {
        self.full = full;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = CompileConfig::default();
        assert_eq!(config.pack_format, 48);
        assert_eq!(config.description, "Map Datapack");
        assert!(config.namespace.is_none());
        assert!(config.full);
    }

    #[test]
    fn config_builder_chain() {
        let config = CompileConfig::new()
            .with_pack_format(41)
            .with_description("Castle")
            .with_namespace("castle")
            .with_full(false);
        assert_eq!(config.pack_format, 41);
        assert_eq!(config.description, "Castle");
        assert_eq!(config.namespace.as_deref(), Some("castle"));
        assert!(!config.full);
    }
}
