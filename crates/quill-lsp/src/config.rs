use serde::Deserialize;

/// Root configuration for the Quill language server.
///
/// Provided by the client via initialization options; every field has a
/// sensible default. Compiler settings are deliberately absent; they are
/// fixed by the workspace collaborator, not negotiated with the editor.
///
/// # Examples
///
/// ```
/// use quill_lsp::config::QuillConfig;
///
/// let json = r#"{ "diagnostics": { "enabled": false } }"#;
/// let config: QuillConfig = serde_json::from_str(json).unwrap();
/// assert!(!config.diagnostics.enabled);
/// assert_eq!(config.completion.trigger_characters, vec!["."]);
/// ```
#[derive(Debug, Deserialize, Default)]
pub struct QuillConfig {
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
}

/// Configuration for the pull-diagnostics feature.
#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosticsConfig {
    /// Whether diagnostic requests return engine results at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Configuration for completion requests.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionConfig {
    /// Characters the client should treat as completion triggers.
    #[serde(default = "default_trigger_characters")]
    pub trigger_characters: Vec<String>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            trigger_characters: default_trigger_characters(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_trigger_characters() -> Vec<String> {
    vec![".".into()]
}
