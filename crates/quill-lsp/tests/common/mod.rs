//! Common test utilities for integration tests.
//!
//! Builds a [`Backend`] over an in-memory workspace and a scripted engine,
//! the same substitution the adapter is designed around: the engine is an
//! external collaborator, so integration tests pin its answers and assert
//! on the protocol surface only.

use std::collections::HashMap;
use std::sync::Arc;

use quill_analysis::engine::{
    AnalysisEngine, CompletionEntry, DocumentSpan, EngineDiagnostic, HighlightGroup, QuickInfo,
    RenameEligibility, Span,
};
use quill_analysis::{MemoryWorkspace, ScriptPath};
use quill_lsp::Backend;
use tower_lsp_server::{ClientSocket, LspService};

/// Installs a `RUST_LOG`-driven subscriber, once per test process.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

/// Scripted analysis engine keyed by `(document, offset)`.
#[derive(Default)]
pub struct ScriptedEngine {
    pub completions: HashMap<(ScriptPath, usize), Vec<CompletionEntry>>,
    pub diagnostics: HashMap<ScriptPath, Vec<EngineDiagnostic>>,
    pub definitions: HashMap<(ScriptPath, usize), Vec<DocumentSpan>>,
    pub quick_info: HashMap<(ScriptPath, usize), QuickInfo>,
    pub references: HashMap<(ScriptPath, usize), Vec<DocumentSpan>>,
    pub highlights: HashMap<(ScriptPath, usize), Vec<HighlightGroup>>,
    pub renameable: HashMap<(ScriptPath, usize), (String, Span)>,
    pub rename_locations: HashMap<(ScriptPath, usize), Vec<DocumentSpan>>,
}

impl AnalysisEngine for ScriptedEngine {
    fn completions_at(&self, document: &ScriptPath, offset: usize) -> Option<Vec<CompletionEntry>> {
        self.completions.get(&(document.clone(), offset)).cloned()
    }

    fn semantic_diagnostics(&self, document: &ScriptPath) -> Vec<EngineDiagnostic> {
        self.diagnostics.get(document).cloned().unwrap_or_default()
    }

    fn definitions_at(&self, document: &ScriptPath, offset: usize) -> Option<Vec<DocumentSpan>> {
        self.definitions.get(&(document.clone(), offset)).cloned()
    }

    fn quick_info_at(&self, document: &ScriptPath, offset: usize) -> Option<QuickInfo> {
        self.quick_info.get(&(document.clone(), offset)).cloned()
    }

    fn references_at(&self, document: &ScriptPath, offset: usize) -> Option<Vec<DocumentSpan>> {
        self.references.get(&(document.clone(), offset)).cloned()
    }

    fn highlights_at(
        &self,
        document: &ScriptPath,
        offset: usize,
        _scope: &[ScriptPath],
    ) -> Option<Vec<HighlightGroup>> {
        self.highlights.get(&(document.clone(), offset)).cloned()
    }

    fn rename_info_at(&self, document: &ScriptPath, offset: usize) -> RenameEligibility {
        match self.renameable.get(&(document.clone(), offset)) {
            Some((placeholder, span)) => RenameEligibility::Renameable {
                placeholder: placeholder.clone(),
                span: *span,
            },
            None => RenameEligibility::NotRenameable {
                reason: "not a renameable identifier".into(),
            },
        }
    }

    fn rename_locations_at(&self, document: &ScriptPath, offset: usize) -> Option<Vec<DocumentSpan>> {
        self.rename_locations.get(&(document.clone(), offset)).cloned()
    }
}

/// Builds a server over the given documents and scripted engine.
pub fn server_with(
    docs: &[(&str, &str)],
    engine: ScriptedEngine,
) -> (LspService<Backend<MemoryWorkspace>>, ClientSocket) {
    let files = Arc::new(MemoryWorkspace::new());
    for (path, text) in docs {
        files.insert(ScriptPath::new(*path), *text);
    }

    let engine = Arc::new(engine);
    LspService::build(move |client| {
        Backend::new(client, files, |_host| engine as Arc<dyn AnalysisEngine>)
    })
    .finish()
}

/// Protocol URI for an engine-space path.
pub fn uri(path: &str) -> tower_lsp_server::ls_types::Uri {
    tower_lsp_server::ls_types::Uri::from_file_path(path).unwrap()
}
