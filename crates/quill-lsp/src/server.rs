use std::path::Path;
use std::sync::Arc;

use quill_analysis::engine::AnalysisEngine;
use quill_analysis::{AnalysisService, SOURCE_EXTENSION, ScriptHost, ScriptPath, Workspace};
use tokio::sync::RwLock;
use tower_lsp_server::ls_types::{
    CompletionOptions, CompletionParams, CompletionResponse, DiagnosticOptions,
    DiagnosticServerCapabilities, DidChangeTextDocumentParams, DidCloseTextDocumentParams,
    DidOpenTextDocumentParams, DocumentDiagnosticParams, DocumentDiagnosticReport,
    DocumentDiagnosticReportResult, DocumentHighlight, DocumentHighlightParams,
    FullDocumentDiagnosticReport, GotoDefinitionParams, GotoDefinitionResponse, Hover,
    HoverParams, HoverProviderCapability, InitializeParams, InitializeResult, InitializedParams,
    Location, MessageType, OneOf, PositionEncodingKind, PrepareRenameResponse,
    ReferenceParams, RelatedFullDocumentDiagnosticReport, RenameOptions, RenameParams,
    ServerCapabilities, ServerInfo, TextDocumentPositionParams, TextDocumentSyncCapability,
    TextDocumentSyncKind, Uri, WorkDoneProgressOptions, WorkspaceEdit,
};
use tower_lsp_server::{Client, LanguageServer, jsonrpc::Result};

use crate::config::QuillConfig;
use crate::document::WorkspaceOverlay;
use crate::handlers::{
    completion, definition, diagnostics, highlight, hover, references, rename,
};

/// The protocol-facing server.
///
/// Owns one analysis service (engine bound to host) over an open-document
/// overlay of the embedding application's workspace. Requests are stateless:
/// each handler re-reads whatever it needs through the host, and the only
/// mutation points are the lifecycle notifications below.
pub struct Backend<W> {
    pub(crate) client: Client,
    service: Arc<AnalysisService<WorkspaceOverlay<W>>>,
    overlay: Arc<WorkspaceOverlay<W>>,
    config: Arc<RwLock<QuillConfig>>,
}

impl<W: Workspace + 'static> Backend<W> {
    /// Builds a backend over `files`, constructing the engine against the
    /// freshly bound script host.
    ///
    /// The factory receives the host so the engine can hold its own
    /// reference for snapshot, version, and import-resolution callbacks.
    pub fn new<F>(client: Client, files: Arc<W>, make_engine: F) -> Self
    where
        F: FnOnce(Arc<ScriptHost<WorkspaceOverlay<W>>>) -> Arc<dyn AnalysisEngine>,
    {
        let overlay = Arc::new(WorkspaceOverlay::new(files));
        let host = Arc::new(ScriptHost::new(Arc::clone(&overlay)));
        let engine = make_engine(Arc::clone(&host));

        Self {
            client,
            service: Arc::new(AnalysisService::new(engine, host)),
            overlay,
            config: Arc::new(RwLock::new(QuillConfig::default())),
        }
    }

    /// Get a reference to the LSP client (primarily for testing/benchmarking).
    #[doc(hidden)]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The analysis service backing this server.
    pub fn service(&self) -> &Arc<AnalysisService<WorkspaceOverlay<W>>> {
        &self.service
    }

    /// Maps a protocol URI into the engine's address space, admitting only
    /// Quill source documents.
    fn admit(&self, uri: &Uri) -> Option<ScriptPath> {
        let path = self.service.bridge().engine_path(uri)?;
        let is_script = Path::new(path.as_str())
            .extension()
            .is_some_and(|extension| extension == SOURCE_EXTENSION);
        if is_script {
            Some(path)
        } else {
            tracing::debug!("unsupported document type: {:?}", uri);
            None
        }
    }

    fn server_capabilities(config: &QuillConfig) -> ServerCapabilities {
        ServerCapabilities {
            // Offsets are Unicode scalar values on both sides of the bridge.
            position_encoding: Some(PositionEncodingKind::UTF32),
            text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
            completion_provider: Some(CompletionOptions {
                trigger_characters: Some(config.completion.trigger_characters.clone()),
                resolve_provider: Some(false),
                ..Default::default()
            }),
            hover_provider: Some(HoverProviderCapability::Simple(true)),
            definition_provider: Some(OneOf::Left(true)),
            references_provider: Some(OneOf::Left(true)),
            document_highlight_provider: Some(OneOf::Left(true)),
            rename_provider: Some(OneOf::Right(RenameOptions {
                prepare_provider: Some(true),
                work_done_progress_options: WorkDoneProgressOptions::default(),
            })),
            diagnostic_provider: Some(DiagnosticServerCapabilities::Options(DiagnosticOptions {
                identifier: Some("quill".into()),
                inter_file_dependencies: true,
                workspace_diagnostics: false,
                ..Default::default()
            })),
            ..Default::default()
        }
    }
}

impl<W: Workspace + 'static> LanguageServer for Backend<W> {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        tracing::info!("initializing quill language server");

        if let Some(init_options) = params.initialization_options
            && let Ok(config) = serde_json::from_value::<QuillConfig>(init_options)
        {
            tracing::debug!("loaded configuration: {:?}", config);
            *self.config.write().await = config;
        }

        let capabilities = Self::server_capabilities(&*self.config.read().await);

        Ok(InitializeResult {
            capabilities,
            server_info: Some(ServerInfo {
                name: "quill-lsp".into(),
                version: Some(env!("CARGO_PKG_VERSION").into()),
            }),
            offset_encoding: None,
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        tracing::info!("quill language server initialized");
        self.client
            .log_message(MessageType::INFO, "quill-lsp ready")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        tracing::info!("shutting down quill language server");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        tracing::info!("document opened: {:?}", uri);

        let Some(path) = self.admit(&uri) else { return };
        self.overlay.set(path.clone(), params.text_document.text);
        self.service.host().open_document(path);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;

        // Full sync: the last change carries the complete document.
        if let Some(change) = params.content_changes.into_iter().next_back() {
            let Some(path) = self.admit(&uri) else { return };
            self.overlay.set(path.clone(), change.text);
            self.service.host().notify_changed(&path);
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        tracing::info!("document closed: {:?}", uri);

        let Some(path) = self.admit(&uri) else { return };
        self.overlay.clear(&path);
        self.service.host().close_document(&path);
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let items = completion::handle_completion(&self.service, params).await;
        Ok(Some(CompletionResponse::Array(items)))
    }

    async fn diagnostic(
        &self,
        params: DocumentDiagnosticParams,
    ) -> Result<DocumentDiagnosticReportResult> {
        let uri = params.text_document.uri;

        // Clone config before the handler call to release the lock early
        let diagnostics_config = { self.config.read().await.diagnostics.clone() };

        let items = diagnostics::handle_diagnostics(&self.service, &uri, &diagnostics_config).await;

        Ok(DocumentDiagnosticReportResult::Report(
            DocumentDiagnosticReport::Full(RelatedFullDocumentDiagnosticReport {
                related_documents: None,
                full_document_diagnostic_report: FullDocumentDiagnosticReport {
                    result_id: None,
                    items,
                },
            }),
        ))
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        Ok(definition::handle_definition(&self.service, params).await)
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        Ok(hover::handle_hover(&self.service, params).await)
    }

    async fn references(&self, params: ReferenceParams) -> Result<Option<Vec<Location>>> {
        Ok(references::handle_references(&self.service, params).await)
    }

    async fn document_highlight(
        &self,
        params: DocumentHighlightParams,
    ) -> Result<Option<Vec<DocumentHighlight>>> {
        Ok(highlight::handle_document_highlight(&self.service, params).await)
    }

    async fn prepare_rename(
        &self,
        params: TextDocumentPositionParams,
    ) -> Result<Option<PrepareRenameResponse>> {
        Ok(rename::handle_prepare_rename(&self.service, params).await)
    }

    async fn rename(&self, params: RenameParams) -> Result<Option<WorkspaceEdit>> {
        Ok(rename::handle_rename(&self.service, params).await)
    }
}
