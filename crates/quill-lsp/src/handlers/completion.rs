//! Completion handler.

use quill_analysis::engine::{CompletionEntry, CompletionEntryKind};
use quill_analysis::{AnalysisService, SourceText, Workspace};
use tower_lsp_server::ls_types::{
    CompletionItem, CompletionItemKind, CompletionParams, CompletionTextEdit, TextEdit,
};

/// Handles completion requests.
///
/// Entries carrying a replacement span get a text edit computed against the
/// document's current text. An empty list is returned when the engine has no
/// completions or the document cannot be used at all.
pub async fn handle_completion<W: Workspace>(
    service: &AnalysisService<W>,
    params: CompletionParams,
) -> Vec<CompletionItem> {
    let uri = &params.text_document_position.text_document.uri;
    let position = params.text_document_position.position;

    tracing::info!(
        "completion request: uri={:?}, line={}, character={}",
        uri,
        position.line,
        position.character
    );

    let Some(path) = service.bridge().engine_path(uri) else {
        tracing::warn!("completion: unaddressable uri {:?}", uri);
        return Vec::new();
    };
    let Ok(text) = service.host().source_text(&path) else {
        tracing::warn!("completion: no source for {path}");
        return Vec::new();
    };
    let Some(offset) = text.offset_at(position) else {
        return Vec::new();
    };

    let entries = service.completions_at(&path, offset).unwrap_or_default();
    tracing::info!("completion: returning {} items", entries.len());

    entries
        .into_iter()
        .map(|entry| to_completion_item(entry, &text))
        .collect()
}

fn to_completion_item(entry: CompletionEntry, text: &SourceText) -> CompletionItem {
    let text_edit = entry.replacement.map(|span| {
        CompletionTextEdit::Edit(TextEdit {
            range: text.range_of(span),
            new_text: entry.name.clone(),
        })
    });

    CompletionItem {
        label: entry.name,
        kind: Some(item_kind(entry.kind)),
        detail: entry.detail,
        text_edit,
        ..Default::default()
    }
}

fn item_kind(kind: CompletionEntryKind) -> CompletionItemKind {
    match kind {
        CompletionEntryKind::Function => CompletionItemKind::FUNCTION,
        CompletionEntryKind::Method => CompletionItemKind::METHOD,
        CompletionEntryKind::Property => CompletionItemKind::PROPERTY,
        CompletionEntryKind::Variable => CompletionItemKind::VARIABLE,
        CompletionEntryKind::Constant => CompletionItemKind::CONSTANT,
        CompletionEntryKind::Class => CompletionItemKind::CLASS,
        CompletionEntryKind::Module => CompletionItemKind::MODULE,
        CompletionEntryKind::Keyword => CompletionItemKind::KEYWORD,
        _ => CompletionItemKind::TEXT,
    }
}
