//! Rename handlers: eligibility and the edit map.

use std::collections::HashMap;

use quill_analysis::engine::RenameEligibility;
use quill_analysis::{AnalysisService, ScriptPath, SourceText, Workspace};
use tower_lsp_server::ls_types::{
    PrepareRenameResponse, RenameParams, TextDocumentPositionParams, TextEdit, Uri, WorkspaceEdit,
};

/// Handles prepare-rename requests.
///
/// `None` signals "no rename possible here": keywords, literals, and
/// anything else the engine declares ineligible.
pub async fn handle_prepare_rename<W: Workspace>(
    service: &AnalysisService<W>,
    params: TextDocumentPositionParams,
) -> Option<PrepareRenameResponse> {
    let uri = &params.text_document.uri;
    let position = params.position;

    tracing::info!("prepare rename: uri={:?}, position={:?}", uri, position);

    let path = service.bridge().engine_path(uri)?;
    let text = service.host().source_text(&path).ok()?;
    let offset = text.offset_at(position)?;

    match service.rename_info_at(&path, offset) {
        RenameEligibility::Renameable { placeholder, span } => {
            Some(PrepareRenameResponse::RangeWithPlaceholder {
                range: text.range_of(span),
                placeholder,
            })
        }
        RenameEligibility::NotRenameable { reason } => {
            tracing::debug!("rename rejected at {path}:{offset}: {reason}");
            None
        }
    }
}

/// Handles rename requests.
///
/// `None` only when the engine's location query itself fails; a rename that
/// matches nothing still returns a structured edit with an empty change map.
/// Locations in unreadable documents are skipped, each document's text being
/// read once.
pub async fn handle_rename<W: Workspace>(
    service: &AnalysisService<W>,
    params: RenameParams,
) -> Option<WorkspaceEdit> {
    let uri = &params.text_document_position.text_document.uri;
    let position = params.text_document_position.position;
    let new_name = params.new_name;

    tracing::info!(
        "rename request: uri={:?}, position={:?}, new_name={:?}",
        uri,
        position,
        new_name
    );

    let path = service.bridge().engine_path(uri)?;
    let text = service.host().source_text(&path).ok()?;
    let offset = text.offset_at(position)?;

    let locations = service.rename_locations_at(&path, offset)?;

    let mut texts: HashMap<ScriptPath, Option<SourceText>> = HashMap::new();
    let mut changes: HashMap<Uri, Vec<TextEdit>> = HashMap::new();
    for location in locations {
        let entry = texts
            .entry(location.path.clone())
            .or_insert_with(|| service.host().source_text(&location.path).ok());
        let Some(location_text) = entry.as_ref() else {
            tracing::debug!("rename: skipping unreadable {}", location.path);
            continue;
        };
        let Some(location_uri) = service.bridge().protocol_uri(&location.path) else {
            continue;
        };
        changes.entry(location_uri).or_default().push(TextEdit {
            range: location_text.range_of(location.span),
            new_text: new_name.clone(),
        });
    }

    tracing::info!("rename: edits across {} documents", changes.len());
    Some(WorkspaceEdit {
        changes: Some(changes),
        ..Default::default()
    })
}
