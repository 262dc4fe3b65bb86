//! Document-highlight handler.

use quill_analysis::{AnalysisService, Workspace};
use tower_lsp_server::ls_types::{DocumentHighlight, DocumentHighlightParams};

/// Handles document-highlight requests.
///
/// The engine searches the tracked set plus the current document (the
/// service assembles that scope) and may return spans grouped by document;
/// all spans are flattened into one list, each converted against its own
/// document's text. Groups whose document cannot be read are skipped.
pub async fn handle_document_highlight<W: Workspace>(
    service: &AnalysisService<W>,
    params: DocumentHighlightParams,
) -> Option<Vec<DocumentHighlight>> {
    let uri = &params.text_document_position_params.text_document.uri;
    let position = params.text_document_position_params.position;

    tracing::info!("highlight request: uri={:?}, position={:?}", uri, position);

    let path = service.bridge().engine_path(uri)?;
    let text = service.host().source_text(&path).ok()?;
    let offset = text.offset_at(position)?;

    let groups = service.highlights_at(&path, offset)?;

    let mut highlights = Vec::new();
    for group in groups {
        let group_text = if group.path == path {
            text.clone()
        } else {
            match service.host().source_text(&group.path) {
                Ok(group_text) => group_text,
                Err(_) => {
                    tracing::debug!("highlight: skipping unreadable {}", group.path);
                    continue;
                }
            }
        };
        for span in group.spans {
            highlights.push(DocumentHighlight {
                range: group_text.range_of(span),
                kind: None,
            });
        }
    }

    Some(highlights)
}
