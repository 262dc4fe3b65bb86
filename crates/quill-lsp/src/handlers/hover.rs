//! Hover handler.

use quill_analysis::{AnalysisService, Workspace};
use tower_lsp_server::ls_types::{Hover, HoverContents, HoverParams, MarkupContent, MarkupKind};

/// Handles hover requests.
///
/// Renders the engine's quick-info display text as a fenced code block and
/// anchors it to the range of the described token, computed from the
/// document's current text.
pub async fn handle_hover<W: Workspace>(
    service: &AnalysisService<W>,
    params: HoverParams,
) -> Option<Hover> {
    let uri = &params.text_document_position_params.text_document.uri;
    let position = params.text_document_position_params.position;

    tracing::info!("hover request: uri={:?}, position={:?}", uri, position);

    let path = service.bridge().engine_path(uri)?;
    let text = service.host().source_text(&path).ok()?;
    let offset = text.offset_at(position)?;

    let info = service.quick_info_at(&path, offset)?;

    Some(Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: format!("```quill\n{}\n```", info.text),
        }),
        range: Some(text.range_of(info.span)),
    })
}
