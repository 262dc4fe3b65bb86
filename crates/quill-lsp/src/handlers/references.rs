//! Find-references handler.

use std::collections::HashMap;

use quill_analysis::{AnalysisService, ScriptPath, SourceText, Workspace};
use tower_lsp_server::ls_types::{Location, ReferenceParams};

/// Handles find-references requests.
///
/// Returns `None` only when the engine reports no reference set at all.
/// Otherwise results are grouped per document so each document's text is
/// read once; documents that fail to resolve to readable text are skipped
/// along with every location inside them.
pub async fn handle_references<W: Workspace>(
    service: &AnalysisService<W>,
    params: ReferenceParams,
) -> Option<Vec<Location>> {
    let uri = &params.text_document_position.text_document.uri;
    let position = params.text_document_position.position;

    tracing::info!("references request: uri={:?}, position={:?}", uri, position);

    let path = service.bridge().engine_path(uri)?;
    let text = service.host().source_text(&path).ok()?;
    let offset = text.offset_at(position)?;

    let references = service.references_at(&path, offset)?;

    let mut texts: HashMap<ScriptPath, Option<SourceText>> = HashMap::new();
    let mut locations = Vec::new();
    for reference in references {
        let entry = texts
            .entry(reference.path.clone())
            .or_insert_with(|| service.host().source_text(&reference.path).ok());
        let Some(reference_text) = entry.as_ref() else {
            tracing::debug!("references: skipping unreadable {}", reference.path);
            continue;
        };
        let Some(reference_uri) = service.bridge().protocol_uri(&reference.path) else {
            continue;
        };
        locations.push(Location {
            uri: reference_uri,
            range: reference_text.range_of(reference.span),
        });
    }

    tracing::info!("references: returning {} locations", locations.len());
    Some(locations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_helpers::{StubEngine, files_with, service_over, uri};
    use quill_analysis::engine::{DocumentSpan, Span};
    use tower_lsp_server::ls_types::{
        Position, Range, ReferenceContext, TextDocumentIdentifier, TextDocumentPositionParams,
    };

    fn reference_params(path: &str, position: Position) -> ReferenceParams {
        ReferenceParams {
            text_document_position: TextDocumentPositionParams {
                text_document: TextDocumentIdentifier { uri: uri(path) },
                position,
            },
            work_done_progress_params: Default::default(),
            partial_result_params: Default::default(),
            context: ReferenceContext {
                include_declaration: true,
            },
        }
    }

    fn site(path: &str, span: Span) -> DocumentSpan {
        DocumentSpan {
            path: ScriptPath::new(path),
            span,
        }
    }

    #[tokio::test]
    async fn test_references_engine_has_no_set() {
        let service = service_over(
            files_with(&[("/proj/main.quill", "const x = 1")]),
            StubEngine::new(),
        );
        let result =
            handle_references(&service, reference_params("/proj/main.quill", Position::new(0, 6)))
                .await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_references_across_documents() {
        let engine = StubEngine::new().with_references(
            "/proj/main.quill",
            6,
            vec![
                site("/proj/main.quill", Span::new(6, 1)),
                site("/proj/main.quill", Span::new(13, 1)),
                site("/proj/other.quill", Span::new(0, 1)),
            ],
        );
        let service = service_over(
            files_with(&[
                ("/proj/main.quill", "const x = 1;\nx + 1"),
                ("/proj/other.quill", "x * 2"),
            ]),
            engine,
        );

        let locations =
            handle_references(&service, reference_params("/proj/main.quill", Position::new(0, 6)))
                .await
                .unwrap();

        assert_eq!(locations.len(), 3);
        assert_eq!(locations[0].uri, uri("/proj/main.quill"));
        assert_eq!(
            locations[1].range,
            Range::new(Position::new(1, 0), Position::new(1, 1))
        );
        assert_eq!(locations[2].uri, uri("/proj/other.quill"));
        assert_eq!(
            locations[2].range,
            Range::new(Position::new(0, 0), Position::new(0, 1))
        );
    }

    #[tokio::test]
    async fn test_references_skip_unreadable_documents() {
        let engine = StubEngine::new().with_references(
            "/proj/main.quill",
            0,
            vec![
                site("/proj/gone.quill", Span::new(0, 1)),
                site("/proj/main.quill", Span::new(0, 1)),
                site("/proj/gone.quill", Span::new(2, 1)),
            ],
        );
        let service = service_over(files_with(&[("/proj/main.quill", "x")]), engine);

        let locations =
            handle_references(&service, reference_params("/proj/main.quill", Position::new(0, 0)))
                .await
                .unwrap();

        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].uri, uri("/proj/main.quill"));
    }

    #[tokio::test]
    async fn test_references_empty_set_is_not_none() {
        let engine = StubEngine::new().with_references("/proj/main.quill", 0, vec![]);
        let service = service_over(files_with(&[("/proj/main.quill", "x")]), engine);

        let locations =
            handle_references(&service, reference_params("/proj/main.quill", Position::new(0, 0)))
                .await;
        assert_eq!(locations, Some(vec![]));
    }
}
