//! Go-to-definition handler.

use quill_analysis::{AnalysisService, Workspace};
use tower_lsp_server::ls_types::{GotoDefinitionParams, GotoDefinitionResponse, Location};

/// Handles go-to-definition requests.
///
/// The engine may return several definition sites; only the first is
/// surfaced. The result range is computed against the defining document's
/// own text, so `None` comes back when the request document has no source,
/// the engine finds nothing, or the defining document is unreadable.
pub async fn handle_definition<W: Workspace>(
    service: &AnalysisService<W>,
    params: GotoDefinitionParams,
) -> Option<GotoDefinitionResponse> {
    let uri = &params.text_document_position_params.text_document.uri;
    let position = params.text_document_position_params.position;

    tracing::info!("definition request: uri={:?}, position={:?}", uri, position);

    let path = service.bridge().engine_path(uri)?;
    let text = service.host().source_text(&path).ok()?;
    let offset = text.offset_at(position)?;

    let definitions = service.definitions_at(&path, offset)?;
    let definition = definitions.into_iter().next()?;

    let target_text = if definition.path == path {
        text
    } else {
        service.host().source_text(&definition.path).ok()?
    };
    let target_uri = service.bridge().protocol_uri(&definition.path)?;

    Some(GotoDefinitionResponse::Scalar(Location {
        uri: target_uri,
        range: target_text.range_of(definition.span),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_helpers::{StubEngine, files_with, service_over, uri};
    use quill_analysis::ScriptPath;
    use quill_analysis::engine::{DocumentSpan, Span};
    use tower_lsp_server::ls_types::{
        Position, Range, TextDocumentIdentifier, TextDocumentPositionParams,
    };

    fn definition_params(path: &str, position: Position) -> GotoDefinitionParams {
        GotoDefinitionParams {
            text_document_position_params: TextDocumentPositionParams {
                text_document: TextDocumentIdentifier { uri: uri(path) },
                position,
            },
            work_done_progress_params: Default::default(),
            partial_result_params: Default::default(),
        }
    }

    fn site(path: &str, span: Span) -> DocumentSpan {
        DocumentSpan {
            path: ScriptPath::new(path),
            span,
        }
    }

    #[tokio::test]
    async fn test_definition_no_source() {
        let service = service_over(files_with(&[]), StubEngine::new());
        let result =
            handle_definition(&service, definition_params("/proj/main.quill", Position::new(0, 0)))
                .await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_definition_engine_finds_nothing() {
        let service = service_over(
            files_with(&[("/proj/main.quill", "const x = 1")]),
            StubEngine::new(),
        );
        let result =
            handle_definition(&service, definition_params("/proj/main.quill", Position::new(0, 6)))
                .await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_definition_uses_first_entry_only() {
        let engine = StubEngine::new().with_definitions(
            "/proj/main.quill",
            13,
            vec![
                site("/proj/util.quill", Span::new(13, 6)),
                site("/proj/other.quill", Span::new(0, 1)),
            ],
        );
        let service = service_over(
            files_with(&[
                ("/proj/main.quill", "import \"./util\"\nhelper()"),
                ("/proj/util.quill", "export const helper = () => 1"),
            ]),
            engine,
        );

        let result =
            handle_definition(&service, definition_params("/proj/main.quill", Position::new(0, 13)))
                .await;

        match result.unwrap() {
            GotoDefinitionResponse::Scalar(location) => {
                assert_eq!(location.uri, uri("/proj/util.quill"));
                assert_eq!(
                    location.range,
                    Range::new(Position::new(0, 13), Position::new(0, 19))
                );
            }
            other => panic!("expected scalar response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_definition_target_unreadable() {
        let engine = StubEngine::new().with_definitions(
            "/proj/main.quill",
            0,
            vec![site("/proj/gone.quill", Span::new(0, 1))],
        );
        let service = service_over(files_with(&[("/proj/main.quill", "x")]), engine);

        let result =
            handle_definition(&service, definition_params("/proj/main.quill", Position::new(0, 0)))
                .await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_definition_in_same_document() {
        let engine = StubEngine::new().with_definitions(
            "/proj/main.quill",
            14,
            vec![site("/proj/main.quill", Span::new(6, 1))],
        );
        let service = service_over(
            files_with(&[("/proj/main.quill", "const x = 1;\nx + 1")]),
            engine,
        );

        let result =
            handle_definition(&service, definition_params("/proj/main.quill", Position::new(1, 1)))
                .await;

        match result.unwrap() {
            GotoDefinitionResponse::Scalar(location) => {
                assert_eq!(location.uri, uri("/proj/main.quill"));
                assert_eq!(
                    location.range,
                    Range::new(Position::new(0, 6), Position::new(0, 7))
                );
            }
            other => panic!("expected scalar response, got {other:?}"),
        }
    }
}
