//! Diagnostics handler (pull model).

use quill_analysis::engine::Severity;
use quill_analysis::{AnalysisService, Workspace};
use tower_lsp_server::ls_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Uri};

use crate::config::DiagnosticsConfig;

/// Handles a diagnostic request for one document.
///
/// Naming a document here admits it into the tracked set, always, before
/// anything else, even when the returned list ends up empty. Engine records
/// without a position span are dropped; survivors are mapped to ranges with
/// their message chains flattened.
pub async fn handle_diagnostics<W: Workspace>(
    service: &AnalysisService<W>,
    uri: &Uri,
    config: &DiagnosticsConfig,
) -> Vec<Diagnostic> {
    let Some(path) = service.bridge().engine_path(uri) else {
        tracing::warn!("diagnostics: unaddressable uri {:?}", uri);
        return Vec::new();
    };

    if service.host().track(path.clone()) {
        tracing::debug!("diagnostics: now tracking {path}");
    }

    if !config.enabled {
        return Vec::new();
    }

    let Ok(text) = service.host().source_text(&path) else {
        tracing::warn!("diagnostics: no source for {path}");
        return Vec::new();
    };

    let mut items = Vec::new();
    let mut dropped = 0usize;
    for record in service.semantic_diagnostics(&path) {
        let Some(span) = record.span else {
            dropped += 1;
            continue;
        };
        items.push(Diagnostic {
            range: text.range_of(span),
            severity: Some(severity(record.severity)),
            code: record.code.map(NumberOrString::Number),
            source: Some("quill".into()),
            message: record.message.flatten(),
            ..Default::default()
        });
    }

    if dropped > 0 {
        tracing::debug!("diagnostics: dropped {dropped} spanless records for {path}");
    }
    tracing::info!("diagnostics: returning {} items for {path}", items.len());
    items
}

fn severity(severity: Severity) -> DiagnosticSeverity {
    match severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
        Severity::Suggestion => DiagnosticSeverity::HINT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_helpers::{StubEngine, files_with, service_over, uri};
    use quill_analysis::ScriptPath;
    use quill_analysis::engine::{EngineDiagnostic, MessageChain, Span};
    use tower_lsp_server::ls_types::{Position, Range};

    fn record(span: Option<Span>, message: &str) -> EngineDiagnostic {
        EngineDiagnostic {
            span,
            severity: Severity::Error,
            code: Some(2304),
            message: MessageChain::plain(message),
        }
    }

    #[tokio::test]
    async fn test_diagnostics_tracks_even_when_empty() {
        let service = service_over(
            files_with(&[("/proj/main.quill", "const x = 1")]),
            StubEngine::new(),
        );
        let path = ScriptPath::new("/proj/main.quill");
        assert!(!service.host().is_tracked(&path));

        let items = handle_diagnostics(
            &service,
            &uri("/proj/main.quill"),
            &DiagnosticsConfig::default(),
        )
        .await;

        assert!(items.is_empty());
        assert!(service.host().is_tracked(&path));
    }

    #[tokio::test]
    async fn test_diagnostics_tracks_unreadable_document() {
        let service = service_over(files_with(&[]), StubEngine::new());

        let items = handle_diagnostics(
            &service,
            &uri("/proj/ghost.quill"),
            &DiagnosticsConfig::default(),
        )
        .await;

        assert!(items.is_empty());
        assert!(service.host().is_tracked(&ScriptPath::new("/proj/ghost.quill")));
    }

    #[tokio::test]
    async fn test_diagnostics_drops_spanless_records() {
        let engine = StubEngine::new().with_diagnostics(
            "/proj/main.quill",
            vec![
                record(None, "file-level complaint"),
                record(Some(Span::new(6, 1)), "cannot find name 'x'"),
            ],
        );
        let service = service_over(files_with(&[("/proj/main.quill", "const x = 1")]), engine);

        let items = handle_diagnostics(
            &service,
            &uri("/proj/main.quill"),
            &DiagnosticsConfig::default(),
        )
        .await;

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].message, "cannot find name 'x'");
        assert_eq!(
            items[0].range,
            Range::new(Position::new(0, 6), Position::new(0, 7))
        );
        assert_eq!(items[0].severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(items[0].code, Some(NumberOrString::Number(2304)));
        assert_eq!(items[0].source.as_deref(), Some("quill"));
    }

    #[tokio::test]
    async fn test_diagnostics_flattens_message_chains() {
        let chain = MessageChain {
            text: "argument is not assignable".into(),
            details: vec![MessageChain::plain("expected Number, found Text")],
        };
        let engine = StubEngine::new().with_diagnostics(
            "/proj/main.quill",
            vec![EngineDiagnostic {
                span: Some(Span::new(0, 5)),
                severity: Severity::Warning,
                code: None,
                message: chain,
            }],
        );
        let service = service_over(files_with(&[("/proj/main.quill", "oops()")]), engine);

        let items = handle_diagnostics(
            &service,
            &uri("/proj/main.quill"),
            &DiagnosticsConfig::default(),
        )
        .await;

        assert_eq!(
            items[0].message,
            "argument is not assignable\n  expected Number, found Text"
        );
        assert_eq!(items[0].severity, Some(DiagnosticSeverity::WARNING));
        assert_eq!(items[0].code, None);
    }

    #[tokio::test]
    async fn test_diagnostics_disabled_still_tracks() {
        let engine = StubEngine::new().with_diagnostics(
            "/proj/main.quill",
            vec![record(Some(Span::new(0, 1)), "suppressed")],
        );
        let service = service_over(files_with(&[("/proj/main.quill", "x")]), engine);

        let items = handle_diagnostics(
            &service,
            &uri("/proj/main.quill"),
            &DiagnosticsConfig { enabled: false },
        )
        .await;

        assert!(items.is_empty());
        assert!(service.host().is_tracked(&ScriptPath::new("/proj/main.quill")));
    }
}
