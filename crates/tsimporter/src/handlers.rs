//
// handlers.rs
//
// Request and notification handlers that need only the world state
//

use tower_lsp::lsp_types::*;

use crate::completion_engine::EditorRequest;
use crate::completion_items::RESOLVE_SENTINEL;
use crate::state::{document_path, Document, WorldState};

/// `textDocument/completion`
///
/// Takes `&mut` because a response becomes the pending suggestion.
pub fn completion(
    state: &mut WorldState,
    uri: &Url,
    position: Position,
) -> Option<CompletionResponse> {
    let caller_path = document_path(uri)?;
    let line_text = state.get_document(uri)?.line(position.line)?;

    let show_namespace = state.config.show_namespace_on_imports;
    let items = state.engine.complete(
        &state.import_cache,
        &caller_path,
        &line_text,
        position.line,
        show_namespace,
    );

    if items.is_empty() {
        return None;
    }
    Some(CompletionResponse::Array(items))
}

/// `completionItem/resolve`: items built for namespace imports show their
/// label as detail when nothing else was set
pub fn completion_resolve(mut item: CompletionItem) -> CompletionItem {
    let is_sentinel = item
        .data
        .as_ref()
        .and_then(|data| data.as_u64())
        .is_some_and(|data| data == RESOLVE_SENTINEL);
    let has_detail = item.detail.as_deref().is_some_and(|d| !d.is_empty());
    if is_sentinel && !has_detail {
        item.detail = Some(item.label.clone());
    }
    item
}

/// Run the engine over the current lines of `uri` after an edit.
///
/// Lines come from the document store so the tracked line number means
/// the same thing here as it did when the completion was answered.
pub fn document_changed(state: &mut WorldState, uri: &Url) -> Vec<EditorRequest> {
    let Some(path) = document_path(uri) else {
        return Vec::new();
    };
    let Some(lines) = state.get_document(uri).map(Document::lines) else {
        return Vec::new();
    };
    state
        .engine
        .on_document_change(&state.import_cache, &path, &lines)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::ImporterConfig;
    use crate::import_cache::{FileDescriptor, FrameworkDescriptor};

    fn state() -> (WorldState, Url) {
        let mut state = WorldState::new(ImporterConfig::default());
        state
            .import_cache
            .register_framework(&FrameworkDescriptor::new("api", vec!["shared".into()]));
        state
            .import_cache
            .register_framework(&FrameworkDescriptor::new("shared", vec![]));
        state.import_cache.register(&FileDescriptor::new(
            "Shared",
            vec!["foo".into()],
            "/proj/shared/foo.ts",
            false,
        ));
        let uri = Url::parse("file:///proj/api/index.ts").unwrap();
        state.open_document(uri.clone(), "import \nconst x = \n// note", Some(1));
        (state, uri)
    }

    fn items(response: Option<CompletionResponse>) -> Vec<CompletionItem> {
        match response {
            Some(CompletionResponse::Array(items)) => items,
            Some(CompletionResponse::List(list)) => list.items,
            None => Vec::new(),
        }
    }

    #[test]
    fn test_completion_reads_line_from_document() {
        let (mut state, uri) = state();

        let import = items(completion(&mut state, &uri, Position::new(0, 7)));
        assert_eq!(import[0].insert_text.as_deref(), Some("foo = Shared.foo;"));

        let inline = items(completion(&mut state, &uri, Position::new(1, 10)));
        assert_eq!(inline[0].insert_text.as_deref(), Some("foo\u{200B}\u{200B}"));

        assert!(completion(&mut state, &uri, Position::new(2, 0)).is_none());
        assert!(state.engine.pending().is_idle());
    }

    #[test]
    fn test_completion_respects_show_namespace() {
        let (mut state, uri) = state();
        state.config.show_namespace_on_imports = false;
        let import = items(completion(&mut state, &uri, Position::new(0, 7)));
        assert!(import[0].detail.is_none());
    }

    #[test]
    fn test_completion_unknown_document_or_line() {
        let (mut state, uri) = state();
        assert!(completion(&mut state, &uri, Position::new(40, 0)).is_none());
        let other = Url::parse("file:///proj/api/closed.ts").unwrap();
        assert!(completion(&mut state, &other, Position::new(0, 0)).is_none());
    }

    #[test]
    fn test_document_changed_emits_save() {
        let (mut state, uri) = state();
        completion(&mut state, &uri, Position::new(1, 10));
        state.apply_change(
            &uri,
            TextDocumentContentChangeEvent {
                range: Some(Range::new(Position::new(1, 10), Position::new(1, 10))),
                range_length: None,
                text: "foo\u{200B}\u{200B}".into(),
            },
        );
        let requests = document_changed(&mut state, &uri);
        assert!(matches!(
            requests.as_slice(),
            [EditorRequest::Save { line: 1, .. }]
        ));
    }

    #[test]
    fn test_document_changed_after_lone_carriage_return() {
        let (mut state, uri) = state();
        state.open_document(uri.clone(), "let a = 1;\rconst x = \nend", Some(2));
        let inline = items(completion(&mut state, &uri, Position::new(1, 10)));
        assert_eq!(inline[0].insert_text.as_deref(), Some("foo\u{200B}\u{200B}"));

        state.apply_change(
            &uri,
            TextDocumentContentChangeEvent {
                range: Some(Range::new(Position::new(1, 10), Position::new(1, 10))),
                range_length: None,
                text: "foo\u{200B}\u{200B}".into(),
            },
        );
        let requests = document_changed(&mut state, &uri);
        assert!(matches!(
            requests.as_slice(),
            [EditorRequest::Save { line: 1, .. }]
        ));
        assert!(state.engine.pending().is_idle());
    }

    #[test]
    fn test_undo_lines_follow_carriage_returns() {
        let (mut state, uri) = state();
        state.open_document(uri.clone(), "clean\ra\u{200B}\u{200B}\r\nb", Some(2));
        let requests = document_changed(&mut state, &uri);
        assert_eq!(
            requests,
            vec![EditorRequest::UndoSave {
                path: "/proj/api/index.ts".into(),
                line: 1
            }]
        );
    }

    #[test]
    fn test_completion_resolve() {
        let item = CompletionItem {
            label: "foo".into(),
            data: Some(serde_json::json!(365)),
            ..Default::default()
        };
        assert_eq!(completion_resolve(item).detail.as_deref(), Some("foo"));

        let item = CompletionItem {
            label: "foo".into(),
            detail: Some("Shared".into()),
            data: Some(serde_json::json!(365)),
            ..Default::default()
        };
        assert_eq!(completion_resolve(item).detail.as_deref(), Some("Shared"));

        let item = CompletionItem {
            label: "foo".into(),
            ..Default::default()
        };
        assert!(completion_resolve(item).detail.is_none());
    }
}
