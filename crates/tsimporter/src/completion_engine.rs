//
// completion_engine.rs
//
// Completion query engine: decides what kind of suggestions a line gets,
// remembers the one suggestion that may still be accepted, and turns a later
// document change into a deferred import request.
//

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use tower_lsp::lsp_types::CompletionItem;

use crate::completion_items::{import_target, InsertMode, ItemBuilder, ModuleStyle, MARKER};
use crate::import_cache::{normalize_path, ImportCache, SymbolDescriptor};

struct EnginePatterns {
    /// `//`, `/*` or a trailing member access such as `foo.`
    no_inline: Regex,
    /// Same, but any `*` counts: block comment bodies and closers
    no_accept: Regex,
    /// An identifier directly followed by a marker character
    accepted: Regex,
    /// Anything identifier-shaped at all
    word: Regex,
}

fn patterns() -> &'static EnginePatterns {
    static PATTERNS: OnceLock<EnginePatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| EnginePatterns {
        no_inline: Regex::new(r"//|/\*|\w\.$").unwrap(),
        no_accept: Regex::new(r"//|\*|\w\.$").unwrap(),
        accepted: Regex::new(r"(\w+)\x{200B}").unwrap(),
        word: Regex::new(r"\w+").unwrap(),
    })
}

/// What the line under the cursor asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineContext {
    /// The line mentions `import`: offer full import clauses
    Import,
    /// A bare identifier is being typed: offer marker-tagged names
    Inline,
    /// Comments and member accesses get nothing
    Suppressed,
}

pub fn classify_line(line: &str) -> LineContext {
    if line.contains("import") {
        LineContext::Import
    } else if !patterns().no_inline.is_match(line) {
        LineContext::Inline
    } else {
        LineContext::Suppressed
    }
}

/// The line a completion list was last produced for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedLine {
    pub path: String,
    pub line: u32,
    /// Line text at the time of the completion request
    pub text: String,
}

/// At most one suggestion awaits acceptance across the whole server.
/// A new completion response overwrites it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PendingTarget {
    #[default]
    Idle,
    AwaitingImportPick(TrackedLine),
    AwaitingInlinePick(TrackedLine),
}

impl PendingTarget {
    pub fn tracked(&self) -> Option<&TrackedLine> {
        match self {
            PendingTarget::Idle => None,
            PendingTarget::AwaitingImportPick(t) | PendingTarget::AwaitingInlinePick(t) => Some(t),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, PendingTarget::Idle)
    }
}

/// Requests the engine wants delivered to the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorRequest {
    /// Insert the import for `target` and strip the marker on `line`
    Save {
        path: String,
        target: SymbolDescriptor,
        line: u32,
    },
    /// Strip a marker left behind (typically by an undo) on `line`
    UndoSave { path: String, line: u32 },
}

#[derive(Debug, Default)]
pub struct CompletionEngine {
    pending: PendingTarget,
}

impl CompletionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &PendingTarget {
        &self.pending
    }

    /// Completion items for `line_text` at `line` of `caller_path`.
    ///
    /// Reads the cache only. Import and inline responses become the pending
    /// target; a suppressed line clears it.
    pub fn complete(
        &mut self,
        cache: &ImportCache,
        caller_path: &str,
        line_text: &str,
        line: u32,
        show_namespace: bool,
    ) -> Vec<CompletionItem> {
        let caller_path = normalize_path(caller_path);
        let context = classify_line(line_text);
        let mode = match context {
            LineContext::Import => InsertMode::Statement,
            LineContext::Inline => InsertMode::Inline,
            LineContext::Suppressed => {
                log::trace!("No import completions for line {}: comment or member access", line);
                self.pending = PendingTarget::Idle;
                return Vec::new();
            }
        };

        let style = if cache.is_common_js(&caller_path) {
            ModuleStyle::CommonJs
        } else {
            ModuleStyle::Namespace
        };
        let builder = ItemBuilder::new(&caller_path, show_namespace);

        let mut items = Vec::new();
        let mut seen_labels = HashSet::new();
        for symbol in cache.visible_symbols(&caller_path).iter() {
            // Never suggest importing the file into itself
            if caller_path.contains(&symbol.path) {
                continue;
            }
            let item = builder.build(symbol, style, mode);
            if seen_labels.insert(item.label.clone()) {
                items.push(item);
            }
        }

        let tracked = TrackedLine {
            path: caller_path,
            line,
            text: line_text.to_string(),
        };
        self.pending = match context {
            LineContext::Import => PendingTarget::AwaitingImportPick(tracked),
            _ => PendingTarget::AwaitingInlinePick(tracked),
        };

        log::trace!(
            "Returning {} import completions ({:?}, {:?})",
            items.len(),
            style,
            mode
        );
        items
    }

    /// React to the new contents of `path`, given as lines without their
    /// line breaks (split the way the document store splits them).
    ///
    /// With a pending target in this file, an identifier typed right before
    /// a marker on the tracked line is resolved and turned into a save
    /// request. Without one, every line still carrying a marker asks the
    /// editor to strip it.
    pub fn on_document_change<S: AsRef<str>>(
        &mut self,
        cache: &ImportCache,
        path: &str,
        lines: &[S],
    ) -> Vec<EditorRequest> {
        let path = normalize_path(path);

        let Some(tracked) = self.pending.tracked().filter(|t| t.path == path).cloned() else {
            return undo_requests(&path, lines);
        };

        let Some(current) = lines.get(tracked.line as usize).map(AsRef::as_ref) else {
            return Vec::new();
        };
        if current == tracked.text || patterns().no_accept.is_match(current) {
            return Vec::new();
        }

        for caps in patterns().accepted.captures_iter(current) {
            let name = &caps[1];
            if let Some(symbol) = cache.find_visible(name, &path) {
                log::trace!("Suggestion '{}' accepted on line {}", name, tracked.line);
                self.pending = PendingTarget::Idle;
                return vec![EditorRequest::Save {
                    target: import_target(&symbol, &path),
                    path,
                    line: tracked.line,
                }];
            }
        }

        if !patterns().word.is_match(current) {
            log::trace!("Pending suggestion on line {} abandoned", tracked.line);
            self.pending = PendingTarget::Idle;
        }

        Vec::new()
    }
}

fn undo_requests<S: AsRef<str>>(path: &str, lines: &[S]) -> Vec<EditorRequest> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.as_ref().contains(MARKER))
        .map(|(i, _)| EditorRequest::UndoSave {
            path: path.to_string(),
            line: i as u32,
        })
        .collect()
}
