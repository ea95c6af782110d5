//
// state.rs
//
// Server state: open documents, the import cache and the completion engine
//

use std::collections::HashMap;
use std::path::PathBuf;

use ropey::Rope;
use tower_lsp::lsp_types::{Position, TextDocumentContentChangeEvent, Url};

use crate::completion_engine::CompletionEngine;
use crate::config::ImporterConfig;
use crate::import_cache::{normalize_path, ImportCache};

/// An open document
pub struct Document {
    pub contents: Rope,
    pub version: Option<i32>,
    pub revision: u64,
}

impl Document {
    pub fn new(text: &str, version: Option<i32>) -> Self {
        Self {
            contents: Rope::from_str(text),
            version,
            revision: 0,
        }
    }

    pub fn apply_change(&mut self, change: TextDocumentContentChangeEvent) {
        if let Some(range) = change.range {
            let start_idx = self.position_to_char(range.start);
            let end_idx = self.position_to_char(range.end).max(start_idx);

            self.contents.remove(start_idx..end_idx);
            self.contents.insert(start_idx, &change.text);
        } else {
            // Full document sync
            self.contents = Rope::from_str(&change.text);
        }

        self.revision += 1;
    }

    pub fn text(&self) -> String {
        self.contents.to_string()
    }

    /// Text of line `line` without its line break
    pub fn line(&self, line: u32) -> Option<String> {
        let line = line as usize;
        if line >= self.contents.len_lines() {
            return None;
        }
        Some(without_line_break(self.contents.line(line).to_string()))
    }

    /// Every line without its line break, split the same way as `line`
    pub fn lines(&self) -> Vec<String> {
        self.contents
            .lines()
            .map(|line| without_line_break(line.to_string()))
            .collect()
    }

    /// Char index of an LSP position, clamped to the document. A column past
    /// the end of its line lands before the line break.
    fn position_to_char(&self, position: Position) -> usize {
        let line = position.line as usize;
        if line >= self.contents.len_lines() {
            return self.contents.len_chars();
        }
        let line_text = without_line_break(self.contents.line(line).to_string());
        let char_offset = utf16_offset_to_char_offset(&line_text, position.character as usize);
        self.contents.line_to_char(line) + char_offset
    }
}

/// The rope breaks lines on `\n`, `\r\n` and a lone `\r`, so a line holds at
/// most one trailing break
fn without_line_break(mut line: String) -> String {
    let content_len = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(content_len);
    line
}

fn utf16_offset_to_char_offset(line_text: &str, utf16_offset: usize) -> usize {
    let mut utf16_count = 0;
    let mut char_count = 0;

    for ch in line_text.chars() {
        if utf16_count >= utf16_offset {
            return char_count;
        }
        utf16_count += ch.len_utf16();
        char_count += 1;
    }
    char_count
}

/// Filesystem path of a document, with forward slashes.
///
/// Symbols are keyed by the paths the watcher reports, so documents that do
/// not live on disk have none.
pub fn document_path(uri: &Url) -> Option<String> {
    let path = uri.to_file_path().ok()?;
    Some(normalize_path(&path.to_string_lossy()))
}

/// Global LSP state
pub struct WorldState {
    pub workspace_folders: Vec<Url>,
    pub documents: HashMap<Url, Document>,
    pub import_cache: ImportCache,
    pub engine: CompletionEngine,
    pub config: ImporterConfig,
}

impl WorldState {
    pub fn new(config: ImporterConfig) -> Self {
        Self {
            workspace_folders: Vec::new(),
            documents: HashMap::new(),
            import_cache: ImportCache::new(),
            engine: CompletionEngine::new(),
            config,
        }
    }

    pub fn open_document(&mut self, uri: Url, text: &str, version: Option<i32>) {
        self.documents.insert(uri, Document::new(text, version));
    }

    pub fn close_document(&mut self, uri: &Url) {
        self.documents.remove(uri);
    }

    pub fn apply_change(&mut self, uri: &Url, change: TextDocumentContentChangeEvent) {
        if let Some(doc) = self.documents.get_mut(uri) {
            doc.apply_change(change);
        }
    }

    pub fn get_document(&self, uri: &Url) -> Option<&Document> {
        self.documents.get(uri)
    }

    /// Workspace folders that live on disk
    pub fn workspace_roots(&self) -> Vec<PathBuf> {
        self.workspace_folders
            .iter()
            .filter_map(|folder| folder.to_file_path().ok())
            .collect()
    }
}
