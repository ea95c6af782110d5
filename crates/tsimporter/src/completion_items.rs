//
// completion_items.rs
//
// Turns cached symbols into completion items. Two independent choices:
// the module style of the import (namespace alias vs CommonJS/ES clause)
// and whether the import text is inserted now or deferred behind a marker.
//

use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind};

use crate::import_cache::{relative_module_path, SymbolDescriptor};

/// Two zero-width spaces appended to an inline completion. The document
/// watcher finds them later to learn which suggestion was accepted.
pub const MARKER: &str = "\u{200B}\u{200B}";

/// `data` value on items whose detail is filled in by `completionItem/resolve`
pub const RESOLVE_SENTINEL: u64 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStyle {
    /// `import method = Namespace.method;`
    Namespace,
    /// `import { method } from "./path";` or `Namespace = require("./path")`
    CommonJs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertMode {
    /// Insert the import clause at the cursor
    Statement,
    /// Insert the identifier plus `MARKER`; the import is added once accepted
    Inline,
}

/// Builds completion items for one caller file
#[derive(Debug, Clone, Copy)]
pub struct ItemBuilder<'a> {
    pub caller_path: &'a str,
    pub show_namespace: bool,
}

impl<'a> ItemBuilder<'a> {
    pub fn new(caller_path: &'a str, show_namespace: bool) -> Self {
        Self {
            caller_path,
            show_namespace,
        }
    }

    pub fn build(
        &self,
        symbol: &SymbolDescriptor,
        style: ModuleStyle,
        mode: InsertMode,
    ) -> CompletionItem {
        match (style, mode) {
            (ModuleStyle::Namespace, InsertMode::Statement) => self.namespace_item(symbol),
            (ModuleStyle::Namespace, InsertMode::Inline) => self.namespace_inline_item(symbol),
            (ModuleStyle::CommonJs, InsertMode::Statement) => self.common_js_item(symbol),
            (ModuleStyle::CommonJs, InsertMode::Inline) => self.common_js_inline_item(symbol),
        }
    }

    fn detail(&self, symbol: &SymbolDescriptor) -> Option<String> {
        self.show_namespace.then(|| symbol.namespace.clone())
    }

    /// A whole-namespace require has only the namespace as its label, so it
    /// never repeats it as detail
    fn common_js_detail(&self, symbol: &SymbolDescriptor) -> Option<String> {
        if symbol.method.is_empty() {
            None
        } else {
            self.detail(symbol)
        }
    }

    fn namespace_item(&self, symbol: &SymbolDescriptor) -> CompletionItem {
        let insert_text = if symbol.method.is_empty() {
            symbol.namespace.clone()
        } else {
            format!("{} = {}.{};", symbol.method, symbol.namespace, symbol.method)
        };
        CompletionItem {
            label: symbol.label().to_string(),
            detail: self.detail(symbol),
            kind: Some(CompletionItemKind::FUNCTION),
            insert_text: Some(insert_text),
            data: Some(serde_json::Value::from(RESOLVE_SENTINEL)),
            ..Default::default()
        }
    }

    fn namespace_inline_item(&self, symbol: &SymbolDescriptor) -> CompletionItem {
        CompletionItem {
            label: symbol.label().to_string(),
            detail: self.detail(symbol),
            kind: Some(CompletionItemKind::FUNCTION),
            insert_text: Some(format!("{}{}", symbol.label(), MARKER)),
            data: Some(serde_json::Value::from(RESOLVE_SENTINEL)),
            ..Default::default()
        }
    }

    fn common_js_item(&self, symbol: &SymbolDescriptor) -> CompletionItem {
        CompletionItem {
            label: symbol.label().to_string(),
            detail: self.common_js_detail(symbol),
            kind: Some(CompletionItemKind::FUNCTION),
            insert_text: Some(common_js_clause(symbol, self.caller_path)),
            ..Default::default()
        }
    }

    fn common_js_inline_item(&self, symbol: &SymbolDescriptor) -> CompletionItem {
        CompletionItem {
            label: symbol.label().to_string(),
            detail: self.common_js_detail(symbol),
            kind: Some(CompletionItemKind::FUNCTION),
            insert_text: Some(format!("{}{}", symbol.label(), MARKER)),
            ..Default::default()
        }
    }
}

/// Import clause for a CommonJS symbol, relative to `caller_path`.
///
/// Named members become an ES clause, whole namespaces a `require`.
pub fn common_js_clause(symbol: &SymbolDescriptor, caller_path: &str) -> String {
    let module = relative_module_path(&symbol.path, caller_path);
    if symbol.method.is_empty() {
        format!("{} = require(\"{}\")", symbol.namespace, module)
    } else {
        format!("{{ {} }} from \"{}\";", symbol.method, module)
    }
}

/// The symbol sent back to the editor once an inline suggestion is accepted.
///
/// CommonJS symbols carry the finished import clause in `path` and an empty
/// `method`; the editor prefixes it with `import `. Namespace symbols are
/// passed through unchanged.
pub fn import_target(symbol: &SymbolDescriptor, caller_path: &str) -> SymbolDescriptor {
    if !symbol.common_js {
        return symbol.clone();
    }
    SymbolDescriptor {
        namespace: symbol.namespace.clone(),
        method: String::new(),
        path: common_js_clause(symbol, caller_path),
        common_js: true,
    }
}
