//
// protocol.rs
//
// Custom notifications exchanged with the editor-side watcher
//

use tower_lsp::lsp_types::notification::Notification;

use crate::import_cache::SymbolDescriptor;

/// Inbound: one file was (re)scanned
pub const NAMESPACE_UPDATE: &str = "namespaceUpdate";
/// Inbound: one project config was (re)read
pub const TSCONFIG_UPDATE: &str = "tsconfigUpdate";
/// Inbound: complete snapshot, replaces everything
pub const RESYNC: &str = "resync";
/// Inbound: every file of one namespace, replaces that namespace
pub const REFRESH_NAMESPACE: &str = "refreshNamespace";

/// Ask the editor to insert the import for an accepted suggestion.
///
/// Params are positional: `[filePath, symbol, lineNumber]`.
#[derive(Debug)]
pub enum SaveRequest {}

impl Notification for SaveRequest {
    type Params = (String, SymbolDescriptor, u32);
    const METHOD: &'static str = "saveRequest";
}

/// Ask the editor to strip a leftover marker.
///
/// Params are positional: `[filePath, lineNumber]`. One notification goes
/// out per marked line. The path stays first, so a client that reads only
/// `params[0]` and cleans the whole file still works.
#[derive(Debug)]
pub enum UndoSaveRequest {}

impl Notification for UndoSaveRequest {
    type Params = (String, u32);
    const METHOD: &'static str = "undoSaveRequest";
}
