//
// backend.rs
//
// LSP backend: standard lifecycle and document events plus the watcher's
// custom cache notifications
//

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::Client;
use tower_lsp::LanguageServer;
use tower_lsp::LspService;
use tower_lsp::Server;

use crate::completion_engine::EditorRequest;
use crate::config::{parse_importer_config, ImporterConfig};
use crate::handlers;
use crate::import_cache::{
    FileDescriptor, FrameworkDescriptor, RefreshNamespaceParams, ResyncParams,
};
use crate::perf::{self, ScopeTimer};
use crate::protocol::{self, SaveRequest, UndoSaveRequest};
use crate::scanner::scan_workspace;
use crate::state::WorldState;

pub struct Backend {
    client: Client,
    state: Arc<RwLock<WorldState>>,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            state: Arc::new(RwLock::new(WorldState::new(ImporterConfig::default()))),
        }
    }

    /// Deliver engine output to the editor
    async fn send_requests(&self, requests: Vec<EditorRequest>) {
        for request in requests {
            match request {
                EditorRequest::Save { path, target, line } => {
                    log::trace!("saveRequest {}:{} for '{}'", path, line, target.label());
                    self.client
                        .send_notification::<SaveRequest>((path, target, line))
                        .await;
                }
                EditorRequest::UndoSave { path, line } => {
                    log::trace!("undoSaveRequest {}:{}", path, line);
                    self.client
                        .send_notification::<UndoSaveRequest>((path, line))
                        .await;
                }
            }
        }
    }

    /// Rebuild the cache from the server's own scan of the workspace folders.
    ///
    /// The scan runs on a blocking task without holding the state lock.
    async fn index_workspace(&self) {
        let (roots, config) = {
            let state = self.state.read().await;
            (state.workspace_roots(), state.config.clone())
        };
        if roots.is_empty() {
            log::info!("No workspace folders on disk, skipping workspace scan");
            return;
        }

        let timer = ScopeTimer::start("workspace_scan");
        let scan = tokio::task::spawn_blocking(move || scan_workspace(&roots, &config));
        let params = match scan.await {
            Ok(params) => params,
            Err(e) => {
                log::warn!("Workspace scan failed: {}", e);
                return;
            }
        };
        perf::record_workspace_scan(timer.stop(), params.namespaces_info.len());

        let mut state = self.state.write().await;
        state.import_cache.reset(params);
    }

    async fn handle_namespace_update(&self, params: FileDescriptor) {
        log::trace!("{}: {} ({})", protocol::NAMESPACE_UPDATE, params.namespace, params.path);
        let mut state = self.state.write().await;
        state.import_cache.register(&params);
    }

    async fn handle_tsconfig_update(&self, params: FrameworkDescriptor) {
        log::trace!("{}: {}", protocol::TSCONFIG_UPDATE, params.name);
        let mut state = self.state.write().await;
        state.import_cache.register_framework(&params);
    }

    async fn handle_resync(&self, params: ResyncParams) {
        log::info!(
            "{}: {} frameworks, {} files",
            protocol::RESYNC,
            params.frameworks_info.len(),
            params.namespaces_info.len()
        );
        let _timer = ScopeTimer::start("resync").warn_after(Duration::from_millis(200));
        perf::record_resync();
        let mut state = self.state.write().await;
        state.import_cache.reset(params);
    }

    async fn handle_refresh_namespace(&self, params: RefreshNamespaceParams) {
        log::trace!(
            "{}: {} ({} files)",
            protocol::REFRESH_NAMESPACE,
            params.namespace,
            params.files.len()
        );
        let mut state = self.state.write().await;
        state
            .import_cache
            .refresh_namespace(&params.namespace, &params.files);
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        log::info!("Initializing tsimporter");

        let mut state = self.state.write().await;

        if let Some(folders) = params.workspace_folders {
            for folder in folders {
                log::info!("Adding workspace folder: {}", folder.uri);
                state.workspace_folders.push(folder.uri);
            }
        } else if let Some(root_uri) = params.root_uri {
            log::info!("Adding root URI as workspace folder: {}", root_uri);
            state.workspace_folders.push(root_uri);
        }

        if let Some(config) = params
            .initialization_options
            .as_ref()
            .and_then(parse_importer_config)
        {
            state.config = config;
        }

        drop(state);

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::INCREMENTAL,
                )),
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(true),
                    ..Default::default()
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: String::from("tsimporter"),
                version: Some(String::from(env!("CARGO_PKG_VERSION"))),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        log::info!("tsimporter initialized");

        let index_workspace = self.state.read().await.config.index_workspace;
        if index_workspace {
            self.index_workspace().await;
        } else {
            log::info!("Waiting for the editor to send the symbol snapshot");
        }

        perf::log_summary();
    }

    async fn shutdown(&self) -> Result<()> {
        log::info!("tsimporter shutting down");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let mut state = self.state.write().await;
        state.open_document(uri, &params.text_document.text, Some(params.text_document.version));
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;

        let requests = {
            let mut state = self.state.write().await;
            if let Some(doc) = state.documents.get_mut(&uri) {
                doc.version = Some(params.text_document.version);
            }
            for change in params.content_changes {
                state.apply_change(&uri, change);
            }
            handlers::document_changed(&mut state, &uri)
        };

        self.send_requests(requests).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let mut state = self.state.write().await;
        state.close_document(&params.text_document.uri);
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        let Some(config) = parse_importer_config(&params.settings) else {
            log::warn!(
                "No importer settings in configuration change, keeping current configuration"
            );
            return;
        };

        let rescan = {
            let mut state = self.state.write().await;
            let rescan = config.index_workspace && state.config.scan_settings_changed(&config);
            state.config = config;
            rescan
        };

        if rescan {
            log::info!("Scan settings changed, rescanning workspace");
            self.index_workspace().await;
        }
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let mut state = self.state.write().await;
        Ok(handlers::completion(
            &mut state,
            &params.text_document_position.text_document.uri,
            params.text_document_position.position,
        ))
    }

    async fn completion_resolve(&self, item: CompletionItem) -> Result<CompletionItem> {
        Ok(handlers::completion_resolve(item))
    }
}

pub async fn start_lsp() -> anyhow::Result<()> {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::build(Backend::new)
        .custom_method(protocol::NAMESPACE_UPDATE, Backend::handle_namespace_update)
        .custom_method(protocol::TSCONFIG_UPDATE, Backend::handle_tsconfig_update)
        .custom_method(protocol::RESYNC, Backend::handle_resync)
        .custom_method(protocol::REFRESH_NAMESPACE, Backend::handle_refresh_namespace)
        .finish();
    Server::new(stdin, stdout, socket).serve(service).await;

    Ok(())
}
