use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::LanguageServer;
use tracing::{debug, info};

use super::{
    config::OPEN_DELAY_MS,
    state::{Document, TantrumsLanguageServer},
    text::apply_change,
};

#[tower_lsp::async_trait]
impl LanguageServer for TantrumsLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("Tantrums language server initializing for {:?}", params.root_uri);

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::INCREMENTAL),
                    save: Some(TextDocumentSyncSaveOptions::Supported(true)),
                    ..Default::default()
                })),
                diagnostic_provider: Some(DiagnosticServerCapabilities::Options(DiagnosticOptions {
                    identifier: Some("tantrums".to_string()),
                    inter_file_dependencies: false,
                    workspace_diagnostics: false,
                    work_done_progress_options: Default::default(),
                })),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "Tantrums Language Server".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "Tantrums language server started")
            .await;
        self.load_config().await;
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Tantrums language server shutting down");
        Ok(())
    }

    async fn did_change_configuration(&self, _: DidChangeConfigurationParams) {
        self.load_config().await;
        self.reanalyze_all();
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        debug!(uri = %doc.uri, version = doc.version, "open");
        self.documents
            .insert(doc.uri.clone(), Document::new(&doc.text, doc.version));
        self.schedule_diagnostics(doc.uri, doc.version, OPEN_DELAY_MS);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;
        {
            let mut entry = self.documents.entry(uri.clone()).or_default();
            entry.version = version;
            for change in &params.content_changes {
                apply_change(&mut entry.content, change);
            }
            entry.debounce_seq = entry.debounce_seq.wrapping_add(1);
        }
        let delay = self.config_snapshot().debounce_ms;
        self.schedule_diagnostics(uri, version, delay);
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = match self.documents.get(&uri) {
            Some(doc) => doc.version,
            None => return,
        };
        self.schedule_diagnostics(uri, version, 0);
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.remove(&uri);
        self.store.clear(&uri);
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn diagnostic(&self, params: DocumentDiagnosticParams) -> Result<DocumentDiagnosticReportResult> {
        let items = self.document_diagnostics(&params.text_document.uri).await;

        Ok(DocumentDiagnosticReportResult::Report(DocumentDiagnosticReport::Full(
            RelatedFullDocumentDiagnosticReport {
                related_documents: None,
                full_document_diagnostic_report: FullDocumentDiagnosticReport { result_id: None, items },
            },
        )))
    }
}
