use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use ropey::Rope;
use tower_lsp::lsp_types::{Diagnostic, Url};
use tower_lsp::Client;

use tantrums_core::DiagnosticStore;

use super::config::ServerConfig;

/// An open Tantrums document.
#[derive(Debug, Default)]
pub(crate) struct Document {
    pub(crate) content: Rope,
    pub(crate) version: i32,
    /// Bumped on every edit so queued analyses can tell they are stale.
    pub(crate) debounce_seq: u64,
    /// Hash of the content behind the last published diagnostic set.
    pub(crate) published_hash: Option<u64>,
}

impl Document {
    pub(crate) fn new(text: &str, version: i32) -> Self {
        Self {
            content: Rope::from_str(text),
            version,
            ..Default::default()
        }
    }
}

pub(crate) type PublishedDiagnostics = DiagnosticStore<Url, Diagnostic>;

pub(crate) struct TantrumsLanguageServer {
    pub(crate) client: Client,
    pub(crate) documents: Arc<DashMap<Url, Document>>,
    pub(crate) store: Arc<PublishedDiagnostics>,
    pub(crate) config: Mutex<ServerConfig>,
}

impl TantrumsLanguageServer {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            documents: Arc::new(DashMap::new()),
            store: Arc::new(DiagnosticStore::new()),
            config: Mutex::new(ServerConfig::default()),
        }
    }

    /// Copy of the current configuration; a poisoned lock falls back to defaults.
    pub(crate) fn config_snapshot(&self) -> ServerConfig {
        self.config.lock().map(|c| c.clone()).unwrap_or_default()
    }
}
