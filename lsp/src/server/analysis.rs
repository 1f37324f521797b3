use dashmap::DashMap;
use tokio::task;
use tokio::time::{sleep, Duration};
use tower_lsp::lsp_types::*;
use tracing::{debug, warn};

use crate::analyzer::TantrumsAnalyzer;

use super::state::{Document, PublishedDiagnostics, TantrumsLanguageServer};
use super::utils::content_hash;

impl TantrumsLanguageServer {
    /// Analyse `uri` after `delay_ms` and publish, unless the document moved
    /// past `scheduled_version` in the meantime.
    pub(crate) fn schedule_diagnostics(&self, uri: Url, scheduled_version: i32, delay_ms: u64) {
        let documents = self.documents.clone();
        let store = self.store.clone();
        let client = self.client.clone();
        let lint = self.config_snapshot().lint;

        tokio::spawn(async move {
            sleep(Duration::from_millis(delay_ms)).await;

            let (content, seq, version, published_hash) = match documents.get(&uri) {
                Some(doc) => (doc.content.to_string(), doc.debounce_seq, doc.version, doc.published_hash),
                None => return,
            };
            if version != scheduled_version {
                return;
            }

            let hash = content_hash(&content);
            if published_hash == Some(hash) && store.version(&uri) == Some(version) {
                debug!(%uri, version, "content unchanged, skipping analysis");
                return;
            }

            let computed = task::spawn_blocking(move || TantrumsAnalyzer::with_config(lint).try_analyze(&content)).await;
            let analysis = match computed {
                Ok(Ok(analysis)) => analysis,
                Ok(Err(e)) => {
                    warn!(%uri, version, "analysis failed, keeping previous diagnostics: {e:#}");
                    return;
                }
                Err(e) => {
                    warn!(%uri, version, "analysis task aborted: {e}");
                    return;
                }
            };

            if !commit(&documents, &store, &uri, version, seq, hash, analysis.diagnostics.clone()) {
                debug!(%uri, version, "stale result dropped");
                return;
            }

            debug!(%uri, version, count = analysis.diagnostics.len(), "publishing diagnostics");
            client
                .publish_diagnostics(uri, analysis.diagnostics, Some(version))
                .await;
        });
    }

    /// Diagnostics for the current version of `uri`, computing them if the
    /// published set is stale.
    pub(crate) async fn document_diagnostics(&self, uri: &Url) -> Vec<Diagnostic> {
        let (content, version) = match self.documents.get(uri) {
            Some(doc) => (doc.content.to_string(), doc.version),
            None => return Vec::new(),
        };
        if let Some(published) = self.store.get(uri).filter(|p| p.version == version) {
            return published.diagnostics.as_ref().clone();
        }

        let lint = self.config_snapshot().lint;
        let computed = task::spawn_blocking(move || TantrumsAnalyzer::with_config(lint).try_analyze(&content)).await;
        match computed {
            Ok(Ok(analysis)) => {
                self.store.publish(uri.clone(), version, analysis.diagnostics.clone());
                analysis.diagnostics
            }
            Ok(Err(e)) => {
                warn!(%uri, version, "analysis failed: {e:#}");
                self.store
                    .get(uri)
                    .map(|p| p.diagnostics.as_ref().clone())
                    .unwrap_or_default()
            }
            Err(e) => {
                warn!(%uri, version, "analysis task aborted: {e}");
                Vec::new()
            }
        }
    }

    /// Re-run analysis for every open document, e.g. after a settings change.
    pub(crate) fn reanalyze_all(&self) {
        let pending: Vec<(Url, i32)> = self
            .documents
            .iter_mut()
            .map(|mut entry| {
                entry.published_hash = None;
                (entry.key().clone(), entry.version)
            })
            .collect();
        for (uri, version) in pending {
            self.schedule_diagnostics(uri, version, 0);
        }
    }
}

/// Store a finished pass if the document is still at the analysed version and
/// edit sequence. The content hash is recorded only once the store accepts.
fn commit(
    documents: &DashMap<Url, Document>,
    store: &PublishedDiagnostics,
    uri: &Url,
    version: i32,
    seq: u64,
    hash: u64,
    diagnostics: Vec<Diagnostic>,
) -> bool {
    let current = documents
        .get(uri)
        .is_some_and(|doc| doc.version == version && doc.debounce_seq == seq);
    if !current || !store.publish(uri.clone(), version, diagnostics) {
        return false;
    }
    if let Some(mut doc) = documents.get_mut(uri) {
        doc.published_hash = Some(hash);
    }
    true
}
