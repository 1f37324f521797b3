use serde::Deserialize;
use serde_json::Value;
use tower_lsp::lsp_types::ConfigurationItem;
use tracing::{debug, warn};

use tantrums_core::LintConfig;

use super::state::TantrumsLanguageServer;

pub(crate) const CONFIG_SECTION: &str = "tantrums";
pub(crate) const DEFAULT_DEBOUNCE_MS: u64 = 200;
/// Delay before the first analysis of a freshly opened document.
pub(crate) const OPEN_DELAY_MS: u64 = 50;

#[derive(Debug, Clone)]
pub(crate) struct ServerConfig {
    pub(crate) lint: LintConfig,
    pub(crate) debounce_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            lint: LintConfig::default(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct TantrumsConfigSection {
    #[serde(default)]
    lint: Option<Value>,
    #[serde(default)]
    debounce_ms: Option<u64>,
}

impl ServerConfig {
    /// Merge a client settings section into this config. On error nothing
    /// is changed.
    pub(crate) fn apply(&mut self, value: Value) -> anyhow::Result<()> {
        let section: TantrumsConfigSection = serde_json::from_value(value)?;
        if let Some(lint) = section.lint {
            self.lint = LintConfig::from_json_value(lint)?;
        }
        if let Some(ms) = section.debounce_ms {
            self.debounce_ms = ms;
        }
        Ok(())
    }
}

impl TantrumsLanguageServer {
    pub(crate) async fn load_config(&self) {
        let items = vec![ConfigurationItem {
            scope_uri: None,
            section: Some(CONFIG_SECTION.to_string()),
        }];

        let Ok(values) = self.client.configuration(items).await else {
            debug!("client did not answer workspace/configuration");
            return;
        };
        let Some(value) = values.into_iter().next().filter(|v| !v.is_null()) else {
            return;
        };

        let mut next = self.config_snapshot();
        match next.apply(value) {
            Ok(()) => {
                if let Ok(mut guard) = self.config.lock() {
                    *guard = next;
                }
            }
            Err(e) => warn!("ignoring invalid {CONFIG_SECTION} settings: {e:#}"),
        }
    }
}
