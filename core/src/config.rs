//! Lint configuration, loadable from TOML (CLI) or JSON (editor settings).

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::diagnostic::{RuleId, Severity};

pub const DEFAULT_MAX_DIAGNOSTICS: usize = 500;

/// Which bindings the unused-variable rule looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnusedPolicy {
    #[default]
    All,
    #[serde(alias = "typedOnly")]
    TypedOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LintConfig {
    /// Rule codes that never run.
    pub disabled: Vec<String>,
    #[serde(alias = "unusedVariables")]
    pub unused_variables: UnusedPolicy,
    #[serde(alias = "maxDiagnostics")]
    pub max_diagnostics: usize,
    /// Per-rule severity overrides, keyed by rule code.
    pub severity: BTreeMap<String, Severity>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            disabled: Vec::new(),
            unused_variables: UnusedPolicy::All,
            max_diagnostics: DEFAULT_MAX_DIAGNOSTICS,
            severity: BTreeMap::new(),
        }
    }
}

impl LintConfig {
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let config: LintConfig = toml::from_str(src).context("Failed to parse lint config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        let config: LintConfig = serde_json::from_value(value).context("Failed to parse lint config")?;
        config.validate()?;
        Ok(config)
    }

    /// Every rule code mentioned must name an existing rule.
    pub fn validate(&self) -> Result<()> {
        for code in self.disabled.iter().chain(self.severity.keys()) {
            if code.parse::<RuleId>().is_err() {
                bail!("Unknown rule code '{}' in lint config", code);
            }
        }
        if self.max_diagnostics == 0 {
            bail!("max-diagnostics must be at least 1");
        }
        Ok(())
    }

    pub fn is_enabled(&self, rule: RuleId) -> bool {
        !self.disabled.iter().any(|c| c == rule.code())
    }

    /// Override for `rule`, if configured.
    pub fn severity_for(&self, rule: RuleId) -> Option<Severity> {
        self.severity.get(rule.code()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(LintConfig::from_toml_str("").unwrap(), LintConfig::default());
    }

    #[test]
    fn test_toml_fields() {
        let cfg = LintConfig::from_toml_str(
            r#"
disabled = ["dead-code"]
unused-variables = "typed-only"
max-diagnostics = 10

[severity]
missing-semicolon = "error"
"#,
        )
        .unwrap();
        assert!(!cfg.is_enabled(RuleId::DeadCode));
        assert!(cfg.is_enabled(RuleId::EmptyBlock));
        assert_eq!(cfg.unused_variables, UnusedPolicy::TypedOnly);
        assert_eq!(cfg.max_diagnostics, 10);
        assert_eq!(cfg.severity_for(RuleId::MissingSemicolon), Some(Severity::Error));
        assert_eq!(cfg.severity_for(RuleId::DeadCode), None);
    }

    #[test]
    fn test_json_accepts_camel_case() {
        let cfg = LintConfig::from_json_value(serde_json::json!({
            "unusedVariables": "typedOnly",
            "maxDiagnostics": 3,
        }))
        .unwrap();
        assert_eq!(cfg.unused_variables, UnusedPolicy::TypedOnly);
        assert_eq!(cfg.max_diagnostics, 3);
    }

    #[test]
    fn test_unknown_rule_code_is_rejected() {
        let err = LintConfig::from_toml_str(r#"disabled = ["no-such-rule"]"#).unwrap_err();
        assert!(err.to_string().contains("no-such-rule"));
        assert!(LintConfig::from_toml_str("max-diagnostics = 0").is_err());
    }
}
