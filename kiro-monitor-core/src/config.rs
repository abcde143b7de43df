//! YAML configuration model
//!
//! ```yaml
//! global:
//!   timeout: 30
//! panels:
//!   - name: main
//!     url: http://127.0.0.1:8080
//!     key: <management key>
//!     timeout: 20
//! ```

use std::collections::HashSet;
use std::path::Path;

use kiro_monitor_provider::PanelConfig;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// 默认请求超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// 默认面板地址
pub const DEFAULT_PANEL_URL: &str = "http://127.0.0.1:8080";

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Settings shared by every panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// One `panels[]` entry as written in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    /// Overrides `global.timeout` for this panel.
    #[serde(default)]
    pub timeout: Option<u64>,
}

/// Application configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub global: GlobalSettings,
    #[serde(default)]
    pub panels: Vec<PanelEntry>,
}

impl AppConfig {
    /// Reads and parses a configuration file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| CoreError::StorageError(format!("{}: {e}", path.display())))?;
        Self::parse(&text, path)
    }

    /// Parses configuration text; `origin` only appears in error messages.
    pub fn parse(text: &str, origin: &Path) -> CoreResult<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(text)
            .map_err(|e| CoreError::InvalidConfig(format!("{}: {e}", origin.display())))?;
        if value.is_null() {
            return Err(CoreError::ConfigEmpty(origin.to_path_buf()));
        }
        serde_yaml::from_value(value)
            .map_err(|e| CoreError::InvalidConfig(format!("{}: {e}", origin.display())))
    }

    /// Resolves the panel list: defaults filled in, per-panel timeout
    /// overriding the global one.
    ///
    /// Rejects an empty panel list, a zero timeout, a missing key and
    /// duplicate names (case-insensitive).
    pub fn panel_configs(&self) -> CoreResult<Vec<PanelConfig>> {
        if self.panels.is_empty() {
            return Err(CoreError::InvalidConfig(
                "no panels configured, add at least one entry under 'panels'".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        let mut panels = Vec::with_capacity(self.panels.len());

        for (idx, entry) in self.panels.iter().enumerate() {
            let name = entry
                .name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map_or_else(|| format!("Panel {}", idx + 1), str::to_string);

            let key = entry
                .key
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .ok_or_else(|| {
                    CoreError::InvalidConfig(format!("panel '{name}' has no management key"))
                })?;

            let timeout = entry.timeout.unwrap_or(self.global.timeout);
            if timeout == 0 {
                return Err(CoreError::InvalidConfig(format!(
                    "panel '{name}': timeout must be greater than 0"
                )));
            }

            if !seen.insert(name.to_lowercase()) {
                return Err(CoreError::InvalidConfig(format!(
                    "duplicate panel name '{name}'"
                )));
            }

            let url = entry
                .url
                .as_deref()
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .unwrap_or(DEFAULT_PANEL_URL);

            panels.push(PanelConfig::new(name, url, key, timeout));
        }

        Ok(panels)
    }
}

/// Keeps the panels named in `filter` (case-insensitive), in configuration
/// order. An empty filter keeps every panel.
pub fn select_panels(panels: Vec<PanelConfig>, filter: &[String]) -> CoreResult<Vec<PanelConfig>> {
    if filter.is_empty() {
        return Ok(panels);
    }

    let available: Vec<String> = panels.iter().map(|p| p.name.clone()).collect();
    let selected: Vec<PanelConfig> = panels
        .into_iter()
        .filter(|p| filter.iter().any(|name| p.matches_name(name)))
        .collect();

    if selected.is_empty() {
        return Err(CoreError::NoPanelsSelected {
            requested: filter.to_vec(),
            available,
        });
    }

    for name in filter {
        if !selected.iter().any(|p| p.matches_name(name)) {
            log::warn!("Panel '{name}' is not configured, ignoring");
        }
    }

    Ok(selected)
}
