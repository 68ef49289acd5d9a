use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use utrsync_ingest::{FormatAdapter, HeaderStrategy};
use utrsync_reconcile::{DEFAULT_BASE_URL, ProviderProfile, ProviderTable};

use crate::state::default_config_path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub platform: PlatformSection,
    pub providers: BTreeMap<String, ProviderSection>,
    pub layout: LayoutSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformSection {
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSection {
    /// Environment variable holding the bearer token.
    pub token_env: String,
    /// Sent verbatim with every approval for this provider.
    pub remark: String,
}

/// Pin the header row to a fixed offset instead of searching for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSection {
    pub csv_skip_lines: Option<usize>,
    pub xls_skip_lines: Option<usize>,
    pub xlsx_skip_lines: Option<usize>,
}

impl Default for PlatformSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut providers = BTreeMap::new();
        providers.insert(
            "afro".to_string(),
            ProviderSection {
                token_env: "AFRO_TOKEN".to_string(),
                remark: "fat".to_string(),
            },
        );
        providers.insert(
            "aim".to_string(),
            ProviderSection {
                token_env: "AIM_TOKEN".to_string(),
                remark: "add1".to_string(),
            },
        );
        Self {
            platform: PlatformSection::default(),
            providers,
            layout: LayoutSection::default(),
        }
    }
}

impl Config {
    /// Build the provider table, reading each token through `lookup`.
    pub fn provider_table(&self, lookup: impl Fn(&str) -> Option<String>) -> ProviderTable {
        let mut table = ProviderTable::new();
        for (tag, section) in &self.providers {
            table.insert(
                tag,
                ProviderProfile {
                    token: lookup(&section.token_env),
                    remark: section.remark.clone(),
                },
            );
        }
        table
    }

    /// Adapter for an uploaded file name, with any configured header offset.
    pub fn adapter_for(&self, file_name: &str) -> Result<FormatAdapter> {
        let adapter = FormatAdapter::for_file_name(file_name)?;
        let skip = match adapter {
            FormatAdapter::DelimitedText(_) => self.layout.csv_skip_lines,
            FormatAdapter::LegacySpreadsheet(_) => self.layout.xls_skip_lines,
            FormatAdapter::ModernSpreadsheet(_) => self.layout.xlsx_skip_lines,
            FormatAdapter::PdfStatement => None,
        };
        Ok(adapter.with_strategy(HeaderStrategy::from_skip_lines(skip)))
    }
}

pub fn env_token(var: &str) -> Option<String> {
    std::env::var(var).ok()
}

pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => default_config_path(),
    }
}

/// Missing file means built-in defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    save_config(path, &Config::default())?;
    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use utrsync_reconcile::ReconcileError;

    #[test]
    fn test_defaults_cover_both_providers() {
        let cfg = Config::default();
        assert_eq!(cfg.platform.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.providers["afro"].remark, "fat");
        assert_eq!(cfg.providers["aim"].token_env, "AIM_TOKEN");
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [layout]
            csv_skip_lines = 17
            "#,
        )
        .unwrap();
        assert_eq!(cfg.layout.csv_skip_lines, Some(17));
        assert_eq!(cfg.platform.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.providers.len(), 2);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.platform.base_url = "http://127.0.0.1:9000".to_string();
        cfg.layout.xls_skip_lines = Some(20);
        save_config(&path, &cfg).unwrap();

        assert_eq!(load_config(&path).unwrap(), cfg);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_provider_table_reads_tokens_through_lookup() {
        let cfg = Config::default();
        let table = cfg.provider_table(|var| (var == "AFRO_TOKEN").then(|| "tok-afro".to_string()));

        let creds = table.resolve("afro").unwrap();
        assert_eq!(creds.token, "tok-afro");
        assert_eq!(creds.remark, "fat");
        assert!(matches!(
            table.resolve("aim"),
            Err(ReconcileError::MissingCredential { .. })
        ));
    }

    #[test]
    fn test_adapter_for_applies_layout_offsets() {
        let mut cfg = Config::default();
        cfg.layout.csv_skip_lines = Some(17);

        assert_eq!(
            cfg.adapter_for("stmt.CSV").unwrap(),
            FormatAdapter::DelimitedText(HeaderStrategy::Fixed { skip: 17 })
        );
        assert_eq!(
            cfg.adapter_for("stmt.xlsx").unwrap(),
            FormatAdapter::ModernSpreadsheet(HeaderStrategy::Catalog)
        );
        assert!(cfg.adapter_for("stmt.txt").is_err());
    }
}
