//! List configuration: variant presets, optional YAML file, env overrides.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use noticeboard_core::FilterScope;
use noticeboard_source::HttpClientConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "noticeboard.yaml";

/// The two list presets: grouped announcements with guarded paging, or a
/// plain flat list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Grouped,
    Flat,
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grouped" => Ok(Self::Grouped),
            "flat" => Ok(Self::Flat),
            other => Err(format!("unknown variant `{other}` (expected grouped or flat)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListConfig {
    pub csv_url: String,
    pub page_size: usize,
    pub grouping_enabled: bool,
    pub filter_scope: FilterScope,
    pub bounds_checked_pagination: bool,
    pub hide_single_page_controls: bool,
    pub keyboard_navigation: bool,
    pub debounce_ms: u64,
    pub item_noun: String,
    pub http_timeout_secs: u64,
    pub user_agent: Option<String>,
    pub web_port: u16,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self::for_variant(Variant::default())
    }
}

/// Partial settings, as read from the YAML file or the environment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    pub variant: Option<Variant>,
    pub csv_url: Option<String>,
    pub page_size: Option<usize>,
    pub grouping_enabled: Option<bool>,
    pub filter_scope: Option<FilterScope>,
    pub bounds_checked_pagination: Option<bool>,
    pub hide_single_page_controls: Option<bool>,
    pub keyboard_navigation: Option<bool>,
    pub debounce_ms: Option<u64>,
    pub item_noun: Option<String>,
    pub http_timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    pub web_port: Option<u16>,
}

impl ListConfig {
    pub fn for_variant(variant: Variant) -> Self {
        let grouped = variant == Variant::Grouped;
        Self {
            csv_url: String::new(),
            page_size: 10,
            grouping_enabled: grouped,
            filter_scope: if grouped {
                FilterScope::Broad
            } else {
                FilterScope::Narrow
            },
            bounds_checked_pagination: grouped,
            hide_single_page_controls: grouped,
            keyboard_navigation: grouped,
            debounce_ms: 300,
            item_noun: "announcement".to_string(),
            http_timeout_secs: 20,
            user_agent: None,
            web_port: 8000,
        }
    }

    pub fn apply(&mut self, o: &ConfigOverrides) {
        if let Some(v) = &o.csv_url {
            self.csv_url = v.clone();
        }
        if let Some(v) = o.page_size {
            self.page_size = v.max(1);
        }
        if let Some(v) = o.grouping_enabled {
            self.grouping_enabled = v;
        }
        if let Some(v) = o.filter_scope {
            self.filter_scope = v;
        }
        if let Some(v) = o.bounds_checked_pagination {
            self.bounds_checked_pagination = v;
        }
        if let Some(v) = o.hide_single_page_controls {
            self.hide_single_page_controls = v;
        }
        if let Some(v) = o.keyboard_navigation {
            self.keyboard_navigation = v;
        }
        if let Some(v) = o.debounce_ms {
            self.debounce_ms = v;
        }
        if let Some(v) = &o.item_noun {
            self.item_noun = v.clone();
        }
        if let Some(v) = o.http_timeout_secs {
            self.http_timeout_secs = v;
        }
        if let Some(v) = &o.user_agent {
            self.user_agent = Some(v.clone());
        }
        if let Some(v) = o.web_port {
            self.web_port = v;
        }
    }

    /// Load `NOTICEBOARD_CONFIG` (or `./noticeboard.yaml` when present), then
    /// apply `NOTICEBOARD_*` environment overrides.
    pub fn load() -> Result<Self> {
        let explicit = std::env::var("NOTICEBOARD_CONFIG").ok().map(PathBuf::from);
        Self::load_from(explicit.as_deref(), |key| std::env::var(key).ok())
    }

    /// `path` must exist when given; without it the default file is optional.
    pub fn load_from(path: Option<&Path>, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let file = match path {
            Some(path) => Some(read_overrides(path)?),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Some(read_overrides(default)?)
                } else {
                    None
                }
            }
        };
        let env_overrides = overrides_from_env(env)?;

        let variant = env_overrides
            .variant
            .or(file.as_ref().and_then(|f| f.variant))
            .unwrap_or_default();
        let mut config = Self::for_variant(variant);
        if let Some(file) = &file {
            config.apply(file);
        }
        config.apply(&env_overrides);
        Ok(config)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn http_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            timeout: Duration::from_secs(self.http_timeout_secs),
            user_agent: self.user_agent.clone(),
        }
    }
}

fn read_overrides(path: &Path) -> Result<ConfigOverrides> {
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    if yaml.trim().is_empty() {
        return Ok(ConfigOverrides::default());
    }
    serde_yaml::from_str(&yaml).with_context(|| format!("parsing config {}", path.display()))
}

fn env_parse<T>(env: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|err| anyhow::anyhow!("invalid {key}={raw}: {err}")),
        _ => Ok(None),
    }
}

fn overrides_from_env(env: impl Fn(&str) -> Option<String>) -> Result<ConfigOverrides> {
    Ok(ConfigOverrides {
        variant: env_parse(&env, "NOTICEBOARD_VARIANT")?,
        csv_url: env("NOTICEBOARD_CSV_URL").filter(|v| !v.trim().is_empty()),
        page_size: env_parse(&env, "NOTICEBOARD_PAGE_SIZE")?,
        filter_scope: env_parse(&env, "NOTICEBOARD_FILTER_SCOPE")?,
        item_noun: env("NOTICEBOARD_ITEM_NOUN").filter(|v| !v.trim().is_empty()),
        http_timeout_secs: env_parse(&env, "NOTICEBOARD_HTTP_TIMEOUT_SECS")?,
        user_agent: env("NOTICEBOARD_USER_AGENT").filter(|v| !v.trim().is_empty()),
        web_port: env_parse(&env, "NOTICEBOARD_WEB_PORT")?,
        ..ConfigOverrides::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn variant_presets_differ() {
        let grouped = ListConfig::for_variant(Variant::Grouped);
        assert!(grouped.grouping_enabled);
        assert_eq!(grouped.filter_scope, FilterScope::Broad);
        assert!(grouped.bounds_checked_pagination);
        assert!(grouped.keyboard_navigation);

        let flat = ListConfig::for_variant(Variant::Flat);
        assert!(!flat.grouping_enabled);
        assert_eq!(flat.filter_scope, FilterScope::Narrow);
        assert!(!flat.hide_single_page_controls);
        assert_eq!(flat.page_size, 10);
        assert_eq!(flat.debounce(), Duration::from_millis(300));
    }

    #[test]
    fn yaml_file_then_env_overrides() {
        let mut file = NamedTempFile::new().expect("tempfile");
        writeln!(file, "variant: flat\ncsv_url: https://example.com/books.csv\npage_size: 5\nitem_noun: book").unwrap();

        let config = ListConfig::load_from(
            Some(file.path()),
            env_of(&[("NOTICEBOARD_PAGE_SIZE", "7"), ("NOTICEBOARD_FILTER_SCOPE", "broad")]),
        )
        .expect("config");

        assert!(!config.grouping_enabled);
        assert_eq!(config.csv_url, "https://example.com/books.csv");
        assert_eq!(config.page_size, 7);
        assert_eq!(config.filter_scope, FilterScope::Broad);
        assert_eq!(config.item_noun, "book");
    }

    #[test]
    fn env_variant_wins_over_file_variant() {
        let mut file = NamedTempFile::new().expect("tempfile");
        writeln!(file, "variant: flat").unwrap();
        let config =
            ListConfig::load_from(Some(file.path()), env_of(&[("NOTICEBOARD_VARIANT", "grouped")]))
                .expect("config");
        assert!(config.grouping_enabled);
    }

    #[test]
    fn bad_env_values_are_errors() {
        let empty = NamedTempFile::new().expect("tempfile");
        let err = ListConfig::load_from(Some(empty.path()), env_of(&[("NOTICEBOARD_PAGE_SIZE", "ten")]))
            .unwrap_err();
        assert!(err.to_string().contains("NOTICEBOARD_PAGE_SIZE"));
    }

    #[test]
    fn unknown_yaml_keys_are_rejected() {
        let mut file = NamedTempFile::new().expect("tempfile");
        writeln!(file, "pagesize: 3").unwrap();
        assert!(ListConfig::load_from(Some(file.path()), env_of(&[])).is_err());
    }

    #[test]
    fn zero_page_size_is_raised_to_one() {
        let mut config = ListConfig::default();
        config.apply(&ConfigOverrides {
            page_size: Some(0),
            ..ConfigOverrides::default()
        });
        assert_eq!(config.page_size, 1);
    }
}
