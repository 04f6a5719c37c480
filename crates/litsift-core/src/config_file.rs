use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub lexicon: Option<LexiconConfig>,
    pub segmentation: Option<SegmentationConfig>,
    pub ranking: Option<RankingConfig>,
    pub matching: Option<MatchingConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LexiconConfig {
    /// Replaces the built-in keyword list.
    pub keywords: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentationConfig {
    pub boundary_regex: Option<String>,
    pub min_entry_len: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    pub top_n: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub fuzzy_threshold: Option<usize>,
    pub author_separator: Option<String>,
    pub title_words: Option<usize>,
}

impl MatchingConfig {
    /// Overlay these values on `base`.
    pub fn apply(&self, base: crate::MatchConfig) -> crate::MatchConfig {
        crate::MatchConfig {
            fuzzy_threshold: self.fuzzy_threshold.unwrap_or(base.fuzzy_threshold),
            author_separator: self
                .author_separator
                .as_deref()
                .and_then(|s| s.chars().next())
                .unwrap_or(base.author_separator),
            title_words: self.title_words.unwrap_or(base.title_words),
        }
    }
}

/// Platform config directory path: `<config_dir>/litsift/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("litsift").join("config.toml"))
}

/// Load config by cascading CWD `.litsift.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".litsift.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        lexicon: Some(LexiconConfig {
            keywords: overlay
                .lexicon
                .as_ref()
                .and_then(|l| l.keywords.clone())
                .or_else(|| base.lexicon.as_ref().and_then(|l| l.keywords.clone())),
        }),
        segmentation: Some(SegmentationConfig {
            boundary_regex: overlay
                .segmentation
                .as_ref()
                .and_then(|s| s.boundary_regex.clone())
                .or_else(|| {
                    base.segmentation
                        .as_ref()
                        .and_then(|s| s.boundary_regex.clone())
                }),
            min_entry_len: overlay
                .segmentation
                .as_ref()
                .and_then(|s| s.min_entry_len)
                .or_else(|| base.segmentation.as_ref().and_then(|s| s.min_entry_len)),
        }),
        ranking: Some(RankingConfig {
            top_n: overlay
                .ranking
                .as_ref()
                .and_then(|r| r.top_n)
                .or_else(|| base.ranking.as_ref().and_then(|r| r.top_n)),
        }),
        matching: Some(MatchingConfig {
            fuzzy_threshold: overlay
                .matching
                .as_ref()
                .and_then(|m| m.fuzzy_threshold)
                .or_else(|| base.matching.as_ref().and_then(|m| m.fuzzy_threshold)),
            author_separator: overlay
                .matching
                .as_ref()
                .and_then(|m| m.author_separator.clone())
                .or_else(|| {
                    base.matching
                        .as_ref()
                        .and_then(|m| m.author_separator.clone())
                }),
            title_words: overlay
                .matching
                .as_ref()
                .and_then(|m| m.title_words)
                .or_else(|| base.matching.as_ref().and_then(|m| m.title_words)),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MatchConfig;

    #[test]
    fn test_round_trip_toml() {
        let config = ConfigFile {
            ranking: Some(RankingConfig { top_n: Some(25) }),
            lexicon: Some(LexiconConfig {
                keywords: Some(vec!["gdpr".into(), "ehr".into()]),
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_section_deserializes() {
        let toml_str = "[segmentation]\nmin_entry_len = 200\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        let seg = parsed.segmentation.unwrap();
        assert_eq!(seg.min_entry_len, Some(200));
        assert!(seg.boundary_regex.is_none());
        assert!(parsed.matching.is_none());
    }

    #[test]
    fn test_merge_overlay_wins() {
        let base = ConfigFile {
            ranking: Some(RankingConfig { top_n: Some(10) }),
            matching: Some(MatchingConfig {
                fuzzy_threshold: Some(3),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            ranking: Some(RankingConfig { top_n: Some(20) }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        assert_eq!(merged.ranking.unwrap().top_n, Some(20));
        assert_eq!(merged.matching.unwrap().fuzzy_threshold, Some(3));
    }

    #[test]
    fn test_matching_section_overlays_defaults() {
        let section = MatchingConfig {
            author_separator: Some("|".into()),
            ..Default::default()
        };
        let cfg = section.apply(MatchConfig::default());
        assert_eq!(cfg.author_separator, '|');
        assert_eq!(cfg.fuzzy_threshold, 2);
        assert_eq!(cfg.title_words, 5);
    }

    #[test]
    fn test_load_from_missing_path_is_none() {
        assert!(load_from_path(Path::new("/nonexistent/litsift.toml")).is_none());
    }
}
