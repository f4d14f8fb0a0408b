use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

pub const DEFAULT_RUN_PREFIX: &str = "iter-";
pub const DEFAULT_INSPECT_CMD: &str = "./target/debug/tursodb";

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct LogConfig {
    pub level: Option<String>,
    pub color: Option<bool>, // None = auto-detect (semantic)
}

impl LogConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn color(&self) -> Option<bool> {
        self.color // None has semantic meaning (auto-detect)
    }

    pub fn to_effective(&self) -> Self {
        Self {
            level: Some(self.level().to_string()),
            color: self.color,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ClassifyConfig {
    pub run_prefix: Option<String>,
}

impl ClassifyConfig {
    pub fn run_prefix(&self) -> &str {
        self.run_prefix.as_deref().unwrap_or(DEFAULT_RUN_PREFIX)
    }

    pub fn to_effective(&self) -> Self {
        Self {
            run_prefix: Some(self.run_prefix().to_string()),
        }
    }
}

/// A user-defined known signature; exactly one of `contains` or `regex` is expected
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct ExtraSignature {
    pub name: String,
    pub contains: Option<String>,
    pub regex: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SignaturesConfig {
    pub expected: Option<BTreeMap<String, String>>, // merged over the built-in table
    pub not_implemented: Option<Vec<String>>,       // appended to the built-in phrases
    pub extra: Option<Vec<ExtraSignature>>,         // ordered, after the built-ins
    pub inspect_cmd: Option<String>,
}

impl SignaturesConfig {
    pub fn expected(&self) -> BTreeMap<String, String> {
        self.expected.clone().unwrap_or_default()
    }

    pub fn not_implemented(&self) -> &[String] {
        self.not_implemented.as_deref().unwrap_or(&[])
    }

    pub fn extra(&self) -> &[ExtraSignature] {
        self.extra.as_deref().unwrap_or(&[])
    }

    pub fn inspect_cmd(&self) -> &str {
        self.inspect_cmd.as_deref().unwrap_or(DEFAULT_INSPECT_CMD)
    }

    pub fn to_effective(&self) -> Self {
        Self {
            expected: Some(self.expected()),
            not_implemented: Some(self.not_implemented().to_vec()),
            extra: Some(self.extra().to_vec()),
            inspect_cmd: Some(self.inspect_cmd().to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    pub log: Option<LogConfig>,
    pub classify: Option<ClassifyConfig>,
    pub signatures: Option<SignaturesConfig>,
}

impl Config {
    pub fn log(&self) -> LogConfig {
        self.log.clone().unwrap_or_default()
    }

    pub fn classify(&self) -> ClassifyConfig {
        self.classify.clone().unwrap_or_default()
    }

    pub fn signatures(&self) -> SignaturesConfig {
        self.signatures.clone().unwrap_or_default()
    }

    pub fn to_effective(&self) -> Self {
        Self {
            log: Some(self.log().to_effective()),
            classify: Some(self.classify().to_effective()),
            signatures: Some(self.signatures().to_effective()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub log_level: Option<String>,
    pub log_color: Option<String>, // "on" | "off"
    pub run_prefix: Option<String>,
}

const CONFIG_FILENAME: &str = "triage.toml";
static CONFIG: OnceCell<Config> = OnceCell::new();

pub fn get_config_filename() -> &'static str {
    CONFIG_FILENAME
}

pub fn config() -> &'static Config {
    CONFIG.get_or_init(|| load_with_overrides(&CliOverrides::default()))
}

pub fn init_with_overrides(overrides: &CliOverrides) {
    let _ = CONFIG.set(load_with_overrides(overrides));
}

/// Resolve configuration from the nearest config file and CLI overrides
pub fn load_with_overrides(overrides: &CliOverrides) -> Config {
    let mut cfg = Config::default();

    // 1) Config file: walk up from cwd and use the first config file found
    if let Some(path) = find_nearest_config_file()
        && let Some(file_cfg) = read_config_file(&path)
    {
        apply_file_config(&mut cfg, &file_cfg);
    }

    // 2) CLI arguments (highest priority). Only override if user specified.
    apply_cli_overrides(&mut cfg, overrides);
    cfg
}

fn read_config_file(path: &Path) -> Option<Config> {
    match fs::read_to_string(path) {
        Ok(contents) => toml::from_str::<Config>(&contents).ok(),
        Err(_) => None,
    }
}

fn apply_file_config(cfg: &mut Config, file: &Config) {
    if let Some(file_log) = &file.log {
        let mut log = cfg.log.clone().unwrap_or_default();
        if file_log.level.is_some() {
            log.level = file_log.level.clone();
        }
        if file_log.color.is_some() {
            log.color = file_log.color;
        }
        cfg.log = Some(log);
    }

    if let Some(file_classify) = &file.classify {
        let mut classify = cfg.classify.clone().unwrap_or_default();
        if file_classify.run_prefix.is_some() {
            classify.run_prefix = file_classify.run_prefix.clone();
        }
        cfg.classify = Some(classify);
    }

    if let Some(file_sigs) = &file.signatures {
        let mut sigs = cfg.signatures.clone().unwrap_or_default();
        if let Some(expected) = &file_sigs.expected {
            let mut merged = sigs.expected();
            merged.extend(expected.iter().map(|(k, v)| (k.trim().to_string(), v.clone())));
            sigs.expected = Some(merged);
        }
        if let Some(phrases) = &file_sigs.not_implemented {
            sigs.not_implemented = Some(
                sigs.not_implemented()
                    .iter()
                    .chain(phrases.iter().filter(|p| !p.trim().is_empty()))
                    .cloned()
                    .collect(),
            );
        }
        if let Some(extra) = &file_sigs.extra {
            let mut rules = sigs.extra().to_vec();
            rules.extend(extra.iter().filter(|e| !e.name.trim().is_empty()).cloned());
            sigs.extra = Some(rules);
        }
        if file_sigs.inspect_cmd.is_some() {
            sigs.inspect_cmd = file_sigs.inspect_cmd.clone();
        }
        cfg.signatures = Some(sigs);
    }
}

fn apply_cli_overrides(cfg: &mut Config, overrides: &CliOverrides) {
    // Log overrides
    let mut log = cfg.log.clone().unwrap_or_default();
    if let Some(level) = &overrides.log_level
        && !level.trim().is_empty()
    {
        log.level = Some(level.trim().to_string());
    }
    if let Some(color_str) = &overrides.log_color {
        match color_str.to_lowercase().as_str() {
            "on" => log.color = Some(true),
            "off" => log.color = Some(false),
            _ => {}
        }
    }
    if overrides.log_level.is_some() || overrides.log_color.is_some() {
        cfg.log = Some(log);
    }

    if let Some(prefix) = &overrides.run_prefix {
        let mut classify = cfg.classify.clone().unwrap_or_default();
        classify.run_prefix = Some(prefix.clone());
        cfg.classify = Some(classify);
    }
}

fn find_nearest_config_file() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let config_filename = get_config_filename();
    for dir in cwd.ancestors() {
        let candidate = dir.join(config_filename);
        if candidate.exists() {
            return Some(candidate);
        }
    }
    None
}

pub fn colors_enabled() -> bool {
    match config().log().color() {
        Some(force) => force,
        None => console::colors_enabled(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_config_merges_expected_and_appends_lists() {
        let file: Config = toml::from_str(
            r#"
            [classify]
            run_prefix = "run-"

            [signatures]
            not_implemented = ["vtab unsupported", "  "]
            inspect_cmd = "sqlite3"

            [signatures.expected]
            " 42 " = "boom"

            [[signatures.extra]]
            name = "overflow"
            contains = "attempt to add with overflow"
            "#,
        )
        .unwrap();

        let mut cfg = Config::default();
        apply_file_config(&mut cfg, &file);

        assert_eq!(cfg.classify().run_prefix(), "run-");
        let sigs = cfg.signatures();
        assert_eq!(sigs.expected().get("42").map(String::as_str), Some("boom"));
        assert_eq!(sigs.not_implemented(), &["vtab unsupported".to_string()]);
        assert_eq!(sigs.extra().len(), 1);
        assert_eq!(sigs.inspect_cmd(), "sqlite3");
    }

    #[test]
    fn cli_overrides_take_precedence() {
        let mut cfg = Config {
            classify: Some(ClassifyConfig {
                run_prefix: Some("run-".to_string()),
            }),
            ..Config::default()
        };
        apply_cli_overrides(
            &mut cfg,
            &CliOverrides {
                log_level: Some(" debug ".to_string()),
                log_color: Some("OFF".to_string()),
                run_prefix: Some("iter-".to_string()),
            },
        );

        assert_eq!(cfg.log().level(), "debug");
        assert_eq!(cfg.log().color(), Some(false));
        assert_eq!(cfg.classify().run_prefix(), "iter-");
    }

    #[test]
    fn defaults_are_filled_in_effective_config() {
        let effective = Config::default().to_effective();
        assert_eq!(effective.log.unwrap().level.as_deref(), Some("info"));
        assert_eq!(
            effective.classify.unwrap().run_prefix.as_deref(),
            Some(DEFAULT_RUN_PREFIX)
        );
        assert_eq!(
            effective.signatures.unwrap().inspect_cmd.as_deref(),
            Some(DEFAULT_INSPECT_CMD)
        );
    }
}
