use linewright_engine::{
    CommandOptions, DEFAULT_TIMESTAMP_FORMAT, RuleNameError, RuleOptions, RuleSet, RuleSetId,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Rule set '{rule_set}': {source}")]
    UnknownRule {
        rule_set: String,
        source: RuleNameError,
    },

    #[error("No rule set named '{0}'")]
    UnknownRuleSet(String),
}

/// A named, ordered list of catalog rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSetConfig {
    pub name: String,
    pub rules: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub include_every_line: bool,
    pub auto_save_after_edit: bool,
    pub comment_prefixes: Vec<String>,
    pub add_extra_line_at_end_on_block_comment: bool,
    pub timestamp_format: String,
    pub rule_sets: Vec<RuleSetConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include_every_line: false,
            auto_save_after_edit: false,
            comment_prefixes: vec!["//".to_string()],
            add_extra_line_at_end_on_block_comment: false,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            rule_sets: Vec::new(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Rule names are checked up front so a typo surfaces at load time
        config.check_rule_sets()?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/linewright");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Rule options for one invocation, stamped with the current time.
    pub fn rule_options(&self) -> RuleOptions {
        RuleOptions {
            comment_prefixes: self.comment_prefixes.clone(),
            add_extra_line_at_end_on_block_comment: self.add_extra_line_at_end_on_block_comment,
            ..RuleOptions::default()
        }
        .stamped_now(&self.timestamp_format)
    }

    pub fn command_options(&self) -> CommandOptions {
        CommandOptions {
            include_every_line: self.include_every_line,
            auto_save_after_edit: self.auto_save_after_edit,
        }
    }

    /// Resolves `name` to a rule set. User-defined sets shadow built-in
    /// commands of the same name.
    pub fn rule_set(&self, name: &str, options: &RuleOptions) -> Result<RuleSet, ConfigError> {
        if let Some(custom) = self.rule_sets.iter().find(|set| set.name == name) {
            return RuleSet::from_names(&custom.name, custom.rules.as_slice(), options).map_err(
                |source| ConfigError::UnknownRule {
                    rule_set: custom.name.clone(),
                    source,
                },
            );
        }
        name.parse::<RuleSetId>()
            .map(|id| RuleSet::builtin(id, options))
            .map_err(|_| ConfigError::UnknownRuleSet(name.to_string()))
    }

    fn check_rule_sets(&self) -> Result<(), ConfigError> {
        let options = RuleOptions::default();
        for set in &self.rule_sets {
            self.rule_set(&set.name, &options)?;
        }
        Ok(())
    }
}
