//! Configuration loading and typed config structures for the Yardsale simulation.
//!
//! The canonical configuration lives in `yardsale-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, a loader that reads the file, and [`SimulationConfig::validate`]
//! which rejects values outside their natural domains before an engine is
//! ever built from them.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A configured value lies outside its natural domain.
    #[error("invalid configuration: {field} {reason}")]
    Invalid {
        /// Dotted path of the offending field (e.g. `population.n_agents`).
        field: &'static str,
        /// What is wrong with the value.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `yardsale-config.yaml`. Every field has a
/// default, so an empty document yields the standard 100-agent setup with
/// all redistribution policies switched off.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Population size, starting wealth, and style mix.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Exchange rule parameters.
    #[serde(default)]
    pub exchange: ExchangeConfig,

    /// Progressive wealth tax on the richest agents.
    #[serde(default)]
    pub wealth_tax: WealthTaxConfig,

    /// Flat universal basic income.
    #[serde(default)]
    pub ubi: UbiConfig,

    /// Wealth floor for active agents.
    #[serde(default)]
    pub safety_net: SafetyNetConfig,

    /// Run bounds and seeding.
    #[serde(default)]
    pub run: RunConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Results output.
    #[serde(default)]
    pub output: OutputConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for the run section:
    /// - `YARDSALE_SEED` overrides `run.seed`
    /// - `YARDSALE_MAX_ROUNDS` overrides `run.max_rounds`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.run.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.run.apply_env_overrides();
        Ok(config)
    }

    /// Implied share of contrarian agents.
    pub const fn contrarian_ratio(&self) -> f64 {
        1.0 - self.population.greedy_ratio - self.population.neutral_ratio
    }

    /// Names of the redistribution policies that are switched on.
    pub fn active_policies(&self) -> Vec<&'static str> {
        let mut policies = Vec::new();
        if self.wealth_tax.enabled {
            policies.push("wealth_tax");
        }
        if self.ubi.enabled {
            policies.push("ubi");
        }
        if self.safety_net.enabled {
            policies.push("safety_net");
        }
        policies
    }

    /// Check every value against its natural domain.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.population;
        if p.n_agents == 0 {
            return Err(invalid("population.n_agents", "must be at least 1"));
        }
        if !p.initial_wealth.is_finite() || p.initial_wealth <= 0.0 {
            return Err(invalid(
                "population.initial_wealth",
                format!("must be a positive number, got {}", p.initial_wealth),
            ));
        }
        check_unit("population.greedy_ratio", p.greedy_ratio)?;
        check_unit("population.neutral_ratio", p.neutral_ratio)?;
        if p.greedy_ratio + p.neutral_ratio > 1.0 {
            return Err(invalid(
                "population.neutral_ratio",
                format!(
                    "greedy and neutral ratios sum to {} which exceeds 1.0",
                    p.greedy_ratio + p.neutral_ratio
                ),
            ));
        }

        let bias = self.exchange.rich_bias;
        if !(0.0..=0.5).contains(&bias) {
            return Err(invalid(
                "exchange.rich_bias",
                format!("must be within [0, 0.5], got {bias}"),
            ));
        }
        check_non_negative("exchange.min_wealth", self.exchange.min_wealth)?;

        check_unit("wealth_tax.threshold", self.wealth_tax.threshold)?;
        check_unit("wealth_tax.rate", self.wealth_tax.rate)?;
        check_non_negative("ubi.amount", self.ubi.amount)?;
        check_non_negative("safety_net.floor", self.safety_net.floor)?;

        if self.run.batch_size == 0 {
            return Err(invalid("run.batch_size", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn check_unit(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("must be within [0, 1], got {value}")))
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(
            field,
            format!("must be a non-negative number, got {value}"),
        ))
    }
}

/// Population configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PopulationConfig {
    /// Number of agents created on every reset.
    #[serde(default = "default_n_agents")]
    pub n_agents: u32,

    /// Wealth every agent starts with.
    #[serde(default = "default_initial_wealth")]
    pub initial_wealth: f64,

    /// Share of greedy agents (30% stake).
    #[serde(default = "default_style_ratio")]
    pub greedy_ratio: f64,

    /// Share of neutral agents (20% stake). The remainder is contrarian.
    #[serde(default = "default_style_ratio")]
    pub neutral_ratio: f64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            n_agents: default_n_agents(),
            initial_wealth: default_initial_wealth(),
            greedy_ratio: default_style_ratio(),
            neutral_ratio: default_style_ratio(),
        }
    }
}

/// Exchange rule configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExchangeConfig {
    /// Added to the richer agent's 50% win probability.
    #[serde(default = "default_rich_bias")]
    pub rich_bias: f64,

    /// Agents whose wealth falls below this go bankrupt.
    #[serde(default = "default_min_wealth")]
    pub min_wealth: f64,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            rich_bias: default_rich_bias(),
            min_wealth: default_min_wealth(),
        }
    }
}

/// Wealth tax configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WealthTaxConfig {
    /// Whether the tax is levied each round.
    #[serde(default)]
    pub enabled: bool,

    /// Fraction of the active population (richest first) that is taxed.
    #[serde(default = "default_tax_threshold")]
    pub threshold: f64,

    /// Fraction of wealth taken from each taxed agent per round.
    #[serde(default = "default_tax_rate")]
    pub rate: f64,
}

impl Default for WealthTaxConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold: default_tax_threshold(),
            rate: default_tax_rate(),
        }
    }
}

/// Universal basic income configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UbiConfig {
    /// Whether UBI is paid each round.
    #[serde(default)]
    pub enabled: bool,

    /// Flat amount paid to every active agent per round.
    #[serde(default = "default_ubi_amount")]
    pub amount: f64,
}

impl Default for UbiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            amount: default_ubi_amount(),
        }
    }
}

/// Safety net configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SafetyNetConfig {
    /// Whether the floor is enforced each round.
    #[serde(default)]
    pub enabled: bool,

    /// Active agents below this wealth are raised to it.
    #[serde(default = "default_safety_net_floor")]
    pub floor: f64,
}

impl Default for SafetyNetConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            floor: default_safety_net_floor(),
        }
    }
}

/// Run bounds and seeding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Seed for the random generator. `None` seeds from the OS.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Stop after this many rounds. 0 means run until terminal.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u64,

    /// Rounds executed per batch between progress callbacks.
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
}

impl RunConfig {
    /// Apply environment variable overrides for the run section.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("YARDSALE_SEED") {
            match val.trim().parse::<u64>() {
                Ok(seed) => self.seed = Some(seed),
                Err(_) => warn!(value = %val, "Ignoring unparseable YARDSALE_SEED"),
            }
        }
        if let Some(val) = lookup("YARDSALE_MAX_ROUNDS") {
            match val.trim().parse::<u64>() {
                Ok(rounds) => self.max_rounds = rounds,
                Err(_) => warn!(value = %val, "Ignoring unparseable YARDSALE_MAX_ROUNDS"),
            }
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_rounds: default_max_rounds(),
            batch_size: default_batch_size(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default log level when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON log lines instead of the human-readable format.
    #[serde(default)]
    pub json: bool,

    /// Log a progress line every this many rounds.
    #[serde(default = "default_report_interval")]
    pub report_interval: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            report_interval: default_report_interval(),
        }
    }
}

/// Results output configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// Where to write the final results snapshot as JSON, if anywhere.
    #[serde(default)]
    pub results_path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

const fn default_n_agents() -> u32 {
    100
}

const fn default_initial_wealth() -> f64 {
    100.0
}

const fn default_style_ratio() -> f64 {
    0.33
}

const fn default_rich_bias() -> f64 {
    0.05
}

const fn default_min_wealth() -> f64 {
    0.1
}

const fn default_tax_threshold() -> f64 {
    0.10
}

const fn default_tax_rate() -> f64 {
    0.02
}

const fn default_ubi_amount() -> f64 {
    1.0
}

const fn default_safety_net_floor() -> f64 {
    10.0
}

const fn default_max_rounds() -> u64 {
    10_000
}

const fn default_batch_size() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_report_interval() -> u64 {
    1000
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_reference_values() {
        let config = SimulationConfig::default();
        assert_eq!(config.population.n_agents, 100);
        assert_eq!(config.population.initial_wealth, 100.0);
        assert_eq!(config.population.greedy_ratio, 0.33);
        assert_eq!(config.exchange.rich_bias, 0.05);
        assert_eq!(config.exchange.min_wealth, 0.1);
        assert!(!config.wealth_tax.enabled);
        assert_eq!(config.wealth_tax.threshold, 0.10);
        assert_eq!(config.ubi.amount, 1.0);
        assert_eq!(config.safety_net.floor, 10.0);
        assert_eq!(config.run.seed, None);
        assert_eq!(config.run.max_rounds, 10_000);
        assert!(config.output.results_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
population:
  n_agents: 50
  initial_wealth: 20.0
  greedy_ratio: 0.5
  neutral_ratio: 0.25

exchange:
  rich_bias: 0.1
  min_wealth: 0.5

wealth_tax:
  enabled: true
  threshold: 0.2
  rate: 0.05

ubi:
  enabled: true
  amount: 2.5

safety_net:
  enabled: true
  floor: 5.0

run:
  seed: 99
  max_rounds: 500
  batch_size: 25

logging:
  level: "debug"
  json: true
  report_interval: 50

output:
  results_path: "results.json"
"#;

        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.population.n_agents, 50);
        assert_eq!(config.population.neutral_ratio, 0.25);
        assert_eq!(config.exchange.min_wealth, 0.5);
        assert!(config.wealth_tax.enabled);
        assert_eq!(config.wealth_tax.rate, 0.05);
        assert_eq!(config.ubi.amount, 2.5);
        assert_eq!(config.safety_net.floor, 5.0);
        assert_eq!(config.run.batch_size, 25);
        assert!(config.logging.json);
        assert_eq!(
            config.output.results_path.as_deref(),
            Some(Path::new("results.json"))
        );
        assert_eq!(config.active_policies(), vec!["wealth_tax", "ubi", "safety_net"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = SimulationConfig::parse("ubi:\n  enabled: true\n").unwrap();
        assert!(config.ubi.enabled);
        assert_eq!(config.ubi.amount, 1.0);
        assert_eq!(config.population.n_agents, 100);
        assert_eq!(config.active_policies(), vec!["ubi"]);
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(SimulationConfig::parse("").is_ok());
    }

    #[test]
    fn contrarian_ratio_is_the_remainder() {
        let mut config = SimulationConfig::default();
        config.population.greedy_ratio = 1.0;
        config.population.neutral_ratio = 0.0;
        assert_eq!(config.contrarian_ratio(), 0.0);
    }

    #[test]
    fn validate_rejects_ratio_sum_above_one() {
        let mut config = SimulationConfig::default();
        config.population.greedy_ratio = 0.7;
        config.population.neutral_ratio = 0.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "population.neutral_ratio",
                ..
            })
        ));
    }

    #[test]
    fn validate_rejects_out_of_domain_values() {
        let cases: [(&str, fn(&mut SimulationConfig)); 10] = [
            ("population.n_agents", |c| c.population.n_agents = 0),
            ("population.initial_wealth", |c| {
                c.population.initial_wealth = -1.0;
            }),
            ("population.greedy_ratio", |c| c.population.greedy_ratio = 1.5),
            ("exchange.rich_bias", |c| c.exchange.rich_bias = 0.6),
            ("exchange.min_wealth", |c| c.exchange.min_wealth = f64::NAN),
            ("wealth_tax.rate", |c| c.wealth_tax.rate = -0.02),
            ("wealth_tax.threshold", |c| c.wealth_tax.threshold = 2.0),
            ("ubi.amount", |c| c.ubi.amount = -1.0),
            ("safety_net.floor", |c| c.safety_net.floor = f64::INFINITY),
            ("run.batch_size", |c| c.run.batch_size = 0),
        ];

        for (expected, mutate) in cases {
            let mut config = SimulationConfig::default();
            mutate(&mut config);
            match config.validate() {
                Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected {expected} to be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn run_overrides_from_lookup() {
        let mut run = RunConfig::default();
        run.apply_overrides_from(|key| match key {
            "YARDSALE_SEED" => Some("1234".to_owned()),
            "YARDSALE_MAX_ROUNDS" => Some(" 77 ".to_owned()),
            _ => None,
        });
        assert_eq!(run.seed, Some(1234));
        assert_eq!(run.max_rounds, 77);
    }

    #[test]
    fn unparseable_overrides_are_ignored() {
        let mut run = RunConfig::default();
        run.apply_overrides_from(|key| match key {
            "YARDSALE_SEED" => Some("not-a-number".to_owned()),
            _ => None,
        });
        assert_eq!(run.seed, None);
        assert_eq!(run.max_rounds, 10_000);
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("yardsale-config.yaml");
        if path.exists() {
            let config = SimulationConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
