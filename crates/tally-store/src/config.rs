//! # Store Configuration
//!
//! Configuration for the in-memory store: simulated latency, stock policy
//! and display settings.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TALLY_LATENCY_MS=0                                                 │
//! │     TALLY_STOCK_POLICY=strict                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/tally-pos/store.toml (Linux)                             │
//! │     ~/Library/Application Support/com.tally.pos/store.toml (macOS)     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     300ms latency, clamp policy, seeded catalog                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # store.toml
//! [latency]
//! base_ms = 300        # list reads wait base/3, stock writes base/2
//!
//! [stock]
//! policy = "clamp"     # clamp | strict
//! reconcile_on_edit = false
//! low_stock_threshold = 10
//!
//! [display]
//! currency_symbol = "€"
//!
//! [seed]
//! enabled = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tally_core::{Money, DEFAULT_LOW_STOCK_THRESHOLD};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Stock Policy
// =============================================================================

/// What a sale does when it asks for more units than a size holds.
///
/// ```text
/// stock 3, sale of 5
///   Clamp  → stock 0, sale recorded (oversell allowed)
///   Strict → InsufficientStock, nothing recorded
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockPolicy {
    /// Floor the decrement at zero.
    #[default]
    Clamp,

    /// Reject the whole sale.
    Strict,
}

impl std::fmt::Display for StockPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockPolicy::Clamp => write!(f, "clamp"),
            StockPolicy::Strict => write!(f, "strict"),
        }
    }
}

impl std::str::FromStr for StockPolicy {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clamp" | "lenient" => Ok(StockPolicy::Clamp),
            "strict" => Ok(StockPolicy::Strict),
            other => Err(StoreError::InvalidConfig(format!(
                "Unknown stock policy: '{}'. Valid options: clamp, strict",
                other
            ))),
        }
    }
}

// =============================================================================
// Latency
// =============================================================================

/// Kind of store call, used to pick the simulated delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyKind {
    /// Regular call: full base delay.
    Standard,

    /// Reference list reads: a third of the base delay.
    List,

    /// Stock writes: half of the base delay.
    Stock,
}

/// Simulated network latency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencySettings {
    /// Base delay in milliseconds. Zero disables latency.
    #[serde(default = "default_base_ms")]
    pub base_ms: u64,
}

fn default_base_ms() -> u64 {
    300
}

impl Default for LatencySettings {
    fn default() -> Self {
        LatencySettings {
            base_ms: default_base_ms(),
        }
    }
}

// =============================================================================
// Stock Settings
// =============================================================================

/// Stock ledger behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSettings {
    #[serde(default)]
    pub policy: StockPolicy,

    /// Give back `original - edited` units when an admin edits a sale.
    #[serde(default)]
    pub reconcile_on_edit: bool,

    /// Totals at or below this count as low stock.
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
}

fn default_low_stock_threshold() -> i64 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

impl Default for StockSettings {
    fn default() -> Self {
        StockSettings {
            policy: StockPolicy::default(),
            reconcile_on_edit: false,
            low_stock_threshold: default_low_stock_threshold(),
        }
    }
}

// =============================================================================
// Display & Seed Settings
// =============================================================================

/// Display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String {
    "€".to_string()
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_symbol: default_currency_symbol(),
        }
    }
}

/// Seed catalog toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SeedSettings {
    fn default() -> Self {
        SeedSettings { enabled: true }
    }
}

// =============================================================================
// Store Configuration
// =============================================================================

/// Complete store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub latency: LatencySettings,

    #[serde(default)]
    pub stock: StockSettings,

    #[serde(default)]
    pub display: DisplaySettings,

    #[serde(default)]
    pub seed: SeedSettings,
}

impl StoreConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero-latency config with the seed catalog. Used by tests and tools.
    pub fn instant() -> Self {
        let mut config = Self::default();
        config.latency.base_ms = 0;
        config
    }

    /// Builder-style stock policy override.
    pub fn with_stock_policy(mut self, policy: StockPolicy) -> Self {
        self.stock.policy = policy;
        self
    }

    /// Builder-style reconcile-on-edit override.
    pub fn with_reconcile_on_edit(mut self, enabled: bool) -> Self {
        self.stock.reconcile_on_edit = enabled;
        self
    }

    /// Builder-style seed toggle.
    pub fn with_seed(mut self, enabled: bool) -> Self {
        self.seed.enabled = enabled;
        self
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (store.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading store config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load store config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> StoreResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StoreError::InvalidConfig("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Store config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StoreResult<()> {
        if self.stock.low_stock_threshold < 0 {
            return Err(StoreError::InvalidConfig(
                "low_stock_threshold must not be negative".into(),
            ));
        }

        if self.display.currency_symbol.trim().is_empty() {
            return Err(StoreError::InvalidConfig(
                "currency_symbol must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(ms) = std::env::var("TALLY_LATENCY_MS") {
            match ms.parse::<u64>() {
                Ok(ms) => {
                    debug!(base_ms = ms, "Overriding latency from environment");
                    self.latency.base_ms = ms;
                }
                Err(_) => warn!(value = %ms, "Invalid TALLY_LATENCY_MS in environment"),
            }
        }

        if let Ok(policy) = std::env::var("TALLY_STOCK_POLICY") {
            match policy.parse() {
                Ok(parsed) => {
                    debug!(policy = %policy, "Overriding stock policy from environment");
                    self.stock.policy = parsed;
                }
                Err(_) => warn!(policy = %policy, "Unknown stock policy in environment"),
            }
        }

        if let Ok(flag) = std::env::var("TALLY_RECONCILE_ON_EDIT") {
            if let Some(enabled) = parse_flag(&flag) {
                self.stock.reconcile_on_edit = enabled;
            }
        }

        if let Ok(threshold) = std::env::var("TALLY_LOW_STOCK_THRESHOLD") {
            if let Ok(t) = threshold.parse::<i64>() {
                self.stock.low_stock_threshold = t;
            }
        }

        if let Ok(symbol) = std::env::var("TALLY_CURRENCY_SYMBOL") {
            self.display.currency_symbol = symbol;
        }

        if let Ok(flag) = std::env::var("TALLY_SEED") {
            if let Some(enabled) = parse_flag(&flag) {
                self.seed.enabled = enabled;
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tally", "pos").map(|dirs| {
            let config_dir = dirs.config_dir();
            config_dir.join("store.toml")
        })
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Simulated delay for a call of the given kind.
    pub fn delay(&self, kind: LatencyKind) -> Duration {
        let base = self.latency.base_ms;
        let ms = match kind {
            LatencyKind::Standard => base,
            LatencyKind::List => base / 3,
            LatencyKind::Stock => base / 2,
        };
        Duration::from_millis(ms)
    }

    /// Formats an amount with the configured symbol: `€19.99`, `-€5.50`.
    pub fn format_currency(&self, amount: Money) -> String {
        let symbol = &self.display.currency_symbol;
        if amount.is_negative() {
            format!("-{}{}", symbol, Money::from_cents(-amount.cents()))
        } else {
            format!("{}{}", symbol, amount)
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            warn!(value = %other, "Unrecognized boolean in environment");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_policy_parsing() {
        assert_eq!("clamp".parse::<StockPolicy>().unwrap(), StockPolicy::Clamp);
        assert_eq!("STRICT".parse::<StockPolicy>().unwrap(), StockPolicy::Strict);
        assert!("maybe".parse::<StockPolicy>().is_err());
        assert_eq!(StockPolicy::Strict.to_string(), "strict");
    }

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.latency.base_ms, 300);
        assert_eq!(config.stock.policy, StockPolicy::Clamp);
        assert!(!config.stock.reconcile_on_edit);
        assert_eq!(config.stock.low_stock_threshold, 10);
        assert!(config.seed.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_delays() {
        let config = StoreConfig::default();
        assert_eq!(config.delay(LatencyKind::Standard), Duration::from_millis(300));
        assert_eq!(config.delay(LatencyKind::List), Duration::from_millis(100));
        assert_eq!(config.delay(LatencyKind::Stock), Duration::from_millis(150));

        let instant = StoreConfig::instant();
        assert_eq!(instant.delay(LatencyKind::Standard), Duration::ZERO);
    }

    #[test]
    fn test_config_validation() {
        let mut config = StoreConfig::default();
        config.stock.low_stock_threshold = -1;
        assert!(config.validate().is_err());

        let mut config = StoreConfig::default();
        config.display.currency_symbol = " ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_format_currency() {
        let config = StoreConfig::default();
        assert_eq!(config.format_currency(Money::from_cents(1999)), "€19.99");
        assert_eq!(config.format_currency(Money::from_cents(-550)), "-€5.50");
        assert_eq!(config.format_currency(Money::zero()), "€0.00");
    }

    #[test]
    fn test_toml_roundtrip_with_partial_file() {
        let config: StoreConfig = toml::from_str("[stock]\npolicy = \"strict\"\n").unwrap();
        assert_eq!(config.stock.policy, StockPolicy::Strict);
        assert_eq!(config.latency.base_ms, 300);
        assert_eq!(config.display.currency_symbol, "€");

        let toml_str = toml::to_string_pretty(&StoreConfig::default()).unwrap();
        assert!(toml_str.contains("[latency]"));
        assert!(toml_str.contains("[stock]"));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("tally-store-{}.toml", uuid::Uuid::new_v4()));
        let config = StoreConfig::instant().with_reconcile_on_edit(true);
        config.save(Some(path.clone())).unwrap();

        let loaded = StoreConfig::load(Some(path.clone())).unwrap();
        assert!(loaded.stock.reconcile_on_edit);

        std::fs::remove_file(path).unwrap();
    }
}
