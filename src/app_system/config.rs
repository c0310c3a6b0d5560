use std::env::VarError;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::{parse_ether, AccountId, Amount, UnitError};

/// Environment variable naming a TOML configuration file.
pub const CONFIG_ENV: &str = "MARKETPLACE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid balance for account {account}: {source}")]
    Balance {
        account: String,
        #[source]
        source: UnitError,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Root configuration of the marketplace.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketplaceConfig {
    /// Display name of the marketplace
    pub name: String,
    /// Capacity of the ledger's request mailbox
    pub mailbox_capacity: usize,
    /// Events a slow subscriber may fall behind before it lags
    pub event_capacity: usize,
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
    /// Accounts funded at startup
    pub accounts: Vec<GenesisAccount>,
}

/// An account funded when the ledger starts.
#[derive(Debug, Clone, Deserialize)]
pub struct GenesisAccount {
    pub id: String,
    /// Balance in ether, e.g. "100" or "0.5"
    pub balance: String,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            name: "Dapp".to_string(),
            mailbox_capacity: 32,
            event_capacity: 64,
            log_level: "info".to_string(),
            accounts: Vec::new(),
        }
    }
}

impl MarketplaceConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Loads the file named by `MARKETPLACE_CONFIG`, or the defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_var(std::env::var(CONFIG_ENV))
    }

    fn from_var(var: Result<String, VarError>) -> Result<Self, ConfigError> {
        match var {
            Ok(path) => Self::load(path),
            Err(VarError::NotPresent) => Ok(Self::default()),
            Err(VarError::NotUnicode(path)) => Err(ConfigError::Invalid(format!(
                "{CONFIG_ENV} is not valid unicode: {}",
                path.to_string_lossy()
            ))),
        }
    }

    /// Genesis balances converted to wei.
    pub fn genesis_balances(&self) -> Result<Vec<(AccountId, Amount)>, ConfigError> {
        self.accounts
            .iter()
            .map(|account| {
                let balance = parse_ether(&account.balance).map_err(|source| ConfigError::Balance {
                    account: account.id.clone(),
                    source,
                })?;
                Ok((AccountId::new(account.id.as_str()), balance))
            })
            .collect()
    }

    /// Rejects capacities of zero, blank account ids and unparsable balances.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.mailbox_capacity == 0 {
            return Err(ConfigError::Invalid("mailbox_capacity must be positive".to_string()));
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::Invalid("event_capacity must be positive".to_string()));
        }
        if let Some(account) = self.accounts.iter().find(|a| a.id.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("blank account id with balance {}", account.balance)));
        }
        self.genesis_balances().map(|_| ())
    }
}
