//! # sight-config
//!
//! Layered configuration loading for Sight using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SIGHT_*` prefix, `__` as separator)
//! 2. Project-level `.sight/config.toml`
//! 3. User-level `~/.config/sight/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `SIGHT_LAKE__PATH` -> `lake.path`, `SIGHT_GATE__POLICY` -> `gate.policy`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use sight_config::SightConfig;
//!
//! let config = SightConfig::load_with_dotenv().expect("config");
//! let contract = config.contract().expect("contract");
//! println!("staging: {}", config.lake.staging_table);
//! ```

mod contract;
mod error;
mod gate;
mod lake;

pub use contract::ContractConfig;
pub use error::ConfigError;
pub use gate::GateConfig;
pub use lake::{IN_MEMORY, LakeConfig};

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use sight_core::SchemaContract;

/// Project-local config directory name.
pub const PROJECT_DIR: &str = ".sight";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SightConfig {
    #[serde(default)]
    pub lake: LakeConfig,
    #[serde(default)]
    pub gate: GateConfig,
    #[serde(default)]
    pub contract: ContractConfig,
}

impl SightConfig {
    /// Load configuration from all sources, resolving the project file
    /// against the current directory.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."))
    }

    /// Load configuration for the project rooted at `project_root`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction or validation fails.
    pub fn load_from(project_root: &Path) -> Result<Self, ConfigError> {
        let config: Self = Self::figment_for(project_root).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction or validation fails.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain for the current directory.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        Self::figment_for(Path::new("."))
    }

    /// Build the figment provider chain for a project root.
    #[must_use]
    pub fn figment_for(project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = Self::project_config_path(project_root);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("SIGHT_").split("__"))
    }

    /// Check cross-field invariants that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for bad table names, an invalid contract, or
    /// an empty admissibility list.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.lake.validate()?;
        self.contract.to_contract()?;
        self.contract.validate_admissible()
    }

    /// The schema contract described by the `[contract]` section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Contract`] if the section is malformed.
    pub fn contract(&self) -> Result<SchemaContract, ConfigError> {
        self.contract.to_contract()
    }

    /// Resolve the lake path against a project root. `:memory:` and absolute
    /// paths are returned unchanged.
    #[must_use]
    pub fn lake_path(&self, project_root: &Path) -> String {
        if self.lake.is_in_memory() || Path::new(&self.lake.path).is_absolute() {
            return self.lake.path.clone();
        }
        project_root.join(&self.lake.path).display().to_string()
    }

    /// Path of the project-local config file.
    #[must_use]
    pub fn project_config_path(project_root: &Path) -> PathBuf {
        project_root.join(PROJECT_DIR).join("config.toml")
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("sight").join("config.toml"))
    }
}
