//! Configuration management for the kitty application.
//!
//! Settings live in a JSON file inside the platform data directory resolved by
//! [`DataStorage`]. Every section is optional; a missing section (or a missing
//! file) falls back to the defaults below, so the application runs without
//! any setup.
//!
//! ## Sections
//!
//! - **database**: file name of the SQLite store inside the data directory
//! - **history**: how many runs `kitty history` shows by default
//! - **diary**: how many recent entries feed the mood statistics
//! - **roulette**: how many display picks precede the final draw
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use kitty::libs::config::Config;
//!
//! let config = Config::read()?;
//! println!("showing {} runs", config.history_limit());
//!
//! let updated = Config::init()?;
//! updated.save()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "config.json";

/// A configurable section offered by the setup wizard.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DatabaseConfig {
    /// SQLite file name, resolved inside the data directory.
    pub file_name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HistoryConfig {
    /// Number of runs listed by default.
    pub limit: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DiaryConfig {
    /// Number of most recent entries used by the mood statistics.
    pub stats_window: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RouletteConfig {
    /// Display-only picks shown before the final draw.
    pub display_spins: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<HistoryConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diary: Option<DiaryConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub roulette: Option<RouletteConfig>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            file_name: "kitty.db".to_string(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig { limit: 50 }
    }
}

impl Default for DiaryConfig {
    fn default() -> Self {
        DiaryConfig { stats_window: 7 }
    }
}

impl Default for RouletteConfig {
    fn default() -> Self {
        RouletteConfig { display_spins: 20 }
    }
}

impl Config {
    /// Reads the configuration from the default data directory.
    pub fn read() -> Result<Config> {
        Self::read_from(&DataStorage::new())
    }

    /// Reads the configuration from `storage`, returning defaults when no
    /// file exists yet.
    pub fn read_from(storage: &DataStorage) -> Result<Config> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&DataStorage::new())
    }

    pub fn save_to(&self, storage: &DataStorage) -> Result<()> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Absolute path of the SQLite store inside `storage`.
    pub fn database_path(&self, storage: &DataStorage) -> Result<PathBuf> {
        let file_name = self.database.clone().unwrap_or_default().file_name;
        Ok(storage.get_path(&file_name)?)
    }

    pub fn history_limit(&self) -> u32 {
        self.history.clone().unwrap_or_default().limit
    }

    pub fn stats_window(&self) -> usize {
        self.diary.clone().unwrap_or_default().stats_window as usize
    }

    pub fn display_spins(&self) -> usize {
        self.roulette.clone().unwrap_or_default().display_spins as usize
    }

    /// Interactive setup wizard. Existing values are offered as defaults.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = vec![
            ConfigModule {
                key: "database".to_string(),
                name: "Database".to_string(),
            },
            ConfigModule {
                key: "history".to_string(),
                name: "History".to_string(),
            },
            ConfigModule {
                key: "diary".to_string(),
                name: "Diary".to_string(),
            },
            ConfigModule {
                key: "roulette".to_string(),
                name: "Roulette".to_string(),
            },
        ];

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "database" => {
                    let default = config.database.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleDatabase);
                    config.database = Some(DatabaseConfig {
                        file_name: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptDatabaseFileName.to_string())
                            .default(default.file_name)
                            .interact_text()?,
                    });
                }
                "history" => {
                    let default = config.history.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleHistory);
                    config.history = Some(HistoryConfig {
                        limit: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptHistoryLimit.to_string())
                            .default(default.limit)
                            .interact_text()?,
                    });
                }
                "diary" => {
                    let default = config.diary.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleDiary);
                    config.diary = Some(DiaryConfig {
                        stats_window: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptStatsWindow.to_string())
                            .default(default.stats_window)
                            .interact_text()?,
                    });
                }
                "roulette" => {
                    let default = config.roulette.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleRoulette);
                    config.roulette = Some(RouletteConfig {
                        display_spins: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptDisplaySpins.to_string())
                            .default(default.display_spins)
                            .interact_text()?,
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
