//! Configuration wizard and store creation.

use crate::{
    db::db::Db,
    libs::{
        config::{Config, CONFIG_FILE_NAME},
        data_storage::DataStorage,
        messages::Message,
    },
    msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use std::fs;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Remove the existing configuration instead of creating a new one
    #[arg(short, long)]
    delete: bool,
}

pub fn cmd(init_args: InitArgs) -> Result<()> {
    let storage = DataStorage::new();

    if init_args.delete {
        let config_path = storage.get_path(CONFIG_FILE_NAME)?;
        if config_path.exists() {
            fs::remove_file(&config_path)?;
            msg_success!(Message::ConfigDeleted);
        } else {
            msg_info!(Message::ConfigNotFound);
        }
        return Ok(());
    }

    let config = Config::init()?;
    config.save_to(&storage)?;
    msg_success!(Message::ConfigSaved);

    // Opening creates the file and applies the schema.
    let db_path = config.database_path(&storage)?;
    Db::open(&db_path)?;
    msg_success!(Message::DatabaseReady(db_path.display().to_string()));

    Ok(())
}
