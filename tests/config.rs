#[cfg(test)]
mod tests {
    use kitty::libs::config::{Config, DatabaseConfig, DiaryConfig, RouletteConfig, CONFIG_FILE_NAME};
    use kitty::libs::data_storage::DataStorage;
    use std::fs;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ConfigTestContext {
        temp_dir: TempDir,
        storage: DataStorage,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let storage = DataStorage::at(temp_dir.path().join("kitty"));
            ConfigTestContext { temp_dir, storage }
        }
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_missing_file_gives_defaults(ctx: &mut ConfigTestContext) {
        let config = Config::read_from(&ctx.storage).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.history_limit(), 50);
        assert_eq!(config.stats_window(), 7);
        assert_eq!(config.display_spins(), 20);
        assert_eq!(
            config.database_path(&ctx.storage).unwrap(),
            ctx.temp_dir.path().join("kitty").join("kitty.db")
        );
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read_back(ctx: &mut ConfigTestContext) {
        let config = Config {
            database: Some(DatabaseConfig {
                file_name: "routines.db".to_string(),
            }),
            diary: Some(DiaryConfig { stats_window: 14 }),
            roulette: Some(RouletteConfig { display_spins: 5 }),
            ..Default::default()
        };

        config.save_to(&ctx.storage).unwrap();
        let loaded = Config::read_from(&ctx.storage).unwrap();

        assert_eq!(loaded, config);
        assert_eq!(loaded.history_limit(), 50);
        assert_eq!(loaded.stats_window(), 14);
        assert!(loaded.database_path(&ctx.storage).unwrap().ends_with("routines.db"));
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_partial_file(ctx: &mut ConfigTestContext) {
        let path = ctx.storage.get_path(CONFIG_FILE_NAME).unwrap();
        fs::write(&path, r#"{ "history": { "limit": 10 } }"#).unwrap();

        let config = Config::read_from(&ctx.storage).unwrap();
        assert_eq!(config.history_limit(), 10);
        assert_eq!(config.display_spins(), 20);
        assert!(config.database.is_none());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_broken_file_is_an_error(ctx: &mut ConfigTestContext) {
        let path = ctx.storage.get_path(CONFIG_FILE_NAME).unwrap();
        fs::write(&path, "not json").unwrap();

        assert!(Config::read_from(&ctx.storage).is_err());
    }
}
