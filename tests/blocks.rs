#[cfg(test)]
mod tests {
    use kitty::db::blocks::Blocks;
    use kitty::db::calendar::Calendar;
    use kitty::db::db::Db;
    use kitty::libs::block::{BlockDraft, BlockItem, BlockType, OPTION_DESCRIPTION};
    use kitty::libs::calendar::{EventType, NewEvent};
    use kitty::libs::error::CoreError;
    use chrono::NaiveDate;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct BlockTestContext {
        _temp_dir: TempDir,
        db_path: PathBuf,
    }

    impl TestContext for BlockTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("kitty.db");
            BlockTestContext {
                _temp_dir: temp_dir,
                db_path,
            }
        }
    }

    impl BlockTestContext {
        fn blocks(&self) -> Blocks {
            Blocks::open(&self.db_path).unwrap()
        }

        fn count(&self, sql: &str) -> i64 {
            let db = Db::open(&self.db_path).unwrap();
            db.conn.query_row(sql, [], |row| row.get(0)).unwrap()
        }
    }

    fn workout() -> BlockDraft {
        BlockDraft::roulette(
            "Workout",
            "",
            vec![
                BlockItem::new("Run").with_minutes(30),
                BlockItem::new("Yoga").with_minutes(20).with_subtasks(&["Mat", "Stretch"]),
            ],
        )
    }

    #[test_context(BlockTestContext)]
    #[test]
    fn test_create_standard_block(ctx: &mut BlockTestContext) {
        let mut blocks = ctx.blocks();
        let draft = BlockDraft::standard(
            "  Morning  ",
            "wake up",
            15,
            vec![BlockItem::new(" Wash "), BlockItem::new("   "), BlockItem::new("Dress")],
        );

        let id = blocks.create(&draft).unwrap();
        let detail = blocks.get_with_children(id).unwrap();

        assert_eq!(detail.block.name, "Morning");
        assert_eq!(detail.block.block_type, BlockType::Standard);
        assert_eq!(detail.block.estimated_minutes, 15);
        assert_eq!(detail.block.parent_id, None);
        let names: Vec<&str> = detail.subtasks.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Wash", "Dress"]);
        assert_eq!(detail.subtasks[0].position, 0);
        assert_eq!(detail.subtasks[1].position, 1);
        assert!(detail.options.is_empty());
    }

    #[test_context(BlockTestContext)]
    #[test]
    fn test_create_roulette_with_options(ctx: &mut BlockTestContext) {
        let mut blocks = ctx.blocks();
        let mut draft = workout();
        draft.estimated_minutes = 99;

        let id = blocks.create(&draft).unwrap();
        let detail = blocks.get_with_children(id).unwrap();

        assert!(detail.block.is_roulette());
        assert_eq!(detail.block.estimated_minutes, 0);
        assert!(detail.subtasks.is_empty());
        assert_eq!(detail.options.len(), 2);

        let run = &detail.options[0];
        assert_eq!(run.block.name, "Run");
        assert_eq!(run.block.parent_id, Some(id));
        assert_eq!(run.block.block_type, BlockType::Standard);
        assert_eq!(run.block.estimated_minutes, 30);
        assert_eq!(run.block.description, OPTION_DESCRIPTION);
        assert!(run.subtasks.is_empty());

        let yoga = &detail.options[1];
        assert_eq!(yoga.block.estimated_minutes, 20);
        let names: Vec<&str> = yoga.subtasks.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Mat", "Stretch"]);

        assert_eq!(ctx.count("SELECT COUNT(*) FROM blocks"), 3);
        assert_eq!(ctx.count("SELECT COUNT(*) FROM subtasks"), 2);
    }

    #[test_context(BlockTestContext)]
    #[test]
    fn test_create_rejects_blank_name_and_empty_items(ctx: &mut BlockTestContext) {
        let mut blocks = ctx.blocks();

        let blank_name = BlockDraft::standard("   ", "", 0, vec![BlockItem::new("Wash")]);
        assert!(blocks.create(&blank_name).unwrap_err().is_validation());

        let no_items = BlockDraft::standard("Morning", "", 0, vec![BlockItem::new(" "), BlockItem::new("")]);
        assert!(blocks.create(&no_items).unwrap_err().is_validation());

        assert_eq!(ctx.count("SELECT COUNT(*) FROM blocks"), 0);
    }

    #[test_context(BlockTestContext)]
    #[test]
    fn test_list_top_level_excludes_options(ctx: &mut BlockTestContext) {
        let mut blocks = ctx.blocks();
        let roulette_id = blocks.create(&workout()).unwrap();
        let standard_id = blocks
            .create(&BlockDraft::standard(
                "evening",
                "",
                10,
                vec![BlockItem::new("Read"), BlockItem::new("Sleep"), BlockItem::new("Plan")],
            ))
            .unwrap();

        let summaries = blocks.list_top_level().unwrap();

        assert_eq!(summaries.len(), 2);
        // Ordered by name without regard to case
        assert_eq!(summaries[0].block.id, standard_id);
        assert_eq!(summaries[0].item_count, 3);
        assert_eq!(summaries[1].block.id, roulette_id);
        assert_eq!(summaries[1].item_count, 2);
    }

    #[test_context(BlockTestContext)]
    #[test]
    fn test_update_replaces_children(ctx: &mut BlockTestContext) {
        let mut blocks = ctx.blocks();
        let id = blocks.create(&workout()).unwrap();
        let before = blocks.get_with_children(id).unwrap();

        let replacement = BlockDraft::roulette(
            "Workout v2",
            "harder",
            vec![BlockItem::new("Swim").with_minutes(45).with_subtasks(&["Towel"])],
        );
        blocks.update(id, &replacement).unwrap();

        let after = blocks.get_with_children(id).unwrap();
        assert_eq!(after.block.name, "Workout v2");
        assert_eq!(after.block.description, "harder");
        assert_eq!(after.options.len(), 1);
        assert_eq!(after.options[0].block.name, "Swim");
        assert_eq!(after.options[0].subtasks[0].name, "Towel");

        for old in &before.options {
            assert!(blocks.get(old.block.id).unwrap().is_none());
        }
        assert_eq!(ctx.count("SELECT COUNT(*) FROM blocks"), 2);
        assert_eq!(ctx.count("SELECT COUNT(*) FROM subtasks"), 1);
    }

    #[test_context(BlockTestContext)]
    #[test]
    fn test_update_cannot_change_type(ctx: &mut BlockTestContext) {
        let mut blocks = ctx.blocks();
        let id = blocks
            .create(&BlockDraft::standard("Morning", "", 15, vec![BlockItem::new("Wash")]))
            .unwrap();

        let err = blocks.update(id, &workout()).unwrap_err();
        assert!(err.is_validation());

        let detail = blocks.get_with_children(id).unwrap();
        assert_eq!(detail.block.block_type, BlockType::Standard);
        assert_eq!(detail.subtasks.len(), 1);
    }

    #[test_context(BlockTestContext)]
    #[test]
    fn test_update_option_directly_is_rejected(ctx: &mut BlockTestContext) {
        let mut blocks = ctx.blocks();
        let id = blocks.create(&workout()).unwrap();
        let option_id = blocks.list_options(id).unwrap()[0].id;

        let draft = BlockDraft::standard("Sprint", "", 5, vec![BlockItem::new("Warm up")]);
        assert!(blocks.update(option_id, &draft).unwrap_err().is_validation());
        assert!(blocks.update(9999, &draft).unwrap_err().is_not_found());
    }

    #[test_context(BlockTestContext)]
    #[test]
    fn test_delete_roulette_removes_everything_it_owns(ctx: &mut BlockTestContext) {
        let mut blocks = ctx.blocks();
        let roulette_id = blocks.create(&workout()).unwrap();
        let keep_id = blocks
            .create(&BlockDraft::standard("Morning", "", 15, vec![BlockItem::new("Wash")]))
            .unwrap();

        blocks.delete(roulette_id).unwrap();

        assert!(blocks.get(roulette_id).unwrap().is_none());
        assert_eq!(
            ctx.count(&format!("SELECT COUNT(*) FROM blocks WHERE parent_id = {}", roulette_id)),
            0
        );
        assert_eq!(
            ctx.count("SELECT COUNT(*) FROM subtasks WHERE block_id NOT IN (SELECT id FROM blocks)"),
            0
        );
        assert_eq!(blocks.get_with_children(keep_id).unwrap().subtasks.len(), 1);
        assert_eq!(ctx.count("SELECT COUNT(*) FROM blocks"), 1);
    }

    #[test_context(BlockTestContext)]
    #[test]
    fn test_delete_unknown_block(ctx: &mut BlockTestContext) {
        let mut blocks = ctx.blocks();
        assert!(matches!(blocks.delete(42), Err(CoreError::NotFound { .. })));
        assert!(blocks.get_with_children(42).unwrap_err().is_not_found());
    }

    #[test_context(BlockTestContext)]
    #[test]
    fn test_delete_releases_calendar_assignments(ctx: &mut BlockTestContext) {
        let mut blocks = ctx.blocks();
        let mut calendar = Calendar::open(&ctx.db_path).unwrap();
        let roulette_id = blocks.create(&workout()).unwrap();
        let option_id = blocks.list_options(roulette_id).unwrap()[1].id;

        let start = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap().and_hms_opt(7, 0, 0).unwrap();
        let on_roulette = calendar
            .create_event(&NewEvent::new(EventType::Task, "Train", start).assigned_to(roulette_id))
            .unwrap();
        let on_option = calendar
            .create_event(&NewEvent::new(EventType::Task, "Yoga", start).assigned_to(option_id))
            .unwrap();

        blocks.delete(roulette_id).unwrap();

        assert_eq!(calendar.get_event(on_roulette).unwrap().unwrap().assigned_block_id, None);
        assert_eq!(calendar.get_event(on_option).unwrap().unwrap().assigned_block_id, None);
    }

    #[test_context(BlockTestContext)]
    #[test]
    fn test_failed_write_leaves_no_partial_effect(ctx: &mut BlockTestContext) {
        let mut blocks = ctx.blocks();
        let id = blocks
            .create(&BlockDraft::standard("Morning", "", 15, vec![BlockItem::new("Wash")]))
            .unwrap();

        let db = Db::open(&ctx.db_path).unwrap();
        db.conn
            .execute_batch(
                "CREATE TRIGGER reject_boom BEFORE INSERT ON subtasks
                 WHEN NEW.name = 'boom'
                 BEGIN SELECT RAISE(ABORT, 'boom rejected'); END;",
            )
            .unwrap();

        // Update fails on the second subtask insert.
        let failing = BlockDraft::standard("Renamed", "", 20, vec![BlockItem::new("Shave"), BlockItem::new("boom")]);
        let err = blocks.update(id, &failing).unwrap_err();
        assert!(matches!(err, CoreError::Storage(_)));

        let detail = blocks.get_with_children(id).unwrap();
        assert_eq!(detail.block.name, "Morning");
        assert_eq!(detail.block.estimated_minutes, 15);
        let names: Vec<&str> = detail.subtasks.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Wash"]);

        // Create fails after the block row was inserted.
        let roulette = BlockDraft::roulette(
            "Chores",
            "",
            vec![BlockItem::new("Dishes").with_subtasks(&["Soap", "boom"])],
        );
        assert!(blocks.create(&roulette).is_err());
        assert_eq!(ctx.count("SELECT COUNT(*) FROM blocks"), 1);
        assert_eq!(ctx.count("SELECT COUNT(*) FROM subtasks"), 1);
    }

    #[test_context(BlockTestContext)]
    #[test]
    fn test_parent_cannot_be_deleted_before_children(ctx: &mut BlockTestContext) {
        let mut blocks = ctx.blocks();
        let id = blocks.create(&workout()).unwrap();

        let db = Db::open(&ctx.db_path).unwrap();
        let result = db.conn.execute("DELETE FROM blocks WHERE id = ?1", [id]);
        assert!(result.is_err());
    }

    #[test]
    fn test_to_draft_round_trips_detail() {
        let mut blocks = Blocks::from_db(Db::in_memory().unwrap());
        let id = blocks.create(&workout()).unwrap();

        let draft = blocks.get_with_children(id).unwrap().to_draft();
        assert_eq!(draft, workout().normalized().unwrap());
    }

    #[test]
    fn test_option_spec_parsing() {
        let item = BlockItem::from_option_spec("Run:30").unwrap();
        assert_eq!(item.text, "Run");
        assert_eq!(item.minutes, 30);
        assert!(item.subtasks.is_empty());

        let item = BlockItem::from_option_spec("Read").unwrap();
        assert_eq!(item.minutes, 0);

        assert!(BlockItem::from_option_spec("Run:soon").unwrap_err().is_validation());
    }
}
