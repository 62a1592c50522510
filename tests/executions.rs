#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use kitty::db::blocks::Blocks;
    use kitty::db::calendar::Calendar;
    use kitty::db::executions::Executions;
    use kitty::libs::block::{BlockDraft, BlockItem};
    use kitty::libs::calendar::{EventType, NewEvent};
    use kitty::libs::error::CoreError;
    use kitty::libs::execution::{compute_weekly_streak, ExecutionStatus, HistoryEntry, SubtaskCompletion};
    use kitty::libs::roulette::spin_roulette;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rusqlite::Connection;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ExecutionTestContext {
        _temp_dir: TempDir,
        db_path: PathBuf,
        morning_id: i64,
        workout_id: i64,
    }

    impl TestContext for ExecutionTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("kitty.db");

            let mut blocks = Blocks::open(&db_path).unwrap();
            let morning_id = blocks
                .create(&BlockDraft::standard(
                    "Morning",
                    "",
                    15,
                    vec![BlockItem::new("Wash"), BlockItem::new("Dress"), BlockItem::new("Coffee")],
                ))
                .unwrap();
            let workout_id = blocks
                .create(&BlockDraft::roulette(
                    "Workout",
                    "",
                    vec![
                        BlockItem::new("Run").with_minutes(30).with_subtasks(&["Shoes"]),
                        BlockItem::new("Yoga").with_minutes(20).with_subtasks(&["Mat", "Stretch"]),
                    ],
                ))
                .unwrap();

            ExecutionTestContext {
                _temp_dir: temp_dir,
                db_path,
                morning_id,
                workout_id,
            }
        }
    }

    impl ExecutionTestContext {
        fn executions(&self) -> Executions {
            Executions::open(&self.db_path).unwrap()
        }
    }

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap().and_hms_opt(hour, 0, 0).unwrap()
    }

    #[test_context(ExecutionTestContext)]
    #[test]
    fn test_execution_lifecycle(ctx: &mut ExecutionTestContext) {
        let mut executions = ctx.executions();

        let mut active = executions.start_at(ctx.morning_id, None, at(4, 7)).unwrap();
        assert_eq!(active.block_name, "Morning");
        assert_eq!(active.subtasks.len(), 3);
        assert!(active.subtasks.iter().all(|s| !s.completed));

        let stored = executions.get(active.execution_id).unwrap().unwrap();
        assert_eq!(stored.status, ExecutionStatus::InProgress);
        assert_eq!(stored.end_time, None);
        assert_eq!(stored.start_time, at(4, 7));

        assert!(active.toggle(0).unwrap());
        assert!(active.toggle(2).unwrap());
        assert!(!active.toggle(2).unwrap());
        assert_eq!(active.progress(), (1, 3));

        executions
            .finish_at(active.execution_id, &active.completion_list(), at(4, 8))
            .unwrap();

        let stored = executions.get(active.execution_id).unwrap().unwrap();
        assert_eq!(stored.status, ExecutionStatus::Completed);
        assert_eq!(stored.end_time, Some(at(4, 8)));

        let statuses = executions.list_subtask_statuses(active.execution_id).unwrap();
        assert_eq!(statuses.len(), 3);
        assert_eq!(statuses[0].subtask_name, "Wash");
        assert!(statuses[0].is_completed);
        assert!(!statuses[1].is_completed);
        assert!(!statuses[2].is_completed);
    }

    #[test_context(ExecutionTestContext)]
    #[test]
    fn test_finish_twice_is_rejected(ctx: &mut ExecutionTestContext) {
        let mut executions = ctx.executions();
        let active = executions.start(ctx.morning_id, None).unwrap();

        executions.finish(active.execution_id, &active.completion_list()).unwrap();
        let err = executions.finish(active.execution_id, &active.completion_list()).unwrap_err();
        assert!(err.is_validation());

        // The first snapshot is untouched.
        assert_eq!(executions.list_subtask_statuses(active.execution_id).unwrap().len(), 3);
        assert!(executions.finish(9999, &[]).unwrap_err().is_not_found());
    }

    #[test_context(ExecutionTestContext)]
    #[test]
    fn test_duplicate_completions_write_nothing(ctx: &mut ExecutionTestContext) {
        let mut executions = ctx.executions();
        let active = executions.start(ctx.morning_id, None).unwrap();

        let mut completions = active.completion_list();
        completions.push(completions[0].clone());

        assert!(executions.finish(active.execution_id, &completions).unwrap_err().is_validation());
        let stored = executions.get(active.execution_id).unwrap().unwrap();
        assert_eq!(stored.status, ExecutionStatus::InProgress);
        assert!(executions.list_subtask_statuses(active.execution_id).unwrap().is_empty());
    }

    #[test_context(ExecutionTestContext)]
    #[test]
    fn test_toggle_out_of_range(ctx: &mut ExecutionTestContext) {
        let mut active = ctx.executions().start(ctx.morning_id, None).unwrap();
        assert!(active.toggle(3).unwrap_err().is_validation());
        assert_eq!(active.progress(), (0, 3));
    }

    #[test_context(ExecutionTestContext)]
    #[test]
    fn test_roulette_container_cannot_run(ctx: &mut ExecutionTestContext) {
        let mut executions = ctx.executions();
        assert!(executions.start(ctx.workout_id, None).unwrap_err().is_validation());
        assert!(matches!(executions.start(777, None), Err(CoreError::NotFound { .. })));
        assert!(executions.list_open().unwrap().is_empty());
    }

    #[test_context(ExecutionTestContext)]
    #[test]
    fn test_spin_then_run_winner(ctx: &mut ExecutionTestContext) {
        let blocks = Blocks::open(&ctx.db_path).unwrap();
        let mut executions = ctx.executions();
        let mut rng = StdRng::seed_from_u64(7);

        let winner = spin_roulette(&blocks, ctx.workout_id, &mut rng, 20, |_| {}).unwrap();
        assert_eq!(winner.parent_id, Some(ctx.workout_id));

        let mut active = executions.start(winner.id, None).unwrap();
        assert_eq!(active.block_id, winner.id);
        for index in 0..active.subtasks.len() {
            active.toggle(index).unwrap();
        }
        assert!(active.is_all_done());
        executions.finish(active.execution_id, &active.completion_list()).unwrap();

        let history = executions.list_history(50).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].block_name, winner.name);
        assert_eq!(history[0].status, ExecutionStatus::Completed);
    }

    #[test_context(ExecutionTestContext)]
    #[test]
    fn test_history_keeps_name_after_block_is_deleted(ctx: &mut ExecutionTestContext) {
        let mut executions = ctx.executions();
        let active = executions.start_at(ctx.morning_id, None, at(5, 7)).unwrap();
        executions
            .finish_at(active.execution_id, &active.completion_list(), at(5, 8))
            .unwrap();

        Blocks::open(&ctx.db_path).unwrap().delete(ctx.morning_id).unwrap();

        let history = executions.list_history(50).unwrap();
        assert_eq!(history[0].block_name, "Morning");
        let statuses = executions.list_subtask_statuses(active.execution_id).unwrap();
        let names: Vec<&str> = statuses.iter().map(|s| s.subtask_name.as_str()).collect();
        assert_eq!(names, vec!["Wash", "Dress", "Coffee"]);
    }

    #[test_context(ExecutionTestContext)]
    #[test]
    fn test_single_entry_name_falls_back(ctx: &mut ExecutionTestContext) {
        let mut executions = ctx.executions();
        let active = executions.start_at(ctx.morning_id, None, at(6, 7)).unwrap();
        executions.finish_at(active.execution_id, &[], at(6, 8)).unwrap();

        // rows written before names were captured have no snapshot
        Connection::open(&ctx.db_path)
            .unwrap()
            .execute("UPDATE block_executions SET block_name = NULL WHERE id = ?1", [active.execution_id])
            .unwrap();

        let entry = executions.get_entry(active.execution_id).unwrap().unwrap();
        assert_eq!(entry.block_name, "Morning");
        assert_eq!(entry.status, ExecutionStatus::Completed);

        Blocks::open(&ctx.db_path).unwrap().delete(ctx.morning_id).unwrap();
        let entry = executions.get_entry(active.execution_id).unwrap().unwrap();
        assert_eq!(entry.block_name, "Unknown block");
        assert_eq!(entry.block_name, executions.list_history(1).unwrap()[0].block_name);

        assert!(executions.get_entry(404).unwrap().is_none());
    }

    #[test_context(ExecutionTestContext)]
    #[test]
    fn test_history_order_and_limit(ctx: &mut ExecutionTestContext) {
        let mut executions = ctx.executions();
        for day in 1..=4 {
            let active = executions.start_at(ctx.morning_id, None, at(day, 7)).unwrap();
            executions.finish_at(active.execution_id, &[], at(day, 8)).unwrap();
        }
        executions.start_at(ctx.morning_id, None, at(6, 7)).unwrap();

        let history = executions.list_history(3).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].start_time, at(6, 7));
        assert_eq!(history[0].status, ExecutionStatus::InProgress);
        assert_eq!(history[1].start_time, at(4, 7));
        assert_eq!(history[2].start_time, at(3, 7));
        assert_eq!(history[1].duration(), Some(Duration::hours(1)));

        let open = executions.list_open().unwrap();
        assert_eq!(open.len(), 1);
    }

    #[test_context(ExecutionTestContext)]
    #[test]
    fn test_abandon_removes_only_open_runs(ctx: &mut ExecutionTestContext) {
        let mut executions = ctx.executions();
        let open = executions.start(ctx.morning_id, None).unwrap();
        let done = executions.start(ctx.morning_id, None).unwrap();
        executions.finish(done.execution_id, &[]).unwrap();

        executions.abandon(open.execution_id).unwrap();
        assert!(executions.get(open.execution_id).unwrap().is_none());

        assert!(executions.abandon(done.execution_id).unwrap_err().is_validation());
        assert!(executions.abandon(open.execution_id).unwrap_err().is_not_found());
    }

    #[test_context(ExecutionTestContext)]
    #[test]
    fn test_start_from_event(ctx: &mut ExecutionTestContext) {
        let mut calendar = Calendar::open(&ctx.db_path).unwrap();
        let mut executions = ctx.executions();

        let assigned = calendar
            .create_event(&NewEvent::new(EventType::Task, "Get ready", at(7, 6)).assigned_to(ctx.morning_id))
            .unwrap();
        let unassigned = calendar
            .create_event(&NewEvent::new(EventType::Event, "Dentist", at(7, 10)))
            .unwrap();

        let active = executions.start_from_event(assigned).unwrap();
        let stored = executions.get(active.execution_id).unwrap().unwrap();
        assert_eq!(stored.origin_event_id, Some(assigned));
        assert_eq!(stored.block_id, ctx.morning_id);

        assert!(executions.start_from_event(unassigned).unwrap_err().is_validation());
        assert!(executions.start_from_event(9999).unwrap_err().is_not_found());
    }

    fn entry(status: ExecutionStatus, start: NaiveDateTime, end: Option<NaiveDateTime>) -> HistoryEntry {
        HistoryEntry {
            execution_id: 1,
            block_id: 1,
            block_name: "Morning".to_string(),
            start_time: start,
            end_time: end,
            status,
        }
    }

    #[test]
    fn test_weekly_streak_window() {
        let now = at(20, 12);
        let history = vec![
            // exactly seven days ago counts
            entry(ExecutionStatus::Completed, now - Duration::days(7) - Duration::hours(1), Some(now - Duration::days(7))),
            // one second too old
            entry(
                ExecutionStatus::Completed,
                now - Duration::days(8),
                Some(now - Duration::days(7) - Duration::seconds(1)),
            ),
            entry(ExecutionStatus::Completed, now - Duration::hours(2), Some(now - Duration::hours(1))),
            // in progress never counts
            entry(ExecutionStatus::InProgress, now - Duration::hours(1), None),
            // ended in the future
            entry(ExecutionStatus::Completed, now, Some(now + Duration::minutes(5))),
            // no end time falls back to start
            entry(ExecutionStatus::Completed, now - Duration::days(1), None),
        ];

        assert_eq!(compute_weekly_streak(&history, now), 3);
        assert_eq!(compute_weekly_streak(&[], now), 0);
    }

    #[test]
    fn test_weekly_streak_floor_is_an_instant() {
        let now = at(20, 12);
        // same calendar day as the floor, but earlier in that day
        let morning_of_floor_day = entry(ExecutionStatus::Completed, at(13, 7), Some(at(13, 8)));
        let afternoon_of_floor_day = entry(ExecutionStatus::Completed, at(13, 12), Some(at(13, 13)));

        assert_eq!(compute_weekly_streak(&[morning_of_floor_day], now), 0);
        assert_eq!(compute_weekly_streak(&[afternoon_of_floor_day], now), 1);
    }

    #[test]
    fn test_completion_list_reflects_toggles() {
        let mut active = kitty::libs::execution::ActiveExecution {
            execution_id: 1,
            block_id: 1,
            block_name: "Morning".to_string(),
            started_at: at(1, 7),
            subtasks: vec![
                SubtaskCompletion {
                    subtask_id: 10,
                    name: "Wash".to_string(),
                    completed: false,
                },
                SubtaskCompletion {
                    subtask_id: 11,
                    name: "Dress".to_string(),
                    completed: false,
                },
            ],
        };

        active.toggle(1).unwrap();
        let list = active.completion_list();
        assert!(!list[0].completed);
        assert!(list[1].completed);
        assert!(!active.is_all_done());
    }
}
