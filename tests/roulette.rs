#[cfg(test)]
mod tests {
    use kitty::db::blocks::Blocks;
    use kitty::libs::block::{Block, BlockDraft, BlockItem, BlockType};
    use kitty::libs::error::CoreError;
    use kitty::libs::roulette::{pick_index, spin, spin_roulette, DEFAULT_DISPLAY_SPINS};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct RouletteTestContext {
        _temp_dir: TempDir,
        db_path: PathBuf,
    }

    impl TestContext for RouletteTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("kitty.db");
            RouletteTestContext {
                _temp_dir: temp_dir,
                db_path,
            }
        }
    }

    fn option(id: i64, name: &str) -> Block {
        Block {
            id,
            name: name.to_string(),
            description: "Option".to_string(),
            block_type: BlockType::Standard,
            estimated_minutes: 10,
            parent_id: Some(1),
        }
    }

    #[test]
    fn test_empty_roulette_fails_before_any_display() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut shown = 0;

        let result = spin(&[], &mut rng, DEFAULT_DISPLAY_SPINS, |_| shown += 1);

        assert!(matches!(result, Err(CoreError::EmptyRoulette)));
        assert_eq!(shown, 0);
        assert!(matches!(pick_index(&mut rng, 0), Err(CoreError::EmptyRoulette)));
    }

    #[test]
    fn test_display_callback_runs_once_per_spin() {
        let options = vec![option(2, "Run"), option(3, "Yoga")];
        let mut rng = StdRng::seed_from_u64(2);
        let mut shown = Vec::new();

        let winner = spin(&options, &mut rng, 5, |block| shown.push(block.id)).unwrap();

        assert_eq!(shown.len(), 5);
        assert!(shown.iter().all(|id| *id == 2 || *id == 3));
        assert!(options.contains(winner));
    }

    #[test]
    fn test_single_option_always_wins() {
        let options = vec![option(2, "Run")];
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..10 {
            assert_eq!(spin(&options, &mut rng, 0, |_| {}).unwrap().id, 2);
        }
    }

    #[test]
    fn test_pick_is_uniform() {
        let mut rng = StdRng::seed_from_u64(42);
        let draws = 30_000;
        let mut counts = [0usize; 3];

        for _ in 0..draws {
            counts[pick_index(&mut rng, 3).unwrap()] += 1;
        }

        for count in counts {
            let share = count as f64 / draws as f64;
            assert!((share - 1.0 / 3.0).abs() < 0.02, "share {} is too far from 1/3", share);
        }
    }

    #[test]
    fn test_spin_winner_is_uniform() {
        let options = vec![option(2, "Run"), option(3, "Yoga"), option(4, "Swim"), option(5, "Bike")];
        let mut rng = StdRng::seed_from_u64(2024);
        let spins = 20_000;
        let mut wins = [0usize; 4];

        for _ in 0..spins {
            let winner = spin(&options, &mut rng, DEFAULT_DISPLAY_SPINS, |_| {}).unwrap();
            wins[(winner.id - 2) as usize] += 1;
        }

        for count in wins {
            let share = count as f64 / spins as f64;
            assert!((share - 0.25).abs() < 0.02, "winner share {} is too far from 1/4", share);
        }
    }

    #[test]
    fn test_winner_is_not_the_last_display() {
        let options = vec![option(2, "Run"), option(3, "Yoga")];
        let mut rng = StdRng::seed_from_u64(11);
        let mut differs = 0;

        for _ in 0..200 {
            let mut last_shown = None;
            let winner = spin(&options, &mut rng, 3, |block| last_shown = Some(block.id)).unwrap();
            if last_shown != Some(winner.id) {
                differs += 1;
            }
        }

        // an independent final draw disagrees with the last display about half the time
        assert!(differs > 50 && differs < 150, "final draw matched the display {} times out of 200", 200 - differs);
    }

    #[test_context(RouletteTestContext)]
    #[test]
    fn test_spin_stored_roulette(ctx: &mut RouletteTestContext) {
        let mut blocks = Blocks::open(&ctx.db_path).unwrap();
        let roulette_id = blocks
            .create(&BlockDraft::roulette(
                "Workout",
                "",
                vec![BlockItem::new("Run"), BlockItem::new("Yoga"), BlockItem::new("Swim")],
            ))
            .unwrap();
        let mut rng = StdRng::seed_from_u64(9);

        let winner = spin_roulette(&blocks, roulette_id, &mut rng, 3, |_| {}).unwrap();

        assert_eq!(winner.parent_id, Some(roulette_id));
        assert!(["Run", "Yoga", "Swim"].contains(&winner.name.as_str()));
    }

    #[test_context(RouletteTestContext)]
    #[test]
    fn test_spin_rejects_non_roulettes(ctx: &mut RouletteTestContext) {
        let mut blocks = Blocks::open(&ctx.db_path).unwrap();
        let standard_id = blocks
            .create(&BlockDraft::standard("Morning", "", 10, vec![BlockItem::new("Wash")]))
            .unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        let err = spin_roulette(&blocks, standard_id, &mut rng, 0, |_| {}).unwrap_err();
        assert!(err.is_validation());

        let err = spin_roulette(&blocks, 404, &mut rng, 0, |_| {}).unwrap_err();
        assert!(err.is_not_found());
    }
}
