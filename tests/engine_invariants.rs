//! Invariants that must hold for any seed and any input sequence, checked through the public
//! engine API only.

use std::collections::HashSet;

use grid_chase::constants::VULNERABLE_MOVES;
use grid_chase::engine::GridChaseEngine;
use grid_chase::types::{Cell, Direction, GameConfig, Snapshot, Variant};
use proptest::prelude::*;

fn assert_board_consistent(snapshot: &Snapshot) {
    assert!(snapshot.is_walkable(snapshot.player), "player {:?}", snapshot.player);
    for pursuer in &snapshot.pursuers {
        assert!(snapshot.is_walkable(pursuer.cell), "pursuer {:?}", pursuer.cell);
    }
    for cell in snapshot.dots.iter().chain(snapshot.pellets.iter()) {
        assert!(snapshot.is_walkable(*cell));
        assert_ne!(*cell, snapshot.spawn);
    }
    let dots: HashSet<Cell> = snapshot.dots.iter().copied().collect();
    assert!(snapshot.pellets.iter().all(|cell| !dots.contains(cell)));

    assert!((0..=snapshot.max_lives).contains(&snapshot.lives));
    assert_eq!(snapshot.lives == 0, snapshot.game_over);
    assert!((0..=VULNERABLE_MOVES).contains(&snapshot.vulnerable_timer));
    assert_eq!(snapshot.vulnerable, snapshot.vulnerable_timer > 0);
    if snapshot.won {
        assert!(snapshot.dots.is_empty());
    }
}

fn direction(index: usize) -> Direction {
    Direction::ALL[index % Direction::ALL.len()]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn classic_rollouts_keep_the_board_consistent(
        seed in any::<u32>(),
        moves in prop::collection::vec(0usize..4, 0..300),
    ) {
        let mut engine = GridChaseEngine::new(GameConfig::classic(), seed)
            .expect("classic preset is valid");
        let mut before = engine.build_snapshot(true);
        assert_board_consistent(&before);

        for (turn, index) in moves.into_iter().enumerate() {
            let after = engine.move_player(direction(index));
            engine.build_snapshot(true);
            assert_board_consistent(&after);

            if before.is_terminal() {
                prop_assert_eq!(after.player, before.player);
                prop_assert_eq!(after.score, before.score);
                prop_assert_eq!(after.move_count, before.move_count);
            } else {
                // Classic counts every attempt, accepted or not.
                prop_assert_eq!(after.move_count, turn as u64 + 1);
            }
            prop_assert!(after.score >= before.score);
            prop_assert!(after.lives <= before.lives);
            prop_assert!(after.dots.iter().all(|cell| before.dots.contains(cell)));
            prop_assert!(after.pellets.iter().all(|cell| before.pellets.contains(cell)));
            before = after;
        }
    }

    #[test]
    fn wander_rollouts_never_stack_pursuers(
        seed in any::<u32>(),
        moves in prop::collection::vec(0usize..4, 0..300),
    ) {
        let mut engine = GridChaseEngine::new(GameConfig::wander(), seed)
            .expect("wander preset is valid");
        let mut before = engine.build_snapshot(true);
        assert_board_consistent(&before);

        for index in moves {
            let after = engine.move_player(direction(index));
            engine.build_snapshot(true);
            assert_board_consistent(&after);

            let cells: HashSet<Cell> = after.pursuers.iter().map(|p| p.cell).collect();
            prop_assert_eq!(cells.len(), after.pursuers.len());
            prop_assert!(after.pellets.is_empty());
            prop_assert!(!after.vulnerable);

            // Rejected moves leave a wander board untouched.
            if after.move_count == before.move_count {
                prop_assert_eq!(&after.pursuers, &before.pursuers);
                prop_assert_eq!(after.player, before.player);
            } else {
                prop_assert_eq!(after.move_count, before.move_count + 1);
            }
            if after.lives < before.lives {
                prop_assert_eq!(after.player, after.spawn);
                prop_assert!(after.pursuers.iter().all(|p| p.cell == p.start));
            }
            before = after;
        }
    }

    #[test]
    fn same_seed_and_inputs_replay_identically(
        seed in any::<u32>(),
        classic in any::<bool>(),
        moves in prop::collection::vec(0usize..4, 0..120),
    ) {
        let variant = if classic { Variant::Classic } else { Variant::Wander };
        let mut first = GridChaseEngine::new(GameConfig::preset(variant), seed)
            .expect("preset is valid");
        let mut second = GridChaseEngine::new(GameConfig::preset(variant), seed)
            .expect("preset is valid");
        prop_assert_eq!(first.snapshot(), second.snapshot());
        for index in moves {
            let dir = direction(index);
            prop_assert_eq!(first.move_player(dir), second.move_player(dir));
        }
    }
}

#[test]
fn restart_deals_a_full_board_after_game_over() {
    let mut engine =
        GridChaseEngine::new(GameConfig::classic(), 99).expect("classic preset is valid");
    for turn in 0..2_000 {
        if engine.is_ended() {
            break;
        }
        engine.move_player(direction(turn % 3));
    }
    let fresh = engine.restart();
    assert_eq!(fresh.score, 0);
    assert_eq!(fresh.lives, fresh.max_lives);
    assert_eq!(fresh.move_count, 0);
    assert_eq!(fresh.dots.len(), GameConfig::classic().num_dots);
    assert_eq!(fresh.pellets.len(), GameConfig::classic().num_pellets);
    assert!(!fresh.is_terminal());
}
