//! Integration tests for the game engine

use gridsnake::{Config, Direction, Engine, GameState, MoveOutcome, Phase, Position, Snake};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn engine_at(segments: &[(i32, i32)], food: (i32, i32), dir: Direction) -> Engine<StdRng> {
    let snake = Snake::from_segments(segments.iter().map(|&(x, y)| Position::new(x, y))).unwrap();
    let state = GameState::new(snake, Position::new(food.0, food.1), dir);
    Engine::from_state(Config::default(), state, StdRng::seed_from_u64(7)).unwrap()
}

fn assert_no_duplicate_segments(snake: &Snake) {
    let segments = snake.to_vec();
    for (i, a) in segments.iter().enumerate() {
        assert!(!segments[i + 1..].contains(a), "segment {:?} appears twice", a);
    }
}

#[test]
fn test_eat_scenario() {
    let mut engine = engine_at(&[(10, 10)], (11, 10), Direction::Right);
    engine.step();

    let state = engine.state();
    assert_eq!(state.snake().to_vec(), vec![Position::new(11, 10), Position::new(10, 10)]);
    assert_eq!(state.score(), 10);
    assert_ne!(state.food(), Position::new(11, 10));
    assert_ne!(state.food(), Position::new(10, 10));
}

#[test]
fn test_left_wall_scenario() {
    let mut engine = engine_at(&[(0, 5)], (8, 8), Direction::Left);
    assert_eq!(engine.step(), MoveOutcome::Crashed);
    assert_eq!(engine.state().phase(), Phase::GameOver);
    assert_eq!(engine.state().snake().to_vec(), vec![Position::new(0, 5)]);
}

#[test]
fn test_rejected_reversal_scenario() {
    let mut engine = engine_at(&[(5, 5), (5, 6)], (8, 8), Direction::Down);
    engine.set_direction(Direction::Down);
    engine.set_direction(Direction::Up);
    assert_eq!(engine.pending_direction(), Direction::Down);

    assert_eq!(engine.step(), MoveOutcome::Crashed);
    assert_eq!(engine.state().phase(), Phase::GameOver);
}

#[test]
fn test_straight_run_to_the_wall() {
    let mut engine = engine_at(&[(10, 3), (9, 3), (8, 3)], (0, 19), Direction::Right);

    for x in 11..20 {
        assert!(matches!(engine.step(), MoveOutcome::Moved { ate: false, .. }));
        let expected: Vec<Position> = (0..3).map(|i| Position::new(x - i, 3)).collect();
        assert_eq!(engine.state().snake().to_vec(), expected);
    }

    let before = engine.state().clone();
    assert_eq!(engine.step(), MoveOutcome::Crashed);
    assert_eq!(engine.state().snake(), before.snake());
    assert_eq!(engine.state().food(), before.food());
    assert_eq!(engine.state().score(), before.score());

    // Nothing moves after game over until reset
    assert_eq!(engine.step(), MoveOutcome::Idle);
    engine.reset();
    assert_eq!(engine.state().phase(), Phase::Running);
    assert_eq!(engine.state().snake().to_vec(), vec![Position::new(10, 10)]);
}

#[test]
fn test_random_play_keeps_invariants() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut engine = Engine::with_rng(Config::default().with_seed(1), StdRng::seed_from_u64(1)).unwrap();
    let mut games = 0;

    for _ in 0..5_000 {
        let dir = Direction::ALL[rng.gen_range(0..4)];
        let committed = engine.state().direction();
        let accepted = engine.set_direction(dir);
        assert_eq!(accepted, dir != committed.opposite());
        assert_ne!(engine.pending_direction(), committed.opposite());

        let before = engine.state().clone();
        match engine.step() {
            MoveOutcome::Moved { ate, .. } => {
                let state = engine.state();
                assert_no_duplicate_segments(state.snake());
                assert!(!state.snake().contains(&state.food()));
                assert!(state.snake().segments().all(|p| p.in_bounds(20)));
                if ate {
                    assert_eq!(state.score(), before.score() + 10);
                    assert_eq!(state.snake().len(), before.snake().len() + 1);
                } else {
                    assert_eq!(state.score(), before.score());
                    assert_eq!(state.snake().len(), before.snake().len());
                }
            }
            MoveOutcome::Crashed => {
                assert_eq!(engine.state().snake(), before.snake());
                assert_eq!(engine.state().score(), before.score());
                games += 1;
                engine.reset();
                assert!(!engine.state().snake().contains(&engine.state().food()));
            }
            MoveOutcome::BoardFilled => unreachable!("a random walk does not fill a 20x20 board"),
            MoveOutcome::Idle => unreachable!("engine is always running here"),
        }
    }

    assert!(games > 0);
}

#[test]
fn test_same_seed_same_food() {
    let a = Engine::new(Config::default().with_seed(99)).unwrap();
    let b = Engine::new(Config::default().with_seed(99)).unwrap();
    assert_eq!(a.state().food(), b.state().food());
}

#[test]
fn test_unplayable_configs_are_refused() {
    let tiny = Config { grid_size: 1, origin: Position::new(0, 0), ..Config::default() };
    assert!(Engine::new(tiny).is_err());

    let off_board = Config { origin: Position::new(30, 30), ..Config::default() };
    assert!(Engine::new(off_board).is_err());
}
