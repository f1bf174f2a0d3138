use galaga::config::LoopConfig;
use galaga::entities::*;
use galaga::game_loop::*;
use galaga::input::Key;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn new_game(config: LoopConfig) -> GameLoop<StdRng> {
    GameLoop::new(StdRng::seed_from_u64(7), config)
}

fn started(config: LoopConfig) -> GameLoop<StdRng> {
    let mut game = new_game(config);
    assert!(game.start(0.0));
    game
}

fn tick(game: &mut GameLoop<StdRng>, now: f64) -> Snapshot {
    let request = game.pending_frame().expect("frame pending while playing");
    game.on_frame(request, now).expect("tick runs for the pending request")
}

// ── lifecycle ─────────────────────────────────────────────────────────────────

#[test]
fn new_loop_waits_in_menu() {
    let game = new_game(LoopConfig::default());
    assert_eq!(game.status(), GameStatus::Menu);
    assert!(game.pending_frame().is_none());
    assert!(game.snapshot().enemies.is_empty());
}

#[test]
fn start_sets_up_a_fresh_game() {
    let game = started(LoopConfig::default());
    let snap = game.snapshot();
    assert_eq!(snap.status, GameStatus::Playing);
    assert_eq!(snap.enemies.len(), 12);
    assert_eq!(snap.lives, 3);
    assert_eq!(snap.score, 0);
    assert_eq!(snap.level, 1);
    let xs: Vec<f64> = snap.enemies.iter().take(6).map(|e| e.position.x).collect();
    assert_eq!(xs, vec![48.0, 96.0, 144.0, 192.0, 240.0, 288.0]);
    assert!(snap.enemies[6..].iter().all(|e| e.position.y == 88.0));
    assert!(game.pending_frame().is_some());
}

#[test]
fn start_is_ignored_mid_game() {
    let mut game = started(LoopConfig::default());
    game.state_mut().score = 500;
    assert!(!game.start(10.0));
    assert_eq!(game.state().score, 500);
}

#[test]
fn restart_resets_mid_game() {
    let mut game = started(LoopConfig::default());
    game.state_mut().score = 500;
    game.state_mut().player.lives = 1;
    game.restart(10.0);
    assert_eq!(game.status(), GameStatus::Playing);
    assert_eq!(game.state().score, 0);
    assert_eq!(game.state().player.lives, 3);
    assert!(game.pending_frame().is_some());
}

// ── input ─────────────────────────────────────────────────────────────────────

#[test]
fn fire_spawns_bullet_above_player() {
    let mut game = started(LoopConfig::default());
    game.key_down(Key::Fire, 0.0);
    let snap = game.snapshot();
    assert_eq!(snap.bullets.len(), 1);
    assert_eq!(snap.bullets[0].position, Position::new(200.0, 336.0));
    assert_eq!(snap.bullets[0].owner, BulletOwner::Player);
}

#[test]
fn fire_does_nothing_in_menu() {
    let mut game = new_game(LoopConfig::default());
    game.key_down(Key::Fire, 0.0);
    assert!(game.snapshot().bullets.is_empty());
}

#[test]
fn held_key_steers_each_tick() {
    let mut game = started(LoopConfig::default());
    game.key_down(Key::Left, 0.0);
    tick(&mut game, 50.0);
    assert!((game.state().player.position.x - 194.0).abs() < 1e-9);

    game.key_up(Key::Left);
    tick(&mut game, 100.0);
    assert!((game.state().player.position.x - 194.0).abs() < 1e-9);
}

#[test]
fn pause_key_toggles() {
    let mut game = started(LoopConfig::default());
    game.key_down(Key::Pause, 10.0);
    assert_eq!(game.status(), GameStatus::Paused);
    game.key_up(Key::Pause);
    game.key_down(Key::Pause, 20.0);
    assert_eq!(game.status(), GameStatus::Playing);
}

#[test]
fn holding_pause_toggles_once() {
    let mut game = started(LoopConfig::default());
    game.key_down(Key::Pause, 10.0);
    game.key_down(Key::Pause, 40.0);
    assert_eq!(game.status(), GameStatus::Paused);
    assert!(game.pending_frame().is_none());
}

#[test]
fn holding_fire_shoots_once() {
    let mut game = started(LoopConfig::default());
    game.key_down(Key::Fire, 0.0);
    game.key_down(Key::Fire, 30.0);
    assert_eq!(game.snapshot().bullets.len(), 1);

    game.key_up(Key::Fire);
    game.key_down(Key::Fire, 60.0);
    assert_eq!(game.snapshot().bullets.len(), 2);
}

#[test]
fn pause_is_ignored_outside_a_game() {
    let mut game = new_game(LoopConfig::default());
    game.toggle_pause(0.0);
    assert_eq!(game.status(), GameStatus::Menu);
    assert!(game.pending_frame().is_none());
}

// ── frames ────────────────────────────────────────────────────────────────────

#[test]
fn exactly_one_frame_is_pending_while_playing() {
    let mut game = started(LoopConfig::default());
    let first = game.pending_frame().unwrap();
    game.on_frame(first, 16.0).unwrap();
    let second = game.pending_frame().unwrap();
    assert_ne!(first, second);
    // The consumed request is stale now.
    assert!(game.on_frame(first, 32.0).is_none());
    assert_eq!(game.pending_frame(), Some(second));
}

#[test]
fn stale_request_after_pause_is_ignored() {
    let mut game = started(LoopConfig::default());
    let request = game.pending_frame().unwrap();
    game.toggle_pause(5.0);
    assert!(game.pending_frame().is_none());
    let before = game.snapshot();
    assert!(game.on_frame(request, 16.0).is_none());
    assert_eq!(game.snapshot(), before);
}

#[test]
fn cancel_drops_pending_frame() {
    let mut game = started(LoopConfig::default());
    let request = game.pending_frame().unwrap();
    game.cancel();
    assert!(game.on_frame(request, 16.0).is_none());
}

#[test]
fn pause_time_is_not_simulated() {
    let mut paused = started(LoopConfig::unclamped());
    tick(&mut paused, 16.0);
    paused.toggle_pause(20.0);
    paused.toggle_pause(5000.0);
    let after_pause = tick(&mut paused, 5016.0);

    let mut steady = started(LoopConfig::unclamped());
    tick(&mut steady, 16.0);
    let uninterrupted = tick(&mut steady, 32.0);

    assert_eq!(after_pause, uninterrupted);
}

#[test]
fn long_frames_are_clamped() {
    let mut game = started(LoopConfig::default());
    game.key_down(Key::Right, 0.0);
    tick(&mut game, 5000.0);
    // 100 ms at 0.12 px/ms.
    assert!((game.state().player.position.x - 212.0).abs() < 1e-9);
}

#[test]
fn unclamped_frames_use_full_delta() {
    let mut game = started(LoopConfig::unclamped());
    game.key_down(Key::Left, 0.0);
    tick(&mut game, 1000.0);
    assert!((game.state().player.position.x - 80.0).abs() < 1e-9);
}

// ── game over ─────────────────────────────────────────────────────────────────

#[test]
fn three_hits_end_the_game_and_stop_the_loop() {
    let mut game = started(LoopConfig::default());
    game.state_mut().enemies.clear();

    let mut now = 0.0;
    for expected in [2, 1, 0] {
        let target = game.state().player.position;
        let id = game.state_mut().ids.next_id();
        game.state_mut()
            .bullets
            .push(Bullet::new(id, target, BulletOwner::Enemy));
        now += 16.0;
        let snap = tick(&mut game, now);
        assert_eq!(snap.lives, expected);
        if expected > 0 {
            assert_eq!(snap.status, GameStatus::Playing);
        }
    }

    assert_eq!(game.status(), GameStatus::GameOver);
    assert!(game.pending_frame().is_none());
    game.key_down(Key::Fire, now);
    assert!(game.snapshot().bullets.is_empty());

    assert!(game.start(now + 100.0));
    assert_eq!(game.state().player.lives, 3);
    assert_eq!(game.state().enemies.len(), 12);
}

#[test]
fn snapshot_mirrors_state() {
    let mut game = started(LoopConfig::default());
    game.key_down(Key::Fire, 0.0);
    let snap = tick(&mut game, 16.0);
    let state = game.state();
    assert_eq!(snap.player, state.player);
    assert_eq!(snap.enemies, state.enemies);
    assert_eq!(snap.bullets, state.bullets);
    assert_eq!(snap.explosions, state.explosions);
    assert_eq!(snap.score, state.score);
    assert_eq!(snap.lives, state.player.lives);
}
