/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle) and returns a brand-new
/// `GameState`.  Side effects are limited to the injected RNG.
///
/// All speeds are expressed per millisecond of elapsed time, so a tick with
/// twice the `delta` moves everything twice as far.

use rand::Rng;
use tracing::debug;

use crate::collision::resolve_collisions;
use crate::entities::{
    Bullet, BulletOwner, Direction, Enemy, EnemyKind, Explosion, GameState, GameStatus,
    IdGenerator, Player, Position,
};

// ── Tuning ───────────────────────────────────────────────────────────────────

pub const PLAYFIELD_SIZE: f64 = 400.0;

pub const PLAYER_START: Position = Position { x: 200.0, y: 350.0 };
pub const PLAYER_LIVES: u32 = 3;
pub const PLAYER_SPEED: f64 = 0.12;
/// Player bullets leave the ship this far above its centre.
pub const MUZZLE_OFFSET: f64 = 14.0;

pub const BULLET_SPEED: f64 = 0.25;
pub const BULLET_MIN_Y: f64 = -30.0;
pub const BULLET_MAX_Y: f64 = 430.0;

/// Horizontal range shared by the player and formation enemies.
pub const MIN_X: f64 = 24.0;
pub const MAX_X: f64 = 360.0;

pub const ENEMY_SPEED: f64 = 0.03;
/// Dive progress per second.
pub const ENEMY_DIVE_SPEED: f64 = 0.35;
pub const DIVE_CHANCE_PER_MS: f64 = 0.00025;
pub const DIVE_CONTROL_Y: f64 = 180.0;
pub const DIVE_END_Y: f64 = 30.0;
/// A formation enemy below this line has got past the player.
pub const ESCAPE_Y: f64 = 358.0;
/// Enemy bullets leave the ship this far below its centre.
pub const ENEMY_MUZZLE_OFFSET: f64 = 12.0;

/// Range for random spawn and dive-target x coordinates.
pub const SPAWN_MIN_X: f64 = 40.0;
pub const SPAWN_MAX_X: f64 = 360.0;
pub const SPAWN_Y: f64 = 30.0;
pub const BOSS_CHANCE: f64 = 0.08;

pub const EXPLOSION_DURATION_MS: f64 = 800.0;

pub const SPAWN_INTERVAL_MS: f64 = 7000.0;
pub const SHOOT_INTERVAL_MS: f64 = 2200.0;

// Opening formation: 6 columns × 2 rows.
const GRID_COLS: usize = 6;
const GRID_ROWS: usize = 2;
const GRID_START_X: f64 = 48.0;
const GRID_GAP_X: f64 = 48.0;
const GRID_START_Y: f64 = 44.0;
const GRID_GAP_Y: f64 = 44.0;

// ── Constructors ─────────────────────────────────────────────────────────────

/// State shown before the first game: the ship at its start, nothing else.
pub fn menu_state() -> GameState {
    GameState {
        player: Player {
            position: PLAYER_START,
            lives: PLAYER_LIVES,
        },
        enemies: Vec::new(),
        bullets: Vec::new(),
        explosions: Vec::new(),
        score: 0,
        level: 1,
        status: GameStatus::Menu,
        spawn_timer: 0.0,
        shoot_timer: 0.0,
        ids: IdGenerator::new(),
    }
}

/// Build the state of a freshly started game with the opening formation.
pub fn init_state() -> GameState {
    let mut ids = IdGenerator::new();
    let mut enemies = Vec::with_capacity(GRID_COLS * GRID_ROWS);
    for row in 0..GRID_ROWS {
        for col in 0..GRID_COLS {
            let position = Position::new(
                GRID_START_X + col as f64 * GRID_GAP_X,
                GRID_START_Y + row as f64 * GRID_GAP_Y,
            );
            let direction = if col % 2 == 0 {
                Direction::Right
            } else {
                Direction::Left
            };
            enemies.push(Enemy::normal(ids.next_id(), position, direction));
        }
    }

    GameState {
        enemies,
        status: GameStatus::Playing,
        ids,
        ..menu_state()
    }
}

// ── Input-driven state transitions ──────────────────────────────────────────

pub fn move_player(state: &GameState, direction: Direction, delta: f64) -> GameState {
    let x = (state.player.position.x + direction.sign() * PLAYER_SPEED * delta).clamp(MIN_X, MAX_X);
    GameState {
        player: Player {
            position: Position { x, ..state.player.position },
            ..state.player.clone()
        },
        ..state.clone()
    }
}

/// Fire a bullet from the player's muzzle.  Ignored unless playing.
pub fn player_shoot(state: &GameState) -> GameState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }
    let mut next = state.clone();
    let origin = state.player.position;
    let bullet = Bullet::new(
        next.ids.next_id(),
        Position::new(origin.x, origin.y - MUZZLE_OFFSET),
        BulletOwner::Player,
    );
    next.bullets.push(bullet);
    next
}

// ── Spawning ─────────────────────────────────────────────────────────────────

pub fn spawn_enemy(state: &GameState, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    let kind = if rng.gen_bool(BOSS_CHANCE) {
        EnemyKind::Boss
    } else {
        EnemyKind::Normal
    };
    let position = Position::new(rng.gen_range(SPAWN_MIN_X..SPAWN_MAX_X), SPAWN_Y);
    let direction = if rng.gen_bool(0.5) {
        Direction::Right
    } else {
        Direction::Left
    };
    let enemy = Enemy::new(next.ids.next_id(), position, kind, direction);
    debug!(id = enemy.id, ?kind, x = position.x, "enemy spawned");
    next.enemies.push(enemy);
    next
}

/// A random enemy fires downward.  No-op when the sky is empty.
pub fn enemy_shoot(state: &GameState, rng: &mut impl Rng) -> GameState {
    if state.enemies.is_empty() {
        return state.clone();
    }
    let mut next = state.clone();
    let shooter = state.enemies[rng.gen_range(0..state.enemies.len())].position;
    let bullet = Bullet::new(
        next.ids.next_id(),
        Position::new(shooter.x, shooter.y + ENEMY_MUZZLE_OFFSET),
        BulletOwner::Enemy,
    );
    next.bullets.push(bullet);
    next
}

/// Accumulate `delta` on the spawn and shoot timers and fire whichever
/// has run out.  The shoot timer keeps running while no enemy can fire.
pub fn advance_timers(state: &GameState, delta: f64, rng: &mut impl Rng) -> GameState {
    let mut next = GameState {
        spawn_timer: state.spawn_timer + delta,
        shoot_timer: state.shoot_timer + delta,
        ..state.clone()
    };

    if next.spawn_timer > SPAWN_INTERVAL_MS {
        next = spawn_enemy(&next, rng);
        next.spawn_timer = 0.0;
    }
    if next.shoot_timer > SHOOT_INTERVAL_MS && !next.enemies.is_empty() {
        next = enemy_shoot(&next, rng);
        next.shoot_timer = 0.0;
    }
    next
}

// ── Movement ─────────────────────────────────────────────────────────────────

pub fn update_bullets(state: &GameState, delta: f64) -> GameState {
    let bullets = state
        .bullets
        .iter()
        .map(|b| {
            let dir = match b.owner {
                BulletOwner::Player => -1.0,
                BulletOwner::Enemy => 1.0,
            };
            let y = b.position.y + dir * BULLET_SPEED * delta;
            Bullet {
                position: Position { y, ..b.position },
                ..b.clone()
            }
        })
        .filter(|b| b.position.y > BULLET_MIN_Y && b.position.y < BULLET_MAX_Y)
        .collect();

    GameState {
        bullets,
        ..state.clone()
    }
}

/// Quadratic Bézier through `start`, a control point at `DIVE_CONTROL_Y`
/// above the target, and the target at `DIVE_END_Y`.
pub fn dive_position(start: Position, target_x: f64, t: f64) -> Position {
    let u = 1.0 - t;
    let x = u * u * start.x + 2.0 * u * t * target_x + t * t * target_x;
    let y = u * u * start.y + 2.0 * u * t * DIVE_CONTROL_Y + t * t * DIVE_END_Y;
    Position::new(x, y)
}

fn advance_enemy(enemy: &Enemy, delta: f64, rng: &mut impl Rng) -> Enemy {
    let mut e = enemy.clone();

    if e.diving {
        e.dive_progress = (e.dive_progress + ENEMY_DIVE_SPEED * delta / 1000.0).min(1.0);
        e.position = dive_position(e.dive_start, e.dive_target_x, e.dive_progress);
        if e.dive_progress >= 1.0 {
            e.diving = false;
            e.dive_progress = 0.0;
            e.position = Position::new(e.dive_target_x, DIVE_END_Y);
        }
        return e;
    }

    e.position.x += ENEMY_SPEED * delta * e.direction.sign();
    if e.position.x < MIN_X {
        e.position.x = MIN_X;
        e.direction = Direction::Right;
    } else if e.position.x > MAX_X {
        e.position.x = MAX_X;
        e.direction = Direction::Left;
    }

    if rng.gen::<f64>() < DIVE_CHANCE_PER_MS * delta {
        e.diving = true;
        e.dive_progress = 0.0;
        e.dive_target_x = rng.gen_range(SPAWN_MIN_X..SPAWN_MAX_X);
        e.dive_start = e.position;
        debug!(id = e.id, target_x = e.dive_target_x, "enemy dive started");
    }
    e
}

/// Move the formation and divers.  Every enemy that slips below
/// `ESCAPE_Y` outside a dive is removed and costs the player a life.
pub fn update_enemies(state: &GameState, delta: f64, rng: &mut impl Rng) -> GameState {
    let mut escaped = 0usize;
    let enemies: Vec<Enemy> = state
        .enemies
        .iter()
        .map(|e| advance_enemy(e, delta, rng))
        .filter(|e| {
            let gone = e.position.y > ESCAPE_Y && !e.diving;
            if gone {
                escaped += 1;
            }
            !gone
        })
        .collect();

    let mut next = GameState {
        enemies,
        ..state.clone()
    };
    for _ in 0..escaped {
        next = player_hit(&next);
    }
    next
}

pub fn update_explosions(state: &GameState, delta: f64) -> GameState {
    let explosions = state
        .explosions
        .iter()
        .map(|ex| Explosion {
            progress: ex.progress + delta / EXPLOSION_DURATION_MS,
            ..ex.clone()
        })
        .filter(|ex| ex.progress < 1.0)
        .collect();

    GameState {
        explosions,
        ..state.clone()
    }
}

// ── Damage ───────────────────────────────────────────────────────────────────

/// The player takes one hit: an explosion at the ship and one life lost.
/// Losing the last life ends the game; hits after that are ignored.
pub fn player_hit(state: &GameState) -> GameState {
    if state.status == GameStatus::GameOver || state.player.lives == 0 {
        return state.clone();
    }
    let mut next = state.clone();
    let explosion = Explosion::new(next.ids.next_id(), state.player.position);
    next.explosions.push(explosion);
    next.player.lives -= 1;
    debug!(lives = next.player.lives, "player hit");
    if next.player.lives == 0 {
        next.status = GameStatus::GameOver;
    }
    next
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by `delta` milliseconds.
///
/// Order within a tick: player steering, timers, bullets, enemies,
/// explosions, then collisions.
pub fn step(
    state: &GameState,
    steer: Option<Direction>,
    delta: f64,
    rng: &mut impl Rng,
) -> GameState {
    let mut next = match steer {
        Some(direction) => move_player(state, direction, delta),
        None => state.clone(),
    };
    next = advance_timers(&next, delta, rng);
    next = update_bullets(&next, delta);
    next = update_enemies(&next, delta, rng);
    next = update_explosions(&next, delta);
    resolve_collisions(&next).state
}
