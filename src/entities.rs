/// All game entity types — pure data, construction helpers only.

// ── Geometry ──────────────────────────────────────────────────────────────────

/// A point in the logical 400 × 400 playfield.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Horizontal heading. Converts to the ±1 multiplier used by movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

// ── Identity ──────────────────────────────────────────────────────────────────

pub type EntityId = u64;

/// Monotonic id source, one per game.  Every entity created during a game
/// draws from the same generator so ids never repeat across collections.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IdGenerator {
    next: EntityId,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> EntityId {
        let id = self.next;
        self.next += 1;
        id
    }
}

// ── Status ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Menu,
    Playing,
    Paused,
    GameOver,
}

// ── Player & enemy ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub position: Position,
    pub lives: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    Normal,
    Boss,
}

impl EnemyKind {
    /// Score awarded when an enemy of this kind is destroyed.
    pub fn score(self) -> u32 {
        match self {
            EnemyKind::Normal => 100,
            EnemyKind::Boss => 200,
        }
    }

    pub fn max_health(self) -> u32 {
        match self {
            EnemyKind::Normal => 1,
            EnemyKind::Boss => 3,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub id: EntityId,
    pub position: Position,
    pub kind: EnemyKind,
    pub health: u32,
    pub diving: bool,
    /// Fraction of the current dive completed, in `[0, 1]`.
    pub dive_progress: f64,
    pub dive_target_x: f64,
    /// Where the current dive began; the curve is always evaluated from here.
    pub dive_start: Position,
    pub direction: Direction,
}

impl Enemy {
    pub fn new(id: EntityId, position: Position, kind: EnemyKind, direction: Direction) -> Self {
        Self {
            id,
            position,
            kind,
            health: kind.max_health(),
            diving: false,
            dive_progress: 0.0,
            dive_target_x: 0.0,
            dive_start: position,
            direction,
        }
    }

    pub fn normal(id: EntityId, position: Position, direction: Direction) -> Self {
        Self::new(id, position, EnemyKind::Normal, direction)
    }

    pub fn boss(id: EntityId, position: Position, direction: Direction) -> Self {
        Self::new(id, position, EnemyKind::Boss, direction)
    }
}

// ── Projectiles & effects ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletOwner {
    Player,
    Enemy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub id: EntityId,
    pub position: Position,
    pub owner: BulletOwner,
}

impl Bullet {
    pub fn new(id: EntityId, position: Position, owner: BulletOwner) -> Self {
        Self { id, position, owner }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    pub id: EntityId,
    pub position: Position,
    /// Animation progress in `[0, 1)`; removed once it reaches 1.
    pub progress: f64,
}

impl Explosion {
    pub fn new(id: EntityId, position: Position) -> Self {
        Self {
            id,
            position,
            progress: 0.0,
        }
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire simulation state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub explosions: Vec<Explosion>,
    pub score: u32,
    pub level: u32,
    pub status: GameStatus,
    /// Milliseconds accumulated towards the next enemy spawn.
    pub spawn_timer: f64,
    /// Milliseconds accumulated towards the next enemy shot.
    pub shoot_timer: f64,
    pub ids: IdGenerator,
}
