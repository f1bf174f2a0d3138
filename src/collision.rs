/// Bullet collision resolution, run once per tick after movement.
///
/// Both passes walk their lists from the end backward.  A player bullet is
/// spent on the first enemy it overlaps in that order, so one bullet damages
/// at most one enemy per tick even when several overlap it.

use tracing::debug;

use crate::compute::player_hit;
use crate::entities::{BulletOwner, EnemyKind, EntityId, Explosion, GameState, Position};

/// Half-extent of the square hit box around every ship.
pub const HIT_RADIUS: f64 = 18.0;

#[derive(Clone, Debug, PartialEq)]
pub enum CollisionEvent {
    EnemyDamaged { id: EntityId, health: u32 },
    EnemyDestroyed { id: EntityId, kind: EnemyKind, award: u32 },
    PlayerHit { lives: u32 },
}

#[derive(Clone, Debug)]
pub struct Resolution {
    pub state: GameState,
    pub events: Vec<CollisionEvent>,
}

pub fn overlaps(a: Position, b: Position) -> bool {
    (a.x - b.x).abs() < HIT_RADIUS && (a.y - b.y).abs() < HIT_RADIUS
}

pub fn resolve_collisions(state: &GameState) -> Resolution {
    let mut next = state.clone();
    let mut events = Vec::new();

    // ── 1. Player bullets ↔ enemies ──────────────────────────────────────────
    for bi in (0..next.bullets.len()).rev() {
        let bullet = &next.bullets[bi];
        if bullet.owner != BulletOwner::Player {
            continue;
        }
        let origin = bullet.position;
        let Some(ei) = (0..next.enemies.len())
            .rev()
            .find(|&ei| overlaps(origin, next.enemies[ei].position))
        else {
            continue;
        };

        next.bullets.remove(bi);

        let enemy = &mut next.enemies[ei];
        enemy.health = enemy.health.saturating_sub(1);
        if enemy.health > 0 {
            events.push(CollisionEvent::EnemyDamaged {
                id: enemy.id,
                health: enemy.health,
            });
            continue;
        }

        let dead = next.enemies.remove(ei);
        let award = dead.kind.score();
        let explosion = Explosion::new(next.ids.next_id(), dead.position);
        next.explosions.push(explosion);
        next.score += award;
        debug!(id = dead.id, kind = ?dead.kind, award, score = next.score, "enemy destroyed");
        events.push(CollisionEvent::EnemyDestroyed {
            id: dead.id,
            kind: dead.kind,
            award,
        });
    }

    // ── 2. Enemy bullets ↔ player ────────────────────────────────────────────
    for bi in (0..next.bullets.len()).rev() {
        let bullet = &next.bullets[bi];
        if bullet.owner != BulletOwner::Enemy
            || !overlaps(bullet.position, next.player.position)
        {
            continue;
        }
        next.bullets.remove(bi);
        let before = next.player.lives;
        next = player_hit(&next);
        if next.player.lives < before {
            events.push(CollisionEvent::PlayerHit {
                lives: next.player.lives,
            });
        }
    }

    Resolution { state: next, events }
}
