/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable snapshot of the
/// game.  No game logic is performed; this module only scales the logical
/// playfield onto the terminal and translates it into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use galaga::compute::PLAYFIELD_SIZE;
use galaga::entities::{Bullet, BulletOwner, Enemy, EnemyKind, Explosion, GameStatus, Position};
use galaga::game_loop::Snapshot;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkMagenta;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LEVEL: Color = Color::White;
const C_HUD_LIVES: Color = Color::Red;
const C_PLAYER: Color = Color::Blue;
const C_ENEMY_NORMAL: Color = Color::Magenta;
const C_ENEMY_BOSS: Color = Color::Red;
const C_BULLET_PLAYER: Color = Color::Yellow;
const C_BULLET_ENEMY: Color = Color::Red;
const C_EXPLOSION: Color = Color::DarkYellow;
const C_HINT: Color = Color::DarkGrey;

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Terminal area the playfield is drawn into.  Row 0 is the HUD, rows 1 and
/// `height - 2` are the border, the last row holds the controls hint.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    /// Map a logical position to a terminal cell, or `None` when it lies
    /// outside the playfield.
    fn cell(&self, pos: Position) -> Option<(u16, u16)> {
        if !(0.0..PLAYFIELD_SIZE).contains(&pos.x) || !(0.0..PLAYFIELD_SIZE).contains(&pos.y) {
            return None;
        }
        let inner_w = f64::from(self.width.saturating_sub(2).max(1));
        let inner_h = f64::from(self.height.saturating_sub(4).max(1));
        let col = 1 + (pos.x / PLAYFIELD_SIZE * inner_w) as u16;
        let row = 2 + (pos.y / PLAYFIELD_SIZE * inner_h) as u16;
        Some((
            col.min(self.width.saturating_sub(2)),
            row.min(self.height.saturating_sub(3)),
        ))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, snap: &Snapshot, view: Viewport) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, view)?;
    draw_hud(out, snap, view)?;

    for explosion in &snap.explosions {
        draw_explosion(out, explosion, view)?;
    }
    for enemy in &snap.enemies {
        draw_enemy(out, enemy, view)?;
    }
    for bullet in &snap.bullets {
        draw_bullet(out, bullet, view)?;
    }

    if snap.status != GameStatus::GameOver && snap.lives > 0 {
        draw_player(out, snap, view)?;
    }
    draw_controls_hint(out, view)?;

    match snap.status {
        GameStatus::Menu => draw_overlay(
            out,
            view,
            &[
                ("GALAGA GAME", Color::Cyan),
                ("← → : Move   SPACE : Shoot   P : Pause", Color::White),
                ("ENTER - Start   Q - Quit", Color::Green),
            ],
        )?,
        GameStatus::Paused => draw_overlay(
            out,
            view,
            &[("PAUSED", Color::Yellow), ("P - Resume   R - Restart", Color::White)],
        )?,
        GameStatus::GameOver => {
            let score_line = format!("Final Score: {:>6}", snap.score);
            draw_overlay(
                out,
                view,
                &[
                    ("GAME OVER", Color::Red),
                    (score_line.as_str(), Color::Yellow),
                    ("R - Play Again   Q - Quit", Color::White),
                ],
            )?
        }
        GameStatus::Playing => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    let w = view.width as usize;
    let h = view.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, snap: &Snapshot, view: Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Points:{:>6}", snap.score)))?;

    let level_str = format!("Level: {}", snap.level);
    let lx = (view.width / 2).saturating_sub(level_str.len() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(&level_str))?;

    let lives_str = format!("Life:{}", "♥".repeat(snap.lives as usize));
    let rx = view
        .width
        .saturating_sub(lives_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, snap: &Snapshot, view: Viewport) -> std::io::Result<()> {
    let Some((col, row)) = view.cell(snap.player.position) else {
        return Ok(());
    };
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), row))?;
    out.queue(Print("/▲\\"))?;
    Ok(())
}

fn draw_enemy<W: Write>(out: &mut W, enemy: &Enemy, view: Viewport) -> std::io::Result<()> {
    let Some((col, row)) = view.cell(enemy.position) else {
        return Ok(());
    };
    out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), row))?;
    match enemy.kind {
        EnemyKind::Normal => {
            out.queue(style::SetForegroundColor(C_ENEMY_NORMAL))?;
            out.queue(Print("«▼»"))?;
        }
        EnemyKind::Boss => {
            // Health pips instead of the browser's health bar.
            out.queue(style::SetForegroundColor(C_ENEMY_BOSS))?;
            let sprite = match enemy.health {
                3 => "(◉)",
                2 => "(◎)",
                _ => "(○)",
            };
            out.queue(Print(sprite))?;
        }
    }
    Ok(())
}

fn draw_bullet<W: Write>(out: &mut W, bullet: &Bullet, view: Viewport) -> std::io::Result<()> {
    let Some((col, row)) = view.cell(bullet.position) else {
        return Ok(());
    };
    out.queue(cursor::MoveTo(col, row))?;
    match bullet.owner {
        BulletOwner::Player => {
            out.queue(style::SetForegroundColor(C_BULLET_PLAYER))?;
            out.queue(Print("║"))?;
        }
        BulletOwner::Enemy => {
            out.queue(style::SetForegroundColor(C_BULLET_ENEMY))?;
            out.queue(Print("↓"))?;
        }
    }
    Ok(())
}

fn draw_explosion<W: Write>(
    out: &mut W,
    explosion: &Explosion,
    view: Viewport,
) -> std::io::Result<()> {
    let Some((col, row)) = view.cell(explosion.position) else {
        return Ok(());
    };
    let glyph = if explosion.progress < 0.33 {
        "✺"
    } else if explosion.progress < 0.66 {
        "✹"
    } else {
        "·"
    };
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(C_EXPLOSION))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   P : Pause   Q : Quit"))?;
    Ok(())
}

// ── Centred overlays ──────────────────────────────────────────────────────────

fn draw_overlay<W: Write>(
    out: &mut W,
    view: Viewport,
    lines: &[(&str, Color)],
) -> std::io::Result<()> {
    let cx = view.width / 2;
    let start_row = (view.height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}
