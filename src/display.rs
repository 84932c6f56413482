/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of
/// the session.  No game logic is performed; this module only scales
/// playfield pixels down to terminal cells and emits crossterm
/// commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use robo_patrol::entities::{MotionBody, Rect, SessionStatus};
use robo_patrol::world::{Session, World, PLAYFIELD_H, PLAYFIELD_W};

/// Playfield pixels per terminal cell.  960×400 px → 120×25 cells.
const CELL_W: i32 = 8;
const CELL_H: i32 = 16;

/// Terminal row where the playfield starts (row 0 is the HUD).
const FIELD_TOP: u16 = 1;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BOX: Color = Color::DarkGreen;
const C_PLAYER: Color = Color::Yellow;
const C_ENEMY: Color = Color::DarkYellow;
const C_ENEMY_HURT: Color = Color::Red;
const C_PROJECTILE: Color = Color::Red;
const C_HUD: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, session: &Session) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_hud(out, &session.world)?;
    draw_world(out, &session.world)?;
    draw_hint(out)?;

    match session.status {
        SessionStatus::GameOver => draw_banner(out, "GAME  OVER")?,
        SessionStatus::Victory => draw_banner(out, "YOU  WON!")?,
        _ => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, field_rows() + 2))?;
    out.flush()?;
    Ok(())
}

fn field_cols() -> u16 {
    (PLAYFIELD_W / CELL_W) as u16
}

fn field_rows() -> u16 {
    (PLAYFIELD_H / CELL_H) as u16
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, world: &World) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print("ROBO PATROL"))?;

    let status = format!("Robots: {}", world.enemies.len());
    let rx = field_cols().saturating_sub(status.chars().count() as u16);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(Print(&status))?;
    Ok(())
}

// ── Playfield ─────────────────────────────────────────────────────────────────

fn draw_world<W: Write>(out: &mut W, world: &World) -> std::io::Result<()> {
    for b in &world.barrier.boxes {
        fill_rect(out, b, C_BOX)?;
    }
    for p in &world.projectiles.projectiles {
        fill_rect(out, &p.rect, C_PROJECTILE)?;
    }
    for enemy in &world.enemies {
        fill_rect(out, &enemy.rect, enemy_color(enemy))?;
    }
    fill_rect(out, &world.player.rect, C_PLAYER)?;
    Ok(())
}

/// Terminal stand-in for the proportional health bar: a robot below
/// half life renders in the hurt colour.
fn enemy_color(enemy: &MotionBody) -> Color {
    if enemy.life * 2 <= enemy.max_life {
        C_ENEMY_HURT
    } else {
        C_ENEMY
    }
}

/// Paint the cells a pixel rect covers.  Every entity spans at least
/// one cell so nothing vanishes at this scale.
fn fill_rect<W: Write>(out: &mut W, r: &Rect, color: Color) -> std::io::Result<()> {
    let c0 = (r.x / CELL_W).clamp(0, PLAYFIELD_W / CELL_W - 1);
    let r0 = (r.y / CELL_H).clamp(0, PLAYFIELD_H / CELL_H - 1);
    let c1 = ((r.x + r.w + CELL_W - 1) / CELL_W).clamp(c0 + 1, PLAYFIELD_W / CELL_W);
    let r1 = ((r.y + r.h + CELL_H - 1) / CELL_H).clamp(r0 + 1, PLAYFIELD_H / CELL_H);

    out.queue(style::SetForegroundColor(color))?;
    let run: String = "█".repeat((c1 - c0) as usize);
    for row in r0..r1 {
        out.queue(cursor::MoveTo(c0 as u16, FIELD_TOP + row as u16))?;
        out.queue(Print(&run))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_hint<W: Write>(out: &mut W) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(0, field_rows() + 1))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "← → / A D : Move   ↑ / SPACE : Jump   X : Fire   Q : Quit",
    ))?;
    Ok(())
}

// ── Terminal-state banners ────────────────────────────────────────────────────

fn draw_banner<W: Write>(out: &mut W, title: &str) -> std::io::Result<()> {
    let framed = format!("║  {}  ║", title);
    let bar = "═".repeat(framed.chars().count() - 2);
    let top = format!("╔{}╗", bar);
    let bottom = format!("╚{}╝", bar);
    let lines: &[(&str, Color)] = &[
        (&top, Color::Red),
        (&framed, Color::Red),
        (&bottom, Color::Red),
        ("Press ENTER to start again", Color::White),
    ];

    let cx = field_cols() / 2;
    let start_row = (field_rows() / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
