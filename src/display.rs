/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// session.  No game logic is performed; this module only translates state
/// into terminal commands, scaling the world onto the terminal grid.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use rand::Rng;

use flappy_bird::compute::pipe_rect;
use flappy_bird::config::GameConfig;
use flappy_bird::entities::{GameStatus, HighScoreEntry, Pipe};
use flappy_bird::ledger::format_score;
use flappy_bird::session::Session;

// ── Colour themes (cycled with C) ────────────────────────────────────────────

struct Theme {
    bird: Color,
    pipe: Color,
    pipe_edge: Color,
    ground: Color,
}

const THEMES: [Theme; 3] = [
    Theme {
        bird: Color::Yellow,
        pipe: Color::Green,
        pipe_edge: Color::DarkGreen,
        ground: Color::DarkYellow,
    },
    Theme {
        bird: Color::Red,
        pipe: Color::Blue,
        pipe_edge: Color::DarkBlue,
        ground: Color::DarkGrey,
    },
    Theme {
        bird: Color::White,
        pipe: Color::Magenta,
        pipe_edge: Color::DarkMagenta,
        ground: Color::DarkCyan,
    },
];

const C_HUD_SCORE: Color = Color::White;
const C_RECORDS: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

/// World-to-terminal mapping.  Row 0 is the HUD and the last row is the
/// ground strip; the world fills everything in between.
struct Viewport {
    cols: i32,
    rows: i32,
    world_w: i32,
    world_h: i32,
}

impl Viewport {
    fn new(cfg: &GameConfig, width: u16, height: u16) -> Self {
        Self {
            cols: width as i32,
            rows: (height as i32 - 2).max(1),
            world_w: cfg.world_width,
            world_h: cfg.world_height,
        }
    }

    fn col(&self, x: i32) -> i32 {
        x * self.cols / self.world_w
    }

    fn row(&self, y: i32) -> i32 {
        1 + y * self.rows / self.world_h
    }
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one complete frame.  `name_input` is the text typed so far while
/// the session awaits a name.
pub fn render<W: Write, R: Rng>(
    out: &mut W,
    session: &Session<R>,
    name_input: &str,
) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let view = Viewport::new(session.config(), width, height);
    let theme = &THEMES[session.texture() % THEMES.len()];
    let state = session.state();

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    for pipe in &state.pipes {
        draw_pipe(out, &view, theme, pipe)?;
    }
    draw_ground(out, theme, width, height)?;
    draw_bird(out, &view, theme, session)?;
    draw_hud(out, state.score)?;
    draw_records(out, width, session.ledger().entries())?;

    match state.status {
        GameStatus::Playing => draw_controls_hint(out, height)?,
        GameStatus::AwaitingNameInput => draw_name_entry(out, width, height, name_input)?,
        GameStatus::GameOver => draw_game_over(out, width, height, state.new_record)?,
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

/// Full-screen list of saved scores, shown from the menu.
pub fn render_high_scores<W: Write>(
    out: &mut W,
    entries: &[HighScoreEntry],
) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let top = (height / 2).saturating_sub(4);

    out.queue(terminal::Clear(terminal::ClearType::All))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    print_centered(out, cx, top, "HIGH SCORES")?;

    out.queue(style::SetForegroundColor(Color::White))?;
    if entries.is_empty() {
        print_centered(out, cx, top + 2, "No saved scores.")?;
    }
    for (i, line) in record_lines(entries).iter().enumerate() {
        print_centered(out, cx, top + 2 + i as u16, line)?;
    }

    out.queue(style::SetForegroundColor(C_HINT))?;
    print_centered(out, cx, top + 9, "Press any key to return")?;
    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

// ── World ─────────────────────────────────────────────────────────────────────

fn draw_pipe<W: Write>(
    out: &mut W,
    view: &Viewport,
    theme: &Theme,
    pipe: &Pipe,
) -> std::io::Result<()> {
    let r = pipe_rect(pipe);
    let left = view.col(r.x).max(0);
    let right = view.col(r.x + r.width).min(view.cols);
    if right <= left {
        return Ok(());
    }
    let top = view.row(r.y);
    let bottom = view.row(r.y + r.height);
    let body = "█".repeat((right - left) as usize);

    out.queue(style::SetForegroundColor(theme.pipe))?;
    for row in top..bottom {
        out.queue(cursor::MoveTo(left as u16, row as u16))?;
        out.queue(Print(&body))?;
    }

    // Lip on the end that faces the gap
    let lip_row = if r.y == 0 { bottom - 1 } else { top };
    if lip_row >= top && lip_row < bottom {
        out.queue(style::SetForegroundColor(theme.pipe_edge))?;
        out.queue(cursor::MoveTo(left as u16, lip_row as u16))?;
        out.queue(Print("▓".repeat((right - left) as usize)))?;
    }
    Ok(())
}

fn draw_ground<W: Write>(
    out: &mut W,
    theme: &Theme,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(theme.ground))?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.queue(Print("▀".repeat(width as usize)))?;
    Ok(())
}

fn draw_bird<W: Write, R: Rng>(
    out: &mut W,
    view: &Viewport,
    theme: &Theme,
    session: &Session<R>,
) -> std::io::Result<()> {
    let cfg = session.config();
    let bird = &session.state().bird;
    let row = view.row(bird.y + cfg.bird_size / 2);
    // Off the top or bottom: nothing on screen to draw
    if row < 1 || row > view.rows {
        return Ok(());
    }
    let col = view.col(cfg.bird_x).max(0);
    // Wing up while rising, down while falling
    let sprite = if bird.velocity < 0 { "^o>" } else { "vo>" };
    out.queue(style::SetForegroundColor(theme.bird))?;
    out.queue(cursor::MoveTo(col as u16, row as u16))?;
    out.queue(Print(sprite))?;
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, score: f32) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {}", format_score(score))))?;
    Ok(())
}

fn record_lines(entries: &[HighScoreEntry]) -> Vec<String> {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| format!("{}. {} {}", i + 1, e.name, format_score(e.score)))
        .collect()
}

fn draw_records<W: Write>(
    out: &mut W,
    width: u16,
    entries: &[HighScoreEntry],
) -> std::io::Result<()> {
    let lines = record_lines(entries);
    let col_width = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max("Records:".len()) as u16;
    let col = width.saturating_sub(col_width + 1);

    out.queue(style::SetForegroundColor(C_RECORDS))?;
    out.queue(cursor::MoveTo(col, 0))?;
    out.queue(Print("Records:"))?;
    for (i, line) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(col, 1 + i as u16))?;
        out.queue(Print(line))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(" SPACE : Flap   C : Theme   Q : Quit "))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn print_centered<W: Write>(out: &mut W, cx: u16, row: u16, msg: &str) -> std::io::Result<()> {
    let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(Print(msg))?;
    Ok(())
}

fn draw_name_entry<W: Write>(
    out: &mut W,
    width: u16,
    height: u16,
    name_input: &str,
) -> std::io::Result<()> {
    let field = format!("> {}_", name_input);
    let lines: &[(&str, Color)] = &[
        ("╔══════════════════════════╗", Color::Blue),
        ("║   NEW RECORD! YOUR NAME  ║", Color::Blue),
        ("╚══════════════════════════╝", Color::Blue),
        (&field, Color::White),
        ("ENTER - Save   ESC - Skip", C_HINT),
    ];
    draw_box_lines(out, width, height, lines)
}

fn draw_game_over<W: Write>(
    out: &mut W,
    width: u16,
    height: u16,
    new_record: bool,
) -> std::io::Result<()> {
    let banner = if new_record { "NEW RECORD!" } else { "" };
    let lines: &[(&str, Color)] = &[
        (banner, Color::Blue),
        ("╔══════════════════╗", Color::Red),
        ("║    GAME  OVER    ║", Color::Red),
        ("╚══════════════════╝", Color::Red),
        ("ENTER - Play Again  ESC - Menu", Color::White),
    ];
    draw_box_lines(out, width, height, lines)
}

fn draw_box_lines<W: Write>(
    out: &mut W,
    width: u16,
    height: u16,
    lines: &[(&str, Color)],
) -> std::io::Result<()> {
    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        out.queue(style::SetForegroundColor(*color))?;
        print_centered(out, cx, start_row + i as u16, msg)?;
    }
    Ok(())
}
