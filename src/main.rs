mod display;

use std::fs::OpenOptions;
use std::io::{self, stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use log::{error, info};
use rand::thread_rng;
use rand::Rng;

use flappy_bird::config::{log_file_path, score_file_path, GameConfig};
use flappy_bird::entities::{Command, GameStatus};
use flappy_bird::ledger::Ledger;
use flappy_bird::session::{Flow, Session};

/// Longest name accepted in the name-entry box.
const MAX_NAME_LEN: usize = 20;

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal belongs to the game, so log lines go to a file.  If the
/// file cannot be opened logging simply stays off.
fn init_logging() {
    let path = log_file_path();
    if let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .target(env_logger::Target::Pipe(Box::new(file)))
            .format_timestamp_secs()
            .try_init();
    }
}

/// Blocking wait for the next key press.  `None` once the input thread is gone.
fn next_key(rx: &mpsc::Receiver<Event>) -> Option<KeyEvent> {
    loop {
        match rx.recv() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => return Some(key),
            Ok(_) => continue,
            Err(_) => return None,
        }
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Play,
    HighScores,
    Quit,
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "~  FLAPPY  BIRD  ~";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(5),
    ))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(title))?;

    let options: &[(&str, &str, Color)] = &[
        ("1", "Play", Color::Green),
        ("2", "High scores", Color::Cyan),
        ("Q", "Quit", Color::Red),
    ];

    for (i, (key, label, color)) in options.iter().enumerate() {
        let row = cy.saturating_sub(2) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(8), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*label))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(16), cy + 3))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("SPACE : Flap   C : Theme   ESC : Menu"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    while let Some(key) = next_key(rx) {
        if is_ctrl_c(&key) {
            return Ok(MenuResult::Quit);
        }
        match key.code {
            KeyCode::Char('1') | KeyCode::Enter => return Ok(MenuResult::Play),
            KeyCode::Char('2') | KeyCode::Char('h') | KeyCode::Char('H') => {
                return Ok(MenuResult::HighScores);
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                return Ok(MenuResult::Quit);
            }
            _ => {}
        }
    }
    Ok(MenuResult::Quit)
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to menu.
///
/// Input events arrive on `rx` from the reader thread and are drained in
/// full between ticks, so a tick never sees half a command.  While the
/// session awaits a name, keys edit the name buffer instead; ticks keep
/// firing but are no-ops in that state.
fn game_loop<W: Write, R: Rng>(
    out: &mut W,
    session: &mut Session<R>,
    rx: &mpsc::Receiver<Event>,
) -> io::Result<bool> {
    let frame = session.config().tick_period;
    let mut name = String::new();

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(event) = rx.try_recv() {
            let Event::Key(key) = event else { continue };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if is_ctrl_c(&key) {
                return Ok(true);
            }

            if session.state().status == GameStatus::AwaitingNameInput {
                match key.code {
                    KeyCode::Enter => {
                        session.submit_name(Some(&name));
                        name.clear();
                    }
                    KeyCode::Esc => {
                        session.submit_name(None);
                        name.clear();
                    }
                    KeyCode::Backspace => {
                        name.pop();
                    }
                    KeyCode::Char(c) if name.chars().count() < MAX_NAME_LEN => name.push(c),
                    _ => {}
                }
                continue;
            }

            let command = match key.code {
                KeyCode::Char(' ') | KeyCode::Up => Command::Jump,
                KeyCode::Enter => Command::Reset,
                KeyCode::Char('c') | KeyCode::Char('C') => Command::CycleTexture,
                KeyCode::Esc => Command::QuitToMenu,
                KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),
                _ => continue,
            };
            if session.apply(command).map_err(io::Error::other)? == Flow::Ended {
                return Ok(false);
            }
        }

        session.tick().map_err(io::Error::other)?;

        display::render(out, session, &name)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> io::Result<()> {
    init_logging();
    info!("starting");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        error!("exiting with error: {}", e);
    }
    result
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> io::Result<()> {
    let config = GameConfig::default();
    config.validate().map_err(io::Error::other)?;
    let mut ledger = Ledger::load_from(score_file_path(), config.ledger_capacity);

    loop {
        match show_menu(out, rx)? {
            MenuResult::Quit => break,
            MenuResult::HighScores => {
                display::render_high_scores(out, ledger.entries())?;
                if next_key(rx).is_none() {
                    break;
                }
            }
            MenuResult::Play => {
                let mut session = Session::new(config.clone(), ledger, thread_rng())
                    .map_err(io::Error::other)?;
                let quit = game_loop(out, &mut session, rx)?;
                ledger = session.into_ledger();

                if quit {
                    break;
                }
                // Otherwise loop back to the menu
            }
        }
    }
    info!("bye");
    Ok(())
}
