// src/main.rs
use clap::Parser;
use env_logger::Env;
use lazy_static::lazy_static;
use log::error;
use regex::Regex;
use std::boxed::Box;
use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;

use chess_rules::error::{CastleSide, ParsePositionError};
use chess_rules::{
    render, Config, InvariantViolation, MoveError, Position, RenderStyle, Session, SideEffect,
};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

// --- Command Line ---

#[derive(Parser)]
#[command(name = "chess_rules", version, about = "Two-player chess on one terminal")]
struct Cli {
    /// YAML configuration file. Falls back to CHESS_CONFIG_PATH.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Draw the board with plain ASCII instead of Unicode glyphs and colors.
    #[arg(long)]
    ascii: bool,
    /// Keep the previous output instead of clearing the screen before each board.
    #[arg(long)]
    no_clear: bool,
}

// --- Input Parsing ---

#[derive(Debug)]
enum UserInput {
    Move(Position, Position),
    /// Only the origin was given; the destination is asked for separately.
    From(Position),
    Command(Command),
}

#[derive(Debug)]
enum Command {
    Help,
    History,
    Save(Option<String>),
    Reset,
    Quit,
}

#[derive(Debug, thiserror::Error)]
enum InputError {
    #[error(transparent)]
    Position(#[from] ParsePositionError),
    #[error("Unrecognized input '{0}'. Type 'help' for the list of commands.")]
    Unrecognized(String),
}

lazy_static! {
    // "e2e4", "e2 e4" or "e2-e4"; the halves are checked by `Position::from_str`.
    static ref MOVE_INPUT: Regex = Regex::new(r"^(\S{2})[\s-]*(\S{2})$").expect("move input pattern is valid");
}

fn parse_user_input(input: &str) -> Result<UserInput, InputError> {
    let trimmed = input.trim();

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let command_word = parts.next().unwrap_or("").to_lowercase();
    let argument = parts.next().unwrap_or("").trim();

    match command_word.as_str() {
        "help" | "?" => return Ok(UserInput::Command(Command::Help)),
        "history" => return Ok(UserInput::Command(Command::History)),
        "reset" => return Ok(UserInput::Command(Command::Reset)),
        "quit" | "exit" => return Ok(UserInput::Command(Command::Quit)),
        "save" => {
            let filename = if argument.is_empty() { None } else { Some(argument.to_string()) };
            return Ok(UserInput::Command(Command::Save(filename)));
        }
        _ => {}
    }

    if let Some(caps) = MOVE_INPUT.captures(trimmed) {
        let from = caps[1].parse()?;
        let to = caps[2].parse()?;
        return Ok(UserInput::Move(from, to));
    }
    if trimmed.chars().count() < 4 {
        return Ok(UserInput::From(trimmed.parse()?));
    }
    Err(InputError::Unrecognized(trimmed.to_string()))
}

/// `None` on end of input.
fn read_line() -> io::Result<Option<String>> {
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Asks until a well-formed position is entered. `None` on end of input.
fn prompt_position(label: &str) -> io::Result<Option<Position>> {
    loop {
        print!("{}", label);
        io::stdout().flush()?;
        let line = match read_line()? {
            Some(line) => line,
            None => return Ok(None),
        };
        match line.trim().parse::<Position>() {
            Ok(pos) => return Ok(Some(pos)),
            Err(e) => println!("{}", e),
        }
    }
}

// --- Move Handling ---

/// Status line for the attempted move. Only an invariant violation escapes.
fn play(session: &mut Session, from: Position, to: Position) -> Result<String, InvariantViolation> {
    match session.try_move(from, to) {
        Ok(applied) => {
            let mut status = format!("Last move: {} to {}", from, to);
            match applied.effect {
                SideEffect::Castle { side: CastleSide::Kingside, .. } => status.push_str(" (castling kingside)"),
                SideEffect::Castle { side: CastleSide::Queenside, .. } => status.push_str(" (castling queenside)"),
                SideEffect::EnPassant { .. } => status.push_str(" (en passant)"),
                SideEffect::None | SideEffect::Capture(_) => {}
            }
            if let Some(victim) = applied.captured {
                status.push_str(&format!(", captured {}", victim));
            }
            if session.is_king_attacked(session.turn()) {
                status.push_str(&format!("\n{} king is attacked.", session.turn()));
            }
            Ok(status)
        }
        Err(MoveError::Rejected(reason)) => Ok(format!("{} to {} failed: \"{}\"", from, to, reason)),
        Err(MoveError::Invariant(violation)) => Err(violation),
    }
}

fn history_text(session: &Session) -> String {
    let log = session.log();
    if log.is_empty() {
        return "No moves yet.".to_string();
    }
    let moves: Vec<String> = log.iter().map(|mv| mv.to_string()).collect();
    let mut text = String::from("Move History:");
    for (move_num, pair) in moves.chunks(2).enumerate() {
        text.push_str(&format!("\n{}. {}", move_num + 1, pair.join("  ")));
    }
    text
}

// --- Main Game Loop ---

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let env = Env::default().filter_or("CHESS_LOG_LEVEL", "warn");
    env_logger::Builder::from_env(env).init();

    let cfg_path = cli.config.clone().or_else(|| std::env::var_os("CHESS_CONFIG_PATH").map(PathBuf::from));
    let mut cfg = Config::load(cfg_path.as_deref())?;
    if cli.ascii {
        cfg.unicode = false;
    }
    if cli.no_clear {
        cfg.clear_screen = false;
    }
    let style = if cfg.unicode { RenderStyle::Unicode } else { RenderStyle::Ascii };

    let mut session = Session::new().with_castling_attack_rule(cfg.castling_attacks);
    let mut status = Some(help_text(&cfg));

    'game_loop: loop {
        // 1. Show the board with the outcome of the previous input
        if cfg.clear_screen {
            print!("{}", CLEAR_SCREEN);
        }
        if let Some(text) = status.take() {
            println!("{}\n", text);
        }
        print!("{}", render(&session.snapshot(), style));

        print!("\n{}'s turn. Enter move (e.g. e2e4) or command: ", session.turn());
        io::stdout().flush()?;

        // 2. Read input
        let input_line = match read_line() {
            Ok(Some(line)) => line,
            Ok(None) => {
                println!("\nEnd of input detected. Quitting game.");
                break 'game_loop;
            }
            Err(e) => {
                status = Some(format!("Error reading input: {}. Try again or use 'quit'/'exit'.", e));
                continue 'game_loop;
            }
        };
        if input_line.trim().is_empty() {
            continue 'game_loop;
        }

        // 3. Process input
        let (from, to) = match parse_user_input(&input_line) {
            Ok(UserInput::Move(from, to)) => (from, to),
            Ok(UserInput::From(from)) => match prompt_position("To:   ")? {
                Some(to) => (from, to),
                None => break 'game_loop,
            },
            Ok(UserInput::Command(command)) => {
                match command {
                    Command::Help => status = Some(help_text(&cfg)),
                    Command::History => status = Some(history_text(&session)),
                    Command::Save(filename) => {
                        let filename = filename.unwrap_or_else(|| cfg.history_file.clone());
                        status = Some(match session.save_log_to_file(&filename) {
                            Ok(()) => format!("Move history saved to '{}'.", filename),
                            Err(e) => format!("Error saving move history: {}", e),
                        });
                    }
                    Command::Reset => {
                        session.reset();
                        status = Some("New game started.".to_string());
                    }
                    Command::Quit => {
                        println!("Exiting game.");
                        break 'game_loop;
                    }
                }
                continue 'game_loop;
            }
            Err(e) => {
                status = Some(format!("Input Error: {}", e));
                continue 'game_loop;
            }
        };

        match play(&mut session, from, to) {
            Ok(text) => status = Some(text),
            Err(violation) => {
                error!("invariant violated after {} moves: {}", session.log().len(), violation);
                eprintln!("Internal engine error: {}", violation);
                eprintln!("The game cannot continue.");
                break 'game_loop;
            }
        }
    }

    session.destroy();
    println!("\nGame session finished.");
    Ok(())
}

fn help_text(cfg: &Config) -> String {
    [
        "Available Commands:".to_string(),
        "  <from><to>     Move a piece, e.g. e2e4 or e2 e4.".to_string(),
        "  <from>         Enter the origin only; you are asked for the destination.".to_string(),
        "                 Castling: move the king two files, e.g. e1g1.".to_string(),
        "  history        Show the moves played so far.".to_string(),
        format!("  save [file]    Save the move history as JSON (default: {}).", cfg.history_file),
        "  reset          Start a new game.".to_string(),
        "  help           Show this help message.".to_string(),
        "  quit / exit    Exit the game.".to_string(),
    ]
    .join("\n")
}
