//! Play command - interactive game in the terminal
//!
//! Input is coordinate-based: `s q r` toggles a marble, `m q r` moves the
//! current selection, `c` clears it. The engine validates everything; the
//! terminal layer only parses text into coordinates.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::{Args, ValueEnum};

use sumito_core::{
    generate_moves, AiOutcome, BOARD_RADIUS, Difficulty, GameConfig, GameMode, GameState,
    GameStatus, Hex, Player, Session,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Side {
    Black,
    White,
}

impl From<Side> for Player {
    fn from(side: Side) -> Self {
        match side {
            Side::Black => Player::Black,
            Side::White => Player::White,
        }
    }
}

#[derive(Args)]
pub struct PlayArgs {
    /// AI difficulty
    #[arg(long, default_value = "medium")]
    pub difficulty: Difficulty,

    /// Which color the AI controls
    #[arg(long, value_enum, default_value_t = Side::White)]
    pub ai: Side,

    /// Hotseat game with no AI
    #[arg(long)]
    pub pvp: bool,
}

pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let config = GameConfig {
        mode: if args.pvp {
            GameMode::HumanVsHuman
        } else {
            GameMode::HumanVsAi
        },
        ai_player: args.ai.into(),
        difficulty: args.difficulty,
    };

    let mut session = match seed {
        Some(seed) => Session::with_seed(config, seed),
        None => Session::new(config),
    };

    println!("Sumito - push six opposing marbles off the board to win.");
    println!("Commands: s <q> <r> (select/toggle), m <q> <r> (move), c (clear), n (new game), q (quit)");

    // The AI may own the opening move
    drive_ai(&mut session);

    let stdin = io::stdin();
    loop {
        render(session.game());

        if let GameStatus::Won(winner) = session.game().status() {
            println!("Game over: {:?} wins.", winner);
            println!("Enter n for a rematch or q to quit.");
        } else if human_is_stalled(&mut session) {
            continue;
        }

        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match parse_command(&line) {
            Some(Command::Quit) => break,
            Some(Command::New) => {
                session.reset();
                drive_ai(&mut session);
            }
            Some(Command::Clear) => session.clear_selection(),
            Some(Command::Select(hex)) => {
                if session.select(hex) {
                    show_selection(session.game());
                } else {
                    println!("Cannot select ({}, {}).", hex.q, hex.r);
                }
            }
            Some(Command::Move(hex)) => {
                if session.try_move(hex) {
                    drive_ai(&mut session);
                } else {
                    println!("({}, {}) is not a legal destination.", hex.q, hex.r);
                }
            }
            None => println!("Unrecognized command."),
        }
    }

    Ok(())
}

enum Command {
    Select(Hex),
    Move(Hex),
    Clear,
    New,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let mut parts = line.split_whitespace();
    match parts.next()? {
        "q" | "quit" => Some(Command::Quit),
        "n" | "new" => Some(Command::New),
        "c" | "clear" => Some(Command::Clear),
        verb @ ("s" | "select" | "m" | "move") => {
            let q: i8 = parts.next()?.parse().ok()?;
            let r: i8 = parts.next()?.parse().ok()?;
            let hex = Hex::new(q, r);
            if matches!(verb, "s" | "select") {
                Some(Command::Select(hex))
            } else {
                Some(Command::Move(hex))
            }
        }
        _ => None,
    }
}

/// Post-move hook: let the AI answer exactly once, then report it
fn drive_ai(session: &mut Session) {
    match session.ai_move() {
        AiOutcome::Moved(mv) => {
            let marbles: Vec<String> = mv
                .marbles
                .iter()
                .map(|m| format!("({}, {})", m.q, m.r))
                .collect();
            println!(
                "AI moves {} to ({}, {}).",
                marbles.join(" "),
                mv.target.q,
                mv.target.r
            );
        }
        AiOutcome::Forfeited(player) => {
            println!("AI ({:?}) has no legal moves and forfeits.", player);
        }
        AiOutcome::NotAiTurn => {}
    }
}

/// The stall policy also applies to humans: no legal candidates loses
fn human_is_stalled(session: &mut Session) -> bool {
    let Some(player) = session.game().to_move() else {
        return false;
    };
    if generate_moves(session.game(), player, usize::MAX).is_empty() {
        println!("{:?} has no legal moves and forfeits.", player);
        session.forfeit(player);
        return true;
    }
    false
}

fn show_selection(game: &GameState) {
    let marbles: Vec<String> = game
        .selection()
        .iter()
        .map(|m| format!("({}, {})", m.q, m.r))
        .collect();
    let mut targets: Vec<Hex> = game.legal_moves().keys().copied().collect();
    targets.sort();
    let targets: Vec<String> = targets
        .iter()
        .map(|t| format!("({}, {})", t.q, t.r))
        .collect();
    println!("Selected: {}", marbles.join(" "));
    println!("Targets:  {}", targets.join(" "));
}

/// Draw the board as offset rows, selection marked with capitals
fn render(game: &GameState) {
    println!();
    for r in -BOARD_RADIUS..=BOARD_RADIUS {
        let indent = r.abs() as usize;
        print!("{:indent$}", "");
        for q in -BOARD_RADIUS..=BOARD_RADIUS {
            let hex = Hex::new(q, r);
            if !hex.is_valid() {
                continue;
            }
            let selected = game.selection().contains(&hex);
            let glyph = match (game.occupant(hex), selected) {
                (Some(Player::Black), false) => 'b',
                (Some(Player::Black), true) => 'B',
                (Some(Player::White), false) => 'w',
                (Some(Player::White), true) => 'W',
                (None, _) if game.legal_moves().contains_key(&hex) => '+',
                (None, _) => '.',
            };
            print!("{} ", glyph);
        }
        println!();
    }
    println!(
        "Black {} - {} White   {}",
        game.score(Player::Black),
        game.score(Player::White),
        match game.status() {
            GameStatus::ToMove(p) => format!("{:?} to move", p),
            GameStatus::Won(p) => format!("{:?} has won", p),
        }
    );
}
