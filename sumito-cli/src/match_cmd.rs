//! Match command - play AI-vs-AI series between two difficulties
//!
//! ## Architecture
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_match(), report_results()
//! - Level 3: play_single_game()
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use sumito_core::{Difficulty, GameState, GameStatus, Player, SearchAI};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Difficulty of the first contender
    #[arg(long, default_value = "medium")]
    pub first: Difficulty,

    /// Difficulty of the second contender
    #[arg(long, default_value = "hard")]
    pub second: Difficulty,

    /// Number of games to play (colors alternate)
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Maximum moves per game before calling it a draw
    #[arg(long, default_value = "200")]
    pub max_moves: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug, Serialize)]
struct GameRecord {
    game_number: usize,
    winner: Option<Player>,
    moves: usize,
    black: Difficulty,
    white: Difficulty,
}

/// Aggregated match results
#[derive(Clone, Debug, Serialize)]
struct MatchResults {
    games: Vec<GameRecord>,
    first_wins: usize,
    second_wins: usize,
    draws: usize,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    tracing::info!(
        "Starting match: {} vs {} ({} games)",
        args.first,
        args.second,
        args.games
    );

    let results = play_match(&args, seed.unwrap_or(0));
    report_results(&results, &args)?;

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn play_match(args: &MatchArgs, seed: u64) -> MatchResults {
    let mut results = MatchResults {
        games: Vec::new(),
        first_wins: 0,
        second_wins: 0,
        draws: 0,
    };

    for game_number in 0..args.games {
        // Alternate colors so neither contender always opens
        let first_is_black = game_number % 2 == 0;
        let (black, white) = if first_is_black {
            (args.first, args.second)
        } else {
            (args.second, args.first)
        };

        let record = play_single_game(
            game_number,
            black,
            white,
            args.max_moves,
            seed.wrapping_add(game_number as u64),
        );

        match record.winner {
            Some(Player::Black) if first_is_black => results.first_wins += 1,
            Some(Player::White) if !first_is_black => results.first_wins += 1,
            Some(_) => results.second_wins += 1,
            None => results.draws += 1,
        }

        tracing::info!(
            "game {}: {} moves, winner {:?}",
            game_number,
            record.moves,
            record.winner
        );
        results.games.push(record);
    }

    results
}

fn report_results(results: &MatchResults, args: &MatchArgs) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    }

    println!(
        "{} vs {}: {} games",
        args.first,
        args.second,
        results.games.len()
    );
    println!("  {}: {} wins", args.first, results.first_wins);
    println!("  {}: {} wins", args.second, results.second_wins);
    println!("  draws: {}", results.draws);
    if let Some(avg) = average_moves(results) {
        println!("  avg moves/game: {:.1}", avg);
    }

    Ok(())
}

// ============================================================================
// LEVEL 3 - SINGLE GAME
// ============================================================================

fn play_single_game(
    game_number: usize,
    black: Difficulty,
    white: Difficulty,
    max_moves: usize,
    seed: u64,
) -> GameRecord {
    let mut game = GameState::new();
    let mut black_ai = SearchAI::with_seed(black, seed);
    let mut white_ai = SearchAI::with_seed(white, seed.wrapping_add(1));

    let mut moves = 0;
    while moves < max_moves {
        let Some(mover) = game.to_move() else {
            break;
        };
        let ai = match mover {
            Player::Black => &mut black_ai,
            Player::White => &mut white_ai,
        };
        match ai.best_move(&game) {
            Some(mv) => {
                let applied = game.play(&mv.marbles, mv.target);
                debug_assert!(applied, "search returned an unplayable move");
                moves += 1;
            }
            None => {
                // Stalled player forfeits
                game.forfeit(mover);
                break;
            }
        }
    }

    let winner = match game.status() {
        GameStatus::Won(player) => Some(player),
        GameStatus::ToMove(_) => None,
    };

    GameRecord {
        game_number,
        winner,
        moves,
        black,
        white,
    }
}

// ============================================================================
// LEVEL 4 - FORMATTING
// ============================================================================

fn average_moves(results: &MatchResults) -> Option<f64> {
    if results.games.is_empty() {
        return None;
    }
    let total: usize = results.games.iter().map(|g| g.moves).sum();
    Some(total as f64 / results.games.len() as f64)
}
