//! Candidate move enumeration for the search opponent

use crate::board::Hex;
use crate::game::{straight_run_direction, GameState, Player};

/// A candidate move: the marbles to select and the destination cell
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Move {
    pub marbles: Vec<Hex>,
    pub target: Hex,
}

/// Enumerate up to `budget` candidate moves for `player`: single-marble
/// moves first, then adjacent pairs, then collinear triples. Owned marbles
/// are visited in sorted (q, r) order and destinations in sorted order, so
/// identical states always yield the identical ordered candidate list.
/// Returns nothing unless `player` is to move.
pub fn generate_moves(state: &GameState, player: Player, budget: usize) -> Vec<Move> {
    let mut moves = Vec::new();
    if state.to_move() != Some(player) || budget == 0 {
        return moves;
    }

    let owned: Vec<Hex> = state
        .occupied()
        .filter(|&(_, occupant)| occupant == player)
        .map(|(hex, _)| hex)
        .collect();

    let mut scratch = state.clone();

    // Single marbles
    for &marble in &owned {
        collect_targets(&mut scratch, &[marble], &mut moves);
        if moves.len() >= budget {
            moves.truncate(budget);
            return moves;
        }
    }

    // Adjacent pairs
    for i in 0..owned.len() {
        for j in (i + 1)..owned.len() {
            if owned[i].distance_to(owned[j]) != 1 {
                continue;
            }
            collect_targets(&mut scratch, &[owned[i], owned[j]], &mut moves);
            if moves.len() >= budget {
                moves.truncate(budget);
                return moves;
            }
        }
    }

    // Collinear triples
    for i in 0..owned.len() {
        for j in (i + 1)..owned.len() {
            for k in (j + 1)..owned.len() {
                let triple = [owned[i], owned[j], owned[k]];
                if straight_run_direction(&triple).is_none() {
                    continue;
                }
                collect_targets(&mut scratch, &triple, &mut moves);
                if moves.len() >= budget {
                    moves.truncate(budget);
                    return moves;
                }
            }
        }
    }

    moves
}

/// Select `marbles` on the scratch board and append one candidate per
/// legal destination, in sorted destination order
fn collect_targets(scratch: &mut GameState, marbles: &[Hex], moves: &mut Vec<Move>) {
    scratch.clear_selection();
    for &marble in marbles {
        if !scratch.select_or_toggle(marble) {
            scratch.clear_selection();
            return;
        }
    }

    let mut targets: Vec<Hex> = scratch.legal_moves().keys().copied().collect();
    targets.sort();
    for target in targets {
        moves.push(Move {
            marbles: marbles.to_vec(),
            target,
        });
    }
    scratch.clear_selection();
}
