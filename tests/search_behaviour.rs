use boardside::game_state::game_state::GameState;
use boardside::move_generation::legal_move_apply::apply_move;
use boardside::move_generation::legal_move_generator::{game_outcome, legal_moves, GameOutcome};
use boardside::moves::move_descriptions::Move;
use boardside::search::board_scoring::{StandardScorer, MATE_SCORE};
use boardside::search::iterative_deepening::{iterative_deepening_search, SearchConfig, SearchResult};
use boardside::search::transposition_table::{Bound, TTEntry, TranspositionTable};
use boardside::search::zobrist::compute_zobrist_key;
use boardside::utils::fen_parser::parse_fen;

// Rook ladder: 1.Ra7 Kg8 2.Rb8# (or 1.Rb7 Kg8 2.Ra8#).
const MATE_IN_TWO: &str = "7k/8/8/8/8/8/8/RR2K3 w - - 0 1";

fn search(state: &GameState, max_depth: u8) -> SearchResult {
    let mut tt = TranspositionTable::with_entries(1 << 16);
    iterative_deepening_search(
        state,
        &StandardScorer,
        &mut tt,
        SearchConfig {
            max_depth,
            time_budget: None,
        },
    )
}

fn mates_in_one(state: &GameState) -> bool {
    legal_moves(state).into_iter().any(|mv| {
        matches!(
            game_outcome(&apply_move(state, mv)),
            GameOutcome::Checkmate { .. }
        )
    })
}

#[test]
fn finds_mate_in_two() {
    let state = parse_fen(MATE_IN_TWO).expect("FEN should parse");
    assert!(!mates_in_one(&state));

    let result = search(&state, 4);
    let first: Move = result.best_move.expect("a mating move");
    assert!(result.best_score >= MATE_SCORE, "score {}", result.best_score);

    let after = apply_move(&state, first);
    let replies = legal_moves(&after);
    assert!(!replies.is_empty());
    for reply in replies {
        assert!(mates_in_one(&apply_move(&after, reply)));
    }
}

#[test]
fn deeper_search_favours_the_mating_side_more() {
    let state = parse_fen(MATE_IN_TWO).expect("FEN should parse");
    let shallow = search(&state, 1);
    let deep = search(&state, 3);
    assert!(shallow.best_score > 0);
    assert!(deep.best_score > shallow.best_score);
    assert_eq!(deep.reached_depth, 3);
}

#[test]
fn shallow_table_entry_does_not_cut_deeper_search() {
    let state = parse_fen("4k3/8/8/8/8/8/4q3/4KQ2 w - - 0 1").expect("FEN should parse");
    let mut tt = TranspositionTable::with_entries(1 << 12);
    tt.store(TTEntry {
        key: compute_zobrist_key(&state),
        depth: 0,
        score: -MATE_SCORE,
        bound: Bound::Exact,
        best_move: None,
    });

    let entry = tt.probe(compute_zobrist_key(&state)).expect("entry stored");
    assert!(entry.cutoff(2, -1_000, 1_000).is_none());
    assert!(entry.cutoff(0, -1_000, 1_000).is_some());

    let result = iterative_deepening_search(
        &state,
        &StandardScorer,
        &mut tt,
        SearchConfig {
            max_depth: 2,
            time_budget: None,
        },
    );
    // The bogus depth-0 score must not leak into the root result.
    assert!(result.best_score > 0);
    assert!(result.best_move.is_some());
}
