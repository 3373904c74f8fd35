//! FEN-to-GameState parser.
//!
//! Builds a `GameState` from a Forsyth-Edwards Notation string, including
//! board, rights, en-passant target and clocks.

use crate::errors::{FenError, FenResult};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> FenResult<GameState> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or(FenError::MissingField("board"))?;
    let side_part = parts.next().ok_or(FenError::MissingField("side-to-move"))?;
    let castling_part = parts.next().ok_or(FenError::MissingField("castling"))?;
    let en_passant_part = parts.next().ok_or(FenError::MissingField("en-passant"))?;
    let halfmove_part = parts.next().ok_or(FenError::MissingField("halfmove clock"))?;
    let fullmove_part = parts.next().ok_or(FenError::MissingField("fullmove number"))?;

    if parts.next().is_some() {
        return Err(FenError::TrailingFields);
    }

    let mut game_state = GameState::new_empty();

    game_state.board = parse_board(board_part)?;
    game_state.side_to_move = parse_side_to_move(side_part)?;
    game_state.castling_rights = parse_castling_rights(castling_part)?;
    game_state.en_passant_square = parse_en_passant_square(en_passant_part)?;
    game_state.halfmove_clock = halfmove_part.parse::<u16>().map_err(|_| FenError::InvalidClock {
        field: "halfmove clock",
        value: halfmove_part.to_owned(),
    })?;
    game_state.fullmove_number = fullmove_part.parse::<u16>().map_err(|_| FenError::InvalidClock {
        field: "fullmove number",
        value: fullmove_part.to_owned(),
    })?;

    Ok(game_state)
}

fn parse_board(board_part: &str) -> FenResult<Board> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::RankCount(ranks.len()));
    }

    let mut board = Board::empty();

    // FEN lists rank 8 first, which is row 0.
    for (row, rank_str) in ranks.iter().enumerate() {
        let mut col = 0usize;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(FenError::InvalidPiece(ch));
                }
                col += empty_count as usize;
                continue;
            }

            let piece = piece_from_fen_char(ch).ok_or(FenError::InvalidPiece(ch))?;
            if col >= 8 {
                return Err(FenError::RankWidth {
                    rank: 8 - row,
                    files: col + 1,
                });
            }

            board.set(Square::new(row as u8, col as u8), Some(piece));
            col += 1;
        }

        if col != 8 {
            return Err(FenError::RankWidth {
                rank: 8 - row,
                files: col,
            });
        }
    }

    Ok(board)
}

fn parse_side_to_move(side_part: &str) -> FenResult<Color> {
    match side_part {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(FenError::InvalidSide(side_part.to_owned())),
    }
}

fn parse_castling_rights(castling_part: &str) -> FenResult<CastlingRights> {
    let mut rights = CastlingRights::NONE;
    if castling_part == "-" {
        return Ok(rights);
    }

    for ch in castling_part.chars() {
        match ch {
            'K' => rights.light_kingside = true,
            'Q' => rights.light_queenside = true,
            'k' => rights.dark_kingside = true,
            'q' => rights.dark_queenside = true,
            _ => return Err(FenError::InvalidCastling(castling_part.to_owned())),
        }
    }

    Ok(rights)
}

fn parse_en_passant_square(en_passant_part: &str) -> FenResult<Option<Square>> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    algebraic_to_square(en_passant_part)
        .map(Some)
        .map_err(|_| FenError::InvalidEnPassant(en_passant_part.to_owned()))
}

pub(crate) fn piece_from_fen_char(ch: char) -> Option<Piece> {
    let color = if ch.is_ascii_uppercase() {
        Color::Light
    } else if ch.is_ascii_lowercase() {
        Color::Dark
    } else {
        return None;
    };

    let kind = match ch.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };

    Some(Piece::new(color, kind))
}

#[cfg(test)]
mod tests {
    use super::parse_fen;
    use crate::errors::FenError;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::*;
    use crate::utils::render_game_state::render_game_state;

    #[test]
    fn parse_starting_fen_and_render_board() {
        let game_state = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");

        println!("\n{}", render_game_state(&game_state, None));

        assert_eq!(game_state.side_to_move, Color::Light);
        assert_eq!(game_state.fullmove_number, 1);
        assert_eq!(game_state.halfmove_clock, 0);
        assert_eq!(game_state.castling_rights, CastlingRights::ALL);
        assert_eq!(
            game_state.board.get(Square::new(7, 4)),
            Some(Piece::new(Color::Light, PieceKind::King))
        );
    }

    #[test]
    fn parses_en_passant_target() {
        let state = parse_fen("rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2")
            .expect("FEN should parse");
        assert_eq!(state.en_passant_square, Some(Square::new(2, 4)));
    }

    #[test]
    fn rejects_malformed_fields() {
        assert_eq!(
            parse_fen("8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::RankCount(7))
        );
        assert!(matches!(
            parse_fen("8/8/8/8/8/8/8/8 x - - 0 1"),
            Err(FenError::InvalidSide(_))
        ));
        assert!(matches!(
            parse_fen("8/8/8/8/8/8/8/7X w - - 0 1"),
            Err(FenError::InvalidPiece('X'))
        ));
        assert_eq!(
            parse_fen("8/8/8/8/8/8/8/8 w - -"),
            Err(FenError::MissingField("halfmove clock"))
        );
    }
}
