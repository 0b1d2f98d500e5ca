//! Ply records and algebraic notation

use serde::{Deserialize, Serialize};

use crate::pieces::{Color, Piece};

/// Record of one executed ply
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub from: String,
    pub to: String,
    #[serde(rename = "by")]
    pub color: Color,
    pub piece: Piece,
    pub promotion: Option<Piece>,
    pub capture: bool,
    pub captured_piece: Option<Piece>,
    pub captured_color: Option<Color>,
    pub en_passant: bool,
    pub en_passant_capture_tile: Option<String>,
    /// Other same-kind pieces that could also have reached `to`
    pub possible_froms: Vec<String>,
    pub checked: bool,
    pub mated: bool,
    pub stale: bool,
    pub notation: String,
}

impl Move {
    /// Fill in [`Move::notation`] from the other fields.
    ///
    /// `[piece][from hint][x][to][suffix]`, or `[to]=[piece][suffix]` for a
    /// promotion. The suffix is `#` when mated, `+` when checked, `S` when
    /// stalemated.
    pub fn annotate(&mut self) {
        let mut notation = String::new();

        if let Some(promoted) = self.promotion {
            notation.push_str(&self.to);
            notation.push('=');
            notation.push_str(promoted.notation());
        } else {
            notation.push_str(self.piece.notation());
            notation.push_str(self.from_hint());
            if self.capture {
                notation.push('x');
            }
            notation.push_str(&self.to.to_lowercase());
        }

        if self.mated {
            notation.push('#');
        } else if self.checked {
            notation.push('+');
        } else if self.stale {
            notation.push('S');
        }

        self.notation = notation;
    }

    /// File, then rank, then the full tile: the first that no competing
    /// piece shares
    fn from_hint(&self) -> &str {
        if self.possible_froms.is_empty() {
            return "";
        }

        let (file, rank) = split_tile(&self.from);
        let same_file = self.possible_froms.iter().any(|f| split_tile(f).0 == file);
        let same_rank = self.possible_froms.iter().any(|f| split_tile(f).1 == rank);

        if !same_file {
            file
        } else if !same_rank {
            rank
        } else {
            &self.from
        }
    }

    /// The replayable part of this ply
    pub fn request(&self) -> MoveRequest {
        MoveRequest {
            from: self.from.clone(),
            to: self.to.clone(),
            promotion_piece: self.promotion.map(|p| p.as_str().to_string()),
        }
    }
}

/// Minimal input needed to replay a ply
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub promotion_piece: Option<String>,
}

fn split_tile(name: &str) -> (&str, &str) {
    let boundary = name.char_indices().nth(1).map_or(name.len(), |(i, _)| i);
    name.split_at(boundary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(piece: Piece, from: &str, to: &str) -> Move {
        Move {
            from: from.to_string(),
            to: to.to_string(),
            color: Color::White,
            piece,
            promotion: None,
            capture: false,
            captured_piece: None,
            captured_color: None,
            en_passant: false,
            en_passant_capture_tile: None,
            possible_froms: Vec::new(),
            checked: false,
            mated: false,
            stale: false,
            notation: String::new(),
        }
    }

    fn annotated(mv: &mut Move) -> &str {
        mv.annotate();
        &mv.notation
    }

    #[test]
    fn test_basic_notation() {
        assert_eq!(annotated(&mut plain(Piece::Pawn, "e4", "e5")), "e5");
        assert_eq!(annotated(&mut plain(Piece::Knight, "d1", "f4")), "Nf4");

        let mut capture = plain(Piece::Queen, "e1", "a5");
        capture.capture = true;
        assert_eq!(annotated(&mut capture), "Qxa5");
    }

    #[test]
    fn test_suffix_priority() {
        let mut mv = plain(Piece::Queen, "a5", "f10");
        mv.checked = true;
        mv.mated = true;
        assert_eq!(annotated(&mut mv), "Qf10#");

        mv.mated = false;
        assert_eq!(annotated(&mut mv), "Qf10+");

        mv.checked = false;
        mv.stale = true;
        assert_eq!(annotated(&mut mv), "Qf10S");
    }

    #[test]
    fn test_disambiguation() {
        let mut mv = plain(Piece::Rook, "c1", "f4");
        mv.possible_froms = vec!["i1".to_string()];
        assert_eq!(annotated(&mut mv), "Rcf4");

        mv.possible_froms = vec!["c5".to_string()];
        assert_eq!(annotated(&mut mv), "R1f4");

        mv.from = "c10".to_string();
        mv.possible_froms = vec!["c5".to_string(), "e10".to_string()];
        assert_eq!(annotated(&mut mv), "Rc10f4");
    }

    #[test]
    fn test_promotion_notation() {
        let mut mv = plain(Piece::Pawn, "c7", "c8");
        mv.promotion = Some(Piece::Queen);
        mv.capture = true;
        mv.checked = true;
        assert_eq!(annotated(&mut mv), "c8=Q+");
        assert_eq!(mv.request().promotion_piece.as_deref(), Some("queen"));
    }

    #[test]
    fn test_wire_fields() {
        let mut mv = plain(Piece::Pawn, "f6", "e5");
        mv.en_passant = true;
        mv.en_passant_capture_tile = Some("e6".to_string());
        let json = serde_json::to_value(&mv).unwrap();
        assert_eq!(json["by"], "white");
        assert_eq!(json["enPassantCaptureTile"], "e6");
        assert_eq!(json["possibleFroms"], serde_json::json!([]));
        assert!(json["promotion"].is_null());

        let request: MoveRequest =
            serde_json::from_str(r#"{"from":"e4","to":"e6"}"#).unwrap();
        assert_eq!(request.promotion_piece, None);
    }
}
