use crate::piece::PieceType;
use crate::record::{MoveRecord, Special};

/// Builds the one-line display label for a committed move.
///
/// Castles are "O-O" and "O-O-O"; everything else is the uppercase piece letter (omitted for
/// pawns), an "x" when anything was captured (including en passant), the destination square, and
/// an "=Q"-style suffix for promotions. Pawn captures lead with the origin file ("exd5"). There
/// is no disambiguation beyond that; two knights reaching the same square both label as "Nf3".
pub fn move_label(record: &MoveRecord) -> String {
    match record.special() {
        Special::CastleKingside => return String::from("O-O"),
        Special::CastleQueenside => return String::from("O-O-O"),
        _ => {}
    }

    let mut label = String::with_capacity(6);
    let piece_type = record.moving().piece_type();
    if piece_type == PieceType::Pawn {
        if record.is_capture() {
            label.push_str(&record.from_square().file().to_string());
        }
    } else {
        label.push(char::from(piece_type));
    }
    if record.is_capture() {
        label.push('x');
    }
    label.push_str(&record.to_square().to_string());
    if let Special::Promotion { promoted_to } = record.special() {
        label.push('=');
        label.push(char::from(promoted_to));
    }
    label
}
