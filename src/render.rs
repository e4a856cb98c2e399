//! Pure board rendering: SVG for the viewer page, ASCII for the terminal.

use std::fmt::Write;

use chess::{Board, ChessMove, Color, File, Piece, Rank, Square};

const SQUARE_SIZE: usize = 60;
const MARGIN: usize = 20;
const LIGHT: &str = "#f0d9b5";
const DARK: &str = "#b58863";
const HIGHLIGHT: &str = "#cdd26a";

fn glyph(piece: Piece, color: Color) -> char {
    match (color, piece) {
        (Color::White, Piece::King) => '♔',
        (Color::White, Piece::Queen) => '♕',
        (Color::White, Piece::Rook) => '♖',
        (Color::White, Piece::Bishop) => '♗',
        (Color::White, Piece::Knight) => '♘',
        (Color::White, Piece::Pawn) => '♙',
        (Color::Black, Piece::King) => '♚',
        (Color::Black, Piece::Queen) => '♛',
        (Color::Black, Piece::Rook) => '♜',
        (Color::Black, Piece::Bishop) => '♝',
        (Color::Black, Piece::Knight) => '♞',
        (Color::Black, Piece::Pawn) => '♟',
    }
}

fn letter(piece: Piece, color: Color) -> char {
    let c = match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    };
    match color {
        Color::White => c.to_ascii_uppercase(),
        Color::Black => c,
    }
}

fn square_at(rank: usize, file: usize) -> Square {
    Square::make_square(Rank::from_index(rank), File::from_index(file))
}

/// SVG image of the board from White's side, with the last move highlighted.
pub fn svg(board: &Board, last_move: Option<ChessMove>) -> String {
    let size = SQUARE_SIZE * 8 + MARGIN * 2;
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {size} {size}" width="{size}" height="{size}">"#
    );
    let _ = write!(out, r##"<rect width="{size}" height="{size}" fill="#312e2b"/>"##);

    for rank in 0..8 {
        for file in 0..8 {
            let square = square_at(rank, file);
            let x = MARGIN + file * SQUARE_SIZE;
            let y = MARGIN + (7 - rank) * SQUARE_SIZE;
            let touched = last_move
                .map(|mv| mv.get_source() == square || mv.get_dest() == square)
                .unwrap_or(false);
            let fill = if touched {
                HIGHLIGHT
            } else if (rank + file) % 2 == 0 {
                DARK
            } else {
                LIGHT
            };
            let _ = write!(
                out,
                r#"<rect x="{x}" y="{y}" width="{SQUARE_SIZE}" height="{SQUARE_SIZE}" fill="{fill}"/>"#
            );
            if let (Some(piece), Some(color)) = (board.piece_on(square), board.color_on(square)) {
                let _ = write!(
                    out,
                    r#"<text x="{}" y="{}" font-size="{}" text-anchor="middle" dominant-baseline="central">{}</text>"#,
                    x + SQUARE_SIZE / 2,
                    y + SQUARE_SIZE / 2,
                    SQUARE_SIZE * 4 / 5,
                    glyph(piece, color)
                );
            }
        }
    }

    for i in 0..8 {
        let file_label = (b'a' + i as u8) as char;
        let rank_label = (b'8' - i as u8) as char;
        let _ = write!(
            out,
            r##"<text x="{}" y="{}" font-size="12" fill="#e0e0e0" text-anchor="middle">{file_label}</text>"##,
            MARGIN + i * SQUARE_SIZE + SQUARE_SIZE / 2,
            size - 6
        );
        let _ = write!(
            out,
            r##"<text x="10" y="{}" font-size="12" fill="#e0e0e0" text-anchor="middle" dominant-baseline="central">{rank_label}</text>"##,
            MARGIN + i * SQUARE_SIZE + SQUARE_SIZE / 2
        );
    }

    out.push_str("</svg>");
    out
}

/// Text board from White's side: upper case is White, `.` is empty.
pub fn ascii(board: &Board) -> String {
    let mut out = String::new();
    for rank in (0..8).rev() {
        out.push((b'1' + rank as u8) as char);
        out.push(' ');
        for file in 0..8 {
            let square = square_at(rank, file);
            let c = match (board.piece_on(square), board.color_on(square)) {
                (Some(piece), Some(color)) => letter(piece, color),
                _ => '.',
            };
            out.push(c);
            if file < 7 {
                out.push(' ');
            }
        }
        out.push('\n');
    }
    out.push_str("  a b c d e f g h\n");
    out
}
