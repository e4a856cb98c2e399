use std::str::FromStr;

use chess::Square;

/// What a transcription turned out to mean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Square(Square),
    Yes,
    No,
    /// Anything outside the vocabulary, kept in normalized form for feedback and logs.
    Invalid(String),
}

/// Lower-cases the text and drops all whitespace, so "E 4" becomes "e4".
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn parse_square(text: &str) -> Option<Square> {
    let bytes = text.as_bytes();
    if bytes.len() != 2 || !(b'a'..=b'h').contains(&bytes[0]) || !(b'1'..=b'8').contains(&bytes[1]) {
        return None;
    }
    Square::from_str(text).ok()
}

/// Maps a raw transcription onto the 64 square names or the yes/no keywords.
/// Never fails: unknown input is `Command::Invalid`.
pub fn parse(raw: &str) -> Command {
    let text = normalize(raw);
    if let Some(square) = parse_square(&text) {
        return Command::Square(square);
    }
    match text.as_str() {
        "yes" => Command::Yes,
        "no" => Command::No,
        _ => Command::Invalid(text),
    }
}
