//! Translation of typed keys into player intents.

use maze_runner_core::Direction;

/// Intent decoded from a single key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    Move(Direction),
    Quit,
    Unknown(char),
}

/// Decodes every non-whitespace key in `line`, in order.
///
/// `w`/`d`/`s`/`a` map to North/East/South/West and `q` quits. Keys are
/// case-insensitive so a stuck caps lock still plays.
pub(crate) fn parse_line(line: &str) -> Vec<Input> {
    line.chars()
        .filter(|key| !key.is_whitespace())
        .map(parse_key)
        .collect()
}

fn parse_key(key: char) -> Input {
    match key.to_ascii_lowercase() {
        'w' => Input::Move(Direction::North),
        'd' => Input::Move(Direction::East),
        's' => Input::Move(Direction::South),
        'a' => Input::Move(Direction::West),
        'q' => Input::Quit,
        _ => Input::Unknown(key),
    }
}
