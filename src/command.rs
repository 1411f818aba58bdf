//! Parsing of the text commands of a game session

use std::str::FromStr;

/// A command entered by the human player
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Drop a disc into a 1-indexed column
    AddDisc(i32),
    SuggestMove,
    UndoMove,
    Quit,
    Restart,
    Invalid,
}

/// Whether `token` is a decimal integer with an optional sign
fn is_integer_token(token: &str) -> bool {
    let digits = token
        .strip_prefix('-')
        .or_else(|| token.strip_prefix('+'))
        .unwrap_or(token);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Parses a line holding exactly one integer that fits in an `i32`
pub fn parse_int(line: &str) -> Option<i32> {
    let mut tokens = line.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(token), None) if is_integer_token(token) => token.parse().ok(),
        _ => None,
    }
}

/// Returns true iff `line` holds exactly one integer that fits in an `i32`
pub fn is_int(line: &str) -> bool {
    parse_int(line).is_some()
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let mut tokens = line.split_whitespace();

        let command = match tokens.next() {
            Some("add_disc") => match tokens.next().and_then(parse_int) {
                Some(column) => Command::AddDisc(column),
                None => return Command::Invalid,
            },
            Some("suggest_move") => Command::SuggestMove,
            Some("undo_move") => Command::UndoMove,
            Some("quit") => Command::Quit,
            Some("restart") | Some("restart_game") => Command::Restart,
            _ => Command::Invalid,
        };

        // trailing tokens invalidate any command
        if tokens.next().is_some() {
            Command::Invalid
        } else {
            command
        }
    }
}

impl FromStr for Command {
    type Err = std::convert::Infallible;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        Ok(Command::parse(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_command() {
        assert_eq!(Command::parse("add_disc 4"), Command::AddDisc(4));
        assert_eq!(Command::parse("  add_disc\t-2 "), Command::AddDisc(-2));
        assert_eq!(Command::parse("add_disc +7"), Command::AddDisc(7));
        assert_eq!(Command::parse("suggest_move"), Command::SuggestMove);
        assert_eq!(Command::parse("undo_move\n"), Command::UndoMove);
        assert_eq!(Command::parse("quit"), Command::Quit);
        assert_eq!(Command::parse("restart"), Command::Restart);
        assert_eq!(Command::parse("restart_game"), Command::Restart);
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(Command::parse(""), Command::Invalid);
        assert_eq!(Command::parse("add_disc"), Command::Invalid);
        assert_eq!(Command::parse("add_disc x"), Command::Invalid);
        assert_eq!(Command::parse("add_disc 3 4"), Command::Invalid);
        assert_eq!(Command::parse("add_disc 3.5"), Command::Invalid);
        assert_eq!(Command::parse("add_disc 99999999999"), Command::Invalid);
        assert_eq!(Command::parse("quit now"), Command::Invalid);
        assert_eq!(Command::parse("Quit"), Command::Invalid);
        assert_eq!("dance".parse::<Command>(), Ok(Command::Invalid));
    }

    #[test]
    fn integer_lines() {
        assert!(is_int("5"));
        assert!(is_int(" -12 \n"));
        assert!(is_int("2147483647"));
        assert!(!is_int("2147483648"));
        assert!(!is_int("+"));
        assert!(!is_int("1 2"));
        assert!(!is_int("1a"));
        assert_eq!(parse_int("007"), Some(7));
    }
}
