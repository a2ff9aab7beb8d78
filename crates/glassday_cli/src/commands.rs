//! Line command parsing.
//!
//! Indexes are 1-based as printed by the renderer.

use glassday_core::Energy;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Recent(usize),
    Done,
    Glass(usize),
    Continue,
    Dismiss,
    Energy(Energy),
    Order(Vec<usize>),
    Action(usize, String),
    Lock,
    Check(usize),
    Reset,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    Unknown(String),
    MissingArgument(&'static str),
    BadIndex(String),
    BadEnergy(String),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "type a command, or `help`"),
            Self::Unknown(word) => write!(f, "unknown command `{word}`; try `help`"),
            Self::MissingArgument(what) => write!(f, "missing {what}"),
            Self::BadIndex(value) => write!(f, "`{value}` is not a list number"),
            Self::BadEnergy(value) => write!(f, "`{value}` is not one of low|medium|high"),
        }
    }
}

pub const HELP: &str = "\
dump:     add <text> | recent <n> | done
select:   glass <n> | continue
explain:  dismiss (any input)
balance:  energy low|medium|high | order <n> <n> ... | action <n> <text> | lock
locked:   check <n> | reset
always:   show | help | quit";

pub fn parse(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "" => Err(ParseError::Empty),
        "add" | "a" => non_empty(rest, "text to add").map(|text| Command::Add(text.to_string())),
        "recent" => index(rest).map(Command::Recent),
        "done" => Ok(Command::Done),
        "glass" | "g" => index(rest).map(Command::Glass),
        "continue" | "next" => Ok(Command::Continue),
        "dismiss" => Ok(Command::Dismiss),
        "energy" | "e" => {
            let raw = non_empty(rest, "energy level")?;
            Energy::parse(raw)
                .map(Command::Energy)
                .ok_or_else(|| ParseError::BadEnergy(raw.to_string()))
        }
        "order" => {
            non_empty(rest, "new order")?;
            rest.split_whitespace()
                .map(index)
                .collect::<Result<Vec<_>, _>>()
                .map(Command::Order)
        }
        "action" => {
            let (position, text) = match rest.split_once(char::is_whitespace) {
                Some((position, text)) => (position, text.trim()),
                None => (rest, ""),
            };
            Ok(Command::Action(index(position)?, text.to_string()))
        }
        "lock" => Ok(Command::Lock),
        "check" | "c" => index(rest).map(Command::Check),
        "reset" => Ok(Command::Reset),
        "show" | "ls" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(ParseError::Unknown(other.to_string())),
    }
}

fn non_empty<'a>(value: &'a str, what: &'static str) -> Result<&'a str, ParseError> {
    if value.is_empty() {
        Err(ParseError::MissingArgument(what))
    } else {
        Ok(value)
    }
}

fn index(value: &str) -> Result<usize, ParseError> {
    let value = non_empty(value.trim(), "list number")?;
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ParseError::BadIndex(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse, Command, ParseError};
    use glassday_core::Energy;

    #[test]
    fn add_keeps_inner_spacing() {
        assert_eq!(
            parse("add  Call  mom ").unwrap(),
            Command::Add("Call  mom".to_string())
        );
        assert_eq!(
            parse("add").unwrap_err(),
            ParseError::MissingArgument("text to add")
        );
    }

    #[test]
    fn order_parses_every_position() {
        assert_eq!(parse("order 3 1 2").unwrap(), Command::Order(vec![3, 1, 2]));
        assert!(matches!(parse("order 3 x"), Err(ParseError::BadIndex(_))));
        assert!(matches!(parse("order 0"), Err(ParseError::BadIndex(_))));
    }

    #[test]
    fn action_allows_empty_text() {
        assert_eq!(
            parse("action 2 Send one email").unwrap(),
            Command::Action(2, "Send one email".to_string())
        );
        assert_eq!(parse("action 1").unwrap(), Command::Action(1, String::new()));
    }

    #[test]
    fn energy_and_unknown_words() {
        assert_eq!(parse("energy HIGH").unwrap(), Command::Energy(Energy::High));
        assert!(matches!(parse("energy max"), Err(ParseError::BadEnergy(_))));
        assert!(matches!(parse("fly"), Err(ParseError::Unknown(_))));
        assert_eq!(parse("   ").unwrap_err(), ParseError::Empty);
    }
}
