// Operator console: turns one line of text into a UserCommand.

use gavel_core::auction::command::Command;
use gavel_core::auction::state::TimerAction;
use thiserror::Error;

use crate::protocol::UserCommand;

pub const USAGE: &str = "commands: start | next | reauction | bid <amount> | raise <n> (or +<n>) \
| timer start|pause|reset|add | sold <team_id> [amount] | unsold | find <name> | show | quit";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty input")]
    Empty,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("`{command}` needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("not an amount: {0}")]
    InvalidAmount(String),

    #[error("unknown timer action: {0}")]
    UnknownTimerAction(String),

    #[error("unexpected input after `{command}`: {rest}")]
    TrailingInput { command: &'static str, rest: String },
}

/// Parse a console line. Keywords are case-insensitive; team ids are not.
pub fn parse_line(line: &str) -> Result<UserCommand, ParseError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err(ParseError::Empty);
    };
    let args: Vec<&str> = words.collect();

    // `+50000` is shorthand for `raise 50000`.
    if let Some(increment) = head.strip_prefix('+') {
        no_more("raise", &args)?;
        let increment = parse_amount(increment)?;
        return Ok(UserCommand::Auction(Command::RaiseBid { increment }));
    }

    let keyword = head.to_ascii_lowercase();
    let command = match keyword.as_str() {
        "start" => {
            no_more("start", &args)?;
            Command::StartAuction
        }
        "next" => {
            no_more("next", &args)?;
            Command::NextPlayer
        }
        "reauction" => {
            no_more("reauction", &args)?;
            Command::StartReauction
        }
        "bid" => {
            let amount = parse_amount(required("bid", "an amount", &args, 0)?)?;
            no_more("bid", &args[1..])?;
            Command::PlaceBid { amount }
        }
        "raise" => {
            let increment = parse_amount(required("raise", "an increment", &args, 0)?)?;
            no_more("raise", &args[1..])?;
            Command::RaiseBid { increment }
        }
        "timer" => {
            let word = required("timer", "start, pause, reset or add", &args, 0)?;
            let action = TimerAction::from_str_action(word)
                .ok_or_else(|| ParseError::UnknownTimerAction(word.to_string()))?;
            no_more("timer", &args[1..])?;
            Command::Timer { action }
        }
        "sold" => {
            let team_id = required("sold", "a team id", &args, 0)?.to_string();
            let amount = args.get(1).map(|a| parse_amount(a)).transpose()?;
            if args.len() > 2 {
                no_more("sold", &args[2..])?;
            }
            Command::Sold { team_id, amount }
        }
        "unsold" => {
            no_more("unsold", &args)?;
            Command::Unsold
        }
        "find" => {
            required("find", "part of a player name", &args, 0)?;
            return Ok(UserCommand::Search(args.join(" ")));
        }
        "show" => {
            no_more("show", &args)?;
            return Ok(UserCommand::Snapshot);
        }
        "quit" | "exit" => return Ok(UserCommand::Quit),
        _ => return Err(ParseError::UnknownCommand(head.to_string())),
    };
    Ok(UserCommand::Auction(command))
}

fn required<'a>(
    command: &'static str,
    argument: &'static str,
    args: &[&'a str],
    idx: usize,
) -> Result<&'a str, ParseError> {
    args.get(idx)
        .copied()
        .ok_or(ParseError::MissingArgument { command, argument })
}

fn no_more(command: &'static str, rest: &[&str]) -> Result<(), ParseError> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(ParseError::TrailingInput {
            command,
            rest: rest.join(" "),
        })
    }
}

/// Whole minor units; `,` and `_` group separators are ignored.
fn parse_amount(s: &str) -> Result<u64, ParseError> {
    let digits: String = s.chars().filter(|c| *c != ',' && *c != '_').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseError::InvalidAmount(s.to_string()));
    }
    digits
        .parse()
        .map_err(|_| ParseError::InvalidAmount(s.to_string()))
}
