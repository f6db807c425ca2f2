//! Shell command parsing.

use ordo_core::{Board, Move};

use crate::error::ShellError;

/// Arguments of the `order` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderParams {
    /// Hash move to try first, in UCI notation.
    pub hash: Option<String>,
    /// Node height, selecting the killer rows.
    pub height: usize,
    /// Treat the node as a PV node.
    pub pv: bool,
}

/// An option set through `setoption name <Name> value <v>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellOption {
    Threads(usize),
    PasserSacrifices(bool),
    KingAttackSacrifices(bool),
    KingBoxSacrifices(bool),
    PvQueenPromotions(bool),
    QuietKingAttacks(bool),
}

/// A parsed shell command.
#[derive(Debug)]
pub enum Command {
    /// `isready` -- synchronization ping.
    IsReady,
    /// `newgame` -- reset the position and clear every table.
    NewGame,
    /// `position` -- set up a board position with optional moves applied.
    Position(Board),
    /// `order` -- list the full-width move order for the current position.
    Order(OrderParams),
    /// `qorder` -- list the quiescence move order, with quiet checks if asked.
    QOrder { checks: bool },
    /// `cutoff` -- record a beta cutoff by a quiet move.
    Cutoff {
        uci_move: String,
        depth: u32,
        height: usize,
    },
    /// `success` -- count a quiet move as a hit.
    Success(String),
    /// `failure` -- count a quiet move as a miss.
    Failure(String),
    /// `setoption` -- change an ordering or shell option.
    SetOption(ShellOption),
    /// `board` -- print the current position.
    Board,
    /// `quit` -- exit the shell.
    Quit,
    /// Unrecognized command (silently ignored).
    Unknown(String),
}

/// Parse a single line of input into a [`Command`].
pub fn parse_command(line: &str) -> Result<Command, ShellError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.is_empty() {
        return Ok(Command::Unknown(String::new()));
    }

    match tokens[0] {
        "isready" => Ok(Command::IsReady),
        "newgame" => Ok(Command::NewGame),
        "board" | "d" => Ok(Command::Board),
        "quit" => Ok(Command::Quit),
        "position" => parse_position(&tokens[1..]),
        "order" => parse_order(&tokens[1..]),
        "qorder" => Ok(Command::QOrder {
            checks: tokens[1..].contains(&"checks"),
        }),
        "cutoff" => parse_cutoff(&tokens[1..]),
        "success" => Ok(Command::Success(move_arg(&tokens[1..], "success")?)),
        "failure" => Ok(Command::Failure(move_arg(&tokens[1..], "failure")?)),
        "setoption" => parse_setoption(&tokens[1..]),
        _ => Ok(Command::Unknown(tokens[0].to_string())),
    }
}

/// Parse the `position` command arguments.
///
/// Supports:
/// - `position startpos [moves e2e4 d7d5 ...]`
/// - `position fen <fen-string> [moves e2e4 d7d5 ...]`, with 4 or 6 FEN fields
fn parse_position(tokens: &[&str]) -> Result<Command, ShellError> {
    if tokens.is_empty() {
        return Err(ShellError::MalformedPosition);
    }

    let moves_at = tokens.iter().position(|&t| t == "moves").unwrap_or(tokens.len());
    let mut board = match tokens[0] {
        "startpos" => Board::starting_position(),
        "fen" => {
            let fen = tokens[1..moves_at].join(" ");
            fen.parse().map_err(|_| ShellError::InvalidFen { fen: fen.clone() })?
        }
        _ => return Err(ShellError::MalformedPosition),
    };

    for uci_str in tokens.iter().skip(moves_at + 1) {
        let mv = Move::from_uci(uci_str, &board).ok_or_else(|| ShellError::InvalidMove {
            uci_move: uci_str.to_string(),
        })?;
        board = board.make_move(mv);
    }

    Ok(Command::Position(board))
}

/// Parse `order [hash <uci>] [height <n>] [pv]`. Unknown tokens are skipped.
fn parse_order(tokens: &[&str]) -> Result<Command, ShellError> {
    let mut params = OrderParams::default();

    let mut i = 0;
    while i < tokens.len() {
        match tokens[i] {
            "hash" => {
                params.hash = Some(move_arg(&tokens[i + 1..], "hash")?);
                i += 2;
            }
            "height" => {
                params.height = parse_int(tokens.get(i + 1), "height")?;
                i += 2;
            }
            "pv" => {
                params.pv = true;
                i += 1;
            }
            _ => i += 1,
        }
    }

    Ok(Command::Order(params))
}

/// Parse `cutoff <uci> depth <d> [height <h>]`.
fn parse_cutoff(tokens: &[&str]) -> Result<Command, ShellError> {
    let uci_move = move_arg(tokens, "cutoff")?;
    let mut depth = None;
    let mut height = 0;

    let mut i = 1;
    while i < tokens.len() {
        match tokens[i] {
            "depth" => {
                depth = Some(parse_int(tokens.get(i + 1), "depth")?);
                i += 2;
            }
            "height" => {
                height = parse_int(tokens.get(i + 1), "height")?;
                i += 2;
            }
            _ => i += 1,
        }
    }

    let depth = depth.ok_or_else(|| ShellError::MissingValue {
        param: "depth".to_string(),
    })?;
    Ok(Command::Cutoff {
        uci_move,
        depth,
        height,
    })
}

/// Parse `setoption name <Name> value <v>`.
fn parse_setoption(tokens: &[&str]) -> Result<Command, ShellError> {
    let name_at = tokens.iter().position(|&t| t == "name");
    let value_at = tokens.iter().position(|&t| t == "value");
    let (Some(name_at), Some(value_at)) = (name_at, value_at) else {
        return Err(ShellError::MissingValue {
            param: "setoption".to_string(),
        });
    };
    if value_at <= name_at {
        return Err(ShellError::MissingValue {
            param: "setoption".to_string(),
        });
    }

    let name = tokens[name_at + 1..value_at].join(" ");
    let value = tokens.get(value_at + 1);
    let option = match name.to_ascii_lowercase().as_str() {
        "threads" => ShellOption::Threads(parse_int(value, &name)?),
        "passersacrifices" => ShellOption::PasserSacrifices(parse_bool(value, &name)?),
        "kingattacksacrifices" => ShellOption::KingAttackSacrifices(parse_bool(value, &name)?),
        "kingboxsacrifices" => ShellOption::KingBoxSacrifices(parse_bool(value, &name)?),
        "pvqueenpromotions" => ShellOption::PvQueenPromotions(parse_bool(value, &name)?),
        "quietkingattacks" => ShellOption::QuietKingAttacks(parse_bool(value, &name)?),
        _ => return Err(ShellError::UnknownOption { name }),
    };
    Ok(Command::SetOption(option))
}

fn move_arg(tokens: &[&str], param: &str) -> Result<String, ShellError> {
    tokens
        .first()
        .map(|t| t.to_string())
        .ok_or_else(|| ShellError::MissingValue {
            param: param.to_string(),
        })
}

/// Parse an integer value from a token.
fn parse_int<T: std::str::FromStr>(token: Option<&&str>, param: &str) -> Result<T, ShellError> {
    let value = token.ok_or_else(|| ShellError::MissingValue {
        param: param.to_string(),
    })?;
    value.parse().map_err(|_| ShellError::InvalidValue {
        param: param.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(token: Option<&&str>, param: &str) -> Result<bool, ShellError> {
    let value = token.ok_or_else(|| ShellError::MissingValue {
        param: param.to_string(),
    })?;
    match *value {
        "true" | "on" => Ok(true),
        "false" | "off" => Ok(false),
        _ => Err(ShellError::InvalidValue {
            param: param.to_string(),
            value: value.to_string(),
        }),
    }
}
