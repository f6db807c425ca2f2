//! Line-oriented inspector that drives the move-ordering subsystem.

use std::io::{BufRead, Write};

use tracing::{debug, info, warn};

use ordo_core::{AttackInfo, Board, Move};
use ordo_sort::{MAX_PLY, OrderingTables, SortContext};

use crate::command::{Command, OrderParams, ShellOption, parse_command};
use crate::error::ShellError;

/// Configuration knobs adjustable via `setoption`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellConfig {
    /// Number of killer partitions kept in the ordering tables.
    pub threads: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self { threads: 1 }
    }
}

/// The inspector, holding the current position and the ordering tables.
///
/// Every command runs against killer partition 0; the other partitions
/// only exist so that `Threads` can be exercised.
pub struct Shell {
    board: Board,
    tables: OrderingTables,
    config: ShellConfig,
}

impl Shell {
    /// Create a shell on the starting position.
    pub fn new() -> Self {
        Self::with_config(ShellConfig::default())
    }

    /// Create a shell on the starting position with `config` applied.
    pub fn with_config(config: ShellConfig) -> Self {
        Self {
            board: Board::starting_position(),
            tables: OrderingTables::new(config.threads),
            config,
        }
    }

    /// Current position.
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn tables(&self) -> &OrderingTables {
        &self.tables
    }

    pub fn config(&self) -> ShellConfig {
        self.config
    }

    /// Read commands from `input` until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: &mut W) -> Result<(), ShellError> {
        for line in input.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            debug!(cmd = %trimmed, "received shell command");
            let cmd = match parse_command(trimmed) {
                Ok(cmd) => cmd,
                Err(e) => {
                    warn!(error = %e, "shell parse error");
                    continue;
                }
            };
            if matches!(cmd, Command::Quit) {
                break;
            }
            if let Err(e) = self.execute(cmd, output) {
                if let ShellError::Io { .. } = e {
                    return Err(e);
                }
                warn!(error = %e, "shell command failed");
            }
            output.flush()?;
        }

        info!("ordo shell shutting down");
        Ok(())
    }

    fn execute<W: Write>(&mut self, cmd: Command, out: &mut W) -> Result<(), ShellError> {
        match cmd {
            Command::IsReady => writeln!(out, "readyok")?,
            Command::NewGame => self.handle_newgame(),
            Command::Position(board) => self.board = board,
            Command::Order(params) => self.handle_order(&params, out)?,
            Command::QOrder { checks } => self.handle_qorder(checks, out)?,
            Command::Cutoff {
                uci_move,
                depth,
                height,
            } => self.handle_cutoff(&uci_move, depth, height)?,
            Command::Success(uci_move) => self.handle_outcome(&uci_move, true)?,
            Command::Failure(uci_move) => self.handle_outcome(&uci_move, false)?,
            Command::SetOption(option) => self.handle_setoption(option),
            Command::Board => {
                writeln!(out, "{}", self.board.pretty())?;
                writeln!(out, "fen {}", self.board)?;
            }
            Command::Quit | Command::Unknown(_) => {}
        }
        Ok(())
    }

    fn handle_newgame(&mut self) {
        self.board = Board::starting_position();
        self.tables.clear();
    }

    fn handle_setoption(&mut self, option: ShellOption) {
        match option {
            ShellOption::Threads(threads) => {
                self.config.threads = threads.max(1);
                self.tables.resize_threads(threads);
            }
            ShellOption::PasserSacrifices(on) => self.tables.config_mut().passer_sacrifices = on,
            ShellOption::KingAttackSacrifices(on) => {
                self.tables.config_mut().king_attack_sacrifices = on
            }
            ShellOption::KingBoxSacrifices(on) => self.tables.config_mut().king_box_sacrifices = on,
            ShellOption::PvQueenPromotions(on) => self.tables.config_mut().pv_queen_promotions = on,
            ShellOption::QuietKingAttacks(on) => self.tables.config_mut().quiet_king_attacks = on,
        }
        debug!(?option, "option set");
    }

    /// Print the full-width order, one `index move stage score value` line
    /// per served move.
    fn handle_order<W: Write>(&mut self, params: &OrderParams, out: &mut W) -> Result<(), ShellError> {
        let hash = match &params.hash {
            Some(uci) => self.resolve(uci)?,
            None => Move::NULL,
        };
        let height = params.height.min(MAX_PLY - 1);
        let board = self.board;
        let attack = AttackInfo::new(&board);
        let thread = self.tables.thread(0);

        let mut ctx = SortContext::init_main(&board, &attack, height, hash, params.pv, &thread);
        let mut index = 0;
        while let Some(mv) = ctx.next_main(&thread) {
            index += 1;
            writeln!(out, "{index} {mv} {} {} {}", ctx.stage(), ctx.score(), ctx.value())?;
        }
        debug!(moves = index, height, "order listed");
        Ok(())
    }

    fn handle_qorder<W: Write>(&self, checks: bool, out: &mut W) -> Result<(), ShellError> {
        let attack = AttackInfo::new(&self.board);
        let mut ctx = SortContext::init_quiescence(&self.board, &attack, checks);
        let mut index = 0;
        while let Some(mv) = ctx.next_quiescence() {
            index += 1;
            writeln!(out, "{index} {mv} {} {} {}", ctx.stage(), ctx.score(), ctx.value())?;
        }
        debug!(moves = index, checks, "quiescence order listed");
        Ok(())
    }

    fn handle_cutoff(&mut self, uci_move: &str, depth: u32, height: usize) -> Result<(), ShellError> {
        let mv = self.resolve(uci_move)?;
        if self.board.is_tactical(mv) {
            warn!(uci_move, "cutoff ignored for tactical move");
            return Ok(());
        }
        let board = self.board;
        self.tables
            .thread(0)
            .record_cutoff_move(&board, mv, depth, height.min(MAX_PLY - 1));
        Ok(())
    }

    fn handle_outcome(&mut self, uci_move: &str, success: bool) -> Result<(), ShellError> {
        let mv = self.resolve(uci_move)?;
        if self.board.is_tactical(mv) {
            warn!(uci_move, "history update ignored for tactical move");
            return Ok(());
        }
        let board = self.board;
        let thread = self.tables.thread(0);
        if success {
            thread.record_quiet_success(&board, mv);
        } else {
            thread.record_quiet_failure(&board, mv);
        }
        Ok(())
    }

    fn resolve(&self, uci_move: &str) -> Result<Move, ShellError> {
        Move::from_uci(uci_move, &self.board).ok_or_else(|| ShellError::InvalidMove {
            uci_move: uci_move.to_string(),
        })
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}
