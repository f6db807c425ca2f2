//! Move ordering for ordo: the stage program, the staged move iterator,
//! score functions, capture classification and the killer/history tables.

pub mod classify;
pub mod config;
pub mod heuristics;
pub mod list;
pub mod program;
pub mod score;
pub mod see;
pub mod sorter;

pub use classify::capture_is_good;
pub use config::OrderingConfig;
pub use heuristics::{HistoryTable, KillerTable, MAX_PLY, OrderingTables, ThreadTables};
pub use list::ScoredMoveList;
pub use program::{Entry, Stage, StageProgram, initialize_tables};
pub use sorter::{Filter, SortContext, killer_candidates};
