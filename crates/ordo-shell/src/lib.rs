//! Line-oriented inspector for the ordo move-ordering subsystem.

pub mod command;
pub mod error;
pub mod shell;

pub use command::{Command, OrderParams, ShellOption};
pub use error::ShellError;
pub use shell::{Shell, ShellConfig};
