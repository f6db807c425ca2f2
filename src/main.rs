use std::io;

use anyhow::Result;
use tracing::info;

use ordo_shell::Shell;

fn main() -> Result<()> {
    // stdout carries the shell protocol, so logs go to stderr.
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    info!(program = ?ordo_sort::initialize_tables().sequence(ordo_sort::Entry::Main), "ordo starting");

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    Shell::new().run(stdin.lock(), &mut stdout)?;
    Ok(())
}
