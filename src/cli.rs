use clap::Parser;

/// Check whether terminals are open right now, based on their published working hours
#[derive(Debug, Parser)]
#[command(name = "terminal-status", version, about)]
pub struct Args {
    /// Terminal ids to look up in the directory
    #[arg(value_name = "TERMINAL_ID", required = true, num_args = 1..)]
    pub terminal_ids: Vec<String>,
}
