use std::io::{self, Write};

use anyhow::Result;
use covergrid::report;

use super::{load_config, run_engine};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::InputArgs) -> Result<()> {
    let config = load_config(args)?;
    let report = run_engine(args, &config)?;

    let mut stdout = io::stdout().lock();
    report::write_stats_json(&mut stdout, &report)?;
    writeln!(stdout)?;
    Ok(())
}
