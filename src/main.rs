use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::builder::RangedU64ValueParser;
use clap::Parser;
use tracing::{info, warn};

mod demo;
mod logging;
mod preferences;
mod report;

use preferences::{Preferences, MAX_CAPACITY};

#[derive(Debug, Parser)]
#[command(name = "ringdeque", version, about = "Walk a ring buffer through push, pop, insert, remove and resize")]
struct Args {
    /// Slot count of the demo buffer (overrides preferences)
    #[arg(short, long, value_parser = capacity_parser())]
    capacity: Option<usize>,

    /// Preferences file (default: <config dir>/ringdeque/preferences.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Do not print head/tail slots
    #[arg(long)]
    hide_indices: bool,

    /// Write the effective preferences back to the preferences file
    #[arg(long)]
    save: bool,
}

fn capacity_parser() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::new().range(1..=MAX_CAPACITY as u64)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let path = args.config.clone().unwrap_or_else(Preferences::default_path);

    let (mut prefs, load_error) = match Preferences::load_from(&path) {
        Ok(prefs) => (prefs, None),
        Err(e) => (Preferences::default(), Some(e)),
    };
    if let Some(capacity) = args.capacity {
        prefs.capacity = capacity;
    }
    if args.hide_indices {
        prefs.show_indices = false;
    }

    logging::init(&prefs.log_filter);
    if let Some(e) = load_error {
        warn!("{e}, using defaults");
    }

    let stdout = io::stdout();
    demo::run(prefs.capacity, prefs.show_indices, &mut stdout.lock())?;

    if args.save {
        prefs.save_to(&path).context("failed to save preferences")?;
        info!(path = %path.display(), "saved preferences");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_flag_in_range() {
        let args = Args::try_parse_from(["ringdeque", "--capacity", "3"]).unwrap();
        assert_eq!(args.capacity, Some(3));
    }

    #[test]
    fn test_capacity_flag_rejects_out_of_range() {
        assert!(Args::try_parse_from(["ringdeque", "--capacity", "0"]).is_err());
        let too_big = (MAX_CAPACITY + 1).to_string();
        assert!(Args::try_parse_from(["ringdeque", "--capacity", too_big.as_str()]).is_err());
    }
}
