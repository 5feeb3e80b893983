//! CLI shell over `journal_core`.
//!
//! # Responsibility
//! - Open (or create) the journal database and seed it on first run.
//! - Print the header month and mounted month panels with entry counts.
//!
//! Usage: `journal_cli [DB_PATH] [FILTER]`. Without `DB_PATH` an in-memory
//! database is used. Set `JOURNAL_LOG_DIR` to an absolute path to enable
//! file logging and `JOURNAL_CONFIG` to a JSON calendar config file.

use journal_core::db::{open_db, open_db_in_memory};
use journal_core::{
    init_logging, parse_seed_json, CalendarConfig, CalendarSurface, EntryStore,
    SqliteEntryRepository,
};
use log::error;
use std::error::Error;
use std::process::ExitCode;

const SEED_JSON: &str = include_str!("../data/seed_entries.json");

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("journal_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    if let Ok(log_dir) = std::env::var("JOURNAL_LOG_DIR") {
        init_logging(journal_core::default_log_level(), &log_dir)?;
    }

    let config = match std::env::var("JOURNAL_CONFIG") {
        Ok(path) => CalendarConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        Err(_) => CalendarConfig::default(),
    };

    let mut args = std::env::args().skip(1);
    let conn = match args.next() {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let filter = args.next().unwrap_or_default();

    let repo = SqliteEntryRepository::new(&conn);
    let mut store = EntryStore::new(repo);
    let source = store.load_or_seed(parse_seed_json(SEED_JSON)?)?;

    let today = local_today();
    let mut surface = CalendarSurface::new(config, today)?;
    surface.sync_entries(store.entries());
    surface.set_filter(filter);

    println!("journal_core version={}", journal_core::core_version());
    println!("entries source={source:?} total={}", store.entries().len());
    println!("header={}", surface.header_label());
    for panel in surface.panels() {
        let count = panel
            .weeks
            .iter()
            .flatten()
            .filter(|cell| !cell.dim)
            .map(|cell| cell.entry_ids.len())
            .sum::<usize>();
        println!("{:>4} {:<16} entries={count}", panel.offset, panel.label);
    }
    for entry in surface.index().ordered() {
        println!(
            "{} {} [{}] {}",
            entry.date,
            entry.rating_label(),
            entry.categories.join(", "),
            entry.description
        );
    }
    Ok(())
}

fn local_today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
