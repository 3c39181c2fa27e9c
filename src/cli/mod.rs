//! One-shot command-line front end over [`AssetTracker`].

pub mod output;

use std::{fs, path::PathBuf};

use chrono::NaiveDate;

use crate::config::{Config, ConfigManager};
use crate::connectivity::{ConnectivitySignal, EnvConnectivity};
use crate::core::services::{AccountRegistry, RecordStore, TimeWindow};
use crate::core::AssetTracker;
use crate::domain::{AccountCategory, AccountId, RecordDraft};
use crate::errors::{Result, TrackerError};
use crate::storage::JsonStorage;
use crate::utils::build_info;

const USAGE: &str = "\
Usage: asset_tracker_cli <command> [args]

Commands:
  accounts                              list accounts
  add-account <name> [category]         add an account (bank, investment, cash, other)
  toggle-account <id>                   activate or deactivate an account
  delete-account <id>                   hide an account, keeping its history
  record <date> <id>=<amount>...        save a snapshot, replacing one on the same date
  edit <date> <new-date> <id>=<amount>...
                                        rewrite the snapshot saved on <date>
  remove <date>                         delete the snapshot on <date>
  records                               list snapshots, newest first
  summary [3m|6m|1y|all]                total, change and trend
  allocation                            latest snapshot breakdown
  history <id> [3m|6m|1y|all]           one account over time
  export [dir]                          write a backup document
  import <file> --yes                   replace all data with a backup document
  version                               show build information
  help                                  show this message";

/// State shared by every command.
pub struct CliContext {
    pub tracker: AssetTracker,
    pub config: Config,
}

impl CliContext {
    /// Opens the tracker and configuration from the default data directory.
    pub fn open() -> Result<Self> {
        let storage = JsonStorage::new_default()?;
        let config = ConfigManager::new()?.load()?;
        Ok(Self {
            tracker: AssetTracker::open(Box::new(storage)),
            config,
        })
    }
}

pub fn run_cli(args: Vec<String>) -> Result<()> {
    let Some((command, rest)) = args.split_first() else {
        println!("{USAGE}");
        return Ok(());
    };
    match command.as_str() {
        "help" | "--help" | "-h" => {
            println!("{USAGE}");
            return Ok(());
        }
        "version" | "--version" => {
            println!("{}", build_info::current().summary());
            return Ok(());
        }
        _ => {}
    }

    if let Some(banner) = EnvConnectivity.status().banner() {
        output::warning(banner);
    }
    let mut context = CliContext::open()?;
    dispatch(&mut context, command, rest)?;
    if let Some(err) = context.tracker.last_save_error() {
        output::warning(format!("changes were not saved: {err}"));
    }
    Ok(())
}

pub fn dispatch(context: &mut CliContext, command: &str, args: &[String]) -> Result<()> {
    let symbol = context.config.currency_symbol.clone();
    match command {
        "accounts" => {
            output::section("Accounts");
            output::accounts(&AccountRegistry::visible(context.tracker.dataset()));
        }
        "add-account" => {
            let name = required(args, 0, "account name")?;
            let category = args
                .get(1)
                .map(|raw| AccountCategory::parse(raw))
                .unwrap_or_default();
            let account = context.tracker.add_account(name, category)?;
            output::success(format!("Added account `{}` ({})", account.name, account.id));
        }
        "toggle-account" => {
            let id = AccountId::new(required(args, 0, "account id")?);
            if context.tracker.toggle_account(&id) {
                output::success(format!("Toggled account {id}"));
            } else {
                output::warning(format!("No active or inactive account {id}"));
            }
        }
        "delete-account" => {
            let id = AccountId::new(required(args, 0, "account id")?);
            if context.tracker.delete_account(&id) {
                output::success(format!("Deleted account {id}"));
            } else {
                output::warning(format!("No visible account {id}"));
            }
        }
        "record" => {
            let date = parse_date(required(args, 0, "date")?)?;
            let draft = parse_amounts(RecordDraft::new(date), &args[1..])?;
            let overwriting = RecordStore::exists(context.tracker.dataset(), date);
            let record = context.tracker.save_record(draft)?;
            if overwriting {
                output::warning(format!("Replaced the existing record on {date}"));
            }
            output::success(format!(
                "Saved {} ({} accounts)",
                record.date,
                record.assets.len()
            ));
        }
        "edit" => {
            let original = parse_date(required(args, 0, "original date")?)?;
            let date = parse_date(required(args, 1, "new date")?)?;
            let draft = parse_amounts(RecordDraft::new(date), &args[2..])?;
            let record = context.tracker.update_record(draft, original)?;
            output::success(format!("Updated record, now dated {}", record.date));
        }
        "remove" => {
            let date = parse_date(required(args, 0, "date")?)?;
            if context.tracker.delete_record(date) {
                output::success(format!("Removed record on {date}"));
            } else {
                output::warning(format!("No record on {date}"));
            }
        }
        "records" => {
            let dataset = context.tracker.dataset();
            output::section("Records");
            output::records(dataset, &RecordStore::newest_first(dataset), &symbol);
        }
        "summary" => {
            let window = parse_window(args.first(), context.config.default_window)?;
            output::dashboard(&context.tracker.dashboard(window), &symbol);
        }
        "allocation" => {
            output::section("Allocation");
            output::legend(&context.tracker.allocation(), &symbol);
        }
        "history" => {
            let id = AccountId::new(required(args, 0, "account id")?);
            let window = parse_window(args.get(1), context.config.default_window)?;
            let name = AccountRegistry::display_name(context.tracker.dataset(), &id);
            output::section(format!("{name} ({window})"));
            output::history(&context.tracker.account_history(&id, window), &symbol);
        }
        "export" => {
            let dir = args.first().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
            let path = dir.join(context.tracker.export_file_name(&context.config.export_prefix));
            fs::write(&path, context.tracker.export_document()?)?;
            output::success(format!("Exported to {}", path.display()));
        }
        "import" => {
            let path = required(args, 0, "backup file")?;
            if !args.iter().any(|arg| arg == "--yes") {
                return Err(TrackerError::InvalidInput(
                    "import replaces all accounts and records; re-run with --yes".into(),
                ));
            }
            let document = fs::read_to_string(path)?;
            let summary = context.tracker.import_document(&document)?;
            output::success(format!(
                "Imported {} accounts and {} records",
                summary.accounts, summary.records
            ));
        }
        other => {
            return Err(TrackerError::InvalidInput(format!(
                "unknown command `{other}`, try `help`"
            )))
        }
    }
    Ok(())
}

fn required<'a>(args: &'a [String], index: usize, what: &str) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| TrackerError::InvalidInput(format!("missing {what}")))
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| TrackerError::InvalidInput(format!("`{raw}` is not a YYYY-MM-DD date")))
}

fn parse_window(raw: Option<&String>, default: TimeWindow) -> Result<TimeWindow> {
    raw.map(|value| value.parse()).unwrap_or(Ok(default))
}

fn parse_amounts(mut draft: RecordDraft, pairs: &[String]) -> Result<RecordDraft> {
    for pair in pairs {
        let (id, raw) = pair.split_once('=').ok_or_else(|| {
            TrackerError::InvalidInput(format!("expected <id>=<amount>, got `{pair}`"))
        })?;
        draft.set(id, raw);
    }
    Ok(draft)
}
