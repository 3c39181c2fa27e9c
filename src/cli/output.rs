use colored::Colorize;
use std::fmt;

use crate::core::services::{Delta, HistoryPoint, LegendEntry, Trend};
use crate::core::DashboardView;
use crate::currency::{format_amount, format_percent};
use crate::domain::{Account, Dataset, Record};

pub fn section(title: impl fmt::Display) {
    println!("{}", format!("=== {} ===", title).bold());
}

pub fn success(message: impl fmt::Display) {
    println!("{} {}", "[ok]".green(), message);
}

pub fn info(message: impl fmt::Display) {
    println!("{} {}", "[i]".cyan(), message);
}

pub fn warning(message: impl fmt::Display) {
    println!("{} {}", "[!]".yellow(), message);
}

pub fn accounts(accounts: &[&Account]) {
    if accounts.is_empty() {
        info("No accounts.");
        return;
    }
    for account in accounts {
        let status = account
            .status()
            .map(|status| format!(" [{status}]").dimmed().to_string())
            .unwrap_or_default();
        println!(
            "  {:<36} {:<20} {}{}",
            account.id.as_str().dimmed(),
            account.name,
            account.category,
            status
        );
    }
}

pub fn records(dataset: &Dataset, records: &[&Record], symbol: &str) {
    if records.is_empty() {
        info("No records yet.");
        return;
    }
    for record in records {
        println!(
            "{}  {}",
            record.date.to_string().bold(),
            format_amount(record.total(), symbol)
        );
        for (id, value) in &record.assets {
            let name = dataset
                .account(id)
                .map(|account| account.name.as_str())
                .unwrap_or(id.as_str());
            println!("    {:<20} {}", name, format_amount(*value, symbol));
        }
    }
}

pub fn delta(delta: Option<Delta>, symbol: &str) {
    let Some(delta) = delta else {
        return;
    };
    let text = format!(
        "{} {} ({})",
        match delta.trend() {
            Trend::Up => "↑",
            Trend::Down => "↓",
        },
        format_amount(delta.change.unsigned_abs(), symbol),
        format_percent(delta.percent)
    );
    match delta.trend() {
        Trend::Up => println!("  {}", text.green()),
        Trend::Down => println!("  {}", text.red()),
    }
}

pub fn dashboard(view: &DashboardView, symbol: &str) {
    section(format!("Total assets ({})", view.window));
    println!("  {}", format_amount(view.latest_total, symbol).bold());
    delta(view.delta, symbol);
    for point in &view.points {
        println!("  {}  {}", point.date, format_amount(point.total, symbol));
    }
}

pub fn legend(rows: &[LegendEntry], symbol: &str) {
    if rows.is_empty() {
        info("No records yet.");
        return;
    }
    for row in rows {
        println!(
            "  {} {:<20} {:>16} {:>7}",
            row.color,
            row.name,
            format_amount(row.value, symbol),
            format_percent(row.percent)
        );
    }
}

pub fn history(points: &[HistoryPoint], symbol: &str) {
    if points.is_empty() {
        info("No records in this window.");
        return;
    }
    for point in points {
        println!("  {}  {}", point.date, format_amount(point.value, symbol));
    }
}
