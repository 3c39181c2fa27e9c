use std::{fmt, str::FromStr};

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{AssetMap, Record};
use crate::errors::TrackerError;

/// Relative time filter applied to chronological series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeWindow {
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[default]
    #[serde(rename = "all")]
    All,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 4] = [
        TimeWindow::ThreeMonths,
        TimeWindow::SixMonths,
        TimeWindow::OneYear,
        TimeWindow::All,
    ];

    pub fn months(self) -> Option<u32> {
        match self {
            TimeWindow::ThreeMonths => Some(3),
            TimeWindow::SixMonths => Some(6),
            TimeWindow::OneYear => Some(12),
            TimeWindow::All => None,
        }
    }

    /// First date kept by the window. Day-of-month is clamped to the target month,
    /// so 31 May minus three months is 28/29 February.
    pub fn cutoff(self, today: NaiveDate) -> Option<NaiveDate> {
        let months = self.months()?;
        Some(
            today
                .checked_sub_months(Months::new(months))
                .unwrap_or(NaiveDate::MIN),
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeWindow::ThreeMonths => "3m",
            TimeWindow::SixMonths => "6m",
            TimeWindow::OneYear => "1y",
            TimeWindow::All => "all",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "3m" => Ok(TimeWindow::ThreeMonths),
            "6m" => Ok(TimeWindow::SixMonths),
            "1y" => Ok(TimeWindow::OneYear),
            "all" => Ok(TimeWindow::All),
            other => Err(TrackerError::InvalidInput(format!(
                "unknown window `{other}` (expected 3m, 6m, 1y or all)"
            ))),
        }
    }
}

/// Anything positioned on a calendar date.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

/// One point of the total-assets line: the total plus every per-account value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub total: u64,
    pub assets: AssetMap,
}

impl Dated for SeriesPoint {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Records in ascending date order. Points are computed on iteration, and
/// iteration can be restarted any number of times.
#[derive(Debug, Clone)]
pub struct Series<'a> {
    records: Vec<&'a Record>,
}

impl<'a> Series<'a> {
    pub fn iter(&self) -> impl Iterator<Item = SeriesPoint> + Clone + '_ {
        self.records.iter().map(|record| SeriesPoint {
            date: record.date,
            total: AggregationEngine::total(record),
            assets: record.assets.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn points(&self) -> Vec<SeriesPoint> {
        self.iter().collect()
    }

    /// Total of the newest record, 0 for an empty series.
    pub fn latest_total(&self) -> u64 {
        self.records
            .last()
            .map(|record| AggregationEngine::total(record))
            .unwrap_or(0)
    }
}

/// Direction of the change indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Up,
    Down,
}

/// Change between the first and last point of a filtered series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Delta {
    pub change: i64,
    /// Percent of the first total, one decimal place; 0 when the first total is 0.
    pub percent: f64,
}

impl Delta {
    pub fn trend(&self) -> Trend {
        if self.change >= 0 {
            Trend::Up
        } else {
            Trend::Down
        }
    }
}

pub struct AggregationEngine;

impl AggregationEngine {
    pub fn total(record: &Record) -> u64 {
        record.total()
    }

    pub fn series(records: &[Record]) -> Series<'_> {
        let mut sorted: Vec<&Record> = records.iter().collect();
        sorted.sort_by_key(|record| record.date);
        debug!(points = sorted.len(), "series built");
        Series { records: sorted }
    }

    /// Keeps items dated on or after the window cutoff. `All` returns the input as is.
    pub fn filter_by_window<T: Dated>(
        items: Vec<T>,
        window: TimeWindow,
        today: NaiveDate,
    ) -> Vec<T> {
        match window.cutoff(today) {
            None => items,
            Some(cutoff) => items
                .into_iter()
                .filter(|item| item.date() >= cutoff)
                .collect(),
        }
    }

    /// `None` when fewer than two points are available.
    pub fn delta(points: &[SeriesPoint]) -> Option<Delta> {
        let (first, last) = match points {
            [first, .., last] => (first, last),
            _ => return None,
        };
        let wide = i128::from(last.total) - i128::from(first.total);
        let change = i64::try_from(wide).unwrap_or(if wide < 0 { i64::MIN } else { i64::MAX });
        let percent = if first.total > 0 {
            round_one_decimal(wide as f64 / first.total as f64 * 100.0)
        } else {
            0.0
        };
        Some(Delta { change, percent })
    }
}

pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
