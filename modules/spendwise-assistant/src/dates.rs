//! Relative date phrases ("3 days ago", "2 days later") rewritten as absolute
//! calendar dates before the text reaches the model.

use std::sync::LazyLock;

use chrono::{Datelike, Days, NaiveDate, Utc};
use regex::{Captures, Regex};

static RELATIVE_DAYS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s+days?\s+(ago|before|after|later)\b").expect("valid regex")
});

/// Source of "today". Injected so handlers and tests agree on the date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Today's UTC calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Today, yesterday and tomorrow relative to a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateContext {
    pub today: NaiveDate,
    pub yesterday: NaiveDate,
    pub tomorrow: NaiveDate,
}

impl DateContext {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            yesterday: today.pred_opt().unwrap_or(today),
            tomorrow: today.succ_opt().unwrap_or(today),
        }
    }
}

/// Replace every `<N> day(s) <ago|before|after|later>` with `on <yyyy-mm-dd>`.
///
/// Each phrase is resolved against `today` on its own; phrases do not chain.
/// Counts that overflow, or land outside four-digit years, stay as written.
pub fn resolve_relative_dates(input: &str, today: NaiveDate) -> String {
    RELATIVE_DAYS
        .replace_all(input, |caps: &Captures| {
            match shift(today, &caps[1], &caps[2]) {
                Some(date) => format!("on {}", format_date(date)),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn shift(today: NaiveDate, count: &str, direction: &str) -> Option<NaiveDate> {
    let days = Days::new(count.parse().ok()?);
    let date = match direction.to_ascii_lowercase().as_str() {
        "after" | "later" => today.checked_add_days(days)?,
        _ => today.checked_sub_days(days)?,
    };
    (0..=9999).contains(&date.year()).then_some(date)
}
