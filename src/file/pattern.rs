//! Backup naming schemes
//!
//! Rotated files carry a timestamp suffix whose shape depends on why the
//! rotation happened: calendar slices use a compact digit stamp joined with
//! `_`, while line- and size-triggered rotations use a full date-time joined
//! with `.`. Producing a backup name and recognizing one during retention
//! cleanup both go through [`BackupScheme`], so the format and the matching
//! pattern cannot drift apart.

use crate::file::config::DateSlice;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupScheme {
    /// `app_2024.log`
    Year,
    /// `app_202405.log`
    Month,
    /// `app_20240531.log`
    Day,
    /// `app_2024053117.log`
    Hour,
    /// `app.2024-05-31-17.04.05.1234.log` (line/size rotation)
    Timestamp,
}

impl From<DateSlice> for BackupScheme {
    fn from(slice: DateSlice) -> Self {
        match slice {
            DateSlice::Year => BackupScheme::Year,
            DateSlice::Month => BackupScheme::Month,
            DateSlice::Day => BackupScheme::Day,
            DateSlice::Hour => BackupScheme::Hour,
        }
    }
}

impl BackupScheme {
    /// Character joining the base name and the timestamp suffix
    pub fn connector(&self) -> char {
        match self {
            BackupScheme::Timestamp => '.',
            _ => '_',
        }
    }

    /// strftime format for the timestamp portion (without the fraction)
    pub fn time_format(&self) -> &'static str {
        match self {
            BackupScheme::Year => "%Y",
            BackupScheme::Month => "%Y%m",
            BackupScheme::Day => "%Y%m%d",
            BackupScheme::Hour => "%Y%m%d%H",
            BackupScheme::Timestamp => "%Y-%m-%d-%H.%M.%S",
        }
    }

    /// Regex fragment matching exactly the stamps this scheme produces
    pub fn digit_pattern(&self) -> &'static str {
        match self {
            BackupScheme::Year => "[0-9]{4}",
            BackupScheme::Month => "[0-9]{6}",
            BackupScheme::Day => "[0-9]{8}",
            BackupScheme::Hour => "[0-9]{10}",
            BackupScheme::Timestamp => {
                r"[0-9]{4}-[0-9]{2}-[0-9]{2}-[0-9]{2}\.[0-9]{2}\.[0-9]{2}\.[0-9]{0,4}"
            }
        }
    }

    /// Render the stamp for a backup created at `time`
    pub fn render(&self, time: &DateTime<Local>) -> String {
        match self {
            BackupScheme::Timestamp => {
                // 4 fractional digits (units of 100 microseconds)
                format!(
                    "{}.{:04}",
                    time.format(self.time_format()),
                    time.timestamp_subsec_nanos() / 100_000
                )
            }
            _ => time.format(self.time_format()).to_string(),
        }
    }

    /// Decode a stamp back into an ordering key.
    ///
    /// Calendar schemes yield epoch seconds; the timestamp scheme yields
    /// epoch units of 100 microseconds so that several rotations within the
    /// same second stay ordered. Keys are only compared within one scheme.
    pub fn parse_epoch(&self, stamp: &str) -> Option<i64> {
        match self {
            BackupScheme::Year => {
                let year: i32 = stamp.parse().ok()?;
                date_epoch(year, 1, 1, 0)
            }
            BackupScheme::Month => {
                let year: i32 = stamp.get(0..4)?.parse().ok()?;
                let month: u32 = stamp.get(4..6)?.parse().ok()?;
                date_epoch(year, month, 1, 0)
            }
            BackupScheme::Day => {
                let year: i32 = stamp.get(0..4)?.parse().ok()?;
                let month: u32 = stamp.get(4..6)?.parse().ok()?;
                let day: u32 = stamp.get(6..8)?.parse().ok()?;
                date_epoch(year, month, day, 0)
            }
            BackupScheme::Hour => {
                let year: i32 = stamp.get(0..4)?.parse().ok()?;
                let month: u32 = stamp.get(4..6)?.parse().ok()?;
                let day: u32 = stamp.get(6..8)?.parse().ok()?;
                let hour: u32 = stamp.get(8..10)?.parse().ok()?;
                date_epoch(year, month, day, hour)
            }
            BackupScheme::Timestamp => {
                // "YYYY-MM-DD-HH.MM.SS" is 19 chars; the fraction follows a dot
                let datetime =
                    NaiveDateTime::parse_from_str(stamp.get(..19)?, self.time_format()).ok()?;
                let fraction: i64 = match stamp.get(20..) {
                    Some(digits) if !digits.is_empty() && digits.len() <= 4 => {
                        let parsed: i64 = digits.parse().ok()?;
                        // pad right to 4 digits: "12" means 0.12, not 0.0012
                        parsed * 10i64.pow(4 - digits.len() as u32)
                    }
                    Some(digits) if digits.len() > 4 => return None,
                    _ => 0,
                };
                Some(datetime.and_utc().timestamp() * 10_000 + fraction)
            }
        }
    }
}

fn date_epoch(year: i32, month: u32, day: u32, hour: u32) -> Option<i64> {
    Some(
        NaiveDate::from_ymd_opt(year, month, day)?
            .and_hms_opt(hour, 0, 0)?
            .and_utc()
            .timestamp(),
    )
}
