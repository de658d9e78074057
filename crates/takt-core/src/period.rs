//! Calendar periods and their bucket labels.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::aggregate::AggregateError;

/// Granularity of a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
}

impl Period {
    pub const ALL: [Self; 4] = [Self::Day, Self::Week, Self::Month, Self::Year];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Bucket label for a timestamp, read in the offset it was recorded with.
    ///
    /// Labels are zero-padded so that, within one period, lexicographic order
    /// matches chronological order.
    pub fn label(&self, timestamp: &DateTime<FixedOffset>) -> String {
        match self {
            Self::Day => timestamp.format("%Y-%m-%d").to_string(),
            Self::Week => {
                let week = timestamp.iso_week();
                format!("{:04}-W{:02}", week.year(), week.week())
            }
            Self::Month => format!("{:04}-{:02}", timestamp.year(), timestamp.month()),
            Self::Year => format!("{:04}", timestamp.year()),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Period {
    type Err = AggregateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" => Ok(Self::Day),
            "week" | "wtd" => Ok(Self::Week),
            "month" | "mtd" => Ok(Self::Month),
            "year" | "ytd" => Ok(Self::Year),
            _ => Err(AggregateError::InvalidPeriod {
                value: s.to_string(),
            }),
        }
    }
}
