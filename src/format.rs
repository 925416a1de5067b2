// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 rtldg <rtldg@protonmail.com>

//! Small pure formatters shared by the markdown and blog renderers.

use jiff::Timestamp;
use jiff::Zoned;
use jiff::civil::DateTime;
use jiff::tz::TimeZone;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
	#[error("invalid timestamp {input:?}: {reason}")]
	InvalidTimestamp { input: String, reason: String },
}

/// `999` -> `999`, `1500` -> `1.5K`, `2_500_000` -> `2.5M`.
pub fn format_count(n: u64) -> String {
	if n >= 1_000_000 {
		format!("{}M", one_decimal(n, 1_000_000))
	} else if n >= 1_000 {
		format!("{}K", one_decimal(n, 1_000))
	} else {
		n.to_string()
	}
}

/// `n / unit` to one decimal, half up, without a trailing `.0`.
fn one_decimal(n: u64, unit: u64) -> String {
	let (n, unit) = (u128::from(n), u128::from(unit));
	let tenths = (n * 10 + unit / 2) / unit;
	match tenths % 10 {
		0 => format!("{}", tenths / 10),
		frac => format!("{}.{frac}", tenths / 10),
	}
}

/// `2024-01-15T14:30:00Z` -> `January 15, 2024 at 2:30 PM` (always UTC)
pub fn format_timestamp(iso: &str) -> Result<String, FormatError> {
	strftime(iso, "%B %-d, %Y at %-I:%M %p")
}

/// `2024-01-15T14:30:00Z` -> `January 15, 2024` (always UTC)
pub fn format_date(iso: &str) -> Result<String, FormatError> {
	strftime(iso, "%B %-d, %Y")
}

/// `65_000` -> `1:05`, `3_723_000` -> `1:02:03`
pub fn format_duration(ms: u64) -> String {
	let secs = ms / 1000;
	let (h, m, s) = (secs / 3600, secs / 60 % 60, secs % 60);
	if h > 0 { format!("{h}:{m:02}:{s:02}") } else { format!("{m}:{s:02}") }
}

pub fn build_permalink(id: &str, username: &str) -> String {
	format!("https://x.com/{username}/status/{id}")
}

/// Accepts RFC 3339 with an offset, or a bare civil datetime which is taken as UTC.
pub fn parse_timestamp(iso: &str) -> Result<Zoned, FormatError> {
	let trimmed = iso.trim();
	if let Ok(ts) = trimmed.parse::<Timestamp>() {
		return Ok(ts.to_zoned(TimeZone::UTC));
	}
	match trimmed.parse::<DateTime>() {
		Ok(dt) => dt.to_zoned(TimeZone::UTC).map_err(|e| invalid(iso, e)),
		Err(e) => Err(invalid(iso, e)),
	}
}

fn strftime(iso: &str, fmt: &str) -> Result<String, FormatError> {
	let zoned = parse_timestamp(iso)?;
	jiff::fmt::strtime::format(fmt, &zoned).map_err(|e| invalid(iso, e))
}

fn invalid(iso: &str, e: jiff::Error) -> FormatError {
	FormatError::InvalidTimestamp {
		input: iso.to_owned(),
		reason: e.to_string(),
	}
}
