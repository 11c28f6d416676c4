//! Schedule time handling.
//!
//! GTFS times are offsets from the start of the service day, not clock
//! readings: a trip leaving at 23:50 may arrive at "24:10:00". This module
//! keeps them as plain seconds so ordering and arithmetic never wrap at
//! midnight.

use std::fmt;
use std::ops::Add;
use std::time::Duration;

/// Error returned when parsing an invalid schedule time or deadline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Seconds elapsed since the start of the service day.
///
/// Values of 86400 and above are valid and mean "after midnight, same
/// service day".
///
/// # Examples
///
/// ```
/// use transit_planner::ServiceTime;
///
/// let late = ServiceTime::parse_gtfs("25:30:00").unwrap();
/// let early = ServiceTime::parse_gtfs("23:59:59").unwrap();
/// assert!(late > early);
/// assert_eq!(late.to_string(), "25:30");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ServiceTime(u32);

impl ServiceTime {
    pub const fn from_secs(secs: u32) -> Self {
        Self(secs)
    }

    pub const fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self(hours * 3600 + minutes * 60 + seconds)
    }

    pub fn as_secs(&self) -> u32 {
        self.0
    }

    pub fn hours(&self) -> u32 {
        self.0 / 3600
    }

    pub fn minutes(&self) -> u32 {
        (self.0 % 3600) / 60
    }

    pub fn seconds(&self) -> u32 {
        self.0 % 60
    }

    /// Parse a GTFS `HH:MM:SS` value. Hours may be one digit and may exceed 23.
    pub fn parse_gtfs(s: &str) -> Result<Self, TimeError> {
        let mut parts = s.trim().split(':');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(h), Some(m), Some(sec), None) => from_parts(h, m, sec),
            _ => Err(TimeError::new("expected HH:MM:SS format")),
        }
    }

    /// Parse an `HH:MM` deadline into the same representation.
    ///
    /// ```
    /// use transit_planner::ServiceTime;
    ///
    /// assert!(ServiceTime::parse_hhmm("10:15").is_ok());
    /// assert!(ServiceTime::parse_hhmm("24:30").is_ok());
    /// assert!(ServiceTime::parse_hhmm("10:75").is_err());
    /// assert!(ServiceTime::parse_hhmm("10:15:00").is_err());
    /// assert!(ServiceTime::parse_hhmm("soon").is_err());
    /// ```
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        let mut parts = s.trim().split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(h), Some(m), None) => from_parts(h, m, "00"),
            _ => Err(TimeError::new("expected HH:MM format")),
        }
    }

    /// Full `HH:MM:SS` rendering, as it appears in the feed.
    pub fn hhmmss(&self) -> String {
        format!(
            "{:02}:{:02}:{:02}",
            self.hours(),
            self.minutes(),
            self.seconds()
        )
    }

    /// Time elapsed between `earlier` and `self`, or `None` if `earlier` is later.
    pub fn duration_since(&self, earlier: ServiceTime) -> Option<Duration> {
        self.0
            .checked_sub(earlier.0)
            .map(|secs| Duration::from_secs(secs.into()))
    }
}

fn from_parts(hours: &str, minutes: &str, seconds: &str) -> Result<ServiceTime, TimeError> {
    let hours = parse_field(hours, 3).ok_or_else(|| TimeError::new("invalid hour digits"))?;
    let minutes =
        parse_field(minutes, 2).ok_or_else(|| TimeError::new("invalid minute digits"))?;
    if minutes > 59 {
        return Err(TimeError::new("minute must be 0-59"));
    }
    let seconds =
        parse_field(seconds, 2).ok_or_else(|| TimeError::new("invalid second digits"))?;
    if seconds > 59 {
        return Err(TimeError::new("second must be 0-59"));
    }
    Ok(ServiceTime::from_hms(hours, minutes, seconds))
}

/// Parse 1..=max_len ASCII digits.
fn parse_field(s: &str, max_len: usize) -> Option<u32> {
    if s.is_empty() || s.len() > max_len || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl Add<Duration> for ServiceTime {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        let secs = u32::try_from(rhs.as_secs()).unwrap_or(u32::MAX);
        Self(self.0.saturating_add(secs))
    }
}

/// `HH:MM`, seconds truncated. Hours are not wrapped.
impl fmt::Display for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours(), self.minutes())
    }
}
