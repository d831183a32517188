use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use chrono::{
    DateTime, Datelike, Days, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Timelike, Utc, Weekday,
};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{Error, Result, ValidationError};

/// Source of "now" for the engine.
///
/// Injected so hosts and tests control time; the engine never reads the
/// system clock directly.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by `Utc::now()`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for tests and simulations.
#[derive(Clone, Debug)]
pub struct FixedClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// A calendar month, persisted as `"YYYY-MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ValidationError::InvalidInput(format!("'{}' is not a YYYY-MM month", s));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Ok(YearMonth::new(year, month).ok_or_else(invalid)?)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Day/week/month arithmetic anchored to one local time zone.
///
/// Instants are stored in UTC; every "calendar day" question is answered in
/// the configured zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    tz: Tz,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl Calendar {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn utc() -> Self {
        Self { tz: Tz::UTC }
    }

    /// Builds a calendar from an IANA zone name such as `"Europe/Paris"`.
    pub fn from_name(name: &str) -> Result<Self> {
        name.parse::<Tz>()
            .map(Self::new)
            .map_err(|_| ValidationError::UnknownTimezone(name.to_string()).into())
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    pub fn local_hour(&self, instant: DateTime<Utc>) -> u32 {
        instant.with_timezone(&self.tz).hour()
    }

    pub fn weekday(&self, instant: DateTime<Utc>) -> Weekday {
        instant.with_timezone(&self.tz).weekday()
    }

    pub fn year_month(&self, instant: DateTime<Utc>) -> YearMonth {
        let date = self.local_date(instant);
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Number of local calendar days from `earlier` to `later`.
    pub fn days_between(&self, earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
        (self.local_date(later) - self.local_date(earlier)).num_days()
    }

    pub fn local_time(&self, instant: DateTime<Utc>) -> NaiveTime {
        instant.with_timezone(&self.tz).time()
    }

    /// Adds whole local calendar days, keeping the wall-clock time.
    pub fn add_days(&self, instant: DateTime<Utc>, days: u64) -> DateTime<Utc> {
        self.add_days_at(instant, days, self.local_time(instant))
    }

    /// Adds whole local calendar days and lands on `wall_time` that day.
    ///
    /// Returns `instant` unchanged if the date leaves chrono's range.
    pub fn add_days_at(
        &self,
        instant: DateTime<Utc>,
        days: u64,
        wall_time: NaiveTime,
    ) -> DateTime<Utc> {
        self.local_date(instant)
            .checked_add_days(Days::new(days))
            .and_then(|date| self.resolve_local(date.and_time(wall_time)))
            .unwrap_or(instant)
    }

    /// Adds calendar months, clamping to the last day of shorter months.
    pub fn add_months(&self, instant: DateTime<Utc>, months: u32) -> DateTime<Utc> {
        self.add_months_at(instant, months, self.local_time(instant))
    }

    /// Adds calendar months and lands on `wall_time` that day.
    pub fn add_months_at(
        &self,
        instant: DateTime<Utc>,
        months: u32,
        wall_time: NaiveTime,
    ) -> DateTime<Utc> {
        self.local_date(instant)
            .checked_add_months(Months::new(months))
            .and_then(|date| self.resolve_local(date.and_time(wall_time)))
            .unwrap_or(instant)
    }

    /// Maps a local wall-clock time to an instant.
    ///
    /// Ambiguous times (clocks going back) take the earlier instant. Times
    /// skipped by a forward transition move one hour later.
    fn resolve_local(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        self.tz
            .from_local_datetime(&local)
            .earliest()
            .or_else(|| {
                self.tz
                    .from_local_datetime(&(local + Duration::hours(1)))
                    .earliest()
            })
            .map(|resolved| resolved.with_timezone(&Utc))
    }
}

/// Full English weekday name.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_year_month_round_trips_through_string() {
        let ym: YearMonth = "2024-03".parse().unwrap();
        assert_eq!(ym, YearMonth { year: 2024, month: 3 });
        assert_eq!(ym.to_string(), "2024-03");
        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("garbage".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_days_between_uses_local_dates() {
        let paris = Calendar::from_name("Europe/Paris").unwrap();
        // 23:30 UTC on Jan 1 is already Jan 2 in Paris.
        let late = at(2024, 1, 1, 23, 30);
        let next = at(2024, 1, 2, 8, 0);
        assert_eq!(paris.days_between(late, next), 0);
        assert_eq!(Calendar::utc().days_between(late, next), 1);
    }

    #[test]
    fn test_add_months_clamps_to_month_end() {
        let cal = Calendar::utc();
        let jan31 = at(2024, 1, 31, 9, 0);
        assert_eq!(cal.add_months(jan31, 1), at(2024, 2, 29, 9, 0));
    }

    #[test]
    fn test_add_days_keeps_wall_clock_across_dst() {
        let paris = Calendar::from_name("Europe/Paris").unwrap();
        // 09:00 local on 2024-03-28 (UTC+1) -> 09:00 local on 2024-04-04 (UTC+2)
        let before = at(2024, 3, 28, 8, 0);
        assert_eq!(paris.add_days(before, 7), at(2024, 4, 4, 7, 0));
    }

    #[test]
    fn test_ambiguous_wall_clock_takes_earlier_instant() {
        let london = Calendar::from_name("Europe/London").unwrap();
        // 01:30 BST on 2024-10-20; 01:30 occurs twice on 2024-10-27.
        let before = at(2024, 10, 20, 0, 30);
        assert_eq!(london.add_days(before, 7), at(2024, 10, 27, 0, 30));
    }

    #[test]
    fn test_skipped_wall_clock_does_not_drift_later_steps() {
        let london = Calendar::from_name("Europe/London").unwrap();
        // 01:30 GMT on 2024-03-24; 01:30 does not exist on 2024-03-31.
        let start = at(2024, 3, 24, 1, 30);
        let wall = london.local_time(start);

        let gap = london.add_days_at(start, 7, wall);
        assert_eq!(gap, at(2024, 3, 31, 1, 30)); // 02:30 BST

        // 01:30 BST on 2024-04-07, back on the original wall-clock time.
        let after = london.add_days_at(gap, 7, wall);
        assert_eq!(after, at(2024, 4, 7, 0, 30));
        assert_eq!(london.local_hour(after), 1);
    }

    #[test]
    fn test_unknown_timezone_is_rejected() {
        assert!(Calendar::from_name("Mars/Olympus").is_err());
    }

    #[test]
    fn test_fixed_clock_advances() {
        let clock = FixedClock::new(at(2024, 1, 1, 0, 0));
        clock.advance(Duration::days(2));
        assert_eq!(clock.now(), at(2024, 1, 3, 0, 0));
    }
}
