//! Schedule-time assembly from independently edited 12-hour fields.
//!
//! Mirrors a date picker with separate hour (1-12), minute, second, and
//! AM/PM inputs. Out-of-range field edits are ignored, not clamped and not
//! reported. The builder refuses past dates, but nothing here prevents the
//! assembled timestamp itself from being in the past (a post scheduled for
//! an already-elapsed second is valid and will fire on the next sweep).

use chrono::{DateTime, Local, NaiveDate, TimeZone, Timelike, Utc};

/// AM/PM toggle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

/// Builder for a single future timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleBuilder {
    date: NaiveDate,
    /// 24-hour internal representation; the accessors expose 12-hour form.
    hour24: u32,
    minute: u32,
    second: u32,
}

impl ScheduleBuilder {
    /// Start from the current local time.
    pub fn now() -> Self {
        Self::from_datetime(Local::now())
    }

    pub fn from_datetime(at: DateTime<Local>) -> Self {
        Self {
            date: at.date_naive(),
            hour24: at.hour(),
            minute: at.minute(),
            second: at.second(),
        }
    }

    /// Set the calendar date. Dates before today are not selectable and
    /// are ignored.
    pub fn set_date(&mut self, date: NaiveDate) {
        if date >= Local::now().date_naive() {
            self.date = date;
        }
    }

    /// Set the hour in 12-hour form (1-12), interpreted against the
    /// current AM/PM state. Anything out of range is ignored.
    pub fn set_hour(&mut self, hour12: u32) {
        if !(1..=12).contains(&hour12) {
            return;
        }
        self.hour24 = match (self.meridiem(), hour12) {
            (Meridiem::Pm, 12) => 12,
            (Meridiem::Pm, h) => h + 12,
            (Meridiem::Am, 12) => 0,
            (Meridiem::Am, h) => h,
        };
    }

    /// Set minutes (0-59); out of range is ignored.
    pub fn set_minute(&mut self, minute: u32) {
        if minute <= 59 {
            self.minute = minute;
        }
    }

    /// Set seconds (0-59); out of range is ignored.
    pub fn set_second(&mut self, second: u32) {
        if second <= 59 {
            self.second = second;
        }
    }

    /// Flip the AM/PM toggle, re-deriving the 24-hour value from the
    /// displayed 12-hour one.
    pub fn set_meridiem(&mut self, meridiem: Meridiem) {
        let hour12 = self.hour12();
        self.hour24 = match (meridiem, hour12) {
            (Meridiem::Am, 12) => 0,
            (Meridiem::Am, h) => h,
            (Meridiem::Pm, 12) => 12,
            (Meridiem::Pm, h) => h + 12,
        };
    }

    /// Displayed hour, 1-12.
    pub fn hour12(&self) -> u32 {
        match self.hour24 % 12 {
            0 => 12,
            h => h,
        }
    }

    pub fn meridiem(&self) -> Meridiem {
        if self.hour24 >= 12 {
            Meridiem::Pm
        } else {
            Meridiem::Am
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Assemble the composite timestamp, interpreted in local time and
    /// converted to UTC for submission.
    pub fn build(&self) -> DateTime<Utc> {
        let naive = self
            .date
            .and_hms_opt(self.hour24, self.minute, self.second)
            .unwrap_or_else(|| self.date.and_hms_opt(0, 0, 0).expect("midnight is valid"));
        match Local.from_local_datetime(&naive) {
            chrono::LocalResult::Single(dt) => dt.with_timezone(&Utc),
            chrono::LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            // A DST gap: fall back to reading the wall-clock fields as UTC.
            chrono::LocalResult::None => Utc.from_utc_datetime(&naive),
        }
    }

    /// ISO-8601 string as sent in the `scheduled_time` form field.
    pub fn iso8601(&self) -> String {
        self.build().to_rfc3339()
    }
}

impl Default for ScheduleBuilder {
    fn default() -> Self {
        Self::now()
    }
}
