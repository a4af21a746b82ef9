use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::offset::LocalResult;
use chrono::{DateTime, Days, Duration, Local, TimeZone};

/// A daily wall-clock firing time, validated once at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSpec {
    hour: u32,
    minute: u32,
}

impl ScheduleSpec {
    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// The next local instant this spec fires strictly after `now`.
    ///
    /// Recomputed per firing rather than adding a fixed 24 hours, so the
    /// wall-clock time survives DST shifts; a skipped local time falls
    /// through to the next day, an ambiguous one takes the earlier
    /// mapping.
    pub fn next_occurrence_after(&self, now: DateTime<Local>) -> DateTime<Local> {
        for day_offset in 0..3 {
            let Some(date) = now.date_naive().checked_add_days(Days::new(day_offset)) else {
                continue;
            };
            let Some(naive) = date.and_hms_opt(self.hour, self.minute, 0) else {
                continue;
            };
            let candidate = match Local.from_local_datetime(&naive) {
                LocalResult::Single(instant) => instant,
                LocalResult::Ambiguous(earliest, _) => earliest,
                LocalResult::None => continue,
            };
            if candidate > now {
                return candidate;
            }
        }

        now + Duration::days(1)
    }
}

impl FromStr for ScheduleSpec {
    type Err = anyhow::Error;

    fn from_str(input: &str) -> Result<Self> {
        let lowered = input.trim().to_ascii_lowercase();
        let (clock, meridiem) = if let Some(rest) = lowered.strip_suffix("am") {
            (rest.trim_end(), Some(Meridiem::Am))
        } else if let Some(rest) = lowered.strip_suffix("pm") {
            (rest.trim_end(), Some(Meridiem::Pm))
        } else {
            (lowered.as_str(), None)
        };

        let Some((hour_text, minute_text)) = clock.split_once(':') else {
            return Err(anyhow!(
                "invalid-schedule: expected HH:MM or H:MM[am|pm], got '{input}'"
            ));
        };
        let hour: u32 = hour_text
            .trim()
            .parse()
            .map_err(|_| anyhow!("invalid-schedule: bad hour in '{input}'"))?;
        let minute: u32 = minute_text
            .trim()
            .parse()
            .map_err(|_| anyhow!("invalid-schedule: bad minute in '{input}'"))?;
        if minute > 59 {
            return Err(anyhow!("invalid-schedule: minute out of range in '{input}'"));
        }

        let hour = match meridiem {
            None => {
                if hour > 23 {
                    return Err(anyhow!("invalid-schedule: hour out of range in '{input}'"));
                }
                hour
            }
            Some(meridiem) => {
                if hour == 0 || hour > 12 {
                    return Err(anyhow!(
                        "invalid-schedule: 12-hour clock needs 1-12 in '{input}'"
                    ));
                }
                meridiem.to_24h(hour)
            }
        };

        Ok(Self { hour, minute })
    }
}

impl fmt::Display for ScheduleSpec {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    fn to_24h(self, hour: u32) -> u32 {
        match (self, hour) {
            (Self::Am, 12) => 0,
            (Self::Am, hour) => hour,
            (Self::Pm, 12) => 12,
            (Self::Pm, hour) => hour + 12,
        }
    }
}
