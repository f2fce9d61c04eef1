//! 5-field cron schedules evaluated in UTC.
//!
//! `minute hour day-of-month month day-of-week`, each field accepting `*`,
//! numbers, ranges `a-b`, steps `*/n` or `a-b/n`, and comma lists. When both
//! day fields are restricted a day matches if either one does, as in Vixie
//! cron. `@hourly`, `@daily` and `@weekly` (with or without the `@`) are
//! accepted as aliases.

use chrono::{DateTime, Datelike, Duration, DurationRound, Timelike, Utc};
use insight_core::errors::SchedulerError;

/// How far ahead `next_after` looks before giving up.
const MAX_LOOKAHEAD_MINUTES: i64 = 366 * 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Field {
    /// Bit `n` set means value `n` matches.
    mask: u64,
    /// False when the field was written starting with `*`.
    restricted: bool,
}

impl Field {
    fn contains(&self, value: u32) -> bool {
        self.mask & (1u64 << value) != 0
    }
}

/// A parsed cron schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronSchedule {
    minute: Field,
    hour: Field,
    day_of_month: Field,
    month: Field,
    day_of_week: Field,
    expression: String,
}

impl CronSchedule {
    pub fn parse(raw: &str) -> Result<Self, SchedulerError> {
        let trimmed = raw.trim();
        let expanded = match trimmed.trim_start_matches('@').to_ascii_lowercase().as_str() {
            "hourly" => "0 * * * *",
            "daily" | "midnight" => "0 0 * * *",
            "weekly" => "0 0 * * 0",
            _ if trimmed.starts_with('@') => {
                return Err(invalid(trimmed, "unknown alias"));
            }
            _ => trimmed,
        };

        let parts: Vec<&str> = expanded.split_whitespace().collect();
        if parts.len() != 5 {
            return Err(invalid(
                trimmed,
                &format!("expected 5 fields, found {}", parts.len()),
            ));
        }

        let mut day_of_week = parse_field(trimmed, parts[4], 0, 7)?;
        // 7 is an alias for Sunday.
        if day_of_week.contains(7) {
            day_of_week.mask = (day_of_week.mask & !(1u64 << 7)) | 1;
        }

        Ok(Self {
            minute: parse_field(trimmed, parts[0], 0, 59)?,
            hour: parse_field(trimmed, parts[1], 0, 23)?,
            day_of_month: parse_field(trimmed, parts[2], 1, 31)?,
            month: parse_field(trimmed, parts[3], 1, 12)?,
            day_of_week,
            expression: trimmed.to_string(),
        })
    }

    /// The expression as it was written.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// First matching minute strictly after `now`.
    pub fn next_after(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, SchedulerError> {
        let start = now
            .duration_trunc(Duration::minutes(1))
            .map_err(|_| SchedulerError::NoUpcomingRun {
                expression: self.expression.clone(),
            })?;
        (1..=MAX_LOOKAHEAD_MINUTES)
            .map(|offset| start + Duration::minutes(offset))
            .find(|candidate| self.matches(*candidate))
            .ok_or_else(|| SchedulerError::NoUpcomingRun {
                expression: self.expression.clone(),
            })
    }

    /// Whether `at` (to the minute) is a tick of this schedule.
    pub fn matches(&self, at: DateTime<Utc>) -> bool {
        if !self.minute.contains(at.minute())
            || !self.hour.contains(at.hour())
            || !self.month.contains(at.month())
        {
            return false;
        }

        let dom = self.day_of_month.contains(at.day());
        let dow = self
            .day_of_week
            .contains(at.weekday().num_days_from_sunday());
        if self.day_of_month.restricted && self.day_of_week.restricted {
            dom || dow
        } else {
            dom && dow
        }
    }
}

fn invalid(expression: &str, reason: &str) -> SchedulerError {
    SchedulerError::InvalidSchedule {
        expression: expression.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_field(expression: &str, raw: &str, min: u32, max: u32) -> Result<Field, SchedulerError> {
    let mut mask = 0u64;
    for item in raw.split(',') {
        let (base, step) = match item.split_once('/') {
            Some((base, step)) => {
                let step = parse_number(expression, step)?;
                if step == 0 {
                    return Err(invalid(expression, &format!("zero step in '{item}'")));
                }
                (base, Some(step))
            }
            None => (item, None),
        };

        let (lo, hi) = if base == "*" {
            (min, max)
        } else if let Some((a, b)) = base.split_once('-') {
            (parse_number(expression, a)?, parse_number(expression, b)?)
        } else {
            let value = parse_number(expression, base)?;
            // `5/15` means every 15 starting at 5.
            (value, if step.is_some() { max } else { value })
        };

        if lo < min || hi > max {
            return Err(invalid(
                expression,
                &format!("'{item}' out of range ({min}-{max})"),
            ));
        }
        if lo > hi {
            return Err(invalid(expression, &format!("descending range '{item}'")));
        }

        let step = step.unwrap_or(1);
        let mut value = lo;
        while value <= hi {
            mask |= 1u64 << value;
            value += step;
        }
    }

    Ok(Field {
        mask,
        restricted: !raw.starts_with('*'),
    })
}

fn parse_number(expression: &str, raw: &str) -> Result<u32, SchedulerError> {
    raw.parse()
        .map_err(|_| invalid(expression, &format!("'{raw}' is not a number")))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn every_fifteen_minutes() {
        let cron = CronSchedule::parse("*/15 * * * *").unwrap();
        assert_eq!(
            cron.next_after(at(2026, 3, 2, 10, 7)).unwrap(),
            at(2026, 3, 2, 10, 15)
        );
    }

    #[test]
    fn next_is_strictly_after_a_tick() {
        let cron = CronSchedule::parse("*/15 * * * *").unwrap();
        let tick = at(2026, 3, 2, 10, 15);
        assert_eq!(cron.next_after(tick).unwrap(), at(2026, 3, 2, 10, 30));
        let mid_minute = tick + Duration::seconds(30);
        assert_eq!(cron.next_after(mid_minute).unwrap(), at(2026, 3, 2, 10, 30));
    }

    #[test]
    fn hourly_default_and_aliases() {
        let cron = CronSchedule::parse("0 * * * *").unwrap();
        assert_eq!(
            cron.next_after(at(2026, 3, 2, 23, 59)).unwrap(),
            at(2026, 3, 3, 0, 0)
        );
        for alias in ["@hourly", "hourly", "HOURLY"] {
            let parsed = CronSchedule::parse(alias).unwrap();
            assert!(parsed.matches(at(2026, 3, 2, 5, 0)));
            assert_eq!(parsed.expression(), alias);
        }
        let weekly = CronSchedule::parse("@weekly").unwrap();
        // 2026-03-08 is a Sunday.
        assert_eq!(
            weekly.next_after(at(2026, 3, 2, 12, 0)).unwrap(),
            at(2026, 3, 8, 0, 0)
        );
    }

    #[test]
    fn ranges_lists_and_weekdays() {
        let cron = CronSchedule::parse("30 9,17 * * 1-5").unwrap();
        // Friday 2026-03-06 17:30 -> Monday 2026-03-09 09:30.
        assert_eq!(
            cron.next_after(at(2026, 3, 6, 17, 30)).unwrap(),
            at(2026, 3, 9, 9, 30)
        );
        let sunday_as_seven = CronSchedule::parse("0 0 * * 7").unwrap();
        assert!(sunday_as_seven.matches(at(2026, 3, 8, 0, 0)));
    }

    #[test]
    fn restricted_day_fields_are_ored() {
        // The 13th or any Friday.
        let cron = CronSchedule::parse("0 0 13 * 5").unwrap();
        assert!(cron.matches(at(2026, 3, 6, 0, 0)));
        assert!(cron.matches(at(2026, 3, 13, 0, 0)));
        assert!(!cron.matches(at(2026, 3, 12, 0, 0)));
    }

    #[test]
    fn stepped_range_and_offset_step() {
        let cron = CronSchedule::parse("10-20/5 * * * *").unwrap();
        for m in [10, 15, 20] {
            assert!(cron.matches(at(2026, 1, 1, 0, m)));
        }
        assert!(!cron.matches(at(2026, 1, 1, 0, 25)));

        let offset = CronSchedule::parse("5/20 * * * *").unwrap();
        for m in [5, 25, 45] {
            assert!(offset.matches(at(2026, 1, 1, 0, m)));
        }
    }

    #[test]
    fn invalid_expressions_are_rejected() {
        for raw in [
            "",
            "* * * *",
            "61 * * * *",
            "* 24 * * *",
            "* * 0 * *",
            "*/0 * * * *",
            "5-2 * * * *",
            "a * * * *",
            "@yearly",
        ] {
            assert!(
                matches!(
                    CronSchedule::parse(raw),
                    Err(SchedulerError::InvalidSchedule { .. })
                ),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn impossible_date_has_no_upcoming_run() {
        let cron = CronSchedule::parse("0 0 30 2 *").unwrap();
        assert!(matches!(
            cron.next_after(at(2026, 1, 1, 0, 0)),
            Err(SchedulerError::NoUpcomingRun { .. })
        ));
    }
}
