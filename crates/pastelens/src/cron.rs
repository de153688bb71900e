//! Cron expression parsing and next-run computation.
//!
//! Three layouts are understood:
//!
//! - 5 fields: `minute hour day-of-month month day-of-week`, Sunday is `0` or `7`.
//! - 6 fields: `second` followed by the five above, Quartz weekday numbering (`1` = Sunday).
//! - 7 fields: the six above followed by `year` (1970-2099).
//!
//! Fields accept `*`, `?` (day fields only), values, `a-b` ranges, `/step`
//! and comma lists, plus `JAN`-`DEC` and `SUN`-`SAT` names. The Quartz
//! extensions `L`, `W` and `#` are recognised but cannot be scheduled.
//! All times are UTC.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, Timelike, Utc};
use serde::Serialize;
use thiserror::Error;

/// Upper bound on calendar days examined when looking for the next run.
const MAX_DAYS_SCANNED: u32 = 366 * 30;

const MONTH_NAMES: &[&str] = &["JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC"];
const WEEKDAY_NAMES: &[&str] = &["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// Errors raised while parsing or scheduling a cron expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CronError {
    /// Expression does not have 5, 6 or 7 fields
    #[error("expected 5, 6 or 7 fields, found {0}")]
    FieldCount(usize),

    /// A field is outside its range or syntactically wrong
    #[error("invalid {field} field '{value}'")]
    InvalidField {
        field: &'static str,
        value: String,
    },

    /// A Quartz extension that has no schedule here
    #[error("'{feature}' in the {field} field is not supported for scheduling")]
    Unsupported {
        field:   &'static str,
        feature: char,
    },
}

/// Which field layout an expression uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CronLayout {
    Standard,
    WithSeconds,
    WithYear,
}

struct FieldSpec {
    name:       &'static str,
    min:        u32,
    max:        u32,
    names:      &'static [&'static str],
    name_base:  u32,
    allows_any: bool,
}

const SECOND: FieldSpec = FieldSpec {
    name:       "second",
    min:        0,
    max:        59,
    names:      &[],
    name_base:  0,
    allows_any: false,
};
const MINUTE: FieldSpec = FieldSpec {
    name: "minute",
    ..SECOND
};
const HOUR: FieldSpec = FieldSpec {
    name: "hour",
    max: 23,
    ..SECOND
};
const DAY_OF_MONTH: FieldSpec = FieldSpec {
    name:       "day-of-month",
    min:        1,
    max:        31,
    names:      &[],
    name_base:  0,
    allows_any: true,
};
const MONTH: FieldSpec = FieldSpec {
    name:       "month",
    min:        1,
    max:        12,
    names:      MONTH_NAMES,
    name_base:  1,
    allows_any: false,
};
const DAY_OF_WEEK: FieldSpec = FieldSpec {
    name:       "day-of-week",
    min:        0,
    max:        7,
    names:      WEEKDAY_NAMES,
    name_base:  0,
    allows_any: true,
};
const QUARTZ_DAY_OF_WEEK: FieldSpec = FieldSpec {
    min: 1,
    max: 7,
    name_base: 1,
    ..DAY_OF_WEEK
};
const YEAR: FieldSpec = FieldSpec {
    name:       "year",
    min:        1970,
    max:        2099,
    names:      &[],
    name_base:  0,
    allows_any: false,
};

#[derive(Clone, Debug, PartialEq, Eq)]
struct Field {
    values: BTreeSet<u32>,
    /// `*` or `?`: the field does not restrict anything
    any:    bool,
}

impl Field {
    fn contains(&self, value: u32) -> bool { self.values.contains(&value) }

    fn map(self, f: impl Fn(u32) -> u32) -> Self {
        Self {
            values: self.values.into_iter().map(f).collect(),
            any:    self.any,
        }
    }
}

fn parse_field(raw: &str, spec: &FieldSpec) -> Result<Field, CronError> {
    let invalid = || {
        CronError::InvalidField {
            field: spec.name,
            value: raw.to_owned(),
        }
    };

    if raw == "*" || (raw == "?" && spec.allows_any) {
        return Ok(Field {
            values: (spec.min ..= spec.max).collect(),
            any:    true,
        });
    }

    let mut text = raw.to_ascii_uppercase();
    for (index, name) in spec.names.iter().enumerate() {
        let value = spec.name_base + u32::try_from(index).map_err(|_| invalid())?;
        text = text.replace(name, &value.to_string());
    }
    if let Some(feature) = text.chars().find(|c| matches!(c, 'L' | 'W' | '#')) {
        if is_quartz_extension(&text) {
            return Err(CronError::Unsupported {
                field: spec.name,
                feature,
            });
        }
        return Err(invalid());
    }

    let number = |s: &str| -> Result<u32, CronError> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let value: u32 = s.parse().map_err(|_| invalid())?;
        if (spec.min ..= spec.max).contains(&value) {
            Ok(value)
        }
        else {
            Err(invalid())
        }
    };

    let mut values = BTreeSet::new();
    for item in text.split(',') {
        let (base, step) = match item.split_once('/') {
            Some((base, step)) => (base, Some(step)),
            None => (item, None),
        };
        let step = match step {
            Some(step) => {
                let step: u32 = step.parse().map_err(|_| invalid())?;
                if step == 0 {
                    return Err(invalid());
                }
                step
            },
            None => 1,
        };
        let (start, end) = if base == "*" {
            (spec.min, spec.max)
        }
        else if let Some((from, to)) = base.split_once('-') {
            let (from, to) = (number(from)?, number(to)?);
            if from > to {
                return Err(invalid());
            }
            (from, to)
        }
        else {
            let value = number(base)?;
            if step > 1 { (value, spec.max) } else { (value, value) }
        };
        values.extend((start ..= end).step_by(usize::try_from(step).map_err(|_| invalid())?));
    }

    Ok(Field {
        values,
        any: false,
    })
}

/// `L`, `L-3`, `LW`, `15W`, `5L` or `6#3`.
fn is_quartz_extension(token: &str) -> bool {
    let day = |s: &str| (1 ..= 2).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit());
    if matches!(token, "L" | "LW") {
        return true;
    }
    if let Some(offset) = token.strip_prefix("L-") {
        return day(offset);
    }
    if let Some((weekday, nth)) = token.split_once('#') {
        return day(weekday) && matches!(nth, "1" | "2" | "3" | "4" | "5");
    }
    token
        .strip_suffix('L')
        .or_else(|| token.strip_suffix('W'))
        .is_some_and(day)
}

/// A parsed, schedulable cron expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CronSchedule {
    expression:    String,
    layout:        CronLayout,
    seconds:       Field,
    minutes:       Field,
    hours:         Field,
    days_of_month: Field,
    months:        Field,
    /// Normalised to 0 = Sunday ..= 6 = Saturday
    days_of_week:  Field,
    years:         Option<Field>,
}

impl CronSchedule {
    /// Parses an expression.
    ///
    /// Every field is validated before an unsupported extension is reported,
    /// so [`CronError::Unsupported`] means "well-formed but not schedulable".
    pub fn parse(expression: &str) -> Result<Self, CronError> {
        let fields: Vec<&str> = expression.split_whitespace().collect();
        let layout = match fields.len() {
            5 => CronLayout::Standard,
            6 => CronLayout::WithSeconds,
            7 => CronLayout::WithYear,
            n => return Err(CronError::FieldCount(n)),
        };
        let (seconds_raw, rest) = match layout {
            CronLayout::Standard => ("0", &fields[..]),
            CronLayout::WithSeconds | CronLayout::WithYear => (fields[0], &fields[1 ..]),
        };
        let weekday_spec = if layout == CronLayout::Standard {
            &DAY_OF_WEEK
        }
        else {
            &QUARTZ_DAY_OF_WEEK
        };

        let mut unsupported = None;
        let mut check = |result: Result<Field, CronError>| -> Result<Field, CronError> {
            match result {
                Err(e @ CronError::Unsupported { .. }) => {
                    unsupported.get_or_insert(e);
                    Ok(Field {
                        values: BTreeSet::new(),
                        any:    false,
                    })
                },
                other => other,
            }
        };

        let seconds = check(parse_field(seconds_raw, &SECOND))?;
        let minutes = check(parse_field(rest[0], &MINUTE))?;
        let hours = check(parse_field(rest[1], &HOUR))?;
        let days_of_month = check(parse_field(rest[2], &DAY_OF_MONTH))?;
        let months = check(parse_field(rest[3], &MONTH))?;
        let days_of_week = check(parse_field(rest[4], weekday_spec))?;
        let years = rest
            .get(5)
            .map(|raw| check(parse_field(raw, &YEAR)))
            .transpose()?;

        if let Some(e) = unsupported {
            return Err(e);
        }

        let days_of_week = match layout {
            CronLayout::Standard => days_of_week.map(|day| day % 7),
            CronLayout::WithSeconds | CronLayout::WithYear => days_of_week.map(|day| day - 1),
        };

        Ok(Self {
            expression: fields.join(" "),
            layout,
            seconds,
            minutes,
            hours,
            days_of_month,
            months,
            days_of_week,
            years,
        })
    }

    /// The expression with normalised whitespace.
    pub fn expression(&self) -> &str { &self.expression }

    pub const fn layout(&self) -> CronLayout { self.layout }

    /// The next `count` run instants strictly after `after`, in increasing order.
    ///
    /// Fewer are returned when the schedule runs out (a past year) or never
    /// fires (`0 0 30 2 *`).
    pub fn next_runs(&self, after: DateTime<Utc>, count: usize) -> Vec<DateTime<Utc>> {
        let mut runs = Vec::with_capacity(count);
        let mut cursor = after;
        while runs.len() < count {
            match self.next_after(cursor) {
                Some(next) => {
                    runs.push(next);
                    cursor = next;
                },
                None => break,
            }
        }
        runs
    }

    /// The first run strictly after `after`.
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let start = after.with_nanosecond(0)? + TimeDelta::seconds(1);
        let start_date = start.date_naive();
        let mut date = start_date;

        for _ in 0 .. MAX_DAYS_SCANNED {
            if let Some(years) = &self.years {
                let year = u32::try_from(date.year()).ok()?;
                if !years.contains(year) {
                    years.values.range(year ..).next()?;
                    date = NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)?;
                    continue;
                }
            }
            if !self.months.contains(date.month()) {
                date = first_of_next_month(date)?;
                continue;
            }
            if self.matches_day(date) {
                let from = if date == start_date { start.time() } else { NaiveTime::MIN };
                if let Some(time) = self.first_time_from(from) {
                    return Some(date.and_time(time).and_utc());
                }
            }
            date = date.succ_opt()?;
        }
        None
    }

    /// Day-of-month and day-of-week: when both are restricted either may match.
    fn matches_day(&self, date: NaiveDate) -> bool {
        let dom = self.days_of_month.contains(date.day());
        let dow = self.days_of_week.contains(date.weekday().num_days_from_sunday());
        match (self.days_of_month.any, self.days_of_week.any) {
            (true, true) => true,
            (true, false) => dow,
            (false, true) => dom,
            (false, false) => dom || dow,
        }
    }

    fn first_time_from(&self, from: NaiveTime) -> Option<NaiveTime> {
        for &hour in self.hours.values.range(from.hour() ..) {
            let minute_floor = if hour == from.hour() { from.minute() } else { 0 };
            for &minute in self.minutes.values.range(minute_floor ..) {
                let second_floor = if hour == from.hour() && minute == from.minute() {
                    from.second()
                }
                else {
                    0
                };
                if let Some(&second) = self.seconds.values.range(second_floor ..).next() {
                    return NaiveTime::from_hms_opt(hour, minute, second);
                }
            }
        }
        None
    }
}

fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    }
    else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
}

/// True when `text` has 5-7 fields over the cron token alphabet and parses,
/// or parses up to an unsupported `L`/`W`/`#` extension.
pub fn looks_like_cron(text: &str) -> bool {
    let field_count = text.split_whitespace().count();
    if !(5 ..= 7).contains(&field_count) {
        return false;
    }
    let alphabet_ok = text.split_whitespace().all(|field| {
        field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '*' | '?' | '/' | ',' | '-' | '#'))
    });
    alphabet_ok && matches!(CronSchedule::parse(text), Ok(_) | Err(CronError::Unsupported { .. }))
}
