//! Calendar helpers shared by ephemeris and pork-chop sweeps.

use chrono::{Duration, NaiveDate};

/// Iterator over dates from `start` up to and including `end`, spaced `step_days` apart.
#[derive(Debug, Clone)]
pub struct DateRange {
    next: NaiveDate,
    end: NaiveDate,
    step: Duration,
}

pub fn date_range(start: NaiveDate, end: NaiveDate, step_days: i64) -> DateRange {
    DateRange {
        next: start,
        end,
        step: Duration::days(step_days.max(1)),
    }
}

/// Number of samples produced by [`date_range`]: ⌈(days + 1) / step⌉.
pub fn date_range_len(start: NaiveDate, end: NaiveDate, step_days: i64) -> usize {
    let days = (end - start).num_days();
    if days < 0 {
        return 0;
    }
    let step = step_days.max(1);
    ((days + 1) + step - 1).div_euclid(step) as usize
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.end {
            return None;
        }
        let current = self.next;
        self.next = current.checked_add_signed(self.step)?;
        Some(current)
    }
}
