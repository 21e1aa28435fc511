use chrono::{Datelike, NaiveDate};

/// Inclusive bounds offered by the year/month/day picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBounds {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

impl DateBounds {
    /// Uses the field bounds, falling back to the last hundred years.
    pub fn new(min_date: Option<NaiveDate>, max_date: Option<NaiveDate>, today: NaiveDate) -> Self {
        let latest = max_date.unwrap_or(today);
        let earliest = min_date
            .or_else(|| NaiveDate::from_ymd_opt(today.year() - 100, 1, 1))
            .unwrap_or(latest)
            .min(latest);

        Self { earliest, latest }
    }

    /// Years newest first, so the common case needs the least scrolling.
    pub fn years(&self) -> Vec<i32> {
        (self.earliest.year()..=self.latest.year()).rev().collect()
    }

    pub fn months(&self, year: i32) -> Vec<u32> {
        let first = if year == self.earliest.year() {
            self.earliest.month()
        } else {
            1
        };
        let last = if year == self.latest.year() {
            self.latest.month()
        } else {
            12
        };
        (first..=last).collect()
    }

    pub fn days(&self, year: i32, month: u32) -> Vec<u32> {
        let first = if (year, month) == (self.earliest.year(), self.earliest.month()) {
            self.earliest.day()
        } else {
            1
        };
        let last = if (year, month) == (self.latest.year(), self.latest.month()) {
            self.latest.day()
        } else {
            days_in_month(year, month)
        };
        (first..=last).collect()
    }

    /// Clamps a previously chosen date into the bounds.
    pub fn clamp(&self, date: NaiveDate) -> NaiveDate {
        date.clamp(self.earliest, self.latest)
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    (28..=31)
        .rev()
        .find(|day| NaiveDate::from_ymd_opt(year, month, *day).is_some())
        .unwrap_or(28)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::DateBounds;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap_or_else(|| unreachable!())
    }

    fn applicant_bounds() -> DateBounds {
        DateBounds::new(
            Some(date(1986, 10, 16)),
            Some(date(2008, 10, 16)),
            date(2026, 10, 16),
        )
    }

    #[test]
    fn years_run_newest_first_within_bounds() {
        let years = applicant_bounds().years();
        assert_eq!(years.first(), Some(&2008));
        assert_eq!(years.last(), Some(&1986));
        assert_eq!(years.len(), 23);
    }

    #[test]
    fn edge_years_restrict_months_and_days() {
        let bounds = applicant_bounds();
        assert_eq!(bounds.months(1986), (10..=12).collect::<Vec<_>>());
        assert_eq!(bounds.months(2008), (1..=10).collect::<Vec<_>>());
        assert_eq!(bounds.months(1999).len(), 12);
        assert_eq!(bounds.days(1986, 10), (16..=31).collect::<Vec<_>>());
        assert_eq!(bounds.days(2008, 10), (1..=16).collect::<Vec<_>>());
    }

    #[test]
    fn month_lengths_follow_the_calendar() {
        let bounds = applicant_bounds();
        assert_eq!(bounds.days(2000, 2).len(), 29);
        assert_eq!(bounds.days(2001, 2).len(), 28);
        assert_eq!(bounds.days(2001, 4).len(), 30);
    }

    #[test]
    fn missing_bounds_cover_the_last_century() {
        let bounds = DateBounds::new(None, None, date(2026, 10, 16));
        assert_eq!(bounds.earliest, date(1926, 1, 1));
        assert_eq!(bounds.latest, date(2026, 10, 16));
        assert_eq!(bounds.clamp(date(2030, 1, 1)), date(2026, 10, 16));
    }
}
