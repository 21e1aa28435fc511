use chrono::NaiveDate;

/// Source of the current calendar date.
pub trait Clock: Send + Sync {
    /// Returns today's date in UTC.
    fn today(&self) -> NaiveDate;
}
