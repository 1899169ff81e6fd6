/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar-day key used for streaks and daily drills (UTC day).
pub type CalendarDay = chrono::NaiveDate;
