use crate::date::DayDate;

#[derive(thiserror::Error, Debug)]
pub enum IntervalError {
    #[error("Invalid date format: {0}. Expected format is YYYY-MM-DD")]
    BadFormat(String),
    #[error("Invalid date: {0}")]
    BadDate(String),
    #[error("Invalid interval: start date {start} must be before end date {end}")]
    EmptyInterval { start: DayDate, end: DayDate },
}
