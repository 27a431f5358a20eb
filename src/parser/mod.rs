pub mod event_date;
pub mod markdown;
