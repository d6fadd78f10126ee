use chrono::{DateTime, Local, TimeZone};

/// Timestamp-based merchant transaction id, `YYYYMMDDHHmmssSSS` in local time (17 digits).
///
/// Two ids generated within the same millisecond collide; callers minting ids in a tight
/// loop must add their own suffix or spacing.
pub fn generate_transaction_id() -> String {
    transaction_id_at(&Local::now())
}

pub(crate) fn transaction_id_at<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%Y%m%d%H%M%S%3f").to_string()
}
