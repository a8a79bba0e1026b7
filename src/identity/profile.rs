use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// The user record a login flow persists next to the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub role: String,
    /// Kept as the backend sent it; see `created_timestamp`.
    pub created_at: String,
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

impl UserProfile {
    /// `created_at` as a UTC instant. Values without an offset are taken as
    /// UTC; text that is not a recognised timestamp yields `None`.
    pub fn created_timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
            return Some(ts.with_timezone(&Utc));
        }
        for fmt in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
                return Some(naive.and_utc());
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}

/// Outcome of reading the stored profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileRead {
    Present(UserProfile),
    Absent,
    Malformed(String),
}

impl ProfileRead {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(text) = raw else { return ProfileRead::Absent; };
        match serde_json::from_str::<UserProfile>(text) {
            Ok(profile) => ProfileRead::Present(profile),
            Err(e) => ProfileRead::Malformed(e.to_string()),
        }
    }

    /// Collapse to the caller-facing view: anything but a parsed profile is absent.
    pub fn into_option(self) -> Option<UserProfile> {
        match self {
            ProfileRead::Present(p) => Some(p),
            ProfileRead::Absent | ProfileRead::Malformed(_) => None,
        }
    }
}
