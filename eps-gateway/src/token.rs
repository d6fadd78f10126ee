use std::sync::RwLock;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

/// Bearer token together with the instant it stops being usable.
#[derive(Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

impl std::fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedToken")
            .field("token", &"***redacted***")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Single-slot token cache owned by one client.
///
/// The slot only changes on [`TokenCache::store`] (after a refresh fully succeeded) and
/// [`TokenCache::clear`]. The lock is never held across an await point.
#[derive(Debug, Default)]
pub struct TokenCache {
    slot: RwLock<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached token if it is still valid at `now`. Expired tokens are treated as absent.
    pub fn get_valid(&self, now: DateTime<Utc>) -> Option<String> {
        let guard = self.slot.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard
            .as_ref()
            .filter(|cached| cached.is_valid_at(now))
            .map(|cached| cached.token.clone())
    }

    /// Replace the slot wholesale. Concurrent refreshes race; the last one wins.
    pub fn store(&self, token: CachedToken) {
        let mut guard = self.slot.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(token);
    }

    pub fn clear(&self) {
        let mut guard = self.slot.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = None;
    }

    pub fn is_empty(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_none()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.slot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .map(|cached| cached.expires_at)
    }
}

/// Parse the gateway's `expireDate`. RFC 3339 first, then offset-less timestamps read in
/// the host's local time zone.
pub fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    parse_expiry_in(raw, &Local)
}

pub(crate) fn parse_expiry_in<Tz: TimeZone>(raw: &str, zone: &Tz) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .and_then(|naive| zone.from_local_datetime(&naive).earliest())
        .map(|local| local.with_timezone(&Utc))
}
