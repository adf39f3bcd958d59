use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One passive DNS observation, as returned by the rdata lookup endpoints.
///
/// Every field is optional, as the service may omit any of them. An absent
/// field is `None`, which is distinct from a present zero or empty value.
///
/// # Examples
///
/// ```rust
/// use dnsdb::RData;
///
/// let r: RData = serde_json::from_str(
///     r#"{"count":24,"rrname":"www.farsightsecurity.com.","rrtype":"A","rdata":"104.244.13.104"}"#,
/// ).unwrap();
///
/// assert_eq!(r.count, Some(24));
/// assert_eq!(r.time_first, None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RData {
    /// Number of times this record was observed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,

    /// First time this record was observed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_first: Option<Timestamp>,

    /// Most recent time this record was observed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_last: Option<Timestamp>,

    /// Owner name, fully qualified with a trailing dot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rrname: Option<String>,

    /// Resource record type, e.g. "A" or "MX".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rrtype: Option<String>,

    /// The record data in presentation format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rdata: Option<String>,
}

/// Seconds since the Unix epoch, as used on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn new(secs: i64) -> Timestamp {
        Timestamp(secs)
    }

    pub fn as_secs(&self) -> i64 {
        self.0
    }

    /// Converts to a [`DateTime`], or `None` if the value is out of chrono's range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.0, 0).single()
    }
}

impl From<i64> for Timestamp {
    fn from(secs: i64) -> Self {
        Timestamp(secs)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(t: DateTime<Tz>) -> Self {
        Timestamp(t.timestamp())
    }
}

/// Filters applied to a single lookup.
///
/// The default value applies no filter.
///
/// ```rust
/// use dnsdb::{LookupOptions, Timestamp};
///
/// let options = LookupOptions::default()
///     .with_rrtype("MX")
///     .with_limit(100)
///     .with_time_last_after(Timestamp::new(1468330740));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LookupOptions {
    /// Only return records of this type. Ignored when empty.
    pub rrtype: Option<String>,

    /// Maximum number of records the server should return.
    pub limit: Option<u64>,

    /// Only records first seen before this time.
    pub time_first_before: Option<Timestamp>,

    /// Only records first seen after this time.
    pub time_first_after: Option<Timestamp>,

    /// Only records last seen before this time.
    pub time_last_before: Option<Timestamp>,

    /// Only records last seen after this time.
    pub time_last_after: Option<Timestamp>,
}

impl LookupOptions {
    pub fn with_rrtype<S: Into<String>>(mut self, rrtype: S) -> Self {
        self.rrtype = Some(rrtype.into());
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_time_first_before<T: Into<Timestamp>>(mut self, t: T) -> Self {
        self.time_first_before = Some(t.into());
        self
    }

    pub fn with_time_first_after<T: Into<Timestamp>>(mut self, t: T) -> Self {
        self.time_first_after = Some(t.into());
        self
    }

    pub fn with_time_last_before<T: Into<Timestamp>>(mut self, t: T) -> Self {
        self.time_last_before = Some(t.into());
        self
    }

    pub fn with_time_last_after<T: Into<Timestamp>>(mut self, t: T) -> Self {
        self.time_last_after = Some(t.into());
        self
    }

    /// Returns the rrtype filter, if one is set and non-empty.
    pub fn rrtype(&self) -> Option<&str> {
        match self.rrtype.as_deref() {
            Some("") | None => None,
            Some(t) => Some(t),
        }
    }

    /// Returns the query parameters these options add to a request.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }

        let times = [
            ("time_first_before", self.time_first_before),
            ("time_first_after", self.time_first_after),
            ("time_last_before", self.time_last_before),
            ("time_last_after", self.time_last_after),
        ];
        for (name, t) in times.iter() {
            if let Some(t) = t {
                pairs.push((*name, t.as_secs().to_string()));
            }
        }

        pairs
    }
}
