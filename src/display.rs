//! Implements the Display trait for the various types, so they output
//! in a `dig`-ish style.

use crate::RData;
use crate::Timestamp;
use std::fmt;

/// Displays the record as a single zone-file style line, followed by the
/// observation details as a comment.
///
/// `fsi.io.  MX  10 hq.fsi.io.  ; count: 45644 first: 2013-07-01 19:14:33 UTC last: 2016-07-12 13:39:00 UTC`
impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{name:<24} {type:6} {rdata}",
            name = self.rrname.as_deref().unwrap_or("-"),
            r#type = self.rrtype.as_deref().unwrap_or("-"),
            rdata = self.rdata.as_deref().unwrap_or("-"),
        )?;

        if self.count.is_none() && self.time_first.is_none() && self.time_last.is_none() {
            return Ok(());
        }

        write!(f, "  ;")?;
        if let Some(count) = self.count {
            write!(f, " count: {}", count)?;
        }
        if let Some(t) = &self.time_first {
            write!(f, " first: {}", t)?;
        }
        if let Some(t) = &self.time_last {
            write!(f, " last: {}", t)?;
        }

        Ok(())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.to_datetime() {
            Some(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S UTC")),
            None => write!(f, "{}", self.as_secs()),
        }
    }
}
