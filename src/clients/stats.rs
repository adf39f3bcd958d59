use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;
use std::time::Instant;
use std::time::SystemTime;

/// Timing and size details of a single request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stats {
    /// When the request was sent.
    pub start: SystemTime,

    /// Time taken to receive the full response body.
    pub duration: Duration,

    /// The server's address, if the connector reported one.
    pub server: Option<SocketAddr>,

    /// Size of the response body in bytes.
    pub response_size: usize,
}

/// Builder class to aid in the construction of Stats objects.
pub(crate) struct StatsBuilder {
    start: SystemTime,
    timer: Instant,
}

impl StatsBuilder {
    /// Call just before the request is sent.
    pub fn start() -> StatsBuilder {
        StatsBuilder {
            start: SystemTime::now(),
            timer: Instant::now(),
        }
    }

    /// Call just after the response body is read. Consumes the StatsBuilder and returns a Stats.
    pub fn end(self, server: Option<SocketAddr>, response_size: usize) -> Stats {
        Stats {
            start: self.start,
            duration: self.timer.elapsed(),
            server,
            response_size,
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let start: chrono::DateTime<chrono::Local> = self.start.into();

        writeln!(f, ";; Query time: {} msec", self.duration.as_millis())?;
        match self.server {
            Some(server) => writeln!(f, ";; SERVER: {}", server)?,
            None => writeln!(f, ";; SERVER: unknown")?,
        }
        // ;; WHEN: Sat Jun 12 12:14:21 PDT 2021
        writeln!(f, ";; WHEN: {}", start.format("%a %b %-d %H:%M:%S %z %-Y"))?;
        writeln!(f, ";; MSG SIZE rcvd: {}", self.response_size)
    }
}
