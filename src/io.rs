//! Decoding of newline-delimited JSON response bodies.

use crate::Error;
use crate::RData;
use bytes::Bytes;
use serde_json::{Map, Value};

/// Lazily decodes a newline-delimited JSON body, one [`RData`] per line.
///
/// Blank lines (including ones that only hold a `\r`) are skipped. The
/// iterator stops after yielding the first error.
///
/// ```rust
/// use dnsdb::Records;
///
/// let body = "{\"rrname\":\"fsi.io.\"}\n\n{\"rrname\":\"farsightsecurity.com.\"}\n";
/// let names: Vec<_> = Records::new(body)
///     .map(|r| r.unwrap().rrname.unwrap())
///     .collect();
///
/// assert_eq!(names, vec!["fsi.io.", "farsightsecurity.com."]);
/// ```
pub struct Records {
    body: Bytes,
    pos: usize,
    failed: bool,
}

impl Records {
    pub fn new<B: Into<Bytes>>(body: B) -> Records {
        Records {
            body: body.into(),
            pos: 0,
            failed: false,
        }
    }

    /// Returns the next non-blank line, without its line ending.
    fn next_line(&mut self) -> Option<Bytes> {
        while self.pos < self.body.len() {
            let start = self.pos;
            let end = match self.body[start..].iter().position(|b| *b == b'\n') {
                Some(i) => {
                    self.pos = start + i + 1;
                    start + i
                }
                None => {
                    self.pos = self.body.len();
                    self.body.len()
                }
            };

            let line = self.body.slice(start..end);
            if !line.iter().all(u8::is_ascii_whitespace) {
                return Some(line);
            }
        }

        None
    }
}

impl Iterator for Records {
    type Item = Result<RData, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let line = self.next_line()?;
        match decode_line(&line) {
            Ok(r) => Some(Ok(r)),
            Err(source) => {
                self.failed = true;
                Some(Err(Error::Decode {
                    line: String::from_utf8_lossy(&line).into_owned(),
                    source,
                }))
            }
        }
    }
}

/// Decodes one line. The line must hold a JSON object; an array is an error
/// even when its items would fill the fields by position.
fn decode_line(line: &[u8]) -> Result<RData, serde_json::Error> {
    let object: Map<String, Value> = serde_json::from_slice(line)?;
    serde_json::from_value(Value::Object(object))
}

/// Decodes a whole body. Any malformed line fails the entire decode, and
/// none of the records before it are returned.
pub fn decode<B: Into<Bytes>>(body: B) -> Result<Vec<RData>, Error> {
    Records::new(body).collect()
}
