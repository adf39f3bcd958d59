//! A client for the DNSDB passive DNS lookup API.
//!
//! Lookups are made through [`clients::Client::rdata`], by owner name, IP
//! address, IP network, or raw rdata bytes. Each lookup returns the decoded
//! [`RData`] records, in the order the server sent them, along with the HTTP
//! response metadata.
//!
//! The record types and the [`Records`] decoder are usable without the
//! `clients` feature.

mod display;
mod errors;
mod io;
pub mod types;

#[cfg(feature = "clients")]
pub mod clients;

pub use crate::errors::Error;
pub use crate::io::{decode, Records};

// Pull up the various types that should be on the front page of the docs.
#[doc(inline)]
pub use crate::types::LookupOptions;
#[doc(inline)]
pub use crate::types::RData;
#[doc(inline)]
pub use crate::types::Timestamp;
