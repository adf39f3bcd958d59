//! HTTP client for the DNSDB lookup API.

use crate::clients::mime::content_type_is_one_of;
use crate::clients::stats::StatsBuilder;
use crate::Error;
use bytes::Bytes;
use http::header::*;
use http::{Method, Request, StatusCode};
use hyper::client::connect::{Connect, HttpInfo};
use hyper::{Body, Client as HyperClient};
use hyper_alpn::AlpnConnector;
use log::{debug, warn};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::time::Duration;
use url::{form_urlencoded, Position};

pub use self::config::ClientConfig;
pub use self::config::{DNSDB, ENV_API_KEY, ENV_SERVER};
pub use self::rdata::RDataService;
pub use self::stats::Stats;
pub use self::to_url::ToUrl;

mod config;
mod mime;
mod rdata;
mod stats;
mod to_url;

// For use in the Accept header.
const CONTENT_TYPE_APPLICATION_JSON: &str = "application/json";

// Some servers label newline-delimited JSON with one of these instead.
const ACCEPTED_CONTENT_TYPES: [&str; 3] = [
    CONTENT_TYPE_APPLICATION_JSON,
    "application/x-ndjson",
    "text/plain",
];

const HEADER_API_KEY: &str = "x-api-key";

// The characters url escapes in a path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');

/// Appends one percent-encoded path segment. A segment of "." or ".." has
/// each dot encoded, so it is sent rather than resolved away.
fn push_segment(url: &mut String, segment: &str) {
    match segment {
        "." | ".." => {
            for _ in 0..segment.len() {
                url.push_str("%2E");
            }
        }
        _ => url.extend(utf8_percent_encode(segment, PATH_SEGMENT)),
    }
}

/// Metadata of the HTTP response a lookup was decoded from.
#[derive(Clone, Debug)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub stats: Stats,
}

/// A DNSDB API client.
///
/// The client is immutable once built, so it can be shared between tasks.
///
/// # Example
///
/// ```rust,no_run
/// use dnsdb::clients::{Client, ClientConfig};
/// use dnsdb::LookupOptions;
///
/// #[tokio::main]
/// async fn main() -> Result<(), dnsdb::Error> {
///     let config = ClientConfig::default().with_api_key("my-api-key");
///     let client = Client::new(config);
///
///     let options = LookupOptions::default().with_rrtype("MX");
///     let (records, _response) = client.rdata().lookup_name("hq.fsi.io", &options).await?;
///
///     for record in records {
///         println!("{}", record);
///     }
///     Ok(())
/// }
/// ```
pub struct Client<C = AlpnConnector> {
    config: ClientConfig,
    http: HyperClient<C, Body>,
}

impl Default for Client<AlpnConnector> {
    fn default() -> Self {
        Client::new(ClientConfig::default())
    }
}

impl Client<AlpnConnector> {
    /// Creates a new Client that talks to the server over TLS, upgrading
    /// to HTTP/2 with ALPN.
    ///
    /// Be aware that the server's domain name will be resolved by the
    /// system's standard DNS library.
    pub fn new(config: ClientConfig) -> Self {
        let http = HyperClient::builder()
            .pool_idle_timeout(Duration::from_secs(30))
            .http2_only(true)
            .build::<_, Body>(AlpnConnector::new());

        Client { config, http }
    }
}

impl<C> Client<C>
where
    C: Connect + Clone + Send + Sync + 'static,
{
    /// Creates a new Client using the given connector, for example a plain
    /// [`hyper::client::HttpConnector`].
    pub fn with_connector(config: ClientConfig, connector: C) -> Self {
        let http = HyperClient::builder()
            .pool_idle_timeout(Duration::from_secs(30))
            .build::<_, Body>(connector);

        Client { config, http }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the rdata lookup endpoints.
    pub fn rdata(&self) -> RDataService<'_, C> {
        RDataService::new(self)
    }

    /// Returns the url for the given path segments and query parameters,
    /// relative to the configured base url. Each segment is percent-encoded,
    /// and any query on the base url is kept ahead of `query`.
    pub(crate) fn url(&self, segments: &[&str], query: &[(&str, String)]) -> Result<String, Error> {
        let base = &self.config.base_url;
        if base.cannot_be_a_base() {
            return Err(Error::InvalidArgument(format!(
                "{} can not be used as a base url",
                base
            )));
        }

        let mut url = base[..Position::AfterPath].trim_end_matches('/').to_string();
        for segment in segments {
            url.push('/');
            push_segment(&mut url, segment);
        }

        let mut pairs = form_urlencoded::Serializer::new(String::new());
        pairs.extend_pairs(base.query_pairs());
        pairs.extend_pairs(query);
        let pairs = pairs.finish();

        if !pairs.is_empty() {
            url.push('?');
            url.push_str(&pairs);
        }

        Ok(url)
    }

    /// Sends a GET for `url` and returns the full body of a successful
    /// response. Any non-2xx status is returned as [`Error::Remote`].
    pub(crate) async fn get(&self, url: String) -> Result<(Bytes, Response), Error> {
        // Parsed straight into a http::Uri, which leaves %2E segments alone.
        let uri: hyper::Uri = url.parse()?;

        let mut req = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(ACCEPT, CONTENT_TYPE_APPLICATION_JSON)
            .header(USER_AGENT, self.config.user_agent.as_str());

        if let Some(api_key) = &self.config.api_key {
            req = req.header(HEADER_API_KEY, api_key.as_str());
        }

        let req = req.body(Body::empty())?;

        debug!("GET {}", url);
        let stats = StatsBuilder::start();
        let resp = self.http.request(req).await?;

        // Get connection information (if available)
        let server = resp
            .extensions()
            .get::<HttpInfo>()
            .map(|http_info| http_info.remote_addr());

        let (parts, body) = resp.into_parts();

        // Read the full body
        let body = hyper::body::to_bytes(body).await?;
        let stats = stats.end(server, body.len());

        debug!(
            "GET {} returned {} with {} bytes in {:?}",
            url,
            parts.status,
            body.len(),
            stats.duration
        );

        if !parts.status.is_success() {
            return Err(Error::Remote {
                status: parts.status,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        if let Some(content_type) = parts.headers.get(CONTENT_TYPE) {
            if !content_type_is_one_of(content_type, &ACCEPTED_CONTENT_TYPES) {
                warn!(
                    "received unexpected content-type: {:?} expected one of {:?}",
                    content_type, ACCEPTED_CONTENT_TYPES,
                );
            }
        }

        Ok((
            body,
            Response {
                status: parts.status,
                headers: parts.headers,
                stats,
            },
        ))
    }
}
