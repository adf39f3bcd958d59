use crate::bail;
use crate::clients::Client;
use crate::clients::Response;
use crate::io::decode;
use crate::Error;
use crate::LookupOptions;
use crate::RData;
use hyper::client::connect::Connect;
use ipnet::IpNet;
use log::debug;
use std::net::IpAddr;

/// The rdata lookup endpoints, returned by [`Client::rdata`].
///
/// Every lookup sends a single GET and decodes the newline-delimited JSON
/// response. Records are returned in the order the server sent them. If any
/// line fails to decode, the whole lookup fails.
pub struct RDataService<'a, C> {
    client: &'a Client<C>,
}

impl<'a, C> RDataService<'a, C>
where
    C: Connect + Clone + Send + Sync + 'static,
{
    pub(crate) fn new(client: &'a Client<C>) -> Self {
        RDataService { client }
    }

    /// Looks up records by owner name, via `/lookup/rrset/name/<name>[/<rrtype>]`.
    pub async fn lookup_name(
        &self,
        name: &str,
        options: &LookupOptions,
    ) -> Result<(Vec<RData>, Response), Error> {
        if name.is_empty() {
            bail!("name must not be empty");
        }

        self.lookup(&["lookup", "rrset", "name", name], options)
            .await
    }

    /// Looks up records whose rdata is `ip`, via `/lookup/rdata/ip/<ip>[/<rrtype>]`.
    pub async fn lookup_ip(
        &self,
        ip: IpAddr,
        options: &LookupOptions,
    ) -> Result<(Vec<RData>, Response), Error> {
        if ip.is_unspecified() {
            bail!("ip must not be the unspecified address {}", ip);
        }

        let ip = ip.to_string();
        self.lookup(&["lookup", "rdata", "ip", &ip], options).await
    }

    /// Looks up records whose rdata falls within `network`.
    ///
    /// Host bits are cleared, so `104.244.13.107/29` is sent as
    /// `104.244.13.104/29`. The network is a single path segment, so its `/`
    /// is sent percent-encoded.
    pub async fn lookup_ip_net(
        &self,
        network: IpNet,
        options: &LookupOptions,
    ) -> Result<(Vec<RData>, Response), Error> {
        let network = network.trunc();
        if network.addr().is_unspecified() {
            bail!("network must not be the unspecified network {}", network);
        }

        let network = network.to_string();
        self.lookup(&["lookup", "rdata", "ip", &network], options)
            .await
    }

    /// Looks up records whose rdata is exactly `raw`, for example the packed
    /// bytes of an address. The bytes are sent hex encoded, via
    /// `/lookup/rdata/raw/<hex>[/<rrtype>]`.
    pub async fn lookup_raw(
        &self,
        raw: &[u8],
        options: &LookupOptions,
    ) -> Result<(Vec<RData>, Response), Error> {
        let raw = hex::encode(raw);
        self.lookup(&["lookup", "rdata", "raw", &raw], options).await
    }

    async fn lookup(
        &self,
        segments: &[&str],
        options: &LookupOptions,
    ) -> Result<(Vec<RData>, Response), Error> {
        let mut segments = segments.to_vec();
        if let Some(rrtype) = options.rrtype() {
            segments.push(rrtype);
        }

        let url = self.client.url(&segments, &options.query_pairs())?;
        let (body, response) = self.client.get(url).await?;

        let records = decode(body)?;
        debug!("decoded {} records", records.len());

        Ok((records, response))
    }
}
