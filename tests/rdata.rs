#![cfg(feature = "clients")]

use dnsdb::clients::{Client, ClientConfig};
use dnsdb::{Error, LookupOptions, RData, Timestamp};
use hyper::client::HttpConnector;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server, StatusCode};
use pretty_assertions::assert_eq;
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};

const MX_RESPONSE: &str = r#"{"count":45644,"time_first":1372706073,"time_last":1468330740,"rrname":"fsi.io.","rrtype":"MX","rdata":"10 hq.fsi.io."}
{"count":19304,"time_first":1374098929,"time_last":1468333042,"rrname":"farsightsecurity.com.","rrtype":"MX","rdata":"10 hq.fsi.io."}"#;

const A_RESPONSE: &str = r#"{"count":24,"time_first":1433550785,"time_last":1468312116,"rrname":"www.farsighsecurity.com.","rrtype":"A","rdata":"104.244.13.104"}
{"count":9429,"time_first":1427897872,"time_last":1468333042,"rrname":"farsightsecurity.com.","rrtype":"A","rdata":"104.244.13.104"}
"#;

/// A request as seen by the test server.
#[derive(Clone, Debug)]
struct Seen {
    uri: String,
    api_key: Option<String>,
}

/// Starts a server on a random local port that answers every request with
/// `status` and `body`. Returns a client pointed at it, and the requests it
/// received.
fn serve(status: StatusCode, body: &'static str) -> (Client<HttpConnector>, Arc<Mutex<Vec<Seen>>>) {
    serve_with(status, "application/json", body, |config| config)
}

fn serve_with<F>(
    status: StatusCode,
    content_type: &'static str,
    body: &'static str,
    configure: F,
) -> (Client<HttpConnector>, Arc<Mutex<Vec<Seen>>>)
where
    F: FnOnce(ClientConfig) -> ClientConfig,
{
    let seen = Arc::new(Mutex::new(Vec::new()));

    let requests = seen.clone();
    let make_svc = make_service_fn(move |_conn| {
        let requests = requests.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |req: Request<Body>| {
                requests.lock().unwrap().push(Seen {
                    uri: req.uri().to_string(),
                    api_key: req
                        .headers()
                        .get("x-api-key")
                        .map(|v| v.to_str().unwrap().to_string()),
                });

                async move {
                    Ok::<_, Infallible>(
                        Response::builder()
                            .status(status)
                            .header("content-type", content_type)
                            .body(Body::from(body))
                            .unwrap(),
                    )
                }
            }))
        }
    });

    let addr = SocketAddr::from(([127, 0, 0, 1], 0));
    let server = Server::bind(&addr).serve(make_svc);
    let addr = server.local_addr();
    tokio::spawn(server);

    let config = configure(ClientConfig::new(format!("http://{}", addr)).unwrap());
    let client = Client::with_connector(config, HttpConnector::new());

    (client, seen)
}

fn mx_records() -> Vec<RData> {
    vec![
        RData {
            count: Some(45644),
            time_first: Some(Timestamp::new(1372706073)),
            time_last: Some(Timestamp::new(1468330740)),
            rrname: Some("fsi.io.".to_string()),
            rrtype: Some("MX".to_string()),
            rdata: Some("10 hq.fsi.io.".to_string()),
        },
        RData {
            count: Some(19304),
            time_first: Some(Timestamp::new(1374098929)),
            time_last: Some(Timestamp::new(1468333042)),
            rrname: Some("farsightsecurity.com.".to_string()),
            rrtype: Some("MX".to_string()),
            rdata: Some("10 hq.fsi.io.".to_string()),
        },
    ]
}

fn a_records() -> Vec<RData> {
    vec![
        RData {
            count: Some(24),
            time_first: Some(Timestamp::new(1433550785)),
            time_last: Some(Timestamp::new(1468312116)),
            rrname: Some("www.farsighsecurity.com.".to_string()),
            rrtype: Some("A".to_string()),
            rdata: Some("104.244.13.104".to_string()),
        },
        RData {
            count: Some(9429),
            time_first: Some(Timestamp::new(1427897872)),
            time_last: Some(Timestamp::new(1468333042)),
            rrname: Some("farsightsecurity.com.".to_string()),
            rrtype: Some("A".to_string()),
            rdata: Some("104.244.13.104".to_string()),
        },
    ]
}

fn ip() -> IpAddr {
    "104.244.13.104".parse().unwrap()
}

fn assert_remote_error<T: std::fmt::Debug>(result: Result<T, Error>) {
    match result {
        Err(Error::Remote { status, body }) => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, "Oh No");
        }
        other => panic!("expected a remote error, got {:?}", other),
    }
}

fn assert_decode_error<T: std::fmt::Debug>(result: Result<T, Error>) {
    match result {
        Err(Error::Decode { line, .. }) => assert_eq!(line, "{"),
        other => panic!("expected a decode error, got {:?}", other),
    }
}

#[test_env_log::test(tokio::test)]
async fn test_lookup_name() {
    let options = LookupOptions::default();

    let (client, _) = serve(StatusCode::INTERNAL_SERVER_ERROR, "Oh No");
    assert_remote_error(client.rdata().lookup_name("hq.fsi.io", &options).await);

    let (client, _) = serve(StatusCode::OK, "{");
    assert_decode_error(client.rdata().lookup_name("hq.fsi.io", &options).await);

    let (client, seen) = serve(StatusCode::OK, MX_RESPONSE);
    let options = LookupOptions::default().with_rrtype("MX");
    let (records, response) = client
        .rdata()
        .lookup_name("hq.fsi.io", &options)
        .await
        .expect("lookup failed");

    assert_eq!(records, mx_records());
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers["content-type"], "application/json");
    assert_eq!(response.stats.response_size, MX_RESPONSE.len());
    assert_eq!(seen.lock().unwrap()[0].uri, "/lookup/rrset/name/hq.fsi.io/MX");
}

#[test_env_log::test(tokio::test)]
async fn test_lookup_ip() {
    let options = LookupOptions::default();

    let (client, _) = serve(StatusCode::INTERNAL_SERVER_ERROR, "Oh No");
    assert_remote_error(client.rdata().lookup_ip(ip(), &options).await);

    let (client, _) = serve(StatusCode::OK, "{");
    assert_decode_error(client.rdata().lookup_ip(ip(), &options).await);

    let (client, seen) = serve(StatusCode::OK, A_RESPONSE);
    let options = LookupOptions::default().with_rrtype("A");
    let (records, _) = client
        .rdata()
        .lookup_ip(ip(), &options)
        .await
        .expect("lookup failed");

    assert_eq!(records, a_records());
    assert_eq!(seen.lock().unwrap()[0].uri, "/lookup/rdata/ip/104.244.13.104/A");
}

#[test_env_log::test(tokio::test)]
async fn test_lookup_ip_net() {
    let network = "104.244.13.104/29".parse().unwrap();
    let options = LookupOptions::default();

    let (client, _) = serve(StatusCode::INTERNAL_SERVER_ERROR, "Oh No");
    assert_remote_error(client.rdata().lookup_ip_net(network, &options).await);

    let (client, _) = serve(StatusCode::OK, "{");
    assert_decode_error(client.rdata().lookup_ip_net(network, &options).await);

    let (client, seen) = serve(StatusCode::OK, A_RESPONSE);
    let options = LookupOptions::default().with_rrtype("A");
    let (records, _) = client
        .rdata()
        .lookup_ip_net(network, &options)
        .await
        .expect("lookup failed");

    assert_eq!(records, a_records());
    assert_eq!(
        seen.lock().unwrap()[0].uri,
        "/lookup/rdata/ip/104.244.13.104%2F29/A"
    );
}

#[test_env_log::test(tokio::test)]
async fn test_lookup_ip_net_clears_host_bits() {
    let (client, seen) = serve(StatusCode::OK, "");
    let (records, _) = client
        .rdata()
        .lookup_ip_net("104.244.13.107/29".parse().unwrap(), &LookupOptions::default())
        .await
        .expect("lookup failed");

    assert_eq!(records, vec![]);
    assert_eq!(seen.lock().unwrap()[0].uri, "/lookup/rdata/ip/104.244.13.104%2F29");
}

#[test_env_log::test(tokio::test)]
async fn test_lookup_raw() {
    let raw = b"\x68\xF4\x0D\x68";
    let options = LookupOptions::default();

    let (client, _) = serve(StatusCode::INTERNAL_SERVER_ERROR, "Oh No");
    assert_remote_error(client.rdata().lookup_raw(&[], &options).await);

    let (client, _) = serve(StatusCode::OK, "{");
    assert_decode_error(client.rdata().lookup_raw(&[], &options).await);

    let (client, seen) = serve(StatusCode::OK, A_RESPONSE);
    let options = LookupOptions::default().with_rrtype("A");
    let (records, _) = client
        .rdata()
        .lookup_raw(raw, &options)
        .await
        .expect("lookup failed");

    // The same as looking up the address as text.
    let (by_ip, _) = client
        .rdata()
        .lookup_ip(ip(), &options)
        .await
        .expect("lookup failed");

    assert_eq!(records, a_records());
    assert_eq!(records, by_ip);
    assert_eq!(seen.lock().unwrap()[0].uri, "/lookup/rdata/raw/68f40d68/A");
}

#[test_env_log::test(tokio::test)]
async fn test_lookup_is_repeatable() {
    let (client, seen) = serve(StatusCode::OK, MX_RESPONSE);
    let options = LookupOptions::default().with_rrtype("MX");

    let (first, _) = client
        .rdata()
        .lookup_name("hq.fsi.io", &options)
        .await
        .expect("lookup failed");
    let (second, _) = client
        .rdata()
        .lookup_name("hq.fsi.io", &options)
        .await
        .expect("lookup failed");

    assert_eq!(first, second);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].uri, seen[1].uri);
}

#[test_env_log::test(tokio::test)]
async fn test_partial_response_fails() {
    const BODY: &str = "{\"count\":1,\"rrname\":\"fsi.io.\"}\n{\"count\":\n";

    let (client, _) = serve(StatusCode::OK, BODY);
    match client
        .rdata()
        .lookup_name("fsi.io", &LookupOptions::default())
        .await
    {
        Err(Error::Decode { line, .. }) => assert_eq!(line, "{\"count\":"),
        other => panic!("expected a decode error, got {:?}", other),
    }
}

#[test_env_log::test(tokio::test)]
async fn test_options_and_api_key() {
    let (client, seen) = serve_with(StatusCode::OK, "application/json", MX_RESPONSE, |config| {
        config.with_api_key("secret")
    });

    let options = LookupOptions::default()
        .with_rrtype("")
        .with_limit(2)
        .with_time_first_after(Timestamp::new(1372706073));

    let (records, _) = client
        .rdata()
        .lookup_name("hq.fsi.io", &options)
        .await
        .expect("lookup failed");
    assert_eq!(records.len(), 2);

    let seen = seen.lock().unwrap();
    assert_eq!(
        seen[0].uri,
        "/lookup/rrset/name/hq.fsi.io?limit=2&time_first_after=1372706073"
    );
    assert_eq!(seen[0].api_key, Some("secret".to_string()));
}

#[test_env_log::test(tokio::test)]
async fn test_no_api_key() {
    let (client, seen) = serve(StatusCode::OK, "\n");
    let (records, _) = client
        .rdata()
        .lookup_name("hq.fsi.io", &LookupOptions::default())
        .await
        .expect("lookup failed");

    assert_eq!(records, vec![]);
    assert_eq!(seen.lock().unwrap()[0].api_key, None);
}

#[test_env_log::test(tokio::test)]
async fn test_lookup_root_name() {
    let (client, seen) = serve(StatusCode::OK, "");
    let options = LookupOptions::default().with_rrtype("NS");

    client
        .rdata()
        .lookup_name(".", &options)
        .await
        .expect("lookup failed");
    client
        .rdata()
        .lookup_name("..", &options)
        .await
        .expect("lookup failed");

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].uri, "/lookup/rrset/name/%2E/NS");
    assert_eq!(seen[1].uri, "/lookup/rrset/name/%2E%2E/NS");
}

#[test_env_log::test(tokio::test)]
async fn test_lookup_name_is_escaped() {
    let (client, seen) = serve(StatusCode::OK, "");
    let options = LookupOptions::default().with_rrtype("A");

    client
        .rdata()
        .lookup_name("a/b%c.fsi.io", &options)
        .await
        .expect("lookup failed");

    assert_eq!(
        seen.lock().unwrap()[0].uri,
        "/lookup/rrset/name/a%2Fb%25c.fsi.io/A"
    );
}

#[test_env_log::test(tokio::test)]
async fn test_unexpected_content_type_is_not_fatal() {
    let (client, _) = serve_with(StatusCode::OK, "text/html", MX_RESPONSE, |config| config);
    let (records, response) = client
        .rdata()
        .lookup_name("hq.fsi.io", &LookupOptions::default())
        .await
        .expect("lookup failed");

    assert_eq!(records, mx_records());
    assert_eq!(response.headers["content-type"], "text/html");
}

#[test_env_log::test(tokio::test)]
async fn test_array_line_fails() {
    const BODY: &str = r#"[45644,1372706073,1468330740,"fsi.io.","MX","10 hq.fsi.io."]"#;

    let (client, _) = serve(StatusCode::OK, BODY);
    match client
        .rdata()
        .lookup_name("hq.fsi.io", &LookupOptions::default())
        .await
    {
        Err(Error::Decode { line, .. }) => assert_eq!(line, BODY),
        other => panic!("expected a decode error, got {:?}", other),
    }
}
