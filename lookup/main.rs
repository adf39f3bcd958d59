// Simple dig style command line for DNSDB rdata lookups.
// dnsdb [+name|+ip|+net|+raw] [@server] [+limit=N] {key} [rrtype]
//
// The API key is read from DNSDB_API_KEY, and the server from DNSDB_SERVER
// unless one is given with @.
use dnsdb::clients::{Client, ClientConfig, Response};
use dnsdb::{LookupOptions, RData};
use ipnet::IpNet;
use std::env;
use std::net::IpAddr;
use std::process;
use std::str::FromStr;
use strum_macros::{Display, EnumString};

#[derive(Clone, Copy, Debug, Display, EnumString, PartialEq)]
#[strum(serialize_all = "lowercase")]
enum Kind {
    Name,
    Ip,
    Net,
    Raw,
}

// A simple type alias so as to DRY.
type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Debug, PartialEq)]
struct Args {
    /// The kind of lookup, guessed from the key when not given.
    kind: Option<Kind>,
    server: Option<String>,
    limit: Option<u64>,

    key: String,
    rrtype: Option<String>,
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Args> {
    let mut kind = None;
    let mut server = None;
    let mut limit = None;
    let mut positional = Vec::<String>::new();

    for arg in args {
        if let Some(flag) = arg.strip_prefix('+') {
            if let Some(n) = flag.strip_prefix("limit=") {
                limit = Some(n.parse()?);
                continue;
            }

            match Kind::from_str(flag) {
                Ok(k) => kind = Some(k),
                Err(_) => return Err(format!("Unknown flag: {}", arg).into()),
            }
        } else if let Some(s) = arg.strip_prefix('@') {
            server = Some(s.to_string());
        } else {
            positional.push(arg);
        }
    }

    let mut positional = positional.into_iter();
    let key = match positional.next() {
        Some(key) => key,
        None => return Err("missing lookup key".into()),
    };
    let rrtype = positional.next();

    if let Some(extra) = positional.next() {
        return Err(format!("Unexpected argument: {}", extra).into());
    }

    Ok(Args {
        kind,
        server,
        limit,
        key,
        rrtype,
    })
}

/// Picks the lookup kind for a key given without a +flag.
fn guess_kind(key: &str) -> Kind {
    if key.parse::<IpAddr>().is_ok() {
        Kind::Ip
    } else if key.parse::<IpNet>().is_ok() {
        Kind::Net
    } else {
        Kind::Name
    }
}

async fn lookup(
    client: &Client,
    kind: Kind,
    key: &str,
    options: &LookupOptions,
) -> Result<(Vec<RData>, Response)> {
    let rdata = client.rdata();

    Ok(match kind {
        Kind::Name => rdata.lookup_name(key, options).await?,
        Kind::Ip => rdata.lookup_ip(key.parse()?, options).await?,
        Kind::Net => rdata.lookup_ip_net(key.parse()?, options).await?,
        Kind::Raw => rdata.lookup_raw(&hex::decode(key)?, options).await?,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Usage: dnsdb [+name|+ip|+net|+raw] [@server] [+limit=N] {{key}} [rrtype]");
            process::exit(1);
        }
    };

    let mut config = ClientConfig::from_env()?;
    if let Some(server) = &args.server {
        let api_key = config.api_key.take();
        config = ClientConfig::new(server)?;
        config.api_key = api_key;
    }

    let mut options = LookupOptions::default();
    if let Some(rrtype) = args.rrtype {
        options = options.with_rrtype(rrtype);
    }
    if let Some(limit) = args.limit {
        options = options.with_limit(limit);
    }

    let kind = match args.kind {
        Some(kind) => kind,
        None => guess_kind(&args.key),
    };
    let client = Client::new(config);

    let (records, response) = lookup(&client, kind, &args.key, &options).await?;

    println!(";; {} lookup of {}: {} records", kind, args.key, records.len());
    for record in records {
        println!("{}", record);
    }
    println!();
    print!("{}", response.stats);

    Ok(())
}
