use crate::clients::ToUrl;
use crate::Error;
use std::env;
use url::Url;

pub const DNSDB: &str = "https://api.dnsdb.info";

/// Environment variable holding the API key, read by [`ClientConfig::from_env`].
pub const ENV_API_KEY: &str = "DNSDB_API_KEY";

/// Environment variable overriding the base url, read by [`ClientConfig::from_env`].
pub const ENV_SERVER: &str = "DNSDB_SERVER";

const DEFAULT_USER_AGENT: &str = concat!("dnsdb-rust/", env!("CARGO_PKG_VERSION"));

/// Settings a [`Client`](crate::clients::Client) is constructed with. They
/// can not be changed once the client exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Lookup paths are appended to this url.
    pub base_url: Url,

    /// Sent as the `X-API-Key` header when present.
    pub api_key: Option<String>,

    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: Url::parse(DNSDB).expect("DNSDB is a valid url"),
            api_key: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Creates a config for the server at `base_url`.
    pub fn new<U: ToUrl>(base_url: U) -> Result<Self, Error> {
        Ok(ClientConfig {
            base_url: base_url.to_url()?,
            ..Default::default()
        })
    }

    /// Creates a config from `DNSDB_SERVER` and `DNSDB_API_KEY`, falling back
    /// to the defaults for any that are unset.
    pub fn from_env() -> Result<Self, Error> {
        let mut config = match env::var(ENV_SERVER) {
            Ok(server) => ClientConfig::new(server)?,
            Err(_) => ClientConfig::default(),
        };

        if let Ok(key) = env::var(ENV_API_KEY) {
            if !key.is_empty() {
                config.api_key = Some(key);
            }
        }

        Ok(config)
    }

    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
