//! HTTP client construction.
//!
//! This module builds [`HttpClient`]s for the three connection strategies:
//! direct, through an HTTP proxy, and through a SOCKS5 proxy. Every builder
//! starts from the same base configuration and attaches a fresh in-memory
//! cookie jar.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use log::{debug, info};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{redirect, ClientBuilder, Proxy, Url};

use crate::config::TransportConfig;
use crate::error_handling::TransportError;

/// Username and password for SOCKS5 authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// SOCKS5 username
    pub username: String,
    /// SOCKS5 password
    pub password: String,
}

impl Credentials {
    /// Creates credentials from a username and password.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Never print the password
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// The connection strategy a client was built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    /// Connect straight to the target
    Direct,
    /// Tunnel through an HTTP proxy
    HttpProxy {
        /// Proxy URL as given by the caller
        url: String,
    },
    /// Dial through a SOCKS5 proxy; host names are resolved by the proxy
    Socks5Proxy {
        /// Proxy `host:port`
        address: String,
    },
}

/// A configured HTTP client plus its cookie jar.
///
/// Cloning is cheap: clones share the connection pool and the cookie jar, so
/// cookies set by one response are sent on later requests from any clone.
/// Safe to use from many tasks at once.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    jar: Arc<Jar>,
    transport: Transport,
    config: TransportConfig,
}

impl HttpClient {
    /// The underlying engine client.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// The connection strategy this client uses.
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// The transport parameters this client was built with.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// The `Cookie` header the jar would send to `url`, if any.
    pub fn cookie_header(&self, url: &Url) -> Option<String> {
        self.jar
            .cookies(url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    /// Seeds the jar with a `Set-Cookie` style string scoped to `url`.
    pub fn add_cookie(&self, cookie: &str, url: &Url) {
        self.jar.add_cookie_str(cookie, url);
    }
}

/// Applies the parameters shared by every transport.
fn base_builder(config: &TransportConfig, jar: Arc<Jar>) -> ClientBuilder {
    let builder = ClientBuilder::new()
        .cookie_provider(jar)
        .connect_timeout(config.connect_budget())
        .tcp_keepalive(config.keep_alive)
        .pool_idle_timeout(config.idle_timeout)
        .pool_max_idle_per_host(config.max_idle_connections)
        .redirect(redirect::Policy::limited(config.max_redirects))
        .danger_accept_invalid_certs(config.accept_invalid_certs);

    if config.dual_stack {
        builder
    } else {
        builder.local_address(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
    }
}

fn finish(
    builder: ClientBuilder,
    jar: Arc<Jar>,
    transport: Transport,
    config: &TransportConfig,
) -> Result<HttpClient, TransportError> {
    let client = builder.build()?;
    info!("HTTP client ready: {transport:?}");
    Ok(HttpClient {
        client,
        jar,
        transport,
        config: config.clone(),
    })
}

/// Builds a client that connects directly to targets.
///
/// Environment proxy variables are ignored. With the default config, TLS
/// certificates are not verified.
///
/// # Errors
///
/// Returns `TransportError::Client` if the engine rejects the configuration
/// (e.g. the TLS backend cannot be initialized).
pub fn build_direct(config: &TransportConfig) -> Result<HttpClient, TransportError> {
    debug!(
        "Building direct client (connect budget {:?})",
        config.connect_budget()
    );
    let jar = Arc::new(Jar::default());
    let builder = base_builder(config, Arc::clone(&jar)).no_proxy();
    finish(builder, jar, Transport::Direct, config)
}

/// Builds a client that sends every request through an HTTP proxy.
///
/// The proxy URL is parsed once, here.
///
/// # Errors
///
/// Returns `TransportError::InvalidProxyUrl` if `proxy_url` cannot be parsed,
/// or `TransportError::Client` if the engine rejects the configuration.
pub fn build_http_proxy(
    proxy_url: &str,
    config: &TransportConfig,
) -> Result<HttpClient, TransportError> {
    debug!("Building HTTP proxy client via {proxy_url}");
    let proxy = Proxy::all(proxy_url).map_err(|source| TransportError::InvalidProxyUrl {
        url: proxy_url.to_string(),
        source,
    })?;
    let jar = Arc::new(Jar::default());
    let builder = base_builder(config, Arc::clone(&jar)).proxy(proxy);
    let transport = Transport::HttpProxy {
        url: proxy_url.to_string(),
    };
    finish(builder, jar, transport, config)
}

/// Builds a client that dials through a SOCKS5 proxy at `address` (`host:port`).
///
/// Target host names are resolved by the proxy, not locally.
///
/// # Errors
///
/// Returns `TransportError::InvalidSocksAddress` if `address` is not a
/// `host:port` pair or the credentials cannot be encoded, or
/// `TransportError::Client` if the engine rejects the configuration.
pub fn build_socks5_proxy(
    address: &str,
    auth: Option<&Credentials>,
    config: &TransportConfig,
) -> Result<HttpClient, TransportError> {
    debug!(
        "Building SOCKS5 client via {address} (auth: {})",
        auth.is_some()
    );
    let proxy_url = socks5_url(address, auth)?;
    let proxy = Proxy::all(proxy_url.as_str()).map_err(|e| invalid_socks(address, e))?;
    let jar = Arc::new(Jar::default());
    let builder = base_builder(config, Arc::clone(&jar)).proxy(proxy);
    let transport = Transport::Socks5Proxy {
        address: address.to_string(),
    };
    finish(builder, jar, transport, config)
}

fn invalid_socks(address: &str, reason: impl ToString) -> TransportError {
    TransportError::InvalidSocksAddress {
        address: address.to_string(),
        reason: reason.to_string(),
    }
}

/// Builds the `socks5h://[user:pass@]host:port` URL the engine dials through.
fn socks5_url(address: &str, auth: Option<&Credentials>) -> Result<Url, TransportError> {
    let (host, port) = address
        .rsplit_once(':')
        .ok_or_else(|| invalid_socks(address, "missing port"))?;
    if host.is_empty() {
        return Err(invalid_socks(address, "missing host"));
    }
    port.parse::<u16>()
        .map_err(|e| invalid_socks(address, format!("bad port {port:?}: {e}")))?;

    let mut url =
        Url::parse(&format!("socks5h://{address}")).map_err(|e| invalid_socks(address, e))?;
    if let Some(credentials) = auth {
        url.set_username(&credentials.username)
            .map_err(|_| invalid_socks(address, "cannot encode username"))?;
        url.set_password(Some(&credentials.password))
            .map_err(|_| invalid_socks(address, "cannot encode password"))?;
    }
    Ok(url)
}
