//! Server configuration
//!
//! Every option can come from a command-line flag or an environment
//! variable. Flags win over the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::{Context, bail};
use axum::http::{HeaderValue, Method, header};
use clap::{ArgAction, Parser};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use ytrelay_core::url::DEFAULT_API_BASE_URL;
use ytrelay_core::{ClientConfig, SearchPolicy};

/// ytrelay: YouTube search and comments for your frontend
///
/// Relays video searches and comment fetches to the YouTube Data API v3
/// using the API key supplied with each request.
#[derive(Parser, Debug, Clone)]
#[command(name = "ytrelay")]
#[command(version)]
#[command(about = "YouTube Data API relay", long_about = None)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "RELAY_HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "RELAY_PORT", default_value_t = 8000)]
    pub port: u16,

    /// YouTube Data API base URL
    #[arg(long, env = "YOUTUBE_API_BASE_URL", default_value_t = DEFAULT_API_BASE_URL.to_string())]
    pub api_base_url: String,

    /// Timeout for each YouTube request, in seconds
    #[arg(long, env = "RELAY_UPSTREAM_TIMEOUT_SECS", default_value_t = 30)]
    pub upstream_timeout_secs: u64,

    /// Comma-separated origins allowed by CORS, or "*" for any
    #[arg(
        long,
        env = "RELAY_ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "*"
    )]
    pub allowed_origins: Vec<String>,

    /// Fetch a full page of search hits and order them by comment count
    #[arg(long, env = "RELAY_RANK_BY_COMMENTS")]
    pub rank_by_comments: bool,

    /// Drop search hits that have no comments
    #[arg(long, env = "RELAY_SKIP_UNCOMMENTED")]
    pub skip_uncommented: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_base_url.clone(),
            timeout_secs: self.upstream_timeout_secs,
        }
    }

    pub fn search_policy(&self) -> SearchPolicy {
        SearchPolicy {
            rank_by_comments: self.rank_by_comments,
            skip_uncommented: self.skip_uncommented,
        }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o.trim() == "*")
    }

    /// Default log filter for the configured verbosity
    ///
    /// Only used when `RUST_LOG` is not set.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "ytrelay=info,ytrelay_server=info,ytrelay_core=info,warn",
            1 => "ytrelay=debug,ytrelay_server=debug,ytrelay_core=debug,tower_http=debug,info",
            2 => "ytrelay=trace,ytrelay_server=trace,ytrelay_core=trace,tower_http=trace,debug",
            _ => "trace",
        }
    }

    /// Build the CORS layer for the configured origins
    ///
    /// A wildcard allows any origin without credentials. An explicit list
    /// allows credentials for exactly those origins.
    pub fn cors_layer(&self) -> anyhow::Result<CorsLayer> {
        if self.allows_any_origin() {
            return Ok(CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any));
        }

        let origins = self
            .allowed_origins
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .map(|o| {
                HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin {:?}", o))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        if origins.is_empty() {
            bail!("RELAY_ALLOWED_ORIGINS must name at least one origin");
        }

        Ok(CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
            .allow_credentials(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ServerConfig {
        let argv = std::iter::once("ytrelay").chain(args.iter().copied());
        ServerConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8000");
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.upstream_timeout_secs, 30);
        assert!(config.allows_any_origin());
        assert_eq!(config.search_policy(), SearchPolicy::default());
    }

    #[test]
    fn test_flags() {
        let config = parse(&[
            "--host",
            "0.0.0.0",
            "--port",
            "9001",
            "--api-base-url",
            "http://localhost:1234/v3",
            "--upstream-timeout-secs",
            "5",
            "--rank-by-comments",
            "--skip-uncommented",
            "-vv",
        ]);

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:9001");
        let client = config.client_config();
        assert_eq!(client.base_url, "http://localhost:1234/v3");
        assert_eq!(client.timeout_secs, 5);

        let policy = config.search_policy();
        assert!(policy.rank_by_comments);
        assert!(policy.skip_uncommented);
        assert_eq!(config.verbose, 2);
        assert!(config.log_filter().starts_with("ytrelay=trace"));
    }

    #[test]
    fn test_origin_list() {
        let config = parse(&[
            "--allowed-origins",
            "http://localhost:3000,https://app.example.com",
        ]);
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:3000", "https://app.example.com"]
        );
        assert!(!config.allows_any_origin());
        assert!(config.cors_layer().is_ok());
    }

    #[test]
    fn test_invalid_origin_rejected() {
        let config = parse(&["--allowed-origins", "http://bad\norigin"]);
        assert!(config.cors_layer().is_err());
    }

    #[test]
    fn test_invalid_port_rejected() {
        let result = ServerConfig::try_parse_from(["ytrelay", "--port", "not-a-port"]);
        assert!(result.is_err());
    }
}
