use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use storage::RestConfig;
use storage::rest::DEFAULT_API_URL;

/// Terminal client for the Wordify vocabulary trainer.
#[derive(Debug, Clone, Parser)]
#[command(name = "wordify", version, about)]
pub struct Cli {
    /// Base URL of the REST API.
    #[arg(long, env = "WORDIFY_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Token from an earlier login; skips the sign-in prompt.
    #[arg(long, env = "WORDIFY_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds. 0 waits indefinitely.
    #[arg(long, env = "WORDIFY_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Log filter, e.g. `info` or `storage=debug`.
    #[arg(long, env = "WORDIFY_LOG", default_value = "info")]
    pub log: String,

    /// Use the built-in demo data instead of a server.
    #[arg(long)]
    pub offline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Offline,
    Rest(RestConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub backend: Backend,
    pub token: Option<String>,
    pub log_filter: String,
}

impl AppConfig {
    /// Read `.env` if present, then parse flags and environment.
    pub fn load() -> anyhow::Result<Self> {
        // A missing .env file is normal.
        let _ = dotenvy::dotenv();
        Self::from_cli(Cli::parse())
    }

    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        let backend = if cli.offline {
            Backend::Offline
        } else {
            let timeout = (cli.timeout_secs > 0).then(|| Duration::from_secs(cli.timeout_secs));
            let rest = RestConfig::new(&cli.api_url)
                .with_context(|| format!("invalid API URL {:?}", cli.api_url))?
                .with_timeout(timeout);
            Backend::Rest(rest)
        };
        Ok(Self {
            backend,
            token: cli.token.filter(|t| !t.trim().is_empty()),
            log_filter: cli.log,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("wordify").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn zero_timeout_disables_it() {
        let config = AppConfig::from_cli(parse(&[
            "--api-url",
            "https://wordify.example/api",
            "--timeout-secs",
            "0",
        ]))
        .unwrap();
        let Backend::Rest(rest) = config.backend else {
            panic!("expected REST backend");
        };
        assert_eq!(rest.base_url.as_str(), "https://wordify.example/api/");
        assert_eq!(rest.timeout, None);
    }

    #[test]
    fn offline_ignores_api_url() {
        let config = AppConfig::from_cli(parse(&["--offline", "--api-url", "nonsense"])).unwrap();
        assert_eq!(config.backend, Backend::Offline);
    }

    #[test]
    fn blank_token_counts_as_none() {
        let config = AppConfig::from_cli(parse(&["--offline", "--token", " "])).unwrap();
        assert_eq!(config.token, None);
    }

    #[test]
    fn bad_url_is_reported() {
        let err = AppConfig::from_cli(parse(&["--api-url", "ftp://example.com"])).unwrap_err();
        assert!(err.to_string().contains("invalid API URL"));
    }
}
