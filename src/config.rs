use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::generator::{CliGenerator, DEFAULT_PROGRAM, DEFAULT_TIMEOUT};

/// Loopback-only default listen address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

pub const USAGE: &str = "\
Usage: messages2cli [--bind=ADDR] [--program=PATH] [--timeout-seconds=N]

Environment:
  BIND_ADDR                      listen address (default 127.0.0.1:5000)
  MESSAGES2CLI_PROGRAM           generation program (default claude)
  MESSAGES2CLI_TIMEOUT_SECONDS   per-request generation timeout (default 120)

Flags override environment variables.";

/// Runtime configuration for the proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub bind_addr: SocketAddr,
    pub program: PathBuf,
    pub timeout: Duration,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            program: PathBuf::from(DEFAULT_PROGRAM),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ProxyConfig {
    /// Resolve configuration from the process environment, then CLI flags.
    pub fn from_env_and_args(args: &[String]) -> Result<Self> {
        Self::resolve(|key| std::env::var(key).ok(), args)
    }

    /// Resolve configuration from an arbitrary variable lookup, then CLI flags.
    ///
    /// Blank values are treated as unset.
    pub fn resolve<F>(lookup: F, args: &[String]) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut bind = var("BIND_ADDR");
        let mut program = var("MESSAGES2CLI_PROGRAM");
        let mut timeout = var("MESSAGES2CLI_TIMEOUT_SECONDS");

        for arg in args.iter().skip(1) {
            if let Some(v) = arg.strip_prefix("--bind=") {
                bind = Some(v.to_string());
            } else if let Some(v) = arg.strip_prefix("--program=") {
                program = Some(v.to_string());
            } else if let Some(v) = arg.strip_prefix("--timeout-seconds=") {
                timeout = Some(v.to_string());
            } else {
                bail!("unrecognized argument: {arg}\n\n{USAGE}");
            }
        }

        let mut config = ProxyConfig::default();

        if let Some(b) = bind {
            config.bind_addr = b
                .parse()
                .with_context(|| format!("invalid bind address: {b}"))?;
        }

        if let Some(p) = program {
            if p.trim().is_empty() {
                bail!("generation program must not be empty");
            }
            config.program = PathBuf::from(p);
        }

        if let Some(t) = timeout {
            let secs: u64 = t
                .trim()
                .parse()
                .with_context(|| format!("invalid timeout seconds: {t}"))?;
            if secs == 0 {
                bail!("timeout seconds must be greater than zero");
            }
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Build the generator this configuration describes.
    pub fn generator(&self) -> CliGenerator {
        CliGenerator::new(self.program.clone(), self.timeout)
    }
}

/// True when the arguments ask for usage text.
pub fn wants_help(args: &[String]) -> bool {
    args.iter()
        .skip(1)
        .any(|a| a == "--help" || a == "-h")
}
