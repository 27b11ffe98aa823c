//! Command line and run options

use std::path::PathBuf;
use std::time::Duration;

use crate::deploy::poller;
use crate::errors::DeployError;
use crate::logs::{LogLevel, LogOptions};

/// Default platform API base URL
pub const DEFAULT_BASE_URL: &str = "https://api-eon.cognigy.cloud/new/v2.0";

/// Usage text printed for argument errors and `--help`
pub const USAGE: &str = "\
Usage: extdeploy [<config.json> [<project>|all]] [options]

Without arguments the C_API_KEY, PROJECT_ID and EXTENSION_PATH environment
variables describe a single target.

Options:
  --dev                   Accept invalid TLS certificates
  --strict                Exit with status 1 when any target fails
  --timeout=<secs>        Give up waiting for a task after this many seconds
  --poll-interval=<secs>  Delay between task status polls (default 1)
  --base-url=<url>        Platform API base URL
  --log-level=<level>     trace, debug, info, warn or error (default info)
  --json-logs             Emit logs as JSON
  --version               Print version information
  --help                  Print this help";

/// Parsed command line
#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    /// Path to the JSON config file
    pub config_path: Option<PathBuf>,

    /// Project label from the config file, or `all`
    pub project: Option<String>,

    /// Relax TLS certificate validation
    pub dev: bool,

    /// Turn target failures into a non-zero exit status
    pub strict: bool,

    /// Maximum time to wait for a single task
    pub timeout: Option<Duration>,

    /// Delay between task status polls
    pub poll_interval: Duration,

    /// Platform API base URL
    pub base_url: String,

    /// Log level
    pub log_level: LogLevel,

    /// Emit JSON logs
    pub json_logs: bool,

    /// Print version and exit
    pub show_version: bool,

    /// Print usage and exit
    pub show_help: bool,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            config_path: None,
            project: None,
            dev: false,
            strict: false,
            timeout: None,
            poll_interval: Duration::from_secs(1),
            base_url: DEFAULT_BASE_URL.to_string(),
            log_level: LogLevel::Info,
            json_logs: false,
            show_version: false,
            show_help: false,
        }
    }
}

impl CliArgs {
    /// Parse the arguments following the program name
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, DeployError> {
        let mut cli = CliArgs::default();
        let mut positional: Vec<String> = Vec::new();

        for arg in args.iter().map(AsRef::as_ref) {
            if !arg.starts_with("--") {
                positional.push(arg.to_string());
                continue;
            }

            let flag = arg.trim_start_matches('-');
            match flag.split_once('=') {
                Some(("timeout", value)) => {
                    cli.timeout = Some(Duration::from_secs(parse_secs("timeout", value)?));
                }
                Some(("poll-interval", value)) => {
                    let secs = parse_secs("poll-interval", value)?;
                    if secs == 0 {
                        return Err(DeployError::ConfigError(
                            "--poll-interval must be at least 1 second".to_string(),
                        ));
                    }
                    cli.poll_interval = Duration::from_secs(secs);
                }
                Some(("base-url", value)) => {
                    cli.base_url = value.trim_end_matches('/').to_string();
                }
                Some(("log-level", value)) => {
                    cli.log_level = value.parse().map_err(DeployError::ConfigError)?;
                }
                Some((key, _)) => {
                    return Err(DeployError::ConfigError(format!("Unknown option --{}", key)));
                }
                None => match flag {
                    "dev" => cli.dev = true,
                    "strict" => cli.strict = true,
                    "json-logs" => cli.json_logs = true,
                    "version" => cli.show_version = true,
                    "help" => cli.show_help = true,
                    other => {
                        return Err(DeployError::ConfigError(format!(
                            "Unknown option --{}",
                            other
                        )));
                    }
                },
            }
        }

        if positional.len() > 2 {
            return Err(DeployError::ConfigError(format!(
                "Expected at most 2 arguments, got {}",
                positional.len()
            )));
        }

        let mut positional = positional.into_iter();
        cli.config_path = positional.next().map(PathBuf::from);
        cli.project = positional.next();

        Ok(cli)
    }

    /// Logging options derived from the command line
    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            log_level: self.log_level.clone(),
            json_format: self.json_logs,
        }
    }

    /// Run options derived from the command line
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            base_url: self.base_url.clone(),
            accept_invalid_certs: self.dev,
            poller: poller::Options {
                interval: self.poll_interval,
                timeout: self.timeout,
            },
            strict: self.strict,
        }
    }
}

fn parse_secs(name: &str, value: &str) -> Result<u64, DeployError> {
    value.parse::<u64>().map_err(|_| {
        DeployError::ConfigError(format!("--{} expects a number of seconds, got '{}'", name, value))
    })
}

/// Options for one deployment run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Platform API base URL
    pub base_url: String,

    /// Accept invalid TLS certificates (`--dev`)
    pub accept_invalid_certs: bool,

    /// Task poller options
    pub poller: poller::Options,

    /// Exit non-zero when any target fails
    pub strict: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        CliArgs::default().run_options()
    }
}
