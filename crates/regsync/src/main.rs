// # regsync - Domain Registration Reconciler
//
// ⚠️ ARCHITECTURAL CONSTRAINTS ⚠️
//
// - This is a THIN integration layer ONLY
// - DO NOT add reconciliation, policy or wire logic here
// - All reconciliation logic MUST be in regsync-core
// - Configuration is via environment variables plus one desired-config file
//
// The regsync binary is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Wiring the ASCIO client, the TLD catalog and the policy cache
// 4. Running one check, apply or list and printing the result as JSON
//
// ## Configuration
//
// ### Run
// - `REGSYNC_MODE`: `check` (default), `apply` or `list`
// - `REGSYNC_DESIRED`: Path to the desired-config JSON (check/apply)
//
// ### Registrar
// - `REGSYNC_USER`, `REGSYNC_PASSWORD`: Account credentials
// - `REGSYNC_REGISTRAR_URL`: SOAP endpoint override
// - `REGSYNC_CATALOG_URL`: TLD catalog base URL override
//
// ### Policy Cache
// - `REGSYNC_TLD_CACHE`: Cache directory, or `memory` (default `~/.cache/regsync`)
// - `REGSYNC_TLD_CACHE_MAX_AGE_DAYS`: Entry lifetime in days (default 180)
//
// ### List
// - `REGSYNC_FILTER_NAMES`, `REGSYNC_FILTER_TLDS`: Comma-separated filters
// - `REGSYNC_REPORT_PATH`: Write a CSV report here
//
// ### Logging
// - `REGSYNC_LOG_LEVEL`: trace, debug, info (default), warn, error
// - `REGSYNC_LOG_REQUESTS`: Log outgoing request bodies (never credentials)
//
// ## Example
//
// ```bash
// export REGSYNC_USER=account
// export REGSYNC_PASSWORD=secret
// export REGSYNC_DESIRED=/etc/regsync/example.com.json
// export REGSYNC_MODE=apply
//
// regsync
// ```

use anyhow::{Context, Result};
use regsync_core::cache;
use regsync_core::fetcher::DomainStateFetcher;
use regsync_core::report::{summarize, write_domain_csv};
use regsync_core::traits::{DomainQuery, RequestLog, TracingRequestLog};
use regsync_core::{
    Credentials, DesiredConfig, PolicyCacheConfig, Reconciler, RunMode, TldPolicySource,
};
use regsync_core::config::PolicyCacheStore;
use regsync_core::policy::DEFAULT_MAX_AGE_DAYS;
use regsync_registrar_ascio::{ASCIO_ENDPOINT, AscioClient, TLDKIT_BASE_URL, TldKitCatalog};
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for the possible outcomes of a run
///
/// - 0: Run completed, result not failed
/// - 1: Configuration or startup error
/// - 2: Run completed, result failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RegsyncExitCode {
    Success = 0,
    ConfigError = 1,
    Failed = 2,
}

impl From<RegsyncExitCode> for ExitCode {
    fn from(code: RegsyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// What a run does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Check,
    Apply,
    List,
}

/// Application configuration
#[derive(Debug)]
struct Config {
    mode: Mode,
    credentials: Credentials,
    desired_path: Option<String>,
    tld_cache: String,
    tld_cache_max_age_days: i64,
    registrar_url: String,
    catalog_url: String,
    log_level: String,
    log_requests: bool,
    report_path: Option<String>,
    filter_names: Vec<String>,
    filter_tlds: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through a variable lookup
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mode = match lookup("REGSYNC_MODE")
            .unwrap_or_else(|| "check".to_string())
            .to_lowercase()
            .as_str()
        {
            "check" => Mode::Check,
            "apply" => Mode::Apply,
            "list" => Mode::List,
            other => anyhow::bail!(
                "REGSYNC_MODE '{}' is not supported. Supported modes: check, apply, list",
                other
            ),
        };

        let tld_cache = match lookup("REGSYNC_TLD_CACHE") {
            Some(dir) => dir,
            None => {
                let home = lookup("HOME").context(
                    "REGSYNC_TLD_CACHE is not set and HOME is unknown. \
                    Set it via: export REGSYNC_TLD_CACHE=/var/cache/regsync",
                )?;
                format!("{}/.cache/regsync", home.trim_end_matches('/'))
            }
        };

        let tld_cache_max_age_days = match lookup("REGSYNC_TLD_CACHE_MAX_AGE_DAYS") {
            Some(raw) => raw.trim().parse().with_context(|| {
                format!("REGSYNC_TLD_CACHE_MAX_AGE_DAYS must be a whole number. Got: {}", raw)
            })?,
            None => DEFAULT_MAX_AGE_DAYS,
        };

        let log_requests = match lookup("REGSYNC_LOG_REQUESTS") {
            Some(raw) => parse_bool(&raw).with_context(|| {
                format!("REGSYNC_LOG_REQUESTS must be true or false. Got: {}", raw)
            })?,
            None => false,
        };

        Ok(Self {
            mode,
            credentials: Credentials::new(
                lookup("REGSYNC_USER").unwrap_or_default(),
                lookup("REGSYNC_PASSWORD").unwrap_or_default(),
            ),
            desired_path: lookup("REGSYNC_DESIRED"),
            tld_cache,
            tld_cache_max_age_days,
            registrar_url: lookup("REGSYNC_REGISTRAR_URL")
                .unwrap_or_else(|| ASCIO_ENDPOINT.to_string()),
            catalog_url: lookup("REGSYNC_CATALOG_URL")
                .unwrap_or_else(|| TLDKIT_BASE_URL.to_string()),
            log_level: lookup("REGSYNC_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_requests,
            report_path: lookup("REGSYNC_REPORT_PATH"),
            filter_names: split_list(lookup("REGSYNC_FILTER_NAMES")),
            filter_tlds: split_list(lookup("REGSYNC_FILTER_TLDS")),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.credentials.user.is_empty() {
            anyhow::bail!(
                "REGSYNC_USER is required. Set it via: export REGSYNC_USER=your_account"
            );
        }
        if self.credentials.password.is_empty() {
            anyhow::bail!(
                "REGSYNC_PASSWORD is required. Set it via: export REGSYNC_PASSWORD=your_password"
            );
        }

        if self.mode != Mode::List {
            match &self.desired_path {
                None => anyhow::bail!(
                    "REGSYNC_DESIRED is required in check and apply mode. \
                    Set it via: export REGSYNC_DESIRED=/etc/regsync/example.com.json"
                ),
                Some(path) if !std::path::Path::new(path).is_file() => {
                    anyhow::bail!("REGSYNC_DESIRED does not point to a file: {}", path)
                }
                Some(_) => {}
            }
        }

        if !(1..=3650).contains(&self.tld_cache_max_age_days) {
            anyhow::bail!(
                "REGSYNC_TLD_CACHE_MAX_AGE_DAYS must be between 1 and 3650. Got: {}",
                self.tld_cache_max_age_days
            );
        }
        self.policy_cache_config().validate()?;

        for (name, url) in [
            ("REGSYNC_REGISTRAR_URL", &self.registrar_url),
            ("REGSYNC_CATALOG_URL", &self.catalog_url),
        ] {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                anyhow::bail!("{} must use HTTP or HTTPS scheme. Got: {}", name, url);
            }
            if url.starts_with("http://") {
                eprintln!(
                    "WARNING: {} uses HTTP (not HTTPS). Credentials are sent in clear text.",
                    name
                );
            }
        }

        if let Some(path) = &self.report_path
            && let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            anyhow::bail!(
                "REGSYNC_REPORT_PATH parent directory does not exist: {}",
                parent.display()
            );
        }

        parse_level(&self.log_level)?;
        Ok(())
    }

    fn policy_cache_config(&self) -> PolicyCacheConfig {
        let store = if self.tld_cache.eq_ignore_ascii_case("memory") {
            PolicyCacheStore::Memory
        } else {
            PolicyCacheStore::File {
                dir: self.tld_cache.clone(),
            }
        };
        PolicyCacheConfig {
            store,
            max_age_days: self.tld_cache_max_age_days,
        }
    }
}

fn split_list(raw: Option<String>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

fn parse_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "REGSYNC_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            level
        ),
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return RegsyncExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return RegsyncExitCode::ConfigError.into();
    }

    // stdout carries the result document, logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&config.log_level).unwrap_or(Level::INFO))
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return RegsyncExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return RegsyncExitCode::ConfigError.into();
        }
    };

    match rt.block_on(run(config)) {
        Ok(code) => code.into(),
        Err(e) => {
            error!("Startup error: {:#}", e);
            RegsyncExitCode::ConfigError.into()
        }
    }
}

/// Wire the collaborators and execute one run
///
/// `Err` means the run could not start; a run that started always
/// prints a document and maps its outcome to an exit code.
async fn run(config: Config) -> Result<RegsyncExitCode> {
    let request_log: Arc<dyn RequestLog> = Arc::new(if config.log_requests {
        TracingRequestLog::enabled()
    } else {
        TracingRequestLog::disabled()
    });
    let registrar = AscioClient::new(config.registrar_url.clone(), request_log)
        .context("Failed to create registrar client")?;

    match config.mode {
        Mode::List => Ok(run_list(&config, &registrar).await),
        Mode::Check | Mode::Apply => {
            let desired = load_desired(&config)?;
            let catalog = TldKitCatalog::new(config.catalog_url.clone())
                .context("Failed to create TLD catalog client")?;
            let cache_config = config.policy_cache_config();
            let policy = TldPolicySource::new(Box::new(catalog), cache::from_config(&cache_config))
                .with_max_age_days(cache_config.max_age_days);

            let mode = if config.mode == Mode::Apply {
                RunMode::Apply
            } else {
                RunMode::Check
            };
            info!("Reconciling {} ({:?})", desired.domain, mode);

            let reconciler =
                Reconciler::new(Box::new(registrar), policy, config.credentials.clone());
            let result = reconciler.run(&desired, mode).await;

            print_document(&serde_json::to_value(&result)?)?;
            Ok(if result.failed {
                RegsyncExitCode::Failed
            } else {
                RegsyncExitCode::Success
            })
        }
    }
}

fn load_desired(config: &Config) -> Result<DesiredConfig> {
    let path = config
        .desired_path
        .as_deref()
        .context("REGSYNC_DESIRED is required in check and apply mode")?;
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read desired config {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid desired config {}", path))
}

/// List the account's domains and optionally write the CSV report
async fn run_list(config: &Config, registrar: &AscioClient) -> RegsyncExitCode {
    let query = DomainQuery {
        names: config.filter_names.clone(),
        tlds: config.filter_tlds.clone(),
        ..DomainQuery::default()
    };

    let fetcher = DomainStateFetcher::new(registrar);
    let records = match fetcher.list_all(&config.credentials, &query).await {
        Ok(records) => records,
        Err(e) => {
            error!("Listing domains failed: {}", e);
            let document = serde_json::json!({
                "failed": true,
                "errors": e.messages(),
                "domains": {},
            });
            if let Err(e) = print_document(&document) {
                error!("Failed to print result: {}", e);
            }
            return RegsyncExitCode::Failed;
        }
    };

    let domains = summarize(&records);
    info!("Listed {} domain(s)", domains.len());

    let mut failed = false;
    let mut errors = Vec::new();
    if let Some(path) = &config.report_path
        && !write_domain_csv(&domains, path)
    {
        failed = true;
        errors.push(format!("Failed to write report to {}", path));
    }

    let document = serde_json::json!({
        "failed": failed,
        "errors": errors,
        "domains": domains,
    });
    match print_document(&document) {
        Ok(()) if !failed => RegsyncExitCode::Success,
        _ => RegsyncExitCode::Failed,
    }
}

fn print_document(document: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(document)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::from_lookup(lookup(&[
            ("HOME", "/home/ops/"),
            ("REGSYNC_USER", "acct"),
            ("REGSYNC_PASSWORD", "pw"),
        ]))
        .unwrap();

        assert_eq!(config.mode, Mode::Check);
        assert_eq!(config.tld_cache, "/home/ops/.cache/regsync");
        assert_eq!(config.tld_cache_max_age_days, 180);
        assert_eq!(config.registrar_url, ASCIO_ENDPOINT);
        assert_eq!(config.catalog_url, TLDKIT_BASE_URL);
        assert!(!config.log_requests);
    }

    #[test]
    fn unknown_mode_rejected() {
        let err = Config::from_lookup(lookup(&[("REGSYNC_MODE", "destroy"), ("HOME", "/root")]))
            .unwrap_err();
        assert!(err.to_string().contains("REGSYNC_MODE"));
    }

    #[test]
    fn check_needs_desired_file() {
        let config = Config::from_lookup(lookup(&[
            ("HOME", "/root"),
            ("REGSYNC_USER", "acct"),
            ("REGSYNC_PASSWORD", "pw"),
        ]))
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("REGSYNC_DESIRED"));
    }

    #[test]
    fn list_mode_needs_no_desired_file() {
        let config = Config::from_lookup(lookup(&[
            ("REGSYNC_MODE", "list"),
            ("REGSYNC_TLD_CACHE", "memory"),
            ("REGSYNC_USER", "acct"),
            ("REGSYNC_PASSWORD", "pw"),
            ("REGSYNC_FILTER_TLDS", "com, de ,"),
        ]))
        .unwrap();
        config.validate().unwrap();
        assert_eq!(config.filter_tlds, vec!["com".to_string(), "de".to_string()]);
        assert!(matches!(
            config.policy_cache_config().store,
            PolicyCacheStore::Memory
        ));
    }

    #[test]
    fn missing_credentials_rejected() {
        let config = Config::from_lookup(lookup(&[
            ("REGSYNC_MODE", "list"),
            ("REGSYNC_TLD_CACHE", "memory"),
        ]))
        .unwrap();
        assert!(config.validate().unwrap_err().to_string().contains("REGSYNC_USER"));
    }

    #[test]
    fn max_age_out_of_range_rejected() {
        let config = Config::from_lookup(lookup(&[
            ("REGSYNC_MODE", "list"),
            ("REGSYNC_TLD_CACHE", "memory"),
            ("REGSYNC_USER", "acct"),
            ("REGSYNC_PASSWORD", "pw"),
            ("REGSYNC_TLD_CACHE_MAX_AGE_DAYS", "0"),
        ]))
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn password_not_in_debug() {
        let config = Config::from_lookup(lookup(&[
            ("HOME", "/root"),
            ("REGSYNC_USER", "acct"),
            ("REGSYNC_PASSWORD", "hunter2-secret"),
        ]))
        .unwrap();
        assert!(!format!("{:?}", config).contains("hunter2-secret"));
    }

    #[test]
    fn bool_parsing() {
        assert_eq!(parse_bool("Yes"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
