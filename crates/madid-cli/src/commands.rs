use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::Utc;
use colored::Colorize;
use madid_cookies::{Cookie, CookieStore, HttpContext};
use madid_crypto::IdentityHasher;
use madid_tracking::{DeviceCookieConfig, MultiUserDeviceResolver, Resolution};
use madid_types::{DeviceId, FixedClock, TrackedEvent, VisitorIdentifier};
use serde::Serialize;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Hash(args) => cmd_hash(args, cli.format),
        Command::Resolve(args) => cmd_resolve(args, cli.format),
        Command::Config(args) => cmd_config(args, cli.format),
    }
}

fn cmd_hash(args: HashArgs, format: OutputFormat) -> anyhow::Result<()> {
    let hash = IdentityHasher.hash(&VisitorIdentifier::new(args.identifier));
    match format {
        OutputFormat::Text => println!("{}", hash.to_hex()),
        OutputFormat::Json => println!("{}", serde_json::json!({ "device_id": hash.to_hex() })),
    }
    Ok(())
}

fn cmd_resolve(args: ResolveArgs, format: OutputFormat) -> anyhow::Result<()> {
    let report = resolve(&args)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            let device = report.device_id.as_deref().unwrap_or("-");
            println!("{} {} device {}", "✓".green().bold(), report.path.bold(), device.cyan());
            if report.response_cookies.is_empty() {
                println!("  No cookies written.");
            }
            for cookie in &report.response_cookies {
                println!(
                    "  Set-Cookie {}={} (expires {})",
                    cookie.name.yellow(),
                    cookie.value,
                    cookie.expires_at.to_rfc3339().dimmed()
                );
            }
        }
    }
    Ok(())
}

fn cmd_config(args: ConfigArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    print!("{}", render_config(&config, format)?);
    Ok(())
}

/// The effective configuration as TOML (text) or pretty JSON.
fn render_config(config: &DeviceCookieConfig, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Text => config.to_toml_string()?,
        OutputFormat::Json => serde_json::to_string_pretty(config)? + "\n",
    })
}

/// Result of one simulated resolution, as printed by `madid resolve`.
#[derive(Debug, Serialize)]
pub struct ResolveReport {
    pub path: &'static str,
    pub device_id: Option<String>,
    pub request_cookies: Vec<Cookie>,
    pub response_cookies: Vec<Cookie>,
}

pub fn resolve(args: &ResolveArgs) -> anyhow::Result<ResolveReport> {
    let config = load_config(args.config.as_deref())?;
    let clock = Arc::new(FixedClock::new(Utc::now()));

    let mut inbound = Vec::with_capacity(args.cookies.len());
    for raw in &args.cookies {
        let (name, value) = parse_cookie_arg(raw)?;
        inbound.push(Cookie::with_retention(
            name,
            value.into_string(),
            Utc::now(),
            config.retention(),
        )?);
    }
    let context = HttpContext::with_request_cookies(inbound);

    let mut event = TrackedEvent::new("cli");
    if let Some(identifier) = &args.identifier {
        event = event.with_identifier(identifier.as_str());
    }

    let resolver = MultiUserDeviceResolver::new(context.clone(), config)?.with_clock(clock);
    let resolution = resolver.resolve(&event)?;

    Ok(ResolveReport {
        path: match resolution {
            Resolution::NoContext => "none",
            Resolution::Anonymous { .. } => "anonymous",
            Resolution::Identified { .. } => "identified",
        },
        device_id: resolution.device_id().map(|id| id.to_string()),
        request_cookies: context.request().snapshot()?,
        response_cookies: context.response().snapshot()?,
    })
}

fn load_config(path: Option<&Path>) -> anyhow::Result<DeviceCookieConfig> {
    let Some(path) = path else {
        return Ok(DeviceCookieConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    DeviceCookieConfig::from_toml_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))
}

/// Split a `NAME=VALUE` argument. The value must be usable as a cookie
/// value without further encoding.
fn parse_cookie_arg(raw: &str) -> anyhow::Result<(&str, DeviceId)> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            let value = DeviceId::parse(value).with_context(|| format!("cookie {raw:?}"))?;
            Ok((name.trim(), value))
        }
        _ => bail!("cookie must be NAME=VALUE, got {raw:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ALICE_HEX: &str = "ff8d9819fc0e12bf0d24892e45987e249a28dce836a85cad60e28eaaa8c6d976";

    fn args(identifier: Option<&str>, cookies: &[&str]) -> ResolveArgs {
        ResolveArgs {
            identifier: identifier.map(Into::into),
            cookies: cookies.iter().map(|c| c.to_string()).collect(),
            config: None,
        }
    }

    #[test]
    fn resolve_fresh_anonymous() {
        let report = resolve(&args(None, &[])).unwrap();
        assert_eq!(report.path, "anonymous");
        assert_eq!(report.response_cookies.len(), 2);
        let device = report.device_id.unwrap();
        assert!(report.response_cookies.iter().all(|c| c.value == device));
    }

    #[test]
    fn resolve_identified() {
        let report = resolve(&args(
            Some("alice@example.com"),
            &["_madid_anonymous=abc-123", "_madid=abc-123"],
        ))
        .unwrap();
        assert_eq!(report.path, "identified");
        assert_eq!(report.device_id.as_deref(), Some(ALICE_HEX));
        assert_eq!(report.response_cookies.len(), 1);
        assert_eq!(report.response_cookies[0].name, "_madid");
    }

    #[test]
    fn resolve_steady_anonymous_writes_nothing() {
        let report = resolve(&args(None, &["_madid_anonymous=abc-123", "_madid=abc-123"])).unwrap();
        assert_eq!(report.device_id.as_deref(), Some("abc-123"));
        assert!(report.response_cookies.is_empty());
        assert_eq!(report.request_cookies.len(), 2);
    }

    #[test]
    fn resolve_with_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "device_cookie_name = \"dev\"\nretention_days = 7").unwrap();

        let mut a = args(Some("alice@example.com"), &[]);
        a.config = Some(file.path().to_path_buf());
        let report = resolve(&a).unwrap();

        let cookie = &report.response_cookies[0];
        assert_eq!(cookie.name, "dev");
        assert_eq!(cookie.value, ALICE_HEX);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(dir.path().join("absent.toml").as_path())).unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }

    #[test]
    fn invalid_config_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "retention_days = 0").unwrap();
        assert!(load_config(Some(file.path())).is_err());
    }

    #[test]
    fn cookie_args() {
        let (name, value) = parse_cookie_arg("_madid=abc").unwrap();
        assert_eq!((name, value.as_str()), ("_madid", "abc"));
        let (name, value) = parse_cookie_arg("a=b=c").unwrap();
        assert_eq!((name, value.as_str()), ("a", "b=c"));
        assert!(parse_cookie_arg("novalue").is_err());
        assert!(parse_cookie_arg("=abc").is_err());
    }

    #[test]
    fn cookie_args_reject_unsafe_values() {
        for raw in ["a=", "a=x y", "a=x;y", "a=\"x\""] {
            let err = parse_cookie_arg(raw).unwrap_err();
            assert!(format!("{err:#}").contains("invalid device id"), "{raw:?}: {err:#}");
        }
        assert!(resolve(&args(None, &["_madid_anonymous=a;b"])).is_err());
    }

    #[test]
    fn config_renders_as_toml_or_json() {
        let config = DeviceCookieConfig::default();

        let toml = render_config(&config, OutputFormat::Text).unwrap();
        assert!(toml.contains("device_cookie_name = \"_madid\""));

        let json = render_config(&config, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["anonymous_cookie_name"], "_madid_anonymous");
        assert_eq!(value["retention_days"], 365);
        assert_eq!(value["sort_order"], 2000);
    }
}
