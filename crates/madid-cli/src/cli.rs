use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "madid",
    about = "Multi-user device identity — inspect how tracking cookies resolve",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the device id an identified visitor is tracked under
    Hash(HashArgs),
    /// Resolve the device cookies for one simulated tracked event
    Resolve(ResolveArgs),
    /// Print the effective resolver configuration as TOML
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct HashArgs {
    /// Visitor identifier, hashed exactly as given
    pub identifier: String,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Identifier of the signed-in visitor; omit for an anonymous event
    #[arg(short, long)]
    pub identifier: Option<String>,
    /// Inbound request cookie, as NAME=VALUE (repeatable)
    #[arg(short, long = "cookie")]
    pub cookies: Vec<String>,
    /// TOML file overriding cookie names, retention or sort order
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// TOML file to load before printing
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hash() {
        let cli = Cli::try_parse_from(["madid", "hash", "alice@example.com"]).unwrap();
        if let Command::Hash(args) = cli.command {
            assert_eq!(args.identifier, "alice@example.com");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_resolve_anonymous() {
        let cli = Cli::try_parse_from(["madid", "resolve"]).unwrap();
        if let Command::Resolve(args) = cli.command {
            assert!(args.identifier.is_none());
            assert!(args.cookies.is_empty());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_resolve_with_cookies() {
        let cli = Cli::try_parse_from([
            "madid", "resolve", "-i", "bob@example.com",
            "--cookie", "_madid=abc", "-c", "_madid_anonymous=abc",
        ]).unwrap();
        if let Command::Resolve(args) = cli.command {
            assert_eq!(args.identifier, Some("bob@example.com".into()));
            assert_eq!(args.cookies, vec!["_madid=abc", "_madid_anonymous=abc"]);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::try_parse_from(["madid", "config", "--format", "json", "-v"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Command::Config(_)));
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::try_parse_from(["madid", "config", "--config", "madid.toml"]).unwrap();
        if let Command::Config(args) = cli.command {
            assert_eq!(args.config, Some(PathBuf::from("madid.toml")));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn hash_requires_identifier() {
        assert!(Cli::try_parse_from(["madid", "hash"]).is_err());
    }
}
