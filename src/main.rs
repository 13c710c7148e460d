mod app;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use url::Url;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();
    app::run(cli)
}

#[derive(Debug, Parser)]
#[command(version, about = "Send letters to Santa and print his replies")]
pub struct Cli {
    /// TOML file with fetcher settings; later files override earlier ones
    #[arg(short, long = "config", global = true)]
    pub config: Vec<PathBuf>,
    /// Reply generator the letters are posted to
    #[arg(long, env = "EMAILSANTA_ENDPOINT", global = true)]
    pub endpoint: Option<Url>,
    /// Seconds to wait for a reply page
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send letters (JSON files) and print the replies
    Send {
        #[arg(required = true)]
        letters: Vec<PathBuf>,
        /// Print the raw reply page instead of the extracted text
        #[arg(long)]
        raw: bool,
    },
    /// Validate letters without sending them
    Check {
        #[arg(required = true)]
        letters: Vec<PathBuf>,
    },
    /// Extract the reply text from a saved reply page
    Extract { page: PathBuf },
}

fn init_tracing() {
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(EnvFilter::from_default_env()))
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_send() {
        let cli = Cli::try_parse_from([
            "emailsanta",
            "send",
            "alex.json",
            "sam.json",
            "--raw",
            "--endpoint",
            "http://127.0.0.1:8080/reply",
        ])
        .unwrap();

        assert_eq!(cli.endpoint.unwrap().as_str(), "http://127.0.0.1:8080/reply");
        match cli.command {
            Command::Send { letters, raw } => {
                assert_eq!(letters, [PathBuf::from("alex.json"), PathBuf::from("sam.json")]);
                assert!(raw);
            }
            command => panic!("unexpected command {command:?}"),
        }
    }

    #[test]
    fn send_requires_letters() {
        assert!(Cli::try_parse_from(["emailsanta", "send"]).is_err());
    }
}
