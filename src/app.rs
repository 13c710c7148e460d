use std::{fs, path::Path};

use anyhow::Context;
use emailsanta::{extract, FetcherConfig, Letter, ReplyFetcher};
use tracing::info;

use crate::{Cli, Command};

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = emailsanta::config::load(&cli.config).context("Failed to load config")?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = Some(timeout);
    }

    match cli.command {
        Command::Send { letters, raw } => send(config, &letters, raw),
        Command::Check { letters } => check(&letters),
        Command::Extract { page } => extract_page(&config, &page),
    }
}

fn send(config: FetcherConfig, paths: &[impl AsRef<Path>], raw: bool) -> anyhow::Result<()> {
    let letters = paths
        .iter()
        .map(read_letter)
        .collect::<anyhow::Result<Vec<_>>>()?;

    let fetcher = ReplyFetcher::new(config).context("Failed to set up the http client")?;
    info!(count = letters.len(), endpoint = %fetcher.config().endpoint, "sending letters");

    for (path, reply) in paths.iter().zip(fetcher.fetch_all(&letters)) {
        let path = path.as_ref();
        let reply =
            reply.with_context(|| format!("Failed to send the letter at {}", path.display()))?;
        if paths.len() > 1 {
            println!("==> {} <==", path.display());
        }
        if raw {
            println!("{}", reply.raw().body);
        } else {
            println!("{}\n", reply.text());
        }
    }

    Ok(())
}

fn check(paths: &[impl AsRef<Path>]) -> anyhow::Result<()> {
    for path in paths {
        let letter = read_letter(path)?;
        println!(
            "{}: ok (from {}, {})",
            path.as_ref().display(),
            letter.first_name(),
            letter.city()
        );
    }
    Ok(())
}

fn extract_page(config: &FetcherConfig, path: &Path) -> anyhow::Result<()> {
    let html = fs::read_to_string(path)
        .with_context(|| format!("Failed to read reply page at {}", path.display()))?;
    println!("{}", extract::reply_text(&html, config.wrap_width));
    Ok(())
}

fn read_letter(path: impl AsRef<Path>) -> anyhow::Result<Letter> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read letter at {}", path.display()))?;
    let value = serde_json::from_str::<serde_json::Value>(&content)
        .with_context(|| format!("Letter at {} is not valid JSON", path.display()))?;
    Letter::from_json(&value).with_context(|| format!("Invalid letter at {}", path.display()))
}
