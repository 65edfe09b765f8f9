//! Find command implementation.

use anyhow::{Context, Result};
use restolist::config::Config;
use restolist::model::Item;
use restolist::search::{SystemOpener, UrlOpener};
use serde::Serialize;

use super::{activate, deactivate};
use crate::OutputFormat;

#[derive(Serialize)]
struct FindOutput<'a> {
    url: &'a str,
    picked: Option<&'a Item>,
}

pub fn run(config: &Config, open: bool, format: OutputFormat) -> Result<()> {
    let host = activate(config)?;
    let search = config.map_search();

    let picked = search.pick(host.model(), &mut rand::thread_rng());
    let url = search.url_for(picked.map(|i| i.short_disc.as_str()));

    match format {
        OutputFormat::Text => println!("{url}"),
        OutputFormat::Json => {
            let output = FindOutput { url: &url, picked };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    if open {
        SystemOpener
            .open_url(&url)
            .with_context(|| format!("failed to open {url}"))?;
    }

    deactivate(host)?;
    Ok(())
}
