//! List, add, edit and remove commands.

use anyhow::{Context, Result};
use restolist::config::Config;
use restolist::model::ListModel;
use restolist::session::render_list;
use serde::Serialize;

use super::{activate, deactivate};
use crate::OutputFormat;

#[derive(Serialize)]
struct ItemInfo<'a> {
    position: usize,
    name: &'a str,
}

#[derive(Serialize)]
struct ItemsOutput<'a> {
    items: Vec<ItemInfo<'a>>,
    total: usize,
}

fn print_list(model: &ListModel, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render_list(model)),
        OutputFormat::Json => {
            let output = ItemsOutput {
                items: model
                    .iter()
                    .enumerate()
                    .map(|(index, item)| ItemInfo {
                        position: index + 1,
                        name: &item.short_disc,
                    })
                    .collect(),
                total: model.len(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn index_of(position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .context("positions start at 1")
}

pub fn list(config: &Config, format: OutputFormat) -> Result<()> {
    let host = activate(config)?;
    print_list(host.model(), format)?;
    deactivate(host)?;
    Ok(())
}

pub fn add(config: &Config, name: String, format: OutputFormat) -> Result<()> {
    let mut host = activate(config)?;
    host.model_mut()
        .add(name)
        .context("failed to add restaurant")?;
    print_list(host.model(), format)?;
    deactivate(host)?;
    Ok(())
}

pub fn edit(config: &Config, position: usize, name: String, format: OutputFormat) -> Result<()> {
    let mut host = activate(config)?;
    host.model_mut()
        .update_label(index_of(position)?, name)
        .with_context(|| format!("failed to edit restaurant {position}"))?;
    print_list(host.model(), format)?;
    deactivate(host)?;
    Ok(())
}

pub fn remove(config: &Config, positions: &[usize], format: OutputFormat) -> Result<()> {
    let mut host = activate(config)?;
    let offsets = positions
        .iter()
        .map(|&p| index_of(p))
        .collect::<Result<Vec<_>>>()?;
    host.model_mut()
        .remove_at_offsets(offsets)
        .context("failed to remove restaurants")?;
    print_list(host.model(), format)?;
    deactivate(host)?;
    Ok(())
}
