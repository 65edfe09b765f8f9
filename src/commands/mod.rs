//! Subcommand implementations.
//!
//! Every one-shot command is a full lifecycle cycle: activate (load), act,
//! deactivate (save).

pub mod find;
pub mod items;
pub mod session;

use anyhow::{bail, Context, Result};
use restolist::config::Config;
use restolist::lifecycle::{ListHost, Phase, SaveOutcome, Transition};

/// Build a host for `config` and bring it to the foreground.
fn activate(config: &Config) -> Result<ListHost> {
    let mut host = ListHost::new(config.store());
    host.phase_changed(Phase::Active)
        .with_context(|| format!("failed to load {}", config.db_path().display()))?;
    Ok(host)
}

/// Send the host to the background, flushing the list.
fn deactivate(mut host: ListHost) -> Result<usize> {
    let transition = host
        .phase_changed(Phase::Inactive)
        .with_context(|| format!("failed to save {}", host.store().path().display()))?;

    match transition {
        Transition::Saved(SaveOutcome::Written(count)) => Ok(count),
        Transition::Saved(SaveOutcome::Skipped) => bail!("list was not saved"),
        other => bail!("unexpected lifecycle transition: {other:?}"),
    }
}
