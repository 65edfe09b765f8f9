//! Interactive session over a [`ListHost`].
//!
//! A session is one long foreground phase: it activates the host before
//! reading the first line and deactivates it when input ends, `quit` is
//! entered, a shutdown signal arrives, or reading or writing fails. Positions
//! typed by the user are 1-based.

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::str::FromStr;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;
use tokio_stream::wrappers::LinesStream;
use tokio_stream::StreamExt;

use crate::lifecycle::{ListHost, Phase, SaveOutcome, Transition};
use crate::model::{ListModel, ModelError};
use crate::search::{MapSearch, UrlOpener};
use crate::storage::StoreError;

const HELP: &str = "\
Commands:
  list                   Show the list
  add <name>             Add a restaurant
  edit <n> <name>        Rename restaurant n
  remove <n> [n...]      Remove restaurants
  find                   Map search for a random restaurant
  save                   Write the list to disk now
  reload                 Reload from disk, dropping unsaved changes
  help                   Show this help
  quit                   Save and exit
";

/// Error type for session command parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("`{command}` needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("invalid position: {0} (positions start at 1)")]
    InvalidPosition(String),
}

/// One line of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    List,
    Add(String),
    Edit { position: usize, label: String },
    Remove(Vec<usize>),
    Find,
    Save,
    Reload,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "list" | "ls" => Ok(Self::List),
            "add" => {
                if rest.is_empty() {
                    return Err(CommandParseError::MissingArgument {
                        command: "add",
                        argument: "a name",
                    });
                }
                Ok(Self::Add(rest.to_string()))
            }
            "edit" => {
                let (position, label) = rest.split_once(char::is_whitespace).ok_or(
                    CommandParseError::MissingArgument {
                        command: "edit",
                        argument: "a position and a name",
                    },
                )?;
                Ok(Self::Edit {
                    position: parse_position(position)?,
                    label: label.trim().to_string(),
                })
            }
            "remove" | "rm" => {
                if rest.is_empty() {
                    return Err(CommandParseError::MissingArgument {
                        command: "remove",
                        argument: "at least one position",
                    });
                }
                let positions = rest
                    .split_whitespace()
                    .map(parse_position)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::Remove(positions))
            }
            "find" => Ok(Self::Find),
            "save" => Ok(Self::Save),
            "reload" => Ok(Self::Reload),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandParseError::Unknown(other.to_string())),
        }
    }
}

/// Parse a 1-based position.
pub fn parse_position(s: &str) -> Result<usize, CommandParseError> {
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(CommandParseError::InvalidPosition(s.to_string())),
    }
}

fn index_of(position: usize) -> Result<usize, String> {
    position
        .checked_sub(1)
        .ok_or_else(|| CommandParseError::InvalidPosition(position.to_string()).to_string())
}

fn describe(err: &ModelError) -> String {
    match err {
        ModelError::IndexOutOfRange { index, len } => {
            format!("no restaurant at position {} (list has {len})", index + 1)
        }
        ModelError::EmptyLabel => err.to_string(),
    }
}

/// Render the list with 1-based positions.
pub fn render_list(model: &ListModel) -> String {
    if model.is_empty() {
        return "No restaurants yet.\n".to_string();
    }
    let mut out = String::new();
    for (index, item) in model.iter().enumerate() {
        out.push_str(&format!("{:>3}. {}\n", index + 1, item.short_disc));
    }
    out
}

/// Whether the session should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Interactive session state.
pub struct Session {
    host: ListHost,
    search: MapSearch,
    opener: Option<Box<dyn UrlOpener>>,
    rng: StdRng,
}

impl Session {
    pub fn new(host: ListHost, search: MapSearch) -> Self {
        Self {
            host,
            search,
            opener: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Open found URLs with `opener` instead of only printing them.
    #[must_use]
    pub fn with_opener(mut self, opener: Box<dyn UrlOpener>) -> Self {
        self.opener = Some(opener);
        self
    }

    /// Use a fixed random source.
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn host(&self) -> &ListHost {
        &self.host
    }

    /// Run one command, appending user-facing output to `out`.
    pub fn execute(&mut self, command: SessionCommand, out: &mut String) -> Flow {
        match command {
            SessionCommand::List => out.push_str(&render_list(self.host.model())),
            SessionCommand::Add(label) => match self.host.model_mut().add(label) {
                Ok(item) => out.push_str(&format!("Added {}.\n", item.short_disc)),
                Err(e) => out.push_str(&format!("error: {}\n", describe(&e))),
            },
            SessionCommand::Edit { position, label } => {
                let edited = index_of(position).and_then(|index| {
                    self.host
                        .model_mut()
                        .update_label(index, label)
                        .map(|item| item.short_disc.clone())
                        .map_err(|e| describe(&e))
                });
                match edited {
                    Ok(label) => out.push_str(&format!("{position}. {label}\n")),
                    Err(e) => out.push_str(&format!("error: {e}\n")),
                }
            }
            SessionCommand::Remove(positions) => {
                let removed = positions
                    .into_iter()
                    .map(index_of)
                    .collect::<Result<Vec<_>, _>>()
                    .and_then(|offsets| {
                        self.host
                            .model_mut()
                            .remove_at_offsets(offsets)
                            .map_err(|e| describe(&e))
                    });
                match removed {
                    Ok(removed) => {
                        for item in removed {
                            out.push_str(&format!("Removed {}.\n", item.short_disc));
                        }
                    }
                    Err(e) => out.push_str(&format!("error: {e}\n")),
                }
            }
            SessionCommand::Find => {
                let url = self.search.random_url(self.host.model(), &mut self.rng);
                out.push_str(&format!("{url}\n"));
                if let Some(opener) = &self.opener {
                    if let Err(e) = opener.open_url(&url) {
                        tracing::warn!(error = %e, url, "Failed to open URL");
                        out.push_str(&format!("error: could not open browser: {e}\n"));
                    }
                }
            }
            SessionCommand::Save => {
                // A round trip through the background flushes and reloads.
                report(self.host.phase_changed(Phase::Background), out);
                report(self.host.phase_changed(Phase::Active), out);
            }
            SessionCommand::Reload => {
                report(self.host.on_foreground().map(Transition::Loaded), out);
            }
            SessionCommand::Help => out.push_str(HELP),
            SessionCommand::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Read commands from `input` until it ends, `quit` is entered, or
    /// `shutdown` flips to true.
    ///
    /// The host is activated first and deactivated last on every exit path,
    /// including a read or write error. After such an error the closing
    /// report is only logged and the error is returned.
    pub async fn run<R, W>(
        &mut self,
        input: R,
        output: &mut W,
        shutdown: watch::Receiver<bool>,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut out = String::new();
        report(self.host.phase_changed(Phase::Active), &mut out);
        out.push_str("Type `help` for commands.\n");

        let result = match write_out(output, &mut out).await {
            Ok(()) => self.read_commands(input, output, &mut out, shutdown).await,
            Err(e) => Err(e),
        };

        report(self.host.phase_changed(Phase::Inactive), &mut out);
        match result {
            Ok(()) => write_out(output, &mut out).await,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    pending = out.trim_end(),
                    "Session ended on an I/O error"
                );
                Err(e)
            }
        }
    }

    async fn read_commands<R, W>(
        &mut self,
        input: R,
        output: &mut W,
        out: &mut String,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = LinesStream::new(input.lines());
        let mut signals_open = true;

        loop {
            tokio::select! {
                changed = shutdown.changed(), if signals_open => {
                    if changed.is_err() {
                        signals_open = false;
                    } else if *shutdown.borrow() {
                        tracing::info!("Shutdown requested, ending session");
                        return Ok(());
                    }
                }
                line = lines.next() => {
                    let Some(line) = line else {
                        tracing::debug!("Input closed, ending session");
                        return Ok(());
                    };
                    let line = line.context("failed to read session input")?;
                    if line.trim().is_empty() {
                        continue;
                    }

                    let flow = match line.parse::<SessionCommand>() {
                        Ok(command) => self.execute(command, out),
                        Err(e) => {
                            out.push_str(&format!("error: {e}\n"));
                            Flow::Continue
                        }
                    };
                    write_out(output, out).await?;
                    if flow == Flow::Quit {
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Describe a phase change for the user.
fn report(result: Result<Transition, StoreError>, out: &mut String) {
    match result {
        Ok(Transition::Unchanged) => {}
        Ok(Transition::Loaded(count)) => {
            out.push_str(&format!("Loaded {count} restaurant(s).\n"));
        }
        Ok(Transition::Saved(SaveOutcome::Written(count))) => {
            out.push_str(&format!("Saved {count} restaurant(s).\n"));
        }
        Ok(Transition::Saved(SaveOutcome::Skipped)) => {
            out.push_str("warning: not saved, the list could not be loaded earlier\n");
        }
        Err(e) => out.push_str(&format!("warning: {e}\n")),
    }
}

async fn write_out<W: AsyncWrite + Unpin>(output: &mut W, out: &mut String) -> Result<()> {
    if out.is_empty() {
        return Ok(());
    }
    output
        .write_all(out.as_bytes())
        .await
        .context("failed to write session output")?;
    output.flush().await.context("failed to flush session output")?;
    out.clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Store;
    use tempfile::TempDir;

    fn session_in(dir: &TempDir) -> Session {
        let host = ListHost::new(Store::new(dir.path().join("session.sqlite")));
        Session::new(host, MapSearch::new("http://maps.test/")).with_rng(StdRng::seed_from_u64(3))
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("list".parse::<SessionCommand>(), Ok(SessionCommand::List));
        assert_eq!(
            "add  Pizza Place ".parse::<SessionCommand>(),
            Ok(SessionCommand::Add("Pizza Place".into()))
        );
        assert_eq!(
            "edit 2 Burger Joint".parse::<SessionCommand>(),
            Ok(SessionCommand::Edit {
                position: 2,
                label: "Burger Joint".into()
            })
        );
        assert_eq!("rm 1 3".parse::<SessionCommand>(), Ok(SessionCommand::Remove(vec![1, 3])));
        assert_eq!("QUIT".parse::<SessionCommand>(), Ok(SessionCommand::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "add".parse::<SessionCommand>(),
            Err(CommandParseError::MissingArgument {
                command: "add",
                argument: "a name"
            })
        );
        assert_eq!(
            "edit 2".parse::<SessionCommand>(),
            Err(CommandParseError::MissingArgument {
                command: "edit",
                argument: "a position and a name"
            })
        );
        assert_eq!(
            "remove 0".parse::<SessionCommand>(),
            Err(CommandParseError::InvalidPosition("0".into()))
        );
        assert_eq!(
            "dance".parse::<SessionCommand>(),
            Err(CommandParseError::Unknown("dance".into()))
        );
    }

    #[test]
    fn test_render_list() {
        let mut model = ListModel::new();
        assert_eq!(render_list(&model), "No restaurants yet.\n");

        model.add("A").unwrap();
        model.add("B").unwrap();
        assert_eq!(render_list(&model), "  1. A\n  2. B\n");
    }

    #[test]
    fn test_execute_edits_by_position() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir);
        let mut out = String::new();

        session.execute(SessionCommand::Add("A".into()), &mut out);
        session.execute(SessionCommand::Add("B".into()), &mut out);
        session.execute(
            SessionCommand::Edit {
                position: 2,
                label: "B2".into(),
            },
            &mut out,
        );
        assert_eq!(session.host().model().labels(), vec!["A", "B2"]);

        out.clear();
        session.execute(SessionCommand::Remove(vec![5]), &mut out);
        assert_eq!(out, "error: no restaurant at position 5 (list has 2)\n");

        out.clear();
        session.execute(
            SessionCommand::Edit {
                position: 0,
                label: "X".into(),
            },
            &mut out,
        );
        assert!(out.starts_with("error: invalid position: 0"), "{out}");
    }

    #[test]
    fn test_find_prints_url() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir);
        let mut out = String::new();

        session.execute(SessionCommand::Find, &mut out);
        assert_eq!(out, "http://maps.test/food\n");

        out.clear();
        session.execute(SessionCommand::Add("Curry House".into()), &mut out);
        out.clear();
        session.execute(SessionCommand::Find, &mut out);
        assert_eq!(out, "http://maps.test/Curry+House+restaurant\n");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir);
        let mut out = String::new();
        report(session.host.phase_changed(Phase::Active), &mut out);

        session.execute(SessionCommand::Add("Kept".into()), &mut out);
        out.clear();
        session.execute(SessionCommand::Save, &mut out);
        assert_eq!(out, "Saved 1 restaurant(s).\nLoaded 1 restaurant(s).\n");

        session.execute(SessionCommand::Add("Dropped".into()), &mut out);
        out.clear();
        session.execute(SessionCommand::Reload, &mut out);
        assert_eq!(out, "Loaded 1 restaurant(s).\n");
        assert_eq!(session.host().model().labels(), vec!["Kept"]);
    }

    #[test]
    fn test_quit_stops() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir);
        let mut out = String::new();
        assert_eq!(session.execute(SessionCommand::Quit, &mut out), Flow::Quit);
    }

    #[tokio::test]
    async fn test_run_saves_on_end_of_input() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir);
        let (_tx, rx) = watch::channel(false);
        let input: &[u8] = b"add Pizza Place\nlist\n";
        let mut output = Vec::new();

        session.run(input, &mut output, rx).await.unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("Loaded 0 restaurant(s)."), "{text}");
        assert!(text.contains("  1. Pizza Place\n"), "{text}");
        assert!(text.ends_with("Saved 1 restaurant(s).\n"), "{text}");

        let stored = session.host().store().load().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].short_disc, "Pizza Place");
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown_signal() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir);

        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();
        // Input that never ends on its own.
        let (reader, _writer) = tokio::io::duplex(64);
        let mut output = Vec::new();

        session
            .run(tokio::io::BufReader::new(reader), &mut output, rx)
            .await
            .unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.ends_with("Saved 0 restaurant(s).\n"), "{text}");
    }
}
