//! Interactive session command.
//!
//! Ctrl+C and SIGTERM end the session through the same path as `quit`, so
//! the list is saved before the process exits.

use anyhow::Result;
use restolist::config::Config;
use restolist::lifecycle::ListHost;
use restolist::search::SystemOpener;
use restolist::session::Session;
use tokio::io::BufReader;
use tokio::sync::watch;

pub async fn run(config: &Config, open: bool) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(sigterm) => sigterm,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                    let _ = ctrl_c.await;
                    let _ = shutdown_tx.send(true);
                    return;
                }
            };

            tokio::select! {
                _ = ctrl_c => {
                    tracing::info!("Received SIGINT (Ctrl+C), ending session...");
                }
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, ending session...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            if ctrl_c.await.is_ok() {
                tracing::info!("Received Ctrl+C, ending session...");
            }
        }

        let _ = shutdown_tx.send(true);
    });

    let mut session = Session::new(ListHost::new(config.store()), config.map_search());
    if open {
        session = session.with_opener(Box::new(SystemOpener));
    }

    let mut stdout = tokio::io::stdout();
    session
        .run(BufReader::new(tokio::io::stdin()), &mut stdout, shutdown_rx)
        .await?;

    tracing::debug!(
        remaining = session.host().model().len(),
        "Session complete"
    );
    Ok(())
}
