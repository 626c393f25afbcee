//! Ctrl+C handling for a running replay

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::bounded;

use crate::error::{ReplayError, Result};

/// Clear `running` when Ctrl+C is pressed.
///
/// The handler is registered before this returns. It lives on its own
/// thread with a single-threaded tokio runtime and fires at most once.
pub fn stop_on_ctrl_c(running: Arc<AtomicBool>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let (ready_tx, ready_rx) = bounded::<std::io::Result<()>>(1);

    std::thread::Builder::new()
        .name("ctrl-c".to_string())
        .spawn(move || {
            runtime.block_on(async move {
                let ctrl_c = tokio::signal::ctrl_c();
                tokio::pin!(ctrl_c);

                // The first poll installs the handler
                let early = tokio::select! {
                    biased;
                    result = &mut ctrl_c => Some(result),
                    _ = std::future::ready(()) => None,
                };
                let result = match early {
                    Some(Err(e)) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                    Some(Ok(())) => {
                        let _ = ready_tx.send(Ok(()));
                        Ok(())
                    }
                    None => {
                        let _ = ready_tx.send(Ok(()));
                        ctrl_c.await
                    }
                };

                match result {
                    Ok(()) => {
                        tracing::warn!("Ctrl+C received, stopping replay");
                        running.store(false, Ordering::SeqCst);
                    }
                    Err(e) => tracing::error!("Ctrl+C handler failed: {}", e),
                }
            });
        })?;

    match ready_rx.recv() {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(ReplayError::Io(e)),
        Err(_) => Err(ReplayError::Io(std::io::Error::other(
            "Ctrl+C handler thread exited during setup",
        ))),
    }
}
