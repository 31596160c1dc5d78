use anyhow::Result;

/// Resolve on the first termination signal (SIGTERM/SIGINT, or Ctrl+C elsewhere).
pub async fn wait_for_shutdown() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::select! {
            _ = sigterm.recv() => tracing::info!("shutdown: SIGTERM received"),
            _ = sigint.recv()  => tracing::info!("shutdown: SIGINT received"),
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        tracing::info!("shutdown: Ctrl+C received");
        Ok(())
    }
}
