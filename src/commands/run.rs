//! Long-running sync service

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::common::{AppContext, LocalWearable};
use super::sync::print_stats;
use crate::sync::run_sync_loop;
use crate::Result;

/// Sync on the periodic schedule and on wearable requests until Ctrl-C.
pub async fn handle_run(ctx: &AppContext) -> Result<()> {
    let (wearable, requests) = LocalWearable::connect();
    let adapter = ctx.sync_adapter(&wearable);
    let cancel = CancellationToken::new();

    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutting down"),
            Err(e) => error!(error = %e, "Unable to listen for Ctrl-C"),
        }
        shutdown.cancel();
    });

    println!("Syncing every {}s; press Ctrl-C to stop.", ctx.preferences.sync_interval_sec());
    let stats = run_sync_loop(&adapter, requests, &cancel).await;
    print_stats(&stats);
    Ok(())
}
