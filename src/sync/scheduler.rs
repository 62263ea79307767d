//! Periodic and on-demand sync loop.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::adapter::SyncAdapter;
use super::listener::SyncRequest;
use super::stats::SyncStats;

/// Sync due accounts on their periodic interval and every account on request,
/// until `cancel` fires. Returns the totals across all passes.
pub async fn run_sync_loop(
    adapter: &SyncAdapter,
    mut requests: mpsc::UnboundedReceiver<SyncRequest>,
    cancel: &CancellationToken,
) -> SyncStats {
    let mut totals = SyncStats::default();
    let mut requests_open = true;
    loop {
        let delay = match adapter.next_sync_delay() {
            Ok(delay) => delay,
            Err(e) => {
                error!(error = %e, "Unable to compute next sync time");
                totals.record_error(&e);
                break;
            }
        };
        debug!(delay_sec = delay.as_secs(), "Waiting for next sync");

        tokio::select! {
            _ = cancel.cancelled() => break,
            request = requests.recv(), if requests_open => match request {
                Some(SyncRequest::Manual) => {
                    info!("Manual sync requested");
                    totals += adapter.sync_all(true, cancel).await;
                }
                None => requests_open = false,
            },
            _ = tokio::time::sleep(delay) => {
                let due = match adapter.due_accounts() {
                    Ok(due) => due,
                    Err(e) => {
                        error!(error = %e, "Unable to list due accounts");
                        totals.record_error(&e);
                        continue;
                    }
                };
                for account in &due {
                    totals += adapter.on_perform_sync(account, false, cancel).await;
                }
            }
        }
    }
    info!(
        updates = totals.num_updates,
        parse_errors = totals.num_parse_exceptions,
        auth_errors = totals.num_auth_exceptions,
        io_errors = totals.num_io_exceptions,
        "Sync loop stopped"
    );
    totals
}
