//! One-off syncs and the sync interval preference

use tokio_util::sync::CancellationToken;

use super::common::{AppContext, LocalWearable};
use crate::sync::SyncStats;
use crate::Result;

/// Run a manual sync of one account, or of every account.
pub async fn handle_sync(ctx: &AppContext, account: Option<&str>) -> Result<SyncStats> {
    let (wearable, _requests) = LocalWearable::connect();
    let adapter = ctx.sync_adapter(&wearable);
    let cancel = CancellationToken::new();

    let mut stats = SyncStats::default();
    for account in ctx.select_accounts(account)? {
        stats += adapter.on_perform_sync(&account, true, &cancel).await;
    }
    print_stats(&stats);
    Ok(stats)
}

/// Store the periodic sync interval used by `run`.
pub fn handle_set_sync_interval(ctx: &AppContext, interval_sec: u64) -> Result<()> {
    ctx.preferences.set_sync_interval_sec(interval_sec)?;
    println!("✓ Sync interval set to {interval_sec}s");
    Ok(())
}

pub(crate) fn print_stats(stats: &SyncStats) {
    println!("Leagues updated: {}", stats.num_updates);
    if stats.has_error() {
        println!(
            "Errors: {} parse, {} auth, {} I/O",
            stats.num_parse_exceptions, stats.num_auth_exceptions, stats.num_io_exceptions
        );
    }
}
