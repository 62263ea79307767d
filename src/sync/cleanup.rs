//! Removal of state left behind by deleted accounts.

use std::collections::HashSet;
use tracing::{debug, info};

use crate::protocol::{league_data, WearTransport};
use crate::storage::{Account, Store};
use crate::Result;

/// Drop token rows (and their leagues) for accounts not in `current_accounts`, then
/// delete data items that aren't league updates for a current account. Returns
/// the number of data items deleted.
pub async fn clean_unused_accounts(
    store: &Store,
    transport: &dyn WearTransport,
    current_accounts: &[Account],
) -> Result<usize> {
    let removed_tokens = store.clean_unused_tokens(current_accounts)?;
    if removed_tokens > 0 {
        info!(removed_tokens, "Removed tokens for deleted accounts");
    }

    let account_names: HashSet<String> =
        current_accounts.iter().map(|a| a.name.clone()).collect();
    let mut deleted = 0;
    for item in transport.data_items().await? {
        if !league_data::is_active_league_item(&item, &account_names) {
            debug!(path = %item.path, "Deleting stale data item");
            deleted += transport.delete_data_items(&item.path).await?;
        }
    }
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oauth::Token;
    use crate::protocol::{DataItem, DataMap, PairedDataLayer};
    use crate::storage::League;

    fn item(path: &str) -> DataItem {
        DataItem {
            path: path.to_string(),
            data_map: DataMap::new(),
        }
    }

    #[tokio::test]
    async fn test_removes_stale_tokens_and_items() {
        let store = Store::new_in_memory().unwrap();
        let kept = Account::new("kept");
        let gone = Account::new("gone");
        store.add_account(&kept, &Token::default()).unwrap();
        store.add_account(&gone, &Token::default()).unwrap();
        store
            .update_leagues(&gone, &[League::new("gone", "nfl.l.9", "Old")])
            .unwrap();

        let layer = PairedDataLayer::new();
        let host = layer.host();
        host.put_data_item(item("league/kept/nfl.l.1")).await.unwrap();
        host.put_data_item(item("league/gone/nfl.l.9")).await.unwrap();
        host.put_data_item(item("something/else")).await.unwrap();

        let deleted = clean_unused_accounts(&store, &host, &[kept.clone()])
            .await
            .unwrap();

        assert_eq!(deleted, 2);
        assert_eq!(store.accounts().unwrap(), vec![kept]);
        assert!(store.all_leagues().unwrap().is_empty());
        let remaining: Vec<String> = host
            .data_items()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.path)
            .collect();
        assert_eq!(remaining, vec!["league/kept/nfl.l.1".to_string()]);
    }
}
