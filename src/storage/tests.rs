//! Unit tests for storage functionality

use super::*;
use crate::oauth::{AccountStore, Token, TokenInvalidator};
use tempfile::TempDir;

fn create_test_db() -> FantasyWearDatabase {
    FantasyWearDatabase::new_in_memory().unwrap()
}

fn token(name: &str) -> Token {
    Token {
        token: format!("{name}-token"),
        token_secret: format!("{name}-secret"),
        session_handle: format!("{name}-handle"),
        expiration_time_sec: Some(100),
        authorization_expiration_time_sec: Some(200),
        ..Token::default()
    }
}

fn create_test_db_with_accounts() -> FantasyWearDatabase {
    let mut db = create_test_db();
    db.insert_token(&Account::new("A"), &token("A")).unwrap();
    db.insert_token(&Account::new("B"), &token("B")).unwrap();
    db
}

#[cfg(test)]
mod token_tests {
    use super::*;

    #[test]
    fn test_missing_account_has_empty_token() {
        let db = create_test_db();
        assert_eq!(db.get_token(&Account::new("nobody")).unwrap(), Token::default());
    }

    #[test]
    fn test_insert_and_get_token() {
        let db = create_test_db_with_accounts();
        // Only persisted columns come back
        assert_eq!(db.get_token(&Account::new("A")).unwrap(), token("A"));
    }

    #[test]
    fn test_update_token() {
        let mut db = create_test_db_with_accounts();
        let refreshed = Token {
            token: "new".to_string(),
            expiration_time_sec: Some(500),
            ..token("A")
        };
        assert!(db.update_token(&Account::new("A"), &refreshed).unwrap());
        assert_eq!(db.get_token(&Account::new("A")).unwrap(), refreshed);
        assert!(!db.update_token(&Account::new("C"), &refreshed).unwrap());
    }

    #[test]
    fn test_invalidate_token_only_when_matching() {
        let mut db = create_test_db_with_accounts();
        let account = Account::new("A");

        let stale = Token {
            token: "old".to_string(),
            ..token("A")
        };
        assert!(!db.invalidate_token(&account, &stale).unwrap());
        assert_eq!(db.get_token(&account).unwrap().expiration_time_sec, Some(100));

        assert!(db.invalidate_token(&account, &token("A")).unwrap());
        let invalidated = db.get_token(&account).unwrap();
        assert_eq!(invalidated.expiration_time_sec, Some(0));
        assert_eq!(invalidated.authorization_expiration_time_sec, Some(200));
    }

    #[test]
    fn test_null_expiry_reads_as_none() {
        let db = create_test_db();
        db.conn
            .execute("INSERT INTO tokens (account_name) VALUES ('bare')", [])
            .unwrap();
        let token = db.get_token(&Account::new("bare")).unwrap();
        assert_eq!(token.expiration_time_sec, None);
        assert_eq!(token.authorization_expiration_time_sec, None);
        assert_eq!(db.get_last_sync_time_sec(&Account::new("bare")).unwrap(), 0);
    }

    #[test]
    fn test_last_sync_time() {
        let mut db = create_test_db_with_accounts();
        let account = Account::new("A");
        assert_eq!(db.get_last_sync_time_sec(&account).unwrap(), 0);
        db.set_last_sync_time_sec(&account, 12345).unwrap();
        assert_eq!(db.get_last_sync_time_sec(&account).unwrap(), 12345);
        assert_eq!(db.get_last_sync_time_sec(&Account::new("B")).unwrap(), 0);
        assert_eq!(db.get_last_sync_time_sec(&Account::new("C")).unwrap(), 0);
    }

    #[test]
    fn test_account_names_sorted() {
        let mut db = create_test_db();
        for name in ["c", "a", "b"] {
            db.insert_token(&Account::new(name), &Token::default()).unwrap();
        }
        assert_eq!(db.account_names().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_clean_unused_tokens() {
        let mut db = create_test_db_with_accounts();
        assert_eq!(db.clean_unused_tokens(&[Account::new("A")]).unwrap(), 1);
        assert_eq!(db.account_names().unwrap(), vec!["A"]);
        assert_eq!(db.clean_unused_tokens(&[]).unwrap(), 1);
        assert!(db.account_names().unwrap().is_empty());
    }
}

#[cfg(test)]
mod league_tests {
    use super::*;

    #[test]
    fn test_update_leagues_replaces_stale_rows() {
        let mut db = create_test_db_with_accounts();
        let a = Account::new("A");
        let b = Account::new("B");
        db.update_leagues(&b, &[League::new("B", "1", "Other")]).unwrap();

        db.update_leagues(&a, &[League::new("A", "1", "One"), League::new("A", "2", "Two")])
            .unwrap();
        db.update_leagues(&a, &[League::new("A", "1", "One"), League::new("A", "3", "Three")])
            .unwrap();

        assert_eq!(
            db.get_leagues(&a).unwrap(),
            vec![League::new("A", "1", "One"), League::new("A", "3", "Three")]
        );
        assert_eq!(db.get_leagues(&b).unwrap(), vec![League::new("B", "1", "Other")]);
    }

    #[test]
    fn test_update_with_no_leagues_clears_account() {
        let mut db = create_test_db_with_accounts();
        let a = Account::new("A");
        db.update_leagues(&a, &[League::new("A", "1", "One")]).unwrap();
        db.update_leagues(&a, &[]).unwrap();
        assert!(db.get_leagues(&a).unwrap().is_empty());
    }

    #[test]
    fn test_update_leagues_uses_account_argument() {
        let mut db = create_test_db_with_accounts();
        let a = Account::new("A");
        db.update_leagues(&a, &[League::new("", "9", "Nine")]).unwrap();
        assert_eq!(db.get_leagues(&a).unwrap(), vec![League::new("A", "9", "Nine")]);
    }

    #[test]
    fn test_leagues_require_account() {
        let mut db = create_test_db();
        let result = db.update_leagues(&Account::new("ghost"), &[League::new("ghost", "1", "x")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_delete_token_cascades_to_own_leagues() {
        let mut db = create_test_db_with_accounts();
        let a = Account::new("A");
        let b = Account::new("B");
        db.update_leagues(&a, &[League::new("A", "1", "One")]).unwrap();
        db.update_leagues(&b, &[League::new("B", "1", "Other")]).unwrap();

        assert!(db.delete_token(&a).unwrap());
        assert!(db.get_leagues(&a).unwrap().is_empty());
        assert_eq!(db.get_all_leagues().unwrap(), vec![League::new("B", "1", "Other")]);
    }

    #[test]
    fn test_clear_leagues() {
        let mut db = create_test_db_with_accounts();
        db.update_leagues(&Account::new("A"), &[League::new("A", "1", "One")])
            .unwrap();
        db.clear_leagues().unwrap();
        assert!(db.get_all_leagues().unwrap().is_empty());
    }
}

#[cfg(test)]
mod store_tests {
    use super::*;

    #[test]
    fn test_accounts_follow_token_rows() {
        let store = Store::new_in_memory().unwrap();
        assert!(store.accounts().unwrap().is_empty());
        store.add_account(&Account::new("G1"), &token("G1")).unwrap();
        assert_eq!(store.accounts().unwrap(), vec![Account::new("G1")]);
        assert!(store.find_account("G1").unwrap().is_some());

        AccountStore::remove_account(&store, &Account::new("G1")).unwrap();
        assert!(store.accounts().unwrap().is_empty());
        assert!(store.find_account("G1").unwrap().is_none());
    }

    #[test]
    fn test_store_trait_impls() {
        let store = Store::new_in_memory().unwrap();
        let account = Account::new("G1");
        store.add_account(&account, &token("G1")).unwrap();

        TokenInvalidator::invalidate_token(&store, &account, &token("G1")).unwrap();
        assert_eq!(
            AccountStore::get_token(&store, &account).unwrap().expiration_time_sec,
            Some(0)
        );

        let refreshed = Token {
            expiration_time_sec: Some(999),
            ..token("G1")
        };
        AccountStore::update_token(&store, &account, &refreshed).unwrap();
        assert_eq!(store.token(&account).unwrap(), refreshed);
    }

    #[test]
    fn test_clones_share_database() {
        let store = Store::new_in_memory().unwrap();
        let clone = store.clone();
        clone.add_account(&Account::new("G1"), &Token::default()).unwrap();
        assert_eq!(store.accounts().unwrap().len(), 1);
    }

    #[test]
    fn test_on_disk_database_persists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("fantasywear.db");
        {
            let mut db = FantasyWearDatabase::open(&path).unwrap();
            db.insert_token(&Account::new("A"), &token("A")).unwrap();
        }
        let db = FantasyWearDatabase::open(&path).unwrap();
        assert_eq!(db.get_token(&Account::new("A")).unwrap(), token("A"));
    }
}

#[cfg(test)]
mod preferences_tests {
    use super::*;

    #[test]
    fn test_default_sync_interval() {
        let temp_dir = TempDir::new().unwrap();
        let prefs = Preferences::at(temp_dir.path().join("prefs.json"));
        assert_eq!(prefs.sync_interval_sec(), DEFAULT_SYNC_INTERVAL_SEC);
        assert_eq!(DEFAULT_SYNC_INTERVAL_SEC, 1800);
    }

    #[test]
    fn test_set_sync_interval() {
        let temp_dir = TempDir::new().unwrap();
        let prefs = Preferences::at(temp_dir.path().join("prefs.json"));
        prefs.set_sync_interval_sec(900).unwrap();
        assert_eq!(prefs.sync_interval_sec(), 900);
        assert_eq!(
            Preferences::at(prefs.path().to_path_buf()).sync_interval_sec(),
            900
        );
    }

    #[test]
    fn test_corrupt_file_falls_back_to_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(Preferences::at(path).sync_interval_sec(), DEFAULT_SYNC_INTERVAL_SEC);
    }
}
