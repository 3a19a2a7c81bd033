//! Integration tests for the storage crate.
//!
//! Uses in-memory SQLite for fast, isolated tests.

use clipboardai_storage::{
    Database, HistoryRepository, NewHistoryEntry, SettingsRepository, StorageError, PREVIEW_CHARS,
};

fn create_test_db() -> Database {
    Database::open_in_memory().expect("Failed to create in-memory database")
}

fn create_test_entry(action: &str) -> NewHistoryEntry {
    NewHistoryEntry {
        action: action.to_string(),
        input_text: "def calcluate(): pass".to_string(),
        output_text: "def calculate(): pass".to_string(),
        tokens_used: 150,
        model: Some("gpt-4o-mini".to_string()),
    }
}

// =============================================================================
// Database Initialization Tests
// =============================================================================

mod initialization {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok(), "Should create in-memory database");
    }

    #[test]
    fn test_open_file_database() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");

        let db = Database::open(&db_path);
        assert!(db.is_ok(), "Should create file-based database");
        assert!(db_path.exists(), "Database file should exist");
    }

    #[test]
    fn test_open_creating_dirs() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("deeper").join("history.db");

        Database::open_creating_dirs(&db_path).unwrap();
        assert!(db_path.exists());
    }

    #[test]
    fn test_reopen_existing_database() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");

        let id = {
            let db = Database::open(&db_path).unwrap();
            db.add_history(&create_test_entry("fix_typos")).unwrap()
        };

        {
            let db = Database::open(&db_path).unwrap();
            let item = db.get_history_item(id).unwrap();
            assert_eq!(item.action, "fix_typos", "History should persist after reopen");
        }
    }

    #[test]
    fn test_invalid_path_fails() {
        let result = Database::open(&PathBuf::from("/nonexistent/path/db.sqlite"));
        assert!(result.is_err(), "Should fail with invalid path");
    }
}

// =============================================================================
// History Repository Tests
// =============================================================================

mod history {
    use super::*;

    #[test]
    fn test_add_and_get_item() {
        let db = create_test_db();
        let id = db.add_history(&create_test_entry("fix_typos")).unwrap();

        let item = db.get_history_item(id).unwrap();
        assert_eq!(item.id, id);
        assert_eq!(item.input_text, "def calcluate(): pass");
        assert_eq!(item.output_text, "def calculate(): pass");
        assert_eq!(item.tokens_used, 150);
        assert_eq!(item.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(item.input_length, 21);
        assert_eq!(item.output_length, 21);
        assert!(item.timestamp > 0);
    }

    #[test]
    fn test_ids_increase() {
        let db = create_test_db();
        let first = db.add_history(&create_test_entry("a")).unwrap();
        let second = db.add_history(&create_test_entry("b")).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_get_nonexistent_item() {
        let db = create_test_db();
        assert!(matches!(
            db.get_history_item(999),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_empty() {
        let db = create_test_db();
        assert!(db.get_history(50, None).unwrap().is_empty());
    }

    #[test]
    fn test_list_newest_first() {
        let db = create_test_db();
        for action in ["first", "second", "third"] {
            db.add_history(&create_test_entry(action)).unwrap();
        }

        let actions: Vec<String> = db
            .get_history(50, None)
            .unwrap()
            .into_iter()
            .map(|h| h.action)
            .collect();
        assert_eq!(actions, vec!["third", "second", "first"]);
    }

    #[test]
    fn test_list_honours_limit() {
        let db = create_test_db();
        for _ in 0..10 {
            db.add_history(&create_test_entry("fix_typos")).unwrap();
        }
        assert_eq!(db.get_history(3, None).unwrap().len(), 3);
    }

    #[test]
    fn test_list_filters_by_action() {
        let db = create_test_db();
        db.add_history(&create_test_entry("translate")).unwrap();
        db.add_history(&create_test_entry("fix_typos")).unwrap();
        db.add_history(&create_test_entry("translate")).unwrap();

        let filtered = db.get_history(50, Some("translate")).unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|h| h.action == "translate"));
        assert!(db.get_history(50, Some("summarize")).unwrap().is_empty());
    }

    #[test]
    fn test_list_previews_are_truncated() {
        let db = create_test_db();
        let mut entry = create_test_entry("summarize");
        entry.input_text = "é".repeat(250);
        entry.output_text = "short".to_string();
        db.add_history(&entry).unwrap();

        let summary = &db.get_history(1, None).unwrap()[0];
        assert_eq!(summary.input_preview.chars().count(), PREVIEW_CHARS as usize);
        assert_eq!(summary.output_preview, "short");
        assert_eq!(summary.input_length, 250);
    }

    #[test]
    fn test_delete_item() {
        let db = create_test_db();
        let id = db.add_history(&create_test_entry("fix_typos")).unwrap();

        db.delete_history_item(id).unwrap();
        assert!(matches!(
            db.get_history_item(id),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_nonexistent_item() {
        let db = create_test_db();
        assert!(matches!(
            db.delete_history_item(42),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn test_clear_history() {
        let db = create_test_db();
        for _ in 0..4 {
            db.add_history(&create_test_entry("fix_typos")).unwrap();
        }
        assert_eq!(db.clear_history().unwrap(), 4);
        assert!(db.get_history(50, None).unwrap().is_empty());
        assert_eq!(db.clear_history().unwrap(), 0);
    }
}

// =============================================================================
// Statistics Tests
// =============================================================================

mod stats {
    use super::*;

    #[test]
    fn test_stats_empty() {
        let db = create_test_db();
        let stats = db.get_stats().unwrap();
        assert_eq!(stats.total_count, 0);
        assert_eq!(stats.total_tokens, 0);
        assert!(stats.actions_by_type.is_empty());
        assert_eq!(stats.avg_tokens_per_action, 0.0);
    }

    #[test]
    fn test_stats_aggregate() {
        let db = create_test_db();
        let tokens = [100, 200, 101];
        let actions = ["translate", "translate", "fix_typos"];
        for (action, tokens) in actions.iter().zip(tokens) {
            let mut entry = create_test_entry(action);
            entry.tokens_used = tokens;
            db.add_history(&entry).unwrap();
        }

        let stats = db.get_stats().unwrap();
        assert_eq!(stats.total_count, 3);
        assert_eq!(stats.total_tokens, 401);
        assert_eq!(stats.actions_by_type.get("translate"), Some(&2));
        assert_eq!(stats.actions_by_type.get("fix_typos"), Some(&1));
        assert_eq!(stats.avg_tokens_per_action, 133.67);
    }
}

// =============================================================================
// Settings Tests
// =============================================================================

mod settings {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let db = create_test_db();
        assert_eq!(db.get_setting("theme").unwrap(), None);

        db.set_setting("theme", "dark").unwrap();
        assert_eq!(db.get_setting("theme").unwrap().as_deref(), Some("dark"));

        db.set_setting("theme", "light").unwrap();
        assert_eq!(db.get_setting("theme").unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_delete_setting() {
        let db = create_test_db();
        db.set_setting("k", "v").unwrap();
        db.delete_setting("k").unwrap();
        assert!(matches!(
            db.delete_setting("k"),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn test_prompt_overrides() {
        let db = create_test_db();
        db.set_setting("theme", "dark").unwrap();
        db.save_prompt_override("translate", "Translate to {target_language}, formally.")
            .unwrap();
        db.save_prompt_override("fix_typos", "Only fix typos.").unwrap();
        db.save_prompt_override("fix_typos", "Only fix obvious typos.")
            .unwrap();

        let overrides = db.load_prompt_overrides().unwrap();
        assert_eq!(
            overrides,
            vec![
                ("fix_typos".to_string(), "Only fix obvious typos.".to_string()),
                (
                    "translate".to_string(),
                    "Translate to {target_language}, formally.".to_string()
                ),
            ]
        );

        db.delete_prompt_override("fix_typos").unwrap();
        assert_eq!(db.load_prompt_overrides().unwrap().len(), 1);
    }
}

// =============================================================================
// Concurrency Tests
// =============================================================================

mod concurrency {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_concurrent_writes() {
        let db = Arc::new(create_test_db());

        let handles: Vec<_> = (0..5)
            .map(|i| {
                let db_clone = Arc::clone(&db);
                thread::spawn(move || {
                    for j in 0..10 {
                        let entry = create_test_entry(&format!("thread_{i}_{j}"));
                        db_clone.add_history(&entry).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("Thread panicked");
        }

        assert_eq!(db.get_stats().unwrap().total_count, 50);
    }

    #[test]
    fn test_concurrent_reads_and_writes() {
        let db = Arc::new(create_test_db());
        for _ in 0..10 {
            db.add_history(&create_test_entry("seed")).unwrap();
        }

        let readers: Vec<_> = (0..3)
            .map(|_| {
                let db_clone = Arc::clone(&db);
                thread::spawn(move || {
                    for _ in 0..20 {
                        assert!(db_clone.get_history(100, None).unwrap().len() >= 10);
                    }
                })
            })
            .collect();

        let writers: Vec<_> = (0..2)
            .map(|_| {
                let db_clone = Arc::clone(&db);
                thread::spawn(move || {
                    for _ in 0..10 {
                        db_clone.add_history(&create_test_entry("write")).unwrap();
                    }
                })
            })
            .collect();

        for handle in readers.into_iter().chain(writers) {
            handle.join().expect("Thread panicked");
        }

        assert_eq!(db.get_history(100, None).unwrap().len(), 30);
    }
}

// =============================================================================
// Edge Cases
// =============================================================================

mod edge_cases {
    use super::*;

    #[test]
    fn test_entry_without_model() {
        let db = create_test_db();
        let mut entry = create_test_entry("fix_grammar");
        entry.model = None;
        let id = db.add_history(&entry).unwrap();
        assert_eq!(db.get_history_item(id).unwrap().model, None);
    }

    #[test]
    fn test_unicode_round_trip() {
        let db = create_test_db();
        let mut entry = create_test_entry("translate");
        entry.input_text = "Hello 世界 🌍 مرحبا".to_string();
        let id = db.add_history(&entry).unwrap();

        let item = db.get_history_item(id).unwrap();
        assert_eq!(item.input_text, "Hello 世界 🌍 مرحبا");
        assert_eq!(item.input_length, 16);
    }

    #[test]
    fn test_large_output() {
        let db = create_test_db();
        let mut entry = create_test_entry("generate_tests");
        entry.output_text = "x".repeat(100_000);
        let id = db.add_history(&entry).unwrap();
        assert_eq!(db.get_history_item(id).unwrap().output_length, 100_000);
    }
}
