//! Integration tests for the worker persistence file.
//!
//! Run with:
//!   cargo test --test test_worker_db

use std::fs;
use std::io::Write;

use tempfile::{NamedTempFile, TempDir};

use worker_db::config;
use worker_db::ids::INVALID_CLUSTER_ID;
use worker_db::{BlockWorkerDb, CLUSTER_ID_KEY, DefaultBlockWorkerDb};

// ── helpers ──────────────────────────────────────────────────────────────────

fn store_dir() -> (TempDir, std::path::PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("worker").join("cluster_id");
    (tmp, path)
}

// ── lifecycle ────────────────────────────────────────────────────────────────

#[test]
fn full_lifecycle_on_nonexistent_path() {
    let (_tmp, path) = store_dir();
    let mut db = DefaultBlockWorkerDb::new(&path);

    assert_eq!(db.get("key1"), "");
    assert!(!path.exists());

    db.set("key1", "value1").unwrap();
    assert!(path.exists());
    assert_eq!(db.get("key1"), "value1");

    db.reset_state().unwrap();
    assert_eq!(db.get("key1"), "");
    assert_eq!(fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn cluster_id_is_shared_between_instances() {
    let (_tmp, path) = store_dir();

    let mut first = DefaultBlockWorkerDb::new(&path);
    first.set_cluster_id("abc").unwrap();

    let mut second = DefaultBlockWorkerDb::new(&path);
    assert_eq!(second.get(CLUSTER_ID_KEY), "abc");
    assert_eq!(second.get_cluster_id(), "abc");
}

#[test]
fn cluster_id_survives_restart() {
    let (_tmp, path) = store_dir();
    {
        let mut db = DefaultBlockWorkerDb::new(&path);
        assert_eq!(db.get_cluster_id(), INVALID_CLUSTER_ID);
        db.set_cluster_id("cluster-7").unwrap();
    }
    let mut restarted = DefaultBlockWorkerDb::new(&path);
    assert_eq!(restarted.get_cluster_id(), "cluster-7");
}

#[test]
fn reset_from_one_instance_is_seen_by_another() {
    let (_tmp, path) = store_dir();
    let mut writer = DefaultBlockWorkerDb::new(&path);
    writer.set_cluster_id("abc").unwrap();

    let mut other = DefaultBlockWorkerDb::new(&path);
    other.reset_state().unwrap();

    assert_eq!(writer.get_cluster_id(), INVALID_CLUSTER_ID);
}

#[test]
fn several_keys_persist_together() {
    let (_tmp, path) = store_dir();
    let mut db = DefaultBlockWorkerDb::new(&path);
    db.set("key1", "value1").unwrap();
    db.set("key2", "value with spaces = and : signs").unwrap();
    db.set_cluster_id("abc").unwrap();

    let mut reader = DefaultBlockWorkerDb::new(&path);
    assert_eq!(reader.get("key1"), "value1");
    assert_eq!(reader.get("key2"), "value with spaces = and : signs");
    assert_eq!(reader.get_cluster_id(), "abc");
}

#[test]
fn reads_hand_written_property_file() {
    let (_tmp, path) = store_dir();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        "# generated by worker process, don't edit it\n\
         ! legacy comment\n\
         clusterId : 0f3a\\\n    -77\n\
         note=caf\\u00e9\n",
    )
    .unwrap();

    let mut db = DefaultBlockWorkerDb::new(&path);
    assert_eq!(db.get_cluster_id(), "0f3a-77");
    assert_eq!(db.get("note"), "café");
}

#[test]
fn store_built_from_loaded_config() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("state").join("cluster_id");

    let mut toml = NamedTempFile::new().unwrap();
    writeln!(toml, "[worker]\npersistence_file = \"{}\"", file.display()).unwrap();

    let cfg = config::load_from(toml.path(), None, None).unwrap();
    let mut db = DefaultBlockWorkerDb::from_config(&cfg);
    db.set_cluster_id("from-config").unwrap();

    assert!(file.exists());
    assert_eq!(DefaultBlockWorkerDb::new(&file).get_cluster_id(), "from-config");
}
