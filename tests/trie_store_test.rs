//! TrieStore scenario tests.
//!
//! Snapshot stability under concurrent mutation and writer
//! serialization.

use std::sync::Arc;
use std::thread;

use stratadb::TrieStore;

/// A guard taken before an overwrite keeps reading the old value; a
/// fresh lookup sees the new one.
#[test]
fn test_snapshot_survives_overwrite() {
    let store = TrieStore::new();
    store.put("k", String::from("v1"));

    let guard = store.get::<String>("k").unwrap();

    store.put("k", String::from("v2"));

    assert_eq!(*guard, "v1");
    let fresh = store.get::<String>("k").unwrap();
    assert_eq!(*fresh, "v2");

    drop(guard);
    // Dropping the old guard changes nothing for new readers.
    let fresh = store.get::<String>("k").unwrap();
    assert_eq!(*fresh, "v2");
}

#[test]
fn test_snapshot_survives_remove() {
    let store = TrieStore::new();
    store.put("k", 41u32);

    let guard = store.get::<u32>("k").unwrap();
    store.remove("k");

    assert_eq!(*guard, 41);
    assert!(store.get::<u32>("k").is_none());
}

#[test]
fn test_basic_put_get_remove() {
    let store = TrieStore::new();

    assert!(store.get::<u32>("k").is_none());

    store.put("k", 1u32);
    assert_eq!(*store.get::<u32>("k").unwrap(), 1);

    store.remove("k");
    assert!(store.get::<u32>("k").is_none());

    // Removing a missing key is harmless.
    store.remove("k");
    assert!(store.get::<u32>("k").is_none());
}

/// Readers hammer the store while a writer churns one key; every read
/// observes some fully-published version, never a torn one.
#[test]
fn test_readers_during_writes() {
    const WRITES: u32 = 500;
    const NUM_READERS: usize = 4;

    let store = Arc::new(TrieStore::new());
    store.put("stable", 7u32);
    store.put("counter", 0u32);

    let mut readers = Vec::new();
    for _ in 0..NUM_READERS {
        let store_clone = Arc::clone(&store);
        readers.push(thread::spawn(move || {
            let mut last_seen = 0u32;
            for _ in 0..WRITES {
                // The untouched key is always there.
                let stable = store_clone.get::<u32>("stable").unwrap();
                assert_eq!(*stable, 7);

                // The churned key only ever moves forward.
                let counter = store_clone.get::<u32>("counter").unwrap();
                assert!(*counter >= last_seen);
                last_seen = *counter;
            }
        }));
    }

    for i in 1..=WRITES {
        store.put("counter", i);
    }

    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(*store.get::<u32>("counter").unwrap(), WRITES);
}

/// Writers from many threads serialize; no update is lost.
#[test]
fn test_writers_serialize() {
    const THREADS: usize = 8;
    const KEYS_PER_THREAD: usize = 50;

    let store = Arc::new(TrieStore::new());

    let mut writers = Vec::new();
    for t in 0..THREADS {
        let store_clone = Arc::clone(&store);
        writers.push(thread::spawn(move || {
            for i in 0..KEYS_PER_THREAD {
                let key = format!("t{}-k{}", t, i);
                store_clone.put(&key, (t * KEYS_PER_THREAD + i) as u64);
            }
        }));
    }

    for writer in writers {
        writer.join().unwrap();
    }

    // Every write from every thread landed.
    for t in 0..THREADS {
        for i in 0..KEYS_PER_THREAD {
            let key = format!("t{}-k{}", t, i);
            let guard = store.get::<u64>(&key).unwrap();
            assert_eq!(*guard, (t * KEYS_PER_THREAD + i) as u64);
        }
    }
}

/// Guards owned by different threads stay valid as versions churn.
#[test]
fn test_guards_across_threads() {
    let store = Arc::new(TrieStore::new());
    store.put("k", String::from("original"));

    let guard = store.get::<String>("k").unwrap();

    let store_clone = Arc::clone(&store);
    let handle = thread::spawn(move || {
        for i in 0..100 {
            store_clone.put("k", format!("version-{}", i));
        }
    });
    handle.join().unwrap();

    assert_eq!(*guard, "original");
    assert_eq!(*store.get::<String>("k").unwrap(), "version-99");
}
