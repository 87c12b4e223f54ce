//! Concurrent wrapper over the copy-on-write trie.

use std::ops::Deref;
use std::sync::Arc;

use parking_lot::Mutex;

use super::trie::Trie;

/// A mutable cell holding the current [`Trie`], with snapshot reads and
/// serialized writes.
///
/// Readers grab the root under a short critical section and then search
/// entirely lock-free; they never block one another, and they only ever
/// see a fully-published trie version. Writers hold `write_lock` across
/// their whole read-modify-write so no update is lost, and publish the
/// new root atomically under `root_lock`.
///
/// Writer starvation under a pathological read storm is possible and
/// not prevented.
pub struct TrieStore {
    /// Guards only the read/swap of the root handle.
    root: Mutex<Trie>,
    /// Serializes writers end-to-end.
    write_lock: Mutex<()>,
}

impl TrieStore {
    /// Create a store holding an empty trie.
    pub fn new() -> Self {
        Self {
            root: Mutex::new(Trie::new()),
            write_lock: Mutex::new(()),
        }
    }

    /// Look up `key` in the current version of the trie.
    ///
    /// The returned guard pins the version that was current at lookup
    /// time: later `put`/`remove` calls publish new roots without
    /// disturbing it.
    pub fn get<T: Send + Sync + 'static>(&self, key: &str) -> Option<ValueGuard<T>> {
        let snapshot = self.root.lock().clone();
        let payload = snapshot.lookup(key)?.clone();
        let value = payload.downcast::<T>().ok()?;
        Some(ValueGuard {
            _snapshot: snapshot,
            value,
        })
    }

    /// Map `key` to `value` in a new trie version.
    pub fn put<T: Send + Sync + 'static>(&self, key: &str, value: T) {
        let _write = self.write_lock.lock();

        let snapshot = self.root.lock().clone();
        let new_root = snapshot.put(key, value);
        *self.root.lock() = new_root;
    }

    /// Publish a new trie version with `key` absent.
    pub fn remove(&self, key: &str) {
        let _write = self.write_lock.lock();

        let snapshot = self.root.lock().clone();
        let new_root = snapshot.remove(key);
        *self.root.lock() = new_root;
    }
}

impl Default for TrieStore {
    fn default() -> Self {
        Self::new()
    }
}

/// A value reference that keeps its trie snapshot alive.
///
/// As long as the guard exists, both the snapshot root and the shared
/// value payload are retained, so the referenced value cannot be
/// dropped out from under the reader - no matter how many newer
/// versions writers publish in the meantime.
pub struct ValueGuard<T> {
    _snapshot: Trie,
    value: Arc<T>,
}

impl<T> Deref for ValueGuard<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}
