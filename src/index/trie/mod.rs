//! Copy-on-write trie.
//!
//! A persistent, structurally-shared, character-keyed trie:
//! - [`Trie`] - an immutable handle; `put`/`remove` return new handles
//!   sharing every untouched subtree with the old one
//! - [`TrieStore`] - a concurrency wrapper giving readers snapshot
//!   access while writes are serialized
//! - [`ValueGuard`] - keeps a reader's snapshot alive for as long as it
//!   looks at a value

mod node;
mod store;
#[allow(clippy::module_inception)]
mod trie;

pub use store::{TrieStore, ValueGuard};
pub use trie::Trie;
