//! stratadb - a database storage substrate.
//!
//! Two independent, self-contained cores:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          stratadb                            │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │              Buffer Pool (buffer/)                     │  │
//! │  │  BufferPoolManager + Frame + PageGuards + Statistics   │  │
//! │  │  ┌──────────────────────────────────────────────────┐  │  │
//! │  │  │   Eviction Policies: LRU-K (default) | FIFO      │  │  │
//! │  │  └──────────────────────────────────────────────────┘  │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                              ↓                               │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │             Storage Layer (storage/)                   │  │
//! │  │          DiskManager + Page + PageHeader               │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │        Copy-on-Write Trie (index/trie/)                │  │
//! │  │           Trie + TrieStore + ValueGuard                │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The **buffer pool** caches fixed-size disk pages in a bounded set of
//! in-memory frames, picking eviction victims with an LRU-K policy and
//! handing out RAII guards that tie pin counts and page latches to
//! lexical scopes.
//!
//! The **trie** is a persistent, structurally-shared map from string
//! keys to values of arbitrary types; [`TrieStore`] serves concurrent
//! readers from immutable snapshots while writes are serialized.
//!
//! # Modules
//! - [`common`] - Shared primitives (PageId, FrameId, Error, config)
//! - [`buffer`] - Buffer pool management and eviction policies
//! - [`storage`] - Disk I/O and page formats
//! - [`index`] - In-memory index structures (the trie)
//!
//! # Quick Start
//! ```no_run
//! use stratadb::{BufferPoolManager, DiskManager};
//!
//! let dm = DiskManager::create("my_database.db").unwrap();
//! let bpm = BufferPoolManager::new(10, 2, dm);
//!
//! let pid = {
//!     let mut guard = bpm.new_page_guarded().unwrap();
//!     guard.page_mut().as_mut_slice()[0] = 0xAB;
//!     guard.page_id()
//! }; // guard drops: page unpinned, dirty flag forwarded
//!
//! let guard = bpm.fetch_page_read(pid).unwrap();
//! assert_eq!(guard.as_slice()[0], 0xAB);
//! ```

pub mod buffer;
pub mod common;
pub mod index;
pub mod storage;

// Re-export commonly used items at the crate root for convenience
pub use common::config::PAGE_SIZE;
pub use common::{Error, FrameId, PageId, Result};

pub use buffer::replacer::{FifoReplacer, LruKReplacer, Replacer};
pub use buffer::{
    BasicPageGuard, BufferPoolManager, BufferPoolStats, Frame, ReadPageGuard, StatsSnapshot,
    WritePageGuard,
};
pub use index::trie::{Trie, TrieStore, ValueGuard};
pub use storage::page::{Page, PageHeader, PageType};
pub use storage::DiskManager;
