//! Buffer pool management.
//!
//! The buffer pool is the in-memory cache layer between storage engines
//! and disk. It manages a fixed pool of frames, each holding one page,
//! and gives the rest of the system the illusion of an effectively
//! infinite set of pages.
//!
//! # Components
//! - [`BufferPoolManager`] - The main page cache
//! - [`Frame`] - A slot in the buffer pool holding a page + metadata
//! - [`BasicPageGuard`] / [`ReadPageGuard`] / [`WritePageGuard`] - RAII
//!   guards tying pins (and page latches) to a scope
//! - [`BufferPoolStats`] - Performance statistics
//! - [`replacer`] - Eviction policy implementations

mod buffer_pool_manager;
mod frame;
mod page_guard;
pub mod replacer;
mod stats;

pub use buffer_pool_manager::BufferPoolManager;
pub use frame::Frame;
pub use page_guard::{BasicPageGuard, ReadPageGuard, WritePageGuard};
pub use stats::{BufferPoolStats, StatsSnapshot};
