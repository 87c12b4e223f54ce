//! Eviction policy implementations (replacers).
//!
//! A replacer tracks frame usage and picks victims when the pool is
//! full. Implemented policies:
//! - [`LruKReplacer`] - backward k-distance (the default)
//! - [`FifoReplacer`] - insertion order, kept as a simple baseline

mod fifo;
mod lru_k;

pub use fifo::FifoReplacer;
pub use lru_k::LruKReplacer;

use crate::common::FrameId;

/// Victim-selection policy for the buffer pool.
///
/// The pool calls these while holding its latch, so implementations
/// need no internal locking. A frame is a candidate for eviction iff
/// it has been marked evictable.
pub trait Replacer: Send {
    /// Record an access to the given frame at the current timestamp,
    /// creating a history entry if the frame has not been seen before.
    fn record_access(&mut self, frame_id: FrameId);

    /// Select a victim among the evictable frames per the policy,
    /// clear its access history, mark it non-evictable, and return it.
    /// Returns `None` when no frame is evictable.
    fn evict(&mut self) -> Option<FrameId>;

    /// Toggle whether a frame may be chosen as a victim. The evictable
    /// count changes only on an actual transition; setting the current
    /// state again is a no-op.
    fn set_evictable(&mut self, frame_id: FrameId, evictable: bool);

    /// Stop tracking an evictable frame, clearing its history. Unknown
    /// and non-evictable (pinned) frames are left untouched. Unlike
    /// `evict`, this bypasses the selection policy.
    fn remove(&mut self, frame_id: FrameId);

    /// Number of evictable frames.
    fn size(&self) -> usize;
}
