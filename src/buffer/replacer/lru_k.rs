//! LRU-K replacement policy.

use std::collections::{HashMap, VecDeque};

use crate::common::FrameId;

use super::Replacer;

/// Access history of a single tracked frame.
struct LruKNode {
    /// Up to `k` most recent access timestamps, oldest first.
    history: VecDeque<u64>,
    evictable: bool,
}

impl LruKNode {
    fn new(k: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(k),
            evictable: false,
        }
    }
}

/// LRU-K eviction policy.
///
/// Evicts the frame whose backward k-distance - the difference between
/// the current timestamp and the timestamp of its k-th most recent
/// access - is largest. Frames with fewer than `k` recorded accesses
/// count as having infinite backward k-distance and are preferred
/// victims; ties among those are broken by earliest first access
/// (classical LRU). Promoting a frame only after repeated use is what
/// makes the policy resistant to scan pollution.
pub struct LruKReplacer {
    node_store: HashMap<FrameId, LruKNode>,
    /// Logical clock, incremented on every recorded access.
    current_timestamp: u64,
    /// Number of evictable frames.
    curr_size: usize,
    /// Fixed capacity; valid frame ids are `[0, replacer_size)`.
    replacer_size: usize,
    k: usize,
}

impl LruKReplacer {
    /// Create a replacer tracking up to `num_frames` frames with a
    /// lookback window of `k` accesses.
    pub fn new(num_frames: usize, k: usize) -> Self {
        assert!(k > 0, "lookback window must be at least 1");
        Self {
            node_store: HashMap::new(),
            current_timestamp: 0,
            curr_size: 0,
            replacer_size: num_frames,
            k,
        }
    }
}

impl Replacer for LruKReplacer {
    /// # Panics
    /// Panics if `frame_id` is outside `[0, replacer_size)` - that is a
    /// caller bug, not a recoverable condition.
    fn record_access(&mut self, frame_id: FrameId) {
        assert!(
            frame_id.0 < self.replacer_size,
            "{} out of range for replacer of {} frames",
            frame_id,
            self.replacer_size
        );

        let k = self.k;
        let node = self
            .node_store
            .entry(frame_id)
            .or_insert_with(|| LruKNode::new(k));
        if node.history.len() == k {
            node.history.pop_front();
        }
        node.history.push_back(self.current_timestamp);
        self.current_timestamp += 1;
    }

    fn evict(&mut self) -> Option<FrameId> {
        if self.curr_size == 0 {
            return None;
        }

        let mut victim: Option<FrameId> = None;
        // Once a frame with infinite backward k-distance shows up, the
        // finite tier is out of the running entirely.
        let mut saw_infinite = false;
        let mut earliest_first_access = u64::MAX;
        let mut max_distance = 0u64;

        for (&frame_id, node) in &self.node_store {
            if !node.evictable {
                continue;
            }
            if node.history.len() < self.k {
                let first_access = node.history.front().copied().unwrap_or(0);
                if !saw_infinite || first_access < earliest_first_access {
                    earliest_first_access = first_access;
                    victim = Some(frame_id);
                }
                saw_infinite = true;
                continue;
            }
            if saw_infinite {
                continue;
            }
            let kth_most_recent = node.history.front().copied().unwrap_or(0);
            let distance = self.current_timestamp - kth_most_recent;
            if distance > max_distance {
                max_distance = distance;
                victim = Some(frame_id);
            }
        }

        let victim = victim?;
        if let Some(node) = self.node_store.get_mut(&victim) {
            node.history.clear();
            node.evictable = false;
        }
        self.curr_size -= 1;
        Some(victim)
    }

    /// # Panics
    /// Panics if the frame has never been recorded - that is a caller
    /// bug, not a recoverable condition.
    fn set_evictable(&mut self, frame_id: FrameId, evictable: bool) {
        let Some(node) = self.node_store.get_mut(&frame_id) else {
            panic!("set_evictable on untracked {}", frame_id);
        };
        if node.evictable == evictable {
            return;
        }
        node.evictable = evictable;
        if evictable {
            self.curr_size += 1;
        } else {
            self.curr_size -= 1;
        }
    }

    fn remove(&mut self, frame_id: FrameId) {
        let Some(node) = self.node_store.get_mut(&frame_id) else {
            return;
        };
        if !node.evictable {
            // Cannot remove a pinned frame.
            return;
        }
        node.history.clear();
        node.evictable = false;
        self.curr_size -= 1;
    }

    fn size(&self) -> usize {
        self.curr_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fid(id: usize) -> FrameId {
        FrameId::new(id)
    }

    #[test]
    fn test_evict_empty() {
        let mut replacer = LruKReplacer::new(7, 2);
        assert_eq!(replacer.evict(), None);
        assert_eq!(replacer.size(), 0);
    }

    #[test]
    fn test_infinite_tier_ties_broken_by_first_access() {
        let mut replacer = LruKReplacer::new(7, 2);

        // Frames 1-4 gain full histories; 5 and 6 stay below k accesses.
        for id in [1, 2, 3, 4, 1, 2, 3, 4, 5, 6] {
            replacer.record_access(fid(id));
        }
        for id in 1..=6 {
            replacer.set_evictable(fid(id), true);
        }
        assert_eq!(replacer.size(), 6);

        // 5 and 6 both have infinite backward 2-distance; 5 was seen first.
        assert_eq!(replacer.evict(), Some(fid(5)));
        assert_eq!(replacer.evict(), Some(fid(6)));

        // Among the full-history frames, 1 has the oldest 2nd-from-latest
        // access.
        assert_eq!(replacer.evict(), Some(fid(1)));
        assert_eq!(replacer.size(), 3);
    }

    #[test]
    fn test_full_scenario() {
        let mut replacer = LruKReplacer::new(7, 2);

        // Add six frames; mark 1-5 evictable, 6 stays pinned.
        for id in 1..=6 {
            replacer.record_access(fid(id));
        }
        for id in 1..=5 {
            replacer.set_evictable(fid(id), true);
        }
        replacer.set_evictable(fid(6), false);
        assert_eq!(replacer.size(), 5);

        // Frame 1 gains a second access; everything else has infinite
        // backward k-distance. Eviction order becomes [2,3,4,5,1].
        replacer.record_access(fid(1));

        assert_eq!(replacer.evict(), Some(fid(2)));
        assert_eq!(replacer.evict(), Some(fid(3)));
        assert_eq!(replacer.evict(), Some(fid(4)));
        assert_eq!(replacer.size(), 2);

        // Re-admit 3 and 4 and touch 5 and 4 again.
        replacer.record_access(fid(3));
        replacer.record_access(fid(4));
        replacer.record_access(fid(5));
        replacer.record_access(fid(4));
        replacer.set_evictable(fid(3), true);
        replacer.set_evictable(fid(4), true);
        assert_eq!(replacer.size(), 4);

        // 3 is the only frame below k accesses now.
        assert_eq!(replacer.evict(), Some(fid(3)));
        assert_eq!(replacer.size(), 3);

        // Unpin 6: it has a single old access, so it goes next.
        replacer.set_evictable(fid(6), true);
        assert_eq!(replacer.size(), 4);
        assert_eq!(replacer.evict(), Some(fid(6)));
        assert_eq!(replacer.size(), 3);

        // Pin 1; of [5,4], 5 has the larger backward 2-distance.
        replacer.set_evictable(fid(1), false);
        assert_eq!(replacer.size(), 2);
        assert_eq!(replacer.evict(), Some(fid(5)));
        assert_eq!(replacer.size(), 1);

        // Give 1 a fresh history and unpin it; 4 is older.
        replacer.record_access(fid(1));
        replacer.record_access(fid(1));
        replacer.set_evictable(fid(1), true);
        assert_eq!(replacer.size(), 2);
        assert_eq!(replacer.evict(), Some(fid(4)));
        assert_eq!(replacer.evict(), Some(fid(1)));
        assert_eq!(replacer.size(), 0);

        // Draining and removing on an empty replacer change nothing.
        assert_eq!(replacer.evict(), None);
        replacer.remove(fid(1));
        assert_eq!(replacer.size(), 0);
    }

    #[test]
    fn test_set_evictable_idempotent() {
        let mut replacer = LruKReplacer::new(3, 2);
        replacer.record_access(fid(0));

        replacer.set_evictable(fid(0), true);
        replacer.set_evictable(fid(0), true);
        assert_eq!(replacer.size(), 1);

        replacer.set_evictable(fid(0), false);
        replacer.set_evictable(fid(0), false);
        assert_eq!(replacer.size(), 0);
    }

    #[test]
    fn test_remove_pinned_is_noop() {
        let mut replacer = LruKReplacer::new(3, 2);
        replacer.record_access(fid(0));
        replacer.record_access(fid(1));
        replacer.set_evictable(fid(0), true);

        // Frame 1 is not evictable; remove must leave it alone.
        replacer.remove(fid(1));
        assert_eq!(replacer.size(), 1);

        // Unknown frames are ignored outright.
        replacer.remove(fid(2));
        assert_eq!(replacer.size(), 1);

        replacer.remove(fid(0));
        assert_eq!(replacer.size(), 0);
        assert_eq!(replacer.evict(), None);
    }

    #[test]
    fn test_evicted_frame_restarts_cold() {
        let mut replacer = LruKReplacer::new(3, 2);
        for _ in 0..3 {
            replacer.record_access(fid(0));
        }
        replacer.record_access(fid(1));
        replacer.record_access(fid(1));
        replacer.set_evictable(fid(0), true);
        replacer.set_evictable(fid(1), true);

        // 0 has the older kth access.
        assert_eq!(replacer.evict(), Some(fid(0)));

        // After eviction its history is gone: one new access puts it in
        // the infinite tier, ahead of fully-tracked frame 1.
        replacer.record_access(fid(0));
        replacer.set_evictable(fid(0), true);
        assert_eq!(replacer.evict(), Some(fid(0)));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_record_access_out_of_range() {
        let mut replacer = LruKReplacer::new(4, 2);
        replacer.record_access(fid(4));
    }

    #[test]
    #[should_panic(expected = "untracked")]
    fn test_set_evictable_untracked() {
        let mut replacer = LruKReplacer::new(4, 2);
        replacer.set_evictable(fid(0), true);
    }
}
