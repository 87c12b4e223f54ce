//! Buffer Pool Manager - the core page caching layer.
//!
//! The [`BufferPoolManager`] moves physical pages back and forth
//! between memory and disk. Callers ask for a page by id and never
//! learn whether it was already resident or had to be loaded.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};

use log::debug;
use parking_lot::Mutex;

use crate::buffer::page_guard::{BasicPageGuard, ReadPageGuard, WritePageGuard};
use crate::buffer::replacer::{LruKReplacer, Replacer};
use crate::buffer::{BufferPoolStats, Frame};
use crate::common::{FrameId, PageId};
use crate::storage::DiskManager;

/// Manages a fixed pool of frames caching disk pages.
///
/// # Architecture
/// ```text
/// ┌────────────────────────────────────────────────────────────┐
/// │                    BufferPoolManager                       │
/// │  ┌──────────────────────────────────────────────────────┐  │
/// │  │ latch: Mutex ─ page_table, free_list, replacer, disk │  │
/// │  └──────────────────────────────────────────────────────┘  │
/// │  ┌──────────────────────────────────────────────────────┐  │
/// │  │ frames: Vec<Frame>   [Frame0] [Frame1] [Frame2] ...  │  │
/// │  │   (page data behind per-frame RwLock latches)        │  │
/// │  └──────────────────────────────────────────────────────┘  │
/// └────────────────────────────────────────────────────────────┘
/// ```
///
/// # Thread Safety
/// One coarse mutex serializes every public operation, disk I/O
/// included; the workloads this pool serves are test-scale, and a
/// production variant would drop the latch across I/O. The per-page
/// latches are the exception: guard factories acquire them only after
/// the pool latch is released, which is what keeps a held page latch
/// from ever deadlocking against the pool.
///
/// # Contract
/// Pages handed out by [`new_page`](Self::new_page) /
/// [`fetch_page`](Self::fetch_page) are pinned and must eventually be
/// released with [`unpin_page`](Self::unpin_page). Prefer the guard
/// variants, which do this on scope exit.
pub struct BufferPoolManager {
    /// Fixed pool of frames allocated at startup.
    frames: Vec<Frame>,

    /// The pool latch: all bookkeeping lives under it.
    latch: Mutex<PoolInner>,

    /// Monotonic page id allocator; reset only when a new manager is
    /// constructed.
    next_page_id: AtomicU32,

    /// Performance counters.
    stats: BufferPoolStats,

    /// Number of frames (immutable after construction).
    pool_size: usize,
}

/// State guarded by the pool latch.
struct PoolInner {
    /// Maps resident page ids to frame ids. A frame appears here iff it
    /// is not on the free list.
    page_table: HashMap<PageId, FrameId>,

    /// Frames holding no page, reused in FIFO order.
    free_list: VecDeque<FrameId>,

    /// Eviction policy for selecting victim frames.
    replacer: Box<dyn Replacer>,

    /// Handles all disk I/O.
    disk_manager: DiskManager,
}

impl BufferPoolManager {
    /// Create a buffer pool with `pool_size` frames and an LRU-K
    /// replacer with lookback `replacer_k`.
    ///
    /// # Panics
    /// Panics if `pool_size` is 0.
    pub fn new(pool_size: usize, replacer_k: usize, disk_manager: DiskManager) -> Self {
        let replacer = Box::new(LruKReplacer::new(pool_size, replacer_k));
        Self::with_replacer(pool_size, disk_manager, replacer)
    }

    /// Create a buffer pool with an explicit eviction policy.
    ///
    /// # Panics
    /// Panics if `pool_size` is 0.
    pub fn with_replacer(
        pool_size: usize,
        disk_manager: DiskManager,
        replacer: Box<dyn Replacer>,
    ) -> Self {
        assert!(pool_size > 0, "pool_size must be > 0");

        let frames: Vec<Frame> = (0..pool_size).map(|_| Frame::new()).collect();
        let free_list: VecDeque<FrameId> = (0..pool_size).map(FrameId::new).collect();

        Self {
            frames,
            latch: Mutex::new(PoolInner {
                page_table: HashMap::new(),
                free_list,
                replacer,
                disk_manager,
            }),
            next_page_id: AtomicU32::new(0),
            stats: BufferPoolStats::new(),
            pool_size,
        }
    }

    // ========================================================================
    // Public API: raw page operations
    // ========================================================================

    /// Create a new page in the buffer pool.
    ///
    /// Allocates a fresh page id, claims a frame (free list first, then
    /// the replacer), and returns the zeroed frame pinned with count 1.
    /// Returns `None` if every frame is pinned. The caller must
    /// eventually call [`unpin_page`](Self::unpin_page).
    pub fn new_page(&self) -> Option<(PageId, &Frame)> {
        let mut inner = self.latch.lock();

        let frame_id = self.acquire_victim_frame(&mut inner)?;
        let page_id = PageId::new(self.next_page_id.fetch_add(1, Ordering::Relaxed));

        let frame = &self.frames[frame_id.0];
        frame.page_mut().reset();
        frame.set_page_id(page_id);
        frame.clear_dirty();
        frame.pin();

        inner.page_table.insert(page_id, frame_id);
        inner.replacer.record_access(frame_id);
        inner.replacer.set_evictable(frame_id, false);

        Some((page_id, frame))
    }

    /// Fetch the page with the given id, loading it from disk if it is
    /// not resident.
    ///
    /// The returned frame is pinned; the caller must eventually call
    /// [`unpin_page`](Self::unpin_page). Returns `None` if the page is
    /// not resident and every frame is pinned, or if `page_id` is the
    /// `INVALID` sentinel.
    pub fn fetch_page(&self, page_id: PageId) -> Option<&Frame> {
        if !page_id.is_valid() {
            return None;
        }

        let mut inner = self.latch.lock();

        if let Some(&frame_id) = inner.page_table.get(&page_id) {
            let frame = &self.frames[frame_id.0];
            frame.pin();
            inner.replacer.record_access(frame_id);
            inner.replacer.set_evictable(frame_id, false);
            self.stats.record_hit();
            return Some(frame);
        }

        self.stats.record_miss();
        let frame_id = self.acquire_victim_frame(&mut inner)?;

        let frame = &self.frames[frame_id.0];
        {
            let mut page = frame.page_mut();
            if let Err(e) = inner.disk_manager.read_page(page_id, &mut page) {
                panic!("disk read of {} failed: {}", page_id, e);
            }
        }
        self.stats.record_read();

        frame.set_page_id(page_id);
        frame.clear_dirty();
        frame.pin();

        inner.page_table.insert(page_id, frame_id);
        inner.replacer.record_access(frame_id);
        inner.replacer.set_evictable(frame_id, false);

        Some(frame)
    }

    /// Release one pin on a page, OR-ing in the caller's dirty flag.
    ///
    /// Returns `false` if the page is not resident or was not pinned.
    /// The dirty flag only ever goes from clean to dirty here; a
    /// `false` from one caller never erases another caller's `true`.
    pub fn unpin_page(&self, page_id: PageId, is_dirty: bool) -> bool {
        let mut inner = self.latch.lock();

        let Some(&frame_id) = inner.page_table.get(&page_id) else {
            return false;
        };
        let frame = &self.frames[frame_id.0];
        if frame.pin_count() == 0 {
            return false;
        }

        if is_dirty {
            frame.mark_dirty();
        }
        if frame.unpin() == 0 {
            inner.replacer.set_evictable(frame_id, true);
        }
        true
    }

    /// Write a resident page to disk, regardless of its dirty flag, and
    /// mark it clean. Returns `false` for the `INVALID` sentinel or a
    /// non-resident page.
    pub fn flush_page(&self, page_id: PageId) -> bool {
        if !page_id.is_valid() {
            return false;
        }

        let mut inner = self.latch.lock();
        let Some(&frame_id) = inner.page_table.get(&page_id) else {
            return false;
        };
        self.flush_frame(&mut inner, frame_id, page_id);
        true
    }

    /// Write every resident page to disk and mark them all clean.
    pub fn flush_all_pages(&self) {
        let mut inner = self.latch.lock();

        let resident: Vec<(PageId, FrameId)> =
            inner.page_table.iter().map(|(&p, &f)| (p, f)).collect();
        debug!("flushing {} resident pages", resident.len());
        for (page_id, frame_id) in resident {
            self.flush_frame(&mut inner, frame_id, page_id);
        }
    }

    /// Drop a page from the buffer pool and notify the disk manager of
    /// the deallocation.
    ///
    /// Returns `true` for the `INVALID` sentinel or a page that is not
    /// resident (nothing to do), `false` if the page is still pinned.
    /// On success the frame is zeroed and returned to the free list.
    pub fn delete_page(&self, page_id: PageId) -> bool {
        if !page_id.is_valid() {
            return true;
        }

        let mut inner = self.latch.lock();
        let Some(&frame_id) = inner.page_table.get(&page_id) else {
            return true;
        };

        let frame = &self.frames[frame_id.0];
        if frame.is_pinned() {
            return false;
        }

        inner.replacer.remove(frame_id);
        inner.page_table.remove(&page_id);
        inner.free_list.push_back(frame_id);
        frame.reset();
        inner.disk_manager.deallocate_page(page_id);
        debug!("deleted {} from {}", page_id, frame_id);
        true
    }

    // ========================================================================
    // Public API: guarded variants
    // ========================================================================

    /// [`new_page`](Self::new_page), wrapped in a guard that unpins on
    /// scope exit.
    pub fn new_page_guarded(&self) -> Option<BasicPageGuard<'_>> {
        let (page_id, frame) = self.new_page()?;
        Some(BasicPageGuard::new(self, page_id, frame))
    }

    /// Fetch a page wrapped in a guard that unpins on scope exit, with
    /// no page latch held.
    pub fn fetch_page_basic(&self, page_id: PageId) -> Option<BasicPageGuard<'_>> {
        let frame = self.fetch_page(page_id)?;
        Some(BasicPageGuard::new(self, page_id, frame))
    }

    /// Fetch a page for shared reading. The returned guard holds the
    /// page's read latch until dropped.
    pub fn fetch_page_read(&self, page_id: PageId) -> Option<ReadPageGuard<'_>> {
        let frame = self.fetch_page(page_id)?;
        // The page latch is taken only after fetch_page has released
        // the pool latch; the frame cannot vanish because it is pinned.
        let lock = frame.page();
        Some(ReadPageGuard::new(self, page_id, lock))
    }

    /// Fetch a page for exclusive writing. The returned guard holds the
    /// page's write latch until dropped and always unpins dirty.
    pub fn fetch_page_write(&self, page_id: PageId) -> Option<WritePageGuard<'_>> {
        let frame = self.fetch_page(page_id)?;
        let lock = frame.page_mut();
        Some(WritePageGuard::new(self, page_id, lock))
    }

    // ========================================================================
    // Public API: introspection
    // ========================================================================

    /// Number of frames in the pool.
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Pin count of a resident page, or `None` if it is not resident.
    pub fn get_pin_count(&self, page_id: PageId) -> Option<u32> {
        let inner = self.latch.lock();
        let &frame_id = inner.page_table.get(&page_id)?;
        Some(self.frames[frame_id.0].pin_count())
    }

    /// Whether the page is currently resident.
    pub fn contains_page(&self, page_id: PageId) -> bool {
        self.latch.lock().page_table.contains_key(&page_id)
    }

    /// Number of frames on the free list.
    pub fn free_frame_count(&self) -> usize {
        self.latch.lock().free_list.len()
    }

    /// Number of resident pages.
    pub fn page_count(&self) -> usize {
        self.latch.lock().page_table.len()
    }

    /// Performance counters.
    pub fn stats(&self) -> &BufferPoolStats {
        &self.stats
    }

    // ========================================================================
    // Internal
    // ========================================================================

    /// Claim a frame for a new occupant: free list first (FIFO), then
    /// the replacer. An evicted victim is written back first if dirty
    /// and unmapped. Returns `None` when everything is pinned.
    fn acquire_victim_frame(&self, inner: &mut PoolInner) -> Option<FrameId> {
        if let Some(frame_id) = inner.free_list.pop_front() {
            return Some(frame_id);
        }

        let frame_id = inner.replacer.evict()?;
        let frame = &self.frames[frame_id.0];
        let old_page_id = frame.page_id();

        if frame.is_dirty() {
            // Write back under the id the frame still holds.
            let page = frame.page();
            if let Err(e) = inner.disk_manager.write_page(old_page_id, &page) {
                panic!("disk write-back of {} failed: {}", old_page_id, e);
            }
            drop(page);
            frame.clear_dirty();
            self.stats.record_write();
        }

        debug!("evicting {} from {}", old_page_id, frame_id);
        inner.page_table.remove(&old_page_id);
        frame.set_page_id(PageId::INVALID);
        self.stats.record_eviction();

        Some(frame_id)
    }

    /// Unconditionally write a resident frame to disk and mark it clean.
    fn flush_frame(&self, inner: &mut PoolInner, frame_id: FrameId, page_id: PageId) {
        let frame = &self.frames[frame_id.0];
        let page = frame.page();
        if let Err(e) = inner.disk_manager.write_page(page_id, &page) {
            panic!("disk flush of {} failed: {}", page_id, e);
        }
        drop(page);
        frame.clear_dirty();
        self.stats.record_write();
    }
}
