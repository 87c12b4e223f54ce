//! Frame - a slot in the buffer pool.
//!
//! A [`Frame`] holds a [`Page`] plus the metadata buffer management
//! needs: the resident page id, a pin count, and a dirty flag.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use parking_lot::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::common::PageId;
use crate::storage::page::Page;

/// A frame in the buffer pool.
///
/// The pool allocates a fixed number of frames at startup; a frame
/// either sits on the free list or holds exactly one resident page.
///
/// # Thread Safety
/// The page payload sits behind an `RwLock` - this is the per-page
/// reader/writer latch that page guards hold. The metadata uses
/// atomics (and a small mutex for the id) so guards can observe it
/// without the pool latch; it is only mutated while the pool latch is
/// held.
pub struct Frame {
    /// The page data, behind the page latch.
    page: RwLock<Page>,

    /// Which page is resident, or `PageId::INVALID` if the frame is free.
    page_id: Mutex<PageId>,

    /// Number of outstanding references preventing eviction.
    pin_count: AtomicU32,

    /// Whether the page has been modified since it was loaded.
    is_dirty: AtomicBool,
}

impl Frame {
    /// Create a new empty frame.
    pub fn new() -> Self {
        Self {
            page: RwLock::new(Page::new()),
            page_id: Mutex::new(PageId::INVALID),
            pin_count: AtomicU32::new(0),
            is_dirty: AtomicBool::new(false),
        }
    }

    /// Acquire the read latch on the page.
    #[inline]
    pub fn page(&self) -> RwLockReadGuard<'_, Page> {
        self.page.read()
    }

    /// Acquire the write latch on the page.
    #[inline]
    pub fn page_mut(&self) -> RwLockWriteGuard<'_, Page> {
        self.page.write()
    }

    /// Get the id of the resident page (`INVALID` when free).
    #[inline]
    pub fn page_id(&self) -> PageId {
        *self.page_id.lock()
    }

    /// Set the resident page id.
    #[inline]
    pub fn set_page_id(&self, page_id: PageId) {
        *self.page_id.lock() = page_id;
    }

    /// Increment the pin count. Returns the new pin count.
    #[inline]
    pub fn pin(&self) -> u32 {
        self.pin_count.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Decrement the pin count. Returns the new pin count.
    ///
    /// # Panics
    /// Panics if the pin count is already 0.
    #[inline]
    pub fn unpin(&self) -> u32 {
        let old = self.pin_count.fetch_sub(1, Ordering::Relaxed);
        assert!(old > 0, "pin count underflow");
        old - 1
    }

    /// Get the current pin count.
    #[inline]
    pub fn pin_count(&self) -> u32 {
        self.pin_count.load(Ordering::Relaxed)
    }

    /// Check if the frame is currently pinned.
    #[inline]
    pub fn is_pinned(&self) -> bool {
        self.pin_count() > 0
    }

    /// Mark the frame as dirty (modified).
    #[inline]
    pub fn mark_dirty(&self) {
        self.is_dirty.store(true, Ordering::Relaxed);
    }

    /// Clear the dirty flag.
    #[inline]
    pub fn clear_dirty(&self) {
        self.is_dirty.store(false, Ordering::Relaxed);
    }

    /// Check if the frame is dirty.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.is_dirty.load(Ordering::Relaxed)
    }

    /// Check if the frame is empty (no page resident).
    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.page_id().is_valid()
    }

    /// Reset the frame to its empty state: zeroed data, `INVALID` id,
    /// no pins, clean.
    pub fn reset(&self) {
        self.page_mut().reset();
        self.set_page_id(PageId::INVALID);
        self.pin_count.store(0, Ordering::Relaxed);
        self.is_dirty.store(false, Ordering::Relaxed);
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_new() {
        let frame = Frame::new();
        assert!(frame.is_empty());
        assert!(!frame.is_pinned());
        assert!(!frame.is_dirty());
        assert_eq!(frame.pin_count(), 0);
        assert_eq!(frame.page_id(), PageId::INVALID);
    }

    #[test]
    fn test_frame_pin_unpin() {
        let frame = Frame::new();

        assert_eq!(frame.pin(), 1);
        assert!(frame.is_pinned());

        assert_eq!(frame.pin(), 2);
        assert_eq!(frame.pin_count(), 2);

        assert_eq!(frame.unpin(), 1);
        assert!(frame.is_pinned());

        assert_eq!(frame.unpin(), 0);
        assert!(!frame.is_pinned());
    }

    #[test]
    #[should_panic(expected = "pin count underflow")]
    fn test_frame_unpin_underflow() {
        let frame = Frame::new();
        frame.unpin();
    }

    #[test]
    fn test_frame_dirty_flag() {
        let frame = Frame::new();
        assert!(!frame.is_dirty());

        frame.mark_dirty();
        assert!(frame.is_dirty());

        frame.clear_dirty();
        assert!(!frame.is_dirty());
    }

    #[test]
    fn test_frame_page_access() {
        let frame = Frame::new();

        frame.page_mut().as_mut_slice()[0] = 0xAB;
        assert_eq!(frame.page().as_slice()[0], 0xAB);
    }

    #[test]
    fn test_frame_page_id() {
        let frame = Frame::new();
        assert!(frame.is_empty());

        frame.set_page_id(PageId::new(42));
        assert_eq!(frame.page_id(), PageId::new(42));
        assert!(!frame.is_empty());
    }

    #[test]
    fn test_frame_reset() {
        let frame = Frame::new();

        frame.set_page_id(PageId::new(99));
        frame.pin();
        frame.mark_dirty();
        frame.page_mut().as_mut_slice()[100] = 0xFF;

        frame.reset();

        assert!(frame.is_empty());
        assert!(!frame.is_pinned());
        assert!(!frame.is_dirty());
        assert_eq!(frame.page().as_slice()[100], 0);
    }

    #[test]
    fn test_frame_concurrent_pin() {
        use std::sync::Arc;
        use std::thread;

        let frame = Arc::new(Frame::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let frame_clone = Arc::clone(&frame);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    frame_clone.pin();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(frame.pin_count(), 1000);
    }
}
