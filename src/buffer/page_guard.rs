//! RAII guards for page access.
//!
//! A guard ties a pinned frame's lifetime to a lexical scope, killing
//! the most common buffer pool bug: leaked pins that starve the pool.
//!
//! - [`BasicPageGuard`] - pin only; takes the page latch transiently
//!   for each data access
//! - [`ReadPageGuard`] - pin + shared page latch (multiple allowed)
//! - [`WritePageGuard`] - pin + exclusive page latch, always unpins
//!   dirty
//!
//! All three unpin exactly once: on drop, or earlier via the idempotent
//! [`drop_guard`](BasicPageGuard::drop_guard). Latched guards release
//! the page latch before unpinning. Moving a guard transfers the
//! pin/latch release with it; the borrow checker retires the moved-from
//! binding, so there is no inert state to mismanage.

use std::ops::{Deref, DerefMut};

use parking_lot::{RwLockReadGuard, RwLockWriteGuard};

use crate::buffer::{BufferPoolManager, Frame};
use crate::common::PageId;
use crate::storage::page::Page;

/// Guard holding a pin on a page without a page latch.
///
/// Data access goes through [`page`](Self::page) / [`page_mut`](Self::page_mut),
/// which take the page latch for the duration of the returned borrow.
/// Mutable access marks the guard dirty, and the dirty bit is forwarded
/// to the pool on release.
pub struct BasicPageGuard<'a> {
    bpm: &'a BufferPoolManager,
    /// `None` once the guard has been dropped.
    frame: Option<&'a Frame>,
    page_id: PageId,
    is_dirty: bool,
}

impl<'a> BasicPageGuard<'a> {
    pub(crate) fn new(bpm: &'a BufferPoolManager, page_id: PageId, frame: &'a Frame) -> Self {
        Self {
            bpm,
            frame: Some(frame),
            page_id,
            is_dirty: false,
        }
    }

    /// Get the id of the guarded page.
    #[inline]
    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    /// Read the page data under the shared page latch.
    ///
    /// # Panics
    /// Panics if the guard has already been dropped.
    pub fn page(&self) -> RwLockReadGuard<'a, Page> {
        self.active_frame().page()
    }

    /// Write the page data under the exclusive page latch. Marks the
    /// guard dirty.
    ///
    /// # Panics
    /// Panics if the guard has already been dropped.
    pub fn page_mut(&mut self) -> RwLockWriteGuard<'a, Page> {
        self.is_dirty = true;
        self.active_frame().page_mut()
    }

    /// Release the pin now instead of at end of scope. Safe to call
    /// more than once.
    pub fn drop_guard(&mut self) {
        if self.frame.take().is_some() {
            self.bpm.unpin_page(self.page_id, self.is_dirty);
        }
        self.is_dirty = false;
    }

    fn active_frame(&self) -> &'a Frame {
        match self.frame {
            Some(frame) => frame,
            None => panic!("page guard used after drop"),
        }
    }
}

impl Drop for BasicPageGuard<'_> {
    fn drop(&mut self) {
        self.drop_guard();
    }
}

/// Guard for shared read access to a page.
///
/// Holds the page's read latch for its whole lifetime and `Deref`s to
/// [`Page`]. Always unpins clean.
pub struct ReadPageGuard<'a> {
    bpm: &'a BufferPoolManager,
    page_id: PageId,
    /// `None` once the guard has been dropped.
    lock: Option<RwLockReadGuard<'a, Page>>,
}

impl<'a> ReadPageGuard<'a> {
    pub(crate) fn new(
        bpm: &'a BufferPoolManager,
        page_id: PageId,
        lock: RwLockReadGuard<'a, Page>,
    ) -> Self {
        Self {
            bpm,
            page_id,
            lock: Some(lock),
        }
    }

    /// Get the id of the guarded page.
    #[inline]
    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    /// Release the latch and the pin now instead of at end of scope.
    /// Safe to call more than once. The latch goes first.
    pub fn drop_guard(&mut self) {
        if let Some(lock) = self.lock.take() {
            drop(lock);
            self.bpm.unpin_page(self.page_id, false);
        }
    }
}

impl Deref for ReadPageGuard<'_> {
    type Target = Page;

    fn deref(&self) -> &Page {
        match &self.lock {
            Some(lock) => lock,
            None => panic!("page guard used after drop"),
        }
    }
}

impl Drop for ReadPageGuard<'_> {
    fn drop(&mut self) {
        self.drop_guard();
    }
}

/// Guard for exclusive write access to a page.
///
/// Holds the page's write latch for its whole lifetime and `Deref`s to
/// [`Page`]. Its existence implies potential mutation, so it always
/// unpins dirty.
pub struct WritePageGuard<'a> {
    bpm: &'a BufferPoolManager,
    page_id: PageId,
    /// `None` once the guard has been dropped.
    lock: Option<RwLockWriteGuard<'a, Page>>,
}

impl<'a> WritePageGuard<'a> {
    pub(crate) fn new(
        bpm: &'a BufferPoolManager,
        page_id: PageId,
        lock: RwLockWriteGuard<'a, Page>,
    ) -> Self {
        Self {
            bpm,
            page_id,
            lock: Some(lock),
        }
    }

    /// Get the id of the guarded page.
    #[inline]
    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    /// Release the latch and the pin now instead of at end of scope.
    /// Safe to call more than once. The latch goes first.
    pub fn drop_guard(&mut self) {
        if let Some(lock) = self.lock.take() {
            drop(lock);
            self.bpm.unpin_page(self.page_id, true);
        }
    }
}

impl Deref for WritePageGuard<'_> {
    type Target = Page;

    fn deref(&self) -> &Page {
        match &self.lock {
            Some(lock) => lock,
            None => panic!("page guard used after drop"),
        }
    }
}

impl DerefMut for WritePageGuard<'_> {
    fn deref_mut(&mut self) -> &mut Page {
        match &mut self.lock {
            Some(lock) => lock,
            None => panic!("page guard used after drop"),
        }
    }
}

impl Drop for WritePageGuard<'_> {
    fn drop(&mut self) {
        self.drop_guard();
    }
}
