//! Disk Manager - low-level file I/O for database pages.
//!
//! The [`DiskManager`] handles all direct file operations: reading and
//! writing fixed-size pages against a single database file. Page ids
//! are allocated by the buffer pool manager; the file simply grows when
//! a page beyond the current end is first written.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::common::config::PAGE_SIZE;
use crate::common::{Error, PageId, Result};
use crate::storage::page::Page;

/// Manages disk I/O for a single database file.
///
/// # File Layout
/// Pages are laid out sequentially: page N lives at file offset
/// `N × PAGE_SIZE`.
///
/// # Thread Safety
/// `DiskManager` is single-threaded by contract. The buffer pool
/// manager serializes access to it under the pool latch.
///
/// # Durability
/// Every write is followed by `fsync()`. Conservative, but this layer
/// has no write-ahead log to lean on.
pub struct DiskManager {
    file: File,
    /// Number of pages the file currently covers.
    page_count: u32,
}

impl DiskManager {
    /// Create a new database file.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)?;

        Ok(Self {
            file,
            page_count: 0,
        })
    }

    /// Open an existing database file.
    ///
    /// # Errors
    /// Returns an error if the file doesn't exist or cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(&path)?;

        let metadata = file.metadata()?;
        let page_count = (metadata.len() / PAGE_SIZE as u64) as u32;

        Ok(Self { file, page_count })
    }

    /// Open an existing database file, or create if it doesn't exist.
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::open(path)
        } else {
            Self::create(path)
        }
    }

    /// Write a page to disk, extending the file if the page lies beyond
    /// the current end.
    ///
    /// # Errors
    /// Returns `Error::InvalidPageId` for the reserved sentinel id, or
    /// an I/O error from the underlying file.
    pub fn write_page(&mut self, page_id: PageId, page: &Page) -> Result<()> {
        if !page_id.is_valid() {
            return Err(Error::InvalidPageId(page_id.0));
        }

        let offset = (page_id.0 as u64) * (PAGE_SIZE as u64);
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(page.as_slice())?;
        self.file.sync_all()?;

        if page_id.0 >= self.page_count {
            self.page_count = page_id.0 + 1;
        }

        Ok(())
    }

    /// Read a page from disk.
    ///
    /// A page id that has never been written yields a zeroed page: the
    /// contents of never-written pages are unspecified, and zeros are
    /// this implementation's rendition.
    ///
    /// # Errors
    /// Returns `Error::InvalidPageId` for the reserved sentinel id, or
    /// an I/O error from the underlying file.
    pub fn read_page(&mut self, page_id: PageId, page: &mut Page) -> Result<()> {
        if !page_id.is_valid() {
            return Err(Error::InvalidPageId(page_id.0));
        }

        if page_id.0 >= self.page_count {
            page.reset();
            return Ok(());
        }

        let offset = (page_id.0 as u64) * (PAGE_SIZE as u64);
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(page.as_mut_slice())?;

        Ok(())
    }

    /// Note that a page has been deleted and its id will not be read
    /// again until rewritten.
    ///
    /// The space is not reclaimed; this is the hook where a free-space
    /// map would record the id for reuse.
    pub fn deallocate_page(&mut self, _page_id: PageId) {}

    /// Get the number of pages the file currently covers.
    #[inline]
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Get the total size of the database file in bytes.
    #[inline]
    pub fn file_size(&self) -> u64 {
        (self.page_count as u64) * (PAGE_SIZE as u64)
    }
}
