//! Memory-Mapped Word Store
//!
//! File append-only berisi word 8-byte big-endian:
//! ┌───────────────────────────────────────┐
//! │ StoreHeader (64 bytes, fixed)         │
//! ├───────────────────────────────────────┤
//! │ Word 0 │ Word 1 │ ... │ Word cap-1    │
//! └───────────────────────────────────────┘
//!
//! Isi file bisa langsung diberikan ke `Decoder` lewat `as_bytes()`.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use memmap2::{MmapMut, MmapOptions};
use tracing::debug;

use crate::error::{Error, Result};
use crate::protocol::{Word, WORD_SIZE};

/// Header di awal file - metadata store
#[repr(C, align(64))]
struct StoreHeader {
    magic: u64,      // Magic number untuk validasi
    version: u32,    // Versi format
    _reserved: u32,  // Padding
    capacity: u64,   // Kapasitas dalam jumlah word
    len: AtomicU64,  // Jumlah word yang sudah ditulis
}

const MAGIC: u64 = 0x4543_574F_5244_5F56; // "ECWORD_V"
const VERSION: u32 = 1;
const HEADER_SIZE: usize = std::mem::size_of::<StoreHeader>();

/// Ukuran file untuk `capacity` word, None jika overflow
#[inline]
fn file_size(capacity: u64) -> Option<u64> {
    capacity
        .checked_mul(WORD_SIZE as u64)?
        .checked_add(HEADER_SIZE as u64)
        .filter(|&size| usize::try_from(size).is_ok())
}

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: PathBuf,
    /// Capacity in words (used only when the file is created)
    pub capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("ecword_store.dat"),
            capacity: 64 * 1024,
        }
    }
}

/// Mmap-backed append-only word storage
pub struct WordStore {
    mmap: MmapMut,
    capacity: usize,
}

impl WordStore {
    /// Membuat atau membuka word store
    ///
    /// # Arguments
    /// * `path` - Path ke file storage
    /// * `capacity` - Kapasitas dalam word, hanya dipakai saat file baru
    ///
    /// # Errors
    /// `Io` untuk kegagalan file/mmap, `CorruptStore` jika file sudah ada
    /// tetapi bukan word store, atau jika ukuran file untuk `capacity`
    /// tidak muat di u64/usize.
    pub fn open<P: AsRef<Path>>(path: P, capacity: usize) -> Result<Self> {
        let path = path.as_ref();
        if capacity == 0 {
            return Err(Error::CorruptStore("capacity must be non-zero".to_string()));
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let existing = file.metadata()?.len();
        let fresh = existing == 0;

        if fresh {
            let size = file_size(capacity as u64).ok_or_else(|| {
                Error::CorruptStore(format!("capacity {capacity} exceeds the addressable file size"))
            })?;
            file.set_len(size)?;
        } else if existing < HEADER_SIZE as u64 {
            return Err(Error::CorruptStore(format!(
                "{} is {} bytes, smaller than the store header",
                path.display(),
                existing
            )));
        }

        // SAFETY: File dibuka read/write dan tidak di-share ke proses lain
        let mut mmap = unsafe { MmapOptions::new().map_mut(&file)? };

        let capacity = if fresh {
            // SAFETY: mmap page-aligned dan panjangnya file_size(capacity) >= HEADER_SIZE
            unsafe {
                std::ptr::write(
                    mmap.as_mut_ptr() as *mut StoreHeader,
                    StoreHeader {
                        magic: MAGIC,
                        version: VERSION,
                        _reserved: 0,
                        capacity: capacity as u64,
                        len: AtomicU64::new(0),
                    },
                );
            }
            capacity
        } else {
            // SAFETY: Ukuran file sudah dicek >= HEADER_SIZE
            let header = unsafe { &*(mmap.as_ptr() as *const StoreHeader) };
            if header.magic != MAGIC || header.version != VERSION {
                return Err(Error::CorruptStore(format!(
                    "{} is not a word store (bad magic or version)",
                    path.display()
                )));
            }
            let stored = header.capacity;
            let fits = file_size(stored).map_or(false, |needed| existing >= needed);
            if stored == 0 || !fits || header.len.load(Ordering::Acquire) > stored {
                return Err(Error::CorruptStore(format!(
                    "{} is truncated or has an invalid capacity or length",
                    path.display()
                )));
            }
            // file_size() menjamin stored * WORD_SIZE muat di usize
            stored as usize
        };

        let store = Self { mmap, capacity };
        debug!(
            path = %path.display(),
            capacity = store.capacity,
            len = store.len(),
            fresh,
            "opened word store"
        );
        Ok(store)
    }

    /// Buka store sesuai konfigurasi
    pub fn open_with(config: &StoreConfig) -> Result<Self> {
        Self::open(&config.path, config.capacity)
    }

    #[inline(always)]
    fn header(&self) -> &StoreHeader {
        // SAFETY: Header berada di awal mmap region, divalidasi di open()
        unsafe { &*(self.mmap.as_ptr() as *const StoreHeader) }
    }

    /// Menulis satu word ke akhir store
    ///
    /// Returns posisi word, atau None jika store penuh
    #[inline(always)]
    pub fn append(&mut self, word: Word) -> Option<usize> {
        let pos = self.len();
        if pos >= self.capacity {
            return None;
        }

        let offset = HEADER_SIZE + pos * WORD_SIZE;
        self.mmap[offset..offset + WORD_SIZE].copy_from_slice(&word.to_be_bytes());

        // SAFETY: Header berada di awal mmap region, divalidasi di open()
        let header = unsafe { &*(self.mmap.as_mut_ptr() as *const StoreHeader) };
        // Release: word harus terlihat sebelum len bertambah
        header.len.store(pos as u64 + 1, Ordering::Release);

        Some(pos)
    }

    /// Membaca word pada posisi tertentu
    #[inline(always)]
    pub fn get(&self, pos: usize) -> Option<Word> {
        if pos >= self.len() {
            return None;
        }
        let offset = HEADER_SIZE + pos * WORD_SIZE;
        let mut bytes = [0u8; WORD_SIZE];
        bytes.copy_from_slice(&self.mmap[offset..offset + WORD_SIZE]);
        Some(Word::from_be_bytes(bytes))
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.header().len.load(Ordering::Acquire) as usize
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Words in append order
    pub fn iter(&self) -> impl Iterator<Item = Word> + '_ {
        (0..self.len()).filter_map(move |pos| self.get(pos))
    }

    /// Raw big-endian bytes dari word yang sudah ditulis (zero-copy)
    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap[HEADER_SIZE..HEADER_SIZE + self.len() * WORD_SIZE]
    }

    /// Flush ke disk
    pub fn flush(&self) -> Result<()> {
        self.mmap.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_size() {
        assert_eq!(HEADER_SIZE, 64);
    }

    #[test]
    fn test_word_store_basic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("basic.dat");

        let mut store = WordStore::open(&path, 4).unwrap();
        assert!(store.is_empty());

        let pos = store.append(Word::from_u64(234)).unwrap();
        assert_eq!(pos, 0);
        assert_eq!(store.get(0), Some(Word::from_u64(234)));
        assert_eq!(store.get(1), None);
        assert_eq!(store.as_bytes(), &234u64.to_be_bytes()[..]);
    }

    #[test]
    fn test_word_store_full() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = WordStore::open(dir.path().join("full.dat"), 2).unwrap();

        assert_eq!(store.append(Word::from_u64(1)), Some(0));
        assert_eq!(store.append(Word::from_u64(2)), Some(1));
        assert_eq!(store.append(Word::from_u64(3)), None);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(WordStore::open(dir.path().join("zero.dat"), 0).is_err());
    }

    #[test]
    fn test_file_size_overflow() {
        assert_eq!(file_size(4), Some(64 + 32));
        assert_eq!(file_size(u64::MAX / 4), None);
        assert_eq!(file_size((u64::MAX - 63) / 8 + 1), None);
    }

    #[test]
    fn test_oversized_capacity_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.dat");

        // usize::MAX / 8 word: HEADER_SIZE + capacity * 8 melewati u64
        let result = WordStore::open(&path, usize::MAX / 8);
        assert!(matches!(result, Err(Error::CorruptStore(_))));
        assert!(WordStore::open(&path, usize::MAX / 4).is_err());
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
    }
}
