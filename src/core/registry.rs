//! Layout Registry: tabel immutable index → layout
//!
//! Lifecycle dua fase:
//! 1. `RegistryBuilder` (single-threaded): layout kanonik sudah terdaftar,
//!    layout ekstensi ditambahkan lewat `register`.
//! 2. `LayoutRegistry` (read-only): hasil `build()`, aman dibaca dari banyak
//!    thread tanpa lock. Tidak ada register/delete setelah fase ini.

use std::sync::Arc;

use tracing::debug;

use super::layout::{LayoutDefinition, CANONICAL_INDEX};
use crate::error::{Error, Result};

const TABLE_SIZE: usize = 256;

/// Registration phase. Canonical layout is pre-registered.
#[derive(Debug)]
pub struct RegistryBuilder {
    table: Vec<Option<Arc<LayoutDefinition>>>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    /// Membuat builder dengan layout kanonik di index 0
    pub fn new() -> Self {
        let mut table = vec![None; TABLE_SIZE];
        table[CANONICAL_INDEX as usize] = Some(Arc::new(LayoutDefinition::canonical()));
        Self { table }
    }

    /// Mendaftarkan layout ekstensi.
    ///
    /// # Errors
    /// `InvalidLayout` jika index sudah terdaftar (termasuk index 0).
    pub fn register(&mut self, definition: LayoutDefinition) -> Result<&mut Self> {
        let index = definition.index();
        let slot = &mut self.table[index as usize];

        if slot.is_some() {
            let reason = if index == CANONICAL_INDEX {
                "canonical layout cannot be overwritten"
            } else {
                "index already registered"
            };
            return Err(Error::invalid_layout(u32::from(index), reason));
        }

        debug!(
            index,
            fields = definition.field_count(),
            "registered extension layout"
        );
        *slot = Some(Arc::new(definition));
        Ok(self)
    }

    /// Freeze: masuk ke fase read-only
    pub fn build(self) -> LayoutRegistry {
        let registry = LayoutRegistry {
            table: self.table.into_boxed_slice(),
        };
        debug!(layouts = registry.len(), "layout registry frozen");
        registry
    }
}

/// Read-only layout table.
///
/// Lookup adalah indexing langsung ke tabel 256 entry (tagged dispatch,
/// bukan virtual dispatch).
#[derive(Debug, Clone)]
pub struct LayoutRegistry {
    table: Box<[Option<Arc<LayoutDefinition>>]>,
}

impl Default for LayoutRegistry {
    fn default() -> Self {
        Self::canonical()
    }
}

impl LayoutRegistry {
    /// Registry yang hanya berisi layout kanonik
    pub fn canonical() -> Self {
        RegistryBuilder::new().build()
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Layout dikembalikan sebagai `Arc` supaya hasil decode bisa
    /// memegang skemanya tanpa lifetime ke registry.
    ///
    /// # Errors
    /// `UnknownLayout` jika index belum terdaftar.
    #[inline(always)]
    pub fn lookup(&self, index: u8) -> Result<&Arc<LayoutDefinition>> {
        self.table[index as usize]
            .as_ref()
            .ok_or(Error::UnknownLayout(index))
    }

    #[inline(always)]
    pub fn contains(&self, index: u8) -> bool {
        self.table[index as usize].is_some()
    }

    /// Registered layouts in index order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<LayoutDefinition>> {
        self.table.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Selalu false: layout kanonik tidak bisa dihapus
    pub fn is_empty(&self) -> bool {
        false
    }
}
