//! Core module: skema layout dan penyimpanan word
//!
//! Prinsip desain:
//! - Layout adalah data: tabel field immutable, dipilih lewat header 8-bit
//! - Dua fase: registrasi dulu, setelah itu read-only tanpa lock
//! - Persistence via mmap, word disimpan big-endian

mod layout;
mod registry;
mod word_store;

pub use layout::{
    FieldSpec, LayoutDefinition, CANONICAL_FIELDS, CANONICAL_INDEX, HEADER_BITS, MAX_FIELD_WIDTH,
    PAYLOAD_BITS, PAYLOAD_MASK, WORD_BITS,
};
pub use registry::{LayoutRegistry, RegistryBuilder};
pub use word_store::{StoreConfig, WordStore};
