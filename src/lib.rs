//! ecword - Self-describing 64-bit electron configuration words
//!
//! Arsitektur:
//! - Layout Registry: tabel skema immutable, dipilih header 8-bit
//! - Codec: shift-and-mask dengan jumlah operasi tetap per layout
//! - Validator: checksum (= Z) dan flag non-fatal untuk layout kanonik
//! - Word Store: persistence mmap untuk kumpulan word
//!
//! ```
//! use ecword::Codec;
//!
//! let codec = Codec::canonical();
//! let word = codec
//!     .encode_labeled(0, &[("1s", 2), ("2s", 2), ("2p", 6), ("3s", 1)])
//!     .unwrap();
//! assert_eq!(word.header(), 0);
//!
//! let report = codec.decode(word).unwrap();
//! assert_eq!(report.configuration.checksum(), 11);
//! assert!(report.is_plausible());
//! ```

pub mod core;
pub mod error;
pub mod protocol;
pub mod validate;

pub use crate::core::{
    FieldSpec, LayoutDefinition, LayoutRegistry, RegistryBuilder, StoreConfig, WordStore,
    CANONICAL_INDEX,
};
pub use crate::error::{Error, Result};
pub use crate::protocol::{Codec, DecodedConfiguration, Decoder, Word};
pub use crate::validate::{DecodeReport, Validator, ValidatorConfig, Warning};
