//! Encoder/Decoder untuk word konfigurasi elektron
//!
//! Encode: lookup layout → cek arity dan range → shift-and-or per field.
//! Decode: header → lookup layout → shift-and-mask per field → Validator.
//!
//! Jumlah operasi bit tetap per layout (dua per field + header), tidak
//! bergantung pada nilai yang di-encode.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::word::{Word, WORD_SIZE};
use crate::core::{LayoutDefinition, LayoutRegistry};
use crate::error::{Error, Result};
use crate::validate::{DecodeReport, Validator};

/// Hasil decode, immutable.
///
/// Memegang `Arc` ke layout supaya nilai bisa diakses lewat label.
#[derive(Clone)]
pub struct DecodedConfiguration {
    layout: Arc<LayoutDefinition>,
    values: Vec<u32>,
    checksum: u32,
}

impl DecodedConfiguration {
    #[inline(always)]
    pub fn layout_index(&self) -> u8 {
        self.layout.index()
    }

    pub fn layout(&self) -> &LayoutDefinition {
        &self.layout
    }

    /// Values in layout order (most-significant field first)
    #[inline(always)]
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Sum of all values (Z for a neutral canonical configuration)
    #[inline(always)]
    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    /// Nilai field berdasarkan label
    pub fn get(&self, label: &str) -> Option<u32> {
        self.layout.position_of(label).map(|pos| self.values[pos])
    }

    /// `(label, value)` pairs in layout order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.layout
            .fields()
            .iter()
            .map(|f| f.name())
            .zip(self.values.iter().copied())
    }
}

impl PartialEq for DecodedConfiguration {
    fn eq(&self, other: &Self) -> bool {
        self.layout_index() == other.layout_index()
            && self.values == other.values
            && self.checksum == other.checksum
    }
}

impl Eq for DecodedConfiguration {}

impl fmt::Debug for DecodedConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedConfiguration")
            .field("layout_index", &self.layout_index())
            .field("values", &self.values)
            .field("checksum", &self.checksum)
            .finish()
    }
}

impl Serialize for DecodedConfiguration {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Repr<'a> {
            layout_index: u8,
            labels: Vec<&'a str>,
            values: &'a [u32],
            checksum: u32,
        }

        Repr {
            layout_index: self.layout_index(),
            labels: self.layout.fields().iter().map(|f| f.name()).collect(),
            values: &self.values,
            checksum: self.checksum,
        }
        .serialize(serializer)
    }
}

/// Codec terikat ke satu registry (fase read-only).
///
/// `Clone` murah: registry di-share lewat `Arc`.
#[derive(Debug, Clone)]
pub struct Codec {
    registry: Arc<LayoutRegistry>,
    validator: Validator,
}

impl Default for Codec {
    fn default() -> Self {
        Self::canonical()
    }
}

impl Codec {
    pub fn new(registry: Arc<LayoutRegistry>) -> Self {
        Self::with_validator(registry, Validator::default())
    }

    pub fn with_validator(registry: Arc<LayoutRegistry>, validator: Validator) -> Self {
        Self {
            registry,
            validator,
        }
    }

    /// Codec dengan registry yang hanya berisi layout kanonik
    pub fn canonical() -> Self {
        Self::new(Arc::new(LayoutRegistry::canonical()))
    }

    pub fn registry(&self) -> &LayoutRegistry {
        &self.registry
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Encode values (layout order) into a word.
    ///
    /// Checksum kanonik di luar [1,118] tidak menggagalkan encode dan hanya
    /// dicatat lewat `warn!`. Caller yang butuh warning-nya sebagai nilai
    /// memanggil `self.validator().check_encode(..)` sendiri.
    ///
    /// # Errors
    /// `UnknownLayout`, `ArityMismatch`, atau `ValueOutOfRange`.
    #[inline(always)]
    pub fn encode(&self, layout_index: u8, values: &[u32]) -> Result<Word> {
        let layout = self.registry.lookup(layout_index)?;
        check_values(layout, values)?;
        self.validator.check_encode(layout_index, values);
        Ok(pack(layout, values))
    }

    /// Encode by subshell label. Field yang tidak disebut bernilai 0.
    ///
    /// # Errors
    /// `UnknownField` untuk label asing, `DuplicateField` untuk label yang
    /// disebut dua kali, selain error `encode`.
    pub fn encode_labeled(&self, layout_index: u8, pairs: &[(&str, u32)]) -> Result<Word> {
        let layout = self.registry.lookup(layout_index)?;
        let mut values = vec![0u32; layout.field_count()];
        let mut seen = vec![false; layout.field_count()];

        for &(label, value) in pairs {
            let pos = layout
                .position_of(label)
                .ok_or_else(|| Error::UnknownField(label.to_string()))?;
            if seen[pos] {
                return Err(Error::DuplicateField(label.to_string()));
            }
            seen[pos] = true;
            values[pos] = value;
        }

        self.encode(layout_index, &values)
    }

    /// Encode batch, all-or-nothing
    pub fn encode_batch(&self, entries: &[(u8, &[u32])]) -> Result<Vec<Word>> {
        entries
            .iter()
            .map(|&(layout_index, values)| self.encode(layout_index, values))
            .collect()
    }

    /// Decode a word (raw `u64` atau `Word`).
    ///
    /// # Errors
    /// `UnknownLayout` jika header tidak terdaftar. Checksum yang tidak
    /// masuk akal hanya muncul sebagai warning di report.
    #[inline(always)]
    pub fn decode(&self, word: impl Into<Word>) -> Result<DecodeReport> {
        let word = word.into();
        let layout = self.registry.lookup(word.header())?;
        Ok(self.validator.inspect(unpack(layout, word)))
    }

    /// Decode dari bitstring 64 karakter
    ///
    /// # Errors
    /// `MalformedWord` untuk bitstring yang tidak valid, selain error `decode`.
    pub fn decode_bits(&self, bits: &str) -> Result<DecodeReport> {
        self.decode(Word::from_bits(bits)?)
    }

    /// Streaming decoder atas buffer word big-endian
    pub fn decoder<'a>(&'a self, buffer: &'a [u8]) -> Decoder<'a> {
        Decoder::new(self, buffer)
    }
}

fn check_values(layout: &LayoutDefinition, values: &[u32]) -> Result<()> {
    if values.len() != layout.field_count() {
        return Err(Error::ArityMismatch {
            index: layout.index(),
            expected: layout.field_count(),
            actual: values.len(),
        });
    }
    for (field, &value) in layout.fields().iter().zip(values) {
        field.check(i64::from(value))?;
    }
    Ok(())
}

/// Values sudah dicek; loop ini tanpa branch yang bergantung data.
#[inline(always)]
fn pack(layout: &LayoutDefinition, values: &[u32]) -> Word {
    let mut payload = 0u64;
    for (slot, &value) in layout.slots().iter().zip(values) {
        payload |= (u64::from(value) & slot.mask) << slot.shift;
    }
    Word::new(layout.index(), payload)
}

#[inline(always)]
fn unpack(layout: &Arc<LayoutDefinition>, word: Word) -> DecodedConfiguration {
    let payload = word.payload();
    let values: Vec<u32> = layout
        .slots()
        .iter()
        .map(|slot| ((payload >> slot.shift) & slot.mask) as u32)
        .collect();
    let checksum = values.iter().sum();

    DecodedConfiguration {
        layout: Arc::clone(layout),
        values,
        checksum,
    }
}

/// Decoder untuk buffer berisi word 8-byte big-endian (mis. isi WordStore)
pub struct Decoder<'a> {
    codec: &'a Codec,
    buffer: &'a [u8],
    read_pos: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(codec: &'a Codec, buffer: &'a [u8]) -> Self {
        Self {
            codec,
            buffer,
            read_pos: 0,
        }
    }

    /// Remaining bytes
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.read_pos)
    }
}

impl<'a> Iterator for Decoder<'a> {
    type Item = Result<DecodeReport>;

    fn next(&mut self) -> Option<Self::Item> {
        let remaining = self.remaining();
        if remaining == 0 {
            return None;
        }

        if remaining < WORD_SIZE {
            // Sisa byte tidak cukup untuk satu word
            self.read_pos = self.buffer.len();
            return Some(Err(Error::MalformedWord(format!(
                "trailing {remaining} bytes, expected {WORD_SIZE}"
            ))));
        }

        let mut bytes = [0u8; WORD_SIZE];
        bytes.copy_from_slice(&self.buffer[self.read_pos..self.read_pos + WORD_SIZE]);
        self.read_pos += WORD_SIZE;

        Some(self.codec.decode(Word::from_be_bytes(bytes)))
    }
}
