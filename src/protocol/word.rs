//! Word Format: 64-bit, self-describing
//!
//! Layout (MSB first):
//! ┌────────────────────┬──────────────────────────────────────┐
//! │ bits 63..56        │ bits 55..0                           │
//! │ Layout Index (u8)  │ Payload (field sesuai layout)        │
//! └────────────────────┴──────────────────────────────────────┘
//!
//! Word tidak menyimpan referensi ke registry; hanya bit pattern.
//! Representasi teks kanonik: 64 karakter '0'/'1', MSB dulu.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::core::{PAYLOAD_BITS, PAYLOAD_MASK, WORD_BITS};
use crate::error::{Error, Result};

/// Size of a word on the wire
pub const WORD_SIZE: usize = 8;

/// Encoded electron configuration word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Word(u64);

impl Word {
    /// Gabungkan header dan payload. Bit payload di atas 56 dibuang.
    #[inline(always)]
    pub const fn new(header: u8, payload: u64) -> Self {
        Self(((header as u64) << PAYLOAD_BITS) | (payload & PAYLOAD_MASK))
    }

    #[inline(always)]
    pub const fn from_u64(raw: u64) -> Self {
        Self(raw)
    }

    #[inline(always)]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Layout index (top 8 bits)
    #[inline(always)]
    pub const fn header(self) -> u8 {
        (self.0 >> PAYLOAD_BITS) as u8
    }

    /// Raw 56-bit payload
    #[inline(always)]
    pub const fn payload(self) -> u64 {
        self.0 & PAYLOAD_MASK
    }

    /// Ganti header, payload tidak berubah
    #[inline(always)]
    pub const fn with_header(self, header: u8) -> Self {
        Self::new(header, self.payload())
    }

    /// 64-character bitstring, MSB first
    pub fn to_bits(self) -> String {
        format!("{:064b}", self.0)
    }

    /// Parse bitstring 64 karakter.
    ///
    /// # Errors
    /// `MalformedWord` jika panjang != 64 atau ada karakter selain '0'/'1'.
    pub fn from_bits(bits: &str) -> Result<Self> {
        if bits.len() != WORD_BITS as usize {
            return Err(Error::MalformedWord(format!(
                "expected {} binary digits, got {}",
                WORD_BITS,
                bits.chars().count()
            )));
        }

        let mut raw = 0u64;
        for (pos, byte) in bits.bytes().enumerate() {
            let bit = match byte {
                b'0' => 0,
                b'1' => 1,
                other => {
                    return Err(Error::MalformedWord(format!(
                        "non-binary character {:?} at position {}",
                        other as char, pos
                    )))
                }
            };
            raw = (raw << 1) | bit;
        }

        Ok(Self(raw))
    }

    #[inline(always)]
    pub const fn to_be_bytes(self) -> [u8; WORD_SIZE] {
        self.0.to_be_bytes()
    }

    #[inline(always)]
    pub const fn from_be_bytes(bytes: [u8; WORD_SIZE]) -> Self {
        Self(u64::from_be_bytes(bytes))
    }
}

impl From<u64> for Word {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<Word> for u64 {
    fn from(word: Word) -> Self {
        word.0
    }
}

impl FromStr for Word {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_bits(s)
    }
}

impl TryFrom<&str> for Word {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::from_bits(s)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:064b}", self.0)
    }
}
