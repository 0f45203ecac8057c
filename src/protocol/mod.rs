//! Protocol Layer: word 64-bit dan codec-nya
//!
//! Prinsip desain:
//! - Fixed-width: satu word = 8 byte, header 8 bit + payload 56 bit
//! - Self-describing: header memilih layout untuk decode payload
//! - Lossless: decode(encode(L, v)) == (L, v, sum(v))

mod codec;
mod word;

pub use codec::{Codec, DecodedConfiguration, Decoder};
pub use word::{Word, WORD_SIZE};
