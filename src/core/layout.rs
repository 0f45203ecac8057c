//! Field Layout: skema bit untuk payload 56-bit
//!
//! Layout:
//! ┌──────────────┬──────────────────────────────────────────────┐
//! │ Header (8b)  │ Payload (56b), field pertama = bit tertinggi │
//! └──────────────┴──────────────────────────────────────────────┘
//!
//! Setiap layout adalah data (tabel field), bukan tipe. Shift dan mask
//! per field dihitung sekali saat layout dibuat sehingga encode/decode
//! hanya melakukan shift-and-mask dengan jumlah operasi tetap.

use serde::Serialize;

use crate::error::{Error, Result};

/// Total bits in a word
pub const WORD_BITS: u32 = 64;
/// Bits reserved for the layout index header
pub const HEADER_BITS: u32 = 8;
/// Bits available to layout fields
pub const PAYLOAD_BITS: u32 = WORD_BITS - HEADER_BITS;
/// Mask covering the 56 payload bits
pub const PAYLOAD_MASK: u64 = (1u64 << PAYLOAD_BITS) - 1;
/// Widest allowed field
pub const MAX_FIELD_WIDTH: u8 = 8;
/// Index of the built-in subshell layout
pub const CANONICAL_INDEX: u8 = 0;

/// Canonical subshell order, most-significant field first.
///
/// Lebar field: s=2, p=3, d=4, f=4 bit. Total tepat 56 bit.
pub const CANONICAL_FIELDS: [(&str, u8); 19] = [
    ("7p", 3),
    ("7s", 2),
    ("6d", 4),
    ("6p", 3),
    ("6s", 2),
    ("5f", 4),
    ("5d", 4),
    ("5p", 3),
    ("5s", 2),
    ("4f", 4),
    ("4d", 4),
    ("4p", 3),
    ("4s", 2),
    ("3d", 4),
    ("3p", 3),
    ("3s", 2),
    ("2p", 3),
    ("2s", 2),
    ("1s", 2),
];

/// Satu field dalam payload: label + lebar bit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    name: String,
    width: u8,
}

impl FieldSpec {
    /// Width belum divalidasi di sini; `LayoutDefinition::new` menolak
    /// width di luar 1..=8.
    pub fn new(name: impl Into<String>, width: u8) -> Self {
        Self {
            name: name.into(),
            width,
        }
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Largest value the field can hold (`2^width - 1`, saturating at `u32::MAX`)
    #[inline(always)]
    pub fn max_value(&self) -> u32 {
        1u32.checked_shl(u32::from(self.width))
            .map_or(u32::MAX, |bound| bound - 1)
    }

    /// Range check terhadap lebar bit field.
    ///
    /// Menerima `i64` supaya input negatif dari caller (mis. CLI) juga
    /// dilaporkan sebagai `ValueOutOfRange`.
    #[inline(always)]
    pub fn check(&self, value: i64) -> Result<u32> {
        if value < 0 || value > i64::from(self.max_value()) {
            return Err(Error::ValueOutOfRange {
                field: self.name.clone(),
                value,
                width: self.width,
            });
        }
        Ok(value as u32)
    }
}

/// Posisi field di dalam word (precomputed)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Slot {
    pub shift: u32,
    pub mask: u64,
}

/// Immutable layout definition: index header + urutan field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutDefinition {
    index: u8,
    fields: Vec<FieldSpec>,
    #[serde(skip)]
    slots: Vec<Slot>,
}

impl LayoutDefinition {
    /// Membuat layout baru dengan validasi struktural.
    ///
    /// # Errors
    /// `InvalidLayout` jika index di luar [0,255], ada width 0 atau > 8,
    /// label kosong/duplikat, atau total width != 56.
    pub fn new(index: u32, fields: Vec<FieldSpec>) -> Result<Self> {
        let header = u8::try_from(index)
            .map_err(|_| Error::invalid_layout(index, "index outside [0, 255]"))?;

        let mut total: u32 = 0;
        for (pos, field) in fields.iter().enumerate() {
            if field.width == 0 || field.width > MAX_FIELD_WIDTH {
                return Err(Error::invalid_layout(
                    index,
                    format!(
                        "field {} has width {} (allowed 1..={})",
                        field.name, field.width, MAX_FIELD_WIDTH
                    ),
                ));
            }
            if field.name.is_empty() {
                return Err(Error::invalid_layout(
                    index,
                    format!("field at position {pos} has an empty label"),
                ));
            }
            if fields[..pos].iter().any(|f| f.name == field.name) {
                return Err(Error::invalid_layout(
                    index,
                    format!("duplicate field label {}", field.name),
                ));
            }
            total += u32::from(field.width);
        }

        if total != PAYLOAD_BITS {
            return Err(Error::invalid_layout(
                index,
                format!("field widths sum to {total}, expected {PAYLOAD_BITS}"),
            ));
        }

        Ok(Self::build(header, fields))
    }

    /// Layout kanonik (index 0), dibangun dari tabel compile-time.
    pub fn canonical() -> Self {
        let fields = CANONICAL_FIELDS
            .iter()
            .map(|&(name, width)| FieldSpec::new(name, width))
            .collect();
        Self::build(CANONICAL_INDEX, fields)
    }

    /// Hitung shift/mask: field pertama menempati bit tertinggi payload.
    fn build(index: u8, fields: Vec<FieldSpec>) -> Self {
        let mut remaining = PAYLOAD_BITS;
        let slots = fields
            .iter()
            .map(|field| {
                let width = u32::from(field.width);
                remaining -= width;
                Slot {
                    shift: remaining,
                    mask: (1u64 << width) - 1,
                }
            })
            .collect();

        Self {
            index,
            fields,
            slots,
        }
    }

    #[inline(always)]
    pub fn index(&self) -> u8 {
        self.index
    }

    #[inline(always)]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    #[inline(always)]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    #[inline(always)]
    pub fn is_canonical(&self) -> bool {
        self.index == CANONICAL_INDEX
    }

    /// Posisi field dengan label tertentu
    pub fn position_of(&self, label: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == label)
    }

    /// Bit offset (dari LSB payload) untuk field pada posisi `pos`
    pub fn shift_of(&self, pos: usize) -> Option<u32> {
        self.slots.get(pos).map(|s| s.shift)
    }

    #[inline(always)]
    pub(crate) fn slots(&self) -> &[Slot] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_widths_sum_to_payload() {
        let total: u32 = CANONICAL_FIELDS.iter().map(|&(_, w)| u32::from(w)).sum();
        assert_eq!(total, PAYLOAD_BITS);
        assert_eq!(LayoutDefinition::canonical().field_count(), 19);
    }

    #[test]
    fn test_canonical_slot_positions() {
        let layout = LayoutDefinition::canonical();
        // 7p di bit tertinggi payload, 1s di 2 bit terbawah
        assert_eq!(layout.shift_of(0), Some(53));
        assert_eq!(layout.shift_of(layout.position_of("1s").unwrap()), Some(0));
        assert_eq!(layout.shift_of(layout.position_of("2s").unwrap()), Some(2));
        assert_eq!(layout.shift_of(layout.position_of("2p").unwrap()), Some(4));
        assert_eq!(layout.shift_of(layout.position_of("3s").unwrap()), Some(7));
    }

    #[test]
    fn test_canonical_matches_validated_build() {
        let fields = CANONICAL_FIELDS
            .iter()
            .map(|&(n, w)| FieldSpec::new(n, w))
            .collect();
        let validated = LayoutDefinition::new(0, fields).unwrap();
        assert_eq!(validated, LayoutDefinition::canonical());
    }

    #[test]
    fn test_rejects_wrong_total_width() {
        let fields = vec![FieldSpec::new("a", 8); 6];
        let err = LayoutDefinition::new(3, fields).unwrap_err();
        assert!(matches!(err, Error::InvalidLayout { index: 3, .. }));
    }

    #[test]
    fn test_rejects_zero_and_wide_fields() {
        let mut fields: Vec<_> = (0..7).map(|i| FieldSpec::new(format!("f{i}"), 8)).collect();
        fields.push(FieldSpec::new("empty", 0));
        assert!(matches!(
            LayoutDefinition::new(1, fields),
            Err(Error::InvalidLayout { .. })
        ));

        let fields = vec![
            FieldSpec::new("wide", 9),
            FieldSpec::new("rest", 8),
            FieldSpec::new("a", 8),
            FieldSpec::new("b", 8),
            FieldSpec::new("c", 8),
            FieldSpec::new("d", 8),
            FieldSpec::new("e", 7),
        ];
        assert!(matches!(
            LayoutDefinition::new(1, fields),
            Err(Error::InvalidLayout { .. })
        ));
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let fields: Vec<_> = (0..7).map(|i| FieldSpec::new(format!("f{i}"), 8)).collect();
        let err = LayoutDefinition::new(256, fields).unwrap_err();
        assert!(matches!(err, Error::InvalidLayout { index: 256, .. }));
    }

    #[test]
    fn test_rejects_duplicate_labels() {
        let fields: Vec<_> = (0..7).map(|_| FieldSpec::new("same", 8)).collect();
        assert!(LayoutDefinition::new(9, fields).is_err());
    }

    #[test]
    fn test_field_check_bounds() {
        let field = FieldSpec::new("2s", 2);
        assert_eq!(field.check(0).unwrap(), 0);
        assert_eq!(field.check(3).unwrap(), 3);
        assert!(matches!(
            field.check(4),
            Err(Error::ValueOutOfRange { value: 4, width: 2, .. })
        ));
        assert!(matches!(
            field.check(-1),
            Err(Error::ValueOutOfRange { value: -1, .. })
        ));
    }

    #[test]
    fn test_max_value_wide_field_saturates() {
        assert_eq!(FieldSpec::new("w", 8).max_value(), 255);
        assert_eq!(FieldSpec::new("w", 31).max_value(), (1 << 31) - 1);
        assert_eq!(FieldSpec::new("w", 32).max_value(), u32::MAX);
        assert_eq!(FieldSpec::new("w", 200).max_value(), u32::MAX);
        assert!(FieldSpec::new("w", 40).check(i64::from(u32::MAX)).is_ok());
        assert!(FieldSpec::new("w", 0).check(1).is_err());
    }
}
