use crate::bits::{get_bit, set_bit};
use crate::document::Document;
use crate::error::BadgeError;
use crate::header::{Mode, Speed};
use crate::{BANK_COUNT, MATRIX_ROWS, MAX_PAYLOAD_UNITS, PAYLOAD_UNIT};

/// Bound accessor over one bank slot of a [`Document`].
///
/// A view owns no data. Every mutation lands in the parent document's
/// payload buffer for this bank and the header bits and bytes reserved
/// for it, never in another bank's region.
pub struct BankView<'a> {
    document: &'a mut Document,
    index: usize,
}

impl<'a> BankView<'a> {
    pub(crate) fn new(document: &'a mut Document, index: usize) -> Self {
        assert!(index < BANK_COUNT, "bank index out of range: {index}");
        Self { document, index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn set_blinking(&mut self, on: bool) {
        self.document.header_mut().set_blink(self.index, on);
    }

    pub fn set_animated_border(&mut self, on: bool) {
        self.document.header_mut().set_animated_border(self.index, on);
    }

    pub fn set_mode(&mut self, value: Mode) {
        self.document.header_mut().set_mode(self.index, value);
    }

    pub fn set_speed(&mut self, value: Speed) {
        self.document.header_mut().set_speed(self.index, value);
    }

    /// Encode an 11-row bitmap into this bank's payload.
    ///
    /// `len` is the logical pixel width and `lit(x, y)` reports whether
    /// the pixel at column `x`, row `y` is on. Trailing all-blank
    /// columns are dropped first, matching the device skipping empty
    /// scroll frames; a fully blank bitmap clears the bank. Re-encoding
    /// replaces the previous payload entirely and yields identical bytes
    /// for identical input.
    ///
    /// Fails, leaving the bank untouched, when the trimmed bitmap alone
    /// would not fit in the device memory.
    pub fn set_pixels<F>(&mut self, len: usize, lit: F) -> Result<(), BadgeError>
    where
        F: Fn(usize, usize) -> bool,
    {
        let mut len = len;
        while len > 0 && (0..MATRIX_ROWS).all(|row| !lit(len - 1, row)) {
            len -= 1;
        }

        if len == 0 {
            self.document.bank_payload_mut(self.index).clear();
            self.document.header_mut().set_payload_units(self.index, 0);
            return Ok(());
        }

        let byte_columns = len.div_ceil(8);
        if byte_columns > MAX_PAYLOAD_UNITS {
            let err = BadgeError::OversizedBank {
                bank: self.index,
                units: byte_columns,
                max_units: MAX_PAYLOAD_UNITS,
            };
            self.document.log(&err.to_string());
            return Err(err);
        }

        // Row-major within each byte-column: the 11 row bytes of
        // byte-column 0, then the 11 of byte-column 1, and so on.
        let mut payload = vec![0u8; byte_columns * PAYLOAD_UNIT];
        for byte_column in 0..byte_columns {
            for row in 0..MATRIX_ROWS {
                let mut byte = 0u8;
                for digit in 0..8 {
                    let x = byte_column * 8 + digit;
                    let pixel = x < len && lit(x, row);
                    set_bit(&mut byte, (7 - digit) as u8, pixel);
                }
                payload[byte_column * PAYLOAD_UNIT + row] = byte;
            }
        }

        *self.document.bank_payload_mut(self.index) = payload;
        self.document
            .header_mut()
            .set_payload_units(self.index, byte_columns as u16);
        Ok(())
    }
}

/// Undo the packing of [`BankView::set_pixels`]: rebuild the 11-row
/// bitmap from an encoded payload, one `[bool; 11]` per pixel column.
///
/// The result width is always a multiple of 8; the zero-padding bits of
/// the last byte-column decode as unlit pixels.
pub fn unpack_payload(payload: &[u8]) -> Result<Vec<[bool; MATRIX_ROWS]>, BadgeError> {
    if !payload.len().is_multiple_of(PAYLOAD_UNIT) {
        return Err(BadgeError::MalformedPayload {
            len: payload.len(),
        });
    }

    let byte_columns = payload.len() / PAYLOAD_UNIT;
    let mut columns = vec![[false; MATRIX_ROWS]; byte_columns * 8];
    for (byte_column, unit) in payload.chunks(PAYLOAD_UNIT).enumerate() {
        for (row, &byte) in unit.iter().enumerate() {
            for digit in 0..8 {
                columns[byte_column * 8 + digit][row] = get_bit(byte, (7 - digit) as u8);
            }
        }
    }
    Ok(columns)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_trailing_blank_columns_are_trimmed() {
        let mut document = Document::new();
        document
            .bank_mut(0)
            .set_pixels(50, |x, _| x == 0)
            .expect("error encoding");

        assert_eq!(document.bank_payload(0).len(), 11);
        assert_eq!(document.header().payload_units(0), 1);
    }

    #[test]
    fn test_all_blank_bitmap_clears_the_bank() {
        let mut document = Document::new();
        document
            .bank_mut(4)
            .set_pixels(40, |x, y| x < 20 && y < 5)
            .expect("error encoding");
        assert_eq!(document.header().payload_units(4), 3);

        document
            .bank_mut(4)
            .set_pixels(500, |_, _| false)
            .expect("error clearing");
        assert!(document.bank_payload(4).is_empty());
        assert_eq!(document.header().payload_units(4), 0);
    }

    #[test]
    fn test_msb_first_bit_order() {
        let mut document = Document::new();
        // Columns 0 and 7 of row 2 lit: one byte-column, byte for row 2
        // has its outermost bits set.
        document
            .bank_mut(0)
            .set_pixels(8, |x, y| y == 2 && (x == 0 || x == 7))
            .expect("error encoding");

        let payload = document.bank_payload(0);
        assert_eq!(payload.len(), 11);
        assert_eq!(payload[2], 0x81);
        assert!(payload.iter().enumerate().all(|(i, &b)| i == 2 || b == 0));
    }

    #[test]
    fn test_padding_columns_stay_unlit() {
        let mut document = Document::new();
        // Width 9 spills one pixel into the second byte-column; the
        // remaining 7 digits must pack as zeros even though the
        // predicate would light them.
        document
            .bank_mut(0)
            .set_pixels(9, |_, y| y == 0)
            .expect("error encoding");

        let payload = document.bank_payload(0);
        assert_eq!(payload.len(), 22);
        assert_eq!(payload[0], 0xff);
        assert_eq!(payload[11], 0x80);
    }

    #[test]
    fn test_reencoding_replaces_the_payload() {
        let mut document = Document::new();
        document
            .bank_mut(2)
            .set_pixels(64, |_, _| true)
            .expect("error encoding wide");
        assert_eq!(document.header().payload_units(2), 8);

        document
            .bank_mut(2)
            .set_pixels(3, |_, _| true)
            .expect("error encoding narrow");
        assert_eq!(document.header().payload_units(2), 1);
        assert_eq!(document.bank_payload(2).len(), 11);
    }

    #[test]
    fn test_oversized_bank_keeps_prior_state() {
        let mut document = Document::new();
        document
            .bank_mut(5)
            .set_pixels(8, |_, _| true)
            .expect("error encoding");
        let before = document.bank_payload(5).to_vec();

        let err = document
            .bank_mut(5)
            .set_pixels(MAX_PAYLOAD_UNITS * 8 + 1, |_, _| true)
            .expect_err("oversized bitmap should be rejected");
        assert!(matches!(err, BadgeError::OversizedBank { bank: 5, .. }));
        assert_eq!(document.bank_payload(5), before);
        assert_eq!(document.header().payload_units(5), 1);
    }

    #[test]
    fn test_capacity_boundary() {
        let mut document = Document::new();
        // Exactly the limit is fine...
        document
            .bank_mut(0)
            .set_pixels(MAX_PAYLOAD_UNITS * 8, |x, _| x % 2 == 0)
            .expect("error encoding at the limit");
        assert_eq!(
            document.header().payload_units(0) as usize,
            MAX_PAYLOAD_UNITS
        );

        // ...one more byte-column is not.
        document
            .bank_mut(1)
            .set_pixels(MAX_PAYLOAD_UNITS * 8 + 1, |_, _| true)
            .expect_err("one unit past the limit should be rejected");
    }

    #[test]
    fn test_unpack_rejects_ragged_input() {
        let err = unpack_payload(&[0u8; 12]).expect_err("12 bytes is not a unit");
        assert_eq!(err, BadgeError::MalformedPayload { len: 12 });
    }
}
