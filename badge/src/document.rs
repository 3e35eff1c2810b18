use std::fmt;

use zerocopy::IntoBytes;

use crate::bank::BankView;
use crate::error::BadgeError;
use crate::header::{Brightness, HEADER_SIZE, Header};
use crate::{BANK_COUNT, DEVICE_CAPACITY};

/// In-memory model of one complete device upload: the fixed 64-byte
/// header plus the eight bank payloads.
///
/// A document starts from the device template, gets mutated through the
/// global setters and [`BankView`]s, and is serialized by
/// [`Document::assemble`]. Assembly never consumes it; a document that
/// came out oversized can be shrunk and assembled again.
pub struct Document {
    header: Header,
    banks: [Vec<u8>; BANK_COUNT],
    log_handler: Option<Box<dyn Fn(&str)>>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("header", &self.header)
            .field("bank_sizes", &self.banks.each_ref().map(Vec::len))
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            header: Header::default(),
            banks: Default::default(),
            log_handler: None,
        }
    }

    /// Create a document whose validation failures are narrated through
    /// `handler`, one human-readable line per failure.
    pub fn with_log_handler(handler: impl Fn(&str) + 'static) -> Self {
        let mut document = Self::new();
        document.set_log_handler(handler);
        document
    }

    pub fn set_log_handler(&mut self, handler: impl Fn(&str) + 'static) {
        self.log_handler = Some(Box::new(handler));
    }

    pub fn set_brightness(&mut self, value: Brightness) {
        self.header.set_brightness(value);
    }

    pub fn set_year(&mut self, value: u8) {
        self.header.set_year(value);
    }

    pub fn set_month(&mut self, value: u8) {
        self.header.set_month(value);
    }

    pub fn set_day(&mut self, value: u8) {
        self.header.set_day(value);
    }

    pub fn set_hour(&mut self, value: u8) {
        self.header.set_hour(value);
    }

    pub fn set_minute(&mut self, value: u8) {
        self.header.set_minute(value);
    }

    pub fn set_second(&mut self, value: u8) {
        self.header.set_second(value);
    }

    /// Exclusive accessor for one bank slot.
    ///
    /// Panics when `index` is not in `[0, 8)`; a bad index is a caller
    /// bug, not a runtime condition.
    pub fn bank_mut(&mut self, index: usize) -> BankView<'_> {
        BankView::new(self, index)
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The encoded payload currently held by bank `index`. Empty for a
    /// bank that was never encoded or was cleared; the two states are
    /// indistinguishable by design.
    pub fn bank_payload(&self, index: usize) -> &[u8] {
        assert!(index < BANK_COUNT, "bank index out of range: {index}");
        &self.banks[index]
    }

    /// Total upload size as currently encoded, header included.
    pub fn serialized_len(&self) -> usize {
        HEADER_SIZE + self.banks.iter().map(Vec::len).sum::<usize>()
    }

    /// Concatenate the header and the eight bank payloads, in bank
    /// order, into the buffer the device expects.
    ///
    /// Fails when the result would overflow the device memory; the
    /// document is left untouched either way.
    pub fn assemble(&self) -> Result<Vec<u8>, BadgeError> {
        let total = self.serialized_len();
        if total > DEVICE_CAPACITY {
            let err = BadgeError::OversizedTotal {
                total,
                max: DEVICE_CAPACITY,
            };
            self.log(&err.to_string());
            return Err(err);
        }

        let mut buffer = Vec::with_capacity(total);
        buffer.extend_from_slice(self.header.as_bytes());
        for bank in &self.banks {
            buffer.extend_from_slice(bank);
        }
        Ok(buffer)
    }

    pub(crate) fn log(&self, message: &str) {
        if let Some(handler) = &self.log_handler {
            handler(message);
        }
    }

    pub(crate) fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    pub(crate) fn bank_payload_mut(&mut self, index: usize) -> &mut Vec<u8> {
        &mut self.banks[index]
    }
}
