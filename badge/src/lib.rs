pub mod bank;
pub mod bits;
pub mod document;
pub mod error;
pub mod header;

pub use bank::{BankView, unpack_payload};
pub use document::Document;
pub use error::BadgeError;
pub use header::{Brightness, Header, Mode, Speed};

/// Number of independent display banks in the device memory.
pub const BANK_COUNT: usize = 8;

/// Height of the physical LED matrix in pixels.
pub const MATRIX_ROWS: usize = 11;

/// Hard ceiling on header plus all bank payloads, in bytes.
pub const DEVICE_CAPACITY: usize = 8192;

/// Size of one encoded byte-column: one byte per matrix row.
pub const PAYLOAD_UNIT: usize = MATRIX_ROWS;

/// Largest number of payload units even a lone bank may request.
pub const MAX_PAYLOAD_UNITS: usize = (DEVICE_CAPACITY - header::HEADER_SIZE) / PAYLOAD_UNIT;
