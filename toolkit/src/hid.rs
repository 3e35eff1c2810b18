//! Delivery of an assembled buffer to the badge.
//!
//! The badge enumerates as a vendor-specific HID device and, on Linux,
//! shows up as a hidraw node that accepts raw output reports. The first
//! byte of every write is the report ID, which this device fixes at
//! zero.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

/// USB vendor ID the badge enumerates with.
pub const VENDOR_ID: u16 = 0x0416;

/// USB product ID the badge enumerates with.
pub const PRODUCT_ID: u16 = 0x5020;

/// Report ID prepended to every upload.
pub const REPORT_ID: u8 = 0x00;

/// `vendor:product` pair of the badge, as printed in log lines.
pub fn device_id() -> String {
    format!("{VENDOR_ID:04x}:{PRODUCT_ID:04x}")
}

/// Prefix `data` with the report ID and write it to the device node at
/// `path`. Returns the number of bytes handed over, report ID included.
pub fn send(path: &Path, data: &[u8]) -> io::Result<usize> {
    let mut report = Vec::with_capacity(data.len() + 1);
    report.push(REPORT_ID);
    report.extend_from_slice(data);

    let mut device = OpenOptions::new().write(true).open(path)?;
    device.write_all(&report)?;
    device.flush()?;
    Ok(report.len())
}
