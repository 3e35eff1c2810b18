//! Single-byte bit helpers shared by the header record and the payload
//! encoder.

/// Set or clear bit `index` (0 = least significant) of `byte`.
pub fn set_bit(byte: &mut u8, index: u8, value: bool) {
    debug_assert!(index < 8);
    if value {
        *byte |= 1 << index;
    } else {
        *byte &= !(1 << index);
    }
}

/// Read bit `index` (0 = least significant) of `byte`.
pub fn get_bit(byte: u8, index: u8) -> bool {
    debug_assert!(index < 8);
    byte & (1 << index) != 0
}

/// Replace the low nibble of `byte`, keeping the high nibble.
/// `value` must fit in four bits.
pub fn set_low_nibble(byte: &mut u8, value: u8) {
    debug_assert!(value <= 0x0f);
    *byte = (*byte & 0xf0) | value;
}

/// Replace the high nibble of `byte`, keeping the low nibble.
/// `value` carries its payload in the high four bits.
pub fn set_high_nibble(byte: &mut u8, value: u8) {
    debug_assert!(value & 0x0f == 0);
    *byte = (*byte & 0x0f) | value;
}
