use serde::{Deserialize, Serialize};
use zerocopy_derive::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::BANK_COUNT;
use crate::bits::{set_bit, set_high_nibble, set_low_nibble};
use crate::error::BadgeError;

/// Size of the fixed header record preceding all bank payloads.
pub const HEADER_SIZE: usize = 64;

/// Magic tag at the start of every upload.
pub const MAGIC: &[u8; 5] = b"wang\0";

/// Global LED brightness, stored at header byte 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Brightness {
    /// 100% duty cycle.
    #[default]
    Full,
    /// 75%.
    High,
    /// 50%.
    Medium,
    /// 25%.
    Low,
}

impl Brightness {
    /// Raw header byte for this brightness level.
    pub const fn as_raw(self) -> u8 {
        match self {
            Self::Full => 0x00,
            Self::High => 0x10,
            Self::Medium => 0x20,
            Self::Low => 0x40,
        }
    }
}

/// How a bank presents its bitmap, stored in the low nibble of the
/// bank's mode/speed byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    LeftScroll,
    RightScroll,
    UpScroll,
    DownScroll,
    Centered,
    Snowflake,
    DropDown,
    Curtain,
    Laser,
}

impl Mode {
    /// Raw low-nibble code for this mode.
    pub const fn as_raw(self) -> u8 {
        match self {
            Self::LeftScroll => 0x00,
            Self::RightScroll => 0x01,
            Self::UpScroll => 0x02,
            Self::DownScroll => 0x03,
            Self::Centered => 0x04,
            Self::Snowflake => 0x05,
            Self::DropDown => 0x06,
            Self::Curtain => 0x07,
            Self::Laser => 0x08,
        }
    }
}

impl TryFrom<u8> for Mode {
    type Error = BadgeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Self::LeftScroll),
            0x01 => Ok(Self::RightScroll),
            0x02 => Ok(Self::UpScroll),
            0x03 => Ok(Self::DownScroll),
            0x04 => Ok(Self::Centered),
            0x05 => Ok(Self::Snowflake),
            0x06 => Ok(Self::DropDown),
            0x07 => Ok(Self::Curtain),
            0x08 => Ok(Self::Laser),
            other => Err(BadgeError::UnknownCode {
                kind: "mode",
                value: other,
            }),
        }
    }
}

/// Animation speed of a bank, stored in the high nibble of the bank's
/// mode/speed byte. `Five` is the device power-on default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speed {
    One,
    Two,
    Three,
    Four,
    #[default]
    Five,
    Six,
    Seven,
    Eight,
}

impl Speed {
    /// Raw high-nibble code for this speed.
    pub const fn as_raw(self) -> u8 {
        match self {
            Self::One => 0x00,
            Self::Two => 0x10,
            Self::Three => 0x20,
            Self::Four => 0x30,
            Self::Five => 0x40,
            Self::Six => 0x50,
            Self::Seven => 0x60,
            Self::Eight => 0x70,
        }
    }
}

impl TryFrom<u8> for Speed {
    type Error = BadgeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Self::One),
            0x10 => Ok(Self::Two),
            0x20 => Ok(Self::Three),
            0x30 => Ok(Self::Four),
            0x40 => Ok(Self::Five),
            0x50 => Ok(Self::Six),
            0x60 => Ok(Self::Seven),
            0x70 => Ok(Self::Eight),
            other => Err(BadgeError::UnknownCode {
                kind: "speed",
                value: other,
            }),
        }
    }
}

/// The fixed 64-byte header record.
///
/// Field order mirrors the device layout exactly, so the struct can be
/// handed to the wire as-is via `zerocopy::IntoBytes`:
///
/// | bytes  | field                                                |
/// |--------|------------------------------------------------------|
/// | 0-4    | magic tag `"wang\0"`                                 |
/// | 5      | brightness code                                      |
/// | 6      | blink bitmask, bit *i* = bank *i*                    |
/// | 7      | animated-border bitmask, bit *i* = bank *i*          |
/// | 8-15   | per bank: low nibble mode, high nibble speed         |
/// | 16-31  | per bank: big-endian u16 payload length in units     |
/// | 32-37  | reserved, zero                                       |
/// | 38-43  | year (mod 100), month, day, hour, minute, second     |
/// | 44-63  | reserved, zero                                       |
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Immutable, IntoBytes, FromBytes, KnownLayout)]
pub struct Header {
    magic: [u8; 5],
    brightness: u8,
    blink: u8,
    border: u8,
    mode_speed: [u8; BANK_COUNT],
    lengths: [[u8; 2]; BANK_COUNT],
    reserved_a: [u8; 6],
    timestamp: [u8; 6],
    reserved_b: [u8; 20],
}

impl Default for Header {
    /// The template the device expects before anything is configured:
    /// magic tag set, every bank left-scrolling at speed five, all
    /// lengths and flags zero.
    fn default() -> Self {
        Self {
            magic: *MAGIC,
            brightness: 0x00,
            blink: 0x00,
            border: 0x00,
            mode_speed: [0x40; BANK_COUNT],
            lengths: [[0x00; 2]; BANK_COUNT],
            reserved_a: [0x00; 6],
            timestamp: [0x00; 6],
            reserved_b: [0x00; 20],
        }
    }
}

impl Header {
    pub fn set_brightness(&mut self, value: Brightness) {
        self.brightness = value.as_raw();
    }

    pub fn set_blink(&mut self, bank: usize, on: bool) {
        assert!(bank < BANK_COUNT, "bank index out of range: {bank}");
        set_bit(&mut self.blink, bank as u8, on);
    }

    pub fn set_animated_border(&mut self, bank: usize, on: bool) {
        assert!(bank < BANK_COUNT, "bank index out of range: {bank}");
        set_bit(&mut self.border, bank as u8, on);
    }

    pub fn set_mode(&mut self, bank: usize, value: Mode) {
        assert!(bank < BANK_COUNT, "bank index out of range: {bank}");
        set_low_nibble(&mut self.mode_speed[bank], value.as_raw());
    }

    pub fn set_speed(&mut self, bank: usize, value: Speed) {
        assert!(bank < BANK_COUNT, "bank index out of range: {bank}");
        set_high_nibble(&mut self.mode_speed[bank], value.as_raw());
    }

    /// Record how many 11-byte payload units bank `bank` carries, split
    /// big-endian across the two length bytes reserved for it.
    pub fn set_payload_units(&mut self, bank: usize, units: u16) {
        assert!(bank < BANK_COUNT, "bank index out of range: {bank}");
        self.lengths[bank] = units.to_be_bytes();
    }

    /// Payload unit count currently recorded for bank `bank`.
    pub fn payload_units(&self, bank: usize) -> u16 {
        assert!(bank < BANK_COUNT, "bank index out of range: {bank}");
        u16::from_be_bytes(self.lengths[bank])
    }

    // Timestamp bytes are stored raw; the device does not validate them
    // and neither do we.

    pub fn set_year(&mut self, value: u8) {
        self.timestamp[0] = value;
    }

    pub fn set_month(&mut self, value: u8) {
        self.timestamp[1] = value;
    }

    pub fn set_day(&mut self, value: u8) {
        self.timestamp[2] = value;
    }

    pub fn set_hour(&mut self, value: u8) {
        self.timestamp[3] = value;
    }

    pub fn set_minute(&mut self, value: u8) {
        self.timestamp[4] = value;
    }

    pub fn set_second(&mut self, value: u8) {
        self.timestamp[5] = value;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use zerocopy::IntoBytes;

    const fn template() -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0] = b'w';
        bytes[1] = b'a';
        bytes[2] = b'n';
        bytes[3] = b'g';
        let mut i = 8;
        while i < 16 {
            bytes[i] = 0x40;
            i += 1;
        }
        bytes
    }

    #[test]
    fn test_default_matches_device_template() {
        assert_eq!(core::mem::size_of::<Header>(), HEADER_SIZE);
        assert_eq!(Header::default().as_bytes(), &template());
    }

    #[test]
    fn test_mode_and_speed_share_one_byte() {
        let mut header = Header::default();
        header.set_mode(2, Mode::Curtain);
        header.set_speed(2, Speed::Eight);
        assert_eq!(header.as_bytes()[10], 0x77);

        // Changing one nibble leaves the other alone.
        header.set_mode(2, Mode::LeftScroll);
        assert_eq!(header.as_bytes()[10], 0x70);
    }

    #[test]
    fn test_payload_units_split_big_endian() {
        let mut header = Header::default();
        header.set_payload_units(7, 0x0123);
        let bytes = header.as_bytes();
        assert_eq!(bytes[30], 0x01);
        assert_eq!(bytes[31], 0x23);
        assert_eq!(header.payload_units(7), 0x0123);
    }

    #[test]
    fn test_bank_flags_touch_only_their_bit() {
        let mut header = Header::default();
        header.set_blink(3, true);

        let expected = {
            let mut bytes = template();
            bytes[6] = 0x08;
            bytes
        };
        assert_eq!(header.as_bytes(), &expected);

        header.set_blink(3, false);
        assert_eq!(header.as_bytes(), &template());
    }

    #[test]
    fn test_brightness_and_timestamp_are_independent() {
        let mut header = Header::default();
        header.set_brightness(Brightness::Medium);
        header.set_year(26);
        header.set_month(8);
        header.set_second(59);

        let bytes = header.as_bytes();
        assert_eq!(bytes[5], 0x20);
        assert_eq!(bytes[38], 26);
        assert_eq!(bytes[39], 8);
        assert_eq!(bytes[43], 59);

        header.set_brightness(Brightness::Low);
        assert_eq!(header.as_bytes()[38], 26);
    }

    #[test]
    fn test_raw_codes_round_trip_through_try_from() {
        for mode in [
            Mode::LeftScroll,
            Mode::RightScroll,
            Mode::UpScroll,
            Mode::DownScroll,
            Mode::Centered,
            Mode::Snowflake,
            Mode::DropDown,
            Mode::Curtain,
            Mode::Laser,
        ] {
            assert_eq!(Mode::try_from(mode.as_raw()), Ok(mode));
        }

        for speed in [
            Speed::One,
            Speed::Two,
            Speed::Three,
            Speed::Four,
            Speed::Five,
            Speed::Six,
            Speed::Seven,
            Speed::Eight,
        ] {
            assert_eq!(Speed::try_from(speed.as_raw()), Ok(speed));
        }
    }

    #[test]
    fn test_unknown_raw_codes_are_rejected() {
        assert_eq!(
            Mode::try_from(0x09),
            Err(BadgeError::UnknownCode {
                kind: "mode",
                value: 0x09
            })
        );
        // Speed codes live in the high nibble; a stray low bit is no
        // more valid than an out-of-range nibble.
        assert_eq!(
            Speed::try_from(0x45),
            Err(BadgeError::UnknownCode {
                kind: "speed",
                value: 0x45
            })
        );
        Speed::try_from(0x80).expect_err("speed nine does not exist");
    }

    #[test]
    #[should_panic(expected = "bank index out of range")]
    fn test_bank_index_is_a_contract() {
        Header::default().set_blink(8, true);
    }
}
