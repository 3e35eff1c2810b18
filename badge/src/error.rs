use thiserror::Error;

/// Recoverable failures reported by the payload encoder and assembly.
///
/// Bad bank indices and out-of-range mode/speed/brightness codes are
/// caller bugs, not runtime conditions; those fail fast with panics
/// instead of appearing here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BadgeError {
    /// One bank's bitmap alone would overflow the device memory.
    #[error("bank {bank} needs {units} payload units but the device fits at most {max_units}")]
    OversizedBank {
        bank: usize,
        units: usize,
        max_units: usize,
    },
    /// Header plus all encoded banks exceed the device memory.
    #[error("assembled upload is {total} bytes but the device holds at most {max}")]
    OversizedTotal { total: usize, max: usize },
    /// A payload handed to the decoder is not a whole number of 11-byte
    /// units.
    #[error("payload of {len} bytes is not a whole number of 11-byte units")]
    MalformedPayload { len: usize },
    /// A raw header byte does not decode to any known mode or speed.
    #[error("unrecognized {kind} code {value:#04x}")]
    UnknownCode { kind: &'static str, value: u8 },
}
