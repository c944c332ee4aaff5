//! Unified error type for hotkeypad.
//!
//! Variants carry only fixed-size data so the type stays cheap to log
//! from the control loop. None of these ever reach the main loop: every
//! caller either degrades to a safe default or halts at boot.

use core::fmt;

/// Top-level error type used across the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Catalog
    /// No application survived catalog loading.
    EmptyCatalog,

    /// A definition or stored record could not be decoded.
    Decode,

    /// A definition binds more keys than the pad has.
    TooManyKeys(usize),

    // Storage
    /// A record could not be serialized.
    Encode,

    /// Flash read/write/erase failed.
    Storage,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyCatalog => f.write_str("no macro apps found"),
            Error::Decode => f.write_str("malformed record"),
            Error::TooManyKeys(n) => write!(f, "{} keys bound, pad has 12", n),
            Error::Encode => f.write_str("record too large to encode"),
            Error::Storage => f.write_str("flash storage failure"),
        }
    }
}

impl From<postcard::Error> for Error {
    fn from(e: postcard::Error) -> Self {
        match e {
            postcard::Error::SerializeBufferFull
            | postcard::Error::SerializeSeqLengthUnknown
            | postcard::Error::WontImplement
            | postcard::Error::NotYetImplemented => Error::Encode,
            _ => Error::Decode,
        }
    }
}
