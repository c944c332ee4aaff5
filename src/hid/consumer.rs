//! Consumer control (usage page 0x0C): media and volume keys.
//!
//! A single usage is reported at a time. Pressing another media key
//! replaces the one held; releasing sends usage 0.

/// Consumer usages macros can name, matching the codes in the
/// macro definition files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum ConsumerUsage {
    BrightnessUp = 0x006F,
    BrightnessDown = 0x0070,
    Record = 0x00B2,
    FastForward = 0x00B3,
    Rewind = 0x00B4,
    NextTrack = 0x00B5,
    PrevTrack = 0x00B6,
    Stop = 0x00B7,
    Eject = 0x00B8,
    PlayPause = 0x00CD,
    Mute = 0x00E2,
    VolumeUp = 0x00E9,
    VolumeDown = 0x00EA,
}

impl ConsumerUsage {
    pub const fn code(self) -> u16 {
        self as u16
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConsumerReport {
    pub usage: u16,
}

impl ConsumerReport {
    pub const LEN: usize = 2;

    pub const fn new(usage: u16) -> Self {
        Self { usage }
    }

    /// No media key held.
    pub const fn released() -> Self {
        Self::new(0)
    }

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        self.usage.to_le_bytes()
    }
}

/// One 16-bit array usage in 0..=0x3FF.
pub const CONSUMER_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x0C, 0x09, 0x01, // Consumer / Consumer Control
    0xA1, 0x01, //             Application
    0x15, 0x00, 0x26, 0xFF, 0x03, //
    0x19, 0x00, 0x2A, 0xFF, 0x03, //
    0x75, 0x10, 0x95, 0x01, 0x81, 0x00, //
    0xC0,
];
