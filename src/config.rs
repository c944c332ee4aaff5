//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and protocol
//! constants live here so they can be tuned in one place. The timing
//! values also seed the runtime [`Config`] handed to the dispatcher.

// Keys & control loop

/// Number of physical macro keys (3 columns x 4 rows).
pub const KEY_COUNT: usize = 12;

/// Idle delay at the end of every control-loop iteration (ms).
pub const TICK_MS: u32 = 10;

/// How long a transient status message stays on the title bar (ms).
pub const MESSAGE_MS: u32 = 1000;

/// LED color used while a key is held down.
pub const PRESSED_COLOR: u32 = 0xFF_FF_FF;

/// App name that switches key handling to favorites commands.
pub const FAVORITES_APP_NAME: &str = "Favorites";

// Tap dance

/// Maximum press-to-press interval that still counts as another tap (ms).
pub const TAP_WINDOW_MS: u64 = 300;

/// Minimum press duration that resolves to a hold (ms).
pub const HOLD_THRESHOLD_MS: u64 = 500;

// Menu

/// Rows visible in the app menu. Odd so the selection can sit centered.
pub const MENU_ROWS: usize = 5;

/// Menu closes without a selection after this much inactivity (ms).
pub const MENU_TIMEOUT_MS: u64 = 3000;

/// Duration of one half of the selection flash (ms).
pub const MENU_FLASH_MS: u32 = 50;

/// Number of invert/restore cycles when a menu row is committed.
pub const MENU_FLASH_COUNT: usize = 2;

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0002;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "hotkeypad";
pub const USB_PRODUCT: &str = "Hotkey Macro Pad";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// USB HID polling interval (ms).
pub const USB_HID_POLL_MS: u8 = 1;

// GPIO pin assignments (RP2040 board defaults)
//
//   Keys 0..11        → GPIO1..GPIO12 (active-low)
//   Encoder switch    → GPIO0
//   Encoder A / B     → GPIO17 / GPIO18
//   Pixels (WS2812)   → GPIO19
//   Speaker (PWM)     → GPIO16, amp enable GPIO14
//   I²C SDA / SCL     → GPIO20 / GPIO21

/// Button debounce time (ms).
pub const BUTTON_DEBOUNCE_MS: u64 = 5;

/// Global brightness scale applied to key pixels (0-255).
pub const PIXEL_BRIGHTNESS: u8 = 48;

// Favorites storage

/// Byte offset of the favorites region from the start of flash.
pub const STORAGE_FLASH_OFFSET: u32 = 2048 * 1024 - 64 * 1024;

/// Size of the favorites region (must be a multiple of the erase size).
pub const STORAGE_FLASH_SIZE: u32 = 64 * 1024;

/// Largest serialized favorites table accepted by storage.
pub const MAX_FAVORITES_BLOB: usize = 1024;

/// Tap-dance timing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TapDanceConfig {
    pub tap_window_ms: u64,
    pub hold_ms: u64,
}

impl Default for TapDanceConfig {
    fn default() -> Self {
        Self {
            tap_window_ms: TAP_WINDOW_MS,
            hold_ms: HOLD_THRESHOLD_MS,
        }
    }
}

/// Menu layout and timing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuConfig {
    pub rows: usize,
    pub timeout_ms: u64,
    pub flash_ms: u32,
    pub flash_count: usize,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            rows: MENU_ROWS,
            timeout_ms: MENU_TIMEOUT_MS,
            flash_ms: MENU_FLASH_MS,
            flash_count: MENU_FLASH_COUNT,
        }
    }
}

/// Runtime configuration for the dispatcher.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub tap_dance: TapDanceConfig,
    pub menu: MenuConfig,
    pub timing: LoopTiming,
}

/// Control-loop pacing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopTiming {
    pub tick_ms: u32,
    pub message_ms: u32,
}

impl Default for LoopTiming {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,
            message_ms: MESSAGE_MS,
        }
    }
}
