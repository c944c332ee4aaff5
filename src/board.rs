//! RP2040 implementations of the control-loop seams.
//!
//! Everything here is blocking: the dispatcher owns core 0 and only the USB
//! stack runs async (on core 1). Async peripheral drivers are driven with
//! `embassy_futures::block_on`.

use defmt::{debug, warn};
use embassy_rp::gpio::Input;
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio_programs::ws2812::PioWs2812;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_time::{block_for, Duration, Instant};
use embedded_hal::delay::DelayNs;
use heapless::Deque;
use smart_leds::{brightness, RGB8};

use crate::config::{KEY_COUNT, PIXEL_BRIGHTNESS};
use crate::hid::{HidOutput, HidReport};
use crate::ui::buttons::Debouncer;
use crate::ui::display::PixelStrip;
use crate::ui::encoder::QuadratureDecoder;
use crate::ui::{Clock, Controls, KeyEvent};
use crate::usb::hid_device::REPORTS;

// ═══════════════════════════════════════════════════════════════════════════
// Time
// ═══════════════════════════════════════════════════════════════════════════

/// Busy-waiting clock on the embassy time driver.
#[derive(Clone, Copy, Default)]
pub struct BoardClock;

impl DelayNs for BoardClock {
    fn delay_ns(&mut self, ns: u32) {
        block_for(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        block_for(Duration::from_millis(u64::from(ms)));
    }
}

impl Clock for BoardClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Inputs
// ═══════════════════════════════════════════════════════════════════════════

/// Key matrix, encoder switch and encoder pins, all active-low with pull-ups.
pub struct BoardControls {
    keys: [Input<'static>; KEY_COUNT],
    key_state: [Debouncer; KEY_COUNT],
    switch: Input<'static>,
    switch_state: Debouncer,
    encoder_a: Input<'static>,
    encoder_b: Input<'static>,
    decoder: QuadratureDecoder,
    pending: Deque<KeyEvent, 16>,
}

impl BoardControls {
    pub fn new(
        keys: [Input<'static>; KEY_COUNT],
        switch: Input<'static>,
        encoder_a: Input<'static>,
        encoder_b: Input<'static>,
    ) -> Self {
        let decoder = QuadratureDecoder::new(encoder_a.is_high(), encoder_b.is_high());
        Self {
            keys,
            key_state: core::array::from_fn(|_| Debouncer::default()),
            switch,
            switch_state: Debouncer::default(),
            encoder_a,
            encoder_b,
            decoder,
            pending: Deque::new(),
        }
    }

    fn scan_keys(&mut self) {
        let now = Instant::now().as_millis();
        for (index, (pin, state)) in self.keys.iter().zip(self.key_state.iter_mut()).enumerate() {
            if let Some(pressed) = state.update(pin.is_low(), now) {
                let event = KeyEvent { key: index as u8, pressed };
                if self.pending.push_back(event).is_err() {
                    warn!("key queue full, dropping key {}", index);
                }
            }
        }
    }
}

impl Controls for BoardControls {
    fn encoder_position(&mut self) -> i32 {
        self.decoder.update(self.encoder_a.is_high(), self.encoder_b.is_high());
        self.decoder.position()
    }

    fn encoder_pressed(&mut self) -> bool {
        let now = Instant::now().as_millis();
        self.switch_state.pressed_edge(self.switch.is_low(), now)
    }

    fn next_key_event(&mut self) -> Option<KeyEvent> {
        self.scan_keys();
        self.pending.pop_front()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Outputs
// ═══════════════════════════════════════════════════════════════════════════

/// WS2812 key pixels on PIO0 state machine 0.
pub struct KeyPixels {
    ws2812: PioWs2812<'static, PIO0, 0, KEY_COUNT>,
}

impl KeyPixels {
    pub fn new(ws2812: PioWs2812<'static, PIO0, 0, KEY_COUNT>) -> Self {
        Self { ws2812 }
    }
}

impl PixelStrip for KeyPixels {
    fn show(&mut self, colors: &[u32; KEY_COUNT]) {
        let mut frame = [RGB8::default(); KEY_COUNT];
        let scaled = brightness(colors.iter().map(|&rgb| rgb8(rgb)), PIXEL_BRIGHTNESS);
        for (slot, color) in frame.iter_mut().zip(scaled) {
            *slot = color;
        }
        embassy_futures::block_on(self.ws2812.write(&frame));
    }
}

fn rgb8(rgb: u32) -> RGB8 {
    let [_, r, g, b] = rgb.to_be_bytes();
    RGB8::new(r, g, b)
}

/// Piezo speaker on a PWM slice.
pub struct Speaker {
    pwm: Pwm<'static>,
}

/// Fixed PWM clock divider for tones.
const TONE_DIVIDER: u8 = 64;
/// PWM input clock after the divider (125 MHz system clock).
const TONE_CLOCK_HZ: u32 = 125_000_000 / TONE_DIVIDER as u32;

impl Speaker {
    pub fn new(pwm: Pwm<'static>) -> Self {
        let mut speaker = Self { pwm };
        speaker.set(None);
        speaker
    }

    fn set(&mut self, freq: Option<u16>) {
        let mut config = PwmConfig::default();
        config.divider = TONE_DIVIDER.into();
        match freq {
            Some(freq) if freq > 0 => {
                let top = (TONE_CLOCK_HZ / u32::from(freq)).clamp(2, u32::from(u16::MAX));
                config.top = top as u16;
                config.compare_a = (top / 2) as u16;
            }
            _ => config.compare_a = 0,
        }
        self.pwm.set_config(&config);
    }
}

/// Hands reports to the USB core and plays tones locally.
pub struct UsbOutput {
    speaker: Speaker,
}

impl UsbOutput {
    pub fn new(speaker: Speaker) -> Self {
        Self { speaker }
    }
}

impl HidOutput for UsbOutput {
    fn send(&mut self, report: HidReport) {
        // Blocks while the queue is full so no report is lost.
        embassy_futures::block_on(REPORTS.send(report));
    }

    fn tone(&mut self, freq: Option<u16>) {
        debug!("tone {}", freq.unwrap_or(0));
        self.speaker.set(freq);
    }
}
