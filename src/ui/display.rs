//! OLED + key pixel panel.
//!
//! [`Panel`] keeps a model of the frame (title bar plus either the 3x4 key
//! label grid or the app menu) and the 12 key colors. Setters only touch
//! the model; [`DisplaySink::commit`] redraws the whole screen and pushes
//! the colors to the pixels.

use alloc::vec::Vec;

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;

use crate::config::KEY_COUNT;
use crate::ui::{DisplaySink, MenuRow};

/// Characters that fit across the 128 px screen.
const LINE_CHARS: usize = 21;
/// Characters per key label (three columns).
const LABEL_CHARS: usize = 6;
const COLUMNS: usize = 3;

pub type Line = heapless::String<LINE_CHARS>;
pub type Label = heapless::String<LABEL_CHARS>;

/// Monochrome screen the panel draws into.
pub trait Surface: DrawTarget<Color = BinaryColor> {
    /// Make the drawn frame visible.
    fn present(&mut self);
}

/// One RGB pixel per key.
pub trait PixelStrip {
    /// `colors[i]` is key `i` as 0xRRGGBB.
    fn show(&mut self, colors: &[u32; KEY_COUNT]);
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Body {
    Keys,
    Menu {
        rows: Vec<(Line, bool)>,
        highlight: usize,
        inverse: bool,
    },
}

pub struct Panel<S, P> {
    surface: S,
    pixels: P,
    title: Line,
    labels: [Label; KEY_COUNT],
    colors: [u32; KEY_COUNT],
    body: Body,
}

impl<S: Surface, P: PixelStrip> Panel<S, P> {
    pub fn new(surface: S, pixels: P) -> Self {
        Self {
            surface,
            pixels,
            title: Line::new(),
            labels: core::array::from_fn(|_| Label::new()),
            colors: [0; KEY_COUNT],
            body: Body::Keys,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(|l| l.as_str())
    }

    pub fn colors(&self) -> &[u32; KEY_COUNT] {
        &self.colors
    }

    /// Menu rows as drawn, or `None` while the key grid is shown.
    pub fn menu(&self) -> Option<(Vec<&str>, usize, bool)> {
        match &self.body {
            Body::Keys => None,
            Body::Menu {
                rows,
                highlight,
                inverse,
            } => Some((rows.iter().map(|(t, _)| t.as_str()).collect(), *highlight, *inverse)),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn pixels(&self) -> &P {
        &self.pixels
    }

    fn draw(&mut self) {
        let _ = self.surface.clear(BinaryColor::Off);
        let normal = style(BinaryColor::On);
        let _ = Text::new(&self.title, Point::new(0, 8), normal).draw(&mut self.surface);

        match &self.body {
            Body::Keys => {
                for (i, label) in self.labels.iter().enumerate() {
                    let x = (i % COLUMNS) as i32 * 43;
                    let y = 22 + (i / COLUMNS) as i32 * 12;
                    let _ = Text::new(label, Point::new(x, y), normal).draw(&mut self.surface);
                }
            }
            Body::Menu {
                rows,
                highlight,
                inverse,
            } => {
                for (i, (text, _)) in rows.iter().enumerate() {
                    let y = 20 + i as i32 * 10;
                    let text_style = if i == *highlight && *inverse {
                        let _ = Rectangle::new(Point::new(0, y - 8), Size::new(128, 10))
                            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                            .draw(&mut self.surface);
                        style(BinaryColor::Off)
                    } else {
                        normal
                    };
                    let marker = if i == *highlight { ">" } else { " " };
                    let _ = Text::new(marker, Point::new(0, y), text_style).draw(&mut self.surface);
                    let _ = Text::new(text, Point::new(8, y), text_style).draw(&mut self.surface);
                }
            }
        }
    }
}

impl<S: Surface, P: PixelStrip> DisplaySink for Panel<S, P> {
    fn set_key_color(&mut self, index: usize, rgb: u32) {
        if let Some(c) = self.colors.get_mut(index) {
            *c = rgb & 0xFF_FF_FF;
        }
    }

    fn set_key_label(&mut self, index: usize, text: &str) {
        if let Some(label) = self.labels.get_mut(index) {
            *label = truncate(text);
        }
        self.body = Body::Keys;
    }

    fn set_title(&mut self, text: &str) {
        self.title = truncate(text);
    }

    fn render_list(&mut self, rows: &[MenuRow<'_>], highlight: usize, inverse: bool) {
        let rows = rows
            .iter()
            .map(|row| {
                let mut line = Line::new();
                if row.group {
                    let _ = line.push('[');
                    push_truncated(&mut line, row.text, LINE_CHARS - 3);
                    let _ = line.push(']');
                } else {
                    push_truncated(&mut line, row.text, LINE_CHARS - 1);
                }
                (line, row.group)
            })
            .collect();
        self.body = Body::Menu {
            rows,
            highlight,
            inverse,
        };
    }

    fn commit(&mut self) {
        self.draw();
        self.surface.present();
        self.pixels.show(&self.colors);
    }
}

fn style(color: BinaryColor) -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(color)
        .build()
}

fn truncate<const N: usize>(text: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    push_truncated(&mut out, text, N);
    out
}

fn push_truncated<const N: usize>(out: &mut heapless::String<N>, text: &str, max_chars: usize) {
    for c in text.chars().take(max_chars) {
        if out.push(c).is_err() {
            break;
        }
    }
}

#[cfg(feature = "embedded")]
pub use oled::{init_oled, Oled};

#[cfg(feature = "embedded")]
mod oled {
    use ssd1306::mode::BufferedGraphicsMode;
    use ssd1306::prelude::*;
    use ssd1306::I2CDisplayInterface;
    use ssd1306::Ssd1306;

    use super::Surface;

    /// Concrete SSD1306 driver, generic over the HAL's I²C peripheral.
    pub type Oled<I2C> =
        Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

    /// Initialise the SSD1306 display and clear the screen.
    pub fn init_oled<I2C>(i2c: I2C) -> Oled<I2C>
    where
        I2C: embedded_hal::i2c::I2c,
    {
        let interface = I2CDisplayInterface::new(i2c);
        let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        let _ = display.init();
        display.clear_buffer();
        let _ = display.flush();
        display
    }

    impl<I2C: embedded_hal::i2c::I2c> Surface for Oled<I2C> {
        fn present(&mut self) {
            let _ = self.flush();
        }
    }
}
