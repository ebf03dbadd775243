//! SSD1306 status panel driver (128×64, I2C).
//!
//! Each [`show`](StatusDisplay::show) replaces the whole screen: the panel
//! is filled white and every line is drawn in black with the 6×8 font,
//! one row every 20 px.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: renders through `ssd1306` + `embedded-graphics` over an
//! `esp-idf-hal` I2C driver.
//! On host/test: keeps the lines in memory and logs them.

use heapless::{String, Vec};

use crate::fsm::context::{LINE_CHARS, MAX_LINES};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init::HwInitError;
#[cfg(target_os = "espidf")]
use embedded_graphics::{
    mono_font::{MonoTextStyle, ascii::FONT_6X8},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::i2c::I2cDriver;
#[cfg(target_os = "espidf")]
use ssd1306::{I2CDisplayInterface, Ssd1306, mode::BufferedGraphicsMode, prelude::*};

/// Vertical distance between text rows.
pub const ROW_PITCH_PX: i32 = 20;

#[cfg(target_os = "espidf")]
type Panel = Ssd1306<
    ssd1306::prelude::I2CInterface<I2cDriver<'static>>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;

pub struct StatusDisplay {
    lines: Vec<String<LINE_CHARS>, MAX_LINES>,
    #[cfg(target_os = "espidf")]
    panel: Panel,
}

impl StatusDisplay {
    #[cfg(target_os = "espidf")]
    pub fn new(i2c: I2cDriver<'static>) -> Result<Self, HwInitError> {
        let interface = I2CDisplayInterface::new(i2c);
        let mut panel = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        panel.init().map_err(|e| {
            log::error!("display: init failed: {:?}", e);
            HwInitError::DisplayInitFailed
        })?;
        log::info!("display: SSD1306 128x64 ready");
        Ok(Self {
            lines: Vec::new(),
            panel,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    pub fn show(&mut self, lines: &[&str]) {
        self.lines.clear();
        for line in lines.iter().take(MAX_LINES) {
            let mut row = String::new();
            for ch in line.chars() {
                if row.push(ch).is_err() {
                    break;
                }
            }
            let _ = self.lines.push(row);
        }
        self.render();
    }

    /// Lines currently on screen.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.as_str())
    }

    #[cfg(target_os = "espidf")]
    fn render(&mut self) {
        let style = MonoTextStyle::new(&FONT_6X8, BinaryColor::Off);
        let _ = self.panel.clear(BinaryColor::On);
        for (row, line) in self.lines.iter().enumerate() {
            let origin = Point::new(0, row as i32 * ROW_PITCH_PX);
            if let Err(e) = Text::with_baseline(line.as_str(), origin, style, Baseline::Top).draw(&mut self.panel) {
                log::warn!("display: draw failed: {:?}", e);
            }
        }
        if let Err(e) = self.panel.flush() {
            log::warn!("display: flush failed: {:?}", e);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn render(&mut self) {
        log::debug!(
            "display(sim): {:?}",
            self.lines.iter().map(|l| l.as_str()).collect::<Vec<_, MAX_LINES>>()
        );
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for StatusDisplay {
    fn default() -> Self {
        Self::new()
    }
}
