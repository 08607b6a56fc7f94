//! SSD1306 OLED Display Driver
//!
//! Driver for 128x64 SSD1306-based OLED displays via I2C. Drawing happens
//! in a [`FrameBuffer`]; `flush` pushes the whole buffer using horizontal
//! addressing mode.

use super::framebuffer::{FrameBuffer, PAGES, WIDTH};

/// SSD1306 I2C address (typically 0x3C or 0x3D)
pub const SSD1306_ADDR: u8 = 0x3C;

/// Control byte prefixes
const CONTROL_COMMAND: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;

/// SSD1306 commands
#[allow(dead_code)]
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const ENTIRE_DISPLAY_RESUME: u8 = 0xA4;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_INVERSE: u8 = 0xA7;
    pub const SET_MEMORY_MODE: u8 = 0x20;
    pub const SET_COLUMN_ADDR: u8 = 0x21;
    pub const SET_PAGE_ADDR: u8 = 0x22;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// SSD1306 OLED driver
pub struct Ssd1306<I2C> {
    i2c: I2C,
    address: u8,
    frame: FrameBuffer,
    /// Inversion state last sent to the panel
    panel_inverted: bool,
}

impl<I2C> Ssd1306<I2C>
where
    I2C: embedded_hal_async::i2c::I2c,
{
    /// Create a new SSD1306 driver at the default address
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, SSD1306_ADDR)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            frame: FrameBuffer::new(),
            panel_inverted: false,
        }
    }

    /// Initialize the display
    pub async fn init(&mut self) -> Result<(), I2C::Error> {
        let init_cmds: &[u8] = &[
            cmd::DISPLAY_OFF,
            cmd::SET_CLOCK_DIV,
            0x80, // Default clock
            cmd::SET_MUX_RATIO,
            0x3F, // 64 lines
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::SET_CHARGE_PUMP,
            0x14, // Enable charge pump
            cmd::SET_MEMORY_MODE,
            0x00,                  // Horizontal addressing
            cmd::SET_SEG_REMAP,    // Flip horizontally
            cmd::SET_COM_SCAN_DEC, // Flip vertically
            cmd::SET_COM_PINS,
            0x12, // Alternative COM config
            cmd::SET_CONTRAST,
            0xCF, // High contrast
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::ENTIRE_DISPLAY_RESUME,
            cmd::SET_NORMAL,
            cmd::DISPLAY_ON,
        ];

        for &c in init_cmds {
            self.command(c).await?;
        }
        self.panel_inverted = false;

        Ok(())
    }

    /// Send a command to the display
    async fn command(&mut self, cmd: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.address, &[CONTROL_COMMAND, cmd]).await
    }

    /// Frame buffer to draw into before the next flush
    pub fn frame_mut(&mut self) -> &mut FrameBuffer {
        &mut self.frame
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Flush the frame buffer to the display
    pub async fn flush(&mut self) -> Result<(), I2C::Error> {
        let inverted = self.frame.is_inverted();
        if inverted != self.panel_inverted {
            let c = if inverted {
                cmd::SET_INVERSE
            } else {
                cmd::SET_NORMAL
            };
            self.command(c).await?;
            self.panel_inverted = inverted;
        }

        // Full-screen window; the column pointer wraps into the next page
        for &c in &[
            cmd::SET_COLUMN_ADDR,
            0,
            (WIDTH - 1) as u8,
            cmd::SET_PAGE_ADDR,
            0,
            (PAGES - 1) as u8,
        ] {
            self.command(c).await?;
        }

        let mut data = [0u8; WIDTH + 1];
        data[0] = CONTROL_DATA;
        for page in 0..PAGES {
            data[1..].copy_from_slice(self.frame.page(page));
            self.i2c.write(self.address, &data).await?;
        }

        Ok(())
    }

    /// Release the bus
    pub fn release(self) -> I2C {
        self.i2c
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embassy_futures::block_on;
    use embedded_hal_async::i2c::{ErrorType, I2c, Operation};
    use obol_display::{Align, Canvas, Font};
    use std::vec::Vec;

    /// Records every write as (address, bytes)
    #[derive(Default)]
    struct MockI2c {
        writes: Vec<(u8, Vec<u8>)>,
    }

    impl ErrorType for MockI2c {
        type Error = Infallible;
    }

    impl I2c for MockI2c {
        async fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            for op in operations.iter() {
                if let Operation::Write(bytes) = op {
                    self.writes.push((address, bytes.to_vec()));
                }
            }
            Ok(())
        }
    }

    fn commands(i2c: &MockI2c) -> Vec<u8> {
        i2c.writes
            .iter()
            .filter(|(_, bytes)| bytes[0] == CONTROL_COMMAND)
            .map(|(_, bytes)| bytes[1])
            .collect()
    }

    #[test]
    fn test_init_sequence() {
        let mut display = Ssd1306::new(MockI2c::default());
        block_on(display.init()).unwrap();

        let i2c = display.release();
        let cmds = commands(&i2c);
        assert_eq!(cmds.first(), Some(&cmd::DISPLAY_OFF));
        assert_eq!(cmds.last(), Some(&cmd::DISPLAY_ON));
        assert!(i2c.writes.iter().all(|(addr, _)| *addr == SSD1306_ADDR));
    }

    #[test]
    fn test_flush_writes_every_page() {
        let mut display = Ssd1306::new(MockI2c::default());
        display
            .frame_mut()
            .draw_text(0, 0, Font::Small, Align::Left, "XRP")
            .unwrap();
        block_on(display.flush()).unwrap();

        let i2c = display.release();
        let data: Vec<&Vec<u8>> = i2c
            .writes
            .iter()
            .filter(|(_, bytes)| bytes[0] == CONTROL_DATA)
            .map(|(_, bytes)| bytes)
            .collect();
        assert_eq!(data.len(), PAGES);
        assert!(data.iter().all(|bytes| bytes.len() == WIDTH + 1));
        assert!(data[0][1..].iter().any(|&b| b != 0));
        assert!(data[7][1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_inversion_sent_once() {
        let mut display = Ssd1306::new(MockI2c::default());
        display.frame_mut().set_inverted(true).unwrap();
        block_on(display.flush()).unwrap();
        block_on(display.flush()).unwrap();
        display.frame_mut().set_inverted(false).unwrap();
        block_on(display.flush()).unwrap();

        let cmds = commands(&display.release());
        let inverse = cmds.iter().filter(|&&c| c == cmd::SET_INVERSE).count();
        let normal = cmds.iter().filter(|&&c| c == cmd::SET_NORMAL).count();
        assert_eq!(inverse, 1);
        assert_eq!(normal, 1);
    }
}
