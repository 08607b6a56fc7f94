//! OLED display drivers

pub mod framebuffer;
pub mod ssd1306;

pub use framebuffer::FrameBuffer;
pub use ssd1306::Ssd1306;
