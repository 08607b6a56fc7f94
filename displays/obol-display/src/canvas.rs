//! Canvas trait
//!
//! Defines the interface the layouts draw through.

/// Panel width in pixels
pub const SCREEN_WIDTH: i32 = 128;

/// Panel height in pixels
pub const SCREEN_HEIGHT: i32 = 64;

/// Canvas errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Frame holds more draw operations than it has room for
    BufferOverflow,
}

/// Text size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Font {
    /// Status lines, labels (about 10 px)
    Small,
    /// Headlines (about 16 px)
    Medium,
    /// The price (about 24 px)
    Large,
}

/// Horizontal anchor of `x`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Render collaborator
///
/// `y` is the top of the text line. Committing the frame to the panel is
/// up to the implementation.
pub trait Canvas {
    /// Blank the frame
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Swap foreground and background for the whole panel
    fn set_inverted(&mut self, inverted: bool) -> Result<(), DisplayError>;

    /// Draw `text` anchored at (`x`, `y`)
    fn draw_text(
        &mut self,
        x: i32,
        y: i32,
        font: Font,
        align: Align,
        text: &str,
    ) -> Result<(), DisplayError>;
}
