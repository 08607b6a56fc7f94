//! Recording canvas

use heapless::{String, Vec};

use crate::canvas::{Align, Canvas, DisplayError, Font};

/// Longest text a single draw can carry
pub const TEXT_LEN: usize = 24;

/// Most draws in one frame
pub const MAX_OPS: usize = 12;

pub type TextLine = String<TEXT_LEN>;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrawOp {
    pub x: i32,
    pub y: i32,
    pub font: Font,
    pub align: Align,
    pub text: TextLine,
}

/// A complete frame as a list of text draws
///
/// Two lists compare equal exactly when they would produce the same pixels.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrawList {
    inverted: bool,
    ops: Vec<DrawOp, MAX_OPS>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// First op whose text equals `text`
    pub fn find(&self, text: &str) -> Option<&DrawOp> {
        self.ops.iter().find(|op| op.text.as_str() == text)
    }

    /// Draw this frame onto another canvas
    pub fn replay<C: Canvas + ?Sized>(&self, canvas: &mut C) -> Result<(), DisplayError> {
        canvas.clear()?;
        canvas.set_inverted(self.inverted)?;
        for op in &self.ops {
            canvas.draw_text(op.x, op.y, op.font, op.align, &op.text)?;
        }
        Ok(())
    }
}

impl Canvas for DrawList {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.ops.clear();
        self.inverted = false;
        Ok(())
    }

    fn set_inverted(&mut self, inverted: bool) -> Result<(), DisplayError> {
        self.inverted = inverted;
        Ok(())
    }

    fn draw_text(
        &mut self,
        x: i32,
        y: i32,
        font: Font,
        align: Align,
        text: &str,
    ) -> Result<(), DisplayError> {
        let mut line = TextLine::new();
        // Truncate on a char boundary
        for c in text.chars() {
            if line.push(c).is_err() {
                break;
            }
        }
        self.ops
            .push(DrawOp {
                x,
                y,
                font,
                align,
                text: line,
            })
            .map_err(|_| DisplayError::BufferOverflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_and_compares() {
        let mut a = DrawList::new();
        a.draw_text(0, 0, Font::Small, Align::Left, "LIVE").unwrap();

        let mut b = DrawList::new();
        b.draw_text(0, 0, Font::Small, Align::Left, "LIVE").unwrap();
        assert_eq!(a, b);

        b.set_inverted(true).unwrap();
        assert_ne!(a, b);

        b.clear().unwrap();
        assert!(b.ops().is_empty());
        assert!(!b.is_inverted());
    }

    #[test]
    fn test_truncates_long_text() {
        let mut list = DrawList::new();
        list.draw_text(0, 0, Font::Small, Align::Left, "abcdefghijklmnopqrstuvwxyz0123")
            .unwrap();
        assert_eq!(list.ops()[0].text.len(), TEXT_LEN);
    }

    #[test]
    fn test_overflow() {
        let mut list = DrawList::new();
        for _ in 0..MAX_OPS {
            list.draw_text(0, 0, Font::Small, Align::Left, "x").unwrap();
        }
        assert_eq!(
            list.draw_text(0, 0, Font::Small, Align::Left, "x"),
            Err(DisplayError::BufferOverflow)
        );
    }

    #[test]
    fn test_replay() {
        let mut source = DrawList::new();
        source.set_inverted(true).unwrap();
        source.draw_text(64, 18, Font::Large, Align::Center, "$2.0100").unwrap();

        let mut target = DrawList::new();
        target.draw_text(1, 1, Font::Small, Align::Left, "stale").unwrap();
        source.replay(&mut target).unwrap();
        assert_eq!(source, target);
    }
}
