//! Render collaborator and screen layouts for Obol
//!
//! This crate provides:
//! - `Canvas` trait: the dumb framebuffer the layouts draw into
//! - `DrawList`: a recording canvas, compared frame to frame so only
//!   changed frames reach the panel
//! - `render`: the mode-switched ticker / portfolio layouts, plus a status
//!   screen for boot and connection progress
//!
//! # Architecture
//!
//! Layouts compute every string and position; the canvas only places text.
//! The firmware renders into a `DrawList` on each tick and forwards it to
//! the display task, which replays it onto the OLED and flushes.

#![no_std]
#![deny(unsafe_code)]

pub mod canvas;
pub mod draw_list;
pub mod format;
pub mod render;

// Re-export key types
pub use canvas::{Align, Canvas, DisplayError, Font, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use draw_list::{DrawList, DrawOp, TextLine};
pub use render::{render, render_status, RenderConfig};
