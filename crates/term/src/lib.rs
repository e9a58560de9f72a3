//! Terminal board view.
//!
//! Renders a [`Board`](ataxx_core::Board) into a simple framebuffer that can be
//! flushed to a terminal backend. The view itself is pure and unit-tested; only
//! [`TerminalRenderer`] touches the terminal.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use ataxx_core as core;
pub use ataxx_types as types;

pub use fb::{FrameBuffer, Glyph, Rgb, Style};
pub use game_view::{GameView, Labels, Viewport};
pub use renderer::{encode_frame, TerminalRenderer};
