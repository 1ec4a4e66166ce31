//! Capture, decode and display collaborators for the frame pipeline.
//!
//! A `CaptureSource` delivers `FrameSet`s through a callback on its own
//! thread, a `Decoder` turns color frames into images, and a `Renderer` shows
//! them. Reference implementations of all three live here.

mod error;
pub use error::*;

mod frameset;
pub use frameset::*;

mod source;
pub use source::*;

mod synthetic;
pub use synthetic::*;

pub mod keyframe;

mod decoder;
pub use decoder::*;

mod display;
pub use display::*;

#[cfg(feature = "v4l2")]
mod v4l2;
#[cfg(feature = "v4l2")]
pub use v4l2::*;

#[cfg(feature = "ffmpeg")]
mod ffmpeg;
#[cfg(feature = "ffmpeg")]
pub use ffmpeg::*;
