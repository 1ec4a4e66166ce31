//! Image buffers and pixel conversions for the capture pipeline.
//!
//! An `Image` is an owned byte buffer tagged with its size and `PixelFormat`.
//! Raw formats convert to packed ARGB (`argb`) and to `u32` framebuffer
//! pixels (`framebuffer`); JPEG goes through the `image` crate (`jpeg`).

mod argb;
pub use argb::*;

mod error;
pub use error::*;

mod image;
pub use image::*;

mod jpeg;
pub use jpeg::*;

mod pixelformat;
pub use pixelformat::*;

mod framebuffer;
pub use framebuffer::*;
