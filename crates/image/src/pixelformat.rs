use {crate::*, base::Vec2};

// fourcc codes
pub(crate) const FOURCC_RGB8: u32 = u32::from_le_bytes(*b"RGB8");
pub(crate) const FOURCC_ARGB8: u32 = u32::from_le_bytes(*b"ARGB");
pub(crate) const FOURCC_YUYV: u32 = u32::from_le_bytes(*b"YUYV");
pub(crate) const FOURCC_NV12: u32 = u32::from_le_bytes(*b"NV12");
pub(crate) const FOURCC_MJPG: u32 = u32::from_le_bytes(*b"MJPG");
pub(crate) const FOURCC_H264: u32 = u32::from_le_bytes(*b"H264");
pub(crate) const FOURCC_HEVC: u32 = u32::from_le_bytes(*b"HEVC");

/// Convert a fourcc code to a readable 4-character string.
pub fn fourcc_to_string(fourcc: u32) -> String {
    String::from_utf8_lossy(&fourcc.to_le_bytes()).into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Rgb8,
    Argb8,
    Yuyv,
    Nv12,
    Jpeg,
    H264,
    H265,
}

impl PixelFormat {
    pub fn from_fourcc(fourcc: u32) -> Option<Self> {
        match fourcc {
            FOURCC_RGB8 => Some(PixelFormat::Rgb8),
            FOURCC_ARGB8 => Some(PixelFormat::Argb8),
            FOURCC_YUYV => Some(PixelFormat::Yuyv),
            FOURCC_NV12 => Some(PixelFormat::Nv12),
            FOURCC_MJPG => Some(PixelFormat::Jpeg),
            FOURCC_H264 => Some(PixelFormat::H264),
            FOURCC_HEVC => Some(PixelFormat::H265),
            _ => None,
        }
    }

    pub fn as_fourcc(&self) -> u32 {
        match self {
            PixelFormat::Rgb8 => FOURCC_RGB8,
            PixelFormat::Argb8 => FOURCC_ARGB8,
            PixelFormat::Yuyv => FOURCC_YUYV,
            PixelFormat::Nv12 => FOURCC_NV12,
            PixelFormat::Jpeg => FOURCC_MJPG,
            PixelFormat::H264 => FOURCC_H264,
            PixelFormat::H265 => FOURCC_HEVC,
        }
    }

    /// Compressed formats carry a bitstream instead of pixels.
    pub fn is_compressed(&self) -> bool {
        matches!(
            self,
            PixelFormat::Jpeg | PixelFormat::H264 | PixelFormat::H265
        )
    }

    /// Inter-frame video codecs, where decoding has to start at a keyframe.
    pub fn is_video_codec(&self) -> bool {
        matches!(self, PixelFormat::H264 | PixelFormat::H265)
    }

    /// Exact buffer length of one frame, for uncompressed formats.
    pub fn frame_len(&self, size: Vec2<usize>) -> Option<usize> {
        match self {
            PixelFormat::Rgb8 => Some(size.area() * 3),
            PixelFormat::Argb8 => Some(size.area() * 4),
            PixelFormat::Yuyv => Some(size.area() * 2),
            PixelFormat::Nv12 => Some(size.area() + 2 * size.x.div_ceil(2) * size.y.div_ceil(2)),
            PixelFormat::Jpeg | PixelFormat::H264 | PixelFormat::H265 => None,
        }
    }

    pub fn ensure_format(&self, expected: PixelFormat) -> Result<(), ImageError> {
        if *self != expected {
            return Err(ImageError::Format(format!(
                "expected {:?} format, got {:?}",
                expected, self
            )));
        }
        Ok(())
    }
}

// BT.601 YUV-to-RGB conversion for a single pixel (fixed-point, shift 8)
pub(crate) fn yuv_to_rgb(y: u8, u: u8, v: u8) -> (u8, u8, u8) {
    let y = y as i32;
    let u = u as i32 - 128;
    let v = v as i32 - 128;
    let r = (y + ((359 * v) >> 8)).clamp(0, 255) as u8;
    let g = (y - ((88 * u + 183 * v) >> 8)).clamp(0, 255) as u8;
    let b = (y + ((454 * u) >> 8)).clamp(0, 255) as u8;
    (r, g, b)
}
