use {
    base::Vec2,
    image::{Image, PixelFormat},
    std::time::Duration,
};

/// Encoded or raw color plane as delivered by a capture device.
#[derive(Debug, Clone)]
pub struct ColorFrame {
    pub index: u64,
    pub size: Vec2<usize>,
    pub format: PixelFormat,
    pub data: Vec<u8>,
}

impl ColorFrame {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// View an uncompressed frame as an image without decoding.
    pub fn into_image(self) -> Image {
        Image::new(self.size, self.data, self.format)
    }
}

/// Depth plane in device units, one `u16` per pixel.
#[derive(Debug, Clone)]
pub struct DepthFrame {
    pub size: Vec2<usize>,
    pub data: Vec<u16>,
}

/// Everything a capture device delivered for one instant.
#[derive(Debug, Clone)]
pub struct FrameSet {
    pub index: u64,
    pub timestamp: Duration,
    pub color: Option<ColorFrame>,
    pub depth: Option<DepthFrame>,
}

impl FrameSet {
    /// A frame set is usable when it carries non-empty color data and,
    /// if depth is required, a depth plane that matches its size.
    pub fn is_complete(&self, require_depth: bool) -> bool {
        let color_ok = self.color.as_ref().is_some_and(|color| !color.is_empty());
        let depth_ok = !require_depth
            || self
                .depth
                .as_ref()
                .is_some_and(|depth| !depth.data.is_empty() && depth.data.len() == depth.size.area());
        color_ok && depth_ok
    }
}
