use {crate::*, base::Vec2};

/// An owned frame buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub size: Vec2<usize>,
    pub data: Vec<u8>,
    pub format: PixelFormat,
}

impl Image {
    pub fn new(size: Vec2<usize>, data: Vec<u8>, format: PixelFormat) -> Self {
        Self { size, data, format }
    }

    pub fn width(&self) -> usize {
        self.size.x
    }

    pub fn height(&self) -> usize {
        self.size.y
    }

    /// Check that an uncompressed buffer matches its size and format.
    pub fn validate(&self) -> Result<(), ImageError> {
        match self.format.frame_len(self.size) {
            Some(expected) if expected != self.data.len() => Err(ImageError::Format(format!(
                "{:?} image of {} needs {} bytes, got {}",
                self.format,
                self.size,
                expected,
                self.data.len()
            ))),
            _ => Ok(()),
        }
    }
}
