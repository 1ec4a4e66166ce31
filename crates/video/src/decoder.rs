use {
    crate::*,
    base::*,
    image::{Image, PixelFormat, decode_jpeg, to_argb},
};

/// Turns one captured color frame into zero or more displayable images.
///
/// Each decoder instance is owned and driven by a single thread.
pub trait Decoder: Send {
    /// Decode `frame` (its bytes, interpreted by its size and format) and
    /// append the images to `outputs`. Returns how many were added.
    fn decode(&mut self, frame: &ColorFrame, outputs: &mut Vec<Image>) -> Result<usize, VideoError>;

    /// Pixel format of every image this decoder appends.
    fn target_format(&self) -> PixelFormat {
        PixelFormat::Argb8
    }
}

/// MJPEG decoder producing `Argb8` images.
#[derive(Debug, Default)]
pub struct JpegDecoder;

impl JpegDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for JpegDecoder {
    fn decode(&mut self, frame: &ColorFrame, outputs: &mut Vec<Image>) -> Result<usize, VideoError> {
        if frame.is_empty() {
            return Err(VideoError::Decode("empty JPEG packet".to_string()));
        }
        let rgb = decode_jpeg(&frame.data).map_err(|e| VideoError::Decode(e.to_string()))?;
        outputs.push(to_argb(&rgb)?);
        Ok(1)
    }
}

/// Passthrough for uncompressed streams, converting every frame to `Argb8`.
#[derive(Debug)]
pub struct RawDecoder {
    size: Vec2<usize>,
    format: PixelFormat,
    frame_len: usize,
}

impl RawDecoder {
    pub fn new(size: Vec2<usize>, format: PixelFormat) -> Result<Self, VideoError> {
        let frame_len = format.frame_len(size).ok_or_else(|| {
            VideoError::Decode(format!("{format:?} is not an uncompressed format"))
        })?;
        Ok(Self {
            size,
            format,
            frame_len,
        })
    }
}

impl Decoder for RawDecoder {
    fn decode(&mut self, frame: &ColorFrame, outputs: &mut Vec<Image>) -> Result<usize, VideoError> {
        if frame.size != self.size || frame.format != self.format {
            return Err(VideoError::Decode(format!(
                "decoder set up for {} {:?}, got {} {:?}",
                self.size, self.format, frame.size, frame.format
            )));
        }
        if frame.len() != self.frame_len {
            return Err(VideoError::Decode(format!(
                "expected {} bytes for {} {:?}, got {}",
                self.frame_len,
                self.size,
                self.format,
                frame.len()
            )));
        }
        let image = Image::new(self.size, frame.data.clone(), self.format);
        outputs.push(to_argb(&image)?);
        Ok(1)
    }
}

/// Pick a decoder for a stream of `format` frames of `size`.
pub fn create_decoder(format: PixelFormat, size: Vec2<usize>) -> Result<Box<dyn Decoder>, VideoError> {
    match format {
        PixelFormat::Jpeg => Ok(Box::new(JpegDecoder::new())),
        #[cfg(feature = "ffmpeg")]
        PixelFormat::H264 | PixelFormat::H265 => Ok(Box::new(H26xDecoder::new(format)?)),
        #[cfg(not(feature = "ffmpeg"))]
        PixelFormat::H264 | PixelFormat::H265 => Err(VideoError::Decode(format!(
            "{format:?} decoding needs the `ffmpeg` feature"
        ))),
        _ => Ok(Box::new(RawDecoder::new(size, format)?)),
    }
}

/// Builds the matching decoder from the first frame it sees, and again
/// whenever the stream changes size or format.
#[derive(Default)]
pub struct AutoDecoder {
    current: Option<((PixelFormat, Vec2<usize>), Box<dyn Decoder>)>,
}

impl AutoDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Format and size the current decoder was built for, if any.
    pub fn stream(&self) -> Option<(PixelFormat, Vec2<usize>)> {
        self.current.as_ref().map(|(stream, _)| *stream)
    }
}

impl Decoder for AutoDecoder {
    fn decode(&mut self, frame: &ColorFrame, outputs: &mut Vec<Image>) -> Result<usize, VideoError> {
        let stream = (frame.format, frame.size);
        let decoder = match &mut self.current {
            Some((current, decoder)) if *current == stream => decoder,
            current => {
                log_info!("decoder: initializing for {} {:?}", frame.size, frame.format);
                let decoder = create_decoder(frame.format, frame.size)?;
                &mut current.insert((stream, decoder)).1
            }
        };
        decoder.decode(frame, outputs)
    }
}

impl<D: Decoder + ?Sized> Decoder for Box<D> {
    fn decode(&mut self, frame: &ColorFrame, outputs: &mut Vec<Image>) -> Result<usize, VideoError> {
        (**self).decode(frame, outputs)
    }

    fn target_format(&self) -> PixelFormat {
        (**self).target_format()
    }
}
