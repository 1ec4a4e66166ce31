use {
    crate::*,
    base::*,
    ffmpeg_next as ffmpeg,
    image::{Image, PixelFormat},
};

fn decode_error(context: &str, err: ffmpeg::Error) -> VideoError {
    VideoError::Decode(format!("{context}: {err}"))
}

struct Scaler {
    context: ffmpeg::software::scaling::Context,
    format: ffmpeg::format::Pixel,
    size: Vec2<usize>,
}

/// H.264 / H.265 Annex-B decoder backed by libavcodec, producing `Argb8`.
///
/// The colour converter is built from the first decoded picture and rebuilt
/// whenever the stream changes size or pixel layout.
pub struct H26xDecoder {
    decoder: ffmpeg::decoder::Video,
    scaler: Option<Scaler>,
    decoded: ffmpeg::frame::Video,
    converted: ffmpeg::frame::Video,
}

// SAFETY: libavcodec and libswscale contexts carry no thread affinity and
// this type is only ever driven through `&mut self`.
unsafe impl Send for H26xDecoder {}

impl H26xDecoder {
    pub fn new(format: PixelFormat) -> Result<Self, VideoError> {
        ffmpeg::init().map_err(|e| decode_error("initialize ffmpeg", e))?;
        let id = match format {
            PixelFormat::H264 => ffmpeg::codec::Id::H264,
            PixelFormat::H265 => ffmpeg::codec::Id::HEVC,
            other => {
                return Err(VideoError::Decode(format!("{other:?} is not an H.26x format")));
            }
        };
        let codec = ffmpeg::decoder::find(id)
            .ok_or_else(|| VideoError::Decode(format!("no libavcodec decoder for {format:?}")))?;
        let decoder = ffmpeg::codec::context::Context::new()
            .decoder()
            .open_as(codec)
            .and_then(|opened| opened.video())
            .map_err(|e| decode_error("open decoder", e))?;
        log_info!("h26x decoder: opened {:?}", format);
        Ok(Self {
            decoder,
            scaler: None,
            decoded: ffmpeg::frame::Video::empty(),
            converted: ffmpeg::frame::Video::empty(),
        })
    }

    fn convert(&mut self) -> Result<Image, VideoError> {
        let format = self.decoded.format();
        let size = Vec2::new(self.decoded.width() as usize, self.decoded.height() as usize);
        let stale = self
            .scaler
            .as_ref()
            .is_none_or(|scaler| scaler.format != format || scaler.size != size);
        if stale {
            let context = ffmpeg::software::scaling::Context::get(
                format,
                size.x as u32,
                size.y as u32,
                ffmpeg::format::Pixel::ARGB,
                size.x as u32,
                size.y as u32,
                ffmpeg::software::scaling::Flags::BILINEAR,
            )
            .map_err(|e| decode_error("create scaler", e))?;
            self.scaler = Some(Scaler {
                context,
                format,
                size,
            });
        }
        let Some(scaler) = self.scaler.as_mut() else {
            return Err(VideoError::Decode("scaler missing".to_string()));
        };
        scaler
            .context
            .run(&self.decoded, &mut self.converted)
            .map_err(|e| decode_error("scale frame", e))?;
        Ok(Image::new(size, packed_rows(&self.converted, size)?, PixelFormat::Argb8))
    }
}

// copy plane 0 without the row padding libswscale may add
fn packed_rows(frame: &ffmpeg::frame::Video, size: Vec2<usize>) -> Result<Vec<u8>, VideoError> {
    let row_bytes = size.x * 4;
    let stride = frame.stride(0);
    let data = frame.data(0);
    if stride == row_bytes {
        return data
            .get(..row_bytes * size.y)
            .map(<[u8]>::to_vec)
            .ok_or_else(|| VideoError::Decode("frame shorter than its size".to_string()));
    }
    let mut pixels = Vec::with_capacity(row_bytes * size.y);
    for row in 0..size.y {
        let start = row * stride;
        pixels.extend_from_slice(
            data.get(start..start + row_bytes)
                .ok_or_else(|| VideoError::Decode("frame row out of bounds".to_string()))?,
        );
    }
    Ok(pixels)
}

impl Decoder for H26xDecoder {
    fn decode(&mut self, frame: &ColorFrame, outputs: &mut Vec<Image>) -> Result<usize, VideoError> {
        let packet = ffmpeg::Packet::copy(&frame.data);
        self.decoder
            .send_packet(&packet)
            .map_err(|e| decode_error("send packet", e))?;
        let mut count = 0;
        while self.decoder.receive_frame(&mut self.decoded).is_ok() {
            outputs.push(self.convert()?);
            count += 1;
        }
        Ok(count)
    }
}
