use {
    crate::*,
    base::Vec2,
    crates_image::{ImageEncoder, ImageFormat},
};

/// Decode a JPEG bitstream into an `Rgb8` image.
pub fn decode_jpeg(data: &[u8]) -> Result<Image, ImageError> {
    let decoded = crates_image::load_from_memory_with_format(data, ImageFormat::Jpeg)?;
    let rgb = decoded.to_rgb8();
    let size = Vec2::new(rgb.width() as usize, rgb.height() as usize);
    Ok(Image::new(size, rgb.into_raw(), PixelFormat::Rgb8))
}

pub fn rgb_to_jpeg(size: Vec2<usize>, data: &[u8], quality: u8) -> Result<Vec<u8>, ImageError> {
    let mut buffer = Vec::new();
    let encoder = crates_image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(
            data,
            size.x as u32,
            size.y as u32,
            crates_image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// Encode any uncompressed image as JPEG. Alpha is dropped.
pub fn encode_jpeg(image: &Image, quality: u8) -> Result<Vec<u8>, ImageError> {
    image.validate()?;
    match image.format {
        PixelFormat::Rgb8 => rgb_to_jpeg(image.size, &image.data, quality),
        _ => {
            let argb = to_argb(image)?;
            let rgb: Vec<u8> = argb
                .data
                .chunks_exact(4)
                .flat_map(|c| [c[1], c[2], c[3]])
                .collect();
            rgb_to_jpeg(image.size, &rgb, quality)
        }
    }
}
