use {crate::*, base::Vec2};

fn pack_u32(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

pub fn rgb_to_u32(size: Vec2<usize>, data: &[u8]) -> Vec<u32> {
    let mut buf = Vec::with_capacity(size.area());
    for chunk in data.chunks_exact(3) {
        buf.push(pack_u32(chunk[0], chunk[1], chunk[2]));
    }
    buf
}

pub fn argb_to_u32(size: Vec2<usize>, data: &[u8]) -> Vec<u32> {
    let mut buf = Vec::with_capacity(size.area());
    for chunk in data.chunks_exact(4) {
        buf.push(u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    buf
}

/// Pack an image into `0xAARRGGBB` pixels, the layout window framebuffers expect.
pub fn to_u32(image: &Image) -> Result<Vec<u32>, ImageError> {
    match image.format {
        PixelFormat::Rgb8 => {
            image.validate()?;
            Ok(rgb_to_u32(image.size, &image.data))
        }
        PixelFormat::Argb8 => {
            image.validate()?;
            Ok(argb_to_u32(image.size, &image.data))
        }
        PixelFormat::Jpeg => {
            let decoded = decode_jpeg(&image.data)?;
            Ok(rgb_to_u32(decoded.size, &decoded.data))
        }
        _ => {
            let argb = to_argb(image)?;
            Ok(argb_to_u32(argb.size, &argb.data))
        }
    }
}
