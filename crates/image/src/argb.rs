use {crate::*, base::Vec2};

pub fn rgb_to_argb(size: Vec2<usize>, data: &[u8]) -> Vec<u8> {
    let mut argb = Vec::with_capacity(size.area() * 4);

    for chunk in data.chunks_exact(3) {
        argb.push(0xFF); // A
        argb.push(chunk[0]); // R
        argb.push(chunk[1]); // G
        argb.push(chunk[2]); // B
    }

    argb
}

pub fn yuyv_to_argb(size: Vec2<usize>, data: &[u8]) -> Vec<u8> {
    let mut argb = Vec::with_capacity(size.area() * 4);

    for chunk in data.chunks_exact(4) {
        let (r0, g0, b0) = yuv_to_rgb(chunk[0], chunk[1], chunk[3]);
        let (r1, g1, b1) = yuv_to_rgb(chunk[2], chunk[1], chunk[3]);
        argb.extend_from_slice(&[0xFF, r0, g0, b0, 0xFF, r1, g1, b1]);
    }

    argb
}

/// NV12: full-resolution Y plane followed by one interleaved, half-resolution UV plane.
pub fn nv12_to_argb(size: Vec2<usize>, data: &[u8]) -> Vec<u8> {
    let width = size.x;
    let height = size.y;
    let y_len = size.area();
    let uv_stride = width.div_ceil(2) * 2;

    let y_plane = &data[..y_len];
    let uv_plane = &data[y_len..];

    let mut argb = Vec::with_capacity(y_len * 4);

    for row in 0..height {
        let uv_row = &uv_plane[(row / 2) * uv_stride..];
        for col in 0..width {
            let y = y_plane[row * width + col];
            let u = uv_row[(col / 2) * 2];
            let v = uv_row[(col / 2) * 2 + 1];
            let (r, g, b) = yuv_to_rgb(y, u, v);
            argb.extend_from_slice(&[0xFF, r, g, b]);
        }
    }

    argb
}

/// Convert any uncompressed image to `Argb8`.
pub fn to_argb(image: &Image) -> Result<Image, ImageError> {
    image.validate()?;
    let data = match image.format {
        PixelFormat::Argb8 => image.data.clone(),
        PixelFormat::Rgb8 => rgb_to_argb(image.size, &image.data),
        PixelFormat::Yuyv => yuyv_to_argb(image.size, &image.data),
        PixelFormat::Nv12 => nv12_to_argb(image.size, &image.data),
        format => {
            return Err(ImageError::Format(format!(
                "cannot convert compressed {:?} data to ARGB",
                format
            )));
        }
    };
    Ok(Image::new(image.size, data, PixelFormat::Argb8))
}
