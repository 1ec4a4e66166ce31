use base::Vec2;
use image::{Image, ImageError, PixelFormat, argb_to_u32, nv12_to_argb, to_argb, to_u32};

#[test]
fn test_rgb_to_argb() {
    let image = Image::new(Vec2::new(2, 1), vec![1, 2, 3, 4, 5, 6], PixelFormat::Rgb8);
    let argb = to_argb(&image).unwrap();
    assert_eq!(argb.format, PixelFormat::Argb8);
    assert_eq!(argb.data, vec![0xFF, 1, 2, 3, 0xFF, 4, 5, 6]);
}

#[test]
fn test_yuyv_gray_to_argb() {
    // Y=128, U=128, V=128 (mid-gray, no chroma)
    let image = Image::new(Vec2::new(2, 1), vec![128; 4], PixelFormat::Yuyv);
    let argb = to_argb(&image).unwrap();
    assert_eq!(argb.data, vec![0xFF, 128, 128, 128, 0xFF, 128, 128, 128]);
}

#[test]
fn test_nv12_black_and_white() {
    // 2x2: top row white, bottom row black, neutral chroma
    let data = vec![255, 255, 0, 0, 128, 128];
    let argb = nv12_to_argb(Vec2::new(2, 2), &data);
    assert_eq!(
        argb,
        vec![
            0xFF, 255, 255, 255, 0xFF, 255, 255, 255, // row 0
            0xFF, 0, 0, 0, 0xFF, 0, 0, 0, // row 1
        ]
    );
}

#[test]
fn test_nv12_odd_size() {
    let size = Vec2::new(3, 3);
    let data = vec![16u8; PixelFormat::Nv12.frame_len(size).unwrap()];
    let argb = to_argb(&Image::new(size, data, PixelFormat::Nv12)).unwrap();
    assert_eq!(argb.data.len(), 9 * 4);
}

#[test]
fn test_to_argb_rejects_compressed() {
    let image = Image::new(Vec2::new(2, 2), vec![0, 0, 0, 1, 0x65], PixelFormat::H264);
    assert!(matches!(to_argb(&image), Err(ImageError::Format(_))));
}

#[test]
fn test_argb_to_u32_packing() {
    let pixels = argb_to_u32(Vec2::new(1, 1), &[0xFF, 0x12, 0x34, 0x56]);
    assert_eq!(pixels, vec![0xFF12_3456]);
}

#[test]
fn test_to_u32_from_rgb() {
    let image = Image::new(Vec2::new(1, 1), vec![0x12, 0x34, 0x56], PixelFormat::Rgb8);
    assert_eq!(to_u32(&image).unwrap(), vec![0xFF12_3456]);
}

#[test]
fn test_to_u32_rejects_wrong_length() {
    let image = Image::new(Vec2::new(2, 2), vec![0; 3], PixelFormat::Rgb8);
    assert!(to_u32(&image).is_err());
}
