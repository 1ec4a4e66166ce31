use {
    base::Vec2,
    image::{Image, PixelFormat, rgb_to_jpeg},
    video::{
        AutoDecoder, ColorFrame, Decoder, JpegDecoder, NullRenderer, RawDecoder, Renderer, VideoError,
        create_decoder,
    },
};

fn color(size: Vec2<usize>, format: PixelFormat, data: Vec<u8>) -> ColorFrame {
    ColorFrame {
        index: 0,
        size,
        format,
        data,
    }
}

#[test]
fn test_jpeg_decoder_outputs_argb() {
    let size = Vec2::new(8, 8);
    let jpeg = rgb_to_jpeg(size, &vec![128; size.area() * 3], 90).unwrap();
    let mut decoder = JpegDecoder::new();
    let mut outputs = Vec::new();
    assert_eq!(decoder.decode(&color(size, PixelFormat::Jpeg, jpeg), &mut outputs).unwrap(), 1);
    assert_eq!(outputs[0].size, size);
    assert_eq!(outputs[0].format, PixelFormat::Argb8);
    assert_eq!(outputs[0].data.len(), size.area() * 4);
}

#[test]
fn test_jpeg_decoder_rejects_garbage() {
    let mut decoder = JpegDecoder::new();
    let mut outputs = Vec::new();
    assert!(matches!(
        decoder.decode(&color(Vec2::new(8, 8), PixelFormat::Jpeg, vec![1, 2, 3]), &mut outputs),
        Err(VideoError::Decode(_))
    ));
    assert!(matches!(
        decoder.decode(&color(Vec2::new(8, 8), PixelFormat::Jpeg, Vec::new()), &mut outputs),
        Err(VideoError::Decode(_))
    ));
    assert!(outputs.is_empty());
}

#[test]
fn test_raw_decoder_checks_length() {
    let size = Vec2::new(2, 1);
    let mut decoder = RawDecoder::new(size, PixelFormat::Yuyv).unwrap();
    let mut outputs = Vec::new();
    assert_eq!(decoder.decode(&color(size, PixelFormat::Yuyv, vec![128; 4]), &mut outputs).unwrap(), 1);
    assert!(decoder.decode(&color(size, PixelFormat::Yuyv, vec![128; 3]), &mut outputs).is_err());
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].format, PixelFormat::Argb8);
    assert_eq!(decoder.target_format(), PixelFormat::Argb8);
}

#[test]
fn test_raw_decoder_rejects_other_stream() {
    let mut decoder = RawDecoder::new(Vec2::new(2, 1), PixelFormat::Yuyv).unwrap();
    let mut outputs = Vec::new();
    let wider = color(Vec2::new(4, 1), PixelFormat::Yuyv, vec![128; 8]);
    assert!(matches!(decoder.decode(&wider, &mut outputs), Err(VideoError::Decode(_))));
    assert!(outputs.is_empty());
}

#[test]
fn test_raw_decoder_rejects_compressed_format() {
    assert!(RawDecoder::new(Vec2::new(2, 2), PixelFormat::Jpeg).is_err());
}

#[test]
fn test_create_decoder_by_format() {
    let size = Vec2::new(2, 2);
    let mut decoder = create_decoder(PixelFormat::Rgb8, size).unwrap();
    let mut outputs = Vec::new();
    assert_eq!(decoder.decode(&color(size, PixelFormat::Rgb8, vec![0; 12]), &mut outputs).unwrap(), 1);
    assert!(create_decoder(PixelFormat::Jpeg, size).is_ok());
}

#[test]
fn test_auto_decoder_builds_from_first_frame() {
    let mut decoder = AutoDecoder::new();
    assert!(decoder.stream().is_none());

    let small = Vec2::new(2, 2);
    let mut outputs = Vec::new();
    assert_eq!(decoder.decode(&color(small, PixelFormat::Rgb8, vec![0; 12]), &mut outputs).unwrap(), 1);
    assert_eq!(decoder.stream(), Some((PixelFormat::Rgb8, small)));
    assert_eq!(outputs[0].size, small);

    let large = Vec2::new(4, 2);
    assert_eq!(decoder.decode(&color(large, PixelFormat::Yuyv, vec![128; 16]), &mut outputs).unwrap(), 1);
    assert_eq!(decoder.stream(), Some((PixelFormat::Yuyv, large)));
    assert_eq!(outputs[1].size, large);
    assert_eq!(outputs[1].format, PixelFormat::Argb8);
}

#[test]
fn test_auto_decoder_decodes_jpeg_without_known_size() {
    let size = Vec2::new(16, 8);
    let jpeg = rgb_to_jpeg(size, &vec![200; size.area() * 3], 90).unwrap();
    let mut decoder = AutoDecoder::new();
    let mut outputs = Vec::new();
    assert_eq!(decoder.decode(&color(size, PixelFormat::Jpeg, jpeg), &mut outputs).unwrap(), 1);
    assert_eq!(outputs[0].size, size);
    assert_eq!(decoder.stream(), Some((PixelFormat::Jpeg, size)));
}

#[cfg(not(feature = "ffmpeg"))]
#[test]
fn test_auto_decoder_retries_after_failed_init() {
    let size = Vec2::new(2, 2);
    let mut decoder = AutoDecoder::new();
    let mut outputs = Vec::new();
    assert!(decoder.decode(&color(size, PixelFormat::H264, vec![0, 0, 1, 0x65]), &mut outputs).is_err());
    assert!(decoder.stream().is_none());
    assert_eq!(decoder.decode(&color(size, PixelFormat::Rgb8, vec![0; 12]), &mut outputs).unwrap(), 1);
}

#[cfg(not(feature = "ffmpeg"))]
#[test]
fn test_h26x_needs_ffmpeg_feature() {
    assert!(create_decoder(PixelFormat::H264, Vec2::new(2, 2)).is_err());
}

#[test]
fn test_null_renderer_closes_after_limit() {
    let image = Image::new(Vec2::new(1, 1), vec![0xFF, 0, 0, 0], PixelFormat::Argb8);
    let mut renderer = NullRenderer::closing_after(2);
    assert!(renderer.is_open());
    renderer.render(&image).unwrap();
    assert!(renderer.is_open());
    renderer.render(&image).unwrap();
    assert!(!renderer.is_open());
    assert_eq!(renderer.rendered(), 2);

    let mut unbounded = NullRenderer::new();
    unbounded.render(&image).unwrap();
    assert!(unbounded.is_open());
}
