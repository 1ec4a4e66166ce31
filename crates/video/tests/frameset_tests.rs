use {
    base::Vec2,
    image::PixelFormat,
    std::time::Duration,
    video::{ColorFrame, DepthFrame, FrameSet},
};

fn frame_set(color: Option<Vec<u8>>, depth: Option<Vec<u16>>) -> FrameSet {
    let size = Vec2::new(2, 2);
    FrameSet {
        index: 3,
        timestamp: Duration::from_millis(100),
        color: color.map(|data| ColorFrame {
            index: 3,
            size,
            format: PixelFormat::Jpeg,
            data,
        }),
        depth: depth.map(|data| DepthFrame { size, data }),
    }
}

#[test]
fn test_color_only_set_is_complete_without_depth() {
    let set = frame_set(Some(vec![0xFF, 0xD8]), None);
    assert!(set.is_complete(false));
    assert!(!set.is_complete(true));
}

#[test]
fn test_missing_or_empty_color_is_incomplete() {
    assert!(!frame_set(None, Some(vec![1; 4])).is_complete(false));
    assert!(!frame_set(Some(Vec::new()), None).is_complete(false));
}

#[test]
fn test_depth_must_match_size() {
    assert!(frame_set(Some(vec![1]), Some(vec![1; 4])).is_complete(true));
    assert!(!frame_set(Some(vec![1]), Some(vec![1; 3])).is_complete(true));
}

#[test]
fn test_raw_color_frame_into_image() {
    let frame = ColorFrame {
        index: 0,
        size: Vec2::new(1, 1),
        format: PixelFormat::Rgb8,
        data: vec![1, 2, 3],
    };
    assert_eq!(frame.len(), 3);
    let image = frame.into_image();
    assert!(image.validate().is_ok());
}
