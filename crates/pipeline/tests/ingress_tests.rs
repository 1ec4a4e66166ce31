use {
    base::Vec2,
    image::PixelFormat,
    pipeline::{IngressGate, IngressOutcome, PipelineConfig, PipelineContext},
    std::{
        thread,
        time::{Duration, Instant},
    },
    video::{ColorFrame, DepthFrame, FrameSet},
};

const H264_IDR: &[u8] = &[0, 0, 0, 1, 0x67, 0x42, 0, 0, 0, 1, 0x65, 0x88, 0x84];
const H264_P: &[u8] = &[0, 0, 0, 1, 0x41, 0x9A, 0x02];

fn frame_set(index: u64, format: PixelFormat, data: &[u8], depth: bool) -> FrameSet {
    let size = Vec2::new(2, 2);
    FrameSet {
        index,
        timestamp: Duration::from_millis(index * 10),
        color: Some(ColorFrame {
            index,
            size,
            format,
            data: data.to_vec(),
        }),
        depth: depth.then(|| DepthFrame {
            size,
            data: vec![1000; 4],
        }),
    }
}

fn rgb(index: u64) -> FrameSet {
    frame_set(index, PixelFormat::Rgb8, &[0; 12], false)
}

fn context(config: PipelineConfig) -> PipelineContext {
    PipelineContext::new(config).unwrap()
}

#[test]
fn test_complete_frame_sets_are_forwarded() {
    let context = context(PipelineConfig::default());
    let mut gate = IngressGate::new(&context, 30.0);
    assert_eq!(gate.offer(rgb(0)), IngressOutcome::Forwarded);
    assert_eq!(gate.offer(rgb(1)), IngressOutcome::Forwarded);
    assert_eq!(context.ingress.len(), 2);
    assert_eq!(context.ingress.try_pop().unwrap().index, 0);

    let metrics = context.metrics.snapshot();
    assert_eq!(metrics.captured, 2);
    assert_eq!(metrics.forwarded, 2);
}

#[test]
fn test_incomplete_frame_sets_are_rejected() {
    let context = context(PipelineConfig {
        require_depth: true,
        ..Default::default()
    });
    let mut gate = IngressGate::new(&context, 30.0);

    let mut no_color = rgb(0);
    no_color.color = None;
    assert_eq!(gate.offer(no_color), IngressOutcome::Rejected);
    assert_eq!(gate.offer(rgb(1)), IngressOutcome::Rejected);
    assert_eq!(
        gate.offer(frame_set(2, PixelFormat::Rgb8, &[0; 12], true)),
        IngressOutcome::Forwarded
    );

    let metrics = context.metrics.snapshot();
    assert_eq!(metrics.captured, 3);
    assert_eq!(metrics.rejected, 2);
    assert_eq!(context.ingress.len(), 1);
}

#[test]
fn test_compressed_stream_waits_for_keyframe() {
    let context = context(PipelineConfig::default());
    let mut gate = IngressGate::new(&context, 30.0);
    assert_eq!(
        gate.offer(frame_set(0, PixelFormat::H264, H264_P, false)),
        IngressOutcome::WaitingForKeyframe
    );
    assert_eq!(
        gate.offer(frame_set(1, PixelFormat::H264, H264_IDR, false)),
        IngressOutcome::Forwarded
    );
    assert_eq!(
        gate.offer(frame_set(2, PixelFormat::H264, H264_P, false)),
        IngressOutcome::Forwarded
    );
    assert_eq!(context.metrics.snapshot().waiting_for_keyframe, 1);
    assert_eq!(context.ingress.try_pop().unwrap().index, 1);
}

#[test]
fn test_keyframe_gating_can_be_disabled() {
    let context = context(PipelineConfig {
        wait_for_keyframe: false,
        ..Default::default()
    });
    let mut gate = IngressGate::new(&context, 30.0);
    assert_eq!(
        gate.offer(frame_set(0, PixelFormat::H264, H264_P, false)),
        IngressOutcome::Forwarded
    );
}

#[test]
fn test_full_channel_drops_after_push_timeout() {
    let context = context(PipelineConfig {
        ingress_capacity: 2,
        ..Default::default()
    });
    // 100 fps: 10 ms interval minus the 5 ms margin
    let mut gate = IngressGate::new(&context, 100.0);
    assert_eq!(gate.push_timeout(), Some(Duration::from_millis(5)));

    assert_eq!(gate.offer(rgb(0)), IngressOutcome::Forwarded);
    let start = Instant::now();
    assert_eq!(gate.offer(rgb(1)), IngressOutcome::Dropped);
    assert!(start.elapsed() >= Duration::from_millis(5));

    let metrics = context.metrics.snapshot();
    assert_eq!(metrics.dropped_at_ingress, 1);
    assert_eq!(metrics.forwarded, 1);
    assert_eq!(context.ingress.try_pop().unwrap().index, 0);
}

#[test]
fn test_pending_rate_is_resolved_on_first_offer() {
    let context = context(PipelineConfig {
        ingress_capacity: 2,
        ..Default::default()
    });
    let (mut gate, rate) = IngressGate::with_pending_rate(&context);
    assert_eq!(gate.push_timeout(), None);

    let sender = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        rate.send(100.0).unwrap();
    });
    let start = Instant::now();
    assert_eq!(gate.offer(rgb(0)), IngressOutcome::Forwarded);
    assert!(start.elapsed() >= Duration::from_millis(20));
    sender.join().unwrap();
    assert_eq!(gate.push_timeout(), Some(Duration::from_millis(5)));

    let start = Instant::now();
    assert_eq!(gate.offer(rgb(1)), IngressOutcome::Dropped);
    assert!(start.elapsed() >= Duration::from_millis(5));
}

#[test]
fn test_pending_rate_without_sender_never_waits() {
    let context = context(PipelineConfig {
        ingress_capacity: 2,
        ..Default::default()
    });
    let (mut gate, rate) = IngressGate::with_pending_rate(&context);
    drop(rate);
    assert_eq!(gate.offer(rgb(0)), IngressOutcome::Forwarded);
    assert_eq!(gate.push_timeout(), Some(Duration::ZERO));
    assert_eq!(gate.offer(rgb(1)), IngressOutcome::Dropped);
}

#[test]
fn test_closed_channel_is_reported() {
    let context = context(PipelineConfig::default());
    let mut gate = IngressGate::new(&context, 30.0);
    context.cancel_and_close();
    assert_eq!(gate.offer(rgb(0)), IngressOutcome::Closed);
    assert_eq!(context.metrics.snapshot().dropped_at_ingress, 0);
}

#[test]
fn test_push_timeout_from_frame_rate() {
    let config = PipelineConfig::default();
    assert_eq!(config.push_timeout(50.0), Duration::from_millis(15));
    assert_eq!(config.push_timeout(500.0), Duration::ZERO);
    assert_eq!(config.push_timeout(0.0), Duration::ZERO);
}

#[test]
fn test_config_validation() {
    assert!(PipelineConfig::default().validate().is_ok());
    for config in [
        PipelineConfig {
            ingress_capacity: 1,
            ..Default::default()
        },
        PipelineConfig {
            egress_capacity: 0,
            ..Default::default()
        },
        PipelineConfig {
            poll_timeout: Duration::ZERO,
            ..Default::default()
        },
    ] {
        assert!(config.validate().is_err());
        assert!(PipelineContext::new(config).is_err());
    }
}
