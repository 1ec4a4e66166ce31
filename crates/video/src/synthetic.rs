use {
    crate::*,
    base::*,
    image::{PixelFormat, rgb_to_jpeg},
    std::{
        thread::{self, JoinHandle},
        time::{Duration, Instant},
    },
};

const DEFAULT_WIDTH: usize = 320;
const DEFAULT_HEIGHT: usize = 240;
const DEFAULT_FRAME_RATE: f32 = 30.0;
const JPEG_QUALITY: u8 = 80;

// longest the worker sleeps before looking at the cancel flag again
const CANCEL_POLL_MS: u64 = 50;

#[derive(Debug, Clone, Default)]
pub struct SyntheticConfig {
    pub size: Option<Vec2<usize>>,
    pub frame_rate: Option<f32>,
    /// `Jpeg` (default) or `Rgb8`.
    pub format: Option<PixelFormat>,
    pub with_depth: bool,
    /// Stop on its own after this many frame sets.
    pub frame_count: Option<u64>,
}

/// Test-pattern source: a scrolling gradient, optionally with a depth plane.
pub struct SyntheticSource {
    size: Vec2<usize>,
    frame_rate: f32,
    interval: Duration,
    format: PixelFormat,
    with_depth: bool,
    frame_count: Option<u64>,
    cancel: CancelFlag,
    join_handle: Option<JoinHandle<()>>,
}

// `None` when the deadline lies beyond what `Instant` can represent
fn frame_deadline(start: Instant, interval: Duration, index: u64) -> Option<Instant> {
    let nanos = interval.as_nanos().checked_mul(u128::from(index))?;
    start.checked_add(Duration::from_nanos(u64::try_from(nanos).ok()?))
}

impl SyntheticSource {
    pub fn new(config: SyntheticConfig) -> Result<Self, VideoError> {
        let size = config
            .size
            .unwrap_or(Vec2::new(DEFAULT_WIDTH, DEFAULT_HEIGHT));
        if size.x == 0 || size.y == 0 {
            return Err(VideoError::Device(format!("invalid frame size {size}")));
        }
        let frame_rate = config.frame_rate.unwrap_or(DEFAULT_FRAME_RATE);
        if !frame_rate.is_finite() || frame_rate <= 0.0 {
            return Err(VideoError::Device(format!("invalid frame rate {frame_rate}")));
        }
        let interval = Duration::try_from_secs_f32(1.0 / frame_rate)
            .map_err(|_| VideoError::Device(format!("frame rate {frame_rate} is too low")))?;
        let format = config.format.unwrap_or(PixelFormat::Jpeg);
        if !matches!(format, PixelFormat::Jpeg | PixelFormat::Rgb8) {
            return Err(VideoError::Device(format!(
                "synthetic source cannot produce {format:?}"
            )));
        }
        Ok(Self {
            size,
            frame_rate,
            interval,
            format,
            with_depth: config.with_depth,
            frame_count: config.frame_count,
            cancel: CancelFlag::new(),
            join_handle: None,
        })
    }

    pub fn size(&self) -> Vec2<usize> {
        self.size
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }
}

fn gradient(size: Vec2<usize>, offset: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(size.area() * 3);
    for y in 0..size.y {
        for x in 0..size.x {
            data.push((((x + offset) % size.x) * 255 / size.x) as u8);
            data.push((y * 255 / size.y) as u8);
            data.push((offset & 0xFF) as u8);
        }
    }
    data
}

fn depth_ramp(size: Vec2<usize>, offset: usize) -> Vec<u16> {
    let mut data = Vec::with_capacity(size.area());
    for y in 0..size.y {
        for x in 0..size.x {
            data.push(500 + ((x + y + offset) % 1000) as u16);
        }
    }
    data
}

struct Generator {
    size: Vec2<usize>,
    format: PixelFormat,
    with_depth: bool,
}

impl Generator {
    fn frame_set(&self, index: u64, timestamp: Duration) -> Result<FrameSet, VideoError> {
        let offset = index as usize;
        let rgb = gradient(self.size, offset);
        let data = match self.format {
            PixelFormat::Jpeg => rgb_to_jpeg(self.size, &rgb, JPEG_QUALITY)?,
            _ => rgb,
        };
        let depth = self.with_depth.then(|| DepthFrame {
            size: self.size,
            data: depth_ramp(self.size, offset),
        });
        Ok(FrameSet {
            index,
            timestamp,
            color: Some(ColorFrame {
                index,
                size: self.size,
                format: self.format,
                data,
            }),
            depth,
        })
    }
}

impl CaptureSource for SyntheticSource {
    fn start(&mut self, mut callback: FrameCallback) -> Result<(), VideoError> {
        if self.join_handle.is_some() {
            return Err(VideoError::Device("synthetic source already started".to_string()));
        }
        self.cancel = CancelFlag::new();
        let cancel = self.cancel.clone();
        let generator = Generator {
            size: self.size,
            format: self.format,
            with_depth: self.with_depth,
        };
        let interval = self.interval;
        let frame_count = self.frame_count;
        let join_handle = thread::Builder::new()
            .name("synthetic-source".to_string())
            .spawn(move || {
                log_info!("synthetic source: streaming {}", generator.size);
                let start = Instant::now();
                let mut index = 0u64;
                while !cancel.is_cancelled() && frame_count.is_none_or(|count| index < count) {
                    let deadline = frame_deadline(start, interval, index);
                    while !cancel.is_cancelled() {
                        let remaining = deadline.map_or(Duration::MAX, |deadline| {
                            deadline.saturating_duration_since(Instant::now())
                        });
                        if remaining.is_zero() {
                            break;
                        }
                        thread::sleep(remaining.min(Duration::from_millis(CANCEL_POLL_MS)));
                    }
                    if cancel.is_cancelled() {
                        break;
                    }
                    match generator.frame_set(index, start.elapsed()) {
                        Ok(frame_set) => callback(frame_set),
                        Err(error) => log_error!("synthetic source: frame {}: {}", index, error),
                    }
                    index += 1;
                }
                log_info!("synthetic source: stopped after {} frames", index);
            })?;
        self.join_handle = Some(join_handle);
        Ok(())
    }

    fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(join_handle) = self.join_handle.take() {
            if join_handle.join().is_err() {
                log_error!("synthetic source: worker panicked");
            }
        }
    }

    fn frame_rate(&self) -> f32 {
        self.frame_rate
    }
}

impl Drop for SyntheticSource {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_has_three_bytes_per_pixel() {
        let size = Vec2::new(5, 3);
        assert_eq!(gradient(size, 7).len(), 45);
        assert_eq!(depth_ramp(size, 7).len(), 15);
    }
}
