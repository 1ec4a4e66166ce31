use {
    crate::*,
    base::*,
    image::PixelFormat,
    std::{
        path::PathBuf,
        sync::mpsc,
        thread::{self, JoinHandle},
        time::{Duration, Instant},
    },
    v4l::{
        Device, Format, FourCC, buffer::Type, io::mmap::Stream as MmapStream,
        io::traits::CaptureStream, video::Capture,
    },
};

// delay before reconnecting after failure
const WAIT_BEFORE_RECONNECT_MS: u64 = 100;

// number of mmap buffers queued with the driver
const BUFFER_COUNT: u32 = 4;

#[derive(Debug, Clone, Default)]
pub struct V4l2Config {
    pub path: Option<PathBuf>,
    pub size: Option<Vec2<usize>>,
    pub format: Option<PixelFormat>,
    pub frame_rate: Option<f32>,
}

struct V4l2Device {
    stream: MmapStream<'static>,
    size: Vec2<usize>,
    format: PixelFormat,
    frame_rate: f32,
}

impl V4l2Device {
    fn open(config: &V4l2Config) -> Result<Self, VideoError> {
        let device = match &config.path {
            Some(path) => Device::with_path(path)?,
            None => Device::new(0)?,
        };
        let device_format = Capture::format(&device)?;

        let desired_size = config.size.unwrap_or(Vec2::new(
            device_format.width as usize,
            device_format.height as usize,
        ));
        let desired_fourcc = match config.format {
            Some(format) => FourCC::new(&format.as_fourcc().to_le_bytes()),
            None => device_format.fourcc,
        };
        let actual_format = Capture::set_format(
            &device,
            &Format::new(desired_size.x as u32, desired_size.y as u32, desired_fourcc),
        )?;
        let size = Vec2::new(actual_format.width as usize, actual_format.height as usize);
        let format = PixelFormat::from_fourcc(u32::from_le_bytes(actual_format.fourcc.repr))
            .ok_or_else(|| {
                VideoError::Device(format!("unsupported pixel format: {}", actual_format.fourcc))
            })?;

        let desired_frame_rate = match config.frame_rate {
            Some(frame_rate) => frame_rate,
            None => {
                let params = Capture::params(&device)?;
                params.interval.denominator as f32 / params.interval.numerator as f32
            }
        };
        let actual_params = Capture::set_params(
            &device,
            &v4l::video::capture::Parameters::with_fps(desired_frame_rate as u32),
        )?;
        let frame_rate =
            actual_params.interval.denominator as f32 / actual_params.interval.numerator as f32;

        let stream = MmapStream::with_buffers(&device, Type::VideoCapture, BUFFER_COUNT)
            .map_err(|e| VideoError::Stream(e.to_string()))?;

        Ok(Self {
            stream,
            size,
            format,
            frame_rate,
        })
    }

    fn resolved(&self, config: &V4l2Config) -> V4l2Config {
        V4l2Config {
            path: config.path.clone(),
            size: Some(self.size),
            format: Some(self.format),
            frame_rate: Some(self.frame_rate),
        }
    }

    fn capture(&mut self, index: u64) -> Result<ColorFrame, VideoError> {
        let (data, _metadata) =
            CaptureStream::next(&mut self.stream).map_err(|e| VideoError::Stream(e.to_string()))?;
        Ok(ColorFrame {
            index,
            size: self.size,
            format: self.format,
            data: data.to_vec(),
        })
    }
}

/// Video4Linux2 capture device delivering color-only frame sets.
///
/// The device is opened, read and closed on the delivery thread; if capture
/// fails the device is reopened until `stop` is called.
pub struct V4l2Source {
    config: V4l2Config,
    cancel: CancelFlag,
    join_handle: Option<JoinHandle<()>>,
}

impl V4l2Source {
    pub fn new(config: V4l2Config) -> Self {
        Self {
            config,
            cancel: CancelFlag::new(),
            join_handle: None,
        }
    }

    /// The configuration the device actually accepted, once started.
    pub fn config(&self) -> &V4l2Config {
        &self.config
    }
}

impl CaptureSource for V4l2Source {
    fn start(&mut self, mut callback: FrameCallback) -> Result<(), VideoError> {
        if self.join_handle.is_some() {
            return Err(VideoError::Device("v4l2 source already started".to_string()));
        }
        self.cancel = CancelFlag::new();
        let cancel = self.cancel.clone();
        let config = self.config.clone();
        let (init_tx, init_rx) = mpsc::sync_channel::<Result<V4l2Config, VideoError>>(1);

        let join_handle = thread::Builder::new()
            .name("v4l2-source".to_string())
            .spawn(move || {
                let mut device = match V4l2Device::open(&config) {
                    Ok(device) => {
                        let _ = init_tx.send(Ok(device.resolved(&config)));
                        device
                    }
                    Err(e) => {
                        let _ = init_tx.send(Err(e));
                        return;
                    }
                };
                let start = Instant::now();
                let mut index = 0u64;
                'outer: while !cancel.is_cancelled() {
                    log_info!("v4l2 source: capturing {} {:?}", device.size, device.format);
                    while !cancel.is_cancelled() {
                        match device.capture(index) {
                            Ok(color) => {
                                callback(FrameSet {
                                    index,
                                    timestamp: start.elapsed(),
                                    color: Some(color),
                                    depth: None,
                                });
                                index += 1;
                            }
                            Err(e) => {
                                log_error!("v4l2 source: capture failed: {}", e);
                                break;
                            }
                        }
                    }

                    // wait and reopen the device
                    while !cancel.is_cancelled() {
                        log_info!("v4l2 source: reconnecting...");
                        thread::sleep(Duration::from_millis(WAIT_BEFORE_RECONNECT_MS));
                        if let Ok(reopened) = V4l2Device::open(&config) {
                            device = reopened;
                            continue 'outer;
                        }
                    }
                }
                log_info!("v4l2 source: stopped after {} frames", index);
            })?;

        let resolved = init_rx
            .recv()
            .map_err(|_| VideoError::Device("worker thread died during init".to_string()))
            .and_then(|result| result);
        match resolved {
            Ok(resolved) => {
                self.config = resolved;
                self.join_handle = Some(join_handle);
                Ok(())
            }
            Err(e) => {
                let _ = join_handle.join();
                Err(e)
            }
        }
    }

    fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(join_handle) = self.join_handle.take() {
            if join_handle.join().is_err() {
                log_error!("v4l2 source: worker panicked");
            }
        }
    }

    fn frame_rate(&self) -> f32 {
        self.config.frame_rate.unwrap_or_default()
    }
}

impl Drop for V4l2Source {
    fn drop(&mut self) {
        self.stop();
    }
}
