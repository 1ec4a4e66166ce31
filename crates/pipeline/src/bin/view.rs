use {
    base::*,
    pipeline::*,
    std::time::Duration,
    video::*,
};

// number of displayed frames before the run ends on its own
const DEFAULT_FRAMES: u64 = 500;

const WAIT_POLL_MS: u64 = 40;

// the decoder is built from the first frame's format and size
fn run<S: CaptureSource + 'static>(
    source: S,
    frames: u64,
    headless: bool,
) -> Result<PipelineReport, PipelineError> {
    let pipeline = Pipeline::start(PipelineConfig::default(), source, AutoDecoder::new(), move || {
        let renderer: Box<dyn Renderer> = if headless {
            Box::new(NullRenderer::new())
        } else {
            Box::new(WindowRenderer::new("Pipeline View - ESC to exit"))
        };
        Ok(renderer)
    })?;
    if pipeline.wait_until(
        |metrics| metrics.displayed >= frames,
        Duration::from_millis(WAIT_POLL_MS),
    ) {
        log_info!("displayed {} frames", frames);
    } else {
        log_info!("viewer closed");
    }
    Ok(pipeline.shutdown())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_stdout_logger();

    // view [synthetic|v4l2] [frames] [window|null]
    let args: Vec<String> = std::env::args().collect();
    let kind = args.get(1).map(String::as_str).unwrap_or("synthetic");
    let frames = match args.get(2) {
        Some(frames) => frames.parse::<u64>()?,
        None => DEFAULT_FRAMES,
    };
    let headless = args.get(3).is_some_and(|renderer| renderer == "null");

    let report = match kind {
        "synthetic" => {
            let source = SyntheticSource::new(SyntheticConfig {
                with_depth: true,
                ..Default::default()
            })?;
            log_info!("synthetic source: {} {:?}", source.size(), source.format());
            run(source, frames, headless)?
        }
        #[cfg(feature = "v4l2")]
        "v4l2" => {
            let config = V4l2Config {
                format: Some(image::PixelFormat::Jpeg),
                ..Default::default()
            };
            run(V4l2Source::new(config), frames, headless)?
        }
        other => {
            log_error!("unknown source: {}", other);
            eprintln!("usage: view [synthetic|v4l2] [frames] [window|null]");
            std::process::exit(1);
        }
    };

    log_info!("{:.1} fps", report.display_rate());
    Ok(())
}
