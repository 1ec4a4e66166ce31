use {
    crate::*,
    base::*,
    image::Image,
    std::sync::Arc,
    video::{Decoder, FrameSet, Renderer},
};

/// A decoded image and where it came from.
#[derive(Debug, Clone)]
pub struct FrameInfo {
    /// Index of the frame set the image was decoded from.
    pub frame_index: u64,
    /// Running count of images produced by the decoder.
    pub decode_index: u64,
    pub image: Image,
}

/// Decodes the color plane of each frame set into the decoder's target
/// format.
pub struct DecodeTransform<D> {
    decoder: D,
    metrics: Arc<PipelineMetrics>,
    decode_index: u64,
    images: Vec<Image>,
}

impl<D: Decoder> DecodeTransform<D> {
    pub fn new(decoder: D, metrics: Arc<PipelineMetrics>) -> Self {
        Self {
            decoder,
            metrics,
            decode_index: 0,
            images: Vec::new(),
        }
    }
}

impl<D: Decoder> Transform for DecodeTransform<D> {
    type Input = FrameSet;
    type Output = FrameInfo;

    fn transform(
        &mut self,
        input: FrameSet,
        outputs: &mut Vec<FrameInfo>,
    ) -> Result<(), PipelineError> {
        let color = input.color.ok_or_else(|| {
            PipelineError::Transform(format!("frame set {} has no color frame", input.index))
        })?;
        self.images.clear();
        if let Err(error) = self.decoder.decode(&color, &mut self.images) {
            PipelineMetrics::increment(&self.metrics.decode_failures);
            return Err(error.into());
        }
        let target = self.decoder.target_format();
        if let Some(image) = self.images.iter().find(|image| image.format != target) {
            PipelineMetrics::increment(&self.metrics.decode_failures);
            return Err(PipelineError::Transform(format!(
                "decoder produced {:?}, expected {target:?}",
                image.format
            )));
        }
        for image in self.images.drain(..) {
            outputs.push(FrameInfo {
                frame_index: input.index,
                decode_index: self.decode_index,
                image,
            });
            self.decode_index += 1;
            PipelineMetrics::increment(&self.metrics.decoded);
        }
        Ok(())
    }
}

/// Hands decoded images to a renderer and raises `stop_requested` once the
/// renderer is closed.
pub struct DisplayTransform<R> {
    renderer: R,
    metrics: Arc<PipelineMetrics>,
    stop_requested: CancelFlag,
}

impl<R: Renderer> DisplayTransform<R> {
    pub fn new(renderer: R, metrics: Arc<PipelineMetrics>, stop_requested: CancelFlag) -> Self {
        Self {
            renderer,
            metrics,
            stop_requested,
        }
    }

    fn check_open(&self) -> bool {
        let open = self.renderer.is_open();
        if !open && !self.stop_requested.is_cancelled() {
            log_info!("display: renderer closed, requesting stop");
            self.stop_requested.cancel();
        }
        open
    }
}

impl<R: Renderer> Transform for DisplayTransform<R> {
    type Input = FrameInfo;
    type Output = ();

    fn transform(&mut self, input: FrameInfo, _outputs: &mut Vec<()>) -> Result<(), PipelineError> {
        if !self.check_open() {
            return Ok(());
        }
        if let Err(error) = self.renderer.render(&input.image) {
            PipelineMetrics::increment(&self.metrics.render_failures);
            return Err(PipelineError::Video(error));
        }
        PipelineMetrics::increment(&self.metrics.displayed);
        log_debug!(
            "display: frame {} (decode {}) shown",
            input.frame_index,
            input.decode_index
        );
        self.check_open();
        Ok(())
    }
}
