use {
    crate::*,
    base::*,
    channel::BoundedChannel,
    std::{
        sync::{Arc, mpsc},
        time::Duration,
    },
    video::{FrameSet, keyframe::KeyframeGate},
};

/// What happened to a frame set offered at the pipeline entrance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngressOutcome {
    Forwarded,
    /// Missing color, or missing depth when depth is required.
    Rejected,
    /// Compressed stream has not reached its first keyframe yet.
    WaitingForKeyframe,
    /// The ingress channel stayed full for the whole push timeout.
    Dropped,
    /// The pipeline is shutting down.
    Closed,
}

/// Entry point for capture callbacks. Runs on the capture thread, filters
/// frame sets and pushes the rest with a timeout of one frame interval
/// minus a margin, so the capture thread never stalls past its next frame.
pub struct IngressGate {
    channel: Arc<BoundedChannel<FrameSet>>,
    metrics: Arc<PipelineMetrics>,
    keyframes: KeyframeGate,
    require_depth: bool,
    config: PipelineConfig,
    push_timeout: Option<Duration>,
    frame_rate: Option<mpsc::Receiver<f32>>,
}

impl IngressGate {
    /// Gate for a source whose frame rate is already known.
    pub fn new(context: &PipelineContext, frame_rate: f32) -> Self {
        let mut gate = Self::gate(context, None);
        gate.resolve(frame_rate);
        gate
    }

    /// Gate for a source that only knows its frame rate once it is
    /// streaming. The first `offer` waits for the rate to be sent; if the
    /// sender is dropped instead, pushes never wait.
    pub fn with_pending_rate(context: &PipelineContext) -> (Self, mpsc::SyncSender<f32>) {
        let (sender, receiver) = mpsc::sync_channel(1);
        (Self::gate(context, Some(receiver)), sender)
    }

    fn gate(context: &PipelineContext, frame_rate: Option<mpsc::Receiver<f32>>) -> Self {
        Self {
            channel: Arc::clone(&context.ingress),
            metrics: Arc::clone(&context.metrics),
            keyframes: KeyframeGate::new(context.config.wait_for_keyframe),
            require_depth: context.config.require_depth,
            config: context.config.clone(),
            push_timeout: None,
            frame_rate,
        }
    }

    fn resolve(&mut self, frame_rate: f32) -> Duration {
        let push_timeout = self.config.push_timeout(frame_rate);
        if push_timeout.is_zero() {
            log_warn!(
                "ingress: frame rate {:.1} leaves no push timeout, full channel drops at once",
                frame_rate
            );
        }
        self.push_timeout = Some(push_timeout);
        self.frame_rate = None;
        push_timeout
    }

    /// The push timeout, or `None` while the frame rate is still pending.
    pub fn push_timeout(&self) -> Option<Duration> {
        self.push_timeout
    }

    fn current_push_timeout(&mut self) -> Duration {
        if let Some(push_timeout) = self.push_timeout {
            return push_timeout;
        }
        let frame_rate = match self.frame_rate.as_ref().map(mpsc::Receiver::recv) {
            Some(Ok(frame_rate)) => frame_rate,
            _ => 0.0,
        };
        self.resolve(frame_rate)
    }

    pub fn offer(&mut self, frame_set: FrameSet) -> IngressOutcome {
        PipelineMetrics::increment(&self.metrics.captured);
        let push_timeout = self.current_push_timeout();

        if !frame_set.is_complete(self.require_depth) {
            PipelineMetrics::increment(&self.metrics.rejected);
            log_debug!("ingress: frame set {} incomplete, rejected", frame_set.index);
            return IngressOutcome::Rejected;
        }

        if let Some(color) = frame_set.color.as_ref() {
            if !self.keyframes.admit(color.format, &color.data) {
                PipelineMetrics::increment(&self.metrics.waiting_for_keyframe);
                return IngressOutcome::WaitingForKeyframe;
            }
        }

        let index = frame_set.index;
        match self.channel.push_wait_for(frame_set, push_timeout) {
            Ok(()) => {
                PipelineMetrics::increment(&self.metrics.forwarded);
                IngressOutcome::Forwarded
            }
            Err(error) if error.is_closed() => IngressOutcome::Closed,
            Err(_) => {
                PipelineMetrics::increment(&self.metrics.dropped_at_ingress);
                log_debug!("ingress: frame set {} dropped, decoder is behind", index);
                IngressOutcome::Dropped
            }
        }
    }
}
