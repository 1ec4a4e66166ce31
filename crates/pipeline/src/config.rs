use {crate::*, std::time::Duration};

const DEFAULT_INGRESS_CAPACITY: usize = 8;
const DEFAULT_EGRESS_CAPACITY: usize = 4;
const DEFAULT_POLL_TIMEOUT_MS: u64 = 5;
const DEFAULT_PUSH_MARGIN_MS: u64 = 5;
const DEFAULT_GRACE_PERIOD_MS: u64 = 500;

/// Smallest capacity a channel accepts.
pub const MIN_CHANNEL_CAPACITY: usize = 2;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Slots in the capture → decode channel.
    pub ingress_capacity: usize,
    /// Slots in the decode → display channel.
    pub egress_capacity: usize,
    /// How long a stage waits for input before re-checking the cancel flag.
    pub poll_timeout: Duration,
    /// Subtracted from the frame interval to get the ingress push timeout.
    pub push_margin: Duration,
    /// Time given to in-flight frames after the source stops.
    pub grace_period: Duration,
    /// Reject frame sets without a depth plane.
    pub require_depth: bool,
    /// Hold back H.264/H.265 streams until their first keyframe.
    pub wait_for_keyframe: bool,
    /// Decode and display every buffered frame set at shutdown instead of
    /// discarding it.
    pub drain_on_stop: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ingress_capacity: DEFAULT_INGRESS_CAPACITY,
            egress_capacity: DEFAULT_EGRESS_CAPACITY,
            poll_timeout: Duration::from_millis(DEFAULT_POLL_TIMEOUT_MS),
            push_margin: Duration::from_millis(DEFAULT_PUSH_MARGIN_MS),
            grace_period: Duration::from_millis(DEFAULT_GRACE_PERIOD_MS),
            require_depth: false,
            wait_for_keyframe: true,
            drain_on_stop: false,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        for (name, capacity) in [
            ("ingress_capacity", self.ingress_capacity),
            ("egress_capacity", self.egress_capacity),
        ] {
            if capacity < MIN_CHANNEL_CAPACITY {
                return Err(PipelineError::Config(format!(
                    "{name} must be at least {MIN_CHANNEL_CAPACITY}, got {capacity}"
                )));
            }
        }
        if self.poll_timeout.is_zero() {
            return Err(PipelineError::Config("poll_timeout must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Ingress push timeout for a source running at `frame_rate`.
    pub fn push_timeout(&self, frame_rate: f32) -> Duration {
        if frame_rate.is_nan() || frame_rate <= 0.0 {
            return Duration::ZERO;
        }
        let interval = Duration::from_nanos((1e9 / frame_rate as f64).round() as u64);
        interval.saturating_sub(self.push_margin)
    }
}
