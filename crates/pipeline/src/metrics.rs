use {
    crate::*,
    base::*,
    std::{
        sync::atomic::{AtomicU64, Ordering},
        time::Duration,
    },
};

/// Frame counters shared by the ingress gate and both stages.
#[derive(Debug, Default)]
pub struct PipelineMetrics {
    /// Frame sets delivered by the capture source.
    pub captured: AtomicU64,
    /// Frame sets pushed into the ingress channel.
    pub forwarded: AtomicU64,
    /// Frame sets discarded as incomplete.
    pub rejected: AtomicU64,
    /// Frame sets held back until the first keyframe.
    pub waiting_for_keyframe: AtomicU64,
    /// Frame sets dropped because the ingress channel stayed full.
    pub dropped_at_ingress: AtomicU64,
    /// Images produced by the decoder.
    pub decoded: AtomicU64,
    pub decode_failures: AtomicU64,
    /// Images handed to the renderer successfully.
    pub displayed: AtomicU64,
    pub render_failures: AtomicU64,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn increment(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
        MetricsSnapshot {
            captured: load(&self.captured),
            forwarded: load(&self.forwarded),
            rejected: load(&self.rejected),
            waiting_for_keyframe: load(&self.waiting_for_keyframe),
            dropped_at_ingress: load(&self.dropped_at_ingress),
            decoded: load(&self.decoded),
            decode_failures: load(&self.decode_failures),
            displayed: load(&self.displayed),
            render_failures: load(&self.render_failures),
        }
    }
}

/// Point-in-time copy of `PipelineMetrics`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub captured: u64,
    pub forwarded: u64,
    pub rejected: u64,
    pub waiting_for_keyframe: u64,
    pub dropped_at_ingress: u64,
    pub decoded: u64,
    pub decode_failures: u64,
    pub displayed: u64,
    pub render_failures: u64,
}

/// Final account of a pipeline run, returned by `Pipeline::shutdown`.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub metrics: MetricsSnapshot,
    pub stages: Vec<StageReport>,
    pub elapsed: Duration,
}

impl PipelineReport {
    /// Displayed frames per second over the whole run.
    pub fn display_rate(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds > 0.0 {
            self.metrics.displayed as f64 / seconds
        } else {
            0.0
        }
    }

    pub fn stage(&self, name: &str) -> Option<&StageReport> {
        self.stages.iter().find(|stage| stage.name == name)
    }

    pub fn log(&self) {
        let m = &self.metrics;
        log_info!(
            "pipeline: captured={} forwarded={} rejected={} waiting_for_keyframe={} dropped_at_ingress={}",
            m.captured,
            m.forwarded,
            m.rejected,
            m.waiting_for_keyframe,
            m.dropped_at_ingress
        );
        log_info!(
            "pipeline: decoded={} decode_failures={} displayed={} render_failures={} ({:.1} fps over {:.2}s)",
            m.decoded,
            m.decode_failures,
            m.displayed,
            m.render_failures,
            self.display_rate(),
            self.elapsed.as_secs_f64()
        );
        for stage in &self.stages {
            log_info!(
                "stage {}: processed={} failed={} emitted={} dropped={}",
                stage.name,
                stage.processed,
                stage.failed,
                stage.emitted,
                stage.dropped
            );
        }
    }
}
