use {
    crate::*,
    base::*,
    channel::BoundedChannel,
    std::{
        sync::Arc,
        thread,
        time::{Duration, Instant},
    },
    video::{CaptureSource, Decoder, FrameSet, Renderer, VideoError},
};

const DEFAULT_WAIT_POLL_MS: u64 = 40;

/// Everything the stages of one pipeline share. Owned by the `Pipeline`;
/// stages and the ingress gate hold `Arc` clones.
pub struct PipelineContext {
    pub config: PipelineConfig,
    pub ingress: Arc<BoundedChannel<FrameSet>>,
    pub egress: Arc<BoundedChannel<FrameInfo>>,
    /// Tells stage loops to leave; set once at shutdown.
    pub cancel: CancelFlag,
    /// Raised by the display stage when its renderer closes.
    pub stop_requested: CancelFlag,
    pub metrics: Arc<PipelineMetrics>,
}

impl PipelineContext {
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            ingress: Arc::new(BoundedChannel::new(config.ingress_capacity)?),
            egress: Arc::new(BoundedChannel::new(config.egress_capacity)?),
            cancel: CancelFlag::new(),
            stop_requested: CancelFlag::new(),
            metrics: Arc::new(PipelineMetrics::new()),
            config,
        })
    }

    fn stage_config(&self, name: &str) -> StageConfig {
        StageConfig {
            name: name.to_string(),
            poll_timeout: self.config.poll_timeout,
            egress_policy: PushPolicy::Blocking,
            drain_on_stop: self.config.drain_on_stop,
        }
    }

    /// Set the cancel flag, then close both channels so no stage stays
    /// blocked on a push or pop.
    pub fn cancel_and_close(&self) {
        self.cancel.cancel();
        self.ingress.close();
        self.egress.close();
    }
}

/// A running capture → decode → display pipeline.
pub struct Pipeline {
    context: PipelineContext,
    source: Option<Box<dyn CaptureSource>>,
    decode: Option<StageHandle>,
    display: Option<StageHandle>,
    started: Instant,
    stopped: bool,
}

impl Pipeline {
    /// Spawn the decode and display stages and start `source`.
    ///
    /// `decoder` is moved to the decode thread. `renderer_factory` runs on
    /// the display thread, where the renderer lives for the whole run.
    /// On error everything already started is torn down again.
    pub fn start<S, D, F, R>(
        config: PipelineConfig,
        source: S,
        decoder: D,
        renderer_factory: F,
    ) -> Result<Self, PipelineError>
    where
        S: CaptureSource + 'static,
        D: Decoder + 'static,
        F: FnOnce() -> Result<R, VideoError> + Send + 'static,
        R: Renderer + 'static,
    {
        let context = PipelineContext::new(config)?;
        let mut pipeline = Self {
            context,
            source: None,
            decode: None,
            display: None,
            started: Instant::now(),
            stopped: false,
        };

        let context = &pipeline.context;
        pipeline.decode = Some(Stage::spawn(
            context.stage_config("decode"),
            Arc::clone(&context.ingress),
            Some(Arc::clone(&context.egress)),
            context.cancel.clone(),
            DecodeTransform::new(decoder, Arc::clone(&context.metrics)),
        )?);

        let metrics = Arc::clone(&context.metrics);
        let stop_requested = context.stop_requested.clone();
        pipeline.display = Some(Stage::spawn_with(
            context.stage_config("display"),
            Arc::clone(&context.egress),
            None,
            context.cancel.clone(),
            move || {
                let renderer = renderer_factory()?;
                Ok(DisplayTransform::new(renderer, metrics, stop_requested))
            },
        )?);

        // the rate is only reliable once the source is streaming
        let mut source: Box<dyn CaptureSource> = Box::new(source);
        let (mut gate, rate) = IngressGate::with_pending_rate(&pipeline.context);
        source.start(Box::new(move |frame_set| {
            gate.offer(frame_set);
        }))?;
        let frame_rate = source.frame_rate();
        log_info!(
            "pipeline: source started at {:.1} fps, ingress push timeout {:?}",
            frame_rate,
            pipeline.context.config.push_timeout(frame_rate)
        );
        // the gate is the only receiver, gone only if the source dropped it
        let _ = rate.send(frame_rate);
        pipeline.source = Some(source);
        pipeline.started = Instant::now();
        Ok(pipeline)
    }

    pub fn context(&self) -> &PipelineContext {
        &self.context
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.context.metrics.snapshot()
    }

    /// True once the renderer has closed or a stage has exited on its own.
    pub fn stop_requested(&self) -> bool {
        self.context.stop_requested.is_cancelled()
            || [&self.decode, &self.display]
                .into_iter()
                .flatten()
                .any(StageHandle::is_finished)
    }

    /// Block until `predicate` holds for the current metrics or a stop was
    /// requested, checking every `poll`. Returns whether the predicate held.
    pub fn wait_until<P>(&self, predicate: P, poll: Duration) -> bool
    where
        P: Fn(&MetricsSnapshot) -> bool,
    {
        let poll = if poll.is_zero() {
            Duration::from_millis(DEFAULT_WAIT_POLL_MS)
        } else {
            poll
        };
        loop {
            if predicate(&self.metrics()) {
                return true;
            }
            if self.stop_requested() {
                return false;
            }
            thread::sleep(poll);
        }
    }

    /// Stop the source, give in-flight frames the grace period, then close
    /// the channels and join the stages.
    ///
    /// With `drain_on_stop` the channels close in pipeline order: ingress
    /// first, egress once the decode stage has drained into it, so every
    /// buffered frame set is decoded and displayed. Otherwise both close at
    /// once together with the cancel flag.
    pub fn shutdown(mut self) -> PipelineReport {
        self.stop()
    }

    fn stop(&mut self) -> PipelineReport {
        self.stopped = true;
        if let Some(mut source) = self.source.take() {
            log_info!("pipeline: stopping source");
            source.stop();
            thread::sleep(self.context.config.grace_period);
        }

        let mut stages = Vec::new();
        let mut join = |handle: Option<StageHandle>| {
            if let Some(handle) = handle {
                match handle.join() {
                    Ok(report) => stages.push(report),
                    Err(error) => log_error!("pipeline: {}", error),
                }
            }
        };
        if self.context.config.drain_on_stop {
            self.context.ingress.close();
            // nobody left to drain egress into
            if self.display.as_ref().is_some_and(StageHandle::is_finished) {
                self.context.egress.close();
            }
            join(self.decode.take());
            self.context.egress.close();
            join(self.display.take());
            self.context.cancel.cancel();
        } else {
            self.context.cancel_and_close();
            join(self.decode.take());
            join(self.display.take());
        }

        let report = PipelineReport {
            metrics: self.context.metrics.snapshot(),
            stages,
            elapsed: self.started.elapsed(),
        };
        report.log();
        report
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        if !self.stopped {
            self.stop();
        }
    }
}
