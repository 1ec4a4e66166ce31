use {
    crate::*,
    base::*,
    channel::{BoundedChannel, ChannelStatus},
    std::{
        sync::{
            Arc,
            atomic::{AtomicU8, Ordering},
            mpsc,
        },
        thread::{self, JoinHandle},
        time::Duration,
    },
};

const DEFAULT_POLL_TIMEOUT_MS: u64 = 5;

/// Per-item work done by a stage.
///
/// A transform is built and driven on its stage thread, so it only has to be
/// `Send` when it is constructed elsewhere and moved in (see `Stage::spawn`).
pub trait Transform {
    type Input: Send + 'static;
    type Output: Send + 'static;

    /// Consume one input and append any outputs. On error the input and
    /// any outputs appended so far are dropped and the stage carries on.
    fn transform(
        &mut self,
        input: Self::Input,
        outputs: &mut Vec<Self::Output>,
    ) -> Result<(), PipelineError>;
}

/// How a stage hands its outputs downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushPolicy {
    /// Wait for room; backpressure reaches the stage's own input.
    Blocking,
    /// Wait at most this long, then drop the output and count it.
    DropAfter(Duration),
}

#[derive(Debug, Clone)]
pub struct StageConfig {
    pub name: String,
    pub poll_timeout: Duration,
    pub egress_policy: PushPolicy,
    pub drain_on_stop: bool,
}

impl StageConfig {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            poll_timeout: Duration::from_millis(DEFAULT_POLL_TIMEOUT_MS),
            egress_policy: PushPolicy::Blocking,
            drain_on_stop: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StageState {
    Idle,
    WaitingForInput,
    Processing,
    Draining,
    Stopped,
}

impl StageState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => StageState::Idle,
            1 => StageState::WaitingForInput,
            2 => StageState::Processing,
            3 => StageState::Draining,
            _ => StageState::Stopped,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReport {
    pub name: String,
    /// Inputs transformed successfully.
    pub processed: u64,
    /// Inputs whose transform failed.
    pub failed: u64,
    /// Outputs pushed downstream (or consumed, for a sink).
    pub emitted: u64,
    /// Outputs dropped on push timeout or because the egress channel closed.
    pub dropped: u64,
}

/// Handle to a running stage thread.
pub struct StageHandle {
    name: String,
    state: Arc<AtomicU8>,
    join_handle: JoinHandle<StageReport>,
}

impl StageHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> StageState {
        StageState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_finished(&self) -> bool {
        self.join_handle.is_finished()
    }

    /// Wait for the stage thread to exit. The stage only exits once its
    /// cancel flag is set or one of its channels is closed.
    pub fn join(self) -> Result<StageReport, PipelineError> {
        self.join_handle
            .join()
            .map_err(|_| PipelineError::Thread(format!("stage {} panicked", self.name)))
    }
}

enum Flow {
    Continue,
    Stop,
}

struct Worker<I, O> {
    config: StageConfig,
    ingress: Arc<BoundedChannel<I>>,
    egress: Option<Arc<BoundedChannel<O>>>,
    cancel: CancelFlag,
    state: Arc<AtomicU8>,
    report: StageReport,
}

impl<I, O> Worker<I, O> {
    fn set_state(&self, state: StageState) {
        self.state.store(state as u8, Ordering::Release);
    }

    fn run<X: Transform<Input = I, Output = O>>(mut self, mut transform: X) -> StageReport {
        let name = self.config.name.clone();
        log_info!("stage {}: started", name);
        let mut outputs = Vec::new();
        loop {
            self.set_state(StageState::WaitingForInput);
            if self.cancel.is_cancelled() {
                break;
            }
            match self.ingress.pop_wait_for(self.config.poll_timeout) {
                Ok(input) => {
                    self.set_state(StageState::Processing);
                    if let Flow::Stop = self.process(&mut transform, input, &mut outputs) {
                        break;
                    }
                }
                Err(ChannelStatus::Timeout) => continue,
                Err(_) => break,
            }
        }

        if self.config.drain_on_stop {
            self.set_state(StageState::Draining);
            while let Ok(input) = self.ingress.try_pop() {
                if let Flow::Stop = self.process(&mut transform, input, &mut outputs) {
                    break;
                }
            }
        }

        self.set_state(StageState::Stopped);
        log_info!(
            "stage {}: stopped (processed={} failed={} emitted={} dropped={})",
            name,
            self.report.processed,
            self.report.failed,
            self.report.emitted,
            self.report.dropped
        );
        self.report
    }

    fn process<X: Transform<Input = I, Output = O>>(
        &mut self,
        transform: &mut X,
        input: I,
        outputs: &mut Vec<O>,
    ) -> Flow {
        outputs.clear();
        if let Err(error) = transform.transform(input, outputs) {
            self.report.failed += 1;
            outputs.clear();
            log_warn!("stage {}: {}", self.config.name, error);
            return Flow::Continue;
        }
        self.report.processed += 1;

        let Some(egress) = self.egress.as_ref() else {
            self.report.emitted += outputs.len() as u64;
            outputs.clear();
            return Flow::Continue;
        };
        let mut pending = outputs.drain(..);
        while let Some(output) = pending.next() {
            let result = match self.config.egress_policy {
                PushPolicy::Blocking => egress.push(output),
                PushPolicy::DropAfter(timeout) => egress.push_wait_for(output, timeout),
            };
            match result {
                Ok(()) => self.report.emitted += 1,
                Err(error) if error.is_closed() => {
                    self.report.dropped += 1 + pending.len() as u64;
                    log_debug!("stage {}: egress closed", self.config.name);
                    return Flow::Stop;
                }
                Err(_) => {
                    self.report.dropped += 1;
                    log_debug!("stage {}: output dropped after push timeout", self.config.name);
                }
            }
        }
        Flow::Continue
    }
}

/// Starts stage threads.
pub struct Stage;

impl Stage {
    /// Move `transform` onto a new stage thread.
    pub fn spawn<X>(
        config: StageConfig,
        ingress: Arc<BoundedChannel<X::Input>>,
        egress: Option<Arc<BoundedChannel<X::Output>>>,
        cancel: CancelFlag,
        transform: X,
    ) -> Result<StageHandle, PipelineError>
    where
        X: Transform + Send + 'static,
    {
        Self::spawn_with(config, ingress, egress, cancel, move || Ok(transform))
    }

    /// Build the transform on the new stage thread, for transforms that
    /// hold thread-affine resources. Returns once `build` has run; its error
    /// is returned here and no thread is left behind.
    pub fn spawn_with<X, F>(
        config: StageConfig,
        ingress: Arc<BoundedChannel<X::Input>>,
        egress: Option<Arc<BoundedChannel<X::Output>>>,
        cancel: CancelFlag,
        build: F,
    ) -> Result<StageHandle, PipelineError>
    where
        X: Transform + 'static,
        F: FnOnce() -> Result<X, PipelineError> + Send + 'static,
    {
        if config.poll_timeout.is_zero() {
            return Err(PipelineError::Config(format!(
                "stage {}: poll_timeout must be non-zero",
                config.name
            )));
        }
        let name = config.name.clone();
        let state = Arc::new(AtomicU8::new(StageState::Idle as u8));
        let worker = Worker {
            report: StageReport {
                name: name.clone(),
                ..Default::default()
            },
            config,
            ingress,
            egress,
            cancel,
            state: Arc::clone(&state),
        };

        let (init_tx, init_rx) = mpsc::sync_channel::<Result<(), PipelineError>>(1);
        let join_handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || match build() {
                Ok(transform) => {
                    let _ = init_tx.send(Ok(()));
                    worker.run(transform)
                }
                Err(error) => {
                    let _ = init_tx.send(Err(error));
                    worker.set_state(StageState::Stopped);
                    worker.report
                }
            })
            .map_err(|e| PipelineError::Thread(format!("failed to spawn stage {name}: {e}")))?;

        let init = init_rx
            .recv()
            .map_err(|_| PipelineError::Thread(format!("stage {name} died during init")))
            .and_then(|result| result);
        match init {
            Ok(()) => Ok(StageHandle {
                name,
                state,
                join_handle,
            }),
            Err(error) => {
                let _ = join_handle.join();
                Err(error)
            }
        }
    }
}
