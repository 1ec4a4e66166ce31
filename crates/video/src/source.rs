use crate::*;

/// Called on the source's own thread for every frame set it produces.
pub type FrameCallback = Box<dyn FnMut(FrameSet) + Send + 'static>;

pub trait CaptureSource: Send {
    /// Start delivering frame sets to `callback`. Returns once the device is
    /// streaming; delivery continues on a thread owned by the source.
    fn start(&mut self, callback: FrameCallback) -> Result<(), VideoError>;

    /// Stop delivery and join the delivery thread. No callback runs after
    /// this returns. Safe to call more than once.
    fn stop(&mut self);

    /// Nominal frames per second of the running stream. Only meaningful
    /// once `start` has returned.
    fn frame_rate(&self) -> f32;
}
