//! Capture → decode → display pipeline over bounded channels.
//!
//! The capture source pushes frame sets into the ingress channel through an
//! `IngressGate`. A decode stage turns them into `FrameInfo`s on the egress
//! channel, and a display stage hands those to a renderer. Shutdown stops the
//! source, sets the shared cancel flag, then closes both channels.

mod config;
pub use config::*;

mod error;
pub use error::*;

mod ingress;
pub use ingress::*;

mod metrics;
pub use metrics::*;

mod pipeline;
pub use pipeline::*;

mod stage;
pub use stage::*;

mod transforms;
pub use transforms::*;
