//! Reel construction, stop-offset math, pointer reconciliation and the spin
//! state machine. Everything here is platform-free; rendering, persistence and
//! the host channel are reached through traits.

pub mod builder;
pub mod controller;
pub mod error;
pub mod gate;
pub mod offset;
pub mod outcome;
pub mod pointer;

pub use builder::{ReelBuilder, ReelLayout};
pub use controller::{
    ControllerConfig, HostChannel, ReelSurface, SpinController, SpinReport, SpinSession, SpinState,
};
pub use error::ReelError;
pub use gate::{AttemptGate, SpinGuard};
pub use offset::CellMetrics;
pub use outcome::{
    AttemptStore, LocalFallbackOutcomeSource, LocalRecord, MemoryStore, OutcomeMode,
    OutcomeSource, SessionStatus, SpinOutcome,
};
pub use pointer::{Landing, PointerResolver, Rect, RenderedCell};
