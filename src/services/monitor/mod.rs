pub mod engine;
pub mod state;
pub mod tracker;

pub use engine::{LoopExit, LoopState, MonitorEngine};
pub use state::MonitorState;
pub use tracker::{Decision, FailureTracker};
