pub mod executor;
pub mod interface;
pub mod types;

pub use executor::*;
pub use interface::Probe;
pub use types::*;
