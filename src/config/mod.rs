pub mod environment;
pub mod monitor;

pub use environment::{load_dotenv, Settings};
pub use monitor::{Config, ConfigError, STALENESS_WINDOW};
