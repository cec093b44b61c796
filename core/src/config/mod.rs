pub mod load;
pub mod types;

pub use load::{get_taskmon_data_dir, load_default, load_from};
pub use types::{AppConfig, LoggingConfig, TuiConfig, VisualConfig};
