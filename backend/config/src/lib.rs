//! MindGauge configuration: schema, defaults, file I/O, and validation.

pub mod defaults;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use io::{config_dir, config_file_path, load_config, write_config};
pub use schema::MindGaugeConfig;
pub use validation::{validate, ValidationReport};
