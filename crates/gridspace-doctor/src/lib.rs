#![forbid(unsafe_code)]

pub mod analyze;
pub mod cli;
pub mod error;
pub mod layout;
pub mod separate;
pub mod util;

pub use cli::run_from_env;
pub use error::{DoctorError, Result};
