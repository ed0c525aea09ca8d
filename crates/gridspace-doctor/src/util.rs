use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::error::{DoctorError, Result};

/// Install the stderr subscriber. `RUST_LOG` wins; otherwise only warnings
/// and errors are shown. Safe to call more than once.
pub fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if installed.is_err() {
        tracing::debug!(target: "gridspace.doctor", "subscriber already installed");
    }
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

pub fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(DoctorError::MissingLayout {
            path: path.to_path_buf(),
        })
    }
}

pub fn write_string(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", to_pretty_json(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ensure_exists, write_string};
    use crate::error::DoctorError;

    #[test]
    fn write_string_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("out.json");
        write_string(&path, "{}").expect("write");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "{}");
    }

    #[test]
    fn missing_path_is_reported_with_its_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.json");
        match ensure_exists(&path).expect_err("missing") {
            DoctorError::MissingLayout { path: reported } => assert_eq!(reported, path),
            other => panic!("expected MissingLayout, got {other}"),
        }
    }
}
