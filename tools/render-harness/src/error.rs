//! Harness error type.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Pixel(#[from] raster_fx::Error),
    #[error("invalid JSON: {0}")]
    Config(#[from] serde_json::Error),
    #[error("`{program}` exited with {status}")]
    Command { program: String, status: ExitStatus },
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("no act named `{0}`")]
    UnknownAct(String),
    #[error("nothing to render: no frames")]
    EmptyScene,
}

impl HarnessError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HarnessError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            HarnessError::UnknownAct("intro".into()).to_string(),
            "no act named `intro`"
        );
        let e = HarnessError::io(
            "out/x.png",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(e.to_string(), "I/O error on out/x.png: gone");
    }

    #[test]
    fn test_pixel_error_is_transparent() {
        let inner = raster_fx::Error::InvalidBufferLength {
            expected: 16,
            actual: 3,
        };
        let e: HarnessError = inner.into();
        assert_eq!(e.to_string(), "pixel data has 3 bytes, expected 16");
    }
}
