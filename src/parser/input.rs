//! Reading plaintext input from a file or standard input.

use crate::error::{ConvertError, Result};
use std::io::Read;
use std::path::PathBuf;

/// Where the plaintext report comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Standard input, selected with `-`.
    Stdin,
    /// A named file.
    File(PathBuf),
}

impl InputSource {
    /// Interpret a command-line argument; `-` means standard input.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            InputSource::Stdin
        } else {
            InputSource::File(PathBuf::from(arg))
        }
    }

    /// Human-readable name for log and error messages.
    pub fn name(&self) -> String {
        match self {
            InputSource::Stdin => "<stdin>".to_string(),
            InputSource::File(path) => path.display().to_string(),
        }
    }

    /// Read the whole input into memory, failing on invalid UTF-8.
    pub fn read_to_string(&self) -> Result<String> {
        let bytes = match self {
            InputSource::Stdin => {
                let mut buf = Vec::new();
                std::io::stdin().lock().read_to_end(&mut buf)?;
                buf
            }
            InputSource::File(path) => {
                if !path.exists() {
                    return Err(ConvertError::InputNotFound { path: path.clone() });
                }
                std::fs::read(path)?
            }
        };

        String::from_utf8(bytes).map_err(|_| ConvertError::InvalidEncoding {
            source_name: self.name(),
        })
    }
}
