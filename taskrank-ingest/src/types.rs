use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchFormat {
    Json,
    Csv,
}

impl BatchFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(BatchFormat::Json),
            "csv" => Some(BatchFormat::Csv),
            _ => None,
        }
    }
}

impl FromStr for BatchFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(BatchFormat::Json),
            "csv" => Ok(BatchFormat::Csv),
            other => Err(format!("unknown format '{other}' (expected json or csv)")),
        }
    }
}

/// Where a batch is read from. `-` on the command line means stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchSource {
    Stdin,
    Path(PathBuf),
}

impl BatchSource {
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            BatchSource::Stdin
        } else {
            BatchSource::Path(PathBuf::from(arg))
        }
    }

    pub fn detect_format(&self) -> BatchFormat {
        match self {
            BatchSource::Stdin => BatchFormat::Json,
            BatchSource::Path(p) => BatchFormat::from_path(p).unwrap_or(BatchFormat::Json),
        }
    }
}

impl fmt::Display for BatchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchSource::Stdin => write!(f, "<stdin>"),
            BatchSource::Path(p) => write!(f, "{}", p.display()),
        }
    }
}
