use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::progress::Stage;

/// Machine-readable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InputNotFound,
    InputUnreadable,
    MalformedEdgeList,
    ConfigParseError,
    EmptyGraph,
    OutputWriteFailed,
    PlotRenderFailed,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InputNotFound => "E1001",
            Self::InputUnreadable => "E1002",
            Self::MalformedEdgeList => "E1003",
            Self::ConfigParseError => "E1004",
            Self::EmptyGraph => "E2001",
            Self::OutputWriteFailed => "E5001",
            Self::PlotRenderFailed => "E5002",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InputNotFound => "Edge list not found",
            Self::InputUnreadable => "Edge list could not be read",
            Self::MalformedEdgeList => "Malformed edge list",
            Self::ConfigParseError => "Config file parse error",
            Self::EmptyGraph => "Graph has no nodes",
            Self::OutputWriteFailed => "Result file write failed",
            Self::PlotRenderFailed => "Histogram render failed",
        }
    }

    /// Optional remediation hint for operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InputNotFound => Some("Check the input path or set `input` in netcentra.toml."),
            Self::InputUnreadable => Some("Check file permissions and encoding (UTF-8)."),
            Self::MalformedEdgeList => {
                Some("Each line must be `node node` or `node node weight`; use `#` for comments.")
            }
            Self::ConfigParseError => Some("Fix the TOML syntax in the config file and retry."),
            Self::EmptyGraph => {
                Some("Set `empty_graph = \"degenerate\"` to write degenerate outputs instead.")
            }
            Self::OutputWriteFailed => Some("Check disk space and write permissions."),
            Self::PlotRenderFailed => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ---------------------------------------------------------------------------
// Load errors
// ---------------------------------------------------------------------------

/// Errors raised while reading an edge-list file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The input file does not exist.
    #[error("edge list {} does not exist", path.display())]
    NotFound { path: PathBuf },

    /// The input file exists but could not be read.
    #[error("failed to read edge list {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A line did not match `node node [weight]`.
    #[error("{}:{line}: {reason} (line: {content:?})", path.display())]
    Malformed {
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        content: String,
        reason: String,
    },
}

impl LoadError {
    /// Stable error code for this failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::InputNotFound,
            Self::Read { .. } => ErrorCode::InputUnreadable,
            Self::Malformed { .. } => ErrorCode::MalformedEdgeList,
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline errors
// ---------------------------------------------------------------------------

/// Any failure that aborts an analysis run.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The cleaned graph has no nodes and the run is configured to reject it.
    #[error("graph loaded from {} has no nodes", path.display())]
    EmptyGraph { path: PathBuf },

    /// Creating a directory or writing a file failed.
    #[error("{stage} stage failed writing {}: {source}", path.display())]
    Io {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The plotting backend failed to render an image.
    #[error("failed to render {}: {message}", path.display())]
    Plot { path: PathBuf, message: String },

    /// A configuration file could not be read or parsed.
    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl AnalysisError {
    /// Stable error code for this failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Load(err) => err.code(),
            Self::EmptyGraph { .. } => ErrorCode::EmptyGraph,
            Self::Io { .. } => ErrorCode::OutputWriteFailed,
            Self::Plot { .. } => ErrorCode::PlotRenderFailed,
            Self::Config { .. } => ErrorCode::ConfigParseError,
        }
    }

    pub(crate) fn io(stage: Stage, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            stage,
            path: path.into(),
            source,
        }
    }
}
