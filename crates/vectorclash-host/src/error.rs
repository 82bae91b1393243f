/// Errors from loading host configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: String,
        source: std::io::Error,
    },
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "Failed to read {path}: {source}"),
            Self::Parse { path, source } => write!(f, "Failed to parse {path}: {source}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Errors that end a match session early.
#[derive(Debug)]
pub enum SessionError {
    /// A snapshot frame could not be encoded.
    Encode(rmp_serde::encode::Error),
    /// The broadcast receiver was dropped.
    ChannelClosed,
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(e) => write!(f, "snapshot encode error: {e}"),
            Self::ChannelClosed => write!(f, "broadcast channel closed"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Encode(e) => Some(e),
            Self::ChannelClosed => None,
        }
    }
}

impl From<rmp_serde::encode::Error> for SessionError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        Self::Encode(e)
    }
}
