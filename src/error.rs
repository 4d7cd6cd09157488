//! Crate-level error types.

use std::fmt;

/// Errors produced while synchronizing color legends with the scene.
///
/// None of these cross the event-handling boundary of
/// [`LegendSync`](crate::sync::LegendSync): handlers log them and degrade
/// (hide the overlay, keep the previous layout, or skip the entry).
#[derive(Debug)]
pub enum LegendError {
    /// No render window is available to host the legend layer.
    MissingRenderer,
    /// The descriptor does not reference a displayable node that resolves.
    MissingDisplayableNode,
    /// Neither an explicit nor a fallback primary display node was found.
    MissingPrimaryDisplayNode,
    /// The primary display node has no color node set.
    MissingColorNode,
    /// The color node does not provide a lookup table.
    MissingLookupTable,
    /// Orientation code outside of the known set.
    UnknownOrientation(i32),
    /// A handler received a node ID that is empty or does not resolve.
    InvalidNode(String),
    /// A handler ran without a scene attached.
    NoScene,
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for LegendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRenderer => write!(f, "render window is invalid"),
            Self::MissingDisplayableNode => {
                write!(f, "no displayable node referenced by color legend")
            }
            Self::MissingPrimaryDisplayNode => {
                write!(f, "no primary display node found")
            }
            Self::MissingColorNode => {
                write!(f, "no color node is set in primary display node")
            }
            Self::MissingLookupTable => {
                write!(f, "color node has no lookup table")
            }
            Self::UnknownOrientation(code) => {
                write!(f, "unknown orientation type {code}")
            }
            Self::InvalidNode(id) => write!(f, "invalid input node '{id}'"),
            Self::NoScene => write!(f, "invalid scene"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for LegendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LegendError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_orientation_code() {
        let e = LegendError::UnknownOrientation(7);
        assert_eq!(e.to_string(), "unknown orientation type 7");
    }

    #[test]
    fn io_error_exposes_source() {
        let e = LegendError::from(std::io::Error::other("disk"));
        assert!(std::error::Error::source(&e).is_some());
        assert!(std::error::Error::source(&LegendError::NoScene).is_none());
    }
}
