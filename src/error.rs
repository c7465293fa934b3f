//! Crate-level error types.

use std::fmt;

use crate::flow::SegmentId;

/// Errors produced by the fadec-vis crate.
#[derive(Debug)]
pub enum FlowError {
    /// A named component is absent from the scene.
    MissingObject(String),
    /// A flow sequence needs liquid meshes that were never built.
    IncompleteMeshSet(Vec<SegmentId>),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Component layout parsing failure.
    LayoutParse(String),
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingObject(name) => {
                write!(f, "component not found: {name}")
            }
            Self::IncompleteMeshSet(missing) => {
                write!(f, "liquid meshes not built:")?;
                for id in missing {
                    write!(f, " {id}")?;
                }
                Ok(())
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::LayoutParse(msg) => write!(f, "layout parse error: {msg}"),
        }
    }
}

impl std::error::Error for FlowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FlowError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{Part, Pipe};

    #[test]
    fn incomplete_mesh_set_lists_segments() {
        let err = FlowError::IncompleteMeshSet(vec![
            SegmentId::new(Pipe::Left, Part::Horizontal),
            SegmentId::new(Pipe::Mid, Part::Vertical),
        ]);
        assert_eq!(
            err.to_string(),
            "liquid meshes not built: Left_pipe/horizontal Mid_Pipe/vertical"
        );
    }

    #[test]
    fn io_error_is_source() {
        use std::error::Error;
        let err: FlowError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.source().is_some());
        assert!(FlowError::MissingObject("Vent".into()).source().is_none());
    }
}
