//! Errors.

use playground_math::SingularMatrixError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Camera transform cannot be inverted into a view matrix")]
    SingularCamera(#[source] SingularMatrixError),
    #[error("World matrix of object `{object}` has no normal matrix")]
    SingularWorld {
        object: String,
        #[source]
        source: SingularMatrixError,
    },
    #[error("No lab named `{0}` (expected 05, 06 or 07)")]
    UnknownLab(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use playground_math::scale;
    use std::error::Error as _;

    #[test]
    fn singular_world_error_names_object_and_keeps_source() {
        let source = match scale(0.0, 1.0, 1.0).inverted() {
            Err(error) => error,
            Ok(_) => panic!("zero scale should not invert"),
        };
        let error = SceneError::SingularWorld {
            object: "box".to_owned(),
            source,
        };
        assert!(error.to_string().contains("`box`"));
        assert!(error.source().is_some());
    }
}
