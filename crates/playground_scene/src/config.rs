//! Scene configuration.
//!
//! A scene is described in RON as a list of named objects, each placed by a
//! sequence of elementary transforms, with an optional camera and projection:
//!
//! ```ron
//! (
//!     objects: [
//!         (
//!             name: "box",
//!             transforms: [
//!                 Scale((x: 2.0, y: 1.0, z: 1.0)),
//!                 RotationZ(0.5),
//!                 Translation((x: 0.0, y: 3.0, z: 0.0)),
//!             ],
//!             normal_matrix: true,
//!         ),
//!     ],
//!     camera: Some((transforms: [Translation((x: 0.0, y: 0.0, z: -20.0))])),
//!     projection: Some((
//!         vertical_field_of_view: 0.5236,
//!         aspect_ratio: 2.0,
//!         near_distance: 1.0,
//!         far_distance: 1000.0,
//!     )),
//! )
//! ```

use crate::{error::SceneError, io, uniform::UniformSink};
use anyhow::Context;
use playground_math::{Matrix3, Matrix4, PerspectiveProjection, TransformSpec};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Description of the objects, camera and projection of a scene.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub objects: Vec<ObjectConfig>,
    #[serde(default)]
    pub camera: Option<CameraConfig>,
    #[serde(default)]
    pub projection: Option<PerspectiveProjection>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectConfig {
    pub name: String,
    /// Transforms from the object's local space to world space, in the order
    /// they are applied.
    pub transforms: TransformSpec,
    /// Whether to compute the normal matrix used for lighting.
    #[serde(default)]
    pub normal_matrix: bool,
}

/// Placement of the camera in the world. The view matrix is the inverse of
/// the composed transforms.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub transforms: TransformSpec,
}

/// The matrices of a [`SceneConfig`].
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedScene {
    pub objects: Vec<ResolvedObject>,
    pub view: Option<Matrix4>,
    pub projection: Option<Matrix4>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedObject {
    pub name: String,
    pub world: Matrix4,
    pub normal_matrix: Option<Matrix3>,
}

impl SceneConfig {
    /// Loads a scene configuration from the RON file at the given path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_ron_file(file_path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let file_path = file_path.as_ref();
        let config: Self = io::parse_ron_file(file_path)
            .with_context(|| format!("Failed to load scene from {}", file_path.display()))?;
        log::info!(
            "Loaded scene with {} objects from {}",
            config.objects.len(),
            file_path.display()
        );
        Ok(config)
    }

    /// Writes the configuration to a RON file at the given path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save_ron_file(&self, file_path: impl AsRef<Path>) -> anyhow::Result<()> {
        io::write_ron_file(self, file_path)
    }

    /// Computes the world matrix of every object, along with the view and
    /// projection matrices if a camera or projection is configured.
    ///
    /// # Errors
    /// Returns [`SceneError::SingularCamera`] if the camera transforms cannot
    /// be inverted, or [`SceneError::SingularWorld`] if a normal matrix is
    /// requested for an object whose world matrix cannot be inverted.
    pub fn resolve(&self) -> Result<ResolvedScene, SceneError> {
        let objects = self
            .objects
            .iter()
            .map(ObjectConfig::resolve)
            .collect::<Result<Vec<_>, _>>()?;

        let view = self
            .camera
            .as_ref()
            .map(CameraConfig::view_matrix)
            .transpose()?;

        let projection = self
            .projection
            .as_ref()
            .map(PerspectiveProjection::matrix);

        Ok(ResolvedScene {
            objects,
            view,
            projection,
        })
    }
}

impl ObjectConfig {
    pub fn new(name: impl Into<String>, transforms: TransformSpec) -> Self {
        Self {
            name: name.into(),
            transforms,
            normal_matrix: false,
        }
    }

    fn resolve(&self) -> Result<ResolvedObject, SceneError> {
        let world = self.transforms.compose();
        log::debug!(
            "Composed {} transforms for object {}",
            self.transforms.len(),
            self.name
        );

        let normal_matrix = if self.normal_matrix {
            Some(
                world
                    .normal_matrix()
                    .map_err(|source| SceneError::SingularWorld {
                        object: self.name.clone(),
                        source,
                    })?,
            )
        } else {
            None
        };

        Ok(ResolvedObject {
            name: self.name.clone(),
            world,
            normal_matrix,
        })
    }
}

impl CameraConfig {
    /// # Errors
    /// Returns [`SceneError::SingularCamera`] if the camera transforms cannot
    /// be inverted.
    pub fn view_matrix(&self) -> Result<Matrix4, SceneError> {
        playground_math::view_from_camera(&self.transforms.compose())
            .map_err(SceneError::SingularCamera)
    }
}

impl ResolvedScene {
    /// Assigns the matrices to uniforms. Object matrices are named
    /// `<object>.world` and `<object>.inverseTranspose`, and the camera
    /// matrices `view` and `projection`.
    pub fn write_uniforms(&self, uniforms: &mut dyn UniformSink) {
        for object in &self.objects {
            uniforms.set_matrix4(&format!("{}.world", object.name), object.world);
            if let Some(normal_matrix) = object.normal_matrix {
                uniforms.set_matrix3(
                    &format!("{}.inverseTranspose", object.name),
                    normal_matrix,
                );
            }
        }
        if let Some(view) = self.view {
            uniforms.set_matrix4("view", view);
        }
        if let Some(projection) = self.projection {
            uniforms.set_matrix4("projection", projection);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uniform::UniformTable;
    use approx::assert_abs_diff_eq;
    use playground_math::{Vector3, translation};

    const EPSILON: f32 = 1e-5;

    fn box_object() -> ObjectConfig {
        ObjectConfig::new(
            "box",
            TransformSpec::new()
                .then_scale(Vector3::new(2.0, 1.0, 1.0))
                .then_rotate_z(0.0)
                .then_translate(Vector3::new(0.0, 3.0, 0.0)),
        )
    }

    #[test]
    fn parsing_documented_example_gives_expected_config() {
        let text = r#"(
            objects: [
                (
                    name: "box",
                    transforms: [
                        Scale((x: 2.0, y: 1.0, z: 1.0)),
                        RotationZ(0.5),
                        Translation((x: 0.0, y: 3.0, z: 0.0)),
                    ],
                    normal_matrix: true,
                ),
            ],
            camera: Some((transforms: [Translation((x: 0.0, y: 0.0, z: -20.0))])),
        )"#;
        let config: SceneConfig = ron::from_str(text).unwrap();

        assert_eq!(config.objects.len(), 1);
        let object = &config.objects[0];
        assert_eq!(object.name, "box");
        assert_eq!(
            object.transforms,
            TransformSpec::new()
                .then_scale(Vector3::new(2.0, 1.0, 1.0))
                .then_rotate_z(0.5)
                .then_translate(Vector3::new(0.0, 3.0, 0.0))
        );
        assert!(object.normal_matrix);
        assert!(config.camera.is_some());
        assert_eq!(config.projection, None);
    }

    #[test]
    fn omitted_fields_use_defaults() {
        let config: SceneConfig =
            ron::from_str(r#"(objects: [(name: "empty", transforms: [])])"#).unwrap();
        assert!(!config.objects[0].normal_matrix);
        assert_eq!(config.camera, None);

        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.objects[0].world, Matrix4::identity());
        assert_eq!(resolved.view, None);
    }

    #[test]
    fn resolving_composes_object_transforms() {
        let config = SceneConfig {
            objects: vec![box_object()],
            ..Default::default()
        };
        let resolved = config.resolve().unwrap();

        let world = resolved.objects[0].world;
        assert_abs_diff_eq!(
            world.transform_point(&Vector3::new(1.0, 0.0, 0.0)),
            Vector3::new(2.0, 3.0, 0.0),
            epsilon = EPSILON
        );
        assert_eq!(resolved.objects[0].normal_matrix, None);
    }

    #[test]
    fn resolving_camera_inverts_its_transforms() {
        let config = SceneConfig {
            objects: Vec::new(),
            camera: Some(CameraConfig {
                transforms: TransformSpec::new().then_translate(Vector3::new(0.0, 0.0, -20.0)),
            }),
            projection: None,
        };
        let view = config.resolve().unwrap().view.unwrap();
        assert_abs_diff_eq!(view, translation(0.0, 0.0, 20.0), epsilon = EPSILON);
    }

    #[test]
    fn resolving_degenerate_camera_fails() {
        let config = SceneConfig {
            objects: Vec::new(),
            camera: Some(CameraConfig {
                transforms: TransformSpec::new().then_scale(Vector3::new(0.0, 1.0, 1.0)),
            }),
            projection: None,
        };
        assert!(matches!(
            config.resolve(),
            Err(SceneError::SingularCamera(_))
        ));
    }

    #[test]
    fn requesting_normal_matrix_of_flattened_object_fails() {
        let mut object = ObjectConfig::new(
            "flat",
            TransformSpec::new().then_scale(Vector3::new(1.0, 0.0, 1.0)),
        );
        object.normal_matrix = true;
        let config = SceneConfig {
            objects: vec![object],
            ..Default::default()
        };
        assert!(matches!(
            config.resolve(),
            Err(SceneError::SingularWorld { object, .. }) if object == "flat"
        ));
    }

    #[test]
    fn writing_uniforms_names_them_by_object() {
        let mut object = box_object();
        object.normal_matrix = true;
        let config = SceneConfig {
            objects: vec![object],
            camera: Some(CameraConfig::default()),
            projection: Some(PerspectiveProjection::new(1.0, 1.0, 1.0, 100.0)),
        };

        let mut uniforms = UniformTable::new();
        config.resolve().unwrap().write_uniforms(&mut uniforms);

        assert!(uniforms.matrix4("box.world").is_some());
        assert_abs_diff_eq!(
            uniforms.matrix3("box.inverseTranspose").unwrap(),
            Matrix3::from_rows([[0.5, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]),
            epsilon = EPSILON
        );
        assert_eq!(uniforms.matrix4("view"), Some(Matrix4::identity()));
        assert!(uniforms.matrix4("projection").is_some());
        assert_eq!(uniforms.len(), 4);
    }
}
