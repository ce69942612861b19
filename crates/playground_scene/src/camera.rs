//! Cameras producing view matrices.

use crate::error::SceneError;
use playground_math::{Matrix4, Vector3, translation, view_from_camera};

/// Keys that move a [`KeyboardCamera`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CameraKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

/// A camera that only translates, moved one unit per key press.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyboardCamera {
    position: Vector3,
}

/// A camera orbiting a target point, placed by spherical angles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitCamera {
    /// Angle in the horizontal plane, measured from the x-axis toward z.
    pub longitude: f32,
    /// Angle from the y-axis.
    pub colatitude: f32,
    pub radius: f32,
    pub target: Vector3,
}

impl CameraKey {
    pub const ALL: [Self; 4] = [
        Self::ArrowUp,
        Self::ArrowDown,
        Self::ArrowLeft,
        Self::ArrowRight,
    ];

    /// Looks up the key with the given browser-style key name
    /// (e.g. `"ArrowUp"`). Returns [`None`] for any other key.
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "ArrowUp" => Some(Self::ArrowUp),
            "ArrowDown" => Some(Self::ArrowDown),
            "ArrowLeft" => Some(Self::ArrowLeft),
            "ArrowRight" => Some(Self::ArrowRight),
            _ => None,
        }
    }

    /// The displacement of the camera for one press of this key.
    pub const fn step(self) -> Vector3 {
        match self {
            Self::ArrowUp => Vector3::new(0.0, 0.0, 1.0),
            Self::ArrowDown => Vector3::new(0.0, 0.0, -1.0),
            Self::ArrowLeft => Vector3::new(-1.0, 0.0, 0.0),
            Self::ArrowRight => Vector3::new(1.0, 0.0, 0.0),
        }
    }
}

impl KeyboardCamera {
    pub const fn new(position: Vector3) -> Self {
        Self { position }
    }

    pub const fn position(&self) -> Vector3 {
        self.position
    }

    /// Moves the camera one step for the given key.
    pub fn press(&mut self, key: CameraKey) {
        self.position = self.position + key.step();
        log::debug!(
            "Camera moved to ({}, {}, {})",
            self.position.x(),
            self.position.y(),
            self.position.z()
        );
    }

    /// Moves the camera for the key with the given name, ignoring keys that
    /// do not control the camera. Returns whether the camera moved.
    pub fn press_named(&mut self, name: &str) -> bool {
        if let Some(key) = CameraKey::from_key_name(name) {
            self.press(key);
            true
        } else {
            log::trace!("Ignoring key {name}");
            false
        }
    }

    /// The camera-to-world matrix.
    pub fn world_matrix(&self) -> Matrix4 {
        translation(self.position.x(), self.position.y(), self.position.z())
    }

    /// The world-to-camera matrix.
    ///
    /// # Errors
    /// Returns [`SceneError::SingularCamera`] if the camera matrix cannot be
    /// inverted, which only happens for non-finite positions.
    pub fn view_matrix(&self) -> Result<Matrix4, SceneError> {
        view_from_camera(&self.world_matrix()).map_err(SceneError::SingularCamera)
    }
}

impl OrbitCamera {
    pub const fn new(longitude: f32, colatitude: f32, radius: f32, target: Vector3) -> Self {
        Self {
            longitude,
            colatitude,
            radius,
            target,
        }
    }

    /// The position of the camera in world space.
    pub fn position(&self) -> Vector3 {
        let (sin_longitude, cos_longitude) = self.longitude.sin_cos();
        let (sin_colatitude, cos_colatitude) = self.colatitude.sin_cos();
        self.target
            + Vector3::new(
                cos_longitude * sin_colatitude,
                cos_colatitude,
                sin_longitude * sin_colatitude,
            ) * self.radius
    }
}
