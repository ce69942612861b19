//! Matrix setups of the individual playground labs.
//!
//! Each lab is a [`LabScene`] that assigns its uniforms once when the scene is
//! created, again before every frame, and in response to key presses.

use crate::{
    camera::{KeyboardCamera, OrbitCamera},
    error::SceneError,
    frame::{BeforeRender, FrameClock, FrameContext},
    uniform::{UniformSink, UniformTable},
};
use playground_math::{
    Matrix3, Matrix4, PerspectiveProjection, TransformSpec, Vector3, rotation_x, rotation_y,
    rotation_z, scale, translation,
};
use std::{
    f32::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, FRAC_PI_6, PI},
    fmt,
    str::FromStr,
};

/// The labs with a matrix setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lab {
    /// Elementary transforms composed into an animated box world matrix.
    Lab05,
    /// World, view and projection matrices with a keyboard camera.
    Lab06,
    /// Normal matrix and lighting parameters for a shaded sphere.
    Lab07,
}

/// The uniform assignments of a lab scene.
pub trait LabScene {
    /// Assigns the uniforms that are set when the scene is created.
    fn initialize(&self, _uniforms: &mut dyn UniformSink) -> Result<(), SceneError> {
        Ok(())
    }

    /// Assigns the uniforms that are recomputed before every frame.
    fn before_render(&self, _frame: &FrameContext, _uniforms: &mut dyn UniformSink) {}

    /// Reacts to the key with the given name being pressed.
    fn handle_key(
        &mut self,
        _key_name: &str,
        _uniforms: &mut dyn UniformSink,
    ) -> Result<(), SceneError> {
        Ok(())
    }
}

/// The lab05 box: scaled, rotated about all three axes and lifted above the
/// ground, with a wobble that grows over time.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lab05;

/// The lab06 box seen through a translating camera.
#[derive(Clone, Copy, Debug)]
pub struct Lab06 {
    world: Matrix4,
    projection: PerspectiveProjection,
    camera: KeyboardCamera,
}

/// The lab07 sphere lit by a directional light.
#[derive(Clone, Copy, Debug)]
pub struct Lab07 {
    world: Matrix4,
    normal_matrix: Matrix3,
    camera: OrbitCamera,
}

pub const LAB05_COLOR: Vector3 = Vector3::new(0.0, 1.0, 0.0);

pub const LAB06_COLOR: Vector3 = Vector3::new(1.0, 0.0, 0.0);
pub const LAB06_CAMERA_POSITION: Vector3 = Vector3::new(0.0, 0.0, -20.0);

pub const LAB07_SPHERE_POSITION: Vector3 = Vector3::new(1.5, 1.0, 0.0);
pub const LAB07_SURFACE_COLOR: Vector3 = Vector3::new(1.0, 0.0, 0.0);
pub const LAB07_LIGHT_DIRECTION: Vector3 = Vector3::new(-0.5, -1.0, 0.7);
pub const LAB07_LIGHT_COLOR: Vector3 = Vector3::new(1.0, 1.0, 1.0);
pub const LAB07_LIGHT_INTENSITY: f32 = 1.0;
pub const LAB07_SHININESS: f32 = 50.0;
pub const LAB07_AMBIENT_TERM: f32 = 0.1;

impl Lab {
    pub const ALL: [Self; 3] = [Self::Lab05, Self::Lab06, Self::Lab07];

    /// The two-digit lab number.
    pub const fn number(self) -> &'static str {
        match self {
            Self::Lab05 => "05",
            Self::Lab06 => "06",
            Self::Lab07 => "07",
        }
    }

    /// Creates the scene of this lab.
    ///
    /// # Errors
    /// See [`Lab07::new`].
    pub fn scene(self) -> Result<Box<dyn LabScene>, SceneError> {
        Ok(match self {
            Self::Lab05 => Box::new(Lab05),
            Self::Lab06 => Box::new(Lab06::new()),
            Self::Lab07 => Box::new(Lab07::new()?),
        })
    }

    /// Creates the scene of this lab, presses the given keys and renders a
    /// single frame at the given time. Returns the uniform values the frame
    /// would be drawn with.
    ///
    /// # Errors
    /// Returns an error if the scene cannot be created or a key press yields
    /// a singular camera.
    pub fn evaluate(
        self,
        elapsed_seconds: f32,
        key_names: &[impl AsRef<str>],
    ) -> Result<UniformTable, SceneError> {
        log::info!("Evaluating lab{} at t = {elapsed_seconds} s", self.number());

        let mut uniforms = UniformTable::new();
        let mut scene = self.scene()?;
        scene.initialize(&mut uniforms)?;

        for key_name in key_names {
            scene.handle_key(key_name.as_ref(), &mut uniforms)?;
        }

        let mut before_render = BeforeRender::new();
        before_render.register(move |frame, uniforms| scene.before_render(frame, uniforms));

        let mut clock = FrameClock::start();
        before_render.run(&clock.tick_at(elapsed_seconds), &mut uniforms);

        Ok(uniforms)
    }
}

impl fmt::Display for Lab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lab{}", self.number())
    }
}

impl FromStr for Lab {
    type Err = SceneError;

    /// Parses a lab from its number, with or without a leading zero or a
    /// `lab` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number = s.trim().trim_start_matches("lab");
        match number.trim_start_matches('0') {
            "5" => Ok(Self::Lab05),
            "6" => Ok(Self::Lab06),
            "7" => Ok(Self::Lab07),
            _ => Err(SceneError::UnknownLab(s.to_owned())),
        }
    }
}

impl Lab05 {
    /// The transforms making up the box's world matrix when it is not
    /// animated.
    pub fn box_transforms() -> TransformSpec {
        TransformSpec::new()
            .then_scale(Vector3::new(1.5, 1.0, 1.25))
            .then_rotate_z(PI / 5.0)
            .then_rotate_x(FRAC_PI_3)
            .then_rotate_y(FRAC_PI_4)
            .then_translate(Vector3::new(0.0, 4.0, 1.0))
    }

    /// The box's world matrix at the given time.
    ///
    /// The z-rotation gets a shear added to its upper-left 2x2 block and the
    /// translation drifts along a Lissajous-like path.
    pub fn box_world_at(elapsed_seconds: f32) -> Matrix4 {
        let t = elapsed_seconds;

        let tilt = (t / 5.0).tan();
        let wobble = Matrix4::from_rows([
            [tilt, tilt, 0.0, 0.0],
            [tilt, tilt, 0.0, 0.0],
            [0.0; 4],
            [0.0; 4],
        ]);
        let drift = Matrix4::from_rows([
            [0.0; 4],
            [0.0; 4],
            [0.0; 4],
            [4.0 * t.sin(), 5.0 * t.cos(), (0.5 * t).sin(), 0.0],
        ]);

        scale(1.5, 1.0, 1.25)
            * (rotation_z(PI / 5.0) + wobble)
            * rotation_x(FRAC_PI_3)
            * rotation_y(FRAC_PI_4)
            * (translation(0.0, 4.0, 1.0) + drift)
    }
}

impl LabScene for Lab05 {
    fn initialize(&self, uniforms: &mut dyn UniformSink) -> Result<(), SceneError> {
        uniforms.set_vector3("color", LAB05_COLOR);
        uniforms.set_matrix4("myWorld", Self::box_transforms().compose());
        Ok(())
    }

    fn before_render(&self, frame: &FrameContext, uniforms: &mut dyn UniformSink) {
        uniforms.set_matrix4("myWorld", Self::box_world_at(frame.elapsed_seconds()));
    }
}

impl Lab06 {
    pub fn new() -> Self {
        Self {
            world: TransformSpec::world(
                Vector3::ones(),
                Vector3::zeros(),
                Vector3::new(0.0, 1.0, 0.0),
            )
            .compose(),
            projection: PerspectiveProjection::new(FRAC_PI_6, 2.0, 1.0, 1000.0),
            camera: KeyboardCamera::new(LAB06_CAMERA_POSITION),
        }
    }

    pub const fn camera(&self) -> &KeyboardCamera {
        &self.camera
    }

    fn set_view(&self, uniforms: &mut dyn UniformSink) -> Result<(), SceneError> {
        uniforms.set_matrix4("myView", self.camera.view_matrix()?);
        Ok(())
    }
}

impl Default for Lab06 {
    fn default() -> Self {
        Self::new()
    }
}

impl LabScene for Lab06 {
    fn initialize(&self, uniforms: &mut dyn UniformSink) -> Result<(), SceneError> {
        uniforms.set_vector3("color", LAB06_COLOR);
        uniforms.set_matrix4("myProjection", self.projection.matrix());
        self.set_view(uniforms)?;
        uniforms.set_matrix4("myWorld", self.world);
        Ok(())
    }

    fn handle_key(
        &mut self,
        key_name: &str,
        uniforms: &mut dyn UniformSink,
    ) -> Result<(), SceneError> {
        if self.camera.press_named(key_name) {
            self.set_view(uniforms)?;
        }
        Ok(())
    }
}

impl Lab07 {
    /// # Errors
    /// Returns [`SceneError::SingularWorld`] if the sphere's world matrix has
    /// no normal matrix.
    pub fn new() -> Result<Self, SceneError> {
        let world = TransformSpec::new()
            .then_translate(LAB07_SPHERE_POSITION)
            .compose();
        let normal_matrix = world
            .normal_matrix()
            .map_err(|source| SceneError::SingularWorld {
                object: "sphere".to_owned(),
                source,
            })?;

        Ok(Self {
            world,
            normal_matrix,
            camera: OrbitCamera::new(-FRAC_PI_2, 1.0, 10.0, Vector3::zeros()),
        })
    }
}

impl LabScene for Lab07 {
    fn before_render(&self, _frame: &FrameContext, uniforms: &mut dyn UniformSink) {
        uniforms.set_matrix4("world", self.world);
        uniforms.set_matrix3("inverseTranspose", self.normal_matrix);
        uniforms.set_vector3("surfaceColor", LAB07_SURFACE_COLOR);
        uniforms.set_vector3("lightDirection", LAB07_LIGHT_DIRECTION);
        uniforms.set_float("lightIntensity", LAB07_LIGHT_INTENSITY);
        uniforms.set_vector3("lightColor", LAB07_LIGHT_COLOR);
        uniforms.set_vector3("specularColor", LAB07_LIGHT_COLOR);
        uniforms.set_vector3("viewPosition", self.camera.position());
        uniforms.set_float("shininess", LAB07_SHININESS);
        uniforms.set_float("ambientTerm", LAB07_AMBIENT_TERM);
    }
}
