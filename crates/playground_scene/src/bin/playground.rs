use anyhow::Result;

#[cfg(feature = "cli")]
mod main {
    use super::*;
    use clap::{Parser, Subcommand};
    use playground_math::Vector3;
    use playground_scene::{
        KeyboardCamera, Lab, MeshData, SceneConfig, UniformSink, UniformTable,
    };
    use std::path::PathBuf;

    #[derive(Debug, Parser)]
    #[command(about = "Matrix setup of the graphics playground labs", long_about = None)]
    struct Cli {
        #[command(subcommand)]
        command: Command,
    }

    #[derive(Debug, Subcommand)]
    enum Command {
        /// Resolve the matrices of a RON scene file and print them as uniforms
        Compose {
            /// Path to the scene file
            file: PathBuf,
        },
        /// Print the uniforms of a lab for a single frame
        Lab {
            /// Lab number (05, 06 or 07)
            lab: Lab,

            /// Number of seconds since the scene was created
            #[arg(short, long, default_value_t = 0.0)]
            time: f32,

            /// Names of keys pressed before the frame, in order (e.g. ArrowUp)
            #[arg(short, long, num_args = 1..)]
            keys: Vec<String>,
        },
        /// Print the view matrix of a camera at the given position
        View {
            /// Camera position
            #[arg(
                long,
                num_args = 3,
                value_names = ["X", "Y", "Z"],
                allow_negative_numbers = true
            )]
            position: Vec<f32>,
        },
        /// Print the vertices and triangles of a hand-built mesh as OBJ text
        Mesh {
            #[command(subcommand)]
            shape: Shape,
        },
    }

    #[derive(Debug, Subcommand)]
    enum Shape {
        /// Flat circle made of a triangle fan
        Circle {
            /// Number of triangles around the center
            #[arg(short, long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(3..))]
            segments: u32,

            /// Distance from the center to the rim
            #[arg(short, long, default_value_t = 3.0)]
            radius: f32,

            /// Center of the circle
            #[arg(
                long,
                num_args = 3,
                value_names = ["X", "Y", "Z"],
                allow_negative_numbers = true,
                default_values_t = [0.0, 0.0, 0.0]
            )]
            center: Vec<f32>,
        },
        /// Textured square pyramid
        Pyramid,
    }

    pub fn main() -> Result<()> {
        env_logger::init();

        let cli = Cli::parse();

        let uniforms = match cli.command {
            Command::Mesh { shape } => return print_mesh(shape),
            Command::Compose { file } => {
                let scene = SceneConfig::from_ron_file(&file)?.resolve()?;
                let mut uniforms = UniformTable::new();
                scene.write_uniforms(&mut uniforms);
                uniforms
            }
            Command::Lab { lab, time, keys } => lab.evaluate(time, keys.as_slice())?,
            Command::View { position } => {
                let &[x, y, z] = position.as_slice() else {
                    anyhow::bail!("Expected three position components, got {}", position.len());
                };
                let camera = KeyboardCamera::new(Vector3::new(x, y, z));
                let mut uniforms = UniformTable::new();
                uniforms.set_matrix4("view", camera.view_matrix()?);
                uniforms
            }
        };

        print!("{uniforms}");
        Ok(())
    }

    fn print_mesh(shape: Shape) -> Result<()> {
        let mesh = match shape {
            Shape::Circle {
                segments,
                radius,
                center,
            } => {
                let &[x, y, z] = center.as_slice() else {
                    anyhow::bail!("Expected three center components, got {}", center.len());
                };
                if radius.is_nan() || radius < 0.0 {
                    anyhow::bail!("Circle radius must not be negative, got {radius}");
                }
                MeshData::create_circle_fan(segments, radius, Vector3::new(x, y, z))
            }
            Shape::Pyramid => MeshData::create_textured_pyramid(),
        };
        log::info!(
            "Generated mesh with {} vertices and {} triangles",
            mesh.n_vertices(),
            mesh.n_triangles()
        );
        print!("{mesh}");
        Ok(())
    }
}

#[cfg(not(feature = "cli"))]
mod main {
    use super::*;

    pub fn main() -> Result<()> {
        anyhow::bail!("This binary requires the `cli` feature to be enabled.")
    }
}

fn main() -> Result<()> {
    main::main()
}
