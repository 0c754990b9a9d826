#![deny(unsafe_code)]
//! Windowed OpenGL demo: a spinning tetrahedron with an egui overlay.
//!
//! Configuration is layered: built-in defaults, then an optional JSON
//! config file, then CLI flags. Shader sources default to the built-in
//! demo pair and can be swapped for files with `--vertex`/`--fragment`.

mod app;
mod error;
mod window;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use winit::event_loop::EventLoop;

use glimpse_core::{DemoConfig, MeshData, ShaderSource};

use crate::app::{DemoApp, UserEvent};
use crate::error::DemoError;

#[derive(Parser)]
#[command(name = "glimpse", about = "OpenGL tetrahedron demo with an egui overlay")]
struct Cli {
    /// JSON config file; the flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Window width in logical pixels.
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// Window height in logical pixels.
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Window title.
    #[arg(long)]
    title: Option<String>,

    /// Vertex shader file (defaults to the built-in demo shader).
    #[arg(long, requires = "fragment")]
    vertex: Option<PathBuf>,

    /// Fragment shader file (defaults to the built-in demo shader).
    #[arg(long, requires = "vertex")]
    fragment: Option<PathBuf>,

    /// Rotation speed in degrees per frame.
    #[arg(long)]
    degrees_per_frame: Option<f32>,

    /// Uniform model scale.
    #[arg(long)]
    scale: Option<f32>,
}

impl Cli {
    /// Resolves the layered configuration and the shader sources.
    fn into_inputs(self) -> Result<(DemoConfig, ShaderSource), DemoError> {
        let mut config = match &self.config {
            Some(path) => DemoConfig::from_json_file(path)?,
            None => DemoConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(title) = self.title {
            config.title = title;
        }
        if let Some(degrees) = self.degrees_per_frame {
            config.spin.degrees_per_frame = degrees;
        }
        if let Some(scale) = self.scale {
            config.spin.scale = scale;
        }
        config.validate()?;

        let sources = match (&self.vertex, &self.fragment) {
            (Some(vertex), Some(fragment)) => ShaderSource::from_files(vertex, fragment)?,
            _ => ShaderSource::builtin(),
        };

        Ok((config, sources))
    }
}

fn run(cli: Cli) -> Result<(), DemoError> {
    let (config, sources) = cli.into_inputs()?;

    let event_loop = EventLoop::<UserEvent>::with_user_event().build()?;
    let proxy = event_loop.create_proxy();

    let mut app = DemoApp::new(config, sources, MeshData::tetrahedron(), proxy);
    event_loop.run_app(&mut app)?;

    if let Some(message) = app.failure() {
        return Err(DemoError::Graphics(message.to_string()));
    }

    Ok(())
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("glimpse-cli-{}-{name}", std::process::id()));
        let mut f = std::fs::File::create(&path).expect("create temp file");
        f.write_all(contents.as_bytes()).expect("write temp file");
        path
    }

    #[test]
    fn no_flags_yields_defaults_and_builtin_sources() {
        let cli = Cli::try_parse_from(["glimpse"]).expect("bare invocation parses");
        let (config, sources) = cli.into_inputs().expect("defaults resolve");
        assert_eq!(config, DemoConfig::default());
        assert_eq!(sources, ShaderSource::builtin());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from(["glimpse", "-W", "1024", "--title", "spin"])
            .expect("flags parse");
        let (config, _) = cli.into_inputs().expect("overrides resolve");
        assert_eq!(config.width, 1024);
        assert_eq!(config.title, "spin");
        assert_eq!(config.height, 600, "untouched fields keep defaults");
    }

    #[test]
    fn flags_override_config_file() {
        let file = temp_file("over.json", r#"{"width": 320, "height": 240}"#);
        let cli = Cli::try_parse_from([
            "glimpse",
            "--config",
            file.to_str().expect("utf-8 temp path"),
            "-W",
            "640",
        ])
        .expect("flags parse");
        let (config, _) = cli.into_inputs().expect("layered config resolves");
        assert_eq!(config.width, 640, "flag wins over file");
        assert_eq!(config.height, 240, "file wins over default");

        let _ = std::fs::remove_file(file);
    }

    #[test]
    fn vertex_flag_requires_fragment() {
        let result = Cli::try_parse_from(["glimpse", "--vertex", "tri.vert"]);
        assert!(result.is_err(), "--vertex without --fragment must be rejected");
    }

    #[test]
    fn missing_config_file_maps_to_io_exit_code() {
        let cli = Cli::try_parse_from(["glimpse", "--config", "/definitely/not/here.json"])
            .expect("flags parse");
        let err = cli.into_inputs().unwrap_err();
        assert_eq!(err.exit_code(), 11);
    }

    #[test]
    fn invalid_override_maps_to_input_exit_code() {
        let cli = Cli::try_parse_from(["glimpse", "--scale=-1.0"]).expect("flags parse");
        let err = cli.into_inputs().unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn shader_files_are_read_when_both_given() {
        let vert = temp_file("cli.vert", "void main() { gl_Position = vec4(0.0); }");
        let frag = temp_file("cli.frag", "void main() {}");
        let cli = Cli::try_parse_from([
            "glimpse",
            "--vertex",
            vert.to_str().expect("utf-8 temp path"),
            "--fragment",
            frag.to_str().expect("utf-8 temp path"),
        ])
        .expect("flags parse");
        let (_, sources) = cli.into_inputs().expect("sources resolve");
        assert!(sources.vertex.contains("gl_Position"));

        let _ = std::fs::remove_file(vert);
        let _ = std::fs::remove_file(frag);
    }
}
