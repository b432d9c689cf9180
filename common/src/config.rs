use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use gl_wrapper::program::ShaderErrorPolicy;
use gl_wrapper::renderer::Color;

use crate::args::{Args, ShaderErrorsArg};
use crate::exercise::Exercise;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub centered: bool,
}

#[derive(Debug, Clone)]
pub struct ExerciseConfig {
    pub window: WindowConfig,
    pub clear_color: Color,
    pub shader_errors: ShaderErrorPolicy,
}

impl ExerciseConfig {
    ///
    /// Exercise defaults, overridden by the config file given with `--config`, overridden by the
    /// remaining flags.
    ///
    pub fn resolve(exercise: &Exercise, args: &Args) -> Result<Self, ConfigError> {
        let mut config = Self::from_exercise(exercise);

        if let Some(path) = &args.config {
            config = config.with_file(ConfigFile::load_from_path(path)?);
        }

        let config = config.with_args(args);

        if config.window.width == 0 || config.window.height == 0 {
            return Err(ConfigError::ZeroSize(
                config.window.width,
                config.window.height,
            ));
        }

        Ok(config)
    }

    pub fn from_exercise(exercise: &Exercise) -> Self {
        Self {
            window: WindowConfig {
                title: exercise.title.to_string(),
                width: exercise.width,
                height: exercise.height,
                centered: exercise.centered,
            },
            clear_color: exercise.clear_color,
            shader_errors: ShaderErrorPolicy::default(),
        }
    }

    pub fn with_file(mut self, file: ConfigFile) -> Self {
        if let Some(title) = file.title {
            self.window.title = title;
        }
        if let Some(width) = file.width {
            self.window.width = width;
        }
        if let Some(height) = file.height {
            self.window.height = height;
        }
        if let Some(centered) = file.centered {
            self.window.centered = centered;
        }
        if let Some(color) = file.clear_color {
            self.clear_color = color.into();
        }
        if let Some(policy) = file.shader_errors {
            self.shader_errors = policy.into();
        }
        self
    }

    pub fn with_args(mut self, args: &Args) -> Self {
        if let Some(title) = &args.title {
            self.window.title = title.clone();
        }
        if let Some(width) = args.width {
            self.window.width = width;
        }
        if let Some(height) = args.height {
            self.window.height = height;
        }
        if let Some(policy) = args.shader_errors {
            self.shader_errors = policy.into();
        }
        self
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub title: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub centered: Option<bool>,
    pub clear_color: Option<[f32; 4]>,
    pub shader_errors: Option<ShaderErrorsArg>,
}

impl ConfigFile {
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let src = std::fs::read_to_string(path)?;
        Self::parse(&src)
    }

    pub fn parse(src: &str) -> Result<Self, ConfigError> {
        Ok(json5::from_str(src)?)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config file: {0}")]
    Parse(#[from] json5::Error),
    #[error("Window size {0}x{1} is empty")]
    ZeroSize(u32, u32),
}
