use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Deserialize;

use gl_wrapper::program::ShaderErrorPolicy;

#[derive(Debug, Default, Parser)]
pub struct Args {
    /// json5 file overriding the window and render settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Window width in pixels
    #[arg(long)]
    pub width: Option<u32>,
    /// Window height in pixels
    #[arg(long)]
    pub height: Option<u32>,
    /// Window title
    #[arg(long)]
    pub title: Option<String>,
    /// What to do when a shader stage fails to compile
    #[arg(long, value_enum)]
    pub shader_errors: Option<ShaderErrorsArg>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShaderErrorsArg {
    /// Report the error and exit
    Abort,
    /// Report the error and keep rendering with the broken program
    Continue,
}

impl From<ShaderErrorsArg> for ShaderErrorPolicy {
    fn from(a: ShaderErrorsArg) -> Self {
        match a {
            ShaderErrorsArg::Abort => Self::Abort,
            ShaderErrorsArg::Continue => Self::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let args = Args::try_parse_from([
            "gl-lab",
            "--width",
            "640",
            "--title",
            "Test",
            "--shader-errors",
            "continue",
        ])
        .unwrap();

        assert_eq!(args.width, Some(640));
        assert_eq!(args.height, None);
        assert_eq!(args.title.as_deref(), Some("Test"));
        assert_eq!(args.shader_errors, Some(ShaderErrorsArg::Continue));
    }

    #[test]
    fn rejects_unknown_policy() {
        assert!(Args::try_parse_from(["gl-lab", "--shader-errors", "retry"]).is_err());
    }
}
