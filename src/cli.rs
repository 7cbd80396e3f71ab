// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::config::{ConfigError, DemoConfig, Preset};

#[derive(Parser, Debug, Clone)]
#[command(name = "mesh-viewer")]
#[command(about = "Interactive 3D mesh viewer with a live control panel", long_about = None)]
pub struct Cli {
    /// Built-in demo to show
    #[arg(long, value_enum, default_value_t = Preset::Cylinder)]
    pub preset: Preset,

    /// JSON demo description; takes precedence over --preset
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Hide the control panel
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 600)]
    pub height: u32,
}

impl Cli {
    pub fn demo_config(&self) -> Result<DemoConfig, ConfigError> {
        match &self.config {
            Some(path) => DemoConfig::load(path),
            None => Ok(DemoConfig::preset(self.preset)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeometryKind;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["mesh-viewer"]);
        assert_eq!(cli.preset, Preset::Cylinder);
        assert!(!cli.no_ui);
        assert_eq!((cli.width, cli.height), (800, 600));
        assert_eq!(cli.demo_config().unwrap().geometry, GeometryKind::Cylinder);
    }

    #[test]
    fn test_preset_flag() {
        let cli = Cli::parse_from(["mesh-viewer", "--preset", "textured-box", "--no-ui"]);
        assert_eq!(cli.preset, Preset::TexturedBox);
        assert!(cli.no_ui);
        assert_eq!(cli.demo_config().unwrap().geometry, GeometryKind::Box);
    }

    #[test]
    fn test_unknown_preset_is_rejected() {
        assert!(Cli::try_parse_from(["mesh-viewer", "--preset", "sphere"]).is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let cli = Cli::parse_from(["mesh-viewer", "--config", "/no/such/demo.json"]);
        assert!(matches!(cli.demo_config(), Err(ConfigError::Io { .. })));
    }
}
