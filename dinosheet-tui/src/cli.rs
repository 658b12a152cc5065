//! Command-line flags.

use std::path::PathBuf;

use clap::Parser;
use dinosheet_lib::Settings;
use dinosheet_lib::model::Variant;

#[derive(Debug, Parser)]
#[command(
    name = "dinosheet",
    version,
    about = "Sortable dinosaur cheat sheet for the terminal"
)]
pub struct Cli {
    /// Directory holding the dinosaurs_<variant>.yaml feeds.
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Data variant to load (evrima or hordetest).
    #[arg(long, value_name = "VARIANT")]
    pub variant: Option<Variant>,

    /// Show AI-controlled species.
    #[arg(long)]
    pub ai: bool,

    /// Write the printable sheet to stdout as plain text and exit.
    #[arg(long)]
    pub print: bool,

    /// Settings file to read instead of the platform default.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Overrides file settings with the flags that were given.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(dir) = &self.data_dir {
            settings.data_dir = dir.clone();
        }
        if let Some(variant) = self.variant {
            settings.variant = variant;
        }
        if self.ai {
            settings.show_ai = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_settings() {
        let cli = Cli::try_parse_from([
            "dinosheet",
            "--data-dir",
            "/srv/feeds",
            "--variant",
            "hordetest",
            "--ai",
        ])
        .unwrap();
        let mut settings = Settings::default();
        cli.apply(&mut settings);

        assert_eq!(settings.data_dir, PathBuf::from("/srv/feeds"));
        assert_eq!(settings.variant, Variant::Hordetest);
        assert!(settings.show_ai);
        assert!(!cli.print);
    }

    #[test]
    fn test_absent_flags_keep_settings() {
        let cli = Cli::try_parse_from(["dinosheet"]).unwrap();
        let mut settings = Settings {
            show_ai: true,
            ..Settings::default()
        };
        cli.apply(&mut settings);
        assert!(settings.show_ai);
        assert_eq!(settings.variant, Variant::Evrima);
    }

    #[test]
    fn test_unknown_variant_rejected() {
        assert!(Cli::try_parse_from(["dinosheet", "--variant", "legacy"]).is_err());
    }
}
