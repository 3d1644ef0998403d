use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for covtui
#[derive(Parser, Debug)]
#[command(version, about = "covtui - COVID-19 statistics dashboard in the terminal")]
pub struct Args {
    /// Payload file: base64-encoded or raw JSON
    pub path: PathBuf,

    /// Disable mouse capture regardless of configuration
    #[arg(long = "no-mouse", action)]
    pub no_mouse: bool,

    /// Force a color mode instead of probing the terminal (auto, truecolor, 256, 16)
    #[arg(long = "color-mode")]
    pub color_mode: Option<String>,

    /// Write the default config file and exit
    #[arg(long = "write-config", action)]
    pub write_config: bool,

    /// With --write-config, overwrite an existing config file
    #[arg(long = "force", action)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_payload_path() {
        let args = Args::parse_from(["covtui", "us.b64"]);
        assert_eq!(args.path, PathBuf::from("us.b64"));
        assert!(!args.no_mouse);
        assert!(!args.write_config);
    }

    #[test]
    fn parses_flags() {
        let args = Args::parse_from([
            "covtui",
            "wa.b64",
            "--no-mouse",
            "--color-mode",
            "256",
            "--write-config",
            "--force",
        ]);
        assert!(args.no_mouse);
        assert_eq!(args.color_mode.as_deref(), Some("256"));
        assert!(args.write_config);
        assert!(args.force);
    }
}
