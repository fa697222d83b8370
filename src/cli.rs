// src/cli.rs — CLI definition (clap derive)

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "wavectl",
    about = "Gesture-driven remote control for a Spotify account",
    version
)]
pub struct Cli {
    /// Config file path (default: ~/.wavectl/config.toml)
    #[arg(long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the control daemon (default when no subcommand given)
    Serve {
        /// Listen port, overriding the config file
        #[arg(short, long)]
        port: Option<u16>,

        /// Disable the camera classification loop
        #[arg(long)]
        no_camera: bool,
    },
    /// Print the effective configuration (secrets redacted)
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_flags_parse() {
        let cli = Cli::parse_from(["wavectl", "serve", "--port", "8080", "--no-camera"]);
        match cli.command {
            Some(Commands::Serve { port, no_camera }) => {
                assert_eq!(port, Some(8080));
                assert!(no_camera);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_no_subcommand_is_valid() {
        let cli = Cli::parse_from(["wavectl"]);
        assert!(cli.command.is_none());
    }
}
