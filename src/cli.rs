//! Command-line interface definitions for Post Export.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Directories can be provided via command-line flags or environment variables.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the Post Export application.
///
/// # Examples
///
/// ```sh
/// # Export with default options
/// post_export -s ./website -b ./website/build
///
/// # With an options file
/// post_export -s ./website -b ./website/build -c export.yml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Site directory containing the article sources
    #[arg(short, long, env = "SITE_DIR")]
    pub site_dir: PathBuf,

    /// Build output directory containing the rendered pages
    #[arg(short, long, env = "BUILD_DIR")]
    pub build_dir: PathBuf,

    /// Optional path to the export options file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "post_export",
            "--site-dir",
            "./website",
            "--build-dir",
            "./website/build",
        ]);

        assert_eq!(cli.site_dir, PathBuf::from("./website"));
        assert_eq!(cli.build_dir, PathBuf::from("./website/build"));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "post_export",
            "-s",
            "/tmp/site",
            "-b",
            "/tmp/build",
            "-c",
            "/tmp/export.yml",
        ]);

        assert_eq!(cli.site_dir, PathBuf::from("/tmp/site"));
        assert_eq!(cli.build_dir, PathBuf::from("/tmp/build"));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/export.yml")));
    }
}
