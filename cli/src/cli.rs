//! CLI argument definitions for `connect-packager`.

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser};

/// Build a Magento Connect package archive from a connect descriptor.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "connect-packager")]
#[command(version, about)]
#[command(long_about = concat!(
    "Build a Magento Connect package archive from a connect descriptor.\n\n",
    "The descriptor names the extension, its authors and the content rules that ",
    "select files from the working tree. The tool fingerprints every selected ",
    "file, writes package.xml and packs both into <name>-<version>.tgz.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Package from the current Magento root:\n",
    "    $ connect-packager var/connect/Foo_Bar.xml\n\n",
    "  Package another working tree and print a JSON summary:\n",
    "    $ connect-packager --base-dir /srv/magento --json Foo_Bar.xml\n\n",
    "Settings may also be read from connect-packager.toml in the current directory.",
))]
pub struct Cli {
    /// Path to the connect descriptor XML file.
    #[arg(value_name = "DESCRIPTOR")]
    pub descriptor: Option<Utf8PathBuf>,

    /// Magento working tree [default: current directory].
    ///
    /// The tree is not inferred from the location of the binary; run from the
    /// Magento root or pass this flag (or `base_dir` in the configuration).
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<Utf8PathBuf>,

    /// Archive path [default: <base-dir>/build/<name>-<version>.tgz].
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<Utf8PathBuf>,

    /// Configuration file [default: ./connect-packager.toml when present].
    #[arg(long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Print a JSON summary instead of a human-readable line.
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use rstest::rstest;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn descriptor_is_optional() {
        let cli = Cli::try_parse_from(["connect-packager"]).expect("parse");
        assert!(cli.descriptor.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[rstest]
    #[case::none(&[], 0)]
    #[case::one(&["-v"], 1)]
    #[case::stacked(&["-vvv"], 3)]
    #[case::repeated(&["-v", "--verbose"], 2)]
    fn verbose_counts_occurrences(#[case] flags: &[&str], #[case] expected: u8) {
        let args = std::iter::once("connect-packager").chain(flags.iter().copied());
        let cli = Cli::try_parse_from(args).expect("parse");
        assert_eq!(cli.verbose, expected);
    }

    #[test]
    fn parses_all_options() {
        let cli = Cli::try_parse_from([
            "connect-packager",
            "--base-dir",
            "/srv/magento",
            "-o",
            "dist/out.tgz",
            "--config",
            "packager.toml",
            "--json",
            "Foo_Bar.xml",
        ])
        .expect("parse");
        assert_eq!(cli.descriptor.as_deref(), Some(Utf8Path::new("Foo_Bar.xml")));
        assert_eq!(cli.base_dir.as_deref(), Some(Utf8Path::new("/srv/magento")));
        assert_eq!(cli.output.as_deref(), Some(Utf8Path::new("dist/out.tgz")));
        assert_eq!(cli.config.as_deref(), Some(Utf8Path::new("packager.toml")));
        assert!(cli.json);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["connect-packager", "-q", "-v", "Foo_Bar.xml"]);
        assert!(result.is_err());
    }
}
