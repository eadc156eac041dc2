//! Tests for CLI argument parsing.

use clap::Parser;
use tempfile::TempDir;

use super::cli::{Cli, Command};
use super::defaults::BuildDefaults;
use super::{ConfigError, Settings};

fn settings() -> Settings {
    Settings::with_defaults(BuildDefaults {
        state_dir: "/var/lib/test-state",
        cert_path: "/etc/test/cert.pem",
        format_id: None,
        version_url: None,
        content_url: None,
    })
}

mod parsing {
    use super::*;

    #[test]
    fn parse_info_with_overrides() {
        let cli = Cli::parse_from_iter([
            "osupdate",
            "-p",
            "/srv/image",
            "-S",
            "/var/state",
            "-F",
            "staging",
            "-v",
            "https://v.example.com",
            "-c",
            "https://c.example.com",
            "info",
        ]);

        assert_eq!(cli.path.as_deref(), Some("/srv/image"));
        assert_eq!(cli.state_dir.as_deref(), Some("/var/state"));
        assert_eq!(cli.format.as_deref(), Some("staging"));
        assert_eq!(cli.version_url.as_deref(), Some("https://v.example.com"));
        assert_eq!(cli.content_url.as_deref(), Some("https://c.example.com"));
        assert!(matches!(cli.command, Command::Info { json: false }));
    }

    #[test]
    fn parse_long_option_names() {
        let cli = Cli::parse_from_iter([
            "osupdate",
            "--statedir",
            "/s",
            "--versionurl",
            "v",
            "--contenturl",
            "c",
            "--certpath",
            "/cert.pem",
            "--time",
            "--verbose",
            "info",
            "--json",
        ]);

        assert_eq!(cli.state_dir.as_deref(), Some("/s"));
        assert_eq!(cli.cert_path.as_deref(), Some("/cert.pem"));
        assert!(cli.time);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Info { json: true }));
    }

    #[test]
    fn parse_hashdump() {
        let cli = Cli::parse_from_iter(["osupdate", "hashdump", "-n", "-p", "/mnt", "/usr/bin/ls"]);

        match cli.command {
            Command::HashDump(args) => {
                assert!(args.no_xattrs);
                assert_eq!(args.path.as_deref(), Some("/mnt"));
                assert_eq!(args.filename.to_str(), Some("/usr/bin/ls"));
            }
            other @ Command::Info { .. } => panic!("Expected HashDump, got {other:?}"),
        }
    }

    #[test]
    fn hashdump_requires_filename() {
        let result = Cli::try_parse_from(["osupdate", "hashdump"]);
        assert!(result.is_err());
    }

    #[test]
    fn subcommand_is_required() {
        let result = Cli::try_parse_from(["osupdate"]);
        assert!(result.is_err());
    }
}

mod overrides {
    use super::*;

    #[test]
    fn url_sets_both_and_wins_over_specific_urls() {
        let cli = Cli::parse_from_iter([
            "osupdate",
            "-u",
            "https://both.example.com",
            "-v",
            "https://v.example.com",
            "info",
        ]);
        let mut settings = settings();

        cli.apply_overrides(&mut settings).unwrap();

        assert_eq!(settings.version_url(), Some("https://both.example.com"));
        assert_eq!(settings.content_url(), Some("https://both.example.com"));
    }

    #[test]
    fn path_and_state_dir_are_applied() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_str().unwrap().to_string();
        let cli = Cli::parse_from_iter(["osupdate", "-p", root.as_str(), "-S", "/state", "info"]);
        let mut settings = settings();

        cli.apply_overrides(&mut settings).unwrap();

        assert_eq!(settings.path_prefix(), Some(format!("{root}/").as_str()));
        assert_eq!(settings.state_dir(), Some("/state"));
    }

    #[test]
    fn invalid_format_is_reported() {
        let cli = Cli::parse_from_iter(["osupdate", "-F", "0", "info"]);
        let mut settings = settings();

        let result = cli.apply_overrides(&mut settings);

        assert!(matches!(result, Err(ConfigError::InvalidFormat { .. })));
    }

    #[test]
    fn relative_state_dir_is_reported() {
        let cli = Cli::parse_from_iter(["osupdate", "-S", "state", "info"]);
        let mut settings = settings();

        let result = cli.apply_overrides(&mut settings);

        assert!(matches!(result, Err(ConfigError::InvalidPath { .. })));
    }

    #[test]
    fn no_overrides_leave_settings_unset() {
        let cli = Cli::parse_from_iter(["osupdate", "info"]);
        let mut settings = settings();

        cli.apply_overrides(&mut settings).unwrap();

        assert_eq!(settings.path_prefix(), None);
        assert_eq!(settings.version_url(), None);
        assert_eq!(settings.format_string(), None);
    }
}
