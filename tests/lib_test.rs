//! Library integration tests.

use envprobe::ProbeError;

#[test]
fn error_types_are_public() {
    let err = ProbeError::DetectorPanicked {
        detector: "WSL".into(),
    };
    assert!(err.to_string().contains("WSL"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> envprobe::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use envprobe::cli::{Cli, Commands};

    let cli = Cli::parse_from(["envprobe", "status", "--skip-bun"]);
    if let Some(Commands::Status(args)) = cli.command {
        assert!(args.skip_bun);
        assert_eq!(args.to_options().skip_bun_detection, Some(true));
    } else {
        panic!("Expected Status command");
    }
}

#[test]
fn config_layers_env_overrides() {
    use envprobe::config::RuntimeConfig;

    let config = RuntimeConfig::default().with_env_overrides(|key| match key {
        "ENVPROBE_WSL_TIMEOUT_MS" => Ok("2500".to_string()),
        _ => Err(std::env::VarError::NotPresent),
    });
    assert_eq!(config.wsl_timeout_ms, 2500);
    assert_eq!(config.probe_timeout_ms, 5000);
}

#[test]
fn config_file_round_trip() {
    use envprobe::config::RuntimeConfig;

    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("config.yml");
    std::fs::write(&path, "probe_timeout_ms: 750\ndev_mode: true\n").unwrap();

    let config = RuntimeConfig::load(Some(&path)).unwrap();
    assert_eq!(config.probe_timeout_ms, 750);
    assert!(config.dev_mode);
}

#[test]
fn bundle_targets_are_public() {
    use envprobe::platform::{bun_download_url, BundleTarget};

    assert_eq!(BundleTarget::ALL.len(), 5);
    let url = bun_download_url("1.1.30", BundleTarget::DarwinArm64);
    assert!(url.starts_with("https://github.com/oven-sh/bun/releases/download/bun-v1.1.30/"));
}

#[test]
fn wsl_parser_is_public() {
    use envprobe::detect::wsl::parse_wsl_list;

    let listing = parse_wsl_list("  NAME   STATE   VERSION\n\n");
    assert!(listing.distros.is_empty());
    assert!(listing.default_distro.is_none());
}
