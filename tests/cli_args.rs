use install_cert::cli::Cli;
use install_cert::config::Settings;
use install_cert::models::ConnectionTarget;
use std::path::PathBuf;

fn cli(target: &str) -> Cli {
    Cli {
        target: target.to_string(),
        passphrase: None,
        config: None,
        store: None,
        output: None,
        timeout: None,
        verbose: false,
        no_color: false,
    }
}

#[test]
fn test_default_port_comes_from_settings() {
    let mut settings = Settings::default();
    settings.tls.default_port = 8443;
    assert_eq!(
        cli("internal.example.com").connection_target(&settings).unwrap(),
        ConnectionTarget::new("internal.example.com", 8443)
    );
}

#[test]
fn test_ipv6_target() {
    let target = cli("[::1]:9443")
        .connection_target(&Settings::default())
        .unwrap();
    assert_eq!(target, ConnectionTarget::new("::1", 9443));
    assert_eq!(target.to_string(), "[::1]:9443");
    assert_eq!(target.alias_for(0), "::1-1");
}

#[test]
fn test_bad_port_rejected() {
    let settings = Settings::default();
    assert!(cli("example.com:0").connection_target(&settings).is_err());
    assert!(cli("example.com:https").connection_target(&settings).is_err());
    assert!(cli("example.com:70000").connection_target(&settings).is_err());
}

#[test]
fn test_store_override_skips_search() {
    let mut settings = Settings::default();
    let cli = Cli {
        store: Some(PathBuf::from("/etc/pki/truststore.p12")),
        passphrase: Some("hunter2".to_string()),
        ..cli("example.com")
    };
    cli.apply_overrides(&mut settings).unwrap();
    assert_eq!(
        settings.store.path,
        Some(PathBuf::from("/etc/pki/truststore.p12"))
    );
    assert_eq!(settings.store.passphrase, "hunter2");
    assert_eq!(settings.store.output, PathBuf::from("jssecacerts"));
}

#[test]
fn test_no_overrides_keep_settings() {
    let mut settings = Settings::default();
    let before = settings.clone();
    cli("example.com").apply_overrides(&mut settings).unwrap();
    assert_eq!(settings.store.path, before.store.path);
    assert_eq!(settings.tls.connect_timeout_secs, before.tls.connect_timeout_secs);
}
