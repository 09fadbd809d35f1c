//! Integration tests for lazyproxy

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn lazyproxy() -> Command {
        let mut cmd = cargo_bin_cmd!("lazyproxy");
        cmd.env_remove("LAZYPROXY_CONFIG");
        cmd
    }

    /// Project with a `lazyproxy.toml`, one declaration and a local cache dir
    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        let services = dir.path().join("decls").join("services");
        fs::create_dir_all(&services).unwrap();
        fs::write(
            services.join("Mailer.decl"),
            r#"namespace services;

use mail.Message;

class Mailer {
    public fn send(message: Message) -> bool { return true; }
    private fn encode(message: Message) -> string { return ""; }
    public fn queue(message: Message, delay: int = 0) -> void { }
}
"#,
        )
        .unwrap();
        fs::write(
            services.join("Sealed.decl"),
            "namespace services;\nfinal class Sealed { public fn ping() -> void { } }\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("lazyproxy.toml"),
            r#"[general]
journal = true

[proxy]
cache_dir = "cache"

[sources]
roots = ["decls"]

[proxies]
MailerService = "services.Mailer"
SealedService = "services.Sealed"
Missing = "services.Nowhere"
"#,
        )
        .unwrap();
        dir
    }

    fn in_project(dir: &Path) -> Command {
        let mut cmd = lazyproxy();
        cmd.current_dir(dir);
        cmd
    }

    #[test]
    fn help_displays() {
        lazyproxy()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("lazy proxy generator"));
    }

    #[test]
    fn version_displays() {
        lazyproxy()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("lazyproxy"));
    }

    #[test]
    fn config_path_in_project() {
        let dir = project();
        in_project(dir.path())
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("lazyproxy.toml"));
    }

    #[test]
    fn config_show() {
        let dir = project();
        in_project(dir.path())
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[proxy]"))
            .stdout(predicate::str::contains("MailerService"));
    }

    #[test]
    fn explicit_missing_config_fails() {
        lazyproxy()
            .args(["--config", "/nonexistent/lazyproxy.toml", "list"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Configuration file not found"));
    }

    #[test]
    fn config_init_writes_file() {
        let dir = TempDir::new().unwrap();
        in_project(dir.path())
            .args(["config", "init"])
            .assert()
            .success();

        let written = fs::read_to_string(dir.path().join("lazyproxy.toml")).unwrap();
        assert!(written.contains("[proxies]"));
    }

    #[test]
    fn resolve_unknown_identifier_fails() {
        let dir = project();
        in_project(dir.path())
            .args(["resolve", "app.Controller"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No resolver claimed"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn resolve_generates_and_prints_path() {
        let dir = project();
        in_project(dir.path())
            .args(["resolve", "MailerService"])
            .assert()
            .success()
            .stdout(predicate::str::contains("MailerService.lazy"));

        let source = fs::read_to_string(dir.path().join("cache").join("MailerService.lazy")).unwrap();
        assert!(source.contains("class MailerService extends .services.Mailer {"));
        assert!(source.contains("public fn send(message: .mail.Message) -> bool {"));
        assert!(source.contains("public fn queue(message: .mail.Message, delay: int = 0) -> void {"));
        assert!(!source.contains("encode"));
        assert!(dir.path().join("cache").join("generation.log").exists());
    }

    #[test]
    fn show_prints_source() {
        let dir = project();
        in_project(dir.path())
            .args(["show", "SealedService"])
            .assert()
            .success()
            .stdout(predicate::str::contains("// strategy: fallback"))
            .stdout(predicate::str::contains("class SealedService {"));
    }

    #[test]
    fn inspect_json() {
        let dir = project();
        let output = in_project(dir.path())
            .args(["inspect", "MailerService", "--format", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report["classification"], "plain-class");
        assert_eq!(report["strategy"], "class");
        assert_eq!(report["cached"], false);
        assert_eq!(report["operations"].as_array().unwrap().len(), 2);
        assert!(!dir.path().join("cache").join("MailerService.lazy").exists());
    }

    #[test]
    fn missing_target_reports_hint() {
        let dir = project();
        in_project(dir.path())
            .args(["resolve", "Missing"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("services.Nowhere"));
    }

    #[test]
    fn warm_reports_failures() {
        let dir = project();
        in_project(dir.path())
            .arg("warm")
            .assert()
            .failure()
            .stderr(predicate::str::contains("1 of 3 proxies failed"));

        assert!(dir.path().join("cache").join("MailerService.lazy").exists());
        assert!(dir.path().join("cache").join("SealedService.lazy").exists());
    }

    #[test]
    fn list_and_cache_lifecycle() {
        let dir = project();
        in_project(dir.path())
            .args(["resolve", "MailerService"])
            .assert()
            .success();

        in_project(dir.path())
            .args(["list", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("MailerService"))
            .stdout(predicate::str::contains("SealedService"));

        in_project(dir.path())
            .args(["cache", "list", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("MailerService.lazy"));

        in_project(dir.path())
            .args(["cache", "clear", "--yes"])
            .assert()
            .success();

        assert!(!dir.path().join("cache").join("MailerService.lazy").exists());
    }

    #[test]
    fn cache_path_prints_dir() {
        let dir = project();
        in_project(dir.path())
            .args(["cache", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("cache"));
    }
}
