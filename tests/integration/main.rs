//! Integration tests for the tally binary

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Nothing listens on the discard port
    const DEAD_API: &str = "http://127.0.0.1:9";

    struct Env {
        dir: TempDir,
    }

    impl Env {
        fn new() -> Self {
            Self {
                dir: TempDir::new().unwrap(),
            }
        }

        fn config_path(&self) -> PathBuf {
            self.dir.path().join("config").join("config.toml")
        }

        fn token_path(&self) -> PathBuf {
            self.dir.path().join("token.json")
        }

        /// Config pinned to the temp dir, pointing at a dead API
        fn write_config(&self) {
            let config = format!(
                "[api]\nbase_url = \"{}\"\ntimeout_secs = 2\n\n[session]\ncredential_file = \"{}\"\n",
                DEAD_API,
                self.token_path().display()
            );
            std::fs::create_dir_all(self.config_path().parent().unwrap()).unwrap();
            std::fs::write(self.config_path(), config).unwrap();
        }

        fn tally(&self) -> Command {
            let mut cmd = cargo_bin_cmd!("tally");
            cmd.env("HOME", self.dir.path())
                .env("XDG_CONFIG_HOME", self.dir.path().join("xdg-config"))
                .env("XDG_STATE_HOME", self.dir.path().join("xdg-state"))
                .env("XDG_DATA_HOME", self.dir.path().join("xdg-data"))
                .env("CI", "1")
                .env_remove("TALLY_API_URL")
                .env_remove("RUST_LOG")
                .env("TALLY_CONFIG", self.config_path());
            cmd
        }
    }

    #[test]
    fn help_displays() {
        Env::new()
            .tally()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("personal finance"));
    }

    #[test]
    fn version_displays() {
        Env::new()
            .tally()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("tally"));
    }

    #[test]
    fn config_path() {
        let env = Env::new();
        env.tally()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show_defaults() {
        Env::new()
            .tally()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[api]"))
            .stdout(predicate::str::contains("http://localhost:8000"));
    }

    #[test]
    fn config_set_then_show() {
        let env = Env::new();
        env.tally()
            .args(["config", "set", "api.base_url", "https://finance.example.com"])
            .assert()
            .success();

        env.tally()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("https://finance.example.com"));
    }

    #[test]
    fn config_set_unknown_key() {
        Env::new()
            .tally()
            .args(["config", "set", "vm.name", "x"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }

    #[test]
    fn api_url_flag_overrides_config() {
        let env = Env::new();
        env.write_config();
        env.tally()
            .args(["--api-url", "https://other.example.com/", "config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("https://other.example.com\""));
    }

    #[test]
    fn status_when_logged_out() {
        let env = Env::new();
        env.write_config();
        env.tally()
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("not logged in"));
    }

    #[test]
    fn protected_commands_need_login() {
        let env = Env::new();
        env.write_config();
        for args in [
            vec!["categories", "list"],
            vec!["transactions", "list"],
            vec!["summary"],
            vec!["sync"],
        ] {
            env.tally()
                .args(&args)
                .assert()
                .failure()
                .stderr(predicate::str::contains("Not logged in"))
                .stderr(predicate::str::contains("tally login"));
        }
    }

    #[test]
    fn logout_when_logged_out() {
        let env = Env::new();
        env.write_config();
        env.tally()
            .arg("logout")
            .assert()
            .success()
            .stdout(predicate::str::contains("Not logged in"));
    }

    #[test]
    fn login_requires_password_source() {
        let env = Env::new();
        env.write_config();
        env.tally()
            .args(["login", "--email", "a@b.com"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--password-stdin"));
    }

    #[test]
    fn login_unreachable_api() {
        let env = Env::new();
        env.write_config();
        env.tally()
            .args(["login", "--email", "a@b.com", "--password-stdin"])
            .write_stdin("secret\n")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Network error"));

        assert!(!env.token_path().exists());
    }

    #[test]
    fn network_failure_keeps_stored_session() {
        let env = Env::new();
        env.write_config();
        std::fs::write(
            env.token_path(),
            r#"{"token":"T1","saved_at":"2024-05-01T12:00:00Z"}"#,
        )
        .unwrap();

        env.tally()
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("logged in"))
            .stdout(predicate::str::contains("not logged in").not());

        env.tally().arg("sync").assert().failure();
        assert!(env.token_path().exists());
    }

    #[test]
    fn logout_removes_stored_session() {
        let env = Env::new();
        env.write_config();
        std::fs::write(
            env.token_path(),
            r#"{"token":"T1","saved_at":"2024-05-01T12:00:00Z"}"#,
        )
        .unwrap();

        env.tally()
            .arg("logout")
            .assert()
            .success()
            .stdout(predicate::str::contains("Logged out"));
        assert!(!env.token_path().exists());
    }

    #[test]
    fn rejects_non_positive_amount() {
        Env::new()
            .tally()
            .args(["transactions", "add", "Lunch", "0", "--category", "1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("positive"));
    }

    #[test]
    fn completions_for_bash() {
        Env::new()
            .tally()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("tally"));
    }
}
