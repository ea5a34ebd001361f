//! Integration tests for daggers

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use sha2::{Digest, Sha256};
    use tempfile::TempDir;

    /// Command isolated from the user's global config
    fn daggers(home: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("daggers");
        cmd.env("DAGGERS_CONFIG", home.path().join("config.toml"))
            .env_remove("DAGGERS_ENGINE")
            .env_remove("RUST_LOG");
        cmd
    }

    #[test]
    fn help_displays() {
        let home = TempDir::new().unwrap();
        daggers(&home)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("containerized CI helpers"))
            .stdout(predicate::str::contains("precommit"))
            .stdout(predicate::str::contains("svu"));
    }

    #[test]
    fn version_displays() {
        let home = TempDir::new().unwrap();
        daggers(&home)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("daggers"));
    }

    #[test]
    fn svu_help_lists_toggles() {
        let home = TempDir::new().unwrap();
        daggers(&home)
            .args(["svu", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--no-metadata"))
            .stdout(predicate::str::contains("--tag-mode"))
            .stdout(predicate::str::contains("prerelease"));
    }

    #[test]
    fn cache_key_hashes_precommit_config() {
        let home = TempDir::new().unwrap();
        let repo = TempDir::new().unwrap();
        let content = "repos: []\n";
        std::fs::write(repo.path().join(".pre-commit-config.yaml"), content).unwrap();

        let expected = format!("pre-commit-{}\n", hex::encode(Sha256::digest(content)));
        daggers(&home)
            .arg("-C")
            .arg(repo.path())
            .arg("cache-key")
            .assert()
            .success()
            .stdout(expected);
    }

    #[test]
    fn cache_key_changes_with_content() {
        let home = TempDir::new().unwrap();
        let repo = TempDir::new().unwrap();
        let path = repo.path().join("deps.lock");

        std::fs::write(&path, "a==1.0\n").unwrap();
        let first = daggers(&home)
            .arg("-C")
            .arg(repo.path())
            .args(["cache-key", "--prefix", "deps-", "deps.lock"])
            .output()
            .unwrap();

        std::fs::write(&path, "a==1.1\n").unwrap();
        let second = daggers(&home)
            .arg("-C")
            .arg(repo.path())
            .args(["cache-key", "--prefix", "deps-", "deps.lock"])
            .output()
            .unwrap();

        assert!(first.status.success() && second.status.success());
        assert!(String::from_utf8_lossy(&first.stdout).starts_with("deps-"));
        assert_ne!(first.stdout, second.stdout);
    }

    #[test]
    fn cache_key_missing_file() {
        let home = TempDir::new().unwrap();
        let repo = TempDir::new().unwrap();
        daggers(&home)
            .arg("-C")
            .arg(repo.path())
            .arg("cache-key")
            .assert()
            .failure()
            .stderr(predicate::str::contains(".pre-commit-config.yaml"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn config_path() {
        let home = TempDir::new().unwrap();
        daggers(&home)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show_defaults() {
        let home = TempDir::new().unwrap();
        daggers(&home)
            .args(["--no-local", "config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[general]"))
            .stdout(predicate::str::contains("engine = \"podman\""));
    }

    #[test]
    fn config_show_merges_local_file() {
        let home = TempDir::new().unwrap();
        std::fs::write(home.path().join("config.toml"), "[svu]\nprefix = \"v\"\n").unwrap();
        let repo = TempDir::new().unwrap();
        std::fs::write(
            repo.path().join(".daggers.toml"),
            "[runtime]\nengine = \"docker\"\n\n[svu]\npattern = \"v*\"\n",
        )
        .unwrap();

        daggers(&home)
            .arg("-C")
            .arg(repo.path())
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("engine = \"docker\""))
            .stdout(predicate::str::contains("prefix = \"v\""))
            .stdout(predicate::str::contains("pattern = \"v*\""));
    }

    #[test]
    fn no_local_skips_local_file() {
        let home = TempDir::new().unwrap();
        let repo = TempDir::new().unwrap();
        std::fs::write(repo.path().join(".daggers.toml"), "[runtime]\nengine = \"docker\"\n").unwrap();

        daggers(&home)
            .arg("-C")
            .arg(repo.path())
            .args(["--no-local", "config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("engine = \"podman\""));
    }

    #[test]
    fn relative_workdir_finds_config_above_current_dir() {
        let home = TempDir::new().unwrap();
        let outer = TempDir::new().unwrap();
        std::fs::write(outer.path().join(".daggers.toml"), "[runtime]\nengine = \"docker\"\n").unwrap();
        std::fs::create_dir_all(outer.path().join("work").join("repo")).unwrap();

        daggers(&home)
            .current_dir(outer.path().join("work"))
            .args(["-C", "repo", "config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("engine = \"docker\""));
    }

    #[test]
    fn relative_workdir_ignores_unrelated_current_dir() {
        let home = TempDir::new().unwrap();
        let outer = TempDir::new().unwrap();
        let work = outer.path().join("work");
        std::fs::create_dir_all(&work).unwrap();
        std::fs::create_dir_all(outer.path().join("other")).unwrap();
        std::fs::write(work.join(".daggers.toml"), "[runtime]\nengine = \"docker\"\n").unwrap();

        daggers(&home)
            .current_dir(&work)
            .args(["-C", "../other", "config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("engine = \"podman\""));
    }

    #[test]
    fn invalid_config_is_reported() {
        let home = TempDir::new().unwrap();
        std::fs::write(home.path().join("config.toml"), "[svu]\nbuild = \"yes\"\n").unwrap();

        daggers(&home)
            .args(["--no-local", "config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[test]
    fn missing_engine_fails_with_hint() {
        let home = TempDir::new().unwrap();
        let repo = TempDir::new().unwrap();
        daggers(&home)
            .arg("-C")
            .arg(repo.path())
            .args(["--no-local", "--engine", "daggers-no-such-engine", "svu"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Container engine not found"))
            .stderr(predicate::str::contains("--engine docker"));
    }

    #[test]
    fn completions_bash() {
        let home = TempDir::new().unwrap();
        daggers(&home)
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("daggers"));
    }

    #[test]
    fn unknown_svu_command_rejected() {
        let home = TempDir::new().unwrap();
        daggers(&home).args(["svu", "sideways"]).assert().failure();
    }
}

mod pipeline_tests {
    use async_trait::async_trait;
    use daggers::error::DaggersResult;
    use daggers::orchestration::{ContainerRuntime, ContainerSpec, ExecOutput, Runtime};
    use daggers::tools::{precommit, svu};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use tokio_util::sync::CancellationToken;

    /// Backend answering every exec with a fixed stdout
    #[derive(Default)]
    struct Recorder {
        stdout: String,
        calls: Mutex<Vec<(String, Vec<String>)>>,
    }

    #[async_trait]
    impl ContainerRuntime for Recorder {
        async fn ensure_ready(&self) -> DaggersResult<()> {
            Ok(())
        }

        async fn exec(
            &self,
            spec: &ContainerSpec,
            args: &[String],
            _cancel: &CancellationToken,
        ) -> DaggersResult<ExecOutput> {
            self.calls
                .lock()
                .unwrap()
                .push((spec.image().to_string(), args.to_vec()));
            Ok(ExecOutput {
                stdout: self.stdout.clone(),
                ..ExecOutput::default()
            })
        }

        fn runtime_name(&self) -> &'static str {
            "Recorder"
        }
    }

    #[tokio::test]
    async fn svu_runs_both_phases() {
        let backend = Arc::new(Recorder {
            stdout: "v0.4.0\n".to_string(),
            ..Recorder::default()
        });
        let runtime = Runtime::new(backend.clone(), "/repo");

        let output = svu::run(
            &CancellationToken::new(),
            &runtime,
            &[svu::with_prefix("v"), svu::with_build(false)],
        )
        .await
        .unwrap();
        runtime.close().await.unwrap();

        assert_eq!(output.version, "v0.4.0");
        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, "ghcr.io/caarlos0/svu:v1.9.0");
        assert!(calls[0].1.contains(&"--no-build".to_string()));
        assert_eq!(calls[1].1.last().map(String::as_str), Some("--strip-prefix"));
    }

    #[tokio::test]
    async fn precommit_runs_in_base_image() {
        let repo = TempDir::new().unwrap();
        std::fs::write(repo.path().join(".pre-commit-config.yaml"), "repos: []\n").unwrap();

        let backend = Arc::new(Recorder {
            stdout: "All hooks passed\n".to_string(),
            ..Recorder::default()
        });
        let runtime = Runtime::new(backend.clone(), repo.path());

        let output = precommit::run(
            &CancellationToken::new(),
            &runtime,
            &[precommit::with_base_image("python:3.12-slim")],
        )
        .await
        .unwrap();
        runtime.close().await.unwrap();

        assert_eq!(output, "All hooks passed\n");
        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "python:3.12-slim");
    }
}
