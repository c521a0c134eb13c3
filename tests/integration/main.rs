//! Integration tests for modelhub

mod support {
    use assert_cmd::assert::{Assert, OutputAssertExt};
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use std::path::{Path, PathBuf};

    /// Write a config file with the given artifact tables
    pub fn write_config(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("config.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    /// The binary with isolated config and cache root
    pub fn modelhub(config: &Path, root: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("modelhub");
        cmd.env_remove("MODELHUB_CONFIG")
            .env_remove("MODELHUB_ROOT")
            .env_remove("MODELHUB_REMOTE")
            .arg("--no-local")
            .arg("--config")
            .arg(config)
            .arg("--root")
            .arg(root);
        cmd
    }

    /// Run the binary off the async workers so the mock server keeps serving
    pub async fn run(mut cmd: Command) -> Assert {
        tokio::task::spawn_blocking(move || cmd.output())
            .await
            .unwrap()
            .unwrap()
            .assert()
    }

    /// "METHOD /path" for every request the server saw, in order
    pub async fn request_log(server: &wiremock::MockServer) -> Vec<String> {
        server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|r| format!("{} {}", r.method, r.url.path()))
            .collect()
    }
}

mod cli_tests {
    use super::support::{modelhub, write_config};
    use assert_cmd::cargo::cargo_bin_cmd;
    use predicates::prelude::*;
    use tempfile::TempDir;

    #[test]
    fn help_displays() {
        cargo_bin_cmd!("modelhub")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("fetch"))
            .stdout(predicate::str::contains("push"));
    }

    #[test]
    fn version_displays() {
        cargo_bin_cmd!("modelhub")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("modelhub"));
    }

    #[test]
    fn completions_print_script() {
        cargo_bin_cmd!("modelhub")
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("modelhub"));
    }

    #[test]
    fn config_path_uses_override() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("config.toml");
        modelhub(&config, temp.path())
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_init_then_show() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("conf").join("config.toml");
        modelhub(&config, temp.path())
            .args(["config", "init"])
            .assert()
            .success();
        assert!(config.exists());

        modelhub(&config, temp.path())
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[remote]"));
    }

    #[test]
    fn list_empty_cache() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "");
        modelhub(&config, &temp.path().join("cache"))
            .args(["list", "model", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[]"));
    }

    #[test]
    fn evict_missing_category_is_noop() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "");
        modelhub(&config, &temp.path().join("cache"))
            .args(["evict", "dataset", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Nothing cached"));
    }

    #[test]
    fn unknown_artifact_fails_with_hint() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "");
        modelhub(&config, temp.path())
            .args(["fetch", "model", "missing"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Artifact not found in registry: missing"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn non_zip_dataset_rejected_before_download() {
        let temp = TempDir::new().unwrap();
        let config = write_config(
            temp.path(),
            r#"
            [artifacts.bar]
            application = "audio"
            url = "http://127.0.0.1:9/bar.bin"
            dataset = "http://127.0.0.1:9/bar-data.tar.gz"
            "#,
        );
        let root = temp.path().join("cache");
        modelhub(&config, &root)
            .args(["fetch", "dataset", "bar"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unsupported archive format"));
        assert!(!root.join("dataset").exists());
    }

    #[test]
    fn registry_lists_configured_artifacts() {
        let temp = TempDir::new().unwrap();
        let config = write_config(
            temp.path(),
            r#"
            [artifacts.foo]
            application = "vision"
            url = "https://hub.example/foo.zip"
            "#,
        );
        let extra = temp.path().join("extra.json");
        std::fs::write(
            &extra,
            r#"{"bar": {"application": "audio", "url": "https://hub.example/bar.bin"}}"#,
        )
        .unwrap();

        modelhub(&config, temp.path())
            .arg("--registry")
            .arg(&extra)
            .args(["registry", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::eq("bar\nfoo\n"));
    }

    #[test]
    fn push_without_remote_fails_with_hint() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "");
        modelhub(&config, temp.path())
            .args(["push", ".", "a/b"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Remote archive URL not configured"))
            .stderr(predicate::str::contains("--remote"));
    }
}

mod fetch_tests {
    use super::support::{modelhub, request_log, run, write_config};
    use predicates::prelude::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const WEIGHTS: &[u8] = b"model-weights";

    fn model_config(dir: &std::path::Path, url: &str) -> std::path::PathBuf {
        write_config(
            dir,
            &format!(
                "[artifacts.foo]\napplication = \"vision\"\nurl = \"{}\"\n",
                url
            ),
        )
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn fetch_model_downloads_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models/weights.bin"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(WEIGHTS))
            .expect(1)
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let config = model_config(
            temp.path(),
            &format!("{}/models/weights.bin", server.uri()),
        );
        let root = temp.path().join("cache");

        let mut cmd = modelhub(&config, &root);
        cmd.args(["fetch", "model", "foo", "--format", "json"]);
        run(cmd)
            .await
            .success()
            .stdout(predicate::str::contains("\"cached\": false"));

        let payload = root.join("models/vision/foo/weights.bin");
        assert_eq!(std::fs::read(&payload).unwrap(), WEIGHTS);

        let mut cmd = modelhub(&config, &root);
        cmd.args(["fetch", "model", "foo", "--format", "json"]);
        run(cmd)
            .await
            .success()
            .stdout(predicate::str::contains("\"cached\": true"));

        assert_eq!(request_log(&server).await, vec!["GET /models/weights.bin"]);

        modelhub(&config, &root)
            .args(["list", "model", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::eq("weights.bin\n"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn fetch_large_model_is_complete() {
        let body: Vec<u8> = (0..300 * 1024).map(|i| (i % 251) as u8).collect();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models/big.bin"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let config = model_config(temp.path(), &format!("{}/models/big.bin", server.uri()));
        let root = temp.path().join("cache");

        let mut cmd = modelhub(&config, &root);
        cmd.args(["fetch", "model", "foo"]);
        run(cmd).await.success();

        let payload = root.join("models/vision/foo/big.bin");
        assert_eq!(std::fs::read(&payload).unwrap(), body);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn fetch_http_error_leaves_nothing_behind() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models/gone.bin"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let config = model_config(temp.path(), &format!("{}/models/gone.bin", server.uri()));
        let root = temp.path().join("cache");

        let mut cmd = modelhub(&config, &root);
        cmd.args(["fetch", "model", "foo"]);
        run(cmd)
            .await
            .failure()
            .stderr(predicate::str::contains("HTTP 404"));

        modelhub(&config, &root)
            .args(["list", "model", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
    }
}

mod remote_tests {
    use super::support::{modelhub, request_log, run, write_config};
    use predicates::prelude::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn accepting_archive() -> MockServer {
        let server = MockServer::start().await;
        for verb in ["MKCOL", "PUT", "DELETE"] {
            Mock::given(method(verb))
                .respond_with(ResponseTemplate::new(201))
                .mount(&server)
                .await;
        }
        server
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn push_uploads_and_removes_source() {
        let server = accepting_archive().await;
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "");
        let out = temp.path().join("out");
        std::fs::create_dir(&out).unwrap();
        std::fs::write(out.join("x.txt"), b"x").unwrap();

        let mut cmd = modelhub(&config, temp.path());
        cmd.arg("--remote")
            .arg(format!("{}/dav", server.uri()))
            .arg("push")
            .arg(&out)
            .args(["a/b", "--remove-source", "--format", "json"]);
        run(cmd)
            .await
            .success()
            .stdout(predicate::str::contains("\"removed_source\": true"));

        assert_eq!(
            request_log(&server).await,
            vec!["MKCOL /dav/a/", "MKCOL /dav/a/b/", "PUT /dav/a/b/x.txt"]
        );
        assert!(!out.exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn push_streams_large_file_with_length() {
        let server = accepting_archive().await;
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "");
        let out = temp.path().join("out");
        std::fs::create_dir(&out).unwrap();
        let body: Vec<u8> = (0..200 * 1024).map(|i| (i % 241) as u8).collect();
        std::fs::write(out.join("weights.bin"), &body).unwrap();

        let mut cmd = modelhub(&config, temp.path());
        cmd.arg("--remote")
            .arg(server.uri())
            .arg("push")
            .arg(&out)
            .args(["runs", "--format", "json"]);
        run(cmd).await.success();

        let requests = server.received_requests().await.unwrap();
        let put = requests
            .iter()
            .find(|r| r.method.as_str() == "PUT")
            .unwrap();
        assert_eq!(put.url.path(), "/runs/weights.bin");
        assert_eq!(
            put.headers.get("content-length").unwrap().to_str().unwrap(),
            body.len().to_string()
        );
        assert_eq!(put.body, body);
        assert!(out.exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn push_tolerates_existing_collections() {
        let server = MockServer::start().await;
        Mock::given(method("MKCOL"))
            .respond_with(ResponseTemplate::new(405))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/a/x.txt"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "");
        let out = temp.path().join("out");
        std::fs::create_dir(&out).unwrap();
        std::fs::write(out.join("x.txt"), b"x").unwrap();

        let mut cmd = modelhub(&config, temp.path());
        cmd.arg("--remote").arg(server.uri()).arg("push").arg(&out).arg("a");
        run(cmd).await.success();

        assert_eq!(request_log(&server).await, vec!["MKCOL /a/", "PUT /a/x.txt"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn push_reports_rejected_upload() {
        let server = MockServer::start().await;
        Mock::given(method("MKCOL"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(507))
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "");
        let out = temp.path().join("out");
        std::fs::create_dir(&out).unwrap();
        std::fs::write(out.join("x.txt"), b"x").unwrap();

        let mut cmd = modelhub(&config, temp.path());
        cmd.arg("--remote")
            .arg(server.uri())
            .arg("push")
            .arg(&out)
            .args(["a", "--remove-source"]);
        run(cmd)
            .await
            .failure()
            .stderr(predicate::str::contains("507"));
        assert!(out.join("x.txt").exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn remote_rm_issues_delete() {
        let server = accepting_archive().await;
        let temp = TempDir::new().unwrap();
        let config = write_config(
            temp.path(),
            &format!("[remote]\nbase_url = \"{}\"\n", server.uri()),
        );

        let mut cmd = modelhub(&config, temp.path());
        cmd.args(["remote-rm", "a/b"]);
        run(cmd).await.success();

        assert_eq!(request_log(&server).await, vec!["DELETE /a/b"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn remote_rm_refuses_archive_root() {
        let server = accepting_archive().await;
        let temp = TempDir::new().unwrap();
        let config = write_config(
            temp.path(),
            &format!("[remote]\nbase_url = \"{}\"\n", server.uri()),
        );

        let mut cmd = modelhub(&config, temp.path());
        cmd.args(["remote-rm", "./"]);
        run(cmd)
            .await
            .failure()
            .stderr(predicate::str::contains("archive root"));

        assert!(request_log(&server).await.is_empty());
    }
}
