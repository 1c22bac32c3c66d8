//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

use std::path::Path;

use assert_cmd::Command;

/// 在隔离的工作目录中运行，避免读到外部的配置文件和环境变量
fn assetrev(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.current_dir(workdir)
        .env("HOME", workdir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("ASSETREV_LOG_LEVEL")
        .env_remove("ASSETREV_FILENAME")
        .env_remove("ASSETREV_SERVER_IP")
        .env_remove("ASSETREV_PORT")
        .env_remove("ASSETREV_TIMEOUT")
        .env_remove("ASSETREV_HASH")
        .env_remove("ASSETREV_BASE_URL");
    cmd
}

#[cfg(test)]
mod passing {
    use std::fs;

    use tempfile::TempDir;

    use super::assetrev;
    use crate::common::{Route, StubServer};

    #[test]
    fn print_env_docs() {
        let dir = TempDir::new().unwrap();
        let output = assetrev(dir.path()).arg("--env-docs").output().unwrap();

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("ASSETREV_TIMEOUT"));
        assert!(stdout.contains("ASSETREV_SERVER_IP"));
    }

    #[test]
    fn write_default_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("assetrev.toml");

        assetrev(dir.path())
            .arg("--write-config")
            .arg(&config_path)
            .assert()
            .success();

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains(r#"filename = "{name}-{hash}.{ext}""#));
        assert!(content.contains("timeout = 2000"));
        assert!(content.contains(r#"hash = "md5""#));
    }

    #[test]
    fn document_without_markers_is_written_unchanged() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("page.html"),
            "<html><head>\n<script src=\"/app.js\"></script>\n</head><body></body></html>\n",
        )
        .unwrap();

        assetrev(dir.path()).arg("page.html").assert().success();

        assert_eq!(
            fs::read_to_string(dir.path().join("dist/page.html")).unwrap(),
            r#"<html><head><script src="/app.js"></script></head><body></body></html>"#
        );
    }

    #[test]
    fn stdin_input_uses_output_name() {
        let dir = TempDir::new().unwrap();

        assetrev(dir.path())
            .args(["-", "-o", "out", "-n", "home.html"])
            .write_stdin("<p>hi</p>")
            .assert()
            .success();

        assert_eq!(
            fs::read_to_string(dir.path().join("out/home.html")).unwrap(),
            "<p>hi</p>"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn revisioned_assets_are_written() {
        let server = StubServer::start(&[("/app.css", Route::ok("body{color:red}"))]).await;
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("index.html"),
            format!(
                r#"<html><head><link rel="stylesheet" href="{}" rev></head></html>"#,
                server.url("/app.css")
            ),
        )
        .unwrap();

        let mut cmd = assetrev(dir.path());
        cmd.args(["index.html", "-p", "/static/", "--hash", "sha256"]);
        let output = tokio::task::spawn_blocking(move || cmd.output())
            .await
            .unwrap()
            .unwrap();

        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
        assert_eq!(
            fs::read_to_string(dir.path().join("dist/app-15c42ab7.css")).unwrap(),
            "body{color:red}"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("dist/index.html")).unwrap(),
            r#"<html><head><link rel="stylesheet" href="/static/app-15c42ab7.css"></head></html>"#
        );
    }
}

//  ███████╗ █████╗ ██╗██╗     ██╗███╗   ██╗ ██████╗
//  ██╔════╝██╔══██╗██║██║     ██║████╗  ██║██╔════╝
//  █████╗  ███████║██║██║     ██║██╔██╗ ██║██║  ███╗
//  ██╔══╝  ██╔══██║██║██║     ██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║██║███████╗██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚═╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod failing {
    use std::fs;

    use tempfile::TempDir;

    use super::assetrev;
    use crate::common::{Route, StubServer};

    #[test]
    fn missing_input_file() {
        let dir = TempDir::new().unwrap();
        let output = assetrev(dir.path()).arg("nope.html").output().unwrap();

        assert_eq!(output.status.code(), Some(1));
        assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read \"nope.html\""));
    }

    #[test]
    fn invalid_config_value() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("page.html"), "<p>hi</p>").unwrap();

        let output = assetrev(dir.path())
            .args(["page.html", "--timeout", "0"])
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(1));
        assert!(String::from_utf8_lossy(&output.stderr).contains("timeout must be between"));
        assert!(!dir.path().join("dist").exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn failed_fetch_writes_nothing() {
        let server = StubServer::start(&[]).await;
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("index.html"),
            format!(r#"<html><head><script src="{}" rev></script></head></html>"#, server.url("/gone.js")),
        )
        .unwrap();

        let mut cmd = assetrev(dir.path());
        cmd.arg("index.html");
        let output = tokio::task::spawn_blocking(move || cmd.output())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(output.status.code(), Some(1));
        assert!(String::from_utf8_lossy(&output.stderr).contains("failed to fetch"));
        assert!(!dir.path().join("dist/index.html").exists());
    }
}
