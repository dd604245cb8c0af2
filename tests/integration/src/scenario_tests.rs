//! Scenario tests for config sources and upgrades
//!
//! Each test covers one situation a user hits in practice: a pipeline served
//! over HTTP, an old pipeline fixed in place, a broken sidecar next to a good
//! base.

use pretty_assertions::assert_eq;
use skiff_core::{ConfigParser, Error, parse_config, parse_single_config_file};
use skiff_schema::LATEST_VERSION;
use skiff_test_utils::{TestProject, fixtures};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Serve one HTTP response on a local port and return the URL for `path`.
fn serve_once(status: &'static str, body: &'static str, path: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut line = String::new();
        while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
            line.clear();
        }
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/yaml\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).unwrap();
    });

    format!("http://{addr}/{path}")
}

// =============================================================================
// Remote sources
// =============================================================================

#[test]
fn test_remote_pipeline_is_fetched_and_upgraded() {
    let url = serve_once("200 OK", fixtures::V1BETA2, "skiff.yaml");

    let parsed = parse_single_config_file(&url, true).unwrap();

    assert_eq!(parsed.hops.len(), 1);
    let config = parsed.document.as_latest().unwrap();
    assert_eq!(
        config.deploy.helm.as_ref().unwrap().releases[0].values_files,
        vec!["values-prod.yaml"]
    );
}

#[test]
fn test_remote_pipeline_has_no_sidecars() {
    let url = serve_once("200 OK", fixtures::V1, "skiff.yaml");

    let config = parse_config(&url, true, &["dev".to_string()]).unwrap();

    assert!(config.deploy.kubectl.is_some());
}

#[test]
fn test_remote_not_found_is_a_fetch_error() {
    let url = serve_once("404 Not Found", "", "missing.yaml");

    let err = parse_single_config_file(&url, true).unwrap_err();

    assert!(
        matches!(
            err,
            Error::Fs(skiff_fs::Error::Fetch { ref url, .. }) if url.ends_with("/missing.yaml")
        ),
        "{err:?}"
    );
}

// =============================================================================
// Fixing old pipelines
// =============================================================================

#[test]
fn test_every_fixture_version_fixes_to_latest() {
    for (name, yaml) in [
        ("v1alpha1", fixtures::V1ALPHA1),
        ("v1beta2", fixtures::V1BETA2),
        ("v1", fixtures::V1),
    ] {
        let project = TestProject::new();
        let source = project.write_config(yaml);

        ConfigParser::new()
            .fix(&source, &project.path("skiff.yaml"))
            .unwrap_or_else(|e| panic!("{name}: {e}"));

        let reparsed = parse_single_config_file(&source, false).unwrap();
        assert_eq!(reparsed.document.api_version(), LATEST_VERSION, "{name}");
    }
}

// =============================================================================
// Sidecars
// =============================================================================

#[test]
fn test_sidecar_with_conflicting_deployers_is_skipped() {
    let project = TestProject::new();
    let source = project.write_config(fixtures::V1);
    project.write_sidecar(
        "dev",
        "yaml",
        "apiVersion: skiff/v1\ndeploy:\n  helm:\n    releases: []\n  kustomize: {}\n",
    );

    let config = parse_config(&source, true, &["dev".to_string()]).unwrap();

    assert!(config.deploy.kubectl.is_some());
    assert!(config.deploy.helm.is_none());
}

#[test]
fn test_too_new_sidecar_is_skipped() {
    let project = TestProject::new();
    let source = project.write_config(fixtures::V1);
    project.write_sidecar("dev", "yml", fixtures::TOO_NEW);

    let config = parse_config(&source, true, &["dev".to_string()]).unwrap();

    assert_eq!(config, parse_config(&source, true, &[]).unwrap());
}
