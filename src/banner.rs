//! Operator-facing startup and shutdown text

use crate::config::AppState;
use std::fmt::Write;
use std::path::Path;
use tokio::fs;

/// Render the startup banner.
///
/// `network_ip` is only displayed; it does not influence the bind address.
pub async fn render(state: &AppState, port: u16, network_ip: &str) -> String {
    let update = &state.config.update;
    let network = format!("http://{network_ip}:{port}");
    let version_marker = missing_marker(&state.root, &update.version_file).await;
    let package_marker = missing_marker(&state.root, &update.package_file).await;

    let mut out = String::new();
    out.push_str("\n======================================================\n");
    out.push_str("  UPDATE SERVER\n");
    out.push_str("======================================================\n\n");
    out.push_str("Addresses:\n");
    let _ = writeln!(out, "  - Local:    http://localhost:{port}");
    let _ = writeln!(out, "  - Network:  {network}");
    let _ = writeln!(out, "  - Serving:  {}\n", state.root.display());
    out.push_str("Endpoints:\n");
    let _ = writeln!(
        out,
        "  - Version:  {network}/{}{}",
        update.version_file, version_marker
    );
    let _ = writeln!(
        out,
        "  - Download: {network}/{}{}\n",
        update.package_file, package_marker
    );
    out.push_str("Instructions:\n");
    let _ = writeln!(
        out,
        "  1. Put '{}' in the serving directory",
        update.package_file
    );
    let _ = writeln!(
        out,
        "  2. Update '{}' with the new version",
        update.version_file
    );
    let _ = writeln!(out, "  3. Point the app at: {network_ip}\n");
    out.push_str("Notes:\n");
    let _ = writeln!(out, "  - The firewall must allow connections on port {port}");
    out.push_str("  - Devices must be on the same network as this machine\n\n");
    out.push_str("Press Ctrl+C to stop the server\n");
    out.push_str("======================================================\n");
    out
}

async fn missing_marker(root: &Path, name: &str) -> &'static str {
    if fs::metadata(root.join(name)).await.is_ok_and(|m| m.is_file()) {
        ""
    } else {
        "  (missing)"
    }
}

pub async fn print(state: &AppState, port: u16, network_ip: &str) {
    println!("{}", render(state, port, network_ip).await);
}

pub fn print_stopped() {
    println!("\nServer stopped.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Overrides};

    #[tokio::test]
    async fn test_banner_lists_endpoints_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("version.json"), "{}").unwrap();
        let overrides = Overrides {
            directory: Some(dir.path().to_path_buf()),
            ..Overrides::default()
        };
        let state =
            AppState::new(Config::load_from("no-such-config-file", &overrides).unwrap()).unwrap();

        let text = render(&state, 8080, "192.168.1.20").await;
        assert!(text.contains("http://localhost:8080"));
        assert!(text.contains("http://192.168.1.20:8080/version.json\n"));
        assert!(text.contains("http://192.168.1.20:8080/app-release.apk  (missing)"));
        assert!(text.contains("Point the app at: 192.168.1.20"));
    }
}
