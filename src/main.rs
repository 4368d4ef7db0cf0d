use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use helium_updater::config::UpdateConfig;
use helium_updater::manifest::VersionManifest;
use helium_updater::provider::{DEFAULT_API_URL, RepoId};
use helium_updater::runtime::RealRuntime;
use helium_updater::updater::{
    DEFAULT_REPO_NAME, DEFAULT_REPO_OWNER, InstallOutcome, ReleaseInfo, UpdateChecker,
};
use std::io::Write;
use std::path::{Path, PathBuf};

/// helium-updater - Helium browser update checker
///
/// Checks GitHub for a newer Helium release and, on request, downloads and
/// installs it.
///
/// If the GITHUB_TOKEN environment variable is set, it will be used for authentication.
///
/// Examples:
///   helium-updater 1.0.0.0                # Check for a newer release
///   helium-updater --install 1.0.0.0      # Download and install it silently
///   helium-updater --manifest version_manifest.json --json
#[derive(Parser, Debug)]
#[command(author, version = env!("HELIUM_UPDATER_VERSION"), about)]
struct Cli {
    /// Currently installed version (defaults to the manifest's version)
    #[arg(value_name = "CURRENT_VERSION")]
    current_version: Option<String>,

    /// The GitHub repository in the format "owner/repo"
    #[arg(long, value_name = "OWNER/REPO")]
    repo: Option<String>,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", value_name = "URL")]
    api_url: Option<String>,

    /// Update configuration file (defaults to <config dir>/helium/update_config.json)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Build-time version manifest
    #[arg(long, value_name = "PATH")]
    manifest: Option<PathBuf>,

    /// Download the update and print where it was saved
    #[arg(long, conflicts_with = "install")]
    download: bool,

    /// Download and silently install the update
    #[arg(long)]
    install: bool,

    /// Print the update as JSON
    #[arg(long)]
    json: bool,
}

/// Where to look for releases, after applying CLI > manifest > config > defaults.
#[derive(Debug, PartialEq)]
struct Target {
    repo: RepoId,
    api_url: String,
}

fn resolve_target(
    cli: &Cli,
    manifest: Option<&VersionManifest>,
    config: &UpdateConfig,
) -> Result<Target> {
    let servers = manifest
        .map(|m| &m.update_server)
        .into_iter()
        .chain(std::iter::once(&config.update_server));

    let repo = match cli.repo.as_deref() {
        Some(repo) => repo.parse::<RepoId>()?,
        None => servers
            .clone()
            .find_map(|server| server.repo())
            .unwrap_or_else(|| RepoId::new(DEFAULT_REPO_OWNER, DEFAULT_REPO_NAME)),
    };

    let api_url = cli
        .api_url
        .clone()
        .or_else(|| servers.filter_map(|server| server.api_url.clone()).next())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    Ok(Target { repo, api_url })
}

fn print_release(info: &ReleaseInfo) {
    println!("New version available: {}", info.version);
    println!("Architecture: {}", info.architecture);
    if let Some(installer) = &info.installer {
        println!("Installer: {}", installer.name);
    }
    if let Some(archive) = &info.archive {
        println!("Package: {}", archive.name);
    }
    if let Some(url) = &info.release_url {
        println!("Release URL: {}", url);
    }
}

/// Status line after the check. Goes to stderr in JSON mode so stdout holds
/// only the JSON document.
fn report(json: bool, line: &str) {
    if json {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }
}

fn print_progress(done: u64, total: u64) {
    let percent = done.saturating_mul(100) / total.max(1);
    eprint!("\rDownloading: {:>3}% ({}/{} bytes)", percent, done, total);
    let _ = std::io::stderr().flush();
}

fn exit_with_usage(message: &str) -> ! {
    eprintln!("error: {}\n", message);
    eprintln!("{}", Cli::command().render_usage());
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;

    let manifest = cli
        .manifest
        .as_deref()
        .map(|path| VersionManifest::load(&runtime, path))
        .transpose()?;
    let config = UpdateConfig::load_or_default(&runtime, cli.config.as_deref())?;

    let Some(current_version) = cli
        .current_version
        .clone()
        .or_else(|| manifest.as_ref().map(|m| m.version.clone()))
    else {
        exit_with_usage("the current version is required (pass CURRENT_VERSION or --manifest)");
    };

    let target = resolve_target(&cli, manifest.as_ref(), &config)?;
    let checker = UpdateChecker::new(
        runtime,
        &current_version,
        target.repo,
        Some(target.api_url.as_str()),
    )
    .context("Failed to create update checker")?;

    if !cli.json {
        println!("Checking for updates (current version: {})...", current_version);
    }

    let update = checker.check_for_updates().await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&update)?);
    } else {
        match &update {
            Some(info) => print_release(info),
            None => println!("No updates available"),
        }
    }

    let Some(info) = update else {
        return Ok(());
    };
    if !cli.download && !cli.install {
        return Ok(());
    }

    let mut on_progress = print_progress;
    let downloaded = checker.download_update(&info, Some(&mut on_progress)).await;
    eprintln!();

    let Some(path) = downloaded else {
        eprintln!("Download failed");
        std::process::exit(1);
    };

    if cli.download {
        report(cli.json, &format!("Downloaded to: {}", path.display()));
        return Ok(());
    }

    let outcome = checker.install(&path).await;
    finish_install(&checker, &path, outcome, cli.json);
    Ok(())
}

fn finish_install(
    checker: &UpdateChecker<RealRuntime>,
    path: &Path,
    outcome: InstallOutcome,
    json: bool,
) {
    match outcome {
        InstallOutcome::Succeeded => {
            checker.cleanup_download(path);
            report(json, "Update installed");
        }
        InstallOutcome::ManualInstallRequired => {
            eprintln!("Installation failed: {}", outcome);
            eprintln!("Archive kept at: {}", path.display());
            std::process::exit(1);
        }
        _ => {
            checker.cleanup_download(path);
            eprintln!("Installation failed: {}", outcome);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helium_updater::config::UpdateServer;

    fn server(owner: &str, name: &str, api_url: Option<&str>) -> UpdateServer {
        UpdateServer {
            kind: Some("github_releases".into()),
            repo_owner: Some(owner.into()),
            repo_name: Some(name.into()),
            api_url: api_url.map(String::from),
        }
    }

    fn manifest(update_server: UpdateServer) -> VersionManifest {
        VersionManifest {
            version: "1.0.1.0".into(),
            build_time: 0,
            chromium_version: None,
            helium_version_parts: Default::default(),
            update_server,
        }
    }

    #[test]
    fn test_cli_version_parsing() {
        let cli = Cli::try_parse_from(["helium-updater", "1.0.0.0"]).unwrap();
        assert_eq!(cli.current_version.as_deref(), Some("1.0.0.0"));
        assert!(!cli.download && !cli.install && !cli.json);
    }

    #[test]
    fn test_cli_without_version_parses() {
        let cli = Cli::try_parse_from(["helium-updater", "--manifest", "m.json"]).unwrap();
        assert_eq!(cli.current_version, None);
        assert_eq!(cli.manifest, Some(PathBuf::from("m.json")));
    }

    #[test]
    fn test_cli_flags_parsing() {
        let cli = Cli::try_parse_from([
            "helium-updater",
            "--repo",
            "owner/repo",
            "--api-url",
            "http://localhost:8080",
            "--install",
            "--json",
            "1.0",
        ])
        .unwrap();
        assert_eq!(cli.repo.as_deref(), Some("owner/repo"));
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:8080"));
        assert!(cli.install && cli.json);
    }

    #[test]
    fn test_cli_download_conflicts_with_install() {
        let result = Cli::try_parse_from(["helium-updater", "--download", "--install", "1.0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_defaults() {
        let cli = Cli::try_parse_from(["helium-updater", "1.0"]).unwrap();
        let target = resolve_target(&cli, None, &UpdateConfig::default()).unwrap();
        assert_eq!(target.repo, RepoId::new("imputnet", "helium-windows"));
        assert_eq!(target.api_url, "https://api.github.com");
    }

    #[test]
    fn test_resolve_manifest_over_config() {
        let cli = Cli::try_parse_from(["helium-updater", "1.0"]).unwrap();
        let config = UpdateConfig {
            update_server: server("config", "repo", Some("http://config")),
        };
        let manifest = manifest(server("manifest", "repo", None));

        let target = resolve_target(&cli, Some(&manifest), &config).unwrap();
        assert_eq!(target.repo, RepoId::new("manifest", "repo"));
        assert_eq!(target.api_url, "http://config");
    }

    #[test]
    fn test_resolve_cli_over_everything() {
        let cli = Cli::try_parse_from([
            "helium-updater",
            "--repo",
            "cli/repo",
            "--api-url",
            "http://cli",
            "1.0",
        ])
        .unwrap();
        let config = UpdateConfig {
            update_server: server("config", "repo", Some("http://config")),
        };
        let manifest = manifest(server("manifest", "repo", Some("http://manifest")));

        let target = resolve_target(&cli, Some(&manifest), &config).unwrap();
        assert_eq!(target.repo, RepoId::new("cli", "repo"));
        assert_eq!(target.api_url, "http://cli");
    }

    #[test]
    fn test_resolve_rejects_bad_repo() {
        let cli = Cli::try_parse_from(["helium-updater", "--repo", "no-slash", "1.0"]).unwrap();
        assert!(resolve_target(&cli, None, &UpdateConfig::default()).is_err());
    }
}
