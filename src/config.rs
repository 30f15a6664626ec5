use std::path::PathBuf;

/// Environment variable holding comma-separated mirror entries
pub const MIRROR_ENV: &str = "G_MIRROR";

/// Environment variable overriding the home directory
pub const HOME_ENV: &str = "G_HOME";

/// Environment variable holding the log filter directive
pub const LOG_ENV: &str = "G_LOG";

/// Log filter used when `G_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Mirror entries in priority order, each a bare URL or `name|URL`
    pub mirrors: Vec<String>,
    /// Directory holding installed versions and the active symlink
    pub home: PathBuf,
    /// Target OS in Go naming
    pub os: String,
    /// Target architecture in Go naming
    pub arch: String,
}

impl Config {
    /// Reads `G_MIRROR` and `G_HOME`, targeting the host platform
    pub fn from_env() -> Self {
        from_env_with(
            std::env::var(MIRROR_ENV).ok(),
            std::env::var(HOME_ENV).ok(),
            dirs::home_dir(),
        )
    }

    /// Installed versions live in `<home>/versions/<name>`
    pub fn versions_dir(&self) -> PathBuf {
        self.home.join("versions")
    }

    /// Symlink to the version in use
    pub fn goroot(&self) -> PathBuf {
        self.home.join("go")
    }
}

fn from_env_with(
    mirror: Option<String>,
    home_env: Option<String>,
    home_dir: Option<PathBuf>,
) -> Config {
    let mirrors = mirror
        .map(|value| {
            value
                .split(',')
                .map(|entry| entry.trim().to_string())
                .filter(|entry| !entry.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let home = home_env
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".g")))
        .unwrap_or_else(|| PathBuf::from(".g"));

    Config {
        mirrors,
        home,
        os: host_os().to_string(),
        arch: host_arch().to_string(),
    }
}

/// Host operating system in Go naming
pub fn host_os() -> &'static str {
    go_os(std::env::consts::OS)
}

/// Host architecture in Go naming
pub fn host_arch() -> &'static str {
    go_arch(std::env::consts::ARCH)
}

fn go_os(os: &'static str) -> &'static str {
    match os {
        "macos" => "darwin",
        other => other,
    }
}

fn go_arch(arch: &'static str) -> &'static str {
    match arch {
        "x86" => "386",
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        "loongarch64" => "loong64",
        other => other,
    }
}
