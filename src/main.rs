use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gdist::collector::http::default_client;
use gdist::collector::new_collector;
use gdist::config::{Config, DEFAULT_LOG_FILTER, LOG_ENV};
use gdist::error::Error;
use gdist::local::{in_use, list_installed};
use gdist::output::{OutputFormat, render};
use gdist::version::remote::{RemoteFilter, list_remote};
use gdist::version::{Finder, PackageKind};

#[derive(Parser)]
#[command(name = "gdist")]
#[command(version, about = "Find Go distributions on the official site and its mirrors")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List installed versions
    Ls {
        #[arg(short, long, value_enum, default_value_t)]
        output: OutputFormat,
    },
    /// List remote versions available for install
    LsRemote {
        /// stable, unstable, archived, latest or a constraint such as "~1.21"
        #[arg(default_value = "")]
        filter: String,
        #[arg(short, long, value_enum, default_value_t)]
        output: OutputFormat,
    },
    /// Resolve a version expression to a release and its packages
    Find {
        /// A version ("1.21.4"), "latest" or a constraint ("^1.20", "1.18 - 1.20")
        expression: String,
        /// Target OS in Go naming (defaults to the host)
        #[arg(long)]
        os: Option<String>,
        /// Target architecture in Go naming (defaults to the host)
        #[arg(long)]
        arch: Option<String>,
        /// Package kind: archive, installer or source
        #[arg(long, default_value = "archive")]
        kind: String,
    },
}

fn initialize_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    initialize_tracing();
    let cli = Cli::parse();

    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(anyhow::Error::from)
        .and_then(|runtime| runtime.block_on(run(cli, Config::from_env())));

    if let Err(err) = result {
        eprintln!("[g] {:#}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Command::Ls { output } => {
            let versions_dir = config.versions_dir();
            let versions = match list_installed(&versions_dir) {
                Ok(versions) => versions,
                Err(Error::Io { source, .. })
                    if source.kind() == std::io::ErrorKind::NotFound =>
                {
                    Vec::new()
                }
                Err(err) => return Err(err.into()),
            };
            if versions.is_empty() {
                eprintln!("[g] No versions installed");
                return Ok(());
            }

            let installed: Vec<String> = versions.iter().map(|v| v.name().to_string()).collect();
            let current = in_use(&config.goroot());
            print!("{}", render(output, &versions, &installed, current.as_deref())?);
        }
        Command::LsRemote { filter, output } => {
            let filter: RemoteFilter = filter.parse()?;
            let collector = new_collector(&config.mirrors).await?;
            let versions = list_remote(collector.as_ref(), &filter)?;

            let installed: Vec<String> = list_installed(&config.versions_dir())
                .map(|versions| versions.iter().map(|v| v.name().to_string()).collect())
                .unwrap_or_default();
            let current = in_use(&config.goroot());
            print!("{}", render(output, &versions, &installed, current.as_deref())?);
        }
        Command::Find {
            expression,
            os,
            arch,
            kind,
        } => {
            let kind: PackageKind = kind
                .parse()
                .map_err(|_| anyhow::anyhow!("unknown package kind {:?}", kind))?;
            let os = os.unwrap_or(config.os);
            let arch = arch.unwrap_or(config.arch);

            let collector = new_collector(&config.mirrors).await?;
            let finder = Finder::new(collector.all_versions()?)
                .with_kind(kind)
                .with_os(&os)
                .with_arch(&arch);

            let version = match finder.find(&expression) {
                Ok(version) => version,
                Err(err @ Error::VersionNotFound { .. }) => {
                    return Err(anyhow::Error::from(err)).context(
                        "no release matches; run `gdist ls-remote` to see what is available",
                    );
                }
                Err(err @ Error::PackageNotFound { .. }) => {
                    return Err(anyhow::Error::from(err))
                        .context(format!("no build of {:?} for {}/{}", expression, os, arch));
                }
                Err(err) => return Err(err.into()),
            };

            println!("{}", version.name());
            let client = default_client();
            for pkg in version.find_packages(kind, &os, &arch)? {
                let mut pkg = pkg.clone();
                pkg.fetch_checksum(&client).await?;
                println!(
                    "  {}  {}  {}  {} {}",
                    pkg.file_name, pkg.size, pkg.url, pkg.algorithm, pkg.checksum
                );
            }
        }
    }
    Ok(())
}
