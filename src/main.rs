use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use publish_version::cli::orchestration::{self, NEXT_VERSION_FILE};
use publish_version::cli::setup::init_tracing;
use publish_version::config::{self, Config};
use publish_version::domain::mode::ci_workspace_from_env;
use publish_version::domain::ModuleIdentity;
use publish_version::git::Git2Vcs;
use publish_version::registry::{MavenRegistry, RegistryVersionOracle};
use publish_version::ui;

#[derive(Parser)]
#[command(
    name = "publish-version",
    version,
    about = "Resolve the next version to publish and record it as a git tag"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, global = true, help = "Show debug diagnostics on stderr")]
    verbose: bool,

    #[arg(long, global = true, help = "Override the publish tag prefix")]
    tag_prefix: Option<String>,

    #[arg(long, global = true, help = "Override the git remote holding publish tags")]
    remote: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the version this invocation publishes
    Resolve,

    /// Next version from the package registry, written to nextversion.txt
    NextVersion {
        #[arg(long, help = "Module group (defaults to default_group)")]
        group: Option<String>,

        #[arg(long = "name", help = "Module name; repeat for lockstep modules")]
        names: Vec<String>,

        #[arg(long, help = "Compute a dev candidate instead of a release")]
        dev: bool,

        #[arg(long, default_value = NEXT_VERSION_FILE, help = "File to write the version to")]
        output: PathBuf,
    },

    /// Print publication metadata for a module as TOML
    Metadata {
        #[arg(long)]
        name: String,

        #[arg(long)]
        group: Option<String>,
    },

    /// Run every module's publish command, then push the publish tag
    Publish {
        #[arg(long, help = "Preview what would happen without publishing")]
        dry_run: bool,
    },

    /// Publish a single module (refused outside `publish`)
    PublishModule { name: String },

    /// Print the publish mode: local, release or dev
    Mode,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = init_tracing(args.verbose) {
        eprintln!("{}", e);
    }

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn load(args: &Args) -> Result<Config> {
    let mut config = config::load_config(args.config.as_deref()).context("Error loading config")?;
    if let Some(prefix) = &args.tag_prefix {
        config.tag_prefix = prefix.clone();
    }
    if let Some(remote) = &args.remote {
        config.remote = remote.clone();
    }
    config.validate()?;
    Ok(config)
}

fn run(args: Args) -> Result<()> {
    let config = load(&args)?;

    if let Commands::NextVersion {
        group,
        names,
        dev,
        output,
    } = &args.command
    {
        return next_version(&config, group.as_deref(), names, *dev, output);
    }

    let cwd = std::env::current_dir().context("Cannot read current directory")?;
    let vcs = Git2Vcs::discover(&cwd)?;
    let ci_workspace = ci_workspace_from_env(&config.ci_env_vars);
    let resolver = orchestration::build_resolver(vcs, &config, ci_workspace);

    match args.command {
        Commands::Resolve => {
            let version = orchestration::run_resolve(&resolver)?;
            println!("{}", version);
        }
        Commands::Mode => {
            let mode = orchestration::run_mode(&resolver)?;
            println!("{}", mode);
        }
        Commands::Metadata { name, group } => {
            let module = ModuleIdentity::resolve(
                group.as_deref(),
                Some(&name),
                config.default_group.as_deref(),
            )?;
            let metadata = orchestration::run_metadata(&resolver, &module)?;
            print!("{}", metadata.to_toml()?);
        }
        Commands::Publish { dry_run } => {
            let outcome = orchestration::run_publish(&resolver, &config, dry_run)?;
            println!("{}", outcome.version);
        }
        Commands::PublishModule { name } => {
            orchestration::run_publish_module(&resolver, &config, &name)?;
        }
        Commands::NextVersion { .. } => {}
    }

    Ok(())
}

fn next_version(
    config: &Config,
    group: Option<&str>,
    names: &[String],
    dev: bool,
    output: &std::path::Path,
) -> Result<()> {
    let modules = if names.is_empty() {
        config.module_identities()?
    } else {
        names
            .iter()
            .map(|name| {
                ModuleIdentity::resolve(group, Some(name), config.default_group.as_deref())
            })
            .collect::<publish_version::Result<Vec<_>>>()?
    };
    if modules.is_empty() {
        return Err(publish_version::PublishError::module(
            "no module given: pass --name or configure [[modules]]",
        )
        .into());
    }

    let url = config.registry.url.as_deref().ok_or_else(|| {
        publish_version::PublishError::config("[registry] url must be set for next-version")
    })?;
    let client = MavenRegistry::new(url, config.registry.timeout())?;
    let oracle = RegistryVersionOracle::new(client, config.registry.cache_window());

    ui::display_status("Calculating next version ...");
    let next = orchestration::run_next_version(&oracle, &modules, dev, output)?;
    println!("{}", next);
    Ok(())
}
