//! Command workflows
//!
//! Each subcommand of the binary is one function here, so the workflows can
//! be driven programmatically (and tested with mock collaborators) without
//! going through clap.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use crate::actions::{ActionContext, ActionRunner};
use crate::config::Config;
use crate::coordinator::{CoordinatorState, PublishTagCoordinator};
use crate::domain::{ModuleIdentity, PublishMode, Version};
use crate::git::Vcs;
use crate::metadata::PublicationMetadata;
use crate::registry::{RegistryClient, RegistryVersionOracle};
use crate::resolver::{baseline, ResolverSettings, VersionResolver};
use crate::ui;

/// Default file `next-version` writes its answer to
pub const NEXT_VERSION_FILE: &str = "nextversion.txt";

/// Resolver for one invocation, configured from `config`.
pub fn build_resolver<V: Vcs>(
    vcs: V,
    config: &Config,
    ci_workspace: Option<PathBuf>,
) -> VersionResolver<V> {
    VersionResolver::new(vcs, ResolverSettings::from_config(config), ci_workspace)
}

/// Resolve and report the version for this invocation.
///
/// # Returns
/// The resolved version; decisions are reported on stderr
pub fn run_resolve<V: Vcs>(resolver: &VersionResolver<V>) -> Result<Version> {
    ui::display_status("Calculating next version ...");
    let result = resolver.version();
    ui::display_warnings(&resolver.warnings());
    let version = result.context("Version resolution failed")?.clone();

    report_context(resolver)?;
    ui::display_resolved_version(resolver.latest_release().map(Version::as_str), version.as_str());
    Ok(version)
}

/// Classify this invocation without resolving a version.
pub fn run_mode<V: Vcs>(resolver: &VersionResolver<V>) -> Result<PublishMode> {
    let result = resolver.context();
    ui::display_warnings(&resolver.warnings());
    let mode = result.context("Publish mode classification failed")?.mode;
    report_context(resolver)?;
    Ok(mode)
}

fn report_context<V: Vcs>(resolver: &VersionResolver<V>) -> Result<()> {
    let context = resolver.context()?;
    if let Some(branch) = &context.branch {
        ui::display_branches(&branch.current, branch.default.as_deref());
    }
    ui::display_status(&ui::mode_summary(context.mode));
    Ok(())
}

/// Next version from the registry for a set of lockstep modules.
///
/// Prints nothing itself; the caller prints the result. The version is
/// written to `output` for downstream tooling.
pub fn run_next_version<C: RegistryClient>(
    oracle: &RegistryVersionOracle<C>,
    modules: &[ModuleIdentity],
    dev: bool,
    output: &Path,
) -> Result<Version> {
    let latest = oracle
        .latest_versions(modules)
        .context("Cannot query the package registry")?;
    let next = baseline::next_from_registry(&latest, dev)?;

    fs::write(output, next.as_str())
        .with_context(|| format!("Cannot write {}", output.display()))?;
    ui::display_success(&format!("Wrote {} to {}", next, output.display()));
    Ok(next)
}

/// Publication metadata for one module.
///
/// A missing or unreadable remote only drops the URL fields.
pub fn run_metadata<V: Vcs>(
    resolver: &VersionResolver<V>,
    module: &ModuleIdentity,
) -> Result<PublicationMetadata> {
    let version = resolver.version().context("Version resolution failed")?;
    let metadata = PublicationMetadata::new(module, version, resolver.http_url());
    ui::display_warnings(&resolver.warnings());
    Ok(metadata)
}

/// Result of the umbrella publish
#[derive(Debug, Clone, PartialEq)]
pub struct PublishOutcome {
    pub version: Version,
    /// Final coordinator state; `None` for a dry run
    pub state: Option<CoordinatorState>,
}

/// Umbrella publish: run every configured module action, then tag once.
///
/// Actions run in configuration order and stop at the first failure; the
/// tag is pushed only when all of them succeeded.
pub fn run_publish<V: Vcs>(
    resolver: &VersionResolver<V>,
    config: &Config,
    dry_run: bool,
) -> Result<PublishOutcome> {
    let modules = config.module_identities()?;
    let version = run_resolve(resolver)?;
    let tag = resolver.tag_name()?;
    let mode = resolver.context()?.mode;

    let coordinator =
        PublishTagCoordinator::new(resolver, true).with_dev_tag_push(config.push_dev_tags);
    for module in &modules {
        coordinator.register_action(&module.to_string())?;
    }
    if modules.is_empty() {
        warn!("no modules configured, nothing to publish");
    }

    let mut failure = None;
    for (module, module_config) in modules.iter().zip(&config.modules) {
        let name = module.to_string();
        coordinator.begin_action(&name)?;

        if dry_run {
            ui::display_status(&format!(
                "Would publish {} {} with `{}`",
                name,
                version,
                module_config.command.join(" ")
            ));
            coordinator.complete_action(&name, true)?;
            continue;
        }

        ui::display_status(&format!("Publishing {} {}", name, version));
        let context = ActionContext {
            module: module.clone(),
            version: version.to_string(),
            tag: tag.clone(),
            mode,
            url: resolver.http_url().map(str::to_string),
        };
        match ActionRunner::execute(&module_config.command, &context) {
            Ok(()) => coordinator.complete_action(&name, true)?,
            Err(e) => {
                coordinator.complete_action(&name, false)?;
                failure = Some(e);
                break;
            }
        }
    }

    if dry_run {
        ui::display_status(&format!("Dry run: tag {} would be pushed", tag));
        return Ok(PublishOutcome {
            version,
            state: None,
        });
    }

    let state = coordinator.finalize().context("Cannot push publish tag")?;
    if let Some(e) = failure {
        return Err(e).context("Publish failed, no tag was pushed");
    }
    match &state {
        CoordinatorState::TagPushed { tag } => {
            ui::display_success(&format!("Published {} and pushed {}", version, tag))
        }
        CoordinatorState::Skipped(reason) => {
            ui::display_success(&format!("Published {} (tag skipped: {})", version, reason))
        }
        _ => {}
    }
    Ok(PublishOutcome {
        version,
        state: Some(state),
    })
}

/// A single module's publish on its own.
///
/// Always refused: a narrow publish outside the umbrella would release part
/// of a lockstep set.
pub fn run_publish_module<V: Vcs>(
    resolver: &VersionResolver<V>,
    config: &Config,
    name: &str,
) -> Result<()> {
    let module = config.module_identity(config.find_module(name)?)?;
    let coordinator = PublishTagCoordinator::new(resolver, false);
    coordinator.begin_action(&module.to_string())?;
    Ok(())
}
