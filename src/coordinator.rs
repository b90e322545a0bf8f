//! Publish-tag coordination
//!
//! The tag for the resolved version is the durable record that a publish
//! happened, so it is written exactly once per invocation, and only after
//! every module's publish action succeeded.
//!
//! ```text
//! Idle --register_action--> AwaitingPublishOutcome --finalize--> TagPushed
//!                                     |                       \-> Skipped
//!                                     \--(any failure)-------> Abandoned
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::domain::tag::publish_message;
use crate::domain::PreRelease;
use crate::error::{PublishError, Result};
use crate::git::Vcs;
use crate::resolver::VersionResolver;

/// Why no tag was pushed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Developer machine: local versions are never tagged
    LocalMode,
    /// Dev pre-releases are not tagged unless configured
    PreRelease,
    /// No publish action ran, or the umbrella publish was not requested
    NothingPublished,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::LocalMode => write!(f, "local publish"),
            SkipReason::PreRelease => write!(f, "dev pre-release"),
            SkipReason::NothingPublished => write!(f, "nothing was published"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorState {
    Idle,
    AwaitingPublishOutcome,
    TagPushed { tag: String },
    Skipped(SkipReason),
    /// A publish action failed or the push itself failed; nothing is tagged
    Abandoned,
}

impl CoordinatorState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CoordinatorState::TagPushed { .. }
                | CoordinatorState::Skipped(_)
                | CoordinatorState::Abandoned
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActionOutcome {
    Pending,
    Succeeded,
    Failed,
}

struct CoordinatorInner {
    state: CoordinatorState,
    actions: BTreeMap<String, ActionOutcome>,
}

/// Fan-in gate between per-module publish actions and the tag push
pub struct PublishTagCoordinator<'r, V: Vcs> {
    resolver: &'r VersionResolver<V>,
    umbrella_requested: bool,
    push_dev_tags: bool,
    inner: Mutex<CoordinatorInner>,
}

impl<'r, V: Vcs> PublishTagCoordinator<'r, V> {
    /// `umbrella_requested` is whether the top-level publish is part of this
    /// run; without it no publish action may start.
    pub fn new(resolver: &'r VersionResolver<V>, umbrella_requested: bool) -> Self {
        PublishTagCoordinator {
            resolver,
            umbrella_requested,
            push_dev_tags: false,
            inner: Mutex::new(CoordinatorInner {
                state: CoordinatorState::Idle,
                actions: BTreeMap::new(),
            }),
        }
    }

    /// Also push tags for dev pre-releases
    pub fn with_dev_tag_push(mut self, push_dev_tags: bool) -> Self {
        self.push_dev_tags = push_dev_tags;
        self
    }

    pub fn state(&self) -> CoordinatorState {
        match self.lock() {
            Ok(inner) => inner.state.clone(),
            Err(_) => CoordinatorState::Abandoned,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, CoordinatorInner>> {
        self.inner
            .lock()
            .map_err(|_| PublishError::config("publish coordinator lock poisoned"))
    }

    /// Announce a publish action that will run in this invocation.
    pub fn register_action(&self, name: &str) -> Result<()> {
        let mut inner = self.lock()?;
        Self::register_locked(&mut inner, name)
    }

    fn register_locked(inner: &mut CoordinatorInner, name: &str) -> Result<()> {
        if inner.state.is_terminal() {
            return Err(PublishError::config(format!(
                "Publish already finalized, cannot register '{}'",
                name
            )));
        }
        if inner.state == CoordinatorState::Idle {
            debug!("awaiting publish outcome");
            inner.state = CoordinatorState::AwaitingPublishOutcome;
        }
        inner
            .actions
            .entry(name.to_string())
            .or_insert(ActionOutcome::Pending);
        Ok(())
    }

    /// Guard run right before an action starts.
    ///
    /// Fails with a configuration error when the umbrella publish is not
    /// part of this run; the action is then recorded as failed so nothing
    /// gets tagged.
    pub fn begin_action(&self, name: &str) -> Result<()> {
        let mut inner = self.lock()?;
        Self::register_locked(&mut inner, name)?;
        if !self.umbrella_requested {
            inner
                .actions
                .insert(name.to_string(), ActionOutcome::Failed);
            return Err(PublishError::config(format!(
                "Publishing should only be done by running `publish-version publish`, \
                 not '{}' on its own",
                name
            )));
        }
        Ok(())
    }

    /// Record how a registered action ended.
    pub fn complete_action(&self, name: &str, succeeded: bool) -> Result<()> {
        let mut inner = self.lock()?;
        let outcome = inner.actions.get_mut(name).ok_or_else(|| {
            PublishError::config(format!("Publish action '{}' was never registered", name))
        })?;
        *outcome = if succeeded {
            ActionOutcome::Succeeded
        } else {
            ActionOutcome::Failed
        };
        if !succeeded {
            warn!(action = name, "publish action failed, tag will not be pushed");
        }
        Ok(())
    }

    /// Push the tag if everything succeeded; otherwise settle on why not.
    ///
    /// Idempotent: once terminal, later calls return the same state without
    /// touching the remote.
    pub fn finalize(&self) -> Result<CoordinatorState> {
        let mut inner = self.lock()?;
        if inner.state.is_terminal() {
            return Ok(inner.state.clone());
        }

        match self.settle(&inner) {
            Ok(state) => {
                inner.state = state.clone();
                Ok(state)
            }
            Err(e) => {
                inner.state = CoordinatorState::Abandoned;
                Err(e)
            }
        }
    }

    fn settle(&self, inner: &CoordinatorInner) -> Result<CoordinatorState> {
        if inner.state == CoordinatorState::Idle {
            return Ok(CoordinatorState::Skipped(SkipReason::NothingPublished));
        }
        if inner
            .actions
            .values()
            .any(|outcome| *outcome != ActionOutcome::Succeeded)
        {
            return Ok(CoordinatorState::Abandoned);
        }
        if !self.umbrella_requested {
            return Ok(CoordinatorState::Skipped(SkipReason::NothingPublished));
        }
        if self.resolver.context()?.mode.is_local() {
            return Ok(CoordinatorState::Skipped(SkipReason::LocalMode));
        }
        if matches!(self.resolver.prerelease()?, Some(PreRelease::Dev { .. })) && !self.push_dev_tags
        {
            return Ok(CoordinatorState::Skipped(SkipReason::PreRelease));
        }

        let version = self.resolver.version()?;
        let tag = self.resolver.tag_name()?;
        self.resolver
            .tag_store()
            .create_and_push_tag(&tag, &publish_message(version))?;
        info!(tag = tag.as_str(), actions = inner.actions.len(), "publish tagged");
        Ok(CoordinatorState::TagPushed { tag })
    }
}
