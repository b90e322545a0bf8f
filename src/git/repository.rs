use crate::error::{PublishError, Result};
use git2::{Direction, ErrorCode, Repository as Git2Repo, Signature};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

/// [super::Vcs] backed by a libgit2 repository
///
/// Built with [Git2Vcs::discover] outside a repository it holds no
/// repository at all and every operation reports `NotARepository`, which
/// callers may degrade from.
pub struct Git2Vcs {
    repo: Option<Mutex<Git2Repo>>,
    location: String,
}

impl Git2Vcs {
    /// Discover the repository at or above `path`.
    ///
    /// # Returns
    /// * `Ok(Git2Vcs)` - repository found
    /// * `Err(NotARepository)` - no git metadata at or above `path`
    /// * `Err(VcsUnavailable)` - git metadata found but unreadable
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match Git2Repo::discover(path) {
            Ok(repo) => Ok(Git2Vcs::from_git2(repo)),
            Err(e) if e.code() == ErrorCode::NotFound => {
                Err(PublishError::NotARepository(path.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Like [Git2Vcs::open], but a missing repository is not an error.
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        match Self::open(path.as_ref()) {
            Err(e) if e.is_not_a_repository() => {
                debug!(path = %path.as_ref().display(), "no git repository found");
                Ok(Git2Vcs {
                    repo: None,
                    location: path.as_ref().display().to_string(),
                })
            }
            other => other,
        }
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        let location = repo.path().display().to_string();
        Git2Vcs {
            repo: Some(Mutex::new(repo)),
            location,
        }
    }

    /// Whether a repository was found
    pub fn is_repository(&self) -> bool {
        self.repo.is_some()
    }

    fn repo(&self) -> Result<MutexGuard<'_, Git2Repo>> {
        self.repo
            .as_ref()
            .ok_or_else(|| PublishError::NotARepository(self.location.clone()))?
            .lock()
            .map_err(|_| PublishError::vcs("repository lock poisoned"))
    }
}

/// Remote callbacks that authenticate over SSH with the usual key files or
/// the agent, and otherwise fall back to libgit2's default credentials.
fn remote_callbacks<'a>() -> git2::RemoteCallbacks<'a> {
    let mut callbacks = git2::RemoteCallbacks::new();
    let mut attempts = 0;
    callbacks.credentials(move |_url, username_from_url, allowed_types| {
        attempts += 1;
        if attempts > 4 {
            return Err(git2::Error::from_str("authentication failed"));
        }
        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(git2::CredentialType::SSH_KEY) {
            if attempts == 1 {
                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }
            }
            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }
        }

        git2::Cred::default()
    });
    callbacks
}

fn shorten_branch_ref(name: &str) -> &str {
    name.strip_prefix("refs/heads/").unwrap_or(name)
}

impl super::Vcs for Git2Vcs {
    fn current_branch(&self) -> Result<String> {
        let repo = self.repo()?;
        let branch = match repo.head() {
            Ok(head) if head.is_branch() => head
                .shorthand()
                .map(str::to_string)
                .ok_or_else(|| PublishError::vcs("HEAD branch name is not valid UTF-8")),
            Ok(head) => head
                .target()
                .map(|oid| oid.to_string())
                .ok_or_else(|| PublishError::vcs("HEAD is detached and has no target")),
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                let head = repo.find_reference("HEAD")?;
                head.symbolic_target()
                    .map(|target| shorten_branch_ref(target).to_string())
                    .ok_or_else(|| PublishError::vcs("HEAD does not point at a branch"))
            }
            Err(e) => Err(e.into()),
        };
        branch
    }

    fn default_branch(&self, remote_name: &str) -> Result<Option<String>> {
        let repo = self.repo()?;
        let mut remote = match repo.find_remote(remote_name) {
            Ok(remote) => remote,
            Err(e) => {
                warn!(remote = remote_name, error = %e, "remote not configured");
                return Ok(None);
            }
        };

        let connection = match remote.connect_auth(Direction::Fetch, Some(remote_callbacks()), None)
        {
            Ok(connection) => connection,
            Err(e) => {
                warn!(remote = remote_name, error = %e, "could not reach remote for default branch");
                return Ok(None);
            }
        };

        match connection.default_branch() {
            Ok(buf) => Ok(buf.as_str().map(|name| shorten_branch_ref(name).to_string())),
            Err(e) => {
                debug!(remote = remote_name, error = %e, "remote advertises no default branch");
                Ok(None)
            }
        }
    }

    fn short_hash(&self, len: usize) -> Result<String> {
        let repo = self.repo()?;
        let commit = repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(|e| {
                PublishError::vcs(format!("Unable to read latest commit: {}", e.message()))
            })?;
        Ok(commit.id().to_string().chars().take(len).collect())
    }

    fn list_remote_tags(&self, remote_name: &str) -> Result<Vec<String>> {
        let repo = self.repo()?;
        let mut remote = repo.find_remote(remote_name).map_err(|e| {
            PublishError::vcs(format!("Cannot find remote '{}': {}", remote_name, e.message()))
        })?;
        let connection = remote
            .connect_auth(Direction::Fetch, Some(remote_callbacks()), None)
            .map_err(|e| {
                PublishError::vcs(format!(
                    "Cannot connect to remote '{}': {}",
                    remote_name,
                    e.message()
                ))
            })?;

        let tags = connection
            .list()?
            .iter()
            .filter_map(|head| head.name().strip_prefix("refs/tags/"))
            .filter(|name| !name.ends_with("^{}"))
            .map(str::to_string)
            .collect();
        Ok(tags)
    }

    fn delete_local_tag(&self, name: &str) -> Result<()> {
        let repo = self.repo()?;
        match repo.tag_delete(name) {
            Ok(()) => Ok(()),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        let repo = self.repo()?;
        let head = repo.head()?.peel_to_commit()?;
        let signature = repo
            .signature()
            .or_else(|_| Signature::now("publish-version", "publish-version@localhost"))?;
        repo.tag(name, head.as_object(), &signature, message, false)
            .map_err(|e| {
                PublishError::vcs(format!("Cannot create tag '{}': {}", name, e.message()))
            })?;
        Ok(())
    }

    fn push_tag(&self, remote_name: &str, name: &str) -> Result<()> {
        let repo = self.repo()?;
        let mut remote = repo.find_remote(remote_name).map_err(|e| {
            PublishError::vcs(format!("Cannot find remote '{}': {}", remote_name, e.message()))
        })?;

        let mut callbacks = remote_callbacks();
        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "remote rejected {}: {}",
                refname, status
            ))),
            None => Ok(()),
        });
        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let refspec = format!("refs/tags/{0}:refs/tags/{0}", name);
        remote
            .push(&[refspec.as_str()], Some(&mut push_options))
            .map_err(|e| {
                PublishError::vcs(format!("Failed to push tag '{}': {}", name, e.message()))
            })
    }

    fn remote_url(&self, remote_name: &str) -> Result<Option<String>> {
        let repo = self.repo()?;
        let url = match repo.find_remote(remote_name) {
            Ok(remote) => Ok(remote.url().map(str::to_string)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        };
        url
    }
}
