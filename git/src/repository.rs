use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{GitError, Result, ResultExt};
use git2::{ErrorCode, Repository as GitRepository};
use tracing::debug;

pub trait Repository {
    fn open_at(path: &Path) -> Result<Self>
    where
        Self: Sized;
    fn workdir(&self) -> Result<PathBuf>;
    fn fetch(&self, remote: &str, branch: &str) -> Result<()>;
    fn read_file_at_ref(&self, reference: &str, path: &Path) -> Result<String>;
    fn get_current_branch(&self) -> Result<String>;
}

pub struct RealGitRepository {
    repo: GitRepository,
}

impl Repository for RealGitRepository {
    fn open_at(path: &Path) -> Result<Self> {
        let repo = GitRepository::discover(path).map_err(|e| {
            GitError::RepositoryError(format!("Failed to discover git repository: {}", e))
        })?;
        Ok(Self { repo })
    }

    fn workdir(&self) -> Result<PathBuf> {
        self.repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| GitError::RepositoryError("Repository has no working tree".to_string()))
    }

    fn fetch(&self, remote: &str, branch: &str) -> Result<()> {
        let output = Command::new("git")
            .args(["fetch", remote, branch])
            .current_dir(self.workdir()?)
            .output()
            .map_err(|e| {
                GitError::IoError(e).with_context(format!("Failed to fetch {}/{}", remote, branch))
            })?;

        if !output.status.success() {
            return Err(GitError::CommandError(format!(
                "Failed to fetch {}/{}: {}",
                remote,
                branch,
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        Ok(())
    }

    fn read_file_at_ref(&self, reference: &str, path: &Path) -> Result<String> {
        // Tree paths always use forward slashes
        let tree_path = path.to_string_lossy().replace('\\', "/");
        let revspec = format!("{}:{}", reference, tree_path);
        debug!(%revspec, "reading file at revision");

        let object = self.repo.revparse_single(&revspec).map_err(|e| {
            if e.code() == ErrorCode::NotFound {
                GitError::PathNotFound {
                    reference: reference.to_string(),
                    path: path.to_path_buf(),
                }
            } else {
                GitError::Git2Error(e)
            }
        })?;

        let blob = object
            .peel_to_blob()
            .context(format!("{} is not a file at {}", tree_path, reference))?;
        let content = std::str::from_utf8(blob.content())
            .context(format!("Failed to read {} at {}", tree_path, reference))?;

        Ok(content.to_string())
    }

    fn get_current_branch(&self) -> Result<String> {
        let repo = &self.repo;

        let head = repo.head()?;
        if !head.is_branch() {
            return Err(GitError::RepositoryError(
                "HEAD is not a branch".to_string(),
            ));
        }

        let branch_name = head
            .shorthand()
            .ok_or_else(|| GitError::RepositoryError("Invalid branch name".to_string()))?
            .to_string();

        Ok(branch_name)
    }
}
