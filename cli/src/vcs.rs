use changelog::{ChangelogError, VersionControl};
use git::{GitError, Repository};
use std::path::Path;

/// `VersionControl` backed by the local git repository
pub struct GitVersionControl<R: Repository> {
    repo: R,
}

impl<R: Repository> GitVersionControl<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }
}

fn to_changelog_error(err: GitError, reference: &str, path: &Path) -> ChangelogError {
    if err.is_not_found() {
        ChangelogError::NotFound {
            reference: reference.to_string(),
            path: path.to_path_buf(),
        }
    } else {
        ChangelogError::Git(err.user_message())
    }
}

impl<R: Repository> VersionControl for GitVersionControl<R> {
    fn read_file(&self, reference: &str, path: &Path) -> changelog::Result<String> {
        self.repo
            .read_file_at_ref(reference, path)
            .map_err(|e| to_changelog_error(e, reference, path))
    }

    fn fetch(&self, remote: &str, branch: &str) -> changelog::Result<()> {
        self.repo
            .fetch(remote, branch)
            .map_err(|e| ChangelogError::Git(e.user_message()))
    }
}
