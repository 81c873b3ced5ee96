//! Fixtures shared by the cross-crate tests: a throwaway git repository with
//! a published branch, and a `VersionControl` reading from it.

use changelog::{ChangelogError, Package, PackageRepository, VersionControl};
use git::{RealGitRepository, Repository};
use git2::{Oid, Signature};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const REMOTE: &str = "origin";

/// A git repository in a temporary directory
pub struct GitFixture {
    dir: TempDir,
    repo: git2::Repository,
}

impl GitFixture {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let repo = git2::Repository::init(dir.path()).expect("init repository");
        Self { dir, repo }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, path: &str, content: &str) -> PathBuf {
        let full = self.root().join(path);
        fs::create_dir_all(full.parent().expect("file has a parent")).expect("create dirs");
        fs::write(&full, content).expect("write file");
        full
    }

    pub fn read(&self, path: &str) -> String {
        fs::read_to_string(self.root().join(path)).expect("read file")
    }

    /// Commits the given files and points `origin/<branch>` at the commit.
    pub fn publish_branch(&self, branch: &str, files: &[(&str, &str)]) -> Oid {
        let mut index = self.repo.index().expect("open index");
        for (path, content) in files {
            self.write(path, content);
            index.add_path(Path::new(path)).expect("stage file");
        }
        index.write().expect("write index");

        let tree = self
            .repo
            .find_tree(index.write_tree().expect("write tree"))
            .expect("find tree");
        let signature = Signature::now("Test", "test@example.com").expect("signature");
        let parent = self
            .repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        let commit = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, branch, &tree, &parents)
            .expect("commit");

        self.repo
            .reference(&format!("refs/remotes/{REMOTE}/{branch}"), commit, true, "publish")
            .expect("create remote ref");
        commit
    }

    pub fn vcs(&self) -> GitVcs {
        GitVcs {
            repo: RealGitRepository::open_at(self.root()).expect("open repository"),
        }
    }
}

impl Default for GitFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// `VersionControl` over the `git` crate
pub struct GitVcs {
    repo: RealGitRepository,
}

impl VersionControl for GitVcs {
    fn read_file(&self, reference: &str, path: &Path) -> changelog::Result<String> {
        self.repo.read_file_at_ref(reference, path).map_err(|e| {
            if e.is_not_found() {
                ChangelogError::NotFound {
                    reference: reference.to_string(),
                    path: path.to_path_buf(),
                }
            } else {
                ChangelogError::Git(e.user_message())
            }
        })
    }
}

/// Fixed package list rooted in a fixture
pub struct StaticPackages(pub Vec<Package>);

impl StaticPackages {
    pub fn in_fixture(fixture: &GitFixture, names: &[&str]) -> Self {
        Self(
            names
                .iter()
                .map(|name| {
                    let relative = format!("packages/{name}/CHANGELOG.md");
                    let local = fixture.root().join(&relative);
                    Package::new(*name, relative, local)
                })
                .collect(),
        )
    }
}

impl PackageRepository for StaticPackages {
    fn list_packages(&self) -> changelog::Result<Vec<Package>> {
        Ok(self.0.clone())
    }
}
