pub mod error;
pub mod repository;

pub use error::{GitError, Result, ResultExt};
pub use repository::{RealGitRepository, Repository};
