// Git repository discovery and status

pub mod discovery;
pub mod status;

// Re-export commonly used items
pub use discovery::{discover_repositories, IgnoreWalker, RepoWalker};
pub use status::{BranchStatus, Git2StatusSource, RepoStatus, RepoStatusSource, StatusCounts, StatusKind};
