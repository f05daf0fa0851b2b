// Branch and working-tree summary of a repository through git2
use std::fmt;
use std::path::Path;

use git2::{BranchType, ErrorCode, Repository, Status, StatusOptions};

use crate::error::Result;

/// Kinds of change counted in the working-tree summary, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    Modified,
    Added,
    Deleted,
    Renamed,
    Unmerged,
    Untracked,
}

impl StatusKind {
    pub const ALL: [StatusKind; 6] = [
        StatusKind::Modified,
        StatusKind::Added,
        StatusKind::Deleted,
        StatusKind::Renamed,
        StatusKind::Unmerged,
        StatusKind::Untracked,
    ];

    pub fn symbol(self) -> char {
        match self {
            StatusKind::Modified => 'M',
            StatusKind::Added => '+',
            StatusKind::Deleted => '-',
            StatusKind::Renamed => 'R',
            StatusKind::Unmerged => 'U',
            StatusKind::Untracked => '?',
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Every kind an entry's flags contribute to. A file modified in both the index and the
/// worktree counts once.
pub fn kinds_for(flags: Status) -> Vec<StatusKind> {
    let mut kinds = Vec::new();

    if flags.is_conflicted() {
        kinds.push(StatusKind::Unmerged);
        return kinds;
    }
    if flags.intersects(
        Status::INDEX_MODIFIED | Status::WT_MODIFIED | Status::INDEX_TYPECHANGE | Status::WT_TYPECHANGE,
    ) {
        kinds.push(StatusKind::Modified);
    }
    if flags.contains(Status::INDEX_NEW) {
        kinds.push(StatusKind::Added);
    }
    if flags.intersects(Status::INDEX_DELETED | Status::WT_DELETED) {
        kinds.push(StatusKind::Deleted);
    }
    if flags.intersects(Status::INDEX_RENAMED | Status::WT_RENAMED) {
        kinds.push(StatusKind::Renamed);
    }
    if flags.contains(Status::WT_NEW) {
        kinds.push(StatusKind::Untracked);
    }
    kinds
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    counts: [usize; 6],
}

impl StatusCounts {
    pub fn add(&mut self, kind: StatusKind) {
        self.counts[kind.index()] += 1;
    }

    pub fn get(&self, kind: StatusKind) -> usize {
        self.counts[kind.index()]
    }

    pub fn is_clean(&self) -> bool {
        self.counts.iter().all(|&n| n == 0)
    }

    /// Kinds with a non-zero count, in display order
    pub fn nonzero(&self) -> impl Iterator<Item = (StatusKind, usize)> + '_ {
        StatusKind::ALL
            .iter()
            .map(|&kind| (kind, self.get(kind)))
            .filter(|&(_, n)| n > 0)
    }
}

impl fmt::Display for StatusCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .nonzero()
            .map(|(kind, n)| format!("{}:{}", kind.symbol(), n))
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchStatus {
    pub name: String,
    /// "[ahead N]", "[behind M]" or "[ahead N, behind M]"
    pub tracking: Option<String>,
}

impl BranchStatus {
    /// Default branches get a different color
    pub fn is_mainline(&self) -> bool {
        matches!(self.name.as_str(), "master" | "main" | "mainline")
    }
}

pub fn tracking_summary(ahead: usize, behind: usize) -> Option<String> {
    match (ahead, behind) {
        (0, 0) => None,
        (a, 0) => Some(format!("[ahead {}]", a)),
        (0, b) => Some(format!("[behind {}]", b)),
        (a, b) => Some(format!("[ahead {}, behind {}]", a, b)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoStatus {
    pub branch: BranchStatus,
    pub counts: StatusCounts,
}

pub trait RepoStatusSource {
    fn status(&self, path: &Path) -> Result<RepoStatus>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Git2StatusSource;

impl Git2StatusSource {
    fn branch(repo: &Repository) -> Result<BranchStatus> {
        let head = match repo.head() {
            Ok(head) => head,
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                let name = repo
                    .find_reference("HEAD")?
                    .symbolic_target()
                    .map(|t| t.trim_start_matches("refs/heads/").to_string())
                    .unwrap_or_else(|| "HEAD".to_string());
                return Ok(BranchStatus {
                    name,
                    tracking: None,
                });
            }
            Err(e) => return Err(e.into()),
        };

        if !head.is_branch() {
            return Ok(BranchStatus {
                name: "HEAD (no branch)".to_string(),
                tracking: None,
            });
        }

        let name = head.shorthand().unwrap_or("HEAD").to_string();
        let tracking = match repo.find_branch(&name, BranchType::Local)?.upstream() {
            Ok(upstream) => match (head.target(), upstream.get().target()) {
                (Some(local), Some(remote)) => {
                    let (ahead, behind) = repo.graph_ahead_behind(local, remote)?;
                    tracking_summary(ahead, behind)
                }
                _ => None,
            },
            Err(_) => None,
        };

        Ok(BranchStatus { name, tracking })
    }
}

impl RepoStatusSource for Git2StatusSource {
    fn status(&self, path: &Path) -> Result<RepoStatus> {
        let repo = Repository::open(path)?;
        let branch = Self::branch(&repo)?;

        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(false)
            .include_ignored(false)
            .exclude_submodules(true)
            .renames_head_to_index(true);

        let mut counts = StatusCounts::default();
        for entry in repo.statuses(Some(&mut opts))?.iter() {
            for kind in kinds_for(entry.status()) {
                counts.add(kind);
            }
        }

        Ok(RepoStatus { branch, counts })
    }
}
