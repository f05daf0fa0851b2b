// Finding git working trees under the configured search roots

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::core::config::SearchRoot;

pub trait RepoWalker {
    /// Working-tree directories at most `max_depth` levels below `root` whose `.git` entry
    /// is still within `max_depth`
    fn walk(&self, root: &Path, max_depth: usize) -> Vec<PathBuf>;
}

/// Directory walk on `ignore::WalkBuilder` with every ignore filter turned off.
/// Symlinks are followed. Repositories nested inside other repositories are found too;
/// only `.git` directories themselves are skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreWalker;

fn has_git_entry(dir: &Path) -> bool {
    dir.join(".git").exists()
}

impl RepoWalker for IgnoreWalker {
    fn walk(&self, root: &Path, max_depth: usize) -> Vec<PathBuf> {
        if max_depth == 0 {
            return Vec::new();
        }

        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(true)
            .max_depth(Some(max_depth - 1))
            .filter_entry(|entry| entry.file_name() != ".git")
            .build();

        let mut found = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::debug!("Skipping entry under {}: {}", root.display(), e);
                    continue;
                }
            };

            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            if is_dir && has_git_entry(entry.path()) {
                found.push(entry.into_path());
            }
        }
        found
    }
}

/// Walk every root and return the sorted, de-duplicated canonical repository paths
pub fn discover_repositories<W: RepoWalker>(walker: &W, roots: &[SearchRoot]) -> Vec<PathBuf> {
    let mut unique = BTreeSet::new();

    for root in roots {
        for path in walker.walk(&root.path, root.depth) {
            let canonical = fs::canonicalize(&path).unwrap_or_else(|e| {
                log::debug!("Cannot canonicalize {}: {}", path.display(), e);
                path.clone()
            });
            unique.insert(canonical);
        }
    }

    log::debug!("Discovered {} git repositories", unique.len());
    unique.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_repo(dir: &Path) {
        fs::create_dir_all(dir.join(".git")).unwrap();
    }

    #[test]
    fn test_walk_respects_depth() {
        let tmp = tempfile::tempdir().unwrap();
        make_repo(&tmp.path().join("a"));
        make_repo(&tmp.path().join("x/y/deep"));

        let shallow = IgnoreWalker.walk(tmp.path(), 2);
        assert_eq!(shallow, vec![tmp.path().join("a")]);

        let mut deep = IgnoreWalker.walk(tmp.path(), 4);
        deep.sort();
        assert_eq!(deep, vec![tmp.path().join("a"), tmp.path().join("x/y/deep")]);
    }

    #[test]
    fn test_walk_finds_repositories_nested_in_repositories() {
        let tmp = tempfile::tempdir().unwrap();
        make_repo(&tmp.path().join("outer"));
        make_repo(&tmp.path().join("outer/vendored"));

        let mut found = IgnoreWalker.walk(tmp.path(), 5);
        found.sort();
        assert_eq!(
            found,
            vec![tmp.path().join("outer"), tmp.path().join("outer/vendored")]
        );
    }

    #[test]
    fn test_repository_at_root_does_not_hide_projects_below() {
        let tmp = tempfile::tempdir().unwrap();
        make_repo(tmp.path());
        make_repo(&tmp.path().join("src/app"));

        let found = discover_repositories(&IgnoreWalker, &[SearchRoot::new(tmp.path(), 3)]);

        let root = fs::canonicalize(tmp.path()).unwrap();
        assert_eq!(found, vec![root.clone(), root.join("src/app")]);
    }

    #[test]
    fn test_walk_skips_git_directories() {
        let tmp = tempfile::tempdir().unwrap();
        make_repo(&tmp.path().join("r"));
        fs::create_dir_all(tmp.path().join("r/.git/modules/sub/.git")).unwrap();

        assert_eq!(IgnoreWalker.walk(tmp.path(), 6), vec![tmp.path().join("r")]);
    }

    #[test]
    fn test_walk_zero_depth_finds_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        make_repo(tmp.path());

        assert!(IgnoreWalker.walk(tmp.path(), 0).is_empty());
        assert_eq!(IgnoreWalker.walk(tmp.path(), 1), vec![tmp.path().to_path_buf()]);
    }

    struct Fixed(Vec<PathBuf>);

    impl RepoWalker for Fixed {
        fn walk(&self, _root: &Path, _max_depth: usize) -> Vec<PathBuf> {
            self.0.clone()
        }
    }

    #[test]
    fn test_discovery_merges_roots() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = tmp.path().join("r");
        make_repo(&repo);

        let walker = Fixed(vec![repo.clone()]);
        let roots = vec![
            SearchRoot::new(tmp.path(), 2),
            SearchRoot::new(tmp.path(), 3),
        ];

        let found = discover_repositories(&walker, &roots);
        assert_eq!(found, vec![fs::canonicalize(&repo).unwrap()]);
    }
}
