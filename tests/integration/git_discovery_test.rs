use std::fs;
use std::path::Path;

use git2::Repository;
use sysdash::core::config::SearchRoot;
use sysdash::git::{discover_repositories, IgnoreWalker};
use tempfile::TempDir;

fn init_repo(path: &Path) {
    fs::create_dir_all(path).unwrap();
    Repository::init(path).unwrap();
}

#[test]
fn test_same_repo_through_two_roots_is_listed_once() {
    let tmp = TempDir::new().unwrap();
    let code = tmp.path().join("code");
    init_repo(&code.join("alpha"));
    init_repo(&code.join("group").join("beta"));

    #[cfg(unix)]
    std::os::unix::fs::symlink(&code, tmp.path().join("code-link")).unwrap();
    #[cfg(not(unix))]
    fs::create_dir_all(tmp.path().join("code-link")).unwrap();

    let roots = vec![
        SearchRoot::new(&code, 3),
        SearchRoot::new(tmp.path().join("code-link"), 3),
    ];
    let found = discover_repositories(&IgnoreWalker, &roots);

    let canonical = fs::canonicalize(&code).unwrap();
    assert_eq!(
        found,
        vec![canonical.join("alpha"), canonical.join("group").join("beta")]
    );
}

#[test]
fn test_depth_limits_what_is_found() {
    let tmp = TempDir::new().unwrap();
    init_repo(&tmp.path().join("near"));
    init_repo(&tmp.path().join("a").join("b").join("far"));

    let shallow = discover_repositories(&IgnoreWalker, &[SearchRoot::new(tmp.path(), 2)]);
    let canonical = fs::canonicalize(tmp.path()).unwrap();

    assert_eq!(shallow, vec![canonical.join("near")]);
}
