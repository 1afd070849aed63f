//! Integration tests for cloning app sources.

use std::fs;
use std::path::Path;

use clouddev_image::{ImageError, SourceCheckout};
use tempfile::TempDir;

fn commit_file(repo: &git2::Repository, name: &str, content: &str) -> anyhow::Result<git2::Oid> {
    let workdir = repo
        .workdir()
        .ok_or_else(|| anyhow::anyhow!("bare repository"))?;
    fs::write(workdir.join(name), content)?;

    let mut index = repo.index()?;
    index.add_path(Path::new(name))?;
    index.write()?;
    let tree = repo.find_tree(index.write_tree()?)?;
    let sig = git2::Signature::now("Test", "test@example.com")?;
    let parents = match repo.head() {
        Ok(head) => vec![head.peel_to_commit()?],
        Err(_) => Vec::new(),
    };
    let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();
    Ok(repo.commit(Some("HEAD"), &sig, &sig, "commit", &tree, &parent_refs)?)
}

fn setup_upstream() -> anyhow::Result<TempDir> {
    let dir = TempDir::new()?;
    let repo = git2::Repository::init(dir.path())?;
    commit_file(&repo, "Dockerfile", "FROM scratch\n")?;

    let head = repo.head()?.peel_to_commit()?;
    repo.branch("feature", &head, false)?;
    repo.set_head("refs/heads/feature")?;
    commit_file(&repo, "feature.txt", "only on feature\n")?;
    Ok(dir)
}

#[test]
fn clones_the_requested_branch() -> anyhow::Result<()> {
    let upstream = setup_upstream()?;
    let scratch = TempDir::new()?;
    let dest = scratch.path().join("billing");
    let source = SourceCheckout::from_url(upstream.path().to_string_lossy());

    let repo = source.clone_into(&dest, "feature")?;

    assert_eq!(repo.head()?.shorthand(), Some("feature"));
    assert!(dest.join("Dockerfile").exists());
    assert!(dest.join("feature.txt").exists());
    Ok(())
}

#[test]
fn existing_checkout_is_replaced() -> anyhow::Result<()> {
    let upstream = setup_upstream()?;
    let scratch = TempDir::new()?;
    let dest = scratch.path().join("billing");
    fs::create_dir_all(&dest)?;
    fs::write(dest.join("stale.txt"), "left over")?;
    let source = SourceCheckout::from_url(upstream.path().to_string_lossy());

    source.clone_into(&dest, "feature")?;

    assert!(!dest.join("stale.txt").exists());
    assert!(dest.join("Dockerfile").exists());
    Ok(())
}

#[test]
fn missing_branch_is_reported() -> anyhow::Result<()> {
    let upstream = setup_upstream()?;
    let scratch = TempDir::new()?;
    let source = SourceCheckout::from_url(upstream.path().to_string_lossy());

    let Err(err) = source.clone_into(&scratch.path().join("billing"), "does-not-exist") else {
        panic!("branch does not exist");
    };

    assert!(matches!(err, ImageError::BranchNotFound { ref branch, .. } if branch == "does-not-exist"));
    Ok(())
}
