//! Runs the build-and-push pipeline against a stand-in `docker` script.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use clouddev_image::{BuildRequest, DockerCli, ImageError, ImagePipeline, SourceCheckout};
use tempfile::TempDir;

fn fake_docker(dir: &Path, fail_on: Option<&str>) -> anyhow::Result<PathBuf> {
    let log = dir.join("docker.log");
    let stdin_log = dir.join("stdin.log");
    let failure = fail_on.map_or_else(String::new, |command| {
        format!("if [ \"$1\" = \"{command}\" ]; then echo \"{command} denied\" >&2; exit 1; fi\n")
    });
    let script = format!(
        "#!/bin/sh\necho \"$@\" >> \"{}\"\nif [ \"$1\" = \"login\" ]; then cat > \"{}\"; fi\n{failure}exit 0\n",
        log.display(),
        stdin_log.display(),
    );
    let path = dir.join("docker");
    fs::write(&path, script)?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    Ok(path)
}

fn setup_upstream() -> anyhow::Result<TempDir> {
    let dir = TempDir::new()?;
    let repo = git2::Repository::init(dir.path())?;
    fs::write(dir.path().join("Dockerfile"), "FROM scratch\n")?;
    let mut index = repo.index()?;
    index.add_path(Path::new("Dockerfile"))?;
    index.write()?;
    let tree = repo.find_tree(index.write_tree()?)?;
    let sig = git2::Signature::now("Test", "test@example.com")?;
    let commit = repo.commit(Some("HEAD"), &sig, &sig, "init", &tree, &[])?;
    let commit = repo.find_commit(commit)?;
    repo.branch("develop", &commit, false)?;
    Ok(dir)
}

#[test]
fn pipeline_builds_logs_in_tags_and_pushes() -> anyhow::Result<()> {
    let upstream = setup_upstream()?;
    let tools = TempDir::new()?;
    let scratch = TempDir::new()?;
    let docker = DockerCli::new().with_program(fake_docker(tools.path(), None)?);
    let pipeline = ImagePipeline::new(docker, scratch.path());
    let source = SourceCheckout::from_url(upstream.path().to_string_lossy());

    let pushed = pipeline.build_and_push(&BuildRequest {
        source: &source,
        branch: "develop",
        image_name: "billing",
        registry_uri: "123456789012.dkr.ecr.eu-west-1.amazonaws.com/billing",
        registry_password: "token",
    })?;

    assert_eq!(pushed, "123456789012.dkr.ecr.eu-west-1.amazonaws.com/billing:latest");
    let log = fs::read_to_string(tools.path().join("docker.log"))?;
    let calls: Vec<&str> = log.lines().collect();
    assert_eq!(
        calls,
        vec![
            "build -t billing .",
            "login --username AWS --password-stdin 123456789012.dkr.ecr.eu-west-1.amazonaws.com",
            "tag billing 123456789012.dkr.ecr.eu-west-1.amazonaws.com/billing:latest",
            "push 123456789012.dkr.ecr.eu-west-1.amazonaws.com/billing:latest",
        ]
    );
    assert_eq!(fs::read_to_string(tools.path().join("stdin.log"))?, "token");
    assert!(scratch.path().join("billing").join("Dockerfile").exists());
    Ok(())
}

#[test]
fn push_failure_stops_the_pipeline() -> anyhow::Result<()> {
    let upstream = setup_upstream()?;
    let tools = TempDir::new()?;
    let scratch = TempDir::new()?;
    let docker = DockerCli::new().with_program(fake_docker(tools.path(), Some("push"))?);
    let pipeline = ImagePipeline::new(docker, scratch.path());
    let source = SourceCheckout::from_url(upstream.path().to_string_lossy());

    let err = pipeline
        .build_and_push(&BuildRequest {
            source: &source,
            branch: "develop",
            image_name: "billing",
            registry_uri: "123456789012.dkr.ecr.eu-west-1.amazonaws.com/billing",
            registry_password: "token",
        })
        .expect_err("push should fail");

    match err {
        ImageError::DockerFailed { command, stderr } => {
            assert!(command.starts_with("docker push"));
            assert_eq!(stderr, "push denied");
        }
        other => panic!("expected DockerFailed, got {other:?}"),
    }
    Ok(())
}
