use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

/// `bara` with a clean environment so ambient `INPUT_*` variables never leak in.
fn bara_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("bara"));
    cmd.env_clear()
        .env("HOME", home)
        .env("USERPROFILE", home)
        .env("RUST_LOG", "warn");
    cmd
}

fn job_flags(cmd: &mut Command) -> &mut Command {
    cmd.args([
        "--sot-repo",
        "acme/internal",
        "--destination-repo",
        "acme/public",
        "--committer",
        "Bot <bot@acme.dev>",
        "--origin-include",
        "src/** README.md",
        "--move",
        "src||lib",
    ])
}

#[test]
fn render_prints_synthesized_document() {
    let home = TempDir::new().expect("tempdir");
    let mut cmd = bara_cmd(home.path());
    cmd.arg("render");
    job_flags(&mut cmd)
        .assert()
        .success()
        .stdout(contains(r#"SOT_REPO = "https://github.com/acme/internal.git""#))
        .stdout(contains(r#"ORIGIN_FILES_INCLUDE = ["src/**","README.md"]"#))
        .stdout(contains(r#"core.move("src", "lib", paths = glob(["**"]))"#));
    assert!(
        !home.path().join("copy.bara.sky").exists(),
        "render must not stage anything"
    );
}

#[test]
fn render_reads_inputs_from_action_env() {
    let home = TempDir::new().expect("tempdir");
    bara_cmd(home.path())
        .arg("render")
        .env("INPUT_SOT_REPO", "acme/internal")
        .env("INPUT_DESTINATION_REPO", "acme/public")
        .env("INPUT_COMMITTER", "Bot <bot@acme.dev>")
        .env("INPUT_CUSTOM_CONFIG", "")
        .env("INPUT_PR_NUMBER", "")
        .env("GITHUB_ACTOR", "octocat")
        .assert()
        .success()
        .stdout(contains(r#"DESTINATION_REPO = "https://github.com/acme/public.git""#))
        .stdout(contains(r#"ASSIGNEES = ["octocat"]"#));
}

#[test]
fn missing_committer_exits_with_config_failure() {
    let home = TempDir::new().expect("tempdir");
    bara_cmd(home.path())
        .args([
            "render",
            "--sot-repo",
            "acme/internal",
            "--destination-repo",
            "acme/public",
        ])
        .assert()
        .code(51)
        .stderr(contains(r#"You need to set a value for "committer"."#));
}

#[test]
fn render_custom_config_is_verbatim() {
    let home = TempDir::new().expect("tempdir");
    let custom = home.path().join("custom.sky");
    fs::write(&custom, "core.workflow(name = \"mine\")\n").expect("write custom");

    bara_cmd(home.path())
        .args(["render", "--committer", "Bot <bot@acme.dev>", "--custom-config"])
        .arg(&custom)
        .assert()
        .success()
        .stdout("core.workflow(name = \"mine\")\n");
}

#[test]
fn render_from_job_file() {
    let home = TempDir::new().expect("tempdir");
    let job = home.path().join("job.yaml");
    fs::write(
        &job,
        "sot: { repo: acme/internal, branch: trunk }\n\
         destination: { repo: acme/public }\n\
         committer: Bot <bot@acme.dev>\n\
         push:\n  origin_include: [\"**\"]\n",
    )
    .expect("write job");

    bara_cmd(home.path())
        .args(["render", "--job"])
        .arg(&job)
        .assert()
        .success()
        .stdout(contains(r#"SOT_BRANCH = "trunk""#));
}

fn write_rule_job(home: &Path) -> std::path::PathBuf {
    let job = home.join("job.yaml");
    fs::write(
        &job,
        "sot: { repo: acme/internal }\n\
         destination: { repo: acme/public }\n\
         committer: Bot <bot@acme.dev>\n\
         workflow: push\n\
         push:\n  origin_include: [\"**\"]\n  move: [\"src||lib\"]\n  replace: [\"ACME||Acme\"]\n",
    )
    .expect("write job");
    job
}

#[test]
fn workflow_input_overrides_job_file() {
    let home = TempDir::new().expect("tempdir");
    let job = write_rule_job(home.path());

    let output = bara_cmd(home.path())
        .args(["render", "--job"])
        .arg(&job)
        .args(["--workflow", "pr", "--pr-number", "42"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let doc = String::from_utf8(output).expect("utf8");
    let replace = doc.find("core.replace(").expect("replace clause");
    let moved = doc.find("core.move(").expect("move clause");
    assert!(replace < moved, "pr puts replaces first:\n{doc}");
}

#[test]
fn create_repo_from_env_needs_token() {
    let home = TempDir::new().expect("tempdir");
    let job = write_rule_job(home.path());

    bara_cmd(home.path())
        .env("INPUT_CREATE_REPO", "yes")
        .args(["render", "--job"])
        .arg(&job)
        .assert()
        .code(51)
        .stderr(contains(r#""access_token""#));
}

#[test]
fn diff_against_empty_stage_then_matching_stage() {
    let home = TempDir::new().expect("tempdir");
    let stage = TempDir::new().expect("tempdir");

    let mut cmd = bara_cmd(home.path());
    cmd.arg("diff").arg("--stage-dir").arg(stage.path());
    let output = job_flags(&mut cmd).assert().success().get_output().stdout.clone();
    let diff = String::from_utf8(output).expect("utf8");
    assert!(diff.contains("+SOT_REPO"), "unexpected diff:\n{diff}");

    let mut render = bara_cmd(home.path());
    render.arg("render");
    let rendered = job_flags(&mut render).assert().success().get_output().stdout.clone();
    fs::write(stage.path().join("copy.bara.sky"), rendered).expect("stage document");

    let mut cmd = bara_cmd(home.path());
    cmd.arg("diff").arg("--stage-dir").arg(stage.path());
    job_flags(&mut cmd)
        .assert()
        .success()
        .stdout(contains("No differences"))
        .stdout(contains("+SOT_REPO").not());
}
