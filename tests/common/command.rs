use assert_cmd::Command;
use std::path::Path;

pub const COMMITTER_NAME: &str = "fake_user";
pub const COMMITTER_EMAIL: &str = "fake_email@email.com";

pub fn run_bkl_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("bkl").expect("Failed to find bkl binary");
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("RUST_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn bkl_append(dir: &Path, log: &str, path: &str, old: &str, new: &str) -> Command {
    let mut cmd = run_bkl_command(dir, &["append", log, path, old, new]);
    cmd.envs(vec![
        ("GIT_COMMITTER_NAME", COMMITTER_NAME),
        ("GIT_COMMITTER_EMAIL", COMMITTER_EMAIL),
        ("GIT_COMMITTER_DATE", "2023-01-01 12:00:00 +0000"), // %Y-%m-%d %H:%M:%S %z
    ]);
    cmd
}
