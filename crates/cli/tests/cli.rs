use assert_cmd::Command;

fn shelf() -> Command {
    let mut cmd = Command::cargo_bin("shelf").unwrap();
    cmd.env("SHELF_CONFIG_DIR", std::env::temp_dir().join("shelf-cli-no-config"))
        .env_remove("SHELF_ENV")
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "command failed: {output:?}");
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn help_lists_subcommands() {
    let stdout = stdout_of(shelf().arg("--help"));
    assert!(stdout.contains("serve"));
    assert!(stdout.contains("migrate"));
}

#[test]
fn migrate_against_memory_store_applies_books_schema() {
    let stdout = stdout_of(
        shelf()
            .arg("migrate")
            .env("SHELF_DATABASE__URL", "sqlite::memory:"),
    );
    assert!(stdout.contains("applied 1 migration(s)"));
}

#[test]
fn unknown_environment_fails() {
    shelf().arg("migrate").env("SHELF_ENV", "qa").assert().failure();
}
