//! Drive the scan command against a stub tool end to end

#![cfg(unix)]

use lintrelay_cli::commands;
use lintrelay_cli::OutputFormat;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

const STUB_TOOL: &str = r#"#!/bin/sh
if [ "$1" = "--errorlist" ]; then
cat <<'EOF'
<?xml version="1.0"?>
<results version="2">
  <errors>
    <error id="nullPointer" severity="error" msg=""/>
  </errors>
</results>
EOF
exit 0
fi
list=""
for arg in "$@"; do
  case "$arg" in
    --file-list=*) list="${arg#--file-list=}" ;;
  esac
done
while IFS= read -r f; do
  printf '%s[LINTRELAY]12[LINTRELAY]nullPointer[LINTRELAY]error[LINTRELAY]Null pointer dereference\n' "$f" >&2
done < "$list"
exit 0
"#;

fn install_stub(dir: &Path) -> std::path::PathBuf {
    let tool = dir.join("stubcheck");
    std::fs::write(&tool, STUB_TOOL).unwrap();
    let mut perms = std::fs::metadata(&tool).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&tool, perms).unwrap();
    tool
}

#[test]
fn scan_command_produces_work_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("src");
    std::fs::create_dir(&source).unwrap();
    std::fs::write(source.join("a.cpp"), "int main() { return 0; }\n").unwrap();

    let tool = install_stub(dir.path());
    std::fs::write(
        source.join(".lintrelay.toml"),
        format!(
            "[tool]\nbinary = \"{}\"\nhome = \"{}\"\n",
            tool.display(),
            dir.path().display()
        ),
    )
    .unwrap();

    let work_dir = dir.path().join("work");
    commands::scan::run(
        Some(&source),
        Some(&work_dir),
        &[],
        false,
        "HEAD",
        OutputFormat::Json,
    )
    .unwrap();

    let manifest = std::fs::read_to_string(work_dir.join("paths.txt")).unwrap();
    assert!(manifest.ends_with("a.cpp"));
    assert!(work_dir.join("errorlist.xml").exists());
    assert!(work_dir.join("scan_result.txt").exists());
}

#[test]
fn scan_command_fails_on_missing_source_root() {
    let err = commands::scan::run(
        Some(Path::new("/definitely/not/a/real/tree")),
        None,
        &[],
        false,
        "HEAD",
        OutputFormat::Json,
    )
    .unwrap_err();
    assert!(err.to_string().contains("source root"));
}
