//! # Script-backed CA Provider
//!
//! Runs the CA tooling shipped next to the binary:
//!
//! ```text
//! <scripts>/create_root_ca.sh                          <cn> <folder> <stem>
//! <scripts>/create_intermediate_ca.sh                  <cn> <folder> <parent stem> <stem> <True|False> <attrs>
//! <scripts>/signingIdentity/generateSigningIdentity.sh <user folder>
//! ```
//!
//! Arguments are passed directly to the process (no shell), so the attribute
//! payload needs no quoting. Child stdio is inherited. Any non-zero exit is
//! reported with the full command line.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

use mspgen_core::ExternalCallError;

use crate::error::CaResult;
use crate::provider::{can_sign_flag, CaProvider, IntermediateCaRequest, RootCaRequest};

/// Root CA creation script, relative to the scripts directory.
pub const CREATE_ROOT_CA: &str = "create_root_ca.sh";
/// Intermediate CA creation script, relative to the scripts directory.
pub const CREATE_INTERMEDIATE_CA: &str = "create_intermediate_ca.sh";
/// Signing identity script, relative to the scripts directory.
pub const GENERATE_SIGNING_IDENTITY: &str = "signingIdentity/generateSigningIdentity.sh";

/// Run `program` with `args`, blocking until it exits.
///
/// # Errors
///
/// [`ExternalCallError::Spawn`] if the process cannot be started,
/// [`ExternalCallError::Failed`] if it exits unsuccessfully.
pub fn run_command<I, S>(program: &Path, args: I) -> Result<(), ExternalCallError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
    let command = render_command(program, &args);
    tracing::debug!(%command, "running external command");

    let status = Command::new(program)
        .args(&args)
        .status()
        .map_err(|source| ExternalCallError::Spawn {
            command: command.clone(),
            source,
        })?;

    if !status.success() {
        return Err(ExternalCallError::Failed {
            command,
            status: status.to_string(),
        });
    }
    Ok(())
}

fn render_command(program: &Path, args: &[OsString]) -> String {
    let mut line = program.display().to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}

/// CA provider that shells out to the CA tooling scripts.
#[derive(Debug, Clone)]
pub struct ScriptCaProvider {
    scripts_dir: PathBuf,
}

impl ScriptCaProvider {
    /// Provider using scripts under `scripts_dir`.
    pub fn new(scripts_dir: impl Into<PathBuf>) -> Self {
        Self {
            scripts_dir: scripts_dir.into(),
        }
    }

    fn script(&self, name: &str) -> PathBuf {
        self.scripts_dir.join(name)
    }
}

impl CaProvider for ScriptCaProvider {
    fn create_root_ca(&self, request: &RootCaRequest<'_>) -> CaResult<()> {
        run_command(
            &self.script(CREATE_ROOT_CA),
            [
                OsStr::new(request.common_name),
                request.output_folder.as_os_str(),
                OsStr::new(request.file_stem),
            ],
        )?;
        Ok(())
    }

    fn create_intermediate_ca(&self, request: &IntermediateCaRequest<'_>) -> CaResult<()> {
        run_command(
            &self.script(CREATE_INTERMEDIATE_CA),
            [
                OsStr::new(request.common_name),
                request.output_folder.as_os_str(),
                request.parent_stem.as_os_str(),
                OsStr::new(request.file_stem),
                OsStr::new(can_sign_flag(request.can_sign)),
                OsStr::new(request.attributes),
            ],
        )?;
        Ok(())
    }

    fn generate_signing_identity(&self, user_folder: &Path) -> CaResult<()> {
        run_command(&self.script(GENERATE_SIGNING_IDENTITY), [user_folder])?;
        Ok(())
    }

    fn provider_name(&self) -> &str {
        "ScriptCaProvider"
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    #[test]
    fn successful_command_returns_ok() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "ok.sh", "exit 0");
        run_command(&script, ["a", "b"]).unwrap();
    }

    #[test]
    fn failing_command_reports_command_line() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "fail.sh", "exit 4");
        let err = run_command(&script, ["ca.org1", "/tmp/x"]).unwrap_err();
        match err {
            ExternalCallError::Failed { command, status } => {
                assert!(command.ends_with("fail.sh ca.org1 /tmp/x"));
                assert!(status.contains('4'));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_command(&dir.path().join("nope.sh"), Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, ExternalCallError::Spawn { .. }));
    }

    #[test]
    fn intermediate_script_receives_arguments_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("args.log");
        write_script(
            dir.path(),
            CREATE_INTERMEDIATE_CA,
            &format!("printf '%s\\n' \"$@\" > {}", log.display()),
        );
        let provider = ScriptCaProvider::new(dir.path());
        let out = dir.path().join("out");
        let parent = dir.path().join("org1/ca/ca.org1");
        provider
            .create_intermediate_ca(&IntermediateCaRequest {
                common_name: "ca.User1.org1",
                output_folder: &out,
                parent_stem: &parent,
                file_stem: "ca",
                can_sign: false,
                attributes: r#"{"attrs":{"role":"approver"}}"#,
            })
            .unwrap();

        let logged = std::fs::read_to_string(&log).unwrap();
        let args: Vec<&str> = logged.lines().collect();
        assert_eq!(
            args,
            vec![
                "ca.User1.org1",
                out.to_str().unwrap(),
                parent.to_str().unwrap(),
                "ca",
                "False",
                r#"{"attrs":{"role":"approver"}}"#,
            ]
        );
    }

    #[test]
    fn signing_identity_script_lives_in_subfolder() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("called");
        write_script(
            dir.path(),
            GENERATE_SIGNING_IDENTITY,
            &format!("echo \"$1\" > {}", marker.display()),
        );
        let provider = ScriptCaProvider::new(dir.path());
        provider
            .generate_signing_identity(Path::new("/gen/users/Admin1.org1"))
            .unwrap();
        assert_eq!(
            std::fs::read_to_string(&marker).unwrap().trim(),
            "/gen/users/Admin1.org1"
        );
        assert_eq!(provider.provider_name(), "ScriptCaProvider");
    }
}
