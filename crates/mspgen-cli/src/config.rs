//! # Environment Configuration
//!
//! | Variable                       | Required | Default                                             |
//! |--------------------------------|----------|-----------------------------------------------------|
//! | `GEN_PATH`                     | yes      |                                                     |
//! | `CRYPTOGEN_SCRIPTS_DIR`        | no       | directory of the running executable                 |
//! | `CRYPTOGEN_ARTIFACT_GENERATOR` | no       | `<scripts dir>/../fabric_artifacts/gen_configtx.py` |

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use mspgen_core::CryptoLayout;

/// Output root; `crypto-config/` is created below it.
pub const GEN_PATH: &str = "GEN_PATH";
/// Directory holding the CA tooling scripts.
pub const SCRIPTS_DIR: &str = "CRYPTOGEN_SCRIPTS_DIR";
/// Channel artifact generator executable.
pub const ARTIFACT_GENERATOR: &str = "CRYPTOGEN_ARTIFACT_GENERATOR";

/// Generator location relative to the scripts directory.
pub const DEFAULT_ARTIFACT_GENERATOR: &str = "../fabric_artifacts/gen_configtx.py";

/// Resolved driver configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// Output root.
    pub gen_path: PathBuf,
    /// CA tooling scripts directory.
    pub scripts_dir: PathBuf,
    /// Artifact generator executable.
    pub artifact_generator: PathBuf,
}

impl DriverConfig {
    /// Read the process environment.
    ///
    /// # Errors
    ///
    /// Fails when `GEN_PATH` is unset or empty, or when no scripts directory
    /// is configured and the executable path cannot be determined.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var_os(key), || {
            let exe = std::env::current_exe().context("cannot locate the running executable")?;
            Ok(exe.parent().map(Path::to_path_buf).unwrap_or_default())
        })
    }

    /// Resolve from an arbitrary variable lookup. `exe_dir` is only called
    /// when the scripts directory is not configured.
    pub fn from_lookup<L, E>(lookup: L, exe_dir: E) -> Result<Self>
    where
        L: Fn(&str) -> Option<OsString>,
        E: FnOnce() -> Result<PathBuf>,
    {
        let gen_path = match lookup(GEN_PATH) {
            Some(value) if !value.is_empty() => PathBuf::from(value),
            _ => bail!("environment variable {GEN_PATH} must be set to the output root"),
        };
        let scripts_dir = match lookup(SCRIPTS_DIR) {
            Some(value) if !value.is_empty() => PathBuf::from(value),
            _ => exe_dir()?,
        };
        let artifact_generator = match lookup(ARTIFACT_GENERATOR) {
            Some(value) if !value.is_empty() => PathBuf::from(value),
            _ => scripts_dir.join(DEFAULT_ARTIFACT_GENERATOR),
        };
        Ok(Self {
            gen_path,
            scripts_dir,
            artifact_generator,
        })
    }

    /// Layout rooted at `<GEN_PATH>/crypto-config`.
    pub fn layout(&self) -> CryptoLayout {
        CryptoLayout::under(&self.gen_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let map: HashMap<String, OsString> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_follow_scripts_dir() {
        let config = DriverConfig::from_lookup(lookup(&[(GEN_PATH, "/out")]), || {
            Ok(PathBuf::from("/opt/tools/crypto_tools"))
        })
        .unwrap();
        assert_eq!(config.gen_path, PathBuf::from("/out"));
        assert_eq!(config.scripts_dir, PathBuf::from("/opt/tools/crypto_tools"));
        assert_eq!(
            config.artifact_generator,
            PathBuf::from("/opt/tools/crypto_tools/../fabric_artifacts/gen_configtx.py")
        );
        assert_eq!(config.layout().root(), Path::new("/out/crypto-config"));
    }

    #[test]
    fn explicit_variables_win() {
        let config = DriverConfig::from_lookup(
            lookup(&[
                (GEN_PATH, "/out"),
                (SCRIPTS_DIR, "/s"),
                (ARTIFACT_GENERATOR, "/bin/gen"),
            ]),
            || panic!("executable directory must not be consulted"),
        )
        .unwrap();
        assert_eq!(config.scripts_dir, PathBuf::from("/s"));
        assert_eq!(config.artifact_generator, PathBuf::from("/bin/gen"));
    }

    #[test]
    fn missing_gen_path_fails() {
        let err = DriverConfig::from_lookup(lookup(&[]), || Ok(PathBuf::new())).unwrap_err();
        assert!(format!("{err}").contains("GEN_PATH"));
        let err =
            DriverConfig::from_lookup(lookup(&[(GEN_PATH, "")]), || Ok(PathBuf::new())).unwrap_err();
        assert!(format!("{err}").contains("GEN_PATH"));
    }
}
