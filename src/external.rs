//! Invocation of the external `diff` utility in context mode.

use std::{
    path::{Path, PathBuf},
    process::Command,
};

use crate::{diff::CONTEXT_LINES, errors::SyndiffError};

/// Runs `<program> -C 1 <first> <second>`.
#[derive(Debug, Clone)]
pub struct ExternalDiff {
    program: PathBuf,
}

impl ExternalDiff {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Capture the raw context diff of two files.
    ///
    /// Exit status 1 only means the files differ, so its output is returned like that of
    /// status 0. Any other status, or a kill by signal, is a tooling failure.
    pub fn run(&self, first: &Path, second: &Path) -> Result<String, SyndiffError> {
        let program = self.program.display().to_string();
        let output = Command::new(&self.program)
            .arg("-C")
            .arg(CONTEXT_LINES.to_string())
            .arg(first)
            .arg(second)
            .output()
            .map_err(|source| SyndiffError::DiffSpawn {
                program: program.clone(),
                source,
            })?;

        match output.status.code() {
            Some(code @ (0 | 1)) => {
                tracing::debug!("`{program}` exited with {code}");
                Ok(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            _ => Err(SyndiffError::DiffFailed {
                program,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, process::Command};

    use tempfile::tempdir;

    use super::ExternalDiff;
    use crate::errors::SyndiffError;

    /// The context format below is GNU diffutils'; skip where a different `diff` is installed.
    fn gnu_diff_available() -> bool {
        Command::new("diff")
            .arg("--version")
            .output()
            .map(|o| o.status.success() && String::from_utf8_lossy(&o.stdout).contains("GNU"))
            .unwrap_or(false)
    }

    #[test]
    fn identical_files_give_empty_output() {
        if !gnu_diff_available() {
            return;
        }
        let dir = tempdir().unwrap();
        let (a, b) = (dir.path().join("1"), dir.path().join("2"));
        fs::write(&a, "int x;\n").unwrap();
        fs::write(&b, "int x;\n").unwrap();
        assert_eq!(ExternalDiff::new("diff").run(&a, &b).unwrap(), "");
    }

    #[test]
    fn differing_files_are_not_an_error() {
        if !gnu_diff_available() {
            return;
        }
        let dir = tempdir().unwrap();
        let (a, b) = (dir.path().join("1"), dir.path().join("2"));
        fs::write(&a, "int x;\n").unwrap();
        fs::write(&b, "long x;\n").unwrap();
        let raw = ExternalDiff::new("diff").run(&a, &b).unwrap();
        let lines: Vec<&str> = raw.lines().collect();
        assert!(lines[0].starts_with("*** "));
        assert!(lines[1].starts_with("--- "));
        assert_eq!(
            &lines[2..],
            ["***************", "*** 1 ****", "! int x;", "--- 1 ----", "! long x;"]
        );
    }

    #[test]
    fn missing_input_is_a_tooling_failure() {
        if !gnu_diff_available() {
            return;
        }
        let dir = tempdir().unwrap();
        let err = ExternalDiff::new("diff")
            .run(&dir.path().join("absent-1"), &dir.path().join("absent-2"))
            .unwrap_err();
        assert!(matches!(err, SyndiffError::DiffFailed { .. }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn missing_program_cannot_spawn() {
        let dir = tempdir().unwrap();
        let err = ExternalDiff::new(dir.path().join("no-such-diff"))
            .run(&dir.path().join("1"), &dir.path().join("2"))
            .unwrap_err();
        assert!(matches!(err, SyndiffError::DiffSpawn { .. }));
    }
}
