//! Result file output.
//!
//! The decimal string is staged in a temporary file in the destination
//! directory and renamed into place, so the result file is either the
//! complete string plus one trailing newline or not there at all.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::PiError;

/// Default name of the result file.
pub const RESULT_FILE: &str = "computed_pi.txt";

/// Write `pi_decimal` plus one trailing newline to `path`.
pub fn write_pi_file(path: &Path, pi_decimal: &str) -> Result<(), PiError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(pi_decimal.as_bytes())?;
    staged.write_all(b"\n")?;
    staged.persist(path).map_err(|e| PiError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn writes_string_plus_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(RESULT_FILE);
        write_pi_file(&path, "3.14").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "3.14\n");
    }

    #[test]
    fn overwrites_previous_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(RESULT_FILE);
        write_pi_file(&path, "3.1").unwrap();
        write_pi_file(&path, "3.14159").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "3.14159\n");
    }

    #[test]
    fn leaves_no_staging_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(RESULT_FILE);
        write_pi_file(&path, "3.14").unwrap();
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn bare_filename_writes_into_cwd_tempdir() {
        // A path with no parent component must stage in ".".
        let dir = tempfile::tempdir().unwrap();
        let old = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();
        let result = write_pi_file(Path::new(RESULT_FILE), "3.1");
        std::env::set_current_dir(old).unwrap();
        result.unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join(RESULT_FILE)).unwrap(),
            "3.1\n"
        );
    }
}
