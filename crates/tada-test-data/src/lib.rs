//! tada-test-data
//!
//! Test artifacts embedded in the crate for use in testing.
//!
//! The files are represented as `TestFile` objects which package the raw binary data
//! and create temporary files for programs to operate on.
use std::fs;
use tempfile::{Builder, NamedTempFile};

#[derive(Debug)]
/// Test File
///
/// Example usage:
///
/// ```ignore
/// // returns (filepath, _tempfile_handle).
/// // _handle ensures the tempfile remains in scope
/// use tada_test_data::TestFile;
/// let (scaler_file, _temp) = TestFile::scaler_reference().create_temp().unwrap();
/// ```
pub struct TestFile {
    filebinary: &'static [u8],
    suffix: &'static str,
}

impl TestFile {
    /// Scaler parameters that leave every channel unchanged.
    /// see `tada-test-data/data/scaler/Readme.md`
    pub fn scaler_identity() -> Self {
        Self {
            filebinary: include_bytes!("../data/scaler/identity_scaler.npy"),
            suffix: "npy",
        }
    }
    /// Scaler parameters with a distinct mean / scale / range per channel.
    pub fn scaler_reference() -> Self {
        Self {
            filebinary: include_bytes!("../data/scaler/reference_scaler.npy"),
            suffix: "npy",
        }
    }

    pub fn bytes(&self) -> &'static [u8] {
        self.filebinary
    }

    pub fn create_temp(&self) -> std::io::Result<(String, NamedTempFile)> {
        let temp = Builder::new()
            .suffix(&format!(".{}", self.suffix))
            .tempfile()?;

        fs::write(&temp, self.filebinary)?;
        let path = temp.path().to_string_lossy().into_owned();

        Ok((path, temp))
    }
}
