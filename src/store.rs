//! Persistence of engine inputs and results.
//!
//! JSON is the interchange format with the extraction and rendering
//! collaborators; CBOR is used for compact snapshots of permutation results.

use crate::engine::PermutationSet;
use crate::error::PermuteResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Reads a JSON document from `path`.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> PermuteResult<T> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Writes `value` to `path` as pretty-printed JSON.
pub fn save_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> PermuteResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

impl PermutationSet {
    /// Serializes the set to CBOR bytes.
    pub fn to_cbor(&self) -> PermuteResult<Vec<u8>> {
        Ok(serde_cbor::to_vec(self)?)
    }

    /// Deserializes a set from CBOR bytes.
    pub fn from_cbor(bytes: &[u8]) -> PermuteResult<Self> {
        Ok(serde_cbor::from_slice(bytes)?)
    }

    /// Saves the set to a file.
    ///
    /// Uses CBOR format.
    pub fn save_to_file(&self, path: &Path) -> PermuteResult<()> {
        std::fs::write(path, self.to_cbor()?)?;
        Ok(())
    }

    /// Loads a set from a file.
    ///
    /// Uses CBOR format.
    pub fn load_from_file(path: &Path) -> PermuteResult<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_cbor(&bytes)
    }
}
