/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use memmap2::MmapMut;

use crate::landmarks::error::LandmarkResult;

const RECORD_SIZE: u64 = 8;

/// Sanitises a weighting name into something safe to embed in a file name.
pub fn sanitise_weighting_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect()
}

pub fn eccentricity_file_name(weighting_name: &str) -> String {
    format!("eccentricities_{}", sanitise_weighting_name(weighting_name))
}

/// Fixed 8-byte-per-node table: `fullyReachable: i32` at offset 0,
/// `ceil(eccentricity): i32` at offset 4. No concurrency
/// guarantees -- callers synchronise externally.
pub struct EccentricityStore {
    file: File,
    mmap: MmapMut,
    node_count: u32,
}

impl EccentricityStore {
    pub fn init(path: &Path, node_count: u32) -> LandmarkResult<Self> {
        let file = OpenOptions::new().read(true).write(true).create(true).truncate(true).open(path)?;
        file.set_len(node_count as u64 * RECORD_SIZE)?;
        let mmap = unsafe { MmapMut::map_mut(&file)? };
        Ok(Self { file, mmap, node_count })
    }

    pub fn load(path: &Path) -> LandmarkResult<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let mmap = unsafe { MmapMut::map_mut(&file)? };
        let node_count = (mmap.len() as u64 / RECORD_SIZE) as u32;
        Ok(Self { file, mmap, node_count })
    }

    pub fn path_for(dir: &Path, weighting_name: &str) -> PathBuf {
        dir.join(eccentricity_file_name(weighting_name))
    }

    fn offset(&self, node: u32) -> usize {
        debug_assert!(node < self.node_count, "node out of eccentricity table bounds");
        (node as u64 * RECORD_SIZE) as usize
    }

    pub fn set_eccentricity(&mut self, node: u32, eccentricity: f64) {
        let o = self.offset(node) + 4;
        let value = eccentricity.ceil() as i32;
        self.mmap[o..o + 4].copy_from_slice(&value.to_le_bytes());
    }

    pub fn get_eccentricity(&self, node: u32) -> i32 {
        let o = self.offset(node) + 4;
        i32::from_le_bytes(self.mmap[o..o + 4].try_into().unwrap())
    }

    pub fn set_fully_reachable(&mut self, node: u32, reachable: bool) {
        let o = self.offset(node);
        let value: i32 = if reachable { 1 } else { 0 };
        self.mmap[o..o + 4].copy_from_slice(&value.to_le_bytes());
    }

    pub fn get_fully_reachable(&self, node: u32) -> bool {
        let o = self.offset(node);
        i32::from_le_bytes(self.mmap[o..o + 4].try_into().unwrap()) != 0
    }

    pub fn flush(&mut self) -> LandmarkResult<()> {
        self.mmap.flush()?;
        Ok(())
    }

    pub fn close(&mut self) -> LandmarkResult<()> {
        self.flush()
    }

    pub fn node_count(&self) -> u32 {
        self.node_count
    }

    pub fn file(&self) -> &File {
        &self.file
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trips_through_flush_close_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ecc.bin");
        {
            let mut store = EccentricityStore::init(&path, 100).unwrap();
            store.set_eccentricity(42, 3.3);
            store.set_fully_reachable(42, true);
            store.flush().unwrap();
            store.close().unwrap();
        }
        let store = EccentricityStore::load(&path).unwrap();
        assert_eq!(store.get_eccentricity(42), 4);
        assert!(store.get_fully_reachable(42));
    }

    #[test]
    fn sanitises_weighting_names() {
        assert_eq!(sanitise_weighting_name("fastest|car"), "fastest_car");
        assert_eq!(eccentricity_file_name("shortest"), "eccentricities_shortest");
    }
}
