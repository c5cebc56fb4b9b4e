/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fs::{File, OpenOptions};
use std::path::Path;

use memmap2::MmapMut;

use crate::landmarks::error::{LandmarkError, LandmarkResult};
use crate::landmarks::weight_codec::SHORT_INFINITY;

/// 16-byte header: `[coreNodeCount:i32, K:i32, S:i32, round(factor*1e6):i32]`.
/// Lives in a reserved region at the start of the file, ahead of the weight
/// matrix and the trailing landmark-id mapping region.
const HEADER_SIZE: u64 = 16;

/// Row-major byte-addressed store of `(from, to)` shorts per (core-node,
/// landmark), plus a trailing landmark-id mapping region. Backed
/// by a growable memory-mapped file: the matrix is filled with
/// [`SHORT_INFINITY`] up front, then filled in by the weight filler.
pub struct WeightTable {
    file: File,
    mmap: MmapMut,
    core_node_count: u32,
    k: u32,
    s: u32,
}

fn row_stride_bytes(k: u32) -> u64 {
    k as u64 * 4
}

impl WeightTable {
    fn matrix_size(core_node_count: u32, k: u32) -> u64 {
        core_node_count as u64 * row_stride_bytes(k)
    }

    fn mapping_size(s: u32, k: u32) -> u64 {
        s as u64 * row_stride_bytes(k)
    }

    pub fn matrix_offset() -> u64 {
        HEADER_SIZE
    }

    fn mapping_offset(&self) -> u64 {
        HEADER_SIZE + Self::matrix_size(self.core_node_count, self.k)
    }

    /// Creates a fresh table at `path`, sized for the weight matrix only
    /// (`S` is not yet known -- see `set_subnetwork_count`). Every short is
    /// initialised to `SHORT_INFINITY` "Initial fill".
    pub fn create(path: &Path, core_node_count: u32, k: u32) -> LandmarkResult<Self> {
        let file = OpenOptions::new().read(true).write(true).create(true).truncate(true).open(path)?;
        let initial_len = HEADER_SIZE + Self::matrix_size(core_node_count, k);
        file.set_len(initial_len)?;
        let mmap = unsafe { MmapMut::map_mut(&file)? };
        let mut table = Self {
            file,
            mmap,
            core_node_count,
            k,
            s: 0,
        };
        table.write_header();
        for core_idx in 0..core_node_count {
            for lm in 0..k {
                table.set_short_raw(Self::cell_offset_raw(core_idx, k, lm, 0), SHORT_INFINITY);
                table.set_short_raw(Self::cell_offset_raw(core_idx, k, lm, 2), SHORT_INFINITY);
            }
        }
        Ok(table)
    }

    /// Second capacity-growth step: extends the file by
    /// `S * K * 4` bytes once the subnetwork count is known (after Tarjan).
    pub fn set_subnetwork_count(&mut self, s: u32) -> LandmarkResult<()> {
        self.s = s;
        let total = HEADER_SIZE + Self::matrix_size(self.core_node_count, self.k) + Self::mapping_size(s, self.k);
        self.ensure_capacity(total)?;
        self.write_header();
        Ok(())
    }

    pub fn ensure_capacity(&mut self, bytes: u64) -> LandmarkResult<()> {
        let current = self.file.metadata()?.len();
        if bytes > current {
            self.file.set_len(bytes)?;
            self.mmap = unsafe { MmapMut::map_mut(&self.file)? };
        }
        Ok(())
    }

    fn write_header(&mut self) {
        self.set_int_raw(0, self.core_node_count as i32);
        self.set_int_raw(4, self.k as i32);
        self.set_int_raw(8, self.s as i32);
        // header slot 12 (factor) is written by set_factor_header, since the
        // codec is constructed after the table in LandmarkStorage::build.
    }

    pub fn set_factor_header(&mut self, header_factor: i32) {
        self.set_int_raw(12, header_factor);
    }

    pub fn header_core_node_count(&self) -> i32 {
        self.get_int_raw(0)
    }

    pub fn header_k(&self) -> i32 {
        self.get_int_raw(4)
    }

    pub fn header_s(&self) -> i32 {
        self.get_int_raw(8)
    }

    pub fn header_factor(&self) -> i32 {
        self.get_int_raw(12)
    }

    fn cell_offset_raw(core_idx: u32, k: u32, landmark_idx: u32, which: u64) -> u64 {
        HEADER_SIZE + core_idx as u64 * row_stride_bytes(k) + landmark_idx as u64 * 4 + which
    }

    /// Address of the stored `from` (which=0) or `to` (which=2) short for
    /// `(core_idx, landmark_idx)`'s addressing formula.
    pub fn cell_offset(&self, core_idx: u32, landmark_idx: u32, which: u64) -> u64 {
        Self::cell_offset_raw(core_idx, self.k, landmark_idx, which)
    }

    pub fn mapping_entry_offset(&self, subnetwork_index: u32, landmark_idx: u32) -> u64 {
        self.mapping_offset() + subnetwork_index as u64 * row_stride_bytes(self.k) + landmark_idx as u64 * 4
    }

    pub fn get_short(&self, offset: u64) -> u16 {
        let o = offset as usize;
        u16::from_le_bytes([self.mmap[o], self.mmap[o + 1]])
    }

    pub fn set_short(&mut self, offset: u64, value: u16) {
        self.set_short_raw(offset, value);
    }

    fn set_short_raw(&mut self, offset: u64, value: u16) {
        let o = offset as usize;
        self.mmap[o..o + 2].copy_from_slice(&value.to_le_bytes());
    }

    pub fn get_int(&self, offset: u64) -> i32 {
        self.get_int_raw(offset)
    }

    pub fn set_int(&mut self, offset: u64, value: i32) {
        self.set_int_raw(offset, value);
    }

    fn get_int_raw(&self, offset: u64) -> i32 {
        let o = offset as usize;
        i32::from_le_bytes([self.mmap[o], self.mmap[o + 1], self.mmap[o + 2], self.mmap[o + 3]])
    }

    fn set_int_raw(&mut self, offset: u64, value: i32) {
        let o = offset as usize;
        self.mmap[o..o + 4].copy_from_slice(&value.to_le_bytes());
    }

    pub fn flush(&mut self) -> LandmarkResult<()> {
        self.mmap.flush()?;
        Ok(())
    }

    /// Reopens an existing table, checking the persisted node count against
    /// `current_core_node_count` (mismatch is a `GraphMismatch` error).
    pub fn load(path: &Path, current_core_node_count: u32) -> LandmarkResult<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let mmap = unsafe { MmapMut::map_mut(&file)? };
        if (mmap.len() as u64) < HEADER_SIZE {
            return Err(LandmarkError::new("weight table file too small to contain a header"));
        }
        let core_node_count = i32::from_le_bytes(mmap[0..4].try_into().unwrap());
        let k = i32::from_le_bytes(mmap[4..8].try_into().unwrap());
        let s = i32::from_le_bytes(mmap[8..12].try_into().unwrap());
        if core_node_count != current_core_node_count as i32 {
            return Err(LandmarkError::GraphMismatch {
                persisted: core_node_count,
                current: current_core_node_count as i32,
            });
        }
        Ok(Self {
            file,
            mmap,
            core_node_count: core_node_count as u32,
            k: k as u32,
            s: s as u32,
        })
    }

    pub fn core_node_count(&self) -> u32 {
        self.core_node_count
    }

    pub fn k(&self) -> u32 {
        self.k
    }

    pub fn s(&self) -> u32 {
        self.s
    }

    /// Idempotent: a second call is a no-op beyond re-flushing already
    /// flushed pages.
    pub fn close(&mut self) -> LandmarkResult<()> {
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn initial_fill_is_short_infinity() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("weights.bin");
        let table = WeightTable::create(&path, 3, 2).unwrap();
        for core_idx in 0..3 {
            for lm in 0..2 {
                assert_eq!(table.get_short(table.cell_offset(core_idx, lm, 0)), SHORT_INFINITY);
                assert_eq!(table.get_short(table.cell_offset(core_idx, lm, 2)), SHORT_INFINITY);
            }
        }
    }

    #[test]
    fn header_round_trips_through_flush_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("weights.bin");
        {
            let mut table = WeightTable::create(&path, 3, 2).unwrap();
            table.set_subnetwork_count(2).unwrap();
            table.set_factor_header(42);
            table.set_short(table.cell_offset(1, 0, 0), 777);
            table.flush().unwrap();
        }
        let loaded = WeightTable::load(&path, 3).unwrap();
        assert_eq!(loaded.header_core_node_count(), 3);
        assert_eq!(loaded.header_k(), 2);
        assert_eq!(loaded.header_s(), 2);
        assert_eq!(loaded.header_factor(), 42);
        assert_eq!(loaded.get_short(loaded.cell_offset(1, 0, 0)), 777);
    }

    #[test]
    fn load_rejects_node_count_mismatch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("weights.bin");
        {
            let mut table = WeightTable::create(&path, 3, 2).unwrap();
            table.flush().unwrap();
        }
        let result = WeightTable::load(&path, 4);
        assert!(matches!(result, Err(LandmarkError::GraphMismatch { .. })));
    }
}
