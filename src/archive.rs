// Copyright (c) 2025 Sonic Operations Ltd
//
// Use of this software is governed by the Business Source License included
// in the LICENSE file and at soniclabs.com/bsl11.
//
// Change Date: 2028-4-16
//
// On the date above, in accordance with the Business Source License, use of
// this software will be governed by the GNU Lesser General Public License v3.

use std::collections::BTreeMap;

use crate::snapshot::Snapshot;

/// The number of blocks an [`Archive`] retains by default.
pub const DEFAULT_RETENTION: usize = 1024;

/// An in-memory archive of state snapshots, keyed by block number.
///
/// The archive keeps at most `retention` blocks, evicting the oldest first.
/// Spilling evicted blocks to disk is not the archive's concern.
#[derive(Debug, Default, Clone)]
pub struct Archive {
    snapshots: BTreeMap<u64, Snapshot>,
    retention: Option<usize>,
}

impl Archive {
    /// Creates an archive retaining at most the given number of blocks.
    pub fn new(retention: usize) -> Self {
        Archive {
            snapshots: BTreeMap::new(),
            retention: Some(retention),
        }
    }

    /// Stores a snapshot for the given block, evicting the oldest blocks if
    /// the retention bound is exceeded.
    pub fn add_block(&mut self, block: u64, snapshot: Snapshot) {
        self.snapshots.insert(block, snapshot);
        let retention = self.retention.unwrap_or(DEFAULT_RETENTION);
        while self.snapshots.len() > retention {
            self.snapshots.pop_first();
        }
    }

    /// Returns the snapshot archived for the given block, if still retained.
    pub fn block(&self, block: u64) -> Option<&Snapshot> {
        self.snapshots.get(&block)
    }

    /// Returns the highest archived block number.
    pub fn block_height(&self) -> Option<u64> {
        self.snapshots.last_key_value().map(|(block, _)| *block)
    }

    /// Returns the number of retained blocks.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Returns true if no block has been archived yet.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test_utils::make_value, trie::{InMemoryVerkleTrie, VerkleTrie}};

    fn snapshot(seed: u64) -> Snapshot {
        let trie = InMemoryVerkleTrie::new();
        trie.store(&[seed as u8; 32], &make_value(seed)).unwrap();
        Snapshot::freeze(&trie).unwrap()
    }

    #[test]
    fn new_archive_is_empty() {
        let archive = Archive::new(10);
        assert!(archive.is_empty());
        assert_eq!(archive.block_height(), None);
        assert_eq!(archive.block(0), None);
    }

    #[test]
    fn blocks_can_be_added_and_retrieved() {
        let mut archive = Archive::new(10);
        let s1 = snapshot(1);
        let s2 = snapshot(2);

        archive.add_block(1, s1.clone());
        archive.add_block(5, s2.clone());

        assert_eq!(archive.len(), 2);
        assert_eq!(archive.block(1), Some(&s1));
        assert_eq!(archive.block(5), Some(&s2));
        assert_eq!(archive.block(3), None);
        assert_eq!(archive.block_height(), Some(5));
    }

    #[test]
    fn adding_block_again_replaces_snapshot() {
        let mut archive = Archive::new(10);
        let s1 = snapshot(1);
        let s2 = snapshot(2);

        archive.add_block(1, s1);
        archive.add_block(1, s2.clone());

        assert_eq!(archive.len(), 1);
        assert_eq!(archive.block(1), Some(&s2));
    }

    #[test]
    fn oldest_blocks_are_evicted_beyond_retention() {
        let mut archive = Archive::new(3);
        for block in 0..10 {
            archive.add_block(block, snapshot(block));
        }

        assert_eq!(archive.len(), 3);
        assert_eq!(archive.block_height(), Some(9));
        for block in 0..7 {
            assert_eq!(archive.block(block), None, "block {block} should be gone");
        }
        for block in 7..10 {
            assert!(archive.block(block).is_some(), "block {block} should remain");
        }
    }

    #[test]
    fn default_archive_uses_default_retention() {
        let mut archive = Archive::default();
        let s = snapshot(1);
        for block in 0..DEFAULT_RETENTION as u64 + 10 {
            archive.add_block(block, s.clone());
        }
        assert_eq!(archive.len(), DEFAULT_RETENTION);
        assert_eq!(archive.block_height(), Some(DEFAULT_RETENTION as u64 + 9));
    }
}
