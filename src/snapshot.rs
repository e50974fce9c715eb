// Copyright (c) 2025 Sonic Operations Ltd
//
// Use of this software is governed by the Business Source License included
// in the LICENSE file and at soniclabs.com/bsl11.
//
// Change Date: 2028-4-16
//
// On the date above, in accordance with the Business Source License, use of
// this software will be governed by the GNU Lesser General Public License v3.

//! The snapshot container: a frozen copy of a trie's contents together with
//! its root commitment, serializable to a self-describing byte format.
//!
//! The container layout is
//!
//!   [metaLen:u32-be][meta][partLen:u32-be][part]
//!
//! where `meta` is the 32-byte compressed root commitment followed by a
//! 4-byte big-endian part count (always 1), and `part` is `[n:u32-be]`
//! followed by `n` records of `[key:32][value:32]` covering every non-zero
//! key/value pair.

use crate::{error::Error, trie::VerkleTrie, types::{Key, Value}};

const META_LEN: usize = 32 + 4;
const RECORD_LEN: usize = 64;

/// A frozen copy of a trie's non-zero key/value pairs, authenticated by the
/// root commitment they fold to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    commitment: [u8; 32],
    entries: Vec<(Key, Value)>,
}

impl Snapshot {
    /// Freezes the given trie into a snapshot: commits it and enumerates all
    /// resident non-zero key/value pairs by walking the tree.
    pub fn freeze<T: VerkleTrie + ?Sized>(trie: &T) -> Result<Self, Error> {
        let commitment = trie.commit()?.compress();
        let entries = trie.entries()?;
        Ok(Snapshot {
            commitment,
            entries,
        })
    }

    /// The compressed root commitment the snapshot's entries fold to.
    pub fn commitment(&self) -> [u8; 32] {
        self.commitment
    }

    /// Serializes the snapshot into the container format.
    pub fn to_bytes(&self) -> Vec<u8> {
        let part_len = 4 + self.entries.len() * RECORD_LEN;
        let mut out = Vec::with_capacity(4 + META_LEN + 4 + part_len);

        out.extend_from_slice(&(META_LEN as u32).to_be_bytes());
        out.extend_from_slice(&self.commitment);
        out.extend_from_slice(&1u32.to_be_bytes());

        out.extend_from_slice(&(part_len as u32).to_be_bytes());
        out.extend_from_slice(&(self.entries.len() as u32).to_be_bytes());
        for (key, value) in &self.entries {
            out.extend_from_slice(key);
            out.extend_from_slice(value);
        }
        out
    }

    /// Deserializes a snapshot from the container format, checking its
    /// structure. The carried commitment is only validated against the
    /// entries on [`Self::restore_into`].
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        let (meta_len, rest) = read_u32(data, "metadata length")?;
        if meta_len as usize != META_LEN {
            return Err(Error::MalformedSnapshot(format!(
                "invalid metadata length: expected {META_LEN}, got {meta_len}"
            )));
        }
        let (meta, rest) = read_bytes(rest, META_LEN, "metadata")?;
        // Safe to unwrap: meta holds exactly META_LEN bytes.
        let commitment: [u8; 32] = meta[..32].try_into().unwrap();
        let part_count = u32::from_be_bytes(meta[32..].try_into().unwrap());
        if part_count != 1 {
            return Err(Error::MalformedSnapshot(format!(
                "invalid part count: expected 1, got {part_count}"
            )));
        }

        let (part_len, part) = read_u32(rest, "part length")?;
        if part_len as usize != part.len() {
            return Err(Error::MalformedSnapshot(format!(
                "invalid part length: expected {}, got {}",
                part.len(),
                part_len
            )));
        }

        let (record_count, mut records) = read_u32(part, "record count")?;
        if records.len() != record_count as usize * RECORD_LEN {
            return Err(Error::MalformedSnapshot(format!(
                "invalid part size: expected {} records of {RECORD_LEN} bytes, got {} bytes",
                record_count,
                records.len()
            )));
        }

        let mut entries = Vec::with_capacity(record_count as usize);
        for _ in 0..record_count {
            // Safe to unwrap: the length check above covers all records.
            let key: Key = records[..32].try_into().unwrap();
            let value: Value = records[32..64].try_into().unwrap();
            entries.push((key, value));
            records = &records[RECORD_LEN..];
        }

        Ok(Snapshot {
            commitment,
            entries,
        })
    }

    /// Restores the snapshot's entries into the given trie and verifies that
    /// the resulting root commitment equals the one carried by the snapshot.
    ///
    /// On a commitment mismatch the trie has already been modified and must
    /// be discarded.
    pub fn restore_into<T: VerkleTrie + ?Sized>(&self, trie: &T) -> Result<(), Error> {
        for (key, value) in &self.entries {
            trie.store(key, value)?;
        }
        if trie.commit()?.compress() != self.commitment {
            return Err(Error::CommitmentMismatch);
        }
        Ok(())
    }
}

fn read_u32<'d>(data: &'d [u8], what: &str) -> Result<(u32, &'d [u8]), Error> {
    let (bytes, rest) = read_bytes(data, 4, what)?;
    // Safe to unwrap: read_bytes returned exactly 4 bytes.
    Ok((u32::from_be_bytes(bytes.try_into().unwrap()), rest))
}

fn read_bytes<'d>(data: &'d [u8], len: usize, what: &str) -> Result<(&'d [u8], &'d [u8]), Error> {
    if data.len() < len {
        return Err(Error::MalformedSnapshot(format!(
            "truncated {what}: expected {len} bytes, got {}",
            data.len()
        )));
    }
    Ok(data.split_at(len))
}
