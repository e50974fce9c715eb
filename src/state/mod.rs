// Copyright (c) 2025 Sonic Operations Ltd
//
// Use of this software is governed by the Business Source License included
// in the LICENSE file and at soniclabs.com/bsl11.
//
// Change Date: 2028-4-16
//
// On the date above, in accordance with the Business Source License, use of
// this software will be governed by the GNU Lesser General Public License v3.

//! The state projection: account records, storage slots, and contract code
//! encoded into the trie's 32-byte address space.
//!
//! The basic data fields of an account are packed into a single trie value:
//! bytes 0..4 are reserved, bytes 4..8 hold the code size (big-endian),
//! bytes 8..16 the nonce, and bytes 16..32 the balance (big-endian,
//! truncated to 128 bits).

mod update;

use std::sync::Mutex;

use sha3::{Digest, Keccak256};

use crate::{
    archive::Archive,
    embedding::{self, code},
    error::Error,
    snapshot::Snapshot,
    trie::{InMemoryVerkleTrie, VerkleTrie},
    types::{Address, Hash, Key, Nonce, U256, Value},
};

pub use update::{BalanceUpdate, CodeUpdate, NonceUpdate, SlotUpdate, Update};

/// The Keccak-256 hash of the empty byte string, stored as the code hash of
/// accounts without code.
pub const EMPTY_CODE_HASH: Hash = [
    197, 210, 70, 1, 134, 247, 35, 60, 146, 126, 125, 178, 220, 199, 3, 192, 229, 0, 182, 83, 202,
    130, 39, 59, 123, 250, 216, 4, 93, 133, 164, 112,
];

/// A chain state tracking account and storage data in a Verkle trie.
///
/// All domain objects are projected into trie keys by the
/// [`crate::embedding`] module; the state itself only performs the packing
/// and unpacking of field values. Every applied block is frozen into a
/// snapshot and kept in an in-memory archive.
pub struct VerkleState<T: VerkleTrie> {
    trie: T,
    archive: Mutex<Archive>,
}

impl VerkleState<InMemoryVerkleTrie> {
    /// Creates a new, empty in-memory state.
    pub fn new() -> Self {
        Self::with_trie(InMemoryVerkleTrie::new())
    }
}

impl Default for VerkleState<InMemoryVerkleTrie> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: VerkleTrie> VerkleState<T> {
    /// Creates a state on top of the given trie.
    pub fn with_trie(trie: T) -> Self {
        VerkleState {
            trie,
            archive: Mutex::new(Archive::default()),
        }
    }

    /// Checks if the given account exists, i.e., has a non-zero nonce or
    /// balance.
    pub fn account_exists(&self, addr: &Address) -> Result<bool, Error> {
        let value = self.trie.lookup(&embedding::basic_data_key(addr))?;
        // Nonce and balance are laid out in bytes 8..32 of the basic data.
        Ok(value[8..32] != [0; 24])
    }

    /// Returns the balance of the given account.
    pub fn balance(&self, addr: &Address) -> Result<U256, Error> {
        let value = self.trie.lookup(&embedding::basic_data_key(addr))?;
        let mut result = U256::default();
        result[16..].copy_from_slice(&value[16..32]);
        Ok(result)
    }

    /// Returns the nonce of the given account.
    pub fn nonce(&self, addr: &Address) -> Result<Nonce, Error> {
        let value = self.trie.lookup(&embedding::basic_data_key(addr))?;
        // Safe to unwrap: always 8 bytes
        Ok(value[8..16].try_into().unwrap())
    }

    /// Returns the value of the storage slot (addr, key).
    pub fn storage_value(&self, addr: &Address, key: &Key) -> Result<Value, Error> {
        self.trie.lookup(&embedding::storage_key(addr, key))
    }

    /// Returns the code stored under the given address.
    pub fn code(&self, addr: &Address) -> Result<Vec<u8>, Error> {
        let len = self.code_size(addr)?;
        let chunk_count = len / 31 + 1;
        let mut chunks = Vec::with_capacity(chunk_count as usize);
        for i in 0..chunk_count {
            chunks.push(self.trie.lookup(&embedding::code_chunk_key(addr, i))?);
        }
        let mut result = vec![0x0; len as usize];
        code::merge_code(&chunks, &mut result);
        Ok(result)
    }

    /// Returns the length of the code stored under the given address.
    pub fn code_size(&self, addr: &Address) -> Result<u32, Error> {
        let value = self.trie.lookup(&embedding::basic_data_key(addr))?;
        // Safe to unwrap: always 4 bytes
        Ok(u32::from_be_bytes(value[4..8].try_into().unwrap()))
    }

    /// Returns the hash of the code stored under the given address.
    pub fn code_hash(&self, addr: &Address) -> Result<Hash, Error> {
        self.trie.lookup(&embedding::code_hash_key(addr))
    }

    /// Returns the global state hash, the compressed root commitment of the
    /// underlying trie.
    pub fn root_hash(&self) -> Result<Hash, Error> {
        Ok(self.trie.commit()?.compress())
    }

    /// Applies the provided block update to the maintained state and archives
    /// the resulting state under the given block number.
    pub fn apply_update(&self, block: u64, update: &Update) -> Result<(), Error> {
        let _span = tracy_client::span!("VerkleState::apply_update");

        // Initialize potentially empty accounts with the empty code hash.
        // Existing account data is left untouched.
        for addr in &update.created_accounts {
            let basic_key = embedding::basic_data_key(addr);
            let value = self.trie.lookup(&basic_key)?;
            if value[4..32] == [0; 28] {
                self.trie.store(&basic_key, &value)?;
                self.trie
                    .store(&embedding::code_hash_key(addr), &EMPTY_CODE_HASH)?;
            }
        }

        for NonceUpdate { addr, nonce } in &update.nonces {
            let key = embedding::basic_data_key(addr);
            let mut value = self.trie.lookup(&key)?;
            value[8..16].copy_from_slice(nonce);
            self.trie.store(&key, &value)?;
        }

        for BalanceUpdate { addr, balance } in &update.balances {
            let key = embedding::basic_data_key(addr);
            let mut value = self.trie.lookup(&key)?;
            value[16..32].copy_from_slice(&balance[16..]);
            self.trie.store(&key, &value)?;
        }

        for SlotUpdate { addr, key, value } in &update.slots {
            self.trie.store(&embedding::storage_key(addr, key), value)?;
        }

        for CodeUpdate { addr, code } in &update.codes {
            // Store the code length.
            let key = embedding::basic_data_key(addr);
            let mut value = self.trie.lookup(&key)?;
            value[4..8].copy_from_slice(&(code.len() as u32).to_be_bytes());
            self.trie.store(&key, &value)?;

            // Store the code hash.
            let mut hasher = Keccak256::new();
            hasher.update(code);
            let code_hash = Hash::from(hasher.finalize());
            self.trie
                .store(&embedding::code_hash_key(addr), &code_hash)?;

            // Store the actual code.
            for (i, chunk) in code::split_code(code).into_iter().enumerate() {
                self.trie
                    .store(&embedding::code_chunk_key(addr, i as u32), &chunk)?;
            }
        }

        let snapshot = self.freeze()?;
        self.archive.lock().unwrap().add_block(block, snapshot);
        Ok(())
    }

    /// Freezes the current state into a snapshot.
    pub fn freeze(&self) -> Result<Snapshot, Error> {
        Snapshot::freeze(&self.trie)
    }

    /// Returns the highest block number held by the archive, or `None` if no
    /// block has been applied yet.
    pub fn archived_block_height(&self) -> Option<u64> {
        self.archive.lock().unwrap().block_height()
    }

    /// Returns the archived snapshot for the given block number, if it is
    /// still retained.
    pub fn archived_snapshot(&self, block: u64) -> Option<Snapshot> {
        self.archive.lock().unwrap().block(block).cloned()
    }
}
