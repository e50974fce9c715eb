// Copyright (c) 2025 Sonic Operations Ltd
//
// Use of this software is governed by the Business Source License included
// in the LICENSE file and at soniclabs.com/bsl11.
//
// Change Date: 2028-4-16
//
// On the date above, in accordance with the Business Source License, use of
// this software will be governed by the GNU Lesser General Public License v3.

//! The state-key encoder, projecting (address, field) pairs into 32-byte
//! trie keys. All header fields of an account (basic data, code hash, the
//! first storage slots and code chunks) share a 31-byte stem, so one leaf
//! commitment covers them and a single leaf opening structure suffices for
//! multi-field access.

pub mod code;

use crypto_bigint::{Encoding, U256};

use crate::{
    crypto::{Commitment, Scalar},
    types::{Address, Key},
};

const HEADER_STORAGE_OFFSET: U256 = U256::from_u64(64);
const CODE_OFFSET: U256 = U256::from_u64(128);
const VERKLE_NODE_WIDTH: U256 = U256::from_u64(256);
const VERKLE_NODE_WIDTH_LOG2: u32 = 8;

/// Returns the key of the basic data fields (nonce, balance, code size) for
/// the given address.
pub fn basic_data_key(address: &Address) -> Key {
    trie_key(address, &U256::ZERO, 0)
}

/// Returns the key of the code hash field for the given address.
pub fn code_hash_key(address: &Address) -> Key {
    trie_key(address, &U256::ZERO, 1)
}

/// Returns the key of the code chunk with the given chunk number for the
/// given address. The first 128 chunks land in the account header group.
pub fn code_chunk_key(address: &Address, chunk_number: u32) -> Key {
    let chunk_offset = U256::from_u32(chunk_number) + CODE_OFFSET;
    // Safe to unwrap because VERKLE_NODE_WIDTH is non-zero.
    let (tree_index, sub_index) = chunk_offset.div_rem(&VERKLE_NODE_WIDTH.to_nz().unwrap());
    let sub_index = sub_index.to_le_bytes()[0];
    trie_key(address, &tree_index, sub_index)
}

/// Returns the trie key for the given address and storage slot key.
///
/// The first 64 slots are packed into the account header group; all other
/// slots partition into higher tree indices, 256 slots per leaf.
pub fn storage_key(address: &Address, key: &Key) -> Key {
    let code_storage_delta = CODE_OFFSET - HEADER_STORAGE_OFFSET;
    let mut tree_index = U256::from_be_slice(key);
    let suffix;

    if tree_index < code_storage_delta {
        tree_index += HEADER_STORAGE_OFFSET;
        suffix = tree_index.to_le_bytes()[0];
        tree_index = U256::ZERO;
    } else {
        suffix = key[key.len() - 1];
        tree_index >>= VERKLE_NODE_WIDTH_LOG2;
        tree_index += U256::ONE << (248 - VERKLE_NODE_WIDTH_LOG2);
    }

    trie_key(address, &tree_index, suffix)
}

/// Computes the trie key for the given address, tree index, and sub index.
///
/// The key is computed by:
///   - `C = Commit([2+256*64, address_low, address_high, tree_index_low, tree_index_high])`
///   - `H = Hash(C)`
///   - `K = append(H[..31], sub_index)`
///
/// This matches the key derivation of go-ethereum's `trie/utils/verkle.go`.
fn trie_key(address: &Address, tree_index: &U256, sub_index: u8) -> Key {
    let mut expanded = [0u8; 32];
    expanded[12..].copy_from_slice(address);

    let mut values = [Scalar::zero(); 5];
    values[0] = Scalar::from(2 + 256 * 64);
    values[1] = Scalar::from_le_bytes(&expanded[..16]);
    values[2] = Scalar::from_le_bytes(&expanded[16..]);

    let index = tree_index.to_le_bytes();
    values[3] = Scalar::from_le_bytes(&index[..16]);
    values[4] = Scalar::from_le_bytes(&index[16..]);

    let hash = Commitment::new(&values).hash();

    let mut result: Key = [0; 32];
    result[..31].copy_from_slice(&hash[..31]);
    result[31] = sub_index;
    result
}
