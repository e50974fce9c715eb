// Copyright (c) 2025 Sonic Operations Ltd
//
// Use of this software is governed by the Business Source License included
// in the LICENSE file and at soniclabs.com/bsl11.
//
// Change Date: 2028-4-16
//
// On the date above, in accordance with the Business Source License, use of
// this software will be governed by the GNU Lesser General Public License v3.

//! An in-memory Verkle trie state engine.
//!
//! The crate provides a 256-ary authenticated key/value map whose inner
//! nodes commit to their children with Pedersen vector commitments over the
//! Banderwagon curve ([`trie`]), single-key opening proofs checkable against
//! the root commitment alone ([`trie::verify_proof`]), the deterministic
//! encoding of account fields, storage slots and contract code into the
//! trie's 32-byte address space ([`embedding`], [`state`]), and a verified
//! snapshot container with a block-indexed archive ([`snapshot`],
//! [`archive`]).
//!
//! Keys and values are fixed-width 32-byte strings; the all-zero value means
//! "absent", and a trie holding only zero values is indistinguishable from
//! an empty one, including in its root commitment.

pub mod archive;
pub mod crypto;
pub mod embedding;
mod error;
pub mod snapshot;
pub mod state;
#[cfg(test)]
mod test_utils;
pub mod trie;
pub mod types;

pub use archive::Archive;
pub use crypto::{Commitment, Opening, Scalar};
pub use error::Error;
pub use snapshot::Snapshot;
pub use state::{
    BalanceUpdate, CodeUpdate, EMPTY_CODE_HASH, NonceUpdate, SlotUpdate, Update, VerkleState,
};
pub use trie::{InMemoryVerkleTrie, TrieProof, VerkleTrie, verify_proof};
