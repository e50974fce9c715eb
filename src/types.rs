// Copyright (c) 2025 Sonic Operations Ltd
//
// Use of this software is governed by the Business Source License included
// in the LICENSE file and at soniclabs.com/bsl11.
//
// Change Date: 2028-4-16
//
// On the date above, in accordance with the Business Source License, use of
// this software will be governed by the GNU Lesser General Public License v3.

/// An account address.
pub type Address = [u8; 20];

/// A key in the state trie.
pub type Key = [u8; 32];

/// A value in the state trie.
/// The all-zero value is the "absent" value: a key that was never written
/// and a key that was written with the zero value are indistinguishable.
pub type Value = [u8; 32];

/// The 31-byte prefix shared by all keys stored in the same leaf node.
pub type Stem = [u8; 31];

/// A hash.
pub type Hash = [u8; 32];

/// A 256-bit integer in big-endian byte representation.
pub type U256 = [u8; 32];

/// An account nonce.
/// No numeric operations are performed on nonces; using `[u8; 8]` instead of
/// `u64` avoids imposing 8 byte alignment on containing structs.
pub type Nonce = [u8; 8];
