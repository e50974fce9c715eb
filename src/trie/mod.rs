// Copyright (c) 2025 Sonic Operations Ltd
//
// Use of this software is governed by the Business Source License included
// in the LICENSE file and at soniclabs.com/bsl11.
//
// Change Date: 2028-4-16
//
// On the date above, in accordance with the Business Source License, use of
// this software will be governed by the GNU Lesser General Public License v3.

//! The 256-ary authenticated key/value map: node variants with commit
//! caches, the trie operations, and the per-level opening chain.

mod node;
mod proof;

use std::sync::Mutex;

use crate::{
    crypto::Commitment,
    error::Error,
    trie::node::Node,
    types::{Key, Value},
};

pub use proof::{TrieProof, verify_proof};

/// An authenticated key/value store over fixed-length keys and values,
/// able to compute a cryptographic commitment to its full contents using
/// the Pedersen commitment scheme, and to open single keys against that
/// commitment.
///
/// The trait prescribes interior mutability through shared references.
/// Mutations (`store`, `commit`) must be externally serialized; `lookup` and
/// `prove` are safe against each other on a fully committed trie, since they
/// then only read immutable cached commitments.
#[cfg_attr(test, mockall::automock)]
pub trait VerkleTrie: Send + Sync {
    /// Retrieves the value associated with the given key.
    /// Returns the default [`Value`] if the key does not exist.
    fn lookup(&self, key: &Key) -> Result<Value, Error>;

    /// Stores the value for the given key. Overwrites any previous value;
    /// storing the zero value is not a structural delete.
    fn store(&self, key: &Key, value: &Value) -> Result<(), Error>;

    /// Computes and returns the current root commitment of the trie, folding
    /// all outstanding changes upward. The commitment is the identity for an
    /// empty trie and for a trie holding only zero values.
    fn commit(&self) -> Result<Commitment, Error>;

    /// Returns the value for the given key together with a chain of openings
    /// that an independent verifier can check against the root commitment
    /// (see [`verify_proof`]). Commits the trie first.
    fn prove(&self, key: &Key) -> Result<(Value, TrieProof), Error>;

    /// Returns all key/value pairs with a non-zero value, in lexicographic
    /// key order, by walking the tree. This is the enumeration snapshotting
    /// builds on; it never samples the key space.
    fn entries(&self) -> Result<Vec<(Key, Value)>, Error>;
}

/// The in-memory implementation of [`VerkleTrie`].
///
/// This implementation keeps the entire tree resident:
/// - Total tree size is limited by available memory.
/// - No concurrency support beyond a single lock on the root node.
/// - Not optimized for memory usage (all nodes store 256 children / values).
pub struct InMemoryVerkleTrie {
    root: Mutex<Node>,
}

impl InMemoryVerkleTrie {
    pub fn new() -> Self {
        InMemoryVerkleTrie {
            root: Mutex::new(Node::Empty),
        }
    }
}

impl Default for InMemoryVerkleTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl VerkleTrie for InMemoryVerkleTrie {
    fn lookup(&self, key: &Key) -> Result<Value, Error> {
        Ok(self.root.lock().unwrap().lookup(key, 0))
    }

    fn store(&self, key: &Key, value: &Value) -> Result<(), Error> {
        let mut root_lock = self.root.lock().unwrap();
        let root = std::mem::replace(&mut *root_lock, Node::Empty);
        *root_lock = root.store(key, 0, value);
        Ok(())
    }

    fn commit(&self) -> Result<Commitment, Error> {
        Ok(self.root.lock().unwrap().commit())
    }

    fn prove(&self, key: &Key) -> Result<(Value, TrieProof), Error> {
        let mut root = self.root.lock().unwrap();
        // Openings are created against cached commitments, so the tree must
        // be clean before the walk.
        root.commit();
        let mut path = Vec::new();
        let (value, leaf) = root.prove(key, 0, &mut path);
        Ok((value, TrieProof { path, leaf }))
    }

    fn entries(&self) -> Result<Vec<(Key, Value)>, Error> {
        let mut entries = Vec::new();
        self.root.lock().unwrap().collect_entries(&mut entries);
        Ok(entries)
    }
}
