// Copyright (c) 2025 Sonic Operations Ltd
//
// Use of this software is governed by the Business Source License included
// in the LICENSE file and at soniclabs.com/bsl11.
//
// Change Date: 2028-4-16
//
// On the date above, in accordance with the Business Source License, use of
// this software will be governed by the GNU Lesser General Public License v3.

use crate::{
    crypto::{Commitment, Opening, Scalar},
    trie::proof::{InnerOpening, LeafOpening, SuffixOpening},
    types::{Key, Stem, Value},
};

/// A node in the in-memory Verkle trie.
#[derive(Debug)]
pub enum Node {
    Empty,
    Inner(InnerNode),
    Leaf(LeafNode),
}

impl Node {
    /// Returns the value associated with the given key, or the default value
    /// if the key does not exist.
    pub fn lookup(&self, key: &Key, depth: u8) -> Value {
        match self {
            Node::Empty => Value::default(),
            Node::Inner(inner) => inner.lookup(key, depth),
            Node::Leaf(leaf) => leaf.lookup(key),
        }
    }

    /// Stores the value for the given key.
    /// Consumes the node and returns an updated version.
    pub fn store(self, key: &Key, depth: u8, value: &Value) -> Node {
        match self {
            Node::Empty => {
                if depth == 0 {
                    // While conceptually it would suffice to create a leaf
                    // node here, Geth always roots the trie in an inner node
                    // (and we want to stay compatible).
                    let inner = InnerNode::new();
                    inner.store(key, depth, value)
                } else {
                    let leaf = LeafNode::new(key);
                    leaf.store(key, depth, value)
                }
            }
            Node::Inner(inner) => inner.store(key, depth, value),
            Node::Leaf(leaf) => leaf.store(key, depth, value),
        }
    }

    /// Computes and returns the commitment of this node.
    ///
    /// If the commitment is already up to date, it is returned without
    /// recomputation.
    pub fn commit(&mut self) -> Commitment {
        match self {
            Node::Empty => Commitment::default(),
            Node::Inner(inner) => inner.commit(),
            Node::Leaf(leaf) => leaf.commit(),
        }
    }

    /// Returns true if the commitment of this node is dirty and needs to be
    /// recomputed.
    fn commitment_is_dirty(&self) -> bool {
        match self {
            Node::Empty => false,
            Node::Inner(inner) => inner.commitment_dirty,
            Node::Leaf(leaf) => leaf.commitment_dirty,
        }
    }

    /// Collects the single-position openings along the path of the given key.
    ///
    /// Must only be called on a fully committed subtree; openings are created
    /// against the cached commitments.
    pub fn prove(
        &self,
        key: &Key,
        depth: u8,
        path: &mut Vec<InnerOpening>,
    ) -> (Value, Option<LeafOpening>) {
        match self {
            Node::Empty => (Value::default(), None),
            Node::Inner(inner) => inner.prove(key, depth, path),
            Node::Leaf(leaf) => leaf.prove(key),
        }
    }

    /// Appends all key/value pairs with a non-zero value in this subtree to
    /// `out`, in lexicographic key order.
    pub fn collect_entries(&self, out: &mut Vec<(Key, Value)>) {
        match self {
            Node::Empty => {}
            Node::Inner(inner) => {
                for child in inner.children.iter() {
                    child.collect_entries(out);
                }
            }
            Node::Leaf(leaf) => {
                for (suffix, value) in leaf.values.iter().enumerate() {
                    if *value != Value::default() {
                        let mut key = Key::default();
                        key[..31].copy_from_slice(&leaf.stem);
                        key[31] = suffix as u8;
                        out.push((key, *value));
                    }
                }
            }
        }
    }
}

/// An inner node of the trie, containing up to 256 children.
///
/// Besides the children, the node carries the scalar that was last folded
/// into its commitment for every child slot. This is what allows the commit
/// step to refresh a changed slot with a single incremental commitment
/// update, and it stays correct when a child slot is structurally replaced
/// (e.g. a leaf being split into a subtree).
#[derive(Debug)]
pub struct InnerNode {
    children: Box<[Node; 256]>,
    child_scalars: Box<[Scalar; 256]>,
    commitment: Commitment,
    commitment_dirty: bool,
}

impl InnerNode {
    /// Creates a new inner node without any children.
    fn new() -> Self {
        InnerNode {
            children: Box::new([const { Node::Empty }; 256]),
            child_scalars: Box::new([Scalar::zero(); 256]),
            commitment: Commitment::default(),
            commitment_dirty: true,
        }
    }

    /// Creates a new inner node with the given leaf node as child at the
    /// given position. The leaf is marked dirty so that the next commit folds
    /// it into this node's commitment.
    pub fn new_with_leaf(mut leaf: LeafNode, position: u8) -> Self {
        let mut inner = Self::new();
        leaf.commitment_dirty = true;
        inner.children[position as usize] = Node::Leaf(leaf);
        inner
    }

    /// Returns the value associated with the given key, by forwarding the
    /// request to the child at position `key[depth]`.
    pub fn lookup(&self, key: &Key, depth: u8) -> Value {
        self.children[key[depth as usize] as usize].lookup(key, depth + 1)
    }

    /// Stores the value for the given key by forwarding the request to the
    /// child at position `key[depth]`.
    ///
    /// If no child exists at that position, a new leaf node is created.
    ///
    /// Consumes the node and returns an updated version.
    pub fn store(mut self, key: &Key, depth: u8, value: &Value) -> Node {
        self.commitment_dirty = true;

        let pos = key[depth as usize];
        let next = std::mem::replace(&mut self.children[pos as usize], Node::Empty);
        self.children[pos as usize] = next.store(key, depth + 1, value);
        Node::Inner(self)
    }

    /// Computes and returns the commitment of this node, by first updating
    /// the commitments of all children that are dirty and then refreshing the
    /// respective slots of this node's commitment from the previously folded
    /// scalars.
    ///
    /// If the commitment is already up to date, it is returned without
    /// recomputation.
    pub fn commit(&mut self) -> Commitment {
        if !self.commitment_dirty {
            return self.commitment;
        }

        for (i, child) in self.children.iter_mut().enumerate() {
            if child.commitment_is_dirty() {
                let new = child.commit().to_scalar();
                if new != self.child_scalars[i] {
                    self.commitment.update(i as u8, self.child_scalars[i], new);
                    self.child_scalars[i] = new;
                }
            }
        }

        self.commitment_dirty = false;
        self.commitment
    }

    /// See [`Node::prove`].
    pub fn prove(
        &self,
        key: &Key,
        depth: u8,
        path: &mut Vec<InnerOpening>,
    ) -> (Value, Option<LeafOpening>) {
        let index = key[depth as usize];
        let child = self.child_scalars[index as usize];
        let opening = Opening::new(&self.commitment, self.child_scalars.as_slice(), index);
        path.push(InnerOpening {
            commitment: self.commitment,
            index,
            child,
            opening,
        });

        // A zero scalar marks an empty (or all-zero, which is equivalent)
        // subtree; the chain ends here as an absence proof.
        if child == Scalar::zero() {
            return (Value::default(), None);
        }

        match &self.children[index as usize] {
            Node::Empty => (Value::default(), None),
            Node::Inner(inner) => inner.prove(key, depth + 1, path),
            Node::Leaf(leaf) => leaf.prove(key),
        }
    }
}

/// A leaf node of the trie, containing the 256 values of one stem.
///
/// The 32-byte values cannot be represented by single scalars, so each value
/// is split at the 16-byte boundary into a little-endian (low, high) pair.
/// Slots 0..128 feed one suffix vector and slots 128..256 the other, slot `i`
/// occupying positions `2i % 256` and `(2i+1) % 256`. The two suffix
/// commitments `C1` and `C2` are maintained incrementally: every value write
/// is a pair of single-slot commitment updates.
///
/// The commitment of the leaf itself folds the suffix commitments as
///
///   C = Commit([1, stem, scalar(C1), scalar(C2)])
///
/// except that a leaf whose values are all zero commits to the identity, so
/// that it is indistinguishable from an absent subtree. The leading 1 marker
/// separates non-empty leaf commitments from inner-node commitments: an
/// inner node would need a child subtree whose commitment projects to the
/// scalar 1 to produce the same vector, which the projection's pre-image
/// resistance rules out.
#[derive(Debug)]
pub struct LeafNode {
    stem: Stem,
    values: Box<[Value; 256]>,
    suffix_commitments: [Commitment; 2],
    nonzero_values: u16,
    commitment: Commitment,
    commitment_dirty: bool,
}

impl LeafNode {
    /// Creates a new leaf node for the given key, initializing all values to
    /// the default [Value].
    pub fn new(key: &Key) -> Self {
        LeafNode {
            stem: key[..31].try_into().unwrap(), // safe to unwrap because `Key` is 32 bytes long
            values: Box::new([Value::default(); 256]),
            suffix_commitments: [Commitment::default(); 2],
            nonzero_values: 0,
            commitment: Commitment::default(),
            commitment_dirty: true,
        }
    }

    /// Returns the value associated with the given key, or the default
    /// [Value] if the key does not match the stem of this leaf.
    pub fn lookup(&self, key: &Key) -> Value {
        if key[..31] != self.stem {
            Value::default()
        } else {
            self.values[key[31] as usize]
        }
    }

    /// Stores the value for the given key.
    ///
    /// If the stem of the key does not match the stem of this leaf, the leaf
    /// is split into an inner node with two children (the existing leaf and a
    /// new leaf for the key).
    pub fn store(mut self, key: &Key, depth: u8, value: &Value) -> Node {
        if key[..31] == self.stem {
            self.set_value(key[31], value);
            return Node::Leaf(self);
        }

        // This leaf needs to be split. Placing it into a fresh inner node one
        // level down and re-storing the key builds the required chain of
        // inner nodes one shared stem byte at a time.
        let pos = self.stem[depth as usize];
        let inner = InnerNode::new_with_leaf(self, pos);
        inner.store(key, depth, value)
    }

    /// Overwrites the value at the given sub-index, applying the two half
    /// updates to the affected suffix commitment.
    fn set_value(&mut self, suffix: u8, value: &Value) {
        let old = std::mem::replace(&mut self.values[suffix as usize], *value);
        if old != *value {
            let low_pos = suffix.wrapping_mul(2);
            let commitment = &mut self.suffix_commitments[(suffix / 128) as usize];
            commitment.update(
                low_pos,
                Scalar::from_le_bytes(&old[..16]),
                Scalar::from_le_bytes(&value[..16]),
            );
            commitment.update(
                low_pos + 1,
                Scalar::from_le_bytes(&old[16..]),
                Scalar::from_le_bytes(&value[16..]),
            );
            match (old == Value::default(), *value == Value::default()) {
                (true, false) => self.nonzero_values += 1,
                (false, true) => self.nonzero_values -= 1,
                _ => {}
            }
        }
        self.commitment_dirty = true;
    }

    /// Computes and returns the commitment of this leaf node by folding the
    /// incrementally maintained suffix commitments.
    ///
    /// If the commitment is already up to date, it is returned without
    /// recomputation.
    pub fn commit(&mut self) -> Commitment {
        if !self.commitment_dirty {
            return self.commitment;
        }
        self.commitment = if self.nonzero_values == 0 {
            Commitment::default()
        } else {
            Commitment::new(&self.folding_scalars()[..4])
        };
        self.commitment_dirty = false;
        self.commitment
    }

    /// See [`Node::prove`].
    pub fn prove(&self, key: &Key) -> (Value, Option<LeafOpening>) {
        let folding = self.folding_scalars();
        let marker_opening = Opening::new(&self.commitment, &folding, 0);
        let stem_opening = Opening::new(&self.commitment, &folding, 1);

        if key[..31] != self.stem {
            // A foreign stem occupies the queried path; proving the stem slot
            // is sufficient to show the queried key is absent.
            let leaf = LeafOpening {
                commitment: self.commitment,
                stem: self.stem,
                marker_opening,
                stem_opening,
                suffix: None,
            };
            return (Value::default(), Some(leaf));
        }

        let suffix = key[31];
        let half = (suffix / 128) as usize;
        let suffix_commitment = self.suffix_commitments[half];
        let opening = Opening::new(&self.commitment, &folding, 2 + half as u8);

        let suffix_scalars = self.suffix_scalars(half);
        let low_pos = suffix.wrapping_mul(2);
        let low = Opening::new(&suffix_commitment, &suffix_scalars, low_pos);
        let high = Opening::new(&suffix_commitment, &suffix_scalars, low_pos + 1);

        let leaf = LeafOpening {
            commitment: self.commitment,
            stem: self.stem,
            marker_opening,
            stem_opening,
            suffix: Some(SuffixOpening {
                commitment: suffix_commitment,
                opening,
                low,
                high,
            }),
        };
        (self.values[suffix as usize], Some(leaf))
    }

    /// The 256-element vector the leaf commitment is computed over; only the
    /// first four positions are used.
    fn folding_scalars(&self) -> Vec<Scalar> {
        let mut scalars = vec![Scalar::zero(); 256];
        scalars[0] = Scalar::from(1);
        scalars[1] = Scalar::from_le_bytes(&self.stem);
        scalars[2] = self.suffix_commitments[0].to_scalar();
        scalars[3] = self.suffix_commitments[1].to_scalar();
        scalars
    }

    /// The 256-element vector committed to by the given suffix commitment.
    fn suffix_scalars(&self, half: usize) -> Vec<Scalar> {
        let mut scalars = vec![Scalar::zero(); 256];
        for i in 0..128 {
            let value = &self.values[half * 128 + i];
            scalars[2 * i] = Scalar::from_le_bytes(&value[..16]);
            scalars[2 * i + 1] = Scalar::from_le_bytes(&value[16..]);
        }
        scalars
    }
}
