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
    types::{Key, Stem, Value},
};

/// The per-level record for an inner node on the proven path: the node's
/// commitment, the child slot the path descends into, the scalar committed at
/// that slot, and the opening binding the two to the commitment.
///
/// A zero child scalar terminates the chain: by the identity convention it
/// attests that the subtree below the slot is empty (or stores only zero
/// values, which is indistinguishable).
pub struct InnerOpening {
    pub(crate) commitment: Commitment,
    pub(crate) index: u8,
    pub(crate) child: Scalar,
    pub(crate) opening: Opening,
}

/// The openings binding a (sub-index, value) pair to a leaf commitment: the
/// suffix-tree commitment holding the value's two halves, its opening against
/// the leaf commitment, and the openings of the two halves themselves.
pub struct SuffixOpening {
    pub(crate) commitment: Commitment,
    pub(crate) opening: Opening,
    pub(crate) low: Opening,
    pub(crate) high: Opening,
}

/// The terminal record of a proof chain: the leaf's commitment, its stem with
/// the openings pinning the leaf marker and the stem slot, and, if the stem
/// matches the queried key, the suffix openings for the value.
///
/// A leaf whose stem differs from the queried key proves the key's absence:
/// the stem opening shows that a foreign stem occupies the entire subtree.
pub struct LeafOpening {
    pub(crate) commitment: Commitment,
    pub(crate) stem: Stem,
    pub(crate) marker_opening: Opening,
    pub(crate) stem_opening: Opening,
    pub(crate) suffix: Option<SuffixOpening>,
}

/// A proof that a key holds a certain value (possibly the zero value) in a
/// trie with a given root commitment: one [`InnerOpening`] per inner node on
/// the path, terminated either by a zero child scalar or by a [`LeafOpening`].
///
/// Produced by [`crate::trie::VerkleTrie::prove`], checked by
/// [`verify_proof`].
pub struct TrieProof {
    pub(crate) path: Vec<InnerOpening>,
    pub(crate) leaf: Option<LeafOpening>,
}

/// Checks a [`TrieProof`] against an independently known root commitment.
///
/// Returns true iff the proof shows that `key` holds `value` in the trie
/// committed to by `root`. Any mismatch, structural or cryptographic, yields
/// `false`; verification never errors.
pub fn verify_proof(root: &Commitment, key: &Key, value: &Value, proof: &TrieProof) -> bool {
    // The empty trie commits to the identity and stores nothing.
    if proof.path.is_empty() {
        return proof.leaf.is_none()
            && *root == Commitment::default()
            && *value == Value::default();
    }

    // Walk the inner chain. Each record's commitment must reproduce the
    // scalar its parent committed to, and each opening must bind the claimed
    // (slot, scalar) pair to the record's commitment.
    let mut parent_scalar = None;
    for (depth, step) in proof.path.iter().enumerate() {
        let chained = match parent_scalar {
            None => step.commitment == *root,
            Some(scalar) => step.commitment.to_scalar() == scalar,
        };
        if !chained || depth >= 31 || step.index != key[depth] {
            return false;
        }
        if !step.opening.verify(&step.commitment, step.index, &step.child) {
            return false;
        }
        if step.child == Scalar::zero() {
            // Absence: the chain must end here with the zero value.
            return depth == proof.path.len() - 1
                && proof.leaf.is_none()
                && *value == Value::default();
        }
        parent_scalar = Some(step.child);
    }

    // A chain that did not reach a zero scalar must terminate in a leaf.
    let (Some(leaf), Some(parent_scalar)) = (&proof.leaf, parent_scalar) else {
        return false;
    };
    if leaf.commitment.to_scalar() != parent_scalar {
        return false;
    }

    // The marker slot separates leaf commitments from inner commitments: an
    // inner node would need a child subtree projecting to the scalar 1 to
    // produce the same record.
    if !leaf
        .marker_opening
        .verify(&leaf.commitment, 0, &Scalar::from(1))
    {
        return false;
    }

    // The stem slot pins which stem occupies this path.
    if !leaf
        .stem_opening
        .verify(&leaf.commitment, 1, &Scalar::from_le_bytes(&leaf.stem))
    {
        return false;
    }
    if leaf.stem[..] != key[..31] {
        // A foreign stem occupies the path, so the queried key is absent.
        return leaf.suffix.is_none() && *value == Value::default();
    }
    let Some(suffix) = &leaf.suffix else {
        return false;
    };

    // The suffix-tree commitment is folded into the leaf at slot 2 or 3,
    // depending on which half of the sub-index space the key addresses.
    let half = key[31] / 128;
    if !suffix.opening.verify(
        &leaf.commitment,
        2 + half,
        &suffix.commitment.to_scalar(),
    ) {
        return false;
    }

    // Finally, the two halves of the claimed value must be the ones committed
    // at the sub-index's positions of the suffix tree.
    let low_pos = key[31].wrapping_mul(2);
    suffix.low.verify(
        &suffix.commitment,
        low_pos,
        &Scalar::from_le_bytes(&value[..16]),
    ) && suffix.high.verify(
        &suffix.commitment,
        low_pos + 1,
        &Scalar::from_le_bytes(&value[16..]),
    )
}

#[cfg(test)]
mod slow_tests {
    use super::*;
    use crate::{
        test_utils::{make_key, make_leaf_key, make_value},
        trie::{InMemoryVerkleTrie, VerkleTrie},
    };

    fn committed_trie(entries: &[(Key, Value)]) -> (InMemoryVerkleTrie, Commitment) {
        let trie = InMemoryVerkleTrie::new();
        for (key, value) in entries {
            trie.store(key, value).unwrap();
        }
        let root = trie.commit().unwrap();
        (trie, root)
    }

    #[test]
    fn proof_for_stored_value_verifies_against_root() {
        let key1 = make_leaf_key(&[1, 2], 3);
        let key2 = make_leaf_key(&[1, 5], 200);
        let (trie, root) = committed_trie(&[(key1, make_value(42)), (key2, make_value(84))]);

        for (key, value) in [(key1, make_value(42)), (key2, make_value(84))] {
            let (proven_value, proof) = trie.prove(&key).unwrap();
            assert_eq!(proven_value, value);
            assert!(verify_proof(&root, &key, &value, &proof));
        }
    }

    #[test]
    fn proof_shows_absence_of_key_in_empty_slot() {
        let key = make_leaf_key(&[1, 2], 3);
        let absent = make_leaf_key(&[9, 9], 7);
        let (trie, root) = committed_trie(&[(key, make_value(42))]);

        let (value, proof) = trie.prove(&absent).unwrap();
        assert_eq!(value, Value::default());
        assert!(verify_proof(&root, &absent, &Value::default(), &proof));

        // The chain ends at the root with a zero child scalar.
        assert_eq!(proof.path.len(), 1);
        assert!(proof.leaf.is_none());
    }

    #[test]
    fn proof_shows_absence_of_key_with_foreign_stem() {
        let key = make_leaf_key(&[1, 2], 3);
        // Shares the first byte, so the path runs into the stored leaf.
        let mut absent = key;
        absent[30] ^= 0xff;
        let (trie, root) = committed_trie(&[(key, make_value(42))]);

        let (value, proof) = trie.prove(&absent).unwrap();
        assert_eq!(value, Value::default());
        assert!(verify_proof(&root, &absent, &Value::default(), &proof));

        let leaf = proof.leaf.as_ref().unwrap();
        assert_ne!(&leaf.stem[..], &absent[..31]);
        assert!(leaf.suffix.is_none());
    }

    #[test]
    fn proof_shows_absence_of_unwritten_sub_index_in_resident_leaf() {
        let key = make_leaf_key(&[1, 2], 3);
        let sibling = make_leaf_key(&[1, 2], 4);
        let (trie, root) = committed_trie(&[(key, make_value(42))]);

        let (value, proof) = trie.prove(&sibling).unwrap();
        assert_eq!(value, Value::default());
        assert!(verify_proof(&root, &sibling, &Value::default(), &proof));

        // The sibling shares the stem, so the proof carries zero-value
        // openings against the leaf's suffix commitment.
        assert!(proof.leaf.as_ref().unwrap().suffix.is_some());
    }

    #[test]
    fn proof_for_empty_trie_is_empty() {
        let trie = InMemoryVerkleTrie::new();
        let root = trie.commit().unwrap();
        assert_eq!(root, Commitment::default());

        let key = make_key(&[1]);
        let (value, proof) = trie.prove(&key).unwrap();
        assert_eq!(value, Value::default());
        assert!(proof.path.is_empty());
        assert!(verify_proof(&root, &key, &Value::default(), &proof));

        // An empty proof does not verify against a non-identity root.
        let (_, non_empty_root) = committed_trie(&[(key, make_value(1))]);
        assert!(!verify_proof(&non_empty_root, &key, &Value::default(), &proof));
    }

    #[test]
    fn proof_does_not_verify_different_value() {
        let key = make_leaf_key(&[1, 2], 3);
        let (trie, root) = committed_trie(&[(key, make_value(42))]);

        let (_, proof) = trie.prove(&key).unwrap();
        assert!(!verify_proof(&root, &key, &make_value(43), &proof));
        assert!(!verify_proof(&root, &key, &Value::default(), &proof));

        // Flipping a single byte of the value breaks verification.
        let mut tampered = make_value(42);
        tampered[20] ^= 0x01;
        assert!(!verify_proof(&root, &key, &tampered, &proof));
    }

    #[test]
    fn proof_does_not_verify_against_different_root() {
        let key = make_leaf_key(&[1, 2], 3);
        let (trie, _) = committed_trie(&[(key, make_value(42))]);
        let (_, other_root) = committed_trie(&[(key, make_value(43))]);

        let (value, proof) = trie.prove(&key).unwrap();
        assert!(!verify_proof(&other_root, &key, &value, &proof));
    }

    #[test]
    fn proof_does_not_verify_different_key() {
        let key = make_leaf_key(&[1, 2], 3);
        let sibling = make_leaf_key(&[1, 2], 4);
        let (trie, root) = committed_trie(&[(key, make_value(42)), (sibling, make_value(7))]);

        let (value, proof) = trie.prove(&key).unwrap();
        assert!(!verify_proof(&root, &sibling, &value, &proof));
    }

    #[test]
    fn tampered_openings_do_not_verify() {
        let key1 = make_leaf_key(&[1, 2], 3);
        let key2 = make_leaf_key(&[4, 5], 6);
        let (trie, root) = committed_trie(&[(key1, make_value(42)), (key2, make_value(84))]);

        // Swapping the path openings between two proofs breaks both.
        let (value1, mut proof1) = trie.prove(&key1).unwrap();
        let (value2, mut proof2) = trie.prove(&key2).unwrap();
        std::mem::swap(&mut proof1.path[0].opening, &mut proof2.path[0].opening);
        assert!(!verify_proof(&root, &key1, &value1, &proof1));
        assert!(!verify_proof(&root, &key2, &value2, &proof2));

        // Truncating the path breaks the chain.
        let (value1, mut proof) = trie.prove(&key1).unwrap();
        proof.leaf = None;
        assert!(!verify_proof(&root, &key1, &value1, &proof));
    }

    #[test]
    fn absence_cannot_be_claimed_for_present_key() {
        let key = make_leaf_key(&[1, 2], 3);
        let (trie, root) = committed_trie(&[(key, make_value(42))]);

        let (_, mut proof) = trie.prove(&key).unwrap();

        // Claiming the zero value with the honest openings fails.
        assert!(!verify_proof(&root, &key, &Value::default(), &proof));

        // Dropping the suffix openings to mimic a foreign-stem absence proof
        // fails because the stem matches the key.
        proof.leaf.as_mut().unwrap().suffix = None;
        assert!(!verify_proof(&root, &key, &Value::default(), &proof));
    }
}
