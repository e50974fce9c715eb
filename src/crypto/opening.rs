// Copyright (c) 2025 Sonic Operations Ltd
//
// Use of this software is governed by the Business Source License included
// in the LICENSE file and at soniclabs.com/bsl11.
//
// Change Date: 2028-4-16
//
// On the date above, in accordance with the Business Source License, use of
// this software will be governed by the GNU Lesser General Public License v3.

use banderwagon::Fr;
use ipa_multipoint::{
    lagrange_basis::LagrangeBasis,
    multiproof::{MultiPoint, MultiPointProof, ProverQuery, VerifierQuery},
    transcript::Transcript,
};
use verkle_trie::constants::{CRS, PRECOMPUTED_WEIGHTS};

use crate::crypto::{Commitment, Scalar};

/// A proof demonstrating that a [`Commitment`] contains a certain value at a
/// specific position.
///
/// It uses the Inner Product Argument (IPA) proof system for Pedersen
/// commitments. Details:
/// <https://dankradfeist.de/ethereum/2021/07/27/inner-product-arguments.html>
///
/// Every opening covers exactly one vector position; proofs over a trie path
/// are chains of such single-position openings.
pub struct Opening {
    proof: MultiPointProof,
}

impl Opening {
    /// Creates a new opening for a given commitment, proving that it contains
    /// the value at the specified position. The opening can then be verified
    /// using [`Self::verify`].
    ///
    /// For the opening to be valid, the `values` slice must contain the same
    /// sequence of scalars that were used to create the commitment.
    ///
    /// NOTE: This is a fairly expensive operation (tens of milliseconds).
    pub fn new(commitment: &Commitment, values: &[Scalar], position: u8) -> Self {
        let mut transcript = Transcript::new(b"vt");
        let query = ProverQuery {
            commitment: commitment.into(),
            point: position as usize,
            result: Fr::from(values[position as usize]),
            poly: LagrangeBasis::new(values.iter().map(|v| Fr::from(*v)).collect()),
        };
        let proof = MultiPoint::open(
            CRS.clone(),
            &PRECOMPUTED_WEIGHTS,
            &mut transcript,
            vec![query],
        );
        Opening { proof }
    }

    /// Verifies that the opening proves that the given commitment contains
    /// the specified value at the specified position.
    /// Returns `false`, never an error, for any mismatch.
    pub fn verify(&self, commitment: &Commitment, position: u8, value: &Scalar) -> bool {
        let mut transcript = Transcript::new(b"vt");
        let query = VerifierQuery {
            commitment: commitment.into(),
            point: Fr::from(position),
            result: Fr::from(*value),
        };
        self.proof
            .check(&CRS, &PRECOMPUTED_WEIGHTS, &[query], &mut transcript)
    }
}

#[cfg(test)]
mod slow_tests {
    use super::*;

    #[test]
    fn committed_values_can_be_used_to_prove_values() {
        let values: Vec<_> = (0..256).map(|i| Scalar::from(i + 1)).collect();
        let commitment = Commitment::new(&values);

        // Since opening is expensive, we only test a few positions.
        for i in [0u8, 5, 42, 100, 254, 255] {
            let opening = Opening::new(&commitment, &values, i);
            assert!(
                opening.verify(&commitment, i, &values[i as usize]),
                "failed to verify position {i}"
            );
            assert!(
                !opening.verify(&commitment, i, &Scalar::from(i as u64 + 2)),
                "verified wrong value at position {i}"
            );
        }
    }

    #[test]
    fn using_different_values_results_in_invalid_opening() {
        let values_1: Vec<_> = (0..256).map(|i| Scalar::from(i + 1)).collect();
        let values_2: Vec<_> = (0..256).map(|i| Scalar::from(i + 2)).collect();
        let commitment = Commitment::new(&values_1);

        for i in [0u8, 5, 42, 100, 254, 255] {
            let opening = Opening::new(&commitment, &values_2, i);
            assert!(
                !opening.verify(&commitment, i, &values_1[i as usize]),
                "verified value using invalid opening at position {i}"
            );
        }
    }

    #[test]
    fn opening_does_not_verify_against_other_positions_or_commitments() {
        let values: Vec<_> = (0..256).map(|i| Scalar::from(i + 1)).collect();
        let commitment = Commitment::new(&values);
        let opening = Opening::new(&commitment, &values, 42);

        assert!(!opening.verify(&commitment, 43, &values[43]));

        let other_values: Vec<_> = (0..256).map(|i| Scalar::from(i + 2)).collect();
        let other_commitment = Commitment::new(&other_values);
        assert!(!opening.verify(&other_commitment, 42, &other_values[42]));
    }

    #[test]
    fn commitment_update_can_be_used_to_prove_modified_values() {
        let mut values: Vec<_> = (0..256).map(|i| Scalar::from(i + 1)).collect();
        let mut commitment = Commitment::new(&values);

        for i in [0usize, 5, 42, 100, 254, 255] {
            let old_value = values[i];
            values[i] = Scalar::from(i as u64 * 10);
            commitment.update(i as u8, old_value, values[i]);
            let opening = Opening::new(&commitment, &values, i as u8);

            assert!(
                opening.verify(&commitment, i as u8, &values[i]),
                "failed to verify updated position {i}"
            );

            assert!(
                !opening.verify(&commitment, i as u8, &old_value),
                "verified outdated value at position {i}"
            );
        }
    }

    #[test]
    fn zero_vector_positions_can_be_proven_against_the_identity() {
        let values = vec![Scalar::zero(); 256];
        let commitment = Commitment::new(&values);
        assert_eq!(commitment, Commitment::default());

        let opening = Opening::new(&commitment, &values, 7);
        assert!(opening.verify(&commitment, 7, &Scalar::zero()));
        assert!(!opening.verify(&commitment, 7, &Scalar::from(1)));
    }
}
