// Copyright (c) 2025 Sonic Operations Ltd
//
// Use of this software is governed by the Business Source License included
// in the LICENSE file and at soniclabs.com/bsl11.
//
// Change Date: 2028-4-16
//
// On the date above, in accordance with the Business Source License, use of
// this software will be governed by the GNU Lesser General Public License v3.

use std::{ops::Add, sync::LazyLock};

use ark_ff::{BigInteger, PrimeField};
use banderwagon::{Element, Fr};
use ipa_multipoint::committer::Committer;

use crate::{
    crypto::{Scalar, committer::WindowSignedCommitter},
    error::Error,
};

/// A vector commitment to a sequence of 256 scalar values, using the Pedersen
/// commitment scheme on the Banderwagon curve.
///
/// The commitment is homomorphic in the committed vector, which is what makes
/// [`Commitment::update`] possible: changing a single slot costs a constant
/// number of group operations instead of a full recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commitment {
    element: Element,
}

// Creating the committer is very expensive (in the order of seconds!), so we cache it.
static COMMITTER: LazyLock<WindowSignedCommitter> = LazyLock::new(WindowSignedCommitter::new);

impl Commitment {
    /// Creates a commitment to the given sequence of scalar values.
    /// At most 256 values are used, any additional values are ignored.
    /// If fewer than 256 values are provided, the remaining values are equal
    /// to the return value of [`Scalar::zero`].
    pub fn new(values: &[Scalar]) -> Self {
        let _span = tracy_client::span!("Commitment::new");
        let element =
            COMMITTER.commit_lagrange(&values.iter().map(|v| Fr::from(*v)).collect::<Vec<Fr>>());
        Commitment { element }
    }

    /// Reconstructs a commitment from its compressed 32-byte representation.
    ///
    /// Not all byte sequences correspond to valid commitments, i.e., points
    /// in the Banderwagon prime subgroup. Attempting to create a commitment
    /// from an invalid byte sequence will result in an error.
    pub fn try_from_bytes(bytes: [u8; 32]) -> Result<Self, Error> {
        if bytes == [0; 32] {
            return Ok(Commitment::default());
        }
        let element = Element::from_bytes(&bytes).ok_or(Error::CryptoFailure(
            "byte sequence is not a valid commitment".to_owned(),
        ))?;
        Ok(Commitment { element })
    }

    /// Updates the commitment by changing the value at the given index.
    pub fn update(&mut self, index: u8, old_value: Scalar, new_value: Scalar) {
        let _span = tracy_client::span!("Commitment::update");
        let delta = Fr::from(new_value) - Fr::from(old_value);
        let delta_commitment = COMMITTER.scalar_mul(delta, index as usize);
        self.element += delta_commitment;
    }

    /// Maps the commitment point to the Banderwagon scalar field, allowing it
    /// to be used as input to other commitments. The identity commitment maps
    /// to [`Scalar::zero`], which is the convention for empty subtrees.
    pub fn to_scalar(self) -> Scalar {
        let _span = tracy_client::span!("Commitment::to_scalar");
        Scalar::from(self.element.map_to_scalar_field())
    }

    /// Returns a hash corresponding to the commitment.
    /// Used for computing keys during the state embedding.
    pub fn hash(&self) -> [u8; 32] {
        let _span = tracy_client::span!("Commitment::hash");
        let scalar = self.element.map_to_scalar_field();
        scalar
            .into_bigint()
            .to_bytes_le()
            .try_into()
            .expect("scalar field element should be 32 bytes")
    }

    /// Returns a compressed 32-byte representation of the commitment.
    /// The identity commitment compresses to all zeros; this is the form
    /// used as the state root.
    pub fn compress(&self) -> [u8; 32] {
        if self.element == Element::zero() {
            return [0; 32];
        }
        self.element.to_bytes()
    }
}

impl Add<Self> for Commitment {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Commitment {
            element: self.element + rhs.element,
        }
    }
}

impl From<Element> for Commitment {
    fn from(element: Element) -> Self {
        Commitment { element }
    }
}

impl From<&Commitment> for Element {
    fn from(commitment: &Commitment) -> Self {
        commitment.element
    }
}

impl Default for Commitment {
    fn default() -> Self {
        Commitment {
            element: Element::zero(),
        }
    }
}
