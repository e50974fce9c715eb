// Copyright (c) 2025 Sonic Operations Ltd
//
// Use of this software is governed by the Business Source License included
// in the LICENSE file and at soniclabs.com/bsl11.
//
// Change Date: 2028-4-16
//
// On the date above, in accordance with the Business Source License, use of
// this software will be governed by the GNU Lesser General Public License v3.

use thiserror::Error;

/// The top level error type of the state engine.
///
/// Failed proof verification is not an error; it is reported as a plain
/// `false` by the verifier.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// A snapshot container failed a structural check (truncated data,
    /// inconsistent length header, unexpected part count).
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),
    /// The root commitment recomputed after restoring a snapshot disagrees
    /// with the commitment carried in the snapshot metadata. The restore
    /// target is left in an indeterminate state and must be discarded.
    #[error("root commitment does not match snapshot metadata")]
    CommitmentMismatch,
    /// The underlying commitment primitive reported a fault. This does not
    /// occur in normal operation and is treated as a bug.
    #[error("crypto failure: {0}")]
    CryptoFailure(String),
}
