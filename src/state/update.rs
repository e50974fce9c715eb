// Copyright (c) 2025 Sonic Operations Ltd
//
// Use of this software is governed by the Business Source License included
// in the LICENSE file and at soniclabs.com/bsl11.
//
// Change Date: 2028-4-16
//
// On the date above, in accordance with the Business Source License, use of
// this software will be governed by the GNU Lesser General Public License v3.

use crate::types::{Address, Key, Nonce, U256, Value};

/// A new balance for an account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceUpdate {
    pub addr: Address,
    pub balance: U256,
}

/// A new nonce for an account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NonceUpdate {
    pub addr: Address,
    pub nonce: Nonce,
}

/// A new code for an account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeUpdate {
    pub addr: Address,
    pub code: Vec<u8>,
}

/// A new value for a storage slot of an account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotUpdate {
    pub addr: Address,
    pub key: Key,
    pub value: Value,
}

/// A block update, containing all changes to the state that happened in a
/// single block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Update {
    pub created_accounts: Vec<Address>,
    pub balances: Vec<BalanceUpdate>,
    pub nonces: Vec<NonceUpdate>,
    pub codes: Vec<CodeUpdate>,
    pub slots: Vec<SlotUpdate>,
}
