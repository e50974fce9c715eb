// Copyright (c) 2025 Sonic Operations Ltd
//
// Use of this software is governed by the Business Source License included
// in the LICENSE file and at soniclabs.com/bsl11.
//
// Change Date: 2028-4-16
//
// On the date above, in accordance with the Business Source License, use of
// this software will be governed by the GNU Lesser General Public License v3.

use crate::types::Value;

const PUSH1: u8 = 0x60;
const PUSH32: u8 = 0x7f;

/// A code chunk as stored in one trie value: one leading tag byte plus 31
/// bytes of code.
pub type Chunk = Value;

/// Splits the given EVM bytecode into 31-byte chunks, each prefixed with a
/// single byte indicating the number of leading data bytes (i.e., non-opcode
/// bytes, part of the data section of a PUSH instruction that started in a
/// previous chunk) in that chunk.
pub fn split_code(code: &[u8]) -> Vec<Chunk> {
    // Add 30 additional entries to handle the case where the code is shorter
    // than expected based on the last PUSH instruction. 30 covers the maximum
    // number of potentially "missing" bytes: A PUSH32 instruction at the end
    // of a chunk, followed by a single byte of data in the next chunk
    // => 1 + 30 = 31. This way we still mark the correct number of elements
    // in the second chunk as data (as if the code had the expected length).
    let mut is_code = vec![false; code.len() + 30];

    let mut i = 0;
    while i < is_code.len() {
        is_code[i] = true;
        if i < code.len() {
            let cur = code[i];
            if (PUSH1..=PUSH32).contains(&cur) {
                i += (cur - PUSH1) as usize + 2;
                continue;
            }
        }
        i += 1;
    }

    let mut chunks = Vec::with_capacity((code.len() / 32) + 1);
    for i in (0..code.len()).step_by(31) {
        let data_size = 31.min(is_code[i..].iter().take_while(|&ic| !ic).count() as u8);
        let code_size = 31.min(code.len() - i);
        let mut next = Chunk::default();
        next[0] = data_size;
        next[1..code_size + 1].copy_from_slice(&code[i..(i + code_size)]);
        chunks.push(next);
    }

    chunks
}

/// Merges the given chunks (created by [`split_code`]) back into the original
/// bytecode. At most `result.len()` bytes are written to `result`.
pub fn merge_code(chunks: &[Chunk], result: &mut [u8]) {
    for (chunk, out) in chunks.iter().zip(result.chunks_mut(31)) {
        out.copy_from_slice(&chunk[1..1 + out.len()]);
    }
}
