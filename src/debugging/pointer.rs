// SPDX-License-Identifier: MIT

/// Offsets such that `ptrs[i] == base + offsets[i]`, in wrapping u64 arithmetic
pub fn offsets_from_base(ptrs: &[u64], base: u64) -> Vec<u64> {
    ptrs.iter().map(|ptr| ptr.wrapping_sub(base)).collect()
}
