// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! A naive bounded Levenshtein distance check, kept as the DP baseline the
//! benchmark compares `CompiledAutomaton` throughput against.

mod levenshtein;

pub use levenshtein::*;
