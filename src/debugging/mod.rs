// SPDX-License-Identifier: MIT

//! Conditional debug actions for grid kernels
//!
//! This module provides:
//! - `condition` - parse and evaluate positional pid rules
//! - `gate` - run breakpoints or prints only where a rule holds
//! - `precondition` - contiguity and residency checks on buffers
//! - `config` - execution mode and YAML settings

pub mod cache;
pub mod condition;
pub mod config;
pub mod gate;
pub mod pointer;
pub mod precondition;

pub use cache::ConditionCache;
pub use condition::{evaluate, parse, test_pid_conds, Clause, CompareOp, Predicate};
pub use config::{ConfigLoader, DebugConfig, ExecutionMode, INTERPRET_ENV_VAR};
pub use gate::{guard, guard_async, DebugGate, PredicateSource, ALL_AXES_ZERO};
pub use pointer::offsets_from_base;
pub use precondition::{check_ready, Buffer, BufferView, Device};
