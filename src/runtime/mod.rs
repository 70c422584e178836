// SPDX-License-Identifier: MIT

//! Host execution substrate: grid geometry, errors, debug hooks and the
//! grid launcher that stands in for the device runtime.

pub mod error;
pub mod grid;
pub mod hook;
pub mod launch;

pub use error::{DebugError, DebugResult, PreconditionError, ValidationError};
pub use grid::{Axis, Coordinate, GridShape, ProgramId};
pub use hook::{DebugHook, HookKind, LogHook, PauseHook, PausedInvocation, StdoutHook};
pub use launch::{HostLauncher, InvocationContext, Kernel, LaunchSummary};
