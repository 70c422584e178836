// SPDX-License-Identifier: MIT

//! Host-side grid launcher
//!
//! Runs a `Kernel` once per coordinate of a `GridShape`, each invocation on
//! its own tokio task. Nothing is shared between invocations except the
//! kernel itself; completion order is undefined.

use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;

use super::error::DebugResult;
use super::grid::{Axis, Coordinate, GridShape, ProgramId};

/// What a single invocation knows about itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvocationContext {
    pub pid: Coordinate,
    pub grid: GridShape,
}

impl ProgramId for InvocationContext {
    fn program_id(&self, axis: Axis) -> u32 {
        self.pid.get(axis)
    }
}

impl InvocationContext {
    pub fn num_programs(&self, axis: Axis) -> u32 {
        self.grid.extent(axis)
    }
}

/// A program run once per grid coordinate
#[async_trait]
pub trait Kernel: Send + Sync {
    /// Returns the kernel name
    fn name(&self) -> &str;

    /// Run one invocation
    async fn run(&self, ctx: InvocationContext) -> DebugResult<()>;
}

/// Result of a completed launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSummary {
    pub kernel: String,
    pub invocations: usize,
}

/// Launches kernels over a fixed grid on the current tokio runtime
#[derive(Debug, Clone)]
pub struct HostLauncher {
    grid: GridShape,
}

impl HostLauncher {
    pub fn new(grid: GridShape) -> Self {
        Self { grid }
    }

    /// Run `kernel` for every coordinate and wait for all invocations.
    ///
    /// All invocations run to completion; the first error in grid order is
    /// returned.
    pub async fn launch(&self, kernel: Arc<dyn Kernel>) -> DebugResult<LaunchSummary> {
        let grid = self.grid;
        log::info!(
            "Launching kernel '{}' over grid {} ({} invocations)",
            kernel.name(),
            grid,
            grid.len()
        );

        let handles = grid.coordinates().map(|pid| {
            let kernel = kernel.clone();
            tokio::spawn(async move { kernel.run(InvocationContext { pid, grid }).await })
        });

        let mut invocations = 0;
        for result in join_all(handles).await {
            result??;
            invocations += 1;
        }

        log::info!("Kernel '{}' finished", kernel.name());
        Ok(LaunchSummary {
            kernel: kernel.name().to_string(),
            invocations,
        })
    }
}
