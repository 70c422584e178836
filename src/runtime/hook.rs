// SPDX-License-Identifier: MIT

//! Debug hooks - what actually happens when a debug action fires
//!
//! The gate only decides *whether* to act; a `DebugHook` decides *how*:
//! - `LogHook` - reports through the `log` facade
//! - `StdoutHook` - prints to stdout, prefixed with the program id
//! - `PauseHook` - suspends the triggering invocation until resumed

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

use super::grid::Coordinate;

/// Side-effecting half of a debug action
#[async_trait]
pub trait DebugHook: Send + Sync {
    /// Returns the hook name
    fn name(&self) -> &str;

    /// Called when a breakpoint condition holds for `pid`
    async fn on_breakpoint(&self, pid: Coordinate);

    /// Called when a print condition holds for `pid`
    async fn on_print(&self, pid: Coordinate, message: &str);
}

/// Stock hook selection, as named in config files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookKind {
    Log,
    #[default]
    Stdout,
}

impl HookKind {
    pub fn build(self) -> Arc<dyn DebugHook> {
        match self {
            HookKind::Log => Arc::new(LogHook),
            HookKind::Stdout => Arc::new(StdoutHook),
        }
    }
}

/// Reports through `log`; breakpoints never suspend
#[derive(Debug, Clone, Default)]
pub struct LogHook;

#[async_trait]
impl DebugHook for LogHook {
    fn name(&self) -> &str {
        "log"
    }

    async fn on_breakpoint(&self, pid: Coordinate) {
        log::warn!("Breakpoint hit at pid {}", pid);
    }

    async fn on_print(&self, pid: Coordinate, message: &str) {
        log::info!("pid {}: {}", pid, message);
    }
}

/// Prints to stdout
#[derive(Debug, Clone, Default)]
pub struct StdoutHook;

#[async_trait]
impl DebugHook for StdoutHook {
    fn name(&self) -> &str {
        "stdout"
    }

    async fn on_breakpoint(&self, pid: Coordinate) {
        println!("[pid {}] breakpoint", pid);
    }

    async fn on_print(&self, pid: Coordinate, message: &str) {
        println!("[pid {}] {}", pid, message);
    }
}

/// An invocation parked at a breakpoint
#[derive(Debug)]
pub struct PausedInvocation {
    pub pid: Coordinate,
    resume: oneshot::Sender<()>,
}

impl PausedInvocation {
    /// Let the parked invocation continue
    pub fn resume(self) {
        // Receiver gone means the invocation was already torn down.
        let _ = self.resume.send(());
    }
}

/// Suspends the triggering invocation until a controller resumes it.
///
/// Other invocations keep running; only the one that hit the breakpoint
/// waits. Prints are forwarded to stdout.
#[derive(Debug, Clone)]
pub struct PauseHook {
    tx: mpsc::UnboundedSender<PausedInvocation>,
}

impl PauseHook {
    /// Create the hook and the receiving end for the controller
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PausedInvocation>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl DebugHook for PauseHook {
    fn name(&self) -> &str {
        "pause"
    }

    async fn on_breakpoint(&self, pid: Coordinate) {
        let (resume, resumed) = oneshot::channel();
        if self.tx.send(PausedInvocation { pid, resume }).is_err() {
            log::warn!("No pause controller for breakpoint at pid {}, continuing", pid);
            return;
        }
        log::debug!("Invocation {} paused", pid);
        if resumed.await.is_err() {
            log::warn!("Pause handle for pid {} dropped, continuing", pid);
        }
    }

    async fn on_print(&self, pid: Coordinate, message: &str) {
        println!("[pid {}] {}", pid, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_hook_kind_deserialize() {
        let kind: HookKind = serde_yaml::from_str("log").unwrap();
        assert_eq!(kind, HookKind::Log);
        assert_eq!(HookKind::default(), HookKind::Stdout);
        assert_eq!(HookKind::Log.build().name(), "log");
        assert_eq!(HookKind::Stdout.build().name(), "stdout");
    }

    #[tokio::test]
    async fn test_log_hook_does_not_block() {
        let hook = LogHook;
        hook.on_breakpoint(Coordinate::origin()).await;
        hook.on_print(Coordinate::origin(), "hello").await;
    }

    #[tokio::test]
    async fn test_pause_hook_waits_for_resume() {
        let (hook, mut rx) = PauseHook::new();
        let pid = Coordinate::new(1, 2, 3);

        let task = tokio::spawn(async move { hook.on_breakpoint(pid).await });

        let paused = rx.recv().await.unwrap();
        assert_eq!(paused.pid, pid);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!task.is_finished());

        paused.resume();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_pause_hook_without_controller_continues() {
        let (hook, rx) = PauseHook::new();
        drop(rx);
        tokio::time::timeout(Duration::from_secs(1), hook.on_breakpoint(Coordinate::origin()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_pause_hook_dropped_handle_continues() {
        let (hook, mut rx) = PauseHook::new();
        let task = tokio::spawn(async move { hook.on_breakpoint(Coordinate::origin()).await });
        let paused = rx.recv().await.unwrap();
        drop(paused);
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();
    }
}
