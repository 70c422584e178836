// SPDX-License-Identifier: MIT

//! Debug action gate
//!
//! Decides, per invocation, whether a debug action runs. The free functions
//! `guard` and `guard_async` take any action closure; `DebugGate` wires the
//! gate to a `DebugHook` for the breakpoint and print shorthands.

use once_cell::sync::Lazy;
use std::future::Future;
use std::sync::Arc;

use super::cache::ConditionCache;
use super::condition::{evaluate, parse, Predicate};
use crate::runtime::error::ValidationError;
use crate::runtime::grid::{Coordinate, ProgramId};
use crate::runtime::hook::DebugHook;

/// Condition that only the very first invocation of a grid satisfies
pub const ALL_AXES_ZERO: &str = "=0,=0,=0";

static FIRST_INVOCATION: Lazy<Predicate> = Lazy::new(Predicate::first_invocation);

/// Either a raw condition string or an already compiled predicate
#[derive(Debug, Clone, Copy)]
pub enum PredicateSource<'a> {
    Raw(&'a str),
    Compiled(&'a Predicate),
}

impl<'a> From<&'a str> for PredicateSource<'a> {
    fn from(conds: &'a str) -> Self {
        PredicateSource::Raw(conds)
    }
}

impl<'a> From<&'a String> for PredicateSource<'a> {
    fn from(conds: &'a String) -> Self {
        PredicateSource::Raw(conds)
    }
}

impl<'a> From<&'a Predicate> for PredicateSource<'a> {
    fn from(predicate: &'a Predicate) -> Self {
        PredicateSource::Compiled(predicate)
    }
}

impl<'a> From<&'a Arc<Predicate>> for PredicateSource<'a> {
    fn from(predicate: &'a Arc<Predicate>) -> Self {
        PredicateSource::Compiled(predicate)
    }
}

impl PredicateSource<'_> {
    /// Evaluate against `pid`, parsing first if the source is raw
    pub fn holds_for(self, pid: &Coordinate) -> Result<bool, ValidationError> {
        let fired = match self {
            PredicateSource::Compiled(predicate) => evaluate(predicate, pid),
            PredicateSource::Raw(conds) => evaluate(&parse(conds)?, pid),
        };
        log::trace!("Condition {:?} at pid {}: {}", self, pid, fired);
        Ok(fired)
    }
}

/// Run `action` once if the predicate holds for `pid`.
///
/// Returns whether the action ran.
pub fn guard<'a, F>(
    source: impl Into<PredicateSource<'a>>,
    pid: &Coordinate,
    action: F,
) -> Result<bool, ValidationError>
where
    F: FnOnce(),
{
    if !source.into().holds_for(pid)? {
        return Ok(false);
    }
    action();
    Ok(true)
}

/// `guard` for actions that may suspend the triggering invocation
pub async fn guard_async<'a, F, Fut>(
    source: impl Into<PredicateSource<'a>>,
    pid: &Coordinate,
    action: F,
) -> Result<bool, ValidationError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ()>,
{
    if !source.into().holds_for(pid)? {
        return Ok(false);
    }
    action().await;
    Ok(true)
}

/// Breakpoint and print shorthands bound to a hook.
///
/// Raw condition strings go through a shared `ConditionCache`, so a grid of
/// invocations using the same string parses it once.
#[derive(Clone)]
pub struct DebugGate {
    hook: Arc<dyn DebugHook>,
    cache: ConditionCache,
}

impl DebugGate {
    pub fn new(hook: Arc<dyn DebugHook>) -> Self {
        Self {
            hook,
            cache: ConditionCache::new(),
        }
    }

    async fn holds(&self, source: PredicateSource<'_>, pid: &Coordinate) -> Result<bool, ValidationError> {
        match source {
            PredicateSource::Raw(conds) => {
                let predicate = self.cache.get_or_parse(conds).await?;
                PredicateSource::Compiled(&predicate).holds_for(pid)
            }
            compiled => compiled.holds_for(pid),
        }
    }

    /// Stop the invocation at `ctx` if the condition holds
    pub async fn breakpoint_if<'a, P>(
        &self,
        conds: impl Into<PredicateSource<'a>>,
        ctx: &P,
    ) -> Result<bool, ValidationError>
    where
        P: ProgramId + ?Sized,
    {
        let pid = ctx.coordinate();
        if !self.holds(conds.into(), &pid).await? {
            return Ok(false);
        }
        self.hook.on_breakpoint(pid).await;
        Ok(true)
    }

    /// Emit `message` from the invocation at `ctx` if the condition holds
    pub async fn print_if<'a, P>(
        &self,
        conds: impl Into<PredicateSource<'a>>,
        ctx: &P,
        message: &str,
    ) -> Result<bool, ValidationError>
    where
        P: ProgramId + ?Sized,
    {
        let pid = ctx.coordinate();
        if !self.holds(conds.into(), &pid).await? {
            return Ok(false);
        }
        self.hook.on_print(pid, message).await;
        Ok(true)
    }

    /// Stop only the first invocation of the grid
    pub async fn breakpoint_once<P: ProgramId + ?Sized>(&self, ctx: &P) -> bool {
        let pid = ctx.coordinate();
        if !FIRST_INVOCATION.matches(&pid) {
            return false;
        }
        self.hook.on_breakpoint(pid).await;
        true
    }

    /// Print only from the first invocation of the grid
    pub async fn print_once<P: ProgramId + ?Sized>(&self, ctx: &P, message: &str) -> bool {
        let pid = ctx.coordinate();
        if !FIRST_INVOCATION.matches(&pid) {
            return false;
        }
        self.hook.on_print(pid, message).await;
        true
    }
}
