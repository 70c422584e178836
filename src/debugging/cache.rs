// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::condition::{parse, Predicate};
use crate::runtime::error::ValidationError;

/// Compile-once store for condition strings shared across invocations
#[derive(Clone, Default)]
pub struct ConditionCache {
    predicates: Arc<RwLock<HashMap<String, Arc<Predicate>>>>,
}

impl ConditionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached predicate for `conds`, parsing it on first use.
    ///
    /// Parse failures are returned every time and never cached.
    pub async fn get_or_parse(&self, conds: &str) -> Result<Arc<Predicate>, ValidationError> {
        if let Some(predicate) = self.predicates.read().await.get(conds) {
            return Ok(predicate.clone());
        }

        let predicate = Arc::new(parse(conds)?);
        let mut predicates = self.predicates.write().await;
        let entry = predicates
            .entry(conds.to_string())
            .or_insert_with(|| {
                log::debug!("Compiled condition '{}' -> '{}'", conds, predicate);
                predicate
            });
        Ok(entry.clone())
    }

    pub async fn len(&self) -> usize {
        self.predicates.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.predicates.read().await.is_empty()
    }
}
