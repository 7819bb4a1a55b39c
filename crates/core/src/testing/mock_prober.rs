//! Mock link prober for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::probe::LinkProber;

/// Mock implementation of the LinkProber trait.
///
/// Every URL answers with the default unless marked otherwise.
#[derive(Debug)]
pub struct MockProber {
    default_alive: bool,
    dead: Arc<RwLock<HashSet<String>>>,
    alive: Arc<RwLock<HashSet<String>>>,
    probes: Arc<RwLock<Vec<String>>>,
}

impl MockProber {
    fn with_default(default_alive: bool) -> Self {
        Self {
            default_alive,
            dead: Arc::new(RwLock::new(HashSet::new())),
            alive: Arc::new(RwLock::new(HashSet::new())),
            probes: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Every URL is reachable unless marked dead.
    pub fn reachable() -> Self {
        Self::with_default(true)
    }

    /// Every URL is unreachable unless marked alive.
    pub fn unreachable() -> Self {
        Self::with_default(false)
    }

    pub async fn mark_dead(&self, url: &str) {
        self.alive.write().await.remove(url);
        self.dead.write().await.insert(url.to_string());
    }

    pub async fn mark_alive(&self, url: &str) {
        self.dead.write().await.remove(url);
        self.alive.write().await.insert(url.to_string());
    }

    /// URLs probed so far, in order.
    pub async fn probed_urls(&self) -> Vec<String> {
        self.probes.read().await.clone()
    }

    pub async fn probe_count(&self) -> usize {
        self.probes.read().await.len()
    }
}

#[async_trait]
impl LinkProber for MockProber {
    async fn probe(&self, url: &str) -> bool {
        self.probes.write().await.push(url.to_string());

        if self.dead.read().await.contains(url) {
            return false;
        }
        if self.alive.read().await.contains(url) {
            return true;
        }
        self.default_alive
    }
}
