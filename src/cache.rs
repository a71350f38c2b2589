//! Explicit memoization of model-selection results.
//!
//! Selection is quadratic in the number of documents, so an interactive
//! caller that re-renders often wants to reuse results. [`SelectionCache`]
//! does that without any process-wide state: the caller owns the cache and
//! decides when to drop it.
//!
//! Entries are keyed by a blake3 hash of everything the outcome depends on:
//! matrix shape, every value's bits, and the selector parameters. A key can
//! only match identical inputs, so entries never go stale; they leave the
//! cache through [`SelectionCache::invalidate`], [`SelectionCache::clear`],
//! or oldest-first eviction once `capacity` is exceeded. Errors are never
//! stored.

use crate::error::Result;
use crate::matrix::FeatureMatrix;
use crate::selection::{ModelSelector, SelectionOutcome, TrialFailurePolicy};
use log::trace;
use std::collections::{HashMap, VecDeque};
use std::fmt;

/// Content hash of a (matrix, selector) pair.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionKey([u8; 32]);

impl SelectionKey {
    /// Hash `matrix` and the parameters of `selector`.
    pub fn new(matrix: &FeatureMatrix, selector: &ModelSelector) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"topica.selection.v1");
        hasher.update(&(matrix.nrows() as u64).to_le_bytes());
        hasher.update(&(matrix.ncols() as u64).to_le_bytes());
        for v in matrix.view().iter() {
            hasher.update(&v.to_bits().to_le_bytes());
        }

        hasher.update(&(selector.k_min as u64).to_le_bytes());
        hasher.update(&(selector.k_max as u64).to_le_bytes());
        hasher.update(&selector.seed.to_le_bytes());
        hasher.update(&(selector.max_iter as u64).to_le_bytes());
        let policy: u8 = match selector.on_trial_failure {
            TrialFailurePolicy::Abort => 0,
            TrialFailurePolicy::Skip => 1,
        };
        hasher.update(&[policy]);

        Self(*hasher.finalize().as_bytes())
    }

    /// Raw hash bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SelectionKey(")?;
        for b in &self.0[..8] {
            write!(f, "{b:02x}")?;
        }
        write!(f, "..)")
    }
}

/// Bounded, caller-owned store of selection outcomes.
#[derive(Debug, Clone)]
pub struct SelectionCache {
    capacity: usize,
    entries: HashMap<SelectionKey, SelectionOutcome>,
    order: VecDeque<SelectionKey>,
}

impl SelectionCache {
    /// Cache holding at most `capacity` outcomes. A capacity of 0 stores nothing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    /// Cached outcome for `selector` on `matrix`, computing it on a miss.
    pub fn get_or_select(&mut self, selector: &ModelSelector, matrix: &FeatureMatrix) -> Result<SelectionOutcome> {
        let key = SelectionKey::new(matrix, selector);
        if let Some(hit) = self.entries.get(&key) {
            trace!("selection cache hit {key:?}");
            return Ok(hit.clone());
        }

        trace!("selection cache miss {key:?}");
        let outcome = selector.select(matrix)?;
        self.insert(key, outcome.clone());
        Ok(outcome)
    }

    /// Look up a key without computing anything.
    pub fn get(&self, key: &SelectionKey) -> Option<&SelectionOutcome> {
        self.entries.get(key)
    }

    /// Store an outcome, evicting the oldest entries beyond capacity.
    pub fn insert(&mut self, key: SelectionKey, outcome: SelectionOutcome) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.insert(key, outcome).is_none() {
            self.order.push_back(key);
        }
        while self.entries.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            trace!("selection cache evicted {oldest:?}");
        }
    }

    /// Drop one entry. Returns it if it was present.
    pub fn invalidate(&mut self, key: &SelectionKey) -> Option<SelectionOutcome> {
        let removed = self.entries.remove(key);
        if removed.is_some() {
            self.order.retain(|k| k != key);
        }
        removed
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Number of stored outcomes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SelectionCache {
    fn default() -> Self {
        Self::with_capacity(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(jitter: f64) -> FeatureMatrix {
        FeatureMatrix::from_rows(&[
            vec![1.0, jitter],
            vec![0.9, 0.1],
            vec![0.95, 0.05],
            vec![0.0, 1.0],
            vec![0.1, 0.9],
            vec![0.05, 0.95],
        ])
        .unwrap()
    }

    #[test]
    fn test_key_tracks_content_and_parameters() {
        let selector = ModelSelector::new(2, 4);
        let base = SelectionKey::new(&matrix(0.0), &selector);

        assert_eq!(base, SelectionKey::new(&matrix(0.0), &selector));
        assert_ne!(base, SelectionKey::new(&matrix(1e-9), &selector));
        assert_ne!(base, SelectionKey::new(&matrix(0.0), &selector.clone().with_seed(7)));
        assert_ne!(base, SelectionKey::new(&matrix(0.0), &ModelSelector::new(2, 3)));
        assert_ne!(
            base,
            SelectionKey::new(
                &matrix(0.0),
                &selector.clone().with_failure_policy(TrialFailurePolicy::Skip)
            )
        );
    }

    #[test]
    fn test_get_or_select_hits_on_identical_input() {
        let mut cache = SelectionCache::default();
        let selector = ModelSelector::new(2, 4);
        let m = matrix(0.0);

        let first = cache.get_or_select(&selector, &m).unwrap();
        assert_eq!(cache.len(), 1);
        let second = cache.get_or_select(&selector, &m).unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);

        cache.get_or_select(&selector, &matrix(0.01)).unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut cache = SelectionCache::with_capacity(2);
        let selector = ModelSelector::new(2, 3);
        let keys: Vec<SelectionKey> = [0.0, 0.01, 0.02]
            .iter()
            .map(|&j| {
                let m = matrix(j);
                cache.get_or_select(&selector, &m).unwrap();
                SelectionKey::new(&m, &selector)
            })
            .collect();

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&keys[0]).is_none());
        assert!(cache.get(&keys[1]).is_some());
        assert!(cache.get(&keys[2]).is_some());
    }

    #[test]
    fn test_invalidate_and_clear() {
        let mut cache = SelectionCache::default();
        let selector = ModelSelector::new(2, 3);
        let m = matrix(0.0);
        let key = SelectionKey::new(&m, &selector);

        cache.get_or_select(&selector, &m).unwrap();
        assert!(cache.invalidate(&key).is_some());
        assert!(cache.invalidate(&key).is_none());
        assert!(cache.is_empty());

        cache.get_or_select(&selector, &m).unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_errors_are_not_cached() {
        let mut cache = SelectionCache::default();
        let selector = ModelSelector::new(2, 6);
        assert!(cache.get_or_select(&selector, &matrix(0.0)).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let mut cache = SelectionCache::with_capacity(0);
        let outcome = cache.get_or_select(&ModelSelector::new(2, 3), &matrix(0.0)).unwrap();
        assert_eq!(outcome.labels.len(), 6);
        assert!(cache.is_empty());
    }
}
