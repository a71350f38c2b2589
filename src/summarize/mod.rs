//! Per-cluster summaries of the items behind a labeling.
//!
//! Clustering works on vectors, but callers usually want to look at the
//! documents: "what is cluster 2 about?". This module groups the caller's
//! items by label and hands each group to a [`Summarizer`].
//!
//! The summarization logic itself is up to the user (closures via
//! [`from_fn`], or a trait implementation). [`TermFrequency`] covers the
//! common case of listing the most frequent words of each cluster, for
//! documents that are already tokenized and cleaned.

use crate::error::{Error, Result};
use std::collections::HashMap;

/// Trait for summarization strategies.
///
/// Implementors define how a group of items is condensed into a summary.
pub trait Summarizer<T: ?Sized, S> {
    /// Summarize a group of items.
    fn summarize(&self, items: &[&T]) -> S;
}

/// A function-based summarizer.
#[derive(Clone)]
pub struct FnSummarizer<F> {
    f: F,
}

impl<F> FnSummarizer<F> {
    /// Create a summarizer from a function.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<T: ?Sized, S, F> Summarizer<T, S> for FnSummarizer<F>
where
    F: Fn(&[&T]) -> S,
{
    fn summarize(&self, items: &[&T]) -> S {
        (self.f)(items)
    }
}

/// Create a summarizer from a closure.
pub fn from_fn<T: ?Sized, S, F>(f: F) -> FnSummarizer<F>
where
    F: Fn(&[&T]) -> S,
{
    FnSummarizer::new(f)
}

/// Most frequent whitespace-separated terms across a group of documents.
///
/// Output is ordered by count (descending), then term (ascending), so equal
/// counts always come out in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermFrequency {
    /// How many terms to keep.
    pub top_n: usize,
}

impl TermFrequency {
    /// Keep the `top_n` most common terms.
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }
}

impl Default for TermFrequency {
    fn default() -> Self {
        Self::new(10)
    }
}

impl<T: AsRef<str> + ?Sized> Summarizer<T, Vec<(String, usize)>> for TermFrequency {
    fn summarize(&self, items: &[&T]) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for doc in items {
            let text: &str = AsRef::<str>::as_ref(*doc);
            for term in text.split_whitespace() {
                *counts.entry(term).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(String, usize)> = counts.into_iter().map(|(t, c)| (t.to_string(), c)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.top_n);
        ranked
    }
}

/// Row indices of each cluster in `0..k`, in input order.
pub fn group_by_cluster(labels: &[usize], k: usize) -> Result<Vec<Vec<usize>>> {
    let mut groups = vec![Vec::new(); k];
    for (i, &label) in labels.iter().enumerate() {
        let group = groups.get_mut(label).ok_or(Error::InvalidParameter {
            name: "labels",
            message: "label out of range for k",
        })?;
        group.push(i);
    }
    Ok(groups)
}

/// Summarize the items of each cluster. Entry `c` summarizes cluster `c`;
/// empty clusters are summarized from an empty slice.
///
/// ```rust
/// use topica::summarize::{summarize_clusters, TermFrequency};
///
/// let docs = ["rust borrow checker", "rust lifetimes", "tennis final", "tennis open"];
/// let tops = summarize_clusters(&docs, &[0, 0, 1, 1], 2, &TermFrequency::new(1)).unwrap();
/// assert_eq!(tops[0], vec![("rust".to_string(), 2)]);
/// assert_eq!(tops[1], vec![("tennis".to_string(), 2)]);
/// ```
pub fn summarize_clusters<T, S, Z>(items: &[T], labels: &[usize], k: usize, summarizer: &Z) -> Result<Vec<S>>
where
    Z: Summarizer<T, S>,
{
    if items.len() != labels.len() {
        return Err(Error::DimensionMismatch {
            expected: labels.len(),
            found: items.len(),
        });
    }

    let groups = group_by_cluster(labels, k)?;
    Ok(groups
        .iter()
        .map(|members| {
            let refs: Vec<&T> = members.iter().map(|&i| &items[i]).collect();
            summarizer.summarize(&refs)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_frequency_orders_by_count_then_term() {
        let docs = ["b a c a", "c b a", "d"];
        let refs: Vec<&&str> = docs.iter().collect();
        let top = TermFrequency::new(3).summarize(&refs);

        assert_eq!(
            top,
            vec![("a".to_string(), 3), ("b".to_string(), 2), ("c".to_string(), 2)]
        );
    }

    #[test]
    fn test_fn_summarizer() {
        let summarizer = from_fn(|items: &[&i32]| items.iter().copied().sum::<i32>());

        let items = [1, 2, 3];
        let refs: Vec<&i32> = items.iter().collect();

        let summary: i32 = summarizer.summarize(&refs);
        assert_eq!(summary, 6);
    }

    #[test]
    fn test_group_by_cluster_keeps_empty_groups() {
        let groups = group_by_cluster(&[2, 0, 2], 4).unwrap();
        assert_eq!(groups, vec![vec![1], vec![], vec![0, 2], vec![]]);
    }

    #[test]
    fn test_group_by_cluster_rejects_out_of_range_labels() {
        assert!(group_by_cluster(&[0, 3], 3).is_err());
    }

    #[test]
    fn test_summarize_clusters_counts_sizes() {
        let items = vec![10, 20, 30, 40];
        let sizes = summarize_clusters(&items, &[1, 0, 1, 1], 2, &from_fn(|g: &[&i32]| g.len())).unwrap();
        assert_eq!(sizes, vec![1, 3]);
    }

    #[test]
    fn test_summarize_clusters_length_mismatch() {
        let items = vec!["a", "b"];
        let err = summarize_clusters(&items, &[0], 1, &TermFrequency::default()).unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                expected: 1,
                found: 2
            }
        );
    }
}
