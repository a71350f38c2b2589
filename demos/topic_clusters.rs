//! Cluster a handful of short headlines and print the top terms per cluster.
//!
//! The bag-of-words step below stands in for whatever feature extraction the
//! caller uses; `topica` only sees the resulting matrix.

use std::collections::BTreeMap;
use topica::summarize::{summarize_clusters, TermFrequency};
use topica::{FeatureMatrix, ModelSelector};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let headlines = [
        "striker scores late goal in cup final",
        "cup final goal decides league title",
        "league title race tightens after late goal",
        "senate passes budget vote",
        "budget vote delayed in senate",
        "senate committee schedules budget hearing",
        "rain and wind expected across coast",
        "coast braces for wind and heavy rain",
        "heavy rain warning issued for coast",
    ];

    // Vocabulary in first-seen order, then raw term counts per headline.
    let mut vocab: BTreeMap<&str, usize> = BTreeMap::new();
    for h in &headlines {
        for term in h.split_whitespace() {
            let next = vocab.len();
            vocab.entry(term).or_insert(next);
        }
    }
    let rows: Vec<Vec<f64>> = headlines
        .iter()
        .map(|h| {
            let mut row = vec![0.0; vocab.len()];
            for term in h.split_whitespace() {
                row[vocab[term]] += 1.0;
            }
            row
        })
        .collect();

    let matrix = FeatureMatrix::from_rows(&rows)?;
    let selector = ModelSelector::new(2, 6).with_seed(42);

    println!("candidates:");
    for c in selector.evaluate(&matrix)? {
        println!("  k={} silhouette={:.3}", c.k, c.score);
    }

    let outcome = selector.select(&matrix)?;
    println!("\nselected k={} (silhouette {:.3})", outcome.k, outcome.score);
    println!("cluster sizes: {:?}", outcome.cluster_sizes());

    let tops = summarize_clusters(&headlines, &outcome.labels, outcome.k, &TermFrequency::new(3))?;
    for (cluster, (members, top)) in outcome.members()?.iter().zip(&tops).enumerate() {
        println!("\ncluster {cluster}: {top:?}");
        for &i in members {
            println!("  {}", headlines[i]);
        }
    }

    Ok(())
}
