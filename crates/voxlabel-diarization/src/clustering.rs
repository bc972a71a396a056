//! Agglomerative speaker clustering
//!
//! Bottom-up clustering with cosine distance and average linkage: every
//! embedding starts as its own cluster and the two closest clusters (by
//! average pairwise distance) merge until the requested count remains.
//! Centroid-based methods fit cosine space poorly, and the caller already
//! supplies the true speaker count, so no model-selection criterion is
//! needed.

use tracing::{debug, warn};

/// Compute cosine similarity between two vectors
///
/// Defined as 0 when either operand has zero norm, so failed-extraction
/// sentinel embeddings sit at maximum distance from everything.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Cosine distance: `1 - cosine_similarity`
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    1.0 - cosine_similarity(a, b)
}

/// Pairwise cosine distance matrix
fn pairwise_distance_matrix(embeddings: &[Vec<f32>]) -> Vec<Vec<f32>> {
    let n = embeddings.len();
    let mut distances = vec![vec![0.0f32; n]; n];
    for i in 0..n {
        for j in i + 1..n {
            let d = cosine_distance(&embeddings[i], &embeddings[j]);
            distances[i][j] = d;
            distances[j][i] = d;
        }
    }
    distances
}

/// Average pairwise distance between two clusters
fn average_linkage(
    labels: &[usize],
    distances: &[Vec<f32>],
    cluster_a: usize,
    cluster_b: usize,
) -> f32 {
    let mut total = 0.0f32;
    let mut count = 0usize;
    for i in 0..labels.len() {
        if labels[i] != cluster_a {
            continue;
        }
        for j in 0..labels.len() {
            if labels[j] == cluster_b {
                total += distances[i][j];
                count += 1;
            }
        }
    }
    total / count as f32
}

/// Find the pair of distinct clusters with the smallest average distance
///
/// Clusters are scanned in ascending id order with a strict comparison, so
/// distance ties resolve toward the earliest pair and repeated runs on the
/// same input produce the same merges.
fn closest_cluster_pair(labels: &[usize], distances: &[Vec<f32>]) -> Option<(usize, usize)> {
    let mut ids: Vec<usize> = labels.to_vec();
    ids.sort_unstable();
    ids.dedup();

    let mut best: Option<(usize, usize, f32)> = None;
    for (a_pos, &a) in ids.iter().enumerate() {
        for &b in &ids[a_pos + 1..] {
            let d = average_linkage(labels, distances, a, b);
            if best.map_or(true, |(_, _, best_d)| d < best_d) {
                best = Some((a, b, d));
            }
        }
    }
    best.map(|(a, b, _)| (a, b))
}

/// Renumber cluster labels to dense ids ordered by first occurrence
fn renumber_clusters(labels: &[usize]) -> Vec<usize> {
    let mut mapping: Vec<usize> = Vec::new();
    labels
        .iter()
        .map(|&label| {
            if let Some(pos) = mapping.iter().position(|&m| m == label) {
                pos
            } else {
                mapping.push(label);
                mapping.len() - 1
            }
        })
        .collect()
}

/// Partition embeddings into `num_speakers` clusters
///
/// Returns one cluster id per embedding, in input order. Ids are dense,
/// 0-indexed, ordered by first occurrence, and meaningful only for equality
/// comparison within one run. When fewer embeddings than requested speakers
/// are available the effective count is reduced to the embedding count;
/// zero embeddings produce an empty assignment. Neither case is an error.
pub fn cluster_embeddings(embeddings: &[Vec<f32>], num_speakers: usize) -> Vec<usize> {
    let n = embeddings.len();
    if n == 0 {
        return Vec::new();
    }

    let effective_k = num_speakers.min(n);
    if effective_k < num_speakers {
        warn!(
            "Only {} windows available for {} requested speakers, reducing to {}",
            n, num_speakers, effective_k
        );
    }

    let mut labels: Vec<usize> = (0..n).collect();
    let distances = pairwise_distance_matrix(embeddings);

    let mut cluster_count = n;
    while cluster_count > effective_k {
        let Some((target, source)) = closest_cluster_pair(&labels, &distances) else {
            break;
        };
        for label in &mut labels {
            if *label == source {
                *label = target;
            }
        }
        cluster_count -= 1;
    }

    debug!(
        "Clustered {} embeddings into {} speakers",
        n, effective_k
    );

    renumber_clusters(&labels)
}
