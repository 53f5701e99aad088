//! Clustering of flagged windows into candidate regions.
//!
//! Windows live on the scan grid (origin / stride). Two windows belong to the
//! same cluster when their Chebyshev cell distance is within
//! `merge_radius_cells`, closing the transitive hull with union-find. The
//! pass is deterministic: roots are canonicalized to the lowest member index
//! and the final regions are ordered by bounding box position, so the output
//! never depends on window enumeration order.
use crate::scan::CandidateWindow;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Knobs for window merging and region filtering.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ClusterOptions {
    /// Maximum Chebyshev distance (in stride cells) linking two windows.
    pub merge_radius_cells: usize,
    /// A single-window cluster survives only above this confidence.
    pub single_window_confidence: f32,
    /// Region pixel-area bounds; clusters outside are discarded.
    pub min_region_area: usize,
    pub max_region_area: usize,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            merge_radius_cells: 3,
            single_window_confidence: 0.75,
            min_region_area: 100,
            max_region_area: 5000,
        }
    }
}

/// Axis-aligned bounding box in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// Cluster of candidate windows merged into one candidate finding.
#[derive(Clone, Debug)]
pub struct Region {
    pub bbox: BoundingBox,
    pub member_count: usize,
    /// Mean of member window means.
    pub mean: f32,
    /// Mean of member window stds (aggregate texture).
    pub std: f32,
    /// Mean of member window confidences.
    pub confidence: f32,
    /// `member_count × window_size²`.
    pub pixel_area: usize,
}

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // path compression
        let mut cur = i;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Attach the higher root to the lower so roots stay order-canonical.
    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
        self.parent[hi] = lo;
    }
}

/// Merge candidate windows into size-filtered regions.
///
/// `stride` must match the scan stride that produced `windows`; image
/// dimensions clamp the region bounding boxes.
pub fn cluster(
    windows: &[CandidateWindow],
    stride: usize,
    image_w: usize,
    image_h: usize,
    opts: &ClusterOptions,
) -> Vec<Region> {
    if windows.is_empty() {
        return Vec::new();
    }
    let stride = stride.max(1);
    let cells: Vec<(usize, usize)> = windows
        .iter()
        .map(|c| (c.window.x / stride, c.window.y / stride))
        .collect();

    let mut uf = UnionFind::new(windows.len());
    let radius = opts.merge_radius_cells;
    for i in 0..windows.len() {
        for j in (i + 1)..windows.len() {
            let dx = cells[i].0.abs_diff(cells[j].0);
            let dy = cells[i].1.abs_diff(cells[j].1);
            if dx.max(dy) <= radius {
                uf.union(i, j);
            }
        }
    }

    // group members under their canonical root, preserving index order
    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for i in 0..windows.len() {
        let root = uf.find(i);
        groups.entry(root).or_default().push(i);
    }

    let mut regions: Vec<Region> = Vec::new();
    for members in groups.values() {
        let best_confidence = members
            .iter()
            .map(|&i| windows[i].confidence)
            .fold(0.0f32, f32::max);
        if members.len() < 2 && best_confidence <= opts.single_window_confidence {
            continue;
        }

        let window_size = windows[members[0]].window.size;
        let pixel_area = members.len() * window_size * window_size;
        if pixel_area < opts.min_region_area || pixel_area > opts.max_region_area {
            continue;
        }

        let mut x_min = usize::MAX;
        let mut y_min = usize::MAX;
        let mut x_max = 0usize;
        let mut y_max = 0usize;
        let mut mean_sum = 0.0f32;
        let mut std_sum = 0.0f32;
        let mut conf_sum = 0.0f32;
        for &i in members {
            let w = &windows[i].window;
            x_min = x_min.min(w.x);
            y_min = y_min.min(w.y);
            x_max = x_max.max(w.x + w.size);
            y_max = y_max.max(w.y + w.size);
            mean_sum += w.mean;
            std_sum += w.std;
            conf_sum += windows[i].confidence;
        }
        let n = members.len() as f32;
        let x_max = x_max.min(image_w);
        let y_max = y_max.min(image_h);
        regions.push(Region {
            bbox: BoundingBox {
                x: x_min,
                y: y_min,
                width: x_max - x_min,
                height: y_max - y_min,
            },
            member_count: members.len(),
            mean: mean_sum / n,
            std: std_sum / n,
            confidence: conf_sum / n,
            pixel_area,
        });
    }

    regions.sort_by_key(|r| (r.bbox.y, r.bbox.x));
    debug!(
        "cluster: {} windows -> {} regions after filtering",
        windows.len(),
        regions.len()
    );
    regions
}
