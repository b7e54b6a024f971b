//! Connected component labeling using union-find.
//!
//! Run-length encoding based: every row is split into horizontal runs of
//! foreground pixels, runs overlapping the previous row are merged through a
//! union-find, and labels are flattened to `1..=n` at the end. Label `0` is
//! background.

use glam::{DVec2, IVec2};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::raster::{Buffer2, Mask, Rect};

/// Pixel connectivity used when merging runs of adjacent rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connectivity {
    /// 4-connectivity: only horizontal and vertical neighbors.
    #[default]
    Four,
    /// 8-connectivity: diagonal neighbors are connected too.
    Eight,
}

/// Ranking key for [`LabelMap::ranked_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum ComponentMetric {
    Left,
    Top,
    Width,
    Height,
    Area,
}

/// A horizontal run of foreground pixels.
#[derive(Debug, Clone, Copy)]
struct Run {
    start: u32, // inclusive
    end: u32,   // exclusive
    label: u32,
}

impl Run {
    /// Window of previous-row x coordinates this run can touch, end exclusive.
    fn search_window(&self, connectivity: Connectivity) -> (u32, u32) {
        match connectivity {
            Connectivity::Four => (self.start, self.end),
            Connectivity::Eight => (self.start.saturating_sub(1), self.end + 1),
        }
    }
}

fn runs_connected(prev: &Run, curr: &Run, connectivity: Connectivity) -> bool {
    match connectivity {
        Connectivity::Four => prev.start < curr.end && prev.end > curr.start,
        Connectivity::Eight => prev.start < curr.end + 1 && prev.end + 1 > curr.start,
    }
}

fn extract_runs_from_row(row: &[bool], runs: &mut Vec<Run>) {
    let mut run_start = None;
    for (x, &set) in row.iter().enumerate() {
        match (set, run_start) {
            (true, None) => run_start = Some(x as u32),
            (false, Some(start)) => {
                runs.push(Run {
                    start,
                    end: x as u32,
                    label: 0,
                });
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        runs.push(Run {
            start,
            end: row.len() as u32,
            label: 0,
        });
    }
}

/// Union-find over provisional labels, 1-based.
#[derive(Debug, Default)]
struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    fn make_set(&mut self) -> u32 {
        let label = self.parent.len() as u32 + 1;
        self.parent.push(label);
        label
    }

    fn find(&mut self, label: u32) -> u32 {
        let mut root = label;
        while self.parent[(root - 1) as usize] != root {
            root = self.parent[(root - 1) as usize];
        }

        let mut current = label;
        while current != root {
            let next = self.parent[(current - 1) as usize];
            self.parent[(current - 1) as usize] = root;
            current = next;
        }

        root
    }

    fn union(&mut self, a: u32, b: u32) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            let (smaller, larger) = if root_a < root_b {
                (root_a, root_b)
            } else {
                (root_b, root_a)
            };
            self.parent[(larger - 1) as usize] = smaller;
        }
    }

    /// Rewrites `labels` to sequential `1..=n` in first-seen order, returns `n`.
    fn flatten_labels(&mut self, labels: &mut [u32]) -> usize {
        let len = self.parent.len();
        let mut label_map = vec![0u32; len + 1];
        let mut num_labels = 0u32;

        for i in 1..=len as u32 {
            let root = self.find(i);
            if label_map[root as usize] == 0 {
                num_labels += 1;
                label_map[root as usize] = num_labels;
            }
            label_map[i as usize] = label_map[root as usize];
        }

        for l in labels.iter_mut().filter(|l| **l != 0) {
            *l = label_map[*l as usize];
        }

        num_labels as usize
    }
}

fn merge_runs_with_prev(
    curr_runs: &mut [Run],
    prev_runs: &[Run],
    connectivity: Connectivity,
    uf: &mut UnionFind,
) {
    let mut prev_idx = 0;
    for run in curr_runs.iter_mut() {
        let (search_start, search_end) = run.search_window(connectivity);

        while prev_idx < prev_runs.len() && prev_runs[prev_idx].end <= search_start {
            prev_idx += 1;
        }

        let mut assigned_label = None;
        let mut check_idx = prev_idx;
        while check_idx < prev_runs.len() && prev_runs[check_idx].start < search_end {
            let prev_run = &prev_runs[check_idx];
            if runs_connected(prev_run, run, connectivity) {
                match assigned_label {
                    Some(label) if label != prev_run.label => uf.union(label, prev_run.label),
                    None => assigned_label = Some(prev_run.label),
                    _ => {}
                }
            }
            check_idx += 1;
        }

        run.label = assigned_label.unwrap_or_else(|| uf.make_set());
    }
}

/// Per-component statistics gathered alongside labeling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentStats {
    pub label: u32,
    pub bounds: Rect,
    pub area: usize,
    pub centroid: DVec2,
}

impl ComponentStats {
    fn metric(&self, metric: ComponentMetric) -> usize {
        match metric {
            ComponentMetric::Left => self.bounds.x,
            ComponentMetric::Top => self.bounds.y,
            ComponentMetric::Width => self.bounds.width,
            ComponentMetric::Height => self.bounds.height,
            ComponentMetric::Area => self.area,
        }
    }
}

/// A 2D label map from connected component analysis.
#[derive(Debug, Clone)]
pub struct LabelMap {
    labels: Buffer2<u32>,
    stats: Vec<ComponentStats>,
}

impl LabelMap {
    pub fn new(mask: &Mask, connectivity: Connectivity) -> Self {
        let width = mask.width();
        let height = mask.height();
        let mut labels = Buffer2::new_default(width, height);

        let mut uf = UnionFind::default();
        let mut prev_runs: Vec<Run> = Vec::with_capacity(width / 4);
        let mut curr_runs: Vec<Run> = Vec::with_capacity(width / 4);

        for y in 0..height {
            curr_runs.clear();
            extract_runs_from_row(mask.row(y), &mut curr_runs);

            merge_runs_with_prev(&mut curr_runs, &prev_runs, connectivity, &mut uf);

            let row = labels.row_mut(y);
            for run in &curr_runs {
                row[run.start as usize..run.end as usize].fill(run.label);
            }

            std::mem::swap(&mut prev_runs, &mut curr_runs);
        }

        let num_labels = uf.flatten_labels(labels.pixels_mut());
        let stats = collect_stats(&labels, num_labels);

        Self { labels, stats }
    }

    /// Number of connected components (excluding background).
    pub fn num_labels(&self) -> usize {
        self.stats.len()
    }

    pub fn labels(&self) -> &Buffer2<u32> {
        &self.labels
    }

    pub fn stats(&self) -> &[ComponentStats] {
        &self.stats
    }

    /// Components sorted descending by `metric`; equal keys keep label order.
    pub fn ranked_by(&self, metric: ComponentMetric) -> Vec<ComponentStats> {
        let mut ranked = self.stats.clone();
        ranked.sort_by(|a, b| b.metric(metric).cmp(&a.metric(metric)));
        ranked
    }

    pub fn pixels_of(&self, label: u32) -> Vec<IVec2> {
        let width = self.labels.width();
        self.labels
            .pixels()
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == label)
            .map(|(idx, _)| IVec2::new((idx % width) as i32, (idx / width) as i32))
            .collect()
    }

    pub fn mask_of(&self, label: u32) -> Mask {
        self.labels.map(|&l| l == label)
    }
}

fn collect_stats(labels: &Buffer2<u32>, num_labels: usize) -> Vec<ComponentStats> {
    #[derive(Clone, Copy)]
    struct Acc {
        min: (usize, usize),
        max: (usize, usize),
        area: usize,
        sum: (u64, u64),
    }

    let mut acc = vec![
        Acc {
            min: (usize::MAX, usize::MAX),
            max: (0, 0),
            area: 0,
            sum: (0, 0),
        };
        num_labels
    ];

    for y in 0..labels.height() {
        for (x, &label) in labels.row(y).iter().enumerate() {
            if label == 0 {
                continue;
            }
            let a = &mut acc[(label - 1) as usize];
            a.min = (a.min.0.min(x), a.min.1.min(y));
            a.max = (a.max.0.max(x), a.max.1.max(y));
            a.area += 1;
            a.sum = (a.sum.0 + x as u64, a.sum.1 + y as u64);
        }
    }

    acc.iter()
        .enumerate()
        .map(|(i, a)| ComponentStats {
            label: i as u32 + 1,
            bounds: Rect::new(a.min.0, a.min.1, a.max.0 - a.min.0 + 1, a.max.1 - a.min.1 + 1),
            area: a.area,
            centroid: DVec2::new(
                a.sum.0 as f64 / a.area as f64,
                a.sum.1 as f64 / a.area as f64,
            ),
        })
        .collect()
}

/// Pixels of the `n`-th (1-based) component ranked by `metric`, 4-connected.
///
/// Returns `None` when `n` is not in `1..=component_count`.
pub fn nth_largest_component(mask: &Mask, n: usize, metric: ComponentMetric) -> Option<Vec<IVec2>> {
    let map = LabelMap::new(mask, Connectivity::Four);
    if n == 0 || n > map.num_labels() {
        return None;
    }
    let ranked = map.ranked_by(metric);
    Some(map.pixels_of(ranked[n - 1].label))
}

/// Among the `k` largest components by area, the label whose centroid lies
/// closest to `reference`. The earlier-ranked candidate wins an exact tie.
pub fn centroid_distance_tiebreak(map: &LabelMap, reference: DVec2, k: usize) -> Option<u32> {
    let mut best: Option<(f64, u32)> = None;
    for candidate in map.ranked_by(ComponentMetric::Area).iter().take(k) {
        let distance = candidate.centroid.distance_squared(reference);
        match best {
            Some((d, _)) if distance >= d => {}
            _ => best = Some((distance, candidate.label)),
        }
    }
    best.map(|(_, label)| label)
}
