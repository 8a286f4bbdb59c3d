use crate::grid::Region3;
use crate::horizon::{Horizon, Pick};
use crate::volume::{VolumeF32, VolumeView};

const NEIGH_OFFSETS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// One thresholded run reduced to its strongest sample.
#[derive(Clone, Copy, Debug)]
struct CandidatePick {
    depth: usize,
    prob: f32,
}

pub(super) struct HorizonExtractor<'a> {
    volume: &'a VolumeF32,
    region: Region3,
    threshold: f32,
    depth_tolerance: usize,
    n1: usize,
    n2: usize,
    /// Candidate picks for all columns, column-major blocks in row-major
    /// column order, increasing depth within a column.
    picks: Vec<CandidatePick>,
    /// Prefix offsets into `picks`, one entry per column plus a tail.
    col_start: Vec<usize>,
    used: Vec<bool>,
    stack: Vec<usize>,
}

impl<'a> HorizonExtractor<'a> {
    pub(super) fn new(
        volume: &'a VolumeF32,
        region: Region3,
        threshold: f32,
        depth_tolerance: usize,
    ) -> Self {
        let [n1, n2, _] = volume.shape();
        let mut extractor = Self {
            volume,
            region,
            threshold,
            depth_tolerance,
            n1,
            n2,
            picks: Vec::new(),
            col_start: Vec::with_capacity(n1 * n2 + 1),
            used: Vec::new(),
            stack: Vec::with_capacity(64),
        };
        extractor.collect_picks();
        extractor
    }

    pub(super) fn extract(mut self) -> Vec<Horizon> {
        let mut horizons = Vec::new();
        for seed in 0..self.picks.len() {
            if self.used[seed] {
                continue;
            }
            horizons.push(self.grow_surface(seed));
        }
        horizons
    }

    /// Threshold every column into runs and keep each run's strongest
    /// sample as a candidate pick.
    fn collect_picks(&mut self) {
        let volume = self.volume;
        self.col_start.push(0);
        for (_, column) in volume.columns() {
            let mut d = 0usize;
            while d < column.len() {
                if column[d] < self.threshold {
                    d += 1;
                    continue;
                }
                let mut best = CandidatePick {
                    depth: d,
                    prob: column[d],
                };
                d += 1;
                while d < column.len() && column[d] >= self.threshold {
                    if column[d] > best.prob {
                        best = CandidatePick {
                            depth: d,
                            prob: column[d],
                        };
                    }
                    d += 1;
                }
                self.picks.push(best);
            }
            self.col_start.push(self.picks.len());
        }
        self.used = vec![false; self.picks.len()];
    }

    /// Grow one connected surface from a seed pick.
    fn grow_surface(&mut self, seed: usize) -> Horizon {
        let mut horizon = Horizon::new();
        self.stack.clear();
        self.used[seed] = true;
        self.stack.push(seed);

        while let Some(pick_idx) = self.stack.pop() {
            let col = self.column_of(pick_idx);
            let (i1, i2) = (col / self.n2, col % self.n2);
            let pick = self.picks[pick_idx];
            horizon.insert_pick(
                self.region.min[0] + i1,
                self.region.min[1] + i2,
                Pick {
                    depth: self.region.min[2] + pick.depth,
                    prob: pick.prob,
                },
            );

            for (d1, d2) in NEIGH_OFFSETS {
                let j1 = i1 as isize + d1;
                let j2 = i2 as isize + d2;
                if j1 < 0 || j2 < 0 || j1 >= self.n1 as isize || j2 >= self.n2 as isize {
                    continue;
                }
                let neighbor_col = j1 as usize * self.n2 + j2 as usize;
                let start = self.col_start[neighbor_col];
                let end = self.col_start[neighbor_col + 1];
                for neighbor_idx in start..end {
                    if self.used[neighbor_idx] {
                        continue;
                    }
                    let diff = self.picks[neighbor_idx].depth.abs_diff(pick.depth);
                    if diff <= self.depth_tolerance {
                        self.used[neighbor_idx] = true;
                        self.stack.push(neighbor_idx);
                    }
                }
            }
        }
        horizon
    }

    /// Column index owning a pick, found by binary search on the prefix
    /// offsets.
    fn column_of(&self, pick_idx: usize) -> usize {
        match self.col_start.binary_search(&pick_idx) {
            // Offsets repeat when columns have no picks; walk forward to the
            // last column starting at this offset.
            Ok(mut at) => {
                while at + 1 < self.col_start.len() && self.col_start[at + 1] == pick_idx {
                    at += 1;
                }
                at
            }
            Err(before) => before - 1,
        }
    }
}
