//! Affine-gap global sequence alignment.
//!
//! Aligns a submission (the query) against the literal template text (the
//! target) end-to-end, producing a score and the edit script that attains it.
//! The gap model is affine: a run of `k` consecutive gap symbols costs
//! `gap_open + k * gap_extend`, charged once per maximal run, so one long
//! insertion is cheaper than many short ones.

use serde::{Deserialize, Serialize};

/// Scoring constants for the affine gap-penalty model.
///
/// Loaded from configuration; the defaults are `(+3, -1, -2, -1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringScheme {
    /// Reward for aligning two equal symbols.
    pub match_reward: i64,
    /// Penalty for aligning two different symbols.
    pub mismatch_penalty: i64,
    /// One-time cost of opening a gap run.
    pub gap_open: i64,
    /// Per-symbol cost of extending a gap run.
    pub gap_extend: i64,
}

impl Default for ScoringScheme {
    fn default() -> Self {
        Self {
            match_reward: 3,
            mismatch_penalty: -1,
            gap_open: -2,
            gap_extend: -1,
        }
    }
}

/// One step of an edit script. At most one side is absent, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignStep {
    /// Both sequences consume a symbol: a match or a substitution.
    Pair { query: char, target: char },
    /// The query consumes a symbol the target lacks (an insertion).
    QueryOnly(char),
    /// The target consumes a symbol the query lacks (a deletion).
    TargetOnly(char),
}

impl AlignStep {
    /// The query-side symbol, if this step consumes one.
    pub fn query(&self) -> Option<char> {
        match *self {
            AlignStep::Pair { query, .. } | AlignStep::QueryOnly(query) => Some(query),
            AlignStep::TargetOnly(_) => None,
        }
    }

    /// The target-side symbol, if this step consumes one.
    pub fn target(&self) -> Option<char> {
        match *self {
            AlignStep::Pair { target, .. } | AlignStep::TargetOnly(target) => Some(target),
            AlignStep::QueryOnly(_) => None,
        }
    }

    /// True for a `Pair` of equal symbols.
    pub fn is_match(&self) -> bool {
        matches!(*self, AlignStep::Pair { query, target } if query == target)
    }
}

/// A global alignment: the optimal score and the edit script attaining it.
///
/// Invariant: concatenating the present query-side symbols reconstructs the
/// query exactly, and likewise for the target side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub score: i64,
    pub steps: Vec<AlignStep>,
}

impl Alignment {
    /// The query reconstructed from the edit script.
    pub fn query_string(&self) -> String {
        self.steps.iter().filter_map(AlignStep::query).collect()
    }

    /// The target reconstructed from the edit script.
    pub fn target_string(&self) -> String {
        self.steps.iter().filter_map(AlignStep::target).collect()
    }
}

/// Compute the optimal global alignment of `query` against `target`.
///
/// O(n·m) time and space. The naive affine-gap recurrence scans every
/// earlier row/column per cell; that is avoided by keeping, per column, the
/// running maximum of `dp[i'][j] - gap_extend * i'` (and the row analogue),
/// from which the best jump term is recovered in O(1).
///
/// Deterministic: when candidates tie, the diagonal predecessor wins over a
/// vertical jump, which wins over a horizontal jump. This order is relied on
/// by downstream fixtures and must not change.
pub fn align(query: &[char], target: &[char], scheme: &ScoringScheme) -> Alignment {
    let n = query.len();
    let m = target.len();
    let width = m + 1;
    let open = scheme.gap_open;
    let ext = scheme.gap_extend;

    let mut score = vec![0i64; (n + 1) * width];
    // Backpointers. Jumps store their origin row/column, which the running
    // maxima would otherwise discard.
    let mut from = vec![(0u32, 0u32); (n + 1) * width];

    for i in 1..=n {
        score[i * width] = open + ext * i as i64;
    }
    // col_max[j] holds (max over i' of dp[i'][j] - ext*i', that i').
    let mut col_max = vec![(i64::MIN, 0usize); width];
    for j in 1..=m {
        score[j] = open + ext * j as i64;
        col_max[j] = (score[j], 0);
    }

    for i in 1..=n {
        let row = i * width;
        // Row analogue of col_max, restarted per row.
        let mut row_max = (score[row], 0usize);
        for j in 1..=m {
            let sub = if query[i - 1] == target[j - 1] {
                scheme.match_reward
            } else {
                scheme.mismatch_penalty
            };
            let diag = score[(i - 1) * width + j - 1] + sub;
            let vert = col_max[j].0 + open + ext * i as i64;
            let horiz = row_max.0 + open + ext * j as i64;

            let (best, origin) = if diag >= vert && diag >= horiz {
                (diag, (i - 1, j - 1))
            } else if vert >= horiz {
                (vert, (col_max[j].1, j))
            } else {
                (horiz, (i, row_max.1))
            };

            score[row + j] = best;
            from[row + j] = (origin.0 as u32, origin.1 as u32);

            // Strictly-greater updates keep the earliest origin on ties.
            if best - ext * i as i64 > col_max[j].0 {
                col_max[j] = (best - ext * i as i64, i);
            }
            if best - ext * j as i64 > row_max.0 {
                row_max = (best - ext * j as i64, j);
            }
        }
    }

    // Traceback from (n, m) all the way to (0, 0); boundary cells point at
    // the origin, so leading runs are emitted too.
    let mut steps = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (n, m);
    while i > 0 || j > 0 {
        let (pi, pj) = from[i * width + j];
        let (pi, pj) = (pi as usize, pj as usize);
        if i > 0 && j > 0 && pi == i - 1 && pj == j - 1 {
            steps.push(AlignStep::Pair {
                query: query[i - 1],
                target: target[j - 1],
            });
        } else if pj == j {
            for x in ((pi + 1)..=i).rev() {
                steps.push(AlignStep::QueryOnly(query[x - 1]));
            }
        } else {
            debug_assert_eq!(pi, i);
            for y in ((pj + 1)..=j).rev() {
                steps.push(AlignStep::TargetOnly(target[y - 1]));
            }
        }
        i = pi;
        j = pj;
    }
    steps.reverse();

    Alignment {
        score: score[n * width + m],
        steps,
    }
}

/// Convenience wrapper collecting both strings into symbol sequences.
pub fn align_str(query: &str, target: &str, scheme: &ScoringScheme) -> Alignment {
    let q: Vec<char> = query.chars().collect();
    let t: Vec<char> = target.chars().collect();
    align(&q, &t, scheme)
}
