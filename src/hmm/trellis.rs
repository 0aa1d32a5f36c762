use bitflags::bitflags;

bitflags! {
    /// Selects which trellis score blocks `reset` clears.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ResetOpt: u32 {
        /// Per-position state (emission) scores.
        const RF_STATE = 0x01;
        /// Transition and initial scores.
        const RF_TRANS = 0x02;
    }
}

/// Viterbi dynamic-programming table over (position, tag).
///
/// Score and backpointer matrices are flat row-major `[T][L]` vectors and
/// always share dimensions. Buffers are reused across sentences; only growth
/// past `cap_items` reallocates.
#[derive(Debug, Default)]
pub struct Trellis {
    /// The total number of distinct tags (L).
    num_tags: usize,
    /// The number of real tokens (T) in the current sentence.
    num_items: usize,
    /// High-water mark for the per-position buffers.
    cap_items: usize,
    /// Initial scores, a [L] vector: log P(tag) for the opening position.
    pub initial: Vec<f64>,
    /// State scores, a [T][L] matrix: log P(word at #t | tag #j).
    pub state: Vec<f64>,
    /// Transition scores, a [L][L] matrix: log P(tag #j | tag #i).
    pub trans: Vec<f64>,
    /// Best cumulative path score arriving at (t, j).
    score: Vec<f64>,
    /// Backward edges: the previous-position tag that yields `score[t][j]`.
    backward_edge: Vec<i32>,
}

impl Trellis {
    pub fn new(l: usize) -> Self {
        Self {
            num_tags: l,
            initial: vec![0.0; l],
            trans: vec![0.0; l * l],
            ..Default::default()
        }
    }

    pub fn num_items(&self) -> usize {
        self.num_items
    }

    /// Sizes the per-position buffers for a sentence of `t` real tokens.
    pub fn resize(&mut self, t: usize) {
        let l = self.num_tags;
        self.num_items = t;
        if self.cap_items < t {
            self.state.resize(t * l, 0.0);
            self.score.resize(t * l, 0.0);
            self.backward_edge.resize(t * l, 0);
            self.cap_items = t;
        }
    }

    pub fn reset(&mut self, opts: ResetOpt) {
        if opts.contains(ResetOpt::RF_STATE) {
            for v in self.state.iter_mut() {
                *v = 0.0;
            }
        }
        if opts.contains(ResetOpt::RF_TRANS) {
            for v in self.trans.iter_mut() {
                *v = 0.0;
            }
            for v in self.initial.iter_mut() {
                *v = 0.0;
            }
        }
    }

    /// Runs the Viterbi pass over the current scores and writes the best tag
    /// path into `labels`, one id per real token. Every argmax breaks ties
    /// toward the lowest tag id.
    pub fn viterbi(&mut self, labels: &mut [usize]) -> f64 {
        let t_max = self.num_items;
        let l = self.num_tags;
        assert_eq!(labels.len(), t_max, "label buffer mismatch");

        /* Scores at (0, *): initial + state. */
        for j in 0..l {
            self.score[j] = self.initial[j] + self.state[j];
        }
        /* Scores at (t, *). */
        for t in 1..t_max {
            for j in 0..l {
                let mut max_score = f64::MIN;
                let mut argmax_score = -1;
                for i in 0..l {
                    /* Transit from (t-1, i) to (t, j). */
                    let score = self.score[l * (t - 1) + i] + self.trans[l * i + j];
                    if max_score < score {
                        max_score = score;
                        argmax_score = i as i32;
                    }
                }
                if argmax_score >= 0 {
                    self.backward_edge[l * t + j] = argmax_score;
                }
                /* Add the state score on (t, j). */
                self.score[l * t + j] = max_score + self.state[l * t + j];
            }
        }

        /* Find the tag at (T-1, *) with the best cumulative score. */
        let mut max_score = f64::MIN;
        labels[t_max - 1] = 0;
        for i in 0..l {
            let s = self.score[l * (t_max - 1) + i];
            if max_score < s {
                max_score = s;
                labels[t_max - 1] = i;
            }
        }
        /* Tag the rest by tracing the backward links. */
        for t in (0..t_max - 1).rev() {
            let i = labels[t + 1];
            labels[t] = self.backward_edge[l * (t + 1) + i] as usize;
        }
        max_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init() {
        let trellis = Trellis::new(3);
        assert_eq!(trellis.num_items(), 0);
        assert_eq!(trellis.initial.len(), 3);
        assert_eq!(trellis.trans.len(), 9);
    }

    #[test]
    fn resize_reuses_capacity() {
        let mut trellis = Trellis::new(2);
        trellis.resize(5);
        assert_eq!(trellis.state.len(), 10);
        trellis.resize(3);
        assert_eq!(trellis.num_items(), 3);
        assert_eq!(trellis.state.len(), 10);
    }

    #[test]
    fn viterbi_follows_best_path() {
        let mut trellis = Trellis::new(2);
        trellis.resize(2);
        trellis.initial.copy_from_slice(&[-1.0, -2.0]);
        // row-major [prev][curr]
        trellis.trans.copy_from_slice(&[-1.0, -2.0, -1.0, -1.0]);
        for v in trellis.state.iter_mut() {
            *v = -1.0;
        }
        let mut labels = vec![0; 2];
        let score = trellis.viterbi(&mut labels);
        assert_eq!(labels, vec![0, 0]);
        assert!((score - (-4.0)).abs() < 1e-12);
    }

    #[test]
    fn viterbi_ties_break_to_lowest_id() {
        let mut trellis = Trellis::new(3);
        trellis.resize(4);
        let mut labels = vec![usize::MAX; 4];
        trellis.viterbi(&mut labels);
        assert_eq!(labels, vec![0, 0, 0, 0]);
    }

    #[test]
    fn reset_clears_selected_blocks() {
        let mut trellis = Trellis::new(2);
        trellis.resize(1);
        trellis.initial[0] = -3.0;
        trellis.trans[1] = -4.0;
        trellis.state[0] = -5.0;
        trellis.reset(ResetOpt::RF_STATE);
        assert_eq!(trellis.state[0], 0.0);
        assert_eq!(trellis.initial[0], -3.0);
        trellis.reset(ResetOpt::RF_TRANS);
        assert_eq!(trellis.initial[0], 0.0);
        assert_eq!(trellis.trans[1], 0.0);
    }
}
