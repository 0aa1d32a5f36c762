use std::{collections::HashMap, fmt::Display, iter::zip};

use crate::corpus::{END, START};

/// Tag-wise performance values.
#[derive(Debug, Default)]
struct TagMeasure {
    /// Number of correct predictions.
    num_correct: usize,
    /** Number of occurrences of the tag in the gold-standard data. */
    num_observation: usize,
    /** Number of predictions. */
    num_prediction: usize,
    precision: f64,
    recall: f64,
    fmeasure: f64,
}

/// Overall performance over a tagged test corpus. Sentinel positions are
/// structural and never scored.
#[derive(Debug, Default)]
pub struct Evaluation {
    tbl: HashMap<String, TagMeasure>,

    /** Number of correctly tagged tokens. */
    item_total_correct: usize,
    /** Total number of scored tokens. */
    item_total_num: usize,
    /** Token-level accuracy. */
    item_accuracy: f64,

    /** Number of fully correct sentences. */
    inst_total_correct: usize,
    /** Total number of sentences. */
    inst_total_num: usize,
    /** Sentence-level accuracy. */
    inst_accuracy: f64,

    macro_precision: f64,
    macro_recall: f64,
    macro_fmeasure: f64,
}

#[derive(Debug)]
pub struct Estimation {
    /// Token-level accuracy, the headline tagging metric.
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
}

impl Evaluation {
    /// Accumulates one sentence of reference tags against predictions.
    pub fn accumulate(&mut self, reference: &[&str], prediction: &[&str]) {
        let mut matched = 0;
        let mut scored = 0;
        for (r, p) in zip(reference, prediction) {
            if *r == START || *r == END {
                continue;
            }
            scored += 1;
            self.tbl.entry(r.to_string()).or_default().num_observation += 1;
            self.tbl.entry(p.to_string()).or_default().num_prediction += 1;
            if *r == *p {
                self.tbl.entry(r.to_string()).or_default().num_correct += 1;
                matched += 1;
            }
            self.item_total_num += 1;
        }

        if matched == scored {
            self.inst_total_correct += 1;
        }
        self.inst_total_num += 1;
    }

    pub fn evaluate(&mut self) -> Estimation {
        let mut num_tags = 0;
        for lev in self.tbl.values_mut() {
            if lev.num_observation == 0 {
                continue;
            }
            num_tags += 1;
            self.item_total_correct += lev.num_correct;

            lev.precision = 0.0;
            lev.recall = 0.0;
            lev.fmeasure = 0.0;

            if lev.num_prediction > 0 {
                lev.precision = lev.num_correct as f64 / lev.num_prediction as f64;
            }
            if lev.num_observation > 0 {
                lev.recall = lev.num_correct as f64 / lev.num_observation as f64;
            }
            if lev.precision + lev.recall > 0.0 {
                lev.fmeasure = lev.precision * lev.recall * 2.0 / (lev.precision + lev.recall);
            }
            self.macro_precision += lev.precision;
            self.macro_recall += lev.recall;
            self.macro_fmeasure += lev.fmeasure;
        }

        if num_tags > 0 {
            self.macro_precision /= num_tags as f64;
            self.macro_recall /= num_tags as f64;
            self.macro_fmeasure /= num_tags as f64;
        }
        if self.item_total_num > 0 {
            self.item_accuracy = self.item_total_correct as f64 / self.item_total_num as f64;
        }
        if self.inst_total_num > 0 {
            self.inst_accuracy = self.inst_total_correct as f64 / self.inst_total_num as f64;
        }
        Estimation {
            accuracy: self.item_accuracy,
            precision: self.macro_precision,
            recall: self.macro_recall,
        }
    }
}

impl Display for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Performance by tag (#match, #model, #ref) (precision, recall, F1):")?;
        for (tag, lev) in &self.tbl {
            if lev.num_observation == 0 {
                writeln!(
                    f,
                    "\t{}: ({}, {}, {}) (******, ******, ******)",
                    tag, lev.num_correct, lev.num_prediction, lev.num_observation
                )?;
            } else {
                writeln!(
                    f,
                    "\t{}: ({}, {}, {}) ({:.4}, {:.4}, {:.4})",
                    tag, lev.num_correct, lev.num_prediction, lev.num_observation,
                    lev.precision, lev.recall, lev.fmeasure
                )?;
            }
        }
        writeln!(
            f,
            "Macro-average precision, recall, F1: ({}, {}, {})",
            self.macro_precision, self.macro_recall, self.macro_fmeasure
        )?;
        writeln!(
            f,
            "Token accuracy: {}/{} => {}",
            self.item_total_correct, self.item_total_num, self.item_accuracy
        )?;
        writeln!(
            f,
            "Sentence accuracy: {}/{} => {}",
            self.inst_total_correct, self.inst_total_num, self.inst_accuracy
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_are_not_scored() {
        let mut ev = Evaluation::default();
        ev.accumulate(
            &[START, "DET", "NOUN", END],
            &[START, "DET", "VERB", END],
        );
        let est = ev.evaluate();
        assert_eq!(est.accuracy, 0.5);
    }

    #[test]
    fn token_and_macro_measures() {
        let mut ev = Evaluation::default();
        ev.accumulate(&["DET", "NOUN"], &["DET", "NOUN"]);
        ev.accumulate(&["DET", "NOUN"], &["DET", "VERB"]);
        let est = ev.evaluate();
        assert!((est.accuracy - 0.75).abs() < 1e-12);
        // DET: p=1, r=1; NOUN: p=1 (1 of 1 predictions), r=0.5.
        assert!((est.precision - 1.0).abs() < 1e-12);
        assert!((est.recall - 0.75).abs() < 1e-12);
    }

    #[test]
    fn report_renders() {
        let mut ev = Evaluation::default();
        ev.accumulate(&["DET"], &["DET"]);
        ev.evaluate();
        let report = format!("{}", ev);
        assert!(report.contains("Token accuracy: 1/1"));
        assert!(report.contains("Sentence accuracy: 1/1"));
    }
}
