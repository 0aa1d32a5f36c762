use std::{
    fs::File,
    io::{BufRead, BufReader},
};

use crate::error::Result;
use crate::quark::{Quark, TextVectorizer};

/// Sentence-boundary sentinels. Structural markers, not taggable classes.
pub const START: &str = "START";
pub const END: &str = "END";

/// One tagged sentence: parallel word/tag-id vectors, `START` pair first.
#[derive(Debug, Default, Clone)]
pub struct Sentence {
    pub words: Vec<String>,
    pub tags: Vec<usize>,
}

impl Sentence {
    pub fn push(&mut self, word: String, tag: usize) {
        self.words.push(word);
        self.tags.push(tag);
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }
}

/// A tagged corpus: sentences plus the tag interner that owns their ids.
#[derive(Debug, Default)]
pub struct Dataset {
    pub sents: Vec<Sentence>,
    pub tags: Quark,
}

impl Dataset {
    /// Reads a corpus of one sentence per line, each a whitespace-separated
    /// run of `word=TAG` pairs. Words are lowercased (sentinel tokens
    /// excepted); missing `START`/`END` boundary pairs are synthesized.
    pub fn read_file(&mut self, file: File) -> Result<()> {
        for line in BufReader::new(file).lines() {
            let line = line?;
            self.read_line(&line);
        }
        Ok(())
    }

    fn read_line(&mut self, line: &str) {
        let mut sent = Sentence::default();
        for pair in line.split_whitespace() {
            match pair.rsplit_once('=') {
                Some((word, tag)) => {
                    let word = if tag == START || tag == END {
                        word.to_string()
                    } else {
                        word.to_lowercase()
                    };
                    let tid = self.tags.find_or_insert(tag);
                    sent.push(word, tid);
                }
                None => log::warn!("invalid pair: {pair}"),
            }
        }
        if sent.is_empty() {
            return;
        }
        let start_id = self.tags.find_or_insert(START);
        if sent.tags[0] != start_id {
            sent.words.insert(0, START.to_string());
            sent.tags.insert(0, start_id);
        }
        let end_id = self.tags.find_or_insert(END);
        if sent.tags[sent.len() - 1] != end_id {
            sent.push(END.to_string(), end_id);
        }
        self.sents.push(sent);
    }

    /// Drops the tags, keeping the word sequences (sentinel tokens retained).
    pub fn strip_tags(&self) -> Vec<Vec<String>> {
        self.sents.iter().map(|s| s.words.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.sents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sents.is_empty()
    }

    pub fn total_words(&self) -> usize {
        self.sents.iter().map(|s| s.len()).sum()
    }
}

impl<'a> From<std::str::Lines<'a>> for Dataset {
    fn from(lines: std::str::Lines<'a>) -> Self {
        let mut ds = Dataset::default();
        for line in lines {
            ds.read_line(line);
        }
        ds
    }
}

/// Formats one recognized utterance for tagging: whitespace tokens,
/// lowercased, wrapped in the `START`/`END` sentinels.
pub fn wrap_utterance(text: &str) -> Vec<String> {
    let mut words = vec![START.to_string()];
    words.extend(text.split_whitespace().map(|w| w.to_lowercase()));
    words.push(END.to_string());
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quark::StringTable;

    #[test]
    fn parse_lines() {
        let s = "START=START the=DET dog=NOUN runs=VERB END=END\nSTART=START a=DET cat=NOUN sleeps=VERB END=END";
        let ds = Dataset::from(s.lines());
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.total_words(), 10);
        assert_eq!(ds.tags.to_id(START), Some(0));
        assert_eq!(ds.sents[1].words[2], "cat");
    }

    #[test]
    fn words_are_lowercased() {
        let ds = Dataset::from("START=START The=DET Dog=NOUN END=END".lines());
        assert_eq!(ds.sents[0].words[1], "the");
        assert_eq!(ds.sents[0].words[2], "dog");
    }

    #[test]
    fn boundary_pairs_synthesized() {
        let ds = Dataset::from("the=DET dog=NOUN".lines());
        let sent = &ds.sents[0];
        assert_eq!(sent.len(), 4);
        assert_eq!(sent.words[0], START);
        assert_eq!(sent.words[3], END);
        assert_eq!(ds.tags.to_str(sent.tags[0]), Some(START));
        assert_eq!(ds.tags.to_str(sent.tags[3]), Some(END));
    }

    #[test]
    fn invalid_pairs_skipped() {
        let ds = Dataset::from("START=START the=DET garbage dog=NOUN END=END".lines());
        assert_eq!(ds.sents[0].len(), 4);
    }

    #[test]
    fn blank_lines_ignored() {
        let ds = Dataset::from("START=START a=DET END=END\n\nSTART=START b=DET END=END".lines());
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn strip_keeps_word_order() {
        let ds = Dataset::from("START=START the=DET dog=NOUN END=END".lines());
        let stripped = ds.strip_tags();
        assert_eq!(stripped, vec![vec![
            START.to_string(),
            "the".to_string(),
            "dog".to_string(),
            END.to_string(),
        ]]);
    }

    #[test]
    fn wrap_splits_and_delimits() {
        let words = wrap_utterance("The dog Runs");
        assert_eq!(words, vec![
            START.to_string(),
            "the".to_string(),
            "dog".to_string(),
            "runs".to_string(),
            END.to_string(),
        ]);
    }
}
