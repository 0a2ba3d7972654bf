use include_dir::{include_dir, Dir};
use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use serde_json::from_str;

static BANK_DIR: Dir = include_dir!("src/bank");

/// Word lengths offered per level. Higher levels draw longer words; the
/// band is widened to whatever the bank actually holds when it would
/// otherwise be empty.
fn level_band(level: u8) -> (usize, usize) {
    match level {
        0 | 1 => (3, 3),
        2 | 3 => (3, 4),
        4 | 5 => (4, 5),
        6 | 7 => (5, 6),
        8 => (6, 7),
        9 => (6, 8),
        _ => (7, 8),
    }
}

#[allow(dead_code)]
#[derive(Deserialize, Clone, Debug)]
pub struct WordBank {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl WordBank {
    /// The bank compiled into the binary.
    pub fn embedded() -> Self {
        let file = BANK_DIR
            .get_file("words.json")
            .expect("Word bank file not found");
        let file_as_str = file
            .contents_utf8()
            .expect("Unable to interpret file as a string");
        from_str(file_as_str).expect("Unable to deserialize word bank json")
    }

    /// A bank over a fixed word list, for tests.
    pub fn from_words(words: &[&str]) -> Self {
        Self {
            name: "fixed".into(),
            size: words.len() as u32,
            words: words.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Pick an uppercased word whose length fits `level`, avoiding an
    /// immediate repeat of `previous` whenever another candidate exists.
    pub fn pick(&self, level: u8, previous: Option<&str>, rng: &mut impl Rng) -> String {
        let (mut lo, mut hi) = level_band(level);
        if let itertools::MinMaxResult::MinMax(min, max) =
            self.words.iter().map(|w| w.len()).minmax()
        {
            lo = lo.clamp(min, max);
            hi = hi.clamp(min, max);
        }

        let mut candidates: Vec<&String> = self
            .words
            .iter()
            .filter(|w| (lo..=hi).contains(&w.len()))
            .collect();
        if candidates.is_empty() {
            candidates = self.words.iter().collect();
        }
        if candidates.len() > 1 {
            if let Some(previous) = previous {
                candidates.retain(|w| !w.eq_ignore_ascii_case(previous));
            }
        }

        candidates
            .choose(rng)
            .map(|w| w.to_uppercase())
            .unwrap_or_default()
    }
}
