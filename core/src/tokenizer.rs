use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"(?u)\W+").expect("valid regex");
    static ref WORD_RUN: Regex = Regex::new(r"(?u)\w+").expect("valid regex");
}

/// Every fifth bigram position is skipped to bound index growth.
const BIGRAM_SKIP_PERIOD: usize = 5;

/// Drop everything that is not a word character, whitespace included.
pub fn clean(text: &str) -> String {
    NON_WORD.replace_all(text, "").into_owned()
}

/// Maximal runs of word characters, in text order.
pub fn word_runs(text: &str) -> impl Iterator<Item = &str> {
    WORD_RUN.find_iter(text).map(|m| m.as_str())
}

/// Tokenize text into index terms: every character as a unigram, followed by
/// sampled bigrams. Duplicates are kept so callers can count frequencies.
pub fn tokenize(text: &str) -> Vec<String> {
    let chars: Vec<char> = clean(text).chars().collect();
    let mut terms: Vec<String> = chars.iter().map(|c| c.to_string()).collect();
    for i in 0..chars.len() {
        if i % BIGRAM_SKIP_PERIOD == BIGRAM_SKIP_PERIOD - 1 { continue; }
        let end = (i + 2).min(chars.len());
        terms.push(chars[i..end].iter().collect());
    }
    terms.retain(|t| !t.is_empty());
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = tokenize("春眠，不觉晓");
        assert_eq!(t[..5], ["春", "眠", "不", "觉", "晓"]);
        assert_eq!(t[5..], ["春眠", "眠不", "不觉", "觉晓"]);
    }

    #[test]
    fn trailing_bigram_degenerates() {
        let t = tokenize("ab c");
        assert_eq!(t, vec!["a", "b", "c", "ab", "bc", "c"]);
    }

    #[test]
    fn word_runs_split_on_markers() {
        let runs: Vec<&str> = word_runs("明月@故乡 & 霜").collect();
        assert_eq!(runs, vec!["明月", "故乡", "霜"]);
    }
}
