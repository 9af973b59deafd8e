use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)[\w']+").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "just","let's","me","mine","more","most","mustn't","my","myself",
            "no","nor","not","now","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","will","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Turns raw text into the ordered sequence of normalized terms the indexes are built from.
///
/// Implementations must be deterministic and must not depend on corpus statistics.
pub trait Preprocessor {
    fn preprocess(&self, text: &str) -> Vec<String>;
}

impl<F> Preprocessor for F
where
    F: Fn(&str) -> Vec<String>,
{
    fn preprocess(&self, text: &str) -> Vec<String> {
        self(text)
    }
}

/// English pipeline: Unicode folding, lowercasing, word splitting, punctuation
/// stripping, stop-word removal and Snowball stemming.
#[derive(Debug, Clone, Copy)]
pub struct EnglishPreprocessor {
    stem: bool,
}

impl Default for EnglishPreprocessor {
    fn default() -> Self { Self { stem: true } }
}

impl EnglishPreprocessor {
    pub fn new() -> Self { Self::default() }

    pub fn with_stemming(mut self, stem: bool) -> Self {
        self.stem = stem;
        self
    }
}

impl Preprocessor for EnglishPreprocessor {
    fn preprocess(&self, text: &str) -> Vec<String> {
        tokenize(text, self.stem)
    }
}

/// Tokenize text: NFKD with combining marks dropped (so `café` becomes `cafe`),
/// lowercase, stop-word removal, apostrophes stripped, optional stemming.
pub fn tokenize(text: &str, stem: bool) -> Vec<String> {
    let normalized = text.nfkd().filter(|c| !is_combining_mark(*c)).collect::<String>().to_lowercase();
    let mut tokens = Vec::new();
    for mat in RE.find_iter(&normalized) {
        let raw = mat.as_str();
        if is_stopword(raw) { continue; }
        let token: String = raw.chars().filter(|c| *c != '\'').collect();
        if token.is_empty() || is_stopword(&token) { continue; }
        if stem {
            tokens.push(STEMMER.stem(&token).into_owned());
        } else {
            tokens.push(token);
        }
    }
    tokens
}
