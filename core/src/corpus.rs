use crate::error::{CoreError, Result};
use crate::tokenizer::Preprocessor;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Raw documents in doc id order.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    /// File name of each document, e.g. `doc_01.txt`.
    pub names: Vec<String>,
    pub texts: Vec<String>,
}

impl Corpus {
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let texts: Vec<String> = texts.into_iter().map(Into::into).collect();
        let names = (0..texts.len()).map(|i| format!("doc{i}")).collect();
        Self { names, texts }
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn preprocess<P: Preprocessor + ?Sized>(&self, preprocessor: &P) -> Vec<Vec<String>> {
        self.texts.iter().map(|t| preprocessor.preprocess(t)).collect()
    }
}

/// Load every `*.txt` file directly inside `dir`, ordered by file name.
pub fn load_corpus<P: AsRef<Path>>(dir: P) -> Result<Corpus> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(CoreError::Io {
            path: dir.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "corpus directory not found"),
        });
    }

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| CoreError::Io { path: dir.to_path_buf(), source: e.into() })?;
        let p = entry.path();
        if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("txt") {
            files.push(p.to_path_buf());
        }
    }
    if files.is_empty() {
        return Err(CoreError::EmptyCorpus);
    }

    let mut corpus = Corpus::default();
    for file in files {
        let text = fs::read_to_string(&file).map_err(|source| CoreError::Io { path: file.clone(), source })?;
        let name = file.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        corpus.names.push(name);
        corpus.texts.push(text);
    }
    tracing::info!(dir = %dir.display(), num_docs = corpus.len(), "loaded corpus");
    Ok(corpus)
}
