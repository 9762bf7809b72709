//! Word lists, one per word length, loaded once and shared read-only

use fst::Set;
use log::info;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
};
use thiserror::Error;

/// Failure to provide a word list. The game cannot start without its corpora.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The backing file could not be read
    #[error("The word list '{}' could not be read", .path.display())]
    Unreadable {
        /// File that was attempted
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The source was read, but had no word of the requested length
    #[error("The word list '{source_name}' has no words of length {length}")]
    Empty {
        /// Display name of the source
        source_name: String,
        /// Requested word length
        length: usize,
    },
    /// Building the membership index failed
    #[error("Could not index the word list")]
    Index(#[from] fst::Error),
}

/// Word lengths that have their own corpus
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WordLength {
    /// Five letters, shared by stages 1 to 5
    Five,
    /// Six letters
    Six,
    /// Seven letters
    Seven,
}

impl WordLength {
    /// All lengths in ascending order
    pub const ALL: [Self; 3] = [Self::Five, Self::Six, Self::Seven];

    /// Number of letters
    #[must_use]
    pub const fn letters(self) -> usize {
        match self {
            Self::Five => 5,
            Self::Six => 6,
            Self::Seven => 7,
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::Five => 0,
            Self::Six => 1,
            Self::Seven => 2,
        }
    }
}

/// An ordered list of lowercase words of one fixed length
///
/// The order is the order of the source; daily selection indexes into it.
/// Membership is answered by an [`fst::Set`] built next to the list.
#[derive(Debug)]
pub struct Corpus {
    length: usize,
    words: Vec<String>,
    index: Set<Vec<u8>>,
}

impl Corpus {
    /// Build a corpus from raw lines
    ///
    /// Every line is trimmed and lowercased. Only lines with exactly `length`
    /// letters in [a-z] are kept, in their original order.
    ///
    /// # Errors
    ///
    /// [`CorpusError::Index`] if the membership index cannot be built
    pub fn from_lines<I>(lines: I, length: usize) -> Result<Self, CorpusError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let words = clean_word_list(lines, length);
        let mut sorted = words.clone();
        sorted.sort_unstable();
        sorted.dedup();
        let index = Set::from_iter(sorted)?;

        Ok(Self {
            length,
            words,
            index,
        })
    }

    /// The number of letters of every word
    #[must_use]
    pub const fn word_length(&self) -> usize {
        self.length
    }

    /// All words in source order
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// The first `n` words, or all of them if there are fewer
    #[must_use]
    pub fn prefix(&self, n: usize) -> &[String] {
        &self.words[..n.min(self.words.len())]
    }

    /// Number of words
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true iff there are no words
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Test if `word` is in this corpus. Expects an already lowercased word.
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains(word)
    }
}

fn clean_word_list<I>(lines: I, length: usize) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn valid_word(word: &str, length: usize) -> bool {
        word.len() == length && word.bytes().all(|b| matches!(b, b'a'..=b'z'))
    }

    lines
        .into_iter()
        .map(|line| line.as_ref().trim().to_lowercase())
        .filter(|word| valid_word(word, length))
        .collect()
}

/// Where the words for one length come from
#[derive(Clone, Debug)]
pub enum WordSource {
    /// A line-delimited UTF-8 file
    File(PathBuf),
    /// Line-delimited words held in memory
    Inline(String),
}

impl WordSource {
    fn name(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Inline(_) => String::from("<inline>"),
        }
    }

    fn load(&self, length: usize) -> Result<Corpus, CorpusError> {
        let corpus = match self {
            Self::File(path) => Corpus::from_lines(read_lines(path)?.lines(), length)?,
            Self::Inline(text) => Corpus::from_lines(text.lines(), length)?,
        };
        if corpus.is_empty() {
            return Err(CorpusError::Empty {
                source_name: self.name(),
                length,
            });
        }
        Ok(corpus)
    }
}

fn read_lines(path: &Path) -> Result<String, CorpusError> {
    fs::read_to_string(path).map_err(|source| CorpusError::Unreadable {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug)]
struct Slot {
    source: WordSource,
    corpus: OnceLock<Corpus>,
}

/// The set of corpora for all word lengths
///
/// Each corpus is read from its [`WordSource`] the first time it is requested
/// and is immutable afterwards. Loading is idempotent: once a corpus is present,
/// further requests return it without touching the source again.
#[derive(Debug)]
pub struct Lexicon {
    slots: [Slot; 3],
}

impl Lexicon {
    /// Create a lexicon where the 5-letter corpus is read from `five`
    /// and the 6- and 7-letter corpora are read from `longer`
    #[must_use]
    pub fn new(five: WordSource, longer: WordSource) -> Self {
        Self::from_sources(five, longer.clone(), longer)
    }

    /// Create a lexicon with a separate source for every length
    #[must_use]
    pub fn from_sources(five: WordSource, six: WordSource, seven: WordSource) -> Self {
        let slot = |source| Slot {
            source,
            corpus: OnceLock::new(),
        };
        Self {
            slots: [slot(five), slot(six), slot(seven)],
        }
    }

    /// Return the corpus for `length`, loading it if this is the first request
    ///
    /// # Errors
    ///
    /// Any [`CorpusError`] from reading the source. Nothing is cached on error.
    pub fn corpus(&self, length: WordLength) -> Result<&Corpus, CorpusError> {
        let slot = &self.slots[length.slot()];
        if let Some(corpus) = slot.corpus.get() {
            return Ok(corpus);
        }

        let corpus = slot.source.load(length.letters())?;
        info!(
            "Loaded {} words of length {} from {}",
            corpus.len(),
            length.letters(),
            slot.source.name()
        );
        // a concurrent load may have won the race; both results are identical
        Ok(slot.corpus.get_or_init(|| corpus))
    }

    /// Check if the corpus for `length` has been loaded already
    #[must_use]
    pub fn is_loaded(&self, length: WordLength) -> bool {
        self.slots[length.slot()].corpus.get().is_some()
    }

    /// Load every corpus
    ///
    /// # Errors
    ///
    /// The first [`CorpusError`] encountered
    pub fn load_all(&self) -> Result<(), CorpusError> {
        for length in WordLength::ALL {
            let _ = self.corpus(length)?;
        }
        Ok(())
    }
}
