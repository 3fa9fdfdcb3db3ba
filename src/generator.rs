use std::ops::Range;
use std::sync::{Mutex, PoisonError};

use fake::faker::lorem::en::Sentence;
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::constants::{SENTENCES_PER_REPLY, WORDS_PER_SENTENCE};

/// Produces one natural-language sentence per call.
pub trait SentenceSource: Send + Sync {
    fn sentence(&self) -> String;
}

/// Lorem ipsum sentences from the `fake` crate.
#[derive(Debug, Clone)]
pub struct LoremSentences {
    words: Range<usize>,
}

impl LoremSentences {
    pub fn new(words: Range<usize>) -> Self {
        Self { words }
    }
}

impl Default for LoremSentences {
    fn default() -> Self {
        Self::new(WORDS_PER_SENTENCE)
    }
}

impl SentenceSource for LoremSentences {
    fn sentence(&self) -> String {
        Sentence(self.words.clone()).fake()
    }
}

/// Placeholder responder: the reply is a random run of sentences and never
/// depends on the prompt.
pub struct ResponseGenerator<S = LoremSentences> {
    source: S,
    rng: Mutex<StdRng>,
}

impl ResponseGenerator {
    pub fn new() -> Self {
        Self::with_source(LoremSentences::default())
    }

    /// Deterministic sentence count, for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self::with_source_and_rng(LoremSentences::default(), StdRng::seed_from_u64(seed))
    }
}

impl Default for ResponseGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SentenceSource> ResponseGenerator<S> {
    pub fn with_source(source: S) -> Self {
        Self::with_source_and_rng(source, StdRng::from_os_rng())
    }

    pub fn with_source_and_rng(source: S, rng: StdRng) -> Self {
        Self {
            source,
            rng: Mutex::new(rng),
        }
    }

    pub fn generate_sentences(&self, _prompt: &str) -> Vec<String> {
        let count = self.sentence_count();
        (0..count).map(|_| self.source.sentence()).collect()
    }

    pub fn generate(&self, prompt: &str) -> String {
        let sentences = self.generate_sentences(prompt);
        debug!(sentences = sentences.len(), "Generated reply");
        sentences.join(" ")
    }

    fn sentence_count(&self) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_range(SENTENCES_PER_REPLY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
    }

    impl SentenceSource for CountingSource {
        fn sentence(&self) -> String {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            format!("s{}", n)
        }
    }

    #[test]
    fn test_sentence_count_within_range() {
        let generator = ResponseGenerator::seeded(7);
        for _ in 0..200 {
            let sentences = generator.generate_sentences("Hello");
            assert!((10..30).contains(&sentences.len()), "got {} sentences", sentences.len());
            assert!(sentences.iter().all(|s| !s.trim().is_empty()));
        }
    }

    #[test]
    fn test_generate_joins_with_single_spaces() {
        let source = CountingSource { calls: AtomicUsize::new(0) };
        let generator = ResponseGenerator::with_source_and_rng(source, StdRng::seed_from_u64(1));

        let reply = generator.generate("ignored");
        let parts: Vec<&str> = reply.split(' ').collect();

        assert!((10..30).contains(&parts.len()));
        for (i, part) in parts.iter().enumerate() {
            assert_eq!(*part, format!("s{}", i));
        }
    }

    #[test]
    fn test_generate_is_never_empty() {
        let generator = ResponseGenerator::new();
        assert!(!generator.generate("").is_empty());
        assert!(!generator.generate("What is the meaning of life?").is_empty());
    }

    #[test]
    fn test_same_seed_gives_same_count() {
        let a = ResponseGenerator::seeded(42);
        let b = ResponseGenerator::seeded(42);
        for _ in 0..10 {
            assert_eq!(a.generate_sentences("x").len(), b.generate_sentences("y").len());
        }
    }

    #[test]
    fn test_lorem_sentence_word_count() {
        let source = LoremSentences::new(3..4);
        let sentence = source.sentence();
        let words = sentence.split_whitespace().count();
        assert_eq!(words, 3, "unexpected sentence: {}", sentence);
    }
}
