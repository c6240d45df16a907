// src/engine/tfidf.rs — TF-IDF term vectors with English stop-word removal
//
// Weighting follows the usual smooth-idf convention: idf = ln((1+n)/(1+df)) + 1,
// raw term counts multiplied by idf, rows L2-normalized.

use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Common English function words dropped before weighting.
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
    "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
    "amongst", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below",
    "beside", "besides", "between", "beyond", "both", "but", "by", "can", "cannot", "could",
    "do", "done", "down", "due", "during", "each", "eg", "either", "else", "elsewhere",
    "enough", "etc", "even", "ever", "every", "everyone", "everything", "everywhere",
    "except", "few", "for", "former", "formerly", "from", "further", "get", "give", "go",
    "had", "has", "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein",
    "hereupon", "hers", "herself", "him", "himself", "his", "how", "however", "ie", "if",
    "in", "inc", "indeed", "into", "is", "it", "its", "itself", "keep", "last", "latter",
    "latterly", "least", "less", "ltd", "made", "many", "may", "me", "meanwhile", "might",
    "more", "moreover", "most", "mostly", "much", "must", "my", "myself", "namely",
    "neither", "never", "nevertheless", "next", "no", "nobody", "none", "noone", "nor",
    "not", "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only",
    "onto", "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over",
    "own", "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem",
    "seemed", "seeming", "seems", "several", "she", "should", "since", "so", "some",
    "somehow", "someone", "something", "sometime", "sometimes", "somewhere", "still",
    "such", "than", "that", "the", "their", "them", "themselves", "then", "thence", "there",
    "thereafter", "thereby", "therefore", "therein", "thereupon", "these", "they", "this",
    "those", "though", "through", "throughout", "thru", "thus", "to", "together", "too",
    "toward", "towards", "under", "until", "up", "upon", "us", "very", "via", "was", "we",
    "well", "were", "what", "whatever", "when", "whence", "whenever", "where", "whereafter",
    "whereas", "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while",
    "whither", "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within",
    "without", "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

/// Sparse term-weight vector keyed by vocabulary index.
pub type SparseVector = BTreeMap<usize, f64>;

/// Lowercased runs of two or more word characters.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_lowercase)
        .collect()
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.binary_search(&token).is_ok()
}

fn terms(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| !is_stop_word(t))
        .collect()
}

/// Vocabulary and idf weights fitted on a corpus.
#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Fit on `docs` and return the fitted vectorizer with one vector per doc.
    pub fn fit_transform<S: AsRef<str>>(docs: &[S]) -> (Self, Vec<SparseVector>) {
        let tokenized: Vec<Vec<String>> = docs.iter().map(|d| terms(d.as_ref())).collect();

        let vocab_terms: BTreeSet<&str> = tokenized
            .iter()
            .flat_map(|toks| toks.iter().map(String::as_str))
            .collect();
        let vocabulary: BTreeMap<String, usize> = vocab_terms
            .into_iter()
            .enumerate()
            .map(|(i, t)| (t.to_string(), i))
            .collect();

        let mut df = vec![0usize; vocabulary.len()];
        for toks in &tokenized {
            let seen: BTreeSet<usize> = toks.iter().filter_map(|t| vocabulary.get(t)).copied().collect();
            for i in seen {
                df[i] += 1;
            }
        }

        let n = docs.len() as f64;
        let idf = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        let vectorizer = Self { vocabulary, idf };
        if vectorizer.vocabulary.is_empty() {
            tracing::warn!(docs = docs.len(), "TF-IDF vocabulary is empty; all vectors are zero");
        }
        let vectors = tokenized.iter().map(|t| vectorizer.weigh(t)).collect();
        (vectorizer, vectors)
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    fn weigh(&self, tokens: &[String]) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for t in tokens {
            if let Some(&i) = self.vocabulary.get(t) {
                *counts.entry(i).or_insert(0.0) += 1.0;
            }
        }
        let mut v: SparseVector = counts
            .into_iter()
            .map(|(i, tf)| (i, tf * self.idf[i]))
            .collect();
        let norm = v.values().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for x in v.values_mut() {
                *x /= norm;
            }
        }
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::similarity::sparse_cosine;

    #[test]
    fn test_stop_words_sorted_for_binary_search() {
        assert!(STOP_WORDS.windows(2).all(|w| w[0] < w[1]));
        assert!(is_stop_word("the"));
        assert!(!is_stop_word("watch"));
    }

    #[test]
    fn test_tokenize_drops_single_chars() {
        assert_eq!(tokenize("A USB-C hub, 4K"), vec!["usb", "hub", "4k"]);
    }

    #[test]
    fn test_rows_are_unit_length() {
        let (_, vecs) = TfidfVectorizer::fit_transform(&["running shoes", "red running shoes"]);
        for v in &vecs {
            let norm: f64 = v.values().map(|x| x * x).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rare_terms_weigh_more() {
        let docs = ["red shoes", "blue shoes", "green shoes"];
        let (tf, vecs) = TfidfVectorizer::fit_transform(&docs);
        let red = tf.vocabulary["red"];
        let shoes = tf.vocabulary["shoes"];
        assert!(vecs[0][&red] > vecs[0][&shoes]);
    }

    #[test]
    fn test_stop_words_removed() {
        let (tf, _) = TfidfVectorizer::fit_transform(&["the watch of the year"]);
        assert_eq!(tf.vocabulary_len(), 2);
    }

    #[test]
    fn test_empty_vocabulary_gives_zero_vectors() {
        let (tf, vecs) = TfidfVectorizer::fit_transform(&["the and", "of"]);
        assert_eq!(tf.vocabulary_len(), 0);
        assert!(vecs.iter().all(|v| v.is_empty()));
    }

    #[test]
    fn test_similar_texts_score_higher() {
        let (_, v) = TfidfVectorizer::fit_transform(&[
            "Galaxy Phone Samsung Phones",
            "iPhone Apple Phones",
            "Banana Slicer Kitchen",
        ]);
        assert!(sparse_cosine(&v[0], &v[1]) > sparse_cosine(&v[0], &v[2]));
        assert_eq!(sparse_cosine(&v[0], &v[2]), 0.0);
    }
}
