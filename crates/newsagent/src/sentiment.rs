//! Lexicon-based sentiment scoring
//!
//! Polarity lies in [-1, 1] and subjectivity in [0, 1]. A text's score is the
//! mean over the sentiment-bearing words it contains; a batch of articles is
//! summarized by the mean of the per-article scores, with a confidence derived
//! from how much the articles disagree.

use crate::models::Article;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Polarity above this is Positive, below its negation Negative
const LABEL_THRESHOLD: f64 = 0.1;

/// Multiplier applied to a word following a negation
const NEGATION_FACTOR: f64 = -0.5;

/// Tokens a negation stays pending for
const NEGATION_WINDOW: usize = 3;

/// Overall direction of a text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Classify a polarity; the thresholds themselves are Neutral
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > LABEL_THRESHOLD {
            Self::Positive
        } else if polarity < -LABEL_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        };
        f.write_str(s)
    }
}

/// Agreement between the scored texts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Map the standard deviation of per-text polarity to a confidence level
    pub fn from_std_dev(std_dev: f64) -> Self {
        if std_dev < 0.3 {
            Self::High
        } else if std_dev < 0.5 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        };
        f.write_str(s)
    }
}

/// Raw score of one text
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TextScore {
    pub polarity: f64,
    pub subjectivity: f64,
}

/// Sentiment of one text or a batch of texts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub polarity: f64,
    pub subjectivity: f64,
    pub confidence: Confidence,
    pub sample_size: usize,
}

impl SentimentResult {
    /// Combine per-text scores; `None` for an empty batch
    pub fn aggregate(scores: &[TextScore]) -> Option<Self> {
        if scores.is_empty() {
            return None;
        }

        #[allow(clippy::cast_precision_loss)]
        let n = scores.len() as f64;
        let polarity = scores.iter().map(|s| s.polarity).sum::<f64>() / n;
        let subjectivity = scores.iter().map(|s| s.subjectivity).sum::<f64>() / n;
        let variance = scores
            .iter()
            .map(|s| (s.polarity - polarity).powi(2))
            .sum::<f64>()
            / n;

        Some(Self {
            label: SentimentLabel::from_polarity(polarity),
            polarity,
            subjectivity,
            confidence: Confidence::from_std_dev(variance.sqrt()),
            sample_size: scores.len(),
        })
    }

    /// Multi-line report shown to the user
    pub fn format(&self) -> String {
        format!(
            "Overall Sentiment: {}\nPolarity Score: {:.2}\nSubjectivity Score: {:.2}\nConfidence: {}\nAnalyzed {} article(s)",
            self.label, self.polarity, self.subjectivity, self.confidence, self.sample_size
        )
    }
}

/// Scores free text for sentiment
pub trait SentimentScorer: Send + Sync {
    /// Raw polarity and subjectivity of `text`
    fn score_text(&self, text: &str) -> TextScore;

    /// Sentiment of a single text
    fn score(&self, text: &str) -> SentimentResult {
        let score = self.score_text(text);
        SentimentResult {
            label: SentimentLabel::from_polarity(score.polarity),
            polarity: score.polarity,
            subjectivity: score.subjectivity,
            confidence: Confidence::High,
            sample_size: 1,
        }
    }

    /// Sentiment of one article, scored on [`Article::sentiment_text`]
    fn score_article(&self, article: &Article) -> SentimentResult {
        self.score(article.sentiment_text())
    }

    /// Aggregate sentiment over article bodies; `None` when there are no articles
    ///
    /// Articles without content are scored on their title.
    fn score_articles(&self, articles: &[Article]) -> Option<SentimentResult> {
        let scores: Vec<TextScore> = articles
            .iter()
            .map(|a| self.score_text(a.sentiment_text()))
            .collect();
        SentimentResult::aggregate(&scores)
    }
}

/// (polarity, subjectivity) of sentiment-bearing words
const LEXICON: &[(&str, f64, f64)] = &[
    // General
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("excellent", 1.0, 1.0),
    ("amazing", 0.6, 0.9),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("positive", 0.23, 0.55),
    ("strong", 0.43, 0.73),
    ("optimistic", 0.5, 0.6),
    ("confident", 0.5, 0.67),
    ("success", 0.5, 0.5),
    ("successful", 0.75, 0.95),
    ("happy", 0.8, 1.0),
    ("hope", 0.3, 0.5),
    ("safe", 0.5, 0.5),
    ("secure", 0.4, 0.6),
    ("bad", -0.7, 0.67),
    ("worse", -0.4, 0.6),
    ("worst", -1.0, 1.0),
    ("terrible", -1.0, 1.0),
    ("poor", -0.4, 0.6),
    ("negative", -0.3, 0.4),
    ("weak", -0.375, 0.625),
    ("pessimistic", -0.5, 0.6),
    ("fear", -0.5, 0.6),
    ("worry", -0.4, 0.6),
    ("concern", -0.3, 0.5),
    ("uncertain", -0.2, 0.6),
    ("uncertainty", -0.2, 0.6),
    ("risk", -0.2, 0.4),
    ("risky", -0.4, 0.6),
    ("volatile", -0.2, 0.5),
    ("dangerous", -0.6, 0.9),
    ("fail", -0.5, 0.3),
    ("failure", -0.5, 0.3),
    ("loss", -0.4, 0.3),
    ("panic", -0.6, 0.7),
    // Market and crypto
    ("bullish", 0.6, 0.7),
    ("bearish", -0.6, 0.7),
    ("rally", 0.5, 0.4),
    ("surge", 0.5, 0.4),
    ("soar", 0.6, 0.5),
    ("gain", 0.3, 0.3),
    ("growth", 0.3, 0.3),
    ("record", 0.3, 0.3),
    ("high", 0.16, 0.54),
    ("rise", 0.2, 0.3),
    ("boost", 0.4, 0.4),
    ("profit", 0.4, 0.3),
    ("adoption", 0.4, 0.3),
    ("approval", 0.4, 0.4),
    ("approve", 0.4, 0.4),
    ("breakthrough", 0.5, 0.5),
    ("recover", 0.3, 0.4),
    ("recovery", 0.3, 0.4),
    ("crash", -0.7, 0.6),
    ("plunge", -0.6, 0.5),
    ("slump", -0.5, 0.4),
    ("tumble", -0.5, 0.4),
    ("drop", -0.3, 0.3),
    ("decline", -0.4, 0.3),
    ("fall", -0.3, 0.3),
    ("low", -0.1, 0.3),
    ("sell-off", -0.5, 0.4),
    ("selloff", -0.5, 0.4),
    ("hack", -0.7, 0.5),
    ("exploit", -0.6, 0.5),
    ("scam", -0.8, 0.8),
    ("fraud", -0.8, 0.7),
    ("ban", -0.5, 0.4),
    ("crackdown", -0.5, 0.5),
    ("lawsuit", -0.4, 0.3),
    ("bankruptcy", -0.7, 0.4),
    ("liquidation", -0.5, 0.4),
];

/// Words scaling the next sentiment word
const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("extremely", 1.5),
    ("highly", 1.3),
    ("incredibly", 1.5),
    ("slightly", 0.5),
    ("somewhat", 0.7),
];

const NEGATIONS: &[&str] = &["not", "no", "never", "without", "hardly"];

/// Word-lexicon scorer with negation and intensifier handling
pub struct LexiconScorer {
    lexicon: HashMap<&'static str, (f64, f64)>,
    intensifiers: HashMap<&'static str, f64>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    /// Scorer over the built-in lexicon
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON.iter().map(|&(w, p, s)| (w, (p, s))).collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        }
    }

    /// Look a word up, retrying with common inflections removed
    fn lookup(&self, word: &str) -> Option<(f64, f64)> {
        if let Some(&entry) = self.lexicon.get(word) {
            return Some(entry);
        }
        ["s", "es", "ed", "d", "ing"]
            .iter()
            .filter_map(|suffix| word.strip_suffix(suffix))
            .find_map(|stem| self.lexicon.get(stem).copied())
    }
}

fn is_negation(token: &str) -> bool {
    NEGATIONS.contains(&token) || token.ends_with("n't")
}

impl SentimentScorer for LexiconScorer {
    fn score_text(&self, text: &str) -> TextScore {
        let lower = text.to_lowercase();
        let tokens = lower
            .split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '-'))
            .map(|t| t.trim_matches(|c: char| c == '\'' || c == '-'))
            .filter(|t| !t.is_empty());

        let mut hits: Vec<(f64, f64)> = Vec::new();
        let mut negation_left = 0usize;
        let mut intensity = 1.0;

        for token in tokens {
            if is_negation(token) {
                negation_left = NEGATION_WINDOW;
                continue;
            }
            if let Some(&factor) = self.intensifiers.get(token) {
                intensity = factor;
                continue;
            }

            match self.lookup(token) {
                Some((polarity, subjectivity)) => {
                    let mut polarity = polarity * intensity;
                    if negation_left > 0 {
                        polarity *= NEGATION_FACTOR;
                    }
                    hits.push((polarity.clamp(-1.0, 1.0), (subjectivity * intensity).min(1.0)));
                    negation_left = 0;
                    intensity = 1.0;
                }
                None => {
                    negation_left = negation_left.saturating_sub(1);
                }
            }
        }

        if hits.is_empty() {
            return TextScore::default();
        }

        #[allow(clippy::cast_precision_loss)]
        let n = hits.len() as f64;
        TextScore {
            polarity: hits.iter().map(|h| h.0).sum::<f64>() / n,
            subjectivity: hits.iter().map(|h| h.1).sum::<f64>() / n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_label_boundaries_are_neutral() {
        assert_eq!(SentimentLabel::from_polarity(0.1), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_polarity(-0.1), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_polarity(0.0), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_polarity(0.1001), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_polarity(-0.1001), SentimentLabel::Negative);
    }

    #[test]
    fn test_confidence_thresholds() {
        assert_eq!(Confidence::from_std_dev(0.0), Confidence::High);
        assert_eq!(Confidence::from_std_dev(0.29), Confidence::High);
        assert_eq!(Confidence::from_std_dev(0.3), Confidence::Medium);
        assert_eq!(Confidence::from_std_dev(0.49), Confidence::Medium);
        assert_eq!(Confidence::from_std_dev(0.5), Confidence::Low);
        assert_eq!(Confidence::from_std_dev(2.0), Confidence::Low);
    }

    #[test]
    fn test_aggregate() {
        assert!(SentimentResult::aggregate(&[]).is_none());

        let scores = [
            TextScore { polarity: 0.6, subjectivity: 0.4 },
            TextScore { polarity: -0.6, subjectivity: 0.8 },
        ];
        let result = SentimentResult::aggregate(&scores).unwrap();
        assert!(approx(result.polarity, 0.0));
        assert!(approx(result.subjectivity, 0.6));
        assert_eq!(result.label, SentimentLabel::Neutral);
        // std dev 0.6
        assert_eq!(result.confidence, Confidence::Low);
        assert_eq!(result.sample_size, 2);
    }

    #[test]
    fn test_format() {
        let result = SentimentResult {
            label: SentimentLabel::Positive,
            polarity: 0.256,
            subjectivity: 0.5,
            confidence: Confidence::High,
            sample_size: 3,
        };
        assert_eq!(
            result.format(),
            "Overall Sentiment: Positive\nPolarity Score: 0.26\nSubjectivity Score: 0.50\nConfidence: High\nAnalyzed 3 article(s)"
        );
    }

    #[test]
    fn test_lexicon_scoring() {
        let scorer = LexiconScorer::new();

        let score = scorer.score_text("Bitcoin had a great week");
        assert!(approx(score.polarity, 0.8));

        let score = scorer.score_text("This is not good for Ethereum.");
        assert!(approx(score.polarity, -0.35));

        let score = scorer.score_text("The exchange published its quarterly report.");
        assert_eq!(score, TextScore::default());

        assert_eq!(
            scorer.score("Markets crash after exchange hack").label,
            SentimentLabel::Negative
        );
        assert_eq!(scorer.score("Bullish rally continues").label, SentimentLabel::Positive);
    }

    #[test]
    fn test_inflections_and_intensifiers() {
        let scorer = LexiconScorer::new();
        assert!(approx(scorer.score_text("prices surged").polarity, 0.5));
        assert!(approx(scorer.score_text("very good").polarity, 0.91));
        assert!(scorer.score_text("isn't bullish").polarity < 0.0);
    }

    #[test]
    fn test_score_articles() {
        let scorer = LexiconScorer::new();
        assert!(scorer.score_articles(&[]).is_none());

        let articles = vec![
            Article::new(Some("t".into()), Some("Great gains".into()), None, None),
            Article::new(Some("Bitcoin is good".into()), None, None, None),
        ];
        let result = scorer.score_articles(&articles).unwrap();
        assert_eq!(result.sample_size, 2);
        assert_eq!(result.label, SentimentLabel::Positive);
    }

    #[test]
    fn test_article_score_matches_aggregate() {
        let scorer = LexiconScorer::new();
        // headline and body disagree; the body decides
        let article = Article::new(
            Some("Exchange hack".into()),
            Some("Great rally for Bitcoin".into()),
            None,
            None,
        );

        let single = scorer.score_article(&article);
        let batch = scorer.score_articles(std::slice::from_ref(&article)).unwrap();
        assert_eq!(single.label, SentimentLabel::Positive);
        assert_eq!(single.label, batch.label);
        assert!(approx(single.polarity, batch.polarity));
    }
}
