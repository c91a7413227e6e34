//! Deterministic stand-in analyses
//!
//! These produce well-formed results of every kind so the web app can be
//! exercised without a model backend. None of them is a real analysis.

use rephrase_core::{
    AnalysisOptions, DetectionResult, PlagiarismMatch, PlagiarismResult, ResearchResult,
};

/// Phrases treated as machine-writing tells by the detection fixture
const TELL_PHRASES: &[&str] = &[
    "delve",
    "furthermore",
    "moreover",
    "additionally",
    "in conclusion",
    "it is important to note",
    "tapestry",
    "ever-evolving",
    "plays a crucial role",
];

/// Wordy phrasing replaced by the rewrite fixture
const PLAIN_WORDING: &[(&str, &str)] = &[
    ("in order to", "to"),
    ("utilize", "use"),
    ("utilise", "use"),
    ("furthermore", "also"),
    ("moreover", "also"),
    ("however", "but"),
    ("therefore", "so"),
];

/// Known passages for the plagiarism fixture
const KNOWN_PASSAGES: &[(&str, &str)] = &[
    (
        "to be, or not to be",
        "https://www.gutenberg.org/ebooks/1524",
    ),
    (
        "it was the best of times, it was the worst of times",
        "https://www.gutenberg.org/ebooks/98",
    ),
    (
        "call me ishmael",
        "https://www.gutenberg.org/ebooks/2701",
    ),
    (
        "the quick brown fox jumps over the lazy dog",
        "Typing exercise (traditional)",
    ),
];

/// Split `text` into trimmed sentences, each a substring of `text`.
pub fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let end = i + c.len_utf8();
        if text[end..].chars().next().map_or(true, char::is_whitespace) {
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                out.push(sentence);
            }
            start = end;
        }
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        out.push(tail);
    }
    out
}

/// Replace wordy phrasing, leaving frozen terms alone. Paragraph breaks are
/// kept; runs of spaces inside a paragraph collapse.
pub fn rewrite(text: &str, options: &AnalysisOptions) -> String {
    let frozen: Vec<String> = options
        .frozen_terms()
        .into_iter()
        .map(str::to_lowercase)
        .collect();

    text.replace("\r\n", "\n")
        .split("\n\n")
        .map(|paragraph| {
            let mut out = paragraph.split_whitespace().collect::<Vec<_>>().join(" ");
            for (wordy, plain) in PLAIN_WORDING {
                if frozen.iter().any(|term| term == wordy) {
                    continue;
                }
                out = replace_ignore_case(&out, wordy, plain);
            }
            out
        })
        .filter(|paragraph| !paragraph.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn replace_ignore_case(haystack: &str, needle: &str, replacement: &str) -> String {
    let lower = haystack.to_lowercase();
    // Lowercasing can change byte offsets outside ASCII.
    if lower.len() != haystack.len() {
        return haystack.to_string();
    }
    let mut out = String::with_capacity(haystack.len());
    let mut last = 0;
    for (start, _) in lower.match_indices(needle) {
        if start < last {
            continue;
        }
        out.push_str(&haystack[last..start]);
        out.push_str(replacement);
        last = start + needle.len();
    }
    out.push_str(&haystack[last..]);
    out
}

/// Score the share of sentences containing a tell phrase.
pub fn detect(text: &str) -> DetectionResult {
    let all = sentences(text);
    let flagged: Vec<String> = all
        .iter()
        .filter(|sentence| {
            let lower = sentence.to_lowercase();
            TELL_PHRASES.iter().any(|tell| lower.contains(tell))
        })
        .map(|sentence| sentence.to_string())
        .collect();

    let overall_score = if all.is_empty() {
        0.0
    } else {
        (flagged.len() as f64 / all.len() as f64 * 100.0).round()
    };

    let analysis = match flagged.len() {
        0 => "No sentences use common machine-writing phrasing.".to_string(),
        1 => format!("1 of {} sentences uses common machine-writing phrasing.", all.len()),
        n => format!("{} of {} sentences use common machine-writing phrasing.", n, all.len()),
    };

    DetectionResult {
        overall_score,
        analysis,
        flagged_spans: flagged,
    }
}

/// Look for known passages, case-insensitively.
pub fn plagiarism(text: &str) -> PlagiarismResult {
    let lower = text.to_lowercase();
    let matches: Vec<PlagiarismMatch> = KNOWN_PASSAGES
        .iter()
        .filter(|(passage, _)| lower.contains(passage))
        .map(|(passage, source)| PlagiarismMatch {
            matching_text: passage.to_string(),
            potential_source: source.to_string(),
            confidence: Some(0.95),
        })
        .collect();

    if matches.is_empty() {
        PlagiarismResult {
            is_similarity_found: false,
            overall_confidence: Some(0.9),
            matches,
        }
    } else {
        PlagiarismResult {
            is_similarity_found: true,
            overall_confidence: Some(0.95),
            matches,
        }
    }
}

/// Template report for `topic`.
pub fn research(topic: &str) -> ResearchResult {
    let topic = topic.split_whitespace().collect::<Vec<_>>().join(" ");
    ResearchResult {
        executive_summary: format!(
            "{} is summarised here from fixture data. Connect a model backend for real research.",
            topic
        ),
        historical_context: format!("Interest in {} has grown steadily over time.", topic),
        core_concepts: vec![
            format!("Definition of {}", topic),
            format!("Key terminology around {}", topic),
        ],
        controversies_and_critiques: vec![format!("Competing interpretations of {}", topic)],
        practical_applications: vec![format!("Applying {} in everyday work", topic)],
        topic,
    }
}
