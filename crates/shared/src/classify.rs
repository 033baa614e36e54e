/// Outcome of the length check on a synthesized episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Good,
    Bad,
}

/// What one headline produced, as measured by synthesis.
#[derive(Debug, Clone)]
pub struct EpisodeResult {
    pub title: String,
    pub word_count: usize,
    pub duration_seconds: f64,
}

/// Good requires both thresholds: enough words and enough audio.
pub fn classify(
    word_count: usize,
    duration_seconds: f64,
    min_words: usize,
    min_duration_secs: f64,
) -> Verdict {
    if word_count >= min_words && duration_seconds >= min_duration_secs {
        Verdict::Good
    } else {
        Verdict::Bad
    }
}

/// The good result with the highest word count gets the cover art. Ties keep
/// the earliest result, so selection is deterministic for a fixed input order.
pub fn select_cover_subject<'a>(
    results: &'a [EpisodeResult],
    min_words: usize,
    min_duration_secs: f64,
) -> Option<&'a EpisodeResult> {
    results
        .iter()
        .filter(|r| {
            classify(r.word_count, r.duration_seconds, min_words, min_duration_secs)
                == Verdict::Good
        })
        .fold(None, |best: Option<&EpisodeResult>, candidate| match best {
            Some(current) if candidate.word_count > current.word_count => Some(candidate),
            Some(current) => Some(current),
            None => Some(candidate),
        })
}
