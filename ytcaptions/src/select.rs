use crate::types::{CaptionTrack, TrackOrigin};

const LANGUAGE_WEIGHT: u32 = 100;
const HUMAN_BONUS: u32 = 10;

/// Rank of a track's language in `preferred`: `N - i` for the first match, 0 for none.
///
/// A code matches exactly (case-insensitive) or as a prefix followed by a
/// regional subtag, so `"en"` matches `"en-GB"` but not `"eng"`.
fn language_rank(lang: &str, preferred: &[String]) -> u32 {
    let lang = lang.to_lowercase();
    let n = preferred.len();
    preferred
        .iter()
        .position(|p| {
            let p = p.to_lowercase();
            lang == p || lang.strip_prefix(&p).is_some_and(|rest| rest.starts_with('-'))
        })
        .map(|i| (n - i) as u32)
        .unwrap_or(0)
}

/// `languageRank * 100 + humanBonus`.
pub fn score(track: &CaptionTrack, preferred: &[String]) -> u32 {
    let bonus = match track.origin() {
        TrackOrigin::Human => HUMAN_BONUS,
        TrackOrigin::AutoGenerated => 0,
    };
    language_rank(track.language(), preferred) * LANGUAGE_WEIGHT + bonus
}

/// Pick the highest-scoring track; on ties the earliest one wins.
pub fn select_best_track<'a>(
    tracks: &'a [CaptionTrack],
    preferred: &[String],
) -> Option<&'a CaptionTrack> {
    let mut best: Option<(&CaptionTrack, u32)> = None;
    for track in tracks {
        let s = score(track, preferred);
        if best.is_none_or(|(_, b)| s > b) {
            best = Some((track, s));
        }
    }
    best.map(|(t, _)| t)
}
