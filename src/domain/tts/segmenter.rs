//! Byte-budget text segmentation.
//!
//! Text is split into contiguous slices whose UTF-8 length fits a provider's
//! per-request limit. Boundaries are searched rank by rank: sentence
//! terminators first, clause separators for sentences that are still too
//! long, and finally a hard cut on a character boundary.

/// Google Cloud TTS rejects requests whose input exceeds 5000 bytes
pub const MAX_TTS_BYTES: usize = 5000;

const SENTENCE_DELIMITERS: &[char] = &['。', '！', '？', '!', '?', '.', '\n'];
const CLAUSE_DELIMITERS: &[char] = &['、', '，', ',', '；', ';'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BreakRank {
    Sentence,
    Clause,
    Hard,
}

impl BreakRank {
    fn delimiters(self) -> &'static [char] {
        match self {
            BreakRank::Sentence => SENTENCE_DELIMITERS,
            BreakRank::Clause => CLAUSE_DELIMITERS,
            BreakRank::Hard => &[],
        }
    }

    /// Characters that extend a run of delimiters instead of following a break
    fn continues_run(self, ch: char) -> bool {
        self.delimiters().contains(&ch) || SENTENCE_DELIMITERS.contains(&ch)
    }

    fn next(self) -> Option<BreakRank> {
        match self {
            BreakRank::Sentence => Some(BreakRank::Clause),
            BreakRank::Clause => Some(BreakRank::Hard),
            BreakRank::Hard => None,
        }
    }
}

/// Split `text` into ordered chunks of at most `max_bytes` UTF-8 bytes.
///
/// The chunks borrow from `text` and concatenate back to it exactly. Empty
/// input yields no chunks.
pub fn split_text(text: &str, max_bytes: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    segment(text, max_bytes, BreakRank::Sentence, &mut chunks);
    chunks
}

fn segment<'a>(text: &'a str, max_bytes: usize, rank: BreakRank, chunks: &mut Vec<&'a str>) {
    let packed = match rank {
        BreakRank::Hard => hard_cut(text, max_bytes),
        _ => pack_units(text, max_bytes, rank),
    };

    for piece in packed {
        match rank.next() {
            Some(next) if piece.len() > max_bytes => segment(piece, max_bytes, next, chunks),
            _ => chunks.push(piece),
        }
    }
}

/// Byte offsets just past each break of the given rank, plus the end of text.
///
/// A run of consecutive delimiters counts as a single break, so terminators
/// such as "！？" or "、。" stay with the text they close.
fn unit_ends(text: &str, rank: BreakRank) -> Vec<usize> {
    let delimiters = rank.delimiters();
    let mut ends = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((index, ch)) = chars.next() {
        if !delimiters.contains(&ch) {
            continue;
        }
        let run_continues = chars
            .peek()
            .map(|(_, next)| rank.continues_run(*next))
            .unwrap_or(false);
        if !run_continues {
            ends.push(index + ch.len_utf8());
        }
    }

    if ends.last() != Some(&text.len()) {
        ends.push(text.len());
    }
    ends
}

/// Greedily pack the rank's units into chunks no larger than `max_bytes`.
///
/// A unit that alone exceeds the budget is emitted as its own chunk for the
/// next rank to handle.
fn pack_units(text: &str, max_bytes: usize, rank: BreakRank) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut end = 0;

    for unit_end in unit_ends(text, rank) {
        if unit_end - start > max_bytes && end > start {
            chunks.push(&text[start..end]);
            start = end;
        }
        end = unit_end;
    }

    if end > start {
        chunks.push(&text[start..end]);
    }
    chunks
}

/// Cut at the largest character boundary that fits `max_bytes`.
///
/// Always advances by at least one character, so a budget smaller than a
/// single character yields one oversized chunk per character.
fn hard_cut(text: &str, max_bytes: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let mut cut = max_bytes.min(rest.len());
        while cut > 0 && !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        if cut == 0 {
            cut = rest.chars().next().map(char::len_utf8).unwrap_or(rest.len());
        }
        let (head, tail) = rest.split_at(cut);
        chunks.push(head);
        rest = tail;
    }

    chunks
}
