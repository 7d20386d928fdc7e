//! Sentence segmentation (spec.md §4.6 step 4): split on `. ! ?` followed
//! by whitespace, mirroring the Python prototype's
//! `re.split(r"(?<=[.!?])\s+", text)` as a hand-rolled character scan
//! rather than a `regex` dependency — the grammar is a single
//! left-to-right pass, matching this workspace's avoidance of `regex`
//! where a scanner suffices (see `search-retrieve::query`).
//!
//! The terminator stays attached to the segment that precedes it; the
//! whitespace run that triggered the split is consumed as a separator, not
//! emitted. A terminator with no trailing whitespace (e.g. the `.` in
//! `3.14`) does not split — this is the "round-trip terminator-free
//! segments unchanged" guarantee spec.md admits as the minimum bar for a
//! naive splitter.

pub fn segment(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        current.push(c);

        let is_terminator = matches!(c, '.' | '!' | '?');
        let followed_by_whitespace = i + 1 < chars.len() && chars[i + 1].is_whitespace();

        if is_terminator && followed_by_whitespace {
            push_trimmed(&mut segments, &current);
            current.clear();
            i += 1;
            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
            }
            continue;
        }

        i += 1;
    }

    push_trimmed(&mut segments, &current);
    segments
}

fn push_trimmed(segments: &mut Vec<String>, current: &str) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        segments.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_terminator_plus_whitespace() {
        let segments = segment("Apple is a fruit. Cars are fast.");
        assert_eq!(segments, vec!["Apple is a fruit.", "Cars are fast."]);
    }

    #[test]
    fn preserves_decimal_without_trailing_whitespace() {
        let segments = segment("Pi is roughly 3.14 in most classrooms.");
        assert_eq!(segments, vec!["Pi is roughly 3.14 in most classrooms."]);
    }

    #[test]
    fn handles_mixed_terminators() {
        let segments = segment("Is this real? Yes! It is.");
        assert_eq!(segments, vec!["Is this real?", "Yes!", "It is."]);
    }

    #[test]
    fn terminator_free_text_round_trips() {
        let segments = segment("no terminators here");
        assert_eq!(segments, vec!["no terminators here"]);
    }

    #[test]
    fn empty_text_yields_no_segments() {
        assert!(segment("").is_empty());
        assert!(segment("   ").is_empty());
    }
}
