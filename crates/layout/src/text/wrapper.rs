use crate::fonts::{FontMetrics, FontVariant};

/// One wrapped line and its measured width in millimetres.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLine {
    pub text: String,
    pub width: f32,
}

/// Greedy word wrap of `text` against `max_width`.
///
/// Words are separated by spaces and `\n` forces a break. Words accumulate
/// while the measured line stays within `max_width`; the word that overflows
/// starts the next line. A word wider than `max_width` on its own occupies a
/// line by itself and is never hyphenated. Text without words yields no lines.
pub fn wrap_text(
    text: &str,
    max_width: f32,
    metrics: &dyn FontMetrics,
    variant: FontVariant,
    size_pt: f32,
) -> Vec<WrappedLine> {
    let mut lines = Vec::new();
    let measure = |s: &str| metrics.text_width(s, variant, size_pt);

    for segment in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0.0;

        for word in segment.split([' ', '\r']).filter(|w| !w.is_empty()) {
            if current.is_empty() {
                current.push_str(word);
                current_width = measure(&current);
                continue;
            }

            let candidate = format!("{current} {word}");
            let candidate_width = measure(&candidate);
            if candidate_width <= max_width {
                current = candidate;
                current_width = candidate_width;
            } else {
                lines.push(WrappedLine {
                    text: std::mem::take(&mut current),
                    width: current_width,
                });
                current.push_str(word);
                current_width = measure(&current);
            }
        }

        if !current.is_empty() {
            lines.push(WrappedLine {
                text: current,
                width: current_width,
            });
        }
    }
    lines
}
