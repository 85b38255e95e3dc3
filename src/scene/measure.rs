//! Approximate text layout for the in-memory scene.
//!
//! Each character advances by a fixed fraction of the font size scaled by its
//! display width; lines break greedily at spaces, and words wider than the
//! box are split across lines. Height grows monotonically with font size at a
//! fixed width.

use unicode_width::UnicodeWidthStr;

/// Layout parameters for a font.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Advance of a single-width character, in ems.
    pub advance: f64,
    /// Line height, in ems.
    pub line_height: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self { advance: 0.5, line_height: 1.2 }
    }
}

impl TextMetrics {
    #[allow(clippy::cast_precision_loss)]
    fn width_of(&self, s: &str, font_size: f64) -> f64 {
        UnicodeWidthStr::width(s) as f64 * self.advance * font_size
    }

    /// Number of lines `text` wraps to at `width`.
    pub fn line_count(&self, text: &str, font_size: f64, width: f64) -> usize {
        let space = self.width_of(" ", font_size);
        let mut lines = 0;

        for paragraph in text.split('\n') {
            let mut used: Option<f64> = None;
            let mut paragraph_lines = 1;

            for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
                let w = self.width_of(word, font_size);
                match used {
                    Some(u) if u + space + w <= width => used = Some(u + space + w),
                    Some(_) => {
                        paragraph_lines += 1;
                        used = Some(self.place_long_word(w, width, &mut paragraph_lines));
                    }
                    None => used = Some(self.place_long_word(w, width, &mut paragraph_lines)),
                }
            }
            lines += paragraph_lines;
        }

        lines
    }

    /// Start a word on a fresh line, spilling onto further lines if it is
    /// wider than the box. Returns the width used on the final line.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::unused_self
    )]
    fn place_long_word(&self, w: f64, width: f64, lines: &mut usize) -> f64 {
        if width <= 0.0 || w <= width {
            return w;
        }
        let extra = (w / width).ceil() as usize - 1;
        *lines += extra;
        w - width * extra as f64
    }

    /// Height of `text` laid out at `width`.
    #[allow(clippy::cast_precision_loss)]
    pub fn height(&self, text: &str, font_size: f64, width: f64) -> f64 {
        self.line_count(text, font_size, width) as f64 * self.line_height * font_size
    }

    /// Width of the widest unwrapped line.
    pub fn natural_width(&self, text: &str, font_size: f64) -> f64 {
        text.split('\n')
            .map(|line| self.width_of(line, font_size))
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_one_line() {
        let m = TextMetrics::default();
        assert_eq!(m.line_count("", 10.0, 100.0), 1);
        assert!((m.height("", 10.0, 100.0) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn wraps_at_spaces() {
        let m = TextMetrics::default();
        // Each char is 5 wide at size 10; "aaaa bbbb" is 45 wide.
        assert_eq!(m.line_count("aaaa bbbb", 10.0, 45.0), 1);
        assert_eq!(m.line_count("aaaa bbbb", 10.0, 44.0), 2);
    }

    #[test]
    fn explicit_newlines_start_lines() {
        let m = TextMetrics::default();
        assert_eq!(m.line_count("a\nb\n\nc", 10.0, 1000.0), 4);
    }

    #[test]
    fn long_words_spill() {
        let m = TextMetrics::default();
        // 20 chars at 5 wide = 100 across a 30 wide box.
        assert_eq!(m.line_count("abcdefghijklmnopqrst", 10.0, 30.0), 4);
    }

    #[test]
    fn height_never_shrinks_as_size_grows() {
        let m = TextMetrics::default();
        let text = "the quick brown fox jumps over the lazy dog again and again";
        let mut last = 0.0;
        for step in 0..200 {
            let size = 8.0 + f64::from(step) * 0.5;
            let h = m.height(text, size, 300.0);
            assert!(h >= last, "height dropped at size {size}");
            last = h;
        }
    }

    #[test]
    fn wide_characters_count_double() {
        let m = TextMetrics::default();
        assert!((m.natural_width("日本", 10.0) - 20.0).abs() < 1e-9);
        assert!((m.natural_width("ab\nabcd", 10.0) - 20.0).abs() < 1e-9);
    }
}
