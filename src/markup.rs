use core::fmt;

use smallvec::SmallVec;

/// Inline marker forms recognized by the scanner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Marker {
    /// `**text**`
    Strong,
    /// `*text*`
    Emphasis,
    /// `_text_`
    Underline,
}

impl Marker {
    fn len(self) -> usize {
        match self {
            Self::Strong => 2,
            Self::Emphasis | Self::Underline => 1,
        }
    }

    fn style(self) -> StyleFlags {
        match self {
            Self::Strong => StyleFlags::BOLD,
            Self::Emphasis => StyleFlags::ITALIC,
            Self::Underline => StyleFlags::UNDERLINE,
        }
    }
}

/// Independent presentation flags carried by a run or fragment.
///
/// Underline combines freely with bold and italic even though the marker
/// grammar only produces one flag per run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyleFlags {
    /// Bold weight.
    pub bold: bool,
    /// Italic slant.
    pub italic: bool,
    /// Underline decoration.
    pub underline: bool,
}

impl StyleFlags {
    /// No flags set.
    pub const PLAIN: Self = Self {
        bold: false,
        italic: false,
        underline: false,
    };
    /// Bold only.
    pub const BOLD: Self = Self {
        bold: true,
        italic: false,
        underline: false,
    };
    /// Italic only.
    pub const ITALIC: Self = Self {
        bold: false,
        italic: true,
        underline: false,
    };
    /// Underline only.
    pub const UNDERLINE: Self = Self {
        bold: false,
        italic: false,
        underline: true,
    };

    /// Combine two flag sets.
    pub const fn union(self, other: Self) -> Self {
        Self {
            bold: self.bold || other.bold,
            italic: self.italic || other.italic,
            underline: self.underline || other.underline,
        }
    }

    /// True when no flag is set.
    pub const fn is_plain(self) -> bool {
        !self.bold && !self.italic && !self.underline
    }

    /// Face variant used for font selection.
    pub const fn kind(self) -> StyleKind {
        match (self.bold, self.italic) {
            (true, true) => StyleKind::BoldItalic,
            (true, false) => StyleKind::Bold,
            (false, true) => StyleKind::Italic,
            (false, false) if self.underline => StyleKind::Underline,
            (false, false) => StyleKind::Normal,
        }
    }
}

/// Presentation variant derived from [`StyleFlags`].
///
/// This is a lossy view: `Bold` may still carry an underline. Renderers that
/// decorate text must consult the flags, not the kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StyleKind {
    Normal,
    Bold,
    Italic,
    BoldItalic,
    Underline,
}

impl StyleKind {
    /// Name matching the usual PDF/CSS face naming.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal | Self::Underline => "normal",
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::BoldItalic => "bolditalic",
        }
    }
}

impl fmt::Display for StyleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maximal span of line text sharing one style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StyledRun<'a> {
    /// Run text with markers stripped.
    pub text: &'a str,
    /// Style flags for the whole run.
    pub style: StyleFlags,
}

impl<'a> StyledRun<'a> {
    /// Unstyled run.
    pub const fn plain(text: &'a str) -> Self {
        Self {
            text,
            style: StyleFlags::PLAIN,
        }
    }

    /// Run with explicit style.
    pub const fn styled(text: &'a str, style: StyleFlags) -> Self {
        Self { text, style }
    }
}

/// Runs produced for a single line.
pub type RunList<'a> = SmallVec<[StyledRun<'a>; 4]>;

/// Tokenize one line into styled runs.
///
/// Never fails: unmatched markers stay in the output as literal text. An
/// empty line yields no runs.
pub fn tokenize(line: &str) -> RunList<'_> {
    MarkupScanner::new(line).collect()
}

/// Single-pass, left-to-right inline marker scanner.
///
/// At each position the two-character `**` marker is attempted before the
/// one-character forms, so `**bold**` never splits into two italic matches.
/// Matches do not nest: marker characters inside a matched span are kept as
/// text.
#[derive(Clone, Debug)]
pub struct MarkupScanner<'a> {
    line: &'a str,
    pos: usize,
    plain_start: usize,
    queued: Option<StyledRun<'a>>,
}

impl<'a> MarkupScanner<'a> {
    /// Create a scanner over one line.
    pub fn new(line: &'a str) -> Self {
        Self {
            line,
            pos: 0,
            plain_start: 0,
            queued: None,
        }
    }

    /// Returns the marker at `at` and the byte offset where its content ends.
    fn match_at(&self, at: usize) -> Option<(Marker, usize)> {
        let bytes = self.line.as_bytes();
        let first = *bytes.get(at)?;
        if first != b'*' && first != b'_' {
            return None;
        }
        // Marker bytes are ASCII, so `at` is a char boundary.
        let rest = &self.line[at..];
        if rest.starts_with("**") {
            if let Some(close) = rest[2..].find("**") {
                return Some((Marker::Strong, at + 2 + close));
            }
        }
        let marker = if first == b'*' {
            Marker::Emphasis
        } else {
            Marker::Underline
        };
        match rest[1..].find(first as char) {
            Some(close) if close > 0 => Some((marker, at + 1 + close)),
            _ => {
                log::trace!(
                    "unmatched '{}' at byte {} kept as literal text",
                    first as char,
                    at
                );
                None
            }
        }
    }
}

impl<'a> Iterator for MarkupScanner<'a> {
    type Item = StyledRun<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(run) = self.queued.take() {
            return Some(run);
        }

        while self.pos < self.line.len() {
            let Some((marker, content_end)) = self.match_at(self.pos) else {
                self.pos += 1;
                continue;
            };

            let open = self.pos;
            let content = &self.line[open + marker.len()..content_end];
            let before = &self.line[self.plain_start..open];
            self.pos = content_end + marker.len();
            self.plain_start = self.pos;

            let styled = (!content.is_empty()).then(|| StyledRun::styled(content, marker.style()));
            if !before.is_empty() {
                self.queued = styled;
                return Some(StyledRun::plain(before));
            }
            if styled.is_some() {
                return styled;
            }
        }

        if self.plain_start < self.line.len() {
            let tail = &self.line[self.plain_start..];
            self.plain_start = self.line.len();
            return Some(StyledRun::plain(tail));
        }
        None
    }
}

impl core::iter::FusedIterator for MarkupScanner<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    fn runs(line: &str) -> Vec<(&str, StyleFlags)> {
        tokenize(line).iter().map(|r| (r.text, r.style)).collect()
    }

    #[test]
    fn line_without_markers_is_one_plain_run() {
        let line = "Apply sunscreen every morning, even when cloudy.";
        assert_eq!(runs(line), vec![(line, StyleFlags::PLAIN)]);
    }

    #[test]
    fn strips_all_three_marker_forms() {
        assert_eq!(
            runs("**Bold** and *italic* and _under_"),
            vec![
                ("Bold", StyleFlags::BOLD),
                (" and ", StyleFlags::PLAIN),
                ("italic", StyleFlags::ITALIC),
                (" and ", StyleFlags::PLAIN),
                ("under", StyleFlags::UNDERLINE),
            ]
        );
    }

    #[test]
    fn double_star_is_tried_before_single_star() {
        assert_eq!(runs("**bold**"), vec![("bold", StyleFlags::BOLD)]);
        assert_eq!(
            runs("*a* **b**"),
            vec![
                ("a", StyleFlags::ITALIC),
                (" ", StyleFlags::PLAIN),
                ("b", StyleFlags::BOLD),
            ]
        );
    }

    #[test]
    fn matched_spans_do_not_nest() {
        assert_eq!(
            runs("**use _gentle_ cleanser**"),
            vec![("use _gentle_ cleanser", StyleFlags::BOLD)]
        );
    }

    #[test]
    fn unbalanced_trailing_marker_is_literal() {
        assert_eq!(
            runs("Use SPF 30*"),
            vec![("Use SPF 30*", StyleFlags::PLAIN)]
        );
        assert_eq!(runs("**open"), vec![("**open", StyleFlags::PLAIN)]);
    }

    #[test]
    fn unclosed_double_star_falls_back_to_italic_on_second_star() {
        assert_eq!(
            runs("**note* here"),
            vec![
                ("*", StyleFlags::PLAIN),
                ("note", StyleFlags::ITALIC),
                (" here", StyleFlags::PLAIN),
            ]
        );
        // An empty single-star pair is never matched, so the second star
        // opens the italic run.
        assert_eq!(
            runs("**x*"),
            vec![("*", StyleFlags::PLAIN), ("x", StyleFlags::ITALIC)]
        );
    }

    #[test]
    fn empty_single_marker_pairs_stay_literal() {
        assert_eq!(
            runs("snake__case"),
            vec![("snake__case", StyleFlags::PLAIN)]
        );
    }

    #[test]
    fn empty_line_yields_no_runs() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("****").is_empty());
    }

    #[test]
    fn concatenated_runs_reproduce_line_without_markers() {
        let line = "Step *one*: **cleanse**, then _tone_ with a pH-balanced toner.";
        let joined: String = tokenize(line).iter().map(|r| r.text).collect();
        assert_eq!(
            joined,
            "Step one: cleanse, then tone with a pH-balanced toner."
        );
    }

    #[test]
    fn multibyte_text_around_markers_is_preserved() {
        assert_eq!(
            runs("crème **légère** — ok"),
            vec![
                ("crème ", StyleFlags::PLAIN),
                ("légère", StyleFlags::BOLD),
                (" — ok", StyleFlags::PLAIN),
            ]
        );
    }

    #[test]
    fn style_kind_tracks_face_variant() {
        assert_eq!(StyleFlags::PLAIN.kind(), StyleKind::Normal);
        assert_eq!(StyleFlags::UNDERLINE.kind(), StyleKind::Underline);
        let bold_under = StyleFlags::BOLD.union(StyleFlags::UNDERLINE);
        assert_eq!(bold_under.kind(), StyleKind::Bold);
        assert!(bold_under.underline);
        assert_eq!(
            StyleFlags::BOLD.union(StyleFlags::ITALIC).kind().as_str(),
            "bolditalic"
        );
    }
}
