use core::fmt;

/// Line-level classification computed once per source line.
///
/// Drives font size and color in every renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineClass {
    /// Numbered heading such as `2. **Evening Routine**`.
    SectionHeader,
    /// Line carrying at least one marker character.
    InlineEmphasis,
    /// Unmarked body text.
    Plain,
    /// Empty or whitespace-only line.
    Blank,
}

impl LineClass {
    /// Stable lowercase name, used for CSS classes and debug output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SectionHeader => "section-header",
            Self::InlineEmphasis => "inline-emphasis",
            Self::Plain => "plain",
            Self::Blank => "blank",
        }
    }

    /// True when the line carries no text.
    pub const fn is_blank(self) -> bool {
        matches!(self, Self::Blank)
    }
}

impl fmt::Display for LineClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify one source line.
///
/// Surrounding whitespace is ignored. Header detection runs before
/// tokenization and only looks at the line prefix.
pub fn classify_line(line: &str) -> LineClass {
    let line = line.trim();
    if line.is_empty() {
        LineClass::Blank
    } else if is_section_header(line) {
        LineClass::SectionHeader
    } else if line.contains(['*', '_']) {
        LineClass::InlineEmphasis
    } else {
        LineClass::Plain
    }
}

/// Whether `line` starts with digits, a period, optional whitespace and `**`.
pub fn is_section_header(line: &str) -> bool {
    let line = line.trim_start();
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return false;
    }
    let Some(rest) = line[digits..].strip_prefix('.') else {
        return false;
    };
    rest.trim_start().starts_with("**")
}
