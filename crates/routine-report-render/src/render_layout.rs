use routine_report::{classify_line, tokenize, LineClass, StyleFlags, StyledRun};
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::fmt;
use std::iter::Enumerate;
use std::str::Lines;
use std::sync::Arc;

use crate::render_ir::{LayoutCursor, LayoutPage, PlacedFragment, Rgb, VisualLine};

/// Points to millimetres, for pt font sizes on mm pages.
pub const POINTS_TO_MM: f32 = 25.4 / 72.0;

/// Text width measurement hook.
///
/// Widths are in the same unit system as the layout geometry. Closures of
/// shape `Fn(&str, StyleFlags, f32) -> f32` implement this trait.
pub trait TextMeasurer: Send + Sync {
    /// Measure `text` rendered with `style` at `font_size`.
    fn measure_text(&self, text: &str, style: StyleFlags, font_size: f32) -> f32;
}

impl<F> TextMeasurer for F
where
    F: Fn(&str, StyleFlags, f32) -> f32 + Send + Sync,
{
    fn measure_text(&self, text: &str, style: StyleFlags, font_size: f32) -> f32 {
        self(text, style, font_size)
    }
}

/// Deterministic width estimate used when no measurer is installed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeuristicMeasurer {
    /// Layout units per font-size unit.
    pub unit_scale: f32,
}

impl HeuristicMeasurer {
    /// Create a measurer with the given unit scale.
    pub fn new(unit_scale: f32) -> Self {
        Self { unit_scale }
    }
}

impl Default for HeuristicMeasurer {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl TextMeasurer for HeuristicMeasurer {
    fn measure_text(&self, text: &str, style: StyleFlags, font_size: f32) -> f32 {
        let em_sum: f32 = text.chars().map(proportional_glyph_em_width).sum();
        let mut face_scale = 1.0;
        if style.bold {
            face_scale += 0.06;
        }
        if style.italic {
            face_scale += 0.01;
        }
        em_sum * font_size * face_scale * self.unit_scale
    }
}

fn proportional_glyph_em_width(ch: char) -> f32 {
    match ch {
        ' ' | '\u{00A0}' => 0.28,
        'i' | 'l' | 'I' | '|' | '!' => 0.22,
        '.' | ',' | ':' | ';' | '\'' | '"' | '`' => 0.28,
        '-' | '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' => 0.33,
        '(' | ')' | '[' | ']' | '{' | '}' => 0.33,
        'f' | 't' | 'j' | 'r' => 0.30,
        'm' | 'w' | 'M' | 'W' | '@' | '%' | '&' | '#' => 0.83,
        c if c.is_ascii_digit() => 0.56,
        c if c.is_ascii_uppercase() => 0.67,
        c if c.is_ascii_lowercase() => 0.53,
        c if c.is_whitespace() => 0.28,
        c if c.is_ascii_punctuation() => 0.45,
        _ => 0.58,
    }
}

/// Size, color and spacing for one line class.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassStyle {
    /// Font size passed to the measurer.
    pub font_size: f32,
    /// Line advance as a multiple of `font_size`.
    pub line_height_ratio: f32,
    /// Fill color.
    pub color: Rgb,
    /// Extra space before the first visual line of a source line.
    pub space_before: f32,
    /// Extra space after the last visual line of a source line.
    pub space_after: f32,
}

impl ClassStyle {
    /// Body style without extra spacing.
    pub const fn body(font_size: f32, line_height_ratio: f32, color: Rgb) -> Self {
        Self {
            font_size,
            line_height_ratio,
            color,
            space_before: 0.0,
            space_after: 0.0,
        }
    }

    /// Vertical advance of one visual line.
    pub fn line_height(&self) -> f32 {
        self.font_size * self.line_height_ratio
    }
}

/// Per-class styles. Blank lines use the plain style's color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassStyles {
    /// Numbered section headers.
    pub section_header: ClassStyle,
    /// Lines carrying markers.
    pub inline_emphasis: ClassStyle,
    /// Unmarked lines.
    pub plain: ClassStyle,
}

impl ClassStyles {
    /// Same style for every class.
    pub const fn uniform(style: ClassStyle) -> Self {
        Self {
            section_header: style,
            inline_emphasis: style,
            plain: style,
        }
    }

    /// Style for a line class.
    pub fn for_class(&self, class: LineClass) -> &ClassStyle {
        match class {
            LineClass::SectionHeader => &self.section_header,
            LineClass::InlineEmphasis => &self.inline_emphasis,
            LineClass::Plain | LineClass::Blank => &self.plain,
        }
    }

    fn all(&self) -> [&ClassStyle; 3] {
        [&self.section_header, &self.inline_emphasis, &self.plain]
    }
}

impl Default for ClassStyles {
    fn default() -> Self {
        Self {
            section_header: ClassStyle {
                font_size: 14.0,
                line_height_ratio: 0.55,
                color: Rgb::new(102, 126, 234),
                space_before: 4.0,
                space_after: 2.0,
            },
            inline_emphasis: ClassStyle::body(10.0, 0.55, Rgb::gray(40)),
            plain: ClassStyle::body(10.0, 0.55, Rgb::gray(60)),
        }
    }
}

/// Geometry and styling for a layout pass.
///
/// Defaults describe an A4 page in millimetres with point font sizes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Maximum visual line width.
    pub max_width: f32,
    /// Page height.
    pub page_height: f32,
    /// Top margin, and bottom margin for the page-break check.
    pub margin: f32,
    /// Vertical advance for a blank source line.
    pub blank_line_height: f32,
    /// Layout units per font-size unit for the built-in measurer.
    pub font_unit_scale: f32,
    /// Per-class styles.
    pub classes: ClassStyles,
}

impl LayoutConfig {
    /// Page geometry with content width `width - 2 * margin`.
    pub fn for_page(width: f32, height: f32, margin: f32) -> Self {
        Self {
            max_width: width - 2.0 * margin,
            page_height: height,
            margin,
            ..Self::default()
        }
    }

    /// Fixed line height for every class, no extra spacing, unit font scale.
    pub fn uniform(max_width: f32, page_height: f32, margin: f32, line_height: f32) -> Self {
        Self {
            max_width,
            page_height,
            margin,
            blank_line_height: line_height,
            font_unit_scale: 1.0,
            classes: ClassStyles::uniform(ClassStyle::body(line_height, 1.0, Rgb::gray(0))),
        }
    }

    /// Check that wrapping and pagination decisions are possible.
    pub fn validate(&self) -> Result<(), LayoutError> {
        check(
            "max_width",
            self.max_width,
            self.max_width.is_finite() && self.max_width > 0.0,
        )?;
        check(
            "margin",
            self.margin,
            self.margin.is_finite() && self.margin >= 0.0,
        )?;
        check(
            "page_height",
            self.page_height,
            self.page_height.is_finite() && self.page_height > self.margin,
        )?;
        check(
            "blank_line_height",
            self.blank_line_height,
            self.blank_line_height.is_finite() && self.blank_line_height >= 0.0,
        )?;
        check(
            "font_unit_scale",
            self.font_unit_scale,
            self.font_unit_scale.is_finite() && self.font_unit_scale > 0.0,
        )?;
        for style in self.classes.all() {
            check(
                "font_size",
                style.font_size,
                style.font_size.is_finite() && style.font_size > 0.0,
            )?;
            check(
                "line_height_ratio",
                style.line_height_ratio,
                style.line_height_ratio.is_finite() && style.line_height_ratio > 0.0,
            )?;
        }
        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_width: 170.0,
            page_height: 297.0,
            margin: 20.0,
            blank_line_height: 3.0,
            font_unit_scale: POINTS_TO_MM,
            classes: ClassStyles::default(),
        }
    }
}

fn check(field: &'static str, value: f32, ok: bool) -> Result<(), LayoutError> {
    if ok {
        Ok(())
    } else {
        Err(LayoutError::InvalidGeometry { field, value })
    }
}

/// Layout failure.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutError {
    /// Geometry leaves no room for a wrapping or page-break decision.
    InvalidGeometry { field: &'static str, value: f32 },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGeometry { field, value } => {
                write!(f, "invalid layout geometry: {} = {}", field, value)
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// Greedy word-wrap and pagination engine.
///
/// Layout is a pure function of the text, the measurer and the config:
/// identical inputs always produce identical lines and page assignments.
#[derive(Clone)]
pub struct LayoutEngine {
    cfg: LayoutConfig,
    text_measurer: Option<Arc<dyn TextMeasurer>>,
}

impl fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("cfg", &self.cfg)
            .field("has_text_measurer", &self.text_measurer.is_some())
            .finish()
    }
}

impl LayoutEngine {
    /// Create a layout engine.
    pub fn new(cfg: LayoutConfig) -> Self {
        Self {
            cfg,
            text_measurer: None,
        }
    }

    /// Install a shared text measurer.
    pub fn with_text_measurer(mut self, measurer: Arc<dyn TextMeasurer>) -> Self {
        self.text_measurer = Some(measurer);
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &LayoutConfig {
        &self.cfg
    }

    /// Fresh cursor at the top margin of the first page.
    pub fn start_cursor(&self) -> LayoutCursor {
        LayoutCursor::new(self.cfg.page_height, self.cfg.margin)
    }

    /// Lazily lay out `\n`-separated text.
    pub fn layout<'e, 't>(&'e self, text: &'t str) -> Result<VisualLines<'e, 't>, LayoutError> {
        self.layout_from(text, self.start_cursor())
    }

    /// Lazily lay out text starting from an existing cursor.
    pub fn layout_from<'e, 't>(
        &'e self,
        text: &'t str,
        cursor: LayoutCursor,
    ) -> Result<VisualLines<'e, 't>, LayoutError> {
        self.cfg.validate()?;
        Ok(VisualLines {
            engine: self,
            source: text.lines().enumerate(),
            pending: VecDeque::new(),
            cursor,
            emitted: 0,
            done: false,
        })
    }

    /// Lay out text and group lines into pages.
    pub fn layout_pages(&self, text: &str) -> Result<Vec<LayoutPage>, LayoutError> {
        let mut pages = Vec::new();
        self.layout_with(text, |page| pages.push(page))?;
        Ok(pages)
    }

    /// Lay out text and stream each finished page. Returns the final cursor.
    pub fn layout_with<F>(&self, text: &str, on_page: F) -> Result<LayoutCursor, LayoutError>
    where
        F: FnMut(LayoutPage),
    {
        let lines = self.layout(text)?;
        Ok(paginate(lines, on_page))
    }

    /// Measure text with the installed measurer, or the heuristic fallback.
    ///
    /// Negative and non-finite results are clamped to zero.
    pub fn measure_text(&self, text: &str, style: StyleFlags, font_size: f32) -> f32 {
        let raw = match self.text_measurer.as_ref() {
            Some(m) => m.measure_text(text, style, font_size),
            None => HeuristicMeasurer::new(self.cfg.font_unit_scale)
                .measure_text(text, style, font_size),
        };
        sanitize_width(raw, text)
    }

    /// Greedy-wrap one source line into fragment lines.
    fn wrap(&self, line: &str, font_size: f32) -> Vec<WrappedLine> {
        let runs = tokenize(line);
        let words = word_units(&runs);
        let max_width = self.cfg.max_width;

        let mut out = Vec::new();
        let mut current = WrappedLine::default();
        for word in words {
            let mut pieces = self.measure_word(&word, !current.fragments.is_empty(), font_size);
            let word_w: f32 = pieces.iter().map(|p| p.width).sum();

            if current.width + word_w > max_width && !current.fragments.is_empty() {
                out.push(std::mem::take(&mut current));
                pieces = self.measure_word(&word, false, font_size);
            }
            let word_w: f32 = pieces.iter().map(|p| p.width).sum();
            if current.fragments.is_empty() && word_w > max_width {
                log::warn!(
                    "word wider than line ({:.1} > {:.1}) placed alone: {:?}",
                    word_w,
                    max_width,
                    word.text()
                );
            }
            for mut piece in pieces {
                piece.x = current.width;
                current.width += piece.width;
                current.fragments.push(piece);
            }
        }
        if !current.fragments.is_empty() {
            out.push(current);
        }
        out
    }

    fn measure_word(
        &self,
        word: &WordUnit<'_>,
        with_space: bool,
        font_size: f32,
    ) -> SmallVec<[PlacedFragment; 2]> {
        let mut out = SmallVec::new();
        for (idx, run) in word.pieces.iter().enumerate() {
            let mut text = String::with_capacity(run.text.len() + 1);
            if idx == 0 && with_space && word.leading_space {
                text.push(' ');
            }
            text.push_str(run.text);
            let width = self.measure_text(&text, run.style, font_size);
            out.push(PlacedFragment {
                text,
                style: run.style,
                width,
                x: 0.0,
            });
        }
        out
    }
}

fn sanitize_width(width: f32, text: &str) -> f32 {
    if width.is_finite() && width >= 0.0 {
        width
    } else {
        log::debug!("clamped measurement {} for {:?} to 0", width, text);
        0.0
    }
}

#[derive(Clone, Debug, Default)]
struct WrappedLine {
    fragments: Vec<PlacedFragment>,
    width: f32,
}

/// Wrap unit: one or more runs glued without a space between them.
#[derive(Clone, Debug)]
struct WordUnit<'a> {
    pieces: SmallVec<[StyledRun<'a>; 2]>,
    leading_space: bool,
}

impl WordUnit<'_> {
    fn text(&self) -> String {
        self.pieces.iter().map(|p| p.text).collect()
    }
}

/// Split runs on spaces into wrap units.
///
/// Runs of spaces collapse to one separator. A word that continues across a
/// style change (`**bold**ness`) stays a single unit.
fn word_units<'a>(runs: &[StyledRun<'a>]) -> Vec<WordUnit<'a>> {
    let mut units: Vec<WordUnit<'a>> = Vec::new();
    let mut pending_space = false;
    let mut glue = false;
    for run in runs {
        for (idx, piece) in run.text.split(' ').enumerate() {
            if idx > 0 {
                pending_space = true;
                glue = false;
            }
            if piece.is_empty() {
                continue;
            }
            let piece = StyledRun::styled(piece, run.style);
            match units.last_mut() {
                Some(last) if glue => last.pieces.push(piece),
                _ => {
                    let leading_space = pending_space && !units.is_empty();
                    let mut pieces = SmallVec::new();
                    pieces.push(piece);
                    units.push(WordUnit {
                        pieces,
                        leading_space,
                    });
                }
            }
            pending_space = false;
            glue = true;
        }
    }
    units
}

/// Lazy sequence of placed visual lines.
///
/// Each call to `next` tokenizes and wraps at most one more source line.
pub struct VisualLines<'e, 't> {
    engine: &'e LayoutEngine,
    source: Enumerate<Lines<'t>>,
    pending: VecDeque<VisualLine>,
    cursor: LayoutCursor,
    emitted: usize,
    done: bool,
}

impl fmt::Debug for VisualLines<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisualLines")
            .field("cursor", &self.cursor)
            .field("pending", &self.pending.len())
            .field("emitted", &self.emitted)
            .finish()
    }
}

impl VisualLines<'_, '_> {
    /// Cursor state after the lines produced so far.
    pub fn cursor(&self) -> &LayoutCursor {
        &self.cursor
    }

    /// Consume the iterator and return its cursor.
    pub fn into_cursor(self) -> LayoutCursor {
        self.cursor
    }

    fn fill_from_next_source(&mut self) -> bool {
        let Some((source_line, raw)) = self.source.next() else {
            return false;
        };
        let cfg = self.engine.config();
        let line = raw.trim();
        let class = classify_line(line);

        if class.is_blank() {
            self.pending.push_back(VisualLine {
                source_line,
                class,
                fragments: Vec::new(),
                width: 0.0,
                page_index: self.cursor.page_index,
                y: self.cursor.y,
                line_height: cfg.blank_line_height,
            });
            self.cursor.advance(cfg.blank_line_height);
            return true;
        }

        let style = *cfg.classes.for_class(class);
        let wrapped = self.engine.wrap(line, style.font_size);
        if wrapped.is_empty() {
            return true;
        }

        let line_height = style.line_height();
        self.cursor.advance(style.space_before);
        for wrapped_line in wrapped {
            let (page_index, y) = self.cursor.place(line_height);
            self.pending.push_back(VisualLine {
                source_line,
                class,
                fragments: wrapped_line.fragments,
                width: wrapped_line.width,
                page_index,
                y,
                line_height,
            });
        }
        self.cursor.advance(style.space_after);
        true
    }
}

impl Iterator for VisualLines<'_, '_> {
    type Item = VisualLine;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                self.emitted += 1;
                return Some(line);
            }
            if self.done {
                return None;
            }
            if !self.fill_from_next_source() {
                self.done = true;
                log::debug!(
                    "layout finished: {} visual lines, last page index {}",
                    self.emitted,
                    self.cursor.page_index
                );
            }
        }
    }
}

impl std::iter::FusedIterator for VisualLines<'_, '_> {}

/// Group visual lines into pages, dropping pages without text.
pub(crate) fn paginate<F>(mut lines: VisualLines<'_, '_>, mut on_page: F) -> LayoutCursor
where
    F: FnMut(LayoutPage),
{
    let mut page = LayoutPage::new(0);
    for line in lines.by_ref() {
        if line.page_index != page.index {
            let next = LayoutPage::new(line.page_index);
            let done = std::mem::replace(&mut page, next);
            if done.has_content() {
                on_page(done);
            }
        }
        page.lines.push(line);
    }
    if page.has_content() {
        on_page(page);
    }
    lines.into_cursor()
}
