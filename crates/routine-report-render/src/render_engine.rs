use routine_report::StyleFlags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::render_ir::{
    DrawCommand, PageChromeCommand, PageChromeKind, RenderPage, Rgb, RuleCommand, TextCommand,
    VisualLine,
};
use crate::render_layout::{LayoutConfig, LayoutEngine, LayoutError, TextMeasurer};

const DEFAULT_TITLE: &str = "Your Personalized Skincare Routine";
const DEFAULT_FOOTER: &str =
    "Generated by Skincare Routine Generator | For educational purposes only";

/// Font size, face and color for a fixed text block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextBlockStyle {
    /// Font size.
    pub font_size: f32,
    /// Face flags.
    pub style: StyleFlags,
    /// Fill color.
    pub color: Rgb,
}

/// Page geometry and fixed-block styling for the report document.
///
/// Defaults reproduce an A4 report in millimetres with point font sizes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DocumentConfig {
    /// Page width. Content width is `page_width - 2 * layout.margin`.
    pub page_width: f32,
    /// Page height, margin and class styles for the body text.
    pub layout: LayoutConfig,
    /// Title line.
    pub title: TextBlockStyle,
    /// Advance after the title.
    pub title_advance: f32,
    /// Metadata lines under the title.
    pub metadata: TextBlockStyle,
    /// Advance after each metadata line.
    pub metadata_advance: f32,
    /// Gap between metadata and separator rule.
    pub separator_gap_before: f32,
    /// Gap between separator rule and body text.
    pub separator_gap_after: f32,
    /// Separator rule color.
    pub separator_color: Rgb,
    /// Stroke thickness for separator and underline rules.
    pub rule_thickness: f32,
    /// Underline offset below the baseline.
    pub underline_offset: f32,
    /// Footer text on the last page.
    pub footer: TextBlockStyle,
    /// Footer baseline distance from the bottom edge.
    pub footer_from_bottom: f32,
}

impl DocumentConfig {
    /// A4 portrait, 20 mm margin.
    pub fn a4() -> Self {
        Self {
            page_width: 210.0,
            layout: LayoutConfig::for_page(210.0, 297.0, 20.0),
            title: TextBlockStyle {
                font_size: 22.0,
                style: StyleFlags::BOLD,
                color: Rgb::new(102, 126, 234),
            },
            title_advance: 12.0,
            metadata: TextBlockStyle {
                font_size: 10.0,
                style: StyleFlags::PLAIN,
                color: Rgb::gray(80),
            },
            metadata_advance: 5.0,
            separator_gap_before: 3.0,
            separator_gap_after: 10.0,
            separator_color: Rgb::gray(200),
            rule_thickness: 0.2,
            underline_offset: 0.5,
            footer: TextBlockStyle {
                font_size: 8.0,
                style: StyleFlags::ITALIC,
                color: Rgb::gray(120),
            },
            footer_from_bottom: 10.0,
        }
    }

    /// Layout config with the content width derived from the page width.
    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            max_width: self.page_width - 2.0 * self.layout.margin,
            ..self.layout
        }
    }

    /// Page height.
    pub fn page_height(&self) -> f32 {
        self.layout.page_height
    }

    /// Page margin.
    pub fn margin(&self) -> f32 {
        self.layout.margin
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self::a4()
    }
}

/// Title, metadata summary and footer for one report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Title text.
    pub title: String,
    /// `Label: value` pairs joined into one summary line.
    pub fields: Vec<(String, String)>,
    /// Additional metadata lines under the summary.
    pub extra_lines: Vec<String>,
    /// Footer text; empty disables the footer.
    pub footer: String,
}

impl ReportMeta {
    /// Metadata with a title and the default footer.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: Vec::new(),
            extra_lines: Vec::new(),
            footer: DEFAULT_FOOTER.to_string(),
        }
    }

    /// Append a summary field.
    pub fn field(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((label.into(), value.into()));
        self
    }

    /// Append an extra metadata line.
    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.extra_lines.push(text.into());
        self
    }

    /// Replace the footer text.
    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = text.into();
        self
    }

    /// Fields rendered as `Age: 30 | Skin Type: Dry`.
    pub fn summary_line(&self) -> Option<String> {
        if self.fields.is_empty() {
            return None;
        }
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(label, value)| format!("{}: {}", label, value))
            .collect();
        Some(parts.join(" | "))
    }

    fn metadata_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.summary_line()
            .into_iter()
            .chain(self.extra_lines.iter().cloned())
    }
}

impl Default for ReportMeta {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE)
    }
}

/// Finished paginated report.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    /// Page width.
    pub page_width: f32,
    /// Page height.
    pub page_height: f32,
    /// Pages in order; never empty for a rendered report.
    pub pages: Vec<RenderPage>,
}

impl ReportDocument {
    /// Encode as a compact binary artifact.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ReportError> {
        Ok(postcard::to_allocvec(self)?)
    }

    /// Decode a binary artifact produced by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReportError> {
        Ok(postcard::from_bytes(bytes)?)
    }

    /// Pretty JSON export.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Paginated report renderer.
///
/// Places a title block on the first page, lays out the body with the shared
/// [`LayoutEngine`], and adds a centered footer on the last page.
#[derive(Clone, Debug)]
pub struct ReportRenderer {
    cfg: DocumentConfig,
    engine: LayoutEngine,
}

impl ReportRenderer {
    /// Create a renderer.
    pub fn new(cfg: DocumentConfig) -> Self {
        Self {
            engine: LayoutEngine::new(cfg.layout_config()),
            cfg,
        }
    }

    /// Install a shared text measurer for body, footer and title widths.
    pub fn with_text_measurer(mut self, measurer: Arc<dyn TextMeasurer>) -> Self {
        self.engine = self.engine.with_text_measurer(measurer);
        self
    }

    /// Layout engine used for the body text.
    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    /// Active document configuration.
    pub fn config(&self) -> &DocumentConfig {
        &self.cfg
    }

    /// Render `text` into a paginated document.
    pub fn render(&self, meta: &ReportMeta, text: &str) -> Result<ReportDocument, ReportError> {
        let cfg = &self.cfg;
        let margin = cfg.margin();
        let mut first = RenderPage::new(1);

        let header_bottom = self.place_header(&mut first, meta);
        let cursor = self
            .engine
            .start_cursor()
            .reserve(header_bottom - margin);

        let mut pages = vec![first];
        for line in self.engine.layout_from(text, cursor)? {
            if line.is_blank() {
                continue;
            }
            while pages.len() <= line.page_index {
                pages.push(RenderPage::new(pages.len() + 1));
            }
            let page = &mut pages[line.page_index];
            self.place_line(page, &line);
        }

        if let Some(last) = pages.last_mut() {
            self.place_footer(last, meta);
        }
        log::debug!(
            "report rendered: {} pages for {} bytes of text",
            pages.len(),
            text.len()
        );
        Ok(ReportDocument {
            page_width: cfg.page_width,
            page_height: cfg.page_height(),
            pages,
        })
    }

    /// Draw title, metadata and separator. Returns the y where body text starts.
    fn place_header(&self, page: &mut RenderPage, meta: &ReportMeta) -> f32 {
        let cfg = &self.cfg;
        let margin = cfg.margin();
        let mut y = margin;

        if !meta.title.is_empty() {
            page.push_content_command(block_text(&meta.title, margin, y, cfg.title));
            y += cfg.title_advance;
        }
        for line in meta.metadata_lines() {
            page.push_content_command(block_text(&line, margin, y, cfg.metadata));
            y += cfg.metadata_advance;
        }

        y += cfg.separator_gap_before;
        page.push_content_command(DrawCommand::Rule(RuleCommand {
            x: margin,
            y,
            length: cfg.page_width - 2.0 * margin,
            thickness: cfg.rule_thickness,
            color: cfg.separator_color,
        }));
        y + cfg.separator_gap_after
    }

    fn place_line(&self, page: &mut RenderPage, line: &VisualLine) {
        let cfg = &self.cfg;
        let style = cfg.layout.classes.for_class(line.class);
        let left = cfg.margin();
        for fragment in &line.fragments {
            let x = left + fragment.x;
            page.push_content_command(DrawCommand::Text(TextCommand {
                x,
                baseline_y: line.y,
                text: fragment.text.clone(),
                style: fragment.style,
                font_size: style.font_size,
                color: style.color,
            }));
            if fragment.style.underline {
                page.push_content_command(DrawCommand::Rule(RuleCommand {
                    x,
                    y: line.y + cfg.underline_offset,
                    length: fragment.width,
                    thickness: cfg.rule_thickness,
                    color: style.color,
                }));
            }
        }
    }

    fn place_footer(&self, page: &mut RenderPage, meta: &ReportMeta) {
        if meta.footer.is_empty() {
            return;
        }
        let cfg = &self.cfg;
        let width =
            self.engine
                .measure_text(&meta.footer, cfg.footer.style, cfg.footer.font_size);
        page.push_chrome_command(DrawCommand::PageChrome(PageChromeCommand {
            kind: PageChromeKind::Footer,
            text: meta.footer.clone(),
            x: (cfg.page_width - width) / 2.0,
            baseline_y: cfg.page_height() - cfg.footer_from_bottom,
            style: cfg.footer.style,
            font_size: cfg.footer.font_size,
            color: cfg.footer.color,
        }));
    }
}

fn block_text(text: &str, x: f32, baseline_y: f32, block: TextBlockStyle) -> DrawCommand {
    DrawCommand::Text(TextCommand {
        x,
        baseline_y,
        text: text.to_string(),
        style: block.style,
        font_size: block.font_size,
        color: block.color,
    })
}

/// Report rendering error.
#[derive(Debug)]
pub enum ReportError {
    /// Body layout failed.
    Layout(LayoutError),
    /// Binary artifact encode/decode failed.
    Codec(postcard::Error),
    /// JSON export failed.
    Json(serde_json::Error),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Layout(err) => write!(f, "report layout failed: {}", err),
            Self::Codec(err) => write!(f, "report artifact codec failed: {}", err),
            Self::Json(err) => write!(f, "report json export failed: {}", err),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Layout(err) => Some(err),
            Self::Codec(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<LayoutError> for ReportError {
    fn from(value: LayoutError) -> Self {
        Self::Layout(value)
    }
}

impl From<postcard::Error> for ReportError {
    fn from(value: postcard::Error) -> Self {
        Self::Codec(value)
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono(text: &str, _style: StyleFlags, _size: f32) -> f32 {
        text.chars().count() as f32 * 2.0
    }

    fn renderer() -> ReportRenderer {
        ReportRenderer::new(DocumentConfig::a4()).with_text_measurer(Arc::new(mono))
    }

    fn meta() -> ReportMeta {
        ReportMeta::default()
            .field("Age", "34")
            .field("Gender", "Female")
            .field("Skin Type", "Combination")
            .line("Concerns: Acne, Dryness")
    }

    #[test]
    fn summary_line_joins_fields() {
        assert_eq!(
            meta().summary_line().as_deref(),
            Some("Age: 34 | Gender: Female | Skin Type: Combination")
        );
        assert_eq!(ReportMeta::new("t").summary_line(), None);
    }

    #[test]
    fn first_page_starts_with_title_metadata_and_separator() {
        let doc = renderer().render(&meta(), "Drink water.").unwrap();
        assert_eq!(doc.page_count(), 1);
        let page = &doc.pages[0];
        let texts: Vec<&str> = page.text_commands().map(|t| t.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Your Personalized Skincare Routine",
                "Age: 34 | Gender: Female | Skin Type: Combination",
                "Concerns: Acne, Dryness",
                "Drink",
                " water.",
            ]
        );
        let separator_y = page
            .content_commands
            .iter()
            .find_map(|cmd| match cmd {
                DrawCommand::Rule(rule) => Some(rule.y),
                _ => None,
            })
            .unwrap();
        // 20 + 12 + 5 + 5 + 3
        assert_eq!(separator_y, 45.0);
        let body = page.text_commands().nth(3).unwrap();
        assert_eq!(body.baseline_y, 55.0);
        assert_eq!(body.x, 20.0);
    }

    #[test]
    fn underlined_fragment_gets_rule_of_fragment_width() {
        let doc = renderer().render(&ReportMeta::new(""), "use _daily_").unwrap();
        let rules: Vec<&RuleCommand> = doc.pages[0]
            .content_commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Rule(rule) => Some(rule),
                _ => None,
            })
            .collect();
        assert_eq!(rules.len(), 2);
        let underline = rules[1];
        assert_eq!(underline.length, " daily".len() as f32 * 2.0);
        assert_eq!(underline.x, 20.0 + 6.0);
    }

    #[test]
    fn footer_is_centered_on_last_page_only() {
        let body: String = (0..120).map(|i| format!("Line {}\n", i)).collect();
        let doc = renderer().render(&meta(), &body).unwrap();
        assert!(doc.page_count() > 1);
        for page in &doc.pages[..doc.page_count() - 1] {
            assert!(page.chrome_commands.is_empty());
        }
        let last = doc.pages.last().unwrap();
        let DrawCommand::PageChrome(footer) = &last.chrome_commands[0] else {
            panic!("expected footer chrome");
        };
        assert_eq!(footer.kind, PageChromeKind::Footer);
        let width = footer.text.chars().count() as f32 * 2.0;
        assert_eq!(footer.x, (210.0 - width) / 2.0);
        assert_eq!(footer.baseline_y, 287.0);
    }

    #[test]
    fn body_lines_stay_inside_page_break_limit() {
        let body: String = (0..200).map(|i| format!("Step {} apply\n", i)).collect();
        let doc = renderer().render(&meta(), &body).unwrap();
        for page in &doc.pages {
            for text in page.text_commands() {
                // Placed only while the cursor is within the limit.
                assert!(text.baseline_y <= 297.0 - 20.0 + 0.001);
            }
        }
        for page in &doc.pages[1..] {
            let first = page.text_commands().next().unwrap();
            assert_eq!(first.baseline_y, 20.0);
        }
    }

    #[test]
    fn empty_body_still_yields_header_page() {
        let doc = renderer().render(&meta(), "").unwrap();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.pages[0].chrome_commands.len(), 1);
    }

    #[test]
    fn artifact_codecs_preserve_document() {
        let doc = renderer()
            .render(&meta(), "1. **Morning**\n*Cleanse* then _tone_")
            .unwrap();
        let bytes = doc.to_bytes().unwrap();
        assert_eq!(ReportDocument::from_bytes(&bytes).unwrap(), doc);
        let json = doc.to_json().unwrap();
        assert!(json.contains("\"Footer\""));
    }

    #[test]
    fn invalid_geometry_is_reported() {
        let mut cfg = DocumentConfig::a4();
        cfg.page_width = 30.0;
        let err = ReportRenderer::new(cfg)
            .render(&meta(), "text")
            .unwrap_err();
        assert!(matches!(err, ReportError::Layout(_)));
        assert!(err.to_string().contains("max_width"));
    }
}
