//! Screen renderer and HTML preview helpers for `routine-report-render`.

#![cfg_attr(
    not(test),
    deny(
        clippy::disallowed_methods,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::panic_in_result_fn,
        clippy::todo,
        clippy::unimplemented
    )
)]

use std::fmt::Write as _;
use std::sync::Arc;

use routine_report::{LineClass, StyleFlags};
use routine_report_render::{
    ClassStyle, ClassStyles, LayoutConfig, LayoutEngine, LayoutError, PlacedFragment, Rgb,
    TextMeasurer, VisualLine,
};
use serde::{Deserialize, Serialize};

/// Presentation for one line class on screen.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenClassStyle {
    /// Font size in CSS pixels.
    pub font_size: f32,
    /// Text color.
    pub color: Rgb,
    /// CSS font weight for the whole line.
    pub weight: u16,
    /// Gap above the line in CSS pixels.
    pub margin_top: f32,
    /// Gap below the line in CSS pixels.
    pub margin_bottom: f32,
}

/// Screen styling and viewport width.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenTheme {
    /// Wrap width in CSS pixels.
    pub width: f32,
    /// Line advance as a multiple of font size.
    pub line_height_ratio: f32,
    /// Numbered section headers.
    pub header: ScreenClassStyle,
    /// Emphasis and plain lines.
    pub body: ScreenClassStyle,
    /// Weight for bold spans.
    pub strong_weight: u16,
    /// Color for bold spans outside headers.
    pub strong_color: Rgb,
    /// Height of the spacer emitted for a blank line.
    pub spacer_height: f32,
}

impl ScreenTheme {
    /// Style for a line class.
    pub fn class_style(&self, class: LineClass) -> &ScreenClassStyle {
        match class {
            LineClass::SectionHeader => &self.header,
            _ => &self.body,
        }
    }

    /// Layout config for a single unpaginated column of `width` pixels.
    pub fn layout_config(&self) -> LayoutConfig {
        let header = ClassStyle {
            font_size: self.header.font_size,
            line_height_ratio: self.line_height_ratio,
            color: self.header.color,
            space_before: self.header.margin_top,
            space_after: self.header.margin_bottom,
        };
        let body = ClassStyle {
            space_before: self.body.margin_top,
            space_after: self.body.margin_bottom,
            ..ClassStyle::body(self.body.font_size, self.line_height_ratio, self.body.color)
        };
        LayoutConfig {
            max_width: self.width,
            page_height: f32::MAX,
            margin: 0.0,
            blank_line_height: self.spacer_height,
            font_unit_scale: 1.0,
            classes: ClassStyles {
                section_header: header,
                inline_emphasis: body,
                plain: body,
            },
        }
    }
}

impl Default for ScreenTheme {
    fn default() -> Self {
        Self {
            width: 640.0,
            line_height_ratio: 1.6,
            header: ScreenClassStyle {
                font_size: 17.0,
                color: Rgb::new(0x14, 0xb8, 0xa6),
                weight: 700,
                margin_top: 16.0,
                margin_bottom: 12.0,
            },
            body: ScreenClassStyle {
                font_size: 15.0,
                color: Rgb::gray(0x44),
                weight: 400,
                margin_top: 0.0,
                margin_bottom: 12.0,
            },
            strong_weight: 600,
            strong_color: Rgb::gray(0x33),
            spacer_height: 8.0,
        }
    }
}

/// Styled text span.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenSpan {
    pub text: String,
    pub style: StyleFlags,
    /// Span weight override, set for bold spans.
    pub weight: Option<u16>,
    /// Span color override, set for bold spans outside headers.
    pub color: Option<Rgb>,
}

impl ScreenSpan {
    fn is_plain(&self) -> bool {
        self.style.is_plain() && self.weight.is_none() && self.color.is_none()
    }
}

/// One source line with its wrapped visual lines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenParagraph {
    /// 0-based source line index.
    pub source_line: usize,
    pub class: LineClass,
    pub font_size: f32,
    pub line_height: f32,
    pub color: Rgb,
    pub weight: u16,
    pub margin_top: f32,
    pub margin_bottom: f32,
    /// Visual lines, each a list of spans.
    pub lines: Vec<Vec<ScreenSpan>>,
}

/// Display node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ScreenNode {
    Paragraph(ScreenParagraph),
    Spacer { height: f32 },
}

/// Builds styled display nodes from the shared layout engine.
#[derive(Clone, Debug)]
pub struct ScreenRenderer {
    theme: ScreenTheme,
    engine: LayoutEngine,
}

impl ScreenRenderer {
    /// Create a renderer for a theme.
    pub fn new(theme: ScreenTheme) -> Self {
        Self {
            engine: LayoutEngine::new(theme.layout_config()),
            theme,
        }
    }

    /// Install a shared text measurer.
    pub fn with_text_measurer(mut self, measurer: Arc<dyn TextMeasurer>) -> Self {
        self.engine = self.engine.with_text_measurer(measurer);
        self
    }

    /// Active theme.
    pub fn theme(&self) -> &ScreenTheme {
        &self.theme
    }

    /// Lay out `text` and convert it into display nodes.
    pub fn render(&self, text: &str) -> Result<Vec<ScreenNode>, LayoutError> {
        let mut nodes: Vec<ScreenNode> = Vec::new();
        let mut visual_lines = 0usize;
        for line in self.engine.layout(text)? {
            visual_lines += 1;
            if line.is_blank() {
                nodes.push(ScreenNode::Spacer {
                    height: line.line_height,
                });
                continue;
            }
            let spans = self.spans_for(&line);
            match nodes.last_mut() {
                Some(ScreenNode::Paragraph(paragraph))
                    if paragraph.source_line == line.source_line =>
                {
                    paragraph.lines.push(spans);
                }
                _ => nodes.push(ScreenNode::Paragraph(self.paragraph_for(&line, spans))),
            }
        }
        log::debug!(
            "screen render: {} nodes from {} visual lines at width {}",
            nodes.len(),
            visual_lines,
            self.theme.width
        );
        Ok(nodes)
    }

    fn paragraph_for(&self, line: &VisualLine, spans: Vec<ScreenSpan>) -> ScreenParagraph {
        let style = self.theme.class_style(line.class);
        ScreenParagraph {
            source_line: line.source_line,
            class: line.class,
            font_size: style.font_size,
            line_height: line.line_height,
            color: style.color,
            weight: style.weight,
            margin_top: style.margin_top,
            margin_bottom: style.margin_bottom,
            lines: vec![spans],
        }
    }

    /// Merge adjacent same-style fragments into spans.
    fn spans_for(&self, line: &VisualLine) -> Vec<ScreenSpan> {
        let in_header = line.class == LineClass::SectionHeader;
        let mut spans: Vec<ScreenSpan> = Vec::with_capacity(line.fragments.len());
        for fragment in &line.fragments {
            match spans.last_mut() {
                Some(last) if last.style == fragment.style => last.text.push_str(&fragment.text),
                _ => spans.push(self.span_for(fragment, in_header)),
            }
        }
        spans
    }

    fn span_for(&self, fragment: &PlacedFragment, in_header: bool) -> ScreenSpan {
        let bold = fragment.style.bold;
        ScreenSpan {
            text: fragment.text.clone(),
            style: fragment.style,
            weight: (bold && !in_header).then_some(self.theme.strong_weight),
            color: (bold && !in_header).then_some(self.theme.strong_color),
        }
    }
}

impl Default for ScreenRenderer {
    fn default() -> Self {
        Self::new(ScreenTheme::default())
    }
}

/// Serialize display nodes as an HTML fragment.
pub fn render_html(nodes: &[ScreenNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            ScreenNode::Spacer { height } => {
                let _ = writeln!(
                    out,
                    "<div class=\"spacer\" style=\"height:{}px\"></div>",
                    css_number(*height)
                );
            }
            ScreenNode::Paragraph(paragraph) => write_paragraph(&mut out, paragraph),
        }
    }
    out
}

fn write_paragraph(out: &mut String, paragraph: &ScreenParagraph) {
    let _ = write!(
        out,
        "<div class=\"line {}\" style=\"font-size:{}px;line-height:{}px;color:{};font-weight:{}",
        paragraph.class,
        css_number(paragraph.font_size),
        css_number(paragraph.line_height),
        paragraph.color.to_hex(),
        paragraph.weight
    );
    if paragraph.margin_top > 0.0 {
        let _ = write!(out, ";margin-top:{}px", css_number(paragraph.margin_top));
    }
    if paragraph.margin_bottom > 0.0 {
        let _ = write!(
            out,
            ";margin-bottom:{}px",
            css_number(paragraph.margin_bottom)
        );
    }
    out.push_str("\">");
    for line in &paragraph.lines {
        out.push_str("<div class=\"visual-line\">");
        for span in line {
            write_span(out, span);
        }
        out.push_str("</div>");
    }
    out.push_str("</div>\n");
}

fn write_span(out: &mut String, span: &ScreenSpan) {
    if span.is_plain() {
        out.push_str(&escape_html(&span.text));
        return;
    }
    let mut css: Vec<String> = Vec::new();
    if let Some(weight) = span.weight {
        css.push(format!("font-weight:{}", weight));
    }
    if let Some(color) = span.color {
        css.push(format!("color:{}", color.to_hex()));
    }
    if span.style.italic {
        css.push("font-style:italic".to_string());
    }
    if span.style.underline {
        css.push("text-decoration:underline".to_string());
    }
    let _ = write!(
        out,
        "<span class=\"{}\" style=\"{}\">{}</span>",
        span.style.kind(),
        css.join(";"),
        escape_html(&span.text)
    );
}

/// Serialize display nodes as JSON.
pub fn render_json(nodes: &[ScreenNode]) -> serde_json::Result<String> {
    serde_json::to_string(nodes)
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Format a CSS length with at most two decimals.
fn css_number(value: f32) -> String {
    let formatted = format!("{:.2}", value);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
