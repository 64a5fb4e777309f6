use routine_report::{LineClass, StyleFlags};
use serde::{Deserialize, Serialize};

/// 8-bit RGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Build a color from components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Uniform gray.
    pub const fn gray(level: u8) -> Self {
        Self::new(level, level, level)
    }

    /// CSS hex notation, e.g. `#14b8a6`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Word placed on a visual line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedFragment {
    /// Word text, with one leading space unless line-initial.
    pub text: String,
    /// Style flags inherited from the source run.
    pub style: StyleFlags,
    /// Measured width in layout units.
    pub width: f32,
    /// Offset from the line start.
    pub x: f32,
}

/// One wrapped output line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualLine {
    /// 0-based index of the source line this came from.
    pub source_line: usize,
    /// Classification of the source line.
    pub class: LineClass,
    /// Fragments in reading order. Empty for blank lines.
    pub fragments: Vec<PlacedFragment>,
    /// Sum of fragment widths.
    pub width: f32,
    /// 0-based page index.
    pub page_index: usize,
    /// Vertical offset of the line on its page.
    pub y: f32,
    /// Vertical advance consumed by the line.
    pub line_height: f32,
}

impl VisualLine {
    /// True for vertical-spacing lines without fragments.
    pub fn is_blank(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Concatenated fragment text.
    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }
}

/// Visual lines sharing one page index.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutPage {
    /// 0-based page index.
    pub index: usize,
    /// Lines in placement order, blank spacing lines included.
    pub lines: Vec<VisualLine>,
}

impl LayoutPage {
    /// Create an empty page.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            lines: Vec::new(),
        }
    }

    /// Whether any line on this page carries text.
    pub fn has_content(&self) -> bool {
        self.lines.iter().any(|line| !line.is_blank())
    }
}

/// Vertical position state threaded through one layout pass.
///
/// A cursor belongs to exactly one pass; it is created at the start and
/// returned at the end.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutCursor {
    /// Current vertical offset.
    pub y: f32,
    /// Current 0-based page index.
    pub page_index: usize,
    /// Page height limit.
    pub page_height: f32,
    /// Top and bottom margin.
    pub margin: f32,
    occupied: bool,
}

impl LayoutCursor {
    /// Cursor at the top margin of the first page.
    pub fn new(page_height: f32, margin: f32) -> Self {
        Self {
            y: margin,
            page_index: 0,
            page_height,
            margin,
            occupied: false,
        }
    }

    /// Reserve `dy` on the current page for content placed outside the pass.
    pub fn reserve(mut self, dy: f32) -> Self {
        if dy > 0.0 {
            self.y += dy;
            self.occupied = true;
        }
        self
    }

    /// Offset past which the next placement moves to a new page.
    pub fn limit(&self) -> f32 {
        self.page_height - self.margin
    }

    /// Whether anything has been placed on the current page.
    pub fn is_occupied(&self) -> bool {
        self.occupied
    }

    /// Advance without placing anything.
    pub fn advance(&mut self, dy: f32) {
        if dy > 0.0 {
            self.y += dy;
        }
    }

    /// Place a line of `line_height`, returning its page index and offset.
    ///
    /// The overflow check runs before placement: a line is moved to a fresh
    /// page when the cursor already sits past [`limit`](Self::limit). On a
    /// page with nothing placed yet the pending spacing is dropped instead,
    /// so the line starts at the top margin of the same page.
    pub fn place(&mut self, line_height: f32) -> (usize, f32) {
        if self.y > self.limit() {
            if self.occupied {
                self.start_next_page();
            } else {
                self.y = self.margin;
            }
        }
        let y = self.y;
        self.y += line_height.max(0.0);
        self.occupied = true;
        (self.page_index, y)
    }

    fn start_next_page(&mut self) {
        self.page_index += 1;
        self.y = self.margin;
        self.occupied = false;
    }
}

/// Finished report page made of draw commands.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderPage {
    /// 1-based page number.
    pub page_number: usize,
    /// Content-layer draw commands.
    pub content_commands: Vec<DrawCommand>,
    /// Chrome-layer draw commands (footer and similar).
    pub chrome_commands: Vec<DrawCommand>,
}

impl RenderPage {
    const INITIAL_CONTENT_COMMAND_CAPACITY: usize = 16;

    /// Create an empty page.
    pub fn new(page_number: usize) -> Self {
        Self {
            page_number,
            content_commands: Vec::with_capacity(0),
            chrome_commands: Vec::with_capacity(0),
        }
    }

    /// Push a content-layer command.
    pub fn push_content_command(&mut self, cmd: DrawCommand) {
        if self.content_commands.capacity() == 0 {
            self.content_commands
                .reserve(Self::INITIAL_CONTENT_COMMAND_CAPACITY);
        }
        self.content_commands.push(cmd);
    }

    /// Push a chrome-layer command.
    pub fn push_chrome_command(&mut self, cmd: DrawCommand) {
        self.chrome_commands.push(cmd);
    }

    /// Iterate content then chrome commands.
    pub fn commands(&self) -> impl Iterator<Item = &DrawCommand> + '_ {
        self.content_commands
            .iter()
            .chain(self.chrome_commands.iter())
    }

    /// Iterate text commands in the content layer.
    pub fn text_commands(&self) -> impl Iterator<Item = &TextCommand> + '_ {
        self.content_commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text(text) => Some(text),
            _ => None,
        })
    }

    /// True when neither layer holds commands.
    pub fn is_empty(&self) -> bool {
        self.content_commands.is_empty() && self.chrome_commands.is_empty()
    }
}

/// Document draw commands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Draw text.
    Text(TextCommand),
    /// Draw a horizontal rule (underline or separator).
    Rule(RuleCommand),
    /// Draw page chrome.
    PageChrome(PageChromeCommand),
}

/// Text draw command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextCommand {
    /// Left x.
    pub x: f32,
    /// Baseline y.
    pub baseline_y: f32,
    /// Content.
    pub text: String,
    /// Face and decoration flags.
    pub style: StyleFlags,
    /// Font size.
    pub font_size: f32,
    /// Fill color.
    pub color: Rgb,
}

/// Horizontal rule command.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleCommand {
    /// Start x.
    pub x: f32,
    /// Start y.
    pub y: f32,
    /// Length.
    pub length: f32,
    /// Stroke thickness.
    pub thickness: f32,
    /// Stroke color.
    pub color: Rgb,
}

/// Page-level chrome text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageChromeCommand {
    /// Semantic chrome kind.
    pub kind: PageChromeKind,
    /// Text payload.
    pub text: String,
    /// Left x.
    pub x: f32,
    /// Baseline y.
    pub baseline_y: f32,
    /// Face flags.
    pub style: StyleFlags,
    /// Font size.
    pub font_size: f32,
    /// Fill color.
    pub color: Rgb,
}

/// Kind of page-level chrome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageChromeKind {
    /// Header marker.
    Header,
    /// Footer marker.
    Footer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_moves_to_next_page_only_before_placement() {
        let mut cursor = LayoutCursor::new(100.0, 10.0);
        assert_eq!(cursor.place(30.0), (0, 10.0));
        assert_eq!(cursor.place(30.0), (0, 40.0));
        assert_eq!(cursor.place(30.0), (0, 70.0));
        assert_eq!(cursor.y, 100.0);
        assert_eq!(cursor.place(30.0), (1, 10.0));
    }

    #[test]
    fn fresh_page_drops_spacing_past_limit() {
        let mut cursor = LayoutCursor::new(100.0, 10.0);
        cursor.advance(200.0);
        assert!(!cursor.is_occupied());
        assert_eq!(cursor.place(10.0), (0, 10.0));
        assert_eq!(cursor.y, 20.0);

        let mut within = LayoutCursor::new(100.0, 10.0);
        within.advance(50.0);
        assert_eq!(within.place(10.0), (0, 60.0));
    }

    #[test]
    fn reserved_space_counts_as_occupied() {
        let mut cursor = LayoutCursor::new(100.0, 10.0).reserve(85.0);
        assert!(cursor.is_occupied());
        assert_eq!(cursor.place(10.0), (1, 10.0));
    }

    #[test]
    fn render_page_new_defers_vector_allocations() {
        let page = RenderPage::new(1);
        assert_eq!(page.content_commands.capacity(), 0);
        assert_eq!(page.chrome_commands.capacity(), 0);
        assert!(page.is_empty());
    }

    #[test]
    fn rgb_hex_is_lowercase_padded() {
        assert_eq!(Rgb::new(20, 184, 166).to_hex(), "#14b8a6");
        assert_eq!(Rgb::gray(4).to_hex(), "#040404");
    }
}
