//! Render IR, layout engine, and paginated report renderer for `routine-report`.

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

mod render_engine;
mod render_ir;
mod render_layout;

pub use render_engine::{
    DocumentConfig, ReportDocument, ReportError, ReportMeta, ReportRenderer, TextBlockStyle,
};
pub use render_ir::{
    DrawCommand, LayoutCursor, LayoutPage, PageChromeCommand, PageChromeKind, PlacedFragment,
    RenderPage, Rgb, RuleCommand, TextCommand, VisualLine,
};
pub use render_layout::{
    ClassStyle, ClassStyles, HeuristicMeasurer, LayoutConfig, LayoutEngine, LayoutError,
    TextMeasurer, VisualLines, POINTS_TO_MM,
};
pub use routine_report::{LineClass, StyleFlags, StyleKind};
