//! embedded-graphics renderer for `routine-report-render` pages.

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

use embedded_graphics::{
    mono_font::{
        ascii::{
            FONT_10X20, FONT_6X13_BOLD, FONT_6X13_ITALIC, FONT_6X9, FONT_7X13_ITALIC, FONT_7X14,
            FONT_7X14_BOLD, FONT_8X13, FONT_8X13_BOLD, FONT_8X13_ITALIC, FONT_9X18,
            FONT_9X18_BOLD,
        },
        MonoFont, MonoTextStyle,
    },
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Line, PrimitiveStyle},
    text::{Baseline, Text},
};
use routine_report::StyleFlags;
use routine_report_render::{
    DrawCommand, PageChromeCommand, RenderPage, Rgb, RuleCommand, TextCommand,
};
use std::borrow::Cow;
use std::sync::Arc;

/// Backend-local font identifier used for metrics and rasterization dispatch.
pub type FontId = u8;

/// Why style-to-font mapping had to fall back to another face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontFallbackReason {
    /// No face for this weight/slant combination at the requested size.
    UnsupportedFace,
    /// Font id outside the backend's table.
    UnknownFontId,
}

/// Resolved font selection for a text style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontSelection {
    pub font_id: FontId,
    pub fallback_reason: Option<FontFallbackReason>,
}

/// Backend-provided metrics for a specific font id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontMetrics {
    pub char_width: i32,
    pub line_height: i32,
}

/// Font abstraction used by the renderer's text paths.
pub trait FontBackend {
    /// Pick a face for `style` at a pixel size.
    fn resolve_font(&self, style: StyleFlags, size_px: f32) -> FontSelection;
    /// Metrics for a resolved face.
    fn metrics(&self, font_id: FontId) -> FontMetrics;
    /// Draw `text` with its baseline at `origin`. Returns the advance in pixels.
    fn draw_text_run<D>(
        &self,
        display: &mut D,
        font_id: FontId,
        text: &str,
        origin: Point,
        color: BinaryColor,
    ) -> Result<i32, D::Error>
    where
        D: DrawTarget<Color = BinaryColor>;
}

/// Conversion from document units to display pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EgScale {
    /// Pixels per geometry unit (x, y, widths).
    pub px_per_unit: f32,
    /// Pixels per font-size unit.
    pub px_per_font_unit: f32,
}

impl EgScale {
    /// One pixel per unit for both geometry and font sizes.
    pub const IDENTITY: Self = Self {
        px_per_unit: 1.0,
        px_per_font_unit: 1.0,
    };

    /// Fit a page of `page_width` units onto `display_width` pixels.
    ///
    /// `font_unit_scale` is the geometry units per font-size unit, as in
    /// `LayoutConfig::font_unit_scale`.
    pub fn fit_width(page_width: f32, display_width: u32, font_unit_scale: f32) -> Self {
        if !(page_width.is_finite() && page_width > 0.0) {
            log::warn!("cannot fit page width {} to display, using identity scale", page_width);
            return Self::IDENTITY;
        }
        let px_per_unit = display_width as f32 / page_width;
        Self {
            px_per_unit,
            px_per_font_unit: px_per_unit * font_unit_scale,
        }
    }

    fn px(&self, value: f32) -> i32 {
        (value * self.px_per_unit).round() as i32
    }

    fn font_px(&self, font_size: f32) -> f32 {
        font_size * self.px_per_font_unit
    }
}

impl Default for EgScale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// `TextMeasurer` adapter backed by this crate's `FontBackend` metrics.
///
/// Installing it on the layout engine makes wrap decisions match what the
/// renderer actually draws.
#[derive(Clone, Debug)]
pub struct EgTextMeasurer<B = MonoFontBackend> {
    backend: B,
    scale: EgScale,
}

impl EgTextMeasurer<MonoFontBackend> {
    /// Mono-backend measurer with identity scale.
    pub fn new() -> Self {
        Self::with_scale(EgScale::IDENTITY)
    }

    /// Mono-backend measurer for a display scale.
    pub fn with_scale(scale: EgScale) -> Self {
        Self {
            backend: MonoFontBackend,
            scale,
        }
    }

    /// Create a shared measurer trait object for engine wiring.
    pub fn shared(scale: EgScale) -> Arc<dyn routine_report_render::TextMeasurer> {
        Arc::new(Self::with_scale(scale))
    }
}

impl Default for EgTextMeasurer<MonoFontBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> EgTextMeasurer<B>
where
    B: FontBackend,
{
    /// Create a measurer using an explicit backend.
    pub fn with_backend(backend: B, scale: EgScale) -> Self {
        Self { backend, scale }
    }
}

impl<B> routine_report_render::TextMeasurer for EgTextMeasurer<B>
where
    B: FontBackend + Send + Sync,
{
    fn measure_text(&self, text: &str, style: StyleFlags, font_size: f32) -> f32 {
        let selection = self
            .backend
            .resolve_font(style, self.scale.font_px(font_size));
        let metrics = self.backend.metrics(selection.font_id);
        let chars = normalize_text_for_mono(text).chars().count() as i32;
        let width_px = (chars * metrics.char_width).max(0) as f32;
        if self.scale.px_per_unit > 0.0 {
            width_px / self.scale.px_per_unit
        } else {
            width_px
        }
    }
}

/// Mono-font backend over the embedded-graphics ASCII fonts.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonoFontBackend;

impl MonoFontBackend {
    const SIZE_SMALL: FontId = 0;
    const SIZE_MEDIUM: FontId = 1;
    const SIZE_LARGE: FontId = 2;
    const SIZE_XL: FontId = 3;

    const VARIANT_REGULAR: FontId = 0;
    const VARIANT_ITALIC: FontId = 1;
    const VARIANT_BOLD: FontId = 2;
    const VARIANT_BOLD_ITALIC: FontId = 3;

    fn encode_font_id(size_bucket: FontId, variant: FontId) -> FontId {
        (size_bucket << 2) | (variant & 0x03)
    }

    fn decode_font_id(font_id: FontId) -> (FontId, FontId) {
        (font_id >> 2, font_id & 0x03)
    }

    fn size_bucket_for(size_px: f32) -> FontId {
        if size_px >= 24.0 {
            Self::SIZE_XL
        } else if size_px >= 20.0 {
            Self::SIZE_LARGE
        } else if size_px >= 16.0 {
            Self::SIZE_MEDIUM
        } else {
            Self::SIZE_SMALL
        }
    }

    fn style_variant_for(style: StyleFlags) -> FontId {
        match (style.bold, style.italic) {
            (true, true) => Self::VARIANT_BOLD_ITALIC,
            (true, false) => Self::VARIANT_BOLD,
            (false, true) => Self::VARIANT_ITALIC,
            (false, false) => Self::VARIANT_REGULAR,
        }
    }

    fn font_for(font_id: FontId) -> (&'static MonoFont<'static>, Option<FontFallbackReason>) {
        let unsupported = Some(FontFallbackReason::UnsupportedFace);
        let (size_bucket, variant) = Self::decode_font_id(font_id);
        match (size_bucket, variant) {
            (Self::SIZE_SMALL, Self::VARIANT_REGULAR) => (&FONT_6X9, None),
            (Self::SIZE_SMALL, Self::VARIANT_ITALIC) => (&FONT_6X13_ITALIC, None),
            (Self::SIZE_SMALL, Self::VARIANT_BOLD) => (&FONT_6X13_BOLD, None),
            (Self::SIZE_SMALL, Self::VARIANT_BOLD_ITALIC) => (&FONT_6X13_BOLD, unsupported),
            (Self::SIZE_MEDIUM, Self::VARIANT_REGULAR) => (&FONT_7X14, None),
            (Self::SIZE_MEDIUM, Self::VARIANT_ITALIC) => (&FONT_7X13_ITALIC, None),
            (Self::SIZE_MEDIUM, Self::VARIANT_BOLD) => (&FONT_7X14_BOLD, None),
            (Self::SIZE_MEDIUM, Self::VARIANT_BOLD_ITALIC) => (&FONT_7X14_BOLD, unsupported),
            (Self::SIZE_LARGE, Self::VARIANT_REGULAR) => (&FONT_8X13, None),
            (Self::SIZE_LARGE, Self::VARIANT_ITALIC) => (&FONT_8X13_ITALIC, None),
            (Self::SIZE_LARGE, Self::VARIANT_BOLD) => (&FONT_8X13_BOLD, None),
            (Self::SIZE_LARGE, Self::VARIANT_BOLD_ITALIC) => (&FONT_8X13_BOLD, unsupported),
            (Self::SIZE_XL, Self::VARIANT_REGULAR) => (&FONT_10X20, None),
            (Self::SIZE_XL, Self::VARIANT_ITALIC) => (&FONT_9X18, unsupported),
            (Self::SIZE_XL, Self::VARIANT_BOLD) => (&FONT_9X18_BOLD, None),
            (Self::SIZE_XL, Self::VARIANT_BOLD_ITALIC) => (&FONT_9X18_BOLD, unsupported),
            _ => (&FONT_8X13, Some(FontFallbackReason::UnknownFontId)),
        }
    }
}

impl FontBackend for MonoFontBackend {
    fn resolve_font(&self, style: StyleFlags, size_px: f32) -> FontSelection {
        let font_id =
            Self::encode_font_id(Self::size_bucket_for(size_px), Self::style_variant_for(style));
        let (_, fallback_reason) = Self::font_for(font_id);
        FontSelection {
            font_id,
            fallback_reason,
        }
    }

    fn metrics(&self, font_id: FontId) -> FontMetrics {
        let (font, _) = Self::font_for(font_id);
        FontMetrics {
            char_width: font.character_size.width as i32,
            line_height: font.character_size.height as i32,
        }
    }

    fn draw_text_run<D>(
        &self,
        display: &mut D,
        font_id: FontId,
        text: &str,
        origin: Point,
        color: BinaryColor,
    ) -> Result<i32, D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let (font, _) = Self::font_for(font_id);
        let style = MonoTextStyle::new(font, color);
        let normalized = normalize_text_for_mono(text);
        Text::with_baseline(normalized.as_ref(), origin, style, Baseline::Alphabetic)
            .draw(display)?;
        Ok((normalized.chars().count() as i32) * (font.character_size.width as i32))
    }
}

/// Replace typographic characters the ASCII mono fonts cannot draw.
fn normalize_text_for_mono(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{00A0}' => out.push(' '),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2022}' => out.push('*'),
            '\u{2026}' => out.push_str("..."),
            other if other.is_ascii() => out.push(other),
            _ => out.push('?'),
        }
    }
    Cow::Owned(out)
}

/// Binary ink for an RGB color: anything darker than white is drawn.
fn ink_for(color: Rgb) -> BinaryColor {
    if color == Rgb::new(255, 255, 255) {
        BinaryColor::Off
    } else {
        BinaryColor::On
    }
}

/// embedded-graphics backend configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EgRenderConfig {
    /// Clear display before drawing page.
    pub clear_first: bool,
    /// Draw chrome-layer commands such as the footer.
    pub chrome_enabled: bool,
    /// Document-to-pixel conversion.
    pub scale: EgScale,
}

impl Default for EgRenderConfig {
    fn default() -> Self {
        Self {
            clear_first: true,
            chrome_enabled: true,
            scale: EgScale::IDENTITY,
        }
    }
}

/// Counters collected while executing one page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EgRenderDiagnostics {
    pub text_draws: u64,
    pub rule_draws: u64,
    pub chrome_draws: u64,
    pub text_fallbacks: u64,
}

/// Draw-command executor for embedded-graphics targets.
#[derive(Clone, Debug)]
pub struct EgRenderer<B = MonoFontBackend> {
    cfg: EgRenderConfig,
    backend: B,
}

impl Default for EgRenderer<MonoFontBackend> {
    fn default() -> Self {
        Self::new(EgRenderConfig::default())
    }
}

impl EgRenderer<MonoFontBackend> {
    /// Create renderer with config.
    pub fn new(cfg: EgRenderConfig) -> Self {
        Self {
            cfg,
            backend: MonoFontBackend,
        }
    }
}

impl<B> EgRenderer<B>
where
    B: FontBackend,
{
    /// Create renderer with config and backend.
    pub fn with_backend(cfg: EgRenderConfig, backend: B) -> Self {
        Self { cfg, backend }
    }

    /// Active configuration.
    pub fn config(&self) -> &EgRenderConfig {
        &self.cfg
    }

    /// Render a page to a draw target.
    pub fn render_page<D>(&self, page: &RenderPage, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        self.render_page_with_diagnostics(page, display).map(|_| ())
    }

    /// Render a page and return draw counters.
    pub fn render_page_with_diagnostics<D>(
        &self,
        page: &RenderPage,
        display: &mut D,
    ) -> Result<EgRenderDiagnostics, D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let mut diagnostics = EgRenderDiagnostics::default();
        if self.cfg.clear_first {
            display.clear(BinaryColor::Off)?;
        }
        for cmd in &page.content_commands {
            self.draw_command(display, cmd, &mut diagnostics)?;
        }
        if self.cfg.chrome_enabled {
            for cmd in &page.chrome_commands {
                self.draw_command(display, cmd, &mut diagnostics)?;
            }
        }
        if diagnostics.text_fallbacks > 0 {
            log::debug!(
                "page {}: {} text commands used a fallback face",
                page.page_number,
                diagnostics.text_fallbacks
            );
        }
        Ok(diagnostics)
    }

    fn draw_command<D>(
        &self,
        display: &mut D,
        cmd: &DrawCommand,
        diagnostics: &mut EgRenderDiagnostics,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        match cmd {
            DrawCommand::Text(text) => self.draw_text(display, text, diagnostics),
            DrawCommand::Rule(rule) => self.draw_rule(display, rule, diagnostics),
            DrawCommand::PageChrome(chrome) => self.draw_page_chrome(display, chrome, diagnostics),
        }
    }

    fn draw_text<D>(
        &self,
        display: &mut D,
        cmd: &TextCommand,
        diagnostics: &mut EgRenderDiagnostics,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        diagnostics.text_draws += 1;
        self.draw_run(
            display,
            &cmd.text,
            cmd.style,
            cmd.font_size,
            (cmd.x, cmd.baseline_y),
            cmd.color,
            diagnostics,
        )
    }

    fn draw_page_chrome<D>(
        &self,
        display: &mut D,
        chrome: &PageChromeCommand,
        diagnostics: &mut EgRenderDiagnostics,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        diagnostics.chrome_draws += 1;
        self.draw_run(
            display,
            &chrome.text,
            chrome.style,
            chrome.font_size,
            (chrome.x, chrome.baseline_y),
            chrome.color,
            diagnostics,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_run<D>(
        &self,
        display: &mut D,
        text: &str,
        style: StyleFlags,
        font_size: f32,
        (x, baseline_y): (f32, f32),
        color: Rgb,
        diagnostics: &mut EgRenderDiagnostics,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let scale = self.cfg.scale;
        let selection = self.backend.resolve_font(style, scale.font_px(font_size));
        if selection.fallback_reason.is_some() {
            diagnostics.text_fallbacks += 1;
        }
        let origin = Point::new(scale.px(x), scale.px(baseline_y));
        self.backend
            .draw_text_run(display, selection.font_id, text, origin, ink_for(color))?;
        Ok(())
    }

    fn draw_rule<D>(
        &self,
        display: &mut D,
        rule: &RuleCommand,
        diagnostics: &mut EgRenderDiagnostics,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let scale = self.cfg.scale;
        let length = scale.px(rule.length);
        if length <= 0 {
            return Ok(());
        }
        diagnostics.rule_draws += 1;
        let thickness = scale.px(rule.thickness).max(1) as u32;
        let start = Point::new(scale.px(rule.x), scale.px(rule.y));
        Line::new(start, start + Point::new(length - 1, 0))
            .into_styled(PrimitiveStyle::with_stroke(ink_for(rule.color), thickness))
            .draw(display)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use routine_report_render::{PageChromeKind, TextMeasurer};

    #[derive(Default)]
    struct PixelCaptureDisplay {
        size: Size,
        on_pixels: Vec<Point>,
    }

    impl PixelCaptureDisplay {
        fn with_size(width: u32, height: u32) -> Self {
            Self {
                size: Size::new(width, height),
                on_pixels: Vec::new(),
            }
        }
    }

    impl OriginDimensions for PixelCaptureDisplay {
        fn size(&self) -> Size {
            self.size
        }
    }

    impl DrawTarget for PixelCaptureDisplay {
        type Color = BinaryColor;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, color) in pixels {
                if color == BinaryColor::On {
                    self.on_pixels.push(point);
                }
            }
            Ok(())
        }
    }

    fn text(x: f32, baseline_y: f32, text: &str, style: StyleFlags) -> DrawCommand {
        DrawCommand::Text(TextCommand {
            x,
            baseline_y,
            text: text.to_string(),
            style,
            font_size: 10.0,
            color: Rgb::gray(60),
        })
    }

    fn page(content: Vec<DrawCommand>, chrome: Vec<DrawCommand>) -> RenderPage {
        RenderPage {
            content_commands: content,
            chrome_commands: chrome,
            ..RenderPage::new(1)
        }
    }

    #[test]
    fn text_measurer_uses_backend_metrics_for_width_estimate() {
        let measurer = EgTextMeasurer::new();
        // FONT_6X9 for small regular text.
        assert_eq!(measurer.measure_text("aa a", StyleFlags::PLAIN, 10.0), 24.0);
        // FONT_7X14_BOLD in the medium bucket.
        assert_eq!(measurer.measure_text("ab", StyleFlags::BOLD, 16.0), 14.0);
        assert_eq!(measurer.measure_text("", StyleFlags::ITALIC, 10.0), 0.0);
    }

    #[test]
    fn scaled_measurer_reports_document_units() {
        let scale = EgScale {
            px_per_unit: 2.0,
            px_per_font_unit: 1.0,
        };
        let measurer = EgTextMeasurer::with_scale(scale);
        assert_eq!(measurer.measure_text("abcd", StyleFlags::PLAIN, 10.0), 12.0);
    }

    #[test]
    fn fit_width_maps_page_onto_display() {
        let scale = EgScale::fit_width(200.0, 800, 0.5);
        assert_eq!(scale.px_per_unit, 4.0);
        assert_eq!(scale.px_per_font_unit, 2.0);
        assert_eq!(EgScale::fit_width(0.0, 800, 1.0), EgScale::IDENTITY);
    }

    #[test]
    fn text_is_drawn_above_its_baseline() {
        let mut display = PixelCaptureDisplay::with_size(200, 100);
        let renderer = EgRenderer::default();
        let page = page(vec![text(10.0, 40.0, "Hello", StyleFlags::PLAIN)], vec![]);
        let diagnostics = renderer
            .render_page_with_diagnostics(&page, &mut display)
            .unwrap();
        assert_eq!(diagnostics.text_draws, 1);
        assert!(!display.on_pixels.is_empty());
        assert!(display.on_pixels.iter().all(|p| p.y > 30 && p.y < 44));
        assert!(display.on_pixels.iter().all(|p| p.x >= 10 && p.x < 40));
    }

    #[test]
    fn rule_draws_horizontal_line_of_scaled_length() {
        let mut display = PixelCaptureDisplay::with_size(200, 100);
        let renderer = EgRenderer::new(EgRenderConfig {
            scale: EgScale {
                px_per_unit: 2.0,
                px_per_font_unit: 2.0,
            },
            ..EgRenderConfig::default()
        });
        let rule = DrawCommand::Rule(RuleCommand {
            x: 5.0,
            y: 10.0,
            length: 20.0,
            thickness: 0.2,
            color: Rgb::gray(200),
        });
        renderer.render_page(&page(vec![rule], vec![]), &mut display).unwrap();
        assert_eq!(display.on_pixels.len(), 40);
        assert!(display.on_pixels.iter().all(|p| p.y == 20));
        let min_x = display.on_pixels.iter().map(|p| p.x).min().unwrap();
        let max_x = display.on_pixels.iter().map(|p| p.x).max().unwrap();
        assert_eq!((min_x, max_x), (10, 49));
    }

    #[test]
    fn chrome_can_be_suppressed() {
        let footer = DrawCommand::PageChrome(PageChromeCommand {
            kind: PageChromeKind::Footer,
            text: "Generated".to_string(),
            x: 10.0,
            baseline_y: 90.0,
            style: StyleFlags::ITALIC,
            font_size: 8.0,
            color: Rgb::gray(120),
        });
        let page = page(vec![], vec![footer]);

        let mut drawn = PixelCaptureDisplay::with_size(200, 100);
        let diagnostics = EgRenderer::default()
            .render_page_with_diagnostics(&page, &mut drawn)
            .unwrap();
        assert_eq!(diagnostics.chrome_draws, 1);
        assert!(!drawn.on_pixels.is_empty());

        let mut suppressed = PixelCaptureDisplay::with_size(200, 100);
        EgRenderer::new(EgRenderConfig {
            chrome_enabled: false,
            ..EgRenderConfig::default()
        })
        .render_page(&page, &mut suppressed)
        .unwrap();
        assert!(suppressed.on_pixels.is_empty());
    }

    #[test]
    fn bold_italic_is_counted_as_fallback() {
        let mut display = PixelCaptureDisplay::with_size(200, 100);
        let both = StyleFlags::BOLD.union(StyleFlags::ITALIC);
        let page = page(
            vec![
                text(0.0, 20.0, "a", both),
                text(0.0, 40.0, "b", StyleFlags::BOLD),
            ],
            vec![],
        );
        let diagnostics = EgRenderer::default()
            .render_page_with_diagnostics(&page, &mut display)
            .unwrap();
        assert_eq!(diagnostics.text_draws, 2);
        assert_eq!(diagnostics.text_fallbacks, 1);
    }

    #[test]
    fn white_ink_draws_nothing() {
        let mut display = PixelCaptureDisplay::with_size(200, 100);
        let cmd = DrawCommand::Text(TextCommand {
            x: 10.0,
            baseline_y: 40.0,
            text: "Hidden".to_string(),
            style: StyleFlags::PLAIN,
            font_size: 10.0,
            color: Rgb::new(255, 255, 255),
        });
        EgRenderer::default()
            .render_page(&page(vec![cmd], vec![]), &mut display)
            .unwrap();
        assert!(display.on_pixels.is_empty());
    }

    #[test]
    fn mono_normalization_replaces_typographic_characters() {
        assert_eq!(normalize_text_for_mono("plain"), Cow::Borrowed("plain"));
        assert_eq!(
            normalize_text_for_mono("SPF\u{00A0}30 \u{2014} \u{201C}daily\u{201D}\u{2026}"),
            "SPF 30 - \"daily\"..."
        );
        assert_eq!(normalize_text_for_mono("crème"), "cr?me");
    }
}
