use std::env;
use std::path::Path;
use std::process::ExitCode;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use routine_report_render::{DocumentConfig, ReportDocument, ReportMeta, ReportRenderer};
use routine_report_render_web::{escape_html, render_html, ScreenRenderer, ScreenTheme};
use serde::{Deserialize, Serialize};

const DEFAULT_OUT_PATH: &str = "target/report-preview/index.html";

#[derive(Clone, Debug)]
struct Args {
    input_path: String,
    out_path: String,
    config_path: Option<String>,
    width: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct PreviewField {
    label: String,
    value: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct PreviewConfig {
    screen_width: f32,
    title: String,
    fields: Vec<PreviewField>,
    extra_lines: Vec<String>,
    footer: Option<String>,
    page_width: f32,
    page_height: f32,
    margin: f32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        let doc = DocumentConfig::a4();
        let meta = ReportMeta::default();
        Self {
            screen_width: ScreenTheme::default().width,
            title: meta.title,
            fields: Vec::new(),
            extra_lines: Vec::new(),
            footer: None,
            page_width: doc.page_width,
            page_height: doc.page_height(),
            margin: doc.margin(),
        }
    }
}

impl PreviewConfig {
    fn load(path: &str) -> Result<Self, String> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config '{}': {}", path, e))?;
        serde_json::from_str(&raw).map_err(|e| format!("invalid config '{}': {}", path, e))
    }

    fn normalized(mut self) -> Self {
        self.screen_width = self.screen_width.clamp(120.0, 4096.0);
        self.page_width = self.page_width.clamp(50.0, 2000.0);
        self.page_height = self.page_height.clamp(50.0, 4000.0);
        self.margin = self
            .margin
            .clamp(0.0, (self.page_width / 2.0 - 1.0).min(self.page_height / 2.0 - 1.0));
        self
    }

    fn screen_theme(&self) -> ScreenTheme {
        ScreenTheme {
            width: self.screen_width,
            ..ScreenTheme::default()
        }
    }

    fn document_config(&self) -> DocumentConfig {
        let mut cfg = DocumentConfig::a4();
        cfg.page_width = self.page_width;
        cfg.layout.page_height = self.page_height;
        cfg.layout.margin = self.margin;
        cfg
    }

    fn report_meta(&self) -> ReportMeta {
        let mut meta = ReportMeta::new(self.title.clone());
        for field in &self.fields {
            meta = meta.field(field.label.clone(), field.value.clone());
        }
        for line in &self.extra_lines {
            meta = meta.line(line.clone());
        }
        if let Some(footer) = &self.footer {
            meta = meta.footer(footer.clone());
        }
        meta
    }
}

fn main() -> ExitCode {
    match run(env::args().collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("error: {}", msg);
            eprintln!("{}", help_text());
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), String> {
    let cli = parse_args(args)?;
    let mut cfg = match &cli.config_path {
        Some(path) => PreviewConfig::load(path)?,
        None => PreviewConfig::default(),
    };
    if let Some(width) = cli.width {
        cfg.screen_width = width;
    }
    let cfg = cfg.normalized();

    let text = std::fs::read_to_string(&cli.input_path)
        .map_err(|e| format!("failed to read '{}': {}", cli.input_path, e))?;

    let nodes = ScreenRenderer::new(cfg.screen_theme())
        .render(&text)
        .map_err(|e| e.to_string())?;
    let document = ReportRenderer::new(cfg.document_config())
        .render(&cfg.report_meta(), &text)
        .map_err(|e| e.to_string())?;

    if cli.out_path.is_empty() {
        return Err("--out must not be empty".to_string());
    }
    if let Some(parent) = Path::new(&cli.out_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
    }
    let html = build_html(&cfg, &render_html(&nodes), &document)?;
    std::fs::write(&cli.out_path, html).map_err(|e| e.to_string())?;

    println!(
        "wrote report preview to {} (nodes={}, pages={})",
        cli.out_path,
        nodes.len(),
        document.page_count()
    );
    Ok(())
}

fn build_html(cfg: &PreviewConfig, body: &str, document: &ReportDocument) -> Result<String, String> {
    let json = document.to_json().map_err(|e| e.to_string())?;
    let bytes = document.to_bytes().map_err(|e| e.to_string())?;
    let json_href = format!("data:application/json;base64,{}", BASE64.encode(json));
    let bin_href = format!(
        "data:application/octet-stream;base64,{}",
        BASE64.encode(bytes)
    );
    let title = escape_html(&cfg.title);
    Ok(format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: system-ui, sans-serif; background: #f5f7fa; margin: 0; }}
main {{ max-width: {width}px; margin: 32px auto; padding: 24px; background: #fff; border-radius: 8px; }}
.visual-line {{ white-space: pre; }}
.downloads {{ margin-top: 24px; font-size: 14px; }}
</style>
</head>
<body>
<main>
<h1>{title}</h1>
{body}<div class="downloads">
<a download="routine-report.json" href="{json_href}">Download report</a>
| <a download="routine-report.bin" href="{bin_href}">binary</a>
| {pages} page(s)
</div>
</main>
</body>
</html>
"#,
        title = title,
        width = cfg.screen_width,
        body = body,
        json_href = json_href,
        bin_href = bin_href,
        pages = document.page_count(),
    ))
}

fn parse_args(args: Vec<String>) -> Result<Args, String> {
    if args.len() >= 2 && (args[1] == "--help" || args[1] == "-h") {
        return Err("help requested".to_string());
    }
    let input_path = match args.get(1) {
        Some(path) if !path.starts_with("--") => path.clone(),
        _ => return Err("missing input text path".to_string()),
    };

    let mut cfg = Args {
        input_path,
        out_path: DEFAULT_OUT_PATH.to_string(),
        config_path: None,
        width: None,
    };

    let mut i = 2usize;
    while i < args.len() {
        match args[i].as_str() {
            "--out" => {
                let v = args
                    .get(i + 1)
                    .ok_or_else(|| "--out requires a value".to_string())?;
                cfg.out_path = v.clone();
                i += 2;
            }
            "--config" => {
                let v = args
                    .get(i + 1)
                    .ok_or_else(|| "--config requires a value".to_string())?;
                cfg.config_path = Some(v.clone());
                i += 2;
            }
            "--width" => {
                let v = args
                    .get(i + 1)
                    .ok_or_else(|| "--width requires a value".to_string())?;
                cfg.width = Some(
                    v.parse::<f32>()
                        .map_err(|_| format!("invalid --width value '{}'", v))?,
                );
                i += 2;
            }
            other => return Err(format!("unknown argument '{}'", other)),
        }
    }
    Ok(cfg)
}

fn help_text() -> &'static str {
    r#"report-preview - render a routine text file to a styled HTML preview

USAGE:
  cargo run -p routine-report-render-web --bin report-preview -- <input.txt> [options]

OPTIONS:
  --out <file>       output HTML path (default: target/report-preview/index.html)
  --config <file>    JSON preview config (title, fields, extra_lines, footer,
                     screen_width, page_width, page_height, margin)
  --width <px>       screen wrap width, overrides the config (default: 640)
"#
}
