//! Command handlers.

use super::{Cli, Commands};
use crate::{Toolsmith, ToolsmithConfig};
use anyhow::{Context, bail};
use std::fmt::Write;
use std::path::Path;
use std::process::ExitCode;
use toolsmith_core::{GenerationOutcome, ImagePayload, ToolInputs};
use toolsmith_pipeline::{FieldKind, ToolCatalog, ToolSpec};
use tracing::{debug, instrument};

/// Renders the catalog grouped by category.
pub fn format_catalog(catalog: &ToolCatalog, category: Option<&str>) -> String {
    let mut out = String::new();
    for name in catalog.categories() {
        if category.is_some_and(|c| !c.eq_ignore_ascii_case(name)) {
            continue;
        }
        let _ = writeln!(out, "{}", name);
        for tool in catalog.in_category(name) {
            let cost = match *tool.credit_cost() {
                0 => "free".to_string(),
                1 => "1 credit".to_string(),
                n => format!("{} credits", n),
            };
            let _ = writeln!(out, "  {:<24} {} ({})", tool.id(), tool.name(), cost);
        }
    }
    out
}

/// Renders a tool's description and fields.
pub fn describe_tool(tool: &ToolSpec) -> String {
    let mut out = format!("{}\n{}\n\n", tool.name(), tool.description());
    for field in tool.fields() {
        let kind = match field.kind() {
            FieldKind::Text => "text".to_string(),
            FieldKind::TextArea => "long text".to_string(),
            FieldKind::Checkbox => "true/false".to_string(),
            FieldKind::Select(options) => options.join(" | "),
        };
        let marker = if *field.required() { "*" } else { " " };
        let _ = writeln!(
            out,
            "{} -i {}=...  {} [{}]",
            marker,
            field.name(),
            field.label(),
            kind
        );
    }
    let _ = writeln!(out, "\nImages: {}  Output: {}", tool.image(), tool.output_format());
    out
}

/// MIME type for an image file, from its extension.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// Reads an image file into a payload.
///
/// # Errors
///
/// Returns an error for unreadable files or unknown extensions.
pub async fn load_image(path: &Path) -> anyhow::Result<ImagePayload> {
    let Some(mime) = mime_for_path(path) else {
        bail!("Unsupported image type: {}", path.display());
    };
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    debug!(bytes = bytes.len(), mime, "Image loaded");
    Ok(ImagePayload::from_bytes(mime, &bytes))
}

fn report(outcome: &GenerationOutcome) -> ExitCode {
    match outcome {
        GenerationOutcome::Success { payload } => {
            println!("{}", payload);
            ExitCode::SUCCESS
        }
        GenerationOutcome::Failure { reason, message } => {
            eprintln!("{} error: {}", reason, message);
            ExitCode::FAILURE
        }
    }
}

const WELCOME: &str = "Welcome to Toolsmith! Local tools are free and AI tools spend \
credits. Run `toolsmith list` to see everything available.";

/// Executes a parsed command line.
///
/// # Errors
///
/// Returns an error if configuration, state or an input file cannot be loaded.
#[instrument(skip_all)]
pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = ToolsmithConfig::load(cli.config.as_deref())?;
    debug!(?config, "Configuration loaded");

    match cli.command {
        Commands::List { category } => {
            print!("{}", format_catalog(&ToolCatalog::builtin(), category.as_deref()));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Describe { tool } => {
            let catalog = ToolCatalog::builtin();
            let Some(spec) = catalog.get(&tool) else {
                bail!("Unknown tool: {}", tool);
            };
            print!("{}", describe_tool(spec));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Run {
            tool,
            inputs,
            image,
            account,
        } => {
            let image = match image {
                Some(path) => Some(load_image(&path).await?),
                None => None,
            };
            let app = Toolsmith::from_config(&config, &account).await?;
            if app.take_welcome().await? {
                eprintln!("{}", WELCOME);
            }
            let inputs: ToolInputs = inputs.into_iter().collect();
            let submission = app.run_tool(&tool, inputs, image).await;
            let code = report(submission.outcome());
            if let Ok(balance) = app.balance().await {
                eprintln!("Credits remaining: {}", balance);
            }
            Ok(code)
        }
        Commands::Prompt { prompt, mode } => {
            let app = Toolsmith::from_config(&config, "local").await?;
            Ok(report(&app.run_prompt(&prompt, mode).await))
        }
        Commands::Transform { tag, params } => {
            println!("{}", toolsmith_transform::execute(&tag, &params));
            Ok(ExitCode::SUCCESS)
        }
    }
}
