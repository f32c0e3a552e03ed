//! Bundled tools.

use crate::{FieldCheck, FieldSpec, ImageRequirement, OutputFormat, ToolSpec};
use toolsmith_core::{Dispatch, RemoteMode, ToolInputs};
use toolsmith_error::TemplateError;
use toolsmith_transform::{LocalCommand, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};

const DEVELOPER: &str = "Developer";
const DESIGN: &str = "Design";
const MATH: &str = "Math";
const TEXT: &str = "Text";
const WRITING: &str = "Writing";
const MARKETING: &str = "Marketing";
const IMAGE: &str = "Image";

/// Raw form value or empty string, so the engine applies its own default.
fn raw(inputs: &ToolInputs, key: &str) -> String {
    inputs.get(key).map(|v| v.as_text()).unwrap_or_default()
}

fn local(command: LocalCommand, params: Vec<String>) -> Result<Dispatch, TemplateError> {
    Ok(Dispatch::local(command.to_string(), params))
}

fn local_tools() -> Vec<ToolSpec> {
    let password_range =
        FieldCheck::IntegerRange(MIN_PASSWORD_LENGTH as i64, MAX_PASSWORD_LENGTH as i64);
    vec![
        ToolSpec::new("password-generator", "Password Generator", DEVELOPER, |inputs, _| {
            local(
                LocalCommand::Password,
                ["length", "uppercase", "lowercase", "digits", "symbols"]
                    .iter()
                    .map(|k| raw(inputs, k))
                    .collect(),
            )
        })
        .describe("Strong random passwords from the character sets you choose.")
        .field(FieldSpec::text("length", "Length").optional().check(password_range))
        .field(FieldSpec::checkbox("uppercase", "Uppercase letters"))
        .field(FieldSpec::checkbox("lowercase", "Lowercase letters"))
        .field(FieldSpec::checkbox("digits", "Numbers"))
        .field(FieldSpec::checkbox("symbols", "Symbols")),
        ToolSpec::new("uuid-generator", "UUID Generator", DEVELOPER, |inputs, _| {
            local(LocalCommand::Uuid, vec![raw(inputs, "count")])
        })
        .describe("Random version 4 UUIDs.")
        .field(
            FieldSpec::text("count", "How many")
                .optional()
                .check(FieldCheck::IntegerRange(1, 50)),
        ),
        ToolSpec::new("base64-converter", "Base64 Encoder / Decoder", DEVELOPER, |inputs, _| {
            local(LocalCommand::Base64, vec![raw(inputs, "mode"), raw(inputs, "text")])
        })
        .describe("Encode text to Base64 or decode it back.")
        .field(FieldSpec::select("mode", "Mode", &["encode", "decode"]))
        .field(FieldSpec::textarea("text", "Text")),
        ToolSpec::new("hex-to-rgb", "HEX to RGB", DESIGN, |inputs, _| {
            local(LocalCommand::HexRgb, vec![raw(inputs, "hex")])
        })
        .describe("Convert a hex color to RGB and HSL.")
        .field(FieldSpec::text("hex", "Hex color").check(FieldCheck::HexColor)),
        ToolSpec::new("rgb-to-hex", "RGB to HEX", DESIGN, |inputs, _| {
            local(
                LocalCommand::RgbHex,
                vec![raw(inputs, "red"), raw(inputs, "green"), raw(inputs, "blue")],
            )
        })
        .describe("Convert RGB channels to a hex color.")
        .field(FieldSpec::text("red", "Red").check(FieldCheck::IntegerRange(0, 255)))
        .field(FieldSpec::text("green", "Green").check(FieldCheck::IntegerRange(0, 255)))
        .field(FieldSpec::text("blue", "Blue").check(FieldCheck::IntegerRange(0, 255))),
        ToolSpec::new("percentage-calculator", "Percentage Calculator", MATH, |inputs, _| {
            local(
                LocalCommand::PercentCalc,
                vec![raw(inputs, "percent"), raw(inputs, "value")],
            )
        })
        .describe("What is X% of Y, plus increase and decrease.")
        .field(FieldSpec::text("percent", "Percentage").check(FieldCheck::Number))
        .field(FieldSpec::text("value", "Value").check(FieldCheck::Number)),
        ToolSpec::new("csv-to-json", "CSV to JSON", DEVELOPER, |inputs, _| {
            local(LocalCommand::CsvJson, vec![raw(inputs, "csv")])
        })
        .describe("Turn CSV with a header row into a JSON array.")
        .field(FieldSpec::textarea("csv", "CSV data")),
        ToolSpec::new("json-formatter", "JSON Formatter", DEVELOPER, |inputs, _| {
            local(
                LocalCommand::JsonFormat,
                vec![raw(inputs, "json"), raw(inputs, "indent")],
            )
        })
        .describe("Validate and pretty-print JSON.")
        .field(FieldSpec::textarea("json", "JSON"))
        .field(FieldSpec::select("indent", "Indent", &["2", "4"]).optional()),
        ToolSpec::new("word-counter", "Word Counter", TEXT, |inputs, _| {
            local(LocalCommand::WordCount, vec![raw(inputs, "text")])
        })
        .describe("Words, characters, sentences and reading time.")
        .field(FieldSpec::textarea("text", "Text")),
        ToolSpec::new("case-converter", "Case Converter", TEXT, |inputs, _| {
            local(
                LocalCommand::CaseConvert,
                vec![raw(inputs, "mode"), raw(inputs, "text")],
            )
        })
        .describe("UPPER, lower, Title, snake_case, kebab-case or camelCase.")
        .field(FieldSpec::select(
            "mode",
            "Case",
            &["upper", "lower", "title", "snake", "kebab", "camel"],
        ))
        .field(FieldSpec::textarea("text", "Text")),
        ToolSpec::new("slug-generator", "Slug Generator", TEXT, |inputs, _| {
            local(LocalCommand::Slugify, vec![raw(inputs, "text")])
        })
        .describe("URL-friendly slugs from titles.")
        .field(FieldSpec::text("text", "Title").check(FieldCheck::MaxLength(300))),
    ]
}

fn blog_post(inputs: &ToolInputs) -> String {
    let mut prompt = format!(
        "Write a {} blog post about \"{}\" in a {} tone. Use markdown with a title, \
         an introduction, clear section headings and a conclusion.",
        inputs.text_or("length", "medium"),
        inputs.text_or("topic", ""),
        inputs.text_or("tone", "professional"),
    );
    if let Some(keywords) = inputs.text("keywords") {
        prompt.push_str(&format!(" Naturally include these keywords: {}.", keywords));
    }
    prompt
}

fn email(inputs: &ToolInputs) -> String {
    let recipient = inputs
        .text("recipient")
        .map(|r| format!(" to {}", r))
        .unwrap_or_default();
    format!(
        "Write a {} email{}. Purpose: {}. Include a subject line, greeting, body and sign-off. \
         Return markdown.",
        inputs.text_or("tone", "professional"),
        recipient,
        inputs.text_or("purpose", ""),
    )
}

fn product_description(inputs: &ToolInputs) -> String {
    let audience = inputs
        .text("audience")
        .map(|a| format!(" aimed at {}", a))
        .unwrap_or_default();
    format!(
        "Write a persuasive product description{} for \"{}\". Key features:\n{}\n\
         Return markdown with a headline, a short paragraph and a bullet list of benefits.",
        audience,
        inputs.text_or("product", ""),
        inputs.text_or("features", ""),
    )
}

fn landing_page(inputs: &ToolInputs) -> String {
    let color = inputs
        .text("color")
        .map(|c| format!(" Use {} as the primary brand color.", c))
        .unwrap_or_default();
    format!(
        "Create a complete single-file HTML landing page with inline CSS for \"{}\". \
         About the business: {}.{} Include a hero section, features, testimonials and a \
         call to action. Return only the HTML document.",
        inputs.text_or("business", ""),
        inputs.text_or("description", ""),
        color,
    )
}

fn logo(inputs: &ToolInputs) -> String {
    let colors = inputs
        .text("colors")
        .map(|c| format!(" Color palette: {}.", c))
        .unwrap_or_default();
    format!(
        "A {} logo for a brand called \"{}\", centered on a plain background, vector style, \
         no extra text.{}",
        inputs.text_or("style", "minimalist"),
        inputs.text_or("brand", ""),
        colors,
    )
}

fn code_explainer(inputs: &ToolInputs) -> String {
    let language = inputs.text_or("language", "the detected language");
    format!(
        "Explain what the following {} code does, step by step, for an intermediate developer. \
         Point out bugs or risky patterns if you see any. Use markdown.\n\n```\n{}\n```",
        language,
        inputs.text_or("code", ""),
    )
}

fn social_caption(inputs: &ToolInputs) -> String {
    format!(
        "Write three alternative {} captions about \"{}\". Keep each within the platform's \
         usual length and add relevant hashtags. Return a markdown numbered list.",
        inputs.text_or("platform", "Instagram"),
        inputs.text_or("topic", ""),
    )
}

fn remote_tools() -> Vec<ToolSpec> {
    vec![
        ToolSpec::new("blog-post-writer", "Blog Post Writer", WRITING, |inputs, _| {
            Ok(Dispatch::remote(blog_post(inputs), RemoteMode::Text))
        })
        .describe("Full blog posts from a topic and tone.")
        .cost(2)
        .field(FieldSpec::text("topic", "Topic").check(FieldCheck::MaxLength(200)))
        .field(FieldSpec::select(
            "tone",
            "Tone",
            &["professional", "casual", "humorous", "persuasive"],
        ))
        .field(FieldSpec::select("length", "Length", &["short", "medium", "long"]).optional())
        .field(FieldSpec::text("keywords", "Keywords").optional()),
        ToolSpec::new("email-writer", "Email Writer", WRITING, |inputs, _| {
            Ok(Dispatch::remote(email(inputs), RemoteMode::Text))
        })
        .describe("Ready-to-send emails for any purpose.")
        .cost(1)
        .field(FieldSpec::textarea("purpose", "What is the email about?"))
        .field(FieldSpec::text("recipient", "Recipient").optional())
        .field(
            FieldSpec::select("tone", "Tone", &["professional", "friendly", "formal"]).optional(),
        ),
        ToolSpec::new(
            "product-description",
            "Product Description Generator",
            MARKETING,
            |inputs, _| Ok(Dispatch::remote(product_description(inputs), RemoteMode::Text)),
        )
        .describe("Conversion-focused copy for product pages.")
        .cost(1)
        .field(FieldSpec::text("product", "Product name"))
        .field(FieldSpec::textarea("features", "Key features"))
        .field(FieldSpec::text("audience", "Target audience").optional()),
        ToolSpec::new("landing-page-builder", "Landing Page Builder", MARKETING, |inputs, _| {
            Ok(Dispatch::remote(landing_page(inputs), RemoteMode::Text))
        })
        .describe("A complete HTML landing page in one click.")
        .output(OutputFormat::Html)
        .cost(3)
        .field(FieldSpec::text("business", "Business name"))
        .field(FieldSpec::textarea("description", "What does it do?"))
        .field(
            FieldSpec::text("color", "Brand color")
                .optional()
                .check(FieldCheck::HexColor),
        ),
        ToolSpec::new("logo-generator", "Logo Generator", IMAGE, |inputs, _| {
            Ok(Dispatch::remote(logo(inputs), RemoteMode::Image))
        })
        .describe("Logo concepts from a brand name and style.")
        .output(OutputFormat::Image)
        .cost(3)
        .field(FieldSpec::text("brand", "Brand name").check(FieldCheck::MaxLength(60)))
        .field(FieldSpec::select(
            "style",
            "Style",
            &["minimalist", "vintage", "playful", "geometric", "mascot"],
        ))
        .field(FieldSpec::text("colors", "Colors").optional()),
        ToolSpec::new("image-analyzer", "Image Analyzer", IMAGE, |inputs, image| {
            let question = inputs.text("question");
            match (image, question) {
                (Some(_), Some(q)) => Ok(Dispatch::remote(
                    format!("Look at the attached image and answer: {} Use markdown.", q),
                    RemoteMode::AnalyzeImage,
                )),
                (Some(_), None) => Ok(Dispatch::remote(
                    "Describe the attached image in detail: subjects, setting, colors, text \
                     and mood. Use markdown.",
                    RemoteMode::AnalyzeImage,
                )),
                (None, Some(q)) => Ok(Dispatch::remote(
                    format!("Answer this question about image analysis: {} Use markdown.", q),
                    RemoteMode::Text,
                )),
                (None, None) => Err(TemplateError::new(
                    "Please upload an image or ask a question about one",
                )),
            }
        })
        .describe("Describe an image or ask questions about it.")
        .accepts_image(ImageRequirement::Optional)
        .cost(2)
        .field(FieldSpec::textarea("question", "Question").optional()),
        ToolSpec::new("code-explainer", "Code Explainer", DEVELOPER, |inputs, _| {
            Ok(Dispatch::remote(code_explainer(inputs), RemoteMode::Text))
        })
        .describe("Plain-language walkthroughs of code snippets.")
        .cost(1)
        .field(FieldSpec::textarea("code", "Code").check(FieldCheck::MaxLength(20_000)))
        .field(
            FieldSpec::select(
                "language",
                "Language",
                &["Rust", "Python", "JavaScript", "TypeScript", "Go", "Java", "SQL"],
            )
            .optional(),
        ),
        ToolSpec::new("social-caption", "Social Media Caption", MARKETING, |inputs, _| {
            Ok(Dispatch::remote(social_caption(inputs), RemoteMode::Text))
        })
        .describe("Scroll-stopping captions with hashtags.")
        .cost(1)
        .field(FieldSpec::select(
            "platform",
            "Platform",
            &["Instagram", "LinkedIn", "X", "TikTok", "Facebook"],
        ))
        .field(FieldSpec::text("topic", "Topic")),
    ]
}

/// Every bundled tool, local ones first.
pub(super) fn tools() -> Vec<ToolSpec> {
    let mut tools = local_tools();
    tools.extend(remote_tools());
    tools
}
