//! Command-line parsing and rendering tests.

use clap::Parser;
use std::path::Path;
use toolsmith::ToolCatalog;
use toolsmith::cli::{Cli, Commands, describe_tool, format_catalog, mime_for_path, parse_input};
use toolsmith_core::{LogFormat, RemoteMode};

#[test]
fn test_run_arguments() {
    let cli = Cli::try_parse_from([
        "toolsmith",
        "run",
        "hex-to-rgb",
        "-i",
        "hex=#FF0000",
        "--input",
        "note=a=b",
        "--log-format",
        "json",
    ])
    .unwrap();
    assert_eq!(cli.log_format, LogFormat::Json);
    match cli.command {
        Commands::Run {
            tool,
            inputs,
            image,
            account,
        } => {
            assert_eq!(tool, "hex-to-rgb");
            assert_eq!(
                inputs,
                vec![
                    ("hex".to_string(), "#FF0000".to_string()),
                    ("note".to_string(), "a=b".to_string())
                ]
            );
            assert!(image.is_none());
            assert_eq!(account, "local");
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_prompt_and_transform_arguments() {
    let cli =
        Cli::try_parse_from(["toolsmith", "prompt", "draw a fox", "--mode", "image"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Prompt { mode: RemoteMode::Image, .. }
    ));

    let cli = Cli::try_parse_from(["toolsmith", "transform", "RGB_HEX", "255", "0", "0"]).unwrap();
    match cli.command {
        Commands::Transform { tag, params } => {
            assert_eq!(tag, "RGB_HEX");
            assert_eq!(params, vec!["255", "0", "0"]);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_bad_input_rejected() {
    assert!(parse_input("novalue").is_err());
    assert!(parse_input("=x").is_err());
    assert!(Cli::try_parse_from(["toolsmith", "run", "t", "-i", "broken"]).is_err());
}

#[test]
fn test_catalog_rendering() {
    let catalog = ToolCatalog::builtin();
    let all = format_catalog(&catalog, None);
    assert!(all.contains("hex-to-rgb"));
    assert!(all.contains("landing-page-builder"));
    assert!(all.contains("3 credits"));

    let design = format_catalog(&catalog, Some("design"));
    assert!(design.contains("rgb-to-hex"));
    assert!(!design.contains("blog-post-writer"));

    let described = describe_tool(catalog.get("blog-post-writer").unwrap());
    assert!(described.contains("* -i topic=..."));
    assert!(described.contains("professional | casual"));
}

#[test]
fn test_image_mime_detection() {
    assert_eq!(mime_for_path(Path::new("logo.PNG")), Some("image/png"));
    assert_eq!(mime_for_path(Path::new("a/b.jpeg")), Some("image/jpeg"));
    assert_eq!(mime_for_path(Path::new("notes.txt")), None);
    assert_eq!(mime_for_path(Path::new("noext")), None);
}
