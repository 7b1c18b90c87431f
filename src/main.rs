//! Weavr Layout CLI
//!
//! Usage:
//!   weavr-layout [OPTIONS] route [MODEL]
//!   weavr-layout [OPTIONS] visible [MODEL] --viewport X,Y,W,H
//!
//! Options:
//!   -c, --config <FILE>  Engine configuration (TOML format)
//!   -v, --verbose        Enable debug logging
//!   -h, --help           Print help

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::LevelFilter;
use serde::Serialize;

use weavr_layout::{route_diagram, visible_nodes, BoundingBox, Diagram, EngineConfig, LoadError};

#[derive(Parser)]
#[command(name = "weavr-layout")]
#[command(about = "Link routing and viewport culling for event-model diagrams")]
struct Cli {
    /// Engine configuration file (TOML format)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Route every link of a model and print the routes as JSON
    Route {
        /// Model file (reads from stdin if not provided)
        model: Option<PathBuf>,

        /// Print JSON on a single line
        #[arg(long)]
        compact: bool,
    },
    /// Print the ids of the nodes visible in a viewport as JSON
    Visible {
        /// Model file (reads from stdin if not provided)
        model: Option<PathBuf>,

        /// Viewport rectangle as X,Y,W,H
        #[arg(long, value_parser = parse_viewport, allow_hyphen_values = true)]
        viewport: BoundingBox,

        /// Margin around the viewport, overriding the configured buffer
        #[arg(long, value_parser = parse_buffer, allow_hyphen_values = true)]
        buffer: Option<f64>,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let mut config = match &cli.config {
        Some(path) => match EngineConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };

    match cli.command {
        Command::Route { model, compact } => {
            let diagram = load_or_exit(model.as_deref());
            let report = route_diagram(&diagram, &config.routing);
            for issue in &report.issues {
                eprintln!("Warning: {}", issue);
            }
            print_json(&report.routes, compact);
        }
        Command::Visible {
            model,
            viewport,
            buffer,
        } => {
            if let Some(buffer) = buffer {
                config.viewport.buffer = buffer;
            }
            let diagram = load_or_exit(model.as_deref());
            print_json(&visible_nodes(&diagram, &viewport, &config), true);
        }
    }
}

fn load_or_exit(path: Option<&Path>) -> Diagram {
    match load_diagram(path) {
        Ok(diagram) => diagram,
        Err(e) => {
            match path {
                Some(path) => eprintln!("Error reading model '{}': {}", path.display(), e),
                None => eprintln!("Error reading model from stdin: {}", e),
            }
            std::process::exit(1);
        }
    }
}

fn load_diagram(path: Option<&Path>) -> Result<Diagram, LoadError> {
    match path {
        Some(path) => Diagram::from_file(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Diagram::from_json_str(&buffer)
        }
    }
}

fn print_json<T: Serialize>(value: &T, compact: bool) {
    let output = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    match output {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn parse_viewport(value: &str) -> Result<BoundingBox, String> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in viewport: {}", e))?;
    match parts.as_slice() {
        [x, y, width, height] if *width >= 0.0 && *height >= 0.0 => {
            Ok(BoundingBox::new(*x, *y, *width, *height))
        }
        [_, _, _, _] => Err("viewport width and height must not be negative".to_string()),
        _ => Err(format!("expected X,Y,W,H but got {} values", parts.len())),
    }
}

fn parse_buffer(value: &str) -> Result<f64, String> {
    let buffer = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid buffer: {}", e))?;
    if buffer.is_finite() && buffer >= 0.0 {
        Ok(buffer)
    } else {
        Err("buffer must be a finite, non-negative number".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_viewport() {
        let viewport = parse_viewport("-100, 50,1280,800").unwrap();
        assert_eq!(viewport, BoundingBox::new(-100.0, 50.0, 1280.0, 800.0));
        assert!(parse_viewport("0,0,-1,10").is_err());
        assert!(parse_viewport("0,0,10").is_err());
    }

    #[test]
    fn test_parse_buffer_rejects_negative_values() {
        assert_eq!(parse_buffer("800"), Ok(800.0));
        assert_eq!(parse_buffer("0"), Ok(0.0));
        assert!(parse_buffer("-1").is_err());
        assert!(parse_buffer("inf").is_err());
        assert!(parse_buffer("wide").is_err());
    }
}
