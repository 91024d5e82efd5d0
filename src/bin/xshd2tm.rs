//! Command-line interface for xshd2tm
//! Converts an AvalonEdit/SharpDevelop .xshd syntax definition into a
//! TextMate JSON grammar.
//!
//! Usage:
//!   xshd2tm `<input.xshd>` `<output.tmLanguage.json>` [--verbose]

use clap::{Arg, ArgAction, Command};
use std::path::Path;
use xshd2tm::pipeline;

/// Standard TextMate grammar file extensions; anything else only warns.
const OUTPUT_EXTENSIONS: &[&str] = &[".tmLanguage.json", ".JSON-tmLanguage", ".tmLanguage"];

fn main() {
    let matches = Command::new("xshd2tm")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert .xshd syntax highlighting definitions to TextMate JSON grammars")
        .arg(
            Arg::new("input")
                .help("Path to the input .xshd file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("output")
                .help("Path for the generated TextMate grammar JSON file (e.g., mylang.tmLanguage.json)")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let input = matches.get_one::<String>("input").unwrap();
    let output = matches.get_one::<String>("output").unwrap();
    let verbose = matches.get_flag("verbose");

    if verbose {
        println!("Starting conversion...");
        println!("Input xshd file: {}", input);
        println!("Output TextMate file: {}", output);
    }

    if !OUTPUT_EXTENSIONS.iter().any(|ext| output.ends_with(ext)) {
        println!(
            "Warning: output file '{}' does not have a standard TextMate grammar extension (e.g., .tmLanguage.json)",
            output
        );
    }

    match pipeline::convert_file(Path::new(input), Path::new(output)) {
        Ok(()) => println!("TextMate grammar written to {}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
