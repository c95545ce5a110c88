// Pyrite: Python 3.10 tokenizer and parser

mod parser;

use std::fs;
use std::path::Path;
use std::time::Instant;

use parser::lexer::Lexer;
use parser::parse::Parser;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Vec<String> = std::env::args().collect();
    let program_name = args.get(0).map(|s| s.as_str()).unwrap_or("pyrite");

    let mut input = None;
    let mut dump_tokens = false;
    let mut dump_ast = false;
    for arg in &args[1..] {
        match arg.as_str() {
            "--tokens" => dump_tokens = true,
            "--ast" => dump_ast = true,
            _ => input = Some(arg.clone()),
        }
    }

    let Some(input) = input else {
        eprintln!("Error: No input file provided");
        eprintln!();
        eprintln!("Usage: {} <file.py> [--tokens] [--ast]", program_name);
        eprintln!();
        eprintln!("Options:");
        eprintln!("  --tokens    Print the token stream as JSON");
        eprintln!("  --ast       Print the parsed module as JSON");
        std::process::exit(1);
    };

    if !Path::new(&input).exists() {
        eprintln!("Error: File '{}' not found", input);
        eprintln!("Usage: {} <file.py> [--tokens] [--ast]", program_name);
        std::process::exit(1);
    }

    // Read source code
    let source = fs::read_to_string(&input)?;

    if dump_tokens {
        let started = Instant::now();
        let mut lexer = Lexer::new(&source);
        let tokens = match lexer.tokenize() {
            Ok(tokens) => tokens,
            Err(e) => {
                eprintln!("Lexer error: {}", e);
                std::process::exit(1);
            }
        };
        eprintln!(
            "Tokenized {} tokens in {:?}",
            tokens.len(),
            started.elapsed()
        );
        println!("{}", serde_json::to_string_pretty(&tokens)?);
        if !dump_ast {
            return Ok(());
        }
    }

    // Parse the source code
    let started = Instant::now();
    let mut parser = match Parser::new(&source) {
        Ok(parser) => parser,
        Err(e) => {
            eprintln!("Parser error: {}", e);
            std::process::exit(1);
        }
    };

    let module = match parser.parse_module() {
        Ok(module) => module,
        Err(e) => {
            eprintln!("Parser error: {}", e);
            std::process::exit(1);
        }
    };

    eprintln!(
        "Parsed {} top-level statements in {:?}",
        module.body.len(),
        started.elapsed()
    );

    if dump_ast {
        println!("{}", serde_json::to_string_pretty(&module)?);
    }

    Ok(())
}
