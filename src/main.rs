//! # chatpaste CLI
//!
//! Reads a pasted thread from a file or stdin and writes structured messages.

use std::fmt;
use std::io::{self, Write};
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use chatpaste::cli::Args;
use chatpaste::format::{to_format_string, write_to_format};
use chatpaste::{ChatpasteError, ContentDeduplicator, MessageParser};

fn main() {
    let args = <Args as ClapParser>::parse();
    init_tracing(args.debug);

    if let Err(e) = run(&args) {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(debug: bool) {
    let fallback = if debug { "chatpaste=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Progress output. Goes to stderr when stdout carries the result.
struct Status {
    to_stderr: bool,
}

impl Status {
    fn line(&self, args: fmt::Arguments<'_>) {
        if self.to_stderr {
            eprintln!("{args}");
        } else {
            println!("{args}");
        }
    }
}

fn run(args: &Args) -> Result<(), ChatpasteError> {
    let total_start = Instant::now();
    let format = args.output_format()?;
    let parser_config = args.parser_config()?;
    let dedup_config = args.dedup_config()?;
    let output_config = args.output_config();

    let status = Status {
        to_stderr: args.output.is_none(),
    };
    let source = if args.reads_stdin() { "<stdin>" } else { args.input.as_str() };
    let destination = args.output.as_deref().unwrap_or("<stdout>");

    status.line(format_args!("📦 chatpaste v{}", env!("CARGO_PKG_VERSION")));
    status.line(format_args!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━"));
    status.line(format_args!("📂 Input:   {}", source));
    status.line(format_args!("💾 Output:  {}", destination));
    status.line(format_args!("📄 Format:  {}", format));
    status.line(format_args!(""));

    // Step 1: Parse
    status.line(format_args!("⏳ Parsing..."));
    let parse_start = Instant::now();
    let parser = MessageParser::new(parser_config);
    let messages = if args.reads_stdin() {
        parser.parse_str(&io::read_to_string(io::stdin())?)
    } else {
        parser.parse_file(&args.input)?
    };
    let parsed_count = messages.len();
    status.line(format_args!(
        "   Found {} messages ({:.2}s)",
        parsed_count,
        parse_start.elapsed().as_secs_f64()
    ));

    // Step 2: Deduplicate (unless disabled)
    let messages = if args.no_dedup {
        status.line(format_args!("⏭️  Skipping dedup (--no-dedup)"));
        messages
    } else {
        status.line(format_args!("🔀 Removing duplicate content..."));
        let dedup_start = Instant::now();
        let result = ContentDeduplicator::new(dedup_config).process(messages);
        status.line(format_args!(
            "   {} duplicates removed, {} kept for context, {} blocks compared ({:.2}s)",
            result.removed_duplicates,
            result.preserved_context,
            result.processed_blocks,
            dedup_start.elapsed().as_secs_f64()
        ));
        result.messages
    };

    // Step 3: Write
    status.line(format_args!("💾 Writing {}...", format));
    match &args.output {
        Some(path) => write_to_format(&messages, path, format, &output_config)?,
        None => {
            let rendered = to_format_string(&messages, format, &output_config)?;
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            if !rendered.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()?;
        }
    }

    status.line(format_args!(""));
    status.line(format_args!("✅ Done! Output saved to {}", destination));
    status.line(format_args!(""));
    status.line(format_args!("📊 Summary:"));
    status.line(format_args!("   Parsed:    {} messages", parsed_count));
    status.line(format_args!("   Final:     {} messages", messages.len()));
    status.line(format_args!(
        "   Total time: {:.2}s",
        total_start.elapsed().as_secs_f64()
    ));

    Ok(())
}
