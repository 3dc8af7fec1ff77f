// ABOUTME: CLI binary for the custom-extractor scaffolding tool.
// ABOUTME: Prompts for (or accepts) an article URL and runs the scaffold pipeline.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use digests_scaffold::{urlinfo, Scaffolder};

#[derive(Parser, Debug)]
#[command(name = "scaffold")]
#[command(about = "Scaffold a custom site extractor from an article URL")]
struct Args {
    /// Article URL to scaffold from (prompts interactively when omitted)
    #[arg()]
    url: Option<String>,

    /// Target parser checkout to scaffold into
    #[arg(long = "root", default_value = ".")]
    root: PathBuf,

    /// Allow fetching from private/local networks
    #[arg(long = "allow-private-networks")]
    allow_private_networks: bool,
}

const QUESTION: &str =
    "Paste a url to an article you'd like to create or extend an extractor for:";

/// Asks for a URL until one with a hostname is entered. Invalid input is
/// answered by asking again, not by an error.
fn prompt_for_url() -> io::Result<Option<String>> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        println!("{}", QUESTION);
        io::stdout().flush()?;
        let line = match lines.next() {
            Some(line) => line?,
            None => return Ok(None), // stdin closed
        };
        let raw = line.trim().to_string();
        if urlinfo::resolve(&raw).is_some() {
            return Ok(Some(raw));
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let raw_url = match args.url {
        Some(url) => url,
        None => match prompt_for_url() {
            Ok(Some(url)) => url,
            Ok(None) => {
                eprintln!("error: no URL provided");
                return ExitCode::from(1);
            }
            Err(e) => {
                eprintln!("error reading input: {}", e);
                return ExitCode::from(1);
            }
        },
    };

    let mut scaffolder = Scaffolder::builder()
        .root(args.root)
        .allow_private_networks(args.allow_private_networks)
        .build();

    match scaffolder.run(&raw_url).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(1)
        }
    }
}
