// videocrop-cli/src/main.rs
//
// Entry point for the videocropanalyzer binary.
//
// Responsibilities:
// - Parsing command-line arguments.
// - Setting up logging on stderr.
// - Running the analysis and printing the crop as a single JSON object.
//
// Everything the caller is meant to read goes to stdout: the usage line when
// no file is given, the JSON result, or an "Error: ..." line. The process
// exits with status 0 in all three cases; only clap's own argument errors
// produce a non-zero status.

use clap::Parser;
use std::io::{self, Write};
use videocrop_cli::{Cli, logging, run_analyze};

const USAGE: &str = "Usage: videocropanalyzer <video_file_path>";

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let Some(video_path) = cli.video_path.as_deref() else {
        println!("{USAGE}");
        return;
    };

    let output = run_analyze(video_path, &cli).and_then(|crop| Ok(crop.to_json()?));

    match output {
        Ok(json) => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = stdout.write_all(json.as_bytes()).and_then(|()| stdout.flush()) {
                log::error!("Failed to write result: {}", e);
            }
        }
        Err(e) => {
            log::debug!("Analysis failed: {:?}", e);
            println!("Error: {e}");
        }
    }
}
