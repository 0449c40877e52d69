mod cli;

use std::path::PathBuf;

use clap::Parser;
use cli::Args;
use stitch_chart::config::{self, Config};
use stitch_chart::error::AppError;

fn init_logging(args: &Args) {
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else if args.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    // Library code logs through the `log` facade; the subscriber bridges it.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn run(args: &Args, input: PathBuf) -> Result<(), AppError> {
    let config = Config::load(args.config.as_deref())?;
    let job = args.job(input, &config);
    tracing::debug!("Converting {} -> {}", job.input.display(), job.output.display());

    let stdout = std::io::stdout();
    job.run(&mut stdout.lock())?;
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(&args);

    if args.init_config {
        let path = args.config.clone().unwrap_or_else(config::default_path);
        if let Err(e) = cli::init_config(&path) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    // No input is not an error: print usage and exit 0.
    let Some(input) = args.input.clone() else {
        let program = std::env::args()
            .next()
            .unwrap_or_else(|| "stitch-chart".to_string());
        println!("{}", cli::usage(&program));
        return;
    };

    if let Err(e) = run(&args, input) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
