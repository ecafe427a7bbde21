use clap::Parser;

mod cli;

fn main() {
    let args = cli::Args::parse();

    // Logs go to stderr; stdout carries only the rendered results
    stderrlog::new()
        .module(module_path!())
        .quiet(args.verbose.is_silent())
        .verbosity(args.verbose.log_level_filter())
        .init()
        .unwrap_or_else(|error| eprintln!("Unable to initialize logging: {error}"));

    std::process::exit(cli::run(&args));
}
