use clap::Parser;
use tracing_subscriber::EnvFilter;

use jig::cli::Cli;
use jig::commands::{self, Context};
use jig::config::Config;
use jig::exec::ShellInvoker;
use jig::store::SnapshotStore;

fn init_logging(cli: &Cli) {
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // stderr so listings on stdout stay pipeable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let config = Config::from_cli(&cli).unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(1);
    });

    let Some(verb) = cli.command.as_deref() else {
        print!("{}", commands::overview(false));
        return;
    };

    let shell = ShellInvoker::new(&config);
    let store = SnapshotStore::new(&config.state_dir);
    let ctx = Context::new(&config, &shell, &store);

    if let Err(e) = commands::dispatch(&ctx, verb, &cli.args) {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("{e}");
        std::process::exit(e.exit_code());
    }
}
