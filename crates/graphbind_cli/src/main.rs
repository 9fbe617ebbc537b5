#![allow(missing_docs)]

use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "graphbind", about = "Graph query result binding tools")]
struct Cli {
	/// Log at debug level unless RUST_LOG is set.
	#[arg(long, global = true)]
	verbose: bool,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// List declared types, label sets, and field layouts.
	Types(cmd::types::Args),
	/// Resolve a label set to a concrete type.
	Resolve(cmd::resolve::Args),
	/// Decode JSON-encoded rows against column bindings.
	Decode(cmd::decode::Args),
}

fn main() {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	if let Err(err) = run(cli.command) {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn init_logging(verbose: bool) {
	let level = if verbose { "debug" } else { "warn" };
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(command: Commands) -> graphbind::ogm::Result<()> {
	match command {
		Commands::Types(args) => cmd::types::run(args),
		Commands::Resolve(args) => cmd::resolve::run(args),
		Commands::Decode(args) => cmd::decode::run(args),
	}
}
