use clap::{CommandFactory, Parser};
use doce_etl::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    // Without a subcommand, show help and available commands
    if args.command.is_none() {
        let mut command = Args::command();
        if let Err(e) = command.print_help() {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
        println!();
        println!("EXAMPLES:");
        println!("    # Extract every spreadsheet under data/ into facts.nt:");
        println!("    doce-etl process data/ --output facts.nt");
        println!();
        println!("    # Show how each file would be routed:");
        println!("    doce-etl classify data/renova data/unesp");
        println!();
        println!("    # Validate the header mapping tables against a data file:");
        println!("    doce-etl check-mappings --mapping-dir resources data/manual-2017.csv");
        process::exit(0);
    }

    if let Err(error) = commands::run(args) {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}
