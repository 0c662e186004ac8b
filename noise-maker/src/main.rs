mod args;
mod generator;
mod stream;

use std::process::ExitCode;

use args::CliArgs;
use chrono::{Local, NaiveDate};
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use stream::write_log;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let date = match args.date() {
        Some(raw) => match NaiveDate::parse_from_str(raw, "%Y%m%d") {
            Ok(date) => date,
            Err(e) => {
                eprintln!("invalid --date {raw:?}: {e}");
                return ExitCode::from(2);
            }
        },
        None => Local::now().date_naive(),
    };
    let mut rng = match args.seed() {
        Some(seed) => StdRng::seed_from_u64(*seed),
        None => StdRng::from_os_rng(),
    };

    match write_log(
        &mut rng,
        args.dir(),
        date,
        *args.lines(),
        *args.gzip(),
        *args.malformed_rate(),
    ) {
        Ok(path) => {
            println!("Wrote {} lines to {}", args.lines(), path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("failed to write log: {e}");
            ExitCode::FAILURE
        }
    }
}
