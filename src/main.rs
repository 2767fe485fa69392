use clap::{arg, crate_version, Command};
use lcpcomp::{algorithm_string, compressor, Error};
use std::process::ExitCode;

const RCH: &str = "unreachable was reached";

const EXIT_OK: u8 = 0;
const EXIT_USAGE: u8 = 1;
const EXIT_IO: u8 = 2;
const EXIT_ALGORITHM: u8 = 3;

fn main() -> ExitCode {
    env_logger::init();

    let long_help = "Examples:
---------
Compress:      `lcpcomp compress -i plain.txt -o plain.lcp --algorithm lcpcomp`
Expand:        `lcpcomp expand -i plain.lcp -o plain.txt --algorithm lcpcomp`";

    let algo_arg = || arg!(-a --algorithm <STRING> "algorithm string, e.g. lcpcomp(threshold = 5)").default_value("lcpcomp");

    let mut main_cmd = Command::new("lcpcomp")
        .about("Lossless text compression via LCP-driven dictionary factorization")
        .after_long_help(long_help)
        .version(crate_version!());
    main_cmd = main_cmd.subcommand(
        Command::new("compress")
            .arg(algo_arg())
            .arg(arg!(-i --input <PATH> "input path").required(true))
            .arg(arg!(-o --output <PATH> "output path").required(true))
            .about("compress a file"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("expand")
            .arg(algo_arg())
            .arg(arg!(-i --input <PATH> "input path").required(true))
            .arg(arg!(-o --output <PATH> "output path").required(true))
            .about("expand a file"),
    );

    let matches = main_cmd.get_matches();

    if let Some(cmd) = matches.subcommand_matches("compress") {
        return run_compress(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("expand") {
        return run_expand(cmd);
    }
    ExitCode::from(EXIT_USAGE)
}

fn resolve_algorithm(algorithm: &str) -> Result<compressor::Compressor, ExitCode> {
    let value = algorithm_string::parse(algorithm).map_err(|e| {
        eprintln!("bad algorithm string: {e}");
        ExitCode::from(EXIT_USAGE)
    })?;
    compressor::resolve(&value).map_err(|e| {
        eprintln!("algorithm error: {e}");
        ExitCode::from(EXIT_ALGORITHM)
    })
}

fn run_compress(cmd: &clap::ArgMatches) -> ExitCode {
    let path_in = cmd.get_one::<String>("input").expect(RCH);
    let path_out = cmd.get_one::<String>("output").expect(RCH);
    let algorithm = cmd.get_one::<String>("algorithm").expect(RCH);

    let compressor = match resolve_algorithm(algorithm) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let data = match std::fs::read(path_in) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("I/O error reading {path_in}: {e}");
            return ExitCode::from(EXIT_IO);
        }
    };
    let compressed = compressor.compress(&data);
    match std::fs::write(path_out, compressed) {
        Ok(()) => ExitCode::from(EXIT_OK),
        Err(e) => {
            eprintln!("I/O error writing {path_out}: {e}");
            ExitCode::from(EXIT_IO)
        }
    }
}

fn run_expand(cmd: &clap::ArgMatches) -> ExitCode {
    let path_in = cmd.get_one::<String>("input").expect(RCH);
    let path_out = cmd.get_one::<String>("output").expect(RCH);
    let algorithm = cmd.get_one::<String>("algorithm").expect(RCH);

    let compressor = match resolve_algorithm(algorithm) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let data = match std::fs::read(path_in) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("I/O error reading {path_in}: {e}");
            return ExitCode::from(EXIT_IO);
        }
    };
    let expanded = match compressor.expand(&data) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("algorithm error: {e}");
            return ExitCode::from(exit_code_for(&e));
        }
    };
    match std::fs::write(path_out, expanded) {
        Ok(()) => ExitCode::from(EXIT_OK),
        Err(e) => {
            eprintln!("I/O error writing {path_out}: {e}");
            ExitCode::from(EXIT_IO)
        }
    }
}

fn exit_code_for(e: &Error) -> u8 {
    match e {
        Error::Io(_) => EXIT_IO,
        Error::Configuration { .. } => EXIT_USAGE,
        Error::FormatError { .. } | Error::InvariantViolation { .. } => EXIT_ALGORITHM,
    }
}
