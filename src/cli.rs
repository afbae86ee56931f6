// Command-line interface for oxips.
//
// Two subcommands mirror the two flows the codec supports: `create` diffs an
// original file against a modified one and writes the patch, `apply` rebuilds
// a file from an input plus a patch. All diagnostics go to stderr; exit
// status is non-zero on any failure.

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::io;

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// IPS binary patch creator and applier.
#[derive(Parser, Debug)]
#[command(
    name = "oxips",
    version,
    about = "Create and apply IPS patches",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Create a patch from the difference between two files.
    #[command(alias = "c")]
    Create(CreateArgs),
    /// Apply a patch to a file.
    #[command(alias = "a")]
    Apply(ApplyArgs),
}

#[derive(Args, Debug)]
struct CreateArgs {
    /// File on which the patch would be applied.
    #[arg(value_hint = ValueHint::FilePath)]
    original_file: PathBuf,

    /// File that would result from applying the patch to original_file.
    #[arg(value_hint = ValueHint::FilePath)]
    modified_file: PathBuf,

    /// File to write the patch to.
    #[arg(value_hint = ValueHint::FilePath)]
    out_file: PathBuf,
}

#[derive(Args, Debug)]
struct ApplyArgs {
    /// File containing the IPS patch.
    #[arg(value_hint = ValueHint::FilePath)]
    patch_file: PathBuf,

    /// File to be patched.
    #[arg(value_hint = ValueHint::FilePath)]
    in_file: PathBuf,

    /// File to receive the patched output.
    #[arg(value_hint = ValueHint::FilePath)]
    out_file: PathBuf,
}

// ---------------------------------------------------------------------------
// Create command
// ---------------------------------------------------------------------------

fn cmd_create(cli: &Cli, args: &CreateArgs) -> i32 {
    if args.out_file.exists() && !cli.force {
        eprintln!(
            "oxips: output file exists, use -f to overwrite: {}",
            args.out_file.display()
        );
        return 1;
    }

    let stats = match io::create_patch_file(&args.original_file, &args.modified_file, &args.out_file)
    {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("oxips: create: {e}");
            return 1;
        }
    };

    if cli.verbose > 0 && !cli.quiet {
        eprintln!(
            "oxips: create: original {} B, modified {} B, {} records, patch {} B",
            stats.original_size, stats.modified_size, stats.records, stats.patch_size
        );
    }

    if cli.json_output {
        let json = serde_json::json!({
            "command": "create",
            "original_size": stats.original_size,
            "modified_size": stats.modified_size,
            "patch_size": stats.patch_size,
            "records": stats.records,
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap());
    }

    0
}

// ---------------------------------------------------------------------------
// Apply command
// ---------------------------------------------------------------------------

fn cmd_apply(cli: &Cli, args: &ApplyArgs) -> i32 {
    if args.out_file.exists() && !cli.force {
        eprintln!(
            "oxips: output file exists, use -f to overwrite: {}",
            args.out_file.display()
        );
        return 1;
    }

    let stats = match io::apply_patch_file(&args.patch_file, &args.in_file, &args.out_file) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("oxips: apply: {e}");
            return 1;
        }
    };

    if cli.verbose > 0 && !cli.quiet {
        eprintln!(
            "oxips: apply: {} records, input {} B, output {} B",
            stats.records, stats.input_size, stats.output_size
        );
    }

    if cli.json_output {
        let json = serde_json::json!({
            "command": "apply",
            "patch_size": stats.patch_size,
            "input_size": stats.input_size,
            "output_size": stats.output_size,
            "records": stats.records,
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap());
    }

    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();

    let exit_code = match &cli.command {
        Cmd::Create(args) => cmd_create(&cli, args),
        Cmd::Apply(args) => cmd_apply(&cli, args),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let argv: Vec<String> = std::iter::once("oxips".to_string())
            .chain(args.iter().map(|s| s.to_string()))
            .collect();
        Cli::try_parse_from(argv).expect("cli parse failed")
    }

    #[test]
    fn parse_create() {
        let cli = parse(&["create", "orig.bin", "mod.bin", "out.ips"]);
        match cli.command {
            Cmd::Create(args) => {
                assert_eq!(args.original_file, PathBuf::from("orig.bin"));
                assert_eq!(args.modified_file, PathBuf::from("mod.bin"));
                assert_eq!(args.out_file, PathBuf::from("out.ips"));
            }
            _ => panic!("expected create"),
        }
    }

    #[test]
    fn parse_apply_with_alias() {
        let cli = parse(&["a", "edits.ips", "in.bin", "out.bin"]);
        match cli.command {
            Cmd::Apply(args) => {
                assert_eq!(args.patch_file, PathBuf::from("edits.ips"));
            }
            _ => panic!("expected apply"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = parse(&["-f", "--json", "create", "a", "b", "c"]);
        assert!(cli.force);
        assert!(cli.json_output);
        assert!(!cli.quiet);

        let cli = parse(&["create", "a", "b", "c", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let argv = ["oxips", "create", "a", "b", "c", "-q", "-v"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn missing_paths_is_an_error() {
        let argv = ["oxips", "apply", "edits.ips"];
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
