//! Line-level change tracer CLI.
//!
//! Provides the `linelens` binary with subcommands for inspecting scripts
//! and tracing calls. `functions` lists every function's call template,
//! `describe` prints the template for one function, and `trace` records a
//! call and reports which variables changed on each executed line.
//!
//! Uses the same `linelens_trace::record()` pipeline as the library API,
//! ensuring identical tracing behavior from both entry points.

mod render;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use linelens_core::{parse_call, FunctionDef, Script};
use linelens_trace::{attribute, record, record_call, Arguments, TraceError};

/// Line-level change tracer and tools.
#[derive(Parser)]
#[command(name = "linelens", about = "Trace one call and see what every line changed")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List every function in a script with its call template.
    Functions {
        /// Path to the script file.
        script: PathBuf,
    },

    /// Print the call template for one function.
    Describe {
        /// Path to the script file.
        script: PathBuf,

        /// Function to describe, by name.
        #[arg(short, long)]
        function: Option<String>,

        /// Function to describe, by the closest `def` at or before this line.
        #[arg(short, long)]
        line: Option<u32>,
    },

    /// Trace a call and report the changed variables per executed line.
    Trace {
        /// Path to the script file.
        script: PathBuf,

        /// Call expression to trace, e.g. "foo(1, 2, c = 3)".
        #[arg(short, long)]
        call: String,

        /// Function the call must target, by name.
        #[arg(short, long)]
        function: Option<String>,

        /// Function the call must target, by the closest `def` at or
        /// before this line.
        #[arg(short, long)]
        line: Option<u32>,

        /// Output format: annotated, panel, or json.
        #[arg(long, default_value = "annotated")]
        format: String,
    },
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // `--help` and `--version` land here too; only actual usage
            // errors get the nonzero code.
            let code = if err.use_stderr() { 4 } else { 0 };
            let _ = err.print();
            process::exit(code);
        }
    };

    let exit_code = match cli.command {
        Commands::Functions { script } => run_functions(&script),
        Commands::Describe {
            script,
            function,
            line,
        } => run_describe(&script, function.as_deref(), line),
        Commands::Trace {
            script,
            call,
            function,
            line,
            format,
        } => run_trace(&script, &call, function.as_deref(), line, &format),
    };
    process::exit(exit_code);
}

/// Execute the functions subcommand.
///
/// Returns exit code: 0 = success, 1 = load failure.
fn run_functions(script_path: &Path) -> i32 {
    let (_, script) = match load_script(script_path) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };

    for def in script.functions.values() {
        println!("{}", def.describe());
    }
    0
}

/// Execute the describe subcommand.
///
/// Returns exit code: 0 = success, 1 = load failure, 4 = usage error.
fn run_describe(script_path: &Path, function: Option<&str>, line: Option<u32>) -> i32 {
    let (_, script) = match load_script(script_path) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };

    let def = match select_function(&script, function, line) {
        Ok(Some(def)) => def,
        Ok(None) => {
            eprintln!("Error: pass one of --function and --line");
            return 4;
        }
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 4;
        }
    };

    println!("{}", def.describe());
    0
}

/// Execute the trace subcommand.
///
/// Returns exit code: 0 = success, 1 = load failure, 2 = malformed call
/// specification, 3 = execution failure, 4 = usage error. On an execution
/// failure the attribution for the lines that did run is printed first.
fn run_trace(
    script_path: &Path,
    call: &str,
    function: Option<&str>,
    line: Option<u32>,
    format_str: &str,
) -> i32 {
    // Parse the output format
    let format = match render::parse_format(format_str) {
        Ok(format) => format,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 4;
        }
    };

    let (source, script) = match load_script(script_path) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };

    let selected = match select_function(&script, function, line) {
        Ok(selected) => selected,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 4;
        }
    };

    let spec = match parse_call(call) {
        Ok(spec) => spec,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 2;
        }
    };

    // Record -- same pipeline the library exposes
    let outcome = match selected {
        Some(def) => {
            if spec.function != def.name {
                eprintln!(
                    "Error: call names '{}' but the selected function is '{}'",
                    spec.function, def.name
                );
                return 2;
            }
            record(&script, def, Arguments::from_spec(&spec))
        }
        None => record_call(&script, &spec),
    };

    match outcome {
        Ok(trace) => {
            let changes = attribute(&trace);
            println!("{}", render::render(format, &source, &changes));
            0
        }
        Err(TraceError::UnknownFunction { name }) => {
            eprintln!("Error: unknown function '{}'", name);
            2
        }
        Err(TraceError::Execution { error, partial }) => {
            let changes = attribute(&partial);
            println!("{}", render::render(format, &source, &changes));
            eprintln!("Error: {}", error);
            3
        }
    }
}

/// Read and parse a script file.
///
/// On failure the diagnostic is already printed and the error carries the
/// process exit code.
fn load_script(path: &Path) -> Result<(String, Script), i32> {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: failed to read '{}': {}", path.display(), e);
            return Err(1);
        }
    };
    match linelens_core::parse(&source) {
        Ok(script) => Ok((source, script)),
        Err(e) => {
            eprintln!("Error: {}", e);
            Err(1)
        }
    }
}

/// Resolve `--function` / `--line` to a definition.
///
/// `--line` follows the cursor rule: the function whose `def` header is
/// closest at or before the line. `Ok(None)` means neither flag was given.
fn select_function<'a>(
    script: &'a Script,
    function: Option<&str>,
    line: Option<u32>,
) -> Result<Option<&'a FunctionDef>, String> {
    match (function, line) {
        (Some(_), Some(_)) => Err("pass only one of --function and --line".to_string()),
        (Some(name), None) => script.get(name).map(Some).ok_or_else(|| {
            let known: Vec<&str> = script.names().collect();
            format!(
                "no function named '{}', script defines {}",
                name,
                known.join(", ")
            )
        }),
        (None, Some(line)) => script
            .function_at(line)
            .map(Some)
            .ok_or_else(|| format!("no function defined at or before line {}", line)),
        (None, None) => Ok(None),
    }
}
