//! Vhostforge Apache Proxy Fragment Generator CLI
//!
//! Renders the Apache proxy directive block for one named proxy definition
//! and reports the modules the generated configuration depends on.
//!
//! Usage:
//!   vhostforge-proxy <definition.yaml> [OPTIONS]

use clap::Parser;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use vhostforge_proxy::{
    evaluate, FragmentStore, LoadedModules, MapInterpolator, RenderedFragment, VhostProxyParams,
};

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Vhostforge Apache Proxy Fragment Generator
#[derive(Parser, Debug)]
#[command(name = "vhostforge-proxy")]
#[command(
    author,
    version,
    about = "Render the Apache reverse-proxy fragment for one vhost proxy definition"
)]
struct Args {
    /// Path to a YAML or JSON proxy definition file
    #[arg(required = true)]
    definition: PathBuf,

    /// Output format: text (default), json
    #[arg(short, long, default_value = "text")]
    output: String,

    /// Interpolation variable binding (repeatable)
    #[arg(long = "var", value_name = "NAME=VALUE")]
    vars: Vec<String>,

    /// Validate the definition without printing the fragment
    #[arg(short, long)]
    check: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let params = match VhostProxyParams::from_file(&args.definition) {
        Ok(params) => params,
        Err(e) => {
            eprintln!(
                "{RED}error:{RESET} failed to load {}: {e}",
                args.definition.display()
            );
            return ExitCode::FAILURE;
        }
    };

    let interpolator = match parse_vars(&args.vars) {
        Ok(vars) => MapInterpolator::new(vars),
        Err(bad) => {
            eprintln!("{RED}error:{RESET} invalid --var '{bad}', expected NAME=VALUE");
            return ExitCode::FAILURE;
        }
    };

    let mut fragments = FragmentStore::new();
    let mut modules = LoadedModules::new();

    let fragment = match evaluate(&params, &interpolator, &mut fragments, &mut modules) {
        Ok(fragment) => fragment,
        Err(e) => {
            eprintln!("{RED}error:{RESET} {e}");
            return ExitCode::FAILURE;
        }
    };

    if args.check {
        println!("{GREEN}{BOLD}OK{RESET} {}", fragment.name);
        return ExitCode::SUCCESS;
    }

    if args.output == "json" {
        print_json(&fragment, &modules);
    } else {
        print_text(&fragment, &modules);
    }

    ExitCode::SUCCESS
}

fn parse_vars(raw: &[String]) -> Result<HashMap<String, String>, String> {
    let mut vars = HashMap::new();
    for binding in raw {
        match binding.split_once('=') {
            Some((name, value)) if !name.is_empty() => {
                vars.insert(name.to_string(), value.to_string());
            }
            _ => return Err(binding.clone()),
        }
    }
    Ok(vars)
}

fn print_text(fragment: &RenderedFragment, modules: &LoadedModules) {
    println!("{BOLD}{CYAN}{}{RESET}", fragment.name);
    println!("{DIM}target:{RESET}  {}", fragment.target_file);
    println!("{DIM}order:{RESET}   {}", fragment.order);
    println!(
        "{DIM}modules:{RESET} {}",
        modules.iter().collect::<Vec<_>>().join(", ")
    );
    print!("{}", fragment.body);
}

fn print_json(fragment: &RenderedFragment, modules: &LoadedModules) {
    let output = serde_json::json!({
        "fragment": fragment,
        "modules": modules.iter().collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}
