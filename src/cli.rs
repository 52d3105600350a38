use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::dump::RouteDump;
use crate::route::route_detailed;
use crate::scene::Scene;

#[derive(Parser, Debug)]
#[command(
    name = "orthoroute",
    version,
    about = "Orthogonal connector router for JSON scene descriptions"
)]
pub struct Args {
    /// Scene file (json/json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file for the route dump. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Include routing diagnostics (rulers, grid, spots, connections)
    #[arg(long = "diagnostics", default_value_t = false)]
    pub diagnostics: bool,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let text = read_input(args.input.as_deref())?;
    let scene = Scene::parse(&text)?;
    let options = scene.route_options()?;

    let mut results = Vec::with_capacity(options.len());
    for opts in &options {
        results.push(route_detailed(opts)?);
    }

    let dump = RouteDump::from_results(&results, args.diagnostics);
    let json = dump.to_json()?;
    match args.output {
        Some(path) => std::fs::write(&path, json)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path == Path::new("-") => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
