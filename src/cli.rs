use crate::config::load_config;
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
use crate::parser::load_nodes;
use crate::render::{render_svg, write_output_svg};
use anyhow::Result;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "svorg", version, about = "svorg - A simplistic SVG org chart generator")]
pub struct Args {
    /// Config file with layout parameters and templates (built-in default if omitted)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Node data file: a JSON array of node records
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// Overwrite output without asking
    #[arg(short = 'o', long = "overwrite")]
    pub overwrite: bool,

    /// Also write the computed layout as JSON
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,

    /// Output file (.svg or .png), or '-' for stdout
    pub output: PathBuf,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let stdin = io::stdin();
    run_with(&args, &mut stdin.lock(), &mut io::stderr())
}

/// Runs one invocation; `answers`/`prompt` carry the overwrite confirmation.
pub fn run_with(args: &Args, answers: &mut impl BufRead, prompt: &mut impl Write) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let nodes = load_nodes(&args.input)?;
    let layout = compute_layout(nodes, &config.layout)?;
    let svg = render_svg(&layout, &config)?;

    let to_stdout = args.output == Path::new("-");
    if !to_stdout
        && !args.overwrite
        && args.output.exists()
        && !confirm_overwrite(&args.output, answers, prompt)?
    {
        tracing::debug!(output = %args.output.display(), "overwrite declined");
        return Ok(());
    }

    if let Some(path) = &args.dump_layout {
        write_layout_dump(path, &layout)?;
    }

    if to_stdout {
        return write_output_svg(&svg, None);
    }
    if is_png(&args.output) {
        return write_png(&svg, &args.output);
    }
    write_output_svg(&svg, Some(&args.output))
}

fn confirm_overwrite(path: &Path, answers: &mut impl BufRead, prompt: &mut impl Write) -> Result<bool> {
    write!(prompt, "Overwrite '{}'? [y/N] ", path.display())?;
    prompt.flush()?;
    let mut answer = String::new();
    answers.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false)
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path) -> Result<()> {
    crate::render::write_output_png(svg, output)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, output: &Path) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output for '{}' requires the `png` feature",
        output.display()
    ))
}
