use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input HTML resume file.
    #[arg(long)]
    html_file: Option<PathBuf>,

    /// Inline HTML content (alternative to --html-file).
    #[arg(long)]
    html: Option<String>,

    /// Output .docx path (defaults to output.docx).
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let out = docx_from_resume::convert(
        args.html_file.as_deref(),
        args.html.as_deref(),
        args.out.as_deref(),
    )
    .context("convert resume")?;

    println!("wrote {}", out.display());
    Ok(())
}
