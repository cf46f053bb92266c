use clap::Parser;
use color_print::cprintln;
use log::debug;
use mcc::driver;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, clap::Parser)]
#[clap(author, version, about)]
struct Args {
    /// Source file to compile
    #[clap(long)]
    file: PathBuf,
}

/// Accept the single dash spelling `-file`.
fn normalize(args: impl Iterator<Item = String>) -> Vec<String> {
    args.map(|arg| match arg.as_str() {
        "-file" => "--file".to_string(),
        _ => match arg.strip_prefix("-file=") {
            Some(value) => format!("--file={}", value),
            None => arg,
        },
    })
    .collect()
}

fn main() {
    env_logger::init();
    let args = Args::parse_from(normalize(std::env::args()));
    let start = Instant::now();

    println!("1. Read File");
    println!("  < {}", args.file.display());
    let source = match driver::read_source(&args.file) {
        Ok(source) => source,
        Err(e) => fail(&e, &args.file, ""),
    };

    println!("2. Parse, Optimize, Lower & Emit");
    let artifacts = match mcc::compile_source(&source) {
        Ok(artifacts) => artifacts,
        Err(e) => fail(&e, &args.file, &source),
    };
    debug!("optimized program:\n{}", artifacts.optimized);
    println!(
        "  - {} statements, {} TAC lines, {} instructions",
        artifacts.optimized.body.len(),
        artifacts.tac.0.len(),
        artifacts.asm.text.len()
    );

    println!("3. Write Output");
    println!("  > {}", driver::TAC_FILE);
    println!("  > {}", driver::MIPS_FILE);
    if let Err(e) = driver::write_outputs(&artifacts, Path::new(".")) {
        fail(&e, &args.file, &source);
    }

    cprintln!("<green,bold>Finished</> in {:?}", start.elapsed());
}

fn fail(e: &mcc::Error, file: &Path, source: &str) -> ! {
    e.print_diag(&file.display().to_string(), source);
    std::process::exit(3);
}
