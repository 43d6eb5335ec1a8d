//! Create a file with random lines, to have something large to serve

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use clap::Parser;
use rand::{seq::SliceRandom, Rng};

#[derive(Parser, Debug)]
#[command(
    name = "generate_file",
    about = "Creates a file with random lines of up to a given amount of characters"
)]
struct Args {
    /// Path to the file to create
    path: PathBuf,
    /// Number of lines to create
    #[arg(short, long, default_value_t = 1000)]
    lines: usize,
    /// Maximum number of characters per line. Lines may be empty
    #[arg(short = 'c', long, default_value_t = 1000)]
    max_chars_per_line: usize,
}

const POOL: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~ \t";

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    let mut rng = rand::thread_rng();
    let mut out = BufWriter::new(File::create(&args.path)?);

    for _ in 0..args.lines {
        let len = rng.gen_range(0..=args.max_chars_per_line);
        let line: Vec<u8> = (0..len)
            .filter_map(|_| POOL.choose(&mut rng).copied())
            .collect();
        out.write_all(&line)?;
        out.write_all(b"\n")?;
    }

    out.flush()
}
