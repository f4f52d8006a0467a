// Copyright 2025 Logan Magee
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use csa::Artifact;
use sufsort::SuffixArray;

#[derive(Parser)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a file's suffix array and run every codec, reporting timings and encoded sizes
    Report {
        input: PathBuf,
        /// Also print the arrays (useful for small inputs only)
        #[arg(long)]
        print: bool,
    },
    /// Compress a file's suffix array into an artifact file
    Compress {
        input: PathBuf,
        artifact: PathBuf,
        #[arg(long, value_enum, default_value = "elias-fano")]
        codec: Codec,
    },
    /// Decode an artifact file and print the suffix array
    Decompress { artifact: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum Codec {
    Delta,
    EliasFano,
    RePair,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Command::Report { input, print } => report(&input, print),
        Command::Compress {
            input,
            artifact,
            codec,
        } => compress(&input, &artifact, codec),
        Command::Decompress { artifact } => decompress(&artifact),
    }
}

fn report(input: &Path, print: bool) -> anyhow::Result<()> {
    let text = read_text(input)?;

    let start = Instant::now();
    let sa = SuffixArray::new(&text);
    println!(
        "suffix array: {} entries, built in {:.2?}, {} bytes raw",
        sa.as_slice().len(),
        start.elapsed(),
        sa.as_slice().len() * size_of::<u32>(),
    );
    if print {
        print_array("sa", sa.as_slice());
    }

    for codec in [Codec::Delta, Codec::EliasFano, Codec::RePair] {
        let name = match codec {
            Codec::Delta => "delta",
            Codec::EliasFano => "elias-fano",
            Codec::RePair => "re-pair",
        };

        let start = Instant::now();
        let (artifact, encoded) = match encode(&text, sa.as_slice(), codec) {
            Ok(compressed) => compressed,
            Err(e) => {
                println!("{name}: compression failed: {e}");
                continue;
            }
        };
        let compress_time = start.elapsed();

        let start = Instant::now();
        let decoded = artifact
            .decompress()
            .with_context(|| format!("Failed to decompress {name} artifact"))?;
        let decompress_time = start.elapsed();

        anyhow::ensure!(
            decoded == sa.as_slice(),
            "{name} round trip diverged from the suffix array",
        );
        println!(
            "{name}: {} bytes encoded, compressed in {compress_time:.2?}, \
             decompressed in {decompress_time:.2?}, round trip ok",
            encoded.len(),
        );
        if print {
            print_array(name, &decoded);
        }
    }

    Ok(())
}

fn compress(input: &Path, artifact: &Path, codec: Codec) -> anyhow::Result<()> {
    let text = read_text(input)?;
    let sa = SuffixArray::new(&text);

    let (_, encoded) = encode(&text, sa.as_slice(), codec)?;
    fs::write(artifact, &encoded)
        .with_context(|| format!("Failed to write artifact file '{}'", artifact.display()))?;

    println!(
        "{} entries -> {} bytes ({} bytes raw)",
        sa.as_slice().len(),
        encoded.len(),
        sa.as_slice().len() * size_of::<u32>(),
    );

    Ok(())
}

fn decompress(artifact: &Path) -> anyhow::Result<()> {
    let file = File::open(artifact)
        .with_context(|| format!("Failed to open artifact file '{}'", artifact.display()))?;
    let decoded = Artifact::from_reader(&mut BufReader::new(file))
        .context("Failed to read artifact")?
        .decompress()
        .context("Failed to decompress artifact")?;

    print_array("sa", &decoded);

    Ok(())
}

/// Compresses with the chosen codec, returning the artifact and its serialized bytes.
fn encode(text: &[u8], sa: &[u32], codec: Codec) -> anyhow::Result<(Artifact, Vec<u8>)> {
    let mut encoded = Vec::new();
    let artifact = match codec {
        Codec::Delta => {
            let artifact = csa::delta::compress(text, sa)?;
            artifact.to_writer(&mut encoded)?;
            Artifact::Delta(artifact)
        }
        Codec::EliasFano => {
            let artifact = csa::elias_fano::compress(text, sa)?;
            artifact.to_writer(&mut encoded)?;
            Artifact::EliasFano(artifact)
        }
        Codec::RePair => {
            let artifact = csa::repair::compress(sa);
            artifact.to_writer(&mut encoded)?;
            Artifact::RePair(artifact)
        }
    };

    Ok((artifact, encoded))
}

fn read_text(input: &Path) -> anyhow::Result<Vec<u8>> {
    let mut text = fs::read(input)
        .with_context(|| format!("Failed to read input file '{}'", input.display()))?;
    // The codecs require a trailing 0 sentinel
    text.push(0);

    Ok(text)
}

fn print_array(name: &str, values: &[u32]) {
    print!("{name}: [");
    for value in values {
        print!("{value} ");
    }
    println!("]");
}
