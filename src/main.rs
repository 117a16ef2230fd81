use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use ptp2wav::wav::read_wav_file_info;
use ptp2wav::{output_path_for, Converter};
use rayon::prelude::*;
use std::env;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, Level};

fn convert_one(input_path: &str, output_path: Option<&String>) -> Result<(), Box<dyn Error + Send + Sync>> {
    let input = Path::new(input_path);
    let output = match output_path {
        Some(path) => PathBuf::from(path),
        None => output_path_for(input),
    };

    Converter::new().convert_file(input, &output)?;
    info!("Converted {} to {}", input.display(), output.display());
    Ok(())
}

fn process_batch(input_dir: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
    let start = std::time::Instant::now();

    let mut inputs = Vec::new();
    for entry in fs::read_dir(input_dir)? {
        let path = entry?.path();
        let is_ptp = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ptp"));
        if path.is_file() && is_ptp {
            inputs.push(path);
        }
    }
    info!("Found {} PTP files in {}", inputs.len(), input_dir);

    let bar = ProgressBar::new(inputs.len() as u64);
    bar.set_style(ProgressStyle::default_bar().template("{bar:40} {pos}/{len} {msg}")?);

    let converter = Converter::new();
    let failures = inputs
        .par_iter()
        .progress_with(bar.clone())
        .filter(|path| {
            let output = output_path_for(path);
            match converter.convert_file(path, &output) {
                Ok(()) => false,
                Err(e) => {
                    error!("{}: {}", path.display(), e);
                    true
                }
            }
        })
        .count();
    bar.finish_with_message("done");

    println!("Converted {} of {} files", inputs.len() - failures, inputs.len());
    println!("Time taken: {:.2?}", start.elapsed());

    if failures > 0 {
        return Err(Box::from(format!("{} files failed to convert", failures)));
    }
    Ok(())
}

fn print_info(wav_path: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
    let info = read_wav_file_info(Path::new(wav_path))?;
    println!(
        "File: {}\nSample Rate: {}\nBits per Sample: {}\nChannels: {}\nLength: {}\nSeconds: {:.2}",
        wav_path,
        info.sample_rate,
        info.bits_per_sample,
        info.channels,
        info.duration,
        info.seconds()
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let level = if env::var_os("PTP2WAV_DEBUG").is_some() {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!(
            "Usage:\n  To convert:    {} convert <input_ptp> [output_wav]\n  To convert a directory: {} batch <input_dir>\n  To inspect:    {} info <input_wav>",
            args[0], args[0], args[0]
        );
        std::process::exit(1);
    }

    let command = &args[1];

    match command.as_str() {
        "convert" => {
            if args.len() < 3 {
                eprintln!("Usage: {} convert <input_ptp> [output_wav]", args[0]);
                std::process::exit(1);
            }
            convert_one(&args[2], args.get(3))?;
        }
        "batch" => {
            if args.len() < 3 {
                eprintln!("Usage: {} batch <input_dir>", args[0]);
                std::process::exit(1);
            }
            process_batch(&args[2])?;
        }
        "info" => {
            if args.len() < 3 {
                eprintln!("Usage: {} info <input_wav>", args[0]);
                std::process::exit(1);
            }
            print_info(&args[2])?;
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            std::process::exit(1);
        }
    }

    Ok(())
}
