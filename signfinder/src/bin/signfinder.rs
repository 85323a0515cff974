//! Batch sign detection and reading over a list of image files.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;

use signfinder::{CancelToken, SignFinder, SignFinderConfig};

#[derive(Parser)]
#[command(name = "signfinder", version, about = "Detect and read street-name signs in photographs")]
struct Args {
    /// Image files to process
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Trained sign-color histogram
    #[arg(long, default_value = "posHist.hist")]
    positive: PathBuf,

    /// Trained background-color histogram
    #[arg(long, default_value = "negHist.hist")]
    negative: PathBuf,

    /// Classifier likelihood-ratio threshold
    #[arg(long, default_value_t = 0.19)]
    threshold: f32,

    /// OCR command to run per sign
    #[arg(long, default_value = "tesseract")]
    ocr_command: String,

    /// Kill the OCR subprocess after this many seconds
    #[arg(long, default_value_t = 15)]
    ocr_timeout: u64,

    /// Process at native resolution instead of resampling to 1600x1200
    #[arg(long)]
    no_resize: bool,

    /// Save each rectified crop next to its input image
    #[arg(long)]
    save_crops: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = SignFinderConfig::new(&args.positive, &args.negative);
    config.ratio_threshold = args.threshold;
    config.ocr_command = args.ocr_command.clone();
    config.ocr_timeout = Duration::from_secs(args.ocr_timeout);
    if args.no_resize {
        config.working_size = None;
    }

    let finder = SignFinder::with_tesseract(config).context("loading histogram models")?;
    let cancel = CancelToken::new();
    let stats = finder.run_batch(&args.files, &cancel, |path, report| {
        println!("{}: {} sign(s) found", path.display(), report.signs.len());
        for (i, sign) in report.signs.iter().enumerate() {
            match sign.edit_distance {
                Some(dist) => println!("  sign {i}: \"{}\" (edit distance {dist})", sign.text),
                None => println!("  sign {i}: \"{}\"", sign.text),
            }
            if args.save_crops {
                let out = PathBuf::from(format!("{}_sign{i}.png", path.display()));
                if let Err(err) = sign.crop.save(&out) {
                    warn!("could not save {}: {err}", out.display());
                }
            }
        }
    });

    let report = stats.report();
    if !report.is_empty() {
        print!("{report}");
    }
    Ok(())
}
