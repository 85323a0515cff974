//! Trains the sign/background color histograms from labeled images.
//!
//! Each input image needs a hand-labeled `<file>_mask.png` next to it;
//! labeled pixels train the positive model, everything else the
//! negative model. Counts are merged over all inputs and the two
//! models are written out in the text format the classifier loads.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use image::imageops::{self, FilterType};
use log::{info, warn};

use signfinder::color::{ColorSpace, JointHistogram};
use signfinder::eval::load_truth_mask;

#[derive(Parser)]
#[command(name = "trainhist", version, about = "Train sign/background color histograms from labeled images")]
struct Args {
    /// Image files with `<file>_mask.png` labels
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Color space to train in (ycrcb, hsv, nrgb, cielab)
    #[arg(long, default_value = "ycrcb")]
    space: String,

    /// Bins per histogram axis
    #[arg(long, default_value_t = 64)]
    bins: u32,

    /// Output path for the sign-color model
    #[arg(long, default_value = "posHist.hist")]
    positive: PathBuf,

    /// Output path for the background-color model
    #[arg(long, default_value = "negHist.hist")]
    negative: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let space = match ColorSpace::from_name(&args.space) {
        Some(space) => space,
        None => bail!("unknown color space: {}", args.space),
    };
    let mut pos = JointHistogram::new(space, args.bins)?;
    let mut neg = JointHistogram::new(space, args.bins)?;

    let mut trained = 0u32;
    for file in &args.files {
        let mask = match load_truth_mask(file)? {
            Some(mask) => mask,
            None => {
                warn!("no mask for {}, skipping", file.display());
                continue;
            }
        };
        let image = image::open(file)
            .with_context(|| format!("could not load {}", file.display()))?
            .to_rgb8();
        let mut mask = if mask.dimensions() != image.dimensions() {
            imageops::resize(&mask, image.width(), image.height(), FilterType::Nearest)
        } else {
            mask
        };

        pos.accumulate(&image, Some(&mask))?;
        imageops::invert(&mut mask);
        neg.accumulate(&image, Some(&mask))?;
        trained += 1;
        info!("trained on {}", file.display());
    }
    if trained == 0 {
        bail!("no training pairs found");
    }

    pos.save(&args.positive)?;
    neg.save(&args.negative)?;
    println!(
        "trained on {trained} image(s): {:.0} sign pixels, {:.0} background pixels",
        pos.total(),
        neg.total()
    );
    Ok(())
}
