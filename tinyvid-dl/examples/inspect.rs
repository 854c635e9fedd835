//! Render anchor and ground-truth overlay canvases to PNG files.
//!
//! Stands in for an interactive viewer: every rendered sample lands in the
//! output directory for offline inspection.

use anyhow::{Context, Result};
use bbox::{prelude::*, CyCxHW};
use log::info;
use noisy_float::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use std::{fs, path::PathBuf};
use structopt::StructOpt;
use tinyvid_dl::{overlay, Split, TinyVidDataset};

#[derive(Debug, Clone, StructOpt)]
/// Inspect dataset samples and anchor placement
struct Args {
    /// dataset root directory
    #[structopt(long)]
    root: PathBuf,
    /// dataset split, 'train' or 'val'
    #[structopt(long, default_value = "train")]
    split: Split,
    /// number of anchor shapes to render
    #[structopt(long, default_value = "3")]
    num_anchors: usize,
    /// seed of the augmentation rng
    #[structopt(long, default_value = "777")]
    seed: u64,
    /// number of samples to render
    #[structopt(long, default_value = "8")]
    count: usize,
    /// output directory for the rendered canvases
    #[structopt(long, default_value = "overlay-out")]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let Args {
        root,
        split,
        num_anchors,
        seed,
        count,
        out_dir,
    } = Args::from_args();

    let dataset = TinyVidDataset::load(&root, split, true)
        .with_context(|| format!("failed to load dataset from '{}'", root.display()))?;
    let mut rng = StdRng::seed_from_u64(seed);

    // Stand-in anchors scaled around the mean box shape; the real shapes
    // come from the external clustering step over the box_hw table.
    let side = dataset.image_size().h() as f64;
    let (sum_h, sum_w) = dataset
        .box_hw()
        .iter()
        .fold((0.0, 0.0), |(sum_h, sum_w), hw| {
            (sum_h + hw.h().raw(), sum_w + hw.w().raw())
        });
    let mean_h = sum_h / dataset.len() as f64 / side;
    let mean_w = sum_w / dataset.len() as f64 / side;

    let anchors: Vec<CyCxHW<R64>> = (0..num_anchors)
        .map(|index| {
            let scale = 0.5 + index as f64 * 0.5;
            CyCxHW::from_cycxhw([
                r64(0.5),
                r64(0.5),
                r64((mean_h * scale).min(1.0)),
                r64((mean_w * scale).min(1.0)),
            ])
        })
        .collect();

    fs::create_dir_all(&out_dir)?;
    for index in 0..count.min(dataset.len()) {
        let sample = dataset.get(index, &mut rng)?;
        let image = sample.image.to_rgb();

        let gt = overlay::ground_truth_canvas(&image, &sample.bbox);
        gt.save(out_dir.join(format!("sample_{index:03}.png")))?;

        let canvas = overlay::anchor_canvas(&anchors, &image)?;
        canvas.save(out_dir.join(format!("anchors_{index:03}.png")))?;

        info!(
            "rendered sample {} (class {}) to '{}'",
            index,
            sample.class,
            out_dir.display()
        );
    }

    Ok(())
}
