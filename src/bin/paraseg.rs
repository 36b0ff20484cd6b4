use clap::{Parser, Subcommand};
use rust_paraseg::tools::{binary_stats, collect_pages, grayscale_stats, load_grayscale};
use rust_paraseg::{PageSegmenter, SegmentConfig, run_batch};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "paraseg", version, about = "Paragraph segmentation for scanned pages")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Settings shared by both subcommands; unset flags fall back to PARASEG_* variables
#[derive(clap::Args)]
struct SegmentArgs {
    /// Fixed binarization threshold (samples below it are ink)
    #[arg(long)]
    threshold: Option<u8>,
    /// Pick the threshold per page with Otsu's method
    #[arg(long)]
    otsu: bool,
    /// Largest empty-row gap inside one paragraph
    #[arg(long)]
    max_row_gap: Option<usize>,
    /// Columns must be wider than this
    #[arg(long)]
    min_column_width: Option<usize>,
    /// Re-segmentation levels below the page
    #[arg(long)]
    max_depth: Option<usize>,
    /// Reject blocks with a longer run of inked rows
    #[arg(long)]
    picture_max_run: Option<usize>,
    /// Do not treat a gap-free page as one column
    #[arg(long)]
    no_single_column_fallback: bool,
}

impl SegmentArgs {
    fn config(&self) -> SegmentConfig {
        let mut config = SegmentConfig::from_env();
        if let Some(threshold) = self.threshold {
            config = config.with_threshold(threshold);
        }
        if self.otsu {
            config = config.otsu();
        }
        if let Some(gap) = self.max_row_gap {
            config = config.with_max_row_gap(gap);
        }
        if let Some(width) = self.min_column_width {
            config = config.with_min_column_width(width);
        }
        if let Some(depth) = self.max_depth {
            config = config.with_max_depth(depth);
        }
        if let Some(run) = self.picture_max_run {
            config = config.with_picture_max_run(run);
        }
        if self.no_single_column_fallback {
            config = config.with_single_column_fallback(false);
        }
        config
    }
}

#[derive(Subcommand)]
enum Command {
    /// Segment page images into paragraph blocks
    Segment {
        /// Image files or directories to scan for images
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Directory receiving the block images
        #[arg(long, short, default_value = "paragraphs")]
        output: PathBuf,
        /// Process pages on all cores
        #[arg(long)]
        parallel: bool,
        /// Stop after this many pages
        #[arg(long)]
        limit: Option<usize>,
        #[command(flatten)]
        settings: SegmentArgs,
    },
    /// Print stats, table band, columns and paragraph bands for one image
    Inspect {
        #[arg(long)]
        image: PathBuf,
        #[command(flatten)]
        settings: SegmentArgs,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Segment {
            inputs,
            output,
            parallel,
            limit,
            settings,
        } => segment_cmd(&inputs, &output, parallel, limit, &settings),
        Command::Inspect { image, settings } => inspect_cmd(&image, &settings),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn segment_cmd(
    inputs: &[PathBuf],
    output: &Path,
    parallel: bool,
    limit: Option<usize>,
    settings: &SegmentArgs,
) -> rust_paraseg::Result<()> {
    let segmenter = PageSegmenter::new(settings.config())?;
    let pages = collect_pages(inputs, limit);
    if pages.is_empty() {
        println!("No images found");
        return Ok(());
    }

    let start = Instant::now();
    let summary = run_batch(&segmenter, &pages, output, parallel)?;
    let elapsed = start.elapsed();

    for outcome in &summary.pages {
        match &outcome.result {
            Ok(report) => println!(
                "{}: {} columns, {} blocks",
                outcome.path.display(),
                report.columns,
                report.blocks.len()
            ),
            Err(err) => println!("{}: failed: {}", outcome.path.display(), err),
        }
    }
    println!(
        "Pages: {} processed, {} failed; {} blocks written to {} in {:.2}s",
        summary.processed(),
        summary.failed(),
        summary.blocks_written(),
        output.display(),
        elapsed.as_secs_f64()
    );
    Ok(())
}

fn inspect_cmd(image: &Path, settings: &SegmentArgs) -> rust_paraseg::Result<()> {
    let segmenter = PageSegmenter::new(settings.config())?;
    let page = load_grayscale(image)?;
    println!("Image: {} ({}x{})", image.display(), page.width(), page.height());

    let gray = grayscale_stats(page.samples());
    println!(
        "Grayscale range: {}-{}, average: {}",
        gray.min, gray.max, gray.avg
    );

    let layout = segmenter.analyze(&page)?;
    let stats = binary_stats(&layout.binary);
    println!(
        "Threshold {}: ink_pixels={} total={} ink_ratio={:.2}%",
        layout.threshold,
        stats.ink_pixels,
        stats.total_pixels,
        stats.ink_ratio * 100.0
    );

    match layout.tables.band {
        Some(band) => println!("Table band: rows {}", band),
        None => println!("Table band: none"),
    }

    println!("Found {} columns", layout.columns.len());
    let detector = segmenter.config().paragraph_detector();
    let padding = segmenter.config().column_padding;
    let clean = &layout.tables.clean;
    for (i, column) in layout.columns.iter().enumerate() {
        let Some(cols) = column.padded(padding, clean.width()) else {
            continue;
        };
        let mask = layout.tables.mask.crop_columns(cols);
        let bands = detector.detect(&clean.crop_columns(cols), Some(&mask))?;
        println!("  Column {}: {} ({} paragraphs)", i + 1, cols, bands.len());
        for (j, band) in bands.iter().enumerate() {
            println!("    Paragraph {}: rows {}", j + 1, band);
        }
    }

    let start = Instant::now();
    let mut emitted = 0usize;
    let telemetry = segmenter.segment(&page, |_| emitted += 1)?;
    println!(
        "Blocks: {} emitted, {} table-like, {} picture-like, {} too small, {} recursions ({:.2}ms)",
        emitted,
        telemetry.rejected_table_like,
        telemetry.rejected_picture_like,
        telemetry.rejected_too_small,
        telemetry.recursions,
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}
