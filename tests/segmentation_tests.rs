//! Integration tests for page segmentation
//!
//! Synthetic pages exercise each stage and the full pipeline: paragraph
//! clustering across small gaps, table masking, column detection,
//! size-triggered re-segmentation and per-page failure isolation in batches.

use rust_paraseg::layout::{
    BlockClassifier, Verdict, detect_columns, detect_paragraphs, remove_tables,
};
use rust_paraseg::utils::binarization::binarize;
use rust_paraseg::{
    Bitmap, Block, Error, Interval, PageImage, PageSegmenter, Provenance, Region, SegmentConfig,
    SegmentTelemetry, run_batch,
};
use std::fs;

/// Deterministic pseudo-random generator for texture patterns
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, n: u64) -> usize {
        (self.next() % n) as usize
    }
}

/// Text-like bitmap: random lines of random length in random paragraphs
fn random_text(seed: u64, width: usize, height: usize) -> Bitmap {
    let mut rng = Lcg(seed);
    let mut bitmap = Bitmap::new(width, height);
    let mut y = rng.below(40);
    while y < height {
        let lines = 1 + rng.below(6);
        for _ in 0..lines {
            let len = width / 4 + rng.below((width / 2) as u64);
            for dy in 0..8 {
                for x in 0..len {
                    if (x + dy) % 3 != 0 {
                        bitmap.set(x, y + dy, true);
                    }
                }
            }
            y += 8 + 2 + rng.below(10);
        }
        y += 35 + rng.below(60);
    }
    bitmap
}

#[test]
fn test_small_row_gap_keeps_one_paragraph() {
    // Continuous ink from row 40 to 300 with a 5-row gap at row 100
    let bitmap = Bitmap::from_fn(200, 400, |_, y| (40..300).contains(&y) && !(100..105).contains(&y));
    let bands = detect_paragraphs(&bitmap, 30, None).unwrap();
    assert_eq!(bands, vec![Interval::new(10, 329).unwrap()]);
}

#[test]
fn test_large_block_is_split_into_sub_columns() {
    // All ink except a clean vertical gap at column 450
    let block = Bitmap::from_fn(900, 900, |x, _| x != 450);

    // The page-level table rule would reject a solid block; only the size rule is under test
    let classifier = BlockClassifier {
        table_density: 1.0,
        ..BlockClassifier::default()
    };
    assert_eq!(classifier.classify(&block, 0), Verdict::Recurse);

    let segmenter = PageSegmenter::default();
    let region = Region::full(900, 900).unwrap();
    let parent = Provenance::root(0, 0);
    let mut blocks = Vec::new();
    let mut sink = |b: Block| blocks.push(b);
    let mut telemetry = SegmentTelemetry::default();
    segmenter
        .resegment(&block, region, &parent, 0, &mut sink, &mut telemetry)
        .unwrap();

    assert!(blocks.len() >= 2);
    assert_eq!(telemetry.recursions, 1);
    assert_eq!(blocks[0].provenance, parent.child(0, 0));
    assert_eq!(blocks[1].provenance, parent.child(1, 0));
    assert_ne!(blocks[0].file_name("p"), blocks[1].file_name("p"));
    assert!(blocks[0].region.cols.start() < 450);
    assert!(blocks[1].region.cols.end() > 450);
    for block in &blocks {
        assert_eq!(block.provenance.depth(), 1);
        assert_eq!(block.ink, Bitmap::from_fn(900, 900, |x, _| x != 450).crop(&block.region));
    }
}

#[test]
fn test_dense_band_is_masked_and_never_in_a_paragraph() {
    let mut bitmap = random_text(7, 300, 600);
    let band = Interval::new(250, 300).unwrap();
    bitmap.fill_rows(band);

    let removal = remove_tables(&bitmap, 0.8);
    assert_eq!(removal.band, Some(band));
    assert_eq!(removal.mask.row_span(), Some(band));
    assert!(!removal.clean.any_in_rows(band));

    let bands = detect_paragraphs(&removal.clean, 30, Some(&removal.mask)).unwrap();
    assert!(!bands.is_empty());
    for paragraph in &bands {
        assert!(!paragraph.overlaps(&band), "{paragraph} overlaps table {band}");
    }
}

#[test]
fn test_thin_rule_between_close_paragraphs_drops_both() {
    // Two paragraphs 40 rows apart with a one-row table rule in the gap
    let page = PageImage::from_fn(300, 300, |x, y| {
        let text = (50..80).contains(&y) || (120..150).contains(&y);
        if y == 100 || (text && (x + y) % 2 == 0) { 0 } else { 255 }
    })
    .unwrap();

    let mut blocks = Vec::new();
    let telemetry = PageSegmenter::default()
        .segment(&page, |b| blocks.push(b))
        .unwrap();
    assert_eq!(telemetry.table_band, Some(Interval::new(100, 101).unwrap()));
    assert_eq!(telemetry.paragraphs, 0);
    assert!(blocks.is_empty());
}

#[test]
fn test_table_mask_is_one_contiguous_band() {
    for seed in 0..20 {
        let mut bitmap = random_text(seed, 240, 500);
        // Two dense rules with text between them
        let top = 100 + seed as usize * 3;
        bitmap.fill_rows(Interval::new(top, top + 2).unwrap());
        bitmap.fill_rows(Interval::new(top + 80, top + 82).unwrap());

        let removal = remove_tables(&bitmap, 0.8);
        let span = removal.mask.row_span().unwrap();
        assert_eq!(span, Interval::new(top, top + 82).unwrap());
        for y in 0..bitmap.height() {
            let masked = removal.mask.get(0, y);
            assert_eq!(masked, span.contains(y));
            for x in 0..bitmap.width() {
                assert_eq!(removal.mask.get(x, y), masked);
                if masked {
                    assert!(!removal.clean.get(x, y));
                }
            }
        }
        assert_eq!(
            removal.clean,
            bitmap.and_not(removal.mask.as_bitmap()).unwrap()
        );
    }
}

#[test]
fn test_paragraph_bands_sorted_and_disjoint() {
    for seed in 0..30 {
        let bitmap = random_text(seed, 180, 700);
        for gap in [5, 12, 30, 60] {
            let bands = detect_paragraphs(&bitmap, gap, None).unwrap();
            for pair in bands.windows(2) {
                assert!(pair[0].end() <= pair[1].start(), "seed {seed}: {} / {}", pair[0], pair[1]);
            }
            for band in &bands {
                assert!(band.end() <= bitmap.height());
            }
        }
    }
}

#[test]
fn test_column_detection_is_stable_on_reassembly() {
    // Three text columns with 60 px gutters
    let columns = [(20, 200), (260, 420), (480, 700)];
    let bitmap = Bitmap::from_fn(720, 300, |x, y| {
        y % 16 < 9 && columns.iter().any(|&(a, b)| x >= a && x < b)
    });
    let detected = detect_columns(&bitmap, 50);
    assert!(detected.len() >= 3);

    // Rebuild the page from the detected column crops alone
    let mut rebuilt = Bitmap::new(bitmap.width(), bitmap.height());
    for column in &detected {
        let crop = bitmap.crop_columns(*column);
        for y in 0..crop.height() {
            for x in 0..crop.width() {
                if crop.get(x, y) {
                    rebuilt.set(column.start() + x, y, true);
                }
            }
        }
    }
    assert_eq!(rebuilt, bitmap);
    assert_eq!(detect_columns(&rebuilt, 50), detected);
}

#[test]
fn test_accepted_block_round_trips() {
    let page = PageImage::from_fn(300, 240, |x, y| {
        if (30..90).contains(&y) && (x * 5 + y) % 7 < 3 { 10 } else { 245 }
    })
    .unwrap();

    let mut blocks = Vec::new();
    let columns = rust_paraseg::segment_page(&page, |b| blocks.push(b)).unwrap();
    assert_eq!(columns, 1);
    assert_eq!(blocks.len(), 1);
    let block = &blocks[0];

    assert_eq!(block.ink.invert().invert(), block.ink);

    let rendered = PageImage::from_luma(block.to_gray_image()).unwrap();
    assert_eq!(binarize(&rendered, 128).unwrap(), block.ink);
    assert_eq!(binarize(&page, 128).unwrap().crop(&block.region), block.ink);
}

#[test]
fn test_unreadable_page_is_skipped_in_batch() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let broken = input.path().join("a_broken.png");
    fs::write(&broken, [0x89, b'P', b'N', b'G', 0, 0]).unwrap();
    let missing = input.path().join("b_missing.png");
    let good = input.path().join("c_page.png");
    image::GrayImage::from_fn(320, 260, |x, y| {
        let ink = (40..70).contains(&y) || (160..200).contains(&y);
        image::Luma([if ink && (x + 2 * y) % 3 == 0 { 0 } else { 255 }])
    })
    .save(&good)
    .unwrap();

    let pages = vec![broken, missing, good];
    let segmenter = PageSegmenter::new(SegmentConfig::default()).unwrap();
    let summary = run_batch(&segmenter, &pages, output.path(), false).unwrap();

    assert_eq!(summary.failed(), 2);
    assert_eq!(summary.processed(), 1);
    for outcome in &summary.pages[..2] {
        assert!(matches!(outcome.result, Err(Error::Load { .. })));
    }
    let report = summary.pages[2].result.as_ref().unwrap();
    assert_eq!(report.blocks.len(), 2);
    let written: Vec<String> = fs::read_dir(output.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(written.len(), 2);
    assert!(written.contains(&"c_page_column_1_paragraph_2.png".to_string()));
}

#[test]
fn test_invalid_config_fails_before_any_page() {
    let config = SegmentConfig::new().with_table_density(0.0);
    assert!(matches!(
        PageSegmenter::new(config),
        Err(Error::InvalidConfig(_))
    ));
}
