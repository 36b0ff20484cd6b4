use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_paraseg::PageImage;
use rust_paraseg::utils::binarization::{binarize, otsu_binarize, otsu_threshold};

/// Two text columns of 12 px lines every 20 px
fn text_page(width: usize, height: usize) -> PageImage {
    let gutter = width / 2;
    PageImage::from_fn(width, height, |x, y| {
        let in_text = y % 20 < 12 && x.abs_diff(gutter) > 20;
        if in_text && (x * 7 + y * 3) % 5 < 2 { 20 } else { 235 }
    })
    .unwrap()
}

fn bench_binarize_medium(c: &mut Criterion) {
    let page = text_page(640, 480);
    c.bench_function("binarize_640x480", |b| {
        b.iter(|| binarize(black_box(&page), black_box(128)))
    });
}

fn bench_binarize_page(c: &mut Criterion) {
    let page = text_page(2480, 3508);
    c.bench_function("binarize_a4_300dpi", |b| {
        b.iter(|| binarize(black_box(&page), black_box(128)))
    });
}

fn bench_otsu_threshold(c: &mut Criterion) {
    let page = text_page(1920, 1080);
    c.bench_function("otsu_threshold_1920x1080", |b| {
        b.iter(|| otsu_threshold(black_box(page.samples())))
    });
}

fn bench_otsu_binarize_medium(c: &mut Criterion) {
    let page = text_page(640, 480);
    c.bench_function("otsu_binarize_640x480", |b| {
        b.iter(|| otsu_binarize(black_box(&page)))
    });
}

criterion_group!(
    benches,
    bench_binarize_medium,
    bench_binarize_page,
    bench_otsu_threshold,
    bench_otsu_binarize_medium
);
criterion_main!(benches);
