//! End-to-end runs through the public API with the real `image` codec.
//!
//! Each test builds a throwaway input folder of synthetic cards, runs a
//! batch, and inspects what landed in the output folder.

use bleeder::config::{OutputFormat, OutputPolicy, PoolConfig};
use bleeder::process::{ProcessEvent, RunSummary, process};
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, Rgba, RgbaImage, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn card(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 251) as u8, (y % 241) as u8, 200, 255])
    })
}

fn write_png(path: &Path, width: u32, height: u32) {
    card(width, height)
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

fn write_jpeg(path: &Path, width: u32, height: u32) {
    let rgb = RgbImage::from_pixel(width, height, image::Rgb([240, 240, 240]));
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, 90)
        .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    fs::write(path, buf).unwrap();
}

fn sorted_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn run(input: &Path, output: &Path, policy: &OutputPolicy) -> (RunSummary, Vec<ProcessEvent>) {
    let (tx, rx) = std::sync::mpsc::channel();
    let summary = process(input, output, policy, &PoolConfig::default(), Some(tx)).unwrap();
    (summary, rx.iter().collect())
}

#[test]
fn standard_card_gets_36px_bleed() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("forest.png");
    write_png(&input, 750, 1050);
    let out = tmp.path().join("bleeder_out");

    let (summary, events) = run(&input, &out, &OutputPolicy::default());
    assert_eq!(summary.written, 1);
    assert_eq!(
        events,
        vec![ProcessEvent::Written {
            input: input.clone(),
            output: out.join("forest.png"),
            bleed_px: 36,
            width: 822,
            height: 1122,
        }]
    );

    let result = image::open(out.join("forest.png")).unwrap().into_rgba8();
    assert_eq!(result.dimensions(), (822, 1122));
    let inner = image::imageops::crop_imm(&result, 36, 36, 750, 1050).to_image();
    assert_eq!(inner, card(750, 1050));
    assert_eq!(*result.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
    assert_eq!(*result.get_pixel(821, 1121), Rgba([0, 0, 0, 255]));
    assert_eq!(*result.get_pixel(786, 500), Rgba([0, 0, 0, 255]));
}

#[test]
fn directory_mode_picks_only_supported_files() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("cards");
    fs::create_dir(&input).unwrap();
    write_png(&input.join("a.png"), 100, 140);
    fs::write(input.join("b.txt"), "not a card").unwrap();
    write_jpeg(&input.join("c.jpg"), 100, 140);
    fs::create_dir(input.join("d")).unwrap();
    write_png(&input.join("d/nested.png"), 100, 140);
    let out = tmp.path().join("out");

    let (summary, _) = run(&input, &out, &OutputPolicy::default());
    assert_eq!(
        summary,
        RunSummary {
            written: 2,
            skipped: 0,
            failed: 0
        }
    );
    // Default output format is PNG, so the JPEG comes out as c.png.
    assert_eq!(sorted_names(&out), vec!["a.png", "c.png"]);
}

#[test]
fn auto_format_keeps_jpeg_and_png() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("cards");
    fs::create_dir(&input).unwrap();
    write_png(&input.join("a.png"), 100, 140);
    write_jpeg(&input.join("b.jpeg"), 100, 140);
    let out = tmp.path().join("out");

    let policy = OutputPolicy {
        target_format: OutputFormat::Auto,
        ..OutputPolicy::default()
    };
    run(&input, &out, &policy);

    assert_eq!(sorted_names(&out), vec!["a.png", "b.jpeg"]);
    let jpeg = fs::read(out.join("b.jpeg")).unwrap();
    assert_eq!(image::guess_format(&jpeg).unwrap(), ImageFormat::Jpeg);
}

#[test]
fn second_run_without_overwrite_leaves_output_untouched() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("island.png");
    write_png(&input, 200, 280);
    let out = tmp.path().join("out");

    let (first, _) = run(&input, &out, &OutputPolicy::default());
    assert_eq!(first.written, 1);
    let before = fs::read(out.join("island.png")).unwrap();

    // Change the source so a rewrite would be visible.
    write_png(&input, 300, 420);
    let (second, events) = run(&input, &out, &OutputPolicy::default());
    assert_eq!(second.skipped, 1);
    assert!(matches!(events[0], ProcessEvent::Skipped { .. }));
    assert_eq!(fs::read(out.join("island.png")).unwrap(), before);
}

#[test]
fn overwrite_replaces_existing_output() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("island.png");
    write_png(&input, 200, 280);
    let out = tmp.path().join("out");
    run(&input, &out, &OutputPolicy::default());

    write_png(&input, 300, 420);
    let policy = OutputPolicy {
        overwrite_existing: true,
        ..OutputPolicy::default()
    };
    let (summary, _) = run(&input, &out, &policy);
    assert_eq!(summary.written, 1);
    let (w, _) = image::image_dimensions(out.join("island.png")).unwrap();
    assert!(w > 300);
}

#[test]
fn one_corrupt_file_does_not_stop_the_batch() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("cards");
    fs::create_dir(&input).unwrap();
    for i in 0..9 {
        write_png(&input.join(format!("card{i}.png")), 120, 168);
    }
    fs::write(input.join("broken.png"), b"\x89PNG\r\n\x1a\ntruncated").unwrap();
    let out = tmp.path().join("out");

    let (summary, events) = run(&input, &out, &OutputPolicy::default());
    assert_eq!(summary.written, 9);
    assert_eq!(summary.failed, 1);

    let failed: Vec<PathBuf> = events
        .into_iter()
        .filter_map(|e| match e {
            ProcessEvent::Failed { input, .. } => Some(input),
            _ => None,
        })
        .collect();
    assert_eq!(failed, vec![input.join("broken.png")]);

    for i in 0..9 {
        let dims = image::image_dimensions(out.join(format!("card{i}.png"))).unwrap();
        // 120 * 0.24 / 2.48 = 11.6 → 12 → 6px per edge
        assert_eq!(dims, (132, 180));
    }
    assert!(!out.join("broken.png").exists());
}

#[test]
fn jpeg_corner_fix_blackens_card_corners() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("pale.jpg");
    write_jpeg(&input, 750, 1050);
    let out = tmp.path().join("out");

    let policy = OutputPolicy {
        corner_fix: true,
        ..OutputPolicy::default()
    };
    run(&input, &out, &policy);

    let result = image::open(out.join("pale.png")).unwrap().into_rgba8();
    // Inner corners are painted black; the middle of the top edge is not.
    for (x, y) in [(36, 36), (785, 36), (36, 1085), (785, 1085)] {
        assert_eq!(*result.get_pixel(x, y), Rgba([0, 0, 0, 255]), "({x}, {y})");
    }
    let mid = result.get_pixel(411, 40);
    assert!(mid[0] > 200, "edge artwork was painted: {mid:?}");
}

#[test]
fn png_and_jpg_with_one_stem_produce_one_output() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("cards");
    fs::create_dir(&input).unwrap();
    for i in 0..12 {
        write_png(&input.join(format!("c{i}.png")), 100, 140);
        write_jpeg(&input.join(format!("c{i}.jpg")), 100, 140);
    }
    let out = tmp.path().join("out");

    let (summary, events) = run(&input, &out, &OutputPolicy::default());
    assert_eq!(
        summary,
        RunSummary {
            written: 12,
            skipped: 12,
            failed: 0
        }
    );
    let skipped = events
        .iter()
        .filter(|e| matches!(e, ProcessEvent::Skipped { .. }))
        .count();
    assert_eq!(skipped, 12);

    let names = sorted_names(&out);
    assert_eq!(names.len(), 12);
    for name in names {
        let dims = image::image_dimensions(out.join(&name)).unwrap();
        assert_eq!(dims, (110, 150), "{name}");
    }
}
