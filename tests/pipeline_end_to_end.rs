#![cfg(feature = "dataset")]

use leafmatch::dataset::{load_reference_set, DatasetConfig};
use leafmatch::image::io::{decode_color_image, load_gray_image};
use leafmatch::{normalize, Matcher, Notification, Threshold};
use std::fs;
use std::path::Path;

fn make_rgb(width: u32, height: u32, seed: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            let v = (x * 13) ^ (y * 7) ^ (x * y * seed);
            data.extend_from_slice(&[v as u8, (v >> 1) as u8, (v * 3) as u8]);
        }
    }
    data
}

fn write_rgb(path: &Path, width: u32, height: u32, seed: u32) {
    image::RgbImage::from_raw(width, height, make_rgb(width, height, seed))
        .unwrap()
        .save(path)
        .unwrap();
}

#[test]
fn uploaded_photo_matches_its_reference_entry() {
    let dir = tempfile::tempdir().unwrap();
    let images = dir.path().join("images");
    fs::create_dir(&images).unwrap();
    write_rgb(&images.join("healthy.png"), 48, 40, 1);
    write_rgb(&images.join("blight.png"), 64, 48, 2);
    write_rgb(&images.join("rust.png"), 40, 40, 3);
    let csv = dir.path().join("labels.csv");
    fs::write(
        &csv,
        "image_id,label,fertilizer\n\
         healthy.jpg,Healthy,None\n\
         blight.jpg,Early Blight,Copper fungicide\n\
         rust.jpg,Leaf Rust,Sulfur\n",
    )
    .unwrap();

    let upload = dir.path().join("capture.png");
    fs::copy(images.join("blight.png"), &upload).unwrap();
    let query = load_gray_image(&upload).unwrap();

    let set = load_reference_set(&DatasetConfig::new(&csv, &images)).unwrap();
    assert_eq!(set.len(), 3);

    let result = Matcher::new().find_match(query.view(), set.records(), Threshold::DEFAULT);

    assert_eq!(result.index(), Some(1));
    assert_eq!(result.label(), Some("Early Blight"));
    assert_eq!(result.auxiliary_value(), Some("Copper fungicide"));
    assert!((result.score().unwrap() - 1.0).abs() < 1e-6);
    assert_eq!(result.records_scored(), 2);
    assert!(result.observations()[0].score < Threshold::DEFAULT.value());

    let note = Notification::for_result(&result);
    assert!(note.subject.contains("Early Blight"));
}

#[test]
fn in_memory_upload_uses_the_same_luminance() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leaf.png");
    write_rgb(&path, 20, 16, 5);

    let bytes = fs::read(&path).unwrap();
    let from_bytes = normalize(&decode_color_image(&bytes).unwrap());
    let from_disk = load_gray_image(&path).unwrap();
    assert_eq!(from_bytes, from_disk);

    assert!(decode_color_image(b"not an image").is_err());
}
