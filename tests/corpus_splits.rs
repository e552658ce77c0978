use std::collections::HashSet;
use std::fs;
use std::path::Path;

use caption_corpus::{CorpusIndex, Record, SplitLabel, SplitRatios, split_records};
use tempfile::tempdir;

fn write_pair(images: &Path, annotations: &Path, stem: &str, ext: &str) {
    fs::write(images.join(format!("{stem}.{ext}")), stem.as_bytes()).unwrap();
    fs::write(annotations.join(format!("{stem}.json")), b"{}").unwrap();
}

fn image_names(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .map(|record| {
            record
                .image_path
                .file_name()
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}

#[test]
fn missing_annotation_is_reported_not_fatal() {
    let images = tempdir().unwrap();
    let annotations = tempdir().unwrap();
    for (stem, ext) in [("p1", "png"), ("p2", "jpg"), ("p3", "JPEG"), ("p4", "png")] {
        write_pair(images.path(), annotations.path(), stem, ext);
    }
    fs::write(images.path().join("lonely.png"), b"x").unwrap();

    let scan = CorpusIndex::new(images.path(), annotations.path())
        .scan()
        .unwrap();
    assert_eq!(scan.records.len(), 4);
    assert_eq!(scan.missing_annotations.len(), 1);
    assert!(scan.missing_annotations[0].ends_with("lonely.png"));
}

#[test]
fn ten_pairs_split_reproducibly() {
    let images = tempdir().unwrap();
    let annotations = tempdir().unwrap();
    for idx in 0..10 {
        write_pair(images.path(), annotations.path(), &format!("frame_{idx:02}"), "jpg");
    }
    let index = CorpusIndex::new(images.path(), annotations.path());

    let first = split_records(index.scan().unwrap().records, SplitRatios::default(), 42).unwrap();
    let second = split_records(index.scan().unwrap().records, SplitRatios::default(), 42).unwrap();

    assert_eq!(first.lengths(), [8, 1, 1]);
    assert_eq!(image_names(&first.train), image_names(&second.train));
    assert_eq!(first, second);

    let all: HashSet<String> = [SplitLabel::Train, SplitLabel::Validation, SplitLabel::Test]
        .into_iter()
        .flat_map(|label| image_names(first.get(label)))
        .collect();
    assert_eq!(all.len(), 10);
}

#[test]
fn concurrent_splits_do_not_interfere() {
    let items: Vec<u32> = (0..200).collect();
    let expected = split_records(items.clone(), SplitRatios::new(0.5, 0.25, 0.25), 11).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let items = items.clone();
            std::thread::spawn(move || {
                split_records(items, SplitRatios::new(0.5, 0.25, 0.25), 11).unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn ratio_violation_is_a_configuration_error() {
    let err = split_records(vec![1, 2, 3], SplitRatios::new(0.9, 0.1, 0.1), 42).unwrap_err();
    assert!(matches!(err, caption_corpus::DatasetError::Configuration(_)));
}
