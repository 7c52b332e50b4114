//! Tests for the TreeCollector

use std::path::PathBuf;

use frame_core::{TransferSpec, TreeCollector};
use frame_filters::{GlobalStage, LocalStage, NamePattern, SamplerParams};
use frame_test_utils::PhotoTree;
use pretty_assertions::assert_eq;

fn paths(collection: &frame_core::Collection) -> Vec<PathBuf> {
    collection
        .files
        .iter()
        .map(|f| f.path().to_path_buf())
        .collect()
}

fn photo_pipeline(root: &std::path::Path) -> TransferSpec {
    TransferSpec::new(root)
        .with_local(LocalStage::PathPattern {
            dir: Some(NamePattern::new(r"\d{8} .+").unwrap()),
            file: Some(NamePattern::new(r"\d{8}_\d{4}.+[.]jpg").unwrap()),
        })
        .with_local(LocalStage::Curation)
}

#[test]
fn test_pattern_then_curation() {
    let tree = PhotoTree::new()
        .photo("20140601 Beach/20140601_1200_a.jpg")
        .photo("20140601 Beach/20140601_1300_b.jpg")
        .photo("20140601 Beach/notes.txt")
        .star("20140601 Beach", &["20140601_1200_a.jpg", "notes.txt"])
        .photo("Misc/20140601_1400_c.jpg")
        .star("Misc", &["20140601_1400_c.jpg"]);

    // The root itself has no sidecar, so nothing is taken from it
    let collection = TreeCollector::new().collect(&photo_pipeline(tree.root()), 0);

    assert_eq!(
        paths(&collection),
        vec![tree.path("20140601 Beach/20140601_1200_a.jpg")]
    );
}

#[test]
fn test_curation_without_sidecar_still_descends() {
    let tree = PhotoTree::new()
        .photo("top.jpg")
        .photo("album/inner.jpg")
        .star("album", &["inner.jpg"]);

    let spec = TransferSpec::new(tree.root()).with_local(LocalStage::Curation);
    let collection = TreeCollector::new().collect(&spec, 0);

    assert_eq!(paths(&collection), vec![tree.path("album/inner.jpg")]);
}

#[test]
fn test_suppressed_star_is_excluded() {
    let tree = PhotoTree::new()
        .photo("album/a.jpg")
        .photo("album/b.jpg")
        .sidecar(
            "album",
            "[a.jpg]\nstar=yes\nsuppress=yes\n[B.JPG]\nstar=yes\n",
        );

    let spec = TransferSpec::new(tree.root()).with_local(LocalStage::Curation);
    let collection = TreeCollector::new().collect(&spec, 0);

    assert_eq!(paths(&collection), vec![tree.path("album/b.jpg")]);
}

#[test]
fn test_global_stages_apply_per_spec_before_union() {
    let tree = PhotoTree::new()
        .photo_at("old/a.jpg", 100)
        .photo_at("old/b.jpg", 200)
        .photo_at("new/c.jpg", 300)
        .photo_at("new/d.jpg", 400);

    let recent_one = |dir: &str| {
        TransferSpec::new(tree.path(dir)).with_global(GlobalStage::Recent { pick: Some(1) })
    };
    let specs = vec![recent_one("old"), recent_one("new")];

    let collection = TreeCollector::new().collect_all(&specs, 0);

    // One per spec; a single spec over both would have kept only d.jpg
    assert_eq!(
        paths(&collection),
        vec![tree.path("new/d.jpg"), tree.path("old/b.jpg")]
    );
}

#[test]
fn test_overlapping_specs_deduplicate_by_path() {
    let tree = PhotoTree::new().photo("a.jpg").photo("b.jpg");

    let specs = vec![TransferSpec::new(tree.root()), TransferSpec::new(tree.root())];
    let collection = TreeCollector::new().collect_all(&specs, 0);

    assert_eq!(collection.files.len(), 2);
}

#[test]
fn test_curation_cache_is_shared_across_specs() {
    let tree = PhotoTree::new()
        .photo("album/a.jpg")
        .star("album", &["a.jpg"]);

    let spec = TransferSpec::new(tree.root()).with_local(LocalStage::Curation);
    let collector = TreeCollector::new();
    collector.collect(&spec, 0);
    let cached = collector.curation().cached_dirs();

    // A second walk must not add new lookups
    collector.collect(&spec, 0);
    assert_eq!(collector.curation().cached_dirs(), cached);
    assert_eq!(cached, 2);
}

#[test]
fn test_unlistable_subtree_is_reported_and_walk_continues() {
    let tree = PhotoTree::new().photo("good/a.jpg");

    let specs = vec![
        TransferSpec::new(tree.path("missing")),
        TransferSpec::new(tree.path("good")),
    ];
    let collection = TreeCollector::new().collect_all(&specs, 0);

    assert_eq!(paths(&collection), vec![tree.path("good/a.jpg")]);
    assert_eq!(collection.warnings.len(), 1);
    assert_eq!(collection.warnings[0].path, tree.path("missing"));
}

#[test]
fn test_sampler_is_reproducible_across_collectors() {
    let mut tree = PhotoTree::new();
    for i in 0..40 {
        tree = tree.photo(&format!("roll/IMG_{i:04}.jpg"));
    }

    let spec = TransferSpec::new(tree.root())
        .with_global(GlobalStage::Sample(SamplerParams::new(8, 20, 4).unwrap()));
    let now = 1_700_000_000;

    let first = TreeCollector::new().collect(&spec, now);
    let second = TreeCollector::new().collect(&spec, now);

    assert_eq!(paths(&first), paths(&second));
    assert!(!first.files.is_empty());
    assert!(first.files.len() <= 8);
}
