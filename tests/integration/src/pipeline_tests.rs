//! End-to-end pipeline tests
//!
//! Each test runs the whole flow against a real frame server on loopback:
//! config text -> collection -> output directory -> remote reconciliation.

use std::fs;
use std::path::{Path, PathBuf};

use frame_core::{RunConfig, SyncEngine, SyncOptions, Transform, Uploader};
use frame_remote::{FrameServer, RemoteClient, ServerConfig};
use frame_test_utils::PhotoTree;
use pretty_assertions::assert_eq;
use tokio::runtime::Runtime;
use tokio::sync::broadcast;

const NOW: u64 = 1_700_000_000;

/// Stand-in for `convert`: copies bytes.
struct CopyTransform;

impl Transform for CopyTransform {
    fn transform(&self, source: &Path, output: &Path) -> frame_core::Result<()> {
        fs::copy(source, output)?;
        Ok(())
    }
}

/// Stand-in for `scp`: copies into the serving directory under the
/// lower-cased basename.
struct CopyUploader {
    serving: PathBuf,
}

impl Uploader for CopyUploader {
    fn upload(&self, file: &Path) -> frame_core::Result<()> {
        let name = frame_fs::folded_basename(file).unwrap();
        fs::copy(file, self.serving.join(name))?;
        Ok(())
    }
}

/// A frame server running on its own runtime until dropped.
struct Frame {
    _runtime: Runtime,
    port: u16,
    shutdown: broadcast::Sender<()>,
    serving: PathBuf,
}

impl Frame {
    fn start(serving: PathBuf) -> Self {
        fs::create_dir_all(&serving).unwrap();
        let runtime = Runtime::new().unwrap();
        let config = ServerConfig::new(&serving).bind_address("127.0.0.1:0".parse().unwrap());
        let server = runtime.block_on(FrameServer::bind(config)).unwrap();
        let port = server.local_addr().unwrap().port();
        let shutdown = server.shutdown_signal();
        runtime.spawn(server.serve());
        Self {
            _runtime: runtime,
            port,
            shutdown,
            serving,
        }
    }

    fn client(&self) -> RemoteClient {
        RemoteClient::new("127.0.0.1", self.port)
    }

    fn uploader(&self) -> CopyUploader {
        CopyUploader {
            serving: self.serving.clone(),
        }
    }

    fn files(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(&self.serving)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        let _ = self.shutdown.send(());
    }
}

fn library() -> PhotoTree {
    PhotoTree::new()
        .photo("photos/20140601 Beach/20140601_1200_a.jpg")
        .photo("photos/20140601 Beach/20140601_1300_b.JPG")
        .photo("photos/20140601 Beach/20140601_1400_c.jpg")
        .star(
            "photos/20140601 Beach",
            &["20140601_1200_a.jpg", "20140601_1300_b.JPG"],
        )
        .photo("photos/20140702 Hike/20140702_0900_d.jpg")
        .star("photos/20140702 Hike", &["20140702_0900_d.jpg"])
        .photo("photos/scans/20140101_0000_e.jpg")
        .star("photos/scans", &["20140101_0000_e.jpg"])
}

fn config(tree: &PhotoTree) -> RunConfig {
    RunConfig::parse(&format!(
        r#"
output_path = '{out}'

[[transfer]]
path = '{photos}'
local = [
  {{ stage = "path_pattern", dir = '\d{{8}} .+', file = '\d{{8}}_\d{{4}}.+[.]jpg' }},
  {{ stage = "curation" }},
]
"#,
        out = tree.path("out").display(),
        photos = tree.path("photos").display(),
    ))
    .unwrap()
}

fn engine<'a>(config: &'a RunConfig, frame: &Frame) -> SyncEngine<'a> {
    SyncEngine::from_config(config)
        .with_transform(CopyTransform)
        .with_remote(frame.client(), frame.uploader())
}

#[test]
fn test_first_run_fills_the_frame() {
    let tree = library();
    let config = config(&tree);
    let frame = Frame::start(tree.path("frame"));

    let report = engine(&config, &frame)
        .run(NOW, SyncOptions::default())
        .unwrap();

    assert_eq!(report.candidates, 3);
    assert_eq!(report.fresh, 3);
    assert_eq!(report.uploaded, 3);
    assert!(report.is_clean());
    assert_eq!(
        tree.list("out"),
        vec![
            "20140601_1200_a.jpg",
            "20140601_1300_b.JPG",
            "20140702_0900_d.jpg",
        ]
    );
    assert_eq!(
        frame.files(),
        vec![
            "20140601_1200_a.jpg",
            "20140601_1300_b.jpg",
            "20140702_0900_d.jpg",
        ]
    );
}

#[test]
fn test_second_run_changes_nothing() {
    let tree = library();
    let config = config(&tree);
    let frame = Frame::start(tree.path("frame"));

    engine(&config, &frame)
        .run(NOW, SyncOptions::default())
        .unwrap();
    let second = engine(&config, &frame)
        .run(NOW, SyncOptions::default())
        .unwrap();

    assert_eq!(second.fresh, 0);
    assert_eq!(second.present, 3);
    assert!(second.plan.uploads.is_empty());
    assert!(second.plan.deletes.is_empty());
    assert_eq!(second.uploaded, 0);
    assert_eq!(second.deleted, None);
    assert!(second.stale.is_empty());
}

#[test]
fn test_unstarred_photo_leaves_the_frame() {
    let tree = library();
    let config = config(&tree);
    let frame = Frame::start(tree.path("frame"));

    engine(&config, &frame)
        .run(NOW, SyncOptions::default())
        .unwrap();

    // Drop the star from the hike photo
    let tree = tree.sidecar("photos/20140702 Hike", "");
    let report = engine(&config, &frame)
        .run(NOW, SyncOptions::default())
        .unwrap();

    assert_eq!(report.stale, vec![tree.path("out/20140702_0900_d.jpg")]);
    assert_eq!(report.plan.deletes, vec!["20140702_0900_d.jpg".to_string()]);
    assert_eq!(report.deleted, Some(1));
    assert_eq!(
        frame.files(),
        vec!["20140601_1200_a.jpg", "20140601_1300_b.jpg"]
    );
}

#[test]
fn test_frame_files_not_in_selection_are_deleted() {
    let tree = library().file("frame/stranger.jpg", b"s");
    let config = config(&tree);
    let frame = Frame::start(tree.path("frame"));

    let report = engine(&config, &frame)
        .run(NOW, SyncOptions::default())
        .unwrap();

    assert_eq!(report.plan.deletes, vec!["stranger.jpg".to_string()]);
    assert_eq!(report.deleted, Some(1));
    assert!(!frame.files().contains(&"stranger.jpg".to_string()));
}

#[test]
fn test_mixed_case_frame_file_is_deleted_and_stays_gone() {
    let tree = library().file("frame/Stale.JPG", b"s");
    let config = config(&tree);
    let frame = Frame::start(tree.path("frame"));

    let first = engine(&config, &frame)
        .run(NOW, SyncOptions::default())
        .unwrap();
    assert_eq!(first.plan.deletes, vec!["Stale.JPG".to_string()]);
    assert_eq!(first.deleted, Some(1));
    assert!(!frame.files().contains(&"Stale.JPG".to_string()));

    let second = engine(&config, &frame)
        .run(NOW, SyncOptions::default())
        .unwrap();
    assert!(second.plan.is_empty());
}

#[test]
fn test_frame_going_away_keeps_local_output() {
    let tree = library();
    let config = config(&tree);
    let frame = Frame::start(tree.path("frame"));
    let client = frame.client();
    let uploader = frame.uploader();
    drop(frame);
    std::thread::sleep(std::time::Duration::from_millis(100));

    let report = SyncEngine::from_config(&config)
        .with_transform(CopyTransform)
        .with_remote(client, uploader)
        .run(NOW, SyncOptions::default())
        .unwrap();

    assert!(report.remote_skipped.is_some());
    assert_eq!(report.uploaded, 0);
    assert_eq!(tree.list("out").len(), 3);
}
