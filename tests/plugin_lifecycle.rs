//! Build lifecycle scenarios driven through the plugin hooks.

use kodegen_bundler_addon::bundler::{
    AssetManifest, Error, HashAlgorithm, LoaderSettingsBuilder, NodeAddonPlugin, Warning, digest,
};
use std::{path::Path, sync::Arc};

fn write_addon(dir: &Path, name: &str, content: &[u8]) -> String {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

#[tokio::test]
async fn hashed_addon_is_emitted_next_to_loader() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let dist = out.path().join("dist");
    let content = b"\x7fELF fake addon";
    let id = write_addon(src.path(), "foo.node", content);

    let plugin = NodeAddonPlugin::new(
        LoaderSettingsBuilder::new()
            .output_dir(&dist)
            .hash_length(8)
            .build()
            .unwrap(),
    )
    .unwrap();
    plugin.build_start(None).unwrap();

    let resolved = plugin.resolve_id(&id).expect("addon should be claimed");
    let loaded = plugin.load(&resolved).await.unwrap().expect("loader");

    let hash = digest(content, HashAlgorithm::Md5, 8);
    let file_name = format!("foo.{hash}.node");
    assert!(loaded.code.contains(&format!("\"{file_name}\"")));
    assert!(!loaded.code.contains(dist.to_str().unwrap()));

    let mut manifest = AssetManifest::new();
    let report = plugin.generate_bundle(None, &mut manifest).await.unwrap();

    assert!(report.is_complete());
    assert_eq!(std::fs::read(dist.join(&file_name)).unwrap(), content);
    assert_eq!(manifest.get(&file_name).unwrap().source(), content);
}

#[tokio::test]
async fn missing_addon_is_warned_and_others_still_emitted() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let present = write_addon(src.path(), "present.node", b"here");
    let missing = src.path().join("missing.node").to_string_lossy().into_owned();

    let plugin = NodeAddonPlugin::new(LoaderSettingsBuilder::new().build().unwrap()).unwrap();
    plugin.build_start(Some(out.path())).unwrap();

    assert!(plugin.load(&missing).await.unwrap().is_none());
    assert!(plugin.load(&present).await.unwrap().is_some());

    assert_eq!(
        plugin.session().warnings(),
        vec![Warning::MissingSource {
            id: missing.clone()
        }]
    );
    assert!(plugin.session().record(&missing).is_none());

    let mut manifest = AssetManifest::new();
    let report = plugin
        .generate_bundle(Some(out.path()), &mut manifest)
        .await
        .unwrap();
    assert_eq!(report.emitted.len(), 1);
    assert!(report.emitted[0].path.starts_with(out.path()));
    assert!(report.emitted[0].path.is_file());
}

#[tokio::test]
async fn repeated_references_emit_once() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let id = write_addon(src.path(), "native/shared.node", b"shared bytes");

    let plugin = NodeAddonPlugin::new(
        LoaderSettingsBuilder::new()
            .output_dir(out.path())
            .build()
            .unwrap(),
    )
    .unwrap();
    plugin.build_start(None).unwrap();

    let first = plugin.load(&id).await.unwrap().unwrap();
    let second = plugin.load(&format!("{id}?from=other")).await.unwrap().unwrap();
    assert_eq!(first, second);
    assert_eq!(plugin.session().registry().len(), 1);

    let mut manifest = AssetManifest::new();
    let report = plugin.generate_bundle(None, &mut manifest).await.unwrap();
    assert_eq!(report.emitted.len(), 1);
    assert_eq!(manifest.len(), 1);
}

#[tokio::test]
async fn unhashed_names_are_verbatim() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let id = write_addon(src.path(), "trackpad-macos-arm.node", &[1, 2, 3, 4]);

    let plugin = NodeAddonPlugin::new(
        LoaderSettingsBuilder::new()
            .output_dir(out.path())
            .hash(false)
            .build()
            .unwrap(),
    )
    .unwrap();
    plugin.build_start(None).unwrap();
    plugin.load(&id).await.unwrap().unwrap();

    let record = plugin.session().record(&id).unwrap();
    assert_eq!(record.output_file_name, "trackpad-macos-arm.node");

    let mut manifest = AssetManifest::new();
    plugin.generate_bundle(None, &mut manifest).await.unwrap();
    assert_eq!(
        std::fs::read(out.path().join("trackpad-macos-arm.node")).unwrap(),
        [1, 2, 3, 4]
    );
}

#[tokio::test]
async fn second_finalize_in_one_build_is_rejected() {
    let out = tempfile::tempdir().unwrap();
    let plugin = NodeAddonPlugin::new(
        LoaderSettingsBuilder::new()
            .output_dir(out.path())
            .build()
            .unwrap(),
    )
    .unwrap();
    plugin.build_start(None).unwrap();

    let mut manifest = AssetManifest::new();
    plugin.generate_bundle(None, &mut manifest).await.unwrap();

    assert!(matches!(
        plugin.generate_bundle(None, &mut manifest).await,
        Err(Error::InvalidPhase { .. })
    ));
    assert!(matches!(
        plugin.load("/late/addon.node").await,
        Err(Error::InvalidPhase { .. })
    ));
}

#[tokio::test]
async fn consecutive_builds_do_not_share_records() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let first = write_addon(src.path(), "one.node", b"one");
    let second = write_addon(src.path(), "two.node", b"two");

    let plugin = NodeAddonPlugin::new(
        LoaderSettingsBuilder::new()
            .output_dir(out.path())
            .build()
            .unwrap(),
    )
    .unwrap();

    plugin.build_start(None).unwrap();
    plugin.load(&first).await.unwrap();
    let mut manifest = AssetManifest::new();
    let report = plugin.generate_bundle(None, &mut manifest).await.unwrap();
    assert_eq!(report.emitted.len(), 1);

    plugin.build_start(None).unwrap();
    plugin.load(&second).await.unwrap();
    let mut manifest = AssetManifest::new();
    let report = plugin.generate_bundle(None, &mut manifest).await.unwrap();
    assert_eq!(report.emitted.len(), 1);
    assert!(report.emitted[0].record.original_path.ends_with("two.node"));
}

#[tokio::test]
async fn concurrent_loads_share_one_record() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let id = write_addon(src.path(), "race.node", &vec![42u8; 1 << 16]);
    let other = write_addon(src.path(), "other.node", b"other");

    let plugin = Arc::new(
        NodeAddonPlugin::new(
            LoaderSettingsBuilder::new()
                .output_dir(out.path())
                .algorithm(HashAlgorithm::Sha256)
                .hash_length(16)
                .build()
                .unwrap(),
        )
        .unwrap(),
    );
    plugin.build_start(None).unwrap();

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..20 {
        let plugin = Arc::clone(&plugin);
        let id = if i % 5 == 0 { other.clone() } else { id.clone() };
        tasks.spawn(async move { plugin.load(&id).await });
    }
    while let Some(joined) = tasks.join_next().await {
        assert!(joined.unwrap().unwrap().is_some());
    }
    assert_eq!(plugin.session().registry().len(), 2);

    let mut manifest = AssetManifest::new();
    let report = plugin.generate_bundle(None, &mut manifest).await.unwrap();
    assert_eq!(report.emitted.len(), 2);
    for emitted in &report.emitted {
        let name = &emitted.record.output_file_name;
        assert_eq!(name.split('.').nth(1).unwrap().len(), 16);
    }
}

#[tokio::test]
async fn emitted_record_points_at_the_written_file() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let id = write_addon(src.path(), "foo.node", b"late directory");

    let plugin = NodeAddonPlugin::new(LoaderSettingsBuilder::new().build().unwrap()).unwrap();
    plugin.build_start(None).unwrap();
    plugin.load(&id).await.unwrap().unwrap();

    let mut manifest = AssetManifest::new();
    let report = plugin
        .generate_bundle(Some(out.path()), &mut manifest)
        .await
        .unwrap();

    let emitted = &report.emitted[0];
    assert_eq!(emitted.record.output_path, emitted.path);
    assert!(emitted.record.output_path.starts_with(out.path()));
    assert_eq!(
        std::fs::read(&emitted.record.output_path).unwrap(),
        b"late directory"
    );
}
