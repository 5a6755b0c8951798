use std::path::Path;

use wis3d::{BoxOptions, BoxesInput, LineOptions, SceneRegistry, SessionConfig, Wis3d};

fn session(root: &Path, registry: &SceneRegistry) -> Result<Wis3d, wis3d::Wis3dError> {
    Wis3d::with_registry(SessionConfig::new(root, "seq"), registry)
}

fn unit_line(
    vis: &mut Wis3d,
    name: Option<&str>,
) -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
    let path = vis.add_lines(
        [0.0, 0.0, 0.0],
        [1.0, 1.0, 1.0],
        LineOptions {
            name: name.map(str::to_string),
            ..Default::default()
        },
    )?;
    Ok(path.ok_or("session is disabled")?)
}

#[test]
fn counters_are_monotonic() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let registry = SceneRegistry::new();
    let mut vis = session(tmp_dir.path(), &registry)?;

    let names = (0..4)
        .map(|_| unit_line(&mut vis, None))
        .collect::<Result<Vec<_>, _>>()?
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect::<Vec<_>>();
    assert_eq!(names, ["00000.json", "00001.json", "00002.json", "00003.json"]);
    Ok(())
}

#[test]
fn explicit_name_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let registry = SceneRegistry::new();
    let mut vis = session(tmp_dir.path(), &registry)?;

    let first = unit_line(&mut vis, Some("edge"))?;
    let path = vis
        .add_lines(
            [0.0, 0.0, 0.0],
            [2.0, 2.0, 2.0],
            LineOptions {
                name: Some("edge".to_string()),
                ..Default::default()
            },
        )?
        .ok_or("session is disabled")?;
    assert_eq!(first, path);

    let lines: serde_json::Value = serde_json::from_slice(&std::fs::read(&path)?)?;
    assert_eq!(lines[0]["end_point"], serde_json::json!([2.0, 2.0, 2.0]));

    // the counter still advanced twice
    let next = unit_line(&mut vis, None)?;
    assert!(next.ends_with("lines/00002.json"));
    Ok(())
}

#[test]
fn scenes_are_isolated() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let registry = SceneRegistry::new();
    let mut vis = session(tmp_dir.path(), &registry)?;

    vis.set_scene_id(42);
    let path = unit_line(&mut vis, None)?;
    assert_eq!(path, tmp_dir.path().join("seq/00042/lines/00000.json"));

    vis.increase_scene_id();
    assert_eq!(vis.scene_id(), Some(43));
    assert_eq!(vis.scene_dir(), Some(tmp_dir.path().join("seq/00043")));
    Ok(())
}

#[test]
fn directory_is_cleared_once() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let stale = tmp_dir.path().join("seq/00007/lines/old.json");
    std::fs::create_dir_all(stale.parent().ok_or("no parent")?)?;
    std::fs::write(&stale, b"[]")?;

    let registry = SceneRegistry::new();
    let mut first = session(tmp_dir.path(), &registry)?;
    assert!(!stale.exists());
    let written = unit_line(&mut first, None)?;

    let mut second = session(tmp_dir.path(), &registry)?;
    assert!(written.exists());
    assert_eq!(first.scene_id(), Some(0));
    assert_eq!(second.scene_id(), Some(1));

    let appended = unit_line(&mut second, None)?;
    assert_eq!(appended, tmp_dir.path().join("seq/00001/lines/00000.json"));
    Ok(())
}

#[test]
fn auto_increase_disabled_shares_scene_zero() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let registry = SceneRegistry::new();
    let config = SessionConfig::new(tmp_dir.path(), "seq").with_auto_increase(false);
    let first = Wis3d::with_registry(config.clone(), &registry)?;
    let second = Wis3d::with_registry(config, &registry)?;
    assert_eq!(first.scene_id(), Some(0));
    assert_eq!(second.scene_id(), Some(0));
    Ok(())
}

#[test]
fn disabled_session_is_a_no_op() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let registry = SceneRegistry::new();
    let config = SessionConfig::new(tmp_dir.path(), "seq")
        .with_enable(false)
        .with_xyz_pattern(["not", "an", "axis"]);
    let mut vis = Wis3d::with_registry(config, &registry)?;

    assert!(!vis.is_enabled());
    assert_eq!(vis.scene_id(), None);
    vis.increase_scene_id();

    // even invalid input is ignored
    let res = vis.add_boxes(
        BoxesInput::corners(vec![[0.0, 0.0, 0.0]]),
        BoxOptions::default(),
    )?;
    assert!(res.is_none());
    assert!(!tmp_dir.path().join("seq").exists());
    Ok(())
}

#[test]
fn empty_sequence_name_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let registry = SceneRegistry::new();
    let res = Wis3d::with_registry(SessionConfig::new(tmp_dir.path(), ""), &registry);
    assert!(matches!(res, Err(wis3d::Wis3dError::Configuration(_))));
    Ok(())
}
