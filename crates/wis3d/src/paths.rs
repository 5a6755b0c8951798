use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The kinds of objects a session can export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKind {
    /// A point cloud, written as PLY.
    PointCloud,
    /// A triangle mesh, written as PLY.
    Mesh,
    /// Oriented boxes.
    Boxes,
    /// A raster image, written as PNG.
    Image,
    /// Line segments.
    Lines,
    /// An imported `.binvox` file.
    BinVoxel,
    /// An imported `.vox` file.
    VoxVoxel,
    /// Voxels given by their centers.
    BoxVoxel,
    /// Spheres.
    Spheres,
    /// A sequence of camera poses.
    CameraTrajectory,
    /// Keypoint correspondences between two images.
    Correspondences,
}

impl ObjectKind {
    /// All object kinds.
    pub const ALL: [ObjectKind; 11] = [
        ObjectKind::PointCloud,
        ObjectKind::Mesh,
        ObjectKind::Boxes,
        ObjectKind::Image,
        ObjectKind::Lines,
        ObjectKind::BinVoxel,
        ObjectKind::VoxVoxel,
        ObjectKind::BoxVoxel,
        ObjectKind::Spheres,
        ObjectKind::CameraTrajectory,
        ObjectKind::Correspondences,
    ];

    /// The folder under the scene directory that holds objects of this kind.
    pub fn folder(&self) -> &'static str {
        match self {
            ObjectKind::PointCloud => "point_clouds",
            ObjectKind::Mesh => "meshes",
            ObjectKind::Boxes => "boxes",
            ObjectKind::Image => "images",
            ObjectKind::Lines => "lines",
            ObjectKind::BinVoxel | ObjectKind::VoxVoxel | ObjectKind::BoxVoxel => "voxels",
            ObjectKind::Spheres => "spheres",
            ObjectKind::CameraTrajectory => "camera_trajectories",
            ObjectKind::Correspondences => "correspondences",
        }
    }

    /// The file extension, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ObjectKind::PointCloud | ObjectKind::Mesh => "ply",
            ObjectKind::Image => "png",
            ObjectKind::BinVoxel => "binvox",
            ObjectKind::VoxVoxel => "vox",
            ObjectKind::Boxes
            | ObjectKind::Lines
            | ObjectKind::BoxVoxel
            | ObjectKind::Spheres
            | ObjectKind::CameraTrajectory
            | ObjectKind::Correspondences => "json",
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ObjectKind::PointCloud => "point cloud",
            ObjectKind::Mesh => "mesh",
            ObjectKind::Boxes => "boxes",
            ObjectKind::Image => "image",
            ObjectKind::Lines => "lines",
            ObjectKind::BinVoxel => "binvox voxels",
            ObjectKind::VoxVoxel => "vox voxels",
            ObjectKind::BoxVoxel => "voxels",
            ObjectKind::Spheres => "spheres",
            ObjectKind::CameraTrajectory => "camera trajectory",
            ObjectKind::Correspondences => "keypoint correspondences",
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Allocates output paths for one session.
///
/// Paths follow `<out_folder>/<sequence>/<scene:05>/<folder>/<name>.<ext>`,
/// where `name` defaults to the zero padded number of earlier allocations
/// of the same kind. The per-kind counters advance on every allocation,
/// named or not, and are not reset when the scene changes.
#[derive(Debug, Clone)]
pub struct ExportPaths {
    out_folder: PathBuf,
    sequence_name: String,
    scene_id: usize,
    counters: HashMap<ObjectKind, usize>,
}

impl ExportPaths {
    /// Create an allocator rooted at `out_folder/sequence_name`.
    pub fn new(
        out_folder: impl Into<PathBuf>,
        sequence_name: impl Into<String>,
        scene_id: usize,
    ) -> Self {
        Self {
            out_folder: out_folder.into(),
            sequence_name: sequence_name.into(),
            scene_id,
            counters: HashMap::new(),
        }
    }

    /// The current scene id.
    pub fn scene_id(&self) -> usize {
        self.scene_id
    }

    /// Point subsequent allocations at another scene.
    pub fn set_scene_id(&mut self, scene_id: usize) {
        self.scene_id = scene_id;
    }

    /// The root of the output tree.
    pub fn out_folder(&self) -> &Path {
        &self.out_folder
    }

    /// The sequence directory, `<out_folder>/<sequence>`.
    pub fn sequence_dir(&self) -> PathBuf {
        self.out_folder.join(&self.sequence_name)
    }

    /// The directory of the current scene.
    pub fn scene_dir(&self) -> PathBuf {
        self.sequence_dir().join(format!("{:05}", self.scene_id))
    }

    /// The number of allocations made so far for `kind`.
    pub fn counter(&self, kind: ObjectKind) -> usize {
        self.counters.get(&kind).copied().unwrap_or(0)
    }

    /// The path the next allocation of `kind` would return, without side effects.
    pub fn peek(&self, kind: ObjectKind, name: Option<&str>) -> PathBuf {
        let file_name = match name {
            Some(name) => format!("{}.{}", name, kind.extension()),
            None => format!("{:05}.{}", self.counter(kind), kind.extension()),
        };
        self.scene_dir().join(kind.folder()).join(file_name)
    }

    /// Create the folder for `kind` and return the path of the next file.
    ///
    /// The counter only advances once the directories exist.
    pub fn allocate(&mut self, kind: ObjectKind, name: Option<&str>) -> std::io::Result<PathBuf> {
        let path = self.peek(kind, name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        *self.counters.entry(kind).or_insert(0) += 1;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_and_extension() {
        assert_eq!(ObjectKind::PointCloud.folder(), "point_clouds");
        assert_eq!(ObjectKind::Mesh.extension(), "ply");
        assert_eq!(ObjectKind::Image.extension(), "png");
        assert_eq!(ObjectKind::BinVoxel.folder(), "voxels");
        assert_eq!(ObjectKind::VoxVoxel.extension(), "vox");
        assert_eq!(ObjectKind::CameraTrajectory.folder(), "camera_trajectories");
        assert!(ObjectKind::ALL
            .iter()
            .filter(|k| k.folder() != "voxels")
            .all(|k| ["ply", "png", "json"].contains(&k.extension())));
    }

    #[test]
    fn test_allocate_counts_every_call() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let mut paths = ExportPaths::new(tmp_dir.path(), "seq", 3);

        let first = paths.allocate(ObjectKind::Lines, None)?;
        let named = paths.allocate(ObjectKind::Lines, Some("rays"))?;
        let second = paths.allocate(ObjectKind::Lines, None)?;

        let scene = tmp_dir.path().join("seq").join("00003").join("lines");
        assert_eq!(first, scene.join("00000.json"));
        assert_eq!(named, scene.join("rays.json"));
        assert_eq!(second, scene.join("00002.json"));
        assert!(scene.is_dir());
        assert_eq!(paths.counter(ObjectKind::Lines), 3);
        assert_eq!(paths.counter(ObjectKind::Boxes), 0);
        Ok(())
    }

    #[test]
    fn test_counters_survive_scene_change() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let mut paths = ExportPaths::new(tmp_dir.path(), "seq", 0);
        paths.allocate(ObjectKind::Boxes, None)?;
        paths.set_scene_id(7);
        let path = paths.allocate(ObjectKind::Boxes, None)?;
        assert_eq!(path, tmp_dir.path().join("seq/00007/boxes/00001.json"));
        Ok(())
    }

    #[test]
    fn test_failed_allocation_keeps_counter() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        // a regular file where the sequence directory should be
        let blocker = tmp_dir.path().join("seq");
        std::fs::write(&blocker, b"")?;

        let mut paths = ExportPaths::new(tmp_dir.path(), "seq", 0);
        assert!(paths.allocate(ObjectKind::Spheres, None).is_err());
        assert_eq!(paths.counter(ObjectKind::Spheres), 0);
        Ok(())
    }
}
