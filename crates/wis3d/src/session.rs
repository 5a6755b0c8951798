use std::path::PathBuf;

use glam::DMat4;
use serde::Serialize;
use wis3d_geometry::frame::AxisPattern;
use wis3d_geometry::io::ply::{write_ply_mesh, write_ply_point_cloud};
use wis3d_io::png::encode_image_png;
use wis3d_tensor::{normalize, ArrayInput};

use crate::config::SessionConfig;
use crate::encoders::{
    build_image, build_mesh, build_point_cloud, encode_boxes, encode_camera_trajectory,
    encode_correspondences, encode_lines, encode_spheres, encode_voxels, poses_from_tensor,
    sample_rays, BoxOptions, BoxesInput, CorrespondenceOptions, ImageInput, LineOptions,
    MeshInput, PointCloudInput, Radius, RayOptions, SphereOptions, TrajectoryOptions, VoxelInput,
    VoxelOptions,
};
use crate::error::{ensure_len, TensorResultExt, Wis3dError};
use crate::paths::{ExportPaths, ObjectKind};
use crate::registry::{absolute_root, SceneRegistry};

#[derive(Debug)]
struct Session {
    sequence_name: String,
    transform: DMat4,
    paths: ExportPaths,
}

impl Session {
    fn write_json<T: Serialize>(
        &mut self,
        kind: ObjectKind,
        name: Option<&str>,
        record: &T,
    ) -> Result<PathBuf, Wis3dError> {
        let payload = serde_json::to_vec(record)?;
        self.write_bytes(kind, name, &payload)
    }

    fn write_bytes(
        &mut self,
        kind: ObjectKind,
        name: Option<&str>,
        payload: &[u8],
    ) -> Result<PathBuf, Wis3dError> {
        let path = self.paths.allocate(kind, name)?;
        std::fs::write(&path, payload)?;
        log::debug!("wrote {} to {}", kind, path.display());
        Ok(path)
    }
}

/// A handle that exports debugging geometry for the wis3d viewer.
///
/// Every `add_*` method maps its input into the viewer frame, validates it,
/// and writes one file under the current scene. It returns the written path,
/// or `None` when the session is disabled, in which case nothing is read,
/// validated or written.
#[derive(Debug)]
pub struct Wis3d {
    session: Option<Session>,
}

impl Wis3d {
    /// Create a session registered in the process-wide [`SceneRegistry`].
    pub fn new(config: SessionConfig) -> Result<Self, Wis3dError> {
        Self::with_registry(config, &SceneRegistry::global())
    }

    /// Create a session registered in `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`Wis3dError::Configuration`] for an empty output folder or
    /// sequence name and for an invalid axis pattern. Both are checked before
    /// the registry is touched, so no output is removed in that case.
    pub fn with_registry(
        config: SessionConfig,
        registry: &SceneRegistry,
    ) -> Result<Self, Wis3dError> {
        if !config.enable {
            return Ok(Self::disabled());
        }
        config.validate()?;
        let pattern = AxisPattern::parse(&config.xyz_pattern)
            .map_err(|e| Wis3dError::Configuration(e.to_string()))?;

        let scene_id = registry.resolve_session(
            &config.out_folder,
            &config.sequence_name,
            config.auto_increase,
            config.auto_remove,
        )?;
        log::info!("set up wis3d for {}: {}", config.sequence_name, scene_id);

        let out_folder = absolute_root(&config.out_folder)?;
        Ok(Self {
            session: Some(Session {
                paths: ExportPaths::new(out_folder, config.sequence_name.clone(), scene_id),
                sequence_name: config.sequence_name,
                transform: pattern.transform(),
            }),
        })
    }

    /// A session that ignores every call.
    pub fn disabled() -> Self {
        Self { session: None }
    }

    /// Whether the session writes anything.
    pub fn is_enabled(&self) -> bool {
        self.session.is_some()
    }

    /// The current scene id.
    pub fn scene_id(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.paths.scene_id())
    }

    /// The sequence name.
    pub fn sequence_name(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.sequence_name.as_str())
    }

    /// The transform from the source frame to the viewer frame.
    pub fn transform(&self) -> Option<DMat4> {
        self.session.as_ref().map(|s| s.transform)
    }

    /// The directory of the current scene.
    pub fn scene_dir(&self) -> Option<PathBuf> {
        self.session.as_ref().map(|s| s.paths.scene_dir())
    }

    /// Write subsequent objects into scene `scene_id`.
    pub fn set_scene_id(&mut self, scene_id: usize) {
        if let Some(session) = self.session.as_mut() {
            session.paths.set_scene_id(scene_id);
        }
    }

    /// Move on to the next scene.
    pub fn increase_scene_id(&mut self) {
        if let Some(id) = self.scene_id() {
            self.set_scene_id(id + 1);
        }
    }

    /// Add a point cloud, written as PLY.
    pub fn add_point_cloud(
        &mut self,
        input: PointCloudInput,
        name: Option<&str>,
    ) -> Result<Option<PathBuf>, Wis3dError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(None);
        };
        let pointcloud = build_point_cloud(input, &session.transform)?;
        let path = session.paths.allocate(ObjectKind::PointCloud, name)?;
        write_ply_point_cloud(&path, &pointcloud)?;
        log::debug!("wrote {} points to {}", pointcloud.len(), path.display());
        Ok(Some(path))
    }

    /// Add a triangle mesh, written as PLY.
    pub fn add_mesh(
        &mut self,
        input: MeshInput,
        name: Option<&str>,
    ) -> Result<Option<PathBuf>, Wis3dError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(None);
        };
        let mesh = build_mesh(input, &session.transform)?;
        let path = session.paths.allocate(ObjectKind::Mesh, name)?;
        write_ply_mesh(&path, &mesh)?;
        log::debug!("wrote {} faces to {}", mesh.faces().len(), path.display());
        Ok(Some(path))
    }

    /// Add an image, written as PNG.
    pub fn add_image(
        &mut self,
        input: impl Into<ImageInput>,
        name: Option<&str>,
    ) -> Result<Option<PathBuf>, Wis3dError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(None);
        };
        let image = build_image(input.into(), ObjectKind::Image)?;
        let payload = encode_image_png(&image)?;
        session
            .write_bytes(ObjectKind::Image, name, &payload)
            .map(Some)
    }

    /// Add oriented boxes.
    pub fn add_boxes(
        &mut self,
        input: BoxesInput,
        options: BoxOptions,
    ) -> Result<Option<PathBuf>, Wis3dError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(None);
        };
        let boxes = encode_boxes(input, &options, &session.transform)?;
        session
            .write_json(ObjectKind::Boxes, options.name.as_deref(), &boxes)
            .map(Some)
    }

    /// Add an axis aligned box given by its six borders.
    #[allow(clippy::too_many_arguments)]
    pub fn add_box_by_6border(
        &mut self,
        xmin: f64,
        ymin: f64,
        zmin: f64,
        xmax: f64,
        ymax: f64,
        zmax: f64,
        name: Option<&str>,
    ) -> Result<Option<PathBuf>, Wis3dError> {
        let center = [(xmin + xmax) / 2.0, (ymin + ymax) / 2.0, (zmin + zmax) / 2.0];
        let extent = [xmax - xmin, ymax - ymin, zmax - zmin];
        self.add_boxes(
            BoxesInput::definition(center, [0.0; 3], extent),
            BoxOptions {
                name: name.map(str::to_string),
                ..Default::default()
            },
        )
    }

    /// Add line segments from `start_points` to `end_points`.
    pub fn add_lines(
        &mut self,
        start_points: impl Into<ArrayInput>,
        end_points: impl Into<ArrayInput>,
        options: LineOptions,
    ) -> Result<Option<PathBuf>, Wis3dError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(None);
        };
        let lines = encode_lines(start_points, end_points, options.colors, &session.transform)?;
        session
            .write_json(ObjectKind::Lines, options.name.as_deref(), &lines)
            .map(Some)
    }

    /// Add voxels, either imported from a voxel file or given by their centers.
    pub fn add_voxel(
        &mut self,
        input: VoxelInput,
        options: VoxelOptions,
    ) -> Result<Option<PathBuf>, Wis3dError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(None);
        };
        let name = options.name.as_deref();
        match input {
            VoxelInput::FromPath(source) => {
                if options.colors.is_some() {
                    return Err(Wis3dError::invalid_argument(
                        ObjectKind::BoxVoxel,
                        "colors cannot be applied to an imported voxel file",
                    ));
                }
                let kind = VoxelInput::file_kind(&source)?;
                std::fs::metadata(&source)?;
                let path = session.paths.allocate(kind, name)?;
                std::fs::copy(&source, &path)?;
                log::debug!("copied {} to {}", source.display(), path.display());
                Ok(Some(path))
            }
            VoxelInput::FromCenters {
                centers,
                voxel_size,
            } => {
                let record =
                    encode_voxels(centers, voxel_size, options.colors, &session.transform)?;
                session
                    .write_json(ObjectKind::BoxVoxel, name, &record)
                    .map(Some)
            }
        }
    }

    /// Add spheres centered at `centers`.
    pub fn add_spheres(
        &mut self,
        centers: impl Into<ArrayInput>,
        radius: impl Into<Radius>,
        mut options: SphereOptions,
    ) -> Result<Option<PathBuf>, Wis3dError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(None);
        };
        let name = options.name.take();
        let spheres = encode_spheres(centers, radius.into(), options, &session.transform)?;
        session
            .write_json(ObjectKind::Spheres, name.as_deref(), &spheres)
            .map(Some)
    }

    /// Add a camera trajectory from camera-to-world poses of shape `(n, 4, 4)`.
    ///
    /// # Errors
    ///
    /// Returns [`Wis3dError::InvalidArgument`] for fewer than two poses; use
    /// [`Wis3d::add_camera_pose`] for a single one.
    pub fn add_camera_trajectory(
        &mut self,
        poses: impl Into<ArrayInput>,
        options: TrajectoryOptions,
    ) -> Result<Option<PathBuf>, Wis3dError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(None);
        };
        let kind = ObjectKind::CameraTrajectory;
        let poses = poses_from_tensor(&normalize(poses).field(kind, "poses")?, false)?;
        if poses.len() < 2 {
            return Err(Wis3dError::invalid_argument(
                kind,
                format!(
                    "a trajectory needs at least 2 poses, got {}; use add_camera_pose",
                    poses.len()
                ),
            ));
        }
        let record = encode_camera_trajectory(&poses, options.is_opencv, &session.transform);
        session
            .write_json(kind, options.name.as_deref(), &record)
            .map(Some)
    }

    /// Add a single OpenCV camera-to-world pose of shape `(4, 4)`.
    pub fn add_camera_pose(
        &mut self,
        pose: impl Into<ArrayInput>,
        name: Option<&str>,
    ) -> Result<Option<PathBuf>, Wis3dError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(None);
        };
        let kind = ObjectKind::CameraTrajectory;
        let poses = poses_from_tensor(&normalize(pose).field(kind, "pose")?, true)?;
        ensure_len(kind, "pose", 1, poses.len())?;
        let record = encode_camera_trajectory(&poses, true, &session.transform);
        session.write_json(kind, name, &record).map(Some)
    }

    /// Add keypoint matches between two images.
    pub fn add_keypoint_correspondences(
        &mut self,
        img0: impl Into<ImageInput>,
        img1: impl Into<ImageInput>,
        kpts0: impl Into<ArrayInput>,
        kpts1: impl Into<ArrayInput>,
        mut options: CorrespondenceOptions,
    ) -> Result<Option<PathBuf>, Wis3dError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(None);
        };
        let name = options.name.take();
        let record = encode_correspondences(img0.into(), img1.into(), kpts0, kpts1, options)?;
        session
            .write_json(ObjectKind::Correspondences, name.as_deref(), &record)
            .map(Some)
    }

    /// Add rays as line segments, e.g. to debug a radiance field.
    pub fn add_rays(
        &mut self,
        rays_o: impl Into<ArrayInput>,
        rays_d: impl Into<ArrayInput>,
        options: RayOptions,
    ) -> Result<Option<PathBuf>, Wis3dError> {
        if !self.is_enabled() {
            return Ok(None);
        }
        let (start_points, end_points) = sample_rays(rays_o, rays_d, &options)?;
        self.add_lines(
            start_points,
            end_points,
            LineOptions {
                colors: None,
                name: options.name,
            },
        )
    }
}

impl std::fmt::Display for Wis3d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.session.as_ref() {
            Some(session) => write!(
                f,
                "Wis3D:{}:{}",
                session.sequence_name,
                session.paths.scene_id()
            ),
            None => write!(f, "Wis3D:NA"),
        }
    }
}
