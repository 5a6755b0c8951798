use argh::FromArgs;
use wis3d::tensor::Tensor;
use wis3d::{
    BoxOptions, BoxesInput, LineOptions, PointCloudInput, SessionConfig, TrajectoryOptions, Wis3d,
};

/// Writes a small demo sequence for the wis3d viewer
#[derive(Debug, FromArgs)]
struct Args {
    /// output folder
    #[argh(option, short = 'o', default = "String::from(\"wis3d_output\")")]
    out_folder: String,

    /// sequence name
    #[argh(option, short = 's', default = "String::from(\"quickstart\")")]
    sequence_name: String,

    /// number of scenes to write
    #[argh(option, short = 'n', default = "10")]
    num_scenes: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let config = SessionConfig::new(&args.out_folder, &args.sequence_name)
        .with_xyz_pattern(["x", "-y", "-z"]);
    let mut vis = Wis3d::new(config)?;

    // a gradient image
    let (width, height): (usize, usize) = (64, 48);
    let pixels = (0..height)
        .flat_map(|y| (0..width).flat_map(move |x| [x as f64 * 4.0, y as f64 * 5.0, 128.0]))
        .collect();
    vis.add_image(Tensor::from_shape_vec([height, width, 3], pixels)?, Some("gradient"))?;

    for scene in 0..args.num_scenes {
        vis.set_scene_id(scene);
        let phase = scene as f64 * 0.2;

        // a helix whose color runs from red to blue
        let n = 200;
        let points: Vec<[f64; 3]> = (0..n)
            .map(|i| {
                let t = i as f64 / n as f64 * 4.0 * std::f64::consts::PI + phase;
                [t.cos(), t / 4.0, t.sin() + 4.0]
            })
            .collect();
        let colors: Vec<[u8; 3]> = (0..n)
            .map(|i| {
                let c = (i * 255 / n) as u8;
                [255 - c, 0, c]
            })
            .collect();
        vis.add_point_cloud(PointCloudInput::with_colors(points, colors), Some("helix"))?;

        vis.add_boxes(
            BoxesInput::definition([0.0, 0.0, 4.0], [0.0, phase, 0.0], [0.5, 1.0, 0.5]),
            BoxOptions {
                labels: Some(vec![format!("box {scene}")]),
                ..Default::default()
            },
        )?;

        vis.add_lines([0.0, 0.0, 0.0], [0.0, 0.0, 4.0], LineOptions::default())?;

        let poses: Vec<[[f64; 4]; 4]> = (0..=scene)
            .map(|i| {
                let t = i as f64 * 0.1;
                [
                    [1.0, 0.0, 0.0, t],
                    [0.0, 1.0, 0.0, 0.0],
                    [0.0, 0.0, 1.0, 0.0],
                    [0.0, 0.0, 0.0, 1.0],
                ]
            })
            .collect();
        if poses.len() >= 2 {
            vis.add_camera_trajectory(poses, TrajectoryOptions::default())?;
        }
    }

    log::info!("wrote {} scenes to {}", args.num_scenes, args.out_folder);
    Ok(())
}
