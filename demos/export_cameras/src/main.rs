use argh::FromArgs;
use std::path::PathBuf;

use scanview::camera::{AuthoringToolToCv, ImageSize, Intrinsics, PrincipalPointMode, SceneCamera};
use scanview::io::{read_camera_rig, write_camera_exports, CameraExport};

#[derive(FromArgs)]
/// Install a calibrated rig into the scene camera and export K, RT and P per view
struct Args {
    /// path to the calibration rig JSON file
    #[argh(option)]
    rig: PathBuf,

    /// path to the output JSON file
    #[argh(option)]
    output: PathBuf,

    /// image width in pixels
    #[argh(option, default = "1600")]
    width: u32,

    /// image height in pixels
    #[argh(option, default = "1200")]
    height: u32,

    /// horizontal focal length in pixels
    #[argh(option, default = "1498.2242623")]
    fx: f64,

    /// vertical focal length in pixels
    #[argh(option, default = "1498.22426253")]
    fy: f64,

    /// principal point x in pixels
    #[argh(option, default = "790.263706")]
    cx: f64,

    /// principal point y in pixels
    #[argh(option, default = "578.90334")]
    cy: f64,

    /// integer factor dividing the image size and the intrinsics
    #[argh(option, default = "1")]
    downscale: u32,

    /// maximum number of rig cameras to export
    #[argh(option, default = "8")]
    max_cameras: usize,

    /// prefix of the exported view names
    #[argh(option, default = "String::from(\"view\")")]
    prefix: String,

    /// put the principal point at the image centre instead of using the lens shift
    #[argh(switch)]
    centered: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    if args.downscale == 0 {
        return Err("downscale must be at least 1".into());
    }

    let convention = AuthoringToolToCv::BLENDER;
    let mode = if args.centered {
        PrincipalPointMode::Centered
    } else {
        PrincipalPointMode::LensShift
    };

    // the image size is divided in integers, the intrinsics in floating point
    let s = args.downscale as f64;
    let size = ImageSize::new(args.width / args.downscale, args.height / args.downscale);
    let k = Intrinsics::new(args.fx / s, args.fy / s, args.cx / s, args.cy / s);
    let camera = SceneCamera::from_intrinsics(&k, size, &convention)?;
    log::info!(
        "scene camera: lens {:.4}, pixel aspect {:?}, shift {:?}",
        camera.lens_mm,
        camera.pixel_aspect,
        camera.shift
    );

    let rig = read_camera_rig(&args.rig)?;
    log::info!("loaded {} rig cameras", rig.setup.len());

    let exports = rig
        .setup
        .iter()
        .take(args.max_cameras)
        .enumerate()
        .map(|(i, rig_camera)| -> Result<CameraExport, Box<dyn std::error::Error>> {
            let camera = camera.clone().with_pose(rig_camera.pose(&convention)?);
            let m = camera.matrices(mode, &convention)?;
            log::debug!("camera {i}: K {:?}", m.k.matrix());
            Ok(CameraExport::new(
                format!("{}_{i}", args.prefix),
                camera.render_size(),
                &m,
            ))
        })
        .collect::<Result<Vec<_>, _>>()?;

    write_camera_exports(&args.output, &exports)?;
    log::info!(
        "wrote {} cameras to {}",
        exports.len(),
        args.output.display()
    );

    Ok(())
}
