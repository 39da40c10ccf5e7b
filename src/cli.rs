use clap::Parser;
use figure_core::constants::FOV_Y_DEGREES;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Interactive articulated cube figure")]
pub struct Args {
    /// Image for textured parts; a generated sky gradient is used when omitted
    #[arg(long)]
    pub texture: Option<PathBuf>,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Vertical field of view in degrees, strictly between 0 and 180
    #[arg(long, default_value_t = FOV_Y_DEGREES, value_parser = parse_fov)]
    pub fov: f32,
}

fn parse_fov(s: &str) -> Result<f32, String> {
    let fov: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if fov > 0.0 && fov < 180.0 {
        Ok(fov)
    } else {
        Err(format!("{fov} is outside (0, 180)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_core_constants() {
        let args = Args::try_parse_from(["figure-viewer"]).expect("parse");
        assert!(args.texture.is_none());
        assert_eq!((args.width, args.height), (800, 600));
        assert_eq!(args.fov, FOV_Y_DEGREES);
    }

    #[test]
    fn overrides_are_parsed() {
        let args = Args::try_parse_from([
            "figure-viewer",
            "--texture",
            "sky.jpg",
            "--fov",
            "60",
        ])
        .expect("parse");
        assert_eq!(args.texture.as_deref(), Some(std::path::Path::new("sky.jpg")));
        assert_eq!(args.fov, 60.0);
    }

    #[test]
    fn out_of_range_fov_is_rejected() {
        for fov in ["200", "0", "-5", "180", "NaN"] {
            assert!(
                Args::try_parse_from(["figure-viewer", "--fov", fov]).is_err(),
                "{fov} accepted"
            );
        }
    }
}
