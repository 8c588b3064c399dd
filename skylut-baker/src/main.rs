use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use skylut::{
    write_lut, write_preview, AtmosphereParameters, LutConfig, SkyLuts,
    RADIANCE_PREVIEW_SCALE,
};

/// Altitude of the sun used for the sky-view preview, in radians.
const PREVIEW_SUN_ALTITUDE: f32 = 1.0;

#[derive(Debug, Parser)]
#[command(name = "skylut-baker")]
#[command(about = "Bakes sky lookup tables and their previews")]
struct Args {
    /// Directory the tables and previews get written into
    out_dir: PathBuf,

    /// Use the production-quality preset (slower to bake)
    #[arg(long)]
    production: bool,
}

impl Args {
    fn config(&self) -> LutConfig {
        if self.production {
            LutConfig::production()
        } else {
            LutConfig::interactive()
        }
    }

    fn preset(&self) -> &'static str {
        if self.production {
            "production"
        } else {
            "interactive"
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let args = Args::parse();
    let config = args.config();

    log::info!(
        "Baking into `{}`; preset = {}",
        args.out_dir.display(),
        args.preset(),
    );

    fs::create_dir_all(&args.out_dir)?;

    bake(&args.out_dir, &config)?;

    log::info!("Done");

    Ok(())
}

fn bake(out_dir: &Path, config: &LutConfig) -> skylut::Result<()> {
    let luts = SkyLuts::bake(&AtmosphereParameters::default(), config)?;
    let atlas = luts.atlas()?;
    let sky = luts.sky(config, PREVIEW_SUN_ALTITUDE)?;

    write_lut(out_dir.join("transmittance.bin"), luts.transmittance.lut())?;
    write_lut(out_dir.join("multiple_scattering.bin"), luts.scattering.lut())?;
    write_lut(out_dir.join("sun_color.bin"), luts.sun_color.lut())?;
    atlas.write(out_dir.join("data.bin"))?;

    write_preview(
        out_dir.join("transmittance.png"),
        luts.transmittance.lut(),
        1.0,
    )?;

    write_preview(
        out_dir.join("multiple_scattering.png"),
        luts.scattering.lut(),
        RADIANCE_PREVIEW_SCALE,
    )?;

    write_preview(
        out_dir.join("sun_color.png"),
        luts.sun_color.lut(),
        RADIANCE_PREVIEW_SCALE,
    )?;

    write_preview(
        out_dir.join("sky_view.png"),
        sky.lut(),
        RADIANCE_PREVIEW_SCALE,
    )?;

    write_preview(out_dir.join("data.png"), &atlas.rgb(), 1.0)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_out_dir_and_preset() {
        let args = Args::try_parse_from(["skylut-baker", "out"]).unwrap();

        assert_eq!(PathBuf::from("out"), args.out_dir);
        assert_eq!(LutConfig::interactive(), args.config());

        let args =
            Args::try_parse_from(["skylut-baker", "out", "--production"])
                .unwrap();

        assert!(args.production);
        assert_eq!(LutConfig::production(), args.config());
    }

    #[test]
    fn rejects_missing_out_dir() {
        assert!(Args::try_parse_from(["skylut-baker"]).is_err());
        assert!(Args::try_parse_from(["skylut-baker", "a", "b"]).is_err());
    }
}
