//! HarnessGen command line
//!
//! ```text
//! harnessgen [--preset NAME | --config FILE] [OUTPUT_DIR]
//! ```

use anyhow::{bail, Context};
use harnessgen::{init_logging, preset, AppSettings, GenerationPipeline, ParameterSet, PRESETS};
use harnessgen_settings::import_from_file;
use std::path::PathBuf;
use tracing::info;

struct Args {
    preset: Option<String>,
    config: Option<PathBuf>,
    output_dir: Option<PathBuf>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        preset: None,
        config: None,
        output_dir: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--preset" => args.preset = Some(iter.next().context("--preset needs a name")?),
            "--config" => {
                args.config = Some(iter.next().context("--config needs a file")?.into())
            }
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            _ if args.output_dir.is_none() => args.output_dir = Some(arg.into()),
            _ => bail!("unexpected argument {arg}"),
        }
    }
    if args.preset.is_some() && args.config.is_some() {
        bail!("--preset and --config cannot be combined");
    }
    Ok(args)
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let args = parse_args()?;

    let mut settings = match AppSettings::default_path() {
        Some(path) => AppSettings::load_or_default(&path)?,
        None => AppSettings::default(),
    };
    if let Some(dir) = args.output_dir {
        settings.output_directory = dir;
    }

    let params = if let Some(name) = &args.preset {
        let Some(found) = preset(name) else {
            let names: Vec<_> = PRESETS.iter().map(|p| p.name).collect();
            bail!("unknown preset '{name}', expected one of: {}", names.join(", "));
        };
        found.params()
    } else if let Some(path) = &args.config {
        import_from_file(path)?
    } else {
        ParameterSet::defaults()
    };

    info!("HarnessGen {} (built {})", harnessgen::VERSION, harnessgen::BUILD_DATE);
    let output = GenerationPipeline::from_settings(&settings).run(&params)?;
    for path in output.files() {
        println!("{}", path.display());
    }
    Ok(())
}
