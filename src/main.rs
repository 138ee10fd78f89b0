// SPDX-License-Identifier: MPL-2.0
use std::path::PathBuf;
use std::process::ExitCode;
use touchcam::app::{config, paths, persisted_state::SessionState, App};

const HELP: &str = "\
touchcam - touchscreen camera controller

USAGE:
  touchcam [OPTIONS]

OPTIONS:
  --config-dir <DIR>      Directory holding settings.toml
  --data-dir <DIR>        Directory holding state.cbor
  --touch-device <PATH>   Evdev touchscreen (default: 'x y' lines on stdin)
  --framebuffer <PATH>    Framebuffer device (default: headless)
  -h, --help              Print this help
";

struct Args {
    config_dir: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    touch_device: Option<PathBuf>,
    framebuffer: Option<PathBuf>,
}

fn parse_args() -> Result<Option<Args>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }
    let parsed = Args {
        config_dir: args.opt_value_from_str("--config-dir")?,
        data_dir: args.opt_value_from_str("--data-dir")?,
        touch_device: args.opt_value_from_str("--touch-device")?,
        framebuffer: args.opt_value_from_str("--framebuffer")?,
    };
    let rest = args.finish();
    if !rest.is_empty() {
        log::warn!("Ignoring unexpected arguments: {:?}", rest);
    }
    Ok(Some(parsed))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("Error: {err}\n\n{HELP}");
            return ExitCode::FAILURE;
        }
    };

    paths::init_cli_overrides(args.data_dir, args.config_dir);

    let (mut config, warning) = config::load();
    if let Some(warning) = warning {
        log::warn!("{}", warning);
    }
    if args.touch_device.is_some() {
        config.input.touch_device = args.touch_device;
    }
    if args.framebuffer.is_some() {
        config.display.framebuffer = args.framebuffer;
    }

    let (state, warning) = SessionState::load_from(None);
    if let Some(warning) = warning {
        log::warn!("{}", warning);
    }

    match App::new(&config, &state).and_then(App::run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
