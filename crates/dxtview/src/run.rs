use anyhow::{anyhow, Result};
use renderer::{Viewer, ViewerConfig};
use tracing_subscriber::EnvFilter;

use dxtex::PathResolver;

use crate::cli::{parse_surface_size, Cli};
use crate::paths::AppPaths;
use crate::settings::Settings;

pub fn run(args: Cli) -> Result<()> {
    initialise_tracing();

    let paths = AppPaths::discover()?;
    let settings = Settings::load(&paths.settings_file())?;
    tracing::debug!(
        config = %paths.config_dir().display(),
        "resolved dxtview paths"
    );

    // CLI flags win over the settings file; settings win over built-ins.
    let fit = match args.fit {
        Some(fit) => fit,
        None => settings.fit()?.unwrap_or_default(),
    };
    let antialiasing = match args.antialias {
        Some(antialiasing) => antialiasing,
        None => settings.antialias()?.unwrap_or_default(),
    };
    let window_size = args
        .size
        .as_deref()
        .map(parse_surface_size)
        .transpose()
        .map_err(|err| anyhow!(err))?;

    let texture_path = match args.file.as_deref() {
        Some(input) => Some(PathResolver::new()?.normalize_local_path(input)?),
        None => None,
    };

    let file_label = texture_path
        .as_deref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<dialog>".to_string());
    tracing::info!(
        file = %file_label,
        ?fit,
        ?antialiasing,
        fullscreen = args.fullscreen,
        "starting dxtview"
    );

    let config = ViewerConfig {
        texture_path,
        fit,
        antialiasing,
        window_size,
        fullscreen: args.fullscreen,
        browse_dir: settings.browse_dir.clone(),
    };

    Viewer::new(config).run()
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
