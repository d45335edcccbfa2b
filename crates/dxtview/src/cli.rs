use clap::Parser;
use renderer::{Antialiasing, FitMode};

#[derive(Parser, Debug)]
#[command(
    name = "dxtview",
    author,
    version,
    about = "Desktop viewer for DXT/BC block-compressed textures",
    arg_required_else_help = false
)]
pub struct Cli {
    /// Texture to open (DDS or a common raster format). Absent means "ask
    /// with the file dialog".
    #[arg(value_name = "FILE")]
    pub file: Option<String>,

    /// Fit policy when window and texture aspects differ: `stretch`,
    /// `contain`, or `cover`.
    #[arg(long, value_name = "MODE", value_parser = parse_fit)]
    pub fit: Option<FitMode>,

    /// Anti-aliasing policy: `auto`, `off`, or an explicit MSAA sample count
    /// (e.g. `4`).
    #[arg(long, value_name = "MODE", value_parser = parse_antialias)]
    pub antialias: Option<Antialiasing>,

    /// Override the initial window size (e.g. `1280x720`); the default is the
    /// texture's native size.
    #[arg(long, value_name = "WIDTHxHEIGHT")]
    pub size: Option<String>,

    /// Start in borderless fullscreen.
    #[arg(long)]
    pub fullscreen: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_fit(value: &str) -> Result<FitMode, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("fit mode must not be empty".to_string());
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "stretch" | "fill" => Ok(FitMode::Stretch),
        "contain" | "fit" | "letterbox" => Ok(FitMode::Contain),
        "cover" | "crop" => Ok(FitMode::Cover),
        other => Err(format!(
            "unknown fit mode '{other}'; expected stretch, contain, or cover"
        )),
    }
}

pub fn parse_antialias(value: &str) -> Result<Antialiasing, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("anti-alias mode must not be empty".to_string());
    }

    let normalized = trimmed.to_ascii_lowercase();
    match normalized.as_str() {
        "auto" | "max" | "default" => Ok(Antialiasing::Auto),
        "off" | "none" | "disable" | "disabled" | "0" => Ok(Antialiasing::Off),
        _ => {
            let samples: u32 = normalized.parse().map_err(|_| {
                format!("invalid anti-alias sample count '{trimmed}'; use auto/off or 2/4/8/16")
            })?;

            if samples == 0 || samples == 1 {
                return Ok(Antialiasing::Off);
            }

            if !matches!(samples, 2 | 4 | 8 | 16) {
                return Err(format!(
                    "unsupported sample count {samples}; supported values are 2, 4, 8, or 16"
                ));
            }

            Ok(Antialiasing::Samples(samples))
        }
    }
}

pub fn parse_surface_size(value: &str) -> Result<(u32, u32), String> {
    let trimmed = value.trim();
    let (width_raw, height_raw) = trimmed
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("invalid size '{trimmed}'; expected WIDTHxHEIGHT"))?;

    let width: u32 = width_raw
        .trim()
        .parse()
        .map_err(|_| format!("invalid width '{width_raw}' in size '{trimmed}'"))?;
    let height: u32 = height_raw
        .trim()
        .parse()
        .map_err(|_| format!("invalid height '{height_raw}' in size '{trimmed}'"))?;

    if width == 0 || height == 0 {
        return Err(format!("size '{trimmed}' must be at least 1x1"));
    }

    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_modes_accept_aliases() {
        assert_eq!(parse_fit("stretch").unwrap(), FitMode::Stretch);
        assert_eq!(parse_fit("Letterbox").unwrap(), FitMode::Contain);
        assert_eq!(parse_fit(" crop ").unwrap(), FitMode::Cover);
        assert!(parse_fit("tile").is_err());
        assert!(parse_fit("").is_err());
    }

    #[test]
    fn antialias_accepts_keywords_and_counts() {
        assert_eq!(parse_antialias("auto").unwrap(), Antialiasing::Auto);
        assert_eq!(parse_antialias("off").unwrap(), Antialiasing::Off);
        assert_eq!(parse_antialias("1").unwrap(), Antialiasing::Off);
        assert_eq!(parse_antialias("4").unwrap(), Antialiasing::Samples(4));
        assert!(parse_antialias("3").is_err());
        assert!(parse_antialias("lots").is_err());
    }

    #[test]
    fn surface_size_parses_both_separators() {
        assert_eq!(parse_surface_size("1280x720").unwrap(), (1280, 720));
        assert_eq!(parse_surface_size("640X480").unwrap(), (640, 480));
        assert_eq!(parse_surface_size(" 800 x 600 ").unwrap(), (800, 600));
    }

    #[test]
    fn surface_size_rejects_garbage() {
        assert!(parse_surface_size("1280").is_err());
        assert!(parse_surface_size("x720").is_err());
        assert!(parse_surface_size("0x100").is_err());
        assert!(parse_surface_size("axb").is_err());
    }

    #[test]
    fn cli_parses_positional_file_and_flags() {
        let cli = Cli::try_parse_from([
            "dxtview",
            "wood.dds",
            "--fit",
            "contain",
            "--antialias",
            "4",
            "--fullscreen",
        ])
        .unwrap();
        assert_eq!(cli.file.as_deref(), Some("wood.dds"));
        assert_eq!(cli.fit, Some(FitMode::Contain));
        assert_eq!(cli.antialias, Some(Antialiasing::Samples(4)));
        assert!(cli.fullscreen);
    }
}
