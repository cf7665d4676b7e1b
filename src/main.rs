use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use goban_render::{
    diff, flatten, DiffEntry, Display, DisplayConfig, Flattened, Intersection, MemoryHost, Position, Rotation,
    ShowVariations, Theme,
};
use std::fs;
use std::path::{Path, PathBuf};

/// Render Go board positions to SVG
#[derive(Parser, Debug)]
#[command(name = "goban-render", version, about = "Go board SVG renderer")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

/// Board rotation as accepted on the command line
#[derive(Copy, Clone, Debug, ValueEnum)]
enum Turn {
    #[value(name = "0")]
    None,
    #[value(name = "90")]
    Quarter,
    #[value(name = "180")]
    Half,
    #[value(name = "270")]
    ThreeQuarters,
}

impl From<Turn> for Rotation {
    fn from(t: Turn) -> Self {
        match t {
            Turn::None => Rotation::None,
            Turn::Quarter => Rotation::Clockwise90,
            Turn::Half => Rotation::Clockwise180,
            Turn::ThreeQuarters => Rotation::Clockwise270,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Render a position file to SVG
    Render {
        /// Position JSON
        input: PathBuf,
        /// Built-in theme name, or a path to a theme JSON file
        #[arg(long, default_value = "default")]
        theme: String,
        #[arg(long, default_value_t = 400.0)]
        width: f64,
        #[arg(long, default_value_t = 400.0)]
        height: f64,
        /// Draw column and row labels
        #[arg(long)]
        coords: bool,
        /// Clockwise rotation in degrees
        #[arg(long, value_enum, default_value_t = Turn::None)]
        rotate: Turn,
        /// When to label next-move variations
        #[arg(long, value_enum, default_value_t = ShowVariations::MoreThanOne)]
        variations: ShowVariations,
        /// Do not mark the last move
        #[arg(long)]
        no_last_move: bool,
        /// Write the SVG here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        /// Print a data: URI instead of raw markup
        #[arg(long)]
        data_uri: bool,
        /// Print the SHA-256 of the markup to stderr
        #[arg(long)]
        fingerprint: bool,
    },
    /// Print the points that differ between two position files
    Diff { before: PathBuf, after: PathBuf },
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Render {
            input,
            theme,
            width,
            height,
            coords,
            rotate,
            variations,
            no_last_move,
            out,
            data_uri,
            fingerprint,
        } => {
            let config = DisplayConfig {
                theme: load_theme(&theme)?,
                rotation: rotate.into(),
                draw_board_coords: coords,
                show_variations: variations,
                mark_last_move: !no_last_move,
                ..Default::default()
            };
            let position = read_position(&input)?;
            let config = DisplayConfig { intersections: position.size, ..config };
            let snapshot = flatten(&position, config.flatten_options())
                .with_context(|| format!("flattening {}", input.display()))?;

            let host = MemoryHost::with_container(&config.container_id, width, height);
            let container = config.container_id.clone();
            let mut display = Display::create(host, config).context("drawing board")?;
            display.update_board(snapshot)?;

            let tree = display
                .intersections()
                .map(|s| s.tree())
                .ok_or_else(|| anyhow!("display has no surface after draw"))?;
            let markup = if data_uri { tree.to_data_uri() } else { tree.render() };
            if fingerprint {
                eprintln!("{}", tree.fingerprint());
            }
            log::debug!("rendered {} bytes into '{}'", markup.len(), container);

            match out {
                Some(path) => fs::write(&path, markup).with_context(|| format!("writing {}", path.display()))?,
                None => println!("{}", markup),
            }
            Ok(())
        }
        Cmd::Diff { before, after } => {
            let a = read_snapshot(&before)?;
            let b = read_snapshot(&after)?;
            let entries = diff(&a, &b).context("comparing positions")?;
            for e in &entries {
                println!("{}", describe(e));
            }
            log::info!("{} changed points", entries.len());
            Ok(())
        }
    }
}

fn read_position(path: &Path) -> Result<Position> {
    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Position::from_json(&data).with_context(|| format!("parsing {}", path.display()))
}

fn read_snapshot(path: &Path) -> Result<Flattened> {
    let position = read_position(path)?;
    let opts = DisplayConfig::default().flatten_options();
    flatten(&position, opts).with_context(|| format!("flattening {}", path.display()))
}

fn load_theme(name: &str) -> Result<Theme> {
    if Theme::BUILTIN.contains(&name) {
        return Ok(Theme::by_name(name)?);
    }
    let data = fs::read_to_string(name)
        .with_context(|| format!("'{}' is neither a built-in theme ({}) nor a readable file", name, Theme::BUILTIN.join(", ")))?;
    Theme::from_json(&data).with_context(|| format!("loading theme {}", name))
}

fn describe(e: &DiffEntry) -> String {
    format!("{} {} -> {}", e.point, cell(&e.prev), cell(&e.next))
}

fn cell(i: &Intersection) -> String {
    let mut s = format!("{:?}", i.stone()).to_lowercase();
    if let Some(m) = i.mark() {
        s.push('+');
        s.push_str(m.as_str());
    }
    if let Some(l) = i.text_label() {
        s.push_str(&format!("[{}]", l));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_args(extra: &[&str]) -> Result<Cmd, clap::Error> {
        let mut argv = vec!["goban-render", "render", "position.json"];
        argv.extend_from_slice(extra);
        Cli::try_parse_from(argv).map(|c| c.cmd)
    }

    #[test]
    fn render_flags_parse_into_enums() {
        let Cmd::Render { rotate, variations, .. } =
            render_args(&["--rotate", "90", "--variations", "never"]).unwrap()
        else {
            panic!("expected render");
        };
        assert_eq!(Rotation::from(rotate), Rotation::Clockwise90);
        assert_eq!(variations, ShowVariations::Never);
    }

    #[test]
    fn render_defaults() {
        let Cmd::Render { rotate, variations, .. } = render_args(&[]).unwrap() else {
            panic!("expected render");
        };
        assert_eq!(Rotation::from(rotate), Rotation::None);
        assert_eq!(variations, ShowVariations::MoreThanOne);
        assert!(render_args(&["--variations", "more-than-one"]).is_ok());
    }

    #[test]
    fn unsupported_values_are_rejected_by_the_parser() {
        let err = render_args(&["--rotate", "45"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
        assert!(render_args(&["--variations", "sometimes"]).is_err());
    }
}
