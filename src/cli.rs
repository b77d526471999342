use crate::assets::LoadOutcome;
use crate::config::load_config;
use crate::controller::PointerEvent;
use crate::layout_dump::write_layout_dump;
use crate::model::{LogoState, Scene, TextBlock};
use crate::render::write_output_svg;
use crate::session::Session;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::info;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "overlay", version, about = "Overlay styled text and a logo onto a photo")]
pub struct Args {
    /// Background photo (PNG, JPEG, GIF, WebP or BMP)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// Scene file (JSON5): text blocks, logo state and pointer events to replay
    #[arg(short = 's', long = "scene")]
    pub scene: Option<PathBuf>,

    /// Output file. Defaults to the configured export name for PNG and stdout for SVG.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "png")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Directory holding logo-black.png and logo-white.png
    #[arg(short = 'a', long = "assets")]
    pub assets: Option<PathBuf>,

    /// Write computed block geometry as JSON
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

#[derive(Debug, Default, Deserialize)]
struct SceneFile {
    blocks: Option<Vec<TextBlock>>,
    logo: Option<LogoState>,
    #[serde(default)]
    events: Vec<PointerEvent>,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = load_config(args.config.as_deref())?;
    let mut session = Session::new(config);

    let bytes = std::fs::read(&args.input)?;
    let name = args.input.display().to_string();
    let outcome = session.upload_background(Some((name.as_str(), bytes.as_slice())));
    if outcome == Some(LoadOutcome::Failed) {
        return Err(anyhow::anyhow!(
            "{}",
            failure_message(&session).unwrap_or_else(|| format!("could not load image {name}"))
        ));
    }
    match &args.assets {
        Some(dir) => session.load_logos_from(dir),
        None => session.load_default_logos(),
    }

    let events = match args.scene.as_deref() {
        Some(path) => apply_scene_file(&mut session, path)?,
        None => Vec::new(),
    };
    for event in events {
        session.apply_event(event);
    }

    if let Some(path) = &args.dump_layout {
        write_layout_dump(
            path,
            &session.layout(),
            session.scene(),
            session.canvas_size(),
            &session.config().layout,
        )?;
        info!("wrote layout dump to {}", path.display());
    }

    let svg = session.render_svg()?;
    match args.output_format {
        OutputFormat::Svg => write_output_svg(&svg, args.output.as_deref())?,
        OutputFormat::Png => write_png(&session, &svg, args.output)?,
    }
    Ok(())
}

fn failure_message(session: &Session) -> Option<String> {
    match session.background().status() {
        crate::assets::LoadStatus::Failed(message) => Some(message.clone()),
        _ => None,
    }
}

fn apply_scene_file(session: &mut Session, path: &Path) -> Result<Vec<PointerEvent>> {
    let contents = std::fs::read_to_string(path)?;
    let parsed = parse_scene_file(&contents)?;
    let mut scene = Scene::default();
    if let Some(blocks) = parsed.blocks {
        scene.blocks = blocks;
    }
    if let Some(logo) = parsed.logo {
        scene.logo = logo;
    }
    session.set_scene(scene)?;
    info!(
        "loaded scene from {} ({} events)",
        path.display(),
        parsed.events.len()
    );
    Ok(parsed.events)
}

fn parse_scene_file(contents: &str) -> Result<SceneFile> {
    Ok(json5::from_str(contents)?)
}

#[cfg(feature = "png")]
fn write_png(session: &Session, svg: &str, output: Option<PathBuf>) -> Result<()> {
    let output =
        output.unwrap_or_else(|| PathBuf::from(&session.config().render.export_file_name));
    crate::render::write_output_png(svg, &output, &session.config().render)?;
    info!("wrote {}", output.display());
    Ok(())
}

#[cfg(not(feature = "png"))]
fn write_png(_session: &Session, _svg: &str, _output: Option<PathBuf>) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires the `png` feature; use --outputFormat svg"
    ))
}
