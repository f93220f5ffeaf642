use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use globset::{Glob, GlobSet, GlobSetBuilder};
use image::{ImageReader, RgbaImage};
use serde::Deserialize;
use sprite_packer_core::analyze::{self, analyze_frames};
use sprite_packer_core::{
    Group, Layout, PackingOptions, Preset, Sprite, SpriteId, from_json_hash, looks_like_strip,
    pack_sprites, slice_strip, slice_strip_as_group, suggest_grid, to_json_hash, unpack_atlas,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "sprite-packer",
    about = "Pack sprites into a sprite sheet and slice sprite strips",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --progress false or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack images into a sprite sheet (PNG + JSON hash)
    Pack(PackArgs),
    /// Slice a sprite strip into frame PNGs
    Slice(SliceArgs),
    /// Print strip verdict, suggested grid and classification for one image
    Inspect(InspectArgs),
    /// Classify every image as transparent / solid color / content
    Analyze(AnalyzeArgs),
    /// Extract the frames of a packed sheet back into PNGs
    Unpack(UnpackArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    // Input/Output
    /// Input files or directories
    #[arg(required = true, help_heading = "Input/Output")]
    input: Vec<PathBuf>,
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// Sheet base name (files will be name.png/.json)
    #[arg(short, long, default_value = "spritesheet", help_heading = "Input/Output")]
    name: String,
    /// YAML config file path (values override the flags below)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,
    /// Groups file (YAML or JSON): group name -> ordered sprite names
    #[arg(long, help_heading = "Input/Output")]
    groups: Option<PathBuf>,

    // Layout
    /// Quick preset: tight | standard | loose | preserve (applied before --config)
    #[arg(long, help_heading = "Layout")]
    preset: Option<String>,
    /// Max width
    #[arg(long, default_value_t = 2048, help_heading = "Layout")]
    max_width: u32,
    /// Max height
    #[arg(long, default_value_t = 2048, help_heading = "Layout")]
    max_height: u32,
    /// Round the sheet size up to powers of two
    #[arg(long, default_value_t = true, action=ArgAction::Set, help_heading = "Layout")]
    pow2: bool,
    /// Layout: compact | horizontal | vertical | by-group
    #[arg(long, default_value = "compact", help_heading = "Layout")]
    layout: String,

    // Image Processing
    /// Spacing between sprites
    #[arg(long, default_value_t = 2, help_heading = "Image Processing")]
    spacing: u32,
    /// Padding kept around trimmed bounds, or border added when not trimming
    #[arg(long, default_value_t = 0, help_heading = "Image Processing")]
    padding: u32,
    /// Trim transparent borders
    #[arg(long, default_value_t = false, action=ArgAction::Set, help_heading = "Image Processing")]
    trim: bool,
    /// Accepted for compatibility; sprites are never rotated
    #[arg(long, default_value_t = false, help_heading = "Image Processing")]
    allow_rotation: bool,
    /// Slice inputs that look like sprite strips, one group per strip
    #[arg(long, default_value_t = false, help_heading = "Image Processing")]
    slice_strips: bool,

    // Export
    /// Export packing stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after CLI/preset/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: compute layout and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct SliceArgs {
    /// Strip image
    image: PathBuf,
    /// Output directory
    #[arg(short, long, default_value = "frames")]
    out_dir: PathBuf,
    /// Frame base name (defaults to the file stem)
    #[arg(short, long)]
    name: Option<String>,
    #[arg(long)]
    columns: Option<u32>,
    #[arg(long)]
    rows: Option<u32>,
    #[arg(long)]
    frame_width: Option<u32>,
    #[arg(long)]
    frame_height: Option<u32>,
    #[arg(long)]
    spacing: Option<u32>,
    #[arg(long)]
    margin: Option<u32>,
    #[arg(long)]
    padding_x: Option<u32>,
    #[arg(long)]
    padding_y: Option<u32>,
    /// Drop frames that are fully transparent or a single solid color
    #[arg(long, default_value_t = false)]
    skip_empty: bool,
    /// Classify frames for --skip-empty even on very large grids
    #[arg(long, default_value_t = false)]
    force: bool,
    /// Print the grid and frame count without writing files
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct InspectArgs {
    image: PathBuf,
}

#[derive(Parser, Debug, Clone)]
struct AnalyzeArgs {
    /// Input file or directory
    input: PathBuf,
    #[arg(long)]
    include: Vec<String>,
    #[arg(long)]
    exclude: Vec<String>,
    /// Print the result as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser, Debug, Clone)]
struct UnpackArgs {
    /// Sheet image
    image: PathBuf,
    /// JSON hash descriptor
    descriptor: PathBuf,
    /// Output directory
    #[arg(short, long, default_value = "unpacked")]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    let show_progress = cli.progress && !cli.quiet;
    match &cli.command {
        Commands::Pack(args) => run_pack(args, show_progress),
        Commands::Slice(args) => run_slice(args),
        Commands::Inspect(args) => run_inspect(args),
        Commands::Analyze(args) => run_analyze(args, show_progress),
        Commands::Unpack(args) => run_unpack(args),
    }
}

fn run_pack(cli: &PackArgs, show_progress: bool) -> anyhow::Result<()> {
    let mut opts = PackingOptions {
        max_width: cli.max_width,
        max_height: cli.max_height,
        spacing: cli.spacing,
        trim_whitespace: cli.trim,
        padding: cli.padding,
        force_power_of_two: cli.pow2,
        allow_rotation: cli.allow_rotation,
        layout: parse_layout(&cli.layout)?,
        image_name: format!("{}.png", cli.name),
    };
    if let Some(p) = &cli.preset {
        opts = parse_preset(p)?.apply(opts);
    }
    if let Some(path) = &cli.config {
        let file = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)
            .with_context(|| format!("parse config {}", path.display()))?;
        opts = y.into_packing_options(opts)?;
    }

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&opts)?),
            _ => println!("{}", serde_json::to_string_pretty(&opts)?),
        }
        return Ok(());
    }
    opts.validate()?;

    let filter = InputFilter::new(&cli.include, &cli.exclude)?;
    let mut paths = Vec::new();
    for input in &cli.input {
        paths.extend(filter.collect(input)?);
    }
    let loaded = load_images_with_progress(&paths, show_progress)?;
    info!(count = loaded.len(), "loaded input images");

    let mut sprites: Vec<Sprite> = Vec::with_capacity(loaded.len());
    let mut groups: Vec<Group> = Vec::new();
    for (path, rgba) in loaded {
        let stem = file_stem(&path);
        let file_name = path.file_name().and_then(|s| s.to_str());
        if cli.slice_strips && looks_like_strip(rgba.width(), rgba.height(), file_name) {
            let grid = suggest_grid(rgba.width(), rgba.height(), file_name);
            if grid.candidate_count() > 1 {
                let (frames, group) = slice_strip_as_group(&rgba, &grid, &stem, &stem)?;
                info!(
                    strip = %stem,
                    columns = grid.columns,
                    rows = grid.rows,
                    frames = frames.len(),
                    "sliced strip"
                );
                sprites.extend(frames);
                groups.push(group);
                continue;
            }
        }
        sprites.push(Sprite::new(stem, rgba));
    }

    if sprites.is_empty() {
        anyhow::bail!("no input images found");
    }
    if let Some(path) = &cli.groups {
        groups.extend(load_groups(path, &sprites)?);
    }

    let out = pack_sprites(&sprites, &groups, &opts)?.with_context(|| {
        format!(
            "could not pack {} sprites into {}x{}; try larger --max-width/--max-height, less --spacing or --trim",
            sprites.len(),
            opts.max_width,
            opts.max_height
        )
    })?;

    let stats = out.stats();
    info!(
        width = stats.canvas_width,
        height = stats.canvas_height,
        frames = stats.num_frames,
        animations = stats.num_animations,
        occupancy = format!("{:.2}%", stats.occupancy * 100.0),
        "stats"
    );

    if !cli.dry_run {
        fs::create_dir_all(&cli.out_dir)
            .with_context(|| format!("create out_dir {}", cli.out_dir.display()))?;
        let png_path = cli.out_dir.join(format!("{}.png", cli.name));
        out.rgba
            .save(&png_path)
            .with_context(|| format!("write {}", png_path.display()))?;
        let json_path = cli.out_dir.join(format!("{}.json", cli.name));
        let json = serde_json::to_string_pretty(&to_json_hash(&out.atlas))?;
        fs::write(&json_path, json).with_context(|| format!("write {}", json_path.display()))?;
        info!(?png_path, ?json_path, "sprite sheet written");
    }

    if let Some(stats_path) = &cli.export_stats {
        if !cli.dry_run {
            fs::write(stats_path, serde_json::to_string_pretty(&stats)?)
                .with_context(|| format!("write {}", stats_path.display()))?;
            info!(?stats_path, "stats exported");
        } else {
            println!("{}", stats.summary());
        }
    }
    Ok(())
}

fn run_slice(cli: &SliceArgs) -> anyhow::Result<()> {
    let rgba = load_image(&cli.image)?;
    let (w, h) = rgba.dimensions();
    let file_name = cli.image.file_name().and_then(|s| s.to_str());
    let base = cli.name.clone().unwrap_or_else(|| file_stem(&cli.image));

    let mut grid = suggest_grid(w, h, file_name);
    if let Some(v) = cli.spacing {
        grid.spacing = v;
    }
    if let Some(v) = cli.margin {
        grid.margin = v;
    }
    if let Some(v) = cli.padding_x {
        grid.padding_x = v;
    }
    if let Some(v) = cli.padding_y {
        grid.padding_y = v;
    }
    let counts_changed = cli.columns.is_some()
        || cli.rows.is_some()
        || cli.spacing.is_some()
        || cli.margin.is_some();
    if let Some(v) = cli.columns {
        grid.columns = v;
    }
    if let Some(v) = cli.rows {
        grid.rows = v;
    }
    if counts_changed {
        grid.fit_frame_size(w, h);
    }
    if let Some(v) = cli.frame_width {
        grid.frame_width = v;
    }
    if let Some(v) = cli.frame_height {
        grid.frame_height = v;
    }
    if !grid.is_valid() {
        anyhow::bail!(
            "invalid grid: {}x{} cells of {}x{} px",
            grid.columns,
            grid.rows,
            grid.frame_width,
            grid.frame_height
        );
    }

    let mut frames = slice_strip(&rgba, &grid, &base)?;
    let skipped_cells = grid.candidate_count() as usize - frames.len();
    if skipped_cells > 0 {
        warn!(skipped_cells, "cells outside the image were skipped");
    }

    if cli.skip_empty {
        if grid.is_expensive_to_preview() && !cli.force {
            warn!(
                cells = grid.candidate_count(),
                "grid too large to classify frames; pass --force to skip empty frames anyway"
            );
        } else {
            let analysis = analyze_frames(&frames);
            frames.retain(|f| !analysis.empty_or_solid.contains(&f.id));
            info!(
                dropped = analysis.empty_or_solid.len(),
                "dropped empty/solid frames"
            );
        }
    }

    if cli.dry_run {
        println!("{}", serde_json::to_string_pretty(&grid)?);
        println!("frames={}", frames.len());
        return Ok(());
    }
    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("create out_dir {}", cli.out_dir.display()))?;
    for f in &frames {
        let path = cli.out_dir.join(format!("{}.png", sanitize(&f.name)));
        f.image
            .save(&path)
            .with_context(|| format!("write {}", path.display()))?;
    }
    info!(frames = frames.len(), out_dir = ?cli.out_dir, "frames written");
    Ok(())
}

fn run_inspect(cli: &InspectArgs) -> anyhow::Result<()> {
    let rgba = load_image(&cli.image)?;
    let (w, h) = rgba.dimensions();
    let file_name = cli.image.file_name().and_then(|s| s.to_str());
    let grid = suggest_grid(w, h, file_name);
    let scan = analyze::scan(&rgba);
    let value = serde_json::json!({
        "image": cli.image.display().to_string(),
        "size": {"w": w, "h": h},
        "looks_like_strip": looks_like_strip(w, h, file_name),
        "suggested_grid": grid,
        "expensive_to_preview": grid.is_expensive_to_preview(),
        "opaque_bounds": scan.bounds,
        "classification": analyze::Classification::from(scan),
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn run_analyze(cli: &AnalyzeArgs, show_progress: bool) -> anyhow::Result<()> {
    let paths = InputFilter::new(&cli.include, &cli.exclude)?.collect(&cli.input)?;
    let loaded = load_images_with_progress(&paths, show_progress)?;
    let sprites: Vec<Sprite> = loaded
        .into_iter()
        .map(|(p, rgba)| Sprite::new(p.to_string_lossy().replace('\\', "/"), rgba))
        .collect();
    let analysis = analyze_frames(&sprites);
    let names: HashMap<SpriteId, &str> =
        sprites.iter().map(|s| (s.id, s.name.as_str())).collect();
    let transparent = names_of(&analysis.transparent, &names);
    let solid = names_of(&analysis.solid_color, &names);

    if cli.json {
        let value = serde_json::json!({
            "total": analysis.total,
            "transparent": transparent,
            "solid_color": solid,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }
    println!(
        "total={} transparent={} solid_color={}",
        analysis.total,
        transparent.len(),
        solid.len()
    );
    for n in &transparent {
        println!("transparent\t{n}");
    }
    for n in &solid {
        println!("solid\t{n}");
    }
    Ok(())
}

fn names_of<'a>(ids: &[SpriteId], names: &HashMap<SpriteId, &'a str>) -> Vec<&'a str> {
    ids.iter().filter_map(|id| names.get(id).copied()).collect()
}

fn run_unpack(cli: &UnpackArgs) -> anyhow::Result<()> {
    let rgba = load_image(&cli.image)?;
    let text = fs::read_to_string(&cli.descriptor)
        .with_context(|| format!("read {}", cli.descriptor.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parse {}", cli.descriptor.display()))?;
    let atlas = from_json_hash(&value)?;
    let sheet = unpack_atlas(&rgba, &atlas)?;

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("create out_dir {}", cli.out_dir.display()))?;
    for s in &sheet.sprites {
        let path = cli.out_dir.join(format!("{}.png", sanitize(&s.name)));
        s.image
            .save(&path)
            .with_context(|| format!("write {}", path.display()))?;
    }
    if !sheet.groups.is_empty() {
        // same shape `pack --groups` reads
        let names: HashMap<SpriteId, &str> = sheet
            .sprites
            .iter()
            .map(|s| (s.id, s.name.as_str()))
            .collect();
        let mut map = serde_json::Map::new();
        for g in &sheet.groups {
            let members = names_of(&g.member_ids, &names);
            map.insert(g.name.clone(), serde_json::json!(members));
        }
        let path = cli.out_dir.join("groups.json");
        fs::write(&path, serde_json::to_string_pretty(&map)?)
            .with_context(|| format!("write {}", path.display()))?;
    }
    info!(
        frames = sheet.sprites.len(),
        groups = sheet.groups.len(),
        out_dir = ?cli.out_dir,
        "sheet unpacked"
    );
    Ok(())
}

/// Reads a group file and resolves member names against `sprites` (first
/// sprite with a matching name). Unknown names are skipped with a warning.
fn load_groups(path: &Path, sprites: &[Sprite]) -> anyhow::Result<Vec<Group>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read groups {}", path.display()))?;
    // JSON is read through the YAML parser as well
    let doc: serde_yaml::Mapping = serde_yaml::from_str(&text)
        .with_context(|| format!("parse groups {}", path.display()))?;

    let mut by_name = HashMap::with_capacity(sprites.len());
    for s in sprites {
        by_name.entry(s.name.as_str()).or_insert(s.id);
    }
    let mut groups = Vec::with_capacity(doc.len());
    for (k, v) in doc {
        let Some(name) = k.as_str() else {
            anyhow::bail!("group names must be strings in {}", path.display());
        };
        let members: Vec<String> = serde_yaml::from_value(v)
            .with_context(|| format!("group `{name}` must be a list of sprite names"))?;
        let mut ids = Vec::with_capacity(members.len());
        for m in &members {
            match by_name.get(m.as_str()) {
                Some(id) => ids.push(*id),
                None => warn!(group = name, sprite = %m, "unknown sprite in group"),
            }
        }
        groups.push(Group::new(name, ids));
    }
    Ok(groups)
}

fn parse_layout(s: &str) -> anyhow::Result<Layout> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("unknown layout: {}", s))
}

fn parse_preset(s: &str) -> anyhow::Result<Preset> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("unknown preset: {}", s))
}

/// Decides which files under the inputs are loaded: decodable image
/// extensions that pass the `--include`/`--exclude` globs. Globs match the
/// path with forward slashes.
struct InputFilter {
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl InputFilter {
    fn new(include: &[String], exclude: &[String]) -> anyhow::Result<Self> {
        Ok(Self {
            include: glob_set(include).context("invalid --include pattern")?,
            exclude: glob_set(exclude).context("invalid --exclude pattern")?,
        })
    }

    fn accepts(&self, path: &Path) -> bool {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        if !matches!(ext.as_deref(), Some("png" | "jpg" | "jpeg")) {
            return false;
        }
        let s = path.to_string_lossy().replace('\\', "/");
        !self.exclude.as_ref().is_some_and(|ex| ex.is_match(&s))
            && self.include.as_ref().is_none_or(|inc| inc.is_match(&s))
    }

    /// Accepted files under `root` (or `root` itself), sorted by file name
    /// within each directory.
    fn collect(&self, root: &Path) -> anyhow::Result<Vec<PathBuf>> {
        if !root.exists() {
            anyhow::bail!("input {} does not exist", root.display());
        }
        if root.is_file() {
            return Ok(self.accepts(root).then(|| root.to_path_buf()).into_iter().collect());
        }
        let mut out = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    warn!(%err, "skipping unreadable entry");
                    continue;
                }
            };
            if entry.file_type().is_file() && self.accepts(entry.path()) {
                out.push(entry.into_path());
            }
        }
        Ok(out)
    }
}

fn glob_set(patterns: &[String]) -> anyhow::Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut b = GlobSetBuilder::new();
    for pat in patterns {
        b.add(Glob::new(pat).with_context(|| format!("glob `{pat}`"))?);
    }
    Ok(Some(b.build()?))
}

fn load_images_with_progress(
    paths: &[PathBuf],
    progress: bool,
) -> anyhow::Result<Vec<(PathBuf, RgbaImage)>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(ProgressStyle::with_template(
            "{spinner:.green} loading {pos}/{len} [{elapsed_precise}] {wide_msg}",
        )?);
        Some(b)
    } else {
        None
    };
    let mut list = Vec::with_capacity(paths.len());
    for p in paths {
        let msg = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if let Some(b) = &bar {
            b.set_message(msg.to_string());
        }
        match load_image(p) {
            Ok(img) => list.push((p.clone(), img)),
            Err(e) => {
                error!(?p, error = %e, "skip image");
            }
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
}

fn load_image(p: &Path) -> anyhow::Result<RgbaImage> {
    let img = ImageReader::open(p)
        .with_context(|| format!("open {}", p.display()))?
        .with_guessed_format()?
        .decode()
        .with_context(|| format!("decode {}", p.display()))?;
    Ok(img.to_rgba8())
}

fn file_stem(p: &Path) -> String {
    p.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sprite".to_string())
}

/// Frame names may carry path separators; keep output files flat.
fn sanitize(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}

/// `RUST_LOG` wins when set; otherwise `-q` logs errors only and each `-v`
/// raises the level from info.
fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    preset: Option<String>,
    max_width: Option<u32>,
    max_height: Option<u32>,
    spacing: Option<u32>,
    padding: Option<u32>,
    #[serde(alias = "trim_whitespace")]
    trim: Option<bool>,
    #[serde(alias = "force_power_of_two", alias = "pow2")]
    power_of_two: Option<bool>,
    allow_rotation: Option<bool>,
    layout: Option<String>,
    image_name: Option<String>,
}

impl YamlConfig {
    /// Preset first, then individual keys on top of it.
    fn into_packing_options(self, mut opts: PackingOptions) -> anyhow::Result<PackingOptions> {
        if let Some(v) = self.preset {
            opts = parse_preset(&v)?.apply(opts);
        }
        if let Some(v) = self.max_width {
            opts.max_width = v;
        }
        if let Some(v) = self.max_height {
            opts.max_height = v;
        }
        if let Some(v) = self.spacing {
            opts.spacing = v;
        }
        if let Some(v) = self.padding {
            opts.padding = v;
        }
        if let Some(v) = self.trim {
            opts.trim_whitespace = v;
        }
        if let Some(v) = self.power_of_two {
            opts.force_power_of_two = v;
        }
        if let Some(v) = self.allow_rotation {
            opts.allow_rotation = v;
        }
        if let Some(v) = self.layout {
            opts.layout = parse_layout(&v)?;
        }
        if let Some(v) = self.image_name {
            opts.image_name = v;
        }
        Ok(opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn input_filter_keeps_decodable_images() {
        let f = InputFilter::new(&[], &[]).expect("filter");
        assert!(f.accepts(Path::new("art/hero.png")));
        assert!(f.accepts(Path::new("art/HERO.JPEG")));
        assert!(!f.accepts(Path::new("art/hero.psd")));
        assert!(!f.accepts(Path::new("art/README")));
    }

    #[test]
    fn input_filter_applies_exclude_before_include() {
        let f = InputFilter::new(&strings(&["**/walk/**"]), &strings(&["**/*_old.png"]))
            .expect("filter");
        assert!(f.accepts(Path::new("art/walk/01.png")));
        assert!(!f.accepts(Path::new("art/walk/01_old.png")));
        assert!(!f.accepts(Path::new("art/run/01.png")));
        assert!(f.accepts(Path::new(r"art\walk\02.png")));
    }

    #[test]
    fn input_filter_rejects_bad_globs() {
        assert!(InputFilter::new(&strings(&["[unclosed"]), &[]).is_err());
    }
}
