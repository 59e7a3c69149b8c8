use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use atlas_prep::{colormap, isometric, scan_sheet, MetadataFormat, TileRect, TileRegistry};
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(author, version, about = "Prepare texture atlases and font sheets for blocky game asset packs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan a fixed-grid font sheet into a character coordinate map
    Scan(ScanArgs),
    /// Cut named tiles out of a texture atlas
    Cut(CutArgs),
    /// Render an isometric block preview of a flat texture
    Project(ProjectArgs),
    /// Tint a grayscale texture with a biome colormap color
    Tint(TintArgs),
}

#[derive(Parser, Debug)]
struct ScanArgs {
    /// Font sheet image, e.g. ascii.png
    input: PathBuf,

    /// Glyph cell edge in pixels
    #[arg(long, default_value_t = atlas_prep::DEFAULT_CELL_SIZE)]
    cell_size: u32,

    /// Write the identity to cell-origin map as JSON
    #[arg(short, long)]
    charmap: Option<PathBuf>,

    /// Report empty slots as well as occupied ones
    #[arg(long)]
    full: bool,

    /// Print the 0/1 coverage rows under each reported slot
    #[arg(long)]
    bitmask: bool,
}

#[derive(Parser, Debug)]
struct CutArgs {
    /// Atlas image to cut from
    input: PathBuf,

    /// Explicit tile definition (repeatable)
    #[arg(long = "tile", value_name = "NAME=X,Y,WxH")]
    tiles: Vec<String>,

    /// Two-corner tile definition; empty NAME picks element_{n} (repeatable)
    #[arg(long = "corners", value_name = "NAME=X1,Y1,X2,Y2")]
    corners: Vec<String>,

    /// Grid-cell tile from a pixel position, sized by --cell-size (repeatable)
    #[arg(long = "cell", value_name = "NAME=PX,PY")]
    cells: Vec<String>,

    /// Grid cell edge used by --cell
    #[arg(long, default_value_t = 64)]
    cell_size: u32,

    /// Seed the registry from existing metadata JSON
    #[arg(long)]
    import: Option<PathBuf>,

    /// Write tile metadata JSON here
    #[arg(short, long)]
    metadata: Option<PathBuf>,

    /// Metadata document shape
    #[arg(long, value_enum, default_value = "elements")]
    format: FormatChoice,

    /// Write one {name}.png per tile into this directory
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Print the metadata JSON to stdout
    #[arg(long)]
    print: bool,
}

#[derive(Parser, Debug)]
struct ProjectArgs {
    /// Flat texture to project
    input: PathBuf,

    /// Height of the translucent wall strip in pixels
    #[arg(long, default_value_t = isometric::DEFAULT_WALL_HEIGHT)]
    wall_height: u32,

    /// Output path; defaults to {stem}_isometric.png beside the input
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct TintArgs {
    /// Grayscale texture to tint
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Tint every .png under this directory instead of a single file
    #[arg(long)]
    texture_dir: Option<PathBuf>,

    /// Biome colormap image, temperature columns by humidity rows
    #[arg(long)]
    colormap: PathBuf,

    /// Temperature sample point, 0-255
    #[arg(long, default_value_t = colormap::DEFAULT_TEMPERATURE)]
    temperature: u8,

    /// Humidity sample point, 0-255
    #[arg(long, default_value_t = colormap::DEFAULT_HUMIDITY)]
    humidity: u8,

    /// Output file for --texture
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output directory for --texture-dir
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    /// Nested {"elements": [..]} document
    Elements,
    /// Flat name-to-rectangle object
    Flat,
}

impl From<FormatChoice> for MetadataFormat {
    fn from(choice: FormatChoice) -> MetadataFormat {
        match choice {
            FormatChoice::Elements => MetadataFormat::Elements,
            FormatChoice::Flat => MetadataFormat::Flat,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    match cli.command {
        Command::Scan(args) => scan(args),
        Command::Cut(args) => cut(args),
        Command::Project(args) => project(args),
        Command::Tint(args) => tint(args),
    }
}

fn scan(args: ScanArgs) -> Result<()> {
    let sheet = image::open(&args.input)
        .with_context(|| format!("failed to open font sheet {:?}", args.input))?;
    let scan = scan_sheet(&sheet, args.cell_size)
        .with_context(|| format!("failed to scan {:?}", args.input))?;

    for slot in &scan.slots {
        if !slot.occupied() && !args.full {
            continue;
        }
        println!("{}", slot.summary());
        if args.bitmask {
            for row in &slot.coverage {
                println!("{row}");
            }
        }
    }

    let charmap = scan.charmap();
    println!(
        "{} of {} slots occupied, {} identifiable",
        scan.occupied_count(),
        scan.slots.len(),
        charmap.len()
    );

    if let Some(path) = &args.charmap {
        let file =
            File::create(path).with_context(|| format!("failed to create {path:?}"))?;
        charmap.write_json(file).with_context(|| format!("failed to write charmap {path:?}"))?;
        println!("Charmap written to {path:?}");
    }
    Ok(())
}

fn cut(args: CutArgs) -> Result<()> {
    let atlas = image::open(&args.input)
        .with_context(|| format!("failed to open atlas {:?}", args.input))?;

    let mut registry = match &args.import {
        Some(path) => TileRegistry::read_metadata(path)
            .with_context(|| format!("failed to import metadata {path:?}"))?,
        None => TileRegistry::new(),
    };

    for spec in &args.tiles {
        let (name, rect) = parse_tile_spec(spec)?;
        registry.define(name, rect).with_context(|| format!("invalid tile {spec:?}"))?;
    }
    for spec in &args.corners {
        let (name, first, second) = parse_corners_spec(spec)?;
        registry
            .define_from_points(first, second, &name)
            .with_context(|| format!("invalid corners {spec:?}"))?;
    }
    for spec in &args.cells {
        let (name, pixel) = parse_cell_spec(spec)?;
        registry
            .define_at_cell(pixel, args.cell_size, &name)
            .with_context(|| format!("invalid cell {spec:?}"))?;
    }

    if registry.is_empty() {
        bail!("no tiles defined; use --tile, --corners, --cell or --import");
    }

    for tile in registry.tiles() {
        println!(
            "{}: ({}, {}) {}x{}",
            tile.name, tile.rect.x, tile.rect.y, tile.rect.width, tile.rect.height
        );
    }

    let format = MetadataFormat::from(args.format);
    if args.print {
        println!("{}", registry.metadata_json(format)?);
    }
    if let Some(path) = &args.metadata {
        registry
            .write_metadata(path, format)
            .with_context(|| format!("failed to write metadata {path:?}"))?;
        println!("Metadata written to {path:?}");
    }
    if let Some(dir) = &args.out_dir {
        let report = registry
            .save_images(&atlas, dir)
            .with_context(|| format!("failed to export tiles to {dir:?}"))?;
        println!("Wrote {} of {} tiles to {:?}", report.written.len(), registry.len(), dir);
        if report.all_failed() {
            bail!("no tiles could be written to {dir:?}");
        }
    }
    Ok(())
}

fn project(args: ProjectArgs) -> Result<()> {
    let texture = image::open(&args.input)
        .with_context(|| format!("failed to open texture {:?}", args.input))?;
    let preview = isometric::project(&texture, args.wall_height);

    let output = args.output.clone().unwrap_or_else(|| default_projection_path(&args.input));
    preview.save(&output).with_context(|| format!("failed to save {output:?}"))?;
    println!(
        "Isometric preview written to {:?} ({}x{})",
        output,
        preview.width(),
        preview.height()
    );
    Ok(())
}

fn tint(args: TintArgs) -> Result<()> {
    let colormap_image = image::open(&args.colormap)
        .with_context(|| format!("failed to open colormap {:?}", args.colormap))?;
    let tint = colormap::sample(&colormap_image, args.temperature, args.humidity);
    println!(
        "Tint at temperature {}, humidity {}: #{:02x}{:02x}{:02x}",
        args.temperature, args.humidity, tint.0[0], tint.0[1], tint.0[2]
    );

    match (&args.texture, &args.texture_dir) {
        (Some(texture), None) => {
            let output = args.output.clone().context("--output is required with --texture")?;
            let texture_image = image::open(texture)
                .with_context(|| format!("failed to open texture {texture:?}"))?;
            let tinted = colormap::tint_with(&texture_image, tint);
            tinted.save(&output).with_context(|| format!("failed to save {output:?}"))?;
            println!("Tinted texture written to {output:?}");
            Ok(())
        },
        (None, Some(dir)) => {
            let out_dir = args.out_dir.clone().context("--out-dir is required with --texture-dir")?;
            fs::create_dir_all(&out_dir)
                .with_context(|| format!("failed to create {out_dir:?}"))?;

            let textures = collect_textures(dir);
            if textures.is_empty() {
                bail!("no .png textures under {dir:?}");
            }

            let progress = ProgressBar::new(textures.len() as u64);
            progress.set_style(
                ProgressStyle::with_template(
                    "{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} textures",
                )
                .context("invalid progress template")?
                .progress_chars("=> "),
            );

            let mut written = 0;
            for path in &textures {
                match image::open(path) {
                    Ok(texture) => {
                        let Some(file_name) = path.file_name() else { continue };
                        let target = out_dir.join(file_name);
                        match colormap::tint_with(&texture, tint).save(&target) {
                            Ok(()) => written += 1,
                            Err(error) => warn!("failed to write {target:?}: {error}"),
                        }
                    },
                    Err(error) => warn!("skipping {path:?}: {error}"),
                }
                progress.inc(1);
            }
            progress.finish();

            println!("Tinted {written} of {} textures into {out_dir:?}", textures.len());
            if written == 0 {
                bail!("no textures could be tinted");
            }
            Ok(())
        },
        (Some(_), Some(_)) => bail!("--texture and --texture-dir are mutually exclusive"),
        (None, None) => bail!("nothing to tint; use --texture or --texture-dir"),
    }
}

fn default_projection_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().and_then(|stem| stem.to_str()).unwrap_or("texture");
    input.with_file_name(format!("{stem}_isometric.png"))
}

fn collect_textures(dir: &Path) -> Vec<PathBuf> {
    let mut textures: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .filter(|path| {
            path.extension()
                .and_then(|extension| extension.to_str())
                .map(|extension| extension.eq_ignore_ascii_case("png"))
                .unwrap_or(false)
        })
        .collect();
    textures.sort();
    textures
}

fn parse_tile_spec(spec: &str) -> Result<(String, TileRect)> {
    let (name, rest) = spec
        .split_once('=')
        .with_context(|| format!("expected NAME=X,Y,WxH, got {spec:?}"))?;
    if name.is_empty() {
        bail!("tile spec {spec:?} needs a name");
    }
    let fields: Vec<&str> = rest.split(',').collect();
    if fields.len() != 3 {
        bail!("expected NAME=X,Y,WxH, got {spec:?}");
    }
    let (width, height) = fields[2]
        .split_once('x')
        .with_context(|| format!("expected WxH size in {spec:?}"))?;

    Ok((
        name.to_string(),
        TileRect::new(
            parse_u32(fields[0])?,
            parse_u32(fields[1])?,
            parse_u32(width)?,
            parse_u32(height)?,
        ),
    ))
}

fn parse_corners_spec(spec: &str) -> Result<(String, (u32, u32), (u32, u32))> {
    let (name, rest) = spec
        .split_once('=')
        .with_context(|| format!("expected NAME=X1,Y1,X2,Y2, got {spec:?}"))?;
    let fields: Vec<&str> = rest.split(',').collect();
    if fields.len() != 4 {
        bail!("expected NAME=X1,Y1,X2,Y2, got {spec:?}");
    }

    Ok((
        name.to_string(),
        (parse_u32(fields[0])?, parse_u32(fields[1])?),
        (parse_u32(fields[2])?, parse_u32(fields[3])?),
    ))
}

fn parse_cell_spec(spec: &str) -> Result<(String, (u32, u32))> {
    let (name, rest) = spec
        .split_once('=')
        .with_context(|| format!("expected NAME=PX,PY, got {spec:?}"))?;
    let fields: Vec<&str> = rest.split(',').collect();
    if fields.len() != 2 {
        bail!("expected NAME=PX,PY, got {spec:?}");
    }

    Ok((name.to_string(), (parse_u32(fields[0])?, parse_u32(fields[1])?)))
}

fn parse_u32(field: &str) -> Result<u32> {
    field.trim().parse().with_context(|| format!("invalid number {field:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_specs_parse_name_origin_and_size() {
        let (name, rect) = parse_tile_spec("stone=16,32,64x48").unwrap();
        assert_eq!(name, "stone");
        assert_eq!(rect, TileRect::new(16, 32, 64, 48));
    }

    #[test]
    fn tile_specs_reject_bad_shapes() {
        assert!(parse_tile_spec("stone").is_err());
        assert!(parse_tile_spec("=16,32,64x48").is_err());
        assert!(parse_tile_spec("stone=16,32").is_err());
        assert!(parse_tile_spec("stone=16,32,64").is_err());
        assert!(parse_tile_spec("stone=16,32,sixtyfourx48").is_err());
    }

    #[test]
    fn corner_specs_allow_anonymous_tiles() {
        let (name, first, second) = parse_corners_spec("=10,10,50,40").unwrap();
        assert_eq!(name, "");
        assert_eq!(first, (10, 10));
        assert_eq!(second, (50, 40));

        let (name, ..) = parse_corners_spec("door=1,2,3,4").unwrap();
        assert_eq!(name, "door");
    }

    #[test]
    fn cell_specs_parse_pixel_positions() {
        let (name, pixel) = parse_cell_spec("ore=70,130").unwrap();
        assert_eq!(name, "ore");
        assert_eq!(pixel, (70, 130));
        assert!(parse_cell_spec("ore=70").is_err());
    }

    #[test]
    fn default_projection_path_keeps_the_directory() {
        assert_eq!(
            default_projection_path(Path::new("textures/dirt.png")),
            PathBuf::from("textures/dirt_isometric.png")
        );
        assert_eq!(
            default_projection_path(Path::new("grass.png")),
            PathBuf::from("grass_isometric.png")
        );
    }
}
