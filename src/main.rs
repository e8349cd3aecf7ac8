use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use setdress_pipeline::export::{ExportSettings, MemoryMayaScene, apply_export_plan, plan_export};
use setdress_pipeline::materials::{export_shaders, import_shaders};
use setdress_pipeline::models::{AssetRequest, SetDressPoint};
use setdress_pipeline::publish::{latest_version, next_version, scan_versions, version_folder};
use setdress_pipeline::setdress::{plan_materialx_export, run_materialx_export};
use setdress_pipeline::{AssetResolver, MemoryNode, PipelineConfig, SetDressImporter};

/// Set-dress pipeline helpers working on publish folders and scene snapshots.
#[derive(Debug, Parser)]
#[command(name = "setdress", version, about)]
struct Cli {
    /// Directory searched for `setdress.config.json`.
    #[arg(long, global = true, default_value = ".")]
    config_dir: PathBuf,

    /// Raise log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve the latest published cache of an asset.
    Resolve(ResolveArgs),
    /// List the version folders of a publish directory.
    Versions {
        /// Publish directory to scan.
        dir: PathBuf,
    },
    /// Import a set-dress point list into a scene snapshot.
    Import {
        #[command(flatten)]
        scene: SceneArgs,
        /// JSON list of set-dress points.
        #[arg(long)]
        points: PathBuf,
    },
    /// Export or import material assignments.
    Shaders {
        #[command(subcommand)]
        action: ShadersAction,
    },
    /// Publish MaterialX files for every generated asset.
    Mtlx {
        #[command(flatten)]
        scene: SceneArgs,
        /// Work-area directory the scene file lives in.
        #[arg(long)]
        scene_dir: String,
        /// Print the plan without creating folders or driving the exporter.
        #[arg(long)]
        dry_run: bool,
    },
    /// Plan a Maya set-dress export from a scene snapshot.
    ExportPlan {
        /// Maya scene snapshot.
        #[arg(long)]
        scene: PathBuf,
        /// Destination Alembic file.
        #[arg(long)]
        file: String,
        /// First exported frame.
        #[arg(long, default_value_t = 1)]
        start: i64,
        /// Last exported frame.
        #[arg(long, default_value_t = 1)]
        end: i64,
        /// Write the attributes back into the snapshot.
        #[arg(long)]
        apply: bool,
    },
}

#[derive(Debug, Args)]
struct ResolveArgs {
    /// Asset type folder, e.g. `Prop`.
    #[arg(long)]
    asset_type: String,
    /// Asset name.
    #[arg(long)]
    asset: String,
    /// Pipeline step; defaults to the configured step.
    #[arg(long)]
    step: Option<String>,
    /// Instance number reported in the record.
    #[arg(long, default_value_t = 1)]
    instance: u32,
}

#[derive(Debug, Args)]
struct SceneArgs {
    /// Scene snapshot of the set-dress node.
    #[arg(long)]
    scene: PathBuf,
    /// Where to write the updated snapshot; defaults to overwriting `--scene`.
    #[arg(long)]
    output: Option<PathBuf>,
}

impl SceneArgs {
    fn output_path(&self) -> &Path {
        self.output.as_deref().unwrap_or(&self.scene)
    }
}

#[derive(Debug, Subcommand)]
enum ShadersAction {
    /// Write the material assignments of the scene to a shader file.
    Export {
        #[command(flatten)]
        scene: SceneArgs,
        /// Shader file; defaults to the configured file next to the scene.
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Apply a shader file onto the scene.
    Import {
        #[command(flatten)]
        scene: SceneArgs,
        /// Shader file; defaults to the configured file next to the scene.
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = PipelineConfig::discover(&cli.config_dir);
    match cli.command {
        Command::Resolve(args) => resolve(&config, args),
        Command::Versions { dir } => versions(&config, &dir),
        Command::Import { scene, points } => import(&config, &scene, &points),
        Command::Shaders { action } => shaders(&config, action),
        Command::Mtlx {
            scene,
            scene_dir,
            dry_run,
        } => mtlx(&config, &scene, &scene_dir, dry_run),
        Command::ExportPlan {
            scene,
            file,
            start,
            end,
            apply,
        } => export_plan(&config, &scene, file, start, end, apply),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_scene(path: &Path) -> Result<MemoryNode> {
    MemoryNode::load(path)
        .with_context(|| format!("failed to load scene snapshot {}", path.display()))
}

fn save_scene(node: &MemoryNode, path: &Path) -> Result<()> {
    node
        .save(path)
        .with_context(|| format!("failed to save scene snapshot {}", path.display()))
}

fn resolve(config: &PipelineConfig, args: ResolveArgs) -> Result<()> {
    let resolver = AssetResolver::new(config.to_layout());
    let record = resolver
        .resolve(&AssetRequest {
            asset_type: args.asset_type,
            asset_name: args.asset,
            asset_instance: args.instance,
            asset_step: args.step.unwrap_or_else(|| config.default_step.clone()),
        })
        .context("failed to resolve asset")?;
    print_json(&record)
}

#[derive(Serialize)]
struct VersionReport {
    versions: Vec<String>,
    latest: String,
    next: String,
}

fn versions(config: &PipelineConfig, dir: &Path) -> Result<()> {
    let versions = scan_versions(dir, &config.version_prefix)
        .with_context(|| format!("failed to scan {}", dir.display()))?;
    let latest = latest_version(&versions);
    let next = version_folder(&config.version_prefix, next_version(&versions)?);
    print_json(&VersionReport {
        versions,
        latest,
        next,
    })
}

fn import(config: &PipelineConfig, scene: &SceneArgs, points_path: &Path) -> Result<()> {
    let content = fs::read_to_string(points_path)
        .with_context(|| format!("point list not found at {}", points_path.display()))?;
    let points: Vec<SetDressPoint> =
        serde_json::from_str(&content).context("failed to parse set-dress point list")?;

    let mut node = load_scene(&scene.scene)?;
    let records = SetDressImporter::from_config(config)
        .import_set_dress(&mut node, &points)
        .context("set-dress import failed")?;
    save_scene(&node, scene.output_path())?;
    print_json(&records)
}

fn shaders(config: &PipelineConfig, action: ShadersAction) -> Result<()> {
    match action {
        ShadersAction::Export { scene, file } => {
            let node = load_scene(&scene.scene)?;
            let file = file.unwrap_or_else(|| config.shaders_file_for(&scene.scene));
            let assignments = export_shaders(&node, &config.processing_nodes, &file)
                .context("failed to export shaders")?;
            println!("{} assignment(s) written to {}", assignments.len(), file.display());
            Ok(())
        }
        ShadersAction::Import { scene, file } => {
            let mut node = load_scene(&scene.scene)?;
            let file = file.unwrap_or_else(|| config.shaders_file_for(&scene.scene));
            let applied = import_shaders(&mut node, &file).context("failed to import shaders")?;
            save_scene(&node, scene.output_path())?;
            println!("{applied} object(s) updated from {}", file.display());
            Ok(())
        }
    }
}

fn mtlx(config: &PipelineConfig, scene: &SceneArgs, scene_dir: &str, dry_run: bool) -> Result<()> {
    let mut node = load_scene(&scene.scene)?;
    let plan = plan_materialx_export(
        &node,
        scene_dir,
        &config.processing_nodes,
        &config.version_prefix,
    )
    .context("failed to plan MaterialX export")?;

    if plan.jobs.is_empty() {
        bail!("no generated assets to export under {}", node.name);
    }

    if !dry_run {
        run_materialx_export(&mut node, &plan).context("MaterialX export failed")?;
        save_scene(&node, scene.output_path())?;
    }
    print_json(&plan)
}

fn export_plan(
    config: &PipelineConfig,
    scene_path: &Path,
    file: String,
    start: i64,
    end: i64,
    apply: bool,
) -> Result<()> {
    let mut scene = MemoryMayaScene::load(scene_path)
        .with_context(|| format!("failed to load Maya snapshot {}", scene_path.display()))?;
    let plan = plan_export(&scene, &ExportSettings {
        start_frame: start,
        end_frame: end,
        file_path: file,
        default_asset_type: config.default_asset_type.clone(),
    })?;

    if apply {
        apply_export_plan(&mut scene, &plan)?;
        scene
            .save(scene_path)
            .with_context(|| format!("failed to save Maya snapshot {}", scene_path.display()))?;
    }

    print_json(&plan)?;
    match plan.alembic_job() {
        Some(job) => println!("{job}"),
        None => log::warn!("no SRT roots found in the selection, nothing to export"),
    }
    Ok(())
}
