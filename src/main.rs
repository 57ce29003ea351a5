// src/main.rs

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use hyforge::{
    package_info, parse_recipe_file, validate_recipe, Arch, BuildConfig, BuildType, CMakeBuild,
    Compiler, LocalIndex, Recipe, Revision, Settings,
};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

#[derive(Parser)]
#[command(name = "hyforge")]
#[command(author, version, about = "Recipe-driven build and packaging pipeline for HyCAN", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options shared by the pipeline subcommands
#[derive(Args, Clone)]
struct PipelineOpts {
    /// Built-in HyCAN recipe revision (1, 2 or 3)
    #[arg(short = 'R', long, default_value = "2")]
    revision: String,

    /// Recipe TOML file (overrides --revision)
    #[arg(long, value_name = "FILE")]
    recipe: Option<PathBuf>,

    /// Workspace base directory (default: the user cache directory)
    #[arg(short, long, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Source checkout (default: <base>/source)
    #[arg(long, value_name = "DIR")]
    source_dir: Option<PathBuf>,

    /// Local dependency cache (default: <base>/deps)
    #[arg(long, value_name = "DIR")]
    dep_cache: Option<PathBuf>,

    /// Build type (Debug, Release, RelWithDebInfo, MinSizeRel)
    #[arg(long, default_value = "Release")]
    build_type: String,

    /// Target architecture (x86_64, armv8)
    #[arg(long, default_value = "x86_64")]
    arch: String,

    /// Compiler family (gcc, clang)
    #[arg(long, default_value = "gcc")]
    compiler: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve and print the directory layout
    Layout(PipelineOpts),
    /// Print the ordered dependency set of a recipe revision
    Requirements(PipelineOpts),
    /// Resolve dependencies and write the generated descriptors
    Generate(PipelineOpts),
    /// Configure and compile with the native build system
    Build(PipelineOpts),
    /// Run the full pipeline and publish the package
    Package(PipelineOpts),
    /// Print the link metadata of a published package
    PackageInfo(PipelineOpts),
    /// Validate a recipe, then run the full pipeline
    Create(PipelineOpts),
    /// Validate a recipe file and report warnings
    Validate {
        /// Recipe TOML file
        recipe: PathBuf,
    },
    /// Generate shell completion scripts
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn default_base_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|d| d.join("hyforge"))
        .unwrap_or_else(|| PathBuf::from(".hyforge"))
}

fn load_recipe(opts: &PipelineOpts) -> Result<Recipe> {
    match &opts.recipe {
        Some(path) => parse_recipe_file(path)
            .with_context(|| format!("Failed to parse recipe: {}", path.display())),
        None => {
            let revision = Revision::from_str(&opts.revision).map_err(anyhow::Error::msg)?;
            Ok(revision.recipe())
        }
    }
}

fn settings_from(opts: &PipelineOpts) -> Result<Settings> {
    let build_type = BuildType::from_str(&opts.build_type)
        .map_err(|_| anyhow::anyhow!("unknown build type '{}'", opts.build_type))?;
    let arch = Arch::from_str(&opts.arch)
        .map_err(|_| anyhow::anyhow!("unknown architecture '{}'", opts.arch))?;
    let compiler = Compiler::from_str(&opts.compiler)
        .map_err(|_| anyhow::anyhow!("unknown compiler '{}'", opts.compiler))?;

    Ok(Settings {
        build_type,
        arch,
        compiler,
        ..Settings::default()
    })
}

fn config_from(opts: &PipelineOpts) -> Result<(BuildConfig, LocalIndex)> {
    let base_dir = opts.base_dir.clone().unwrap_or_else(default_base_dir);
    let recipe = load_recipe(opts)?;
    let settings = settings_from(opts)?;

    let mut config = BuildConfig::new(recipe, settings, &base_dir);
    if let Some(dir) = &opts.source_dir {
        config = config.with_source_dir(dir);
    }

    let dep_cache = opts
        .dep_cache
        .clone()
        .unwrap_or_else(|| base_dir.join("deps"));
    Ok((config, LocalIndex::new(&dep_cache)))
}

/// Prefix pipeline errors with the phase that failed
fn report(e: hyforge::Error) -> anyhow::Error {
    anyhow::anyhow!("{} phase failed: {}", e.phase(), e)
}

fn print_warnings(recipe: &Recipe) -> Result<()> {
    let warnings = validate_recipe(recipe).map_err(report)?;
    for warning in &warnings {
        println!("Warning: {}", warning);
    }
    Ok(())
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Layout(opts)) => {
            let (config, _) = config_from(&opts)?;
            let layout = hyforge::pipeline::resolve_layout(&config).map_err(report)?;
            println!("source:     {}", layout.source_root.display());
            println!("build:      {}", layout.build_root.display());
            println!("generators: {}", layout.generators_root.display());
            println!("package:    {}", layout.package_root.display());
            Ok(())
        }
        Some(Commands::Requirements(opts)) => {
            let (config, _) = config_from(&opts)?;
            let requirements = config.recipe.requirements().map_err(report)?;
            println!("{} requires:", config.recipe.slug());
            for dep in requirements.iter() {
                println!("  {}", dep);
            }
            Ok(())
        }
        Some(Commands::Generate(opts)) => {
            let (config, index) = config_from(&opts)?;
            let (_, descriptors) = hyforge::pipeline::generate(&config, &index).map_err(report)?;
            println!("Wrote {}", descriptors.dependencies_file.display());
            println!("Wrote {}", descriptors.toolchain_file.display());
            Ok(())
        }
        Some(Commands::Build(opts)) => {
            let (config, index) = config_from(&opts)?;
            let cmake = CMakeBuild::locate().map_err(report)?;
            let layout = hyforge::pipeline::build(&config, &index, &cmake).map_err(report)?;
            println!("Built {} in {}", config.recipe.slug(), layout.build_root.display());
            Ok(())
        }
        Some(Commands::Package(opts)) => {
            let (config, index) = config_from(&opts)?;
            let cmake = CMakeBuild::locate().map_err(report)?;
            let artifact = hyforge::pipeline::run(&config, &index, &cmake).map_err(report)?;
            println!("Packaged {} at {}", config.recipe.slug(), artifact.root.display());
            Ok(())
        }
        Some(Commands::PackageInfo(opts)) => {
            let (config, _) = config_from(&opts)?;
            let layout = hyforge::pipeline::resolve_layout(&config).map_err(report)?;
            let manifest = package_info(&layout.package_root).map_err(report)?;
            println!("{} {}", manifest.name, manifest.version);
            println!("  libs: {}", manifest.libs.join(", "));
            println!("  license: {}", manifest.license_file);
            Ok(())
        }
        Some(Commands::Create(opts)) => {
            let (config, index) = config_from(&opts)?;
            info!("Creating {}", config.recipe.slug());
            print_warnings(&config.recipe)?;

            let cmake = CMakeBuild::locate().map_err(report)?;
            let artifact = hyforge::pipeline::run(&config, &index, &cmake).map_err(report)?;

            println!("Created package: {} {}", artifact.manifest.name, artifact.manifest.version);
            println!("  root: {}", artifact.root.display());
            println!("  libs: {}", artifact.manifest.libs.join(", "));
            Ok(())
        }
        Some(Commands::Validate { recipe }) => {
            let parsed = parse_recipe_file(&recipe)
                .with_context(|| format!("Failed to parse recipe: {}", recipe.display()))?;
            print_warnings(&parsed)?;
            println!("Recipe {} is valid", parsed.slug());
            Ok(())
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "hyforge", &mut std::io::stdout());
            Ok(())
        }
        None => {
            // No command provided, show help
            println!("HyForge v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'hyforge --help' for usage information");
            Ok(())
        }
    }
}
