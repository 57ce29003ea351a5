// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: built-in recipe revision
fn revision_arg() -> Arg {
    Arg::new("revision")
        .short('R')
        .long("revision")
        .value_name("REV")
        .default_value("2")
        .help("Built-in HyCAN recipe revision (1, 2 or 3)")
}

/// Common argument: workspace base directory
fn base_dir_arg() -> Arg {
    Arg::new("base_dir")
        .short('b')
        .long("base-dir")
        .value_name("DIR")
        .help("Workspace base directory")
}

fn pipeline_args(cmd: Command) -> Command {
    cmd.arg(revision_arg())
        .arg(base_dir_arg())
        .arg(Arg::new("recipe").long("recipe").value_name("FILE").help("Recipe TOML file"))
        .arg(Arg::new("source_dir").long("source-dir").value_name("DIR").help("Source checkout"))
        .arg(Arg::new("dep_cache").long("dep-cache").value_name("DIR").help("Local dependency cache"))
        .arg(Arg::new("build_type").long("build-type").default_value("Release").help("Build type"))
        .arg(Arg::new("arch").long("arch").default_value("x86_64").help("Target architecture"))
        .arg(Arg::new("compiler").long("compiler").default_value("gcc").help("Compiler family"))
}

fn build_cli() -> Command {
    Command::new("hyforge")
        .version(env!("CARGO_PKG_VERSION"))
        .author("HyForge Contributors")
        .about("Recipe-driven build and packaging pipeline for HyCAN")
        .subcommand_required(false)
        .subcommand(pipeline_args(
            Command::new("layout").about("Resolve and print the directory layout"),
        ))
        .subcommand(pipeline_args(
            Command::new("requirements")
                .about("Print the ordered dependency set of a recipe revision"),
        ))
        .subcommand(pipeline_args(
            Command::new("generate")
                .about("Resolve dependencies and write the generated descriptors"),
        ))
        .subcommand(pipeline_args(
            Command::new("build").about("Configure and compile with the native build system"),
        ))
        .subcommand(pipeline_args(
            Command::new("package").about("Run the full pipeline and publish the package"),
        ))
        .subcommand(pipeline_args(
            Command::new("package-info").about("Print the link metadata of a published package"),
        ))
        .subcommand(pipeline_args(
            Command::new("create").about("Validate a recipe, then run the full pipeline"),
        ))
        .subcommand(
            Command::new("validate")
                .about("Validate a recipe file and report warnings")
                .arg(Arg::new("recipe").required(true).help("Recipe TOML file")),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "zsh", "fish", "powershell"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    // Generate main man page
    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("hyforge.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
        return;
    }

    println!("cargo:warning=Man page generated at {}", man_path.display());
}
