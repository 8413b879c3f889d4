use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use tagsplit_core::config::{self, CONFIG_FILE_NAME, TagsplitConfig};
use tagsplit_core::fetch::{GitFetcher, SyncOutcome};
use tagsplit_core::loader::{FileSpecLoader, SpecLoader};
use tagsplit_core::parse::spec::SwaggerDocument;
use tagsplit_core::partition::{self, TagGroup};
use tagsplit_core::pipeline::{self, Pipeline, ProductJob};
use tagsplit_core::transform::{HostOverride, apply_host_override};
use tagsplit_typescript::{TypeScriptConfig, TypeScriptEmitter};

#[derive(Parser)]
#[command(
    name = "tagsplit",
    about = "Generate one TypeScript client per Swagger tag",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every configured product and regenerate its clients
    Generate {
        /// Path to the config file
        #[arg(short, long, default_value = CONFIG_FILE_NAME)]
        config: PathBuf,

        /// Only generate these products (repeatable)
        #[arg(short, long)]
        product: Vec<String>,

        /// Use existing checkouts instead of cloning or pulling
        #[arg(long)]
        skip_fetch: bool,
    },

    /// Split a local spec file into per-tag clients
    Split {
        /// Path to the Swagger spec file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "src/generated/client")]
        output: PathBuf,

        /// Replace the document's `host`
        #[arg(long)]
        host: Option<String>,

        /// Replace the document's `basePath`
        #[arg(long)]
        base_path: Option<String>,

        /// Omit JSDoc comments
        #[arg(long)]
        no_jsdoc: bool,
    },

    /// Show how a spec would be split
    Inspect {
        /// Path to the Swagger spec file
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Initialize a new tagsplit configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            config,
            product,
            skip_fetch,
        } => cmd_generate(&config, &product, skip_fetch),

        Commands::Split {
            input,
            output,
            host,
            base_path,
            no_jsdoc,
        } => cmd_split(
            &input,
            &output,
            &HostOverride { host, base_path },
            no_jsdoc,
        ),

        Commands::Inspect { input, format } => cmd_inspect(&input, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "tagsplit", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn load_spec(path: &Path) -> Result<SwaggerDocument> {
    FileSpecLoader
        .load(path)
        .with_context(|| format!("failed to load {}", path.display()))
}

fn cmd_generate(config_path: &Path, selected: &[String], skip_fetch: bool) -> Result<()> {
    let cfg: TagsplitConfig = config::load_config(config_path)?.with_context(|| {
        format!(
            "{} not found. Run `tagsplit init` to create one.",
            config_path.display()
        )
    })?;

    for name in selected {
        if !cfg.products.contains_key(name) {
            anyhow::bail!("unknown product `{name}` (not in {})", config_path.display());
        }
    }

    if cfg.products.is_empty() {
        eprintln!("No products configured. Add a `products` section to your config.");
        return Ok(());
    }

    let emitter = TypeScriptEmitter::new(TypeScriptConfig {
        no_jsdoc: cfg.emit.no_jsdoc,
    });
    let pipeline =
        Pipeline::new(GitFetcher::default(), FileSpecLoader, emitter).skip_fetch(skip_fetch);

    let mut failed = Vec::new();
    for (name, product) in &cfg.products {
        if !selected.is_empty() && !selected.contains(name) {
            continue;
        }

        eprintln!("Generating {name} from {}", product.repository);
        let job = ProductJob::from_config(&cfg, name, product);
        match pipeline.run(&job) {
            Ok(report) => {
                match report.sync {
                    Some(SyncOutcome::Cloned) => eprintln!("  cloned {}", job.checkout.display()),
                    Some(SyncOutcome::Pulled) => eprintln!("  pulled {}", job.checkout.display()),
                    None => {}
                }
                for path in &report.written {
                    eprintln!("  wrote {}", path.display());
                }
                eprintln!(
                    "Generated {} clients in {}",
                    report.written.len(),
                    job.output.display()
                );
            }
            Err(e) => {
                log::error!("{name}: {e}");
                eprintln!("  failed: {e}");
                failed.push(name.as_str());
            }
        }
    }

    if !failed.is_empty() {
        anyhow::bail!("generation failed for: {}", failed.join(", "));
    }
    Ok(())
}

fn cmd_split(
    input: &Path,
    output: &Path,
    overrides: &HostOverride,
    no_jsdoc: bool,
) -> Result<()> {
    let doc = apply_host_override(&load_spec(input)?, overrides);
    let emitter = TypeScriptEmitter::new(TypeScriptConfig { no_jsdoc });

    let files = pipeline::generate_clients(&doc, &emitter)?;
    let written = pipeline::write_files(output, &files)?;
    for path in &written {
        eprintln!("  wrote {}", path.display());
    }
    eprintln!("Generated {} clients in {}", written.len(), output.display());
    Ok(())
}

fn cmd_inspect(input: &Path, format: InspectFormat) -> Result<()> {
    let doc = load_spec(input)?;

    let groups = partition::group_paths_by_tag(&doc)?;
    partition::check_groups(&groups)?;
    let summary = build_inspect_summary(&doc, &groups);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(doc: &SwaggerDocument, groups: &[TagGroup]) -> serde_json::Value {
    let groups: Vec<serde_json::Value> = groups
        .iter()
        .map(|group| {
            let class_name = group.class_name();
            serde_json::json!({
                "client": class_name,
                "tag": group.raw_tag,
                "file": pipeline::client_file_name(&class_name, "ts"),
                "paths": group.paths.iter().map(|p| &p.path_name).collect::<Vec<_>>(),
            })
        })
        .collect();

    serde_json::json!({
        "title": doc.title(),
        "base_url": doc.base_url(),
        "paths": doc.paths.len(),
        "groups": groups,
    })
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
