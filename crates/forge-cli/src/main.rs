//! Stackforge CLI - generate a project archive from a template and feature modules

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use forge_core::config::settings::TEMPLATE_DIR_ENV;
use forge_core::tui::CreateArgs;
use forge_core::{
    plugins, BuildConfig, ForgeSettings, Framework, Linting, PackageManager, Routing,
    StateManager, Styling,
};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "stackforge")]
#[command(about = "Generate a ready-to-download project archive from a template and feature modules")]
#[command(version)]
pub struct Args {
    /// Settings file (YAML) with template and temp directories
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Log pipeline stages to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a project archive
    Build(BuildArgs),
    /// Show which feature modules a configuration selects and what they change
    Plugins(OptionArgs),
}

/// Options shared by every subcommand that describes a configuration
#[derive(Parser, Debug, Default)]
pub struct OptionArgs {
    /// Request file (JSON or YAML) holding a complete configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Application name (also the archive's top-level directory)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Framework: react, vue, svelte, nextjs
    #[arg(short, long, value_parser = parse_option::<Framework>)]
    pub framework: Option<Framework>,

    /// Routing: none, react-router, vue-router, app-router, pages-router
    #[arg(long, value_parser = parse_option::<Routing>)]
    pub routing: Option<Routing>,

    /// Styling: none, tailwind, css-modules
    #[arg(long, value_parser = parse_option::<Styling>)]
    pub styling: Option<Styling>,

    /// State manager: none, redux-toolkit, zustand, pinia
    #[arg(long = "state", value_parser = parse_option::<StateManager>)]
    pub state_manager: Option<StateManager>,

    /// Linting (Next.js templates): eslint, biome, none
    #[arg(long, value_parser = parse_option::<Linting>)]
    pub linting: Option<Linting>,

    /// Package manager: npm, pnpm, yarn, bun
    #[arg(short, long = "package-manager", value_parser = parse_option::<PackageManager>)]
    pub package_manager: Option<PackageManager>,

    /// Extra runtime dependencies (comma-separated: name or name@version)
    #[arg(long = "with", value_delimiter = ',')]
    pub extra_dependencies: Vec<String>,
}

#[derive(Parser, Debug, Default)]
pub struct BuildArgs {
    #[command(flatten)]
    pub options: OptionArgs,

    /// Directory to write the archive to (defaults to the current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Local directory to use for templates (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Keep the generated working directory for inspection
    #[arg(long)]
    pub keep_workdir: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

/// Parse an option value with the same names request files use
fn parse_option<T: DeserializeOwned>(value: &str) -> std::result::Result<T, String> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| format!("unsupported value '{}'", value))
}

/// Read a request file; `.yaml`/`.yml` are parsed as YAML, everything else as JSON
fn load_config_file(path: &Path) -> Result<BuildConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );

    if is_yaml {
        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    } else {
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

impl OptionArgs {
    /// Merge the request file (if any) with flags; flags win
    fn into_create_args(self) -> Result<CreateArgs> {
        let mut args = match &self.config {
            Some(path) => CreateArgs::from_config(load_config_file(path)?),
            None => CreateArgs::default(),
        };

        args.app_name = self.name.or(args.app_name);
        args.framework = self.framework.or(args.framework);
        args.routing = self.routing.or(args.routing);
        args.styling = self.styling.or(args.styling);
        args.state_manager = self.state_manager.or(args.state_manager);
        args.linting = self.linting.or(args.linting);
        args.package_manager = self.package_manager.or(args.package_manager);
        args.extra_dependencies.extend(self.extra_dependencies);

        Ok(args)
    }
}

impl BuildArgs {
    fn into_create_args(self) -> Result<CreateArgs> {
        let mut args = self.options.into_create_args()?;
        args.output = self.output;
        args.keep_workdir = self.keep_workdir;
        args.yes = self.yes;
        Ok(args)
    }
}

/// Initialize tracing on stderr; quiet unless `--verbose` or `RUST_LOG` says otherwise
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "forge_core=debug,stackforge=debug"
    } else {
        "forge_core=warn"
    };
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Print the modules a configuration selects without building anything
fn print_plugins(options: OptionArgs) -> Result<()> {
    let args = options.into_create_args()?;
    let framework = args
        .framework
        .ok_or_else(|| anyhow::anyhow!("--framework (or a --config file) is required"))?;

    let mut config = BuildConfig::new(args.app_name.unwrap_or_else(|| "my-app".into()), framework);
    config.routing = args.routing.unwrap_or_default();
    config.styling = args.styling.unwrap_or_default();
    config.state_manager = args.state_manager.unwrap_or_default();
    config.linting = args.linting.unwrap_or_default();
    config.extra_dependencies = args.extra_dependencies;

    let modules = plugins::select(&config);
    if modules.is_empty() {
        println!("{}", "No feature modules selected".yellow());
        return Ok(());
    }

    for module in modules {
        println!("{} {}", "->".blue(), module.name().cyan().bold());

        let deps = module.dependencies(&config);
        for (name, version) in &deps.dependencies {
            println!("     dependency     {}@{}", name, version);
        }
        for (name, version) in &deps.dev_dependencies {
            println!("     devDependency  {}@{}", name, version);
        }
        for directive in module.patches(&config) {
            println!("     patch          {}", directive.file);
        }
        for file in module.additional_files(&config) {
            println!("     create         {}", file.path.green());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_tracing(args.verbose);

    let mut settings = ForgeSettings::load(args.settings.as_deref())?;
    tracing::debug!(?settings, "Loaded settings");

    match args.command {
        Some(Command::Plugins(options)) => print_plugins(options),
        command => {
            // No subcommand provided, default to build behavior (interactive mode)
            let build_args = match command {
                Some(Command::Build(build_args)) => build_args,
                _ => BuildArgs::default(),
            };

            if let Some(dir) = &build_args.template_dir {
                settings.template_dir = dir.clone();
            }
            if !settings.template_dir.exists() {
                eprintln!(
                    "{} Template directory {} does not exist (set --template-dir or {})",
                    "Warning:".yellow(),
                    settings.template_dir.display(),
                    TEMPLATE_DIR_ENV
                );
            }

            let result = forge_core::run(build_args.into_create_args()?, settings).await;

            // Ensure cursor is visible on normal exit
            let _ = console::Term::stderr().show_cursor();

            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_option_uses_request_names() {
        assert_eq!(parse_option::<Framework>("nextjs").unwrap(), Framework::Nextjs);
        assert_eq!(
            parse_option::<StateManager>("redux-toolkit").unwrap(),
            StateManager::ReduxToolkit
        );
        assert_eq!(parse_option::<Routing>("pages").unwrap(), Routing::PagesRouter);
        assert!(parse_option::<Styling>("sass").is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = std::env::temp_dir().join(format!("stackforge-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("request.yaml");
        std::fs::write(
            &path,
            "appName: shop\nframework: react\nstyling: tailwind\nextraDependencies: [axios]\n",
        )
        .unwrap();

        let options = OptionArgs {
            config: Some(path),
            name: Some("store".to_string()),
            extra_dependencies: vec!["dayjs".to_string()],
            ..OptionArgs::default()
        };
        let args = options.into_create_args().unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(args.app_name.as_deref(), Some("store"));
        assert_eq!(args.framework, Some(Framework::React));
        assert_eq!(args.styling, Some(Styling::Tailwind));
        assert_eq!(args.extra_dependencies, vec!["axios", "dayjs"]);
    }

    #[test]
    fn test_cli_parses_build_flags() {
        let args = Args::try_parse_from([
            "stackforge",
            "build",
            "--name",
            "shop",
            "--framework",
            "vue",
            "--state",
            "pinia",
            "--with",
            "axios,dayjs@1",
            "--yes",
        ])
        .unwrap();

        match args.command {
            Some(Command::Build(build)) => {
                assert_eq!(build.options.framework, Some(Framework::Vue));
                assert_eq!(build.options.state_manager, Some(StateManager::Pinia));
                assert_eq!(build.options.extra_dependencies, vec!["axios", "dayjs@1"]);
                assert!(build.yes);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
