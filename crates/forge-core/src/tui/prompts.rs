//! Charm-style CLI prompts using cliclack

use crate::builder::{release_archive, release_project_dir, ProjectBuilder};
use crate::config::{
    BuildConfig, ForgeSettings, Framework, Linting, PackageManager, Routing, StateManager, Styling,
};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// CLI arguments for the build command; unset options are prompted for
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    pub app_name: Option<String>,
    pub framework: Option<Framework>,
    pub routing: Option<Routing>,
    pub styling: Option<Styling>,
    pub state_manager: Option<StateManager>,
    pub linting: Option<Linting>,
    pub package_manager: Option<PackageManager>,
    pub extra_dependencies: Vec<String>,

    /// Directory the finished archive is copied to
    pub output: Option<PathBuf>,

    /// Keep the working directory after the archive is copied out
    pub keep_workdir: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

impl CreateArgs {
    /// Seed every option from an already complete configuration
    pub fn from_config(config: BuildConfig) -> Self {
        Self {
            app_name: Some(config.app_name),
            framework: Some(config.framework),
            routing: Some(config.routing),
            styling: Some(config.styling),
            state_manager: Some(config.state_manager),
            linting: Some(config.linting),
            package_manager: Some(config.package_manager),
            extra_dependencies: config.extra_dependencies,
            ..Self::default()
        }
    }
}

/// Run the CLI with interactive prompts
pub async fn run(args: CreateArgs, settings: ForgeSettings) -> Result<()> {
    cliclack::intro("stackforge")?;

    // Step 1: Collect the configuration
    let config = collect_config(&args)?;

    let builder = ProjectBuilder::new(config, settings);
    let modules: Vec<&str> = builder.modules().iter().map(|m| m.name()).collect();
    if modules.is_empty() {
        cliclack::log::info("No feature modules selected")?;
    } else {
        cliclack::log::info(format!("Feature modules: {}", modules.join(", ")))?;
    }

    // Step 2: Resolve the output directory
    let output_dir = select_output(&args)?;

    // Step 3: Build
    let spinner = cliclack::spinner();
    spinner.start("Generating project...");
    let artifacts = match builder.build().await.into_result() {
        Ok(artifacts) => artifacts,
        Err(error) => {
            spinner.stop("Build failed");
            release_project_dir(builder.project_path()).await;
            anyhow::bail!(error);
        }
    };

    // Step 4: Deliver the archive, then release temporaries
    let destination = output_dir.join(&artifacts.archive_name);
    let delivered = tokio::fs::copy(&artifacts.archive_path, &destination)
        .await
        .with_context(|| format!("Failed to copy archive to {}", destination.display()));

    if !args.keep_workdir {
        release_project_dir(&artifacts.project_path).await;
    }
    release_archive(&artifacts.archive_path).await;

    let bytes = delivered?;
    spinner.stop(format!("Created {} ({} bytes)", destination.display(), bytes));

    if args.keep_workdir {
        cliclack::log::info(format!(
            "Working directory kept at {}",
            artifacts.project_path.display()
        ))?;
    }

    // Step 5: Show next steps
    print_next_steps(builder.config(), &destination)?;

    Ok(())
}

fn collect_config(args: &CreateArgs) -> Result<BuildConfig> {
    let app_name = match &args.app_name {
        Some(name) => {
            cliclack::log::info(format!("Application: {}", name))?;
            name.clone()
        }
        None if args.yes => "my-app".to_string(),
        None => cliclack::input("Application name")
            .placeholder("my-app")
            .default_input("my-app")
            .validate(|input: &String| {
                let probe = BuildConfig::new(input.as_str(), Framework::React);
                probe.validate().map_err(|e| e.to_string())
            })
            .interact()?,
    };

    let framework = select_option(
        "Framework",
        &Framework::ALL
            .iter()
            .map(|f| (*f, f.display_name()))
            .collect::<Vec<_>>(),
        args.framework,
        args.yes,
    )?;

    let routing_choices: Vec<(Routing, &str)> = match framework {
        Framework::React => vec![
            (Routing::None, "None"),
            (Routing::ReactRouter, "React Router"),
        ],
        Framework::Vue => vec![(Routing::None, "None"), (Routing::VueRouter, "Vue Router")],
        Framework::Nextjs => vec![
            (Routing::AppRouter, "App Router"),
            (Routing::PagesRouter, "Pages Router"),
        ],
        Framework::Svelte => vec![(Routing::None, "None")],
    };
    let routing = select_option("Routing", &routing_choices, args.routing, args.yes)?;

    let state_choices: Vec<(StateManager, &str)> = match framework {
        Framework::React => vec![
            (StateManager::None, "None"),
            (StateManager::ReduxToolkit, "Redux Toolkit"),
            (StateManager::Zustand, "Zustand"),
        ],
        Framework::Vue => vec![(StateManager::None, "None"), (StateManager::Pinia, "Pinia")],
        _ => vec![(StateManager::None, "None")],
    };
    let state_manager =
        select_option("State management", &state_choices, args.state_manager, args.yes)?;

    let mut styling_choices = vec![(Styling::None, "Plain CSS"), (Styling::Tailwind, "Tailwind CSS")];
    if matches!(framework, Framework::React | Framework::Vue) {
        styling_choices.push((Styling::CssModules, "CSS Modules"));
    }
    let styling = select_option("Styling", &styling_choices, args.styling, args.yes)?;

    let linting = if framework == Framework::Nextjs {
        select_option(
            "Linting",
            &[
                (Linting::Eslint, "ESLint"),
                (Linting::Biome, "Biome"),
                (Linting::None, "None"),
            ],
            args.linting,
            args.yes,
        )?
    } else {
        args.linting.unwrap_or_default()
    };

    let package_manager = select_option(
        "Package manager",
        &PackageManager::ALL
            .iter()
            .map(|pm| (*pm, pm.as_str()))
            .collect::<Vec<_>>(),
        args.package_manager,
        args.yes,
    )?;

    let config = BuildConfig {
        app_name,
        package_manager,
        framework,
        routing,
        styling,
        state_manager,
        linting,
        extra_dependencies: args.extra_dependencies.clone(),
    };
    config.validate()?;

    Ok(config)
}

/// Use the preset when given, the first choice with `--yes`, otherwise prompt
fn select_option<T>(prompt: &str, choices: &[(T, &str)], preset: Option<T>, yes: bool) -> Result<T>
where
    T: Copy + Eq + 'static,
{
    if let Some(value) = preset {
        return Ok(value);
    }

    let first = choices
        .first()
        .map(|(value, _)| *value)
        .ok_or_else(|| anyhow::anyhow!("No choices available for {}", prompt))?;

    if yes || choices.len() == 1 {
        return Ok(first);
    }

    let mut select = cliclack::select(prompt);
    for (value, label) in choices {
        select = select.item(*value, *label, "");
    }
    Ok(select.interact()?)
}

fn select_output(args: &CreateArgs) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let path = match &args.output {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => current_dir.join(dir),
        None => current_dir,
    };

    std::fs::create_dir_all(&path)
        .with_context(|| format!("Failed to create output directory: {}", path.display()))?;

    Ok(path)
}

fn print_next_steps(config: &BuildConfig, archive: &Path) -> Result<()> {
    let pm = config.package_manager;
    let steps = [
        format!("unzip {}", archive.display()),
        format!("cd {}", config.app_name),
        pm.install_command(),
        pm.run_command("dev"),
    ];

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}
