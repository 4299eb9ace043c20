//! Foley CLI - procedural soundscape generation and scene simulation.
//!
//! This binary provides commands for generating cached clips from text
//! prompts, inspecting the content cache, and driving scenes on a fixed
//! tick against a console backend.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use foley_scene::{
    ChannelHandle, Orchestrator, PlaybackBackend, SceneTable, SoundCache, SoundRequest,
};
use foley_synth::{classify, Category};

/// Foley - Procedural Tabletop Soundscapes
#[derive(Parser)]
#[command(name = "foley")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Cache directory for generated clips
    #[arg(long, default_value = "./sound_cache", global = true)]
    cache_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate (or fetch from cache) a clip for a text prompt
    Generate {
        /// Free-text description of the sound
        #[arg(short, long)]
        prompt: String,

        /// Clip length in seconds
        #[arg(short, long, default_value_t = 3.0)]
        duration: f64,

        /// Pin the category instead of classifying the prompt
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Show which category a prompt resolves to
    Classify {
        /// Free-text description of the sound
        #[arg(short, long)]
        prompt: String,
    },

    /// Cache management
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// List the scenes in a scene table
    Scenes {
        /// Path to the scene table JSON
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Drive a scene on a fixed tick against a console backend
    Simulate {
        /// Path to the scene table JSON
        #[arg(short, long)]
        file: PathBuf,

        /// Scene to play
        #[arg(short, long)]
        scene: String,

        /// How long to run, in seconds
        #[arg(long, default_value_t = 10.0)]
        seconds: f64,

        /// Tick interval in milliseconds
        #[arg(long, default_value_t = 50)]
        tick_ms: u64,

        /// Seed for one-shot triggering
        #[arg(long, default_value_t = 42)]
        seed: u32,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Show cache information
    Info,
    /// Clear all cached clips
    Clear,
}

/// Backend that narrates playback to the terminal.
#[derive(Debug, Default)]
struct ConsoleBackend {
    next_channel: u32,
}

impl PlaybackBackend for ConsoleBackend {
    fn play(&mut self, path: &Path, looped: bool, volume: f64) -> Option<ChannelHandle> {
        let channel = ChannelHandle(self.next_channel);
        self.next_channel = self.next_channel.wrapping_add(1);

        let kind = if looped { "bed " } else { "shot" };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        println!(
            "  {} ch{:<2} vol {:.2}  {}",
            kind.green(),
            channel.0,
            volume,
            name.dimmed()
        );
        Some(channel)
    }

    fn stop_all(&mut self) {
        println!("  {}", "stop all channels".yellow());
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", "ERROR".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Generate {
            prompt,
            duration,
            category,
        } => generate(&cli.cache_dir, &prompt, duration, category.as_deref()),
        Commands::Classify { prompt } => {
            println!(
                "{} {}",
                "Category:".cyan().bold(),
                classify(&prompt).to_string().bold()
            );
            Ok(ExitCode::SUCCESS)
        }
        Commands::Cache { action } => match action {
            CacheAction::Info => cache_info(&cli.cache_dir),
            CacheAction::Clear => cache_clear(&cli.cache_dir),
        },
        Commands::Scenes { file } => list_scenes(&file),
        Commands::Simulate {
            file,
            scene,
            seconds,
            tick_ms,
            seed,
        } => simulate(&cli.cache_dir, &file, &scene, seconds, tick_ms, seed),
    }
}

fn parse_category(name: &str) -> Result<Category> {
    Category::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = Category::ALL.iter().map(|c| c.name()).collect();
        anyhow!("unknown category '{name}' (known: {})", known.join(", "))
    })
}

fn generate(
    cache_dir: &Path,
    prompt: &str,
    duration: f64,
    category: Option<&str>,
) -> Result<ExitCode> {
    let cache = SoundCache::new(cache_dir).context("failed to open cache directory")?;

    let mut request = SoundRequest::new(prompt, duration);
    if let Some(name) = category {
        request = request.with_category(parse_category(name)?);
    }
    let resolved = request.category.unwrap_or_else(|| classify(prompt));

    println!(
        "{} '{}' as {} ({duration:.1}s)",
        "Generating".cyan().bold(),
        prompt,
        resolved.to_string().bold()
    );

    let path = cache
        .get_or_create(&request)
        .context("failed to generate clip")?;

    println!("  {} {}", "SUCCESS".green().bold(), path.display());
    Ok(ExitCode::SUCCESS)
}

fn cache_info(cache_dir: &Path) -> Result<ExitCode> {
    let cache = SoundCache::new(cache_dir).context("failed to open cache directory")?;

    println!("{}", "Cache Information".cyan().bold());

    let info = cache.info()?;
    println!("  {}: {}", "Cache directory".dimmed(), info.dir.display());
    println!("  {}: {}", "Entry count".dimmed(), info.entry_count);

    let size_mb = info.total_size_bytes as f64 / (1024.0 * 1024.0);
    if size_mb >= 1.0 {
        println!("  {}: {:.2} MB", "Total size".dimmed(), size_mb);
    } else {
        let size_kb = info.total_size_bytes as f64 / 1024.0;
        println!("  {}: {:.2} KB", "Total size".dimmed(), size_kb);
    }

    Ok(ExitCode::SUCCESS)
}

fn cache_clear(cache_dir: &Path) -> Result<ExitCode> {
    let cache = SoundCache::new(cache_dir).context("failed to open cache directory")?;

    println!("{}", "Clearing sound cache...".cyan().bold());

    let count = cache.clear()?;
    if count == 0 {
        println!("  {}", "Cache is already empty".dimmed());
    } else {
        println!(
            "  {} Removed {} cached {}",
            "SUCCESS".green().bold(),
            count,
            if count == 1 { "clip" } else { "clips" }
        );
    }

    Ok(ExitCode::SUCCESS)
}

fn list_scenes(file: &Path) -> Result<ExitCode> {
    let table = SceneTable::from_path(file)
        .with_context(|| format!("failed to load scene table {}", file.display()))?;

    println!(
        "{} ({} scenes)",
        "Scene Table".cyan().bold(),
        table.len()
    );

    for (name, spec) in table.iter() {
        let bed = match &spec.bed {
            Some(bed) => match (&bed.file, &bed.prompt) {
                (Some(file), _) => format!("file {}", file.display()),
                (None, Some(prompt)) => format!("prompt '{prompt}'"),
                (None, None) => "unresolvable".to_string(),
            },
            None => "missing".red().to_string(),
        };

        println!("  {} - bed: {bed}", name.bold());
        if !spec.oneshots.is_empty() {
            println!("    {} one-shot rule(s)", spec.oneshots.len());
        }
        if !spec.keywords.is_empty() {
            println!("    keywords: {}", spec.keywords.join(", ").dimmed());
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn simulate(
    cache_dir: &Path,
    file: &Path,
    scene: &str,
    seconds: f64,
    tick_ms: u64,
    seed: u32,
) -> Result<ExitCode> {
    let cache = SoundCache::new(cache_dir).context("failed to open cache directory")?;
    let table = SceneTable::from_path(file)
        .with_context(|| format!("failed to load scene table {}", file.display()))?;

    let mut orchestrator = Orchestrator::new(ConsoleBackend::default(), cache, table, seed);

    println!(
        "{} '{}' for {seconds:.1}s at {tick_ms}ms ticks",
        "Simulating".cyan().bold(),
        scene
    );

    orchestrator
        .play_scene(scene)
        .context("failed to start scene")?;

    let tick = Duration::from_millis(tick_ms);
    let end = Instant::now() + Duration::from_secs_f64(seconds);
    while Instant::now() < end {
        std::thread::sleep(tick);
        orchestrator.update(Instant::now());
    }

    orchestrator.stop_scene();
    println!("  {}", "done".green().bold());
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from([
            "foley",
            "generate",
            "--prompt",
            "crackling fire",
            "--duration",
            "2.5",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                prompt,
                duration,
                category,
            } => {
                assert_eq!(prompt, "crackling fire");
                assert_eq!(duration, 2.5);
                assert!(category.is_none());
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_cli_parses_simulate_with_defaults() {
        let cli = Cli::try_parse_from([
            "foley",
            "simulate",
            "--file",
            "scenes.json",
            "--scene",
            "tavern",
        ])
        .unwrap();
        match cli.command {
            Commands::Simulate {
                file,
                scene,
                seconds,
                tick_ms,
                seed,
            } => {
                assert_eq!(file, PathBuf::from("scenes.json"));
                assert_eq!(scene, "tavern");
                assert_eq!(seconds, 10.0);
                assert_eq!(tick_ms, 50);
                assert_eq!(seed, 42);
            }
            _ => panic!("expected simulate command"),
        }
    }

    #[test]
    fn test_cli_global_cache_dir() {
        let cli = Cli::try_parse_from([
            "foley",
            "cache",
            "info",
            "--cache-dir",
            "/tmp/clips",
        ])
        .unwrap();
        assert_eq!(cli.cache_dir, PathBuf::from("/tmp/clips"));
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category("fire").unwrap(), Category::Fire);
        assert!(parse_category("volcano").is_err());
    }
}
