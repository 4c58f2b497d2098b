use crate::OutputFormat;
use declscope::batch::{default_jobs, extract_batch};
use declscope::config::{default_config_path, load_config, write_config, DeclscopeConfig};
use declscope::ui::{self, theme};
use declscope::{Driver, ExtractOptions, Extracted, File, LanguageType, SourceInput};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

pub struct ExtractArgs {
    pub paths: Vec<PathBuf>,
    pub language: Option<String>,
    pub format: OutputFormat,
    pub jobs: Option<usize>,
    pub dump_nodes: bool,
    pub config: Option<PathBuf>,
}

pub fn run_extract(args: ExtractArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?.unwrap_or_default();

    let language = match args.language.or(config.language.clone()) {
        Some(tag) => Some(tag.parse::<LanguageType>()?),
        None => None,
    };
    let jobs = args.jobs.or(config.jobs).unwrap_or_else(default_jobs);
    let dump_nodes = args.dump_nodes || config.dump_nodes.unwrap_or(false);

    let driver = Driver::new().with_options(ExtractOptions { dump_nodes });
    let files = discover(&driver, &args.paths, &config.exclude, language);
    if files.is_empty() {
        anyhow::bail!("no supported source files found");
    }
    tracing::info!("extracting {} file(s)", files.len());

    let mut failures = 0usize;
    let mut inputs = Vec::with_capacity(files.len());
    for path in &files {
        match SourceInput::read(path) {
            Ok(input) => inputs.push(input),
            Err(e) => {
                ui::error(&format!("{}: {}", path.display(), e));
                failures += 1;
            }
        }
    }

    let mut extracted: Vec<Extracted> = Vec::with_capacity(inputs.len());
    for outcome in extract_batch(&driver, &inputs, language, jobs) {
        match outcome.result {
            Ok(result) => extracted.push(result),
            Err(e) => {
                ui::error(&e.to_string());
                failures += 1;
            }
        }
    }

    match args.format {
        OutputFormat::Text => print_text(&extracted),
        OutputFormat::Json => {
            let files: Vec<&File> = extracted.iter().map(|e| &e.file).collect();
            println!("{}", serde_json::to_string_pretty(&files)?);
        }
    }

    if failures > 0 {
        anyhow::bail!("{} file(s) failed", failures);
    }
    Ok(())
}

pub fn run_languages() -> anyhow::Result<()> {
    ui::header("Supported languages");
    println!("{}", ui::languages_table());
    Ok(())
}

pub fn run_init(force: bool) -> anyhow::Result<()> {
    let path = default_config_path();
    write_config(&path, &DeclscopeConfig::default(), force)?;
    println!("wrote {}", path.display());
    Ok(())
}

/// Expand directory arguments into source files, keeping explicit files as given.
///
/// A forced language narrows directory walks to that language's extensions;
/// it never turns unrelated files into sources.
fn discover(
    driver: &Driver,
    paths: &[PathBuf],
    excludes: &[String],
    language: Option<LanguageType>,
) -> Vec<PathBuf> {
    let accept = |path: &Path| match language {
        Some(lang) => driver
            .registry()
            .for_language(lang)
            .is_some_and(|adapter| adapter.can_handle(path)),
        None => driver.registry().find_adapter(path).is_some(),
    };

    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(declscope::ignore::collect_files(path, excludes, accept));
        } else {
            files.push(path.clone());
        }
    }
    files
}

fn print_text(extracted: &[Extracted]) {
    let t = theme();
    for result in extracted {
        let file = &result.file;
        ui::header(&format!("{} ({})", file.path, file.language.display_name()));

        let constructors = file.functions().iter().filter(|f| f.is_constructor).count();
        println!(
            "{} classes, {} functions, {} constructors  {}",
            file.classes().len().style(t.class.clone()),
            file.functions().len().style(t.function.clone()),
            constructors.style(t.constructor.clone()),
            ui::muted(file.id.as_str()),
        );

        let table = ui::declarations_table(file);
        if !table.is_empty() {
            println!("{}", table);
        }
        for malformed in &result.malformed {
            ui::warn(&format!("{}: {}", file.path, malformed));
        }
        println!();
    }
}
