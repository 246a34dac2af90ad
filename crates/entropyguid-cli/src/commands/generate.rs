use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use entropyguid_core::{GeneratorConfig, Generation, GuidError};

pub struct GenerateCommandConfig<'a> {
    pub algorithm: Option<&'a str>,
    pub source_filter: Option<&'a str>,
    pub config_path: Option<&'a str>,
    pub count: usize,
    pub sleep_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
    pub scan_dir: Option<&'a str>,
    pub json: bool,
    pub verbose: bool,
}

/// Config file (or defaults) with command-line overrides applied.
pub fn resolve_config(cmd: &GenerateCommandConfig<'_>) -> Result<GeneratorConfig, GuidError> {
    let mut config = super::load_config(cmd.config_path)?;

    if let Some(name) = cmd.algorithm {
        config.algorithm = name.parse()?;
    }
    if let Some(filter) = cmd.source_filter {
        config.retain_sources(filter);
        if config.sources.is_empty() {
            return Err(GuidError::Config(format!(
                "no entropy source matches '{filter}'"
            )));
        }
    }
    if let Some(ms) = cmd.sleep_ms {
        config.sleep_ms = ms;
    }
    if cmd.timeout_ms.is_some() {
        config.source_timeout_ms = cmd.timeout_ms;
    }
    if let Some(dir) = cmd.scan_dir {
        config.scan_dir = PathBuf::from(dir);
    }

    config.validate()?;
    Ok(config)
}

pub fn run(cmd: GenerateCommandConfig<'_>) -> ExitCode {
    let stdout = std::io::stdout();
    ExitCode::from(execute(&cmd, &mut stdout.lock()))
}

/// Generate `cmd.count` identifiers into `out` and return the exit status.
pub fn execute(cmd: &GenerateCommandConfig<'_>, out: &mut impl Write) -> u8 {
    let config = match resolve_config(cmd) {
        Ok(c) => c,
        Err(e) => return super::config_error(&e),
    };
    let generator = match config.build() {
        Ok(g) => g,
        Err(e) => return super::config_error(&e),
    };
    log::debug!(
        "generating {} identifier(s) with {} from [{}]",
        cmd.count,
        config.algorithm,
        config.sources.join(", ")
    );

    let mut degraded = false;
    for _ in 0..cmd.count {
        let generation = match generator.generate(config.algorithm) {
            Ok(g) => g,
            Err(e) => return super::config_error(&e),
        };
        degraded |= generation.diagnostics.all_failed;

        if let Err(e) = write_generation(out, &generation, cmd) {
            eprintln!("error: {e}");
            return super::EXIT_FAILURE;
        }
    }

    if degraded {
        eprintln!("error: every entropy source failed; identifiers carry no entropy");
        return super::EXIT_ALL_SOURCES_FAILED;
    }
    0
}

fn write_generation(
    out: &mut impl Write,
    generation: &Generation,
    cmd: &GenerateCommandConfig<'_>,
) -> io::Result<()> {
    if cmd.json {
        serde_json::to_writer(&mut *out, generation)?;
        writeln!(out)
    } else if cmd.verbose {
        write_verbose(out, generation)
    } else {
        writeln!(out, "{}", generation.identifier)
    }
}

fn write_verbose(out: &mut impl Write, generation: &Generation) -> io::Result<()> {
    let diagnostics = &generation.diagnostics;
    writeln!(out, "str = {}", diagnostics.canonical)?;
    writeln!(out, "digest = {}", generation.identifier)?;
    for fragment in &diagnostics.fragments {
        if let Some(reason) = fragment.failure() {
            writeln!(out, "  \u{274C} {:<20} {reason}", fragment.source)?;
        }
    }
    writeln!(
        out,
        "  {}/{} sources ok, sampled in {:.1}ms",
        diagnostics.fragments.len() - diagnostics.failed_sources.len(),
        diagnostics.fragments.len(),
        diagnostics.elapsed.as_secs_f64() * 1000.0
    )
}
