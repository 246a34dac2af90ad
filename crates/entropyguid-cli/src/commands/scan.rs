use std::process::ExitCode;

use entropyguid_core::{EntropySource, SourceSettings, all_sources};

pub fn run() -> ExitCode {
    println!(
        "Platform: {} {} (Rust)",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    println!();

    let sources = all_sources(&SourceSettings::default());
    let available = sources.iter().filter(|s| s.is_available()).count();

    println!(
        "{available}/{} built-in entropy source(s) available, in default order:\n",
        sources.len()
    );
    for src in &sources {
        println!("{}", source_line(src.as_ref()));
    }

    if sources.is_empty() {
        println!("  (none found)");
    }
    ExitCode::SUCCESS
}

/// One row of the scan table: availability, name, category, platform.
fn source_line(src: &dyn EntropySource) -> String {
    let info = src.info();
    let mark = if src.is_available() { "\u{2705}" } else { "\u{274C}" };
    let blocking = if info.blocking { " [blocking]" } else { "" };
    format!(
        "  {mark} {:<18} {:<8} {:<5} {}{blocking}",
        info.name,
        info.category.to_string(),
        info.platform.to_string(),
        info.description
    )
}
