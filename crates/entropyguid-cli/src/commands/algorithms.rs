use std::process::ExitCode;

use entropyguid_core::DigestAlgorithm;

pub fn run() -> ExitCode {
    println!("  {:<12} {:>6} {:>10}", "Algorithm", "Bytes", "Hex chars");
    println!("  {}", "-".repeat(30));
    for algorithm in DigestAlgorithm::ALL {
        let default = if algorithm == DigestAlgorithm::default() {
            " (default)"
        } else {
            ""
        };
        println!(
            "  {:<12} {:>6} {:>10}{default}",
            algorithm.as_str(),
            algorithm.output_size(),
            algorithm.output_size() * 2
        );
    }
    ExitCode::SUCCESS
}
