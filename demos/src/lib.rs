//! qroute Demo Suite
//!
//! Circuit generators and console helpers for the `route-demo` binary:
//!
//! - **GHZ**: a CNOT ladder from qubit 0, mostly nearest-neighbour already
//! - **QFT**: controlled phases between every pair of qubits
//! - **Random**: seeded mix of single- and two-qubit gates

pub mod circuits;
pub mod report;

use console::style;

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}
