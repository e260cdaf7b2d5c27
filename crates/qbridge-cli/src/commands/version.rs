//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - OpenQASM conversion and device lookup",
        style("qbridge").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qbridge-qasm3  OpenQASM conversion, compaction and analysis");
    println!("  qbridge-hal    Vendor device providers");
    println!("  qbridge-cli    Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
