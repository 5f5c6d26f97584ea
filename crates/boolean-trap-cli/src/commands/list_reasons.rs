//! List reasons command implementation.

use boolean_trap_core::Reason;

/// Runs the list-reasons command.
pub fn run() {
    println!("Reported reasons:\n");
    println!("{:<8} {:<30} Description", "Code", "Name");
    println!("{}", "-".repeat(90));

    for reason in Reason::ALL {
        let spec = reason.spec();
        println!("{:<8} {:<30} {}", spec.code, spec.name, spec.description);
    }

    println!("\nSuppress a finding with a trailing comment, e.g.:");
    println!("  used(True)  # noqa: FBT003");
}
