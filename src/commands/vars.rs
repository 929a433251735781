//! Implementation of the `promptvault vars` command.

use crate::cli::VarsArgs;
use crate::error::Result;
use crate::template::{Variable, VariableKind, get_valid_variables};

/// Print the variable registry, one variable per line, sorted by name.
pub fn cmd_vars(args: VarsArgs) -> Result<()> {
    for line in registry_lines(args.enums) {
        println!("{}", line);
    }
    Ok(())
}

fn registry_lines(with_enums: bool) -> Vec<String> {
    let names = get_valid_variables();
    let width = names.iter().map(|n| n.len()).max().unwrap_or(0);

    names
        .into_iter()
        .filter_map(Variable::from_name)
        .map(|var| {
            let kind = var.kind();
            let mut line = format!("{:<width$}  {}", var.name(), kind.label(), width = width);
            if with_enums && let VariableKind::Enum(members) = kind {
                line.push_str(&format!(" ({})", members.join(" | ")));
            }
            line
        })
        .collect()
}
