//! The types command: read-only queries against the type registry.
//!
//! Lookups that find nothing are not errors; they render a short notice
//! and exit with code 1.

use super::{convert::convert_dialect, types::CommandResult};
use crate::{
    cli::TypesCommand,
    datatype::{DataTypeDescriptor, DataTypeRegistry}
};

fn join<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    let joined = items.into_iter().collect::<Vec<_>>().join(", ");
    if joined.is_empty() { "-".to_string() } else { joined }
}

fn describe(descriptor: &DataTypeDescriptor) -> String {
    let mut out = format!("{} ({})\n", descriptor.canonical_name, descriptor.category);
    out.push_str(&format!(
        "  aliases:     {}\n",
        join(descriptor.aliases.iter().map(|a| a.as_str()))
    ));
    out.push_str(&format!(
        "  dialects:    {}\n",
        join(descriptor.supported_dialects.iter().map(|d| d.as_str()))
    ));
    for (dialect, target) in &descriptor.conversion_rules {
        out.push_str(&format!("  convert:     {} -> {}\n", dialect, target));
    }
    let mut arguments = Vec::new();
    if descriptor.accepts_size {
        arguments.push("size");
    }
    if descriptor.accepts_precision {
        arguments.push("precision, scale");
    }
    out.push_str(&format!("  arguments:   {}\n", join(arguments)));
    out
}

fn row(descriptor: &DataTypeDescriptor) -> String {
    format!(
        "{:<18} {:<10} {}\n",
        descriptor.canonical_name.as_str(),
        descriptor.category.as_str(),
        join(descriptor.supported_dialects.iter().map(|d| d.as_str()))
    )
}

/// Run one `types` subcommand against `registry`
pub fn run_types(command: TypesCommand, registry: &DataTypeRegistry) -> CommandResult {
    match command {
        TypesCommand::Resolve {
            name
        } => match registry.resolve(&name) {
            Some(descriptor) => CommandResult::new(0, describe(descriptor)),
            None => CommandResult::new(1, format!("Unknown type '{}'\n", name))
        },
        TypesCommand::List {
            category,
            dialect
        } => {
            let dialect = dialect.map(|d| convert_dialect(d).as_str());
            let listed: String = registry
                .iter()
                .filter(|d| category.is_none_or(|c| d.category == c))
                .filter(|d| dialect.is_none_or(|dl| d.supports(dl)))
                .map(row)
                .collect();
            if listed.is_empty() {
                CommandResult::new(1, "No types match\n")
            } else {
                CommandResult::new(0, listed)
            }
        }
        TypesCommand::Compatible {
            type_name,
            dialect
        } => {
            let dialect = convert_dialect(dialect).as_str();
            let found = registry.find_compatible(&type_name, dialect);
            if found.is_empty() {
                CommandResult::new(
                    1,
                    format!("No {} type can hold '{}'\n", dialect, type_name)
                )
            } else {
                CommandResult::new(0, found.into_iter().map(row).collect::<String>())
            }
        }
        TypesCommand::Infer {
            values,
            dialect
        } => {
            let dialect = dialect.map(|d| convert_dialect(d).as_str());
            let suggestions = registry.suggest_from_samples(&values, dialect);
            if suggestions.is_empty() {
                return CommandResult::new(1, "No type fits the samples\n");
            }
            let out = suggestions
                .iter()
                .map(|s| {
                    format!(
                        "{:<18} {:.2}\n",
                        s.descriptor.canonical_name.as_str(),
                        s.confidence
                    )
                })
                .collect::<String>();
            CommandResult::new(0, out)
        }
        TypesCommand::Path {
            source,
            target
        } => match registry.conversion_path(&source, &target) {
            Some(path) => CommandResult::new(0, format!("{}\n", path.join(" -> "))),
            None => CommandResult::new(
                1,
                format!("No conversion path from '{}' to '{}'\n", source, target)
            )
        }
    }
}
