//! Output formatters for compiled schemas.

use crate::error::CliError;
use clap::ValueEnum;
use comfy_table::Table;
use modelkit_core::{CompiledSchema, Property};

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table, one row per property
    Table,
    /// Runtime descriptor as JSON
    Json,
    /// Entity and relationship counts
    Summary,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Summary => write!(f, "summary"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter {
    /// Format a compiled schema.
    fn format_schema(&self, schema: &CompiledSchema) -> Result<String, CliError>;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Summary => Box::new(SummaryFormatter),
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_schema(&self, schema: &CompiledSchema) -> Result<String, CliError> {
        if schema.is_empty() {
            return Ok("No entities".to_string());
        }

        let mut table = Table::new();
        table.set_header(vec!["Entity", "Property", "Kind", "Type", "Min", "Max", "Details"]);

        for entity in schema.entities() {
            let entity_label = if entity.is_abstract() {
                format!("{} (abstract)", entity.name())
            } else {
                entity.name().to_string()
            };

            if entity.properties().next().is_none() {
                table.add_row(vec![entity_label.as_str(), "", "", "", "", "", ""]);
                continue;
            }

            for property in entity.properties() {
                let row = match property {
                    Property::Attribute(a) => vec![
                        entity_label.clone(),
                        a.name().to_string(),
                        "attribute".to_string(),
                        a.scalar_type().to_string(),
                        min_label(a.is_optional()),
                        "1".to_string(),
                        a.default_value()
                            .map(|v| format!("default {:?}", v))
                            .unwrap_or_default(),
                    ],
                    Property::Relationship(r) => {
                        let max = match r.max_count() {
                            0 => "*".to_string(),
                            n => n.to_string(),
                        };
                        let mut details = format!("delete: {}", r.delete_rule());
                        if let Some(inverse) = schema.inverse_of(r) {
                            details.push_str(&format!(", inverse: {}", inverse.name()));
                        }
                        vec![
                            entity_label.clone(),
                            r.name().to_string(),
                            "relationship".to_string(),
                            schema.destination_of(r).name().to_string(),
                            r.min_count().to_string(),
                            max,
                            details,
                        ]
                    }
                };
                table.add_row(row);
            }
        }

        Ok(table.to_string())
    }
}

fn min_label(is_optional: bool) -> String {
    let label = if is_optional { "0" } else { "1" };
    label.to_string()
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_schema(&self, schema: &CompiledSchema) -> Result<String, CliError> {
        Ok(schema.descriptor().to_json()?)
    }
}

/// One-line-per-entity summary.
pub struct SummaryFormatter;

impl Formatter for SummaryFormatter {
    fn format_schema(&self, schema: &CompiledSchema) -> Result<String, CliError> {
        let mut output = format!(
            "{} entities, {} relationships\n",
            schema.len(),
            schema.relationship_count()
        );
        for entity in schema.entities() {
            output.push_str(&format!(
                "  {} ({}): {} attributes, {} relationships\n",
                entity.name(),
                entity.effective_bound_type_name(),
                entity.attributes().len(),
                entity.relationships().len()
            ));
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelkit_core::{AttributeSpec, EntitySpec, RelationshipSpec, ScalarType, SchemaCompiler};

    fn sample_schema() -> CompiledSchema {
        let list = EntitySpec::builder("ShoppingList")
            .attribute(AttributeSpec::new("title", ScalarType::String).required())
            .relationship(
                RelationshipSpec::to_many("items", "ShoppingListItem").with_inverse("shoppingList"),
            )
            .build()
            .unwrap();
        let item = EntitySpec::builder("ShoppingListItem")
            .relationship(RelationshipSpec::to_one("shoppingList", "ShoppingList"))
            .build()
            .unwrap();
        let base = EntitySpec::builder("Base").abstract_entity().build().unwrap();

        SchemaCompiler::new().compile(vec![list, item, base]).unwrap()
    }

    #[test]
    fn test_table_formatter() {
        let output = TableFormatter.format_schema(&sample_schema()).unwrap();

        assert!(output.contains("ShoppingListItem"));
        assert!(output.contains("relationship"));
        assert!(output.contains("inverse: shoppingList"));
        assert!(output.contains("Base (abstract)"));
    }

    #[test]
    fn test_table_formatter_empty() {
        let schema = SchemaCompiler::new().compile(Vec::new()).unwrap();
        assert_eq!(TableFormatter.format_schema(&schema).unwrap(), "No entities");
    }

    #[test]
    fn test_json_formatter() {
        let output = JsonFormatter.format_schema(&sample_schema()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["entities"].as_array().unwrap().len(), 3);
        assert_eq!(value["entities"][0]["name"], "ShoppingList");
    }

    #[test]
    fn test_summary_formatter() {
        let output = SummaryFormatter.format_schema(&sample_schema()).unwrap();

        assert!(output.starts_with("3 entities, 2 relationships"));
        assert!(output.contains("ShoppingList (ManagedObject): 1 attributes, 1 relationships"));
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Summary.to_string(), "summary");
        assert!(matches!(
            OutputFormat::from_str("json", true),
            Ok(OutputFormat::Json)
        ));
    }
}
