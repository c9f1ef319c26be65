use std::path::PathBuf;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use canon_map::ColumnScore;
use canon_model::{NormalizedData, SchemaDescriptor};
use canon_standards::SchemaRegistry;

/// One normalized input file.
pub struct BatchSummary {
    pub file: PathBuf,
    pub label: String,
    pub output: Option<PathBuf>,
    pub result: NormalizedData,
}

/// One schema column in `canon match` output.
pub struct MatchRow {
    pub schema_column: String,
    pub required: bool,
    pub raw_column: Option<String>,
    pub score: Option<f64>,
    pub explanation: Option<ColumnScore>,
}

pub fn print_summary(batches: &[BatchSummary]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Schema"),
        header_cell("Records"),
        header_cell("Mapped"),
        header_cell("Unmapped"),
        header_cell("Errors"),
        header_cell("Quality"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..=6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let mut total_records = 0usize;
    let mut total_errors = 0usize;
    for batch in batches {
        let metadata = &batch.result.metadata;
        total_records += metadata.total_records;
        total_errors += metadata.validation_error_count;
        let file = batch
            .file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| batch.label.clone());
        table.add_row(vec![
            Cell::new(file),
            schema_cell(&batch.result),
            Cell::new(metadata.total_records),
            Cell::new(metadata.column_mappings.len()),
            count_cell(metadata.unmapped_columns.len(), Color::Yellow),
            count_cell(metadata.validation_error_count, Color::Red),
            quality_cell(metadata.quality_score),
        ]);
    }
    if batches.len() > 1 {
        table.add_row(vec![
            Cell::new("TOTAL")
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
            dim_cell("-"),
            Cell::new(total_records).add_attribute(Attribute::Bold),
            dim_cell("-"),
            dim_cell("-"),
            count_cell(total_errors, Color::Red).add_attribute(Attribute::Bold),
            dim_cell("-"),
        ]);
    }
    println!("{table}");

    for batch in batches {
        if let Some(path) = &batch.output {
            println!("Output: {}", path.display());
        }
    }
    for batch in batches {
        let errors = &batch.result.metadata.validation_errors;
        if errors.is_empty() {
            continue;
        }
        eprintln!();
        eprintln!("{} ({}):", batch.label, batch.result.schema_type);
        for error in errors {
            eprintln!("- {error}");
        }
    }
}

pub fn print_schemas(registry: &SchemaRegistry) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Schema"),
        header_cell("Category"),
        header_cell("Columns"),
        header_cell("Keys"),
        header_cell("Partition"),
        header_cell("Grain"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for schema in registry.iter() {
        let keys: Vec<&str> = schema
            .key_columns()
            .map(|column| column.name.as_str())
            .collect();
        table.add_row(vec![
            Cell::new(&schema.schema_type)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(schema.category),
            Cell::new(schema.columns.len()),
            Cell::new(keys.join(", ")),
            schema
                .partition_by
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(&schema.grain),
        ]);
    }
    println!("{table}");
}

pub fn print_match_table(
    schema: &SchemaDescriptor,
    threshold: f64,
    rows: &[MatchRow],
    unmapped: &[String],
    explain: bool,
) {
    println!("Schema: {} (threshold {threshold:.2})", schema.schema_type);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Raw column"),
        header_cell("Score"),
        header_cell("Rule"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for row in rows {
        let column = if row.required {
            Cell::new(format!("{} *", row.schema_column)).add_attribute(Attribute::Bold)
        } else {
            Cell::new(&row.schema_column)
        };
        let raw = match &row.raw_column {
            Some(raw) => Cell::new(raw).fg(Color::Green),
            None if row.required => Cell::new("unmapped").fg(Color::Red),
            None => dim_cell("-"),
        };
        let score = row
            .score
            .map_or_else(|| dim_cell("-"), |score| Cell::new(format!("{score:.2}")));
        let rule = row
            .explanation
            .as_ref()
            .map_or_else(|| dim_cell("-"), |explained| Cell::new(&explained.rule));
        table.add_row(vec![column, raw, score, rule]);
    }
    println!("{table}");
    if !unmapped.is_empty() {
        println!("Unmapped: {}", unmapped.join(", "));
    }
    if explain {
        for row in rows {
            if let (Some(raw), Some(explained)) = (&row.raw_column, &row.explanation) {
                println!();
                println!("{} <- {raw}", row.schema_column);
                println!("{}", explained.explain());
            }
        }
    }
}

fn schema_cell(result: &NormalizedData) -> Cell {
    if result.is_pass_through() {
        Cell::new(format!("{} (pass-through)", result.schema_type)).fg(Color::DarkGrey)
    } else {
        Cell::new(&result.schema_type)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold)
    }
}

fn quality_cell(quality: f64) -> Cell {
    let color = if quality >= 0.8 {
        Color::Green
    } else if quality >= 0.5 {
        Color::Yellow
    } else {
        Color::Red
    };
    Cell::new(format!("{quality:.2}")).fg(color)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
