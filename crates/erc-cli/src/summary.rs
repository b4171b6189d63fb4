use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use polars::prelude::DataFrame;

use erc_model::DataSource;
use erc_storage::destination_table;
use erc_transform::TransformerRegistry;
use erc_transform::frame_utils::{any_to_string, column_names};

use erc_cli::pipeline::TransformPreview;

pub fn print_sources(registry: &TransformerRegistry) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Description"),
        header_cell("Destination"),
        header_cell("Required columns"),
        header_cell("Unique key"),
    ]);
    apply_table_style(&mut table);
    for source in registry.sources() {
        let Some(transformer) = registry.get(source) else {
            continue;
        };
        let required: Vec<&str> = transformer
            .descriptor()
            .required_columns
            .iter()
            .map(String::as_str)
            .collect();
        let key = destination_table(transformer.destination_table())
            .map_or_else(|| dim_cell("-"), |table| Cell::new(table.key.join(", ")));
        table.add_row(vec![
            source_cell(source),
            Cell::new(source.description()),
            Cell::new(transformer.destination_table()),
            Cell::new(required.join(", ")),
            key,
        ]);
    }
    println!("{table}");
}

pub fn print_preview(preview: &TransformPreview, limit: usize) {
    println!(
        "Source: {}  Destination: {}  Rows: {} (dry run, nothing written)",
        preview.source,
        preview.destination_table,
        preview.table.height()
    );
    println!("{}", preview_table(&preview.table, limit));
}

fn preview_table(df: &DataFrame, limit: usize) -> Table {
    let mut table = Table::new();
    table.set_header(
        column_names(df)
            .iter()
            .map(|name| header_cell(name))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    let shown = df.height().min(limit);
    for idx in 0..shown {
        let row: Vec<Cell> = df
            .get_columns()
            .iter()
            .map(|column| {
                let value = column.get(idx).map(any_to_string).unwrap_or_default();
                Cell::new(value)
            })
            .collect();
        table.add_row(row);
    }
    if df.height() > shown {
        let mut more = vec![dim_cell(format!("… {} more", df.height() - shown))];
        more.extend((1..df.width()).map(|_| dim_cell("")));
        table.add_row(more);
    }
    for column in table.column_iter_mut() {
        column.set_cell_alignment(CellAlignment::Left);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn source_cell(source: DataSource) -> Cell {
    Cell::new(source.as_str()).add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).add_attribute(Attribute::Dim)
}
