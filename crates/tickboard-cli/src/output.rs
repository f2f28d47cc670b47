//! Terminal rendering for view models.

use tickboard_core::view::{ChartSpec, SectionBody, TableSpec, ViewModel};

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(view: &ViewModel, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => render_json(view, pretty),
        OutputFormat::Text => {
            render_text(view);
            Ok(())
        }
    }
}

fn render_json(view: &ViewModel, pretty: bool) -> Result<(), CliError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(view)?
    } else {
        serde_json::to_string(view)?
    };
    println!("{rendered}");
    Ok(())
}

fn render_text(view: &ViewModel) {
    println!("{}", view.title);
    println!("generated at {}", view.generated_at);

    for section in &view.sections {
        println!();
        println!("## {}", section.heading);

        match &section.body {
            SectionBody::Metrics { metrics } => {
                let width = metrics
                    .iter()
                    .map(|metric| metric.label.len())
                    .max()
                    .unwrap_or(0);
                for metric in metrics {
                    println!("  {:width$}  {}", metric.label, metric.value);
                }
            }
            SectionBody::Table { table } => render_table(table),
            SectionBody::Chart { chart } => render_chart(chart),
            SectionBody::Headlines { items } => {
                for item in items {
                    if item.link.is_empty() {
                        println!("  - {}", item.title);
                    } else {
                        println!("  - {} ({})", item.title, item.link);
                    }
                }
            }
            SectionBody::Error { message } => println!("  error: {message}"),
            SectionBody::Unavailable { reason } => println!("  unavailable: {reason}"),
        }
    }
}

fn render_table(table: &TableSpec) {
    let mut widths: Vec<usize> = table.columns.iter().map(String::len).collect();
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let format_row = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:width$}"))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("  {}", format_row(&table.columns));
    for row in &table.rows {
        println!("  {}", format_row(row));
    }
}

/// Charts collapse to their latest observations in text mode; the full
/// point set is only meaningful in JSON output.
fn render_chart(chart: &ChartSpec) {
    println!("  {}", chart.title);

    if let Some(candles) = &chart.candles {
        let count = candles.points.len();
        match candles.points.last() {
            Some(last) => println!(
                "  {}: {count} candles, last {} o={:.2} h={:.2} l={:.2} c={:.2}",
                candles.name, last.x, last.open, last.high, last.low, last.close
            ),
            None => println!("  {}: no candles", candles.name),
        }
    }

    for line in &chart.lines {
        let last = line
            .points
            .iter()
            .rev()
            .find_map(|point| point.y.map(|y| (point.x.as_str(), y)));
        match last {
            Some((x, y)) => println!(
                "  {}: {} points, last {x} = {y:.2}",
                line.name,
                line.points.len()
            ),
            None => println!("  {}: no observations", line.name),
        }
    }
}
