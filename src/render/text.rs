use super::{emphasis_runs, Renderer};
use crate::dashboard::{Chart, ChartData, Dashboard, Section, Table};
use std::io::{self, Write};

/// Console rendering: fixed-width tables and a short digest per chart
pub struct TextRenderer;

impl Renderer for TextRenderer {
    fn render(&self, dashboard: &Dashboard, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "=== {} ===", dashboard.title)?;
        writeln!(out, "{}", dashboard.intro)?;

        for section in &dashboard.sections {
            match section {
                Section::Heading(text) => writeln!(out, "\n--- {} ---", text)?,
                Section::Notice(text) => writeln!(out, "{}", text)?,
                Section::Table(table) => write_table(out, table)?,
                Section::Chart(chart) => write_chart(out, chart)?,
                Section::List(items) => {
                    for (i, item) in items.iter().enumerate() {
                        writeln!(out, "{}. {}", i + 1, plain(item))?;
                    }
                }
                Section::Error(text) => writeln!(out, "Error: {}", text)?,
            }
        }
        Ok(())
    }
}

fn plain(text: &str) -> String {
    emphasis_runs(text).into_iter().map(|(run, _)| run).collect()
}

fn write_table(out: &mut dyn Write, table: &Table) -> io::Result<()> {
    if table.headers.is_empty() {
        return writeln!(out, "(empty)");
    }

    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:>w$}", cell, w = w))
            .collect::<Vec<_>>()
            .join("  ")
    };

    writeln!(out, "{}", line(&table.headers))?;
    writeln!(out, "{:-<1$}", "", widths.iter().sum::<usize>() + 2 * (widths.len() - 1))?;
    for row in &table.rows {
        writeln!(out, "{}", line(row))?;
    }
    if table.rows.is_empty() {
        writeln!(out, "(0 rows)")?;
    }
    Ok(())
}

fn write_chart(out: &mut dyn Write, chart: &Chart) -> io::Result<()> {
    let unit = match &chart.data {
        ChartData::Line { .. } | ChartData::Area { .. } | ChartData::Scatter { .. } => "points",
        ChartData::Histogram { .. } => "bins",
        ChartData::Bar { .. } => "bars",
        ChartData::Pie { .. } => "slices",
        ChartData::Box { .. } => "boxes",
        ChartData::Heatmap { .. } => "cells",
    };
    writeln!(
        out,
        "[{}] {} ({} {})",
        chart.data.kind(),
        chart.title,
        chart.data.len(),
        unit
    )?;

    match &chart.data {
        ChartData::Bar {
            categories, values, ..
        }
        | ChartData::Pie {
            labels: categories,
            values,
        } => {
            for (category, value) in categories.iter().zip(values) {
                writeln!(out, "  {:<10} {:>18.2}", category, value)?;
            }
        }
        ChartData::Box { boxes, .. } => {
            for b in boxes {
                writeln!(
                    out,
                    "  {:<10} q1 {:.2}  median {:.2}  q3 {:.2}",
                    b.label, b.q1, b.median, b.q3
                )?;
            }
        }
        ChartData::Heatmap { labels, z } => {
            let width = labels.iter().map(|l| l.len()).max().unwrap_or(0).max(6);
            write!(out, "  {:<1$}", "", width)?;
            for label in labels {
                write!(out, " {:>1$}", label, width)?;
            }
            writeln!(out)?;
            for (label, row) in labels.iter().zip(z) {
                write!(out, "  {:<1$}", label, width)?;
                for value in row {
                    write!(out, " {:>1$.2}", value, width)?;
                }
                writeln!(out)?;
            }
        }
        _ => {}
    }
    Ok(())
}
