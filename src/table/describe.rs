//! Descriptive statistics rendered as an aligned text table.

use std::collections::HashMap;

use super::{is_missing, mean, Table};

const NUMERIC_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];
const CATEGORICAL_LABELS: [&str; 4] = ["count", "unique", "top", "freq"];

/// Summarize every numeric column (count, mean, std, min, quartiles, max).
///
/// Tables without any numeric column fall back to count/unique/top/freq over
/// all columns.
pub fn describe(table: &Table) -> String {
    let numeric: Vec<(String, Vec<f64>)> = (0..table.headers.len())
        .filter_map(|idx| {
            table
                .numeric_at(idx)
                .map(|values| (table.headers[idx].clone(), values))
        })
        .collect();

    if numeric.is_empty() {
        let columns = (0..table.headers.len())
            .map(|idx| {
                let cells: Vec<&str> = table
                    .cells(idx)
                    .map(str::trim)
                    .filter(|c| !is_missing(c))
                    .collect();
                (table.headers[idx].clone(), categorical_stats(&cells))
            })
            .collect::<Vec<_>>();
        return render(&CATEGORICAL_LABELS, &columns);
    }

    let columns = numeric
        .into_iter()
        .map(|(name, values)| (name, numeric_stats(values)))
        .collect::<Vec<_>>();
    render(&NUMERIC_LABELS, &columns)
}

fn numeric_stats(mut values: Vec<f64>) -> Vec<String> {
    values.sort_by(f64::total_cmp);
    let n = values.len();
    let avg = mean(&values);
    let std = if n < 2 {
        f64::NAN
    } else {
        let var = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (n - 1) as f64;
        var.sqrt()
    };

    [
        n as f64,
        avg,
        std,
        values[0],
        quantile(&values, 0.25),
        quantile(&values, 0.5),
        quantile(&values, 0.75),
        values[n - 1],
    ]
    .into_iter()
    .map(format_stat)
    .collect()
}

/// Linear interpolation between closest ranks; `sorted` must be non-empty.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

fn format_stat(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.6}")
    }
}

fn categorical_stats(cells: &[&str]) -> Vec<String> {
    if cells.is_empty() {
        return vec!["0".into(), "0".into(), "NaN".into(), "NaN".into()];
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for &cell in cells {
        *counts.entry(cell).or_default() += 1;
    }
    // Ties go to the value seen first.
    let mut top = cells[0];
    for &cell in cells {
        if counts[cell] > counts[top] {
            top = cell;
        }
    }

    vec![
        cells.len().to_string(),
        counts.len().to_string(),
        top.to_string(),
        counts[top].to_string(),
    ]
}

fn render(labels: &[&str], columns: &[(String, Vec<String>)]) -> String {
    let label_width = labels.iter().map(|l| l.len()).max().unwrap_or(0);
    let widths: Vec<usize> = columns
        .iter()
        .map(|(name, cells)| {
            cells
                .iter()
                .map(|c| c.chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = " ".repeat(label_width);
    for ((name, _), &width) in columns.iter().zip(&widths) {
        out.push_str(&format!("  {name:>width$}"));
    }

    for (row, label) in labels.iter().enumerate() {
        out.push('\n');
        out.push_str(&format!("{label:<label_width$}"));
        for ((_, cells), &width) in columns.iter().zip(&widths) {
            out.push_str(&format!("  {:>width$}", cells[row]));
        }
    }
    out
}
