//! Cart Summary

use std::{fmt::Write, io};

use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{ledger::Ledger, pricing::PricingError, storage::CartStore};

/// Errors that can occur when writing a cart summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// Error pricing the cart.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Writes the cart as a table followed by the order totals.
///
/// # Errors
///
/// Returns an error if the cart cannot be priced or the output cannot be written.
pub fn write_summary<S: CartStore>(
    mut out: impl io::Write,
    ledger: &Ledger<S>,
) -> Result<(), SummaryError> {
    if ledger.is_empty() {
        return writeln!(out, "Your cart is empty.").map_err(|_err| SummaryError::IO);
    }

    let mut builder = Builder::default();
    let mut color_ops: Vec<(usize, usize, Color)> = Vec::with_capacity(ledger.len() * 2);

    builder.push_record(["", "Item", "Category", "Unit Price", "Qty", "Line Total", "Savings"]);

    for (idx, item) in ledger.iter().enumerate() {
        let row = idx + 1; // header is row 0
        let savings = item.line_savings()?;
        let discounted = savings.to_minor_units() > 0;

        builder.push_record([
            format!("#{:<3}", idx + 1),
            item.name().to_string(),
            item.category().unwrap_or_default().to_string(),
            format!("{}", item.unit_price()),
            item.quantity().to_string(),
            format!("{}", item.line_total()?),
            if discounted {
                format!("{savings}")
            } else {
                String::new()
            },
        ]);

        color_ops.push((row, 2, color_dark_grey()));

        if discounted {
            color_ops.push((row, 3, Color::FG_GREEN));
        }
    }

    write_table(&mut out, builder, color_ops)?;
    write_totals(&mut out, ledger)
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    color_ops: Vec<(usize, usize, Color)>,
) -> Result<(), SummaryError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(
        1,
        HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
    );

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..7), Alignment::right());

    for (row, col, color) in color_ops {
        table.modify((row, col), color);
    }

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| SummaryError::IO)
}

fn write_totals<S: CartStore>(
    out: &mut impl io::Write,
    ledger: &Ledger<S>,
) -> Result<(), SummaryError> {
    let totals = ledger.compute_totals()?;
    let savings = ledger.savings()?;
    let tax_points = ((ledger.config().policy().tax_rate() * Decimal::ONE) * Decimal::ONE_HUNDRED)
        .round_dp(2)
        .normalize();

    let shipping_val = if totals.is_free_shipping() {
        "FREE  ".to_string()
    } else {
        format!("{}  ", totals.shipping())
    };

    let mut lines = vec![
        (" Subtotal:".to_string(), format!("{}  ", totals.subtotal())),
        (format!(" Tax ({tax_points}%):"), format!("{}  ", totals.tax())),
        (" Shipping:".to_string(), shipping_val),
        (
            " \x1b[1mTotal:\x1b[0m".to_string(),
            format!("\x1b[1m{}  \x1b[0m", totals.total()),
        ),
    ];

    if savings.to_minor_units() > 0 {
        lines.push((" Savings:".to_string(), format!("{savings}  ")));
    }

    let label_width = lines
        .iter()
        .map(|(label, _)| visible_width(label))
        .max()
        .unwrap_or_default();

    let value_width = lines
        .iter()
        .map(|(_, value)| visible_width(value))
        .max()
        .unwrap_or_default();

    for (label, value) in &lines {
        write_summary_line(out, label, value, label_width, value_width)?;
    }

    if let Some(remaining) = totals.amount_until_free_shipping() {
        writeln!(out, "\n Add {remaining} more for free shipping!")
            .map_err(|_err| SummaryError::IO)?;
    }

    writeln!(out).map_err(|_err| SummaryError::IO)
}

/// Wraps runs of box-drawing characters in dark grey.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Returns the visible (non-ANSI) width of a string.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

/// Writes a summary line with a right-aligned label and a fixed-width value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), SummaryError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));
    let value_pad = value_col_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )
    .map_err(|_err| SummaryError::IO)
}

/// ANSI dark grey foreground.
fn color_dark_grey() -> Color {
    Color::new("\x1b[90m", "\x1b[0m")
}
