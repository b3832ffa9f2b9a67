use rust_decimal::{Decimal, RoundingStrategy};

use crate::invoice::model::InvoiceRecord;

/// Round to cents (half away from zero) and print exactly two decimals.
pub fn format_money(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

/// Sales and profit summed over line items, never over invoice-level totals.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub sales: Decimal,
    pub profit: Decimal,
}

impl Totals {
    pub fn of(invoices: &[InvoiceRecord]) -> Self {
        invoices
            .iter()
            .flat_map(|invoice| &invoice.line_items)
            .fold(Totals::default(), |acc, item| Totals {
                sales: acc.sales.saturating_add(item.item_total),
                profit: acc.profit.saturating_add(item.item_profit),
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceBlock {
    pub customer: String,
    pub lines: Vec<String>,
    pub footer: String,
}

/// Text of the whole view, rebuilt from scratch on every render
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedView {
    pub blocks: Vec<InvoiceBlock>,
    pub totals: Totals,
    pub total_line: String,
}

pub fn render_invoices(invoices: &[InvoiceRecord], currency: &str) -> RenderedView {
    let blocks = invoices
        .iter()
        .map(|invoice| InvoiceBlock {
            customer: invoice.customer_name.clone(),
            lines: invoice
                .line_items
                .iter()
                .map(|item| {
                    format!(
                        "{} x {}pcs = {currency}{} ({})",
                        item.name,
                        item.quantity.normalize(),
                        format_money(item.item_total),
                        format_money(item.item_profit)
                    )
                })
                .collect(),
            footer: format!(
                "{currency}{} ({})",
                format_money(invoice.total),
                format_money(invoice.profit)
            ),
        })
        .collect();

    let totals = Totals::of(invoices);
    let total_line = format!(
        "Total: {currency}{} ({})",
        format_money(totals.sales),
        format_money(totals.profit)
    );

    RenderedView {
        blocks,
        totals,
        total_line,
    }
}
