use std::io::{self, IsTerminal, Write};
use tabled::{settings::Style, Table, Tabled};

use crate::invoice::{format_money, RenderedView};
use crate::view::state::{LoadStatus, ViewState};

/// Output side of the view. The loading indicator wraps every fetch.
pub trait Presenter {
    fn show_loading(&mut self, label: &str) -> io::Result<()>;
    fn hide_loading(&mut self) -> io::Result<()>;
    fn present(&mut self, state: &ViewState, view: &RenderedView) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Text,
    Table,
}

/// Status line on stderr, only drawn when stderr is a terminal
#[derive(Debug)]
pub struct LoadingIndicator {
    enabled: bool,
    visible: bool,
}

impl LoadingIndicator {
    pub fn for_stderr() -> Self {
        Self::new(io::stderr().is_terminal())
    }

    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            visible: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    fn show(&mut self, label: &str) -> io::Result<()> {
        self.visible = true;
        if self.enabled {
            let mut err = io::stderr().lock();
            write!(err, "Loading invoices for {label}...")?;
            err.flush()?;
        }
        Ok(())
    }

    fn hide(&mut self) -> io::Result<()> {
        if self.visible && self.enabled {
            let mut err = io::stderr().lock();
            write!(err, "\r\x1b[2K")?;
            err.flush()?;
        }
        self.visible = false;
        Ok(())
    }
}

#[derive(Tabled)]
struct LineRow {
    #[tabled(rename = "CUSTOMER")]
    customer: String,
    #[tabled(rename = "ITEM")]
    item: String,
    #[tabled(rename = "QTY")]
    quantity: String,
    #[tabled(rename = "TOTAL")]
    total: String,
    #[tabled(rename = "PROFIT")]
    profit: String,
}

pub struct TerminalPresenter<W: Write> {
    out: W,
    layout: Layout,
    currency: String,
    indicator: LoadingIndicator,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W, layout: Layout, currency: &str, indicator: LoadingIndicator) -> Self {
        Self {
            out,
            layout,
            currency: currency.to_string(),
            indicator,
        }
    }

    pub fn indicator(&self) -> &LoadingIndicator {
        &self.indicator
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_text(&mut self, view: &RenderedView) -> io::Result<()> {
        for block in &view.blocks {
            writeln!(self.out, "{}", block.customer)?;
            for line in &block.lines {
                writeln!(self.out, "  {line}")?;
            }
            writeln!(self.out, "  Subtotal: {}", block.footer)?;
            writeln!(self.out)?;
        }
        Ok(())
    }

    /// One row per line item plus a subtotal row closing each invoice, so
    /// invoices without items still show up.
    fn write_table(&mut self, state: &ViewState) -> io::Result<()> {
        let currency = &self.currency;
        let mut rows = Vec::new();
        for invoice in &state.invoices {
            rows.extend(invoice.line_items.iter().map(|item| LineRow {
                customer: invoice.customer_name.clone(),
                item: item.name.clone(),
                quantity: item.quantity.normalize().to_string(),
                total: format!("{currency}{}", format_money(item.item_total)),
                profit: format_money(item.item_profit),
            }));
            rows.push(LineRow {
                customer: invoice.customer_name.clone(),
                item: "Subtotal".to_string(),
                quantity: String::new(),
                total: format!("{currency}{}", format_money(invoice.total)),
                profit: format_money(invoice.profit),
            });
        }

        if !rows.is_empty() {
            let table = Table::new(rows).with(Style::rounded()).to_string();
            writeln!(self.out, "{table}")?;
        }
        Ok(())
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn show_loading(&mut self, label: &str) -> io::Result<()> {
        self.indicator.show(label)
    }

    fn hide_loading(&mut self) -> io::Result<()> {
        self.indicator.hide()
    }

    fn present(&mut self, state: &ViewState, view: &RenderedView) -> io::Result<()> {
        writeln!(self.out, "Invoices for {}", state.label)?;
        writeln!(self.out, "{}", "-".repeat(50))?;

        match self.layout {
            Layout::Text => self.write_text(view)?,
            Layout::Table => self.write_table(state)?,
        }

        match &state.status {
            LoadStatus::Failed(reason) => {
                writeln!(self.out, "Could not load invoices: {reason}")?;
            }
            LoadStatus::Loaded if state.invoices.is_empty() => {
                writeln!(self.out, "No invoices.")?;
            }
            _ => {}
        }

        writeln!(self.out, "{}", view.total_line)?;
        self.out.flush()
    }
}
