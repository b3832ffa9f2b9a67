mod fetcher;
mod model;
mod render;

pub use fetcher::{request_url, HttpTransport, InvoiceFetcher, Transport};
pub use model::{parse_invoices, InvoiceRecord, LineItem};
pub use render::{format_money, render_invoices, InvoiceBlock, RenderedView, Totals};
