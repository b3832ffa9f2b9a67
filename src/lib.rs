pub mod config;
pub mod error;
pub mod invoice;
pub mod view;

pub use config::{Config, ConfigSource};
pub use error::{FetchError, Result, ViewerError};
pub use invoice::{render_invoices, InvoiceFetcher, InvoiceRecord, LineItem, RenderedView};
pub use view::{DateSelector, InvoiceView, NativeDateInput, RangePicker};
