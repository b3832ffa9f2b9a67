use chrono::NaiveDate;

use crate::error::FetchError;
use crate::invoice::InvoiceRecord;

/// Tags each fetch so late answers for superseded dates can be dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct RequestId(pub u64);

#[derive(Debug)]
pub enum Event {
    DateChanged(NaiveDate),
    FetchCompleted {
        request: RequestId,
        invoices: Vec<InvoiceRecord>,
    },
    FetchFailed {
        request: RequestId,
        error: FetchError,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loaded,
    Failed(String),
}

/// Everything the presenter needs to draw the current day
#[derive(Debug, Clone)]
pub struct ViewState {
    pub date: NaiveDate,
    pub label: String,
    pub latest_request: RequestId,
    pub invoices: Vec<InvoiceRecord>,
    pub status: LoadStatus,
}

impl ViewState {
    pub fn new(date: NaiveDate, label: String) -> Self {
        Self {
            date,
            label,
            latest_request: RequestId::default(),
            invoices: Vec::new(),
            status: LoadStatus::Idle,
        }
    }

    /// Point the view at `date` and allocate the id of the fetch for it
    pub fn begin_request(&mut self, date: NaiveDate, label: String) -> RequestId {
        self.date = date;
        self.label = label;
        self.latest_request = RequestId(self.latest_request.0 + 1);
        self.latest_request
    }

    pub fn is_current(&self, request: RequestId) -> bool {
        request == self.latest_request
    }

    /// Replace the records wholesale; nothing from the previous day survives
    pub fn accept(&mut self, invoices: Vec<InvoiceRecord>) {
        self.invoices = invoices;
        self.status = LoadStatus::Loaded;
    }

    pub fn fail(&mut self, reason: String) {
        self.invoices.clear();
        self.status = LoadStatus::Failed(reason);
    }
}
