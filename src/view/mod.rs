mod date;
mod presenter;
mod state;

pub use date::{DateSelector, NativeDateInput, RangePicker, PICKER_MIN_YEAR, REQUEST_DATE_FORMAT};
pub use presenter::{Layout, LoadingIndicator, Presenter, TerminalPresenter};
pub use state::{Event, LoadStatus, RequestId, ViewState};

use std::collections::VecDeque;

use crate::error::Result;
use crate::invoice::{render_invoices, InvoiceFetcher, Transport};

/// Ties a date control, the fetcher and a presenter together.
///
/// Every change of date goes through [`InvoiceView::dispatch`] as a
/// `DateChanged` event; the fetch outcome comes back as a tagged
/// `FetchCompleted`/`FetchFailed` event and only the latest one is drawn.
pub struct InvoiceView<T: Transport, P: Presenter> {
    selector: Box<dyn DateSelector>,
    fetcher: InvoiceFetcher<T>,
    presenter: P,
    currency: String,
    state: ViewState,
}

impl<T: Transport, P: Presenter> InvoiceView<T, P> {
    pub fn new(
        selector: Box<dyn DateSelector>,
        fetcher: InvoiceFetcher<T>,
        presenter: P,
        currency: &str,
    ) -> Self {
        let date = selector.value();
        let state = ViewState::new(date, selector.display(date));
        Self {
            selector,
            fetcher,
            presenter,
            currency: currency.to_string(),
            state,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn selector(&self) -> &dyn DateSelector {
        self.selector.as_ref()
    }

    /// Fetch and draw the currently selected day (startup and refresh)
    pub fn load(&mut self) -> Result<()> {
        let date = self.selector.value();
        self.dispatch(Event::DateChanged(date))
    }

    pub fn shift_by(&mut self, days: i64) -> Result<()> {
        let event = self.selector.shift_by(days)?;
        self.dispatch(event)
    }

    /// Jump to a date typed in the selector's input format
    pub fn select(&mut self, input: &str) -> Result<()> {
        let event = self.selector.set_explicit(input)?;
        self.dispatch(event)
    }

    pub fn dispatch(&mut self, event: Event) -> Result<()> {
        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            if let Some(next) = self.handle(event)? {
                queue.push_back(next);
            }
        }
        Ok(())
    }

    fn handle(&mut self, event: Event) -> Result<Option<Event>> {
        match event {
            Event::DateChanged(date) => {
                let label = self.selector.display(date);
                let request = self.state.begin_request(date, label);

                self.presenter.show_loading(&self.state.label)?;
                let outcome = self.fetcher.fetch(date);
                self.presenter.hide_loading()?;

                Ok(Some(match outcome {
                    Ok(invoices) => Event::FetchCompleted { request, invoices },
                    Err(error) => Event::FetchFailed { request, error },
                }))
            }
            Event::FetchCompleted { request, invoices } => {
                if !self.state.is_current(request) {
                    tracing::debug!(?request, latest = ?self.state.latest_request, "dropping stale response");
                    return Ok(None);
                }
                self.state.accept(invoices);
                self.redraw()?;
                Ok(None)
            }
            Event::FetchFailed { request, error } => {
                if !self.state.is_current(request) {
                    tracing::debug!(?request, %error, "dropping stale failure");
                    return Ok(None);
                }
                tracing::warn!(date = %self.state.date, %error, "could not fetch invoices");
                self.state.fail(error.to_string());
                self.redraw()?;
                Ok(None)
            }
        }
    }

    fn redraw(&mut self) -> Result<()> {
        let view = render_invoices(&self.state.invoices, &self.currency);
        self.presenter.present(&self.state, &view)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_DATE_FORMAT;
    use crate::error::FetchError;
    use crate::invoice::{InvoiceRecord, RenderedView};
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::io;
    use std::rc::Rc;

    /// Serves canned bodies keyed by the `date=` query value
    #[derive(Default)]
    struct FakeApi {
        bodies: HashMap<String, std::result::Result<String, u16>>,
        requests: Rc<RefCell<Vec<String>>>,
    }

    impl FakeApi {
        fn day(mut self, date: &str, body: &str) -> Self {
            self.bodies.insert(date.to_string(), Ok(body.to_string()));
            self
        }

        fn failing(mut self, date: &str, status: u16) -> Self {
            self.bodies.insert(date.to_string(), Err(status));
            self
        }
    }

    impl Transport for FakeApi {
        fn get(&self, url: &str) -> std::result::Result<String, FetchError> {
            self.requests.borrow_mut().push(url.to_string());
            let date = url.rsplit("date=").next().unwrap_or_default();
            match self.bodies.get(date) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(status)) => Err(FetchError::Status(*status)),
                None => Err(FetchError::Transport("connection refused".to_string())),
            }
        }
    }

    #[derive(Debug, PartialEq)]
    enum Call {
        ShowLoading(String),
        HideLoading,
        Present {
            customers: Vec<String>,
            total_line: String,
            status: LoadStatus,
        },
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
        loading: bool,
    }

    impl Presenter for Recorder {
        fn show_loading(&mut self, label: &str) -> io::Result<()> {
            self.loading = true;
            self.calls.push(Call::ShowLoading(label.to_string()));
            Ok(())
        }

        fn hide_loading(&mut self) -> io::Result<()> {
            self.loading = false;
            self.calls.push(Call::HideLoading);
            Ok(())
        }

        fn present(&mut self, state: &ViewState, view: &RenderedView) -> io::Result<()> {
            self.calls.push(Call::Present {
                customers: view.blocks.iter().map(|b| b.customer.clone()).collect(),
                total_line: view.total_line.clone(),
                status: state.status.clone(),
            });
            Ok(())
        }
    }

    const ONE_INVOICE: &str = r#"[{"customer_name": "Kedai Ali", "line_items": [
        {"name": "Beras", "quantity": 2, "item_total": 58.5, "item_profit": 6.1}
    ], "total": 58.5, "profit": 6.1}]"#;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn view_on(start: NaiveDate, api: FakeApi) -> InvoiceView<FakeApi, Recorder> {
        let selector = NativeDateInput::new(start, DEFAULT_DATE_FORMAT).unwrap();
        let fetcher = InvoiceFetcher::new(api, "http://api.test/invoices", "820117212");
        InvoiceView::new(Box::new(selector), fetcher, Recorder::default(), "RM")
    }

    #[test]
    fn load_shows_indicator_around_fetch_then_presents() {
        let mut view = view_on(date(2024, 3, 5), FakeApi::default().day("2024-03-05", ONE_INVOICE));
        view.load().unwrap();

        assert_eq!(
            view.presenter().calls,
            vec![
                Call::ShowLoading("5 Mar 2024".to_string()),
                Call::HideLoading,
                Call::Present {
                    customers: vec!["Kedai Ali".to_string()],
                    total_line: "Total: RM58.50 (6.10)".to_string(),
                    status: LoadStatus::Loaded,
                },
            ]
        );
        assert_eq!(view.state().invoices.len(), 1);
    }

    #[test]
    fn failure_presents_empty_set_and_hides_indicator() {
        let mut view = view_on(date(2024, 3, 5), FakeApi::default().failing("2024-03-05", 500));
        view.load().unwrap();

        assert!(!view.presenter().loading);
        let last = view.presenter().calls.last().unwrap();
        assert_eq!(
            last,
            &Call::Present {
                customers: Vec::new(),
                total_line: "Total: RM0.00 (0.00)".to_string(),
                status: LoadStatus::Failed("server responded with status 500".to_string()),
            }
        );
    }

    #[test]
    fn navigation_refetches_and_replaces() {
        let api = FakeApi::default()
            .day("2024-02-29", ONE_INVOICE)
            .day("2024-03-01", "[]");
        let requests = Rc::clone(&api.requests);
        let mut view = view_on(date(2024, 2, 29), api);

        view.load().unwrap();
        assert_eq!(view.state().invoices.len(), 1);

        view.shift_by(1).unwrap();
        assert_eq!(view.state().date, date(2024, 3, 1));
        assert!(view.state().invoices.is_empty());
        assert_eq!(view.state().status, LoadStatus::Loaded);

        view.shift_by(-1).unwrap();
        assert_eq!(view.state().date, date(2024, 2, 29));
        assert_eq!(view.state().invoices.len(), 1);

        assert_eq!(
            requests.borrow().as_slice(),
            [
                "http://api.test/invoices?organization_id=820117212&date=2024-02-29",
                "http://api.test/invoices?organization_id=820117212&date=2024-03-01",
                "http://api.test/invoices?organization_id=820117212&date=2024-02-29",
            ]
        );
    }

    #[test]
    fn stale_responses_are_dropped() {
        let api = FakeApi::default()
            .day("2024-03-05", ONE_INVOICE)
            .day("2024-03-06", "[]");
        let mut view = view_on(date(2024, 3, 5), api);

        view.load().unwrap();
        let first = view.state().latest_request;
        view.shift_by(1).unwrap();
        let presented = view.presenter().calls.len();

        // A late answer for the first day must not overwrite the second day.
        view.dispatch(Event::FetchCompleted {
            request: first,
            invoices: vec![InvoiceRecord::new(
                "Late",
                rust_decimal::Decimal::ONE,
                rust_decimal::Decimal::ZERO,
            )],
        })
        .unwrap();
        view.dispatch(Event::FetchFailed {
            request: first,
            error: FetchError::Status(504),
        })
        .unwrap();

        assert_eq!(view.presenter().calls.len(), presented);
        assert!(view.state().invoices.is_empty());
        assert_eq!(view.state().status, LoadStatus::Loaded);
        assert_eq!(view.state().date, date(2024, 3, 6));
    }

    #[test]
    fn bad_input_does_not_fetch() {
        let api = FakeApi::default();
        let requests = Rc::clone(&api.requests);
        let mut view = view_on(date(2024, 3, 5), api);

        assert!(view.select("yesterday").is_err());
        assert!(requests.borrow().is_empty());
        assert!(view.presenter().calls.is_empty());

        view.select("2024-03-04").unwrap();
        assert_eq!(view.selector().request_date(), "2024-03-04");
        assert_eq!(requests.borrow().len(), 1);
    }
}
