use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use tracing::{debug, warn};

use crate::api::{ApiClient, FunctionEntry, GraphPayload, GraphRequest};
use crate::config::ViewKind;

/// Sequence number of one issued fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(super) struct RequestTicket(u64);

/// Hands out increasing tickets and remembers the newest one.
#[derive(Debug, Default)]
pub(super) struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub(super) fn issue(&mut self) -> RequestTicket {
        self.latest += 1;
        RequestTicket(self.latest)
    }

    pub(super) fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest
    }
}

pub(super) enum LoadMessage {
    Graph {
        view: ViewKind,
        ticket: RequestTicket,
        result: Result<GraphPayload, String>,
    },
    Functions(Result<Vec<FunctionEntry>, String>),
    Files(Result<Vec<String>, String>),
}

pub(super) fn spawn_graph_fetch(
    api: Arc<ApiClient>,
    view: ViewKind,
    ticket: RequestTicket,
    request: GraphRequest,
    tx: Sender<LoadMessage>,
) {
    debug!(?view, ?ticket, ?request, "fetching graph");
    thread::spawn(move || {
        let result = api
            .fetch_graph(&request)
            .map_err(|error| format!("{error:#}"));
        if let Err(error) = &result {
            warn!(?view, %error, "graph fetch failed");
        }
        let _ = tx.send(LoadMessage::Graph {
            view,
            ticket,
            result,
        });
    });
}

/// Loads the function list and the file list used by the selectors.
pub(super) fn spawn_catalog_fetch(api: Arc<ApiClient>, tx: Sender<LoadMessage>) {
    thread::spawn(move || {
        let functions = api
            .functions()
            .map(|list| list.functions)
            .map_err(|error| format!("{error:#}"));
        let _ = tx.send(LoadMessage::Functions(functions));

        let files = api.files().map_err(|error| format!("{error:#}"));
        let _ = tx.send(LoadMessage::Files(files));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_newest_ticket_is_current() {
        let mut tracker = RequestTracker::default();
        let first = tracker.issue();
        let second = tracker.issue();

        assert!(first < second);
        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
    }

    #[test]
    fn nothing_is_current_before_a_request() {
        let mut other = RequestTracker::default();
        let foreign = other.issue();
        let tracker = RequestTracker::default();

        assert!(!tracker.is_current(foreign));
    }
}
