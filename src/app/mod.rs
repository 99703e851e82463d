use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::Duration;

use eframe::egui::Context;
use tracing::{debug, info};

use crate::api::{ApiClient, BlastRadiusData, FunctionEntry, GraphPayload, GraphRequest};
use crate::config::{AppConfig, ChangeType, ViewKind, ViewProfile};

use graph::{GraphView, adapt_payload};
use loader::{LoadMessage, RequestTicket, RequestTracker, spawn_catalog_fetch, spawn_graph_fetch};

mod graph;
mod loader;
mod physics;
mod render;
mod render_utils;
mod ui;
mod viewport;

pub struct ArchGraphApp {
    api: Arc<ApiClient>,
    active: ViewKind,
    file_view: ViewSlot,
    function_view: ViewSlot,
    blast_view: ViewSlot,
    functions: Catalog<FunctionEntry>,
    files: Catalog<String>,
    function_filter: String,
    selected_function: Option<String>,
    blast_file: String,
    change_type: ChangeType,
    tx: Sender<LoadMessage>,
    rx: Receiver<LoadMessage>,
}

enum Catalog<T> {
    Loading,
    Ready(Vec<T>),
    Failed(String),
}

impl<T> Catalog<T> {
    fn from_result(result: Result<Vec<T>, String>) -> Self {
        match result {
            Ok(items) => Self::Ready(items),
            Err(error) => Self::Failed(error),
        }
    }
}

enum SlotState {
    Idle,
    Loading,
    Ready(Box<GraphView>),
    Empty,
    Error(String),
}

/// Everything one tab owns: its request sequence and its current graph.
struct ViewSlot {
    kind: ViewKind,
    profile: ViewProfile,
    requests: RequestTracker,
    state: SlotState,
    blast_summary: Option<BlastRadiusData>,
}

impl ViewSlot {
    fn new(kind: ViewKind) -> Self {
        Self {
            kind,
            profile: ViewProfile::for_kind(kind),
            requests: RequestTracker::default(),
            state: SlotState::Idle,
            blast_summary: None,
        }
    }

    fn is_loading(&self) -> bool {
        matches!(self.state, SlotState::Loading)
    }

    /// Issues a new ticket and drops the current graph.
    fn begin_request(&mut self) -> RequestTicket {
        self.state = SlotState::Loading;
        self.blast_summary = None;
        self.requests.issue()
    }

    /// Applies a fetch result unless a newer request was issued since.
    fn apply(&mut self, ticket: RequestTicket, result: Result<GraphPayload, String>) -> bool {
        if !self.requests.is_current(ticket) {
            debug!(view = ?self.kind, ?ticket, "discarding stale response");
            return false;
        }

        self.state = SlotState::Loading;
        let payload = match result {
            Ok(payload) => payload,
            Err(error) => {
                self.state = SlotState::Error(error);
                return true;
            }
        };

        if let GraphPayload::BlastRadius(data) = &payload {
            self.blast_summary = Some(data.clone());
        }

        let graph = adapt_payload(&payload);
        if graph.is_empty() {
            info!(view = ?self.kind, "graph payload is empty");
            self.state = SlotState::Empty;
            return true;
        }

        info!(
            view = ?self.kind,
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "graph ready"
        );
        self.state = SlotState::Ready(Box::new(GraphView::new(graph, self.profile)));
        true
    }
}

impl ArchGraphApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig, api: ApiClient) -> Self {
        let (tx, rx) = mpsc::channel();
        let api = Arc::new(api);
        spawn_catalog_fetch(Arc::clone(&api), tx.clone());

        let mut app = Self {
            api,
            active: config.initial_view,
            file_view: ViewSlot::new(ViewKind::File),
            function_view: ViewSlot::new(ViewKind::Function),
            blast_view: ViewSlot::new(ViewKind::BlastRadius),
            functions: Catalog::Loading,
            files: Catalog::Loading,
            function_filter: String::new(),
            selected_function: config.initial_function,
            blast_file: config.initial_file.unwrap_or_default(),
            change_type: config.change_type,
            tx,
            rx,
        };
        app.request_view(app.active);
        app
    }

    fn slot(&self, kind: ViewKind) -> &ViewSlot {
        match kind {
            ViewKind::File => &self.file_view,
            ViewKind::Function => &self.function_view,
            ViewKind::BlastRadius => &self.blast_view,
        }
    }

    fn slot_mut(&mut self, kind: ViewKind) -> &mut ViewSlot {
        match kind {
            ViewKind::File => &mut self.file_view,
            ViewKind::Function => &mut self.function_view,
            ViewKind::BlastRadius => &mut self.blast_view,
        }
    }

    fn request_for(&self, kind: ViewKind) -> Option<GraphRequest> {
        match kind {
            ViewKind::File => Some(GraphRequest::FileGraph),
            ViewKind::Function => Some(match &self.selected_function {
                Some(name) => GraphRequest::CallChain(name.clone()),
                None => GraphRequest::FunctionGraph,
            }),
            ViewKind::BlastRadius => {
                let file = self.blast_file.trim();
                (!file.is_empty()).then(|| GraphRequest::BlastRadius {
                    file: file.to_owned(),
                    change_type: self.change_type,
                })
            }
        }
    }

    /// Starts a fresh fetch for `kind`; the response rebuilds its view.
    fn request_view(&mut self, kind: ViewKind) {
        let Some(request) = self.request_for(kind) else {
            let slot = self.slot_mut(kind);
            slot.requests.issue();
            slot.state = SlotState::Idle;
            slot.blast_summary = None;
            return;
        };

        let ticket = self.slot_mut(kind).begin_request();
        spawn_graph_fetch(
            Arc::clone(&self.api),
            kind,
            ticket,
            request,
            self.tx.clone(),
        );
    }

    fn switch_view(&mut self, kind: ViewKind) {
        if self.active == kind {
            return;
        }
        self.active = kind;
        self.request_view(kind);
    }

    fn select_function(&mut self, name: Option<String>) {
        if self.selected_function == name {
            return;
        }
        self.selected_function = name;
        self.request_view(ViewKind::Function);
    }

    fn drain_messages(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(LoadMessage::Graph {
                    view,
                    ticket,
                    result,
                }) => {
                    self.slot_mut(view).apply(ticket, result);
                }
                Ok(LoadMessage::Functions(result)) => {
                    self.functions = Catalog::from_result(result);
                }
                Ok(LoadMessage::Files(result)) => {
                    self.files = Catalog::from_result(result);
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
    }

    fn is_waiting(&self) -> bool {
        ViewKind::ALL
            .iter()
            .any(|&kind| self.slot(kind).is_loading())
            || matches!(self.functions, Catalog::Loading)
            || matches!(self.files, Catalog::Loading)
    }
}

impl eframe::App for ArchGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.drain_messages();
        self.show(ctx);

        if self.is_waiting() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;
    use crate::api::{GraphData, RawEdge, RawNode};

    fn file_payload(ids: &[&str]) -> GraphPayload {
        GraphPayload::FileGraph(GraphData {
            nodes: ids
                .iter()
                .map(|id| RawNode {
                    id: (*id).to_owned(),
                    ..Default::default()
                })
                .collect(),
            edges: ids
                .windows(2)
                .map(|pair| RawEdge {
                    source: pair[0].to_owned(),
                    target: pair[1].to_owned(),
                })
                .collect(),
            error: None,
        })
    }

    fn ready_view(slot: &ViewSlot) -> &GraphView {
        match &slot.state {
            SlotState::Ready(view) => view.as_ref(),
            _ => panic!("view is not ready"),
        }
    }

    #[test]
    fn stale_responses_are_discarded() {
        let mut slot = ViewSlot::new(ViewKind::File);
        let first = slot.begin_request();
        let second = slot.begin_request();

        assert!(slot.apply(second, Ok(file_payload(&["a", "b", "c"]))));
        assert!(!slot.apply(first, Ok(file_payload(&["x"]))));

        assert_eq!(ready_view(&slot).node_count(), 3);
    }

    #[test]
    fn rebuild_replaces_state_even_when_ids_repeat() {
        let mut slot = ViewSlot::new(ViewKind::File);
        let ticket = slot.begin_request();
        slot.apply(ticket, Ok(file_payload(&["a", "b"])));

        let SlotState::Ready(view) = &mut slot.state else {
            panic!("view is not ready");
        };
        for _ in 0..40 {
            view.tick(1.0 / 60.0);
        }
        let grab = view.viewport().to_screen(view.simulation().nodes()[0].pos);
        assert!(view.begin_drag_at(grab));
        assert!(view.drag_pointer_to(pos2(5.0, 5.0)));

        let ticket = slot.begin_request();
        slot.apply(ticket, Ok(file_payload(&["a", "b"])));

        let sim = ready_view(&slot).simulation();
        assert_eq!(sim.alpha(), 1.0);
        assert_eq!(sim.alpha_target(), 0.0);
        assert!(sim.nodes().iter().all(|node| node.pin.is_none()));
        let center = ViewProfile::for_kind(ViewKind::File).canvas_size * 0.5;
        assert!((sim.nodes()[0].pos - center).length() < 20.0);
    }

    #[test]
    fn failures_and_empty_payloads_become_states() {
        let mut slot = ViewSlot::new(ViewKind::Function);
        let ticket = slot.begin_request();
        slot.apply(ticket, Err("backend reported: No analysis completed yet".into()));
        assert!(matches!(slot.state, SlotState::Error(_)));

        let ticket = slot.begin_request();
        assert!(slot.is_loading());
        slot.apply(
            ticket,
            Ok(GraphPayload::FunctionGraph(GraphData::default())),
        );
        assert!(matches!(slot.state, SlotState::Empty));
    }

    #[test]
    fn blast_results_keep_their_summary() {
        let mut slot = ViewSlot::new(ViewKind::BlastRadius);
        let ticket = slot.begin_request();
        let data = BlastRadiusData {
            file: "src/core.js".into(),
            direct_dependents: vec!["src/a.js".into()],
            risk_level: Some("high".into()),
            ..Default::default()
        };

        slot.apply(ticket, Ok(GraphPayload::BlastRadius(data)));

        assert_eq!(ready_view(&slot).node_count(), 2);
        let summary = slot.blast_summary.as_ref().unwrap();
        assert_eq!(summary.risk_level.as_deref(), Some("high"));
        assert_eq!(slot.profile.canvas_size.y, 400.0);
    }
}
