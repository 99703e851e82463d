use eframe::egui::{self, Align, Context, Layout};

use crate::config::ViewKind;

use super::super::graph::NodeKind;
use super::super::{ArchGraphApp, SlotState};
use super::{centered_message, legend};

impl ArchGraphApp {
    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| self.draw_top_bar(ui));

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        if self.active == ViewKind::BlastRadius && self.blast_view.blast_summary.is_some() {
            egui::SidePanel::right("details")
                .resizable(true)
                .default_width(320.0)
                .show(ctx, |ui| self.draw_details(ui));
        }

        egui::CentralPanel::default().show(ctx, |ui| self.draw_canvas(ui));
    }

    fn draw_top_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("archgraph");
            ui.separator();

            let mut selected = self.active;
            for kind in ViewKind::ALL {
                ui.selectable_value(&mut selected, kind, kind.title());
            }
            self.switch_view(selected);

            ui.separator();
            let reload_button = ui
                .add_enabled(!self.slot(self.active).is_loading(), egui::Button::new("Reload"))
                .on_hover_text("Fetch this view again and rebuild its layout.");
            if reload_button.clicked() {
                self.request_view(self.active);
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.label(format!("backend: {}", self.api.base_url()));
            });
        });
    }

    fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let kind = self.active;
        let mut retry = false;

        ui.heading(kind.title());
        match kind {
            ViewKind::File => legend(ui, &[(NodeKind::File, "File")]),
            ViewKind::Function => legend(
                ui,
                &[(NodeKind::Function, "Function"), (NodeKind::File, "File")],
            ),
            ViewKind::BlastRadius => legend(
                ui,
                &[
                    (NodeKind::Target, "Target File"),
                    (NodeKind::DirectDependent, "Direct Dependents"),
                    (NodeKind::IndirectDependent, "Indirect Dependents"),
                ],
            ),
        }
        ui.separator();

        match &mut self.slot_mut(kind).state {
            SlotState::Idle => centered_message(
                ui,
                "Nothing to show yet",
                Some("Pick a file and change type on the left, then click Analyze."),
            ),
            SlotState::Loading => {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading(format!("Loading {}...", kind.title().to_lowercase()));
                    ui.add_space(8.0);
                    ui.spinner();
                });
            }
            SlotState::Error(error) => {
                ui.heading(format!("Failed to load {}", kind.title().to_lowercase()));
                ui.add_space(6.0);
                ui.label(error.as_str());
                ui.add_space(10.0);
                if ui.button("Retry").clicked() {
                    retry = true;
                }
            }
            SlotState::Empty => {
                let (heading, hint) = match kind {
                    ViewKind::File => (
                        "No dependency data available",
                        "Analyze a repository first to see file dependencies",
                    ),
                    ViewKind::Function => (
                        "No function call data available",
                        "Analyze a repository first to see function relationships",
                    ),
                    ViewKind::BlastRadius => (
                        "No dependents found",
                        "Nothing else in the repository imports this file",
                    ),
                };
                centered_message(ui, heading, Some(hint));
            }
            SlotState::Ready(view) => {
                let sim = view.simulation();
                let layout = if sim.is_active() {
                    format!(
                        "layout settling (alpha {:.3}, target {:.1})",
                        sim.alpha(),
                        sim.alpha_target()
                    )
                } else {
                    "layout settled".to_owned()
                };
                ui.label(format!(
                    "Nodes: {} | Edges: {}  |  {layout}  |  zoom {:.0}%",
                    view.node_count(),
                    view.edge_count(),
                    view.viewport().scale * 100.0
                ));

                view.show(ui);
            }
        }

        if retry {
            self.request_view(kind);
        }
    }
}
