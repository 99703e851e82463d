use eframe::egui::{self, RichText, Ui};

use crate::util::file_label;

use super::super::ArchGraphApp;
use super::risk_color;

const LISTED_DEPENDENTS: usize = 5;
const LISTED_FUNCTIONS: usize = 3;

fn dependent_list(ui: &mut Ui, title: &str, count: usize, paths: &[String]) {
    ui.label(RichText::new(format!("{title}: {count}")).strong());
    for path in paths.iter().take(LISTED_DEPENDENTS) {
        let label = if path.is_empty() {
            "N/A".to_owned()
        } else {
            file_label(path)
        };
        ui.label(format!("  • {label}")).on_hover_text(path.as_str());
    }
    if paths.len() > LISTED_DEPENDENTS {
        ui.label(format!("  ... and {} more", paths.len() - LISTED_DEPENDENTS));
    }
}

impl ArchGraphApp {
    pub(in crate::app) fn draw_details(&self, ui: &mut Ui) {
        ui.heading("Impact Summary");
        ui.add_space(6.0);

        let Some(summary) = &self.blast_view.blast_summary else {
            ui.label("Run an analysis to see its impact.");
            return;
        };

        egui::ScrollArea::vertical()
            .id_salt("impact_summary_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(RichText::new(file_label(&summary.file)).strong())
                    .on_hover_text(summary.file.as_str());
                if let Some(change_type) = &summary.change_type {
                    ui.label(format!("Change type: {}", change_type.to_uppercase()));
                }

                ui.horizontal(|ui| {
                    ui.label("Risk level:");
                    let level = summary.risk_level.as_deref().unwrap_or("unknown");
                    ui.label(
                        RichText::new(level.to_uppercase())
                            .strong()
                            .color(risk_color(level)),
                    );
                    if let Some(score) = summary.risk_score.filter(|score| *score > 0.0) {
                        ui.label(format!("({score}/100)"));
                    }
                });
                ui.separator();

                let breakdown = summary.impact_breakdown.clone().unwrap_or_default();
                let direct_count = if breakdown.direct_count > 0 {
                    breakdown.direct_count
                } else {
                    summary.direct_dependents.len()
                };
                let indirect_count = if breakdown.indirect_count > 0 {
                    breakdown.indirect_count
                } else {
                    summary.indirect_dependents.len()
                };

                dependent_list(ui, "Direct dependents", direct_count, &summary.direct_dependents);
                ui.add_space(6.0);
                dependent_list(
                    ui,
                    "Indirect dependents",
                    indirect_count,
                    &summary.indirect_dependents,
                );
                ui.add_space(6.0);

                if breakdown.function_callers > 0 {
                    ui.label(format!("Function callers: {}", breakdown.function_callers));
                }
                let (total_functions, functions) = summary.affected_functions();
                if total_functions > 0 {
                    ui.label(
                        RichText::new(format!("Functions affected: {total_functions}")).strong(),
                    );
                    for function in functions.iter().take(LISTED_FUNCTIONS) {
                        ui.label(format!(
                            "  • {} ({} callers)",
                            function.name, function.caller_count
                        ));
                    }
                    ui.add_space(6.0);
                }

                ui.separator();
                ui.label(format!(
                    "Total affected: {} files",
                    summary.total_affected.unwrap_or(0)
                ));
            });
    }
}
