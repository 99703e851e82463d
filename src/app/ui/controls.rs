use eframe::egui::{self, Key, RichText, Ui};

use crate::config::{ChangeType, ViewKind};
use crate::util::{file_label, file_name};

use super::super::{ArchGraphApp, Catalog};
use super::fuzzy_filter;

const MAX_SUGGESTIONS: usize = 12;

impl ArchGraphApp {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Controls");
        ui.separator();
        ui.add_space(4.0);

        match self.active {
            ViewKind::File => {
                ui.label("File-level import graph of the last analyzed repository.");
                ui.label(
                    RichText::new(
                        "Drag nodes to pin them, scroll to zoom, drag the background to pan.",
                    )
                    .weak(),
                );
            }
            ViewKind::Function => self.draw_function_selector(ui),
            ViewKind::BlastRadius => self.draw_blast_controls(ui),
        }
    }

    fn draw_function_selector(&mut self, ui: &mut Ui) {
        ui.label("Function")
            .on_hover_text("Show the whole call graph or one function's call chain.");
        ui.text_edit_singleline(&mut self.function_filter)
            .on_hover_text("Fuzzy-filter the function list.");
        ui.add_space(4.0);

        let mut selection = None;
        if ui
            .selectable_label(self.selected_function.is_none(), "All functions")
            .clicked()
        {
            selection = Some(None);
        }

        match &self.functions {
            Catalog::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading functions...");
                });
            }
            Catalog::Failed(error) => {
                ui.label(RichText::new(format!("Function list unavailable: {error}")).weak());
            }
            Catalog::Ready(functions) => {
                let matches = fuzzy_filter(functions, &self.function_filter, |entry| {
                    entry.name.as_str()
                });
                ui.small(format!("{} of {} functions", matches.len(), functions.len()));

                egui::ScrollArea::vertical()
                    .id_salt("function_list_scroll")
                    .auto_shrink([false, false])
                    .show_rows(ui, 20.0, matches.len(), |ui, row_range| {
                        for row in row_range {
                            let Some(entry) =
                                matches.get(row).and_then(|&index| functions.get(index))
                            else {
                                continue;
                            };
                            let selected =
                                self.selected_function.as_deref() == Some(entry.name.as_str());
                            let location = entry
                                .file
                                .as_deref()
                                .map(|file| match entry.line {
                                    Some(line) => format!("{}:{line}", file_name(file)),
                                    None => file_name(file).to_owned(),
                                })
                                .unwrap_or_default();
                            let response = ui
                                .selectable_label(selected, format!("{}  {location}", entry.name))
                                .on_hover_text(
                                    entry.file.as_deref().unwrap_or(entry.name.as_str()),
                                );
                            if response.clicked() {
                                selection = Some(Some(entry.name.clone()));
                            }
                        }
                    });
            }
        }

        if let Some(name) = selection {
            self.select_function(name);
        }
    }

    fn draw_blast_controls(&mut self, ui: &mut Ui) {
        ui.label("File path")
            .on_hover_text("Repository-relative path of the file you plan to change.");
        let input = ui.text_edit_singleline(&mut self.blast_file);
        let submitted = input.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter));

        ui.add_space(4.0);
        egui::ComboBox::from_label("Change type")
            .selected_text(self.change_type.as_str().to_uppercase())
            .show_ui(ui, |ui| {
                for change_type in ChangeType::ALL {
                    ui.selectable_value(
                        &mut self.change_type,
                        change_type,
                        change_type.as_str().to_uppercase(),
                    );
                }
            });

        ui.add_space(4.0);
        let loading = self.blast_view.is_loading();
        let button_text = if loading { "Analyzing..." } else { "Analyze Impact" };
        let analyze = ui
            .add_enabled(
                !loading && !self.blast_file.trim().is_empty(),
                egui::Button::new(button_text),
            )
            .clicked();
        if (analyze || submitted) && !loading {
            self.request_view(ViewKind::BlastRadius);
        }

        ui.separator();
        ui.label(RichText::new("Files").strong());
        let mut picked = None;
        match &self.files {
            Catalog::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading files...");
                });
            }
            Catalog::Failed(error) => {
                ui.label(RichText::new(format!("File list unavailable: {error}")).weak());
            }
            Catalog::Ready(files) => {
                let matches = fuzzy_filter(files, &self.blast_file, |file| file.as_str());
                egui::ScrollArea::vertical()
                    .id_salt("file_suggestions_scroll")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for &index in matches.iter().take(MAX_SUGGESTIONS) {
                            let Some(file) = files.get(index) else {
                                continue;
                            };
                            let selected = self.blast_file == *file;
                            if ui
                                .selectable_label(selected, file_label(file))
                                .on_hover_text(file.as_str())
                                .clicked()
                            {
                                picked = Some(file.clone());
                            }
                        }
                        if matches.len() > MAX_SUGGESTIONS {
                            ui.small(format!("... and {} more", matches.len() - MAX_SUGGESTIONS));
                        }
                    });
            }
        }

        if let Some(file) = picked {
            self.blast_file = file;
        }
    }
}
