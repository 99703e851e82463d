mod controls;
mod details;
mod panels;

use eframe::egui::{self, Color32, Sense, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::graph::NodeKind;
use super::render_utils::kind_style;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Indices of `items` matching `query`, best match first. An empty query keeps
/// every item in its original order.
fn fuzzy_filter<T>(items: &[T], query: &str, text: impl Fn(&T) -> &str) -> Vec<usize> {
    let query = query.trim();
    if query.is_empty() {
        return (0..items.len()).collect();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            fuzzy_match_score(&matcher, text(item), query).map(|score| (index, score))
        })
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    scored.into_iter().map(|(index, _)| index).collect()
}

fn legend_entry(ui: &mut Ui, kind: NodeKind, text: &str) {
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(vec2(12.0, 12.0), Sense::hover());
        ui.painter()
            .circle_filled(rect.center(), 6.0, kind_style(kind).fill);
        ui.label(text);
    });
}

fn legend(ui: &mut Ui, entries: &[(NodeKind, &str)]) {
    ui.horizontal_wrapped(|ui| {
        for (kind, text) in entries {
            legend_entry(ui, *kind, text);
            ui.add_space(10.0);
        }
    });
}

fn risk_color(level: &str) -> Color32 {
    match level.to_ascii_lowercase().as_str() {
        "critical" => Color32::from_rgb(0xff, 0x44, 0x44),
        "high" => Color32::from_rgb(0xff, 0x88, 0x44),
        "medium" => Color32::from_rgb(0xff, 0xbb, 0x44),
        "low" => Color32::from_rgb(0x44, 0xff, 0x88),
        _ => Color32::from_gray(0x88),
    }
}

fn centered_message(ui: &mut Ui, heading: &str, hint: Option<&str>) {
    ui.vertical_centered(|ui| {
        ui.add_space(120.0);
        ui.heading(heading);
        if let Some(hint) = hint {
            ui.add_space(6.0);
            ui.label(egui::RichText::new(hint).weak());
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuzzy_filter_ranks_and_ignores_case() {
        let names = ["parse_args", "render_graph", "ParseConfig", "main"];

        let matches = fuzzy_filter(&names, "parse", |name| *name);

        assert!(matches.contains(&0));
        assert!(matches.contains(&2));
        assert!(!matches.contains(&1));
        assert!(!matches.contains(&3));
    }

    #[test]
    fn empty_query_keeps_everything_in_order() {
        let names = ["b", "a", "c"];
        assert_eq!(fuzzy_filter(&names, "  ", |name| *name), vec![0, 1, 2]);
    }

    #[test]
    fn unknown_risk_levels_are_grey() {
        assert_eq!(risk_color("CRITICAL"), Color32::from_rgb(0xff, 0x44, 0x44));
        assert_eq!(risk_color("unknown"), Color32::from_gray(0x88));
    }
}
