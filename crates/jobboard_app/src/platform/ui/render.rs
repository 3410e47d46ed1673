//! Plain-text rendering of the view model.
use std::fmt::Write;

use jobboard_core::{AppViewModel, ItemRowView, ListStatus};

const DESCRIPTION_WIDTH: usize = 96;

pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();

    match &view.status {
        ListStatus::Loading { bytes } => {
            match bytes {
                Some(bytes) => {
                    let _ = writeln!(out, "Loading... ({})", format_bytes(*bytes));
                }
                None => out.push_str("Loading...\n"),
            }
            return out;
        }
        ListStatus::Failed(message) => {
            let _ = writeln!(out, "Some error occurred: {message}");
            return out;
        }
        ListStatus::Ready => {}
    }

    let _ = write!(
        out,
        "== Jobs: {} of {} | favourites: {}",
        view.filtered_count, view.total_count, view.favourite_count
    );
    if let Some(updated) = &view.last_updated {
        let _ = write!(out, " | updated {updated}");
    }
    out.push('\n');
    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "!! {notice}");
    }

    let _ = writeln!(out, "Search: \"{}\"", view.search_text);
    let _ = writeln!(out, "Location: {}", facet_label(view));
    if !view.facet_options.is_empty() {
        let _ = writeln!(out, "Locations: Any | {}", view.facet_options.join(" | "));
    }

    out.push('\n');
    if view.rows.is_empty() {
        out.push_str("  (no matching jobs)\n");
    }
    for row in &view.rows {
        render_row(&mut out, row);
    }

    let _ = writeln!(
        out,
        "\n<- (p)revious   page {} of {}   (n)ext ->",
        view.page, view.total_pages
    );
    out
}

fn render_row(out: &mut String, row: &ItemRowView) {
    let star = if row.is_favourite { '*' } else { ' ' };
    let _ = writeln!(
        out,
        "{star} #{:<3} {} @ {} ({})",
        row.position,
        or_dash(&row.title),
        or_dash(&row.company),
        or_dash(&row.location)
    );
    if !row.description.is_empty() {
        let _ = writeln!(out, "        {}", truncate(&row.description, DESCRIPTION_WIDTH));
    }
}

fn facet_label(view: &AppViewModel) -> String {
    match &view.selected_facet {
        None => "Any".to_string(),
        Some(facet) if view.selected_facet_available => facet.clone(),
        Some(facet) => format!("{facet} (not in current results)"),
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let mut cut: String = single_line.chars().take(max_chars.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobboard_core::ItemId;

    fn row(position: usize, title: &str, is_favourite: bool) -> ItemRowView {
        ItemRowView {
            position,
            id: ItemId::from(title),
            title: title.to_string(),
            company: "Acme".to_string(),
            location: "NY".to_string(),
            description: String::new(),
            is_favourite,
        }
    }

    #[test]
    fn loading_shows_progress_only() {
        let view = AppViewModel {
            status: ListStatus::Loading { bytes: Some(2048) },
            ..AppViewModel::default()
        };
        assert_eq!(render(&view), "Loading... (2.0 KB)\n");
    }

    #[test]
    fn failure_replaces_list() {
        let view = AppViewModel {
            status: ListStatus::Failed("API call failed".into()),
            rows: vec![row(1, "Cook", false)],
            ..AppViewModel::default()
        };
        assert_eq!(render(&view), "Some error occurred: API call failed\n");
    }

    #[test]
    fn ready_view_lists_rows_and_footer() {
        let view = AppViewModel {
            rows: vec![row(11, "Cook", true), row(12, "Baker", false)],
            facet_options: vec!["NY".into(), "LA".into()],
            page: 2,
            total_pages: 3,
            filtered_count: 25,
            total_count: 40,
            favourite_count: 1,
            ..AppViewModel::default()
        };
        let text = render(&view);
        assert!(text.contains("== Jobs: 25 of 40 | favourites: 1"));
        assert!(text.contains("Locations: Any | NY | LA"));
        assert!(text.contains("* #11  Cook @ Acme (NY)"));
        assert!(text.contains("  #12  Baker @ Acme (NY)"));
        assert!(text.contains("page 2 of 3"));
    }

    #[test]
    fn unreachable_facet_is_flagged() {
        let view = AppViewModel {
            selected_facet: Some("LA".into()),
            selected_facet_available: false,
            ..AppViewModel::default()
        };
        assert!(render(&view).contains("Location: LA (not in current results)"));
    }

    #[test]
    fn long_descriptions_are_truncated() {
        let long = "word ".repeat(50);
        let cut = truncate(&long, 20);
        assert_eq!(cut.chars().count(), 20);
        assert!(cut.ends_with("..."));
    }
}
