//! CLI output formatting and display helpers.

use catalog_core::{CoverSize, DetailState, ListingPhase, ListingView, Work};

/// Returns terminal width from COLUMNS, or 80 if unset/invalid.
pub fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 20)
        .unwrap_or(80)
}

/// Truncates text to at most `width` chars, appending ellipsis if truncated.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    let text_len = text.chars().count();
    if text_len <= width {
        return text.to_string();
    }
    match width {
        0 => String::new(),
        1 => "…".to_string(),
        _ => {
            let mut output: String = text.chars().take(width - 1).collect();
            output.push('…');
            output
        }
    }
}

/// Greedy word wrap; words longer than `width` are truncated.
pub fn wrap_to_width(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let word = truncate_to_width(word, width);
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn phase_label(phase: ListingPhase) -> &'static str {
    match phase {
        ListingPhase::Loading => "loading",
        ListingPhase::Ready => "ready",
        ListingPhase::ErrorWithFallback => "fallback",
    }
}

fn year_label(work: &Work) -> String {
    work.first_publish_year
        .map_or_else(|| "----".to_string(), |year| year.to_string())
}

fn authors_label(work: &Work) -> String {
    let names = work.author_names();
    if names.is_empty() {
        catalog_core::catalog::UNKNOWN_AUTHOR.to_string()
    } else {
        names.join(", ")
    }
}

/// One list entry: `id  year  title - authors`, plus an indented `M` cover
/// URL line when the work has a cover. Each line is truncated to `width`.
pub fn format_work_row(work: &Work, width: usize) -> Vec<String> {
    let row = format!(
        "{:<12} {}  {} - {}",
        work.id(),
        year_label(work),
        work.title,
        authors_label(work)
    );
    let mut lines = vec![truncate_to_width(&row, width)];
    if let Some(cover) = work.cover_url(CoverSize::Medium) {
        lines.push(truncate_to_width(&format!("{:<12} cover: {cover}", ""), width));
    }
    lines
}

/// Renders the list view: summary line, optional message, one row per work.
pub fn render_listing(view: &ListingView, width: usize) -> Vec<String> {
    let mut lines = vec![truncate_to_width(
        &format!(
            "{} work(s) [{}]",
            view.works.len(),
            phase_label(view.phase)
        ),
        width,
    )];
    if let Some(message) = &view.message {
        lines.extend(wrap_to_width(message, width));
    }
    lines.extend(view.works.iter().flat_map(|work| format_work_row(work, width)));
    lines
}

/// Renders the detail view. Cover URLs use the large size.
pub fn render_detail(state: &DetailState, width: usize) -> Vec<String> {
    let Some(work) = state.work() else {
        return match state {
            DetailState::Loading { id } => vec![truncate_to_width(&format!("Loading {id}…"), width)],
            _ => vec!["Nothing to show".to_string()],
        };
    };

    let mut lines = vec![truncate_to_width(&work.title, width)];
    if let Some(subtitle) = &work.subtitle {
        lines.push(truncate_to_width(subtitle, width));
    }
    let field = |label: &str, value: &str| truncate_to_width(&format!("{label:<10} {value}"), width);
    lines.push(field("key", &work.key));
    lines.push(field("authors", &authors_label(work)));
    if let Some(year) = work.first_publish_year {
        lines.push(field("published", &year.to_string()));
    }
    if let Some(editions) = work.edition_count {
        lines.push(field("editions", &editions.to_string()));
    }
    if let Some(cover) = work.cover_url(CoverSize::Large) {
        lines.push(field("cover", &cover));
    }
    lines.push(String::new());
    lines.extend(wrap_to_width(&work.description, width));
    if matches!(state, DetailState::Fallback(_)) {
        lines.push(String::new());
        lines.push(truncate_to_width(
            "(showing placeholder content: the work could not be loaded)",
            width,
        ));
    }
    lines
}
