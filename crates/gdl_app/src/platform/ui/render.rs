use std::fmt::Write;

use gdl_core::{AppViewModel, SelectionView, TaskRowView};

const BAR_WIDTH: usize = 20;
const NAME_WIDTH: usize = 32;

pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();

    let output_dir = view
        .output_dir
        .as_ref()
        .map(|dir| dir.display().to_string())
        .unwrap_or_else(|| "(working directory)".to_string());
    let _ = writeln!(out, "── gdl ── output: {output_dir}");
    if let Some(status) = &view.status_line {
        let _ = writeln!(out, "status: {status}");
    }

    if let Some(selection) = &view.selection {
        render_selection(&mut out, selection);
    }

    render_table(&mut out, &view.rows);

    for message in &view.notifications {
        let _ = writeln!(out, "!! Error: {message}  (type `ok` to dismiss)");
    }
    out
}

fn render_selection(out: &mut String, selection: &SelectionView) {
    let _ = writeln!(out, "URL: {}", selection.url);
    if let Some(title) = &selection.title {
        let _ = writeln!(out, "Title: {title}");
    }
    let _ = writeln!(
        out,
        "Resolution: {}  Duration: {}  DRM: {}",
        selection.resolution, selection.duration, selection.drm
    );

    let _ = writeln!(out, "Video:");
    for (index, choice) in selection.video.iter().enumerate() {
        let marker = if choice.chosen { "(*)" } else { "( )" };
        let _ = writeln!(out, "  {marker} {:>2}. {}", index + 1, choice.label.trim_end());
    }
    let _ = writeln!(out, "Audio:");
    for (index, choice) in selection.audio.iter().enumerate() {
        let marker = if choice.chosen { "[x]" } else { "[ ]" };
        let _ = writeln!(out, "  {marker} {:>2}. {}", index + 1, choice.label.trim_end());
    }
    if selection.can_download {
        let _ = writeln!(out, "Type `download` to start, `cancel` to close.");
    } else {
        let _ = writeln!(out, "No video stream to download. Type `cancel` to close.");
    }
}

fn render_table(out: &mut String, rows: &[TaskRowView]) {
    if rows.is_empty() {
        return;
    }
    let _ = writeln!(
        out,
        "{:<8} {:<18} {:<name$} {:>8} {:<27} {:>9} {:>11} {:>11}",
        "ID",
        "Status",
        "Name",
        "Size",
        "Progress",
        "Fragments",
        "Speed",
        "ETA",
        name = NAME_WIDTH
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:<8} {:<18} {:<name$} {:>8} {:<27} {:>9} {:>11} {:>11}",
            short_id(row),
            row.status,
            truncate(&row.name, NAME_WIDTH),
            row.size,
            progress_bar(row.percent),
            row.fragments,
            row.speed,
            row.eta,
            name = NAME_WIDTH
        );
    }
}

fn short_id(row: &TaskRowView) -> String {
    row.task_id.simple().to_string().chars().take(8).collect()
}

fn progress_bar(percent: u8) -> String {
    let percent = usize::from(percent.min(100));
    let filled = percent * BAR_WIDTH / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        " ".repeat(BAR_WIDTH - filled),
        percent
    )
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdl_core::{update, AppState, Msg, TaskId};

    #[test]
    fn progress_bar_scales_to_width() {
        assert_eq!(progress_bar(0), format!("[{}]   0%", " ".repeat(20)));
        assert_eq!(progress_bar(50), format!("[{}{}]  50%", "#".repeat(10), " ".repeat(10)));
        assert_eq!(progress_bar(100), format!("[{}] 100%", "#".repeat(20)));
    }

    #[test]
    fn long_names_are_truncated() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 5), "abcd…");
    }

    #[test]
    fn renders_rows_and_notifications() {
        let task_id = TaskId::new_v4();
        let (state, _) = update(
            AppState::new(),
            Msg::TaskStarted {
                task_id,
                url: "https://example.com/a".to_string(),
            },
        );
        let (state, _) = update(state, Msg::ExtractionFailed("ERROR: nope".to_string()));

        let text = render(&state.view());
        assert!(text.contains("Starting..."));
        assert!(text.contains("https://example.com/a"));
        assert!(text.contains(&task_id.simple().to_string()[..8]));
        assert!(text.contains("!! Error: ERROR: nope"));
        assert!(text.contains("status: Failed"));
    }

    #[test]
    fn empty_state_renders_header_only() {
        let text = render(&AppState::new().view());
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("(working directory)"));
    }
}
