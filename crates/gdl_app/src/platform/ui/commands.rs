use std::path::PathBuf;

use gdl_core::Msg;

use crate::platform::app::ControlEvent;

pub const HELP: &str = "\
Commands:
  <url>          extract the streams available at <url>
  video N        choose video stream N
  audio N        check or uncheck audio stream N
  download       download the current selection
  cancel         close the current selection
  out [DIR]      set the output directory (blank for the working directory)
  ok             dismiss the oldest error
  help           show this text
  quit           exit";

/// Maps one line of user input to a control event. Unknown words are URLs.
pub fn parse_line(line: &str) -> Option<ControlEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let event = match (word.to_ascii_lowercase().as_str(), rest) {
        ("quit" | "exit", "") => ControlEvent::Quit,
        ("help" | "?", "") => ControlEvent::Help,
        ("download", "") => ControlEvent::Msg(Msg::DownloadClicked),
        ("cancel", "") => ControlEvent::Msg(Msg::SelectionDismissed),
        ("ok", "") => ControlEvent::Msg(Msg::NotificationDismissed),
        ("out", dir) => ControlEvent::Msg(Msg::OutputDirChanged(
            Some(dir).filter(|d| !d.is_empty()).map(PathBuf::from),
        )),
        ("video", index) => match list_index(index) {
            Some(index) => ControlEvent::Msg(Msg::VideoSelected(index)),
            None => ControlEvent::Invalid(format!("expected a stream number, got {index:?}")),
        },
        ("audio", index) => match list_index(index) {
            Some(index) => ControlEvent::Msg(Msg::AudioToggled(index)),
            None => ControlEvent::Invalid(format!("expected a stream number, got {index:?}")),
        },
        _ => ControlEvent::Msg(Msg::UrlSubmitted(line.to_string())),
    };
    Some(event)
}

/// Streams are numbered from 1 on screen.
fn list_index(text: &str) -> Option<usize> {
    text.parse::<usize>().ok()?.checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_ignored() {
        assert!(parse_line("   ").is_none());
    }

    #[test]
    fn urls_pass_through_trimmed() {
        assert_eq!(
            parse_line("  https://example.com/watch?v=abc \n"),
            Some(ControlEvent::Msg(Msg::UrlSubmitted(
                "https://example.com/watch?v=abc".to_string()
            )))
        );
    }

    #[test]
    fn stream_numbers_are_one_based() {
        assert_eq!(
            parse_line("video 2"),
            Some(ControlEvent::Msg(Msg::VideoSelected(1)))
        );
        assert_eq!(
            parse_line("AUDIO 1"),
            Some(ControlEvent::Msg(Msg::AudioToggled(0)))
        );
        assert!(matches!(parse_line("video 0"), Some(ControlEvent::Invalid(_))));
        assert!(matches!(parse_line("audio x"), Some(ControlEvent::Invalid(_))));
    }

    #[test]
    fn output_dir_may_be_cleared() {
        assert_eq!(
            parse_line("out /srv/my media"),
            Some(ControlEvent::Msg(Msg::OutputDirChanged(Some(PathBuf::from(
                "/srv/my media"
            )))))
        );
        assert_eq!(
            parse_line("out"),
            Some(ControlEvent::Msg(Msg::OutputDirChanged(None)))
        );
    }

    #[test]
    fn keywords_map_to_actions() {
        assert_eq!(parse_line("quit"), Some(ControlEvent::Quit));
        assert_eq!(parse_line("help"), Some(ControlEvent::Help));
        assert_eq!(
            parse_line("download"),
            Some(ControlEvent::Msg(Msg::DownloadClicked))
        );
        assert_eq!(parse_line("ok"), Some(ControlEvent::Msg(Msg::NotificationDismissed)));
        assert_eq!(
            parse_line("cancel"),
            Some(ControlEvent::Msg(Msg::SelectionDismissed))
        );
    }
}
