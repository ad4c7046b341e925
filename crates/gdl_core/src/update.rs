use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::UrlSubmitted(raw) => {
            let url = raw.trim();
            if url.is_empty() {
                return (state, Vec::new());
            }
            state.set_status("Extracting...");
            vec![Effect::Extract {
                url: url.to_string(),
            }]
        }
        Msg::ExtractionSucceeded(media) => {
            state.open_selection(media);
            state.set_status("Done");
            Vec::new()
        }
        Msg::ExtractionFailed(message) => {
            state.set_status("Failed");
            state.push_notification(message);
            Vec::new()
        }
        Msg::VideoSelected(index) => {
            let changed = state
                .selection_mut()
                .is_some_and(|selection| selection.select_video(index));
            if changed {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::AudioToggled(index) => {
            let changed = state
                .selection_mut()
                .is_some_and(|selection| selection.toggle_audio(index));
            if changed {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::DownloadClicked => {
            let output_dir = state.output_dir().map(ToOwned::to_owned);
            let request = state
                .selection()
                .and_then(|selection| selection.to_request(output_dir));
            match request {
                Some(request) => {
                    state.close_selection();
                    state.set_status("Download has started.");
                    vec![Effect::StartDownload(request)]
                }
                None => Vec::new(),
            }
        }
        Msg::SelectionDismissed => {
            state.close_selection();
            Vec::new()
        }
        Msg::OutputDirChanged(dir) => {
            // A blank path means "current directory", same as unset.
            let dir = dir.filter(|path| !path.as_os_str().is_empty());
            if state.set_output_dir(dir.clone()) {
                vec![Effect::SaveSettings { output_dir: dir }]
            } else {
                Vec::new()
            }
        }
        Msg::TaskStarted { task_id, url } => {
            state.insert_task(task_id, url);
            Vec::new()
        }
        Msg::TaskProgress(progress) => {
            // Progress for an unknown task is dropped; Started always comes first.
            state.apply_progress(progress);
            Vec::new()
        }
        Msg::TaskFailed { message, .. } => {
            state.push_notification(message);
            Vec::new()
        }
        Msg::TaskCompleted { task_id } => {
            state.remove_task(task_id);
            Vec::new()
        }
        Msg::NotificationDismissed => {
            state.dismiss_notification();
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
