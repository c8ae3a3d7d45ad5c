use std::path::PathBuf;

use tracing::info;

use crate::desktop::DesktopPlatform;
use crate::flow::{EntryFlow, FlowState};
use crate::models::{LauncherConfig, StartupSignal};

pub struct LauncherApp {
    pub config: LauncherConfig,
    pub flow: EntryFlow<DesktopPlatform>,
    /// Text box contents of the "Choose action" dialog.
    pub label_input: String,
    /// Set once the flow has finished and the window is waiting to close.
    pub closing: bool,
}

impl LauncherApp {
    pub fn new(
        config: LauncherConfig,
        data_dir: PathBuf,
        signal: &StartupSignal,
    ) -> Self {
        let platform = DesktopPlatform::new(&config, &data_dir);
        let mut flow = EntryFlow::new(
            platform,
            config.target.clone(),
            config.default_icon.clone(),
        );
        flow.start(signal);

        Self {
            config,
            flow,
            label_input: String::new(),
            closing: false,
        }
    }

    /// Runs the native picker the flow is waiting on and feeds the result back.
    pub fn process_pending_pick(&mut self) {
        if let Some((tag, outcome)) = self.flow.platform_mut().fulfil_pending_pick() {
            self.flow.on_result(tag, outcome);
            if matches!(self.flow.state(), FlowState::ChoosingAction { .. }) {
                self.label_input.clear();
            }
        }
    }

    /// The window stays up after the flow ends only until its toasts have
    /// been seen.
    pub fn ready_to_close(&mut self) -> bool {
        if !self.flow.is_finished() {
            return false;
        }
        if !self.closing {
            info!("Flow done, closing once messages have been shown");
            self.closing = true;
        }
        self.flow.platform_mut().prune_toasts();
        self.flow.platform().toasts().next().is_none()
    }
}
