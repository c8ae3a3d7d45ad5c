//! Entry flow: everything between "launcher opened" and "game started or
//! shortcut created".
//!
//! The flow is an explicit state machine. Dialog answers and picker results
//! are fed in as events; picker results are matched by [`RequestTag`] rather
//! than by the current state, because a result may arrive in a process that
//! was restarted while the picker was open. The only state that must survive
//! such a suspension is the pending shortcut request, and losing it is
//! tolerated.

pub mod chooser;
pub mod launch;
pub mod permissions;
pub mod router;
pub mod shortcut;

#[cfg(test)]
pub mod mock;

use tracing::{debug, info, warn};

use crate::models::{
    FileReference, IconAsset, LaunchVariant, PendingShortcutRequest, Permissions, PickOutcome,
    PickRequest, RequestTag, StartupSignal, TargetConfig, ToastDuration,
};
use crate::platform::Platform;

use self::chooser::{resolve_label, suggest_label, ActionChoice};
use self::launch::DispatchOutcome;
use self::router::Route;

pub const MSG_REGRANT: &str = "Please grant file access again…";
pub const MSG_SHORTCUT_CANCELLED: &str = "Shortcut cancelled.";
pub const MSG_SHORTCUT_FAILED: &str = "Shortcut failed.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowExit {
    Cancelled,
    PickCancelled,
    Launched(LaunchVariant),
    LaunchFailed,
    ShortcutCreated,
    ShortcutFailed,
    ShortcutAbandoned,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FlowState {
    Idle,
    ShowingInstructions,
    AwaitingFilePick,
    ChoosingAction { game: FileReference, suggested_label: String },
    AwaitingIconPick,
    Finished(FlowExit),
}

pub struct EntryFlow<P: Platform> {
    platform: P,
    target: TargetConfig,
    default_icon: IconAsset,
    state: FlowState,
    pending_shortcut: Option<PendingShortcutRequest>,
}

impl<P: Platform> EntryFlow<P> {
    pub fn new(platform: P, target: TargetConfig, default_icon: IconAsset) -> Self {
        Self {
            platform,
            target,
            default_icon,
            state: FlowState::Idle,
            pending_shortcut: None,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, FlowState::Finished(_))
    }

    pub fn exit(&self) -> Option<FlowExit> {
        match self.state {
            FlowState::Finished(exit) => Some(exit),
            _ => None,
        }
    }

    pub fn pending_shortcut(&self) -> Option<&PendingShortcutRequest> {
        self.pending_shortcut.as_ref()
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn start(&mut self, signal: &StartupSignal) {
        if self.state != FlowState::Idle {
            warn!("Entry flow already started, ignoring startup signal");
            return;
        }

        match router::route(signal) {
            Route::DirectLaunch(reference) => {
                info!("Started from shortcut for {}", reference);
                self.resume_with(reference);
            }
            Route::FreshPick => {
                self.state = FlowState::ShowingInstructions;
            }
        }
    }

    pub fn acknowledge_instructions(&mut self) {
        if self.state != FlowState::ShowingInstructions {
            warn!("No instructions showing, ignoring acknowledgment");
            return;
        }
        self.request_game_file();
    }

    pub fn choose(&mut self, choice: ActionChoice) {
        let (game, suggested_label) = match &self.state {
            FlowState::ChoosingAction { game, suggested_label } => {
                (game.clone(), suggested_label.clone())
            }
            other => {
                warn!("Action chosen in state {:?}, ignoring", other);
                return;
            }
        };

        match choice {
            ActionChoice::StartNow => self.start_game(&game),
            ActionChoice::CreateShortcut { label_input } => {
                let label = resolve_label(&label_input, &suggested_label);
                // Must happen before suspending: the icon pick may outlive this process.
                if let Err(e) =
                    permissions::request_durable(&mut self.platform, &game, Permissions::READ_WRITE)
                {
                    debug!("Continuing without durable grant: {}", e);
                }
                self.pending_shortcut = Some(PendingShortcutRequest {
                    game,
                    label,
                    awaiting_icon: true,
                });
                self.state = FlowState::AwaitingIconPick;
                self.platform.request_document(RequestTag::PickIcon, PickRequest::icon());
            }
            ActionChoice::Cancel => self.finish(FlowExit::Cancelled),
        }
    }

    /// Single entry point for picker results.
    pub fn on_result(&mut self, tag: RequestTag, outcome: PickOutcome) {
        if self.is_finished() {
            warn!("Result for {:?} arrived after the flow finished", tag);
            return;
        }

        match tag {
            RequestTag::PickGame => match outcome {
                PickOutcome::Picked(game) => self.offer_start_or_pin(game),
                PickOutcome::Cancelled => self.finish(FlowExit::PickCancelled),
            },
            RequestTag::PickIcon => {
                let image = match outcome {
                    PickOutcome::Picked(image) => Some(image),
                    PickOutcome::Cancelled => None,
                };
                self.create_shortcut(image);
            }
        }
    }

    fn resume_with(&mut self, reference: FileReference) {
        if !permissions::has_durable_read(&self.platform, &reference) {
            info!("No durable grant for {}, asking for the file again", reference);
            self.platform.toast(MSG_REGRANT, ToastDuration::Short);
            self.request_game_file();
            return;
        }
        self.start_game(&reference);
    }

    fn request_game_file(&mut self) {
        self.state = FlowState::AwaitingFilePick;
        self.platform.request_document(RequestTag::PickGame, PickRequest::game());
    }

    fn offer_start_or_pin(&mut self, game: FileReference) {
        let suggested_label = suggest_label(&game);
        self.state = FlowState::ChoosingAction { game, suggested_label };
    }

    fn create_shortcut(&mut self, image: Option<FileReference>) {
        // Cleared whatever happens next; a half-built request is never retried.
        let pending = self.pending_shortcut.take();

        let Some(pending) = pending.filter(|p| p.awaiting_icon && !p.label.trim().is_empty()) else {
            warn!("Icon pick resolved without a pending shortcut request");
            self.platform.toast(MSG_SHORTCUT_CANCELLED, ToastDuration::Short);
            self.finish(FlowExit::ShortcutAbandoned);
            return;
        };

        let descriptor = shortcut::build(
            &mut self.platform,
            &pending.game,
            &pending.label,
            image.as_ref(),
            &self.default_icon,
        );

        if shortcut::register(&mut self.platform, &descriptor) {
            info!("Shortcut {} registered for {}", descriptor.id, pending.game);
            self.platform.toast(
                &format!("Shortcut “{}” created.", pending.label),
                ToastDuration::Short,
            );
            self.finish(FlowExit::ShortcutCreated);
        } else {
            self.platform.toast(MSG_SHORTCUT_FAILED, ToastDuration::Short);
            self.finish(FlowExit::ShortcutFailed);
        }
    }

    fn start_game(&mut self, game: &FileReference) {
        let exit = match launch::dispatch(&mut self.platform, &self.target, game) {
            DispatchOutcome::Launched(variant) => FlowExit::Launched(variant),
            DispatchOutcome::Failed => FlowExit::LaunchFailed,
        };
        self.finish(exit);
    }

    fn finish(&mut self, exit: FlowExit) {
        info!("Entry flow finished: {:?}", exit);
        self.pending_shortcut = None;
        self.state = FlowState::Finished(exit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::mock::{Call, MockPlatform};
    use crate::models::{ShortcutIcon, WILDCARD_TYPE};
    use std::path::PathBuf;

    fn reference(raw: &str) -> FileReference {
        FileReference::parse(raw).unwrap()
    }

    fn zelda() -> FileReference {
        reference("content://com.android.externalstorage.documents/document/primary%3AGames%2Fzelda.nsp")
    }

    fn flow(platform: MockPlatform) -> EntryFlow<MockPlatform> {
        EntryFlow::new(
            platform,
            TargetConfig::default(),
            IconAsset(PathBuf::from("assets/ic_launcher.png")),
        )
    }

    fn shortcut_signal(game: &FileReference) -> StartupSignal {
        StartupSignal { boot_path: Some(game.to_string()), data: None }
    }

    fn fresh_flow_at_chooser() -> EntryFlow<MockPlatform> {
        let mut flow = flow(MockPlatform::default());
        flow.start(&StartupSignal::default());
        flow.acknowledge_instructions();
        flow.on_result(RequestTag::PickGame, PickOutcome::Picked(zelda()));
        flow
    }

    #[test]
    fn test_fresh_start_shows_instructions_first() {
        let mut flow = flow(MockPlatform::default());
        flow.start(&StartupSignal::default());

        assert_eq!(flow.state(), &FlowState::ShowingInstructions);
        assert!(flow.platform().picks().is_empty());

        flow.acknowledge_instructions();
        assert_eq!(flow.state(), &FlowState::AwaitingFilePick);
        assert_eq!(flow.platform().picks(), vec![RequestTag::PickGame]);
        assert!(flow
            .platform()
            .calls
            .contains(&Call::Pick(RequestTag::PickGame, PickRequest::game())));
    }

    #[test]
    fn test_scenario_a_start_now() {
        let mut flow = fresh_flow_at_chooser();
        assert!(matches!(
            flow.state(),
            FlowState::ChoosingAction { suggested_label, .. } if suggested_label == "primary:Games/zelda.nsp"
        ));

        flow.choose(ActionChoice::StartNow);

        let platform = flow.platform();
        assert_eq!(platform.started.len(), 1);
        assert_eq!(platform.started[0].variant, LaunchVariant::Primary);
        assert_eq!(platform.started[0].grant, Permissions::READ_WRITE);
        assert_eq!(platform.started[0].content_type, WILDCARD_TYPE);
        assert!(platform.calls.contains(&Call::Persist(zelda(), Permissions::READ_WRITE)));
        assert_eq!(flow.exit(), Some(FlowExit::Launched(LaunchVariant::Primary)));
    }

    #[test]
    fn test_scenario_b_shortcut_with_cancelled_icon() {
        let mut flow = fresh_flow_at_chooser();

        flow.choose(ActionChoice::CreateShortcut { label_input: "Zelda".to_string() });
        assert_eq!(flow.state(), &FlowState::AwaitingIconPick);
        assert_eq!(
            flow.pending_shortcut(),
            Some(&PendingShortcutRequest { game: zelda(), label: "Zelda".to_string(), awaiting_icon: true })
        );

        flow.on_result(RequestTag::PickIcon, PickOutcome::Cancelled);

        let platform = flow.platform();
        assert_eq!(platform.pinned.len(), 1);
        let descriptor = &platform.pinned[0];
        assert_eq!(descriptor.long_label, "Zelda");
        assert_eq!(descriptor.short_label, "Zelda");
        assert!(matches!(descriptor.icon, ShortcutIcon::Default(_)));
        assert_eq!(descriptor.launch.data, zelda());
        assert!(platform.started.is_empty());
        assert_eq!(platform.toasts.last().unwrap().0, "Shortcut “Zelda” created.");
        assert_eq!(flow.exit(), Some(FlowExit::ShortcutCreated));
        assert!(flow.pending_shortcut().is_none());
    }

    #[test]
    fn test_scenario_c_shortcut_without_grant_reprompts() {
        let mut flow = flow(MockPlatform::default());
        flow.start(&shortcut_signal(&zelda()));

        assert_eq!(flow.state(), &FlowState::AwaitingFilePick);
        assert_eq!(flow.platform().toasts[0].0, MSG_REGRANT);
        assert_eq!(flow.platform().picks(), vec![RequestTag::PickGame]);
        assert!(flow.platform().started.is_empty());
    }

    #[test]
    fn test_direct_launch_with_durable_grant_skips_pick() {
        let mut platform = MockPlatform::default();
        platform.add_durable(&zelda(), Permissions::READ_WRITE);
        let mut flow = flow(platform);

        flow.start(&shortcut_signal(&zelda()));

        assert!(flow.platform().picks().is_empty());
        assert!(flow.platform().toasts.is_empty());
        assert_eq!(flow.platform().started.len(), 1);
        assert_eq!(flow.platform().started[0].data, zelda());
        assert_eq!(flow.exit(), Some(FlowExit::Launched(LaunchVariant::Primary)));
    }

    #[test]
    fn test_direct_launch_from_data_reference() {
        let mut platform = MockPlatform::default();
        platform.add_durable(&zelda(), Permissions::READ);
        let mut flow = flow(platform);

        flow.start(&StartupSignal { boot_path: None, data: Some(zelda()) });

        assert_eq!(flow.exit(), Some(FlowExit::Launched(LaunchVariant::Primary)));
    }

    #[test]
    fn test_cancelled_game_pick_ends_flow() {
        let mut flow = flow(MockPlatform::default());
        flow.start(&StartupSignal::default());
        flow.acknowledge_instructions();
        flow.on_result(RequestTag::PickGame, PickOutcome::Cancelled);

        assert_eq!(flow.exit(), Some(FlowExit::PickCancelled));
        assert!(flow.platform().started.is_empty());
        assert_eq!(flow.platform().registrations(), 0);
    }

    #[test]
    fn test_cancel_in_chooser_ends_flow() {
        let mut flow = fresh_flow_at_chooser();
        flow.choose(ActionChoice::Cancel);

        assert_eq!(flow.exit(), Some(FlowExit::Cancelled));
        assert!(flow.platform().started.is_empty());
        assert_eq!(flow.platform().registrations(), 0);
        assert!(flow.platform().toasts.is_empty());
    }

    #[test]
    fn test_create_shortcut_persists_before_icon_pick() {
        let mut flow = fresh_flow_at_chooser();
        flow.choose(ActionChoice::CreateShortcut { label_input: String::new() });

        let calls = &flow.platform().calls;
        let persist = calls.iter().position(|c| *c == Call::Persist(zelda(), Permissions::READ_WRITE));
        let pick = calls.iter().position(|c| matches!(c, Call::Pick(RequestTag::PickIcon, _)));
        assert!(persist.unwrap() < pick.unwrap());
    }

    #[test]
    fn test_blank_label_uses_suggestion() {
        let mut flow = fresh_flow_at_chooser();
        flow.choose(ActionChoice::CreateShortcut { label_input: "   ".to_string() });

        assert_eq!(flow.pending_shortcut().unwrap().label, "primary:Games/zelda.nsp");
    }

    #[test]
    fn test_shortcut_with_picked_icon() {
        let mut flow = fresh_flow_at_chooser();
        let icon = reference("content://media/external/images/7");
        flow.platform_mut().images.insert(
            icon.clone(),
            crate::models::Bitmap { width: 2, height: 2, rgba: vec![0; 16] },
        );

        flow.choose(ActionChoice::CreateShortcut { label_input: "Zelda".to_string() });
        flow.on_result(RequestTag::PickIcon, PickOutcome::Picked(icon.clone()));

        let platform = flow.platform();
        assert!(matches!(platform.pinned[0].icon, ShortcutIcon::Bitmap(_)));
        assert!(platform.calls.contains(&Call::Persist(icon, Permissions::READ)));
        assert_eq!(flow.exit(), Some(FlowExit::ShortcutCreated));
    }

    #[test]
    fn test_undecodable_icon_still_creates_shortcut() {
        let mut flow = fresh_flow_at_chooser();
        flow.choose(ActionChoice::CreateShortcut { label_input: "Zelda".to_string() });
        flow.on_result(
            RequestTag::PickIcon,
            PickOutcome::Picked(reference("content://media/external/images/broken")),
        );

        assert!(flow.platform().pinned[0].icon.is_default());
        assert_eq!(flow.exit(), Some(FlowExit::ShortcutCreated));
    }

    #[test]
    fn test_icon_result_without_pending_request() {
        // Simulates a process restarted while the icon picker was open.
        let mut flow = flow(MockPlatform::default());
        flow.on_result(
            RequestTag::PickIcon,
            PickOutcome::Picked(reference("content://media/external/images/7")),
        );

        assert_eq!(flow.platform().toasts[0].0, MSG_SHORTCUT_CANCELLED);
        assert_eq!(flow.platform().registrations(), 0);
        assert_eq!(flow.exit(), Some(FlowExit::ShortcutAbandoned));
    }

    #[test]
    fn test_icon_result_for_request_not_awaiting_icon() {
        let mut flow = fresh_flow_at_chooser();
        flow.choose(ActionChoice::CreateShortcut { label_input: "Zelda".to_string() });
        if let Some(pending) = flow.pending_shortcut.as_mut() {
            pending.awaiting_icon = false;
        }

        flow.on_result(RequestTag::PickIcon, PickOutcome::Cancelled);

        assert_eq!(flow.platform().registrations(), 0);
        assert_eq!(flow.pending_shortcut(), None);
        assert_eq!(flow.exit(), Some(FlowExit::ShortcutAbandoned));
    }

    #[test]
    fn test_game_result_after_restart_reaches_chooser() {
        let mut flow = flow(MockPlatform::default());
        flow.on_result(RequestTag::PickGame, PickOutcome::Picked(zelda()));

        assert!(matches!(flow.state(), FlowState::ChoosingAction { game, .. } if *game == zelda()));
    }

    #[test]
    fn test_registration_unsupported_reports_failure() {
        let mut flow = fresh_flow_at_chooser();
        flow.platform_mut().capabilities = crate::platform::ShortcutCapabilities::default();

        flow.choose(ActionChoice::CreateShortcut { label_input: "Zelda".to_string() });
        flow.on_result(RequestTag::PickIcon, PickOutcome::Cancelled);

        assert_eq!(flow.platform().toasts.last().unwrap().0, MSG_SHORTCUT_FAILED);
        assert_eq!(flow.exit(), Some(FlowExit::ShortcutFailed));
        assert!(flow.pending_shortcut().is_none());
    }

    #[test]
    fn test_launch_failure_still_finishes() {
        let mut platform = MockPlatform::default();
        platform.fail_primary = true;
        platform.fail_fallback = true;
        platform.add_durable(&zelda(), Permissions::READ_WRITE);
        let mut flow = flow(platform);

        flow.start(&shortcut_signal(&zelda()));

        assert_eq!(flow.exit(), Some(FlowExit::LaunchFailed));
        assert_eq!(flow.platform().started.len(), 2);
    }

    #[test]
    fn test_events_after_finish_are_ignored() {
        let mut flow = fresh_flow_at_chooser();
        flow.choose(ActionChoice::Cancel);
        let calls = flow.platform().calls.len();

        flow.on_result(RequestTag::PickGame, PickOutcome::Picked(zelda()));
        flow.choose(ActionChoice::StartNow);
        flow.acknowledge_instructions();

        assert_eq!(flow.platform().calls.len(), calls);
        assert_eq!(flow.exit(), Some(FlowExit::Cancelled));
    }

    #[test]
    fn test_choose_outside_chooser_is_ignored() {
        let mut flow = flow(MockPlatform::default());
        flow.start(&StartupSignal::default());
        flow.choose(ActionChoice::StartNow);

        assert_eq!(flow.state(), &FlowState::ShowingInstructions);
        assert!(flow.platform().started.is_empty());
    }
}
