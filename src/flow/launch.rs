use tracing::{debug, info, warn};

use crate::flow::permissions::request_durable;
use crate::models::{
    FileReference, LaunchRequest, LaunchVariant, Permissions, TargetConfig, ToastDuration,
    WILDCARD_TYPE,
};
use crate::platform::{GrantTable, Notifier, TargetLauncher};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    Launched(LaunchVariant),
    Failed,
}

/// Hands the game to the executor: primary request first, the generic view
/// request only if the primary could not be issued. The caller ends the
/// flow whatever this returns.
pub fn dispatch<P>(platform: &mut P, target: &TargetConfig, game: &FileReference) -> DispatchOutcome
where
    P: GrantTable + TargetLauncher + Notifier + ?Sized,
{
    let content_type = platform
    .content_type(game)
    .unwrap_or_else(|| WILDCARD_TYPE.to_string());

    if let Err(e) = request_durable(platform, game, Permissions::READ_WRITE) {
        debug!("Launching without durable grant: {}", e);
    }

    if let Err(e) = platform.grant_to_target(&target.package, game, Permissions::READ_WRITE) {
        debug!("Explicit grant to {} skipped: {}", target.package, e);
    }

    let primary = LaunchRequest::primary(target, game, &content_type);
    let fallback = LaunchRequest::fallback(target, game, &content_type);

    match platform.start(&primary) {
        Ok(()) => {
            info!("Launched {} via {}", game, primary.action);
            DispatchOutcome::Launched(LaunchVariant::Primary)
        }
        Err(primary_err) => {
            warn!("Primary launch failed ({}), trying {}", primary_err, fallback.action);
            match platform.start(&fallback) {
                Ok(()) => {
                    info!("Launched {} via {}", game, fallback.action);
                    DispatchOutcome::Launched(LaunchVariant::Fallback)
                }
                Err(fallback_err) => {
                    warn!("Fallback launch failed: {}", fallback_err);
                    platform.toast(&format!("Start failed: {}", fallback_err), ToastDuration::Long);
                    DispatchOutcome::Failed
                }
            }
        }
    }
}
