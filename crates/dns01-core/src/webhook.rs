//! Challenge payload handling
//!
//! Maps an orchestrator [`ChallengePayload`] onto the registered solver and
//! fills in the payload's `response`. Transport (HTTP, routing, TLS) is the
//! daemon's concern; this module only decides what the answer is.

use tracing::{error, info};

use crate::challenge::{ChallengeAction, ChallengePayload, ChallengeResponse};
use crate::registry::SolverRegistry;

/// Run the request in `payload` against the solver named `solver_name`
///
/// Never fails: solver errors become a response with `success = false` and
/// the error text as the status message, which is what the orchestrator
/// shows the user.
pub async fn handle_payload(
    registry: &SolverRegistry,
    solver_name: &str,
    mut payload: ChallengePayload,
) -> ChallengePayload {
    let Some(request) = payload.request.as_ref() else {
        payload.response = Some(ChallengeResponse::failure(
            "",
            "no challenge request in payload",
        ));
        return payload;
    };

    let Some(solver) = registry.get(solver_name) else {
        error!("Challenge {} addressed to unknown solver {}", request.uid, solver_name);
        payload.response = Some(ChallengeResponse::failure(
            request.uid.clone(),
            format!("no solver registered with name \"{}\"", solver_name),
        ));
        return payload;
    };

    let result = match request.action {
        ChallengeAction::Present => solver.present(request).await,
        ChallengeAction::CleanUp => solver.clean_up(request).await,
    };

    let response = match result {
        Ok(()) => {
            info!(
                "Challenge {} ({:?} {}) succeeded",
                request.uid, request.action, request.resolved_fqdn
            );
            ChallengeResponse::success(request.uid.clone())
        }
        Err(e) => {
            error!(
                "Challenge {} ({:?} {}) failed: {}",
                request.uid, request.action, request.resolved_fqdn, e
            );
            ChallengeResponse::failure(request.uid.clone(), e.to_string())
        }
    };

    payload.response = Some(response);
    payload
}
