//! Planning session: owns a route and its presentation state, and runs
//! feasibility requests as background tasks whose results are integrated back
//! on the session's own context.
//!
//! At most one request is in flight. Starting a new one aborts the previous
//! task, and any outcome that does not carry the current ticket is dropped.
//! Each request reports on its own channel, so a task that dies without a
//! result closes that channel instead of leaving the session waiting.
//! Dropping the session aborts the in-flight task; a result that races the
//! abort lands in a closed channel and is discarded.

use std::fmt;
use std::sync::Arc;

use aero_core::{build_request, Coordinate, FeasibilityResponse, PlanningError, RoutePlan, SafetyPolicy};
use aero_ffm::{FfmClient, FfmError, PlanMode};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::integration::Presentation;

const EVENT_CAPACITY: usize = 64;

/// Identity of one feasibility request issued by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlanTicket(u64);

impl fmt::Display for PlanTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "plan-{}", self.0)
    }
}

/// Change notifications for whoever renders the session.
#[derive(Debug, Clone, PartialEq)]
pub enum PlannerEvent {
    RouteChanged,
    PlanRequested(PlanTicket),
    PlanSuperseded(PlanTicket),
    PlanApplied(PlanTicket),
    PlanFailed { ticket: PlanTicket, advisory: String },
}

/// Result of a feasibility request, tagged with the ticket that issued it.
#[derive(Debug)]
pub struct PlanOutcome {
    pub ticket: PlanTicket,
    pub result: Result<FeasibilityResponse, FfmError>,
}

/// How a [`PlanningSession::compute_plan`] call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStatus {
    /// The route has no leg; nothing was sent.
    Declined,
    Applied,
    Failed,
}

struct InFlight {
    ticket: PlanTicket,
    handle: JoinHandle<()>,
}

pub struct PlanningSession {
    route: RoutePlan,
    policy: SafetyPolicy,
    presentation: Presentation,
    client: Arc<FfmClient>,
    mode: PlanMode,
    events: broadcast::Sender<PlannerEvent>,
    outcomes_rx: mpsc::UnboundedReceiver<PlanOutcome>,
    in_flight: Option<InFlight>,
    next_ticket: u64,
}

impl PlanningSession {
    /// Create a session with an empty route, using the client's default mode.
    pub fn new(client: Arc<FfmClient>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        // Closed until the first request opens its own channel.
        let (_, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            route: RoutePlan::new(),
            policy: SafetyPolicy::default(),
            presentation: Presentation::new(),
            mode: client.default_mode(),
            client,
            events,
            outcomes_rx,
            in_flight: None,
            next_ticket: 1,
        }
    }

    pub fn with_route(mut self, route: RoutePlan) -> Self {
        self.route = route;
        self
    }

    pub fn with_policy(mut self, policy: SafetyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_mode(mut self, mode: PlanMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlannerEvent> {
        self.events.subscribe()
    }

    pub fn route(&self) -> &RoutePlan {
        &self.route
    }

    pub fn policy(&self) -> &SafetyPolicy {
        &self.policy
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn mode(&self) -> PlanMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: PlanMode) {
        self.mode = mode;
    }

    pub fn set_policy(&mut self, policy: SafetyPolicy) {
        self.policy = policy;
    }

    /// Mutate the route and notify subscribers.
    pub fn edit_route<R>(&mut self, edit: impl FnOnce(&mut RoutePlan) -> R) -> R {
        let result = edit(&mut self.route);
        self.notify(PlannerEvent::RouteChanged);
        result
    }

    pub fn add_waypoint(&mut self, coordinate: Coordinate, name: Option<&str>) {
        self.edit_route(|route| route.add_waypoint(coordinate, name));
    }

    pub fn clear_route(&mut self) {
        self.edit_route(RoutePlan::clear);
    }

    pub fn in_flight(&self) -> Option<PlanTicket> {
        self.in_flight.as_ref().map(|f| f.ticket)
    }

    /// Start a feasibility request for the current route.
    ///
    /// Returns `None` without touching any state when the route has fewer than
    /// two waypoints. Must be called from within a tokio runtime.
    pub fn request_plan(&mut self) -> Option<PlanTicket> {
        let request = match build_request(&mut self.route, &self.policy) {
            Ok(request) => request,
            Err(PlanningError::InsufficientRoute { waypoints }) => {
                tracing::debug!(waypoints, "Plan request declined, route has no leg");
                return None;
            }
        };

        self.cancel_in_flight();

        let ticket = PlanTicket(self.next_ticket);
        self.next_ticket += 1;

        let client = self.client.clone();
        let (tx, rx) = mpsc::unbounded_channel();
        self.outcomes_rx = rx;
        let mode = self.mode;
        let handle = tokio::spawn(async move {
            let result = client.plan(&request, mode).await;
            // The receiver is gone once the session is dropped.
            let _ = tx.send(PlanOutcome { ticket, result });
        });

        tracing::info!(%ticket, mode = mode.as_str(), "Feasibility plan requested");
        self.in_flight = Some(InFlight { ticket, handle });
        self.notify(PlannerEvent::PlanRequested(ticket));
        Some(ticket)
    }

    /// Abort the in-flight request, if any. Returns true if one was aborted.
    pub fn cancel_in_flight(&mut self) -> bool {
        let Some(previous) = self.in_flight.take() else {
            return false;
        };
        previous.handle.abort();
        tracing::debug!(ticket = %previous.ticket, "Superseded in-flight plan request");
        self.notify(PlannerEvent::PlanSuperseded(previous.ticket));
        true
    }

    /// Wait for the outcome of the current request. `None` once that request
    /// can no longer report, or when nothing was requested.
    pub async fn next_outcome(&mut self) -> Option<PlanOutcome> {
        self.outcomes_rx.recv().await
    }

    /// Integrate an outcome. Returns `None` if it belongs to a request that is
    /// no longer current.
    pub fn apply_outcome(&mut self, outcome: PlanOutcome) -> Option<PlanStatus> {
        if self.in_flight() != Some(outcome.ticket) {
            tracing::debug!(ticket = %outcome.ticket, "Discarding stale plan outcome");
            return None;
        }
        self.in_flight = None;

        match outcome.result {
            Ok(plan) => {
                tracing::info!(
                    ticket = %outcome.ticket,
                    polyline_points = plan.polyline.len(),
                    leg_risks = plan.leg_risks.len(),
                    "Applied feasibility plan"
                );
                self.presentation.apply_response(plan);
                self.notify(PlannerEvent::PlanApplied(outcome.ticket));
                Some(PlanStatus::Applied)
            }
            Err(error) => {
                tracing::warn!(ticket = %outcome.ticket, error = %error, "Feasibility planning failed");
                self.presentation.apply_failure(&error);
                self.notify(PlannerEvent::PlanFailed {
                    ticket: outcome.ticket,
                    advisory: self.presentation.advisory().to_string(),
                });
                Some(PlanStatus::Failed)
            }
        }
    }

    /// Request a plan and wait until its outcome has been integrated.
    pub async fn compute_plan(&mut self) -> PlanStatus {
        if self.request_plan().is_none() {
            return PlanStatus::Declined;
        }
        self.settle_in_flight().await
    }

    async fn settle_in_flight(&mut self) -> PlanStatus {
        while let Some(outcome) = self.next_outcome().await {
            if let Some(status) = self.apply_outcome(outcome) {
                return status;
            }
        }

        // The task ended without reporting, e.g. it panicked.
        let Some(lost) = self.in_flight.take() else {
            return PlanStatus::Failed;
        };
        tracing::warn!(ticket = %lost.ticket, "Plan request ended without a result");
        self.presentation.apply_failure(&"request ended without a result");
        self.notify(PlannerEvent::PlanFailed {
            ticket: lost.ticket,
            advisory: self.presentation.advisory().to_string(),
        });
        PlanStatus::Failed
    }

    fn notify(&self, event: PlannerEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

impl Drop for PlanningSession {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.handle.abort();
        }
    }
}
