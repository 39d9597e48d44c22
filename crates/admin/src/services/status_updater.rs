//! Optimistic order status updates.
//!
//! [`StatusUpdater`] is the state machine for one order's status control:
//!
//! ```text
//! Idle --begin--> Pending { original, requested } --resolve--> Idle
//!                                                  (Committed | RolledBack)
//! ```
//!
//! While pending, the displayed status is the requested one and further
//! changes are rejected. On failure the order reverts to the `original`
//! snapshot held in the pending state. An authentication failure also ends
//! the session.
//!
//! [`StatusControl`] drives the machine against an [`OrderStatusGateway`]
//! from async code. Its lock is held only for state transitions, never
//! across the network call.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tracing::{info, instrument, warn};

use senji_core::{Order, OrderId, OrderStatus};

use super::Navigation;
use crate::api::{ApiClient, ApiError};

/// A status change was attempted while another is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusChangeRejected {
    #[error("A status update for order #{} is already in progress", .0.short())]
    InFlight(OrderId),
}

/// Request to send for an accepted status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRequest {
    pub order_id: OrderId,
    pub status: OrderStatus,
}

/// How a status change ended.
#[derive(Debug, Clone)]
pub enum StatusOutcome {
    /// The requested status was already displayed; nothing was sent.
    Unchanged,
    /// The backend accepted the change.
    Committed(Order),
    /// The backend refused or could not be reached; the order reverted.
    RolledBack { order: Order, error: ApiError },
    /// The backend rejected the session; the order reverted and the caller
    /// must return to the login screen.
    SessionExpired { order: Order, navigate: Navigation },
}

impl StatusOutcome {
    /// The order the parent view should now show, if it changed hands.
    #[must_use]
    pub const fn order(&self) -> Option<&Order> {
        match self {
            Self::Unchanged => None,
            Self::Committed(order)
            | Self::RolledBack { order, .. }
            | Self::SessionExpired { order, .. } => Some(order),
        }
    }
}

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    Pending {
        original: Order,
        requested: OrderStatus,
    },
}

/// Status state machine for a single order.
#[derive(Debug, Clone)]
pub struct StatusUpdater {
    order: Order,
    phase: Phase,
}

impl StatusUpdater {
    #[must_use]
    pub const fn new(order: Order) -> Self {
        Self {
            order,
            phase: Phase::Idle,
        }
    }

    /// The last confirmed copy of the order.
    #[must_use]
    pub const fn order(&self) -> &Order {
        &self.order
    }

    /// The status to show: the requested one while a change is pending.
    #[must_use]
    pub const fn displayed(&self) -> OrderStatus {
        match &self.phase {
            Phase::Idle => self.order.status,
            Phase::Pending { requested, .. } => *requested,
        }
    }

    /// Whether a change is in flight.
    #[must_use]
    pub const fn is_updating(&self) -> bool {
        matches!(self.phase, Phase::Pending { .. })
    }

    /// Start a change to `requested`.
    ///
    /// Returns the request to send, or `None` when `requested` is already
    /// the displayed status.
    ///
    /// # Errors
    ///
    /// Returns `StatusChangeRejected::InFlight` while a change is pending.
    pub fn begin(
        &mut self,
        requested: OrderStatus,
    ) -> Result<Option<StatusRequest>, StatusChangeRejected> {
        if self.is_updating() {
            return Err(StatusChangeRejected::InFlight(self.order.id.clone()));
        }
        if requested == self.order.status {
            return Ok(None);
        }
        self.phase = Phase::Pending {
            original: self.order.clone(),
            requested,
        };
        Ok(Some(StatusRequest {
            order_id: self.order.id.clone(),
            status: requested,
        }))
    }

    /// Settle the pending change with the backend's answer.
    ///
    /// A success without an order in the response commits a locally
    /// patched copy. Resolving while idle is a no-op.
    pub fn resolve(&mut self, result: Result<Option<Order>, ApiError>) -> StatusOutcome {
        let Phase::Pending {
            original,
            requested,
        } = std::mem::replace(&mut self.phase, Phase::Idle)
        else {
            return StatusOutcome::Unchanged;
        };

        match result {
            Ok(confirmed) => {
                self.order = confirmed.unwrap_or_else(|| original.with_status(requested));
                StatusOutcome::Committed(self.order.clone())
            }
            Err(error) if error.is_unauthorized() => {
                self.order = original;
                StatusOutcome::SessionExpired {
                    order: self.order.clone(),
                    navigate: Navigation::Login,
                }
            }
            Err(error) => {
                self.order = original;
                StatusOutcome::RolledBack {
                    order: self.order.clone(),
                    error,
                }
            }
        }
    }
}

/// Backend operations the status control needs.
pub trait OrderStatusGateway {
    /// Send the new status; `Ok(None)` when the response omits the order.
    fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> impl Future<Output = Result<Option<Order>, ApiError>> + Send;

    /// Drop all stored credentials after an authentication failure.
    fn end_session(&self) -> Navigation;
}

impl OrderStatusGateway for ApiClient {
    fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> impl Future<Output = Result<Option<Order>, ApiError>> + Send {
        Self::update_order_status(self, id, status)
    }

    fn end_session(&self) -> Navigation {
        self.credentials().clear();
        Navigation::Login
    }
}

/// Shared, single-flight status control for one order.
///
/// Clones share the same state machine.
#[derive(Debug, Clone)]
pub struct StatusControl {
    state: Arc<Mutex<StatusUpdater>>,
}

impl StatusControl {
    #[must_use]
    pub fn new(order: Order) -> Self {
        Self {
            state: Arc::new(Mutex::new(StatusUpdater::new(order))),
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut StatusUpdater) -> T) -> T {
        f(&mut self.state.lock().unwrap_or_else(PoisonError::into_inner))
    }

    #[must_use]
    pub fn displayed(&self) -> OrderStatus {
        self.with_state(|state| state.displayed())
    }

    #[must_use]
    pub fn is_updating(&self) -> bool {
        self.with_state(|state| state.is_updating())
    }

    #[must_use]
    pub fn order(&self) -> Order {
        self.with_state(|state| state.order().clone())
    }

    /// Replace the order shown by this control, e.g. after a reload.
    ///
    /// Ignored while a change is in flight.
    pub fn refresh(&self, order: Order) {
        self.with_state(|state| {
            if !state.is_updating() {
                *state = StatusUpdater::new(order);
            }
        });
    }

    /// Change the order's status optimistically.
    ///
    /// `on_change` receives the order the parent should display whenever
    /// the change settles: the backend's copy on success, the original on
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns `StatusChangeRejected::InFlight` if another change on this
    /// control has not resolved yet.
    #[instrument(skip(self, gateway, on_change))]
    pub async fn change<G>(
        &self,
        gateway: &G,
        requested: OrderStatus,
        mut on_change: impl FnMut(&Order),
    ) -> Result<StatusOutcome, StatusChangeRejected>
    where
        G: OrderStatusGateway + Sync,
    {
        let Some(request) = self.with_state(|state| state.begin(requested))? else {
            return Ok(StatusOutcome::Unchanged);
        };

        let guard = PendingGuard::new(self);
        let result = gateway
            .update_order_status(&request.order_id, request.status)
            .await;
        guard.disarm();
        let outcome = self.with_state(|state| state.resolve(result));

        match &outcome {
            StatusOutcome::Committed(order) => {
                info!(status = %order.status, "Order status updated");
            }
            StatusOutcome::RolledBack { order, error } => {
                warn!(error = %error, reverted_to = %order.status, "Status update failed, rolled back");
            }
            StatusOutcome::SessionExpired { order, .. } => {
                warn!(reverted_to = %order.status, "Session expired during status update");
                gateway.end_session();
            }
            StatusOutcome::Unchanged => {}
        }
        if let Some(order) = outcome.order() {
            on_change(order);
        }

        Ok(outcome)
    }
}

/// Rolls a pending change back if the future driving it is dropped before
/// the backend answers.
struct PendingGuard<'a> {
    control: Option<&'a StatusControl>,
}

impl<'a> PendingGuard<'a> {
    const fn new(control: &'a StatusControl) -> Self {
        Self {
            control: Some(control),
        }
    }

    fn disarm(mut self) {
        self.control = None;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if let Some(control) = self.control.take() {
            let outcome = control.with_state(|state| {
                state.resolve(Err(ApiError::Network(
                    "status update cancelled before the backend answered".to_string(),
                )))
            });
            if let Some(order) = outcome.order() {
                warn!(reverted_to = %order.status, "Status update cancelled, rolled back");
            }
        }
    }
}
