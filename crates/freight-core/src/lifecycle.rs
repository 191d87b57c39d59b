//! Shipment status lifecycle.
//!
//! Legal moves between statuses live in a single constant table;
//! `arrived` and `cancelled` are terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// Reason recorded for a delay or cancellation when the caller gives none.
pub const DEFAULT_REASON: &str = "No reason provided";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Pending,
    Departed,
    InTransit,
    Arrived,
    Delayed,
    Cancelled,
}

impl StatusKind {
    pub const ALL: [StatusKind; 6] = [
        StatusKind::Pending,
        StatusKind::Departed,
        StatusKind::InTransit,
        StatusKind::Arrived,
        StatusKind::Delayed,
        StatusKind::Cancelled,
    ];

    fn index(self) -> usize {
        match self {
            StatusKind::Pending => 0,
            StatusKind::Departed => 1,
            StatusKind::InTransit => 2,
            StatusKind::Arrived => 3,
            StatusKind::Delayed => 4,
            StatusKind::Cancelled => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::Pending => "pending",
            StatusKind::Departed => "departed",
            StatusKind::InTransit => "in_transit",
            StatusKind::Arrived => "arrived",
            StatusKind::Delayed => "delayed",
            StatusKind::Cancelled => "cancelled",
        }
    }

    /// Urgency rank, 1 is most urgent.
    pub fn priority(&self) -> u8 {
        match self {
            StatusKind::Delayed => 1,
            StatusKind::Pending => 2,
            StatusKind::Departed => 3,
            StatusKind::InTransit => 4,
            StatusKind::Arrived => 5,
            StatusKind::Cancelled => 6,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            StatusKind::Pending => "#f59e0b",
            StatusKind::Departed => "#3b82f6",
            StatusKind::InTransit => "#8b5cf6",
            StatusKind::Arrived => "#10b981",
            StatusKind::Delayed => "#ef4444",
            StatusKind::Cancelled => "#6b7280",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            StatusKind::Pending => "clock",
            StatusKind::Departed => "plane-departure",
            StatusKind::InTransit => "truck",
            StatusKind::Arrived => "check-circle",
            StatusKind::Delayed => "exclamation-triangle",
            StatusKind::Cancelled => "times-circle",
        }
    }

    /// Whether this status records a free-text reason.
    pub fn takes_reason(&self) -> bool {
        matches!(self, StatusKind::Delayed | StatusKind::Cancelled)
    }

    pub fn is_terminal(&self) -> bool {
        allowed_transitions(*self).is_empty()
    }

    pub fn can_transition_to(&self, next: StatusKind) -> bool {
        can_transition(*self, next)
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        StatusKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| CoreError::UnknownStatusKind(s.to_string()))
    }
}

const F: bool = false;
const T: bool = true;

/// `TRANSITIONS[from][to]`, indexed in `StatusKind::ALL` order:
/// pending, departed, in_transit, arrived, delayed, cancelled.
const TRANSITIONS: [[bool; 6]; 6] = [
    [F, T, F, F, F, T], // pending
    [F, F, T, F, T, T], // departed
    [F, F, F, T, T, F], // in_transit
    [F, F, F, F, F, F], // arrived
    [F, T, T, T, F, T], // delayed
    [F, F, F, F, F, F], // cancelled
];

/// Whether moving from `current` to `next` is legal.
pub fn can_transition(current: StatusKind, next: StatusKind) -> bool {
    TRANSITIONS[current.index()][next.index()]
}

/// Every status reachable in one step from `current`.
pub fn allowed_transitions(current: StatusKind) -> Vec<StatusKind> {
    StatusKind::ALL
        .into_iter()
        .filter(|next| can_transition(current, *next))
        .collect()
}

/// A status assigned to a shipment at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "StatusPayload")]
pub struct ShipmentStatus {
    pub kind: StatusKind,
    pub timestamp: DateTime<Utc>,
    /// Only set for delayed and cancelled statuses
    pub reason: Option<String>,
}

impl ShipmentStatus {
    /// Build a status of the given kind. A reason is kept only for kinds that take one.
    pub fn new(kind: StatusKind, reason: Option<String>) -> Self {
        let reason = if kind.takes_reason() {
            Some(
                reason
                    .map(|r| r.trim().to_string())
                    .filter(|r| !r.is_empty())
                    .unwrap_or_else(|| DEFAULT_REASON.to_string()),
            )
        } else {
            None
        };
        Self {
            kind,
            timestamp: Utc::now(),
            reason,
        }
    }

    pub fn description(&self) -> String {
        let reason = self.reason.as_deref().unwrap_or(DEFAULT_REASON);
        match self.kind {
            StatusKind::Pending => "Shipment is awaiting departure".to_string(),
            StatusKind::Departed => "Shipment has departed origin".to_string(),
            StatusKind::InTransit => "Shipment is in transit".to_string(),
            StatusKind::Arrived => "Shipment has arrived at destination".to_string(),
            StatusKind::Delayed => format!("Shipment is delayed: {reason}"),
            StatusKind::Cancelled => format!("Shipment was cancelled: {reason}"),
        }
    }

    pub fn priority(&self) -> u8 {
        self.kind.priority()
    }

    pub fn can_transition_to(&self, next: StatusKind) -> bool {
        self.kind.can_transition_to(next)
    }
}

/// Create a status by name. Fails with [`CoreError::UnknownStatusKind`] for unrecognized names.
pub fn create_status(name: &str, reason: Option<&str>) -> CoreResult<ShipmentStatus> {
    let kind: StatusKind = name.parse()?;
    Ok(ShipmentStatus::new(kind, reason.map(str::to_string)))
}

/// Sort statuses most urgent first. Ties keep their order.
pub fn sort_by_urgency(statuses: &mut [ShipmentStatus]) {
    statuses.sort_by_key(ShipmentStatus::priority);
}

/// Wire form of a status.
#[derive(Debug, Clone, Serialize)]
pub struct StatusPayload {
    pub name: StatusKind,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub color: &'static str,
    pub icon: &'static str,
    pub priority: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<ShipmentStatus> for StatusPayload {
    fn from(status: ShipmentStatus) -> Self {
        Self {
            name: status.kind,
            timestamp: status.timestamp,
            description: status.description(),
            color: status.kind.color(),
            icon: status.kind.icon(),
            priority: status.kind.priority(),
            reason: status.reason,
        }
    }
}

/// A request to move a shipment to a new status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    pub current_status: String,
    pub requested_status: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionOutcome {
    pub accepted: bool,
    pub from: StatusKind,
    pub to: StatusKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ShipmentStatus>,
}

/// Decide a transition request.
///
/// Unknown status names are errors; an illegal move is a rejected outcome.
pub fn request_transition(request: &TransitionRequest) -> CoreResult<TransitionOutcome> {
    let from: StatusKind = request.current_status.parse()?;
    let to: StatusKind = request.requested_status.parse()?;

    if !can_transition(from, to) {
        tracing::debug!(%from, %to, "rejected status transition");
        return Ok(TransitionOutcome {
            accepted: false,
            from,
            to,
            status: None,
        });
    }

    tracing::debug!(%from, %to, "accepted status transition");
    Ok(TransitionOutcome {
        accepted: true,
        from,
        to,
        status: Some(ShipmentStatus::new(to, request.reason.clone())),
    })
}
