//! Role and order status enums.

use serde::{Deserialize, Serialize};

/// Account role, assigned by the server at registration time.
///
/// The client records whatever role the server reports and never derives
/// one locally. Role-gated surfaces check against this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Places orders from a table; requires no login for guest flows.
    #[default]
    Customer,
    /// Works the order queue and dashboard.
    Staff,
    /// Manages the menu, tables, and analytics.
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Staff => write!(f, "staff"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "staff" => Ok(Self::Staff),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

/// Order status as reported by the kitchen.
///
/// `Placed -> Preparing -> Ready -> Served` is a linear progression; an order
/// may also end up `Canceled`, which sits outside the progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Placed,
    Preparing,
    Ready,
    Served,
    Canceled,
}

impl OrderStatus {
    /// The linear progression shown on the order tracking view.
    pub const PROGRESSION: [Self; 4] = [Self::Placed, Self::Preparing, Self::Ready, Self::Served];

    /// The next status in the progression, or `None` for terminal states.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Placed => Some(Self::Preparing),
            Self::Preparing => Some(Self::Ready),
            Self::Ready => Some(Self::Served),
            Self::Served | Self::Canceled => None,
        }
    }

    /// Zero-based position within the progression; `None` for canceled orders.
    #[must_use]
    pub fn position(self) -> Option<usize> {
        Self::PROGRESSION.iter().position(|s| *s == self)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Placed => write!(f, "placed"),
            Self::Preparing => write!(f, "preparing"),
            Self::Ready => write!(f, "ready"),
            Self::Served => write!(f, "served"),
            Self::Canceled => write!(f, "canceled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "placed" => Ok(Self::Placed),
            "preparing" => Ok(Self::Preparing),
            "ready" => Ok(Self::Ready),
            "served" => Ok(Self::Served),
            "canceled" => Ok(Self::Canceled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progression_is_linear() {
        assert_eq!(OrderStatus::Placed.next(), Some(OrderStatus::Preparing));
        assert_eq!(OrderStatus::Preparing.next(), Some(OrderStatus::Ready));
        assert_eq!(OrderStatus::Ready.next(), Some(OrderStatus::Served));
        assert_eq!(OrderStatus::Served.next(), None);
        assert_eq!(OrderStatus::Canceled.next(), None);
    }

    #[test]
    fn test_position_matches_progression() {
        assert_eq!(OrderStatus::Placed.position(), Some(0));
        assert_eq!(OrderStatus::Served.position(), Some(3));
        assert_eq!(OrderStatus::Canceled.position(), None);
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&OrderStatus::Preparing).expect("serialize");
        assert_eq!(json, "\"preparing\"");
    }

    #[test]
    fn test_role_round_trips_through_str() {
        for role in [Role::Customer, Role::Staff, Role::Admin] {
            let parsed: Role = role.to_string().parse().expect("parse");
            assert_eq!(parsed, role);
        }
        assert!("chef".parse::<Role>().is_err());
    }
}
