//! Subscriber identity captured from the contact form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Topic a visitor selects on the contact form.
///
/// Serialized as the human-readable label the webhook and the form both use.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Interest {
    #[serde(rename = "Quantum Computing")]
    QuantumComputing,
    #[serde(rename = "Web3")]
    Web3,
    #[serde(rename = "Robotics")]
    Robotics,
    #[serde(rename = "Artificial Intelligence")]
    ArtificialIntelligence,
    #[serde(rename = "Space Exploration")]
    SpaceExploration,
}

impl Interest {
    /// Every selectable topic, in form order.
    pub const ALL: [Interest; 5] = [
        Interest::QuantumComputing,
        Interest::Web3,
        Interest::Robotics,
        Interest::ArtificialIntelligence,
        Interest::SpaceExploration,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::QuantumComputing => "Quantum Computing",
            Self::Web3 => "Web3",
            Self::Robotics => "Robotics",
            Self::ArtificialIntelligence => "Artificial Intelligence",
            Self::SpaceExploration => "Space Exploration",
        }
    }
}

impl fmt::Display for Interest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a string is not one of the known topics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownInterest(pub String);

impl fmt::Display for UnknownInterest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown interest: {}", self.0)
    }
}

impl std::error::Error for UnknownInterest {}

impl FromStr for Interest {
    type Err = UnknownInterest;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|interest| interest.label() == trimmed)
            .ok_or_else(|| UnknownInterest(s.to_string()))
    }
}

/// Identity snapshot used to prefill the subscription modal.
///
/// Built once per modal session and never edited; the modal drops it on close.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SubscriberProfile {
    pub name: String,
    pub email: String,
    pub interest: Interest,
}

impl SubscriberProfile {
    pub fn new(name: impl Into<String>, email: impl Into<String>, interest: Interest) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            interest,
        }
    }
}
