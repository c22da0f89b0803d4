use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Client number of a tracked actor.
pub type ActorId = u32;

/// Game time in milliseconds. Signed because padded windows may start before 0.
pub type Timestamp = i64;

/// World position plus view orientation of an actor at one instant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    /// Vertical axis
    pub z: f64,
    /// Degrees, clockwise from +Y
    pub yaw: f64,
    /// Degrees, elevation above the horizontal plane
    pub pitch: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64, yaw: f64, pitch: f64) -> Self {
        Self {
            x,
            y,
            z,
            yaw,
            pitch,
        }
    }

    pub fn coords(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }
}

/// One-way network latency measured for an actor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LatencySample {
    pub latency_ms: u32,
}

/// Weapons selectable for the shot filter.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Weapon {
    Fist,
    Sg,
    Cg,
    Rl,
    #[default]
    Rifle,
    Gl,
    Pistol,
}

impl Weapon {
    pub const ALL: [Weapon; 7] = [
        Weapon::Fist,
        Weapon::Sg,
        Weapon::Cg,
        Weapon::Rl,
        Weapon::Rifle,
        Weapon::Gl,
        Weapon::Pistol,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weapon::Fist => "FIST",
            Weapon::Sg => "SG",
            Weapon::Cg => "CG",
            Weapon::Rl => "RL",
            Weapon::Rifle => "RIFLE",
            Weapon::Gl => "GL",
            Weapon::Pistol => "PISTOL",
        }
    }
}

impl fmt::Display for Weapon {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weapon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weapon::ALL
            .iter()
            .copied()
            .find(|w| w.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown weapon '{}' (expected FIST | SG | CG | RL | RIFLE | GL | PISTOL)",
                    s
                )
            })
    }
}

/// Discrete event payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    Shot {
        gun: Weapon,
    },
    Hit {
        victim: ActorId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        gun: Option<Weapon>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        damage: Option<f64>,
    },
    Kill {
        victim: ActorId,
    },
    Spawn,
    #[serde(other)]
    Other,
}

impl EventKind {
    /// Weapon discharged by this event, if it is a firing action.
    pub fn fired_weapon(&self) -> Option<Weapon> {
        match self {
            EventKind::Shot { gun } => Some(*gun),
            _ => None,
        }
    }

    /// True if this is a hit landed on `target`.
    pub fn is_hit_on(&self, target: ActorId) -> bool {
        matches!(self, EventKind::Hit { victim, .. } if *victim == target)
    }
}

/// An event in one actor's own stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscreteEvent {
    pub ts: Timestamp,
    pub actor: ActorId,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl DiscreteEvent {
    pub fn new(ts: Timestamp, actor: ActorId, kind: EventKind) -> Self {
        Self { ts, actor, kind }
    }
}
