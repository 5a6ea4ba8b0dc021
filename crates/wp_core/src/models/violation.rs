//! Violation records delivered by the contact, shot-clock and positional detectors.
//!
//! A `ViolationEvent` is consumed once by the officiating engine and is not kept
//! beyond the decision it produces.

use serde::{Deserialize, Serialize};

use super::{PlayerId, Position, TeamId};

/// Kind of physical contact reported by the contact detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactType {
    Strike,
    Submersion,
    Holding,
    Grabbing,
    Pulling,
    Pushing,
    Blocking,
    Other,
}

impl ContactType {
    pub const ALL: [ContactType; 8] = [
        ContactType::Strike,
        ContactType::Submersion,
        ContactType::Holding,
        ContactType::Grabbing,
        ContactType::Pulling,
        ContactType::Pushing,
        ContactType::Blocking,
        ContactType::Other,
    ];

    pub fn severity_multiplier(self) -> f32 {
        match self {
            ContactType::Strike => 2.0,
            ContactType::Submersion => 1.8,
            ContactType::Holding => 1.3,
            ContactType::Grabbing => 1.2,
            ContactType::Pulling => 1.1,
            ContactType::Pushing | ContactType::Blocking | ContactType::Other => 1.0,
        }
    }

    /// Hand-on-body contacts that a referee's hand-check strictness applies to.
    pub fn is_hand_check(self) -> bool {
        matches!(self, ContactType::Holding | ContactType::Grabbing | ContactType::Pulling)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactZone {
    AboveWater,
    Underwater,
}

/// Raw contact measurement before it is turned into a severity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawContact {
    /// Contact force, clamped to [0, 1] on use.
    pub force: f32,
    pub contact_type: ContactType,
    pub zone: ContactZone,
    pub duration_secs: f32,
}

/// Severity of a raw contact, in [0, 1].
///
/// Force times the contact-type multiplier, +20% when underwater, plus
/// 0.1 per second of contact, re-clamped.
pub fn compute_severity(contact: &RawContact) -> f32 {
    let mut severity = unit_interval(contact.force) * contact.contact_type.severity_multiplier();
    if contact.zone == ContactZone::Underwater {
        severity *= 1.2;
    }
    if contact.duration_secs.is_finite() {
        severity += 0.1 * contact.duration_secs.max(0.0);
    }
    unit_interval(severity)
}

/// Clamp to [0, 1]. NaN and infinities read as no contact at all.
fn unit_interval(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    Contact(ContactType),
    /// Attacker inside the two-meter zone without the ball.
    TwoMeter,
    /// Team-attributed: possession expired without a shot.
    ShotClockExpiry,
}

impl ViolationKind {
    pub fn requires_offender(self) -> bool {
        !matches!(self, ViolationKind::ShotClockExpiry)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolationEvent {
    pub kind: ViolationKind,
    /// Team charged with the violation. For team-attributed violations this is
    /// the only attribution.
    pub offending_team: TeamId,
    pub offender: Option<PlayerId>,
    pub victim: Option<PlayerId>,
    pub location: Position,
    /// In [0, 1].
    pub severity: f32,
    pub is_brutality: bool,
    pub prevented_scoring_chance: bool,
    /// Match time (seconds since the start of the match) when detected.
    pub timestamp: f32,
}

impl ViolationEvent {
    pub fn from_contact(
        offender: PlayerId,
        victim: PlayerId,
        location: Position,
        contact: &RawContact,
        timestamp: f32,
    ) -> Self {
        Self {
            kind: ViolationKind::Contact(contact.contact_type),
            offending_team: offender.team,
            offender: Some(offender),
            victim: Some(victim),
            location,
            severity: compute_severity(contact),
            is_brutality: false,
            prevented_scoring_chance: false,
            timestamp,
        }
    }

    pub fn two_meter(offender: PlayerId, location: Position, severity: f32, timestamp: f32) -> Self {
        Self {
            kind: ViolationKind::TwoMeter,
            offending_team: offender.team,
            offender: Some(offender),
            victim: None,
            location,
            severity: unit_interval(severity),
            is_brutality: false,
            prevented_scoring_chance: false,
            timestamp,
        }
    }

    pub fn shot_clock_expiry(team: TeamId, location: Position, timestamp: f32) -> Self {
        Self {
            kind: ViolationKind::ShotClockExpiry,
            offending_team: team,
            offender: None,
            victim: None,
            location,
            severity: 1.0,
            is_brutality: false,
            prevented_scoring_chance: false,
            timestamp,
        }
    }

    pub fn with_brutality(mut self, is_brutality: bool) -> Self {
        self.is_brutality = is_brutality;
        self
    }

    pub fn with_prevented_scoring_chance(mut self, prevented: bool) -> Self {
        self.prevented_scoring_chance = prevented;
        self
    }

    pub fn with_severity(mut self, severity: f32) -> Self {
        self.severity = unit_interval(severity);
        self
    }

    /// Team that was fouled, when a victim is known.
    pub fn victim_team(&self) -> Option<TeamId> {
        self.victim.map(|v| v.team)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(force: f32, contact_type: ContactType, zone: ContactZone, duration: f32) -> RawContact {
        RawContact { force, contact_type, zone, duration_secs: duration }
    }

    #[test]
    fn test_severity_plain_push() {
        let s = compute_severity(&contact(0.4, ContactType::Pushing, ContactZone::AboveWater, 0.0));
        assert!((s - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_severity_holding_underwater_with_duration() {
        // 0.5 * 1.3 = 0.65, * 1.2 = 0.78, + 0.1 * 1.0 = 0.88
        let s = compute_severity(&contact(0.5, ContactType::Holding, ContactZone::Underwater, 1.0));
        assert!((s - 0.88).abs() < 1e-5, "got {}", s);
    }

    #[test]
    fn test_severity_clamped() {
        let s = compute_severity(&contact(0.9, ContactType::Strike, ContactZone::Underwater, 3.0));
        assert_eq!(s, 1.0);
        let s = compute_severity(&contact(-2.0, ContactType::Pulling, ContactZone::AboveWater, 0.0));
        assert_eq!(s, 0.0);
    }

    #[test]
    fn test_non_finite_input_reads_as_zero_severity() {
        let s = compute_severity(&contact(f32::NAN, ContactType::Strike, ContactZone::Underwater, 0.0));
        assert_eq!(s, 0.0);
        let s = compute_severity(&contact(f32::INFINITY, ContactType::Holding, ContactZone::AboveWater, 0.0));
        assert_eq!(s, 0.0);
        // a broken duration adds nothing
        let s = compute_severity(&contact(0.4, ContactType::Pushing, ContactZone::AboveWater, f32::NAN));
        assert!((s - 0.4).abs() < 1e-6);

        let offender = PlayerId::new(TeamId::Away, 4);
        let v = ViolationEvent::two_meter(offender, Position::new(20.0, 10.0), f32::NAN, 0.0);
        assert_eq!(v.severity, 0.0);
        let v = v.with_severity(0.9).with_severity(f32::NEG_INFINITY);
        assert_eq!(v.severity, 0.0);
    }

    #[test]
    fn test_force_clamped_before_multiplier() {
        // force 3.0 clamps to 1.0 before the multiplier, so pulling tops out at 1.0 anyway
        let s = compute_severity(&contact(3.0, ContactType::Other, ContactZone::AboveWater, 0.0));
        assert_eq!(s, 1.0);
    }

    #[test]
    fn test_shot_clock_expiry_has_no_offender() {
        let v = ViolationEvent::shot_clock_expiry(TeamId::Away, Position::default(), 12.0);
        assert!(v.offender.is_none());
        assert!(!v.kind.requires_offender());
        assert_eq!(v.offending_team, TeamId::Away);
    }
}
