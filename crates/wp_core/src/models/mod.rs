pub mod geometry;
pub mod ids;
pub mod notifications;
pub mod violation;

pub use geometry::{PoolGeometry, Position};
pub use ids::{PlayerId, TeamId};
pub use notifications::{MatchNotification, TacticChange};
pub use violation::{
    compute_severity, ContactType, ContactZone, RawContact, ViolationEvent, ViolationKind,
};
