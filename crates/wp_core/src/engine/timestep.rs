/// timestep.rs
/// Scheduler cadences.
///
/// The match advances on a single fixed simulation step. Slower cadences
/// (tactical evaluation, opponent sampling) are accumulated in seconds of match
/// time by the components that own them.

/// Simulation step (100ms).
pub const SIM_DT: f32 = 0.1;

/// Ticks per second of match time.
pub const TICKS_PER_SECOND: u32 = 10;

// Compile-time validation
const _: () = assert!(SIM_DT * TICKS_PER_SECOND as f32 == 1.0);

/// Convert seconds to whole simulation ticks (rounded up).
pub fn seconds_to_ticks(secs: f32) -> u64 {
    (secs.max(0.0) * TICKS_PER_SECOND as f32).ceil() as u64
}
