// ─────────────────────────────────────────────────────────────────────
// Adaptive Fusion Kernel — Fusion System Interface
// ─────────────────────────────────────────────────────────────────────
//! Common surface shared by the adaptive engine and the plain-majority
//! baseline, so harnesses can drive either one interchangeably.

use std::collections::BTreeMap;

use fusion_types::{FusionResult, Outputs, Signal, Stimuli, UnitConfig, UnitId, UnitStatus};

/// A roster of redundant units fused into one decision per round.
pub trait FusionSystem: Send {
    /// Short label used in logs and comparison reports.
    fn name(&self) -> &str;

    /// Register a unit. Replaces any unit already under `unit_id`.
    fn add_unit(&mut self, unit_id: &str, config: UnitConfig) -> FusionResult<()>;

    /// Let every unit classify its stimulus. Units missing from
    /// `stimuli` see 0.0; entries for unknown ids are ignored.
    fn collect_outputs(&mut self, stimuli: &Stimuli) -> Outputs;

    /// Fuse the outputs of the last `collect_outputs` call.
    fn judge(&mut self) -> Signal;

    /// Replace the roster if the last judgement asked for it.
    fn schedule(&mut self);

    /// Feed the fused decision back into the units.
    fn update_feedback(&mut self, outputs: &Outputs, fused: Signal);

    /// Clear the pending-replacement flag. No-op when it is already clear.
    fn recover(&mut self);

    fn is_scheduled(&self) -> bool;

    /// Number of roster replacements performed so far.
    fn scheduled_count(&self) -> u64;

    fn get_status(&self) -> BTreeMap<UnitId, UnitStatus>;

    /// One full round: collect → judge → schedule → feedback.
    fn step(&mut self, stimuli: &Stimuli) -> Signal {
        let outputs = self.collect_outputs(stimuli);
        let fused = self.judge();
        self.schedule();
        self.update_feedback(&outputs, fused);
        fused
    }
}
