/*!
# Pluggable SAT Backend Interface

An optional exact backend speaking the IPASIR incremental conventions plus a
cardinality-refinement encoder. The crate ships no solver of its own: the
[`AtomSolver::Sat`](crate::exact::AtomSolver) variant treats an absent
backend as a request to fall back to the game-based solver, so these traits
exist for downstream integration.
*/

/// Result of an incremental solve call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveOutcome {
    Sat,
    Unsat,
    Unknown,
}

/// IPASIR-style incremental SAT solver.
pub trait SatBackend {
    /// Adds a clause of non-zero DIMACS literals.
    fn add_clause(&mut self, clause: &[i32]);
    /// Registers an assumption for the next solve call.
    fn assume(&mut self, literal: i32);
    /// Solves under the pending assumptions.
    fn solve(&mut self) -> SolveOutcome;
    /// Model value of a literal after a satisfiable solve.
    fn value(&self, literal: i32) -> bool;
    /// Whether an assumption was used in the unsatisfiability proof.
    fn failed(&self, literal: i32) -> bool;
    /// Asks the solver to stop at the next safe point.
    fn terminate(&mut self);
}

/// Incremental cardinality encoder for width bounds.
pub trait CardinalityEncoder {
    /// Encodes "width at most `upper_bound`" from scratch.
    fn init_cardinality(&mut self, upper_bound: usize);
    /// Tightens the encoded bound to `k`.
    fn improve_cardinality(&mut self, k: usize);
    /// The current clause set.
    fn formula(&self) -> Vec<Vec<i32>>;
}
