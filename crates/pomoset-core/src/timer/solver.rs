//! Pause-unit solver.
//!
//! A set is described by one linear equation in the pause unit `x`:
//!
//! ```text
//! (5x + x) + d1 + (5x + x) + d2 + (5x + x) + d3 + (5x + 4x) = t_tot
//! ```
//!
//! where `d1..d3` are idle delays. Sessions whose length is already known
//! enter the equation as plain numbers. With a single unknown the equation is
//! solved in closed form.

use serde::Serialize;

use super::plan::SessionPlan;
use crate::error::EquationError;

/// One addend on the left-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Term {
    /// `coefficient * x`
    Symbolic { coefficient: f64 },
    /// A session whose duration is already fixed, in seconds.
    Resolved { seconds: f64 },
    /// Time a session spent with the timer stopped, in seconds.
    IdleDelay { seconds: f64 },
}

impl Term {
    fn numeric(&self) -> f64 {
        match self {
            Term::Symbolic { .. } => 0.0,
            Term::Resolved { seconds } | Term::IdleDelay { seconds } => *seconds,
        }
    }

    fn coefficient(&self) -> f64 {
        match self {
            Term::Symbolic { coefficient } => *coefficient,
            _ => 0.0,
        }
    }

    fn raw(&self) -> f64 {
        match self {
            Term::Symbolic { coefficient } => *coefficient,
            Term::Resolved { seconds } | Term::IdleDelay { seconds } => *seconds,
        }
    }
}

/// `sum(terms) = total`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearEquation {
    terms: Vec<Term>,
    total: f64,
}

impl LinearEquation {
    pub fn new(total: f64) -> Self {
        Self {
            terms: Vec::new(),
            total,
        }
    }

    /// Equation for a set where the first `resolved.len()` sessions are known.
    pub fn for_plan(plan: &SessionPlan, total: f64, idle_delays: &[u64], resolved: &[f64]) -> Self {
        let mut equation = Self::new(total);
        for (index, spec) in plan.specs().iter().enumerate() {
            match resolved.get(index) {
                Some(&seconds) => equation.push(Term::Resolved { seconds }),
                None => equation.push(Term::Symbolic {
                    coefficient: f64::from(spec.coefficient()),
                }),
            }
        }
        for &delay in idle_delays {
            equation.push(Term::IdleDelay {
                seconds: delay as f64,
            });
        }
        equation
    }

    pub fn push(&mut self, term: Term) {
        self.terms.push(term);
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Combined coefficient of `x`.
    pub fn coefficient(&self) -> f64 {
        self.terms.iter().map(Term::coefficient).sum()
    }

    /// Sum of every numeric addend.
    pub fn numeric(&self) -> f64 {
        self.terms.iter().map(Term::numeric).sum()
    }

    pub fn has_unknown(&self) -> bool {
        self.terms
            .iter()
            .any(|t| matches!(t, Term::Symbolic { .. }))
    }

    /// Solve for `x`.
    pub fn solve(&self) -> Result<f64, EquationError> {
        if let Some(bad) = std::iter::once(self.total)
            .chain(self.terms.iter().map(Term::raw))
            .find(|v| !v.is_finite())
        {
            return Err(EquationError::NonFinite(bad));
        }
        if !self.has_unknown() {
            return Err(EquationError::NoUnknown);
        }

        let coefficient = self.coefficient();
        if coefficient <= 0.0 {
            return Err(EquationError::ZeroCoefficient { coefficient });
        }

        let numeric = self.numeric();
        let rest = self.total - numeric;
        if rest < 0.0 {
            return Err(EquationError::Infeasible {
                numeric,
                total: self.total,
            });
        }

        Ok(rest / coefficient)
    }
}

/// Solve the set equation for the pause unit.
///
/// `resolved_prefix` holds the durations of sessions that are already fixed,
/// starting from session 1; the rest stay symbolic.
pub fn solve_pause_unit(
    plan: &SessionPlan,
    total_seconds: f64,
    idle_delays: &[u64],
    resolved_prefix: &[f64],
) -> Result<f64, EquationError> {
    LinearEquation::for_plan(plan, total_seconds, idle_delays, resolved_prefix).solve()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_hour_window() {
        let x = solve_pause_unit(&SessionPlan::default(), 3600.0, &[0, 0, 0], &[]).unwrap();
        assert!((x - 133.333_333).abs() < 1e-5);
    }

    #[test]
    fn divisible_total_is_exact() {
        let x = solve_pause_unit(&SessionPlan::default(), 5400.0, &[], &[]).unwrap();
        assert_eq!(x, 200.0);
    }

    #[test]
    fn idle_delays_and_resolved_sessions_are_subtracted() {
        // 800 resolved + 30 idle, the remaining 18x share 2770s.
        let x = solve_pause_unit(&SessionPlan::default(), 3600.0, &[30, 0, 0], &[800.0]).unwrap();
        assert!((x - 2770.0 / 21.0).abs() < 1e-9);
    }

    #[test]
    fn fully_resolved_equation_is_degenerate() {
        let resolved = [800.0, 800.0, 800.0, 1200.0];
        let err = solve_pause_unit(&SessionPlan::default(), 3600.0, &[], &resolved).unwrap_err();
        assert_eq!(err, EquationError::NoUnknown);
    }

    #[test]
    fn cancelling_coefficients_are_degenerate() {
        let mut eq = LinearEquation::new(10.0);
        eq.push(Term::Symbolic { coefficient: 2.0 });
        eq.push(Term::Symbolic { coefficient: -2.0 });
        assert!(matches!(eq.solve(), Err(EquationError::ZeroCoefficient { .. })));
    }

    #[test]
    fn overdrawn_total_is_infeasible() {
        let err = solve_pause_unit(&SessionPlan::default(), 100.0, &[200, 0, 0], &[]).unwrap_err();
        assert!(matches!(err, EquationError::Infeasible { .. }));
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let err = solve_pause_unit(&SessionPlan::default(), f64::NAN, &[], &[]).unwrap_err();
        assert!(matches!(err, EquationError::NonFinite(_)));
    }

    #[test]
    fn zero_total_gives_zero_pause() {
        assert_eq!(solve_pause_unit(&SessionPlan::default(), 0.0, &[], &[]).unwrap(), 0.0);
    }
}
