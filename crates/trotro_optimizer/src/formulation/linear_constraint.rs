use std::fmt;

use super::constraint_family::ConstraintFamily;

const FEASIBILITY_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    LessOrEqual,
    GreaterOrEqual,
    Equal,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LessOrEqual => "<=",
            Self::GreaterOrEqual => ">=",
            Self::Equal => "=",
        })
    }
}

/// One engine-independent row: `Σ coefficient · column  (<=|>=|=)  rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub family: ConstraintFamily,
    pub name: String,
    pub terms: Vec<(usize, f64)>,
    pub comparison: Comparison,
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn activity(&self, columns: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(column, coefficient)| coefficient * columns.get(column).copied().unwrap_or(0.0))
            .sum()
    }

    pub fn is_satisfied_by(&self, columns: &[f64]) -> bool {
        let activity = self.activity(columns);
        let tolerance = FEASIBILITY_TOLERANCE * self.rhs.abs().max(1.0);

        match self.comparison {
            Comparison::LessOrEqual => activity <= self.rhs + tolerance,
            Comparison::GreaterOrEqual => activity >= self.rhs - tolerance,
            Comparison::Equal => (activity - self.rhs).abs() <= tolerance,
        }
    }

    /// Lower and upper row bounds, for engines that take rows as ranges.
    pub fn bounds(&self) -> (f64, f64) {
        match self.comparison {
            Comparison::LessOrEqual => (f64::NEG_INFINITY, self.rhs),
            Comparison::GreaterOrEqual => (self.rhs, f64::INFINITY),
            Comparison::Equal => (self.rhs, self.rhs),
        }
    }
}

impl fmt::Display for LinearConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} terms {} {})",
            self.name,
            self.terms.len(),
            self.comparison,
            self.rhs
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraint(comparison: Comparison, rhs: f64) -> LinearConstraint {
        LinearConstraint {
            family: ConstraintFamily::PassengerCapacity,
            name: String::from("passenger_capacity[R1]"),
            terms: vec![(0, 50.0), (2, -40.0), (3, -40.0)],
            comparison,
            rhs,
        }
    }

    #[test]
    fn test_activity() {
        let row = constraint(Comparison::LessOrEqual, 0.0);

        assert_eq!(row.activity(&[1.0, 0.0, 1.0, 1.0]), -30.0);
        assert_eq!(row.activity(&[1.0, 0.0, 1.0, 0.0]), 10.0);
    }

    #[test]
    fn test_is_satisfied_by() {
        let le = constraint(Comparison::LessOrEqual, 0.0);
        assert!(le.is_satisfied_by(&[1.0, 0.0, 1.0, 1.0]));
        assert!(!le.is_satisfied_by(&[1.0, 0.0, 1.0, 0.0]));

        let ge = constraint(Comparison::GreaterOrEqual, 0.0);
        assert!(ge.is_satisfied_by(&[1.0, 0.0, 1.0, 0.0]));

        let eq = constraint(Comparison::Equal, 0.0);
        assert!(eq.is_satisfied_by(&[0.0, 0.0, 0.0, 0.0]));
        assert!(!eq.is_satisfied_by(&[1.0, 0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_relaxation_residue_is_tolerated() {
        let row = constraint(Comparison::LessOrEqual, 0.0);

        assert!(row.is_satisfied_by(&[0.8, 0.0, 1.0 - 1e-9, 0.0]));
    }

    #[test]
    fn test_bounds() {
        assert_eq!(
            constraint(Comparison::LessOrEqual, 2.0).bounds(),
            (f64::NEG_INFINITY, 2.0)
        );
        assert_eq!(constraint(Comparison::Equal, 0.0).bounds(), (0.0, 0.0));
    }
}
