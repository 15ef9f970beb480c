use std::fmt;

/// The eight families of rows every engine realizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstraintFamily {
    FleetSize,
    RouteLength,
    MinDailySales,
    TerminalCapacity,
    RoutePermission,
    AssignmentImpliesSelection,
    SingleAssignment,
    PassengerCapacity,
}

impl ConstraintFamily {
    pub const ALL: [ConstraintFamily; 8] = [
        ConstraintFamily::FleetSize,
        ConstraintFamily::RouteLength,
        ConstraintFamily::MinDailySales,
        ConstraintFamily::TerminalCapacity,
        ConstraintFamily::RoutePermission,
        ConstraintFamily::AssignmentImpliesSelection,
        ConstraintFamily::SingleAssignment,
        ConstraintFamily::PassengerCapacity,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::FleetSize => "fleet_size",
            Self::RouteLength => "route_length",
            Self::MinDailySales => "min_daily_sales",
            Self::TerminalCapacity => "terminal_capacity",
            Self::RoutePermission => "route_permission",
            Self::AssignmentImpliesSelection => "assignment_implies_selection",
            Self::SingleAssignment => "single_assignment",
            Self::PassengerCapacity => "passenger_capacity",
        }
    }
}

impl fmt::Display for ConstraintFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How an engine expresses "vehicle may not serve route".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionEncoding {
    /// Column upper bound of 0, no rows.
    VariableBound,
    /// One `y <= 0|1` row per (vehicle, route) pair.
    UpperBoundRow,
    /// One `y = 0` row per forbidden pair.
    EqualityRow,
}
