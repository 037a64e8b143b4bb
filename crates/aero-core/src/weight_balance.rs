//! Simplified single-engine weight and balance.

use serde::Serialize;

const EMPTY_WEIGHT_LB: f64 = 1_600.0;
const EMPTY_MOMENT_LB_IN: f64 = 60_000.0;
const PILOT_WEIGHT_LB: f64 = 180.0;
const PILOT_ARM_IN: f64 = 37.0;
const PASSENGER_WEIGHT_LB: f64 = 170.0;
const PASSENGER_ARM_IN: f64 = 55.0;
const FUEL_LB_PER_GAL: f64 = 6.0;
const FUEL_ARM_IN: f64 = 48.0;
const CG_FORWARD_LIMIT_IN: f64 = 35.0;
const CG_AFT_LIMIT_IN: f64 = 47.0;

/// Loading of the aircraft for one flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightAndBalance {
    pub passenger_count: u32,
    pub fuel_on_board_gal: f64,
}

impl WeightAndBalance {
    pub fn new(passenger_count: u32, fuel_on_board_gal: f64) -> Self {
        Self {
            passenger_count,
            fuel_on_board_gal: fuel_on_board_gal.max(0.0),
        }
    }

    pub fn fuel_weight_lb(&self) -> f64 {
        self.fuel_on_board_gal * FUEL_LB_PER_GAL
    }

    pub fn passenger_weight_lb(&self) -> f64 {
        f64::from(self.passenger_count) * PASSENGER_WEIGHT_LB
    }

    pub fn total_weight_lb(&self) -> f64 {
        EMPTY_WEIGHT_LB + PILOT_WEIGHT_LB + self.passenger_weight_lb() + self.fuel_weight_lb()
    }

    pub fn total_moment_lb_in(&self) -> f64 {
        EMPTY_MOMENT_LB_IN
            + PILOT_WEIGHT_LB * PILOT_ARM_IN
            + self.passenger_weight_lb() * PASSENGER_ARM_IN
            + self.fuel_weight_lb() * FUEL_ARM_IN
    }

    /// Center of gravity in inches aft of datum.
    pub fn cg_in(&self) -> f64 {
        self.total_moment_lb_in() / self.total_weight_lb()
    }

    pub fn is_within_limits(&self) -> bool {
        (CG_FORWARD_LIMIT_IN..=CG_AFT_LIMIT_IN).contains(&self.cg_in())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pilot_only_with_forty_gallons() {
        let wb = WeightAndBalance::new(0, 40.0);
        assert_eq!(wb.fuel_weight_lb(), 240.0);
        assert_eq!(wb.total_weight_lb(), 2_020.0);
        assert_eq!(wb.total_moment_lb_in(), 60_000.0 + 6_660.0 + 11_520.0);
        assert!((wb.cg_in() - 38.70).abs() < 0.01);
        assert!(wb.is_within_limits());
    }

    #[test]
    fn passengers_move_cg_aft() {
        let light = WeightAndBalance::new(0, 20.0);
        let loaded = WeightAndBalance::new(3, 20.0);
        assert!(loaded.cg_in() > light.cg_in());
    }

    #[test]
    fn empty_tanks_stays_within_limits() {
        // 66660 / 1780 = 37.4 in
        let wb = WeightAndBalance::new(0, 0.0);
        assert!(wb.is_within_limits());
        assert_eq!(WeightAndBalance::new(0, -5.0).fuel_on_board_gal, 0.0);
    }
}
