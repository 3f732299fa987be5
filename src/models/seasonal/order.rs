//! Seasonal model order specification.

use crate::error::{ForecastError, Result};

/// SARIMA order (p, d, q)(P, D, Q)[s].
///
/// Selected once per fit and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelOrder {
    /// Non-seasonal AR order.
    pub p: usize,
    /// Non-seasonal differencing order.
    pub d: usize,
    /// Non-seasonal MA order.
    pub q: usize,
    /// Seasonal AR order.
    pub sp: usize,
    /// Seasonal differencing order.
    pub sd: usize,
    /// Seasonal MA order.
    pub sq: usize,
    /// Seasonal period in observations (24 for a daily cycle in hourly data).
    pub s: usize,
}

impl ModelOrder {
    /// Create a new seasonal order.
    pub fn new(p: usize, d: usize, q: usize, sp: usize, sd: usize, sq: usize, s: usize) -> Self {
        Self {
            p,
            d,
            q,
            sp,
            sd,
            sq,
            s,
        }
    }

    /// The (1,1,1)(1,1,1)[s] order, a reasonable default for seasonal data.
    pub fn default_for_period(s: usize) -> Self {
        Self::new(1, 1, 1, 1, 1, 1, s)
    }

    /// Check whether the order has any seasonal structure.
    pub fn is_seasonal(&self) -> bool {
        self.s > 1 && (self.sp > 0 || self.sd > 0 || self.sq > 0)
    }

    /// Sum of all orders; used to break information-criterion ties in favor
    /// of the simpler model.
    pub fn complexity(&self) -> usize {
        self.p + self.d + self.q + self.sp + self.sd + self.sq
    }

    /// Number of free coefficients (AR + MA + seasonal AR/MA + intercept).
    pub fn num_params(&self) -> usize {
        self.p + self.q + self.sp + self.sq + 1
    }

    /// Observations consumed by regular and seasonal differencing.
    pub fn differencing_loss(&self) -> usize {
        self.d + self.sd * self.s
    }

    /// The largest lag referenced by the AR/MA terms on the differenced scale.
    pub fn max_lag(&self) -> usize {
        let ar = self.p.max(self.sp * self.s);
        let ma = self.q.max(self.sq * self.s);
        ar.max(ma)
    }

    /// Validate structural constraints.
    pub fn validate(&self) -> Result<()> {
        if self.s < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "seasonal period must be at least 2, got {}",
                self.s
            )));
        }
        if self.d > 2 || self.sd > 1 {
            return Err(ForecastError::InvalidParameter(format!(
                "differencing orders too high: d={}, D={}",
                self.d, self.sd
            )));
        }
        Ok(())
    }
}

/// How the seasonal order is chosen at fit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderChoice {
    /// Search a bounded candidate grid, minimizing AIC.
    Auto,
    /// Use the given fixed order.
    Fixed(ModelOrder),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complexity_and_params() {
        let order = ModelOrder::new(2, 1, 2, 1, 1, 1, 24);
        assert_eq!(order.complexity(), 8);
        assert_eq!(order.num_params(), 7);
        assert_eq!(order.differencing_loss(), 25);
        assert!(order.is_seasonal());
    }

    #[test]
    fn max_lag_covers_seasonal_terms() {
        let order = ModelOrder::new(1, 1, 1, 1, 1, 1, 24);
        assert_eq!(order.max_lag(), 24);

        let order = ModelOrder::new(3, 0, 0, 0, 0, 0, 24);
        assert_eq!(order.max_lag(), 3);
    }

    #[test]
    fn validate_rejects_tiny_period() {
        let order = ModelOrder::new(1, 1, 1, 1, 1, 1, 1);
        assert!(matches!(
            order.validate(),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn validate_rejects_excessive_differencing() {
        let order = ModelOrder::new(1, 3, 1, 1, 1, 1, 24);
        assert!(order.validate().is_err());

        let order = ModelOrder::new(1, 1, 1, 1, 2, 1, 24);
        assert!(order.validate().is_err());
    }
}
