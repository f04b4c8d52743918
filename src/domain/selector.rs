//! Circular amount selection.
//!
//! A drag on a circular track is turned into an amount within a
//! [`SelectionRange`]. The top of the circle is 0°, angles grow clockwise, and a
//! full turn corresponds to the maximum amount. The arc between
//! [`DEAD_ZONE_START`] and the minimum-due marker cannot be selected: a drag
//! that lands there snaps to the marker or to the full amount, depending on
//! which half of the circle the dial was on before the drag.

use crate::domain::bill::Bill;
use crate::domain::money::Money;
use crate::error::{PaymentError, Result};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use tracing::trace;

/// Angle, in degrees, where the dead zone before full closure begins.
pub const DEAD_ZONE_START: f64 = 355.0;
pub const FULL_TURN: f64 = 360.0;
const HALF_TURN: f64 = 180.0;

/// Bounds of what the selector may produce.
///
/// Always satisfies `minimum <= minimum_due <= maximum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    minimum: Money,
    minimum_due: Money,
    maximum: Money,
    span: Decimal,
}

impl SelectionRange {
    pub fn new(minimum: Money, minimum_due: Money, maximum: Money) -> Result<Self> {
        if maximum < minimum {
            return Err(PaymentError::InvalidRange(format!(
                "maximum {} is below minimum {}",
                maximum, minimum
            )));
        }
        if minimum_due < minimum || minimum_due > maximum {
            return Err(PaymentError::InvalidRange(format!(
                "minimum due {} is outside [{}, {}]",
                minimum_due, minimum, maximum
            )));
        }
        let span = maximum.checked_sub(minimum).ok_or_else(|| {
            PaymentError::InvalidRange(format!(
                "span from {} to {} is out of range",
                minimum, maximum
            ))
        })?;
        Ok(Self {
            minimum,
            minimum_due,
            maximum,
            span: span.value(),
        })
    }

    /// The dial range used to pay `bill`: from zero up to the full amount.
    pub fn for_bill(bill: &Bill) -> Result<Self> {
        Self::new(Money::ZERO, bill.minimum_due, bill.amount.as_money())
    }

    pub fn minimum(&self) -> Money {
        self.minimum
    }

    pub fn minimum_due(&self) -> Money {
        self.minimum_due
    }

    pub fn maximum(&self) -> Money {
        self.maximum
    }

    /// Normalized position of `amount` in the range, `0` for an empty range.
    pub fn progress(&self, amount: Money) -> f64 {
        if self.maximum <= self.minimum {
            return 0.0;
        }
        amount
            .checked_sub(self.minimum)
            .and_then(|offset| offset.value().checked_div(self.span))
            .and_then(|ratio| ratio.to_f64())
            .unwrap_or(0.0)
    }

    /// Inverse of [`progress`](Self::progress), rounded to cents and clamped to
    /// the range. `None` when `progress` has no decimal representation.
    pub fn amount_for_progress(&self, progress: f64) -> Option<Money> {
        let progress = Decimal::from_f64(progress)?;
        let offset = progress.checked_mul(self.span)?;
        let amount = self.minimum.checked_add(Money::new(offset))?.round_to_cents();
        Some(amount.clamp(self.minimum, self.maximum))
    }

    pub fn minimum_due_angle(&self) -> f64 {
        angle_for(self.progress(self.minimum_due))
    }

    /// True when `angle` lies on the arc that cannot be selected.
    pub fn in_dead_zone(&self, angle: f64) -> bool {
        angle > DEAD_ZONE_START || angle < self.minimum_due_angle()
    }
}

/// Angle on the dial for a progress value.
pub fn angle_for(progress: f64) -> f64 {
    progress * FULL_TURN
}

/// Angle of a pointer offset from the dial centre, in `[0, 360)`.
///
/// `dx` grows to the right and `dy` grows downward, so straight up is 0°.
pub fn pointer_angle(dx: f64, dy: f64) -> f64 {
    let angle = dy.atan2(dx).to_degrees() + 90.0;
    if angle < 0.0 { angle + FULL_TURN } else { angle }
}

/// The dial control state: a range, an optional drag limit and the current
/// selection.
///
/// `dial_angle` is where the handle was last put, before the drag limit was
/// applied. Snapping decides its direction from it, so a capped selection
/// still remembers which half of the circle the pointer is on.
#[derive(Debug, Clone, PartialEq)]
pub struct AmountSelector {
    range: SelectionRange,
    drag_limit: Option<Money>,
    selected: Money,
    dial_angle: f64,
}

impl AmountSelector {
    /// Starts at the minimum due.
    pub fn new(range: SelectionRange) -> Self {
        Self {
            range,
            drag_limit: None,
            selected: range.minimum_due,
            dial_angle: range.minimum_due_angle(),
        }
    }

    /// Caps the selectable amount, typically at the funding account balance.
    pub fn with_drag_limit(mut self, limit: Money) -> Self {
        self.set_drag_limit(Some(limit));
        self
    }

    pub fn set_drag_limit(&mut self, limit: Option<Money>) {
        self.drag_limit = limit;
        self.selected = self.clamp(self.selected);
    }

    pub fn range(&self) -> &SelectionRange {
        &self.range
    }

    pub fn drag_limit(&self) -> Option<Money> {
        self.drag_limit
    }

    pub fn selected(&self) -> Money {
        self.selected
    }

    pub fn progress(&self) -> f64 {
        self.range.progress(self.selected)
    }

    /// Angle of the handle for the current selection.
    pub fn angle(&self) -> f64 {
        angle_for(self.progress())
    }

    /// Last angle the dial was moved to, ignoring the drag limit.
    pub fn dial_angle(&self) -> f64 {
        self.dial_angle
    }

    /// Highest amount the control will publish.
    pub fn ceiling(&self) -> Money {
        match self.drag_limit {
            Some(limit) => limit.clamp(self.range.minimum, self.range.maximum),
            None => self.range.maximum,
        }
    }

    fn clamp(&self, amount: Money) -> Money {
        amount.clamp(self.range.minimum, self.ceiling())
    }

    /// Replaces the selection from outside the dial, clamped to the range.
    pub fn set_amount(&mut self, amount: Money) -> Money {
        self.selected = self.clamp(amount);
        self.dial_angle = self.angle();
        self.selected
    }

    /// Processes a drag event at an offset from the dial centre.
    pub fn drag_to(&mut self, dx: f64, dy: f64) -> Money {
        self.select_angle(pointer_angle(dx, dy))
    }

    /// Moves the handle to `angle` degrees and returns the published amount.
    pub fn select_angle(&mut self, angle: f64) -> Money {
        if angle.is_nan() {
            return self.selected;
        }

        let (amount, dial_angle) = if self.range.in_dead_zone(angle) {
            if self.dial_angle < HALF_TURN {
                trace!(angle, "dial snapped to minimum due");
                (self.range.minimum_due, self.range.minimum_due_angle())
            } else {
                trace!(angle, "dial snapped to full amount");
                (self.range.maximum, FULL_TURN)
            }
        } else {
            match self.range.amount_for_progress(angle / FULL_TURN) {
                Some(amount) => (amount, angle),
                None => return self.selected,
            }
        };

        self.dial_angle = dial_angle;
        self.selected = self.clamp(amount);
        self.selected
    }
}
