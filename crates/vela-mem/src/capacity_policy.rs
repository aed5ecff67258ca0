use crate::errors::CapacityError::{self, CapacityOverflow, FixedCapacity};

/// Decides how much capacity a full array asks for when it has to grow.
///
/// Explicit reservations bypass the policy and always request the exact capacity. An
/// answer from `grow` that is not larger than `current` fails the append with
/// [`CapacityError::FixedCapacity`].
pub trait CapacityPolicy {
    fn can_grow() -> bool;
    fn grow(current: usize) -> Result<usize, CapacityError>;
}

/// Doubles the capacity, starting from a single slot.
pub struct Doubling {}

impl CapacityPolicy for Doubling {

    #[inline(always)]
    fn can_grow() -> bool {
        true
    }

    #[inline(always)]
    fn grow(current: usize) -> Result<usize, CapacityError> {
        if current == 0 {
            return Ok(1)
        }
        current
            .checked_mul(2)
            .ok_or(CapacityOverflow { requested: current })
    }
}

/// Never grows past the capacity the array was created or reserved with.
pub struct Fixed {}

impl CapacityPolicy for Fixed {

    #[inline(always)]
    fn can_grow() -> bool {
        false
    }

    #[inline(always)]
    fn grow(current: usize) -> Result<usize, CapacityError> {
        Err(FixedCapacity { capacity: current })
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn doubling_starts_at_one() {
        assert_eq!(Doubling::grow(0), Ok(1));
        assert_eq!(Doubling::grow(1), Ok(2));
        assert_eq!(Doubling::grow(6), Ok(12));
    }

    #[test]
    fn doubling_reports_overflow() {
        assert_eq!(
            Doubling::grow(usize::MAX),
            Err(CapacityOverflow { requested: usize::MAX }),
        );
    }

    #[test]
    fn fixed_refuses() {
        assert!(!Fixed::can_grow());
        assert_eq!(Fixed::grow(4), Err(FixedCapacity { capacity: 4 }));
    }
}
