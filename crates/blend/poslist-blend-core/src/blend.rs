//! Sequential blending of a contribution list into a single position.
//!
//! The fold runs strictly in list order. Absolute entries lerp the running value towards
//! their position, so later absolute entries dominate earlier ones and the result is not a
//! commutative reduction. Never reorder or split the list.

use poslist_api_core::Vec3;

use crate::Contribution;

/// Blend `contributions` in order, starting from the zero vector.
///
/// - absolute: `acc = acc * (1 - w) + p * w`
/// - relative: `acc += p * w`
///
/// An empty list yields [`Vec3::ZERO`]. Weights and positions are taken as given.
pub fn average(contributions: &[Contribution]) -> Vec3 {
    contributions.iter().fold(Vec3::ZERO, blend_step)
}

#[inline]
fn blend_step(acc: Vec3, item: &Contribution) -> Vec3 {
    let w = f64::from(item.weight);
    if item.absolute {
        acc.lerp(item.position, w)
    } else {
        acc + item.position * w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abs(w: f32, p: [f64; 3]) -> Contribution {
        Contribution::absolute(w, p.into())
    }

    fn rel(w: f32, p: [f64; 3]) -> Contribution {
        Contribution::relative(w, p.into())
    }

    #[test]
    fn empty_list_is_origin() {
        assert_eq!(average(&[]), Vec3::ZERO);
    }

    #[test]
    fn relative_entry_scales_position() {
        assert_eq!(average(&[rel(0.5, [10.0, 0.0, 0.0])]), Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn full_absolute_entry_lands_on_position() {
        assert_eq!(average(&[abs(1.0, [3.0, 4.0, 5.0])]), Vec3::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn absolute_entries_are_order_sensitive() {
        let a = abs(0.5, [10.0, 0.0, 0.0]);
        let b = abs(0.5, [0.0, 10.0, 0.0]);
        let ab = average(&[a.clone(), b.clone()]);
        let ba = average(&[b, a]);
        assert_eq!(ab, Vec3::new(2.5, 5.0, 0.0));
        assert_eq!(ba, Vec3::new(5.0, 2.5, 0.0));
        assert_ne!(ab, ba);
    }

    #[test]
    fn absolute_entry_overrides_accumulated_relatives() {
        let items = [
            rel(1.0, [4.0, 4.0, 4.0]),
            rel(1.0, [1.0, 0.0, 0.0]),
            abs(1.0, [-2.0, 0.0, 8.0]),
        ];
        assert_eq!(average(&items), Vec3::new(-2.0, 0.0, 8.0));
    }

    #[test]
    fn zero_weight_is_a_no_op_in_both_modes() {
        let base = [rel(1.0, [1.0, 2.0, 3.0])];
        let with_zero = [
            rel(1.0, [1.0, 2.0, 3.0]),
            rel(0.0, [100.0, 100.0, 100.0]),
            abs(0.0, [-50.0, 9.0, 1.0]),
        ];
        assert_eq!(average(&with_zero), average(&base));
    }

    #[test]
    fn negative_weights_subtract() {
        let items = [rel(1.0, [2.0, 2.0, 2.0]), rel(-0.5, [2.0, 0.0, 4.0])];
        assert_eq!(average(&items), Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn names_do_not_affect_the_result() {
        let plain = [rel(0.25, [8.0, 0.0, 4.0])];
        let named = [rel(0.25, [8.0, 0.0, 4.0]).named("left hand")];
        assert_eq!(average(&plain), average(&named));
    }
}
