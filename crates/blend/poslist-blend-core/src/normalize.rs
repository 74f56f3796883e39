//! Optional weight normalization pass, run before blending.

use crate::Contribution;

/// Rescale weights in place so that `Σ|w| == 1`.
///
/// A sum of exactly `0` or `1` leaves the list untouched. Signs and ratios are kept; names,
/// flags and positions are never modified.
pub fn normalize(contributions: &mut [Contribution]) {
    let sum: f32 = contributions.iter().map(|c| c.weight.abs()).sum();
    if sum == 0.0 || sum == 1.0 {
        return;
    }

    let factor = 1.0 / sum;
    for c in contributions.iter_mut() {
        c.weight *= factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poslist_api_core::Vec3;

    fn weights(ws: &[f32]) -> Vec<Contribution> {
        ws.iter()
            .map(|w| Contribution::relative(*w, Vec3::new(1.0, 2.0, 3.0)))
            .collect()
    }

    fn collect(items: &[Contribution]) -> Vec<f32> {
        items.iter().map(|c| c.weight).collect()
    }

    #[test]
    fn rescales_to_unit_sum() {
        let mut items = weights(&[1.0, 1.0, 2.0]);
        normalize(&mut items);
        assert_eq!(collect(&items), vec![0.25, 0.25, 0.5]);
    }

    #[test]
    fn all_zero_weights_are_left_alone() {
        let mut items = weights(&[0.0, 0.0]);
        normalize(&mut items);
        assert_eq!(collect(&items), vec![0.0, 0.0]);
    }

    #[test]
    fn unit_sum_is_left_alone() {
        let mut items = weights(&[1.0]);
        normalize(&mut items);
        assert_eq!(collect(&items), vec![1.0]);

        let mut split = weights(&[0.5, -0.5]);
        normalize(&mut split);
        assert_eq!(collect(&split), vec![0.5, -0.5]);
    }

    #[test]
    fn signs_survive_rescaling() {
        let mut items = weights(&[-1.0, 1.0, 2.0]);
        normalize(&mut items);
        assert_eq!(collect(&items), vec![-0.25, 0.25, 0.5]);
    }

    #[test]
    fn empty_list_is_fine() {
        let mut items: Vec<Contribution> = Vec::new();
        normalize(&mut items);
        assert!(items.is_empty());
    }

    #[test]
    fn only_weights_change() {
        let mut items = vec![
            Contribution::absolute(0.5, Vec3::new(9.0, 8.0, 7.0)).named("a"),
            Contribution::relative(0.5, Vec3::new(1.0, 0.0, 0.0)).named("b"),
            Contribution::relative(1.0, Vec3::new(0.0, 1.0, 0.0)).named("c"),
        ];
        let before = items.clone();
        normalize(&mut items);
        for (b, a) in before.iter().zip(items.iter()) {
            assert_eq!(b.name, a.name);
            assert_eq!(b.absolute, a.absolute);
            assert_eq!(b.position, a.position);
        }
        assert_eq!(collect(&items), vec![0.25, 0.25, 0.5]);
    }
}
