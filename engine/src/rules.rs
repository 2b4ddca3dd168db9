use crate::model::{DiceSet, SpecialRollType};

#[inline] pub fn face_score(face: u8) -> u32 { match face { 1 => 100, 6 => 60, f => f as u32 } }

pub fn score(dice: &DiceSet) -> u32 {
    dice.faces().iter().map(|&f| face_score(f)).sum()
}

/// Context-free classification. A [4,5,6] always reports `SuperStairs` here;
/// whether it counts is decided by [`resolve_category`].
pub fn classify(dice: &DiceSet) -> SpecialRollType {
    match dice.sorted() {
        [a, b, c] if a == b && b == c => SpecialRollType::ThreeOfAKind,
        [1, 2, 3] => SpecialRollType::Stairs,
        [4, 5, 6] => SpecialRollType::SuperStairs,
        [2, 3, 4] | [3, 4, 5] => SpecialRollType::ShitStairs,
        _ => SpecialRollType::None,
    }
}

pub fn is_safe(category: SpecialRollType) -> bool {
    match category {
        SpecialRollType::ThreeOfAKind | SpecialRollType::Stairs | SpecialRollType::SuperStairs => true,
        SpecialRollType::ShitStairs | SpecialRollType::None => false,
    }
}

/// Super-stairs only count directly after a stairs turn in the same round.
pub fn is_super_stairs_valid(dice: &DiceSet, previous: Option<SpecialRollType>) -> bool {
    classify(dice) == SpecialRollType::SuperStairs && previous == Some(SpecialRollType::Stairs)
}

/// Category a roll is recorded with. An invalid [4,5,6] is downgraded to `None`.
pub fn resolve_category(dice: &DiceSet, previous: Option<SpecialRollType>) -> SpecialRollType {
    match classify(dice) {
        SpecialRollType::SuperStairs if !is_super_stairs_valid(dice, previous) => SpecialRollType::None,
        other => other,
    }
}

pub const BASE_PENALTY_SIPS: u32 = 1;

/// Extra sips a three-of-a-kind adds to the round penalty.
pub fn three_of_a_kind_bonus(face: u8) -> u32 { match face { 1 => 7, f => f as u32 } }

/// Sips handed out by a stairs-type turn; zero for every other category.
pub fn awarded_sips(category: SpecialRollType, turn_order: u32) -> u32 {
    match category {
        SpecialRollType::Stairs => turn_order,
        SpecialRollType::SuperStairs => turn_order * 2,
        SpecialRollType::ThreeOfAKind | SpecialRollType::ShitStairs | SpecialRollType::None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn d(faces: [u8; 3]) -> DiceSet { DiceSet::new(faces).unwrap() }

    #[rstest]
    #[case([1, 2, 4], 106)]
    #[case([2, 3, 5], 10)]
    #[case([6, 6, 6], 180)]
    #[case([1, 1, 1], 300)]
    #[case([4, 5, 6], 69)]
    fn scores(#[case] faces: [u8; 3], #[case] expected: u32) {
        assert_eq!(score(&d(faces)), expected);
    }

    #[rstest]
    #[case([1, 1, 1], SpecialRollType::ThreeOfAKind)]
    #[case([5, 5, 5], SpecialRollType::ThreeOfAKind)]
    #[case([1, 2, 3], SpecialRollType::Stairs)]
    #[case([3, 1, 2], SpecialRollType::Stairs)]
    #[case([4, 5, 6], SpecialRollType::SuperStairs)]
    #[case([6, 4, 5], SpecialRollType::SuperStairs)]
    #[case([2, 3, 4], SpecialRollType::ShitStairs)]
    #[case([3, 4, 5], SpecialRollType::ShitStairs)]
    #[case([1, 3, 5], SpecialRollType::None)]
    #[case([2, 2, 3], SpecialRollType::None)]
    fn classifies(#[case] faces: [u8; 3], #[case] expected: SpecialRollType) {
        assert_eq!(classify(&d(faces)), expected);
    }

    #[test]
    fn safety_by_category() {
        assert!(is_safe(SpecialRollType::ThreeOfAKind));
        assert!(is_safe(SpecialRollType::Stairs));
        assert!(is_safe(SpecialRollType::SuperStairs));
        assert!(!is_safe(SpecialRollType::ShitStairs));
        assert!(!is_safe(SpecialRollType::None));
    }

    #[test]
    fn super_stairs_needs_stairs_before() {
        let top = d([4, 6, 5]);
        assert!(is_super_stairs_valid(&top, Some(SpecialRollType::Stairs)));
        assert!(!is_super_stairs_valid(&top, None));
        assert!(!is_super_stairs_valid(&top, Some(SpecialRollType::None)));
        assert!(!is_super_stairs_valid(&top, Some(SpecialRollType::SuperStairs)));
        assert!(!is_super_stairs_valid(&d([1, 2, 3]), Some(SpecialRollType::Stairs)));
    }

    #[test]
    fn invalid_super_stairs_is_downgraded() {
        let top = d([4, 5, 6]);
        assert_eq!(resolve_category(&top, Some(SpecialRollType::Stairs)), SpecialRollType::SuperStairs);
        assert_eq!(resolve_category(&top, Some(SpecialRollType::ThreeOfAKind)), SpecialRollType::None);
        assert_eq!(resolve_category(&top, None), SpecialRollType::None);
        assert_eq!(resolve_category(&d([2, 2, 2]), None), SpecialRollType::ThreeOfAKind);
    }

    #[test]
    fn bonus_per_face() {
        let bonuses: Vec<u32> = (1..=6).map(three_of_a_kind_bonus).collect();
        assert_eq!(bonuses, vec![7, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn awarded_sips_scale_with_turn_order() {
        assert_eq!(awarded_sips(SpecialRollType::Stairs, 3), 3);
        assert_eq!(awarded_sips(SpecialRollType::SuperStairs, 3), 6);
        assert_eq!(awarded_sips(SpecialRollType::ThreeOfAKind, 3), 0);
        assert_eq!(awarded_sips(SpecialRollType::None, 1), 0);
    }

    proptest! {
        #[test]
        fn classify_ignores_die_order(a in 1u8..=6, b in 1u8..=6, c in 1u8..=6) {
            let expected = classify(&d([a, b, c]));
            for p in [[a, c, b], [b, a, c], [b, c, a], [c, a, b], [c, b, a]] {
                prop_assert_eq!(classify(&d(p)), expected);
                prop_assert_eq!(score(&d(p)), score(&d([a, b, c])));
            }
        }
    }
}
