use contest_engine::{resolve, CombatantProfile, ContestError, Dice, ToolProfile, Verdict};

fn plain(name: &str) -> CombatantProfile {
    CombatantProfile::named(name)
}

fn defender(dv: i32) -> CombatantProfile {
    CombatantProfile {
        defense_value: dv,
        ..plain("target")
    }
}

#[test]
fn natural_twenty_autohits_any_defense() {
    let mut dice = Dice::from_scripted(vec![20]);
    let out = resolve(&plain("medic"), &defender(500), None, &mut dice).unwrap();
    assert!(out.hit);
    assert!(out.autohit);
    assert!(!out.fumble);
    assert_eq!(out.fumble_roll, None);
    assert!(out.total_roll < out.defense_value);
}

#[test]
fn wide_miss_with_low_second_die_fumbles() {
    let mut dice = Dice::from_scripted(vec![5, 1]);
    let tool = ToolProfile::new("injector", 0);
    let out = resolve(&plain("medic"), &defender(10), Some(&tool), &mut dice).unwrap();
    assert_eq!(out.total_roll, 5);
    assert_eq!(out.margin, 5);
    assert_eq!(out.fumble_roll, Some(1));
    assert!(!out.hit);
    assert!(out.fumble);
    assert_eq!(out.verdict(), Verdict::Fumble);
}

#[test]
fn wide_miss_with_high_second_die_is_plain_miss() {
    let mut dice = Dice::from_scripted(vec![5, 19]);
    let tool = ToolProfile::new("injector", 0);
    let out = resolve(&plain("medic"), &defender(10), Some(&tool), &mut dice).unwrap();
    assert!(!out.hit);
    assert!(!out.fumble);
    assert_eq!(out.verdict(), Verdict::Miss);
}

#[test]
fn meeting_defense_exactly_hits() {
    let attacker = CombatantProfile {
        hit_bonus: 2,
        agility_modifier: 2,
        ..plain("medic")
    };
    let tool = ToolProfile::new("injector", 1);
    let mut dice = Dice::from_scripted(vec![15]);
    let out = resolve(&attacker, &defender(20), Some(&tool), &mut dice).unwrap();
    assert_eq!(out.total_roll, 20);
    assert!(out.hit);
    assert!(!out.autohit);
    assert_eq!(out.margin, 0);
}

#[test]
fn unarmed_contributes_no_tool_bonus() {
    let attacker = CombatantProfile {
        hit_bonus: 3,
        ..plain("medic")
    };
    let mut dice = Dice::from_scripted(vec![10, 20]);
    let out = resolve(&attacker, &defender(14), None, &mut dice).unwrap();
    assert_eq!(out.total_roll, 13);
    assert!(!out.hit);
    assert_eq!(out.margin, 1);
}

#[test]
fn natural_hit_bonuses_from_both_sides_combine() {
    let attacker = CombatantProfile {
        natural_hit_bonus: 2,
        ..plain("medic")
    };
    let target = CombatantProfile {
        natural_hit_bonus: 1,
        ..defender(40)
    };
    let mut dice = Dice::from_scripted(vec![17]);
    let out = resolve(&attacker, &target, None, &mut dice).unwrap();
    assert!(out.autohit && out.hit);

    // A defender penalty can push the same roll back under the threshold.
    let slippery = CombatantProfile {
        natural_hit_bonus: -1,
        ..defender(40)
    };
    let mut dice = Dice::from_scripted(vec![17, 20]);
    let out = resolve(&attacker, &slippery, None, &mut dice).unwrap();
    assert!(!out.autohit);
    assert!(!out.hit);
}

#[test]
fn tool_natural_bonus_counts_toward_autohit() {
    let tool = ToolProfile {
        natural_hit_bonus: 2,
        ..ToolProfile::new("masterwork injector", 0)
    };
    let mut dice = Dice::from_scripted(vec![18]);
    let out = resolve(&plain("medic"), &defender(60), Some(&tool), &mut dice).unwrap();
    assert!(out.autohit);
}

#[test]
fn agility_helps_avoid_fumbles() {
    let nimble = CombatantProfile {
        agility_modifier: 3,
        ..plain("medic")
    };
    // total 4 + 3 = 7 vs 12 → margin 5; fumble die 2 + 3 = 5 <= 5 still fumbles
    let mut dice = Dice::from_scripted(vec![4, 2]);
    let out = resolve(&nimble, &defender(12), None, &mut dice).unwrap();
    assert_eq!(out.margin, 5);
    assert!(out.fumble);

    let mut dice = Dice::from_scripted(vec![4, 3]);
    let out = resolve(&nimble, &defender(12), None, &mut dice).unwrap();
    assert!(!out.fumble);
}

#[test]
fn negative_defense_is_rejected() {
    let mut dice = Dice::from_seed(1);
    let err = resolve(&plain("medic"), &defender(-1), None, &mut dice).unwrap_err();
    assert_eq!(err, ContestError::InvalidProfile { defense_value: -1 });
}

#[test]
fn zero_defense_is_accepted() {
    let mut dice = Dice::from_seed(3);
    let out = resolve(&plain("medic"), &defender(0), None, &mut dice).unwrap();
    assert!(out.hit);
}

#[test]
fn seeded_contests_replay() {
    let attacker = plain("medic");
    let target = defender(11);
    let mut a = Dice::from_seed(2025);
    let mut b = Dice::from_seed(2025);
    for _ in 0..50 {
        assert_eq!(
            resolve(&attacker, &target, None, &mut a).unwrap(),
            resolve(&attacker, &target, None, &mut b).unwrap()
        );
    }
}

#[test]
fn huge_hit_bonus_sums_without_overflow() {
    let attacker = CombatantProfile {
        hit_bonus: i32::MAX,
        agility_modifier: i32::MAX,
        ..plain("medic")
    };
    let tool = ToolProfile::new("injector", i32::MAX);
    let mut dice = Dice::from_scripted(vec![5, 5]);
    let out = resolve(&attacker, &defender(10), Some(&tool), &mut dice).unwrap();
    assert_eq!(out.total_roll, 5 + 3 * i64::from(i32::MAX));
    assert!(out.hit);
    assert_eq!(out.margin, 10 - out.total_roll);
}

#[test]
fn huge_defense_against_negative_total_fumbles_exactly() {
    let attacker = CombatantProfile {
        hit_bonus: -100,
        ..plain("medic")
    };
    let mut dice = Dice::from_scripted(vec![5, 20]);
    let out = resolve(&attacker, &defender(i32::MAX), None, &mut dice).unwrap();
    assert_eq!(out.total_roll, -95);
    assert_eq!(out.margin, i64::from(i32::MAX) + 95);
    assert!(!out.hit);
    assert!(out.fumble);
}

#[test]
fn extreme_natural_bonuses_do_not_overflow() {
    let attacker = CombatantProfile {
        natural_hit_bonus: i32::MIN,
        agility_modifier: i32::MIN,
        ..plain("medic")
    };
    let target = CombatantProfile {
        natural_hit_bonus: i32::MIN,
        ..defender(0)
    };
    let mut dice = Dice::from_scripted(vec![20, 20]);
    let out = resolve(&attacker, &target, None, &mut dice).unwrap();
    assert!(!out.autohit);
    assert!(!out.hit);
    // 20 + i32::MIN is far below the positive margin
    assert!(out.fumble);
}

#[test]
fn scripted_rolls_wrap_onto_the_die() {
    let mut dice = Dice::from_scripted(vec![25, 0]);
    let out = resolve(&plain("medic"), &defender(3), None, &mut dice).unwrap();
    assert_eq!(out.natural_roll, 5);
    let out = resolve(&plain("medic"), &defender(30), None, &mut dice).unwrap();
    assert_eq!(out.natural_roll, 20);
    assert!(out.autohit);
}
