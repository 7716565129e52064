use super::*;

#[test]
fn test_creation() {
    let score = HardSoftScore::of(-2, 100);
    assert_eq!(score.hard(), -2);
    assert_eq!(score.soft(), 100);

    assert_eq!(HardSoftScore::of_hard(-5), HardSoftScore::of(-5, 0));
    assert_eq!(HardSoftScore::of_soft(10), HardSoftScore::of(0, 10));
}

#[test]
fn test_feasibility() {
    assert!(HardSoftScore::of(0, -1000).is_feasible());
    assert!(!HardSoftScore::of(-1, 0).is_feasible());
    assert!(HardSoftScore::ZERO.is_zero());
}

#[test]
fn test_comparison_hard_first() {
    assert!(HardSoftScore::of(0, -10_000) > HardSoftScore::of(-1, 10_000));
    assert!(HardSoftScore::of(-1, 5) > HardSoftScore::of(-1, 4));
    assert_eq!(
        HardSoftScore::of(-3, 2).cmp(&HardSoftScore::of(-3, 2)),
        std::cmp::Ordering::Equal
    );
}

#[test]
fn test_arithmetic() {
    let a = HardSoftScore::of(-2, 30);
    let b = HardSoftScore::of(-1, -10);
    assert_eq!(a + b, HardSoftScore::of(-3, 20));
    assert_eq!(a - b, HardSoftScore::of(-1, 40));
    assert_eq!(-a, HardSoftScore::of(2, -30));

    let mut c = a;
    c += b;
    c -= b;
    assert_eq!(c, a);

    let total: HardSoftScore = [a, b, HardSoftScore::ONE_SOFT].into_iter().sum();
    assert_eq!(total, HardSoftScore::of(-3, 21));
}

#[test]
fn test_of_level() {
    assert_eq!(HardSoftScore::of_level(ScoreLevel::Hard, -4), HardSoftScore::of_hard(-4));
    assert_eq!(HardSoftScore::of_level(ScoreLevel::Soft, 7), HardSoftScore::of_soft(7));
}

#[test]
fn test_display_and_parse() {
    let score = HardSoftScore::of(-20, -1354);
    assert_eq!(score.to_string(), "-20hard/-1354soft");
    assert_eq!("-20hard/-1354soft".parse::<HardSoftScore>(), Ok(score));
    assert_eq!(" 0hard/0soft ".parse::<HardSoftScore>(), Ok(HardSoftScore::ZERO));
}

#[test]
fn test_parse_errors() {
    assert!("0hard".parse::<HardSoftScore>().is_err());
    assert!("0soft/0hard".parse::<HardSoftScore>().is_err());
    assert!("xhard/0soft".parse::<HardSoftScore>().is_err());
}
