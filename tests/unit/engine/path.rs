use super::*;

#[test]
fn parses_and_formats_comma_lists() {
    let p: StepPath = "2, 0,1".parse().unwrap();
    assert_eq!(p.steps(), &[2, 0, 1]);
    assert_eq!(p.to_string(), "2,0,1");
    assert_eq!(StepPath::parse("#3").unwrap(), StepPath(vec![3]));
}

#[test]
fn rejects_malformed_paths() {
    for bad in ["", "#", "1,,2", "a", "1,-2"] {
        let err = StepPath::parse(bad).unwrap_err();
        assert!(matches!(err, SlipwayError::Validation(_)), "{bad:?}");
    }
}

#[test]
fn compares_level_by_level() {
    let target = StepPath(vec![2, 2]);
    assert!(StepPath(vec![-1]).is_before(&target));
    assert!(StepPath(vec![1]).is_before(&target));
    assert!(StepPath(vec![2, 0]).is_before(&target));
    assert!(!StepPath(vec![2, 2]).is_before(&target));
    assert!(!StepPath(vec![2, 3]).is_before(&target));
    assert!(!StepPath(vec![3]).is_before(&target));
    // a target that stops at an upper level is reached there
    assert!(!StepPath(vec![2, 0]).is_before(&StepPath(vec![2])));
}
