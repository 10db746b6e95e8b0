use super::*;

#[test]
fn roman_numerals() {
    let up = CounterStyle::UpperRoman;
    assert_eq!(up.render(1), "I");
    assert_eq!(up.render(4), "IV");
    assert_eq!(up.render(9), "IX");
    assert_eq!(up.render(14), "XIV");
    assert_eq!(up.render(1994), "MCMXCIV");
    assert_eq!(CounterStyle::LowerRoman.render(3), "iii");
    assert_eq!(up.render(0), "0");
}

#[test]
fn styles_by_depth() {
    use CounterStyle::*;
    let styles: Vec<_> = (0..6).map(CounterStyle::at_depth).collect();
    assert_eq!(
        styles,
        vec![UpperRoman, Decimal, LowerRoman, UpperRoman, Decimal, LowerRoman]
    );
}

#[test]
fn labels_whole_paths() {
    assert_eq!(counter_label(&StepPath(vec![2, 1])), "III.2");
    assert_eq!(counter_label(&StepPath(vec![0, 0, 3, 1])), "I.1.iv.II");
    assert_eq!(counter_label(&StepPath(vec![])), "");
}
