use rstest::rstest;
use yangc::hir::is_valid_date;

#[rstest]
#[case("2017-03-10")]
#[case("2016-05-26")]
#[case("2000-02-29")] // leap year
fn accepts_calendar_valid_dates(#[case] date: &str) {
    assert!(is_valid_date(date), "expected '{date}' to be a valid date");
}

#[rstest]
#[case("2017-02-30")] // no such day
#[case("2019-02-29")] // not a leap year
#[case("2017-13-01")] // no such month
#[case("2017/03/10")] // wrong separator
#[case("not-a-date")]
#[case("")]
fn rejects_calendar_invalid_or_malformed_dates(#[case] date: &str) {
    assert!(!is_valid_date(date), "expected '{date}' to be rejected");
}
