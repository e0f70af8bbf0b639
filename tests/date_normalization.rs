use pubcatalog::datetext::{
    DateError, canonical_date, days_between, earliest_date, find_day_month_year, latest_date,
    normalize_day_month_year, normalize_partial_date,
};

#[test]
fn partial_dates_default_missing_parts() {
    assert_eq!(normalize_partial_date("2000").unwrap(), "2000-01-01");
    assert_eq!(normalize_partial_date("2000-03").unwrap(), "2000-03-01");
    assert_eq!(normalize_partial_date("2000-3-7").unwrap(), "2000-03-07");
    assert_eq!(normalize_partial_date("2024-02-29").unwrap(), "2024-02-29");
}

#[test]
fn partial_normalization_is_idempotent() {
    for input in ["1999", "2000-03", "2012-12-31", "0987-7-4"] {
        let once = normalize_partial_date(input).expect("valid partial date");
        let twice = normalize_partial_date(&once).expect("canonical date");
        assert_eq!(once, twice, "normalizing {} twice changed it", input);
    }
}

#[test]
fn partial_dates_reject_bad_input() {
    assert!(matches!(normalize_partial_date("2023-02-30"), Err(DateError::NotACalendarDate(_))));
    assert!(matches!(normalize_partial_date("2023-13"), Err(DateError::Month(_))));
    assert!(matches!(normalize_partial_date("abcd"), Err(DateError::Year(_))));
    // range check comes before the calendar check
    assert!(matches!(normalize_partial_date("2023-02-32"), Err(DateError::Day(_))));
    assert!(matches!(normalize_partial_date("2023-00"), Err(DateError::Month(_))));
    assert!(matches!(normalize_partial_date("2023-01-02-03"), Err(DateError::Shape(_))));
    // a malformed segment is named, not the whole date
    assert_eq!(normalize_partial_date("2023-xx"), Err(DateError::Month("xx".to_string())));
    assert_eq!(normalize_partial_date("2023-01-1a"), Err(DateError::Day("1a".to_string())));
    assert_eq!(normalize_partial_date("2023- 1"), Err(DateError::Month(" 1".to_string())));
    assert!(matches!(normalize_partial_date(""), Err(DateError::Year(_))));
    assert!(matches!(normalize_partial_date("-2023"), Err(DateError::Year(_))));
    assert!(normalize_partial_date("2023-02-29").is_err(), "2023 is not a leap year");
}

#[test]
fn day_month_year_fragments_normalize() {
    assert_eq!(normalize_day_month_year("1st Feb 2010").unwrap(), "2010-02-01");
    assert_eq!(normalize_day_month_year("18th October 2023").unwrap(), "2023-10-18");
    assert_eq!(normalize_day_month_year("05 jun 2060").unwrap(), "2060-06-05");
    assert!(matches!(normalize_day_month_year("31 February 2020"), Err(DateError::NotACalendarDate(_))));
    assert!(matches!(normalize_day_month_year("3 Foo 2020"), Err(DateError::MonthName(_))));
    assert!(matches!(normalize_day_month_year("3 March"), Err(DateError::Shape(_))));
}

#[test]
fn fragments_are_found_left_to_right() {
    let found = find_day_month_year("Received 18th October 2023; Accepted 05 Jun 2060");
    assert_eq!(found, vec!["18th October 2023", "05 Jun 2060"]);
    assert!(find_day_month_year("no dates in here, not even 2023").is_empty());
    // shape only, the calendar is not consulted
    assert_eq!(find_day_month_year("on 31 February 9999"), vec!["31 February 9999"]);
    assert!(find_day_month_year("32 March 2001").is_empty());
    // month names match regardless of case
    assert_eq!(find_day_month_year("on 9 DEC 2000"), vec!["9 DEC 2000"]);
    assert_eq!(find_day_month_year("on 9 december 2000"), vec!["9 december 2000"]);
}

#[test]
fn earliest_and_latest_bound_the_set() {
    let dates = ["2001-05-06", "1999-12-31", "2010-01-01", "2000-02-29"];
    let earliest = earliest_date(dates).unwrap();
    let latest = latest_date(dates).unwrap();
    assert_eq!(earliest, "1999-12-31");
    assert_eq!(latest, "2010-01-01");
    for date in dates {
        assert!(earliest.as_str() <= date && date <= latest.as_str());
    }
    assert_eq!(earliest_date(Vec::<String>::new()), Err(DateError::EmptySet));
    assert!(matches!(latest_date(["2001-05-06", "2001-5-6"]), Err(DateError::NotIso(_))));
}

#[test]
fn days_between_counts_calendar_days() {
    assert_eq!(days_between("2020-02-01", "2020-03-01"), Some(29));
    assert_eq!(days_between("2021-02-01", "2021-03-01"), Some(28));
    assert_eq!(days_between("2020-03-01", "2020-02-01"), Some(-29));
    assert_eq!(days_between("2020-03", "2020-04-01"), None);
}

#[test]
fn canonical_date_handles_both_forms() {
    assert_eq!(canonical_date("2019-07").as_deref(), Some("2019-07-01"));
    assert_eq!(canonical_date(" 1993 ").as_deref(), Some("1993-01-01"));
    assert_eq!(canonical_date("Received: 1st Feb 1993").as_deref(), Some("1993-02-01"));
    // the first fragment that is a real date wins
    assert_eq!(
        canonical_date("31 February 2020, revised 2 March 2020").as_deref(),
        Some("2020-03-02")
    );
    assert_eq!(canonical_date("sometime last spring"), None);
}
