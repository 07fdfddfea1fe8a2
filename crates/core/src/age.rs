// Age arithmetic

use chrono::{Datelike, NaiveDate};

/// Age in whole years on `today` for someone born on `birth`.
///
/// The year difference is reduced by one while the birthday has not yet been
/// reached in `today`'s year. Someone born on Feb 29 turns a year older on Mar 1
/// in non-leap years. Birth dates after `today` give a negative age.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let birthday_pending = (today.month(), today.day()) < (birth.month(), birth.day());
    today.year() - birth.year() - i32::from(birthday_pending)
}
