use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};

use crate::record::CheckIn;

/// 直近の連続打卡日数を計算する。
///
/// 同じ日の記録は 1 日として扱う。最新の記録が今日か昨日であれば連続は続いているとみなし、
/// そこから 1 日ずつ遡って途切れるまで数える。それより古ければ 0。
pub fn streak(checkins: &[CheckIn], today: NaiveDate) -> u32 {
    let dates: BTreeSet<NaiveDate> = checkins
        .iter()
        .map(|c| c.date)
        .filter(|d| *d <= today)
        .collect();

    let Some(&latest) = dates.last() else {
        return 0;
    };

    let anchor = if latest == today {
        today
    } else if today.pred_opt() == Some(latest) {
        latest
    } else {
        return 0;
    };

    let mut count = 0u32;
    for date in dates.iter().rev() {
        if anchor.checked_sub_days(Days::new(u64::from(count))) != Some(*date) {
            break;
        }
        count += 1;
    }
    count
}
