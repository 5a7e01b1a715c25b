use chrono::{NaiveDate, NaiveTime};

/// Parses a `YYYY-MM-DD` date as typed by a user. Years outside
/// 1970..=2100 are rejected to keep trigger arithmetic sane.
pub fn parse_date(datestr: &str) -> anyhow::Result<NaiveDate> {
    let parts = datestr.split('-').collect::<Vec<_>>();
    if parts.len() != 3 {
        return Err(anyhow::Error::msg(datestr.to_string()));
    }

    let year = parts[0].parse::<i32>();
    let month = parts[1].parse::<u32>();
    let day = parts[2].parse::<u32>();

    match (year, month, day) {
        (Ok(year), Ok(month), Ok(day)) if (1970..=2100).contains(&year) => {
            NaiveDate::from_ymd_opt(year, month, day)
                .ok_or_else(|| anyhow::Error::msg(datestr.to_string()))
        }
        _ => Err(anyhow::Error::msg(datestr.to_string())),
    }
}

/// Parses a `HH:MM` time as typed by a user. Reminders are minute
/// granular, seconds are always zero.
pub fn parse_time(timestr: &str) -> anyhow::Result<NaiveTime> {
    let parts = timestr.split(':').collect::<Vec<_>>();
    if parts.len() != 2 {
        return Err(anyhow::Error::msg(timestr.to_string()));
    }

    match (parts[0].parse::<u32>(), parts[1].parse::<u32>()) {
        (Ok(hour), Ok(minute)) => NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| anyhow::Error::msg(timestr.to_string())),
        _ => Err(anyhow::Error::msg(timestr.to_string())),
    }
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_time(time: &NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_accepts_valid_dates() {
        let valid_dates = vec![
            "2018-1-1",
            "2025-12-31",
            "2020-1-12",
            "2020-2-29",
            "2020-02-2",
            "2020-02-02",
            "2020-2-09",
        ];

        for date in &valid_dates {
            assert!(parse_date(date).is_ok());
        }
    }

    #[test]
    fn it_rejects_invalid_dates() {
        let invalid_dates = vec![
            "2018--1-1",
            "2020-1-32",
            "2020-2-30",
            "2021-2-29",
            "2020-0-1",
            "2020-1-0",
            "1930-1-1",
            "2020-1",
            "today",
        ];

        for date in &invalid_dates {
            assert!(parse_date(date).is_err());
        }
    }

    #[test]
    fn it_accepts_valid_times() {
        let valid_times = vec!["0:0", "00:00", "9:30", "09:05", "23:59"];

        for time in &valid_times {
            assert!(parse_time(time).is_ok());
        }
    }

    #[test]
    fn it_rejects_invalid_times() {
        let invalid_times = vec!["24:00", "12:60", "12", "12:00:00", "noon", "-1:30"];

        for time in &invalid_times {
            assert!(parse_time(time).is_err());
        }
    }

    #[test]
    fn it_formats_round_trip() {
        let date = parse_date("2021-2-21").unwrap();
        assert_eq!(format_date(&date), "2021-02-21");
        let time = parse_time("9:05").unwrap();
        assert_eq!(format_time(&time), "09:05");
    }
}
