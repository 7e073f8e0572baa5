//! 时间工具函数: 查询参数解析
//!
//! 预约时间一律按业务时区的墙钟时间处理，不做时间戳转换。

use chrono::{NaiveDate, NaiveTime};

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 解析时间字符串 (HH:MM 或 HH:MM:SS)
pub fn parse_time(time: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .map_err(|_| AppError::validation(format!("Invalid time format: {}", time)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2099-06-01").unwrap(),
            NaiveDate::from_ymd_opt(2099, 6, 1).unwrap()
        );
        assert!(parse_date("01/06/2099").is_err());
    }

    #[test]
    fn test_parse_time_both_formats() {
        let seven = NaiveTime::from_hms_opt(19, 0, 0).unwrap();
        assert_eq!(parse_time("19:00").unwrap(), seven);
        assert_eq!(parse_time("19:00:00").unwrap(), seven);
        // Seconds survive parsing; slot validation rejects them later
        assert_eq!(
            parse_time("19:00:30").unwrap(),
            NaiveTime::from_hms_opt(19, 0, 30).unwrap()
        );
        assert!(parse_time("7pm").is_err());
    }
}
