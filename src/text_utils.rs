use std::ops::Index;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;

pub const HEADER_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

fn to_int<T: std::str::FromStr>(num_str: &str, date_str: &str) -> Result<T, String> {
    match num_str.parse::<T>() {
        Ok(x) => Ok(x),
        Err(_) => Err(format!("Error parsing {} from the date {}", num_str, date_str)),
    }
}

/// Accepts `YYYY-MM-DD HH:MM:SS[.mmm]` and RFC 3339. RFC 3339 values are
/// converted to UTC.
pub fn parse_date_time(buf: &str) -> Result<NaiveDateTime, String> {
    lazy_static! {
        static ref DATE_REGEX: Regex = Regex::new(
            r#"^\s*(\d{4})-(\d{1,2})-(\d{1,2}) (\d{1,2}):(\d{1,2}):(\d{1,2})(?:\.(\d{1,3}))?\s*$"#
        ).unwrap();
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(buf.trim()) {
        return Ok(dt.naive_utc());
    }

    let Some(caps) = DATE_REGEX.captures(buf) else {
        return Err(format!("Unable to parse date time {}", buf));
    };

    let to_i32 = |num_str: &str| to_int::<i32>(num_str, buf);
    let to_u32 = |num_str: &str| to_int::<u32>(num_str, buf);

    let y: i32 = to_i32(caps.index(1))?;
    let m: u32 = to_u32(caps.index(2))?;
    let d: u32 = to_u32(caps.index(3))?;
    let h: u32 = to_u32(caps.index(4))?;
    let mn: u32 = to_u32(caps.index(5))?;
    let s: u32 = to_u32(caps.index(6))?;
    // ".5" means 500 milliseconds
    let ms: u32 = match caps.get(7) {
        Some(frac) => to_u32(&format!("{:0<3}", frac.as_str()))?,
        None => 0,
    };

    let date = NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| format!("Invalid date {}", buf))?;
    let time = NaiveTime::from_hms_milli_opt(h, mn, s, ms).ok_or_else(|| format!("Invalid time {}", buf))?;

    Ok(NaiveDateTime::new(date, time))
}

pub fn format_header_date(date_time: &NaiveDateTime) -> String {
    date_time.format(HEADER_DATE_FORMAT).to_string()
}

pub fn format_date_time(date_time: &NaiveDateTime) -> (String, String) {
    let date = date_time.format("%Y-%m-%d").to_string();
    let time = date_time.format("%H:%M:%S").to_string();
    (date, time)
}

/// Turns a post name into a URL-safe identifier: ASCII only, lower case,
/// words joined by a single `-`.
pub fn slugify(name: &str) -> String {
    let ascii = unidecode::unidecode(name);

    let mut slug = String::with_capacity(ascii.len());
    let mut prev_dash = true;
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Blank means absent or whitespace only.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::Timelike;

    use super::*;

    #[test]
    fn test_parse_date_time() {
        let date_time = parse_date_time("2017-09-10 10:42:32.123").unwrap();
        let (date, time) = format_date_time(&date_time);
        assert_eq!(date, "2017-09-10");
        assert_eq!(time, "10:42:32");
        assert_eq!(date_time.nanosecond(), 123_000_000);

        let date_time = parse_date_time("2017-09-10 10:42:32").unwrap();
        let (date, time) = format_date_time(&date_time);
        assert_eq!(date, "2017-09-10");
        assert_eq!(time, "10:42:32");

        let date_time = parse_date_time("2017-09-10 10:42:32.5").unwrap();
        assert_eq!(date_time.nanosecond(), 500_000_000);

        let date_time = parse_date_time("2017-09-10T10:42:32+02:00").unwrap();
        assert_eq!(format_header_date(&date_time), "2017-09-10 08:42:32.000");
    }

    #[test]
    fn test_parse_invalid_date_time() {
        assert!(parse_date_time("yesterday").is_err());
        assert!(parse_date_time("2017-13-10 10:42:32").is_err());
        assert!(parse_date_time("2017-09-10 25:42:32").is_err());
    }

    #[test]
    fn test_header_date_round_trip() {
        let date_time = parse_date_time("2024-02-27 06:20:53.042").unwrap();
        assert_eq!(format_header_date(&date_time), "2024-02-27 06:20:53.042");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Post title of mine - dir2  "), "post-title-of-mine-dir2");
        assert_eq!(slugify("Ábaco & Coração!"), "abaco-coracao");
        assert_eq!(slugify("C++ in 2024: what's new?"), "c-in-2024-what-s-new");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(None));
        assert!(is_blank(Some("")));
        assert!(is_blank(Some("  \t")));
        assert!(!is_blank(Some("text")));
    }
}
