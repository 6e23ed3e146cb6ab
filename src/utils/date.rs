use chrono::NaiveDate;

pub const DATE_FMT: &str = "%Y-%m-%d";

pub(crate) fn parse_date(str_date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(str_date.trim(), DATE_FMT).ok()
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    format!("{}", date.format(DATE_FMT))
}

// optional calendar dates travel as "YYYY-MM-DD"; null and "" both mean absent
pub mod serializer {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde::de::Error;
    use crate::utils::date::{format_date, DATE_FMT};

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        date.map(format_date).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        let str_date: Option<String> = Deserialize::deserialize(deserializer)?;
        match str_date {
            Some(s) if !s.trim().is_empty() => {
                NaiveDate::parse_from_str(s.trim(), DATE_FMT).map(Some).map_err(D::Error::custom)
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use crate::utils::date::{format_date, parse_date};

    #[tokio::test]
    async fn test_should_parse_and_format_dates() {
        let date = NaiveDate::from_ymd_opt(2023, 4, 9).expect("valid date");
        assert_eq!("2023-04-09", format_date(date));
        assert_eq!(Some(date), parse_date("2023-04-09"));
        assert_eq!(None, parse_date("09/04/2023"));
    }
}
