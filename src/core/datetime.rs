use crate::core::errors::{Error, Result};
use chrono::{DateTime, NaiveDateTime, Utc};

/*-------------------------------------------------------------------------------------------------
  DateTime Format
-------------------------------------------------------------------------------------------------*/

const AWS_IP_RANGES_DATETIME_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// Parse an AWS IP Ranges `createDate` value (`YYYY-MM-DD-hh-mm-ss`, UTC).
pub fn parse(value: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, AWS_IP_RANGES_DATETIME_FORMAT)
        .map(|naive_date_time| naive_date_time.and_utc())
        .map_err(Error::data)
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
