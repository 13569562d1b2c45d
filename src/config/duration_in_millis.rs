use std::time::Duration;

use serde::{de::Visitor, Deserialize};

use super::split_unit::split_unit;

#[derive(Default, Debug, Clone, Copy)]
pub struct DurationInMillis(u64);

impl DurationInMillis {
    #[inline(always)]
    pub fn u64(&self) -> u64 {
        self.0
    }

    #[inline(always)]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.0)
    }

    #[inline(always)]
    pub fn update(&mut self, v: u64) {
        self.0 = v;
    }

    #[inline(always)]
    pub fn less_then(&mut self, cmp: u64, v: u64) {
        if self.0 < cmp {
            self.0 = v;
        }
    }
}

pub struct DurationInMillisVisitor;

impl<'de> Visitor<'de> for DurationInMillisVisitor {
    type Value = DurationInMillis;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a duration value, such as `30s`, `1500`")
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        if v < 0 {
            return Err(E::custom(format!("bad duration value, `{}`", v)));
        }
        Ok(DurationInMillis(v as u64))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(DurationInMillis(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        self.visit_string(v.to_string())
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        if v.is_empty() {
            return Ok(DurationInMillis(0));
        }

        let (nums, units) = split_unit(v.as_str());
        let num: u64;
        match nums.parse::<u64>() {
            Ok(v) => {
                num = v;
            }
            Err(_) => {
                return Err(E::custom(format!("bad number value, `{}`", nums)));
            }
        }

        let unit: u64;
        match units.to_lowercase().trim() {
            "" | "ms" | "millis" => {
                unit = 1;
            }
            "s" | "sec" | "seconds" => {
                unit = 1000;
            }
            "m" | "min" | "minutes" | "minute" => {
                unit = 60 * 1000;
            }
            "h" | "hours" | "hour" => {
                unit = 60 * 60 * 1000;
            }
            "d" | "days" | "day" => {
                unit = 24 * 60 * 60 * 1000;
            }
            _ => {
                return Err(E::custom(format!("bad unit, `{}`", units)));
            }
        }
        Ok(DurationInMillis(num * unit))
    }
}

impl<'de> Deserialize<'de> for DurationInMillis {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(DurationInMillisVisitor)
    }
}
