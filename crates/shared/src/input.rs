//! Normalization of loosely-typed request fields.
//!
//! Form-driven clients post numbers as strings and clear optional inputs by
//! sending `""`. Payload structs keep such fields as [`Field`] and convert them
//! once into typed values with the helpers below, so `""`, `null` and a missing
//! key all end up as `None`.

use std::{fmt::Display, str::FromStr};

use serde::Deserialize;
use time::{Date, PrimitiveDateTime};

use crate::{Error, Result, Slot};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Field {
    Flag(bool),
    Number(serde_json::Number),
    Text(String),
}

impl Field {
    fn into_text(self) -> Option<String> {
        let value = match self {
            Field::Flag(value) => value.to_string(),
            Field::Number(value) => value.to_string(),
            Field::Text(value) => value,
        };

        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Field::Text(value.to_owned())
    }
}

impl From<String> for Field {
    fn from(value: String) -> Self {
        Field::Text(value)
    }
}

impl From<i64> for Field {
    fn from(value: i64) -> Self {
        Field::Number(value.into())
    }
}

impl From<bool> for Field {
    fn from(value: bool) -> Self {
        Field::Flag(value)
    }
}

pub fn text(field: Option<Field>) -> Option<String> {
    field.and_then(Field::into_text)
}

pub fn parse<T>(field: Option<Field>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    text(field)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|e| Error::Invalid(format!("invalid {name} `{value}`: {e}")))
        })
        .transpose()
}

pub fn date(field: Option<Field>) -> Result<Option<Date>> {
    text(field).map(|value| crate::parse_date(&value)).transpose()
}

pub fn slot(field: Option<Field>) -> Result<Option<Slot>> {
    text(field).map(|value| value.parse::<Slot>()).transpose()
}

pub fn timestamp(field: Option<Field>) -> Result<Option<PrimitiveDateTime>> {
    text(field)
        .map(|value| crate::parse_visit_start(&value))
        .transpose()
}

pub fn flag(field: Option<Field>, name: &str) -> Result<Option<bool>> {
    match field {
        Some(Field::Flag(value)) => Ok(Some(value)),
        other => match text(other).as_deref().map(str::trim) {
            None => Ok(None),
            Some("true" | "1" | "on") => Ok(Some(true)),
            Some("false" | "0" | "off") => Ok(Some(false)),
            Some(value) => Err(Error::Invalid(format!("invalid {name} `{value}`"))),
        },
    }
}

pub fn required<T>(value: Option<T>, name: &str) -> Result<T> {
    value.ok_or_else(|| Error::Invalid(format!("{name} is required")))
}
