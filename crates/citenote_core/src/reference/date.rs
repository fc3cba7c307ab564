/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Year extraction from the date shapes found in reference-manager exports.
//!
//! CSL-JSON carries dates as `{"date-parts": [[2019, 5, 1]]}`, as
//! `{"raw": "2019-05-01"}` or `{"literal": "..."}`, and some exporters
//! emit a bare `year` field or an EDTF string in `issued`.

use serde_json::Value;
use winnow::ascii::{digit1, space0};
use winnow::combinator::{opt, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::one_of;

/// Derive the publication year from a raw record's fields.
pub fn year_of(fields: &serde_json::Map<String, Value>) -> Option<i32> {
    if let Some(year) = fields.get("year").and_then(year_from_scalar) {
        return Some(year);
    }

    match fields.get("issued")? {
        Value::Object(issued) => {
            let first_part = issued
                .get("date-parts")
                .and_then(Value::as_array)
                .and_then(|parts| parts.first())
                .and_then(Value::as_array)
                .and_then(|part| part.first());
            if let Some(year) = first_part.and_then(year_from_scalar) {
                return Some(year);
            }
            ["raw", "literal"]
                .iter()
                .filter_map(|key| issued.get(*key).and_then(Value::as_str))
                .find_map(parse_leading_year)
        }
        issued => year_from_scalar(issued),
    }
}

fn year_from_scalar(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => parse_leading_year(s),
        _ => None,
    }
}

/// Parse the leading signed integer of an ISO/EDTF-like date string.
///
/// Years are zero-padded in EDTF (`0850`, `-0050`), so the digits are read as
/// a run and converted afterwards.
pub fn parse_leading_year(input: &str) -> Option<i32> {
    let mut input = input;
    let (sign, digits) = leading_year.parse_next(&mut input).ok()?;
    let year = digits.parse::<i32>().ok()?;
    Some(if sign == Some('-') { -year } else { year })
}

fn leading_year<'s>(input: &mut &'s str) -> Result<(Option<char>, &'s str), ErrMode<ContextError>> {
    preceded(space0, (opt(one_of(['+', '-'])), digit1)).parse_next(input)
}
