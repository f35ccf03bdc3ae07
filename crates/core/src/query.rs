//! Entries query parameters and their validation.
//!
//! [`EntriesQuery`] is the flat, string-typed parameter set accepted by the
//! entries endpoint. [`EntriesQuery::parse`] is the single place where it is
//! turned into a [`GetEntriesOptions`] or rejected with a [`QueryError`].

use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::types::{AnswerLengthRange, EntryFilterOptions, GetEntriesOptions, OrderDirection};

/// Highest valid `dayOfWeek` (Saturday).
pub const MAX_DAY_OF_WEEK: i64 = 6;

/// Raw query parameters for `GET /entries`.
///
/// Empty strings are treated the same as absent parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntriesQuery {
    pub order_by: Option<String>,
    pub order_direction: Option<String>,
    pub page_size: Option<String>,
    pub page: Option<String>,
    pub source: Option<String>,
    pub day_of_week: Option<String>,
    pub answer_length_min: Option<String>,
    pub answer_length_max: Option<String>,
}

impl EntriesQuery {
    /// Build the parameter set that requests `options`.
    ///
    /// Optional filters are only included when set; `dayOfWeek = 0` is sent.
    pub fn from_options(options: &GetEntriesOptions) -> Self {
        let filter = &options.filter;
        Self {
            order_by: Some(options.order_by.clone()),
            order_direction: Some(options.order_direction.as_str().to_string()),
            page_size: Some(options.page_size.to_string()),
            page: Some(options.page.to_string()),
            source: filter.source.clone(),
            day_of_week: filter.day_of_week.map(|d| d.to_string()),
            answer_length_min: filter.answer_length.map(|r| r.min.to_string()),
            answer_length_max: filter.answer_length.map(|r| r.max.to_string()),
        }
    }

    /// `(name, value)` pairs for the parameters that are present, in a fixed order.
    pub fn to_pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("orderBy", &self.order_by),
            ("orderDirection", &self.order_direction),
            ("pageSize", &self.page_size),
            ("page", &self.page),
            ("source", &self.source),
            ("dayOfWeek", &self.day_of_week),
            ("answerLengthMin", &self.answer_length_min),
            ("answerLengthMax", &self.answer_length_max),
        ]
        .into_iter()
        .filter_map(|(name, value)| present(value).map(|v| (name, v)))
        .collect()
    }

    /// Validate a request's parameters. `None` means the request carried no
    /// query string at all.
    pub fn parse_request(query: Option<&Self>) -> Result<GetEntriesOptions, QueryError> {
        query.ok_or(QueryError::NoParameters)?.parse()
    }

    /// Validate the parameters and build the options they describe.
    pub fn parse(&self) -> Result<GetEntriesOptions, QueryError> {
        // --- Required parameters ---
        let required = [
            ("orderBy", present(&self.order_by)),
            ("orderDirection", present(&self.order_direction)),
            ("pageSize", present(&self.page_size)),
            ("page", present(&self.page)),
        ];
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect();
        let [(_, Some(order_by)), (_, Some(order_direction)), (_, Some(page_size)), (_, Some(page))] =
            required
        else {
            return Err(QueryError::MissingRequired(missing));
        };

        // --- Ordering ---
        let order_direction = match order_direction {
            "ASC" => OrderDirection::Asc,
            "DESC" => OrderDirection::Desc,
            _ => return Err(QueryError::InvalidOrderDirection),
        };

        // --- Pagination ---
        let page_size = parse_int("pageSize", page_size)?;
        let page = parse_int("page", page)?;
        if page_size < 1 {
            return Err(QueryError::NonPositivePageSize);
        }
        if page < 0 {
            return Err(QueryError::NegativePage);
        }

        // --- Filtering ---
        let source = present(&self.source);
        let day_of_week = match present(&self.day_of_week) {
            Some(_) if source.is_none() => return Err(QueryError::DayOfWeekWithoutSource),
            Some(raw) => {
                let day = parse_int("dayOfWeek", raw)?;
                if !(0..=MAX_DAY_OF_WEEK).contains(&day) {
                    return Err(QueryError::DayOfWeekOutOfRange);
                }
                Some(day as u8)
            }
            None => None,
        };

        let answer_length = match (
            present(&self.answer_length_min),
            present(&self.answer_length_max),
        ) {
            (None, None) => None,
            (Some(min), Some(max)) => {
                let min = parse_int("answerLengthMin", min)?;
                let max = parse_int("answerLengthMax", max)?;
                if min < 0 || max < 0 {
                    return Err(QueryError::NegativeAnswerLength);
                }
                if min > max {
                    return Err(QueryError::InvertedAnswerLength);
                }
                Some(AnswerLengthRange {
                    min: to_u32("answerLengthMin", min)?,
                    max: to_u32("answerLengthMax", max)?,
                })
            }
            _ => return Err(QueryError::IncompleteAnswerLength),
        };

        Ok(GetEntriesOptions {
            filter: EntryFilterOptions {
                source: source.map(str::to_string),
                day_of_week,
                answer_length,
            },
            order_by: order_by.to_string(),
            order_direction,
            page_size: to_u32("pageSize", page_size)?,
            page: to_u32("page", page)?,
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_int(name: &'static str, raw: &str) -> Result<i64, QueryError> {
    raw.parse::<i64>()
        .map_err(|_| QueryError::NotAnInteger { name })
}

fn to_u32(name: &'static str, value: i64) -> Result<u32, QueryError> {
    u32::try_from(value).map_err(|_| QueryError::NotAnInteger { name })
}
