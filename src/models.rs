use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Sentinel label used when a record carries no administration route.
pub const MISSING_ROUTE: &str = "missing";

/// Pagination block inside the response `meta` (position `meta.results`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    pub skip: u32,
    pub limit: u32,
    pub total: u32,
}

/// Metadata section returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    pub results: PageMeta,
}

/// One bounded-size response from the label search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPage {
    pub meta: Meta,
    pub results: Vec<LabelRecord>,
}

/// Raw drug-label record from the API (one element of `results`).
///
/// Only the fields this crate consumes are modeled; everything else in the
/// (very wide) label document is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelRecord {
    pub effective_time: String,
    /// Vendor metadata block. The API serializes an empty object `{}` for
    /// records without it.
    #[serde(default)]
    pub openfda: OpenFda,
    #[serde(default, deserialize_with = "de_string_or_list")]
    pub spl_product_data_elements: Vec<String>,
}

/// The `openfda` vendor metadata block.
///
/// The API usually serializes these fields as arrays of strings, but single
/// values occasionally appear as bare strings. Accept both and normalize to
/// a list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenFda {
    #[serde(default, deserialize_with = "de_string_or_list")]
    pub manufacturer_name: Vec<String>,
    #[serde(default, deserialize_with = "de_string_or_list")]
    pub generic_name: Vec<String>,
    #[serde(default, deserialize_with = "de_string_or_list")]
    pub route: Vec<String>,
}

impl OpenFda {
    pub fn is_empty(&self) -> bool {
        self.manufacturer_name.is_empty() && self.generic_name.is_empty() && self.route.is_empty()
    }
}

/// Serde helper: parse a `Vec<String>` from either a JSON array of strings or
/// a single bare string.
fn de_string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    struct StringOrListVisitor;

    impl<'de> Visitor<'de> for StringOrListVisitor {
        type Value = Vec<String>;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a string or a list of strings")
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![s.to_string()])
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut out = Vec::new();
            while let Some(s) = seq.next_element::<String>()? {
                out.push(s);
            }
            Ok(out)
        }
    }

    deserializer.deserialize_any(StringOrListVisitor)
}

/// Tidy structure used by this crate (one row = one usable label record).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelRow {
    pub generic_name: String,
    pub route: Option<String>,
    pub year: i32,
    pub num_ingredients: usize,
    pub manufacturer: String,
}

/// Year encoded in an `effective_time` stamp (`YYYYMMDD`).
pub fn effective_year(stamp: &str) -> Result<i32> {
    let date = NaiveDate::parse_from_str(stamp.trim(), "%Y%m%d")
        .with_context(|| format!("invalid effective_time {:?}", stamp))?;
    Ok(date.year())
}

impl LabelRecord {
    /// Convert to a tidy row. Returns `Ok(None)` when the record has no
    /// usable vendor metadata (empty `openfda`, or no manufacturer/generic
    /// name); a malformed `effective_time` or an absent
    /// `spl_product_data_elements` field is a schema error.
    pub fn into_row(self) -> Result<Option<LabelRow>> {
        if self.openfda.is_empty() {
            return Ok(None);
        }
        let (Some(manufacturer), Some(generic_name)) = (
            self.openfda.manufacturer_name.first(),
            self.openfda.generic_name.first(),
        ) else {
            return Ok(None);
        };

        let year = effective_year(&self.effective_time)?;
        let elements = self
            .spl_product_data_elements
            .first()
            .ok_or_else(|| anyhow!("record is missing spl_product_data_elements"))?;
        let num_ingredients = elements.split_whitespace().count();
        let route = self.openfda.route.first().cloned();

        Ok(Some(LabelRow {
            generic_name: generic_name.clone(),
            route,
            year,
            num_ingredients,
            manufacturer: manufacturer.clone(),
        }))
    }
}

impl SearchPage {
    /// Extract one row per usable record, in document order.
    pub fn rows(self) -> Result<Vec<LabelRow>> {
        let mut out = Vec::with_capacity(self.results.len());
        for record in self.results {
            if let Some(row) = record.into_row()? {
                out.push(row);
            }
        }
        Ok(out)
    }
}

/// Grouping key used in stats and plotting. `route` is `None` for the plain
/// yearly grouping and carries the [`MISSING_ROUTE`] sentinel in the
/// by-route variant when a record had no route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub year: i32,
    pub route: Option<String>,
}
