use std::borrow::Cow;

use notes_gateway_sdk::FilterSet;

/// Encode filters as a query string (without the leading `?`).
///
/// Values of one field are joined by a literal `,` and fields by `&`. Field
/// names and values are percent-encoded first, so a `,`, `&` or `=` inside a
/// value can never be mistaken for a separator. Filters without values are
/// skipped; `None` means there is nothing to append.
#[must_use]
pub fn encode_filters(filters: &FilterSet) -> Option<String> {
    let pairs: Vec<String> = filters
        .iter()
        .filter(|f| !f.values.is_empty())
        .map(|f| {
            let values: Vec<Cow<'_, str>> =
                f.values.iter().map(|v| urlencoding::encode(v)).collect();
            format!("{}={}", urlencoding::encode(&f.field), values.join(","))
        })
        .collect();

    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("&"))
    }
}

/// Append encoded filters to a path or URL.
#[must_use]
pub fn with_filters(target: &str, filters: &FilterSet) -> String {
    match encode_filters(filters) {
        Some(qs) => format!("{target}?{qs}"),
        None => target.to_owned(),
    }
}

/// Split a filter query back into `(field, values)` pairs the way a resource
/// service does: on `&`, then `=`, then `,`, decoding each piece afterwards.
///
/// # Errors
///
/// Returns the offending piece if it is not valid percent-encoded UTF-8.
pub fn decode_query(query: &str) -> Result<Vec<(String, Vec<String>)>, String> {
    let decode = |s: &str| {
        urlencoding::decode(s)
            .map(Cow::into_owned)
            .map_err(|_| s.to_owned())
    };

    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (field, raw) = pair.split_once('=').unwrap_or((pair, ""));
            let values = raw.split(',').map(&decode).collect::<Result<_, _>>()?;
            Ok((decode(field)?, values))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use notes_gateway_sdk::Filter;

    #[test]
    fn numeric_ids_are_comma_joined() {
        let set = FilterSet::new().with("id", ["3", "7", "9"]);
        assert_eq!(encode_filters(&set).as_deref(), Some("id=3,7,9"));
    }

    #[test]
    fn empty_set_produces_no_query() {
        assert_eq!(encode_filters(&FilterSet::new()), None);
        assert_eq!(with_filters("/tags", &FilterSet::new()), "/tags");
    }

    #[test]
    fn filter_without_values_is_omitted() {
        let set = FilterSet::new()
            .with("id", Vec::<String>::new())
            .with("user_uuid", ["u-1"]);
        assert_eq!(encode_filters(&set).as_deref(), Some("user_uuid=u-1"));

        let only_empty = FilterSet::new().with("id", Vec::<String>::new());
        assert_eq!(encode_filters(&only_empty), None);
    }

    #[test]
    fn separators_inside_values_are_escaped() {
        let set = FilterSet::new().with("name", ["a,b", "c&d=e", "f g"]);
        let qs = encode_filters(&set).unwrap();
        assert_eq!(qs, "name=a%2Cb,c%26d%3De,f%20g");
    }

    #[test]
    fn decoding_recovers_original_values_and_fields() {
        let set: FilterSet = [
            Filter::new("email", ["ann+test@example.com"]),
            Filter::new("tag name", ["x,y", "", "100%", "z"]),
            Filter::new("id", ["1"]),
        ]
        .into_iter()
        .collect();

        let qs = encode_filters(&set).unwrap();
        let decoded = decode_query(&qs).unwrap();

        let expected: Vec<(String, Vec<String>)> = set
            .iter()
            .map(|f| (f.field.clone(), f.values.clone()))
            .collect();
        assert_eq!(decoded, expected);
    }

    mod roundtrip {
        use notes_gateway_sdk::FilterSet;
        use proptest::prelude::*;

        use crate::infra::rest::query::{decode_query, encode_filters};

        fn field() -> impl Strategy<Value = String> {
            "[a-z_ ,&=%+?é]{1,12}"
        }

        fn values() -> impl Strategy<Value = Vec<String>> {
            prop::collection::vec("[a-zA-Z0-9 ,&=%+?#é日本]{0,10}", 1..5)
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(128))]

            /// Every field decodes back to its own values, whatever separators
            /// the values contain.
            #[test]
            fn decoding_inverts_encoding(
                filters in prop::collection::vec((field(), values()), 1..5)
            ) {
                let set = filters
                    .into_iter()
                    .fold(FilterSet::new(), |set, (f, v)| set.with(f, v));

                let qs = encode_filters(&set).unwrap();
                let decoded = decode_query(&qs).unwrap();

                let expected: Vec<(String, Vec<String>)> = set
                    .iter()
                    .map(|f| (f.field.clone(), f.values.clone()))
                    .collect();
                prop_assert_eq!(decoded, expected);
            }
        }
    }

    #[test]
    fn url_target_keeps_its_path() {
        let set = FilterSet::new().with("category_uuid", ["c-1"]);
        assert_eq!(
            with_filters("http://notes:10000/notes", &set),
            "http://notes:10000/notes?category_uuid=c-1"
        );
    }
}
