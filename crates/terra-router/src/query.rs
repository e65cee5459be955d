//! Query string helpers for hash locations

use std::borrow::Cow;

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(Cow::into_owned)
        .unwrap_or(spaced)
}

/// Parses `a=1&b=two%20words` (leading `?` optional) into ordered pairs
///
/// Keys without `=` get an empty value.
///
/// # Examples
///
/// ```
/// use terra_router::query::parse_query;
///
/// let pairs = parse_query("?tab=data&filter=a+b&flag");
/// assert_eq!(pairs, vec![
///     ("tab".to_string(), "data".to_string()),
///     ("filter".to_string(), "a b".to_string()),
///     ("flag".to_string(), "".to_string()),
/// ]);
/// ```
pub fn parse_query(search: &str) -> Vec<(String, String)> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (key, value) = part.split_once('=').unwrap_or((part, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

/// Serializes pairs into a query string (without leading `?`)
///
/// Pairs with an empty value are skipped.
///
/// # Examples
///
/// ```
/// use terra_router::query::to_query_string;
///
/// let qs = to_query_string([("tab", "data"), ("empty", ""), ("q", "a&b")]);
/// assert_eq!(qs, "tab=data&q=a%26b");
/// ```
pub fn to_query_string<I, K, V>(pairs: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .into_iter()
        .filter(|(_, v)| !v.as_ref().is_empty())
        .map(|(k, v)| {
            format!(
                "{}={}",
                urlencoding::encode(k.as_ref()),
                urlencoding::encode(v.as_ref())
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}
