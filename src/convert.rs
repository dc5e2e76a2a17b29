//! Type-directed conversion of one source string into one field.
//!
//! [`convert`] first asks the [`ParserRegistry`] for a custom parser
//! registered under the field type's identity. Only when none exists does it
//! fall back to the type's own [`Decode::decode`]:
//!
//! - `bool`: `1 t T TRUE true True` / `0 f F FALSE false False`.
//! - integers: width-checked, with `0x`, `0o`, `0b` and leading-zero octal
//!   prefixes.
//! - floats, `String`, `char`, paths and socket addresses.
//! - `Vec<u8>`: the raw input bytes.
//! - `Vec<T>`: split on the `delimiter` tag (default `,`), each part
//!   converted as `T`. Empty input leaves the field alone.
//! - `HashMap<K, V>` / `BTreeMap<K, V>`: URL-query encoding
//!   (`k1=v1&k2=v2`), first value per key.
//! - `Option<T>` / `Box<T>`: allocated when empty, then converted as `T`.
//!
//! Types without a built-in conversion (e.g. [`std::time::Duration`]) opt in
//! with an empty `impl Decode for T {}` and rely on a registered parser;
//! without one they fail with [`ConvertError::Unsupported`].

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;

use crate::error::ConvertError;
use crate::record::Tags;
use crate::registry::ParserRegistry;

/// Default separator for sequence fields.
pub const DEFAULT_DELIMITER: &str = ",";

/// What a conversion may consult besides the input string.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub tags: &'a Tags,
    pub parsers: &'a ParserRegistry,
}

/// A type that can be the destination of a leaf field.
///
/// Implementors provide [`decode_new`](Self::decode_new); containers also
/// override [`decode`](Self::decode) to update a value in place.
pub trait Decode: Any + Send + Sized {
    /// Identity under which a custom parser for this type is registered.
    /// Wrapper types report their inner type's identity.
    fn parser_key() -> TypeId {
        TypeId::of::<Self>()
    }

    /// Unwrap a custom parser's output into `Self`.
    fn from_parsed(value: Box<dyn Any + Send>) -> Option<Self> {
        value.downcast::<Self>().ok().map(|value| *value)
    }

    /// Box a custom parser's output under [`parser_key`](Self::parser_key).
    /// Wrapper types hand over their inner value; `None` if there is none.
    fn into_parsed(self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self))
    }

    /// Build a value from `input` without consulting custom parsers.
    fn decode_new(input: &str, cx: &Context<'_>) -> Result<Self, ConvertError> {
        let _ = (input, cx);
        Err(ConvertError::Unsupported(std::any::type_name::<Self>()))
    }

    /// Convert `input` into `self` without consulting custom parsers.
    fn decode(&mut self, input: &str, cx: &Context<'_>) -> Result<(), ConvertError> {
        *self = Self::decode_new(input, cx)?;
        Ok(())
    }
}

/// Convert `input` into `dst`, preferring a registered custom parser.
pub fn convert<T: Decode>(dst: &mut T, input: &str, cx: &Context<'_>) -> Result<(), ConvertError> {
    match parse_custom(input, cx) {
        Some(value) => {
            *dst = value?;
            Ok(())
        }
        None => dst.decode(input, cx),
    }
}

/// Like [`convert`], building a fresh value.
pub(crate) fn convert_new<T: Decode>(input: &str, cx: &Context<'_>) -> Result<T, ConvertError> {
    match parse_custom(input, cx) {
        Some(value) => value,
        None => T::decode_new(input, cx),
    }
}

fn parse_custom<T: Decode>(input: &str, cx: &Context<'_>) -> Option<Result<T, ConvertError>> {
    let parser = cx.parsers.lookup(T::parser_key())?;
    Some(parser.parse(input, cx.tags).and_then(|value| {
        T::from_parsed(value).ok_or(ConvertError::CustomMismatch(parser.type_name()))
    }))
}

pub(crate) fn parse_bool(input: &str) -> Result<bool, std::str::ParseBoolError> {
    match input {
        "1" | "t" | "T" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "False" => Ok(false),
        other => other.parse(),
    }
}

/// Split an integer literal into sign, radix and digits. `None` when a sign
/// follows the radix prefix, or when an unsigned literal starts with `+`.
fn split_radix(input: &str, signed: bool) -> Option<(&str, u32, &str)> {
    let (sign, rest) = match input.as_bytes().first() {
        Some(b'-') => ("-", &input[1..]),
        Some(b'+') if signed => ("", &input[1..]),
        _ => ("", input),
    };
    let (radix, digits) = match rest.get(..2) {
        Some("0x" | "0X") => (16, &rest[2..]),
        Some("0o" | "0O") => (8, &rest[2..]),
        Some("0b" | "0B") => (2, &rest[2..]),
        _ if rest.len() > 1 && rest.starts_with('0') => (8, &rest[1..]),
        _ => (10, rest),
    };
    if digits.starts_with(['+', '-']) {
        return None;
    }
    Some((sign, radix, digits))
}

macro_rules! decode_int {
    ($variant:ident, $signed:literal: $($t:ty),*) => {$(
        impl Decode for $t {
            fn decode_new(input: &str, _cx: &Context<'_>) -> Result<Self, ConvertError> {
                let parsed = match split_radix(input, $signed) {
                    Some((sign, radix, digits)) => {
                        <$t>::from_str_radix(&format!("{sign}{digits}"), radix)
                    }
                    // misplaced sign: report it as the invalid digit it is
                    None => <$t>::from_str_radix("_", 10),
                };
                parsed.map_err(ConvertError::$variant)
            }
        }
    )*};
}

decode_int!(Int, true: i8, i16, i32, i64, i128, isize);
decode_int!(Uint, false: u8, u16, u32, u64, u128, usize);

macro_rules! decode_float {
    ($($t:ty),*) => {$(
        impl Decode for $t {
            fn decode_new(input: &str, _cx: &Context<'_>) -> Result<Self, ConvertError> {
                input.parse::<$t>().map_err(ConvertError::Float)
            }
        }
    )*};
}

decode_float!(f32, f64);

macro_rules! decode_from_str {
    ($($t:ty),*) => {$(
        impl Decode for $t {
            fn decode_new(input: &str, _cx: &Context<'_>) -> Result<Self, ConvertError> {
                input.parse::<$t>().map_err(|e| ConvertError::FromStr {
                    type_name: stringify!($t),
                    source: e.into(),
                })
            }
        }
    )*};
}

decode_from_str!(char, PathBuf, IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr);

impl Decode for bool {
    fn decode_new(input: &str, _cx: &Context<'_>) -> Result<Self, ConvertError> {
        parse_bool(input).map_err(ConvertError::Bool)
    }
}

impl Decode for String {
    fn decode_new(input: &str, _cx: &Context<'_>) -> Result<Self, ConvertError> {
        Ok(input.to_owned())
    }
}

impl<T: Decode> Decode for Option<T> {
    fn parser_key() -> TypeId {
        T::parser_key()
    }

    fn from_parsed(value: Box<dyn Any + Send>) -> Option<Self> {
        T::from_parsed(value).map(Some)
    }

    fn into_parsed(self) -> Option<Box<dyn Any + Send>> {
        self.and_then(T::into_parsed)
    }

    fn decode_new(input: &str, cx: &Context<'_>) -> Result<Self, ConvertError> {
        convert_new(input, cx).map(Some)
    }

    fn decode(&mut self, input: &str, cx: &Context<'_>) -> Result<(), ConvertError> {
        match self {
            Some(value) => convert(value, input, cx),
            None => {
                *self = Some(convert_new(input, cx)?);
                Ok(())
            }
        }
    }
}

impl<T: Decode> Decode for Box<T> {
    fn parser_key() -> TypeId {
        T::parser_key()
    }

    fn from_parsed(value: Box<dyn Any + Send>) -> Option<Self> {
        T::from_parsed(value).map(Box::new)
    }

    fn into_parsed(self) -> Option<Box<dyn Any + Send>> {
        (*self).into_parsed()
    }

    fn decode_new(input: &str, cx: &Context<'_>) -> Result<Self, ConvertError> {
        convert_new(input, cx).map(Box::new)
    }

    fn decode(&mut self, input: &str, cx: &Context<'_>) -> Result<(), ConvertError> {
        convert(&mut **self, input, cx)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode_new(input: &str, cx: &Context<'_>) -> Result<Self, ConvertError> {
        let mut values = Vec::new();
        values.decode(input, cx)?;
        Ok(values)
    }

    fn decode(&mut self, input: &str, cx: &Context<'_>) -> Result<(), ConvertError> {
        if input.is_empty() {
            return Ok(());
        }
        if let Some(bytes) = (self as &mut dyn Any).downcast_mut::<Vec<u8>>() {
            *bytes = input.as_bytes().to_vec();
            return Ok(());
        }

        let delimiter = cx.tags.delimiter().unwrap_or(DEFAULT_DELIMITER);
        *self = input
            .split(delimiter)
            .map(|part| convert_new::<T>(part, cx))
            .collect::<Result<_, _>>()?;
        Ok(())
    }
}

/// Reject what a strict query parser would: `;` separators and `%` not
/// followed by two hex digits.
fn check_query(input: &str) -> Result<(), ConvertError> {
    if input.contains(';') {
        return Err(ConvertError::Map("invalid semicolon separator in query".into()));
    }
    let bytes = input.as_bytes();
    for (at, _) in input.match_indices('%') {
        let escape = &bytes[at..bytes.len().min(at + 3)];
        if !matches!(escape, [_, hi, lo] if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()) {
            let escape = String::from_utf8_lossy(escape);
            return Err(ConvertError::Map(format!("invalid URL escape {escape:?}")));
        }
    }
    Ok(())
}

/// Decode URL-query pairs, keeping the first value of every key.
fn query_entries<K, V>(input: &str, cx: &Context<'_>) -> Result<Vec<(K, V)>, ConvertError>
where
    K: Decode,
    V: Decode,
{
    check_query(input)?;
    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for (key, value) in url::form_urlencoded::parse(input.as_bytes()) {
        if !seen.insert(key.clone()) {
            continue;
        }
        entries.push((convert_new::<K>(&key, cx)?, convert_new::<V>(&value, cx)?));
    }
    Ok(entries)
}

impl<K, V> Decode for HashMap<K, V>
where
    K: Decode + Eq + Hash,
    V: Decode,
{
    fn decode_new(input: &str, cx: &Context<'_>) -> Result<Self, ConvertError> {
        Ok(query_entries(input, cx)?.into_iter().collect())
    }
}

impl<K, V> Decode for BTreeMap<K, V>
where
    K: Decode + Ord,
    V: Decode,
{
    fn decode_new(input: &str, cx: &Context<'_>) -> Result<Self, ConvertError> {
        Ok(query_entries(input, cx)?.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tag;

    fn decode<T: Decode>(input: &str) -> Result<T, ConvertError> {
        decode_tagged(input, &Tags::new())
    }

    fn decode_tagged<T: Decode>(input: &str, tags: &Tags) -> Result<T, ConvertError> {
        let parsers = ParserRegistry::new();
        convert_new(input, &Context { tags, parsers: &parsers })
    }

    #[test]
    fn bool_literals() {
        for input in ["1", "t", "T", "TRUE", "true", "True"] {
            assert!(decode::<bool>(input).unwrap(), "{input}");
        }
        for input in ["0", "f", "F", "FALSE", "false", "False"] {
            assert!(!decode::<bool>(input).unwrap(), "{input}");
        }
    }

    #[test]
    fn bool_rejects_other_text() {
        let err = decode::<bool>("yes").unwrap_err();
        assert!(matches!(err, ConvertError::Bool(_)));
        assert!(err.to_string().starts_with("cannot parse as bool"));
    }

    #[test]
    fn signed_ints() {
        assert_eq!(decode::<i8>("-2").unwrap(), -2);
        assert_eq!(decode::<i64>("-5").unwrap(), -5);
        assert_eq!(decode::<i32>("+7").unwrap(), 7);
    }

    #[test]
    fn int_prefixes() {
        assert_eq!(decode::<i32>("0x1F").unwrap(), 31);
        assert_eq!(decode::<i32>("-0x10").unwrap(), -16);
        assert_eq!(decode::<u16>("0o17").unwrap(), 15);
        assert_eq!(decode::<u16>("017").unwrap(), 15);
        assert_eq!(decode::<u8>("0b101").unwrap(), 5);
        assert_eq!(decode::<u8>("0").unwrap(), 0);
    }

    #[test]
    fn sign_after_prefix_is_rejected() {
        for input in ["0x-5", "0x+5", "-0x-5", "0b-1", "0-7", "--5"] {
            let err = decode::<i32>(input).unwrap_err();
            assert!(err.to_string().starts_with("cannot parse as int"), "{input}");
        }
        assert!(matches!(decode::<u32>("0x-5"), Err(ConvertError::Uint(_))));
    }

    #[test]
    fn int_overflow_respects_width() {
        assert!(matches!(decode::<i8>("128"), Err(ConvertError::Int(_))));
        assert_eq!(decode::<i16>("128").unwrap(), 128);
        assert!(matches!(decode::<u8>("256"), Err(ConvertError::Uint(_))));
    }

    #[test]
    fn unsigned_rejects_negative() {
        let err = decode::<u32>("-1").unwrap_err();
        assert!(err.to_string().starts_with("cannot parse as uint"));
    }

    #[test]
    fn unsigned_rejects_plus_sign() {
        assert!(matches!(decode::<u32>("+5"), Err(ConvertError::Uint(_))));
        assert!(matches!(decode::<u8>("+0x1"), Err(ConvertError::Uint(_))));
    }

    #[test]
    fn int_rejects_text() {
        let err = decode::<i64>("invalid").unwrap_err();
        assert!(err.to_string().starts_with("cannot parse as int"));
    }

    #[test]
    fn floats() {
        assert_eq!(decode::<f32>("1.23").unwrap(), 1.23_f32);
        assert_eq!(decode::<f64>("2.5e3").unwrap(), 2500.0);
        assert!(matches!(decode::<f64>("x"), Err(ConvertError::Float(_))));
    }

    #[test]
    fn string_is_verbatim() {
        assert_eq!(decode::<String>(" a,b=c ").unwrap(), " a,b=c ");
    }

    #[test]
    fn from_str_types() {
        assert_eq!(decode::<char>("x").unwrap(), 'x');
        assert_eq!(decode::<PathBuf>("/etc/app").unwrap(), PathBuf::from("/etc/app"));
        assert_eq!(
            decode::<SocketAddr>("127.0.0.1:8080").unwrap(),
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap()
        );
        let err = decode::<IpAddr>("localhost").unwrap_err();
        assert!(err.to_string().starts_with("cannot parse as IpAddr"));
    }

    #[test]
    fn bytes_are_not_split() {
        assert_eq!(decode::<Vec<u8>>("as string").unwrap(), b"as string".to_vec());
        assert_eq!(decode::<Vec<u8>>("1,2").unwrap(), b"1,2".to_vec());
    }

    #[test]
    fn sequence_default_delimiter() {
        assert_eq!(decode::<Vec<i64>>("1,2,3,4").unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn sequence_custom_delimiter() {
        let tags = Tags::new().with(tag::DELIMITER, ";");
        assert_eq!(decode_tagged::<Vec<i64>>("5;6;7;8", &tags).unwrap(), vec![5, 6, 7, 8]);
    }

    #[test]
    fn empty_sequence_leaves_field_alone() {
        let parsers = ParserRegistry::new();
        let tags = Tags::new();
        let cx = Context { tags: &tags, parsers: &parsers };
        let mut value = vec![9];
        convert(&mut value, "", &cx).unwrap();
        assert_eq!(value, vec![9]);
    }

    #[test]
    fn sequence_element_error_propagates() {
        let err = decode::<Vec<i32>>("1,x").unwrap_err();
        assert!(matches!(err, ConvertError::Int(_)));
    }

    #[test]
    fn map_from_query() {
        let map = decode::<HashMap<String, i32>>("k1=1&k2=2").unwrap();
        assert_eq!(map, HashMap::from([("k1".to_string(), 1), ("k2".to_string(), 2)]));
    }

    #[test]
    fn map_keeps_first_value_and_decodes_escapes() {
        let map = decode::<BTreeMap<String, String>>("a=x%20y&a=z&b=1+2").unwrap();
        assert_eq!(map["a"], "x y");
        assert_eq!(map["b"], "1 2");
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn map_converts_keys() {
        let map = decode::<BTreeMap<u8, bool>>("1=true&2=0").unwrap();
        assert_eq!(map, BTreeMap::from([(1, true), (2, false)]));
        assert!(decode::<HashMap<u8, bool>>("x=true").is_err());
    }

    #[test]
    fn map_rejects_bad_escape() {
        let err = decode::<HashMap<String, String>>("a=%zz&b=1").unwrap_err();
        assert!(matches!(err, ConvertError::Map(_)));
        assert_eq!(err.to_string(), r#"cannot parse as map: invalid URL escape "%zz""#);
        assert!(decode::<HashMap<String, String>>("a=50%").is_err());
        assert!(decode::<HashMap<String, String>>("a=%4").is_err());
    }

    #[test]
    fn map_rejects_semicolon() {
        let err = decode::<BTreeMap<String, String>>("b=1;c=2").unwrap_err();
        assert!(err.to_string().starts_with("cannot parse as map"));
    }

    #[test]
    fn map_of_non_default_values() {
        let map = decode::<HashMap<String, Ipv4Addr>>("lo=127.0.0.1").unwrap();
        assert_eq!(map["lo"], Ipv4Addr::LOCALHOST);
    }

    #[test]
    fn sequence_of_non_default_elements() {
        let tags = Tags::new().with(tag::DELIMITER, ";");
        let ips = decode_tagged::<Vec<IpAddr>>("127.0.0.1;::1", &tags).unwrap();
        assert_eq!(ips, vec![IpAddr::from([127, 0, 0, 1]), "::1".parse::<IpAddr>().unwrap()]);
        assert!(decode::<Vec<SocketAddr>>("127.0.0.1:80,nope").is_err());
    }

    #[test]
    fn optional_non_default_value() {
        let addr = decode::<Option<SocketAddr>>("10.0.0.1:53").unwrap();
        assert_eq!(addr, Some("10.0.0.1:53".parse().unwrap()));
        assert!(decode::<Option<Box<Ipv6Addr>>>("::1").unwrap().is_some());
    }

    #[test]
    fn option_allocates() {
        assert_eq!(decode::<Option<String>>("pointed").unwrap(), Some("pointed".into()));
        assert_eq!(decode::<Option<Option<u8>>>("3").unwrap(), Some(Some(3)));
    }

    #[test]
    fn boxed_value() {
        let parsers = ParserRegistry::new();
        let tags = Tags::new();
        let cx = Context { tags: &tags, parsers: &parsers };
        let mut value = Box::new(0_u32);
        convert(&mut value, "42", &cx).unwrap();
        assert_eq!(*value, 42);
    }

    #[test]
    fn custom_parser_takes_precedence() {
        let parsers = ParserRegistry::new();
        parsers.register(|input: &str, _: &Tags| {
            Ok::<_, std::num::ParseIntError>(input.len() as u64)
        });
        let tags = Tags::new();
        let cx = Context { tags: &tags, parsers: &parsers };

        let mut value = 0_u64;
        convert(&mut value, "abcd", &cx).unwrap();
        assert_eq!(value, 4);

        let mut wrapped: Option<u64> = None;
        convert(&mut wrapped, "ab", &cx).unwrap();
        assert_eq!(wrapped, Some(2));
    }

    #[test]
    fn custom_parser_failure_names_type() {
        let parsers = ParserRegistry::new();
        parsers.register(|input: &str, _: &Tags| input.parse::<u8>().map(u64::from));
        let tags = Tags::new();
        let cx = Context { tags: &tags, parsers: &parsers };

        let err = convert(&mut 0_u64, "300", &cx).unwrap_err();
        assert!(matches!(err, ConvertError::Custom { type_name: "u64", .. }));
        assert!(err.to_string().starts_with("cannot parse as custom type (u64)"));
    }

    #[derive(Debug, Default, PartialEq)]
    struct Opaque(u8);

    impl Decode for Opaque {}

    #[test]
    fn unsupported_without_parser() {
        let err = decode::<Opaque>("1").unwrap_err();
        assert!(matches!(err, ConvertError::Unsupported(name) if name.ends_with("Opaque")));
    }
}
