//! Codec Property Tests
//!
//! - Round-trip of fixed-width numeric directives under their width/sign rules
//! - Output size depends only on the format and argument count
//! - `N` and `V` produce byte-reversed encodings

#![allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable

use proptest::prelude::*;
use voltage_pack::{pack, scalars, unpack, CollectingSink, PackPlan, Scalar, Value};

const INTEGER_CODES: [&str; 16] = [
    "c", "C", "s", "S", "n", "v", "i", "I", "l", "L", "N", "V", "q", "Q", "J", "P",
];

/// Value a packed `i64` reads back as
fn canonical(code: &str, v: i64) -> i64 {
    match code {
        "c" => i64::from(v as i8),
        "C" => i64::from(v as u8),
        "s" => i64::from(v as i16),
        "S" | "n" | "v" => i64::from(v as u16),
        "i" | "l" => i64::from(v as i32),
        "I" | "L" | "N" | "V" => i64::from(v as u32),
        _ => v,
    }
}

proptest! {
    #[test]
    fn test_integer_round_trip(value in any::<i64>()) {
        for code in INTEGER_CODES {
            let bytes = pack(code, &scalars![value]).unwrap();
            let fields = unpack(code, &bytes, 0).unwrap();
            prop_assert_eq!(
                fields.get("1"),
                Some(&Value::Int(canonical(code, value))),
                "directive {} value {}",
                code,
                value
            );
        }
    }

    #[test]
    fn test_float_round_trip(value in any::<f32>().prop_filter("finite", |v| v.is_finite())) {
        for code in ["f", "g", "G"] {
            let bytes = pack(code, &scalars![value]).unwrap();
            let fields = unpack(code, &bytes, 0).unwrap();
            prop_assert_eq!(fields.get("1"), Some(&Value::Float(f64::from(value))));
        }
    }

    #[test]
    fn test_double_round_trip(value in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
        for code in ["d", "e", "E"] {
            let bytes = pack(code, &scalars![value]).unwrap();
            let fields = unpack(code, &bytes, 0).unwrap();
            prop_assert_eq!(fields.get("1"), Some(&Value::Float(value)));
        }
    }

    #[test]
    fn test_size_is_independent_of_values(values in prop::collection::vec(any::<i64>(), 6)) {
        let format = "C3nNxq";
        let args: Vec<Scalar> = values.iter().map(|&v| Scalar::from(v)).collect();
        let program = voltage_pack::parse_format(format).unwrap();
        let plan = PackPlan::build(&program, &args, &mut CollectingSink::new()).unwrap();
        let bytes = pack(format, &args).unwrap();
        prop_assert_eq!(plan.size(), 18);
        prop_assert_eq!(bytes.len(), plan.size());
    }

    #[test]
    fn test_greedy_size_follows_argument_count(values in prop::collection::vec(any::<u8>(), 0..64)) {
        let args: Vec<Scalar> = values.iter().map(|&v| Scalar::from(v)).collect();
        let bytes = pack("nC*", &[&scalars![1][..], &args[..]].concat()).unwrap();
        prop_assert_eq!(bytes.len(), 2 + values.len());
        prop_assert_eq!(&bytes[2..], &values[..]);
    }

    #[test]
    fn test_network_and_vax_order_are_reversed(value in any::<u32>()) {
        let big = pack("N", &scalars![value]).unwrap();
        let mut little = pack("V", &scalars![value]).unwrap();
        little.reverse();
        prop_assert_eq!(big, little);

        let big = pack("n", &scalars![value as u16]).unwrap();
        let mut little = pack("v", &scalars![value as u16]).unwrap();
        little.reverse();
        prop_assert_eq!(big, little);
    }

    #[test]
    fn test_space_padded_round_trip(text in "[a-z0-9]{0,12}", width in 0usize..16) {
        let format = format!("A{}", width);
        let bytes = pack(&format, &scalars![text.as_str()]).unwrap();
        prop_assert_eq!(bytes.len(), width);

        let fields = unpack(&format, &bytes, 0).unwrap();
        let kept = &text.as_bytes()[..text.len().min(width)];
        prop_assert_eq!(fields.get("1"), Some(&Value::Bytes(kept.to_vec())));
    }
}
