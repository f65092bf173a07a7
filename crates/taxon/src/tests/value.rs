use bstr::{BStr, BString, ByteSlice};

use crate::{Array, Object, Type, TypeError, Value};

#[test]
fn a_fresh_value_is_null() {
    let value = Value::default();
    assert_eq!(value.kind(), Type::Null);
    assert!(value.is_null());
}

#[test]
fn constructs_from_each_alternative() {
    assert_eq!(Value::from(true).kind(), Type::Boolean);
    assert_eq!(Value::from(42).kind(), Type::Integer);
    assert_eq!(Value::from(1.5).kind(), Type::Number);
    assert_eq!(Value::from("hello").kind(), Type::String);
    assert_eq!(Value::from(vec![1u8, 2]).kind(), Type::Binary);
    assert_eq!(Value::time(0).kind(), Type::Time);
    assert_eq!(Value::from(Array::new()).kind(), Type::Array);
    assert_eq!(Value::from(Object::new()).kind(), Type::Object);
}

#[test]
fn integer_widths_widen_into_int64() {
    assert_eq!(Value::from(-1i8).as_integer(), Ok(-1));
    assert_eq!(Value::from(-1i16).as_integer(), Ok(-1));
    assert_eq!(Value::from(-1i32).as_integer(), Ok(-1));
    assert_eq!(Value::from(u8::MAX).as_integer(), Ok(255));
    assert_eq!(Value::from(u16::MAX).as_integer(), Ok(65_535));
    assert_eq!(Value::from(u32::MAX).as_integer(), Ok(4_294_967_295));
    assert_eq!(Value::from(i64::MIN).as_integer(), Ok(i64::MIN));
    assert_eq!(Value::from(i64::MAX).as_integer(), Ok(i64::MAX));
}

#[test]
fn accessors_match_the_stored_tag() {
    let value = Value::from(vec![
        Value::from(1),
        Value::from("hello"),
        Value::from(false),
    ]);
    assert!(value.is_array());
    let items = value.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].as_integer(), Ok(1));
    assert_eq!(items[1].as_string().unwrap(), BStr::new("hello"));
    assert_eq!(items[2].as_boolean(), Ok(false));

    let mut map = Object::new();
    map.insert(BString::from("x"), Value::from(1));
    map.insert(BString::from("y"), Value::from("hello"));
    let value = Value::from(map);
    assert!(value.is_object());
    let fields = value.as_object().unwrap();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[BStr::new("x")].as_integer(), Ok(1));
    assert_eq!(fields[BStr::new("y")].as_string().unwrap(), BStr::new("hello"));
}

#[test]
fn mismatched_accessors_report_both_types() {
    let value = Value::from(true);
    assert_eq!(
        value.as_string(),
        Err(TypeError {
            expected: Type::String,
            actual: Type::Boolean,
        })
    );
    assert_eq!(
        value.as_string().unwrap_err().to_string(),
        "value is boolean, not string"
    );
    assert!(value.as_array().is_err());
    assert!(value.as_number().is_err());
}

#[test]
fn numbers_widen_from_integers_but_not_back() {
    let value = Value::from(42);
    assert!(value.is_integer());
    assert!(value.is_number());
    assert_eq!(value.as_number(), Ok(42.0));
    // Reading as a number does not change the stored tag.
    assert_eq!(value.kind(), Type::Integer);

    let value = Value::from(1.5);
    assert!(value.is_number());
    assert!(!value.is_integer());
    assert!(value.as_integer().is_err());
}

#[test]
fn open_overwrites_a_mismatched_value() {
    let mut value = Value::from(true);
    *value.open_integer() = 42;
    assert_eq!(value.as_integer(), Ok(42));

    *value.open_boolean() = true;
    assert_eq!(value.as_boolean(), Ok(true));

    value.open_string().extend_from_slice(b"abc");
    assert_eq!(value.as_string().unwrap(), BStr::new("abc"));

    value.open_binary().push(0xFF);
    assert_eq!(value.as_binary().unwrap(), &[0xFF][..]);

    *value.open_time() = 123_456_789;
    assert_eq!(value.as_time(), Ok(123_456_789));

    value.open_array().push(Value::Null);
    assert_eq!(value.as_array().unwrap().len(), 1);

    value.open_object().insert(BString::from("k"), Value::Null);
    assert_eq!(value.as_object().unwrap().len(), 1);
}

#[test]
fn open_number_converts_a_stored_integer_in_place() {
    let mut value = Value::from(-5);
    assert_eq!(*value.open_number(), -5.0);
    assert_eq!(value.kind(), Type::Number);

    // Anything else starts over from zero.
    let mut value = Value::from("text");
    assert_eq!(*value.open_number(), 0.0);
}

#[test]
fn open_keeps_a_matching_value() {
    let mut value = Value::from(7);
    assert_eq!(*value.open_integer(), 7);

    let mut value = Value::from("keep");
    value.open_string().extend_from_slice(b"!");
    assert_eq!(value.as_string().unwrap(), BStr::new("keep!"));
}

#[test]
fn clear_and_swap() {
    let mut a = Value::from(1.5);
    let mut b = Value::from("hello");
    a.swap(&mut b);
    assert_eq!(a.as_string().unwrap(), BStr::new("hello"));
    assert_eq!(b.as_number(), Ok(1.5));

    a.clear();
    assert!(a.is_null());
}

#[test]
fn copies_are_cheap_and_independent() {
    let mut original = Value::Null;
    original.open_array().push(Value::from("shared"));

    let mut copy = original.clone();
    assert_eq!(copy, original);

    // Writing to one copy leaves the other alone.
    copy.open_array().push(Value::from("mine"));
    assert_eq!(copy.as_array().unwrap().len(), 2);
    assert_eq!(original.as_array().unwrap().len(), 1);
}

#[test]
fn binary_and_time_payloads_roundtrip_through_accessors() {
    let bytes = [0x01u8, 0x00, 0x03];
    let mut value = Value::from(&bytes[..]);
    assert!(value.is_binary());
    assert_eq!(value.as_binary().unwrap(), &bytes[..]);

    value = Value::time(123_456_789);
    assert!(value.is_time());
    assert_eq!(value.as_time(), Ok(123_456_789));

    value = Value::from(false);
    assert!(value.is_boolean());
    assert_eq!(value.as_boolean(), Ok(false));
}

#[test]
fn strings_may_hold_arbitrary_bytes() {
    // Contents are intended UTF-8 but nothing is validated on the way in.
    let raw = BString::from(&b"\xFF\x00\xFE"[..]);
    let value = Value::from(raw.clone());
    assert_eq!(value.as_string().unwrap(), raw.as_bstr());
}

#[test]
fn dropping_a_deep_tree_does_not_recurse() {
    let mut value = Value::Null;
    for _ in 0..1_000_000 {
        let mut wrapper = Array::new();
        wrapper.push(value);
        value = Value::from(wrapper);
    }
    drop(value);
}

#[test]
fn dropping_shared_trees_releases_each_handle() {
    let mut value = Value::Null;
    for _ in 0..100_000 {
        let mut wrapper = Array::new();
        wrapper.push(value);
        value = Value::from(wrapper);
    }
    let copy = value.clone();
    drop(value);
    // The copy still owns the whole spine.
    let mut depth = 0usize;
    let mut cursor = &copy;
    while let Ok(items) = cursor.as_array() {
        if items.is_empty() {
            break;
        }
        depth += 1;
        cursor = &items[0];
    }
    assert_eq!(depth, 100_000);
    drop(copy);
}

#[test]
fn dropping_deep_objects_does_not_recurse() {
    let mut value = Value::Null;
    for _ in 0..100_000 {
        let mut wrapper = Object::new();
        wrapper.insert(BString::from("k"), value);
        value = Value::from(wrapper);
    }
    drop(value);
}
