//! Build a record, print it in both modes, and read it back.

use taxon::{Options, SliceSource, Value};

fn main() {
    let mut record = Value::Null;
    let fields = record.open_object();
    fields.insert("id".into(), Value::from(9_007_199_254_740_993_i64));
    fields.insert("digest".into(), Value::from(&[0xC9u8, 0x89, 0x0D, 0x33][..]));
    fields.insert("updated".into(), Value::time(987_654_321));
    fields.insert("note".into(), Value::from("$-prefixed strings survive"));

    let taxon = record.to_text(Options::default());
    println!("taxon: {taxon}");

    let json = record.to_text(Options {
        json_mode: true,
        ..Default::default()
    });
    println!("json:  {json}");

    let mut copy = Value::Null;
    let mut source = SliceSource::from(taxon.as_str());
    assert!(copy.parse(&mut source, Options::default()));
    assert_eq!(copy, record);
}
