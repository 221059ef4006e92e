#![no_main]

use fbind_fields::{
    BooleanDatatype, Converter, DateDatatype, DecimalDatatype, FieldContext, IntegerDatatype,
    LongDatatype, StringDatatype,
};
use libfuzzer_sys::fuzz_target;

const LOCALES: &[&str] = &["en", "de", "fr", "ru", "ja"];

fn parse<V, C: Converter<V, String>>(converter: &C, text: &String, cx: &FieldContext) {
    if let Err(err) = converter.to_model(text, cx) {
        assert!(!err.message().is_empty());
    }
}

/// Whatever parses must render and parse back to the same value.
fn roundtrip<V, C>(converter: &C, text: &String, cx: &FieldContext)
where
    V: PartialEq + std::fmt::Debug,
    C: Converter<V, String>,
{
    if let Ok(value) = converter.to_model(text, cx) {
        let shown = converter.to_presentation(value.as_ref(), cx);
        let back = converter.to_model(&shown, cx);
        assert_eq!(back.ok(), Some(value), "{text:?} -> {shown:?}");
    }
}

fuzz_target!(|input: (u8, String)| {
    let (locale, text) = input;
    if text.len() > 256 {
        return;
    }
    let cx = FieldContext::for_locale(LOCALES[usize::from(locale) % LOCALES.len()]);

    roundtrip(&StringDatatype, &text, &cx);
    roundtrip(&IntegerDatatype, &text, &cx);
    roundtrip(&LongDatatype, &text, &cx);
    roundtrip(&BooleanDatatype, &text, &cx);
    parse(&DecimalDatatype::new(), &text, &cx);
    parse(&DecimalDatatype::with_fraction_digits(2), &text, &cx);
    parse(&DateDatatype, &text, &cx);
});
