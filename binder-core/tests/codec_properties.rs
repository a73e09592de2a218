//! Codec properties across vector lengths and bit patterns.
//!
//! Each `#[case]` is isolated — no shared state.

use binder_core::codec::{decode, encode, pack};
use binder_core::{ChecklistDefinition, FlagVector};
use rstest::rstest;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn patterns(len: usize) -> Vec<FlagVector> {
    let mut out = vec![
        FlagVector::new(len),
        FlagVector::from(vec![true; len]),
        FlagVector::from((0..len).map(|i| i % 2 == 0).collect::<Vec<_>>()),
        FlagVector::from((0..len).map(|i| i % 3 == 1).collect::<Vec<_>>()),
        FlagVector::from((0..len).map(|i| i * 7 % 5 == 0).collect::<Vec<_>>()),
    ];
    for bit in 0..len {
        let mut single = FlagVector::new(len);
        single.set(bit, true);
        out.push(single);
    }
    out
}

fn one_category(prefix: &str, cards: usize) -> ChecklistDefinition {
    let names: Vec<String> = (1..=cards).map(|i| format!("\"Card {i}\"")).collect();
    serde_json::from_str(&format!(
        r#"{{"title": "Demo", "categories": [{{"name": "Main", "tabId": "tab-main",
            "prefix": "{prefix}", "showPrefix": true, "odds": null, "cards": [{}]}}]}}"#,
        names.join(",")
    ))
    .expect("definition")
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[rstest]
#[case(0)]
#[case(1)]
#[case(7)]
#[case(8)]
#[case(9)]
#[case(100)]
fn roundtrip_for_every_pattern(#[case] len: usize) {
    for flags in patterns(len) {
        let token = encode(&flags);
        assert_eq!(decode(token.as_str(), len), flags, "token {token}");
    }
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(7)]
#[case(8)]
#[case(9)]
#[case(100)]
fn tokens_use_only_the_url_safe_alphabet(#[case] len: usize) {
    for flags in patterns(len) {
        let token = encode(&flags);
        assert!(
            token
                .as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
            "unexpected character in {token}"
        );
        assert!(!token.as_str().contains('='));
    }
}

#[rstest]
#[case(7, 1)]
#[case(8, 1)]
#[case(9, 2)]
#[case(100, 13)]
fn byte_count_is_ceil_of_len_over_eight(#[case] len: usize, #[case] bytes: usize) {
    assert_eq!(pack(&FlagVector::new(len)).len(), bytes);
}

#[rstest]
#[case(9)]
#[case(24)]
#[case(100)]
fn one_byte_short_token_zero_fills_the_tail(#[case] len: usize) {
    let full = FlagVector::from(vec![true; len]);
    let mut bytes = pack(&full);
    bytes.pop();
    let kept = bytes.len() * 8;
    let short = base64_url(&bytes);

    let decoded = decode(&short, len);
    for i in 0..len {
        assert_eq!(decoded.get(i), Some(i < kept), "flag {i}");
    }
}

#[test]
fn first_and_last_of_ten_items() {
    let def = one_category("C", 10);
    let mut flags = def.blank_flags();
    flags.set(def.find("C-1").expect("C-1"), true);
    flags.set(def.find("C-10").expect("C-10"), true);

    assert_eq!(
        flags.as_slice(),
        &[true, false, false, false, false, false, false, false, false, true]
    );
    assert_eq!(pack(&flags), vec![0x80, 0x40]);
    let token = encode(&flags);
    assert_eq!(token.as_str(), "gEA");

    let loaded = decode(token.as_str(), def.len());
    let checked: Vec<String> = def
        .items()
        .filter(|item| loaded.get(item.index) == Some(true))
        .map(|item| item.id())
        .collect();
    assert_eq!(checked, ["C-1", "C-10"]);
}

fn base64_url(bytes: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
