use super::*;

use proptest::prelude::*;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
enum Op {
    Insert(Vec<u8>),
    Query(Vec<u8>),
}

fn token_strategy() -> impl Strategy<Value = Vec<u8>> + Clone {
    // A narrow alphabet keeps shared prefixes and repeats frequent.
    prop::collection::vec(prop::sample::select(b"ab-".to_vec()), 0..=8)
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let token = token_strategy();
    let op = prop_oneof![
        60 => token.clone().prop_map(Op::Insert),
        40 => token.prop_map(Op::Query),
    ];
    prop::collection::vec(op, 0..=1000)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_counts_match_model(ops in ops_strategy()) {
        let mut t = CountingTrie::new();
        let mut m: BTreeMap<Vec<u8>, u64> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(token) => {
                    let got = t.insert(&token).unwrap();
                    let expected = m.entry(token).or_insert(0);
                    *expected += 1;
                    prop_assert_eq!(got, *expected);
                }
                Op::Query(token) => {
                    let got = t.query(&token).unwrap();
                    prop_assert_eq!(got, m.get(&token).copied().unwrap_or(0));
                    prop_assert_eq!(t.query(&token).unwrap(), got);
                }
            }
        }

        prop_assert_eq!(t.len(), m.len());
        let got: Vec<(Vec<u8>, u64)> = t.iter().collect();
        let expected: Vec<(Vec<u8>, u64)> = m.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_order_independent(tokens in prop::collection::vec(token_strategy(), 0..=64), seed in any::<u64>()) {
        use rand::rngs::StdRng;
        use rand::seq::SliceRandom;
        use rand::SeedableRng;

        let mut shuffled = tokens.clone();
        shuffled.shuffle(&mut StdRng::seed_from_u64(seed));

        let mut a = CountingTrie::new();
        let mut b = CountingTrie::new();
        for token in &tokens {
            a.insert(token).unwrap();
        }
        for token in &shuffled {
            b.insert(token).unwrap();
        }

        for token in &tokens {
            prop_assert_eq!(a.query(token).unwrap(), b.query(token).unwrap());
        }
        prop_assert_eq!(a.iter().collect::<Vec<_>>(), b.iter().collect::<Vec<_>>());
    }

    #[test]
    fn prop_extension_leaves_prefix_count(prefix in token_strategy(), suffix in prop::collection::vec(prop::sample::select(b"ab-".to_vec()), 1..=4), n in 1usize..8) {
        let mut t = CountingTrie::new();
        let mut longer = prefix.clone();
        longer.extend_from_slice(&suffix);

        for _ in 0..n {
            t.insert(&longer).unwrap();
        }
        prop_assert_eq!(t.query(&prefix).unwrap(), 0);
        prop_assert_eq!(t.query(&longer).unwrap(), n as u64);

        t.insert(&prefix).unwrap();
        prop_assert_eq!(t.query(&prefix).unwrap(), 1);
        prop_assert_eq!(t.query(&longer).unwrap(), n as u64);
    }

    #[test]
    fn prop_rejected_tokens_change_nothing(token in prop::collection::vec(any::<u8>(), 1..=16)) {
        let mut t = CountingTrie::with_alphabet(Alphabet::HeaderName);
        t.insert("Accept").unwrap();
        let nodes = t.node_count();

        let valid = Alphabet::HeaderName.check(&token).is_ok();
        let result = t.insert(&token);
        prop_assert_eq!(result.is_ok(), valid);
        if !valid {
            prop_assert_eq!(t.node_count(), nodes);
            prop_assert_eq!(t.total(), 1);
            prop_assert!(t.query(&token).is_err());
        }
    }
}

#[test]
fn tally_matches_direct_counts() {
    use std::io::Cursor;

    let lines = [
        "Host: a", "Accept: b", "Accept: c", "Connection: d", "Accept-Language: e",
        "Accept: f", "Content-Length: 3", "Content-Type: x",
    ];
    let input = lines.join("\n");

    let mut tally = Tally::new(Config::default()).unwrap();
    tally.feed_reader(Cursor::new(input.as_bytes())).unwrap();
    let report = tally.report().unwrap();

    for (token, count) in &report.counts {
        let expected = lines
            .iter()
            .filter(|l| extract_token(l.as_bytes(), b':') == Some(token.as_bytes()))
            .count() as u64;
        assert_eq!(*count, expected, "{token}");
    }
    assert_eq!(report.get("Accept"), Some(3));
}
