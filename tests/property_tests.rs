//! Property-based tests for cart arithmetic.
//!
//! These use proptest to verify the cart-mapping invariants across a wide
//! range of inputs: add/remove semantics and the order-total arithmetic
//! that checkout relies on.

use proptest::prelude::*;
use rust_decimal::Decimal;
use storefront_api::session::Cart;

// Strategies for generating test data

fn product_key_strategy() -> impl Strategy<Value = String> {
    // Uuid-shaped keys are what production carts hold, but the mapping
    // itself is agnostic; short alphanumeric keys explore the same space.
    "[a-f0-9]{8}".prop_map(|s| s)
}

fn price_strategy() -> impl Strategy<Value = Decimal> {
    (0u64..1_000_000, 0u32..100)
        .prop_map(|(dollars, cents)| Decimal::new((dollars * 100 + cents as u64) as i64, 2))
}

fn quantity_strategy() -> impl Strategy<Value = u32> {
    1u32..1_000
}

fn add(cart: &mut Cart, key: &str) {
    *cart.entry(key.to_string()).or_insert(0) += 1;
}

proptest! {
    // Adding a product n times yields quantity n.
    #[test]
    fn repeated_adds_accumulate(key in product_key_strategy(), n in 1usize..50) {
        let mut cart = Cart::new();
        for _ in 0..n {
            add(&mut cart, &key);
        }
        prop_assert_eq!(cart.get(&key), Some(&(n as u32)));
    }

    // One removal clears the whole entry, whatever the quantity was.
    #[test]
    fn remove_clears_entry_entirely(key in product_key_strategy(), n in 1usize..50) {
        let mut cart = Cart::new();
        for _ in 0..n {
            add(&mut cart, &key);
        }
        cart.remove(&key);
        prop_assert_eq!(cart.get(&key), None);
    }

    // Removing an absent key never disturbs other entries.
    #[test]
    fn remove_of_absent_key_is_a_no_op(
        keys in proptest::collection::btree_set(product_key_strategy(), 1..10),
        absent in product_key_strategy(),
    ) {
        prop_assume!(!keys.contains(&absent));

        let mut cart = Cart::new();
        for key in &keys {
            add(&mut cart, key);
        }
        let before = cart.clone();
        cart.remove(&absent);
        prop_assert_eq!(cart, before);
    }

    // The order total is the sum of per-line totals, independent of the
    // order entries were inserted in (the cart iterates sorted by key).
    #[test]
    fn total_is_sum_of_line_totals_in_any_insertion_order(
        entries in proptest::collection::vec(
            (product_key_strategy(), price_strategy(), quantity_strategy()),
            1..20,
        ),
    ) {
        let mut forward = Cart::new();
        for (key, _, quantity) in &entries {
            *forward.entry(key.clone()).or_insert(0) += quantity;
        }
        let mut backward = Cart::new();
        for (key, _, quantity) in entries.iter().rev() {
            *backward.entry(key.clone()).or_insert(0) += quantity;
        }
        prop_assert_eq!(&forward, &backward);

        // Price lookup per key; duplicate keys keep the first price,
        // mirroring a catalog lookup by id.
        let mut prices = std::collections::BTreeMap::new();
        for (key, price, _) in &entries {
            prices.entry(key.clone()).or_insert(*price);
        }

        let itemized: Decimal = forward
            .iter()
            .map(|(key, &quantity)| prices[key] * Decimal::from(quantity))
            .sum();
        let running = forward.iter().fold(Decimal::ZERO, |acc, (key, &quantity)| {
            acc + prices[key] * Decimal::from(quantity)
        });
        prop_assert_eq!(itemized, running);
    }
}
