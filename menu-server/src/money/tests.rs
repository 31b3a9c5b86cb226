use super::*;

fn line(name: &str, unit_price: f64, amount: i64) -> CartLine {
    CartLine {
        item_id: 1,
        dish_id: Some(1),
        name: name.to_string(),
        unit_price,
        amount,
    }
}

#[test]
fn test_to_decimal_precision() {
    // Classic floating point problem: 0.1 + 0.2 != 0.3
    let a = 0.1_f64;
    let b = 0.2_f64;
    let sum_f64 = a + b;

    // f64 fails
    assert_ne!(sum_f64, 0.3);

    // Decimal succeeds
    let sum_dec = to_decimal(a) + to_decimal(b);
    assert_eq!(to_f64(sum_dec), 0.3);
}

#[test]
fn test_accumulation_precision() {
    // Sum 0.01 one thousand times
    let mut total = Decimal::ZERO;
    for _ in 0..1000 {
        total += to_decimal(0.01);
    }
    assert_eq!(to_f64(total), 10.0);
}

#[test]
fn test_line_total() {
    assert_eq!(to_f64(line_total(10.99, 3)), 32.97);
    assert_eq!(to_f64(line_total(12.99, 2)), 25.98);
}

#[test]
fn test_order_totals_pizza_and_soda() {
    // 12.99 × 2 + 2.50 × 1 = 28.48, + 5.00 fee = 33.48
    let lines = vec![line("Pizza", 12.99, 2), line("Soda", 2.50, 1)];
    let totals = order_totals(&lines, 5.00);
    assert_eq!(totals.subtotal, 28.48);
    assert_eq!(totals.delivery_fee, 5.00);
    assert_eq!(totals.total, 33.48);
}

#[test]
fn test_order_totals_empty_cart() {
    let totals = order_totals(&[], 5.00);
    assert_eq!(totals.subtotal, 0.0);
    assert_eq!(totals.total, 5.00);
}

#[test]
fn test_order_totals_uses_stored_fee() {
    // Fee comes from the delivery row, not a recomputed default
    let lines = vec![line("Pizza", 12.99, 2)];
    let totals = order_totals(&lines, 3.75);
    assert_eq!(totals.total, 29.73);
}

#[test]
fn test_validate_price() {
    assert_eq!(validate_price(12.994, "price").unwrap(), 12.99);
    assert_eq!(validate_price(12.996, "price").unwrap(), 13.00);
    assert!(validate_price(-0.01, "price").is_err());
    assert!(validate_price(1000.0, "price").is_err());
    assert!(validate_price(f64::NAN, "price").is_err());
    assert!(validate_price(f64::INFINITY, "price").is_err());
}
