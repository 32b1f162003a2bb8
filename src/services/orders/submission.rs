//! Order payload validation.
//!
//! The payload arrives as loose JSON and is checked fail-fast: the envelope
//! first, then (after the customer lookup) every item. The first bad item
//! rejects the whole submission.

use burger_core::{AppError, AppResult};
use burger_db::{Id, ItemKind, ItemRef, OrderItem, SelectedOptions};
use serde_json::Value;

pub const EMPTY_ORDER: &str = "at least one item required";
pub const TOTAL_PRICE_NOT_NUMBER: &str = "totalPrice must be a number";
pub const INVALID_ITEM: &str = "invalid order item";

/// Checks `items` is a non-empty list and `totalPrice` a number.
pub fn envelope(payload: &Value) -> AppResult<(&[Value], f64)> {
    let items = payload
        .get("items")
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .ok_or_else(|| AppError::invalid(EMPTY_ORDER))?;

    let total_price = payload
        .get("totalPrice")
        .and_then(Value::as_f64)
        .ok_or_else(|| AppError::invalid(TOTAL_PRICE_NOT_NUMBER))?;

    Ok((items.as_slice(), total_price))
}

/// Normalizes every item, rejecting the submission on the first invalid one.
pub fn items(raw: &[Value]) -> AppResult<Vec<OrderItem>> {
    raw.iter()
        .map(|item| parse_item(item).ok_or_else(|| AppError::invalid(INVALID_ITEM)))
        .collect()
}

fn parse_item(raw: &Value) -> Option<OrderItem> {
    let fields = raw.as_object()?;

    let id: Id = fields.get("itemRef")?.as_str()?.parse().ok()?;
    let kind = ItemKind::parse(fields.get("onModel")?.as_str()?)?;
    let quantity = quantity(fields.get("quantity")?)?;

    let selected_options = match fields.get("selectedOptions") {
        None | Some(Value::Null) => SelectedOptions::default(),
        Some(options) => serde_json::from_value(options.clone()).ok()?,
    };

    Some(OrderItem {
        item: ItemRef::new(kind, id),
        quantity,
        selected_options,
    })
}

/// Whole number of at least one. `2.0` is accepted, `1.5` is not.
fn quantity(raw: &Value) -> Option<u32> {
    if let Some(n) = raw.as_u64() {
        return u32::try_from(n).ok().filter(|q| *q >= 1);
    }

    let n = raw.as_f64()?;
    if n.fract() != 0.0 || n < 1.0 || n > f64::from(u32::MAX) {
        return None;
    }
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "range and integrality checked above"
    )]
    let quantity = n as u32;
    Some(quantity)
}

#[cfg(test)]
mod tests {
    use burger_db::MenuSize;
    use serde_json::json;

    use super::*;

    const ID: &str = "65f1c0ffee0000000000abcd";

    fn message(err: AppError) -> String {
        match err {
            AppError::InvalidRequest(msg) => msg,
            other => panic!("expected InvalidRequest, got {other:?}"),
        }
    }

    #[test]
    fn envelope_checks_items_before_price() {
        let err = envelope(&json!({ "items": [], "totalPrice": "x" })).unwrap_err();
        assert_eq!(message(err), EMPTY_ORDER);

        let err = envelope(&json!({ "totalPrice": 10 })).unwrap_err();
        assert_eq!(message(err), EMPTY_ORDER);

        let err = envelope(&json!({ "items": [{}], "totalPrice": "12" })).unwrap_err();
        assert_eq!(message(err), TOTAL_PRICE_NOT_NUMBER);

        let payload = json!({ "items": [{}], "totalPrice": 12.5 });
        let (items, total) = envelope(&payload).unwrap();
        assert_eq!(items.len(), 1);
        assert!((total - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn valid_items_are_normalized() {
        let parsed = items(&[
            json!({ "itemRef": ID, "onModel": "Product", "quantity": 2 }),
            json!({
                "itemRef": ID,
                "onModel": "Menu",
                "quantity": 1.0,
                "selectedOptions": { "size": "large" }
            }),
        ])
        .unwrap();

        assert_eq!(parsed[0].quantity, 2);
        assert!(matches!(parsed[0].item, ItemRef::Product(_)));
        assert_eq!(parsed[0].selected_options, SelectedOptions::default());
        assert!(matches!(parsed[1].item, ItemRef::Menu(_)));
        assert_eq!(parsed[1].selected_options.size, Some(MenuSize::Large));
    }

    #[test]
    fn any_bad_item_rejects_submission() {
        let good = json!({ "itemRef": ID, "onModel": "Product", "quantity": 1 });
        let bad = [
            json!({ "itemRef": "X", "onModel": "Product", "quantity": 0 }),
            json!({ "itemRef": ID, "onModel": "Product", "quantity": 0 }),
            json!({ "itemRef": ID, "onModel": "Product", "quantity": 1.5 }),
            json!({ "itemRef": ID, "onModel": "Product", "quantity": "2" }),
            json!({ "itemRef": ID, "onModel": "Drink", "quantity": 1 }),
            json!({ "onModel": "Product", "quantity": 1 }),
            json!({ "itemRef": ID, "quantity": 1 }),
            json!({ "itemRef": ID, "onModel": "Menu", "quantity": 1, "selectedOptions": { "size": "small" } }),
            json!("not an object"),
        ];

        for item in bad {
            let err = items(&[good.clone(), item.clone()]).unwrap_err();
            assert_eq!(message(err), INVALID_ITEM, "item: {item}");
        }
    }
}
