//! Tests for order parsing, pricing, and the status workflow.

use super::*;
use rstest::rstest;

fn price(units: i64) -> Price {
    Price::new(Decimal::from(units)).expect("positive price")
}

#[rstest]
#[case(OrderStatus::Pending, OrderStatus::Preparing)]
#[case(OrderStatus::Preparing, OrderStatus::Ready)]
#[case(OrderStatus::Ready, OrderStatus::Completed)]
#[case(OrderStatus::Pending, OrderStatus::Cancelled)]
#[case(OrderStatus::Preparing, OrderStatus::Cancelled)]
#[case(OrderStatus::Ready, OrderStatus::Cancelled)]
fn allowed_transitions(#[case] from: OrderStatus, #[case] to: OrderStatus) {
    assert_eq!(from.transition_to(to), Ok(to));
}

#[rstest]
#[case(OrderStatus::Pending, OrderStatus::Ready)]
#[case(OrderStatus::Pending, OrderStatus::Pending)]
#[case(OrderStatus::Ready, OrderStatus::Preparing)]
#[case(OrderStatus::Completed, OrderStatus::Pending)]
#[case(OrderStatus::Completed, OrderStatus::Cancelled)]
#[case(OrderStatus::Cancelled, OrderStatus::Ready)]
fn rejected_transitions(#[case] from: OrderStatus, #[case] to: OrderStatus) {
    assert_eq!(from.transition_to(to), Err(InvalidTransition { from, to }));
}

#[rstest]
fn every_status_round_trips_through_its_label() {
    for status in OrderStatus::ALL {
        assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
    }
}

#[rstest]
#[case("")]
#[case("PENDING")]
#[case("delivered")]
fn unknown_status_labels_are_rejected(#[case] raw: &str) {
    assert_eq!(raw.parse::<OrderStatus>(), Err(OrderValidationError::UnknownStatus));
}

#[rstest]
fn empty_orders_are_rejected() {
    assert_eq!(OrderLine::parse_all(&[]), Err(OrderValidationError::EmptyItems));
}

#[rstest]
#[case(OrderLineInput { menu_item_id: None, quantity: Some(1) }, OrderValidationError::InvalidMenuItem { index: 1 })]
#[case(OrderLineInput { menu_item_id: Some(0), quantity: Some(1) }, OrderValidationError::InvalidMenuItem { index: 1 })]
#[case(OrderLineInput { menu_item_id: Some(2), quantity: Some(0) }, OrderValidationError::InvalidQuantity { index: 1 })]
#[case(OrderLineInput { menu_item_id: Some(2), quantity: Some(-3) }, OrderValidationError::InvalidQuantity { index: 1 })]
#[case(OrderLineInput { menu_item_id: Some(2), quantity: Some(i64::MAX) }, OrderValidationError::InvalidQuantity { index: 1 })]
fn bad_lines_report_their_index(
    #[case] bad: OrderLineInput,
    #[case] expected: OrderValidationError,
) {
    let good = OrderLineInput {
        menu_item_id: Some(1),
        quantity: Some(1),
    };
    assert_eq!(OrderLine::parse_all(&[good, bad]), Err(expected));
}

#[rstest]
fn pricing_sums_every_line() {
    let lines = OrderLine::parse_all(&[
        OrderLineInput {
            menu_item_id: Some(3),
            quantity: Some(2),
        },
        OrderLineInput {
            menu_item_id: Some(5),
            quantity: Some(1),
        },
    ])
    .expect("valid lines");
    let prices = HashMap::from([
        (MenuItemId::new(3), price(85)),
        (MenuItemId::new(5), Price::new(Decimal::new(2050, 2)).expect("positive")),
    ]);

    let priced = price_order(&lines, &prices).expect("all items orderable");

    assert_eq!(priced.total_amount, Decimal::new(19050, 2));
    assert_eq!(priced.lines.len(), 2);
    assert_eq!(priced.lines[0].unit_price, price(85));
}

#[rstest]
fn pricing_reports_the_first_unorderable_item() {
    let lines = [
        OrderLine {
            menu_item_id: MenuItemId::new(3),
            quantity: 1,
        },
        OrderLine {
            menu_item_id: MenuItemId::new(9),
            quantity: 1,
        },
    ];
    let prices = HashMap::from([(MenuItemId::new(3), price(85))]);

    assert_eq!(
        price_order(&lines, &prices),
        Err(PricingError::Unavailable(MenuItemId::new(9)))
    );
}

#[rstest]
#[case(Decimal::new(9_999_999_999, 2), 10)]
#[case(Decimal::from(85), 2_000_000)]
#[case(Decimal::from(85), i32::MAX)]
fn pricing_rejects_totals_beyond_the_storable_amount(
    #[case] unit: Decimal,
    #[case] quantity: i32,
) {
    let lines = [OrderLine {
        menu_item_id: MenuItemId::new(3),
        quantity,
    }];
    let prices = HashMap::from([(MenuItemId::new(3), Price::new(unit).expect("valid price"))]);

    assert_eq!(price_order(&lines, &prices), Err(PricingError::TotalTooLarge));
}

#[rstest]
fn pricing_accepts_a_total_at_the_storable_limit() {
    let lines = [OrderLine {
        menu_item_id: MenuItemId::new(3),
        quantity: 1,
    }];
    let prices = HashMap::from([(
        MenuItemId::new(3),
        Price::new(MAX_AMOUNT).expect("valid price"),
    )]);

    let priced = price_order(&lines, &prices).expect("at the limit");

    assert_eq!(priced.total_amount, MAX_AMOUNT);
}

#[rstest]
#[case(OrderFilter::All, UserId::new(2), OrderStatus::Completed, true)]
#[case(OrderFilter::ForUser(UserId::new(1)), UserId::new(2), OrderStatus::Pending, false)]
#[case(OrderFilter::ForUser(UserId::new(2)), UserId::new(2), OrderStatus::Pending, true)]
#[case(OrderFilter::KitchenQueue, UserId::new(2), OrderStatus::Preparing, true)]
#[case(OrderFilter::KitchenQueue, UserId::new(2), OrderStatus::Ready, false)]
fn filters_select_orders(
    #[case] filter: OrderFilter,
    #[case] owner: UserId,
    #[case] status: OrderStatus,
    #[case] expected: bool,
) {
    assert_eq!(filter.matches(owner, status), expected);
}

#[rstest]
fn orders_serialise_money_as_numbers() {
    let order = Order {
        id: OrderId::new(1),
        user_id: UserId::new(2),
        status: OrderStatus::Pending,
        total_amount: Decimal::new(170, 0),
        created_at: DateTime::<Utc>::UNIX_EPOCH,
        updated_at: DateTime::<Utc>::UNIX_EPOCH,
        items: vec![OrderItem {
            id: 10,
            menu_item_id: MenuItemId::new(3),
            quantity: 2,
            price: Decimal::new(85, 0),
            menu_item: OrderItemMenu {
                name: "Masala Dosa".to_owned(),
                description: None,
                category: "South Indian".to_owned(),
            },
        }],
    };
    let value = serde_json::to_value(&order).expect("serialise order");
    assert_eq!(value["total_amount"], serde_json::json!(170.0));
    assert_eq!(value["status"], "pending");
    assert_eq!(value["items"][0]["price"], serde_json::json!(85.0));
    assert_eq!(value["items"][0]["menu_item"]["name"], "Masala Dosa");
}
