//! End-to-end settlement flow
//!
//! Walks a full service cycle: open a shift with a float, ring up an
//! order, discount it, settle in cash and verify both the order totals
//! and the drawer reconciliation line up.

use pos_server::core::{OpContext, Operator};
use pos_server::db::repository::account as account_repo;
use pos_server::db::DbService;
use pos_server::{ledger, orders, shifts};
use shared::models::{
    OrderAddItem, OrderAddPayment, OrderCreate, OrderPatch, OrderStatus, PaymentMethod,
    RelationEntry, Role, ShiftClose, ShiftOpen,
};
use sqlx::SqliteConnection;

fn ctx(role: Role) -> OpContext {
    OpContext::now(Operator { id: 1, role })
}

async fn seed_menu(conn: &mut SqliteConnection) {
    sqlx::query("INSERT INTO menu_item (id, name, price, is_active, printer_id) VALUES (10, 'Menu del dia', 25.0, 1, NULL)")
        .execute(conn)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_full_cycle_settles_order_and_drawer() {
    let db = DbService::open_in_memory().await.unwrap();
    let mut conn = db.pool.acquire().await.unwrap();
    let cashier = ctx(Role::Cashier);
    let admin = ctx(Role::Admin);

    seed_menu(&mut conn).await;
    ledger::set_payment_method_account(&mut conn, &admin, PaymentMethod::Cash, 1)
        .await
        .unwrap();

    // Shift opens with a 100.00 float
    let shift = shifts::open_shift(
        &mut conn,
        &cashier,
        ShiftOpen {
            opening_cash: 100.0,
            note: None,
        },
    )
    .await
    .unwrap();

    // Two 25.00 covers
    let order = orders::create_order(&mut conn, &cashier, OrderCreate::default())
        .await
        .unwrap();
    let order_id = order.order.id;
    orders::add_item(
        &mut conn,
        &cashier,
        order_id,
        OrderAddItem {
            menu_item_id: 10,
            qty: 2.0,
            options: vec![],
            note: None,
        },
    )
    .await
    .unwrap();

    // 10% order discount
    let snap = orders::update_order(
        &mut conn,
        &cashier,
        order_id,
        OrderPatch {
            discount_percent: Some(10.0),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(snap.totals.subtotal, 50.0);
    assert_eq!(snap.totals.total, 45.0);

    // 45.00 cash settles the order
    let snap = orders::add_payment(
        &mut conn,
        &cashier,
        order_id,
        OrderAddPayment {
            method: PaymentMethod::Cash,
            amount: 45.0,
            reference: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(snap.order.status, OrderStatus::Paid);
    assert_eq!(snap.totals.balance, 0.0);

    // the shift drawer holds float + payment
    let drawer = account_repo::find_shift_account(&mut conn, "vault:cash", shift.shift.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ledger::balance_of(&mut conn, drawer.id).await.unwrap(), 145.0);

    orders::close_order(&mut conn, &cashier, order_id).await.unwrap();

    // reconciliation: drawer counted exactly
    let closed = shifts::close_shift(
        &mut conn,
        &cashier,
        ShiftClose {
            closing_cash: 145.0,
            note: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(closed.expected_cash, 145.0);
    assert_eq!(closed.variance, Some(0.0));
}

#[tokio::test]
async fn test_settlement_fans_out_over_relations() {
    let db = DbService::open_in_memory().await.unwrap();
    let mut conn = db.pool.acquire().await.unwrap();
    let cashier = ctx(Role::Cashier);
    let admin = ctx(Role::Admin);
    let manager = ctx(Role::Manager);

    seed_menu(&mut conn).await;

    // CARD revenue account with a 21% tax withholding rule
    let revenue = ledger::create_account(
        &mut conn,
        &manager,
        shared::models::AccountCreate {
            name: "Card Revenue".into(),
            account_type: "BANK".into(),
            currency: "EUR".into(),
            parent_account_id: None,
        },
    )
    .await
    .unwrap();
    let tax = ledger::create_account(
        &mut conn,
        &manager,
        shared::models::AccountCreate {
            name: "Tax Withholding".into(),
            account_type: "TAX".into(),
            currency: "EUR".into(),
            parent_account_id: None,
        },
    )
    .await
    .unwrap();
    ledger::set_relations(
        &mut conn,
        &manager,
        revenue.id,
        vec![RelationEntry {
            to_account_id: tax.id,
            percentage: 21.0,
            kind: "tax".into(),
        }],
    )
    .await
    .unwrap();
    ledger::set_payment_method_account(&mut conn, &admin, PaymentMethod::Card, revenue.id)
        .await
        .unwrap();

    shifts::open_shift(&mut conn, &cashier, ShiftOpen::default())
        .await
        .unwrap();
    let order = orders::create_order(&mut conn, &cashier, OrderCreate::default())
        .await
        .unwrap();
    orders::add_item(
        &mut conn,
        &cashier,
        order.order.id,
        OrderAddItem {
            menu_item_id: 10,
            qty: 4.0,
            options: vec![],
            note: None,
        },
    )
    .await
    .unwrap();
    orders::add_payment(
        &mut conn,
        &cashier,
        order.order.id,
        OrderAddPayment {
            method: PaymentMethod::Card,
            amount: 100.0,
            reference: Some("terminal-1".into()),
        },
    )
    .await
    .unwrap();

    // 100 in, 21 allocated onward
    assert_eq!(ledger::balance_of(&mut conn, revenue.id).await.unwrap(), 79.0);
    assert_eq!(ledger::balance_of(&mut conn, tax.id).await.unwrap(), 21.0);
}

#[tokio::test]
async fn test_merge_combines_tickets_under_one_bill() {
    let db = DbService::open_in_memory().await.unwrap();
    let mut conn = db.pool.acquire().await.unwrap();
    let cashier = ctx(Role::Cashier);
    let admin = ctx(Role::Admin);

    seed_menu(&mut conn).await;
    ledger::set_payment_method_account(&mut conn, &admin, PaymentMethod::Cash, 1)
        .await
        .unwrap();
    shifts::open_shift(&mut conn, &cashier, ShiftOpen::default())
        .await
        .unwrap();

    let mut ids = Vec::new();
    for table in [1, 2] {
        let order = orders::create_order(
            &mut conn,
            &cashier,
            OrderCreate {
                table_id: Some(table),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        orders::add_item(
            &mut conn,
            &cashier,
            order.order.id,
            OrderAddItem {
                menu_item_id: 10,
                qty: 1.0,
                options: vec![],
                note: Some(format!("table {table}")),
            },
        )
        .await
        .unwrap();
        ids.push(order.order.id);
    }

    let merged = orders::merge_orders(&mut conn, &cashier, &ids, ids[0])
        .await
        .unwrap();
    assert_eq!(merged.items.len(), 2);
    assert_eq!(merged.totals.total, 50.0);

    // one payment settles the combined bill
    let snap = orders::add_payment(
        &mut conn,
        &cashier,
        ids[0],
        OrderAddPayment {
            method: PaymentMethod::Cash,
            amount: 50.0,
            reference: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(snap.order.status, OrderStatus::Paid);

    // the retired source freed its table
    let reuse = orders::create_order(
        &mut conn,
        &cashier,
        OrderCreate {
            table_id: Some(2),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(!ids.contains(&reuse.order.id));
}

#[tokio::test]
async fn test_file_backed_database_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pos.db");
    let path = path.to_str().unwrap();

    let order_id;
    {
        let db = DbService::new(path).await.unwrap();
        let mut conn = db.pool.acquire().await.unwrap();
        let cashier = ctx(Role::Cashier);
        shifts::open_shift(&mut conn, &cashier, ShiftOpen::default())
            .await
            .unwrap();
        order_id = orders::create_order(&mut conn, &cashier, OrderCreate::default())
            .await
            .unwrap()
            .order
            .id;
        drop(conn);
        db.pool.close().await;
    }

    let db = DbService::new(path).await.unwrap();
    let mut conn = db.pool.acquire().await.unwrap();
    let snap = orders::load_snapshot(&mut conn, order_id).await.unwrap();
    assert_eq!(snap.order.order_no, 1);
}
