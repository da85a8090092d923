use invoicer::core::*;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn layout() -> LayoutConfig {
    LayoutConfig::new()
        .header_line("ACME Srl")
        .header_line("Via Roma 1, 00100 Roma")
        .header_line("P.IVA IT01234567890")
        .footer_line("Payment due within 30 days")
        .footer_line("Thank you for your business")
        .payment_instruction("EUR", "IBAN IT00 0000 0000 0000 0000 00")
        .payment_instruction("chf", "IBAN CH00 0000 0000 0000 0000 0")
}

fn acme() -> Invoice {
    InvoiceBuilder::new("Acme Corp", "EUR")
        .address("Main Street 1", "12345 Springfield")
        .business_number("VAT 0042")
        .date("01/02/2024")
        .item("Consulting", dec!(2), dec!(100.0))
        .build()
        .unwrap()
}

fn line_items(blocks: &[RenderBlock]) -> &Table {
    blocks
        .iter()
        .find(|b| b.kind() == BlockKind::LineItems)
        .and_then(RenderBlock::table)
        .expect("line items block")
}

// --- End-to-end scenario ---

#[test]
fn acme_first_invoice() {
    let ledger = MemoryLedger::new();
    let mut invoice = acme();
    let number = resolve_invoice(&mut invoice, &ledger).unwrap();

    assert_eq!(number, 1);
    assert_eq!(invoice.total().unwrap(), dec!(200.0));
    assert_eq!(artifact_stem(number, &invoice.customer().name), "1_acme_corp");

    let blocks = compose(&invoice, &layout()).unwrap();
    assert_eq!(
        line_items(&blocks).last_row().unwrap().text(),
        "Tot (EUR): 200.0 EUR"
    );
}

#[test]
fn full_block_sequence() {
    let mut invoice = acme();
    invoice.assign_number(1).unwrap();
    let kinds: Vec<_> = compose(&invoice, &layout())
        .unwrap()
        .iter()
        .map(RenderBlock::kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            BlockKind::Identity,
            BlockKind::Spacer,
            BlockKind::Metadata,
            BlockKind::Spacer,
            BlockKind::LineItems,
            BlockKind::Spacer,
            BlockKind::Payment,
            BlockKind::Spacer,
            BlockKind::Footer,
        ]
    );
}

#[test]
fn long_descriptions_wrap_at_forty() {
    let mut invoice = InvoiceBuilder::new("Acme", "EUR")
        .item(
            "Design and implementation of the quarterly reporting pipeline including review",
            dec!(1),
            dec!(1500),
        )
        .build()
        .unwrap();
    invoice.assign_number(2).unwrap();
    let blocks = compose(&invoice, &layout()).unwrap();
    let description = &line_items(&blocks).rows[1].cells[0];
    assert!(description.contains('\n'));
    assert!(description.lines().all(|l| l.chars().count() <= DESCRIPTION_WIDTH));
    assert_eq!(
        description.replace('\n', " "),
        "Design and implementation of the quarterly reporting pipeline including review"
    );
}

#[test]
fn unknown_currency_produces_nothing() {
    let mut invoice = InvoiceBuilder::new("Acme", "JPY")
        .item("Work", dec!(1), dec!(1000))
        .build()
        .unwrap();
    invoice.assign_number(1).unwrap();
    let err = compose(&invoice, &layout()).unwrap_err();
    assert!(matches!(err, InvoicerError::UnknownCurrency(c) if c == "JPY"));
}

#[test]
fn payment_block_uses_lowercased_currency() {
    let mut invoice = InvoiceBuilder::new("Acme", "CHF")
        .item("Work", dec!(1), dec!(1000))
        .build()
        .unwrap();
    invoice.assign_number(1).unwrap();
    let blocks = compose(&invoice, &layout()).unwrap();
    let payment = blocks
        .iter()
        .find(|b| b.kind() == BlockKind::Payment)
        .and_then(RenderBlock::table)
        .unwrap();
    assert_eq!(payment.rows[0].text(), "IBAN CH00 0000 0000 0000 0000 0");
}

#[test]
fn summary_snapshot() {
    let mut invoice = InvoiceBuilder::new("Acme Corp", "EUR")
        .address("Main Street 1", "12345 Springfield")
        .business_number("VAT 0042")
        .date("01/02/2024")
        .item("Consulting", dec!(2), dec!(100.0))
        .item("Travel expenses", dec!(1), dec!(35.50))
        .build()
        .unwrap();
    invoice.assign_number(7).unwrap();
    let summary = InvoiceSummary::new(&invoice, NumberFormat::Shortest)
        .unwrap()
        .to_string();
    insta::assert_snapshot!("acme_summary", summary);
}

// --- Properties ---

fn arb_items() -> impl Strategy<Value = Vec<(u32, i64)>> {
    prop::collection::vec((1u32..=100u32, 1i64..10_000_000i64), 1..=8)
}

fn invoice_with(items: &[(u32, i64)]) -> Invoice {
    let mut builder = InvoiceBuilder::new("Prop Test", "EUR").date("01/01/2024");
    for (i, (qty, cents)) in items.iter().enumerate() {
        builder = builder.item(format!("Item {}", i + 1), Decimal::from(*qty), Decimal::new(*cents, 2));
    }
    let mut invoice = builder.build().unwrap();
    invoice.assign_number(1).unwrap();
    invoice
}

proptest! {
    #[test]
    fn total_row_is_exact_sum(items in arb_items()) {
        let invoice = invoice_with(&items);
        let expected: Decimal = items
            .iter()
            .map(|(q, c)| Decimal::from(*q) * Decimal::new(*c, 2))
            .sum();
        prop_assert_eq!(invoice.total().unwrap(), expected);

        let blocks = compose(&invoice, &layout()).unwrap();
        let table = line_items(&blocks);
        prop_assert_eq!(table.rows.len(), items.len() + 2);
        prop_assert_eq!(
            table.last_row().unwrap().text(),
            format!("Tot (EUR): {} EUR", NumberFormat::Shortest.format(expected))
        );
    }

    #[test]
    fn compose_is_deterministic(items in arb_items()) {
        let invoice = invoice_with(&items);
        let layout = layout().number_format(NumberFormat::Fixed(2));
        prop_assert_eq!(compose(&invoice, &layout).unwrap(), compose(&invoice, &layout).unwrap());
    }
}
