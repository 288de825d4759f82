use super::*;

use shared::domain::{AirlineTotal, StageStatus};

fn snapshot(records: Vec<PassengerRecord>) -> RecordSnapshot {
    RecordSnapshot::new(1, records)
}

fn record(ticket: &str, download: StageStatus, parse: StageStatus) -> PassengerRecord {
    let mut record = PassengerRecord::new(ticket);
    record.download_status = download;
    record.parse_status = parse;
    record
}

#[test]
fn empty_snapshot_renders_empty_state_without_counters() {
    let view = render_passengers(&RecordSnapshot::default());
    assert_eq!(view, PassengerView::Empty);
    assert!(view.counters().is_none());
    assert!(view.rows().is_empty());
    assert_eq!(view.to_string(), format!("{EMPTY_PASSENGERS_MESSAGE}\n"));
    assert!(!view.to_string().contains("Total"));
}

#[test]
fn single_pending_record_offers_download_only() {
    let view = render_passengers(&snapshot(vec![PassengerRecord::new("T1")]));

    let counters = view.counters().expect("counters");
    assert_eq!(counters.total, 1);
    assert_eq!(counters.pending_downloads, 1);
    assert_eq!(counters.parsed, 0);

    let rows = view.rows();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].actions.download);
    assert!(!rows[0].actions.parse);
    assert!(rows[0].actions.artifact_link.is_none());

    let text = view.to_string();
    assert!(text.contains("Total: 1 | Pending Downloads: 1 | Parsed: 0"));
    assert!(text.contains("[Download]"));
    assert!(!text.contains("[Parse]"));
}

#[test]
fn actions_follow_both_stage_statuses() {
    let cases = [
        (StageStatus::Pending, StageStatus::Pending, true, false),
        (StageStatus::Pending, StageStatus::Success, true, false),
        (StageStatus::Success, StageStatus::Pending, false, true),
        (StageStatus::Success, StageStatus::Success, false, false),
    ];

    for (download, parse, offers_download, offers_parse) in cases {
        let view = render_passengers(&snapshot(vec![record(
            "T9",
            download.clone(),
            parse.clone(),
        )]));
        let row = &view.rows()[0];
        assert_eq!(row.actions.download, offers_download, "{download:?}/{parse:?}");
        assert_eq!(row.actions.parse, offers_parse, "{download:?}/{parse:?}");
    }
}

#[test]
fn error_statuses_pass_through_as_badge_labels() {
    let view = render_passengers(&snapshot(vec![record(
        "T2",
        StageStatus::Error("Not Found".into()),
        StageStatus::Pending,
    )]));
    let row = &view.rows()[0];
    assert_eq!(row.download, Badge::Error("Not Found".into()));
    assert_eq!(row.download.label(), "Not Found");
    assert!(row.actions.download, "errored downloads can be retried");

    let counters = view.counters().expect("counters");
    assert_eq!(counters.pending_downloads, 0, "errors are not pending");
}

#[test]
fn counters_count_pending_downloads_and_parsed_records() {
    let view = render_passengers(&snapshot(vec![
        record("A", StageStatus::Pending, StageStatus::Pending),
        record("B", StageStatus::Success, StageStatus::Success),
        record("C", StageStatus::Success, StageStatus::Pending),
        record("D", StageStatus::Pending, StageStatus::Pending),
    ]));
    let counters = view.counters().expect("counters");
    assert_eq!(counters.total, 4);
    assert_eq!(counters.pending_downloads, 2);
    assert_eq!(counters.parsed, 1);
}

#[test]
fn artifact_link_and_unbound_checkbox_are_rendered() {
    let mut with_pdf = record("T3", StageStatus::Success, StageStatus::Pending);
    with_pdf.pdf_filename = Some("T3.pdf".into());
    with_pdf.first_name = Some("Grace".into());
    with_pdf.last_name = Some("Hopper".into());

    let view = render_passengers(&snapshot(vec![with_pdf]));
    let row = &view.rows()[0];
    assert_eq!(row.actions.artifact_link.as_deref(), Some("/artifacts/T3.pdf"));
    assert!(row.selectable);
    assert_eq!(row.name, "Grace Hopper");

    let text = view.to_string();
    assert!(text.contains("Open PDF </artifacts/T3.pdf>"));
    assert!(text.contains("[ ]"));
}

#[test]
fn high_value_invoice_gets_marker() {
    let high = InvoiceRecord {
        amount: Some(15000.0),
        ..InvoiceRecord::default()
    };
    let normal = InvoiceRecord {
        amount: Some(9000.0),
        ..InvoiceRecord::default()
    };

    let InvoiceView::Table(rows) = render_invoices(&[high, normal]) else {
        panic!("expected invoice rows");
    };
    assert_eq!(rows[0].amount_cell(), "₹15000 High");
    assert!(rows[0].high_value);
    assert_eq!(rows[1].amount_cell(), "₹9000");
    assert!(!rows[1].high_value);
}

#[test]
fn invoice_row_falls_back_to_ticket_and_placeholders() {
    let invoice = InvoiceRecord {
        invoice_number: Some("INV-1234".into()),
        ticket_number: Some(TicketNumber::from("2171234567")),
        confidence: Some(92.0),
        ..InvoiceRecord::default()
    };

    let InvoiceView::Table(rows) = render_invoices(&[invoice]) else {
        panic!("expected invoice rows");
    };
    let row = &rows[0];
    assert_eq!(row.invoice_number, "INV-1234");
    assert_eq!(row.passenger, "2171234567");
    assert_eq!(row.date, "—");
    assert_eq!(row.amount, "—");
    assert_eq!(row.gstin, "—");
    assert_eq!(row.confidence, "92%");
    assert!(row.artifact_link.is_none());
}

#[test]
fn invoice_row_prefers_passenger_name() {
    let invoice = InvoiceRecord {
        first_name: Some("Ada".into()),
        last_name: Some("Lovelace".into()),
        ticket_number: Some(TicketNumber::from("T1")),
        pdf: Some("/artifacts/T1.pdf".into()),
        ..InvoiceRecord::default()
    };
    let InvoiceView::Table(rows) = render_invoices(&[invoice]) else {
        panic!("expected invoice rows");
    };
    assert_eq!(rows[0].passenger, "Ada Lovelace");
    assert_eq!(rows[0].artifact_link.as_deref(), Some("/artifacts/T1.pdf"));
}

#[test]
fn no_invoices_renders_empty_state() {
    let view = render_invoices(&[]);
    assert_eq!(view, InvoiceView::Empty);
    assert_eq!(view.to_string(), "No invoices yet.\n");
}

#[test]
fn empty_summary_renders_no_data() {
    let summary: SummaryAggregate =
        serde_json::from_value(serde_json::json!({"airline_totals": [], "high_value_count": 0}))
            .expect("summary");
    let view = render_summary(Some(&summary));
    assert_eq!(view, SummaryView::NoData);
    assert_eq!(view.to_string(), "No invoices yet.\n");
    assert_eq!(render_summary(None), SummaryView::NoData);
}

#[test]
fn summary_displays_server_totals_verbatim() {
    let summary = SummaryAggregate {
        airline_totals: vec![
            AirlineTotal {
                airline: Some("Thai Airways".into()),
                total: 12500.5,
                count: 2,
            },
            AirlineTotal {
                airline: None,
                total: 300.0,
                count: 1,
            },
        ],
        high_value_count: 1,
    };

    let view = render_summary(Some(&summary));
    let SummaryView::Totals {
        carriers,
        high_value_count,
    } = &view
    else {
        panic!("expected totals");
    };
    assert_eq!(carriers[0].airline, "Thai Airways");
    assert_eq!(carriers[0].total, "₹12500.5");
    assert_eq!(carriers[1].airline, "Unknown");
    assert_eq!(*high_value_count, 1);

    let text = view.to_string();
    assert!(text.contains("Thai Airways: ₹12500.5 — 2 invoices"));
    assert!(text.contains("High-value invoices (>₹10,000): 1"));
}
