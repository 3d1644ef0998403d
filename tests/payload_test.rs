use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use covtui::chart_data::{running_totals, PageData};
use covtui::payload::Payload;

const SAMPLE: &str = r#"{
    "pageType": "US",
    "confirmed": [
        {"date": "2020-03-02T00:00:00Z", "totalPositive": 100, "newPositive": 40},
        {"date": "2020-03-01T00:00:00Z", "totalPositive": 60, "newPositive": 60}
    ],
    "totalPosNeg": [
        {"date": "2020-03-01T00:00:00Z", "positive": 10, "negative": 20},
        {"date": "2020-03-02T00:00:00Z", "positive": 15, "negative": 5}
    ],
    "dailyPosNeg": [
        {"date": "2020-03-01T00:00:00Z", "positive": 10, "negative": 20},
        {"date": "2020-03-02T00:00:00Z", "positive": 5, "negative": -15}
    ],
    "mostRecently": [
        {"positive": 100, "negative": 900, "death": 3, "posNeg": 1000},
        {"positive": 60, "negative": 700, "death": 2, "posNeg": 760}
    ],
    "stateMostRecent": [
        {
            "record": {"state": "WA", "positive": 70, "negative": 500, "death": 3},
            "diff": {"state": "WA", "positive": 10, "negative": 100, "death": 1}
        },
        {
            "record": {"state": "GU", "positive": 0, "negative": 12, "death": 0},
            "diff": {"state": "GU", "positive": 0, "negative": 2, "death": 0}
        }
    ]
}"#;

#[test]
fn base64_payload_decodes_end_to_end() {
    let encoded = STANDARD.encode(SAMPLE.as_bytes());
    let payload = Payload::from_str(&encoded).expect("decode base64 payload");
    assert!(payload.is_us());

    let page = PageData::from_payload(payload);
    assert!(page.is_us);
    assert_eq!(page.confirmed.rows.len(), 2);
    // Rows come out date-sorted regardless of payload order.
    assert_eq!(page.confirmed.rows[0].values, vec![60.0, 60.0]);
    assert_eq!(page.confirmed.rows[1].values, vec![100.0, 40.0]);
    assert_eq!(page.most_recently.len(), 2);
    assert_eq!(page.state_most_recent.as_ref().map(Vec::len), Some(2));
}

#[test]
fn stacked_totals_accumulate_per_row() {
    let payload = Payload::from_str(SAMPLE).expect("decode json payload");
    let page = PageData::from_payload(payload);

    let totals: Vec<Vec<f64>> = page
        .total_pos_neg
        .rows
        .iter()
        .map(|row| running_totals(&row.values))
        .collect();
    assert_eq!(totals, vec![vec![10.0, 30.0], vec![15.0, 20.0]]);
}

#[test]
fn positive_rate_derives_from_totals() {
    let payload = Payload::from_str(SAMPLE).expect("decode json payload");
    let page = PageData::from_payload(payload);

    let rates: Vec<f64> = page
        .positive_rate
        .rows
        .iter()
        .map(|row| row.values[0])
        .collect();
    assert_eq!(rates, vec![10.0 / 30.0, 15.0 / 20.0]);
}

#[test]
fn payload_file_round_trip() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("us.b64");
    std::fs::write(&path, STANDARD.encode(SAMPLE.as_bytes())).expect("write payload");

    let payload = Payload::from_file(&path).expect("read payload file");
    assert_eq!(payload.page_type, "US");
    assert_eq!(payload.daily_pos_neg.len(), 2);
}
