use chrono::NaiveDate;
use todolist_core::{compute_sort_key, Priority, TaskItem, TaskItemError};
use uuid::Uuid;

#[test]
fn new_item_renders_summary_with_defaults() {
    let item = TaskItem::new("Item 1", "2/6/21", Priority::High, "Body text 1").unwrap();

    assert_eq!(
        item.all_info(),
        "Name: Item 1\nDue Date: 2/6/21\nPriority: High\nNotes: Body text 1\nLate: Yes\nItem Complete: No"
    );
    assert_eq!(item.to_string(), item.all_info());
    assert!(!item.is_done());
    assert!(!item.id().is_nil());
}

#[test]
fn every_editable_field_can_change() {
    let mut item = TaskItem::new("Item 1", "2/6/21", Priority::High, "Body text 1").unwrap();
    item.set_name("Item 2");
    item.set_due_date("3/16/21").unwrap();
    item.set_priority(Priority::Medium);
    item.set_notes("New notes");
    item.set_is_late(true);
    item.set_is_done(true);

    assert_eq!(
        item.all_info(),
        "Name: Item 2\nDue Date: 3/16/21\nPriority: Medium\nNotes: New notes\nLate: Yes\nItem Complete: Yes"
    );
    assert_eq!(item.sort_key(), compute_sort_key("3/16/21", Priority::Medium).unwrap());
}

#[test]
fn done_flag_is_independent_of_lateness() {
    let mut item = TaskItem::new("Item", "2/6/21", Priority::High, "").unwrap();
    assert!(item.is_late());
    assert!(!item.is_done());

    item.set_is_done(true);
    item.set_is_late(false);
    assert!(item.is_done());
    assert!(!item.is_late());
}

#[test]
fn lateness_follows_the_current_date() {
    let past = TaskItem::new("Past", "2/6/21", Priority::High, "").unwrap();
    let future = TaskItem::new("Future", "12/31/99", Priority::Low, "").unwrap();

    assert!(past.is_late());
    assert!(!future.is_late());
}

#[test]
fn lateness_against_fixed_date() {
    let written_on = NaiveDate::from_ymd_opt(2021, 2, 9);
    let late = TaskItem::new_at("Item 1", "2/6/21", Priority::High, "", written_on).unwrap();
    let on_time = TaskItem::new_at("Item 2", "2/6/22", Priority::High, "", written_on).unwrap();

    assert!(late.is_late());
    assert!(!on_time.is_late());
}

#[test]
fn malformed_due_date_is_rejected() {
    let err = TaskItem::new("Item", "2/6", Priority::High, "").unwrap_err();
    assert_eq!(err, TaskItemError::InvalidDueDate("2/6".to_string()));
    assert!(err.to_string().contains("M/d/yy"));
}

#[test]
fn with_id_rejects_nil_uuid() {
    let err = TaskItem::with_id(Uuid::nil(), "Item", "2/6/21", Priority::High, "").unwrap_err();
    assert_eq!(err, TaskItemError::NilId);
}

#[test]
fn serialization_uses_expected_wire_fields() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let mut item = TaskItem::with_id(id, "Ship", "4/16/21", Priority::Low, "notes").unwrap();
    item.set_is_done(true);

    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["id"], id.to_string());
    assert_eq!(json["name"], "Ship");
    assert_eq!(json["due_date"], "4/16/21");
    assert_eq!(json["priority"], "low");
    assert_eq!(json["is_done"], true);
    assert_eq!(json["sort_key"], 2_104_163);

    let decoded: TaskItem = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, item);
}

#[test]
fn deserialize_rederives_sort_key_and_rejects_bad_dates() {
    let value = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "name": "Item",
        "due_date": "2/6/21",
        "priority": "high",
        "notes": "",
        "is_done": false,
        "is_late": false,
        "sort_key": 1
    });
    let item: TaskItem = serde_json::from_value(value).unwrap();
    assert_eq!(item.sort_key(), 2_102_061);

    let bad = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "name": "Item",
        "due_date": "2-6-21",
        "priority": "high",
        "notes": ""
    });
    let err = serde_json::from_value::<TaskItem>(bad).unwrap_err();
    assert!(
        err.to_string().contains("invalid due date `2-6-21`"),
        "unexpected error: {err}"
    );
}
