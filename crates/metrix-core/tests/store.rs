//! MetricStore behaviour: create/get/append, batches, name policy.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use metrix_core::{
    AppendMetric, CreateMetric, MetricId, MetricRegistry, MetricStore, MetrixError, NamePolicy,
    RegistryConfig,
};

#[test]
fn create_then_appends_keep_call_order() {
    let store = MetricStore::default();
    let m = store.create("cpu", 1.5).unwrap();
    assert_eq!(m.values, vec![1.5]);
    assert!(store.contains(&m.id));
    assert!(!store.contains(&MetricId::new()));

    let id = m.id.to_string();
    for v in [2.0, -3.0, 2.0, 0.25] {
        store.append(&id, v).unwrap();
    }

    let got = store.get(&id).unwrap();
    assert_eq!(got.name, "cpu");
    assert_eq!(got.values, vec![1.5, 2.0, -3.0, 2.0, 0.25]);
}

#[test]
fn append_returns_updated_metric() {
    let store = MetricStore::default();
    let m = store.create("mem", 10.0).unwrap();
    let updated = store.append_to(&m.id, 11.0).unwrap();
    assert_eq!(updated.id, m.id);
    assert_eq!(updated.values, vec![10.0, 11.0]);
}

#[test]
fn repeated_get_is_value_equal() {
    let store = MetricStore::default();
    let m = store.create("disk", 3.0).unwrap();
    store.append_to(&m.id, 4.0).unwrap();

    let id = m.id.to_string();
    let a = store.get(&id).unwrap();
    let b = store.get(&id).unwrap();
    assert_eq!(a, b);
}

#[test]
fn unknown_and_malformed_ids_are_distinct_errors() {
    let store = MetricStore::default();

    let unknown = MetricId::new().to_string();
    let err = store.get(&unknown).expect_err("unknown id");
    assert!(matches!(err, MetrixError::NotFound(_)));
    assert_eq!(err.client_code().as_str(), "NOT_FOUND");

    let err = store.get("not-a-uuid").expect_err("malformed id");
    assert!(matches!(err, MetrixError::InvalidKey(_)));
    assert_eq!(err.client_code().as_str(), "INVALID_KEY");

    let err = store.append(&unknown, 1.0).expect_err("append to unknown id");
    assert!(matches!(err, MetrixError::NotFound(_)));
    let err = store.append("42", 1.0).expect_err("append to malformed id");
    assert!(matches!(err, MetrixError::InvalidKey(_)));
}

#[test]
fn non_finite_values_are_rejected() {
    let store = MetricStore::default();
    let err = store.create("nan", f64::NAN).expect_err("nan");
    assert_eq!(err.client_code().as_str(), "INVALID_VALUE");
    assert!(store.is_empty());

    let m = store.create("ok", 1.0).unwrap();
    let err = store.append_to(&m.id, f64::INFINITY).expect_err("inf");
    assert!(matches!(err, MetrixError::InvalidValue(_)));
    assert_eq!(store.find(&m.id).unwrap().values, vec![1.0]);
}

#[test]
fn duplicate_names_allowed_by_default() {
    let store = MetricStore::default();
    let a = store.create("latency", 1.0).unwrap();
    let b = store.create("latency", 2.0).unwrap();
    assert_ne!(a.id, b.id);
    assert_eq!(store.len(), 2);
}

#[test]
fn unique_policy_rejects_taken_names() {
    let store = MetricStore::new(NamePolicy::Unique);
    store.create("latency", 1.0).unwrap();
    let err = store.create("latency", 2.0).expect_err("duplicate");
    assert!(matches!(err, MetrixError::AlreadyExists(ref n) if n == "latency"));
    assert_eq!(store.len(), 1);

    store.reset();
    store.create("latency", 3.0).expect("name is free again after reset");
}

#[test]
fn create_batch_reports_unparseable_element() {
    let store = MetricStore::default();
    let reqs = vec![
        CreateMetric::new("a", "1.0"),
        CreateMetric::new("b", "two"),
        CreateMetric::new("c", 3.0),
        CreateMetric::new("d", " 4 "),
    ];

    let out = store.create_batch(&reqs);
    let names: Vec<_> = out.applied.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["a", "c", "d"]);
    assert_eq!(out.applied[2].values, vec![4.0]);

    assert_eq!(out.rejected.len(), 1);
    assert_eq!(out.rejected[0].index, 1);
    assert_eq!(out.rejected[0].code, "INVALID_VALUE");
    assert!(!out.is_complete());
    assert_eq!(store.len(), 3);
}

#[test]
fn create_batch_under_unique_policy_applies_first_of_each_name() {
    let store = MetricStore::new(NamePolicy::Unique);
    let reqs = vec![
        CreateMetric::new("x", 1.0),
        CreateMetric::new("x", 2.0),
        CreateMetric::new("y", 3.0),
    ];
    let out = store.create_batch(&reqs);
    assert_eq!(out.applied.len(), 2);
    assert_eq!(out.rejected[0].index, 1);
    assert_eq!(out.rejected[0].code, "ALREADY_EXISTS");
}

#[test]
fn append_batch_skips_bad_elements_but_applies_the_rest() {
    let store = MetricStore::default();
    let a = store.create("a", 1.0).unwrap();
    let b = store.create("b", 10.0).unwrap();

    let reqs = vec![
        AppendMetric::new(a.id, 2.0),
        AppendMetric::new(MetricId::new(), 5.0),
        AppendMetric::new("garbage", 5.0),
        AppendMetric::new(b.id, "oops"),
        AppendMetric::new(b.id, "11"),
        AppendMetric::new(a.id, 3.0),
    ];
    let out = store.append_batch(&reqs);

    assert_eq!(out.applied.len(), 3);
    let codes: Vec<_> = out.rejected.iter().map(|r| (r.index, r.code)).collect();
    assert_eq!(
        codes,
        [(1, "NOT_FOUND"), (2, "INVALID_KEY"), (3, "INVALID_VALUE")]
    );

    assert_eq!(store.find(&a.id).unwrap().values, vec![1.0, 2.0, 3.0]);
    assert_eq!(store.find(&b.id).unwrap().values, vec![10.0, 11.0]);
}

#[test]
fn batch_elements_deserialize_from_numbers_or_text() {
    let reqs: Vec<CreateMetric> =
        serde_json::from_str(r#"[{"name":"a","value":1.5},{"name":"b","value":"2.5"}]"#).unwrap();
    assert_eq!(reqs[0].value.parse().unwrap(), 1.5);
    assert_eq!(reqs[1].value.parse().unwrap(), 2.5);

    let bad = serde_json::from_str::<Vec<CreateMetric>>(r#"[{"name":"a","value":1,"extra":0}]"#);
    assert!(bad.is_err());
}

#[test]
fn null_boolean_and_missing_values_are_rejected_per_element() {
    let store = MetricStore::default();
    let reqs: Vec<CreateMetric> = serde_json::from_str(
        r#"[
            {"name":"a","value":1},
            {"name":"b","value":null},
            {"name":"c","value":true},
            {"name":"d"},
            {"name":"e","value":"5"}
        ]"#,
    )
    .unwrap();

    let out = store.create_batch(&reqs);
    let names: Vec<_> = out.applied.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["a", "e"]);
    let rejected: Vec<_> = out.rejected.iter().map(|r| (r.index, r.code)).collect();
    assert_eq!(
        rejected,
        [(1, "INVALID_VALUE"), (2, "INVALID_VALUE"), (3, "INVALID_VALUE")]
    );
    assert!(out.rejected[0].message.contains("null"));

    let id = out.applied[0].id;
    let body = format!(r#"[{{"id":"{id}","value":false}},{{"id":"{id}","value":[2]}},{{"id":"{id}","value":2}}]"#);
    let reqs: Vec<AppendMetric> = serde_json::from_str(&body).unwrap();
    let out = store.append_batch(&reqs);
    assert_eq!(out.applied.len(), 1);
    assert_eq!(out.rejected.len(), 2);
    assert!(out.rejected.iter().all(|r| r.code == "INVALID_VALUE"));
    assert_eq!(store.find(&id).unwrap().values, vec![1.0, 2.0]);
}

#[test]
fn registry_raw_stats_recompute_from_values() {
    let reg = MetricRegistry::new(RegistryConfig::default());
    let m = reg.create("rps", 4.0).unwrap();
    let id = m.id.to_string();
    reg.append(&id, 8.0).unwrap();
    reg.append(&id, -6.0).unwrap();

    let raw = reg.raw_stats(&id).unwrap();
    assert_eq!(raw.count, 3);
    assert_eq!(raw.sum, 6.0);
    assert_eq!(raw.min, -6.0);
    assert_eq!(raw.max, 8.0);
    assert_eq!(raw.average, 2.0);
}

#[test]
fn raw_average_stays_finite_for_huge_values() {
    let reg = MetricRegistry::default();
    let id = reg.create("huge", f64::MAX).unwrap().id.to_string();
    reg.append(&id, f64::MAX).unwrap();

    let raw = reg.raw_stats(&id).unwrap();
    assert_eq!(raw.count, 2);
    assert_eq!(raw.average, f64::MAX);
    assert_eq!(raw.max, f64::MAX);
}
