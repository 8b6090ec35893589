use crate::{ColumnType, EncodeError, NameTable, Registry};
use serde_json::json;

fn get_registry(names: &[(&str, ColumnType)]) -> Registry {
    let mut registry = Registry::new();
    registry.set_names(names.iter().map(|(n, t)| (*n, *t)));
    registry
}

#[test]
fn test_round_trip_every_qualified_name() {
    let mut registry = get_registry(&[
        ("weight", ColumnType::Scale),
        ("grade", ColumnType::Ordinal),
        ("city name", ColumnType::Nominal),
    ]);

    for column in ["weight", "grade", "city name"] {
        for ty in ColumnType::CONCRETE {
            let qualified = ty.qualify(column);
            let encoded = registry.encode(&qualified).unwrap();
            assert_eq!(registry.decode(&encoded).unwrap(), column);
            assert_eq!(registry.type_of(&encoded), ty);
        }
    }
}

#[test]
fn test_bare_name_follows_declared_type() {
    let mut registry = get_registry(&[("grade", ColumnType::Ordinal)]);
    let bare = registry.encode("grade").unwrap();
    assert_eq!(bare, registry.encode("grade.ordinal").unwrap());
    assert_ne!(bare, registry.encode("grade.scale").unwrap());
}

#[test]
fn test_unknown_type_has_single_identifier() {
    let mut registry = get_registry(&[("id", ColumnType::Unknown)]);
    let encoded = registry.encode("id").unwrap();
    assert_eq!(registry.type_of(&encoded), ColumnType::Unknown);
    assert!(registry.encode("id.scale").is_err());
    assert_eq!(registry.column_names(), vec!["id"]);
}

#[test]
fn test_empty_input_passes_through() {
    let mut registry = get_registry(&[("a", ColumnType::Unknown)]);
    assert_eq!(registry.encode("").unwrap(), "");
    assert_eq!(registry.decode("").unwrap(), "");
    assert_eq!(registry.type_of(""), ColumnType::Unknown);
}

#[test]
fn test_missing_names_are_errors() {
    let mut registry = get_registry(&[("weight", ColumnType::Scale)]);

    match registry.encode("wieght") {
        Err(EncodeError::NotAColumnName { suggestion, .. }) => {
            assert_eq!(suggestion.as_deref(), Some("weight"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(matches!(
        registry.decode("Column_99_Encoded"),
        Err(EncodeError::NotAnEncodedName { .. })
    ));
}

#[test]
fn test_document_round_trip() {
    let mut registry = get_registry(&[
        ("weight", ColumnType::Scale),
        ("body height", ColumnType::Scale),
    ]);
    let original = json!({
        "columns": ["weight", "body height"],
        "weight": { "label": "body height" },
        "count": 2
    });

    let mut doc = original.clone();
    registry.encode_document(&mut doc, true, false);
    assert!(!doc.to_string().contains("weight"));

    registry.decode_document(&mut doc, true);
    assert_eq!(doc, original);
}

#[test]
fn test_longest_match_first() {
    let mut table = NameTable::new("C", "_");
    table.set_names([("ab", ColumnType::Unknown), ("abc", ColumnType::Unknown)]);
    let abc = table.encode("abc").unwrap();

    let mut registry = Registry::new();
    registry.add_auxiliary(table);
    assert_eq!(registry.encode_all("abc"), abc);
    assert_eq!(registry.encode_script_text("abc"), abc);
}

#[test]
fn test_quoted_occurrence_is_left_alone() {
    let mut registry = get_registry(&[("colname", ColumnType::Unknown)]);
    let encoded = registry.encode("colname").unwrap();
    assert_eq!(
        registry.encode_script_text("colname + \"colname\""),
        format!("{encoded} + \"colname\"")
    );
}

#[test]
fn test_boundary_safety() {
    let mut registry = get_registry(&[("E", ColumnType::Unknown)]);
    assert_eq!(registry.encode_script_text("TRUE & E1"), "TRUE & E1");

    let encoded = registry.encode("E").unwrap();
    assert_eq!(registry.encode_script_text("TRUE & E"), format!("TRUE & {encoded}"));
}

#[test]
fn test_call_position_is_not_a_column() {
    let mut registry = get_registry(&[("mean", ColumnType::Scale)]);
    let encoded = registry.encode("mean").unwrap();
    assert_eq!(
        registry.encode_script_text("mean(mean) + mean ()"),
        format!("mean({encoded}) + mean ()")
    );
}

#[test]
fn test_mandatory_prefix_scoping() {
    let mut registry = get_registry(&[("score", ColumnType::Unknown)]);
    let encoded = registry.encode("score").unwrap();

    let (text, found) = registry.encode_script_text_scoped("data.score + score", "data.");
    assert_eq!(text, format!("data.{encoded} + score"));
    assert_eq!(found.into_iter().collect::<Vec<_>>(), vec!["score"]);
}

#[test]
fn test_prefix_passes_report_per_prefix() {
    let mut registry = get_registry(&[("score", ColumnType::Unknown), ("age", ColumnType::Unknown)]);

    let result = registry.encode_script_text_with_prefixes("age + data.score", &["data."]);
    let age = registry.encode("age").unwrap();
    let score = registry.encode("score").unwrap();

    assert_eq!(result.text, format!("{age} + data.{score}"));
    assert_eq!(result.found[""].iter().collect::<Vec<_>>(), vec!["age"]);
    assert_eq!(result.found["data."].iter().collect::<Vec<_>>(), vec!["score"]);
    assert_eq!(result.all_found().len(), 2);
}

#[test]
fn test_multi_encoder_aggregation() {
    let mut registry = Registry::new();
    registry.set_names([("a", ColumnType::Unknown)]);
    let a = registry.encode("a").unwrap();

    let mut aux = NameTable::new("Aux_", "_Z");
    aux.set_names([("a", ColumnType::Unknown), ("b", ColumnType::Unknown)]);
    let b = aux.encode("b").unwrap();
    registry.add_auxiliary(aux);

    assert_eq!(registry.encode("a").unwrap(), a);
    assert_eq!(registry.encode("b").unwrap(), b);
    assert_eq!(registry.decode(&b).unwrap(), "b");
}

#[test]
fn test_destroy_primary_cascade() {
    let mut registry = get_registry(&[("a", ColumnType::Unknown)]);
    registry.create_auxiliary();
    registry.create_auxiliary();
    assert_eq!(registry.live_encoders(), 3);

    let destroyed = registry.destroy_primary().unwrap();
    assert_eq!(destroyed, 2);
    assert_eq!(registry.live_encoders(), 0);
    assert!(registry.encoding_map().is_empty());
    assert!(registry.original_names().is_empty());
    assert!(registry.encode("a").is_err());
}

#[test]
fn test_decode_script_restores_names() {
    let mut registry = get_registry(&[("body weight", ColumnType::Scale), ("sex", ColumnType::Nominal)]);
    let script = "lm(body weight ~ sex, data = d)";
    let encoded = registry.encode_script_text(script);
    assert_eq!(registry.decode_script_text(&encoded), script);
}
