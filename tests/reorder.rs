use std::collections::HashSet;

use ent_reorder::{
    export::{load_snapshot, save_snapshot, to_records},
    reorder::CycleEdge,
    schemas::{create_schema_registry, OrderSchema},
    Config, ModelDescriptor, NamingStrategy, Ordering, Reorder, ReorderError, SchemaRegistry,
};

fn registry(config: &Config) -> SchemaRegistry {
    create_schema_registry(NamingStrategy::from(config))
}

fn order(config: &Config, models: &[&str]) -> Ordering {
    let registry = registry(config);
    Reorder::new(&registry, config)
        .add_models(models.iter().copied())
        .parse()
        .unwrap()
}

fn assert_no_duplicates(ordering: &Ordering) {
    let unique: HashSet<_> = ordering.ordered_tables().iter().collect();
    assert_eq!(unique.len(), ordering.len());
}

#[test]
fn test_acyclic_dependencies_come_first() {
    let ordering = order(
        &Config::default(),
        &["OrderItem", "Order", "Product", "Category", "Customer"],
    );

    assert_eq!(
        ordering.ordered_tables(),
        ["customers", "orders", "categories", "catalogue", "order_items"]
    );
    for table in ordering.ordered_tables() {
        let position = ordering.position(table).unwrap();
        for dep in ordering.dependencies(table).unwrap() {
            assert!(ordering.position(&dep.table).unwrap() < position);
        }
    }
    assert!(ordering.cycles().is_empty());
}

#[test]
fn test_auto_add_gating() {
    let without = order(&Config::default(), &["Order"]);
    assert_eq!(without.ordered_tables(), ["orders"]);

    let with = order(&Config::default().with_auto_add(true), &["Order"]);
    assert_eq!(with.ordered_tables(), ["customers", "orders"]);
    assert_eq!(
        with.ordered_models(),
        vec![ModelDescriptor::model("Customer"), ModelDescriptor::model("Order")]
    );
}

#[test]
fn test_join_table_precedes_both_sides() {
    let ordering = order(&Config::default().with_auto_add(true), &["Student", "Course"]);

    assert_eq!(ordering.ordered_tables(), ["enrollments", "courses", "students"]);
    assert_no_duplicates(&ordering);

    let join = ordering.schema("enrollments").unwrap();
    let keys: Vec<_> = join.fields.iter().map(|f| f.db_name.as_str()).collect();
    assert_eq!(keys, vec!["student_id", "course_id"]);
}

#[test]
fn test_join_table_left_out_without_auto_add() {
    let ordering = order(&Config::default(), &["Student", "Course"]);

    assert_eq!(ordering.ordered_tables(), ["courses", "students"]);
    // Still parsed, so available for inspection
    assert!(ordering.schemas().iter().any(|s| s.table == "enrollments"));
}

#[test]
fn test_listed_join_table_kept_in_any_input_order() {
    let expected = ["enrollments", "courses", "students"];

    let join_last = order(&Config::default(), &["Student", "Course", "enrollments"]);
    assert_eq!(join_last.ordered_tables(), expected);
    assert_no_duplicates(&join_last);

    let join_first = order(&Config::default(), &["enrollments", "Student", "Course"]);
    assert_eq!(join_first.ordered_tables(), expected);
}

#[test]
fn test_self_reference_terminates() {
    let ordering = order(&Config::default().with_auto_add(true), &["Category"]);

    assert_eq!(ordering.ordered_tables(), ["categories"]);
    assert!(ordering.cycles().is_empty());
}

#[test]
fn test_mutual_reference_terminates() {
    let ordering = order(&Config::default().with_auto_add(true), &["Employee", "Department"]);

    assert_eq!(ordering.ordered_tables(), ["departments", "employees"]);
    assert_eq!(
        ordering.cycles(),
        [CycleEdge {
            from: "departments".to_string(),
            to: "employees".to_string(),
        }]
    );
}

#[test]
fn test_full_registry_has_no_duplicates() {
    let config = Config::default().with_auto_add(true);
    let registry = registry(&config);
    let ordering = Reorder::new(&registry, &config)
        .add_models(registry.model_names().iter().map(String::as_str))
        .parse()
        .unwrap();

    assert_no_duplicates(&ordering);
    assert_eq!(ordering.len(), 10);
    assert!(ordering.unresolved().is_empty());
}

#[test]
fn test_naming_configuration() {
    let config = Config::default()
        .with_auto_add(true)
        .with_table_prefix("t_amz_")
        .with_singular_table(true);
    let ordering = order(&config, &["Order", "Student"]);

    assert_eq!(
        ordering.ordered_tables(),
        ["t_amz_customer", "t_amz_order", "t_amz_enrollments", "t_amz_course", "t_amz_student"]
    );
}

#[test]
fn test_unknown_model_is_reported() {
    let config = Config::default();
    let registry = registry(&config);
    let err = Reorder::new(&registry, &config)
        .add_model("Invoice")
        .parse()
        .unwrap_err();

    assert!(matches!(err, ReorderError::MetadataParse { ref descriptor, .. } if descriptor == "Invoice"));
}

#[test]
fn test_missing_dependency_is_reported_with_auto_add() {
    let config = Config::default().with_auto_add(true);
    let mut registry = SchemaRegistry::new();
    registry.register::<OrderSchema>();

    let result = Reorder::new(&registry, &config).add_model("Order").parse();
    assert!(matches!(result, Err(ReorderError::MetadataParse { .. })));
}

#[test]
fn test_snapshot_round_trip() {
    let ordering = order(&Config::default().with_auto_add(true), &["OrderItem"]);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schema.json");

    save_snapshot(&path, ordering.ordered_schemas()).unwrap();
    let loaded = load_snapshot(&path).unwrap();

    assert_eq!(loaded, to_records(ordering.ordered_schemas()));
    let orders = loaded.iter().find(|r| r.table_name == "orders").unwrap();
    assert!(orders.fields.iter().all(|f| f.name != "displayTotal"));
    assert!(orders.fields.iter().any(|f| f.db_name == "customer_id"));
}
